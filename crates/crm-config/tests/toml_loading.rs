//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use crm_config::{ConfigError, CrmConfig};
use crm_core::enums::RenderMode;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_every_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[schema]
path = "schemas/plan.json"
validate_on_load = false

[notifications]
capacity = 10

[general]
default_mode = "compare"
"#,
        )?;

        let config: CrmConfig = Figment::from(Serialized::defaults(CrmConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.schema.path, "schemas/plan.json");
        assert!(!config.schema.validate_on_load);
        assert_eq!(config.notifications.capacity, 10);
        assert_eq!(config.general.default_mode, RenderMode::Compare);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[notifications]\ncapacity = 5\n")?;

        let config: CrmConfig = Figment::from(Serialized::defaults(CrmConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.notifications.capacity, 5);
        assert!(config.schema.validate_on_load);
        assert!(!config.schema.is_configured());
        assert_eq!(config.general.default_mode, RenderMode::Edit);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".crm")?;
        jail.create_file(
            ".crm/config.toml",
            "[schema]\npath = \"local.json\"\n[general]\ndefault_mode = \"create\"\n",
        )?;

        let config = CrmConfig::load().expect("config loads");
        assert_eq!(config.schema.path, "local.json");
        assert_eq!(config.general.default_mode, RenderMode::Create);
        Ok(())
    });
}

#[cfg(target_os = "linux")]
#[test]
fn project_config_overrides_user_config() {
    Jail::expect_with(|jail| {
        let home = jail.directory().join("xdg");
        jail.create_dir("xdg/crm")?;
        jail.create_file(
            "xdg/crm/config.toml",
            "[schema]\npath = \"user.json\"\n[notifications]\ncapacity = 7\n",
        )?;
        jail.set_env("XDG_CONFIG_HOME", home.display());

        let config = CrmConfig::load().expect("config loads");
        assert_eq!(config.schema.path, "user.json");
        assert_eq!(config.notifications.capacity, 7);

        jail.create_dir(".crm")?;
        jail.create_file(".crm/config.toml", "[schema]\npath = \"project.json\"\n")?;

        let config = CrmConfig::load().expect("config loads");
        assert_eq!(config.schema.path, "project.json");
        assert_eq!(config.notifications.capacity, 7);
        Ok(())
    });
}

#[test]
fn unknown_mode_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".crm")?;
        jail.create_file(".crm/config.toml", "[general]\ndefault_mode = \"preview\"\n")?;

        assert!(matches!(CrmConfig::load(), Err(ConfigError::Figment(_))));
        Ok(())
    });
}

#[test]
fn zero_capacity_is_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".crm")?;
        jail.create_file(".crm/config.toml", "[notifications]\ncapacity = 0\n")?;

        let err = CrmConfig::load().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "notifications.capacity"),
            "unexpected error: {err}"
        );
        Ok(())
    });
}
