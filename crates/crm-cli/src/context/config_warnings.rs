use crm_config::{CrmConfig, GeneralConfig, NotificationsConfig};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &CrmConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &CrmConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.schema.is_configured() && has_env_prefix(&env_keys, "CRM_SCHEMA") {
        warnings.push(
            "Schema config appears default while CRM_SCHEMA* env vars exist. Use double underscores (example: CRM_SCHEMA__PATH)."
                .to_string(),
        );
    }

    if config.notifications == NotificationsConfig::default()
        && has_env_prefix(&env_keys, "CRM_NOTIFICATIONS")
    {
        warnings.push(
            "Notifications config appears default while CRM_NOTIFICATIONS* env vars exist. Use double underscores (example: CRM_NOTIFICATIONS__CAPACITY)."
                .to_string(),
        );
    }

    if config.general == GeneralConfig::default() && has_env_prefix(&env_keys, "CRM_GENERAL") {
        warnings.push(
            "General config appears default while CRM_GENERAL* env vars exist. Use double underscores (example: CRM_GENERAL__DEFAULT_MODE)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use crm_config::{CrmConfig, GeneralConfig, NotificationsConfig, SchemaConfig};
    use crm_core::enums::RenderMode;

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_unconfigured_sections_with_env_prefixes() {
        let config = CrmConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("CRM_SCHEMA_PATH".to_string(), "plan.json".to_string()),
                ("CRM_NOTIFICATIONS_CAPACITY".to_string(), "5".to_string()),
                ("CRM_GENERAL_DEFAULT_MODE".to_string(), "create".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn does_not_warn_when_sections_are_configured() {
        let config = CrmConfig {
            schema: SchemaConfig {
                path: "plan.json".to_string(),
                ..Default::default()
            },
            notifications: NotificationsConfig { capacity: 5 },
            general: GeneralConfig {
                default_mode: RenderMode::Create,
            },
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("CRM_SCHEMA__PATH".to_string(), "plan.json".to_string()),
                ("CRM_NOTIFICATIONS__CAPACITY".to_string(), "5".to_string()),
                ("CRM_GENERAL__DEFAULT_MODE".to_string(), "create".to_string()),
            ],
        );

        assert!(warnings.is_empty());
    }

    #[test]
    fn ignores_unrelated_env() {
        let warnings = collect_unconfigured_warnings(
            &CrmConfig::default(),
            vec![("CRM_LOG".to_string(), "debug".to_string())],
        );
        assert!(warnings.is_empty());
    }
}
