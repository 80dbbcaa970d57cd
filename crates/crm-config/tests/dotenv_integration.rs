//! `.env` loading through `CrmConfig::load_with_dotenv`.
//!
//! dotenvy writes into the process environment, which `Jail` does not restore,
//! so this binary holds a single test.

use crm_config::CrmConfig;
use figment::Jail;
use pretty_assertions::assert_eq;

#[test]
fn dotenv_values_flow_through_figment() {
    Jail::expect_with(|jail| {
        jail.create_file(
            ".env",
            "CRM_SCHEMA__PATH=from-dotenv.json\nCRM_NOTIFICATIONS__CAPACITY=12\n",
        )?;

        let config = CrmConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.schema.path, "from-dotenv.json");
        assert_eq!(config.notifications.capacity, 12);
        Ok(())
    });
}
