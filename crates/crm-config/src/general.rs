//! General application configuration.

use crm_core::enums::RenderMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Mode used by `crm form` when `--mode` is not given.
    #[serde(default)]
    pub default_mode: RenderMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(GeneralConfig::default().default_mode, RenderMode::Edit);
    }
}
