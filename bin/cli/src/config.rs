//! Centralized CLI configuration.
//!
//! Loaded via the `config` crate from `FLOWCANVAS__*` environment variables,
//! with `__` separating nested keys, e.g. `FLOWCANVAS__EDITOR__HISTORY_LIMIT=100`.

use flowcanvas_editor::EditorConfig;
use serde::Deserialize;

/// CLI configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct CliConfig {
    /// Editor session tunables (layout spacing, group metrics).
    #[serde(default)]
    pub editor: EditorConfig,

    /// Indent written JSON for humans.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            pretty: default_pretty(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix("FLOWCANVAS"))
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
