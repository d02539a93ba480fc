use config::{Config, ConfigError, Environment, File as ConfigFile, FileFormat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Globs a path must match to be part of the dataset layout.
    pub include_patterns: Vec<String>,
    /// Globs marking auxiliary data (stimuli and the like) kept out of the check.
    pub exclude_patterns: Vec<String>,
    /// Globs skipped while walking the dataset directory.
    pub ignore_patterns: Vec<String>,
    /// Subject tokens that are never real subjects.
    pub sentinel_subjects: Vec<String>,
    /// Label reported for files outside any `ses-*` directory.
    pub default_session_label: String,
    /// Only consider entries that carry a directory-selection path.
    pub require_directory_selection: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["/sub-*/**".to_string()],
            exclude_patterns: vec!["/stimuli/**".to_string()],
            ignore_patterns: vec!["**/.*".to_string()],
            sentinel_subjects: vec!["sub-emptyroom".to_string()],
            default_session_label: "1".to_string(),
            require_directory_selection: false,
        }
    }
}

/// Reads `Config.toml` (optional) and `SESSION_CHECK__*` environment overrides.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("SESSION_CHECK")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("include_patterns")
                .with_list_parse_key("exclude_patterns")
                .with_list_parse_key("ignore_patterns")
                .with_list_parse_key("sentinel_subjects")
                .try_parsing(true),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
