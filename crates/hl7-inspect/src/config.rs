//! Environment-driven configuration.

use std::path::PathBuf;

/// Built-in message used when no schema file is configured.
pub const DEFAULT_MESSAGE: &str = "PMU_B01";

/// Environment variable naming a JSON schema file.
pub const SCHEMA_PATH_VAR: &str = "HL7_SCHEMA_PATH";
/// Environment variable naming a built-in message structure.
pub const MESSAGE_VAR: &str = "HL7_MESSAGE";
/// Environment variable toggling creation of required structures.
pub const POPULATE_REQUIRED_VAR: &str = "HL7_POPULATE_REQUIRED";

/// Configuration for one inspect run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectConfig {
    /// JSON schema to build the message from, instead of a built-in one.
    pub schema_path: Option<PathBuf>,
    /// Built-in message structure name.
    pub message: String,
    /// Whether required structures are created before printing.
    pub populate_required: bool,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            schema_path: None,
            message: DEFAULT_MESSAGE.to_string(),
            populate_required: true,
        }
    }
}

impl InspectConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            schema_path: lookup(SCHEMA_PATH_VAR)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            message: lookup(MESSAGE_VAR)
                .filter(|m| !m.is_empty())
                .unwrap_or(defaults.message),
            populate_required: lookup(POPULATE_REQUIRED_VAR)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.populate_required),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
