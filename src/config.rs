//! Bridge Configuration
//!
//! Handles parsing and management of `bridge.toml` configuration files.
//! Everything has a sensible default; a missing file is an error but an
//! empty file is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoding;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("unsupported default encoding `{0}`")]
    UnsupportedEncoding(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching `bridge.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BridgeConfig {
    /// Marshaling defaults
    #[serde(default)]
    pub marshal: MarshalConfig,

    /// Diagnostic behavior
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// System-call wrapper behavior
    #[serde(default)]
    pub syscalls: SyscallConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarshalConfig {
    /// Encoding tag used when an entry point receives none.
    #[serde(default = "default_encoding")]
    pub default_encoding: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Whether draining a pending exception also resolves and logs its
    /// message text.
    #[serde(default = "default_true")]
    pub print_exception_messages: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyscallConfig {
    /// Whether memory-locking wrappers translate a negative return into
    /// a raised internal-error exception.
    #[serde(default)]
    pub checked: bool,
}

fn default_encoding() -> String {
    encoding::DEFAULT_ENCODING.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            default_encoding: default_encoding(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            print_exception_messages: true,
        }
    }
}

impl Default for SyscallConfig {
    fn default() -> Self {
        Self { checked: false }
    }
}

impl BridgeConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !encoding::is_supported(&self.marshal.default_encoding) {
            return Err(ConfigError::UnsupportedEncoding(
                self.marshal.default_encoding.clone(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config = BridgeConfig::parse("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.marshal.default_encoding, "UTF-8");
        assert!(config.diagnostics.print_exception_messages);
        assert!(!config.syscalls.checked);
    }

    #[test]
    fn test_partial_config() {
        let config = BridgeConfig::parse(
            r#"
            [marshal]
            default_encoding = "ISO-8859-1"

            [syscalls]
            checked = true
            "#,
        )
        .unwrap();
        assert_eq!(config.marshal.default_encoding, "ISO-8859-1");
        assert!(config.syscalls.checked);
        assert!(config.diagnostics.print_exception_messages);
    }

    #[test]
    fn test_unknown_default_encoding_is_rejected() {
        let err = BridgeConfig::parse(
            r#"
            [marshal]
            default_encoding = "EBCDIC"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedEncoding(_)));
    }
}
