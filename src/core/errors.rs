//! OST-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, OstError>;

/// Top-level error type for the status daemon.
///
/// Data-source failures never reach this type: they are folded into
/// [`Unavailable`](crate::monitor::reading::Unavailable) at the accessor
/// boundary. What remains is configuration trouble (fatal at startup) and
/// display faults (fatal at runtime).
#[derive(Debug, Error)]
pub enum OstError {
    #[error("[OST-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[OST-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[OST-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[OST-1101] unsupported platform: {details}")]
    UnsupportedPlatform { details: String },

    #[error("[OST-2001] kernel counter parse failure in {source_name}: {details}")]
    CounterParse {
        source_name: &'static str,
        details: String,
    },

    #[error("[OST-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[OST-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[OST-3101] display transport failure during {operation}: {details}")]
    Display {
        operation: &'static str,
        details: String,
    },
}

impl OstError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "OST-1001",
            Self::MissingConfig { .. } => "OST-1002",
            Self::ConfigParse { .. } => "OST-1003",
            Self::UnsupportedPlatform { .. } => "OST-1101",
            Self::CounterParse { .. } => "OST-2001",
            Self::Serialization { .. } => "OST-2101",
            Self::Io { .. } => "OST-3002",
            Self::Display { .. } => "OST-3101",
        }
    }

    /// Whether the failure belongs to the startup configuration class.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::MissingConfig { .. } | Self::ConfigParse { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for OstError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for OstError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<OstError> {
        vec![
            OstError::InvalidConfig {
                details: String::new(),
            },
            OstError::MissingConfig {
                path: PathBuf::new(),
            },
            OstError::ConfigParse {
                context: "",
                details: String::new(),
            },
            OstError::UnsupportedPlatform {
                details: String::new(),
            },
            OstError::CounterParse {
                source_name: "",
                details: String::new(),
            },
            OstError::Serialization {
                context: "",
                details: String::new(),
            },
            OstError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            OstError::Display {
                operation: "",
                details: String::new(),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = all_variants();
        let codes: Vec<&str> = errors.iter().map(OstError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn error_codes_have_ost_prefix() {
        for err in &all_variants() {
            assert!(
                err.code().starts_with("OST-"),
                "code {} must start with OST-",
                err.code()
            );
        }
    }

    #[test]
    fn error_display_includes_code() {
        let err = OstError::InvalidConfig {
            details: "no valid detail modes".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("OST-1001"), "display should contain code: {msg}");
        assert!(msg.contains("no valid detail modes"));
    }

    #[test]
    fn config_class_covers_startup_errors_only() {
        let config_codes: Vec<&str> = all_variants()
            .iter()
            .filter(|err| err.is_config_error())
            .map(OstError::code)
            .collect();
        assert_eq!(config_codes, ["OST-1001", "OST-1002", "OST-1003"]);
        assert!(
            !OstError::Display {
                operation: "flush",
                details: String::new()
            }
            .is_config_error()
        );
    }

    #[test]
    fn io_convenience_constructor() {
        let err = OstError::io(
            "/proc/stat",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "OST-3002");
        assert!(err.to_string().contains("/proc/stat"));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: OstError = json_err.into();
        assert_eq!(err.code(), "OST-2101");
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: OstError = toml_err.into();
        assert_eq!(err.code(), "OST-1003");
        assert!(err.is_config_error());
    }
}
