//! Configuration validation.
//!
//! Semantic checks that serde cannot express: value ranges, required fields,
//! recognized log levels. Returns all violations, not just the first.

use crate::config::schema::RelayConfig;

const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

/// A single semantic violation in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field the violation applies to.
    pub field: &'static str,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a deserialized configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listen_port == 0 {
        errors.push(ValidationError {
            field: "listen_port",
            message: "must be between 1 and 65535".to_string(),
        });
    }
    if config.target_port == 0 {
        errors.push(ValidationError {
            field: "target_port",
            message: "must be between 1 and 65535".to_string(),
        });
    }
    if config.target_addr.is_empty() {
        errors.push(ValidationError {
            field: "target_addr",
            message: "cannot be empty".to_string(),
        });
    }
    if config.max_conns < 1 {
        errors.push(ValidationError {
            field: "max_conns",
            message: format!("must be at least 1, got {}", config.max_conns),
        });
    }
    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        errors.push(ValidationError {
            field: "log_level",
            message: format!(
                "must be one of: debug, info, warn, error; got {}",
                config.log_level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn rejects_zero_ports_and_empty_target() {
        let config = RelayConfig {
            listen_port: 0,
            target_port: 0,
            target_addr: String::new(),
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["listen_port", "target_port", "target_addr"]);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = RelayConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "log_level");
    }

    #[test]
    fn rejects_zero_max_conns() {
        let config = RelayConfig {
            max_conns: 0,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
