use crate::config::models::{AppConfig, CosmosDbConfig, LoggingConfig, ScheduleConfig};

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Presence checks for the host configuration
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the entire configuration, collecting every problem found
    pub fn validate(config: &AppConfig) -> ValidationResult<()> {
        let mut errors = Self::validate_provider(&config.provider);
        errors.extend(Self::validate_logging(&config.logging));
        errors.extend(Self::validate_schedule(&config.schedule));

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            }),
        }
    }

    fn validate_provider(provider: &CosmosDbConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("provider.host", &provider.host),
            ("provider.database", &provider.database),
            ("provider.collection_name", &provider.collection_name),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        if provider.port == 0 {
            errors.push(ValidationError::InvalidField {
                field: "provider.port".to_string(),
                message: "Port must be between 1 and 65535".to_string(),
            });
        }

        if provider.username.is_empty() && !provider.password.is_empty() {
            errors.push(ValidationError::InvalidField {
                field: "provider.username".to_string(),
                message: "A password is set but no username".to_string(),
            });
        }

        match provider.dial_timeout() {
            Ok(timeout) if timeout.is_zero() => errors.push(ValidationError::InvalidField {
                field: "provider.dial_timeout".to_string(),
                message: "Dial timeout must be greater than zero".to_string(),
            }),
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidField {
                field: "provider.dial_timeout".to_string(),
                message: format!("'{}' is not a duration: {e}", provider.dial_timeout),
            }),
        }

        errors
    }

    fn validate_logging(logging: &LoggingConfig) -> Vec<ValidationError> {
        match tracing_subscriber::EnvFilter::try_new(&logging.level) {
            Ok(_) => Vec::new(),
            Err(e) => vec![ValidationError::InvalidField {
                field: "logging.level".to_string(),
                message: e.to_string(),
            }],
        }
    }

    fn validate_schedule(schedule: &ScheduleConfig) -> Vec<ValidationError> {
        match schedule.refresh_interval() {
            Ok(Some(interval)) if interval.is_zero() => vec![ValidationError::InvalidField {
                field: "schedule.refresh_interval".to_string(),
                message: "Refresh interval must be greater than zero".to_string(),
            }],
            Ok(_) => Vec::new(),
            Err(e) => vec![ValidationError::InvalidField {
                field: "schedule.refresh_interval".to_string(),
                message: e.to_string(),
            }],
        }
    }

    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        let lines: Vec<String> = errors
            .iter()
            .enumerate()
            .map(|(i, e)| format!("  {}. {e}", i + 1))
            .collect();
        format!("{} errors:\n{}", errors.len(), lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::DEFAULT_DIAL_TIMEOUT;

    fn valid_config() -> AppConfig {
        AppConfig {
            provider: CosmosDbConfig {
                host: "127.0.0.1".to_string(),
                port: 27017,
                username: String::new(),
                password: String::new(),
                database: "test".to_string(),
                collection_name: "traefik".to_string(),
                dial_timeout: DEFAULT_DIAL_TIMEOUT.to_string(),
            },
            logging: LoggingConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(ConfigValidator::validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_host() {
        let mut config = valid_config();
        config.provider.host = "  ".to_string();

        assert_eq!(
            ConfigValidator::validate(&config),
            Err(ValidationError::MissingField {
                field: "provider.host".to_string()
            })
        );
    }

    #[test]
    fn test_multiple_errors_are_collected() {
        let mut config = valid_config();
        config.provider.port = 0;
        config.provider.collection_name = String::new();
        config.provider.dial_timeout = "soon".to_string();

        let err = ConfigValidator::validate(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("3 errors"));
        assert!(message.contains("provider.port"));
        assert!(message.contains("provider.collection_name"));
        assert!(message.contains("provider.dial_timeout"));
    }

    #[test]
    fn test_password_without_username() {
        let mut config = valid_config();
        config.provider.password = "secret".to_string();

        assert!(matches!(
            ConfigValidator::validate(&config),
            Err(ValidationError::InvalidField { field, .. }) if field == "provider.username"
        ));
    }

    #[test]
    fn test_zero_refresh_interval() {
        let mut config = valid_config();
        config.schedule.refresh_interval = Some("0s".to_string());

        assert!(ConfigValidator::validate(&config).is_err());
    }
}
