//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All errors are returned at
//! once, not just the first.

use thiserror::Error;

use crate::config::schema::ServiceConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("port {0:?} is not a valid TCP port")]
    InvalidPort(String),

    #[error("bind_host must not be empty")]
    EmptyBindHost,

    #[error("app_name must not be empty")]
    EmptyAppName,
}

/// Check a config before it is accepted.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.port.parse::<u16>() {
        Ok(port) if port != 0 => {}
        _ => errors.push(ValidationError::InvalidPort(config.port.clone())),
    }

    if config.bind_host.trim().is_empty() {
        errors.push(ValidationError::EmptyBindHost);
    }

    if config.app_name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
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
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let config = ServiceConfig {
            port: "http".into(),
            bind_host: " ".into(),
            ..ServiceConfig::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidPort("http".into()),
                ValidationError::EmptyBindHost,
            ]
        );
    }

    #[test]
    fn test_port_zero_rejected() {
        let config = ServiceConfig {
            port: "0".into(),
            ..ServiceConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
