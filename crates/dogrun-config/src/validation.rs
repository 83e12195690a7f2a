// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and a sane
//! admin timezone offset.

use crate::diagnostic::ConfigError;
use crate::model::DogrunConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &DogrunConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate gateway.host is a valid IP or hostname.
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must be non-zero".to_string(),
        });
    }

    // Validate storage paths are not empty.
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.storage.object_root.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.object_root must not be empty".to_string(),
        });
    }

    // Real-world UTC offsets span -12..=+14.
    let offset = config.maintenance.admin_utc_offset_hours;
    if !(-12..=14).contains(&offset) {
        errors.push(ConfigError::Validation {
            message: format!(
                "maintenance.admin_utc_offset_hours must be between -12 and 14, got {offset}"
            ),
        });
    }

    if config.maintenance.client_ip_header.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "maintenance.client_ip_header must not be empty".to_string(),
        });
    }

    // An empty token would make bearer auth trivially bypassable; absent is
    // the way to disable admin routes.
    if let Some(token) = &config.gateway.admin_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "gateway.admin_token must not be empty when set (omit it to disable admin routes)"
                .to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = DogrunConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = DogrunConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn out_of_range_offset_fails_validation() {
        let mut config = DogrunConfig::default();
        config.maintenance.admin_utc_offset_hours = 26;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("admin_utc_offset_hours"))
        ));
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut config = DogrunConfig::default();
        config.gateway.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("port"))
        ));
    }

    #[test]
    fn empty_admin_token_fails_but_absent_is_fine() {
        let mut config = DogrunConfig::default();
        config.gateway.admin_token = Some("   ".to_string());
        assert!(validate_config(&config).is_err());

        config.gateway.admin_token = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = DogrunConfig::default();
        config.gateway.host = "0.0.0.0".to_string();
        config.gateway.port = 8080;
        config.storage.database_path = "/tmp/dogrun.db".to_string();
        config.maintenance.admin_utc_offset_hours = -5;
        assert!(validate_config(&config).is_ok());
    }
}
