// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./dogrun.toml` > `~/.config/dogrun/dogrun.toml`
//! > `/etc/dogrun/dogrun.toml`, with environment variable overrides via the
//! `DOGRUN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DogrunConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dogrun/dogrun.toml` (system-wide)
/// 3. `~/.config/dogrun/dogrun.toml` (user XDG config)
/// 4. `./dogrun.toml` (local directory)
/// 5. `DOGRUN_*` environment variables
pub fn load_config() -> Result<DogrunConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DogrunConfig::default()))
        .merge(Toml::file("/etc/dogrun/dogrun.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dogrun/dogrun.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dogrun.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DogrunConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DogrunConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DogrunConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DogrunConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DOGRUN_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("DOGRUN_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("maintenance_", "maintenance.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_file() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.service.name, "dogrun");
        assert_eq!(config.gateway.port, 8420);
        assert_eq!(config.maintenance.admin_utc_offset_hours, 9);
        assert!(config.gateway.admin_token.is_none());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[gateway]
host = "0.0.0.0"
port = 9000
admin_token = "s3cret"

[storage]
database_path = "/var/lib/dogrun/dogrun.db"
"#,
        )
        .unwrap();
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.admin_token.as_deref(), Some("s3cret"));
        assert_eq!(config.storage.database_path, "/var/lib/dogrun/dogrun.db");
        // Untouched sections keep their defaults.
        assert!(config.storage.wal_mode);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
[service]
naem = "typo"
"#,
        );
        assert!(result.is_err());
    }
}
