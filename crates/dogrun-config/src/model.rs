// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the dogrun platform.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level dogrun configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DogrunConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Record store and object store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Maintenance gate settings.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "dogrun".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Record store and object store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Root directory for image object buckets.
    #[serde(default = "default_object_root")]
    pub object_root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            object_root: default_object_root(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("dogrun").join("dogrun.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("dogrun.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_object_root() -> String {
    dirs::data_dir()
        .map(|p| p.join("dogrun").join("objects"))
        .unwrap_or_else(|| std::path::PathBuf::from("objects"))
        .to_string_lossy()
        .into_owned()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token for admin routes. `None` rejects all admin requests
    /// (fail-closed).
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            admin_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8420
}

/// Maintenance gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MaintenanceConfig {
    /// Fixed UTC offset (hours) of the timezone admins type schedule times
    /// in. Times are converted to UTC at the gateway boundary.
    #[serde(default = "default_admin_utc_offset_hours")]
    pub admin_utc_offset_hours: i32,

    /// Header carrying the original client IP behind a proxy. The first
    /// hop is used; the socket address is the fallback.
    #[serde(default = "default_client_ip_header")]
    pub client_ip_header: String,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            admin_utc_offset_hours: default_admin_utc_offset_hours(),
            client_ip_header: default_client_ip_header(),
        }
    }
}

fn default_admin_utc_offset_hours() -> i32 {
    9 // platform operations are run from JST
}

fn default_client_ip_header() -> String {
    "x-forwarded-for".to_string()
}
