// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dogrun status` command implementation.
//!
//! Probes the gateway health endpoint and reports service state. Degrades
//! gracefully when the service is not running.

use std::time::Duration;

use dogrun_config::DogrunConfig;
use dogrun_core::DogrunError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub version: Option<String>,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub gateway_host: String,
    pub gateway_port: u16,
}

fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

fn print_status(status: &StatusResponse, json: bool) -> Result<(), DogrunError> {
    if json {
        let rendered = serde_json::to_string_pretty(status)
            .map_err(|e| DogrunError::Internal(format!("failed to render status: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    if status.running {
        println!(
            "dogrun is running ({}), uptime {}",
            status.status,
            status.uptime_human.as_deref().unwrap_or("unknown"),
        );
    } else {
        println!(
            "dogrun is not running (no gateway at {}:{})",
            status.gateway_host, status.gateway_port
        );
    }
    Ok(())
}

/// Run the `dogrun status` command.
pub async fn run_status(config: &DogrunConfig, json: bool) -> Result<(), DogrunError> {
    let host = &config.gateway.host;
    let port = config.gateway.port;
    let url = format!("http://{host}:{port}/health");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| DogrunError::Internal(format!("failed to create HTTP client: {e}")))?;

    let status = match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let health: HealthResponse = resp.json().await.map_err(|e| {
                DogrunError::Internal(format!("failed to parse health response: {e}"))
            })?;
            StatusResponse {
                running: true,
                status: health.status,
                version: Some(health.version),
                uptime_human: Some(format_uptime(health.uptime_secs)),
                uptime_secs: Some(health.uptime_secs),
                gateway_host: host.clone(),
                gateway_port: port,
            }
        }
        _ => StatusResponse {
            running: false,
            status: "unreachable".to_string(),
            version: None,
            uptime_secs: None,
            uptime_human: None,
            gateway_host: host.clone(),
            gateway_port: port,
        },
    };

    print_status(&status, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formats_each_magnitude() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(3_660), "1h 1m");
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
    }
}
