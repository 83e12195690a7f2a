// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maintenance middleware for the public API surface.
//!
//! Every public request is checked against the maintenance gate. Blocked
//! callers receive 503 with the schedule's title and message so the
//! client can render a proper banner. The client IP is taken from the
//! configured proxy header (first hop) and falls back to the socket
//! address when the header is absent.

use std::net::{IpAddr, SocketAddr};

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::server::ServerState;

#[derive(Debug, Serialize)]
pub struct MaintenanceBody {
    pub error: String,
    pub title: String,
    pub message: String,
    pub end_time: Option<String>,
}

/// The first hop in a comma-separated proxy header, parsed as an address.
pub(crate) fn ip_from_header(headers: &HeaderMap, header_name: &str) -> Option<IpAddr> {
    headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
}

pub async fn maintenance_middleware(
    State(state): State<ServerState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = ip_from_header(request.headers(), &state.client_ip_header)
        .or(Some(remote.ip()));

    let decision = match state.gate.evaluate(client_ip, chrono::Utc::now()).await {
        Ok(decision) => decision,
        Err(e) => {
            // The gate could not be evaluated; do not take the public API
            // down over it.
            error!(error = %e, "maintenance gate evaluation failed, allowing request");
            return next.run(request).await;
        }
    };

    if decision.blocked {
        let schedule = decision.schedule.expect("blocked implies a schedule");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(MaintenanceBody {
                error: "maintenance".to_string(),
                title: schedule.title,
                message: schedule.message,
                end_time: schedule.end_time,
            }),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_first_hop_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(
            ip_from_header(&headers, "x-forwarded-for"),
            Some("203.0.113.7".parse().unwrap())
        );
    }

    #[test]
    fn missing_or_garbage_header_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(ip_from_header(&headers, "x-forwarded-for"), None);

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        assert_eq!(ip_from_header(&headers, "x-forwarded-for"), None);
    }
}
