// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Decision endpoints hand the request to the approval engine and return
//! its `{success, message}` outcome verbatim with status 200; the engine
//! already folded business failures into the body, and the client branches
//! on the flag. Only transport-level problems (bad input shapes, missing
//! auth) use HTTP error codes.

use std::str::FromStr;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use dogrun_core::types::{
    DecisionOutcome, Facility, FacilityStatus, IpWhitelistEntry, MaintenanceSchedule, Principal,
};
use dogrun_maintenance::Cidr;
use serde::{Deserialize, Serialize};

use crate::server::ServerState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    tracing::error!(error = %e, "handler failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal error".to_string(),
        }),
    )
        .into_response()
}

// --- Public endpoints ---

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

pub async fn get_health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[derive(Debug, Serialize)]
pub struct MaintenanceStatusResponse {
    pub active: bool,
    pub title: Option<String>,
    pub message: Option<String>,
    pub end_time: Option<String>,
    pub is_emergency: Option<bool>,
}

/// GET /v1/maintenance/status
///
/// Reachable during maintenance; clients poll it to render the banner.
pub async fn get_maintenance_status(State(state): State<ServerState>) -> Response {
    match state.gate.evaluate(None, Utc::now()).await {
        Ok(decision) => {
            let schedule = decision.schedule;
            Json(MaintenanceStatusResponse {
                active: schedule.is_some(),
                title: schedule.as_ref().map(|s| s.title.clone()),
                message: schedule.as_ref().map(|s| s.message.clone()),
                end_time: schedule.as_ref().and_then(|s| s.end_time.clone()),
                is_emergency: schedule.as_ref().map(|s| s.is_emergency),
            })
            .into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// GET /v1/facilities -- the public listing, approved facilities only.
pub async fn get_public_facilities(State(state): State<ServerState>) -> Response {
    match state
        .store
        .list_facilities(Some(FacilityStatus::Approved))
        .await
    {
        Ok(facilities) => Json(facilities).into_response(),
        Err(e) => internal_error(e),
    }
}

// --- Admin: facilities ---

#[derive(Debug, Deserialize)]
pub struct FacilityListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FacilityListResponse {
    pub facilities: Vec<Facility>,
}

/// GET /v1/admin/facilities?status=pending
pub async fn get_facilities(
    State(state): State<ServerState>,
    Query(query): Query<FacilityListQuery>,
) -> Response {
    let status = match query.status.as_deref() {
        Some(raw) => match FacilityStatus::from_str(raw) {
            Ok(status) => Some(status),
            Err(_) => return bad_request(format!("unknown facility status: {raw}")),
        },
        None => None,
    };
    match state.store.list_facilities(status).await {
        Ok(facilities) => Json(FacilityListResponse { facilities }).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub approve: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /v1/admin/facilities/{id}/decision
pub async fn post_facility_decision(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<DecisionRequest>,
) -> Json<DecisionOutcome> {
    Json(
        state
            .engine
            .decide_facility(&principal, &id, body.approve, body.reason.as_deref())
            .await,
    )
}

/// DELETE /v1/admin/facilities/{id}
pub async fn delete_facility(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Json<DecisionOutcome> {
    Json(state.engine.delete_facility(&principal, &id).await)
}

#[derive(Debug, Deserialize)]
pub struct ImageDecisionRequest {
    pub approve: bool,
    #[serde(default)]
    pub note: Option<String>,
}

/// POST /v1/admin/images/{id}/decision
pub async fn post_image_decision(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<ImageDecisionRequest>,
) -> Json<DecisionOutcome> {
    Json(
        state
            .engine
            .decide_image(&principal, &id, body.approve, body.note.as_deref())
            .await,
    )
}

// --- Admin: vaccine certifications ---

/// POST /v1/admin/certifications/{id}/decision
pub async fn post_vaccine_decision(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<DecisionRequest>,
) -> Json<DecisionOutcome> {
    Json(
        state
            .engine
            .decide_vaccine(&principal, &id, body.approve, body.reason.as_deref())
            .await,
    )
}

#[derive(Debug, Deserialize)]
pub struct ExpiryUpdateRequest {
    #[serde(default)]
    pub rabies_expiry: Option<String>,
    #[serde(default)]
    pub combo_expiry: Option<String>,
}

/// PATCH /v1/admin/certifications/{id}/expiry
pub async fn patch_vaccine_expiry(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<ExpiryUpdateRequest>,
) -> Json<DecisionOutcome> {
    Json(
        state
            .engine
            .update_vaccine_expiry(
                &principal,
                &id,
                body.rabies_expiry.as_deref(),
                body.combo_expiry.as_deref(),
            )
            .await,
    )
}

// --- Admin: maintenance schedules ---

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub title: String,
    pub message: String,
    /// Local wall-clock time (`YYYY-MM-DDTHH:MM`) in the configured admin
    /// timezone; omitted bounds are open-ended.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_emergency: bool,
}

/// Convert an admin-local wall-clock time into an RFC 3339 UTC timestamp.
pub(crate) fn admin_local_to_utc(raw: &str, offset_hours: i32) -> Result<String, String> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("unparseable local time: {raw}"))?;
    let offset = FixedOffset::east_opt(offset_hours * 3600)
        .ok_or_else(|| format!("invalid admin timezone offset: {offset_hours}"))?;
    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| format!("ambiguous local time: {raw}"))?;
    Ok(local
        .with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string())
}

/// POST /v1/admin/maintenance
pub async fn post_schedule(
    State(state): State<ServerState>,
    Json(body): Json<ScheduleRequest>,
) -> Response {
    if body.title.trim().is_empty() || body.message.trim().is_empty() {
        return bad_request("title and message are required");
    }
    let convert = |raw: &Option<String>| -> Result<Option<String>, String> {
        raw.as_deref()
            .map(|r| admin_local_to_utc(r, state.admin_utc_offset_hours))
            .transpose()
    };
    let (start_time, end_time) = match (convert(&body.start_time), convert(&body.end_time)) {
        (Ok(start), Ok(end)) => (start, end),
        (Err(e), _) | (_, Err(e)) => return bad_request(e),
    };

    let schedule = MaintenanceSchedule {
        id: uuid::Uuid::new_v4().to_string(),
        title: body.title.trim().to_string(),
        message: body.message.trim().to_string(),
        start_time,
        end_time,
        is_active: true,
        is_emergency: body.is_emergency,
        created_at: Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    };
    match state.store.insert_maintenance_schedule(&schedule).await {
        Ok(()) => (StatusCode::CREATED, Json(schedule)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// POST /v1/admin/maintenance/{id}/end
pub async fn post_schedule_end(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Response {
    let ended_at = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    match state
        .store
        .deactivate_maintenance_schedule(&id, &ended_at)
        .await
    {
        Ok(()) => Json(serde_json::json!({ "ended_at": ended_at })).into_response(),
        Err(e) => internal_error(e),
    }
}

// --- Admin: IP whitelist ---

#[derive(Debug, Deserialize)]
pub struct WhitelistRequest {
    pub ip_address: String,
    #[serde(default)]
    pub description: String,
}

/// POST /v1/admin/whitelist
///
/// Validates the range up front so a typo cannot silently lock the admin
/// out during the next maintenance window.
pub async fn post_whitelist_entry(
    State(state): State<ServerState>,
    Json(body): Json<WhitelistRequest>,
) -> Response {
    if let Err(e) = body.ip_address.parse::<Cidr>() {
        return bad_request(format!("invalid CIDR range: {e}"));
    }
    let entry = IpWhitelistEntry {
        id: uuid::Uuid::new_v4().to_string(),
        ip_address: body.ip_address.trim().to_string(),
        description: body.description.trim().to_string(),
        is_active: true,
        created_at: Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    };
    match state.store.insert_whitelist_entry(&entry).await {
        Ok(()) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Debug, Serialize)]
pub struct WhitelistListResponse {
    pub entries: Vec<IpWhitelistEntry>,
}

/// GET /v1/admin/whitelist
pub async fn get_whitelist(State(state): State<ServerState>) -> Response {
    match state.store.read_active_whitelist_entries().await {
        Ok(entries) => Json(WhitelistListResponse { entries }).into_response(),
        Err(e) => internal_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_local_times_convert_to_utc() {
        // 00:30 JST on March 2 is 15:30 UTC on March 1.
        assert_eq!(
            admin_local_to_utc("2026-03-02T00:30", 9).unwrap(),
            "2026-03-01T15:30:00.000Z"
        );
        assert_eq!(
            admin_local_to_utc("2026-03-01T12:00", 0).unwrap(),
            "2026-03-01T12:00:00.000Z"
        );
        assert_eq!(
            admin_local_to_utc("2026-03-01T01:00", -5).unwrap(),
            "2026-03-01T06:00:00.000Z"
        );
    }

    #[test]
    fn seconds_are_accepted_and_garbage_rejected() {
        assert!(admin_local_to_utc("2026-03-01T12:00:30", 9).is_ok());
        assert!(admin_local_to_utc("yesterday", 9).is_err());
        assert!(admin_local_to_utc("2026-03-01", 9).is_err());
    }
}
