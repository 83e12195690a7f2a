// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The maintenance gate: decides whether a request is blocked by an
//! active maintenance window, and whether the caller's IP bypasses it.
//!
//! Evaluation is fail-open on bad data but fail-closed on identity: a
//! schedule with an unparseable timestamp is skipped (it cannot block
//! anyone), a malformed whitelist entry is skipped (it cannot admit
//! anyone), and a caller with no usable IP address gets no bypass.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dogrun_core::types::MaintenanceSchedule;
use dogrun_core::{DogrunError, RecordStore};
use tracing::{debug, warn};

use crate::cidr::Cidr;

/// What the gate decided for one request.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    pub blocked: bool,
    /// The schedule in effect, present whenever a window is live even if
    /// the caller is whitelisted through it.
    pub schedule: Option<MaintenanceSchedule>,
    pub whitelisted: bool,
}

impl AccessDecision {
    fn open() -> Self {
        Self {
            blocked: false,
            schedule: None,
            whitelisted: false,
        }
    }
}

/// True when `now` falls inside the schedule's window. A missing bound is
/// open-ended on that side; an unparseable bound disables the schedule.
fn window_contains(schedule: &MaintenanceSchedule, now: DateTime<Utc>) -> bool {
    let parse = |raw: &str| -> Option<DateTime<Utc>> {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                warn!(schedule_id = %schedule.id, raw, error = %e, "unparseable window bound, skipping schedule");
                None
            }
        }
    };

    if let Some(start) = schedule.start_time.as_deref() {
        match parse(start) {
            Some(start) if start <= now => {}
            _ => return false,
        }
    }
    if let Some(end) = schedule.end_time.as_deref() {
        match parse(end) {
            Some(end) if now <= end => {}
            _ => return false,
        }
    }
    true
}

pub struct MaintenanceGate {
    store: Arc<dyn RecordStore>,
}

impl MaintenanceGate {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Evaluate the gate for a caller at `now`.
    pub async fn evaluate(
        &self,
        client_ip: Option<IpAddr>,
        now: DateTime<Utc>,
    ) -> Result<AccessDecision, DogrunError> {
        let schedules = self.store.read_active_maintenance_schedules().await?;
        let Some(schedule) = schedules.into_iter().find(|s| window_contains(s, now)) else {
            return Ok(AccessDecision::open());
        };

        let whitelisted = match client_ip {
            Some(ip) => self.is_whitelisted(ip).await?,
            None => false,
        };
        debug!(schedule_id = %schedule.id, ?client_ip, whitelisted, "maintenance window in effect");

        Ok(AccessDecision {
            blocked: !whitelisted,
            schedule: Some(schedule),
            whitelisted,
        })
    }

    /// True when the address matches any active whitelist range.
    async fn is_whitelisted(&self, ip: IpAddr) -> Result<bool, DogrunError> {
        let entries = self.store.read_active_whitelist_entries().await?;
        for entry in entries {
            match entry.ip_address.parse::<Cidr>() {
                Ok(range) => {
                    if range.contains(ip) {
                        return Ok(true);
                    }
                }
                Err(e) => {
                    warn!(entry_id = %entry.id, raw = %entry.ip_address, error = %e, "skipping malformed whitelist entry");
                }
            }
        }
        Ok(false)
    }
}
