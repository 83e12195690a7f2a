// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across store traits and the dogrun engines.
//!
//! Timestamps are RFC 3339 UTC strings throughout, matching what the record
//! store persists. Status fields are closed enums stored as snake_case TEXT.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a facility listing.
///
/// Transitions happen only through the approval engine. `Approved` and
/// `Rejected` are terminal for the engine; `FirstStagePassed` and
/// `SecondStageWaiting` are owner-action states where the admin side has
/// nothing to approve yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FacilityStatus {
    Pending,
    FirstStagePassed,
    SecondStageWaiting,
    SecondStageReview,
    SmartLockTesting,
    Approved,
    Rejected,
}

impl FacilityStatus {
    /// Terminal states never leave the engine again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Per-image review state.
///
/// New uploads start `Pending`; an image never transitions back to
/// `Pending` automatically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ImageApproval {
    Pending,
    Approved,
    Rejected,
}

/// Vaccine certification status. Decided exactly once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CertStatus {
    Pending,
    Approved,
    Rejected,
}

/// A dog-park facility listing subject to multi-stage approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub status: FacilityStatus,
    /// Opaque JSON blob (capacity, pricing, amenities). The engine never
    /// looks inside.
    pub metadata: Option<String>,
    pub approved_at: Option<String>,
    pub created_at: String,
}

/// Auxiliary record tracking first-stage pass/reject timestamps for a
/// facility. One row per facility; each decision overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStage {
    pub facility_id: String,
    pub first_stage_passed_at: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
}

/// The fields a decision writes into a facility's review stage.
#[derive(Debug, Clone, Default)]
pub struct ReviewStageUpdate {
    pub first_stage_passed_at: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
}

/// An owner-submitted facility image awaiting per-image review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityImage {
    pub id: String,
    pub facility_id: String,
    /// Category tag from a closed set (entrance, fence, rest area, ...).
    pub image_type: String,
    pub approval: ImageApproval,
    /// Present only while the image is rejected; cleared on (re)approval.
    pub admin_note: Option<String>,
    pub created_at: String,
}

/// A registered dog. Vaccine certifications hang off dogs, and decision
/// notifications reach the owner through this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dog {
    pub id: String,
    pub owner_id: String,
    pub name: String,
}

/// A vaccine certification with two independent document slots.
///
/// While `temp_storage` is true the image paths point at the temporary
/// upload area; once a decision is made both slots are cleared and
/// `temp_storage` goes false regardless of the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineCertification {
    pub id: String,
    pub dog_id: String,
    pub dog_name: String,
    pub owner_id: String,
    pub status: CertStatus,
    pub rabies_image: Option<String>,
    pub combo_image: Option<String>,
    pub rabies_expiry: Option<String>,
    pub combo_expiry: Option<String>,
    pub temp_storage: bool,
    pub approved_at: Option<String>,
    pub created_at: String,
}

/// A persisted user notification. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    /// Opaque JSON payload referencing the decided entity.
    pub data: Option<String>,
    pub read: bool,
    pub created_at: String,
}

/// Fields for a new notification; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: Option<String>,
}

/// An admin-managed maintenance window. The active flag and the optional
/// time bounds together determine effect at evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub id: String,
    pub title: String,
    pub message: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: bool,
    pub is_emergency: bool,
    pub created_at: String,
}

/// A whitelisted address range that bypasses maintenance blocking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpWhitelistEntry {
    pub id: String,
    /// CIDR notation; a bare address means a host-length prefix.
    pub ip_address: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: String,
}

/// The caller identity passed into every engine operation.
///
/// Authorization is an explicit capability check, never an ambient lookup.
#[derive(Debug, Clone)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<Role>,
}

impl Principal {
    /// An administrator principal.
    pub fn admin(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            roles: vec![Role::Admin],
        }
    }

    /// A facility/dog owner principal.
    pub fn owner(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            roles: vec![Role::Owner],
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Roles a principal may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Owner,
}

/// The result contract every engine operation returns to its surface.
///
/// Business-rule failures are values, not errors; the surface only renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub success: bool,
    pub message: String,
}

impl DecisionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn facility_status_round_trips_as_snake_case() {
        let variants = [
            FacilityStatus::Pending,
            FacilityStatus::FirstStagePassed,
            FacilityStatus::SecondStageWaiting,
            FacilityStatus::SecondStageReview,
            FacilityStatus::SmartLockTesting,
            FacilityStatus::Approved,
            FacilityStatus::Rejected,
        ];
        for variant in variants {
            let s = variant.to_string();
            assert_eq!(s, s.to_lowercase());
            assert_eq!(FacilityStatus::from_str(&s).unwrap(), variant);
        }
        assert_eq!(
            FacilityStatus::FirstStagePassed.to_string(),
            "first_stage_passed"
        );
    }

    #[test]
    fn terminal_statuses() {
        assert!(FacilityStatus::Approved.is_terminal());
        assert!(FacilityStatus::Rejected.is_terminal());
        assert!(!FacilityStatus::Pending.is_terminal());
        assert!(!FacilityStatus::SmartLockTesting.is_terminal());
    }

    #[test]
    fn principal_role_checks() {
        let admin = Principal::admin("alice@example.com");
        assert!(admin.has_role(Role::Admin));
        assert!(!admin.has_role(Role::Owner));

        let owner = Principal::owner("user-1");
        assert!(owner.has_role(Role::Owner));
        assert!(!owner.has_role(Role::Admin));
    }

    #[test]
    fn decision_outcome_serializes_to_ui_contract() {
        let outcome = DecisionOutcome::ok("facility approved");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("facility approved"));
    }
}
