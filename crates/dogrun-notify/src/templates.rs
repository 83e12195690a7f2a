// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification content, one template per decision event.
//!
//! Templates are pure: they turn an event into the fields of a new
//! notification and never touch storage. Rejections carry the admin's
//! reason when one was given; otherwise the owner is pointed at their
//! dashboard.

use dogrun_core::types::NewNotification;

/// A decision the dispatcher turns into an owner notification.
#[derive(Debug, Clone)]
pub enum DecisionEvent<'a> {
    /// Document screening passed; the owner may now schedule an inspection.
    FacilityFirstStagePassed {
        owner_id: &'a str,
        facility_id: &'a str,
        facility_name: &'a str,
    },
    /// On-site inspection passed; smart lock installation and testing begins.
    FacilitySmartLockTesting {
        owner_id: &'a str,
        facility_id: &'a str,
        facility_name: &'a str,
    },
    /// Final approval; the listing is live.
    FacilityApproved {
        owner_id: &'a str,
        facility_id: &'a str,
        facility_name: &'a str,
    },
    FacilityRejected {
        owner_id: &'a str,
        facility_id: &'a str,
        facility_name: &'a str,
        reason: Option<&'a str>,
    },
    VaccineApproved {
        owner_id: &'a str,
        certification_id: &'a str,
        dog_name: &'a str,
    },
    VaccineRejected {
        owner_id: &'a str,
        certification_id: &'a str,
        dog_name: &'a str,
        reason: Option<&'a str>,
    },
}

const KIND_FACILITY: &str = "facility_approval";
const KIND_VACCINE: &str = "vaccine_approval";

fn reason_sentence(reason: Option<&str>) -> String {
    match reason {
        Some(r) if !r.trim().is_empty() => format!(" Reason: {}", r.trim()),
        _ => " Please check your dashboard for details.".to_string(),
    }
}

fn facility_data(facility_id: &str) -> Option<String> {
    Some(serde_json::json!({ "facility_id": facility_id }).to_string())
}

fn vaccine_data(certification_id: &str) -> Option<String> {
    Some(serde_json::json!({ "certification_id": certification_id }).to_string())
}

/// Render an event into the notification the store should persist.
pub fn render(event: &DecisionEvent<'_>) -> NewNotification {
    match *event {
        DecisionEvent::FacilityFirstStagePassed {
            owner_id,
            facility_id,
            facility_name,
        } => NewNotification {
            user_id: owner_id.to_string(),
            kind: KIND_FACILITY.to_string(),
            title: "Document screening passed".to_string(),
            message: format!(
                "{facility_name} has passed document screening. \
                 Please schedule the on-site inspection from your dashboard."
            ),
            data: facility_data(facility_id),
        },
        DecisionEvent::FacilitySmartLockTesting {
            owner_id,
            facility_id,
            facility_name,
        } => NewNotification {
            user_id: owner_id.to_string(),
            kind: KIND_FACILITY.to_string(),
            title: "Inspection passed".to_string(),
            message: format!(
                "{facility_name} has passed the on-site inspection. \
                 Smart lock installation and testing is underway."
            ),
            data: facility_data(facility_id),
        },
        DecisionEvent::FacilityApproved {
            owner_id,
            facility_id,
            facility_name,
        } => NewNotification {
            user_id: owner_id.to_string(),
            kind: KIND_FACILITY.to_string(),
            title: "Facility approved".to_string(),
            message: format!("{facility_name} has been approved and is now open for bookings."),
            data: facility_data(facility_id),
        },
        DecisionEvent::FacilityRejected {
            owner_id,
            facility_id,
            facility_name,
            reason,
        } => NewNotification {
            user_id: owner_id.to_string(),
            kind: KIND_FACILITY.to_string(),
            title: "Facility application rejected".to_string(),
            message: format!(
                "The application for {facility_name} was not approved.{}",
                reason_sentence(reason)
            ),
            data: facility_data(facility_id),
        },
        DecisionEvent::VaccineApproved {
            owner_id,
            certification_id,
            dog_name,
        } => NewNotification {
            user_id: owner_id.to_string(),
            kind: KIND_VACCINE.to_string(),
            title: "Vaccine certification approved".to_string(),
            message: format!("{dog_name}'s vaccine certification has been approved."),
            data: vaccine_data(certification_id),
        },
        DecisionEvent::VaccineRejected {
            owner_id,
            certification_id,
            dog_name,
            reason,
        } => NewNotification {
            user_id: owner_id.to_string(),
            kind: KIND_VACCINE.to_string(),
            title: "Vaccine certification rejected".to_string(),
            message: format!(
                "{dog_name}'s vaccine certification was not approved.{}",
                reason_sentence(reason)
            ),
            data: vaccine_data(certification_id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_includes_reason_when_given() {
        let n = render(&DecisionEvent::FacilityRejected {
            owner_id: "owner-1",
            facility_id: "f-1",
            facility_name: "Shibuya Dog Run",
            reason: Some("fence height insufficient"),
        });
        assert!(n.message.contains("Reason: fence height insufficient"));
        assert_eq!(n.kind, "facility_approval");
    }

    #[test]
    fn rejection_without_reason_points_at_dashboard() {
        let n = render(&DecisionEvent::VaccineRejected {
            owner_id: "owner-1",
            certification_id: "cert-1",
            dog_name: "Hachi",
            reason: None,
        });
        assert!(n.message.contains("check your dashboard"));
        assert!(!n.message.contains("Reason:"));
    }

    #[test]
    fn blank_reason_is_treated_as_absent() {
        let n = render(&DecisionEvent::VaccineRejected {
            owner_id: "owner-1",
            certification_id: "cert-1",
            dog_name: "Hachi",
            reason: Some("   "),
        });
        assert!(n.message.contains("check your dashboard"));
    }

    #[test]
    fn approval_payload_references_the_entity() {
        let n = render(&DecisionEvent::FacilityApproved {
            owner_id: "owner-1",
            facility_id: "f-1",
            facility_name: "Shibuya Dog Run",
        });
        let data: serde_json::Value = serde_json::from_str(n.data.as_deref().unwrap()).unwrap();
        assert_eq!(data["facility_id"], "f-1");
        assert_eq!(n.user_id, "owner-1");
    }
}
