// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The approval engine: every admin decision on facilities, facility
//! images, and vaccine certifications goes through here.
//!
//! Public operations return [`DecisionOutcome`], never `Err`: business-rule
//! failures (wrong status, unresolved images, missing privileges) are
//! values the surface renders verbatim, while infrastructure failures are
//! logged and collapsed into a generic failure message. The internal
//! helpers use `Result` so `?` still works against the stores.
//!
//! Writes within a decision are sequential, not transactional: status
//! first, then the review stage, then the notification. A notification
//! write failure fails the whole operation even though the status already
//! changed; the notification table is the audit trail, so that failure
//! must be visible.

use std::sync::Arc;

use chrono::Utc;
use dogrun_core::types::{DecisionOutcome, FacilityStatus, ImageApproval, ReviewStageUpdate};
use dogrun_core::{CertStatus, DogrunError, ObjectStore, Principal, RecordStore, Role};
use dogrun_notify::{DecisionEvent, NotificationDispatcher};
use tracing::{error, info, warn};

use crate::gate;

/// Bucket holding temporarily stored vaccine document uploads.
const VACCINE_BUCKET: &str = "vaccine-certs";

fn now_rfc3339() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Where an approval takes a facility from its current status, and whether
/// that step is the final one.
///
/// `FirstStagePassed` and `SecondStageWaiting` are owner-action states: the
/// admin has nothing to approve until the owner moves things forward, so an
/// approval there is a caller error, not a no-op.
fn next_on_approve(status: FacilityStatus) -> Result<(FacilityStatus, bool), String> {
    match status {
        FacilityStatus::Pending => Ok((FacilityStatus::FirstStagePassed, false)),
        FacilityStatus::SecondStageReview => Ok((FacilityStatus::SmartLockTesting, false)),
        FacilityStatus::SmartLockTesting => Ok((FacilityStatus::Approved, true)),
        FacilityStatus::FirstStagePassed => Err(
            "the facility is waiting for the owner to schedule the on-site inspection".to_string(),
        ),
        FacilityStatus::SecondStageWaiting => Err(
            "the facility is waiting for the owner to complete inspection preparation".to_string(),
        ),
        FacilityStatus::Approved => Err("the facility is already approved".to_string()),
        FacilityStatus::Rejected => {
            Err("the facility application has already been rejected".to_string())
        }
    }
}

pub struct ApprovalEngine {
    store: Arc<dyn RecordStore>,
    objects: Arc<dyn ObjectStore>,
    dispatcher: NotificationDispatcher,
}

impl ApprovalEngine {
    pub fn new(store: Arc<dyn RecordStore>, objects: Arc<dyn ObjectStore>) -> Self {
        let dispatcher = NotificationDispatcher::new(Arc::clone(&store));
        Self {
            store,
            objects,
            dispatcher,
        }
    }

    fn require_admin(principal: &Principal) -> Result<(), DecisionOutcome> {
        if principal.has_role(Role::Admin) {
            Ok(())
        } else {
            warn!(subject = %principal.subject, "non-admin attempted a decision");
            Err(DecisionOutcome::fail(
                "administrator privileges are required",
            ))
        }
    }

    fn render_outcome(result: Result<DecisionOutcome, DogrunError>) -> DecisionOutcome {
        match result {
            Ok(outcome) => outcome,
            Err(DogrunError::Validation(message)) => DecisionOutcome::fail(message),
            Err(DogrunError::NotFound { entity, id }) => {
                DecisionOutcome::fail(format!("{entity} {id} was not found"))
            }
            Err(err) => {
                error!(error = %err, "decision failed on infrastructure");
                DecisionOutcome::fail("an internal error occurred; the decision was not completed")
            }
        }
    }

    /// Approve or reject a facility at its current stage.
    pub async fn decide_facility(
        &self,
        principal: &Principal,
        facility_id: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> DecisionOutcome {
        if let Err(outcome) = Self::require_admin(principal) {
            return outcome;
        }
        let result = if approve {
            self.approve_facility(facility_id).await
        } else {
            self.reject_facility(facility_id, reason).await
        };
        Self::render_outcome(result)
    }

    async fn approve_facility(&self, facility_id: &str) -> Result<DecisionOutcome, DogrunError> {
        let facility = self
            .store
            .read_facility(facility_id)
            .await?
            .ok_or_else(|| DogrunError::not_found("facility", facility_id))?;

        let (next, is_final) =
            next_on_approve(facility.status).map_err(DogrunError::Validation)?;

        // Every approval step is gated on the image set.
        let images = self.store.read_images_for_facility(facility_id).await?;
        if !gate::is_fully_approved(&images) {
            let unresolved = gate::unresolved_count(&images);
            return Err(DogrunError::Validation(if images.is_empty() {
                "the facility has no reviewed images yet".to_string()
            } else {
                format!("{unresolved} facility image(s) are still awaiting approval")
            }));
        }

        let now = now_rfc3339();
        let approved_at = is_final.then(|| now.as_str());
        self.store
            .write_facility_status(facility_id, next, approved_at)
            .await?;

        if next == FacilityStatus::FirstStagePassed {
            self.store
                .upsert_review_stage(
                    facility_id,
                    &ReviewStageUpdate {
                        first_stage_passed_at: Some(now.clone()),
                        ..Default::default()
                    },
                )
                .await?;
        }

        let event = match next {
            FacilityStatus::FirstStagePassed => DecisionEvent::FacilityFirstStagePassed {
                owner_id: &facility.owner_id,
                facility_id: &facility.id,
                facility_name: &facility.name,
            },
            FacilityStatus::SmartLockTesting => DecisionEvent::FacilitySmartLockTesting {
                owner_id: &facility.owner_id,
                facility_id: &facility.id,
                facility_name: &facility.name,
            },
            _ => DecisionEvent::FacilityApproved {
                owner_id: &facility.owner_id,
                facility_id: &facility.id,
                facility_name: &facility.name,
            },
        };
        self.dispatcher.dispatch(&event).await?;

        info!(facility_id, from = %facility.status, to = %next, "facility approval step");
        Ok(DecisionOutcome::ok(match next {
            FacilityStatus::FirstStagePassed => "document screening passed",
            FacilityStatus::SmartLockTesting => "inspection passed; smart lock testing started",
            _ => "facility approved",
        }))
    }

    async fn reject_facility(
        &self,
        facility_id: &str,
        reason: Option<&str>,
    ) -> Result<DecisionOutcome, DogrunError> {
        let facility = self
            .store
            .read_facility(facility_id)
            .await?
            .ok_or_else(|| DogrunError::not_found("facility", facility_id))?;

        if facility.status.is_terminal() {
            return Err(DogrunError::Validation(format!(
                "the facility is already {} and cannot be rejected",
                facility.status
            )));
        }

        let reason = gate::normalize_note(reason);
        let now = now_rfc3339();
        self.store
            .write_facility_status(facility_id, FacilityStatus::Rejected, None)
            .await?;
        self.store
            .upsert_review_stage(
                facility_id,
                &ReviewStageUpdate {
                    rejected_at: Some(now),
                    rejection_reason: reason.clone(),
                    ..Default::default()
                },
            )
            .await?;

        self.dispatcher
            .dispatch(&DecisionEvent::FacilityRejected {
                owner_id: &facility.owner_id,
                facility_id: &facility.id,
                facility_name: &facility.name,
                reason: reason.as_deref(),
            })
            .await?;

        info!(facility_id, from = %facility.status, "facility rejected");
        Ok(DecisionOutcome::ok("facility application rejected"))
    }

    /// Approve or reject a single facility image.
    pub async fn decide_image(
        &self,
        principal: &Principal,
        image_id: &str,
        approve: bool,
        note: Option<&str>,
    ) -> DecisionOutcome {
        if let Err(outcome) = Self::require_admin(principal) {
            return outcome;
        }
        let result = self.decide_image_inner(image_id, approve, note).await;
        Self::render_outcome(result)
    }

    async fn decide_image_inner(
        &self,
        image_id: &str,
        approve: bool,
        note: Option<&str>,
    ) -> Result<DecisionOutcome, DogrunError> {
        let image = self
            .store
            .read_image(image_id)
            .await?
            .ok_or_else(|| DogrunError::not_found("image", image_id))?;

        // Approval clears any earlier rejection note; rejection stores the
        // trimmed note, if any.
        let (approval, note) = if approve {
            (ImageApproval::Approved, None)
        } else {
            (ImageApproval::Rejected, gate::normalize_note(note))
        };
        self.store
            .write_image_approval(image_id, approval, note.as_deref())
            .await?;

        info!(image_id, facility_id = %image.facility_id, %approval, "image reviewed");
        Ok(DecisionOutcome::ok(if approve {
            "image approved"
        } else {
            "image rejected"
        }))
    }

    /// Approve or reject a pending vaccine certification.
    ///
    /// Regardless of the outcome, the temporarily stored document images
    /// are purged from the object store and the record's slots cleared.
    pub async fn decide_vaccine(
        &self,
        principal: &Principal,
        certification_id: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> DecisionOutcome {
        if let Err(outcome) = Self::require_admin(principal) {
            return outcome;
        }
        let result = self
            .decide_vaccine_inner(certification_id, approve, reason)
            .await;
        Self::render_outcome(result)
    }

    async fn decide_vaccine_inner(
        &self,
        certification_id: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<DecisionOutcome, DogrunError> {
        let cert = self
            .store
            .read_vaccine_cert(certification_id)
            .await?
            .ok_or_else(|| DogrunError::not_found("certification", certification_id))?;

        if cert.status != CertStatus::Pending {
            return Err(DogrunError::Validation(format!(
                "the certification has already been decided ({})",
                cert.status
            )));
        }

        let (status, approved_at) = if approve {
            (CertStatus::Approved, Some(now_rfc3339()))
        } else {
            (CertStatus::Rejected, None)
        };
        self.store
            .write_vaccine_decision(certification_id, status, approved_at.as_deref())
            .await?;

        // Temporary uploads are purged on both outcomes; an approved
        // certification keeps only its metadata, a rejected one must be
        // resubmitted from scratch.
        let paths: Vec<String> = [cert.rabies_image.clone(), cert.combo_image.clone()]
            .into_iter()
            .flatten()
            .collect();
        if !paths.is_empty() {
            self.objects.delete_objects(VACCINE_BUCKET, &paths).await?;
        }
        self.store.clear_vaccine_images(certification_id).await?;

        let reason = gate::normalize_note(reason);
        let event = if approve {
            DecisionEvent::VaccineApproved {
                owner_id: &cert.owner_id,
                certification_id: &cert.id,
                dog_name: &cert.dog_name,
            }
        } else {
            DecisionEvent::VaccineRejected {
                owner_id: &cert.owner_id,
                certification_id: &cert.id,
                dog_name: &cert.dog_name,
                reason: reason.as_deref(),
            }
        };
        self.dispatcher.dispatch(&event).await?;

        info!(certification_id, %status, "vaccine certification decided");
        Ok(DecisionOutcome::ok(if approve {
            "vaccine certification approved"
        } else {
            "vaccine certification rejected"
        }))
    }

    /// Correct the expiry dates on a certification. Does not change its
    /// status and sends no notification.
    pub async fn update_vaccine_expiry(
        &self,
        principal: &Principal,
        certification_id: &str,
        rabies_expiry: Option<&str>,
        combo_expiry: Option<&str>,
    ) -> DecisionOutcome {
        if let Err(outcome) = Self::require_admin(principal) {
            return outcome;
        }
        let result = async {
            if rabies_expiry.is_none() && combo_expiry.is_none() {
                return Err(DogrunError::Validation(
                    "at least one expiry date must be provided".to_string(),
                ));
            }
            self.store
                .read_vaccine_cert(certification_id)
                .await?
                .ok_or_else(|| DogrunError::not_found("certification", certification_id))?;
            self.store
                .write_vaccine_expiry(certification_id, rabies_expiry, combo_expiry)
                .await?;
            Ok(DecisionOutcome::ok("expiry dates updated"))
        }
        .await;
        Self::render_outcome(result)
    }

    /// Remove a facility together with its images and review stage.
    pub async fn delete_facility(
        &self,
        principal: &Principal,
        facility_id: &str,
    ) -> DecisionOutcome {
        if let Err(outcome) = Self::require_admin(principal) {
            return outcome;
        }
        let result = async {
            self.store
                .read_facility(facility_id)
                .await?
                .ok_or_else(|| DogrunError::not_found("facility", facility_id))?;
            self.store.delete_facility_cascade(facility_id).await?;
            info!(facility_id, "facility deleted");
            Ok(DecisionOutcome::ok("facility deleted"))
        }
        .await;
        Self::render_outcome(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_transitions_follow_the_stage_ladder() {
        assert_eq!(
            next_on_approve(FacilityStatus::Pending).unwrap(),
            (FacilityStatus::FirstStagePassed, false)
        );
        assert_eq!(
            next_on_approve(FacilityStatus::SecondStageReview).unwrap(),
            (FacilityStatus::SmartLockTesting, false)
        );
        assert_eq!(
            next_on_approve(FacilityStatus::SmartLockTesting).unwrap(),
            (FacilityStatus::Approved, true)
        );
    }

    #[test]
    fn owner_action_and_terminal_states_refuse_approval() {
        for status in [
            FacilityStatus::FirstStagePassed,
            FacilityStatus::SecondStageWaiting,
            FacilityStatus::Approved,
            FacilityStatus::Rejected,
        ] {
            assert!(next_on_approve(status).is_err(), "{status} should refuse");
        }
    }
}
