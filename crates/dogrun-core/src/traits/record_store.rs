// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait: the persistence seam for facilities, images,
//! certifications, notifications, and maintenance data.
//!
//! The store owns persistence, uniqueness, and timestamps. It makes no
//! business decisions: status transitions, gating, and template selection
//! all live in the engines. Calls are independent; there is no cross-call
//! transaction, and callers tolerate partial completion.

use async_trait::async_trait;

use crate::error::DogrunError;
use crate::types::{
    CertStatus, Dog, Facility, FacilityImage, FacilityStatus, ImageApproval, IpWhitelistEntry,
    MaintenanceSchedule, NewNotification, Notification, ReviewStage, ReviewStageUpdate,
    VaccineCertification,
};

/// Persistence backend for all dogrun entities.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    // --- Facilities ---

    async fn insert_facility(&self, facility: &Facility) -> Result<(), DogrunError>;

    async fn read_facility(&self, id: &str) -> Result<Option<Facility>, DogrunError>;

    /// List facilities, optionally filtered by status, newest first.
    async fn list_facilities(
        &self,
        status: Option<FacilityStatus>,
    ) -> Result<Vec<Facility>, DogrunError>;

    /// Write a new status; `approved_at` is stamped only on final approval.
    async fn write_facility_status(
        &self,
        id: &str,
        status: FacilityStatus,
        approved_at: Option<&str>,
    ) -> Result<(), DogrunError>;

    /// Remove a facility and every dependent record (images, review stage,
    /// notifications payloads excluded). The dependent tables are listed in
    /// exactly one place, inside the implementation.
    async fn delete_facility_cascade(&self, id: &str) -> Result<(), DogrunError>;

    // --- Review stages ---

    /// Create the facility's review stage row if absent, else update it
    /// with the non-None fields of `update`.
    async fn upsert_review_stage(
        &self,
        facility_id: &str,
        update: &ReviewStageUpdate,
    ) -> Result<(), DogrunError>;

    async fn read_review_stage(
        &self,
        facility_id: &str,
    ) -> Result<Option<ReviewStage>, DogrunError>;

    // --- Facility images ---

    async fn insert_facility_image(&self, image: &FacilityImage) -> Result<(), DogrunError>;

    async fn read_image(&self, id: &str) -> Result<Option<FacilityImage>, DogrunError>;

    async fn read_images_for_facility(
        &self,
        facility_id: &str,
    ) -> Result<Vec<FacilityImage>, DogrunError>;

    /// Set an image's approval state and admin note in one write.
    async fn write_image_approval(
        &self,
        image_id: &str,
        approval: ImageApproval,
        note: Option<&str>,
    ) -> Result<(), DogrunError>;

    // --- Dogs and vaccine certifications ---

    async fn insert_dog(&self, dog: &Dog) -> Result<(), DogrunError>;

    async fn insert_vaccine_cert(&self, cert: &VaccineCertification) -> Result<(), DogrunError>;

    /// Read a certification joined with its dog's name and owner.
    async fn read_vaccine_cert(
        &self,
        id: &str,
    ) -> Result<Option<VaccineCertification>, DogrunError>;

    async fn write_vaccine_decision(
        &self,
        id: &str,
        status: CertStatus,
        approved_at: Option<&str>,
    ) -> Result<(), DogrunError>;

    /// Null both document slots and drop the temp-storage flag.
    async fn clear_vaccine_images(&self, id: &str) -> Result<(), DogrunError>;

    /// Update either or both expiry dates; `None` leaves a slot untouched.
    async fn write_vaccine_expiry(
        &self,
        id: &str,
        rabies_expiry: Option<&str>,
        combo_expiry: Option<&str>,
    ) -> Result<(), DogrunError>;

    // --- Notifications ---

    async fn insert_notification(&self, notification: &NewNotification)
    -> Result<(), DogrunError>;

    async fn read_notifications_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, DogrunError>;

    // --- Maintenance schedules and IP whitelist ---

    async fn insert_maintenance_schedule(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> Result<(), DogrunError>;

    /// Schedules with the active flag set. Time-window evaluation is the
    /// maintenance gate's job, not the store's.
    async fn read_active_maintenance_schedules(
        &self,
    ) -> Result<Vec<MaintenanceSchedule>, DogrunError>;

    /// Clear the active flag and stamp the end time.
    async fn deactivate_maintenance_schedule(
        &self,
        id: &str,
        ended_at: &str,
    ) -> Result<(), DogrunError>;

    async fn insert_whitelist_entry(&self, entry: &IpWhitelistEntry) -> Result<(), DogrunError>;

    async fn read_active_whitelist_entries(&self)
    -> Result<Vec<IpWhitelistEntry>, DogrunError>;
}
