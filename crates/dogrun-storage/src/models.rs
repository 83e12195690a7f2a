// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `dogrun-core::types` for use across
//! the store trait boundary. This module re-exports them for convenience
//! within the storage crate.

pub use dogrun_core::types::{
    CertStatus, Dog, Facility, FacilityImage, FacilityStatus, ImageApproval, IpWhitelistEntry,
    MaintenanceSchedule, NewNotification, Notification, ReviewStage, ReviewStageUpdate,
    VaccineCertification,
};
