// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`RecordStore`] implementation backed by the SQLite database.
//!
//! A thin adapter: every method delegates to the matching free function in
//! [`crate::queries`]. Keeping the SQL out of the trait impl keeps each
//! query independently testable.

use async_trait::async_trait;
use dogrun_core::{DogrunError, RecordStore};
use dogrun_core::types::{
    CertStatus, Dog, Facility, FacilityImage, FacilityStatus, ImageApproval, IpWhitelistEntry,
    MaintenanceSchedule, NewNotification, Notification, ReviewStage, ReviewStageUpdate,
    VaccineCertification,
};
use dogrun_config::StorageConfig;

use crate::database::Database;
use crate::queries;

/// SQLite-backed record store.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the database named by `config`, running migrations eagerly so a
    /// misconfigured path fails at startup, not on first request.
    pub async fn open(config: &StorageConfig) -> Result<Self, DogrunError> {
        let db = Database::open_with_options(&config.database_path, config.wal_mode).await?;
        Ok(Self { db })
    }

    /// Open against an explicit path. Test fixtures use this.
    pub async fn open_path(path: impl AsRef<std::path::Path>) -> Result<Self, DogrunError> {
        let db = Database::open(path).await?;
        Ok(Self { db })
    }

    /// Cheap liveness probe against the live connection.
    pub async fn health_check(&self) -> Result<(), DogrunError> {
        self.db
            .connection()
            .call(|conn| {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    pub async fn close(&self) -> Result<(), DogrunError> {
        self.db.close().await
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert_facility(&self, facility: &Facility) -> Result<(), DogrunError> {
        queries::facilities::insert_facility(&self.db, facility).await
    }

    async fn read_facility(&self, id: &str) -> Result<Option<Facility>, DogrunError> {
        queries::facilities::read_facility(&self.db, id).await
    }

    async fn list_facilities(
        &self,
        status: Option<FacilityStatus>,
    ) -> Result<Vec<Facility>, DogrunError> {
        queries::facilities::list_facilities(&self.db, status).await
    }

    async fn write_facility_status(
        &self,
        id: &str,
        status: FacilityStatus,
        approved_at: Option<&str>,
    ) -> Result<(), DogrunError> {
        queries::facilities::write_facility_status(&self.db, id, status, approved_at).await
    }

    async fn delete_facility_cascade(&self, id: &str) -> Result<(), DogrunError> {
        queries::facilities::delete_facility_cascade(&self.db, id).await
    }

    async fn upsert_review_stage(
        &self,
        facility_id: &str,
        update: &ReviewStageUpdate,
    ) -> Result<(), DogrunError> {
        queries::facilities::upsert_review_stage(&self.db, facility_id, update).await
    }

    async fn read_review_stage(
        &self,
        facility_id: &str,
    ) -> Result<Option<ReviewStage>, DogrunError> {
        queries::facilities::read_review_stage(&self.db, facility_id).await
    }

    async fn insert_facility_image(&self, image: &FacilityImage) -> Result<(), DogrunError> {
        queries::images::insert_facility_image(&self.db, image).await
    }

    async fn read_image(&self, id: &str) -> Result<Option<FacilityImage>, DogrunError> {
        queries::images::read_image(&self.db, id).await
    }

    async fn read_images_for_facility(
        &self,
        facility_id: &str,
    ) -> Result<Vec<FacilityImage>, DogrunError> {
        queries::images::read_images_for_facility(&self.db, facility_id).await
    }

    async fn write_image_approval(
        &self,
        image_id: &str,
        approval: ImageApproval,
        note: Option<&str>,
    ) -> Result<(), DogrunError> {
        queries::images::write_image_approval(&self.db, image_id, approval, note).await
    }

    async fn insert_dog(&self, dog: &Dog) -> Result<(), DogrunError> {
        queries::vaccines::insert_dog(&self.db, dog).await
    }

    async fn insert_vaccine_cert(&self, cert: &VaccineCertification) -> Result<(), DogrunError> {
        queries::vaccines::insert_vaccine_cert(&self.db, cert).await
    }

    async fn read_vaccine_cert(
        &self,
        id: &str,
    ) -> Result<Option<VaccineCertification>, DogrunError> {
        queries::vaccines::read_vaccine_cert(&self.db, id).await
    }

    async fn write_vaccine_decision(
        &self,
        id: &str,
        status: CertStatus,
        approved_at: Option<&str>,
    ) -> Result<(), DogrunError> {
        queries::vaccines::write_vaccine_decision(&self.db, id, status, approved_at).await
    }

    async fn clear_vaccine_images(&self, id: &str) -> Result<(), DogrunError> {
        queries::vaccines::clear_vaccine_images(&self.db, id).await
    }

    async fn write_vaccine_expiry(
        &self,
        id: &str,
        rabies_expiry: Option<&str>,
        combo_expiry: Option<&str>,
    ) -> Result<(), DogrunError> {
        queries::vaccines::write_vaccine_expiry(&self.db, id, rabies_expiry, combo_expiry).await
    }

    async fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<(), DogrunError> {
        queries::notifications::insert_notification(&self.db, notification).await
    }

    async fn read_notifications_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, DogrunError> {
        queries::notifications::read_notifications_for_user(&self.db, user_id).await
    }

    async fn insert_maintenance_schedule(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> Result<(), DogrunError> {
        queries::maintenance::insert_maintenance_schedule(&self.db, schedule).await
    }

    async fn read_active_maintenance_schedules(
        &self,
    ) -> Result<Vec<MaintenanceSchedule>, DogrunError> {
        queries::maintenance::read_active_maintenance_schedules(&self.db).await
    }

    async fn deactivate_maintenance_schedule(
        &self,
        id: &str,
        ended_at: &str,
    ) -> Result<(), DogrunError> {
        queries::maintenance::deactivate_maintenance_schedule(&self.db, id, ended_at).await
    }

    async fn insert_whitelist_entry(&self, entry: &IpWhitelistEntry) -> Result<(), DogrunError> {
        queries::maintenance::insert_whitelist_entry(&self.db, entry).await
    }

    async fn read_active_whitelist_entries(
        &self,
    ) -> Result<Vec<IpWhitelistEntry>, DogrunError> {
        queries::maintenance::read_active_whitelist_entries(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_and_health_check() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open_path(dir.path().join("store.db"))
            .await
            .unwrap();
        store.health_check().await.unwrap();
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn trait_object_usable() {
        let dir = tempdir().unwrap();
        let store: std::sync::Arc<dyn RecordStore> = std::sync::Arc::new(
            SqliteStore::open_path(dir.path().join("store.db"))
                .await
                .unwrap(),
        );
        assert!(store.read_facility("missing").await.unwrap().is_none());
    }
}
