// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facility and review-stage CRUD operations.

use dogrun_core::DogrunError;
use dogrun_core::types::FacilityStatus;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Facility, ReviewStage, ReviewStageUpdate};
use crate::queries::parse_enum_col;

fn row_to_facility(row: &rusqlite::Row<'_>) -> Result<Facility, rusqlite::Error> {
    let status: String = row.get(4)?;
    Ok(Facility {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        status: parse_enum_col(4, &status)?,
        metadata: row.get(5)?,
        approved_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const FACILITY_COLS: &str =
    "id, owner_id, name, address, status, metadata, approved_at, created_at";

/// Insert a new facility listing.
pub async fn insert_facility(db: &Database, facility: &Facility) -> Result<(), DogrunError> {
    let facility = facility.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO facilities (id, owner_id, name, address, status, metadata, approved_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    facility.id,
                    facility.owner_id,
                    facility.name,
                    facility.address,
                    facility.status.to_string(),
                    facility.metadata,
                    facility.approved_at,
                    facility.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a facility by ID.
pub async fn read_facility(db: &Database, id: &str) -> Result<Option<Facility>, DogrunError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {FACILITY_COLS} FROM facilities WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_facility);
            match result {
                Ok(facility) => Ok(Some(facility)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List facilities, optionally filtered by status, newest first.
pub async fn list_facilities(
    db: &Database,
    status: Option<FacilityStatus>,
) -> Result<Vec<Facility>, DogrunError> {
    db.connection()
        .call(move |conn| {
            let mut facilities = Vec::new();
            match status {
                Some(status) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {FACILITY_COLS} FROM facilities
                         WHERE status = ?1 ORDER BY created_at DESC"
                    ))?;
                    let rows = stmt.query_map(params![status.to_string()], row_to_facility)?;
                    for row in rows {
                        facilities.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {FACILITY_COLS} FROM facilities ORDER BY created_at DESC"
                    ))?;
                    let rows = stmt.query_map([], row_to_facility)?;
                    for row in rows {
                        facilities.push(row?);
                    }
                }
            }
            Ok(facilities)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Write a facility's status; stamps `approved_at` only when provided.
pub async fn write_facility_status(
    db: &Database,
    id: &str,
    status: FacilityStatus,
    approved_at: Option<&str>,
) -> Result<(), DogrunError> {
    let id = id.to_string();
    let approved_at = approved_at.map(str::to_string);
    db.connection()
        .call(move |conn| {
            match approved_at {
                Some(ts) => conn.execute(
                    "UPDATE facilities SET status = ?1, approved_at = ?2 WHERE id = ?3",
                    params![status.to_string(), ts, id],
                )?,
                None => conn.execute(
                    "UPDATE facilities SET status = ?1 WHERE id = ?2",
                    params![status.to_string(), id],
                )?,
            };
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove a facility and every dependent record in one transaction.
///
/// This is the single place the dependent tables are listed; call sites
/// never repeat the sequence.
pub async fn delete_facility_cascade(db: &Database, id: &str) -> Result<(), DogrunError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM facility_images WHERE facility_id = ?1",
                params![id],
            )?;
            tx.execute(
                "DELETE FROM review_stages WHERE facility_id = ?1",
                params![id],
            )?;
            tx.execute("DELETE FROM facilities WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Create or update the facility's review stage row.
///
/// `None` fields keep their previous value, so an approval leaves an
/// earlier rejection's timestamp in place and vice versa. History is
/// overwritten, not appended.
pub async fn upsert_review_stage(
    db: &Database,
    facility_id: &str,
    update: &ReviewStageUpdate,
) -> Result<(), DogrunError> {
    let facility_id = facility_id.to_string();
    let update = update.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO review_stages (facility_id, first_stage_passed_at, rejected_at, rejection_reason)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(facility_id) DO UPDATE SET
                     first_stage_passed_at = COALESCE(excluded.first_stage_passed_at, first_stage_passed_at),
                     rejected_at = COALESCE(excluded.rejected_at, rejected_at),
                     rejection_reason = COALESCE(excluded.rejection_reason, rejection_reason)",
                params![
                    facility_id,
                    update.first_stage_passed_at,
                    update.rejected_at,
                    update.rejection_reason,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the review stage row for a facility, if one exists yet.
pub async fn read_review_stage(
    db: &Database,
    facility_id: &str,
) -> Result<Option<ReviewStage>, DogrunError> {
    let facility_id = facility_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT facility_id, first_stage_passed_at, rejected_at, rejection_reason
                 FROM review_stages WHERE facility_id = ?1",
            )?;
            let result = stmt.query_row(params![facility_id], |row| {
                Ok(ReviewStage {
                    facility_id: row.get(0)?,
                    first_stage_passed_at: row.get(1)?,
                    rejected_at: row.get(2)?,
                    rejection_reason: row.get(3)?,
                })
            });
            match result {
                Ok(stage) => Ok(Some(stage)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(&db_path).await.unwrap();
        (db, dir)
    }

    fn make_facility(id: &str) -> Facility {
        Facility {
            id: id.to_string(),
            owner_id: "owner-1".to_string(),
            name: "Shibuya Dog Run".to_string(),
            address: "1-2-3 Shibuya, Tokyo".to_string(),
            status: FacilityStatus::Pending,
            metadata: Some(r#"{"capacity":20}"#.to_string()),
            approved_at: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_read_facility_roundtrips() {
        let (db, _dir) = setup_db().await;
        insert_facility(&db, &make_facility("f-1")).await.unwrap();

        let facility = read_facility(&db, "f-1").await.unwrap().unwrap();
        assert_eq!(facility.name, "Shibuya Dog Run");
        assert_eq!(facility.status, FacilityStatus::Pending);
        assert_eq!(facility.metadata.as_deref(), Some(r#"{"capacity":20}"#));
        assert!(facility.approved_at.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn read_nonexistent_facility_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(read_facility(&db, "no-such").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_facilities_filters_by_status() {
        let (db, _dir) = setup_db().await;
        insert_facility(&db, &make_facility("f-1")).await.unwrap();
        let mut approved = make_facility("f-2");
        approved.status = FacilityStatus::Approved;
        insert_facility(&db, &approved).await.unwrap();

        let all = list_facilities(&db, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let pending = list_facilities(&db, Some(FacilityStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "f-1");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn status_write_stamps_approval_timestamp_only_when_given() {
        let (db, _dir) = setup_db().await;
        insert_facility(&db, &make_facility("f-1")).await.unwrap();

        write_facility_status(&db, "f-1", FacilityStatus::FirstStagePassed, None)
            .await
            .unwrap();
        let facility = read_facility(&db, "f-1").await.unwrap().unwrap();
        assert_eq!(facility.status, FacilityStatus::FirstStagePassed);
        assert!(facility.approved_at.is_none());

        write_facility_status(
            &db,
            "f-1",
            FacilityStatus::Approved,
            Some("2026-02-01T09:00:00.000Z"),
        )
        .await
        .unwrap();
        let facility = read_facility(&db, "f-1").await.unwrap().unwrap();
        assert_eq!(facility.status, FacilityStatus::Approved);
        assert_eq!(
            facility.approved_at.as_deref(),
            Some("2026-02-01T09:00:00.000Z")
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_review_stage_creates_then_merges() {
        let (db, _dir) = setup_db().await;
        insert_facility(&db, &make_facility("f-1")).await.unwrap();

        // First decision creates the row.
        upsert_review_stage(
            &db,
            "f-1",
            &ReviewStageUpdate {
                first_stage_passed_at: Some("2026-01-02T00:00:00.000Z".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // A later rejection keeps the pass timestamp.
        upsert_review_stage(
            &db,
            "f-1",
            &ReviewStageUpdate {
                rejected_at: Some("2026-01-03T00:00:00.000Z".to_string()),
                rejection_reason: Some("fence height insufficient".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stage = read_review_stage(&db, "f-1").await.unwrap().unwrap();
        assert_eq!(
            stage.first_stage_passed_at.as_deref(),
            Some("2026-01-02T00:00:00.000Z")
        );
        assert_eq!(stage.rejected_at.as_deref(), Some("2026-01-03T00:00:00.000Z"));
        assert_eq!(
            stage.rejection_reason.as_deref(),
            Some("fence height insufficient")
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn cascade_delete_removes_dependents() {
        let (db, _dir) = setup_db().await;
        insert_facility(&db, &make_facility("f-1")).await.unwrap();
        upsert_review_stage(
            &db,
            "f-1",
            &ReviewStageUpdate {
                rejected_at: Some("2026-01-03T00:00:00.000Z".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        crate::queries::images::insert_facility_image(
            &db,
            &crate::models::FacilityImage {
                id: "img-1".to_string(),
                facility_id: "f-1".to_string(),
                image_type: "entrance".to_string(),
                approval: dogrun_core::ImageApproval::Pending,
                admin_note: None,
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
            },
        )
        .await
        .unwrap();

        delete_facility_cascade(&db, "f-1").await.unwrap();

        assert!(read_facility(&db, "f-1").await.unwrap().is_none());
        assert!(read_review_stage(&db, "f-1").await.unwrap().is_none());
        let images = crate::queries::images::read_images_for_facility(&db, "f-1")
            .await
            .unwrap();
        assert!(images.is_empty());

        db.close().await.unwrap();
    }
}
