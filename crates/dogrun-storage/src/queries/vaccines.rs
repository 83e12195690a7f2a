// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dog and vaccine certification records.
//!
//! Certification reads join the dogs table so the engine gets the dog's
//! name and owner without a second round trip.

use dogrun_core::DogrunError;
use dogrun_core::types::CertStatus;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Dog, VaccineCertification};
use crate::queries::parse_enum_col;

pub async fn insert_dog(db: &Database, dog: &Dog) -> Result<(), DogrunError> {
    let dog = dog.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO dogs (id, owner_id, name) VALUES (?1, ?2, ?3)",
                params![dog.id, dog.owner_id, dog.name],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn insert_vaccine_cert(
    db: &Database,
    cert: &VaccineCertification,
) -> Result<(), DogrunError> {
    let cert = cert.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO vaccine_certifications
                 (id, dog_id, status, rabies_image, combo_image, rabies_expiry, combo_expiry,
                  temp_storage, approved_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    cert.id,
                    cert.dog_id,
                    cert.status.to_string(),
                    cert.rabies_image,
                    cert.combo_image,
                    cert.rabies_expiry,
                    cert.combo_expiry,
                    cert.temp_storage,
                    cert.approved_at,
                    cert.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Read a certification joined with its dog's name and owner.
pub async fn read_vaccine_cert(
    db: &Database,
    id: &str,
) -> Result<Option<VaccineCertification>, DogrunError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.dog_id, d.name, d.owner_id, c.status,
                        c.rabies_image, c.combo_image, c.rabies_expiry, c.combo_expiry,
                        c.temp_storage, c.approved_at, c.created_at
                 FROM vaccine_certifications c
                 JOIN dogs d ON d.id = c.dog_id
                 WHERE c.id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                let status: String = row.get(4)?;
                Ok(VaccineCertification {
                    id: row.get(0)?,
                    dog_id: row.get(1)?,
                    dog_name: row.get(2)?,
                    owner_id: row.get(3)?,
                    status: parse_enum_col(4, &status)?,
                    rabies_image: row.get(5)?,
                    combo_image: row.get(6)?,
                    rabies_expiry: row.get(7)?,
                    combo_expiry: row.get(8)?,
                    temp_storage: row.get(9)?,
                    approved_at: row.get(10)?,
                    created_at: row.get(11)?,
                })
            });
            match result {
                Ok(cert) => Ok(Some(cert)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn write_vaccine_decision(
    db: &Database,
    id: &str,
    status: CertStatus,
    approved_at: Option<&str>,
) -> Result<(), DogrunError> {
    let id = id.to_string();
    let approved_at = approved_at.map(str::to_string);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE vaccine_certifications SET status = ?1, approved_at = ?2 WHERE id = ?3",
                params![status.to_string(), approved_at, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Null both document slots and drop the temp-storage flag. Runs after the
/// object store purge on both approval and rejection.
pub async fn clear_vaccine_images(db: &Database, id: &str) -> Result<(), DogrunError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE vaccine_certifications
                 SET rabies_image = NULL, combo_image = NULL, temp_storage = 0
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update either or both expiry dates; a `None` slot keeps its value.
pub async fn write_vaccine_expiry(
    db: &Database,
    id: &str,
    rabies_expiry: Option<&str>,
    combo_expiry: Option<&str>,
) -> Result<(), DogrunError> {
    let id = id.to_string();
    let rabies_expiry = rabies_expiry.map(str::to_string);
    let combo_expiry = combo_expiry.map(str::to_string);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE vaccine_certifications
                 SET rabies_expiry = COALESCE(?1, rabies_expiry),
                     combo_expiry = COALESCE(?2, combo_expiry)
                 WHERE id = ?3",
                params![rabies_expiry, combo_expiry, id],
            )?;
            Ok(())
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
        let db = Database::open(&dir.path().join("test.db")).await.unwrap();
        insert_dog(
            &db,
            &Dog {
                id: "dog-1".to_string(),
                owner_id: "owner-1".to_string(),
                name: "Hachi".to_string(),
            },
        )
        .await
        .unwrap();
        (db, dir)
    }

    fn make_cert(id: &str) -> VaccineCertification {
        VaccineCertification {
            id: id.to_string(),
            dog_id: "dog-1".to_string(),
            dog_name: String::new(),
            owner_id: String::new(),
            status: CertStatus::Pending,
            rabies_image: Some("temp/dog-1/rabies.jpg".to_string()),
            combo_image: Some("temp/dog-1/combo.jpg".to_string()),
            rabies_expiry: None,
            combo_expiry: None,
            temp_storage: true,
            approved_at: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn read_joins_dog_name_and_owner() {
        let (db, _dir) = setup_db().await;
        insert_vaccine_cert(&db, &make_cert("cert-1")).await.unwrap();

        let cert = read_vaccine_cert(&db, "cert-1").await.unwrap().unwrap();
        assert_eq!(cert.dog_name, "Hachi");
        assert_eq!(cert.owner_id, "owner-1");
        assert_eq!(cert.status, CertStatus::Pending);
        assert!(cert.temp_storage);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn clear_images_nulls_slots_and_flag() {
        let (db, _dir) = setup_db().await;
        insert_vaccine_cert(&db, &make_cert("cert-1")).await.unwrap();

        clear_vaccine_images(&db, "cert-1").await.unwrap();

        let cert = read_vaccine_cert(&db, "cert-1").await.unwrap().unwrap();
        assert!(cert.rabies_image.is_none());
        assert!(cert.combo_image.is_none());
        assert!(!cert.temp_storage);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn decision_write_sets_status_and_timestamp() {
        let (db, _dir) = setup_db().await;
        insert_vaccine_cert(&db, &make_cert("cert-1")).await.unwrap();

        write_vaccine_decision(&db, "cert-1", CertStatus::Approved, Some("2026-02-01T00:00:00.000Z"))
            .await
            .unwrap();

        let cert = read_vaccine_cert(&db, "cert-1").await.unwrap().unwrap();
        assert_eq!(cert.status, CertStatus::Approved);
        assert_eq!(cert.approved_at.as_deref(), Some("2026-02-01T00:00:00.000Z"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn expiry_write_leaves_untouched_slot() {
        let (db, _dir) = setup_db().await;
        let mut cert = make_cert("cert-1");
        cert.combo_expiry = Some("2026-06-01".to_string());
        insert_vaccine_cert(&db, &cert).await.unwrap();

        write_vaccine_expiry(&db, "cert-1", Some("2027-01-15"), None)
            .await
            .unwrap();

        let cert = read_vaccine_cert(&db, "cert-1").await.unwrap().unwrap();
        assert_eq!(cert.rabies_expiry.as_deref(), Some("2027-01-15"));
        assert_eq!(cert.combo_expiry.as_deref(), Some("2026-06-01"));

        db.close().await.unwrap();
    }
}
