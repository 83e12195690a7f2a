// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facility image records and per-image approval writes.

use dogrun_core::DogrunError;
use dogrun_core::types::ImageApproval;
use rusqlite::params;

use crate::database::Database;
use crate::models::FacilityImage;
use crate::queries::parse_enum_col;

fn row_to_image(row: &rusqlite::Row<'_>) -> Result<FacilityImage, rusqlite::Error> {
    let approval: String = row.get(3)?;
    Ok(FacilityImage {
        id: row.get(0)?,
        facility_id: row.get(1)?,
        image_type: row.get(2)?,
        approval: parse_enum_col(3, &approval)?,
        admin_note: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const IMAGE_COLS: &str = "id, facility_id, image_type, approval, admin_note, created_at";

pub async fn insert_facility_image(
    db: &Database,
    image: &FacilityImage,
) -> Result<(), DogrunError> {
    let image = image.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO facility_images (id, facility_id, image_type, approval, admin_note, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    image.id,
                    image.facility_id,
                    image.image_type,
                    image.approval.to_string(),
                    image.admin_note,
                    image.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn read_image(db: &Database, id: &str) -> Result<Option<FacilityImage>, DogrunError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {IMAGE_COLS} FROM facility_images WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id], row_to_image) {
                Ok(image) => Ok(Some(image)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All images for a facility in upload order.
pub async fn read_images_for_facility(
    db: &Database,
    facility_id: &str,
) -> Result<Vec<FacilityImage>, DogrunError> {
    let facility_id = facility_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {IMAGE_COLS} FROM facility_images
                 WHERE facility_id = ?1 ORDER BY created_at ASC"
            ))?;
            let rows = stmt.query_map(params![facility_id], row_to_image)?;
            let mut images = Vec::new();
            for row in rows {
                images.push(row?);
            }
            Ok(images)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set approval state and admin note together; the note column is always
/// written so an approval clears a previous rejection note.
pub async fn write_image_approval(
    db: &Database,
    image_id: &str,
    approval: ImageApproval,
    note: Option<&str>,
) -> Result<(), DogrunError> {
    let image_id = image_id.to_string();
    let note = note.map(str::to_string);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE facility_images SET approval = ?1, admin_note = ?2 WHERE id = ?3",
                params![approval.to_string(), note, image_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
