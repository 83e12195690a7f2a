// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maintenance schedules and the IP whitelist.
//!
//! These queries filter only on the active flag; whether a schedule's time
//! window currently applies is the maintenance gate's decision.

use dogrun_core::DogrunError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{IpWhitelistEntry, MaintenanceSchedule};

fn row_to_schedule(row: &rusqlite::Row<'_>) -> Result<MaintenanceSchedule, rusqlite::Error> {
    Ok(MaintenanceSchedule {
        id: row.get(0)?,
        title: row.get(1)?,
        message: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        is_active: row.get(5)?,
        is_emergency: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub async fn insert_maintenance_schedule(
    db: &Database,
    schedule: &MaintenanceSchedule,
) -> Result<(), DogrunError> {
    let schedule = schedule.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO maintenance_schedules
                 (id, title, message, start_time, end_time, is_active, is_emergency, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    schedule.id,
                    schedule.title,
                    schedule.message,
                    schedule.start_time,
                    schedule.end_time,
                    schedule.is_active,
                    schedule.is_emergency,
                    schedule.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Schedules with the active flag set, emergencies first, then newest.
pub async fn read_active_maintenance_schedules(
    db: &Database,
) -> Result<Vec<MaintenanceSchedule>, DogrunError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, message, start_time, end_time, is_active, is_emergency, created_at
                 FROM maintenance_schedules
                 WHERE is_active = 1
                 ORDER BY is_emergency DESC, created_at DESC",
            )?;
            let rows = stmt.query_map([], row_to_schedule)?;
            let mut schedules = Vec::new();
            for row in rows {
                schedules.push(row?);
            }
            Ok(schedules)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Clear the active flag and stamp the end time.
pub async fn deactivate_maintenance_schedule(
    db: &Database,
    id: &str,
    ended_at: &str,
) -> Result<(), DogrunError> {
    let id = id.to_string();
    let ended_at = ended_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE maintenance_schedules SET is_active = 0, end_time = ?1 WHERE id = ?2",
                params![ended_at, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn insert_whitelist_entry(
    db: &Database,
    entry: &IpWhitelistEntry,
) -> Result<(), DogrunError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO ip_whitelist (id, ip_address, description, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.id,
                    entry.ip_address,
                    entry.description,
                    entry.is_active,
                    entry.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn read_active_whitelist_entries(
    db: &Database,
) -> Result<Vec<IpWhitelistEntry>, DogrunError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, ip_address, description, is_active, created_at
                 FROM ip_whitelist WHERE is_active = 1 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(IpWhitelistEntry {
                    id: row.get(0)?,
                    ip_address: row.get(1)?,
                    description: row.get(2)?,
                    is_active: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
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
        (db, dir)
    }

    fn make_schedule(id: &str, is_emergency: bool) -> MaintenanceSchedule {
        MaintenanceSchedule {
            id: id.to_string(),
            title: "Planned maintenance".to_string(),
            message: "Back shortly.".to_string(),
            start_time: Some("2026-03-01T15:00:00.000Z".to_string()),
            end_time: Some("2026-03-01T17:00:00.000Z".to_string()),
            is_active: true,
            is_emergency,
            created_at: "2026-02-28T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn active_reads_skip_deactivated_and_rank_emergencies() {
        let (db, _dir) = setup_db().await;
        insert_maintenance_schedule(&db, &make_schedule("m-1", false))
            .await
            .unwrap();
        insert_maintenance_schedule(&db, &make_schedule("m-2", true))
            .await
            .unwrap();

        let active = read_active_maintenance_schedules(&db).await.unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id, "m-2");

        deactivate_maintenance_schedule(&db, "m-2", "2026-03-01T16:00:00.000Z")
            .await
            .unwrap();
        let active = read_active_maintenance_schedules(&db).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "m-1");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn whitelist_reads_only_active_entries() {
        let (db, _dir) = setup_db().await;
        insert_whitelist_entry(
            &db,
            &IpWhitelistEntry {
                id: "w-1".to_string(),
                ip_address: "192.168.1.0/24".to_string(),
                description: "office".to_string(),
                is_active: true,
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
            },
        )
        .await
        .unwrap();
        insert_whitelist_entry(
            &db,
            &IpWhitelistEntry {
                id: "w-2".to_string(),
                ip_address: "10.0.0.1".to_string(),
                description: "old vpn".to_string(),
                is_active: false,
                created_at: "2026-01-02T00:00:00.000Z".to_string(),
            },
        )
        .await
        .unwrap();

        let entries = read_active_whitelist_entries(&db).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ip_address, "192.168.1.0/24");

        db.close().await.unwrap();
    }
}
