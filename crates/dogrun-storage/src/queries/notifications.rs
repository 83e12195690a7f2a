// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only notification records. The store assigns the id and the
//! creation timestamp; callers supply only the content.

use dogrun_core::DogrunError;
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::models::{NewNotification, Notification};

pub async fn insert_notification(
    db: &Database,
    notification: &NewNotification,
) -> Result<(), DogrunError> {
    let notification = notification.clone();
    let id = Uuid::new_v4().to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notifications (id, user_id, kind, title, message, data, read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                params![
                    id,
                    notification.user_id,
                    notification.kind,
                    notification.title,
                    notification.message,
                    notification.data,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Notifications for a user, newest first.
pub async fn read_notifications_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<Notification>, DogrunError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, kind, title, message, data, read, created_at
                 FROM notifications WHERE user_id = ?1 ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(Notification {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    kind: row.get(2)?,
                    title: row.get(3)?,
                    message: row.get(4)?,
                    data: row.get(5)?,
                    read: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?;
            let mut notifications = Vec::new();
            for row in rows {
                notifications.push(row?);
            }
            Ok(notifications)
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

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let (db, _dir) = setup_db().await;
        insert_notification(
            &db,
            &NewNotification {
                user_id: "owner-1".to_string(),
                kind: "facility_approval".to_string(),
                title: "Facility approved".to_string(),
                message: "Your facility is now live.".to_string(),
                data: Some(r#"{"facility_id":"f-1"}"#.to_string()),
            },
        )
        .await
        .unwrap();

        let notifications = read_notifications_for_user(&db, "owner-1").await.unwrap();
        assert_eq!(notifications.len(), 1);
        let n = &notifications[0];
        assert!(!n.id.is_empty());
        assert!(!n.read);
        // Store-assigned RFC 3339 timestamp.
        assert!(n.created_at.ends_with('Z'));
        assert!(n.created_at.contains('T'));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reads_are_scoped_to_user() {
        let (db, _dir) = setup_db().await;
        for user in ["owner-1", "owner-2"] {
            insert_notification(
                &db,
                &NewNotification {
                    user_id: user.to_string(),
                    kind: "vaccine_approval".to_string(),
                    title: "Certification reviewed".to_string(),
                    message: "See your dashboard.".to_string(),
                    data: None,
                },
            )
            .await
            .unwrap();
        }

        let notifications = read_notifications_for_user(&db, "owner-1").await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].user_id, "owner-1");

        db.close().await.unwrap();
    }
}
