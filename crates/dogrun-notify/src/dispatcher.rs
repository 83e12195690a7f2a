// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persists rendered notifications through the record store.
//!
//! Dispatch failure is surfaced to the caller: a decision whose
//! notification could not be written reports failure even though the
//! status write already happened. The engines rely on that contract.

use std::sync::Arc;

use dogrun_core::{DogrunError, RecordStore};
use tracing::info;

use crate::templates::{self, DecisionEvent};

pub struct NotificationDispatcher {
    store: Arc<dyn RecordStore>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Render and persist the notification for a decision event.
    pub async fn dispatch(&self, event: &DecisionEvent<'_>) -> Result<(), DogrunError> {
        let notification = templates::render(event);
        self.store.insert_notification(&notification).await?;
        info!(
            user_id = %notification.user_id,
            kind = %notification.kind,
            title = %notification.title,
            "notification dispatched"
        );
        Ok(())
    }
}
