// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision notifications for the dogrun platform.
//!
//! The approval engines report every decision to an owner through a
//! persisted notification. [`templates`] maps decision events to content;
//! [`NotificationDispatcher`] writes the result through the record store.

pub mod dispatcher;
pub mod templates;

pub use dispatcher::NotificationDispatcher;
pub use templates::DecisionEvent;
