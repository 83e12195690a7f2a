// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait definitions the engines depend on.
//!
//! Persistence backends implement these with `#[async_trait]` so the
//! engines can hold `Arc<dyn RecordStore>` and stay backend-agnostic.

pub mod object_store;
pub mod record_store;

pub use object_store::ObjectStore;
pub use record_store::RecordStore;
