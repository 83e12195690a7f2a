// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for the dogrun platform.
//!
//! [`SqliteStore`] implements `dogrun-core`'s `RecordStore` over a single
//! SQLite connection with WAL mode and embedded migrations;
//! [`FsObjectStore`] implements `ObjectStore` over a directory tree.
//! The engines only ever see the traits.

pub mod database;
pub mod migrations;
pub mod models;
pub mod objects;
pub mod queries;
pub mod store;

pub use database::Database;
pub use objects::FsObjectStore;
pub use store::SqliteStore;
