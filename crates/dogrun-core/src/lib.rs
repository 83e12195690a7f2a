// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the dogrun platform.
//!
//! This crate provides the foundational store traits, error type, and
//! common types used throughout the dogrun workspace: the facility and
//! vaccine approval engines, the notification dispatcher, the maintenance
//! gate, and the storage backends all build on what is defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DogrunError;
pub use traits::{ObjectStore, RecordStore};
pub use types::{
    CertStatus, DecisionOutcome, Facility, FacilityImage, FacilityStatus, ImageApproval,
    Principal, Role,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_traits_are_object_safe() {
        // The engines hold `Arc<dyn RecordStore>` / `Arc<dyn ObjectStore>`;
        // this won't compile if either trait loses object safety.
        fn _record(_: &dyn RecordStore) {}
        fn _object(_: &dyn ObjectStore) {}
    }

    #[test]
    fn error_variants_construct() {
        let _config = DogrunError::Config("bad".into());
        let _storage = DogrunError::Storage {
            source: Box::new(std::io::Error::other("down")),
        };
        let _object = DogrunError::ObjectStore {
            message: "bucket unreachable".into(),
            source: None,
        };
        let _validation = DogrunError::Validation("pending images must be resolved".into());
        let _not_found = DogrunError::not_found("facility", "f-1");
        let _internal = DogrunError::Internal("bug".into());
    }
}
