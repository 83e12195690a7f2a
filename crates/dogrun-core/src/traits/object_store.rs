// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object store trait for image blobs.

use async_trait::async_trait;

use crate::error::DogrunError;

/// Blob storage for uploaded images.
///
/// Used by the vaccine-decision purge step. Deletes are idempotent:
/// removing an object that does not exist is not an error.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Delete the given objects from a bucket.
    async fn delete_objects(&self, bucket: &str, paths: &[String]) -> Result<(), DogrunError>;
}
