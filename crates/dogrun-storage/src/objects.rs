// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed [`ObjectStore`].
//!
//! Objects live under `<root>/<bucket>/<path>`. Deletion is idempotent: a
//! path that is already gone is success, because the callers' contract is
//! "these objects no longer exist", not "I removed them".

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use dogrun_core::{DogrunError, ObjectStore};
use tracing::debug;

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `bucket/path` under the root, rejecting anything that could
    /// escape it. Bucket names are single path segments; object paths may
    /// contain separators but no parent references.
    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf, DogrunError> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == ".." {
            return Err(DogrunError::ObjectStore {
                message: format!("invalid bucket name: {bucket:?}"),
                source: None,
            });
        }
        let rel = Path::new(path);
        let escapes = rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if path.is_empty() || escapes {
            return Err(DogrunError::ObjectStore {
                message: format!("invalid object path: {path:?}"),
                source: None,
            });
        }
        Ok(self.root.join(bucket).join(rel))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn delete_objects(&self, bucket: &str, paths: &[String]) -> Result<(), DogrunError> {
        for path in paths {
            let full = self.resolve(bucket, path)?;
            match tokio::fs::remove_file(&full).await {
                Ok(()) => debug!(bucket, path, "object deleted"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(bucket, path, "object already absent");
                }
                Err(e) => {
                    return Err(DogrunError::ObjectStore {
                        message: format!("failed to delete {bucket}/{path}"),
                        source: Some(Box::new(e)),
                    });
                }
            }
        }
        Ok(())
    }
}
