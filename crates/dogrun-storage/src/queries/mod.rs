// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per entity family.

pub mod facilities;
pub mod images;
pub mod maintenance;
pub mod notifications;
pub mod vaccines;

use std::str::FromStr;

/// Parse a TEXT status column into its enum, reporting a conversion
/// failure against the originating column index.
pub(crate) fn parse_enum_col<T>(idx: usize, raw: &str) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
