// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Approval engines for the dogrun platform.
//!
//! [`ApprovalEngine`] owns every admin decision: the multi-stage facility
//! ladder, per-image review, and one-shot vaccine certification decisions
//! with temporary-upload purging. [`gate`] holds the pure image-set
//! predicates the facility ladder is gated on.

pub mod engine;
pub mod gate;

pub use engine::ApprovalEngine;
