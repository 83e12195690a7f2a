// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maintenance mode for the dogrun platform.
//!
//! [`MaintenanceGate`] evaluates active schedules and the CIDR-based IP
//! whitelist to decide whether a request is blocked; [`cidr`] holds the
//! range parsing and membership tests.

pub mod cidr;
pub mod gate;

pub use cidr::{Cidr, CidrError};
pub use gate::{AccessDecision, MaintenanceGate};
