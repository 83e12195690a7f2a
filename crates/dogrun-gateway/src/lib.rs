// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the dogrun platform.
//!
//! Exposes the admin decision API behind bearer authentication, public
//! facility listings behind the maintenance gate, and always-on
//! infrastructure endpoints (health, maintenance status).

pub mod auth;
pub mod handlers;
pub mod maintenance;
pub mod server;

pub use server::{ServerConfig, ServerState, start_server};
