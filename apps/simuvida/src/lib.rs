//! # SimuVida application library
//!
//! The HTTP API, CLI and configuration layers on top of `simuvida-core`.
//! Exposed as a library so integration tests can build the router directly.

pub mod api;
pub mod cli;
pub mod config;
