//! `ecom-dash` library crate.
//!
//! The binary (`dash`) only forwards to [`app::run`]; loading, aggregation
//! and formatting live here so they can be tested without a terminal.

pub mod analytics;
pub mod app;
pub mod cli;
pub mod config;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;
