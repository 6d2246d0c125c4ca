//! `taylor-sim` library crate.
//!
//! The binary (`taylor`) is a thin wrapper around this library so that:
//!
//! - fetching, resampling and the rule are testable without spawning processes
//! - a stub HTTP server can stand in for the ECB Data Portal in tests

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
