//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observation series and fetch outcomes (`ObservationSeries`, `FetchOutcome`)
//! - remote series identifiers (`SeriesSpec`, `SeriesCatalog`)
//! - run configuration and output (`SimulationConfig`, `SimulationOutput`)

pub mod types;

pub use types::*;
