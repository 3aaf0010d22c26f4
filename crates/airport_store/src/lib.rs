//! Airport store crate.
//!
//! Concurrent in-memory airport cache and the background population
//! routine that fills it from an upstream [`Fetcher`].

pub mod fetcher;
pub mod populate;
pub mod store;

pub use fetcher::Fetcher;
pub use populate::{PopulateOptions, Population, PopulationReport};
pub use store::{AirportStore, Airports};
