//! cloudcost library
//!
//! This library provides the pricing catalog and cost simulation engine
//! behind the cloudcost CLI.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogFilter, Offering};
pub use engine::{ScenarioResult, TermComparison};
pub use error::{CloudCostError, Result};
pub use scenario::{CommitmentTerm, Scenario, TimePeriod};
