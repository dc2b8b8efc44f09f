//! Data model for harvest work units and extracted rows
//!
//! Units identify one item of harvesting work (one catalog listing page, or
//! one product's full review thread). Records are the immutable rows they
//! produce; serde field order fixes the CSV column order.

mod state;
mod types;

pub use state::UnitState;
pub use types::{ListingUnit, ProductRecord, ReviewRecord, ReviewThreadUnit, SeedRecord};
