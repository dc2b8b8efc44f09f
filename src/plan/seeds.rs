use crate::record::{ReviewThreadUnit, SeedRecord};
use crate::Result;
use std::path::Path;

/// Reads the seed table into schedulable `ReviewThreadUnit`s
///
/// The table is headerless CSV with columns `(price, url, page_count)`,
/// exactly as the products pipeline writes it. Rows are consumed in file
/// order, which becomes the unit order of the review run.
pub fn read_seed_units(path: &Path) -> Result<Vec<ReviewThreadUnit>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let mut units = Vec::new();
    for row in reader.deserialize::<SeedRecord>() {
        units.push(row?.into_unit());
    }

    tracing::debug!("Loaded {} seed units from {}", units.len(), path.display());
    Ok(units)
}
