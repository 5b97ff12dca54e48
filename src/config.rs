use crate::domain::catalog::Catalog;
use crate::error::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads the catalog from a JSON file, or the built-in one when no path is given.
///
/// The result is always validated, so the pricing engine can rely on the
/// catalog invariants.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => {
            let file = File::open(path)?;
            let catalog: Catalog = serde_json::from_reader(BufReader::new(file))?;
            tracing::info!(path = %path.display(), "Loaded catalog");
            catalog
        }
        None => Catalog::standard(),
    };
    catalog.validate()?;
    Ok(catalog)
}
