//! Catalog building and indexing logic.
//!
//! Turns parsed items into a `Catalog`:
//! - de-duplicate by name (the first row wins)
//! - build the raw-category secondary index
//! - validate the result

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::{Catalog, Item};
use std::path::Path;
use tracing::{info, warn};

impl Catalog {
    /// Load the catalog from a CSV file.
    ///
    /// Steps:
    /// 1. Read the file
    /// 2. Parse rows (bad rows are skipped)
    /// 3. Insert items, dropping duplicate names
    /// 4. Build secondary indices
    /// 5. Validate
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading program catalog from {:?}", path);
        let content = parser::read_catalog_file(path)?;
        let catalog = Self::from_csv_str(&content)?;
        info!("Loaded {} programs", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog from CSV content already in memory
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let items = parser::parse_items(content)?;
        Self::from_items(items)
    }

    /// Build a catalog from items, keeping the first occurrence of each name
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self> {
        let mut catalog = Catalog::new();
        for item in items {
            let name = item.name.clone();
            if !catalog.insert_item(item) {
                warn!(name = %name, "Duplicate program name, keeping the first entry");
            }
        }
        catalog.build_secondary_indices();
        catalog.validate()?;
        Ok(catalog)
    }

    /// Rebuild the raw-category index from scratch
    pub fn build_secondary_indices(&mut self) {
        self.category_index.clear();
        for item in &self.items {
            for label in item.raw_categories() {
                self.category_index
                    .entry(label.to_string())
                    .or_default()
                    .push(item.id);
            }
        }
    }

    /// Validate catalog integrity.
    ///
    /// Checks that ids are unique, names are non-empty and coordinates are
    /// in range.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id) {
                return Err(CatalogError::Validation(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
            if item.name.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "item {} has an empty name",
                    item.id
                )));
            }
            if !item.coordinate().is_valid() {
                return Err(CatalogError::Validation(format!(
                    "item '{}' has an invalid coordinate",
                    item.name
                )));
            }
        }
        Ok(())
    }
}
