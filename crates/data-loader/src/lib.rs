//! # Data Loader Crate
//!
//! This crate loads and indexes the summer-program catalog and defines the
//! domain types every other crate builds on.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Item, SwipeEvent, Coordinate, Catalog)
//! - **parser**: Quote-aware CSV parsing of the catalog file
//! - **index**: Catalog construction, secondary indices and validation
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("data/programs.csv"))?;
//! let bu = catalog.get_by_name("BU RISE").unwrap();
//! println!("{} is located at {}", bu.name, bu.location);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{split_categories, Catalog, Coordinate, Item, ItemId, SwipeEvent, SwipeOrder};
