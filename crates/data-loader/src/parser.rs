//! Parser for the program catalog CSV.
//!
//! Format (one header row, then one program per line):
//!
//! ```text
//! LINK,PROGRAM,LOCATION,CATEGORY,SELECTIVITY,APPLICATION DATE,DURATION,RESTRICTIONS,COST,LATITUDE,LONGITUDE
//! ```
//!
//! Fields containing commas are wrapped in double quotes. The catalog is
//! hand-maintained, so rows that cannot be used (too few columns, bad
//! coordinates) are skipped with a warning instead of failing the load.

use crate::error::{CatalogError, Result};
use crate::types::{Coordinate, Item, ItemId};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Number of columns every usable row must have
pub const EXPECTED_COLUMNS: usize = 11;

/// Read the whole catalog file into memory
pub fn read_catalog_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Split one CSV line into trimmed fields.
///
/// A double quote toggles "inside quotes"; commas inside quotes belong to
/// the field. Quote characters themselves are dropped.
///
/// Example: `a,"b, c", d` -> `["a", "b, c", "d"]`
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// A row that passed column and coordinate checks, waiting for its id
struct ParsedRow {
    fields: Vec<String>,
    coordinate: Coordinate,
}

fn parse_row(line: &str) -> std::result::Result<ParsedRow, String> {
    let fields = split_csv_line(line);
    if fields.len() < EXPECTED_COLUMNS {
        return Err(format!(
            "expected {} fields but found {}",
            EXPECTED_COLUMNS,
            fields.len()
        ));
    }

    let latitude: f64 = fields[9]
        .parse()
        .map_err(|e| format!("invalid latitude '{}': {}", fields[9], e))?;
    let longitude: f64 = fields[10]
        .parse()
        .map_err(|e| format!("invalid longitude '{}': {}", fields[10], e))?;

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        return Err(format!(
            "coordinate out of range: ({}, {})",
            latitude, longitude
        ));
    }

    Ok(ParsedRow { fields, coordinate })
}

fn into_item(id: ItemId, row: ParsedRow) -> Item {
    let mut fields = row.fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();

    Item {
        id,
        link: next(),
        name: next(),
        location: next(),
        category: next(),
        selectivity: next(),
        application_date: next(),
        duration: next(),
        restrictions: next(),
        cost: next(),
        latitude: row.coordinate.latitude,
        longitude: row.coordinate.longitude,
    }
}

/// Parse catalog content into items.
///
/// Rows are parsed in parallel with Rayon; ids are assigned afterwards in
/// file order so they are stable across runs. Empty content yields an
/// empty list.
pub fn parse_items(content: &str) -> Result<Vec<Item>> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_idx, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    if parse_row(header).is_ok() {
        return Err(CatalogError::MissingHeader);
    }
    let header_fields = split_csv_line(header);
    if header_fields.len() < EXPECTED_COLUMNS {
        return Err(CatalogError::ParseError {
            line: header_idx + 1,
            reason: format!(
                "header has {} columns, expected {}",
                header_fields.len(),
                EXPECTED_COLUMNS
            ),
        });
    }

    let rows: Vec<(usize, &str)> = lines.collect();
    let parsed: Vec<Option<ParsedRow>> = rows
        .par_iter()
        .map(|&(idx, line)| match parse_row(line) {
            Ok(row) => Some(row),
            Err(reason) => {
                warn!(line = idx + 1, %reason, "Skipping catalog row");
                None
            }
        })
        .collect();

    let items: Vec<Item> = parsed
        .into_iter()
        .flatten()
        .zip(0..)
        .map(|(row, id)| into_item(id, row))
        .collect();

    debug!(
        "Parsed {} items from {} catalog rows",
        items.len(),
        rows.len()
    );
    Ok(items)
}
