//! Parsers for the two table shapes the cloud CLIs print.
//!
//! A "details" table renders one entity as field/value rows; a
//! "listing" table renders many entities as a header row plus one row
//! per entity. Lines are classified explicitly (blank, border, data)
//! before any splitting so malformed input fails loudly instead of
//! producing a half-filled record.

use std::collections::HashMap;

use crate::error::Error;

/// One entity's attributes, keyed by field name. Values stay strings;
/// numeric interpretation is left to the caller.
pub type DetailRecord = HashMap<String, String>;

/// Rows of a listing table, each keyed by the header's column names.
pub type ListingRecord = Vec<DetailRecord>;

/// A classified input line.
#[derive(Debug, PartialEq)]
enum Line {
    /// Empty or whitespace-only.
    Blank,
    /// Decorative separator, composed only of `+`, `-`, `|` and spaces.
    Border,
    /// A row of cell values, outer pipes stripped, cells trimmed.
    Data(Vec<String>),
}

fn classify(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.chars().all(|c| matches!(c, '+' | '-' | '|' | ' ')) {
        return Line::Border;
    }
    let mut cells: Vec<&str> = trimmed.split('|').collect();
    // Outer pipes produce empty first/last segments.
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    Line::Data(cells.iter().map(|c| c.trim().to_string()).collect())
}

fn data_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter_map(|line| match classify(line) {
            Line::Data(cells) => Some(cells),
            Line::Blank | Line::Border => None,
        })
        .collect()
}

/// Parses a two-column field/value table into a [`DetailRecord`].
///
/// Border and blank lines are skipped; every remaining row must have
/// exactly two cells.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the text contains no data rows or a
/// data row does not split into exactly two columns.
pub fn parse_details(text: &str) -> Result<DetailRecord, Error> {
    let rows = data_rows(text);
    if rows.is_empty() {
        return Err(Error::Parse("details table has no data rows".to_string()));
    }
    let mut record = DetailRecord::new();
    for cells in rows {
        if cells.len() != 2 {
            return Err(Error::Parse(format!(
                "details row has {} columns, expected 2: {cells:?}",
                cells.len()
            )));
        }
        record.insert(cells[0].clone(), cells[1].clone());
    }
    Ok(record)
}

/// Parses a header-plus-rows table into a [`ListingRecord`].
///
/// The first data row is the header; each following row becomes one
/// record keyed by the header's column names.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the text has no header row or a data
/// row's column count differs from the header's.
pub fn parse_listing(text: &str) -> Result<ListingRecord, Error> {
    let mut rows = data_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Err(Error::Parse("listing table has no header row".to_string()));
    };
    let mut records = ListingRecord::new();
    for cells in rows {
        if cells.len() != header.len() {
            return Err(Error::Parse(format!(
                "listing row has {} columns, header has {}: {cells:?}",
                cells.len(),
                header.len()
            )));
        }
        records.push(header.iter().cloned().zip(cells).collect());
    }
    Ok(records)
}
