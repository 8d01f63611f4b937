//! CSV loaders for externally supplied codebooks and palettes.
//!
//! Codebooks use a `code,label` header, palettes `label,color`. Header names
//! are matched case-insensitively and a leading BOM is ignored.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use survey_model::{Codebook, Color, ColorMap};

use crate::error::{Result, StandardsError};

/// Read a CSV file into row maps keyed by lowercased header.
fn read_csv_rows(path: &Path) -> Result<Vec<(u64, BTreeMap<String, String>)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StandardsError::csv(path, &e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| StandardsError::csv(path, &e))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_ascii_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StandardsError::csv(path, &e))?;
        let line = record.position().map_or(0, csv::Position::line);
        let row = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push((line, row));
    }
    Ok(rows)
}

fn required_field<'a>(
    path: &Path,
    line: u64,
    row: &'a BTreeMap<String, String>,
    key: &str,
) -> Result<&'a str> {
    row.get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| StandardsError::InvalidEntry {
            path: path.to_path_buf(),
            line,
            message: format!("missing {key}"),
        })
}

/// Load a `code,label` codebook.
pub fn load_codebook_csv(path: &Path, name: &str) -> Result<Codebook> {
    let mut codebook = Codebook::new(name);
    for (line, row) in read_csv_rows(path)? {
        let code = required_field(path, line, &row, "code")?;
        let label = required_field(path, line, &row, "label")?;
        let code: i64 = code.parse().map_err(|_| StandardsError::InvalidEntry {
            path: path.to_path_buf(),
            line,
            message: format!("code '{code}' is not an integer"),
        })?;
        codebook.insert(code, label)?;
    }
    Ok(codebook)
}

/// Load a `label,color` palette.
pub fn load_color_map_csv(path: &Path, fallback: Color) -> Result<ColorMap> {
    let mut colors = ColorMap::new(fallback);
    for (line, row) in read_csv_rows(path)? {
        let label = required_field(path, line, &row, "label")?;
        let color = required_field(path, line, &row, "color")?;
        let color = Color::from_hex(color).map_err(|e| StandardsError::InvalidEntry {
            path: path.to_path_buf(),
            line,
            message: e.to_string(),
        })?;
        colors.insert(label, color);
    }
    Ok(colors)
}
