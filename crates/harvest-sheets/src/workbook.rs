use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::errors::ParserError;
use crate::model::{Cell, ParsedSheet};
use crate::registry::parse_harvest_grid;

/// Reads one worksheet from an `.xlsx`/`.xlsm` workbook into a plain cell
/// grid. Formula cells arrive already evaluated (calamine exposes cached
/// values); error cells read as empty.
pub fn read_workbook_grid(path: &Path, sheet: &str) -> Result<Vec<Vec<Cell>>, ParserError> {
    let mut workbook = open_workbook_auto(path).map_err(|err| ParserError::Workbook {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;

    let range = match workbook.worksheet_range(sheet) {
        Ok(range) => range,
        Err(err) => {
            let known = workbook.sheet_names();
            if known.iter().any(|name| name == sheet) {
                return Err(ParserError::Workbook {
                    path: path.display().to_string(),
                    message: err.to_string(),
                });
            }
            return Err(ParserError::SheetNotFound {
                path: path.display().to_string(),
                sheet: sheet.to_string(),
            });
        }
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect())
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => Cell::Number(value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// Loads a worksheet and runs it through the format registry.
pub fn load_harvest_sheet(path: &Path, sheet: &str) -> Result<ParsedSheet, ParserError> {
    let grid = read_workbook_grid(path, sheet)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_harvest_grid(&grid, &format!("{file_name}#{sheet}"))
}
