use std::collections::HashMap;

use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::Cell;

pub(crate) const MAX_HEADER_SCAN_ROWS: usize = 16;

const EMPTY_CELL: Cell = Cell::Empty;

/// Tokens the data-entry templates use for missing values.
pub fn is_na_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed == "."
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
}

/// Lowercases and collapses interior whitespace so template headers match
/// regardless of the stray double spaces present in the raw workbooks.
pub(crate) fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

pub(crate) fn cell_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(text) => {
            let trimmed = text.trim();
            if is_na_token(trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Cell::Number(value) => Some(value.to_string()),
        Cell::Bool(value) => Some(value.to_string()),
    }
}

pub(crate) fn cell_f64(
    parser: &'static str,
    cell: &Cell,
    row_index: usize,
    column: &str,
) -> Result<Option<f64>, ParserError> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(value) => Ok(Some(*value)),
        Cell::Text(text) => {
            let trimmed = text.trim();
            if is_na_token(trimmed) {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|err| ParserError::DataRow {
                    parser,
                    row_index,
                    message: format!("failed to parse column '{column}' as float: {err}"),
                })
        }
        Cell::Bool(_) => Err(ParserError::DataRow {
            parser,
            row_index,
            message: format!("column '{column}' holds a boolean, expected a number"),
        }),
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ColumnKind {
    Text,
    Float,
}

/// One template column: the raw header as printed in the workbook and the
/// canonical dataframe name it maps to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnSpec {
    pub raw: &'static str,
    pub canonical: &'static str,
    pub kind: ColumnKind,
}

pub(crate) struct HeaderIndex {
    pub row: usize,
    by_name: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn column(&self, raw: &str) -> Option<usize> {
        self.by_name.get(&normalize_header(raw)).copied()
    }
}

/// Scans the banner rows at the top of a template for the row carrying the
/// anchor header. Duplicate headers keep their first occurrence.
pub(crate) fn find_header_row(grid: &[Vec<Cell>], anchor: &str) -> Option<HeaderIndex> {
    let target = normalize_header(anchor);

    for (row_index, row) in grid.iter().take(MAX_HEADER_SCAN_ROWS).enumerate() {
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut found = false;

        for (column_index, cell) in row.iter().enumerate() {
            let Some(text) = cell_text(cell) else { continue };
            let normalized = normalize_header(&text);
            if normalized.is_empty() {
                continue;
            }
            if normalized == target {
                found = true;
            }
            by_name.entry(normalized).or_insert(column_index);
        }

        if found {
            return Some(HeaderIndex { row: row_index, by_name });
        }
    }

    None
}

enum ColumnData {
    Text(Vec<Option<String>>),
    Float(Vec<Option<f64>>),
}

pub(crate) struct ExtractedTable {
    pub df: DataFrame,
    pub header_row: usize,
    pub rows_kept: usize,
    pub rows_skipped: usize,
}

/// Shared template extraction: locate the header row by the first spec (the
/// barcode column), map every spec to a column index, then walk the data
/// rows. Rows with an empty barcode cell are skipped and counted; the raw
/// sheets end with junk and total rows.
pub(crate) fn extract_table(
    parser: &'static str,
    grid: &[Vec<Cell>],
    specs: &[ColumnSpec],
) -> Result<ExtractedTable, ParserError> {
    let anchor = specs.first().expect("column specs must not be empty");

    let header = find_header_row(grid, anchor.raw).ok_or_else(|| ParserError::FormatMismatch {
        parser,
        reason: format!(
            "no header row containing '{}' in the first {MAX_HEADER_SCAN_ROWS} rows",
            anchor.raw
        ),
    })?;

    let mut indices = Vec::with_capacity(specs.len());
    let mut missing = Vec::new();
    for spec in specs {
        match header.column(spec.raw) {
            Some(index) => indices.push(index),
            None => missing.push(spec.raw),
        }
    }
    if !missing.is_empty() {
        return Err(ParserError::FormatMismatch {
            parser,
            reason: format!(
                "header row {} is missing required columns: {}",
                header.row,
                missing.join(", ")
            ),
        });
    }

    let mut builders: Vec<ColumnData> = specs
        .iter()
        .map(|spec| match spec.kind {
            ColumnKind::Text => ColumnData::Text(Vec::new()),
            ColumnKind::Float => ColumnData::Float(Vec::new()),
        })
        .collect();

    let mut rows_kept = 0usize;
    let mut rows_skipped = 0usize;

    for (row_index, row) in grid.iter().enumerate().skip(header.row + 1) {
        let barcode_cell = row.get(indices[0]).unwrap_or(&EMPTY_CELL);
        if cell_text(barcode_cell).is_none() {
            rows_skipped += 1;
            continue;
        }

        for ((spec, &column_index), builder) in
            specs.iter().zip(indices.iter()).zip(builders.iter_mut())
        {
            let cell = row.get(column_index).unwrap_or(&EMPTY_CELL);
            match builder {
                ColumnData::Text(values) => values.push(cell_text(cell)),
                ColumnData::Float(values) => {
                    values.push(cell_f64(parser, cell, row_index, spec.canonical)?)
                }
            }
        }
        rows_kept += 1;
    }

    if rows_kept == 0 {
        return Err(ParserError::EmptyData { parser });
    }

    let mut columns: Vec<Column> = Vec::with_capacity(specs.len());
    for (spec, builder) in specs.iter().zip(builders) {
        let series = match builder {
            ColumnData::Text(values) => Series::new(spec.canonical.into(), values),
            ColumnData::Float(values) => Series::new(spec.canonical.into(), values),
        };
        columns.push(series.into());
    }

    let df = DataFrame::new(columns).map_err(|err| ParserError::Validation {
        parser,
        message: format!("failed to build sheet dataframe: {err}"),
    })?;

    Ok(ExtractedTable {
        df,
        header_row: header.row,
        rows_kept,
        rows_skipped,
    })
}
