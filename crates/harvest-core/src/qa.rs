use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use serde::Deserialize;
use tracing::warn;

use harvest_sheets::{canonical_column_for, is_na_token, HarvestYear};

use crate::error::{PipelineError, Result};

/// One manual correction from a year's QA review: set `Variable` to
/// `NewVal` on the row whose biomass barcode equals `ID`. An empty `NewVal`
/// clears the cell.
#[derive(Debug, Clone, Deserialize)]
pub struct QaOverride {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Variable")]
    pub variable: String,
    #[serde(rename = "NewVal")]
    pub new_value: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QaReport {
    pub applied: usize,
    pub unmatched: Vec<String>,
}

pub fn load_qa_overrides(path: &Path) -> Result<Vec<QaOverride>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut overrides = Vec::new();
    for record in reader.deserialize() {
        let record: QaOverride = record?;
        overrides.push(record);
    }
    Ok(overrides)
}

/// QA files name variables by the raw template headers; translate to the
/// canonical column names, including the presence flag the cleaners add.
pub fn canonical_variable(year: HarvestYear, variable: &str) -> Option<&'static str> {
    if variable.trim().eq_ignore_ascii_case("CropExists") {
        return Some("crop_exists");
    }
    canonical_column_for(year, variable)
}

pub fn apply_qa_overrides(
    df: &mut DataFrame,
    year: HarvestYear,
    id_column: &str,
    overrides: &[QaOverride],
) -> Result<QaReport> {
    let mut report = QaReport::default();

    for qa in overrides {
        let column = canonical_variable(year, &qa.variable).ok_or_else(|| {
            PipelineError::Validation(format!(
                "QA override for '{}' names unknown {} variable '{}'",
                qa.id,
                year.as_str(),
                qa.variable
            ))
        })?;

        let ids = df.column(id_column)?.str()?;
        let rows: Vec<usize> = (0..ids.len())
            .filter(|&idx| ids.get(idx).is_some_and(|value| value == qa.id))
            .collect();

        if rows.is_empty() {
            warn!(
                id = %qa.id,
                variable = %qa.variable,
                year = year.as_str(),
                "QA override matched no rows"
            );
            report.unmatched.push(qa.id.clone());
            continue;
        }

        set_cells(df, column, &rows, qa.new_value.as_deref())?;
        report.applied += 1;
    }

    Ok(report)
}

fn set_cells(df: &mut DataFrame, column: &str, rows: &[usize], value: Option<&str>) -> Result<()> {
    let dtype = df.column(column)?.dtype().clone();

    let new_series = match dtype {
        DataType::Float64 => {
            let current = df.column(column)?.f64()?;
            let mut values: Vec<Option<f64>> = current.into_iter().collect();
            let parsed = parse_override_f64(column, value)?;
            for &row in rows {
                values[row] = parsed;
            }
            Series::new(column.into(), values)
        }
        DataType::Int32 => {
            let current = df.column(column)?.i32()?;
            let mut values: Vec<Option<i32>> = current.into_iter().collect();
            let parsed = parse_override_i32(column, value)?;
            for &row in rows {
                values[row] = parsed;
            }
            Series::new(column.into(), values)
        }
        DataType::String => {
            let current = df.column(column)?.str()?;
            let mut values: Vec<Option<String>> = current
                .into_iter()
                .map(|value| value.map(|text| text.to_string()))
                .collect();
            let parsed = value
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(|text| text.to_string());
            for &row in rows {
                values[row] = parsed.clone();
            }
            Series::new(column.into(), values)
        }
        other => {
            return Err(PipelineError::Validation(format!(
                "QA overrides cannot target column '{column}' of type {other}"
            )))
        }
    };

    df.replace(column, new_series)?;
    Ok(())
}

fn parse_override_f64(column: &str, value: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = value else { return Ok(None) };
    if is_na_token(raw) {
        return Ok(None);
    }
    raw.trim().parse::<f64>().map(Some).map_err(|_| {
        PipelineError::Validation(format!(
            "QA override value '{raw}' for column '{column}' is not a number"
        ))
    })
}

fn parse_override_i32(column: &str, value: Option<&str>) -> Result<Option<i32>> {
    let Some(parsed) = parse_override_f64(column, value)? else {
        return Ok(None);
    };
    if parsed.fract() != 0.0 {
        return Err(PipelineError::Validation(format!(
            "QA override value '{parsed}' for column '{column}' is not an integer"
        )));
    }
    Ok(Some(parsed as i32))
}
