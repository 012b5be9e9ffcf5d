use std::collections::HashMap;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::info;

use harvest_sheets::{load_harvest_sheet, HarvestYear, ParsedSheet};

use crate::config::RunConfig;
use crate::error::{PipelineError, Result};
use crate::georef::{load_georef_points, GeorefPoint};
use crate::nir::{load_nir_results, NirResult};
use crate::qa::{load_qa_overrides, QaOverride};
use crate::unification::unify_years;
use crate::years::{cleaner_for, YearCleaner, YearContext, YearReport};

/// Reference inputs loaded once per run. Loading everything up front means
/// configuration and reference-data problems surface before any workbook
/// parsing starts.
#[derive(Debug)]
pub struct ExecutionContext {
    pub config: RunConfig,
    pub georef_points: Vec<GeorefPoint>,
    pub qa_overrides: HashMap<HarvestYear, Vec<QaOverride>>,
    pub nir_results: HashMap<HarvestYear, Vec<NirResult>>,
}

impl ExecutionContext {
    pub fn load(config: RunConfig) -> Result<Self> {
        let georef_points = load_georef_points(&config.georeference.points)?;
        info!(points = georef_points.len(), "loaded georeference points");

        let mut qa_overrides = HashMap::new();
        let mut nir_results = HashMap::new();

        for (year, input) in config.year_inputs() {
            if let Some(path) = &input.qa_overrides {
                let overrides = load_qa_overrides(path)?;
                info!(
                    year = year.as_str(),
                    overrides = overrides.len(),
                    "loaded QA overrides"
                );
                qa_overrides.insert(year, overrides);
            }
            if let Some(dir) = &input.nir_directory {
                let results = load_nir_results(dir)?;
                info!(
                    year = year.as_str(),
                    samples = results.len(),
                    "loaded NIR results"
                );
                nir_results.insert(year, results);
            }
        }

        Ok(Self {
            config,
            georef_points,
            qa_overrides,
            nir_results,
        })
    }

    fn year_context(&self, year: HarvestYear) -> YearContext<'_> {
        YearContext {
            area_harvested_m2: self.config.area_harvested_m2,
            qa_overrides: self
                .qa_overrides
                .get(&year)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            georef_points: &self.georef_points,
            nir_results: self
                .nir_results
                .get(&year)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub years: Vec<YearReport>,
    pub total_rows: usize,
}

pub struct PipelineRun {
    pub dataframe: DataFrame,
    pub summary: PipelineSummary,
}

/// Full run: parse every configured workbook through the format registry,
/// then clean and unify.
pub fn run(ctx: &ExecutionContext) -> Result<PipelineRun> {
    let mut sheets = Vec::new();

    for (year, input) in ctx.config.year_inputs() {
        info!(
            year = year.as_str(),
            workbook = %input.workbook.display(),
            sheet = %input.sheet,
            "parsing harvest workbook"
        );
        let sheet = load_harvest_sheet(&input.workbook, &input.sheet)?;
        if sheet.year != year {
            return Err(PipelineError::Validation(format!(
                "workbook {} parsed as {} but is configured under {}",
                input.workbook.display(),
                sheet.year,
                year
            )));
        }
        sheets.push(sheet);
    }

    run_on_sheets(&sheets, ctx)
}

/// Cleans already-parsed sheets and unifies them. Split out of `run` so the
/// transform chain can be exercised without workbook files.
pub fn run_on_sheets(sheets: &[ParsedSheet], ctx: &ExecutionContext) -> Result<PipelineRun> {
    let mut frames = Vec::with_capacity(sheets.len());
    let mut reports = Vec::with_capacity(sheets.len());

    for sheet in sheets {
        let cleaner = cleaner_for(sheet.year);
        let output = cleaner.clean(sheet, &ctx.year_context(sheet.year))?;
        info!(
            year = sheet.year.as_str(),
            rows = output.report.rows_out,
            filtered = output.report.rows_filtered,
            "cleaned harvest year"
        );
        frames.push(output.df);
        reports.push(output.report);
    }

    let dataframe = unify_years(&frames)?;
    let total_rows = dataframe.height();

    Ok(PipelineRun {
        dataframe,
        summary: PipelineSummary {
            years: reports,
            total_rows,
        },
    })
}
