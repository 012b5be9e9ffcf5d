mod year2017;
mod year2018;
mod year2019;

pub use year2017::Hy2017Cleaner;
pub use year2018::Hy2018Cleaner;
pub use year2019::Hy2019Cleaner;

use once_cell::sync::Lazy;
use polars::prelude::DataFrame;
use serde::Serialize;

use harvest_sheets::{HarvestYear, ParsedSheet};

use crate::error::Result;
use crate::georef::GeorefPoint;
use crate::nir::NirResult;
use crate::qa::QaOverride;

/// Reference inputs a year cleaner needs besides its parsed sheet.
pub struct YearContext<'a> {
    pub area_harvested_m2: f64,
    pub qa_overrides: &'a [QaOverride],
    pub georef_points: &'a [GeorefPoint],
    pub nir_results: &'a [NirResult],
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct YearReport {
    pub year: i32,
    pub rows_parsed: usize,
    pub rows_skipped_in_sheet: usize,
    pub rows_filtered: usize,
    pub qa_overrides_applied: usize,
    pub qa_overrides_unmatched: usize,
    pub nir_samples_matched: Option<usize>,
    pub rows_missing_georef: usize,
    pub rows_out: usize,
}

pub struct YearOutput {
    pub df: DataFrame,
    pub report: YearReport,
}

pub trait YearCleaner: Send + Sync {
    fn year(&self) -> HarvestYear;
    fn clean(&self, sheet: &ParsedSheet, ctx: &YearContext<'_>) -> Result<YearOutput>;
}

static CLEANERS: Lazy<Vec<&'static dyn YearCleaner>> = Lazy::new(|| {
    vec![
        &Hy2017Cleaner as &dyn YearCleaner,
        &Hy2018Cleaner as &dyn YearCleaner,
        &Hy2019Cleaner as &dyn YearCleaner,
    ]
});

pub fn all_year_cleaners() -> &'static [&'static dyn YearCleaner] {
    CLEANERS.as_slice()
}

pub fn cleaner_for(year: HarvestYear) -> &'static dyn YearCleaner {
    all_year_cleaners()
        .iter()
        .copied()
        .find(|cleaner| cleaner.year() == year)
        .expect("every harvest year has a registered cleaner")
}

/// Joins field notes and the QA reviewer's notes the way the published
/// releases format them. A missing side is omitted; both missing is null.
pub(crate) fn merge_comments(field_notes: Option<&str>, qa_notes: Option<&str>) -> Option<String> {
    let field = field_notes.map(str::trim).filter(|text| !text.is_empty());
    let qa = qa_notes.map(str::trim).filter(|text| !text.is_empty());

    match (field, qa) {
        (Some(field), Some(qa)) => Some(format!("{field}| {qa}")),
        (Some(field), None) => Some(field.to_string()),
        (None, Some(qa)) => Some(qa.to_string()),
        (None, None) => None,
    }
}
