use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use glob::glob;
use polars::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};

use harvest_sheets::is_na_token;

use crate::error::{PipelineError, Result};

const NIR_FILE_PATTERN: &str = "NIR*.csv";
const NIR_SAMPLE_MARKER: &str = "GP2019";

/// Grain composition for one sample as reported by the NIR lab, keyed by
/// the georeference id parsed out of the lab's sample id.
#[derive(Debug, Clone, Copy)]
pub struct NirResult {
    pub id2: i64,
    pub moisture_pct: Option<f64>,
    pub protein_dry_pct: Option<f64>,
    pub starch_dry_pct: Option<f64>,
    pub gluten_dry_pct: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NirRecord {
    #[serde(rename = "Sample_ID")]
    sample_id: String,
    #[serde(rename = "ProtDM")]
    protein: Option<String>,
    #[serde(rename = "Moisture")]
    moisture: Option<String>,
    #[serde(rename = "StarchDM")]
    starch: Option<String>,
    #[serde(rename = "WGlutDM")]
    gluten: Option<String>,
}

/// Whether a lab sample id belongs to this study's 2019 harvest. The lab
/// files also carry other projects' scans.
pub fn is_gp2019_sample(sample_id: &str) -> bool {
    sample_id.to_ascii_uppercase().contains(NIR_SAMPLE_MARKER)
}

/// The georeference id is the digits before the `GP2019` marker, with the
/// field prefix stripped, e.g. `CE105GP2019-11` -> 105.
pub fn nir_sample_georef_id(sample_id: &str) -> Result<i64> {
    let upper = sample_id.trim().to_ascii_uppercase();
    let (prefix, _) = upper.split_once("GP").ok_or_else(|| {
        PipelineError::Validation(format!("NIR sample id '{sample_id}' has no GP marker"))
    })?;

    let digits = prefix.replace("CE", "").replace("CW", "");
    digits.trim().parse::<i64>().map_err(|_| {
        PipelineError::Validation(format!(
            "NIR sample id '{sample_id}' has no parseable georeference id"
        ))
    })
}

pub fn load_nir_results(dir: &Path) -> Result<Vec<NirResult>> {
    let pattern = dir.join(NIR_FILE_PATTERN);
    let pattern = pattern.to_str().ok_or_else(|| {
        PipelineError::Validation(format!("non-UTF8 NIR directory path: {}", dir.display()))
    })?;

    let mut results = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut files = 0usize;

    for entry in glob(pattern)? {
        let path = entry.map_err(|err| PipelineError::Io(err.into_error()))?;
        files += 1;
        info!(file = %path.display(), "reading NIR results");

        let file = File::open(&path)?;
        let mut reader = csv::Reader::from_reader(file);
        for record in reader.deserialize() {
            let record: NirRecord = record?;
            if !is_gp2019_sample(&record.sample_id) {
                continue;
            }

            let id2 = nir_sample_georef_id(&record.sample_id)?;
            if !seen.insert(id2) {
                warn!(id2, sample_id = %record.sample_id, "duplicate NIR sample; keeping the first result");
                continue;
            }

            results.push(NirResult {
                id2,
                moisture_pct: parse_component(&record.sample_id, "Moisture", record.moisture)?,
                protein_dry_pct: parse_component(&record.sample_id, "ProtDM", record.protein)?,
                starch_dry_pct: parse_component(&record.sample_id, "StarchDM", record.starch)?,
                gluten_dry_pct: parse_component(&record.sample_id, "WGlutDM", record.gluten)?,
            });
        }
    }

    if files == 0 {
        warn!(dir = %dir.display(), "no NIR files matched {NIR_FILE_PATTERN}");
    }

    Ok(results)
}

fn parse_component(sample_id: &str, name: &str, value: Option<String>) -> Result<Option<f64>> {
    let Some(raw) = value else { return Ok(None) };
    if is_na_token(&raw) {
        return Ok(None);
    }
    raw.trim().parse::<f64>().map(Some).map_err(|_| {
        PipelineError::Validation(format!(
            "NIR sample '{sample_id}' has unparseable {name} value '{raw}'"
        ))
    })
}

/// Left-joins composition results onto a frame by its `id2` column; rows
/// without a lab result keep nulls. Returns the enriched frame and the
/// number of rows that matched.
pub fn attach_nir_results(df: &DataFrame, results: &[NirResult]) -> Result<(DataFrame, usize)> {
    let by_id: HashMap<i64, &NirResult> = results.iter().map(|result| (result.id2, result)).collect();
    let id2 = df.column("id2")?.i64()?;

    let len = df.height();
    let mut moisture = Vec::with_capacity(len);
    let mut protein = Vec::with_capacity(len);
    let mut starch = Vec::with_capacity(len);
    let mut gluten = Vec::with_capacity(len);
    let mut matched = 0usize;

    for idx in 0..len {
        match id2.get(idx).and_then(|value| by_id.get(&value)) {
            Some(nir) => {
                matched += 1;
                moisture.push(nir.moisture_pct);
                protein.push(nir.protein_dry_pct);
                starch.push(nir.starch_dry_pct);
                gluten.push(nir.gluten_dry_pct);
            }
            None => {
                moisture.push(None);
                protein.push(None);
                starch.push(None);
                gluten.push(None);
            }
        }
    }

    let mut output = df.clone();
    output.hstack_mut(&mut [
        Series::new("grain_moisture_pct".into(), moisture).into(),
        Series::new("grain_protein_pct".into(), protein).into(),
        Series::new("grain_starch_pct".into(), starch).into(),
        Series::new("grain_gluten_pct".into(), gluten).into(),
    ])?;

    Ok((output, matched))
}
