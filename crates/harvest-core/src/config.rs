use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use harvest_sheets::HarvestYear;

use crate::error::{PipelineError, Result};

/// Hand-harvest quadrat area in square meters (two 0.762 m rows, 1.6 m long).
pub const DEFAULT_AREA_HARVESTED_M2: f64 = 2.4384;

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_area_harvested_m2")]
    pub area_harvested_m2: f64,
    #[serde(default)]
    pub output: OutputConfig,
    pub georeference: GeoreferenceConfig,
    pub years: YearsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_output_basename")]
    pub basename: String,
    #[serde(default)]
    pub write_parquet: bool,
    #[serde(default = "default_true")]
    pub write_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            basename: default_output_basename(),
            write_parquet: false,
            write_summary: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoreferenceConfig {
    pub points: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YearsConfig {
    pub hy2017: YearInput,
    pub hy2018: YearInput,
    pub hy2019: YearInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YearInput {
    pub workbook: PathBuf,
    pub sheet: String,
    #[serde(default)]
    pub qa_overrides: Option<PathBuf>,
    #[serde(default)]
    pub nir_directory: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Release years in chronological order, which is also the row order of
    /// the published table.
    pub fn year_inputs(&self) -> [(HarvestYear, &YearInput); 3] {
        [
            (HarvestYear::Hy2017, &self.years.hy2017),
            (HarvestYear::Hy2018, &self.years.hy2018),
            (HarvestYear::Hy2019, &self.years.hy2019),
        ]
    }

    fn validate(&self) -> Result<()> {
        if !(self.area_harvested_m2 > 0.0) {
            return Err(PipelineError::Config(format!(
                "area_harvested_m2 must be positive, got {}",
                self.area_harvested_m2
            )));
        }
        if self.georeference.points.is_empty() {
            return Err(PipelineError::Config(
                "at least one georeference point file is required".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_area_harvested_m2() -> f64 {
    DEFAULT_AREA_HARVESTED_M2
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}

fn default_output_basename() -> String {
    "aggregated_yield_biomass_2017-2019".to_string()
}

fn default_true() -> bool {
    true
}
