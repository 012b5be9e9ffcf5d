use std::fs::{self, File};
use std::path::PathBuf;

use chrono::NaiveDate;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter};
use polars::prelude::*;
use serde_json::json;
use tracing::info;

use crate::config::OutputConfig;
use crate::error::Result;
use crate::pipelines::PipelineSummary;

pub struct WrittenOutput {
    pub csv_path: PathBuf,
    pub parquet_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
}

pub fn output_file_name(basename: &str, stamp: NaiveDate, extension: &str) -> String {
    format!("{basename}_{}.{extension}", stamp.format("%Y%m%d"))
}

/// Writes the unified table (CSV always, Parquet when configured) plus a
/// machine-readable run summary next to it.
pub fn write_unified_output(
    df: &DataFrame,
    summary: &PipelineSummary,
    config: &OutputConfig,
    stamp: NaiveDate,
) -> Result<WrittenOutput> {
    fs::create_dir_all(&config.directory)?;

    let csv_path = config
        .directory
        .join(output_file_name(&config.basename, stamp, "csv"));
    let mut file = File::create(&csv_path)?;
    let mut clone = df.clone();
    CsvWriter::new(&mut file).finish(&mut clone)?;
    info!(path = %csv_path.display(), rows = df.height(), "wrote unified harvest table");

    let parquet_path = if config.write_parquet {
        let path = config
            .directory
            .join(output_file_name(&config.basename, stamp, "parquet"));
        let mut file = File::create(&path)?;
        let mut clone = df.clone();
        ParquetWriter::new(&mut file)
            .with_compression(ParquetCompression::Zstd(None))
            .finish(&mut clone)?;
        info!(path = %path.display(), "wrote parquet copy");
        Some(path)
    } else {
        None
    };

    let summary_path = if config.write_summary {
        let path = config
            .directory
            .join(output_file_name(&config.basename, stamp, "run.json"));
        let payload = json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "summary": summary,
        });
        fs::write(&path, serde_json::to_vec_pretty(&payload)?)?;
        Some(path)
    } else {
        None
    };

    Ok(WrittenOutput {
        csv_path,
        parquet_path,
        summary_path,
    })
}
