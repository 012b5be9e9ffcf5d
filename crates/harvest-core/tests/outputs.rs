use std::fs;

use chrono::NaiveDate;
use polars::prelude::*;

use harvest_core::config::OutputConfig;
use harvest_core::outputs::{output_file_name, write_unified_output};
use harvest_core::pipelines::PipelineSummary;
use harvest_core::years::YearReport;

#[test]
fn file_names_carry_the_release_stamp() {
    let stamp = NaiveDate::from_ymd_opt(2020, 2, 3).unwrap();
    assert_eq!(
        output_file_name("aggregated_yield_biomass_2017-2019", stamp, "csv"),
        "aggregated_yield_biomass_2017-2019_20200203.csv"
    );
}

#[test]
fn run_writes_csv_and_summary_sidecar() {
    let dir = std::env::temp_dir().join(format!("harvest-outputs-{}", std::process::id()));
    let config = OutputConfig {
        directory: dir.clone(),
        basename: "unified".to_string(),
        write_parquet: false,
        write_summary: true,
    };

    let df = df!(
        "HarvestYear" => &[2017i32],
        "ID2" => &[1i64],
        "Comments" => &[None::<&str>],
    )
    .unwrap();
    let summary = PipelineSummary {
        years: vec![YearReport {
            year: 2017,
            rows_parsed: 1,
            rows_out: 1,
            ..Default::default()
        }],
        total_rows: 1,
    };

    let stamp = NaiveDate::from_ymd_opt(2020, 2, 3).unwrap();
    let written = write_unified_output(&df, &summary, &config, stamp).unwrap();

    assert!(written.csv_path.ends_with("unified_20200203.csv"));
    assert!(written.parquet_path.is_none());

    let content = fs::read_to_string(&written.csv_path).unwrap();
    assert!(content.starts_with("HarvestYear,ID2,Comments"));

    let summary_json = fs::read_to_string(written.summary_path.unwrap()).unwrap();
    assert!(summary_json.contains("\"total_rows\": 1"));
    assert!(summary_json.contains("generated_at"));

    fs::remove_dir_all(&dir).ok();
}
