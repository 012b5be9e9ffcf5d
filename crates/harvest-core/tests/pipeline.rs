use std::collections::HashMap;

use polars::prelude::*;

use harvest_core::config::RunConfig;
use harvest_core::georef::GeorefPoint;
use harvest_core::nir::NirResult;
use harvest_core::pipelines::{run_on_sheets, ExecutionContext};
use harvest_sheets::{HarvestYear, ParsedSheet, SheetInfo};

const CONFIG: &str = r#"
area_harvested_m2 = 2.0

[georeference]
points = ["input/cookwest.geojson", "input/cookeast.geojson"]

[years.hy2017]
workbook = "input/hy2017.xlsx"
sheet = "Sheet1"

[years.hy2018]
workbook = "input/hy2018.xlsx"
sheet = "CAF Harvest Biomass Grain Data"

[years.hy2019]
workbook = "input/hy2019.xlsm"
sheet = "Harvest01_2019"
"#;

fn sheet(year: HarvestYear, df: DataFrame) -> ParsedSheet {
    ParsedSheet {
        year,
        info: SheetInfo {
            source: "fixture".to_string(),
            header_row: 0,
            rows_kept: df.height(),
            rows_skipped: 0,
        },
        df,
    }
}

fn context() -> ExecutionContext {
    let config = RunConfig::from_toml_str(CONFIG).unwrap();
    let georef_points = vec![
        GeorefPoint {
            id2: 1,
            latitude: 46.7812,
            longitude: -117.0905,
        },
        GeorefPoint {
            id2: 10,
            latitude: 46.7820,
            longitude: -117.0890,
        },
        GeorefPoint {
            id2: 105,
            latitude: 46.7830,
            longitude: -117.0870,
        },
    ];

    let mut nir_results = HashMap::new();
    nir_results.insert(
        HarvestYear::Hy2019,
        vec![NirResult {
            id2: 105,
            moisture_pct: Some(11.2),
            protein_dry_pct: Some(12.1),
            starch_dry_pct: Some(63.4),
            gluten_dry_pct: Some(29.8),
        }],
    );

    ExecutionContext {
        config,
        georef_points,
        qa_overrides: HashMap::new(),
        nir_results,
    }
}

fn sheets() -> Vec<ParsedSheet> {
    let df_2017 = df!(
        "sample_barcode" => &["CE1_Bio_SW_0"],
        "biomass_gross_g" => &[Some(1500.0f64)],
        "biomass_tare_g" => &[Some(100.0f64)],
        "grain_field_gross_g" => &[Some(320.0f64)],
        "grain_oven_gross_g" => &[Some(300.0f64)],
        "grain_tare_g" => &[Some(20.0f64)],
        "grain_moisture_pct" => &[Some(10.0f64)],
        "qa_notes" => &[None::<&str>],
    )
    .unwrap();

    let df_2018 = df!(
        "sample_barcode" => &["CE10_Bio_GB_0", "PS5_Bio_GB_0"],
        "biomass_gross_g" => &[Some(900.0f64), Some(800.0)],
        "biomass_tare_g" => &[Some(80.0f64), Some(80.0)],
        "grain_field_gross_g" => &[Some(210.0f64), Some(190.0)],
        "grain_tare_g" => &[Some(10.0f64), Some(10.0)],
        "field_notes" => &[Some("late harvest"), None::<&str>],
        "qa_notes" => &[None::<&str>, None],
    )
    .unwrap();

    let df_2019 = df!(
        "sample_barcode" => &["ce105_Harvest01_2019_SW", "L1_Harvest01_2019_SW"],
        "project_id" => &[Some("GP"), Some("ART")],
        "biomass_net_g" => &[Some(640.0f64), Some(500.0)],
        "grain_field_net_g" => &[Some(210.0f64), Some(180.0)],
        "field_notes" => &[None::<&str>, None],
        "qa_notes" => &[None::<&str>, None],
    )
    .unwrap();

    vec![
        sheet(HarvestYear::Hy2017, df_2017),
        sheet(HarvestYear::Hy2018, df_2018),
        sheet(HarvestYear::Hy2019, df_2019),
    ]
}

#[test]
fn three_years_unify_into_one_published_table() {
    let ctx = context();
    let run = run_on_sheets(&sheets(), &ctx).unwrap();

    assert_eq!(run.summary.years.len(), 3);
    assert_eq!(run.summary.total_rows, 3);
    assert_eq!(run.dataframe.height(), 3);

    let years: Vec<i32> = run
        .summary
        .years
        .iter()
        .map(|report| report.year)
        .collect();
    assert_eq!(years, vec![2017, 2018, 2019]);

    let published = run.dataframe.column("HarvestYear").unwrap().i32().unwrap();
    assert_eq!(published.get(0), Some(2017));
    assert_eq!(published.get(1), Some(2018));
    assert_eq!(published.get(2), Some(2019));

    // each year's filter/join counters surface in the summary
    assert_eq!(run.summary.years[1].rows_filtered, 1);
    assert_eq!(run.summary.years[2].nir_samples_matched, Some(1));

    let latitude = run.dataframe.column("Latitude").unwrap().f64().unwrap();
    assert!(latitude.get(0).is_some());

    let moisture = run.dataframe.column("GrainMoisture").unwrap().f64().unwrap();
    assert_eq!(moisture.get(0), Some(10.0));
    assert!(moisture.get(1).is_none());
    assert_eq!(moisture.get(2), Some(11.2));

    let comments = run.dataframe.column("Comments").unwrap().str().unwrap();
    assert_eq!(comments.get(1), Some("late harvest"));
}
