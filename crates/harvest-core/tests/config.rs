use harvest_core::config::{RunConfig, DEFAULT_AREA_HARVESTED_M2};

const MINIMAL: &str = r#"
[georeference]
points = ["input/cookwest.geojson"]

[years.hy2017]
workbook = "input/hy2017.xlsx"
sheet = "Sheet1"

[years.hy2018]
workbook = "input/hy2018.xlsx"
sheet = "CAF Harvest Biomass Grain Data"

[years.hy2019]
workbook = "input/hy2019.xlsm"
sheet = "Harvest01_2019"
qa_overrides = "input/HY2019_QA.csv"
nir_directory = "input/HY2019_NIR"
"#;

#[test]
fn minimal_config_fills_defaults() {
    let config = RunConfig::from_toml_str(MINIMAL).unwrap();

    assert_eq!(config.area_harvested_m2, DEFAULT_AREA_HARVESTED_M2);
    assert_eq!(config.output.directory.to_str(), Some("output"));
    assert!(!config.output.write_parquet);
    assert!(config.output.write_summary);

    assert!(config.years.hy2017.qa_overrides.is_none());
    assert!(config.years.hy2019.nir_directory.is_some());

    let years: Vec<i32> = config
        .year_inputs()
        .iter()
        .map(|(year, _)| year.as_i32())
        .collect();
    assert_eq!(years, vec![2017, 2018, 2019]);
}

#[test]
fn zero_area_is_rejected() {
    let content = format!("area_harvested_m2 = 0.0\n{MINIMAL}");
    let err = RunConfig::from_toml_str(&content).unwrap_err();
    assert!(err.to_string().contains("area_harvested_m2"));
}

#[test]
fn missing_year_table_is_rejected() {
    let content = r#"
[georeference]
points = ["input/cookwest.geojson"]

[years.hy2017]
workbook = "input/hy2017.xlsx"
sheet = "Sheet1"
"#;
    assert!(RunConfig::from_toml_str(content).is_err());
}

#[test]
fn empty_georeference_list_is_rejected() {
    let content = MINIMAL.replace(
        r#"points = ["input/cookwest.geojson"]"#,
        "points = []",
    );
    assert!(RunConfig::from_toml_str(&content).is_err());
}
