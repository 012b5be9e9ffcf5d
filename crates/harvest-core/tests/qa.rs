use polars::prelude::*;

use harvest_core::qa::{apply_qa_overrides, canonical_variable, QaOverride};
use harvest_sheets::HarvestYear;

fn qa(id: &str, variable: &str, value: Option<&str>) -> QaOverride {
    QaOverride {
        id: id.to_string(),
        variable: variable.to_string(),
        new_value: value.map(|v| v.to_string()),
    }
}

fn df_2017() -> DataFrame {
    df!(
        "sample_barcode" => &["CE1_Bio_SW_0", "CW2_Bio_WW_0"],
        "grain_field_gross_g" => &[Some(100.0f64), Some(200.0)],
        "crop_exists" => &[1i32, 1],
        "qa_notes" => &[None::<&str>, Some("check")],
    )
    .unwrap()
}

#[test]
fn overrides_set_float_flag_and_text_columns() {
    let mut df = df_2017();
    let overrides = vec![
        qa("CE1_Bio_SW_0", "Non-Oven dried grain mass (g)", Some("150")),
        qa("CW2_Bio_WW_0", "CropExists", Some("0")),
        qa(
            "CW2_Bio_WW_0",
            "Notes and comments by Ian Leslie October 2019",
            Some("winter kill"),
        ),
    ];

    let report =
        apply_qa_overrides(&mut df, HarvestYear::Hy2017, "sample_barcode", &overrides).unwrap();
    assert_eq!(report.applied, 3);
    assert!(report.unmatched.is_empty());

    let grain = df.column("grain_field_gross_g").unwrap().f64().unwrap();
    assert_eq!(grain.get(0), Some(150.0));
    assert_eq!(grain.get(1), Some(200.0));

    let crop_exists = df.column("crop_exists").unwrap().i32().unwrap();
    assert_eq!(crop_exists.get(0), Some(1));
    assert_eq!(crop_exists.get(1), Some(0));

    let notes = df.column("qa_notes").unwrap().str().unwrap();
    assert_eq!(notes.get(1), Some("winter kill"));
}

#[test]
fn empty_new_value_clears_the_cell() {
    let mut df = df_2017();
    let overrides = vec![qa("CW2_Bio_WW_0", "Non-Oven dried grain mass (g)", None)];

    let report =
        apply_qa_overrides(&mut df, HarvestYear::Hy2017, "sample_barcode", &overrides).unwrap();
    assert_eq!(report.applied, 1);

    let grain = df.column("grain_field_gross_g").unwrap().f64().unwrap();
    assert!(grain.get(1).is_none());
}

#[test]
fn na_token_also_clears_the_cell() {
    let mut df = df_2017();
    let overrides = vec![qa(
        "CE1_Bio_SW_0",
        "Non-Oven dried grain mass (g)",
        Some("N/A"),
    )];

    apply_qa_overrides(&mut df, HarvestYear::Hy2017, "sample_barcode", &overrides).unwrap();
    let grain = df.column("grain_field_gross_g").unwrap().f64().unwrap();
    assert!(grain.get(0).is_none());
}

#[test]
fn unmatched_ids_are_reported_not_fatal() {
    let mut df = df_2017();
    let overrides = vec![qa("CE999_Bio_SW_0", "CropExists", Some("0"))];

    let report =
        apply_qa_overrides(&mut df, HarvestYear::Hy2017, "sample_barcode", &overrides).unwrap();
    assert_eq!(report.applied, 0);
    assert_eq!(report.unmatched, vec!["CE999_Bio_SW_0".to_string()]);
}

#[test]
fn unknown_variable_is_a_validation_error() {
    let mut df = df_2017();
    let overrides = vec![qa("CE1_Bio_SW_0", "Grain test wieght (g)", Some("1"))];

    let err = apply_qa_overrides(&mut df, HarvestYear::Hy2017, "sample_barcode", &overrides)
        .unwrap_err();
    assert!(err.to_string().contains("unknown"));
}

#[test]
fn variables_translate_through_the_template_headers() {
    assert_eq!(
        canonical_variable(HarvestYear::Hy2018, "non-oven dried grain mass + bag (g)"),
        Some("grain_field_gross_g")
    );
    assert_eq!(
        canonical_variable(HarvestYear::Hy2019, "cropexists"),
        Some("crop_exists")
    );
    assert_eq!(canonical_variable(HarvestYear::Hy2019, "Lodging"), None);
}
