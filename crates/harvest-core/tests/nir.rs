use polars::prelude::*;

use harvest_core::nir::{
    attach_nir_results, is_gp2019_sample, nir_sample_georef_id, NirResult,
};

fn result(id2: i64, moisture: f64) -> NirResult {
    NirResult {
        id2,
        moisture_pct: Some(moisture),
        protein_dry_pct: Some(12.1),
        starch_dry_pct: Some(63.4),
        gluten_dry_pct: None,
    }
}

#[test]
fn sample_ids_parse_to_georef_ids() {
    assert_eq!(nir_sample_georef_id("CE105GP2019-11").unwrap(), 105);
    assert_eq!(nir_sample_georef_id("cw305gp2019_2").unwrap(), 305);
    assert_eq!(nir_sample_georef_id(" CE7GP2019 ").unwrap(), 7);

    assert!(nir_sample_georef_id("WSU-CHECK-1").is_err());
    assert!(nir_sample_georef_id("CEGP2019-1").is_err());
}

#[test]
fn only_gp2019_scans_belong_to_this_study() {
    assert!(is_gp2019_sample("ce105gp2019-11"));
    assert!(!is_gp2019_sample("CE105GP2018-11"));
    assert!(!is_gp2019_sample("WSU-CHECK-1"));
}

#[test]
fn attach_is_a_left_join_on_id2() {
    let df = df!(
        "id2" => &[105i64, 7],
        "sample_id" => &["CE105_HARVEST01_2019_SW", "CE7_HARVEST01_2019_SW"],
    )
    .unwrap();

    let (joined, matched) = attach_nir_results(&df, &[result(105, 11.2)]).unwrap();
    assert_eq!(matched, 1);
    assert_eq!(joined.height(), 2);

    let moisture = joined.column("grain_moisture_pct").unwrap().f64().unwrap();
    assert_eq!(moisture.get(0), Some(11.2));
    assert!(moisture.get(1).is_none());

    let protein = joined.column("grain_protein_pct").unwrap().f64().unwrap();
    assert_eq!(protein.get(0), Some(12.1));

    let gluten = joined.column("grain_gluten_pct").unwrap().f64().unwrap();
    assert!(gluten.get(0).is_none());
}
