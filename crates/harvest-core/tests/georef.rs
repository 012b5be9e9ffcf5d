use polars::prelude::*;

use harvest_core::georef::{
    attach_coordinates, merge_georef_points, parse_georef_geojson, GeorefPoint,
};

const COOK_WEST: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "ID2": 1, "Strip": 1, "Field": "CW" },
            "geometry": { "type": "Point", "coordinates": [-117.0905, 46.7812] }
        },
        {
            "type": "Feature",
            "properties": { "ID2": "2", "Strip": 1, "Field": "CW" },
            "geometry": { "type": "Point", "coordinates": [-117.0901, 46.7815] }
        }
    ]
}"#;

#[test]
fn feature_collections_parse_into_points() {
    let points = parse_georef_geojson(COOK_WEST).unwrap();
    assert_eq!(points.len(), 2);

    assert_eq!(points[0].id2, 1);
    assert!((points[0].longitude - -117.0905).abs() < 1e-9);
    assert!((points[0].latitude - 46.7812).abs() < 1e-9);

    // string-typed ID2 properties still parse
    assert_eq!(points[1].id2, 2);
}

#[test]
fn missing_id2_is_rejected() {
    let content = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "Strip": 1 },
                "geometry": { "type": "Point", "coordinates": [-117.0, 46.7] }
            }
        ]
    }"#;
    assert!(parse_georef_geojson(content).is_err());
}

#[test]
fn overlapping_survey_exports_are_rejected() {
    let west = vec![GeorefPoint {
        id2: 1,
        latitude: 46.78,
        longitude: -117.09,
    }];
    let east = vec![GeorefPoint {
        id2: 1,
        latitude: 46.77,
        longitude: -117.07,
    }];

    assert!(merge_georef_points(vec![west.clone(), east]).is_err());
    assert_eq!(merge_georef_points(vec![west]).unwrap().len(), 1);
}

#[test]
fn attach_drops_rows_without_a_surveyed_point() {
    let df = df!(
        "id2" => &[1i64, 2, 99],
        "sample_id" => &["CE1_Bio_SW_0", "CE2_Bio_SW_0", "CE99_Bio_SW_0"],
    )
    .unwrap();

    let points = parse_georef_geojson(COOK_WEST).unwrap();
    let (located, dropped) = attach_coordinates(&df, &points).unwrap();

    assert_eq!(dropped, 1);
    assert_eq!(located.height(), 2);

    let latitude = located.column("latitude").unwrap().f64().unwrap();
    assert!((latitude.get(0).unwrap() - 46.7812).abs() < 1e-9);

    let ids = located.column("sample_id").unwrap().str().unwrap();
    assert_eq!(ids.get(1), Some("CE2_Bio_SW_0"));
}
