use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use geojson::{GeoJson, Value as GeoJsonValue};
use polars::prelude::*;
use serde_json::Value;
use tracing::info;

use crate::error::{PipelineError, Result};

/// One surveyed georeference point from the Cook field GeoJSON exports.
#[derive(Debug, Clone, Copy)]
pub struct GeorefPoint {
    pub id2: i64,
    pub latitude: f64,
    pub longitude: f64,
}

pub fn load_georef_points(paths: &[PathBuf]) -> Result<Vec<GeorefPoint>> {
    let mut per_file = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(path)?;
        let points = parse_georef_geojson(&content)?;
        info!(file = %path.display(), points = points.len(), "loaded georeference points");
        per_file.push(points);
    }
    merge_georef_points(per_file)
}

/// Merges the per-field point sets. The id space is shared across both
/// fields, so a duplicate id means the survey exports overlap.
pub fn merge_georef_points(per_file: Vec<Vec<GeorefPoint>>) -> Result<Vec<GeorefPoint>> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut merged = Vec::new();

    for points in per_file {
        for point in points {
            if !seen.insert(point.id2) {
                return Err(PipelineError::Validation(format!(
                    "duplicate georeference id {} across point files",
                    point.id2
                )));
            }
            merged.push(point);
        }
    }

    Ok(merged)
}

pub fn parse_georef_geojson(content: &str) -> Result<Vec<GeorefPoint>> {
    let geojson: GeoJson = content.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(PipelineError::Validation(
            "georeference file is not a FeatureCollection".to_string(),
        ));
    };

    let mut points = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let id2 = feature
            .properties
            .as_ref()
            .and_then(|properties| properties.get("ID2"))
            .and_then(json_to_i64)
            .ok_or_else(|| {
                PipelineError::Validation(
                    "georeference feature is missing an integer ID2 property".to_string(),
                )
            })?;

        let geometry = feature.geometry.as_ref().ok_or_else(|| {
            PipelineError::Validation(format!("georeference feature {id2} has no geometry"))
        })?;
        let GeoJsonValue::Point(coordinates) = &geometry.value else {
            return Err(PipelineError::Validation(format!(
                "georeference feature {id2} is not a point"
            )));
        };
        if coordinates.len() < 2 {
            return Err(PipelineError::Validation(format!(
                "georeference feature {id2} has incomplete coordinates"
            )));
        }

        points.push(GeorefPoint {
            id2,
            longitude: coordinates[0],
            latitude: coordinates[1],
        });
    }

    Ok(points)
}

fn json_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Keeps only rows whose `id2` has a surveyed point and adds their
/// coordinates. Published releases require coordinates, so unmatched rows
/// are dropped; the count is returned for the run report.
pub fn attach_coordinates(df: &DataFrame, points: &[GeorefPoint]) -> Result<(DataFrame, usize)> {
    let by_id: HashMap<i64, &GeorefPoint> = points.iter().map(|point| (point.id2, point)).collect();
    let id2 = df.column("id2")?.i64()?;

    let len = df.height();
    let mut keep = Vec::with_capacity(len);
    let mut latitude = Vec::new();
    let mut longitude = Vec::new();

    for idx in 0..len {
        match id2.get(idx).and_then(|value| by_id.get(&value)) {
            Some(point) => {
                keep.push(true);
                latitude.push(point.latitude);
                longitude.push(point.longitude);
            }
            None => keep.push(false),
        }
    }

    let dropped = keep.iter().filter(|kept| !**kept).count();
    let mask: BooleanChunked = keep.into_iter().collect();
    let mut output = df.filter(&mask)?;
    output.hstack_mut(&mut [
        Series::new("latitude".into(), latitude).into(),
        Series::new("longitude".into(), longitude).into(),
    ])?;

    Ok((output, dropped))
}
