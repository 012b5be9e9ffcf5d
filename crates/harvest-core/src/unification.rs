use once_cell::sync::Lazy;
use polars::prelude::*;

use crate::error::{PipelineError, Result};

/// One column of the published table: the internal name the cleaners emit,
/// the published header, and the expected dtype.
pub struct OutputColumn {
    pub internal: &'static str,
    pub published: &'static str,
    pub dtype: DataType,
}

/// Published column order. Years that never measured a column (2018 has no
/// moisture, only 2019 has composition) are null-filled during alignment.
pub static OUTPUT_SCHEMA: Lazy<Vec<OutputColumn>> = Lazy::new(|| {
    vec![
        OutputColumn {
            internal: "harvest_year",
            published: "HarvestYear",
            dtype: DataType::Int32,
        },
        OutputColumn {
            internal: "id2",
            published: "ID2",
            dtype: DataType::Int64,
        },
        OutputColumn {
            internal: "latitude",
            published: "Latitude",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "longitude",
            published: "Longitude",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "sample_id",
            published: "SampleID",
            dtype: DataType::String,
        },
        OutputColumn {
            internal: "crop",
            published: "Crop",
            dtype: DataType::String,
        },
        OutputColumn {
            internal: "grain_yield_dry_per_area",
            published: "GrainYieldDryPerArea",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "biomass_dry_per_area",
            published: "BiomassDryPerArea",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "grain_moisture_pct",
            published: "GrainMoisture",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "grain_yield_std_per_area",
            published: "GrainYield125PerArea",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "grain_protein_pct",
            published: "GrainProtein",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "grain_starch_pct",
            published: "GrainStarch",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "grain_gluten_pct",
            published: "GrainGluten",
            dtype: DataType::Float64,
        },
        OutputColumn {
            internal: "crop_exists",
            published: "CropExists",
            dtype: DataType::Int32,
        },
        OutputColumn {
            internal: "comments",
            published: "Comments",
            dtype: DataType::String,
        },
    ]
});

/// Aligns each per-year frame to the published schema and stacks them in
/// the order given.
pub fn unify_years(frames: &[DataFrame]) -> Result<DataFrame> {
    if frames.is_empty() {
        return Err(PipelineError::Validation(
            "no per-year frames to unify".to_string(),
        ));
    }

    let mut aligned = Vec::with_capacity(frames.len());
    for frame in frames {
        let height = frame.height();
        let mut columns: Vec<Column> = Vec::with_capacity(OUTPUT_SCHEMA.len());

        for column in OUTPUT_SCHEMA.iter() {
            match frame.column(column.internal) {
                Ok(existing) => {
                    let series = existing
                        .as_materialized_series()
                        .clone()
                        .with_name(column.published.into());
                    if series.dtype() != &column.dtype {
                        return Err(PipelineError::Validation(format!(
                            "column '{}' has dtype {} but the published table expects {}",
                            column.internal,
                            series.dtype(),
                            column.dtype
                        )));
                    }
                    columns.push(series.into());
                }
                Err(_) => columns.push(
                    Series::full_null(column.published.into(), height, &column.dtype).into(),
                ),
            }
        }

        aligned.push(DataFrame::new(columns)?);
    }

    let mut iter = aligned.into_iter();
    let mut combined = iter.next().expect("at least one aligned frame");
    for frame in iter {
        combined.vstack_mut(&frame)?;
    }

    Ok(combined)
}
