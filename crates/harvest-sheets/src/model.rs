use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarvestYear {
    Hy2017,
    Hy2018,
    Hy2019,
}

impl HarvestYear {
    pub fn as_i32(&self) -> i32 {
        match self {
            HarvestYear::Hy2017 => 2017,
            HarvestYear::Hy2018 => 2018,
            HarvestYear::Hy2019 => 2019,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestYear::Hy2017 => "HY2017",
            HarvestYear::Hy2018 => "HY2018",
            HarvestYear::Hy2019 => "HY2019",
        }
    }
}

impl fmt::Display for HarvestYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for HarvestYear {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            2017 => Ok(HarvestYear::Hy2017),
            2018 => Ok(HarvestYear::Hy2018),
            2019 => Ok(HarvestYear::Hy2019),
            other => Err(format!("no harvest template for year {other}")),
        }
    }
}

/// The two halves of the Cook Agronomy Farm, encoded as the `CE`/`CW`
/// prefix of the first barcode segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CookField {
    East,
    West,
}

impl CookField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookField::East => "CE",
            CookField::West => "CW",
        }
    }

    pub fn split_prefix(segment: &str) -> Option<(CookField, &str)> {
        segment
            .strip_prefix("CE")
            .map(|rest| (CookField::East, rest))
            .or_else(|| {
                segment
                    .strip_prefix("CW")
                    .map(|rest| (CookField::West, rest))
            })
    }
}

impl fmt::Display for CookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed total-biomass bag barcode, e.g. `CW101_Bio_SW_0`. The first
/// segment carries the field prefix and the integer georeference id; the
/// crop code sits at segment 2 in the 2017/2018 templates and segment 3 in
/// the 2019 template.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBarcode {
    pub raw: String,
    pub field: CookField,
    pub id2: i64,
    pub crop: String,
}

impl SampleBarcode {
    pub fn parse(raw: &str, crop_segment: usize) -> Result<Self, String> {
        let segments: Vec<&str> = raw.split('_').collect();
        let position = segments
            .first()
            .map(|segment| segment.trim())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| format!("barcode '{raw}' has no position segment"))?;

        let (field, digits) = CookField::split_prefix(position)
            .ok_or_else(|| format!("barcode '{raw}' does not start with a CE/CW field prefix"))?;

        let id2 = digits.parse::<i64>().map_err(|_| {
            format!("barcode '{raw}' has no numeric georeference id after the field prefix")
        })?;

        let crop = segments
            .get(crop_segment)
            .map(|segment| segment.trim())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| format!("barcode '{raw}' has no crop code in segment {crop_segment}"))?;

        Ok(Self {
            raw: raw.to_string(),
            field,
            id2,
            crop: crop.to_string(),
        })
    }

    /// Whether the position segment names one of the Cook fields. Used for
    /// row filtering before the stricter `parse`.
    pub fn has_cook_field(raw: &str) -> bool {
        raw.split('_')
            .next()
            .map(|segment| segment.contains("CE") || segment.contains("CW"))
            .unwrap_or(false)
    }
}

/// A single worksheet cell after workbook decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetInfo {
    pub source: String,
    pub header_row: usize,
    pub rows_kept: usize,
    pub rows_skipped: usize,
}

#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub year: HarvestYear,
    pub info: SheetInfo,
    pub df: DataFrame,
}
