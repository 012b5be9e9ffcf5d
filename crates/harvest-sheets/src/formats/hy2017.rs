use crate::errors::ParserError;
use crate::model::{Cell, HarvestYear, ParsedSheet, SheetInfo};
use crate::registry::HarvestSheetParser;

use super::common::{extract_table, ColumnKind, ColumnSpec};

/// The 2017 crop-biomass template. Grain was oven-dried before NIR analysis
/// this year, so both a field mass and an oven mass are recorded and the
/// moisture column refers to the oven-dried grain.
pub struct Hy2017Parser;

impl Hy2017Parser {
    pub(crate) const NAME: &'static str = "HY2017_CROP_BIOMASS";
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        raw: "Total Biomass Barcode ID",
        canonical: "sample_barcode",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        raw: "Dried Total Biomass mass + bag(g) + bags inside",
        canonical: "biomass_gross_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "Average Dried total biomass bag + empty grain bag & empty residue bag inside mass (g)",
        canonical: "biomass_tare_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "Non-Oven dried grain mass (g)",
        canonical: "grain_field_gross_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "Oven dried grain mass (g)",
        canonical: "grain_oven_gross_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "Average Non-Oven dried grain bag mass (g)",
        canonical: "grain_tare_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "Moisture",
        canonical: "grain_moisture_pct",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "Notes and comments by Ian Leslie October 2019",
        canonical: "qa_notes",
        kind: ColumnKind::Text,
    },
];

impl HarvestSheetParser for Hy2017Parser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn year(&self) -> HarvestYear {
        HarvestYear::Hy2017
    }

    fn parse(&self, grid: &[Vec<Cell>], source: &str) -> Result<ParsedSheet, ParserError> {
        let table = extract_table(Self::NAME, grid, COLUMNS)?;

        Ok(ParsedSheet {
            year: HarvestYear::Hy2017,
            info: SheetInfo {
                source: source.to_string(),
                header_row: table.header_row,
                rows_kept: table.rows_kept,
                rows_skipped: table.rows_skipped,
            },
            df: table.df,
        })
    }
}
