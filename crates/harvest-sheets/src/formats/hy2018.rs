use crate::errors::ParserError;
use crate::model::{Cell, HarvestYear, ParsedSheet, SheetInfo};
use crate::registry::HarvestSheetParser;

use super::common::{extract_table, ColumnKind, ColumnSpec};

/// The 2018 biomass/grain-mass template. Masses are recorded gross of their
/// bags; no NIR analysis was run on the 2018 garbanzos, so there is no
/// moisture column. The workbook mixes in samples from other studies, which
/// downstream cleaning filters by the barcode field prefix.
pub struct Hy2018Parser;

impl Hy2018Parser {
    pub(crate) const NAME: &'static str = "HY2018_BIO_GRAIN_MASSES";
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        raw: "total biomass bag barcode ID",
        canonical: "sample_barcode",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        raw: "dried total biomass mass + bag + residue bag + grain bag (g)",
        canonical: "biomass_gross_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "average dried empty total biomass bag +  grain bag + residue bag  (g)",
        canonical: "biomass_tare_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "non-oven dried grain mass + bag (g)",
        canonical: "grain_field_gross_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "average empty dried grain bag mass (g)",
        canonical: "grain_tare_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "notes",
        canonical: "field_notes",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        raw: "Notes by Ian Leslie 10/22/2019",
        canonical: "qa_notes",
        kind: ColumnKind::Text,
    },
];

impl HarvestSheetParser for Hy2018Parser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn year(&self) -> HarvestYear {
        HarvestYear::Hy2018
    }

    fn parse(&self, grid: &[Vec<Cell>], source: &str) -> Result<ParsedSheet, ParserError> {
        let table = extract_table(Self::NAME, grid, COLUMNS)?;

        Ok(ParsedSheet {
            year: HarvestYear::Hy2018,
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
