use crate::errors::ParserError;
use crate::model::{Cell, HarvestYear, ParsedSheet, SheetInfo};
use crate::registry::HarvestSheetParser;

use super::common::{extract_table, ColumnKind, ColumnSpec};

/// The 2019 multi-project harvest template. Masses are recorded net of
/// bags, a `Project ID` column distinguishes the studies sharing the
/// workbook, and grain moisture arrives separately from the NIR lab files.
///
/// The barcode anchor matches the 2018 template case-insensitively; the
/// registry tells the two apart by their remaining required columns.
pub struct Hy2019Parser;

impl Hy2019Parser {
    pub(crate) const NAME: &'static str = "HY2019_HARVEST01";
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        raw: "Total biomass bag barcode ID",
        canonical: "sample_barcode",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        raw: "Project ID",
        canonical: "project_id",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        raw: "Dried total biomass (g)",
        canonical: "biomass_net_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "Non-oven-dried grain (g)",
        canonical: "grain_field_net_g",
        kind: ColumnKind::Float,
    },
    ColumnSpec {
        raw: "Notes",
        canonical: "field_notes",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        raw: "Notes made by Ian Leslie",
        canonical: "qa_notes",
        kind: ColumnKind::Text,
    },
];

impl HarvestSheetParser for Hy2019Parser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn year(&self) -> HarvestYear {
        HarvestYear::Hy2019
    }

    fn parse(&self, grid: &[Vec<Cell>], source: &str) -> Result<ParsedSheet, ParserError> {
        let table = extract_table(Self::NAME, grid, COLUMNS)?;

        Ok(ParsedSheet {
            year: HarvestYear::Hy2019,
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
