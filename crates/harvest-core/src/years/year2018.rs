use polars::prelude::*;

use harvest_sheets::{HarvestYear, ParsedSheet, SampleBarcode};

use crate::calculator::{mass_per_area, net_mass_g};
use crate::error::{PipelineError, Result};
use crate::georef::attach_coordinates;
use crate::qa::apply_qa_overrides;

use super::{merge_comments, YearCleaner, YearContext, YearOutput, YearReport};

const CROP_SEGMENT: usize = 2;

/// The 2018 workbook mixes in other studies' samples; only barcodes naming
/// a Cook field belong to this dataset. No NIR ran on the 2018 garbanzos,
/// so the moisture-dependent columns stay absent and unification null-fills
/// them.
pub struct Hy2018Cleaner;

impl YearCleaner for Hy2018Cleaner {
    fn year(&self) -> HarvestYear {
        HarvestYear::Hy2018
    }

    fn clean(&self, sheet: &ParsedSheet, ctx: &YearContext<'_>) -> Result<YearOutput> {
        let mut df = sheet.df.clone();
        let rows = df.height();

        df.hstack_mut(&mut [Series::new("crop_exists".into(), vec![1i32; rows]).into()])?;
        let qa = apply_qa_overrides(
            &mut df,
            HarvestYear::Hy2018,
            "sample_barcode",
            ctx.qa_overrides,
        )?;

        let barcodes = df.column("sample_barcode")?.str()?;
        let biomass_gross = df.column("biomass_gross_g")?.f64()?;
        let biomass_tare = df.column("biomass_tare_g")?.f64()?;
        let grain_field_gross = df.column("grain_field_gross_g")?.f64()?;
        let grain_tare = df.column("grain_tare_g")?.f64()?;
        let field_notes = df.column("field_notes")?.str()?;
        let qa_notes = df.column("qa_notes")?.str()?;
        let crop_exists = df.column("crop_exists")?.i32()?;

        let mut harvest_year = Vec::new();
        let mut id2 = Vec::new();
        let mut sample_id = Vec::new();
        let mut crop = Vec::new();
        let mut grain_yield_dry = Vec::new();
        let mut biomass_dry = Vec::new();
        let mut crop_exists_out = Vec::new();
        let mut comments = Vec::new();
        let mut rows_filtered = 0usize;

        for idx in 0..rows {
            let raw = barcodes.get(idx).ok_or_else(|| {
                PipelineError::Processing(format!("2018 row {idx} has no sample barcode"))
            })?;

            if !SampleBarcode::has_cook_field(raw) {
                rows_filtered += 1;
                continue;
            }

            let barcode = SampleBarcode::parse(raw, CROP_SEGMENT)
                .map_err(|err| PipelineError::Processing(format!("2018 row {idx}: {err}")))?;

            harvest_year.push(HarvestYear::Hy2018.as_i32());
            id2.push(barcode.id2);
            sample_id.push(raw.to_string());
            crop.push(barcode.crop);
            grain_yield_dry.push(mass_per_area(
                net_mass_g(grain_field_gross.get(idx), grain_tare.get(idx)),
                ctx.area_harvested_m2,
            ));
            biomass_dry.push(mass_per_area(
                net_mass_g(biomass_gross.get(idx), biomass_tare.get(idx)),
                ctx.area_harvested_m2,
            ));
            crop_exists_out.push(crop_exists.get(idx));
            comments.push(merge_comments(field_notes.get(idx), qa_notes.get(idx)));
        }

        let unified = DataFrame::new(vec![
            Series::new("harvest_year".into(), harvest_year).into(),
            Series::new("id2".into(), id2).into(),
            Series::new("sample_id".into(), sample_id).into(),
            Series::new("crop".into(), crop).into(),
            Series::new("grain_yield_dry_per_area".into(), grain_yield_dry).into(),
            Series::new("biomass_dry_per_area".into(), biomass_dry).into(),
            Series::new("crop_exists".into(), crop_exists_out).into(),
            Series::new("comments".into(), comments).into(),
        ])?;

        let (located, rows_missing_georef) = attach_coordinates(&unified, ctx.georef_points)?;

        let report = YearReport {
            year: HarvestYear::Hy2018.as_i32(),
            rows_parsed: rows,
            rows_skipped_in_sheet: sheet.info.rows_skipped,
            rows_filtered,
            qa_overrides_applied: qa.applied,
            qa_overrides_unmatched: qa.unmatched.len(),
            nir_samples_matched: None,
            rows_missing_georef,
            rows_out: located.height(),
        };

        Ok(YearOutput { df: located, report })
    }
}
