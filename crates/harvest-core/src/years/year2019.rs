use polars::prelude::*;

use harvest_sheets::{HarvestYear, ParsedSheet, SampleBarcode};

use crate::calculator::{mass_per_area, yield_at_standard_moisture};
use crate::error::{PipelineError, Result};
use crate::georef::attach_coordinates;
use crate::nir::attach_nir_results;
use crate::qa::apply_qa_overrides;

use super::{merge_comments, YearCleaner, YearContext, YearOutput, YearReport};

const CROP_SEGMENT: usize = 3;
const PROJECT_CODE: &str = "GP";

/// The 2019 template is shared by several studies; this dataset keeps the
/// `GP` project rows from the Cook fields. Sample ids were entered in mixed
/// case and are published upper-cased. Masses were already recorded net of
/// bags, and grain moisture comes from the NIR lab join.
pub struct Hy2019Cleaner;

impl YearCleaner for Hy2019Cleaner {
    fn year(&self) -> HarvestYear {
        HarvestYear::Hy2019
    }

    fn clean(&self, sheet: &ParsedSheet, ctx: &YearContext<'_>) -> Result<YearOutput> {
        let mut df = sheet.df.clone();
        let rows = df.height();

        df.hstack_mut(&mut [Series::new("crop_exists".into(), vec![1i32; rows]).into()])?;
        let qa = apply_qa_overrides(
            &mut df,
            HarvestYear::Hy2019,
            "sample_barcode",
            ctx.qa_overrides,
        )?;

        let barcodes = df.column("sample_barcode")?.str()?;
        let projects = df.column("project_id")?.str()?;
        let biomass_net = df.column("biomass_net_g")?.f64()?;
        let grain_field_net = df.column("grain_field_net_g")?.f64()?;
        let field_notes = df.column("field_notes")?.str()?;
        let qa_notes = df.column("qa_notes")?.str()?;
        let crop_exists = df.column("crop_exists")?.i32()?;

        let mut harvest_year = Vec::new();
        let mut id2 = Vec::new();
        let mut sample_id = Vec::new();
        let mut crop = Vec::new();
        let mut biomass_net_out = Vec::new();
        let mut grain_net_out = Vec::new();
        let mut crop_exists_out = Vec::new();
        let mut comments = Vec::new();
        let mut rows_filtered = 0usize;

        for idx in 0..rows {
            let raw = barcodes.get(idx).ok_or_else(|| {
                PipelineError::Processing(format!("2019 row {idx} has no sample barcode"))
            })?;
            let upper = raw.to_ascii_uppercase();

            let is_gp = projects
                .get(idx)
                .is_some_and(|project| project.trim() == PROJECT_CODE);
            if !is_gp || !SampleBarcode::has_cook_field(&upper) {
                rows_filtered += 1;
                continue;
            }

            let barcode = SampleBarcode::parse(&upper, CROP_SEGMENT)
                .map_err(|err| PipelineError::Processing(format!("2019 row {idx}: {err}")))?;

            harvest_year.push(HarvestYear::Hy2019.as_i32());
            id2.push(barcode.id2);
            sample_id.push(upper.clone());
            crop.push(barcode.crop);
            biomass_net_out.push(biomass_net.get(idx));
            grain_net_out.push(grain_field_net.get(idx));
            crop_exists_out.push(crop_exists.get(idx));
            comments.push(merge_comments(field_notes.get(idx), qa_notes.get(idx)));
        }

        let kept = DataFrame::new(vec![
            Series::new("harvest_year".into(), harvest_year).into(),
            Series::new("id2".into(), id2).into(),
            Series::new("sample_id".into(), sample_id).into(),
            Series::new("crop".into(), crop).into(),
            Series::new("biomass_net_g".into(), biomass_net_out).into(),
            Series::new("grain_field_net_g".into(), grain_net_out).into(),
            Series::new("crop_exists".into(), crop_exists_out).into(),
            Series::new("comments".into(), comments).into(),
        ])?;

        let (with_nir, nir_matched) = attach_nir_results(&kept, ctx.nir_results)?;

        let biomass = with_nir.column("biomass_net_g")?.f64()?;
        let grain = with_nir.column("grain_field_net_g")?.f64()?;
        let moisture = with_nir.column("grain_moisture_pct")?.f64()?;

        let len = with_nir.height();
        let mut biomass_dry = Vec::with_capacity(len);
        let mut grain_yield_dry = Vec::with_capacity(len);
        let mut grain_yield_std = Vec::with_capacity(len);

        for idx in 0..len {
            biomass_dry.push(mass_per_area(biomass.get(idx), ctx.area_harvested_m2));
            grain_yield_dry.push(mass_per_area(grain.get(idx), ctx.area_harvested_m2));
            grain_yield_std.push(yield_at_standard_moisture(
                grain.get(idx),
                moisture.get(idx),
                ctx.area_harvested_m2,
            ));
        }

        let mut enriched = with_nir.clone();
        enriched.hstack_mut(&mut [
            Series::new("biomass_dry_per_area".into(), biomass_dry).into(),
            Series::new("grain_yield_dry_per_area".into(), grain_yield_dry).into(),
            Series::new("grain_yield_std_per_area".into(), grain_yield_std).into(),
        ])?;
        let enriched = enriched.drop("biomass_net_g")?.drop("grain_field_net_g")?;

        let (located, rows_missing_georef) = attach_coordinates(&enriched, ctx.georef_points)?;

        let report = YearReport {
            year: HarvestYear::Hy2019.as_i32(),
            rows_parsed: rows,
            rows_skipped_in_sheet: sheet.info.rows_skipped,
            rows_filtered,
            qa_overrides_applied: qa.applied,
            qa_overrides_unmatched: qa.unmatched.len(),
            nir_samples_matched: Some(nir_matched),
            rows_missing_georef,
            rows_out: located.height(),
        };

        Ok(YearOutput { df: located, report })
    }
}
