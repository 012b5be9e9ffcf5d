use polars::prelude::*;

use harvest_sheets::{HarvestYear, ParsedSheet, SampleBarcode};

use crate::calculator::{mass_per_area, net_mass_g, yield_at_standard_moisture};
use crate::error::{PipelineError, Result};
use crate::georef::attach_coordinates;
use crate::qa::apply_qa_overrides;

use super::{merge_comments, YearCleaner, YearContext, YearOutput, YearReport};

const CROP_SEGMENT: usize = 2;

pub struct Hy2017Cleaner;

impl YearCleaner for Hy2017Cleaner {
    fn year(&self) -> HarvestYear {
        HarvestYear::Hy2017
    }

    fn clean(&self, sheet: &ParsedSheet, ctx: &YearContext<'_>) -> Result<YearOutput> {
        let mut df = sheet.df.clone();
        let rows = df.height();

        // Every 2017 sample is assumed present until QA says otherwise.
        df.hstack_mut(&mut [Series::new("crop_exists".into(), vec![1i32; rows]).into()])?;
        let qa = apply_qa_overrides(
            &mut df,
            HarvestYear::Hy2017,
            "sample_barcode",
            ctx.qa_overrides,
        )?;

        let barcodes = df.column("sample_barcode")?.str()?;
        let biomass_gross = df.column("biomass_gross_g")?.f64()?;
        let biomass_tare = df.column("biomass_tare_g")?.f64()?;
        let grain_field_gross = df.column("grain_field_gross_g")?.f64()?;
        let grain_oven_gross = df.column("grain_oven_gross_g")?.f64()?;
        let grain_tare = df.column("grain_tare_g")?.f64()?;
        let moisture = df.column("grain_moisture_pct")?.f64()?;
        let qa_notes = df.column("qa_notes")?.str()?;
        let crop_exists = df.column("crop_exists")?.i32()?;

        let mut harvest_year = Vec::with_capacity(rows);
        let mut id2 = Vec::with_capacity(rows);
        let mut sample_id = Vec::with_capacity(rows);
        let mut crop = Vec::with_capacity(rows);
        let mut grain_yield_dry = Vec::with_capacity(rows);
        let mut biomass_dry = Vec::with_capacity(rows);
        let mut grain_yield_std = Vec::with_capacity(rows);
        let mut grain_moisture = Vec::with_capacity(rows);
        let mut crop_exists_out = Vec::with_capacity(rows);
        let mut comments = Vec::with_capacity(rows);

        for idx in 0..rows {
            let raw = barcodes.get(idx).ok_or_else(|| {
                PipelineError::Processing(format!("2017 row {idx} has no sample barcode"))
            })?;
            let barcode = SampleBarcode::parse(raw, CROP_SEGMENT)
                .map_err(|err| PipelineError::Processing(format!("2017 row {idx}: {err}")))?;

            // Grain was oven-dried before NIR in 2017, so the
            // standard-moisture yield comes from the oven mass, not the
            // field mass.
            let oven_net = net_mass_g(grain_oven_gross.get(idx), grain_tare.get(idx));

            harvest_year.push(HarvestYear::Hy2017.as_i32());
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
            grain_yield_std.push(yield_at_standard_moisture(
                oven_net,
                moisture.get(idx),
                ctx.area_harvested_m2,
            ));
            grain_moisture.push(moisture.get(idx));
            crop_exists_out.push(crop_exists.get(idx));
            comments.push(merge_comments(None, qa_notes.get(idx)));
        }

        let unified = DataFrame::new(vec![
            Series::new("harvest_year".into(), harvest_year).into(),
            Series::new("id2".into(), id2).into(),
            Series::new("sample_id".into(), sample_id).into(),
            Series::new("crop".into(), crop).into(),
            Series::new("grain_yield_dry_per_area".into(), grain_yield_dry).into(),
            Series::new("biomass_dry_per_area".into(), biomass_dry).into(),
            Series::new("grain_moisture_pct".into(), grain_moisture).into(),
            Series::new("grain_yield_std_per_area".into(), grain_yield_std).into(),
            Series::new("crop_exists".into(), crop_exists_out).into(),
            Series::new("comments".into(), comments).into(),
        ])?;

        let (located, rows_missing_georef) = attach_coordinates(&unified, ctx.georef_points)?;

        let report = YearReport {
            year: HarvestYear::Hy2017.as_i32(),
            rows_parsed: rows,
            rows_skipped_in_sheet: sheet.info.rows_skipped,
            rows_filtered: 0,
            qa_overrides_applied: qa.applied,
            qa_overrides_unmatched: qa.unmatched.len(),
            nir_samples_matched: None,
            rows_missing_georef,
            rows_out: located.height(),
        };

        Ok(YearOutput { df: located, report })
    }
}
