mod common;
mod hy2017;
mod hy2018;
mod hy2019;

pub use common::is_na_token;
pub use hy2017::Hy2017Parser;
pub use hy2018::Hy2018Parser;
pub use hy2019::Hy2019Parser;

use crate::model::HarvestYear;

/// Translates a raw template header (as a QA analyst would have written it)
/// to the canonical dataframe column name used after parsing.
pub fn canonical_column_for(year: HarvestYear, raw_header: &str) -> Option<&'static str> {
    let columns = match year {
        HarvestYear::Hy2017 => hy2017::COLUMNS,
        HarvestYear::Hy2018 => hy2018::COLUMNS,
        HarvestYear::Hy2019 => hy2019::COLUMNS,
    };

    let normalized = common::normalize_header(raw_header);
    columns
        .iter()
        .find(|spec| common::normalize_header(spec.raw) == normalized)
        .map(|spec| spec.canonical)
}
