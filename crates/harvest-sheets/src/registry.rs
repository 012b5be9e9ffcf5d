use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{Hy2017Parser, Hy2018Parser, Hy2019Parser};
use crate::model::{Cell, HarvestYear, ParsedSheet};

pub trait HarvestSheetParser {
    fn name(&self) -> &'static str;
    fn year(&self) -> HarvestYear;
    fn parse(&self, grid: &[Vec<Cell>], source: &str) -> Result<ParsedSheet, ParserError>;
}

pub fn parse_harvest_grid(grid: &[Vec<Cell>], source: &str) -> Result<ParsedSheet, ParserError> {
    let hy2017 = Hy2017Parser;
    let hy2018 = Hy2018Parser;
    let hy2019 = Hy2019Parser;
    let parsers: [&dyn HarvestSheetParser; 3] = [&hy2017, &hy2018, &hy2019];
    parse_with_parsers(grid, source, &parsers)
}

pub fn parse_with_parsers(
    grid: &[Vec<Cell>],
    source: &str,
    parsers: &[&dyn HarvestSheetParser],
) -> Result<ParsedSheet, ParserError> {
    let mut attempts = Vec::new();

    for parser in parsers {
        match parser.parse(grid, source) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                attempts.push(ParserAttempt::new(parser.name(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingParser { attempts })
}
