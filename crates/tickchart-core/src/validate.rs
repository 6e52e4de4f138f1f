//! Input validators shared by the CLI prompt flow and the web form.

use std::str::FromStr;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::domain::{ChartType, DateRange, Granularity, Symbol};
use crate::ValidationError;

/// Accepted date layouts, tried in order. Day-first wins over month-first
/// when both would parse.
const DATE_FORMATS: [&[BorrowedFormatItem<'static>]; 6] = [
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[day padding:none]-[month padding:none]-[year]"),
    format_description!("[day padding:none]/[month padding:none]/[year]"),
    format_description!("[month padding:none]-[day padding:none]-[year]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
];

pub fn validate_symbol(input: &str) -> Result<Symbol, ValidationError> {
    Symbol::parse(input)
}

pub fn validate_chart_type(input: &str) -> Result<ChartType, ValidationError> {
    ChartType::from_str(input)
}

pub fn validate_granularity(input: &str) -> Result<Granularity, ValidationError> {
    Granularity::from_str(input)
}

/// Parse a single date against [`DATE_FORMATS`].
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    DATE_FORMATS
        .iter()
        .find_map(|format| Date::parse(input, format).ok())
        .ok_or_else(|| ValidationError::InvalidDate {
            value: input.to_owned(),
        })
}

/// Parse a start/end pair, swapping them if reversed.
///
/// Both strings must parse; an empty string is never defaulted.
pub fn parse_date_pair(start: &str, end: &str) -> Result<DateRange, ValidationError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    let range = DateRange::new(start, end);
    if range.swapped() {
        tracing::warn!(
            start = %range.end_iso(),
            end = %range.start_iso(),
            "start date is after end date; swapping them"
        );
    }
    Ok(range)
}
