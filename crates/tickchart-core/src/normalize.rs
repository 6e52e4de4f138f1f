//! Turns a loosely-keyed Alpha Vantage payload into a [`PriceSeries`].
//!
//! Field names differ between endpoints (`"4. close"`, `"5. adjusted close"`,
//! `"1a. open (USD)"`...), so columns are resolved by substring rules rather
//! than fixed serde field names.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

use crate::data_source::SourceError;
use crate::domain::{Column, PriceRow, PriceSeries};

/// Substring that identifies the series block among top-level keys.
pub const TIME_SERIES_MARKER: &str = "Time Series";

/// Top-level keys whose text explains a missing series, highest priority first.
const DIAGNOSTIC_KEYS: [&str; 3] = ["note", "error message", "information"];

const PREVIEW_CHARS: usize = 800;

/// Ordered candidate fragments per column. The first fragment that matches
/// any schema field wins; fragments are compared against lower-cased names.
const COLUMN_RULES: [(Column, &[&str]); 4] = [
    (Column::Open, &[" open"]),
    (Column::High, &[" high"]),
    (Column::Low, &[" low"]),
    (Column::Close, &["adjusted close", " close"]),
];

const ADJUSTED_CLOSE: &str = "adjusted close";

/// Normalize a decoded response body.
pub fn normalize_series(payload: &Value) -> Result<PriceSeries, SourceError> {
    let object = payload.as_object().ok_or_else(|| {
        SourceError::unexpected_response(format!(
            "expected a JSON object.\nPreview:\n{}",
            preview(payload)
        ))
    })?;

    let series_key = find_series_key(object).ok_or_else(|| missing_series_error(payload))?;
    let records = object
        .get(series_key)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            SourceError::unexpected_response(format!("'{series_key}' is not an object"))
        })?;

    let schema = records
        .values()
        .filter_map(Value::as_object)
        .flat_map(|record| record.keys().map(String::as_str))
        .collect::<BTreeSet<_>>();

    let resolved = COLUMN_RULES
        .iter()
        .filter_map(|(column, fragments)| {
            resolve_field(&schema, fragments).map(|field| (*column, field))
        })
        .collect::<Vec<_>>();

    let adjusted_close = resolved.iter().any(|(column, field)| {
        *column == Column::Close && field.to_lowercase().contains(ADJUSTED_CLOSE)
    });

    let mut rows = Vec::with_capacity(records.len());
    for (key, record) in records {
        let mut row = PriceRow::new(parse_timestamp(key)?);
        for (column, field) in &resolved {
            row.set(*column, record.get(*field).and_then(coerce_number));
        }
        rows.push(row);
    }

    let series = PriceSeries::new(
        rows,
        resolved.iter().map(|(column, _)| *column),
        adjusted_close,
    );

    if !series.has_column(Column::Close) {
        return Err(SourceError::unexpected_response(format!(
            "cannot find close prices in '{series_key}'"
        )));
    }

    Ok(series)
}

/// First top-level key (in sorted order) containing [`TIME_SERIES_MARKER`].
pub fn find_series_key(object: &Map<String, Value>) -> Option<&str> {
    let mut keys = object.keys().map(String::as_str).collect::<Vec<_>>();
    keys.sort_unstable();
    keys.into_iter().find(|key| key.contains(TIME_SERIES_MARKER))
}

/// Text of the highest-priority diagnostic field, if any.
pub fn diagnostic_message(payload: &Value) -> Option<String> {
    let object = payload.as_object()?;
    DIAGNOSTIC_KEYS.iter().find_map(|wanted| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
            .map(|(_, value)| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
    })
}

fn missing_series_error(payload: &Value) -> SourceError {
    match diagnostic_message(payload) {
        Some(message) => SourceError::upstream(message),
        None => SourceError::unexpected_response(format!(
            "unexpected API response, no '{TIME_SERIES_MARKER}' key found.\nPreview:\n{}",
            preview(payload)
        )),
    }
}

fn resolve_field<'a>(schema: &BTreeSet<&'a str>, fragments: &[&str]) -> Option<&'a str> {
    fragments.iter().find_map(|fragment| {
        schema
            .iter()
            .copied()
            .find(|field| field.to_lowercase().contains(fragment))
    })
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn parse_timestamp(key: &str) -> Result<PrimitiveDateTime, SourceError> {
    let key = key.trim();
    if let Ok(date) = Date::parse(key, format_description!("[year]-[month]-[day]")) {
        return Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT));
    }

    PrimitiveDateTime::parse(
        key,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(key, format_description!("[year]-[month]-[day] [hour]:[minute]"))
    })
    .map_err(|_| SourceError::unexpected_response(format!("invalid timestamp key '{key}'")))
}

/// Pretty-printed payload truncated to a bounded number of characters.
fn preview(payload: &Value) -> String {
    let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => text[..cut].to_owned(),
        None => text,
    }
}
