//! Chart form fields and their conversion into a [`ChartRequest`].

use serde::Deserialize;

use tickchart_core::{
    parse_date_pair, validate_chart_type, validate_granularity, validate_symbol, ChartRequest,
    ChartType, Granularity,
};

use crate::error::ChartError;

/// `POST /` body. Every field may be absent or blank.
///
/// `symbol` comes from the dropdown and holds a bare ticker; `symbol_text`
/// is the free-text box. The dropdown wins when both are filled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChartForm {
    pub symbol: String,
    pub symbol_text: String,
    pub chart_type: String,
    pub time_series: String,
    pub start_date: String,
    pub end_date: String,
}

impl ChartForm {
    pub fn selected_symbol(&self) -> Option<String> {
        [&self.symbol, &self.symbol_text]
            .into_iter()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_ascii_uppercase)
    }

    /// Validate the form. Blank chart type means line, blank time series
    /// means daily, and two blank dates chart the whole series.
    pub fn to_request(&self) -> Result<ChartRequest, ChartError> {
        let symbol = self.selected_symbol().ok_or(ChartError::MissingSymbol)?;
        let symbol = validate_symbol(&symbol)?;

        let chart_type = match self.chart_type.trim() {
            "" => ChartType::Line,
            value => validate_chart_type(value)?,
        };
        let granularity = match self.time_series.trim() {
            "" => Granularity::Daily,
            value => validate_granularity(value)?,
        };

        let (start, end) = (self.start_date.trim(), self.end_date.trim());
        let range = if start.is_empty() && end.is_empty() {
            None
        } else {
            Some(parse_date_pair(start, end)?)
        };

        Ok(ChartRequest::new(symbol, chart_type, granularity, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickchart_core::ValidationError;

    fn form(symbol: &str, symbol_text: &str) -> ChartForm {
        ChartForm {
            symbol: symbol.to_owned(),
            symbol_text: symbol_text.to_owned(),
            ..ChartForm::default()
        }
    }

    #[test]
    fn dropdown_symbol_wins_over_free_text() {
        assert_eq!(form("MSFT", "aapl").selected_symbol().as_deref(), Some("MSFT"));
        assert_eq!(form("  ", "aapl ").selected_symbol().as_deref(), Some("AAPL"));
        assert_eq!(form("", "").selected_symbol(), None);
    }

    #[test]
    fn blank_fields_take_defaults() {
        let request = form("IBM", "").to_request().expect("valid form");

        assert_eq!(request.chart_type, ChartType::Line);
        assert_eq!(request.granularity, Granularity::Daily);
        assert!(request.range.is_none());
    }

    #[test]
    fn missing_symbol_is_reported() {
        let error = form("", "").to_request().expect_err("no symbol");
        assert_eq!(error.to_string(), "No stock symbol provided.");
    }

    #[test]
    fn symbol_with_name_is_not_split() {
        let error = form("AAPL Apple Inc.", "").to_request().expect_err("not a ticker");
        assert!(matches!(
            error,
            ChartError::Validation(ValidationError::SymbolInvalidChar { ch: ' ', .. })
        ));
    }

    #[test]
    fn reversed_dates_are_swapped() {
        let request = ChartForm {
            symbol: String::from("IBM"),
            chart_type: String::from("bar"),
            time_series: String::from("weekly"),
            start_date: String::from("2023-06-30"),
            end_date: String::from("2023-01-01"),
            ..ChartForm::default()
        }
        .to_request()
        .expect("valid form");

        let range = request.range.expect("range");
        assert!(range.swapped());
        assert_eq!(range.start_iso(), "2023-01-01");
        assert_eq!(request.chart_type, ChartType::Bar);
        assert_eq!(request.granularity, Granularity::Weekly);
    }

    #[test]
    fn single_date_is_rejected() {
        let error = ChartForm {
            symbol: String::from("IBM"),
            start_date: String::from("2023-01-01"),
            ..ChartForm::default()
        }
        .to_request()
        .expect_err("end date missing");

        assert!(matches!(
            error,
            ChartError::Validation(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn unknown_time_series_is_rejected() {
        let error = ChartForm {
            symbol: String::from("IBM"),
            time_series: String::from("hourly"),
            ..ChartForm::default()
        }
        .to_request()
        .expect_err("bad granularity");

        assert!(matches!(
            error,
            ChartError::Validation(ValidationError::InvalidGranularity { .. })
        ));
    }
}
