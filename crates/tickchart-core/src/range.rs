use crate::domain::{DateRange, PriceSeries};
use crate::CoreError;

/// Rows whose calendar date lies in `range`, both ends inclusive.
///
/// Intraday rows match on their date, so a single-day window keeps the whole
/// trading session.
pub fn filter_range(series: &PriceSeries, range: &DateRange) -> Result<PriceSeries, CoreError> {
    let filtered = series.retain(|row| range.contains(row.date()));
    if filtered.is_empty() {
        return Err(CoreError::EmptyRange {
            start: range.start_iso(),
            end: range.end_iso(),
        });
    }
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, PriceRow};
    use time::macros::{date, datetime};
    use time::PrimitiveDateTime;

    fn monthly_2023() -> PriceSeries {
        let stamps: [PrimitiveDateTime; 4] = [
            datetime!(2023-01-31 0:00),
            datetime!(2023-04-28 0:00),
            datetime!(2023-08-31 0:00),
            datetime!(2023-12-29 0:00),
        ];
        let rows = stamps.into_iter().enumerate().map(|(index, timestamp)| PriceRow {
            close: Some(100.0 + index as f64),
            ..PriceRow::new(timestamp)
        });
        PriceSeries::new(rows, [Column::Close], false)
    }

    #[test]
    fn window_outside_series_is_empty_range() {
        let range = DateRange::new(date!(2024 - 01 - 01), date!(2024 - 06 - 30));
        let error = filter_range(&monthly_2023(), &range).expect_err("must fail");

        assert!(matches!(error, CoreError::EmptyRange { .. }));
        assert_eq!(error.to_string(), "no data found between 2024-01-01 and 2024-06-30");
    }

    #[test]
    fn single_day_window_is_inclusive() {
        let range = DateRange::new(date!(2023 - 04 - 28), date!(2023 - 04 - 28));
        let filtered = filter_range(&monthly_2023(), &range).expect("one row");

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].close, Some(101.0));
    }

    #[test]
    fn bounds_are_inclusive_on_both_ends() {
        let range = DateRange::new(date!(2023 - 01 - 31), date!(2023 - 08 - 31));
        let filtered = filter_range(&monthly_2023(), &range).expect("three rows");
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn intraday_rows_match_on_calendar_date() {
        let rows = [
            datetime!(2023-01-03 9:35),
            datetime!(2023-01-03 16:00),
            datetime!(2023-01-04 9:35),
        ]
        .into_iter()
        .map(|timestamp| PriceRow {
            close: Some(1.0),
            ..PriceRow::new(timestamp)
        });
        let series = PriceSeries::new(rows, [Column::Close], false);

        let range = DateRange::new(date!(2023 - 01 - 03), date!(2023 - 01 - 03));
        let filtered = filter_range(&series, &range).expect("session rows");
        assert_eq!(filtered.len(), 2);
    }
}
