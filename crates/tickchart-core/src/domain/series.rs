use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use time::{Date, PrimitiveDateTime};

/// Logical price column of a normalized series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Open,
    High,
    Low,
    Close,
}

impl Column {
    pub const ALL: [Self; 4] = [Self::Open, Self::High, Self::Low, Self::Close];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One timestamped price record. Unparseable source values are `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    pub timestamp: PrimitiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl PriceRow {
    pub fn new(timestamp: PrimitiveDateTime) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close: None,
        }
    }

    pub fn date(&self) -> Date {
        self.timestamp.date()
    }

    pub const fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Open => self.open,
            Column::High => self.high,
            Column::Low => self.low,
            Column::Close => self.close,
        }
    }

    pub fn set(&mut self, column: Column, value: Option<f64>) {
        match column {
            Column::Open => self.open = value,
            Column::High => self.high = value,
            Column::Low => self.low = value,
            Column::Close => self.close = value,
        }
    }
}

/// Rows ascending by timestamp with unique timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    rows: Vec<PriceRow>,
    columns: Vec<Column>,
    adjusted_close: bool,
}

impl PriceSeries {
    /// Sort and de-duplicate `rows` (last write wins), then drop every listed
    /// column that has no value in any row.
    pub fn new(
        rows: impl IntoIterator<Item = PriceRow>,
        columns: impl IntoIterator<Item = Column>,
        adjusted_close: bool,
    ) -> Self {
        let by_time = rows
            .into_iter()
            .map(|row| (row.timestamp, row))
            .collect::<BTreeMap<_, _>>();
        let rows = by_time.into_values().collect::<Vec<_>>();

        let mut columns = columns
            .into_iter()
            .filter(|column| rows.iter().any(|row| row.value(*column).is_some()))
            .collect::<Vec<_>>();
        columns.sort();
        columns.dedup();

        let adjusted_close = adjusted_close && columns.contains(&Column::Close);
        Self {
            rows,
            columns,
            adjusted_close,
        }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    /// Columns present in the series, in Open/High/Low/Close order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Whether close values came from an adjusted-close field.
    pub const fn adjusted_close(&self) -> bool {
        self.adjusted_close
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep rows matching `keep`, preserving the column set.
    pub fn retain(&self, mut keep: impl FnMut(&PriceRow) -> bool) -> Self {
        Self {
            rows: self.rows.iter().copied().filter(|row| keep(row)).collect(),
            columns: self.columns.clone(),
            adjusted_close: self.adjusted_close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn row(timestamp: PrimitiveDateTime, close: Option<f64>) -> PriceRow {
        PriceRow {
            close,
            ..PriceRow::new(timestamp)
        }
    }

    #[test]
    fn sorts_and_deduplicates_last_write_wins() {
        let series = PriceSeries::new(
            [
                row(datetime!(2023-01-03 0:00), Some(3.0)),
                row(datetime!(2023-01-01 0:00), Some(1.0)),
                row(datetime!(2023-01-03 0:00), Some(4.0)),
            ],
            [Column::Close],
            false,
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.rows()[0].close, Some(1.0));
        assert_eq!(series.rows()[1].close, Some(4.0));
    }

    #[test]
    fn drops_columns_without_values() {
        let series = PriceSeries::new(
            [row(datetime!(2023-01-01 0:00), Some(1.0))],
            [Column::Close, Column::Open],
            true,
        );

        assert_eq!(series.columns(), &[Column::Close]);
        assert!(series.adjusted_close());
    }
}
