use std::fmt::{Display, Formatter};

use time::macros::format_description;
use time::Date;

/// Inclusive calendar window with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
    swapped: bool,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: Date, end: Date) -> Self {
        if start > end {
            Self {
                start: end,
                end: start,
                swapped: true,
            }
        } else {
            Self {
                start,
                end,
                swapped: false,
            }
        }
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    /// Whether the caller supplied the bounds in reverse order.
    pub const fn swapped(&self) -> bool {
        self.swapped
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn start_iso(&self) -> String {
        iso(self.start)
    }

    pub fn end_iso(&self) -> String {
        iso(self.end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start_iso(), self.end_iso())
    }
}

/// Canonical `YYYY-MM-DD` rendering.
pub fn iso(date: Date) -> String {
    // The fixed description only fails for years outside 0..=9999.
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn keeps_ordered_bounds() {
        let range = DateRange::new(date!(2023 - 01 - 01), date!(2023 - 12 - 31));
        assert!(!range.swapped());
        assert_eq!(range.to_string(), "2023-01-01 to 2023-12-31");
    }

    #[test]
    fn swaps_reversed_bounds() {
        let range = DateRange::new(date!(2023 - 12 - 31), date!(2023 - 01 - 01));
        assert!(range.swapped());
        assert_eq!(range.start_iso(), "2023-01-01");
        assert_eq!(range.end_iso(), "2023-12-31");
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::new(date!(2023 - 03 - 01), date!(2023 - 03 - 01));
        assert!(range.contains(date!(2023 - 03 - 01)));
        assert!(!range.contains(date!(2023 - 03 - 02)));
    }
}
