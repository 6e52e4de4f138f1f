use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{DateRange, Symbol};
use crate::ValidationError;

/// How the series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Line,
    Bar,
}

impl ChartType {
    pub const ALL: [Self; 2] = [Self::Line, Self::Bar];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }

    /// Numeric menu code used by the interactive prompt.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Line => "1",
            Self::Bar => "2",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Line => "Line Chart",
            Self::Bar => "Bar Chart",
        }
    }
}

impl Display for ChartType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "1" | "line" => Ok(Self::Line),
            "2" | "bar" => Ok(Self::Bar),
            _ => Err(ValidationError::InvalidChartType {
                value: value.to_owned(),
            }),
        }
    }
}

/// Time-series granularity; each maps to one Alpha Vantage function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Intraday,
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub const ALL: [Self; 4] = [Self::Intraday, Self::Daily, Self::Weekly, Self::Monthly];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intraday => "intraday",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Intraday => "1",
            Self::Daily => "2",
            Self::Weekly => "3",
            Self::Monthly => "4",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Intraday => "Intraday",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    /// Value of the `function` query parameter.
    pub const fn function(self) -> &'static str {
        match self {
            Self::Intraday => "TIME_SERIES_INTRADAY",
            Self::Daily => "TIME_SERIES_DAILY_ADJUSTED",
            Self::Weekly => "TIME_SERIES_WEEKLY_ADJUSTED",
            Self::Monthly => "TIME_SERIES_MONTHLY_ADJUSTED",
        }
    }

    /// Bar interval sent with intraday requests.
    pub const fn interval(self) -> Option<&'static str> {
        match self {
            Self::Intraday => Some("5min"),
            _ => None,
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "1" | "intraday" => Ok(Self::Intraday),
            "2" | "daily" => Ok(Self::Daily),
            "3" | "weekly" => Ok(Self::Weekly),
            "4" | "monthly" => Ok(Self::Monthly),
            _ => Err(ValidationError::InvalidGranularity {
                value: value.to_owned(),
            }),
        }
    }
}

/// `outputsize` query parameter for non-intraday functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSize {
    #[default]
    Full,
    Compact,
}

impl OutputSize {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Compact => "compact",
        }
    }
}

/// A validated chart request, ready for the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub symbol: Symbol,
    pub chart_type: ChartType,
    pub granularity: Granularity,
    /// `None` charts the whole returned series.
    pub range: Option<DateRange>,
}

impl ChartRequest {
    pub fn new(
        symbol: Symbol,
        chart_type: ChartType,
        granularity: Granularity,
        range: Option<DateRange>,
    ) -> Self {
        Self {
            symbol,
            chart_type,
            granularity,
            range,
        }
    }
}
