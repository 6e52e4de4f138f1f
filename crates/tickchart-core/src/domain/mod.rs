//! # Domain Models
//!
//! Typed values that flow between validation, the data source, the
//! normalizer and the renderer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker (ASCII letters, at most 5) |
//! | [`ChartType`] | Line or bar |
//! | [`Granularity`] | Intraday, daily, weekly or monthly series |
//! | [`DateRange`] | Inclusive window, reordered if given reversed |
//! | [`ChartRequest`] | Everything needed to fetch and draw one chart |
//! | [`PriceSeries`] | Normalized Open/High/Low/Close rows |

mod chart;
mod date_range;
mod series;
mod symbol;

pub use chart::{ChartRequest, ChartType, Granularity, OutputSize};
pub use date_range::{iso, DateRange};
pub use series::{Column, PriceRow, PriceSeries};
pub use symbol::{Symbol, MAX_SYMBOL_LEN};
