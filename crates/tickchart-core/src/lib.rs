//! # Tickchart Core
//!
//! Validation, Alpha Vantage ingestion and chart rendering for the
//! `tickchart` CLI and web server.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage client with single rate-limit retry |
//! | [`catalog`] | Fallback symbol list and search fallback policy |
//! | [`config`] | Environment-driven configuration |
//! | [`data_source`] | Upstream error classification |
//! | [`domain`] | Symbols, chart requests, date ranges, price series |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport seam (reqwest or scripted) |
//! | [`normalize`] | Payload-to-series normalization |
//! | [`range`] | Inclusive date-window filter |
//! | [`render`] | SVG chart and HTML page |
//! | [`retry`] | Retry/backoff policy |
//! | [`validate`] | User input validators |
//!
//! ## Flow
//!
//! ```text
//! user input ──▶ validate ──▶ ChartRequest
//!                                  │
//!                                  ▼
//!                 AlphaVantageAdapter::fetch_series (1 retry on "Note")
//!                                  │ serde_json::Value
//!                                  ▼
//!                         normalize_series ──▶ filter_range ──▶ render
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickchart_core::{
//!     parse_date_pair, validate_chart_type, validate_granularity, validate_symbol,
//!     AlphaVantageAdapter, AppConfig, ChartRequest, OutputSize,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let adapter = AlphaVantageAdapter::from_config(&config);
//!     let request = ChartRequest::new(
//!         validate_symbol("IBM")?,
//!         validate_chart_type("1")?,
//!         validate_granularity("2")?,
//!         Some(parse_date_pair("2023-01-01", "2023-06-30")?),
//!     );
//!     let series = adapter.fetch_chart(&request, OutputSize::Full).await?;
//!     println!("{} rows", series.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! The API key is read from the environment and never logged.

pub mod adapters;
pub mod catalog;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod normalize;
pub mod range;
pub mod render;
pub mod retry;
pub mod validate;

pub use adapters::AlphaVantageAdapter;

pub use catalog::{resolve_search, SymbolCatalog, SymbolMatch};

pub use config::{AppConfig, ConfigError};

pub use data_source::{SourceError, SourceErrorKind};

pub use domain::{
    ChartRequest, ChartType, Column, DateRange, Granularity, OutputSize, PriceRow, PriceSeries,
    Symbol,
};

pub use error::{CoreError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
};

pub use normalize::normalize_series;

pub use range::filter_range;

pub use render::{ArtifactPaths, ChartArtifact, ChartMeta};

pub use retry::{Backoff, RetryPolicy};

pub use validate::{
    parse_date, parse_date_pair, validate_chart_type, validate_granularity, validate_symbol,
};
