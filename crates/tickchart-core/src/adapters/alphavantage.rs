use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::SymbolMatch;
use crate::config::AppConfig;
use crate::data_source::SourceError;
use crate::domain::{ChartRequest, Granularity, OutputSize, PriceSeries, Symbol};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::normalize::normalize_series;
use crate::range::filter_range;
use crate::retry::RetryPolicy;
use crate::CoreError;

/// Top-level key Alpha Vantage uses to signal call-frequency limits.
const RATE_LIMIT_KEY: &str = "Note";
/// Top-level key carrying an explicit API error.
const ERROR_KEY: &str = "Error Message";

/// Alpha Vantage query API client.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
    search_timeout_ms: u64,
    retry: RetryPolicy,
}

impl AlphaVantageAdapter {
    /// Adapter over the given transport with default endpoint, timeouts and
    /// retry policy.
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        let defaults = AppConfig::default();
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: defaults.base_url,
            timeout_ms: defaults.timeout_ms,
            search_timeout_ms: defaults.search_timeout_ms,
            retry: RetryPolicy::default(),
        }
    }

    /// Real network adapter configured from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &AppConfig) -> Self {
        Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout_ms,
            search_timeout_ms: config.search_timeout_ms,
            retry: config.retry_policy(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetch the raw series payload for `symbol`.
    ///
    /// A rate-limit note is retried per the retry policy (once after 60s by
    /// default); an explicit error message fails immediately.
    pub async fn fetch_series(
        &self,
        symbol: &Symbol,
        granularity: Granularity,
        output_size: OutputSize,
    ) -> Result<Value, SourceError> {
        let mut request = HttpRequest::get(&self.base_url)
            .with_query("function", granularity.function())
            .with_query("symbol", symbol.as_str())
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.timeout_ms);
        request = match granularity.interval() {
            Some(interval) => request.with_query("interval", interval),
            None => request.with_query("outputsize", output_size.as_str()),
        };

        let mut attempt = 0;
        loop {
            tracing::debug!(
                function = granularity.function(),
                %symbol,
                attempt,
                "requesting alpha vantage series"
            );
            let payload = self.get_json(request.clone()).await?;

            if let Some(note) = top_level_text(&payload, RATE_LIMIT_KEY) {
                if attempt >= self.retry.max_retries {
                    return Err(SourceError::rate_limited(format!(
                        "API limit reached after {} attempt(s): {note}",
                        attempt + 1
                    )));
                }
                let delay = self.retry.delay_for_attempt(attempt);
                tracing::warn!(
                    %symbol,
                    wait_secs = delay.as_secs_f64(),
                    "API limit reached; waiting before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if let Some(message) = top_level_text(&payload, ERROR_KEY) {
                return Err(SourceError::upstream(format!("API error: {message}")));
            }

            return Ok(payload);
        }
    }

    /// Fetch, normalize and (when a range is given) filter one chart's data.
    pub async fn fetch_chart(
        &self,
        request: &ChartRequest,
        output_size: OutputSize,
    ) -> Result<PriceSeries, CoreError> {
        let payload = self
            .fetch_series(&request.symbol, request.granularity, output_size)
            .await?;
        let series = normalize_series(&payload)?;
        tracing::debug!(rows = series.len(), symbol = %request.symbol, "normalized series");

        match &request.range {
            Some(range) => filter_range(&series, range),
            None => Ok(series),
        }
    }

    /// `SYMBOL_SEARCH` for `query`. No retry: callers fall back to the
    /// static catalog instead of waiting out a rate limit.
    pub async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>, SourceError> {
        let request = HttpRequest::get(&self.base_url)
            .with_query("function", "SYMBOL_SEARCH")
            .with_query("keywords", query)
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.search_timeout_ms);

        let payload = self.get_json(request).await?;
        if let Some(note) = top_level_text(&payload, RATE_LIMIT_KEY) {
            return Err(SourceError::rate_limited(note));
        }
        if let Some(message) = top_level_text(&payload, ERROR_KEY) {
            return Err(SourceError::upstream(format!("API error: {message}")));
        }

        let response: AlphaVantageSearchResponse = serde_json::from_value(payload)
            .map_err(|e| {
                SourceError::unexpected_response(format!("failed to parse search response: {e}"))
            })?;

        Ok(response
            .best_matches
            .into_iter()
            .filter_map(|found| {
                let symbol = found.symbol.filter(|symbol| !symbol.trim().is_empty())?;
                let name = found.name.unwrap_or_else(|| symbol.clone());
                Some(SymbolMatch::new(symbol, name))
            })
            .collect())
    }

    async fn get_json(&self, request: HttpRequest) -> Result<Value, SourceError> {
        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.timed_out() {
                SourceError::transport(format!("alphavantage timed out: {}", error.message()))
            } else {
                SourceError::transport(format!(
                    "alphavantage transport error: {}",
                    error.message()
                ))
            }
        })?;

        if !response.is_success() {
            return Err(SourceError::transport(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            SourceError::unexpected_response(format!("failed to parse alphavantage response: {e}"))
        })
    }
}

fn top_level_text(payload: &Value, key: &str) -> Option<String> {
    payload
        .as_object()?
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
        .map(|(_, value)| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
}

#[derive(Debug, Clone, Deserialize)]
struct AlphaVantageSearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<AlphaVantageSearchMatch>,
}

#[derive(Debug, Clone, Deserialize)]
struct AlphaVantageSearchMatch {
    #[serde(rename = "1. symbol", default)]
    symbol: Option<String>,
    #[serde(rename = "2. name", default)]
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse, ScriptedHttpClient};
    use std::time::Duration;

    const SERIES: &str = r#"{
        "Meta Data": {"2. Symbol": "IBM"},
        "Time Series (Daily)": {
            "2023-01-03": {"1. open": "141.1", "4. close": "141.55", "5. adjusted close": "136.2"}
        }
    }"#;
    const NOTE: &str = r#"{"Note": "Our standard API call frequency is 5 calls per minute."}"#;

    fn adapter(client: Arc<ScriptedHttpClient>) -> AlphaVantageAdapter {
        AlphaVantageAdapter::new(client, "test-key")
            .with_retry_policy(RetryPolicy::fixed(Duration::ZERO, 1))
    }

    fn ibm() -> Symbol {
        Symbol::parse("IBM").expect("valid symbol")
    }

    #[tokio::test]
    async fn daily_request_sends_outputsize_and_key() {
        let client = Arc::new(ScriptedHttpClient::json([SERIES.to_owned()]));
        adapter(client.clone())
            .fetch_series(&ibm(), Granularity::Daily, OutputSize::Full)
            .await
            .expect("series");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.query_value("function"), Some("TIME_SERIES_DAILY_ADJUSTED"));
        assert_eq!(request.query_value("symbol"), Some("IBM"));
        assert_eq!(request.query_value("apikey"), Some("test-key"));
        assert_eq!(request.query_value("outputsize"), Some("full"));
        assert_eq!(request.query_value("interval"), None);
        assert_eq!(request.timeout_ms, 30_000);
    }

    #[tokio::test]
    async fn intraday_request_sends_interval_instead_of_outputsize() {
        let client = Arc::new(ScriptedHttpClient::json([SERIES.to_owned()]));
        adapter(client.clone())
            .fetch_series(&ibm(), Granularity::Intraday, OutputSize::Full)
            .await
            .expect("series");

        let request = &client.recorded_requests()[0];
        assert_eq!(request.query_value("interval"), Some("5min"));
        assert_eq!(request.query_value("outputsize"), None);
    }

    #[tokio::test]
    async fn rate_limit_is_retried_once() {
        let client = Arc::new(ScriptedHttpClient::json([NOTE.to_owned(), SERIES.to_owned()]));
        let payload = adapter(client.clone())
            .fetch_series(&ibm(), Granularity::Daily, OutputSize::Full)
            .await
            .expect("second attempt succeeds");

        assert!(payload.get("Time Series (Daily)").is_some());
        assert_eq!(client.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn second_rate_limit_fails() {
        let client = Arc::new(ScriptedHttpClient::json([NOTE.to_owned()]));
        let error = adapter(client.clone())
            .fetch_series(&ibm(), Granularity::Daily, OutputSize::Full)
            .await
            .expect_err("rate limited twice");

        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
        assert_eq!(client.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn error_message_fails_without_retry() {
        let client = Arc::new(ScriptedHttpClient::json([String::from(
            r#"{"Error Message": "Invalid API call."}"#,
        )]));
        let error = adapter(client.clone())
            .fetch_series(&ibm(), Granularity::Weekly, OutputSize::Full)
            .await
            .expect_err("explicit error");

        assert_eq!(error.kind(), SourceErrorKind::Upstream);
        assert!(error.message().contains("Invalid API call."));
        assert_eq!(client.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn transport_failures_are_not_retried() {
        let client = Arc::new(ScriptedHttpClient::new([Err(HttpError::timeout("deadline"))]));
        let error = adapter(client.clone())
            .fetch_series(&ibm(), Granularity::Daily, OutputSize::Full)
            .await
            .expect_err("timeout");

        assert_eq!(error.kind(), SourceErrorKind::Transport);
        assert!(error.message().contains("timed out"));
        assert_eq!(client.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let client = Arc::new(ScriptedHttpClient::new([Ok(HttpResponse::with_status(
            503, "busy",
        ))]));
        let error = adapter(client.clone())
            .fetch_series(&ibm(), Granularity::Daily, OutputSize::Full)
            .await
            .expect_err("503");

        assert_eq!(error.kind(), SourceErrorKind::Transport);
        assert_eq!(client.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn search_maps_best_matches() {
        let client = Arc::new(ScriptedHttpClient::json([String::from(
            r#"{"bestMatches": [
                {"1. symbol": "TSCO.LON", "2. name": "Tesco PLC"},
                {"1. symbol": "TSCDY"},
                {"2. name": "missing symbol"}
            ]}"#,
        )]));
        let matches = adapter(client.clone())
            .search_symbols("tesco")
            .await
            .expect("search");

        assert_eq!(
            matches,
            vec![
                SymbolMatch::new("TSCO.LON", "Tesco PLC"),
                SymbolMatch::new("TSCDY", "TSCDY"),
            ]
        );
        let request = &client.recorded_requests()[0];
        assert_eq!(request.query_value("keywords"), Some("tesco"));
        assert_eq!(request.timeout_ms, 20_000);
    }

    #[tokio::test]
    async fn search_does_not_wait_out_rate_limit() {
        let client = Arc::new(ScriptedHttpClient::json([NOTE.to_owned()]));
        let error = adapter(client.clone())
            .search_symbols("ibm")
            .await
            .expect_err("rate limited");

        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
        assert_eq!(client.recorded_requests().len(), 1);
    }
}
