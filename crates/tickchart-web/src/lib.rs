//! # Tickchart Web
//!
//! Form-driven chart page and live symbol search over the core adapter.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | Chart form, fallback symbols in the dropdown |
//! | `POST /` | Validate the form, fetch, render `chart.svg` into the static dir |
//! | `GET /search_symbols?q=` | JSON `[{symbol, name}]`, falling back to the catalog |
//! | `GET /static/*` | Files from the static dir |
//!
//! Every chart is written to the same `chart.svg`; concurrent submissions
//! overwrite each other and the last write wins.

pub mod error;
pub mod form;
pub mod page;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tickchart_core::render::IMAGE_FILE;
use tickchart_core::{
    resolve_search, AlphaVantageAdapter, AppConfig, ChartArtifact, ChartMeta, OutputSize,
    SymbolCatalog, SymbolMatch,
};

use crate::error::ChartError;
use crate::form::ChartForm;
use crate::page::{render_index, PageView};

/// Shared, read-only server state.
#[derive(Clone)]
pub struct AppState {
    adapter: AlphaVantageAdapter,
    catalog: Arc<SymbolCatalog>,
    static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        adapter: AlphaVantageAdapter,
        catalog: SymbolCatalog,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            adapter,
            catalog: Arc::new(catalog),
            static_dir: static_dir.into(),
        }
    }

    /// Real adapter, catalog loaded from the configured CSV.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            AlphaVantageAdapter::from_config(config),
            SymbolCatalog::load(&config.symbols_csv),
            config.static_dir.clone(),
        )
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(index).post(generate_chart))
        .route("/search_symbols", get(search_symbols))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.catalog.entries(), &PageView::default()))
}

async fn generate_chart(
    State(state): State<AppState>,
    Form(form): Form<ChartForm>,
) -> Html<String> {
    let view = match build_chart(&state, &form).await {
        Ok(chart_url) => PageView {
            form: Some(&form),
            chart_url: Some(chart_url),
            error: None,
        },
        Err(error) => {
            match &error {
                ChartError::MissingSymbol | ChartError::Validation(_) => {
                    tracing::info!(%error, "rejected chart form");
                }
                _ => tracing::error!(%error, "chart request failed"),
            }
            PageView {
                form: Some(&form),
                chart_url: None,
                error: Some(error.to_string()),
            }
        }
    };
    Html(render_index(state.catalog.entries(), &view))
}

async fn build_chart(state: &AppState, form: &ChartForm) -> Result<String, ChartError> {
    let request = form.to_request()?;
    let series = state
        .adapter
        .fetch_chart(&request, OutputSize::Compact)
        .await?;

    let meta = ChartMeta::new(
        request.symbol.clone(),
        request.chart_type,
        request.range.as_ref(),
        &series,
    );
    ChartArtifact::render(&series, &meta).write_to(&state.static_dir)?;
    tracing::info!(symbol = %request.symbol, rows = series.len(), "chart rendered");

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    Ok(format!("/static/{IMAGE_FILE}?t={stamp}"))
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search_symbols(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SymbolMatch>> {
    Json(resolve_search(&state.adapter, &state.catalog, &params.q).await)
}
