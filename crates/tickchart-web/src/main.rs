use std::process::ExitCode;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use tickchart_core::AppConfig;
use tickchart_web::error::StartupError;
use tickchart_web::{create_router, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config);
    std::fs::create_dir_all(state.static_dir())?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.bind_addr.clone(),
            source,
        })?;
    tracing::info!(
        addr = %config.bind_addr,
        static_dir = %state.static_dir().display(),
        "tickchart-web listening"
    );

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
