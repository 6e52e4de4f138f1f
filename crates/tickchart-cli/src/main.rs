mod browser;
mod cli;
mod error;
mod prompt;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use tickchart_core::{AlphaVantageAdapter, AppConfig, ChartArtifact, ChartMeta, OutputSize};

use crate::cli::Cli;
use crate::error::CliError;
use crate::prompt::Prompter;

const TEMP_PREFIX: &str = "stock_chart_";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("\n{}", error.user_message());
            ExitCode::from(error.exit_code())
        }
    }
}

/// Logs go to stderr at `warn` unless `RUST_LOG` says otherwise, so the
/// prompts on stdout stay readable.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let request = Prompter::new(io::stdin().lock(), io::stdout()).collect(&cli)?;

    let mut config = AppConfig::from_env()?;
    if let Some(api_key) = cli.api_key.clone() {
        config.api_key = api_key;
    }
    let adapter = AlphaVantageAdapter::from_config(&config);

    let series = adapter.fetch_chart(&request, OutputSize::Full).await?;
    let meta = ChartMeta::new(
        request.symbol.clone(),
        request.chart_type,
        request.range.as_ref(),
        &series,
    );

    let dir = output_dir(cli.output_dir)?;
    let paths = ChartArtifact::render(&series, &meta).write_to(&dir)?;
    tracing::info!(html = %paths.html.display(), rows = series.len(), "chart written");

    if cli.no_open {
        println!("\nChart written to {}", paths.html.display());
        return Ok(());
    }

    match browser::open(&paths.html) {
        Ok(()) => println!("\nChart successfully generated and opened in your browser!"),
        Err(error) => {
            tracing::warn!(%error, "could not launch a browser");
            println!(
                "\nChart generated; open {} to view it.",
                browser::file_url(&paths.html)
            );
        }
    }
    Ok(())
}

/// The requested directory, or a fresh temp dir that outlives the process.
fn output_dir(requested: Option<PathBuf>) -> io::Result<PathBuf> {
    match requested {
        Some(dir) => Ok(dir),
        None => Ok(tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()?
            .into_path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_output_dir_is_kept_with_prefix() {
        let dir = output_dir(None).expect("temp dir");
        let name = dir
            .file_name()
            .and_then(|name| name.to_str())
            .expect("utf-8 name");

        assert!(name.starts_with(TEMP_PREFIX));
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn requested_output_dir_is_used_as_is() {
        let requested = PathBuf::from("charts/out");
        assert_eq!(output_dir(Some(requested.clone())).expect("dir"), requested);
    }
}
