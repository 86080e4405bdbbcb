mod bootstrap;

use anyhow::{Context, Result};
use ipca_core::settings::{PipelineConfig, Settings};
use ipca_data::pipeline::{run_etl, EtlSummary};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("IPCA v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Mode: {}", settings.mode);

    match settings.mode.as_str() {
        "etl" => {
            run_batch(settings.pipeline_config()).await?;
        }
        "serve" => {
            ipca_server::serve(settings.server_config()?).await?;
        }
        "all" => {
            // Validate the bind address before spending time on the batch.
            let server_config = settings.server_config()?;
            run_batch(settings.pipeline_config()).await?;
            ipca_server::serve(server_config).await?;
        }
        other => anyhow::bail!("unknown mode: {other}"),
    }

    Ok(())
}

async fn run_batch(config: PipelineConfig) -> Result<EtlSummary> {
    let summary = tokio::task::spawn_blocking(move || run_etl(&config))
        .await
        .context("ETL task panicked")??;

    for period in &summary.periods {
        tracing::info!(
            "{}: {} rows, {} records, {} missing",
            period.period,
            period.rows_read,
            period.records,
            period.missing_cells
        );
    }
    tracing::info!(
        "Wrote {} rows to {} in {:.2}s",
        summary.rows_written,
        summary.output_path.display(),
        summary.elapsed_seconds
    );
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!("summary: {}", serde_json::to_string(&summary)?);
    }

    Ok(summary)
}
