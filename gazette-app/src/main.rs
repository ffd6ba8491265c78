use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, DEFAULT_CONFIG};
use gazette_common::observability::{LogConfig, init_logging};
use gazette_config::{GazetteConfig, GazetteConfigLoader};
use runner::{Sink, capturer_from, emit, plan, run};
use std::sync::Arc;
use tracing::info;

mod cli;
mod runner;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit path must exist; the default file is optional (env wins either way)
    let loader = match &cli.config {
        Some(path) => GazetteConfigLoader::new().with_file(path),
        None => GazetteConfigLoader::new().with_optional_file(DEFAULT_CONFIG),
    };
    let cfg: GazetteConfig = loader.load()?;

    let log_path = init_logging(LogConfig {
        app_name: "gazette",
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
    })?;
    info!(log = %log_path.display(), "gazette starting");

    let capturer = Arc::new(capturer_from(&cfg.browser));
    let jobs = plan(&cfg, cli.source.as_deref(), cli.url.as_deref(), capturer)?;
    let total = jobs.len();

    let outcomes = run(jobs, cfg.browser.max_concurrent_sessions).await;

    let sink = match cli.output_dir {
        Some(dir) => Sink::Dir(dir),
        None => Sink::Stdout,
    };
    let failed = emit(outcomes, &sink, cli.pretty)?;

    info!(total, failed, "run finished");
    if failed > 0 {
        bail!("{failed} of {total} sources failed");
    }
    Ok(())
}
