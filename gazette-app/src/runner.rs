use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use gazette_common::{FeedResult, GazetteError};
use gazette_config::{BrowserSettings, GazetteConfig};
use gazette_drivers::gazette_browser::driver::DriverOptions;
use gazette_sources::{Route, build_route, invoke};
use gazette_web::{BrowserCapturer, FantocciniCapturer, WaitUntil};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// A configured source ready to run.
pub struct Job {
    pub id: String,
    pub route: Arc<dyn Route>,
}

/// Outcome of one source, in configuration order.
pub struct Outcome {
    pub id: String,
    pub result: gazette_common::Result<FeedResult>,
}

/// Where feeds are written.
pub enum Sink {
    Stdout,
    Dir(PathBuf),
}

pub fn capturer_from(settings: &BrowserSettings) -> FantocciniCapturer {
    let options = DriverOptions {
        webdriver_url: settings.webdriver_url.clone(),
        headless: settings.headless,
        stealth_level: settings.stealth,
        page_load_timeout: Duration::from_secs(settings.navigation_timeout_secs),
    };
    let wait = WaitUntil::NetworkIdle {
        idle: Duration::from_millis(settings.idle_window_ms),
        timeout: Duration::from_secs(settings.idle_timeout_secs),
    };
    FantocciniCapturer::new(options, wait)
}

/// Resolve which sources to run.
///
/// With `only`, the named source is selected even if it is disabled in the
/// file; otherwise every enabled source runs.
pub fn plan(
    cfg: &GazetteConfig,
    only: Option<&str>,
    url_override: Option<&str>,
    capturer: Arc<dyn BrowserCapturer>,
) -> gazette_common::Result<Vec<Job>> {
    let specs: Vec<_> = match only {
        Some(id) => {
            let spec = cfg
                .sources
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| GazetteError::UnknownSource(id.to_string()))?;
            vec![spec]
        }
        None => {
            if url_override.is_some() {
                return Err(GazetteError::Config(
                    "--url needs exactly one selected source".into(),
                ));
            }
            cfg.enabled_sources().collect()
        }
    };

    specs
        .into_iter()
        .map(|spec| {
            let route = build_route(spec, url_override, capturer.clone())?;
            info!(source = %spec.id, kind = spec.details.kind(), "source planned");
            Ok(Job {
                id: spec.id.clone(),
                route,
            })
        })
        .collect()
}

/// Run every job with at most `concurrency` in flight.
pub async fn run(jobs: Vec<Job>, concurrency: usize) -> Vec<Outcome> {
    let mut outcomes: Vec<(usize, Outcome)> = stream::iter(jobs.into_iter().enumerate())
        .map(|(index, job)| async move {
            let result = invoke(job.route.as_ref(), &job.id).await;
            if let Err(e) = &result {
                error!(source = %job.id, error = %e, "source failed");
            }
            (index, Outcome { id: job.id, result })
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

fn render(feed: &FeedResult, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(feed)?
    } else {
        serde_json::to_string(feed)?
    };
    Ok(json)
}

pub fn write_feed(sink: &Sink, id: &str, feed: &FeedResult, pretty: bool) -> Result<()> {
    let json = render(feed, pretty)?;
    match sink {
        Sink::Stdout => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{json}")?;
        }
        Sink::Dir(dir) => {
            let path = feed_path(dir, id);
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(source = %id, path = %path.display(), "feed written");
        }
    }
    Ok(())
}

fn feed_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.json"))
}

/// Write every successful feed; returns how many sources failed, either
/// while running or while being written.
pub fn emit(outcomes: Vec<Outcome>, sink: &Sink, pretty: bool) -> Result<usize> {
    if let Sink::Dir(dir) = sink {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let mut failed = 0;
    for outcome in outcomes {
        let Ok(feed) = outcome.result else {
            failed += 1;
            continue;
        };
        if let Err(e) = write_feed(sink, &outcome.id, &feed, pretty) {
            error!(source = %outcome.id, error = %format!("{e:#}"), "feed write failed");
            failed += 1;
        }
    }
    Ok(failed)
}
