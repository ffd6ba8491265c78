use crate::gazette_browser::{
    behavioral::BehavioralEngine,
    cdp::{as_document_script, CdpCommand},
    fingerprint::{UserAgentManager, UserAgentProfile},
    idle::{IdleStatus, IdleTracker, NetworkProbe, INFLIGHT_HOOK_SCRIPT, POLL_INTERVAL, PROBE_SCRIPT},
    stealth::StealthScripts,
};
use anyhow::{Context, Result};
use fantoccini::Client;
use gazette_common::StealthLevel;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// A tab of a [`GazetteDriver`](super::driver::GazetteDriver) session with
/// stealth scripts, network-idle waiting and markup capture.
pub struct GazettePage {
    pub(crate) client: Client,
    pub(crate) stealth_level: StealthLevel,
    pub(crate) fingerprint_manager: UserAgentManager,
    pub(crate) behavioral_engine: BehavioralEngine,
    preload: Option<Preload>,
}

/// How page scripts reach documents of this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preload {
    Registered,
    Unavailable,
}

/// Scripts evaluated in every new document: the request counter first, then
/// the stealth evasions for `level`.
pub fn document_scripts(level: StealthLevel, profile: &UserAgentProfile) -> Vec<String> {
    std::iter::once(INFLIGHT_HOOK_SCRIPT.to_string())
        .chain(
            StealthScripts::for_level(level, profile)
                .into_iter()
                .map(|script| as_document_script(&script)),
        )
        .collect()
}

impl GazettePage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(
        client: Client,
        stealth_level: StealthLevel,
        fingerprint_manager: UserAgentManager,
        behavioral_engine: BehavioralEngine,
    ) -> Self {
        Self {
            client,
            stealth_level,
            fingerprint_manager,
            behavioral_engine,
            preload: None,
        }
    }

    /// Navigate to `url` with the request counter and stealth scripts in place.
    ///
    /// The scripts are registered through CDP before the first navigation so
    /// they run ahead of the page's own code. If the driver has no CDP
    /// endpoint they are injected after load instead, which misses requests
    /// the page fires while loading.
    ///
    /// Returns once the browser reports the initial document loaded; use
    /// [`wait_for_network_idle`](Self::wait_for_network_idle) for pages that
    /// keep rendering afterwards.
    #[instrument(level = "debug", skip(self))]
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        if self.preload.is_none() {
            self.preload = Some(self.register_document_scripts().await);
        }

        self.behavioral_engine.random_delay(300, 1200).await;
        self.client.goto(url).await.map_err(anyhow::Error::from)?;

        if self.preload == Some(Preload::Unavailable) {
            self.inject_after_load().await?;
        }
        Ok(())
    }

    async fn register_document_scripts(&self) -> Preload {
        let profile = self.fingerprint_manager.session_profile();
        for script in document_scripts(self.stealth_level, profile) {
            let cmd = CdpCommand::add_script_on_new_document(script);
            if let Err(e) = self.client.issue_cmd(cmd).await {
                warn!(error = %e, "CDP unavailable, injecting page scripts after load");
                return Preload::Unavailable;
            }
        }
        debug!("page scripts registered for new documents");
        Preload::Registered
    }

    async fn inject_after_load(&self) -> Result<()> {
        let profile = self.fingerprint_manager.session_profile();
        for script in StealthScripts::for_level(self.stealth_level, profile) {
            self.client
                .execute(&script, vec![])
                .await
                .context("failed to apply stealth script")?;
        }
        self.client
            .execute(INFLIGHT_HOOK_SCRIPT, vec![])
            .await
            .context("failed to install request counter")?;
        Ok(())
    }

    /// Read the page's current network state.
    pub async fn probe_network(&self) -> Result<NetworkProbe> {
        let raw = self
            .client
            .execute(PROBE_SCRIPT, vec![])
            .await
            .context("network probe failed")?;
        serde_json::from_value(raw).context("unexpected network probe result")
    }

    /// Poll until the page is `complete`, no requests are in flight and no new
    /// resources have finished for `idle`, or until `timeout` elapses.
    #[instrument(level = "debug", skip(self), fields(idle_ms = idle.as_millis() as u64))]
    pub async fn wait_for_network_idle(&self, idle: Duration, timeout: Duration) -> Result<IdleStatus> {
        let started = Instant::now();
        let mut tracker = IdleTracker::new(idle, started);

        loop {
            let probe = self.probe_network().await?;
            let now = Instant::now();
            let elapsed = now.duration_since(started);

            if tracker.observe(&probe, now) {
                debug!(elapsed_ms = elapsed.as_millis() as u64, resources = probe.resources, "network idle");
                return Ok(IdleStatus::Settled { elapsed });
            }
            if elapsed >= timeout {
                return Ok(IdleStatus::TimedOut { elapsed });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Return the full page HTML source.
    pub async fn get_content(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::msg)
    }
}
