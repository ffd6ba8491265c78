//! Network-idle detection for client-side rendered pages.
//!
//! WebDriver has no native "network idle" signal, so the page is probed
//! from JavaScript. A counter of in-flight `fetch`/XHR requests
//! ([`INFLIGHT_HOOK_SCRIPT`]) is registered to run in each new document
//! before the page's own scripts, so requests fired during load are counted
//! too. Each probe reads
//! `document.readyState`, the number of finished resource-timing entries and
//! that counter ([`PROBE_SCRIPT`]). The page is idle once it is `complete`,
//! nothing is in flight, and the resource count has not moved for the idle
//! window.

use serde::Deserialize;
use std::time::{Duration, Instant};

/// Resource-timing entries kept by the browser; Chrome stops recording at 250.
pub const RESOURCE_TIMING_BUFFER: u32 = 10_000;

/// Default quiet window, matching the usual "no connections for 500 ms" rule.
pub const DEFAULT_IDLE_WINDOW: Duration = Duration::from_millis(500);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const INFLIGHT_HOOK_SCRIPT: &str = r#"
    (function () {
        if (window.__gazetteInflight !== undefined) return;
        window.__gazetteInflight = 0;
        if (performance.setResourceTimingBufferSize) {
            performance.setResourceTimingBufferSize(10000);
        }
        const done = () => { window.__gazetteInflight = Math.max(0, window.__gazetteInflight - 1); };
        if (window.fetch) {
            const origFetch = window.fetch;
            window.fetch = function (...args) {
                window.__gazetteInflight += 1;
                return origFetch.apply(this, args).finally(done);
            };
        }
        const origSend = XMLHttpRequest.prototype.send;
        XMLHttpRequest.prototype.send = function (...args) {
            window.__gazetteInflight += 1;
            this.addEventListener('loadend', done, { once: true });
            return origSend.apply(this, args);
        };
    })();
"#;

pub const PROBE_SCRIPT: &str = r#"
    return {
        ready: document.readyState,
        resources: performance.getEntriesByType('resource').length,
        inflight: window.__gazetteInflight || 0
    };
"#;

/// One reading of the page's network state.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NetworkProbe {
    pub ready: String,
    pub resources: u64,
    #[serde(default)]
    pub inflight: u64,
}

impl NetworkProbe {
    pub fn is_complete(&self) -> bool {
        self.ready == "complete"
    }
}

/// Result of waiting for the network to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleStatus {
    Settled { elapsed: Duration },
    TimedOut { elapsed: Duration },
}

/// Tracks probes over time and decides when the quiet window has elapsed.
#[derive(Debug)]
pub struct IdleTracker {
    idle: Duration,
    last_resources: Option<u64>,
    quiet_since: Instant,
}

impl IdleTracker {
    pub fn new(idle: Duration, now: Instant) -> Self {
        Self {
            idle,
            last_resources: None,
            quiet_since: now,
        }
    }

    /// Record a probe taken at `now`; returns `true` once the page is idle.
    pub fn observe(&mut self, probe: &NetworkProbe, now: Instant) -> bool {
        let moved = self.last_resources != Some(probe.resources);
        self.last_resources = Some(probe.resources);

        if moved || !probe.is_complete() || probe.inflight > 0 {
            self.quiet_since = now;
            return false;
        }
        now.duration_since(self.quiet_since) >= self.idle
    }
}
