use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gazette_common::{GazetteError, Result};
use gazette_drivers::gazette_browser::driver::{DriverOptions, GazetteDriver};
use gazette_drivers::gazette_browser::idle::{DEFAULT_IDLE_TIMEOUT, DEFAULT_IDLE_WINDOW, IdleStatus};
use gazette_drivers::gazette_browser::page::GazettePage;
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct PageCapture {
    pub url: Url,
    pub html: String,
    /// blake3 of the markup, hex encoded.
    pub html_checksum: String,
    pub captured_at: DateTime<Utc>,
}

impl PageCapture {
    pub fn new(url: Url, html: String) -> Self {
        let html_checksum = blake3::hash(html.as_bytes()).to_hex().to_string();
        Self {
            url,
            html,
            html_checksum,
            captured_at: Utc::now(),
        }
    }
}

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// The browser's own load event.
    Load,
    /// Load event, then no network activity for `idle`, giving up after `timeout`.
    NetworkIdle { idle: Duration, timeout: Duration },
}

impl Default for WaitUntil {
    fn default() -> Self {
        WaitUntil::NetworkIdle {
            idle: DEFAULT_IDLE_WINDOW,
            timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

/// One live browser session with a single page.
///
/// `close` takes the session by value: once closed it cannot be used or
/// closed again.
#[async_trait]
pub trait PageSession: Send {
    async fn navigate(&mut self, url: &Url, wait: WaitUntil) -> Result<()>;
    async fn content(&mut self) -> Result<String>;
    async fn close(self) -> Result<()>;
}

/// Navigate, capture the rendered markup, and release `session`.
///
/// The session is closed exactly once whatever happens in between. When both
/// the capture and the close fail, the capture error is returned and the
/// close error is logged.
#[instrument(level = "info", skip(session), fields(url = %url))]
pub async fn capture_with<S: PageSession>(
    mut session: S,
    url: &Url,
    wait: WaitUntil,
) -> Result<PageCapture> {
    let outcome: Result<String> = async {
        session.navigate(url, wait).await?;
        session.content().await
    }
    .await;

    let closed = session.close().await;

    match (outcome, closed) {
        (Ok(html), Ok(())) => {
            let capture = PageCapture::new(url.clone(), html);
            info!(
                bytes = capture.html.len(),
                checksum = %capture.html_checksum,
                "captured rendered page"
            );
            Ok(capture)
        }
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!(error = %close_err, "session close failed after capture error");
            Err(err)
        }
    }
}

#[async_trait]
pub trait BrowserCapturer: Send + Sync {
    async fn capture(&self, url: &Url) -> Result<PageCapture>;
}

/// [`PageSession`] backed by a fantoccini WebDriver session.
pub struct FantocciniSession {
    driver: GazetteDriver,
    page: GazettePage,
}

impl FantocciniSession {
    pub async fn launch(options: &DriverOptions) -> Result<Self> {
        let driver = GazetteDriver::new(options).await?;
        let page = driver.new_page();
        Ok(Self { driver, page })
    }
}

#[async_trait]
impl PageSession for FantocciniSession {
    async fn navigate(&mut self, url: &Url, wait: WaitUntil) -> Result<()> {
        let navigation_error = |e: anyhow::Error| GazetteError::Navigation {
            url: url.to_string(),
            reason: format!("{e:#}"),
        };

        self.page.goto(url.as_str()).await.map_err(navigation_error)?;

        if let WaitUntil::NetworkIdle { idle, timeout } = wait {
            let status = self
                .page
                .wait_for_network_idle(idle, timeout)
                .await
                .map_err(navigation_error)?;
            if let IdleStatus::TimedOut { elapsed } = status {
                return Err(GazetteError::RenderTimeout {
                    waited_ms: elapsed.as_millis() as u64,
                });
            }
        }
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        self.page
            .get_content()
            .await
            .map_err(|e| GazetteError::Capture(format!("{e:#}")))
    }

    async fn close(self) -> Result<()> {
        drop(self.page);
        self.driver
            .close()
            .await
            .map_err(|e| GazetteError::SessionClose(format!("{e:#}")))
    }
}

/// Concrete capturer backed by the fantoccini-based driver. Every call
/// launches and releases its own browser session.
#[derive(Debug, Clone, Default)]
pub struct FantocciniCapturer {
    pub options: DriverOptions,
    pub wait: WaitUntil,
}

impl FantocciniCapturer {
    pub fn new(options: DriverOptions, wait: WaitUntil) -> Self {
        Self { options, wait }
    }
}

#[async_trait]
impl BrowserCapturer for FantocciniCapturer {
    async fn capture(&self, url: &Url) -> Result<PageCapture> {
        let session = FantocciniSession::launch(&self.options).await?;
        capture_with(session, url, self.wait).await
    }
}
