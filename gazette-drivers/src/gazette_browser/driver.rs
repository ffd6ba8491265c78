use crate::gazette_browser::{
    behavioral::BehavioralEngine,
    fingerprint::UserAgentManager,
    page::GazettePage,
    stealth::{build_stealth_arguments, headless_arguments},
};
use anyhow::{Context, Result};
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use gazette_common::StealthLevel;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};
use webdriver::capabilities::Capabilities;

/// How to reach and configure the WebDriver-controlled browser.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub webdriver_url: String,
    pub headless: bool,
    pub stealth_level: StealthLevel,
    pub page_load_timeout: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            stealth_level: StealthLevel::default(),
            page_load_timeout: Duration::from_secs(30),
        }
    }
}

/// Thin wrapper around a `fantoccini` WebDriver client with stealth and
/// behavioral helpers.
///
/// One driver is one browser session. [`close`](Self::close) consumes the
/// driver, so a session cannot be closed twice; if the driver is dropped
/// without closing (for example when its future is cancelled), fantoccini
/// ends the WebDriver session once the last client handle goes away.
pub struct GazetteDriver {
    pub client: Client,
    pub behavioral_engine: BehavioralEngine,
    pub user_agent_manager: UserAgentManager,
    pub stealth_level: StealthLevel,
}

impl GazetteDriver {
    /// Create a new driver connected to a running WebDriver service
    /// (Chromedriver by default).
    pub async fn new(options: &DriverOptions) -> Result<Self> {
        let user_agent_manager = UserAgentManager::new();
        let caps = chrome_capabilities(options, &user_agent_manager);

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .with_context(|| format!("failed to start session at {}", options.webdriver_url))?;

        client
            .update_timeouts(TimeoutConfiguration::new(
                None,
                Some(options.page_load_timeout),
                None,
            ))
            .await
            .context("failed to set page load timeout")?;

        info!(
            webdriver = %options.webdriver_url,
            headless = options.headless,
            stealth = ?options.stealth_level,
            "browser session started"
        );

        Ok(Self {
            client,
            behavioral_engine: BehavioralEngine::new(),
            user_agent_manager,
            stealth_level: options.stealth_level,
        })
    }

    /// Open a page bound to this session.
    pub fn new_page(&self) -> GazettePage {
        GazettePage::new(
            self.client.clone(),
            self.stealth_level,
            self.user_agent_manager.clone(),
            self.behavioral_engine.clone(),
        )
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        debug!("browser session closed");
        Ok(())
    }
}

fn chrome_capabilities(options: &DriverOptions, user_agents: &UserAgentManager) -> Capabilities {
    let mut args = build_stealth_arguments(options.stealth_level, user_agents.session_profile());
    if options.headless {
        args.extend(headless_arguments().iter().map(|a| a.to_string()));
    }

    let mut chrome_opts = HashMap::new();
    chrome_opts.insert("args".to_string(), json!(args));
    chrome_opts.insert(
        "excludeSwitches".to_string(),
        json!(["enable-automation"]),
    );

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazette_browser::fingerprint::desktop_profiles;

    #[test]
    fn headless_flags_follow_options() {
        let manager = UserAgentManager::with_profile(desktop_profiles().remove(0));

        let caps = chrome_capabilities(&DriverOptions::default(), &manager);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert!(args
            .iter()
            .any(|a| a == "--disable-blink-features=AutomationControlled"));
        assert_eq!(
            caps["goog:chromeOptions"]["excludeSwitches"][0],
            "enable-automation"
        );

        let headed = DriverOptions {
            headless: false,
            ..DriverOptions::default()
        };
        let caps = chrome_capabilities(&headed, &manager);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }
}
