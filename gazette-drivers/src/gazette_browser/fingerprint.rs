use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Snapshot of user agent, viewport, and locale characteristics.
pub struct UserAgentProfile {
    pub user_agent: String,
    pub viewport: (u32, u32),
    pub platform: String,
    pub languages: Vec<String>,
    pub timezone: String,
}

#[derive(Debug, Clone)]
/// Holds the fingerprint chosen for one browser session.
///
/// The profile is picked once at construction and reused for every page of
/// the session so launch arguments and injected scripts agree.
pub struct UserAgentManager {
    session_profile: UserAgentProfile,
}

impl Default for UserAgentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAgentManager {
    /// Create a manager with a randomly selected built‑in desktop profile.
    pub fn new() -> Self {
        let profiles = desktop_profiles();
        let mut rng = rand::thread_rng();
        let session_profile = profiles
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| profiles[0].clone());
        Self { session_profile }
    }

    /// Pin the session to a specific profile.
    pub fn with_profile(session_profile: UserAgentProfile) -> Self {
        Self { session_profile }
    }

    /// The profile used by the current session.
    pub fn session_profile(&self) -> &UserAgentProfile {
        &self.session_profile
    }
}

/// Plausible desktop Chrome fingerprints. Portal targets are mainland sites,
/// so the pool leans on `zh-CN` locales.
pub fn desktop_profiles() -> Vec<UserAgentProfile> {
    vec![
        UserAgentProfile {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            viewport: (1920, 1080),
            platform: "Win32".to_string(),
            languages: vec!["zh-CN".to_string(), "zh".to_string()],
            timezone: "Asia/Shanghai".to_string(),
        },
        UserAgentProfile {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            viewport: (1366, 768),
            platform: "Win32".to_string(),
            languages: vec!["zh-CN".to_string(), "zh".to_string(), "en".to_string()],
            timezone: "Asia/Shanghai".to_string(),
        },
        UserAgentProfile {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            viewport: (1440, 900),
            platform: "MacIntel".to_string(),
            languages: vec!["en-US".to_string(), "en".to_string()],
            timezone: "America/Los_Angeles".to_string(),
        },
    ]
}
