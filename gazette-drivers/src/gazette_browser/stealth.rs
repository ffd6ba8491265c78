use gazette_common::StealthLevel;

use super::fingerprint::UserAgentProfile;

/// Construct Chrome command‑line arguments for a given stealth level
/// and fingerprint.
pub fn build_stealth_arguments(level: StealthLevel, user_profile: &UserAgentProfile) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        "--disable-plugins-discovery".to_string(),
        format!("--user-agent={}", user_profile.user_agent),
        format!(
            "--window-size={},{}",
            user_profile.viewport.0, user_profile.viewport.1
        ),
        format!("--lang={}", user_profile.languages.join(",")),
    ];
    if let StealthLevel::Maximum = level {
        args.push("--disable-gpu".to_string());
    }
    args
}

/// Arguments appended when the browser runs without a window.
pub fn headless_arguments() -> [&'static str; 2] {
    ["--headless=new", "--disable-gpu"]
}

/// JavaScript evasions that hide automation signals from page scripts.
pub struct StealthScripts;

impl StealthScripts {
    /// Hide `navigator.webdriver` and present the profile's languages.
    pub fn core_evasions(languages: &[String]) -> String {
        let langs = serde_json::to_string(languages).unwrap_or_else(|_| "[]".to_string());
        format!(
            r#"
            Object.defineProperty(navigator, 'webdriver', {{ get: () => undefined }});
            Object.defineProperty(navigator, 'plugins', {{ get: () => [1,2,3] }});
            Object.defineProperty(navigator, 'languages', {{
                get: () => {langs}
            }});
            if (!window.chrome) window.chrome = {{ runtime: {{}} }};
        "#
        )
    }

    pub fn platform_override(platform: &str) -> String {
        let platform = serde_json::to_string(platform).unwrap_or_else(|_| "''".to_string());
        format!("Object.defineProperty(navigator, 'platform', {{ get: () => {platform} }});")
    }

    pub fn webgl_evasions() -> &'static str {
        r#"
            const getParameter = WebGLRenderingContext.prototype.getParameter;
            WebGLRenderingContext.prototype.getParameter = function(parameter) {
                if (parameter === 37445) return 'Intel Inc.';
                if (parameter === 37446) return 'Intel Iris OpenGL Engine';
                return getParameter.call(this, parameter);
            };
        "#
    }

    pub fn canvas_evasions() -> &'static str {
        r#"
            const getContext = HTMLCanvasElement.prototype.getContext;
            HTMLCanvasElement.prototype.getContext = function(type,...args){
                const ctx = getContext.call(this,type,...args);
                if(type==='2d' && ctx) {
                    const origToDataURL=this.toDataURL;
                    this.toDataURL=function(...a){
                        const imgdata=ctx.getImageData(0,0,this.width,this.height);
                        for(let i=0;i<imgdata.data.length;i+=4){
                            if(Math.random()<0.001)imgdata.data[i]+=Math.random()<0.5?-1:1;
                        }
                        ctx.putImageData(imgdata,0,0);
                        return origToDataURL.call(this,...a);
                    };
                }
                return ctx;
            };
        "#
    }

    /// Evasion scripts for the given level, in order.
    pub fn for_level(level: StealthLevel, profile: &UserAgentProfile) -> Vec<String> {
        let mut scripts = vec![Self::core_evasions(&profile.languages)];
        match level {
            StealthLevel::Lightweight => {}
            StealthLevel::Balanced => {
                scripts.push(Self::canvas_evasions().to_string());
            }
            StealthLevel::Maximum => {
                scripts.push(Self::canvas_evasions().to_string());
                scripts.push(Self::webgl_evasions().to_string());
                scripts.push(Self::platform_override(&profile.platform));
            }
        }
        scripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazette_browser::fingerprint::desktop_profiles;

    #[test]
    fn arguments_hide_automation_and_carry_fingerprint() {
        let profile = desktop_profiles().remove(0);
        let args = build_stealth_arguments(StealthLevel::Balanced, &profile);

        assert!(args.contains(&"--disable-blink-features=AutomationControlled".to_string()));
        assert!(args.contains(&format!("--user-agent={}", profile.user_agent)));
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
        assert!(args.contains(&"--lang=zh-CN,zh".to_string()));
        assert!(!args.contains(&"--disable-gpu".to_string()));
    }

    #[test]
    fn maximum_level_disables_gpu() {
        let profile = desktop_profiles().remove(0);
        let args = build_stealth_arguments(StealthLevel::Maximum, &profile);
        assert!(args.contains(&"--disable-gpu".to_string()));
    }

    #[test]
    fn script_set_grows_with_level() {
        let profile = desktop_profiles().remove(2);
        assert_eq!(StealthScripts::for_level(StealthLevel::Lightweight, &profile).len(), 1);
        assert_eq!(StealthScripts::for_level(StealthLevel::Balanced, &profile).len(), 2);

        let max = StealthScripts::for_level(StealthLevel::Maximum, &profile);
        assert_eq!(max.len(), 4);
        assert!(max[3].contains("\"MacIntel\""));
    }

    #[test]
    fn core_evasions_embed_languages_as_json() {
        let script = StealthScripts::core_evasions(&["zh-CN".to_string(), "zh".to_string()]);
        assert!(script.contains(r#"["zh-CN","zh"]"#));
        assert!(script.contains("navigator, 'webdriver'"));
    }
}
