//! Chrome DevTools commands tunnelled through chromedriver.
//!
//! Chromedriver exposes `POST /session/{id}/goog/cdp/execute`, which fantoccini
//! does not wrap, so commands are issued as a custom
//! [`WebDriverCompatibleCommand`].

use fantoccini::wd::WebDriverCompatibleCommand;
use http::Method;
use serde_json::{json, Value};
use url::{ParseError, Url};

#[derive(Debug, Clone, PartialEq)]
pub struct CdpCommand {
    pub cmd: &'static str,
    pub params: Value,
}

impl CdpCommand {
    /// Run `source` in every new document before any of the page's scripts.
    pub fn add_script_on_new_document(source: impl Into<String>) -> Self {
        Self {
            cmd: "Page.addScriptToEvaluateOnNewDocument",
            params: json!({ "source": source.into() }),
        }
    }

    fn body(&self) -> String {
        json!({ "cmd": self.cmd, "params": self.params }).to_string()
    }
}

impl WebDriverCompatibleCommand for CdpCommand {
    fn endpoint(&self, base_url: &Url, session_id: Option<&str>) -> Result<Url, ParseError> {
        let session = session_id.ok_or(ParseError::EmptyHost)?;
        base_url.join(&format!("session/{session}/goog/cdp/execute"))
    }

    fn method_and_body(&self, _request_url: &Url) -> (Method, Option<String>) {
        (Method::POST, Some(self.body()))
    }
}

/// Wrap a WebDriver `execute` body (which may `return`) so it can run as a
/// standalone document script with its own scope.
pub fn as_document_script(body: &str) -> String {
    format!("(function () {{\n{body}\n}})();")
}
