//! Driver layer for browser automation.
//!
//! This crate exposes the browser driver and page helpers used by sources
//! to collect rendered markup in a stealthy, reliable way.
//!
//! - [`gazette_browser::driver::GazetteDriver`]: WebDriver client wrapper
//! - [`gazette_browser::page::GazettePage`]: navigation, network-idle wait, markup capture
//! - [`gazette_browser::idle`]: network-idle detection
//! - [`gazette_browser::cdp`]: DevTools commands sent through chromedriver
//! - [`gazette_browser::behavioral::BehavioralEngine`]: human‑like timings
//! - [`gazette_browser::stealth`]: stealth arguments and JS evasions
pub mod gazette_browser;
