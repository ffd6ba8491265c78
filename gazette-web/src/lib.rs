//! Page acquisition utilities.
//!
//! - Browser capture seam and its Fantoccini-backed implementation (`browser`)
//! - Normalization of publication timestamps scraped from pages (`dates`)

pub mod browser;
pub mod dates;

pub use browser::{BrowserCapturer, FantocciniCapturer, PageCapture, PageSession, WaitUntil};
pub use dates::parse_date;
