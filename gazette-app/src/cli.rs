//! Command-line interface for the gazette runner.

use clap::Parser;
use std::path::PathBuf;

/// Default configuration file, read only if present.
pub const DEFAULT_CONFIG: &str = "gazette.yaml";

/// Scrape configured portal pages into feed JSON.
///
/// ```sh
/// # every enabled source, one JSON document per source on stdout
/// gazette --pretty
///
/// # one source against a mirror, written to ./feeds/cdzj.json
/// gazette --source cdzj --url http://mirror.local/#/main/func/accouncement -o ./feeds
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file (defaults to ./gazette.yaml if it exists)
    #[arg(short, long, env = "GAZETTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run only the source with this id
    #[arg(short, long)]
    pub source: Option<String>,

    /// Override the target URL of the selected source
    #[arg(long, requires = "source")]
    pub url: Option<String>,

    /// Write `<id>.json` per source into this directory instead of stdout
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
