//! Announcements of the Chengdu housing portal (`zw.cdzjryb.com`).
//!
//! The list is an Ant Design table rendered client-side, so the page is
//! captured in a stealth browser after network activity settles. Each
//! `tr.ant-table-row` has four cells: title, region, type and publish time.
//! Rows carry no links of their own; every item links to the list page.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::FixedOffset;
use gazette_common::{FeedItem, FeedResult, GazetteError, Result};
use gazette_web::{BrowserCapturer, parse_date};
use tracing::{info, warn};
use url::Url;

use crate::context::RouteContext;
use crate::route::Route;
use crate::table::{ExtractionWarning, extract_rows, trim_trailing};

pub const FEED_TITLE: &str = "cdzj";
pub const FEED_DESCRIPTION: &str = "cdzj_des";
pub const ROW_SELECTOR: &str = "tr.ant-table-row";
pub const COLUMN_COUNT: usize = 4;

/// Separator between description fields, an encoded line feed.
pub const LINE_BREAK: &str = "&#xA;";

const TITLE: usize = 0;
const REGION: usize = 1;
const KIND: usize = 2;
const PUBLISHED: usize = 3;

/// Items read from one page plus any structural warnings.
#[derive(Debug)]
pub struct Extraction {
    pub items: Vec<FeedItem>,
    pub warnings: Vec<ExtractionWarning>,
}

/// Build the labelled multi-line description for one row.
pub fn compose_description(region: &str, kind: &str, published: &str) -> String {
    format!(
        "区域：{}{LINE_BREAK}类型：{}{LINE_BREAK}发布时间：{}",
        trim_trailing(region),
        trim_trailing(kind),
        trim_trailing(published)
    )
}

/// Map every announcement row of `html` to a [`FeedItem`] linking to `link`.
pub fn extract_announcements(html: &str, link: &str, offset: FixedOffset) -> Result<Extraction> {
    let table = extract_rows(html, ROW_SELECTOR, COLUMN_COUNT)?;

    let items = (0..table.rows.len())
        .map(|row| {
            let published = table.cell(row, PUBLISHED);
            let pub_date = parse_date(published, offset);
            if pub_date.is_none() {
                warn!(row, text = %published, "unparseable publish time");
            }
            FeedItem {
                title: trim_trailing(table.cell(row, TITLE)).to_string(),
                link: link.to_string(),
                pub_date,
                description: compose_description(
                    table.cell(row, REGION),
                    table.cell(row, KIND),
                    published,
                ),
            }
        })
        .collect();

    Ok(Extraction {
        items,
        warnings: table.warnings,
    })
}

/// Route for the portal's announcement list.
pub struct CdzjRoute {
    target: String,
    url: Url,
    offset: FixedOffset,
    capturer: Arc<dyn BrowserCapturer>,
}

impl CdzjRoute {
    pub fn new(target: &str, offset: FixedOffset, capturer: Arc<dyn BrowserCapturer>) -> Result<Self> {
        let url = Url::parse(target)
            .map_err(|e| GazetteError::Config(format!("invalid cdzj url `{target}`: {e}")))?;
        Ok(Self {
            target: target.to_string(),
            url,
            offset,
            capturer,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl Route for CdzjRoute {
    fn name(&self) -> &'static str {
        "cdzj"
    }

    async fn handle(&self, ctx: &mut RouteContext) -> Result<()> {
        let capture = self.capturer.capture(&self.url).await?;
        let extraction = extract_announcements(&capture.html, &self.target, self.offset)?;

        for warning in &extraction.warnings {
            warn!(%warning, checksum = %capture.html_checksum, "announcement table mismatch");
        }
        info!(items = extraction.items.len(), "extracted announcements");

        ctx.state.data = Some(FeedResult::new(
            FEED_TITLE,
            self.target.as_str(),
            FEED_DESCRIPTION,
            extraction.items,
        ));
        Ok(())
    }
}
