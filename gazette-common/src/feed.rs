//! Normalized feed records.
//!
//! Field names on the wire follow the aggregation framework's item shape
//! (`title`, `link`, `pubDate`, `description`, `item`).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One entry of a feed, built from a single scraped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// Normalized publication time, `None` when the source text could not be parsed.
    #[serde(rename = "pubDate")]
    pub pub_date: Option<DateTime<FixedOffset>>,
    pub description: String,
}

/// The complete output of one source invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResult {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Items in source document order.
    pub item: Vec<FeedItem>,
}

impl FeedResult {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
        item: Vec<FeedItem>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: description.into(),
            item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_framework_field_names() {
        let pub_date = DateTime::parse_from_rfc3339("2023-05-01T00:00:00+08:00").unwrap();
        let feed = FeedResult::new(
            "cdzj",
            "https://example.com/",
            "cdzj_des",
            vec![FeedItem {
                title: "Notice A".into(),
                link: "https://example.com/".into(),
                pub_date: Some(pub_date),
                description: "区域：RegionX".into(),
            }],
        );

        let value = serde_json::to_value(&feed).unwrap();
        assert_eq!(value["item"][0]["pubDate"], json!("2023-05-01T00:00:00+08:00"));
        assert_eq!(value["item"][0]["title"], json!("Notice A"));
        assert_eq!(value["description"], json!("cdzj_des"));
    }

    #[test]
    fn missing_pub_date_serializes_as_null() {
        let item = FeedItem {
            title: "t".into(),
            link: "l".into(),
            pub_date: None,
            description: "d".into(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert!(value["pubDate"].is_null());
    }
}
