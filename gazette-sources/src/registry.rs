use std::sync::Arc;

use chrono::FixedOffset;
use gazette_common::{GazetteError, Result};
use gazette_config::{SourceDetails, SourceSpec};
use gazette_web::BrowserCapturer;

use crate::cdzj::CdzjRoute;
use crate::route::Route;

/// Build the route for one configured source.
///
/// `url_override` replaces the configured target URL.
pub fn build_route(
    spec: &SourceSpec,
    url_override: Option<&str>,
    capturer: Arc<dyn BrowserCapturer>,
) -> Result<Arc<dyn Route>> {
    match &spec.details {
        SourceDetails::Cdzj { config } => {
            let offset = utc_offset(config.utc_offset_hours)?;
            let target = url_override.unwrap_or(&config.url);
            Ok(Arc::new(CdzjRoute::new(target, offset, capturer)?))
        }
    }
}

fn utc_offset(hours: i32) -> Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| GazetteError::Config(format!("utc offset out of range: {hours}h")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gazette_config::GazetteConfigLoader;
    use gazette_web::PageCapture;
    use url::Url;

    struct Unused;

    #[async_trait]
    impl BrowserCapturer for Unused {
        async fn capture(&self, url: &Url) -> Result<PageCapture> {
            Err(GazetteError::Capture(format!("not expected: {url}")))
        }
    }

    fn sources(yaml: &str) -> Vec<SourceSpec> {
        GazetteConfigLoader::new()
            .with_yaml_str(yaml)
            .load()
            .unwrap()
            .sources
    }

    #[test]
    fn builds_cdzj_route_from_config() {
        let specs = sources(
            r#"
sources:
  - id: cdzj
    kind: cdzj
"#,
        );
        let route = build_route(&specs[0], None, Arc::new(Unused)).unwrap();
        assert_eq!(route.name(), "cdzj");
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let specs = sources(
            r#"
sources:
  - id: cdzj
    kind: cdzj
    config:
      utc_offset_hours: 30
"#,
        );
        let err = build_route(&specs[0], None, Arc::new(Unused)).err().unwrap();
        assert!(matches!(err, GazetteError::Config(_)));
    }

    #[test]
    fn rejects_bad_override_url() {
        let specs = sources(
            r#"
sources:
  - id: cdzj
    kind: cdzj
"#,
        );
        let err = build_route(&specs[0], Some("::nope"), Arc::new(Unused))
            .err()
            .unwrap();
        assert!(matches!(err, GazetteError::Config(_)));
    }
}
