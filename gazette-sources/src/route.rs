use async_trait::async_trait;
use gazette_common::{FeedResult, GazetteError, Result};
use tracing::{Instrument, info_span};

use crate::context::RouteContext;

#[async_trait]
pub trait Route: Send + Sync {
    /// Stable route name, used in logs.
    fn name(&self) -> &'static str;

    /// Produce the feed and store it in `ctx.state.data`.
    async fn handle(&self, ctx: &mut RouteContext) -> Result<()>;
}

/// Run `route` in a fresh context and take the feed it produced.
pub async fn invoke(route: &dyn Route, source_id: &str) -> Result<FeedResult> {
    let mut ctx = RouteContext::new(source_id);
    let span = info_span!(
        "route",
        route = route.name(),
        source = %ctx.source_id,
        request_id = %ctx.request_id
    );

    route.handle(&mut ctx).instrument(span).await?;

    ctx.state
        .data
        .take()
        .ok_or_else(|| GazetteError::EmptyState(route.name().to_string()))
}
