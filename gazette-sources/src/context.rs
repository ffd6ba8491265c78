use gazette_common::FeedResult;
use uuid::Uuid;

/// Per-invocation execution context handed to a route.
#[derive(Debug)]
pub struct RouteContext {
    pub request_id: Uuid,
    pub source_id: String,
    pub state: RouteState,
}

/// Mutable slot the route fills in; `data` stays `None` if the route fails.
#[derive(Debug, Default)]
pub struct RouteState {
    pub data: Option<FeedResult>,
}

impl RouteContext {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            source_id: source_id.into(),
            state: RouteState::default(),
        }
    }
}
