//! Feed sources: routes that turn one rendered page into a [`FeedResult`].
//!
//! Every source implements [`route::Route`] and writes its output into the
//! shared [`context::RouteContext`] (`ctx.state.data`), which is the hand-off
//! shape the aggregation layer reads.
//!
//! - [`cdzj`]: announcement table of the Chengdu housing portal
//! - [`registry`]: builds routes from configured sources
//! - [`table`]: row/cell extraction for widget-rendered HTML tables
//!
//! [`FeedResult`]: gazette_common::FeedResult

pub mod cdzj;
pub mod context;
pub mod registry;
pub mod route;
pub mod table;

pub use context::{RouteContext, RouteState};
pub use registry::build_route;
pub use route::{Route, invoke};
