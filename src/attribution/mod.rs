//! Install attribution.
//!
//! One authenticated metrics call per cold start, a tolerant response decode,
//! and the pure assembly of the destination URL out of its pieces. The
//! coordinator in [`crate::launch`] decides when (and whether) any of this
//! runs.

mod client;
mod response;
mod url_builder;

pub use client::{HttpMetricsClient, MetricsClient, request_token};
pub use response::MetricsResponse;
pub use url_builder::build_destination_url;
