use crate::attribution::MetricsResponse;
use crate::error::{AttributionError, RemoteConfigError};
use crate::permissions::TrackingDecision;
use url::Url;

/// Final launch decision, emitted exactly once per cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchDecision {
    /// Render the resolved web destination.
    WebView(Url),
    /// Fall through to the regular app shell.
    App,
}

/// Progress snapshot published over a watch channel for the UI collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchSnapshot {
    pub remote_config_fetched: bool,
    pub feature_enabled: bool,
    pub notifications_resolved: bool,
    pub tracking_resolved: bool,
    pub web_view_ready: bool,
    pub destination: Option<Url>,
    pub show_web_view: bool,
    pub proceed_to_app: bool,
}

/// Collaborator completions delivered to the coordinator's event loop.
#[derive(Debug)]
pub(crate) enum LaunchEvent {
    FlagResolved(Result<bool, RemoteConfigError>),
    NotificationsResolved { granted: bool },
    TrackingResolved(TrackingDecision),
    MetricsResolved(Result<MetricsResponse, AttributionError>),
    PollTick,
}

/// Mutable resolution state, owned exclusively by the coordinator loop.
/// Guard flags make every transition one-shot regardless of event order or
/// duplication.
#[derive(Debug, Default)]
pub(crate) struct LaunchState {
    pub remote_flag_fetched: bool,
    pub remote_flag_enabled: bool,
    pub notifications_resolved: bool,
    pub tracking_resolved: bool,
    pub ad_identifier: Option<String>,
    pub metrics_fetch_started: bool,
    pub poll_started: bool,
    pub destination: Option<Url>,
    pub decision: Option<LaunchDecision>,
}
