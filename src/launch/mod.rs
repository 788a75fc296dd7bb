//! Launch resolution.
//!
//! Decides, exactly once per cold start, whether the shell shows the resolved
//! web destination or the regular app. Collaborators (remote flag fetch, the
//! permission chain, the metrics call) run concurrently and report back over
//! one event channel; a single loop owns all state mutation, so transitions
//! need guard flags, never locks.
//!
//! Every failure along the way degrades to [`LaunchDecision::App`]. Nothing
//! here is allowed to take the app down.

mod state;
mod timer;

pub use state::{LaunchDecision, LaunchSnapshot};
pub use timer::{Delay, TokioDelay};

use crate::attribution::{MetricsClient, MetricsResponse, build_destination_url};
use crate::config::{Config, TimingConfig};
use crate::error::{AttributionError, RemoteConfigError};
use crate::permissions::{PermissionResolver, TrackingDecision};
use crate::remote_config::FlagSource;
use crate::store::LaunchStateStore;
use state::{LaunchEvent, LaunchState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use url::Url;

/// App identity attached to metrics requests and destination URLs.
#[derive(Debug, Clone)]
pub struct AppIdentity {
    pub bundle_id: String,
    pub onesignal_id: Option<String>,
}

impl AppIdentity {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bundle_id: config.bundle_id.clone(),
            onesignal_id: config.onesignal_id.clone(),
        }
    }
}

/// Concrete waits inside the chain.
#[derive(Debug, Clone)]
pub struct LaunchTiming {
    /// Splash hold before the plain-app signal.
    pub splash_delay: Duration,
    /// Re-check interval while a saved destination waits on permissions.
    pub permission_poll: Duration,
}

impl LaunchTiming {
    pub fn from_config(timing: &TimingConfig) -> Self {
        Self {
            splash_delay: Duration::from_millis(timing.splash_delay_ms),
            permission_poll: Duration::from_millis(timing.permission_poll_ms),
        }
    }
}

/// Everything the coordinator talks to, injected at construction.
pub struct LaunchDeps {
    pub store: LaunchStateStore,
    pub flags: Arc<dyn FlagSource>,
    pub flag_key: String,
    pub permissions: Arc<PermissionResolver>,
    pub metrics: Arc<dyn MetricsClient>,
    pub timer: Arc<dyn Delay>,
    pub identity: AppIdentity,
    pub timing: LaunchTiming,
}

/// Single-use resolution state machine. Construct, optionally
/// [`subscribe`](Self::subscribe), then [`run`](Self::run) to the decision.
pub struct LaunchCoordinator {
    deps: LaunchDeps,
    state: LaunchState,
    saved_destination: Option<Url>,
    events_tx: mpsc::UnboundedSender<LaunchEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<LaunchEvent>>,
    snapshot_tx: watch::Sender<LaunchSnapshot>,
}

impl LaunchCoordinator {
    pub fn new(deps: LaunchDeps) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(LaunchSnapshot::default());

        // The persisted destination is read once, here. A value that no
        // longer parses is ignored rather than trusted.
        let saved_destination = deps.store.saved_destination().and_then(|raw| {
            match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(error) => {
                    tracing::warn!(%error, "persisted destination is not a valid URL; ignoring");
                    None
                }
            }
        });

        Self {
            deps,
            state: LaunchState::default(),
            saved_destination,
            events_tx,
            events_rx: Some(events_rx),
            snapshot_tx,
        }
    }

    /// Watch the resolution progress. Subscribe before calling `run`.
    pub fn subscribe(&self) -> watch::Receiver<LaunchSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Drives the chain to its terminal decision. Consumes the coordinator;
    /// one cold start, one decision.
    pub async fn run(mut self) -> LaunchDecision {
        let mut events_rx = self.events_rx.take().expect("coordinator runs once");

        self.spawn_flag_fetch();
        self.spawn_permission_chain();

        let decision = loop {
            if let Some(decision) = self.state.decision.clone() {
                break decision;
            }
            match events_rx.recv().await {
                Some(event) => self.apply(event),
                None => {
                    tracing::debug!("event channel closed before a decision; defaulting to app");
                    break LaunchDecision::App;
                }
            }
        };

        match &decision {
            LaunchDecision::App => {
                // cosmetic splash hold; the decision itself is already made
                self.deps.timer.sleep(self.deps.timing.splash_delay).await;
                self.snapshot_tx.send_modify(|s| s.proceed_to_app = true);
                tracing::info!("launch resolved: app");
            }
            LaunchDecision::WebView(url) => {
                tracing::info!(%url, "launch resolved: web destination");
            }
        }

        decision
    }

    // ─── Collaborator tasks ─────────────────────────────────────────────

    fn spawn_flag_fetch(&self) {
        let flags = self.deps.flags.clone();
        let key = self.deps.flag_key.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = flags.fetch_flag(&key).await;
            let _ = tx.send(LaunchEvent::FlagResolved(result));
        });
    }

    /// Notifications first, then tracking; the order is part of the product
    /// behavior, so both prompts live in one sequenced task.
    fn spawn_permission_chain(&self) {
        let permissions = self.deps.permissions.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let granted = permissions.resolve_notifications().await;
            if tx
                .send(LaunchEvent::NotificationsResolved { granted })
                .is_err()
            {
                return;
            }
            let decision = permissions.resolve_tracking().await;
            let _ = tx.send(LaunchEvent::TrackingResolved(decision));
        });
    }

    fn spawn_metrics_fetch(&self) {
        let metrics = self.deps.metrics.clone();
        let bundle_id = self.deps.identity.bundle_id.clone();
        let tx = self.events_tx.clone();
        tracing::debug!("starting metrics fetch");
        tokio::spawn(async move {
            let result = metrics.fetch_metrics(&bundle_id).await;
            let _ = tx.send(LaunchEvent::MetricsResolved(result));
        });
    }

    fn ensure_permission_poll(&mut self) {
        if self.state.poll_started {
            return;
        }
        self.state.poll_started = true;
        tracing::debug!("saved destination waiting on permissions");

        let timer = self.deps.timer.clone();
        let interval = self.deps.timing.permission_poll;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            loop {
                timer.sleep(interval).await;
                if tx.send(LaunchEvent::PollTick).is_err() {
                    break;
                }
            }
        });
    }

    // ─── Transitions ────────────────────────────────────────────────────

    fn apply(&mut self, event: LaunchEvent) {
        if self.state.decision.is_some() {
            // terminal; late or duplicated completions are no-ops
            return;
        }

        match event {
            LaunchEvent::FlagResolved(result) => self.on_flag_resolved(result),
            LaunchEvent::NotificationsResolved { granted } => {
                self.on_notifications_resolved(granted);
            }
            LaunchEvent::TrackingResolved(decision) => self.on_tracking_resolved(decision),
            LaunchEvent::MetricsResolved(result) => self.on_metrics_resolved(result),
            LaunchEvent::PollTick => self.reevaluate(),
        }
    }

    fn on_flag_resolved(&mut self, result: Result<bool, RemoteConfigError>) {
        if self.state.remote_flag_fetched {
            return;
        }

        let enabled = match result {
            Ok(enabled) => enabled,
            Err(error) => {
                // No successful fetch ever: fail open. Once a value has been
                // persisted, the persisted value wins.
                let fallback = self.deps.store.feature_enabled().unwrap_or(true);
                tracing::warn!(%error, fallback, "remote flag fetch failed; using fallback");
                fallback
            }
        };

        if let Err(error) = self.deps.store.set_feature_enabled(enabled) {
            tracing::warn!(%error, "failed to persist feature flag");
        }

        self.state.remote_flag_fetched = true;
        self.state.remote_flag_enabled = enabled;
        self.snapshot_tx.send_modify(|s| {
            s.remote_config_fetched = true;
            s.feature_enabled = enabled;
        });
        self.reevaluate();
    }

    fn on_notifications_resolved(&mut self, granted: bool) {
        if self.state.notifications_resolved {
            return;
        }
        self.state.notifications_resolved = true;
        self.snapshot_tx.send_modify(|s| s.notifications_resolved = true);
        tracing::debug!(granted, "notification permission recorded");
        self.reevaluate();
    }

    fn on_tracking_resolved(&mut self, decision: TrackingDecision) {
        if self.state.tracking_resolved {
            return;
        }
        self.state.tracking_resolved = true;
        self.state.ad_identifier = decision.ad_identifier;
        self.snapshot_tx.send_modify(|s| s.tracking_resolved = true);
        tracing::debug!(status = %decision.status, "tracking permission recorded");
        self.reevaluate();
    }

    fn on_metrics_resolved(&mut self, result: Result<MetricsResponse, AttributionError>) {
        let response = match result {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "metrics fetch failed; proceeding to app");
                self.decide(LaunchDecision::App);
                return;
            }
        };

        let built = build_destination_url(
            &response,
            self.state.ad_identifier.as_deref(),
            &self.deps.identity.bundle_id,
            self.deps.identity.onesignal_id.as_deref(),
        );

        match built {
            Some(url) => {
                // Written once; future cold starts reuse it without fetching.
                if let Err(error) = self.deps.store.set_saved_destination(url.as_str()) {
                    tracing::warn!(%error, "failed to persist destination URL");
                }
                self.decide(LaunchDecision::WebView(url));
            }
            None => {
                tracing::warn!(
                    url = %response.url,
                    "could not build destination URL; proceeding to app"
                );
                self.decide(LaunchDecision::App);
            }
        }
    }

    /// Every transition that can follow from newly arrived facts, in one
    /// place, so any event order converges on the same decision.
    fn reevaluate(&mut self) {
        if self.state.decision.is_some() || !self.state.remote_flag_fetched {
            return;
        }

        let permissions_resolved =
            self.state.notifications_resolved && self.state.tracking_resolved;

        if !self.state.remote_flag_enabled {
            if permissions_resolved {
                self.decide(LaunchDecision::App);
            }
            return;
        }

        if let Some(saved) = self.saved_destination.clone() {
            // A previously resolved destination always wins over a fresh
            // fetch, but only opens once both permissions are settled.
            if permissions_resolved {
                self.decide(LaunchDecision::WebView(saved));
            } else {
                self.ensure_permission_poll();
            }
            return;
        }

        if permissions_resolved && !self.state.metrics_fetch_started {
            self.state.metrics_fetch_started = true;
            self.spawn_metrics_fetch();
        }
    }

    fn decide(&mut self, decision: LaunchDecision) {
        if let LaunchDecision::WebView(url) = &decision {
            self.state.destination = Some(url.clone());
            let url = url.clone();
            self.snapshot_tx.send_modify(move |s| {
                s.destination = Some(url);
                s.web_view_ready = true;
                s.show_web_view = true;
            });
        }
        self.state.decision = Some(decision);
    }
}
