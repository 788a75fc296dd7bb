//! Notification and tracking permission resolution.
//!
//! Each permission is requested at most once per process lifetime, no matter
//! how many callers ask. Tracking has one quirk carried over from the mobile
//! platform: a request can come back still undetermined, in which case it is
//! retried exactly once after a short delay.

mod prompt;

pub use prompt::{PermissionPrompt, StaticPrompt};

use crate::launch::Delay;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use tokio::sync::OnceCell;

/// Outcome of the tracking-permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrackingStatus {
    NotDetermined,
    Authorized,
    Denied,
    Restricted,
}

/// Resolved tracking permission. The advertising identifier is only ever
/// present when the status is [`TrackingStatus::Authorized`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingDecision {
    pub status: TrackingStatus,
    pub ad_identifier: Option<String>,
}

/// Serializes the two permission requests and caches their outcomes.
pub struct PermissionResolver {
    prompt: Arc<dyn PermissionPrompt>,
    timer: Arc<dyn Delay>,
    retry_delay: Duration,
    notifications: OnceCell<bool>,
    tracking: OnceCell<TrackingDecision>,
}

impl PermissionResolver {
    pub fn new(prompt: Arc<dyn PermissionPrompt>, timer: Arc<dyn Delay>, retry_delay: Duration) -> Self {
        Self {
            prompt,
            timer,
            retry_delay,
            notifications: OnceCell::new(),
            tracking: OnceCell::new(),
        }
    }

    /// Requests notification permission, once. Later calls return the cached
    /// outcome without prompting again.
    pub async fn resolve_notifications(&self) -> bool {
        *self
            .notifications
            .get_or_init(|| async {
                let granted = self.prompt.request_notifications().await;
                tracing::info!(granted, "notification permission resolved");
                granted
            })
            .await
    }

    /// Requests tracking permission, once. If the platform reports the status
    /// as still undetermined right after the request, waits the configured
    /// delay and asks a single second time; whatever comes back then is final.
    pub async fn resolve_tracking(&self) -> TrackingDecision {
        self.tracking
            .get_or_init(|| async {
                let mut status = self.prompt.request_tracking().await;
                if status == TrackingStatus::NotDetermined {
                    tracing::debug!("tracking status still undetermined; retrying once");
                    self.timer.sleep(self.retry_delay).await;
                    status = self.prompt.request_tracking().await;
                }

                let ad_identifier = if status == TrackingStatus::Authorized {
                    self.prompt.advertising_id().await
                } else {
                    None
                };
                tracing::info!(
                    %status,
                    has_ad_identifier = ad_identifier.is_some(),
                    "tracking permission resolved"
                );
                TrackingDecision {
                    status,
                    ad_identifier,
                }
            })
            .await
            .clone()
    }
}
