use super::TrackingStatus;
use crate::config::PermissionAnswers;
use async_trait::async_trait;

/// OS permission surface. The mobile shell implements this against the real
/// dialogs; the headless binary and the tests answer from configuration.
#[async_trait]
pub trait PermissionPrompt: Send + Sync {
    async fn request_notifications(&self) -> bool;
    async fn request_tracking(&self) -> TrackingStatus;
    /// Platform advertising identifier, if one is exposed to the app.
    async fn advertising_id(&self) -> Option<String>;
}

/// Prompt that replays canned answers from the `[permissions]` config section.
pub struct StaticPrompt {
    answers: PermissionAnswers,
}

impl StaticPrompt {
    pub fn new(answers: PermissionAnswers) -> Self {
        Self { answers }
    }
}

#[async_trait]
impl PermissionPrompt for StaticPrompt {
    async fn request_notifications(&self) -> bool {
        self.answers.notifications
    }

    async fn request_tracking(&self) -> TrackingStatus {
        self.answers.tracking
    }

    async fn advertising_id(&self) -> Option<String> {
        self.answers.advertising_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_prompt_replays_config_answers() {
        let prompt = StaticPrompt::new(PermissionAnswers {
            notifications: false,
            tracking: TrackingStatus::Authorized,
            advertising_id: Some("ABC-IDFA".into()),
        });

        assert!(!prompt.request_notifications().await);
        assert_eq!(prompt.request_tracking().await, TrackingStatus::Authorized);
        assert_eq!(prompt.advertising_id().await.as_deref(), Some("ABC-IDFA"));
    }
}
