use async_trait::async_trait;
use std::time::Duration;

/// Injected clock for every wait inside the resolution chain (splash hold,
/// permission poll, tracking retry). Tests substitute recording or
/// short-interval implementations.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production delay backed by the tokio timer.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
