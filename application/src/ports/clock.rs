//! Time port.
//!
//! Cycle pacing (success delay, failure delay, grace window) goes through
//! this trait so tests can observe requested sleeps instead of waiting
//! them out.

use async_trait::async_trait;
use std::time::Duration;

/// Sleep provider.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Tokio-backed clock used outside of tests.
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
