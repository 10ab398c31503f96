//! Production implementation of PenContext using Tokio.

use crate::context::{PenContext, Ticker};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{Interval, MissedTickBehavior};

/// Production context backed by Tokio and thread-local entropy.
///
/// This is the "real" implementation used by the game binary.
/// Time comes from the system clock, randomness from `thread_rng`.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl TokioContext {
    /// Creates a new TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
    
    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticker backed by `tokio::time::Interval`.
struct TokioTicker {
    interval: Interval,
    period: Duration,
}

#[async_trait]
impl Ticker for TokioTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
    
    fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl PenContext for TokioContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
    
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
    
    fn ticker(&self, period: Duration) -> Box<dyn Ticker> {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Box::new(TokioTicker { interval, period })
    }
    
    fn spawn<F>(&self, _name: &str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(future);
    }
    
    fn roll_below(&self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }
    
    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}
