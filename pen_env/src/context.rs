//! Core environment context trait for the pen engine.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// The central interface for Environment Interaction.
///
/// This trait abstracts the "real world" so that the scheduler and the
/// breeding rolls can run in both production (tokio) and simulation
/// (virtual clock) environments.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`, `thread_rng`
/// - **Simulation**: `SimContext` - manual virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// For simulation runs, all methods that would normally introduce
/// non-determinism (time, randomness) are controlled by the implementation.
#[async_trait]
pub trait PenContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;
    
    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);
    
    /// Creates a periodic ticker.
    ///
    /// The first tick completes one full `period` after creation.
    fn ticker(&self, period: Duration) -> Box<dyn Ticker>;
    
    /// Spawns a background task.
    fn spawn<F>(&self, name: &str, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
    
    /// Draws a uniform integer in `[0, upper)`.
    ///
    /// Returns 0 when `upper` is 0.
    fn roll_below(&self, upper: u32) -> u32;
    
    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    /// In simulation, returns the master seed.
    fn seed(&self) -> u64;
}

/// A fixed-interval timer source.
///
/// `tick()` must be cancel-safe: dropping an in-flight `tick()` future
/// (e.g. when another `select!` branch wins) never loses a tick.
#[async_trait]
pub trait Ticker: Send {
    /// Completes when the next period has elapsed.
    async fn tick(&mut self);
    
    /// Returns the configured period.
    fn period(&self) -> Duration;
}
