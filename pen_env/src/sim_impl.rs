//! Simulation context implementing PenContext for deterministic testing.

use crate::context::{PenContext, Ticker};
use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Simulation context backed by deterministic time and RNG.
///
/// This implements `PenContext` using:
/// - A virtual clock that can be advanced manually
/// - A seeded ChaCha8 RNG for reproducible breeding rolls
/// - Tickers that release one tick per elapsed virtual period
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,
    
    /// Current virtual time (nanoseconds since simulation start).
    /// Held in a watch channel so tickers wake when the clock moves.
    virtual_time_ns: Arc<watch::Sender<u64>>,
    
    /// Deterministic RNG
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        let (tx, _) = watch::channel(0u64);
        Self {
            seed,
            virtual_time_ns: Arc::new(tx),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }
    
    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }
    
    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let delta = duration.as_nanos() as u64;
        self.virtual_time_ns.send_modify(|time| *time += delta);
    }
    
    /// Sets the virtual time to a specific value.
    pub fn set_time(&self, time_ns: u64) {
        self.virtual_time_ns.send_modify(|time| *time = time_ns);
    }
    
    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *self.virtual_time_ns.borrow()
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
            rng: Arc::clone(&self.rng),
        }
    }
}

/// Ticker driven by the virtual clock.
struct SimTicker {
    clock: watch::Receiver<u64>,
    next_deadline_ns: u64,
    period_ns: u64,
}

#[async_trait]
impl Ticker for SimTicker {
    async fn tick(&mut self) {
        loop {
            let now = *self.clock.borrow_and_update();
            if now >= self.next_deadline_ns {
                // Only mutate on completion so a cancelled tick loses nothing
                self.next_deadline_ns += self.period_ns;
                return;
            }
            if self.clock.changed().await.is_err() {
                // Clock dropped: virtual time can never advance again
                std::future::pending::<()>().await;
            }
        }
    }
    
    fn period(&self) -> Duration {
        Duration::from_nanos(self.period_ns)
    }
}

#[async_trait]
impl PenContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }
    
    async fn sleep(&self, duration: Duration) {
        // In simulation, sleep advances virtual time
        self.advance_time(duration);
    }
    
    fn ticker(&self, period: Duration) -> Box<dyn Ticker> {
        let period_ns = (period.as_nanos() as u64).max(1);
        Box::new(SimTicker {
            clock: self.virtual_time_ns.subscribe(),
            next_deadline_ns: self.time_ns() + period_ns,
            period_ns,
        })
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
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..upper)
    }
    
    fn seed(&self) -> u64 {
        self.seed
    }
}
