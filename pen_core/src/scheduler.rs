//! The Scheduler - background feeding clock and consumption handler.
//!
//! A single long-lived task that waits on three sources at once:
//!
//! ```text
//!            ┌──────────────────────────────┐
//!  ticker ──►│                              │──► starvation popups
//!  eaten  ──►│  select! (one branch / wake) │──► "no humans left" popup
//!  stop   ──►│                              │
//!            └──────────────────────────────┘
//! ```
//!
//! - **Tick**: every pen is fed; a pen whose food ran short loses its
//!   oldest human (or its only human).
//! - **Consumed**: the named pen loses its oldest human; if that leaves
//!   every pen empty, one "no humans left" popup is sent.
//! - **Shutdown**: the loop exits and returns its statistics.
//!
//! Errors inside a branch are logged and the loop carries on.

use crate::error::PenError;
use crate::registry::Registry;
use pen_env::{EventBus, PenContext, PenId, Ticker};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

/// Popup sent when the last human anywhere has been eaten.
pub const NO_HUMANS_LEFT: &str = "You have no humans left!\nWho needs food anyway...";

/// Counters accumulated over a scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Feeding ticks processed
    pub ticks: u64,

    /// Consumption events processed (including rejected ones)
    pub events: u64,

    /// Humans lost to starvation
    pub starvations: u64,

    /// Consumption events that named an unknown or empty pen
    pub rejected_events: u64,
}

/// Owner-side handle to a spawned scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    done: oneshot::Receiver<SchedulerStats>,
}

impl SchedulerHandle {
    /// Asks the scheduler to stop after its current branch.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Stops the scheduler and waits for its final statistics.
    ///
    /// Returns `None` if the task died without reporting.
    pub async fn stop(self) -> Option<SchedulerStats> {
        self.shutdown();
        self.done.await.ok()
    }
}

/// Background feeding clock and consumption-event handler.
pub struct Scheduler<Ctx: PenContext> {
    /// Environment context (clock, spawn)
    context: Arc<Ctx>,

    registry: Registry,

    bus: EventBus,

    /// Pens a human was eaten from
    consumed: UnboundedReceiver<PenId>,

    /// Feeding clock, started when the scheduler is created
    ticker: Box<dyn Ticker>,

    stats: SchedulerStats,
}

impl<Ctx: PenContext> Scheduler<Ctx> {
    /// Creates a scheduler. Nothing runs until `run` or `spawn`.
    ///
    /// The feeding clock starts here: the first tick is due one `interval`
    /// after this call, however late the run loop is first polled.
    pub fn new(
        context: Arc<Ctx>,
        registry: Registry,
        bus: EventBus,
        consumed: UnboundedReceiver<PenId>,
        interval: Duration,
    ) -> Self {
        let ticker = context.ticker(interval);
        Self {
            context,
            registry,
            bus,
            consumed,
            ticker,
            stats: SchedulerStats::default(),
        }
    }

    /// Statistics so far.
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Feeds every pen once.
    ///
    /// Returns the pens that lost a human to starvation.
    pub fn on_tick(&mut self) -> Vec<PenId> {
        self.stats.ticks += 1;
        let mut starved = Vec::new();

        for pen in self.registry.iter() {
            let died = pen.with(|enclosure| {
                if !enclosure.apply_monthly_feeding() || enclosure.population() == 0 {
                    return false;
                }
                if enclosure.population() < 2 {
                    enclosure.clear();
                } else if let Err(e) = enclosure.remove_oldest_human() {
                    warn!("starvation removal failed: {e}");
                    return false;
                }
                true
            });

            if died {
                info!(pen = %pen.id(), remaining = pen.population(), "human starved");
                self.stats.starvations += 1;
                self.send(format!(
                    "Human from {} has died from starvation\nFeed them each month!",
                    pen.id()
                ));
                starved.push(pen.id().clone());
            }
        }

        debug!(tick = self.stats.ticks, starved = starved.len(), "feeding tick");
        starved
    }

    /// Removes the oldest human from `pen` after it was eaten.
    ///
    /// Once the named pen has been handled, every pen is checked and a
    /// single "no humans left" popup is sent if all of them are empty. This
    /// also happens when the pen was already empty (the human was taken by
    /// another path first).
    ///
    /// # Errors
    /// `UnknownPen` (nothing else happens) or `EmptyPen`.
    pub fn on_consumed(&mut self, pen: &PenId) -> Result<(), PenError> {
        self.stats.events += 1;

        let handle = match self.registry.get(pen) {
            Ok(handle) => handle,
            Err(e) => {
                self.stats.rejected_events += 1;
                return Err(e);
            }
        };
        let removal = handle.with(|enclosure| enclosure.remove_oldest_human().map(|_| ()));
        if removal.is_ok() {
            debug!(pen = %pen, "human consumed");
        } else {
            self.stats.rejected_events += 1;
        }

        if self.registry.total_population() == 0 {
            info!("no humans left in any pen");
            self.send(NO_HUMANS_LEFT);
        }
        removal
    }

    /// Runs until `shutdown` becomes `true` or its sender is dropped.
    ///
    /// If every consumption sender is dropped the loop keeps ticking.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> SchedulerStats {
        let mut events_open = true;

        info!(
            interval_secs = self.ticker.period().as_secs_f64(),
            pens = self.registry.len(),
            "scheduler started"
        );

        if *shutdown.borrow_and_update() {
            return self.stats;
        }

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                event = self.consumed.recv(), if events_open => match event {
                    Some(pen) => {
                        if let Err(e) = self.on_consumed(&pen) {
                            warn!("ignored consumption event: {e}");
                        }
                    }
                    None => {
                        debug!("consumption channel closed");
                        events_open = false;
                    }
                },
                _ = self.ticker.tick() => {
                    self.on_tick();
                }
            }
        }

        info!(
            ticks = self.stats.ticks,
            events = self.stats.events,
            starvations = self.stats.starvations,
            "scheduler stopped"
        );
        self.stats
    }

    /// Spawns the run loop on the context and returns its handle.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (done_tx, done_rx) = oneshot::channel();
        let context = Arc::clone(&self.context);

        context.spawn("pen-scheduler", async move {
            let stats = self.run(shutdown_rx).await;
            let _ = done_tx.send(stats);
        });

        SchedulerHandle {
            shutdown: shutdown_tx,
            done: done_rx,
        }
    }

    fn send(&self, text: impl Into<String>) {
        if let Err(e) = self.bus.notify(text) {
            warn!("dropped scheduler notification: {e}");
        }
    }
}
