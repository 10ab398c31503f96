//! Scenario runner - drives a farm through scripted months.
//!
//! Each frame of a run mirrors one frame of the real game:
//!
//! ```text
//! update_all(dt)   breeding rolls, humans age
//! player.act()     at most one option press
//! yield            scheduler drains consumption events
//! advance_time(dt) virtual clock; a feeding tick fires every interval
//! yield            scheduler applies the tick
//! ```
//!
//! The scheduler runs as a real background task on the same runtime, so
//! the run exercises the same select loop the game uses.

use crate::error::SimError;
use crate::player::{Player, PlayerStats, Strategy};
use crate::scenarios::ScenarioId;

use pen_core::{CarriedItem, PensConfig, Registry, Scheduler, SchedulerStats, NO_HUMANS_LEFT};
use pen_env::{EventBus, ItemTag, PenContext, SimContext};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Salt separating the player's RNG stream from the context's.
const PLAYER_SEED_SALT: u64 = 0x9e3779b97f4a7c15;

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: &'static str,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Months simulated
    pub months: u32,

    pub initial_population: usize,

    pub final_population: usize,

    /// Food left across all pens
    pub final_food: u64,

    /// Births from breeding
    pub births: usize,

    /// Humans lost to starvation
    pub starvations: u64,

    /// Consumption events the scheduler applied
    pub eaten: u64,

    /// Resource credited to the player
    pub resources: u64,

    /// What the player performed
    pub player: PlayerStats,

    /// Every popup, in arrival order
    pub notifications: Vec<String>,

    /// Failure message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Runs scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Months to simulate
    months: u32,

    /// Frames per feeding interval
    frames_per_month: u32,

    /// Base configuration, tuned per scenario
    config: PensConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            months: 12,
            frames_per_month: 30,
            config: PensConfig::default(),
        }
    }

    /// Sets the number of months.
    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    /// Sets the frame rate (frames per feeding interval, at least 1).
    pub fn with_frames_per_month(mut self, frames: u32) -> Self {
        self.frames_per_month = frames.max(1);
        self
    }

    /// Sets the base configuration.
    pub fn with_config(mut self, config: PensConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs a scenario and returns the result.
    pub async fn run(&self, scenario: ScenarioId) -> Result<ScenarioResult, SimError> {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let config = scenario.tune(self.config.clone());
        let rules = config.rules();
        let registry = Registry::from_config(&config)?;
        let initial_population = registry.total_population();

        let context = SimContext::shared(self.seed);
        let (bus, mut receivers) = EventBus::channel();
        let interval = config.feeding_interval();
        let handle = Scheduler::new(
            Arc::clone(&context),
            registry.clone(),
            bus.clone(),
            receivers.take_consumed(),
            interval,
        )
        .spawn();

        let strategy = match scenario {
            ScenarioId::Starvation | ScenarioId::Breeding => Strategy::Idle,
            ScenarioId::Feast => Strategy::Feast,
            ScenarioId::Shuttle => Strategy::Shuttle,
            ScenarioId::Mixed => Strategy::Random,
        };
        let mut player = Player::new(self.seed ^ PLAYER_SEED_SALT, strategy);

        let frame_dt = interval / self.frames_per_month;
        let total_frames = u64::from(self.months) * u64::from(self.frames_per_month);
        let mut births = 0;
        let mut last_tag: Option<ItemTag> = None;

        for frame in 0..total_frames {
            let dt = frame_dt.as_secs_f64();
            births += registry.update_all(dt, &*context, rules.breeding_odds, &bus);

            if let Err(e) = player.act(&registry, &bus, &rules) {
                warn!("player action failed: {e}");
            }
            tokio::task::yield_now().await;

            context.advance_time(frame_dt);
            tokio::task::yield_now().await;

            if let Some(tag) = receivers.drain_carried().pop() {
                last_tag = Some(tag);
            }

            if frame % u64::from(self.frames_per_month) == 0 {
                debug!(
                    "  t={:.0}s | population={} | births={}",
                    context.now().as_secs_f64(),
                    registry.total_population(),
                    births
                );
            }
        }

        if let Err(e) = player.settle(&registry, &bus, &rules) {
            warn!("player could not settle: {e}");
        }
        tokio::task::yield_now().await;
        if let Some(tag) = receivers.drain_carried().pop() {
            last_tag = Some(tag);
        }

        let stats = handle.stop().await.ok_or(SimError::SchedulerLost)?;
        let notifications: Vec<String> = receivers
            .drain_notifications()
            .into_iter()
            .map(|n| n.text)
            .collect();
        let resources: u64 = receivers.drain_resources().into_iter().map(u64::from).sum();

        let mut result = ScenarioResult {
            scenario: scenario.name(),
            seed: self.seed,
            passed: true,
            months: self.months,
            initial_population,
            final_population: registry.total_population(),
            final_food: registry.iter().map(|pen| u64::from(pen.food())).sum(),
            births,
            starvations: stats.starvations,
            eaten: stats.events - stats.rejected_events,
            resources,
            player: player.stats(),
            notifications,
            failure_reason: None,
        };

        let failure = check_accounting(&result, player.carrying())
            .or_else(|| check_inventory(last_tag.as_ref(), player.carrying()))
            .or_else(|| check_scenario(scenario, &result, &stats, rules.eat_reward));
        if let Some(reason) = failure {
            warn!("Scenario {} failed: {}", scenario.name(), reason);
            result.passed = false;
            result.failure_reason = Some(reason);
        } else {
            info!(
                "Scenario {} passed: population {} -> {}",
                scenario.name(),
                result.initial_population,
                result.final_population
            );
        }

        Ok(result)
    }
}

/// Every human is accounted for: born, starved, eaten, carried or still penned.
fn check_accounting(result: &ScenarioResult, carrying: CarriedItem) -> Option<String> {
    let gained = result.initial_population + result.births + result.player.deposits as usize;
    let lost = result.starvations as usize + result.eaten as usize + result.player.pickups as usize;

    match gained.checked_sub(lost) {
        Some(expected) if expected == result.final_population => None,
        Some(expected) => Some(format!(
            "population {} does not match accounting {} (carrying {:?})",
            result.final_population, expected, carrying
        )),
        None => Some(format!("{} humans lost but only {} ever existed", lost, gained)),
    }
}

/// The last tag sent to the inventory matches what the player holds.
fn check_inventory(last_tag: Option<&ItemTag>, carrying: CarriedItem) -> Option<String> {
    let tag = last_tag?;
    match CarriedItem::from_tag(tag) {
        Some(item) if item == carrying => None,
        // Supplies handed out by the Random strategy never go through the bus
        Some(CarriedItem::Nothing)
            if matches!(carrying, CarriedItem::Food | CarriedItem::Cloth) =>
        {
            None
        }
        _ => Some(format!("inventory tag {:?} disagrees with carried {:?}", tag, carrying)),
    }
}

fn check_scenario(
    scenario: ScenarioId,
    result: &ScenarioResult,
    stats: &SchedulerStats,
    eat_reward: u32,
) -> Option<String> {
    match scenario {
        ScenarioId::Starvation => {
            if result.starvations == 0 {
                return Some("no human starved".to_string());
            }
            if result.final_food != 0 {
                return Some(format!("{} food left in starving pens", result.final_food));
            }
        }
        ScenarioId::Feast => {
            if result.final_population != 0 {
                return Some(format!("{} humans survived the feast", result.final_population));
            }
            let empties = result.notifications.iter().filter(|n| *n == NO_HUMANS_LEFT).count();
            if empties != 1 {
                return Some(format!("expected one 'no humans left' popup, got {}", empties));
            }
            if result.resources != result.player.eats * u64::from(eat_reward) {
                return Some(format!(
                    "resources {} for {} eats",
                    result.resources, result.player.eats
                ));
            }
            if stats.rejected_events != 0 {
                return Some(format!("{} consumption events rejected", stats.rejected_events));
            }
        }
        ScenarioId::Shuttle => {
            if result.player.pickups == 0 {
                return Some("no human was moved".to_string());
            }
            if result.final_population != result.initial_population {
                return Some(format!(
                    "shuttling changed population {} -> {}",
                    result.initial_population, result.final_population
                ));
            }
        }
        ScenarioId::Breeding => {
            if result.births == 0 {
                return Some("no births".to_string());
            }
        }
        ScenarioId::Mixed => {}
    }
    None
}
