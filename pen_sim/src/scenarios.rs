//! Scripted scenarios for the headless harness.

use pen_core::PensConfig;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// SIM-001: Nobody feeds the pens; starvation empties them
    Starvation,
    
    /// SIM-002: The player eats every human
    Feast,
    
    /// SIM-003: Humans are carried from pen to pen
    Shuttle,
    
    /// SIM-004: Well-fed crowded pens breed
    Breeding,
    
    /// SIM-005: Random player actions on the default farm
    Mixed,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Starvation,
            ScenarioId::Feast,
            ScenarioId::Shuttle,
            ScenarioId::Breeding,
            ScenarioId::Mixed,
        ]
    }
    
    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Starvation => "starvation",
            ScenarioId::Feast => "feast",
            ScenarioId::Shuttle => "shuttle",
            ScenarioId::Breeding => "breeding",
            ScenarioId::Mixed => "mixed",
        }
    }
    
    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Starvation => {
                "No feeding, no breeding: every pen starves out one human per month"
            }
            ScenarioId::Feast => "Plenty of food; the player eats humans until none are left",
            ScenarioId::Shuttle => "Pickup/deposit between pens; population is conserved",
            ScenarioId::Breeding => "Crowded, well-fed pens with raised breeding odds",
            ScenarioId::Mixed => "Seeded random option presses across all pens",
        }
    }
    
    /// Adjusts the base configuration for this scenario.
    pub fn tune(&self, mut config: PensConfig) -> PensConfig {
        match self {
            ScenarioId::Starvation => {
                config.breeding_odds = 0;
                for pen in &mut config.pens {
                    pen.food = 0;
                }
            }
            ScenarioId::Feast | ScenarioId::Shuttle => {
                config.breeding_odds = 0;
                for pen in &mut config.pens {
                    pen.food = 10_000;
                }
            }
            ScenarioId::Breeding => {
                config.breeding_odds = 50;
                for pen in &mut config.pens {
                    pen.humans = pen.humans.max(4);
                    pen.food = 10_000;
                }
            }
            ScenarioId::Mixed => {}
        }
        config
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "starvation" | "sim-001" => Ok(ScenarioId::Starvation),
            "feast" | "sim-002" => Ok(ScenarioId::Feast),
            "shuttle" | "sim-003" => Ok(ScenarioId::Shuttle),
            "breeding" | "sim-004" => Ok(ScenarioId::Breeding),
            "mixed" | "sim-005" => Ok(ScenarioId::Mixed),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
