//! Engine configuration.
//!
//! Everything has a compiled-in default, so an empty TOML document is a
//! valid configuration:
//!
//! ```toml
//! feeding_interval_secs = 30
//! breeding_odds = 2000
//! eat_reward = 50
//! feed_ration = 0
//!
//! [[pens]]
//! title = "Pen A"
//! humans = 3
//! food = 10
//! ```

use crate::enclosure::{Enclosure, Rect};
use crate::error::PenError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Initial state of one pen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PenSpec {
    /// Title, also the registry key
    pub title: String,

    /// Starting population
    #[serde(default)]
    pub humans: usize,

    /// Starting food stock
    #[serde(default)]
    pub food: u32,

    /// Renderer bounds
    #[serde(default)]
    pub bounds: Rect,
}

impl PenSpec {
    /// Builds the enclosure described by this spec.
    pub fn build(&self) -> Enclosure {
        Enclosure::stocked(self.title.as_str(), self.bounds, self.humans, self.food)
    }
}

/// Tunable rules consulted by pen options and the per-frame update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Breeding happens with probability 1/breeding_odds per frame (0 = never)
    pub breeding_odds: u32,

    /// Resource credited to the player for eating a human
    pub eat_reward: u32,

    /// Food added to a pen by the Feed option
    pub feed_ration: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            breeding_odds: 2000,
            eat_reward: 50,
            feed_ration: 0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PensConfig {
    /// Seconds between feeding ticks
    pub feeding_interval_secs: u64,

    pub breeding_odds: u32,

    pub eat_reward: u32,

    pub feed_ration: u32,

    /// Pens created at startup
    pub pens: Vec<PenSpec>,
}

impl Default for PensConfig {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            feeding_interval_secs: 30,
            breeding_odds: rules.breeding_odds,
            eat_reward: rules.eat_reward,
            feed_ration: rules.feed_ration,
            pens: vec![
                PenSpec {
                    title: "Pen A".to_string(),
                    humans: 3,
                    food: 10,
                    bounds: Rect::new(40.0, 40.0, 240.0, 200.0),
                },
                PenSpec {
                    title: "Pen B".to_string(),
                    humans: 2,
                    food: 5,
                    bounds: Rect::new(280.0, 40.0, 480.0, 200.0),
                },
            ],
        }
    }
}

impl PensConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, PenError> {
        let config: PensConfig = toml::from_str(content)
            .map_err(|e| PenError::config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PenError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PenError::config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Checks the pen set and timing.
    pub fn validate(&self) -> Result<(), PenError> {
        if self.feeding_interval_secs == 0 {
            return Err(PenError::config("feeding_interval_secs must be positive"));
        }
        if self.pens.is_empty() {
            return Err(PenError::config("at least one pen is required"));
        }

        let mut seen = HashSet::new();
        for spec in &self.pens {
            if spec.title.trim().is_empty() {
                return Err(PenError::config("pen titles must not be empty"));
            }
            if !seen.insert(spec.title.as_str()) {
                return Err(PenError::config(format!("duplicate pen title '{}'", spec.title)));
            }
        }
        Ok(())
    }

    /// Interval between feeding ticks.
    pub fn feeding_interval(&self) -> Duration {
        Duration::from_secs(self.feeding_interval_secs)
    }

    /// Rules for options and breeding.
    pub fn rules(&self) -> Rules {
        Rules {
            breeding_odds: self.breeding_odds,
            eat_reward: self.eat_reward,
            feed_ration: self.feed_ration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PensConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.feeding_interval(), Duration::from_secs(30));
        assert_eq!(config.rules(), Rules::default());
        assert_eq!(config.pens.len(), 2);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PensConfig::from_toml_str("").unwrap();
        assert_eq!(config, PensConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let config = PensConfig::from_toml_str(
            r#"
            feeding_interval_secs = 5
            feed_ration = 3

            [[pens]]
            title = "North"
            humans = 4
            food = 1

            [[pens]]
            title = "South"
            bounds = { min_x = 0.0, min_y = 0.0, max_x = 10.0, max_y = 10.0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.feeding_interval_secs, 5);
        assert_eq!(config.rules().feed_ration, 3);
        assert_eq!(config.rules().breeding_odds, 2000);

        let north = config.pens[0].build();
        assert_eq!(north.title(), "North");
        assert_eq!(north.population(), 4);
        assert_eq!(north.food(), 1);

        let south = config.pens[1].build();
        assert_eq!(south.population(), 0);
        assert_eq!(south.bounds().max_x, 10.0);
    }

    #[test]
    fn test_rejects_duplicate_titles() {
        let err = PensConfig::from_toml_str(
            r#"
            [[pens]]
            title = "Same"
            [[pens]]
            title = "Same"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, PenError::Config(ref msg) if msg.contains("Same")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            PensConfig::from_toml_str("feeding_interval_secs = 0").unwrap_err(),
            PenError::Config(_)
        ));
        assert!(matches!(
            PensConfig::from_toml_str("pens = []").unwrap_err(),
            PenError::Config(_)
        ));
        assert!(matches!(
            PensConfig::from_toml_str("breeding_odds = \"often\"").unwrap_err(),
            PenError::Config(_)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PensConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
