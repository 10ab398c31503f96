//! Player - a scripted stand-in for the interactive foreground loop.
//!
//! The real game drives pen options from keyboard input. In the harness a
//! `Player` picks one option per frame according to a `Strategy`, going
//! through the same path a key press would: activate the pen, read its
//! numbered menu, press the hotkey.

use pen_core::{CarriedItem, PenError, PenHandle, PenOption, Registry, Rules};
use pen_env::EventBus;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How the player behaves each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Never touches a pen
    Idle,

    /// Eats a human whenever one is available
    Feast,

    /// Carries humans from each pen to the next
    Shuttle,

    /// Presses a random available hotkey at a random pen
    Random,
}

/// Counts of options the player performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub observes: u64,
    pub feeds: u64,
    pub clothes: u64,
    pub eats: u64,
    pub pickups: u64,
    pub deposits: u64,

    /// Options refused because they had gone stale
    pub rejected: u64,
}

/// A scripted player.
pub struct Player {
    strategy: Strategy,

    /// What the player is holding
    carrying: CarriedItem,

    /// Deterministic RNG for the Random strategy
    rng: ChaCha8Rng,

    /// Next pen index for the Shuttle strategy
    cursor: usize,

    stats: PlayerStats,
}

impl Player {
    /// Creates a player with empty hands.
    pub fn new(seed: u64, strategy: Strategy) -> Self {
        Self {
            strategy,
            carrying: CarriedItem::Nothing,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cursor: 0,
            stats: PlayerStats::default(),
        }
    }

    pub fn carrying(&self) -> CarriedItem {
        self.carrying
    }

    pub fn stats(&self) -> PlayerStats {
        self.stats
    }

    /// Takes at most one action this frame.
    pub fn act(
        &mut self,
        registry: &Registry,
        bus: &EventBus,
        rules: &Rules,
    ) -> Result<(), PenError> {
        let pens: Vec<&PenHandle> = registry.iter().collect();
        if pens.is_empty() {
            return Ok(());
        }

        let choice = match self.strategy {
            Strategy::Idle => None,
            Strategy::Feast => pens
                .iter()
                .find(|pen| pen.population() > 0)
                .map(|pen| (*pen, PenOption::Eat)),
            Strategy::Shuttle => self.shuttle(&pens),
            Strategy::Random => self.random(&pens),
        };

        let Some((pen, option)) = choice else {
            return Ok(());
        };
        self.press(registry, pen, option, bus, rules)
    }

    /// Drops whatever is carried into `pen` if it is a human.
    pub fn settle(
        &mut self,
        registry: &Registry,
        bus: &EventBus,
        rules: &Rules,
    ) -> Result<(), PenError> {
        if self.carrying != CarriedItem::Human {
            return Ok(());
        }
        match registry.iter().next() {
            Some(pen) => self.press(registry, pen, PenOption::Deposit, bus, rules),
            None => Ok(()),
        }
    }

    fn shuttle<'a>(&mut self, pens: &[&'a PenHandle]) -> Option<(&'a PenHandle, PenOption)> {
        let pen = pens[self.cursor % pens.len()];
        match self.carrying {
            CarriedItem::Human => {
                self.cursor += 1;
                Some((pens[self.cursor % pens.len()], PenOption::Deposit))
            }
            _ if pen.population() > 0 => Some((pen, PenOption::Pickup)),
            _ => {
                self.cursor += 1;
                None
            }
        }
    }

    fn random<'a>(&mut self, pens: &[&'a PenHandle]) -> Option<(&'a PenHandle, PenOption)> {
        // Stand-in for the inventory subsystem handing the player supplies
        if self.carrying == CarriedItem::Nothing {
            match self.rng.gen_range(0..20) {
                0 => self.carrying = CarriedItem::Food,
                1 => self.carrying = CarriedItem::Cloth,
                _ => {}
            }
        }

        let pen = pens[self.rng.gen_range(0..pens.len())];
        let options = pen.with(|enclosure| enclosure.available_options(self.carrying));
        let option = options[self.rng.gen_range(0..options.len())];
        Some((pen, option))
    }

    fn press(
        &mut self,
        registry: &Registry,
        pen: &PenHandle,
        option: PenOption,
        bus: &EventBus,
        rules: &Rules,
    ) -> Result<(), PenError> {
        registry.activate(pen.id())?;

        let hotkey = pen
            .menu(self.carrying)
            .and_then(|menu| menu.into_iter().find(|entry| entry.option == option))
            .map(|entry| entry.hotkey);

        let Some(hotkey) = hotkey else {
            self.stats.rejected += 1;
            return Ok(());
        };

        match pen.select_hotkey(hotkey, self.carrying, bus, rules) {
            Ok(Some(after)) => {
                self.carrying = after;
                self.record(option);
                Ok(())
            }
            Ok(None) => {
                self.stats.rejected += 1;
                Ok(())
            }
            Err(PenError::OptionUnavailable { .. }) => {
                self.stats.rejected += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn record(&mut self, option: PenOption) {
        let counter = match option {
            PenOption::Observe => &mut self.stats.observes,
            PenOption::Feed => &mut self.stats.feeds,
            PenOption::Clothe => &mut self.stats.clothes,
            PenOption::Eat => &mut self.stats.eats,
            PenOption::Pickup => &mut self.stats.pickups,
            PenOption::Deposit => &mut self.stats.deposits,
        };
        *counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pen_core::{Enclosure, Rect};

    fn farm() -> Registry {
        Registry::new(vec![
            Enclosure::stocked("Pen A", Rect::default(), 2, 100),
            Enclosure::stocked("Pen B", Rect::default(), 0, 100),
        ])
        .unwrap()
    }

    #[test]
    fn test_idle_player_does_nothing() {
        let registry = farm();
        let (bus, mut rx) = EventBus::channel();
        let mut player = Player::new(1, Strategy::Idle);

        player.act(&registry, &bus, &Rules::default()).unwrap();
        assert_eq!(player.stats(), PlayerStats::default());
        assert!(rx.drain_notifications().is_empty());
        assert!(registry.active_pen().is_none());
    }

    #[test]
    fn test_shuttle_moves_a_human() {
        let registry = farm();
        let (bus, mut rx) = EventBus::channel();
        let rules = Rules::default();
        let mut player = Player::new(1, Strategy::Shuttle);

        player.act(&registry, &bus, &rules).unwrap();
        assert_eq!(player.carrying(), CarriedItem::Human);
        assert_eq!(registry.total_population(), 1);

        player.act(&registry, &bus, &rules).unwrap();
        assert_eq!(player.carrying(), CarriedItem::Nothing);
        assert_eq!(registry.get(&"Pen B".into()).unwrap().population(), 1);
        assert_eq!(registry.active_pen().map(|p| p.id().as_str()), Some("Pen B"));

        let tags: Vec<CarriedItem> = rx
            .drain_carried()
            .iter()
            .filter_map(CarriedItem::from_tag)
            .collect();
        assert_eq!(tags, vec![CarriedItem::Human, CarriedItem::Nothing]);
    }

    #[test]
    fn test_feast_queues_eat_events() {
        let registry = farm();
        let (bus, mut rx) = EventBus::channel();
        let mut player = Player::new(1, Strategy::Feast);

        player.act(&registry, &bus, &Rules::default()).unwrap();
        assert_eq!(player.stats().eats, 1);
        assert_eq!(rx.consumed.try_recv().unwrap().as_str(), "Pen A");
        assert_eq!(rx.drain_resources(), vec![50]);
    }

    #[test]
    fn test_settle_deposits_carried_human() {
        let registry = farm();
        let (bus, _rx) = EventBus::channel();
        let rules = Rules::default();
        let mut player = Player::new(1, Strategy::Shuttle);

        player.act(&registry, &bus, &rules).unwrap();
        player.settle(&registry, &bus, &rules).unwrap();
        assert_eq!(player.carrying(), CarriedItem::Nothing);
        assert_eq!(registry.total_population(), 2);
    }

    #[test]
    fn test_random_player_is_seeded() {
        let run = |seed| {
            let registry = farm();
            let (bus, _rx) = EventBus::channel();
            let rules = Rules::default();
            let mut player = Player::new(seed, Strategy::Random);
            for _ in 0..50 {
                player.act(&registry, &bus, &rules).unwrap();
            }
            (player.stats(), registry.total_population())
        };
        assert_eq!(run(7), run(7));
    }
}
