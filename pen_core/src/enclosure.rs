//! The Enclosure - a pen of humans with a food stock.
//!
//! An `Enclosure` is a pure rule object: it knows how feeding, breeding and
//! removal change its own counters, but it never sends notifications and
//! never locks. Callers reach it through a `PenHandle`, which serializes
//! every mutation behind a per-pen mutex.
//!
//! # Feeding Rule
//!
//! Each month the pen consumes one unit of food per human:
//!
//! ```text
//! food == 0 && population > 0   → starved, food stays 0
//! food <  population            → starved, food reset to 0
//! otherwise                     → food -= population
//! ```

use crate::error::PenError;
use crate::human::Human;
use crate::options::{CarriedItem, PenOption};
use pen_env::{PenContext, PenId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Screen-space bounds of a pen. Stored for the renderer only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Creates a rectangle from two corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

/// A pen holding an ordered population of humans.
#[derive(Debug, Clone)]
pub struct Enclosure {
    /// Pen title, also its registry key
    id: PenId,

    /// Humans, oldest first
    humans: VecDeque<Human>,

    /// Food stock (never negative by construction)
    food: u32,

    /// Renderer bounds
    bounds: Rect,

    /// Whether the player is currently interacting with this pen
    active: bool,

    /// Serial for the next human added
    next_serial: u64,
}

impl Enclosure {
    /// Creates an empty pen with no food.
    pub fn new(id: impl Into<PenId>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            humans: VecDeque::new(),
            food: 0,
            bounds,
            active: false,
            next_serial: 0,
        }
    }

    /// Creates a pen stocked with `humans` humans and `food` food.
    pub fn stocked(id: impl Into<PenId>, bounds: Rect, humans: usize, food: u32) -> Self {
        let mut pen = Self::new(id, bounds);
        for _ in 0..humans {
            pen.add_human();
        }
        pen.food = food;
        pen
    }

    /// Returns the pen identifier.
    pub fn id(&self) -> &PenId {
        &self.id
    }

    /// Returns the display title.
    pub fn title(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the renderer bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of humans in the pen.
    pub fn population(&self) -> usize {
        self.humans.len()
    }

    /// Current food stock.
    pub fn food(&self) -> u32 {
        self.food
    }

    /// Humans in residency order (oldest first).
    pub fn humans(&self) -> impl Iterator<Item = &Human> {
        self.humans.iter()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Applies one month of feeding.
    ///
    /// Returns `true` if the food did not cover the population. The
    /// population itself is left untouched; the scheduler decides who dies.
    pub fn apply_monthly_feeding(&mut self) -> bool {
        let population = self.humans.len();

        if self.food == 0 && population > 0 {
            return true;
        }

        if (self.food as usize) < population {
            self.food = 0;
            return true;
        }

        // food >= population here, so this cannot underflow
        self.food -= population as u32;
        false
    }

    /// Adds food, saturating at `u32::MAX`.
    pub fn add_food(&mut self, amount: u32) {
        self.food = self.food.saturating_add(amount);
    }

    /// Appends a new human to the tail of the sequence.
    pub fn add_human(&mut self) -> &Human {
        let human = Human::new(self.next_serial, self.id.clone());
        self.next_serial += 1;
        self.humans.push_back(human);
        &self.humans[self.humans.len() - 1]
    }

    /// Removes and returns the longest-resident human.
    ///
    /// # Errors
    /// `PenError::EmptyPen` if there is nobody to remove. The pen is left
    /// unchanged; this never panics in any build profile.
    pub fn remove_oldest_human(&mut self) -> Result<Human, PenError> {
        self.humans
            .pop_front()
            .ok_or_else(|| PenError::EmptyPen(self.id.clone()))
    }

    /// Removes every human, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.humans.len();
        self.humans.clear();
        removed
    }

    /// Returns the options offered for the given carried item, in hotkey order.
    pub fn available_options(&self, carrying: CarriedItem) -> Vec<PenOption> {
        let has_humans = !self.humans.is_empty();
        let mut opts = vec![PenOption::Observe];

        if carrying == CarriedItem::Food {
            opts.push(PenOption::Feed);
        }
        if carrying == CarriedItem::Cloth {
            opts.push(PenOption::Clothe);
        }
        if has_humans {
            opts.push(PenOption::Eat);
        }
        if has_humans && carrying == CarriedItem::Nothing {
            opts.push(PenOption::Pickup);
        }
        if carrying == CarriedItem::Human {
            opts.push(PenOption::Deposit);
        }

        opts
    }

    /// Per-frame update: ages every human and rolls for breeding.
    ///
    /// A pen of two or more humans breeds when a uniform draw in
    /// `[0, breeding_odds)` comes up 0, i.e. with probability
    /// `1 / breeding_odds` per frame. `breeding_odds == 0` disables breeding.
    /// Returns `true` if a human was born.
    pub fn update<C: PenContext + ?Sized>(
        &mut self,
        dt: f64,
        ctx: &C,
        breeding_odds: u32,
    ) -> bool {
        for human in self.humans.iter_mut() {
            human.update(dt);
        }

        if breeding_odds == 0 || self.humans.len() < 2 {
            return false;
        }

        if ctx.roll_below(breeding_odds) == 0 {
            self.add_human();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pen_env::SimContext;

    fn pen(humans: usize, food: u32) -> Enclosure {
        Enclosure::stocked("Pen A", Rect::default(), humans, food)
    }

    #[test]
    fn test_feeding_with_no_food_starves() {
        let mut p = pen(2, 0);
        assert!(p.apply_monthly_feeding());
        assert_eq!(p.food(), 0);
        assert_eq!(p.population(), 2);
    }

    #[test]
    fn test_feeding_short_resets_food() {
        let mut p = pen(3, 1);
        assert!(p.apply_monthly_feeding());
        assert_eq!(p.food(), 0);
    }

    #[test]
    fn test_feeding_enough_food() {
        let mut p = pen(1, 5);
        assert!(!p.apply_monthly_feeding());
        assert_eq!(p.food(), 4);

        let mut exact = pen(4, 4);
        assert!(!exact.apply_monthly_feeding());
        assert_eq!(exact.food(), 0);
    }

    #[test]
    fn test_feeding_empty_pen() {
        let mut p = pen(0, 0);
        assert!(!p.apply_monthly_feeding());

        let mut stocked = pen(0, 7);
        assert!(!stocked.apply_monthly_feeding());
        assert_eq!(stocked.food(), 7);
    }

    #[test]
    fn test_add_human_appends_at_tail() {
        let mut p = pen(2, 0);
        let serial = p.add_human().serial;

        assert_eq!(p.population(), 3);
        assert_eq!(p.humans().last().map(|h| h.serial), Some(serial));
        assert!(p.humans().all(|h| h.pen == *p.id()));
    }

    #[test]
    fn test_remove_oldest_preserves_order() {
        let mut p = pen(4, 0);
        let removed = p.remove_oldest_human().unwrap();

        assert_eq!(removed.serial, 0);
        let serials: Vec<u64> = p.humans().map(|h| h.serial).collect();
        assert_eq!(serials, vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_from_empty_pen_is_error() {
        let mut p = pen(0, 3);
        let err = p.remove_oldest_human().unwrap_err();

        assert!(matches!(err, PenError::EmptyPen(ref id) if id.as_str() == "Pen A"));
        assert_eq!(p.population(), 0);
        assert_eq!(p.food(), 3);
    }

    #[test]
    fn test_clear() {
        let mut p = pen(3, 0);
        assert_eq!(p.clear(), 3);
        assert_eq!(p.population(), 0);
    }

    #[test]
    fn test_add_food_saturates() {
        let mut p = pen(0, u32::MAX - 1);
        p.add_food(10);
        assert_eq!(p.food(), u32::MAX);
    }

    #[test]
    fn test_options_empty_pen_nothing_carried() {
        let p = pen(0, 0);
        assert_eq!(p.available_options(CarriedItem::Nothing), vec![PenOption::Observe]);
    }

    #[test]
    fn test_options_ordering() {
        let p = pen(2, 0);
        assert_eq!(
            p.available_options(CarriedItem::Nothing),
            vec![PenOption::Observe, PenOption::Eat, PenOption::Pickup]
        );
        assert_eq!(
            p.available_options(CarriedItem::Food),
            vec![PenOption::Observe, PenOption::Feed, PenOption::Eat]
        );
        assert_eq!(
            p.available_options(CarriedItem::Cloth),
            vec![PenOption::Observe, PenOption::Clothe, PenOption::Eat]
        );
        assert_eq!(
            p.available_options(CarriedItem::Human),
            vec![PenOption::Observe, PenOption::Eat, PenOption::Deposit]
        );

        let empty = pen(0, 0);
        assert_eq!(
            empty.available_options(CarriedItem::Food),
            vec![PenOption::Observe, PenOption::Feed]
        );
        assert_eq!(
            empty.available_options(CarriedItem::Human),
            vec![PenOption::Observe, PenOption::Deposit]
        );
    }

    #[test]
    fn test_update_ages_humans() {
        let ctx = SimContext::new(1);
        let mut p = pen(1, 0);
        p.update(0.5, &ctx, 2000);
        assert!(p.humans().all(|h| h.age_secs == 0.5));
    }

    #[test]
    fn test_breeding_certain_with_odds_one() {
        let ctx = SimContext::new(1);
        let mut p = pen(2, 0);
        assert!(p.update(0.016, &ctx, 1));
        assert_eq!(p.population(), 3);
    }

    #[test]
    fn test_no_breeding_below_two_or_disabled() {
        let ctx = SimContext::new(1);
        let mut single = pen(1, 0);
        assert!(!single.update(0.016, &ctx, 1));
        assert_eq!(single.population(), 1);

        let mut disabled = pen(5, 0);
        for _ in 0..100 {
            assert!(!disabled.update(0.016, &ctx, 0));
        }
        assert_eq!(disabled.population(), 5);
    }

    #[test]
    fn test_breeding_is_rare_but_reachable() {
        let ctx = SimContext::new(42);
        let mut p = pen(2, 0);
        let mut births = 0;
        for _ in 0..200_000 {
            if p.update(0.016, &ctx, 2000) {
                births += 1;
            }
        }
        // Expected ~100 births; allow a wide margin
        assert!(births > 30, "births = {births}");
        assert!(births < 300, "births = {births}");
    }
}
