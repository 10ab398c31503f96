//! Pen options - the context-sensitive actions a player can take at a pen.
//!
//! Options form a closed set (`PenOption`) so every place that interprets
//! them is an exhaustive `match`. Which options are offered depends on what
//! the player is carrying; the order they are offered in fixes the number
//! key each one is bound to.

use crate::config::Rules;
use crate::error::PenError;
use crate::registry::PenHandle;
use pen_env::{EnvError, EventBus, ItemTag};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Popup shown when the player eats a human.
const EAT_MESSAGE: &str = "You ate some brains!  Yum!";

/// What the player is holding, as reported by the inventory subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarriedItem {
    /// Empty hands
    #[default]
    Nothing,
    Food,
    Cloth,
    Human,
}

impl CarriedItem {
    /// Returns the inventory tag for this item ("" for empty hands).
    pub fn tag(self) -> ItemTag {
        match self {
            CarriedItem::Nothing => ItemTag::cleared(),
            CarriedItem::Food => ItemTag::new("food"),
            CarriedItem::Cloth => ItemTag::new("cloth"),
            CarriedItem::Human => ItemTag::new("human"),
        }
    }

    /// Parses an inventory tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &ItemTag) -> Option<Self> {
        match tag.as_str() {
            "" => Some(CarriedItem::Nothing),
            "food" => Some(CarriedItem::Food),
            "cloth" => Some(CarriedItem::Cloth),
            "human" => Some(CarriedItem::Human),
            _ => None,
        }
    }
}

/// An action offered at a pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PenOption {
    /// Report population and food
    Observe,
    /// Hand over carried food
    Feed,
    /// Hand over carried cloth
    Clothe,
    /// Eat a human (removal happens in the scheduler)
    Eat,
    /// Take the oldest human out of the pen
    Pickup,
    /// Put a carried human into the pen
    Deposit,
}

/// A numbered menu line for the active pen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Number key bound to this option (1-based)
    pub hotkey: usize,

    pub option: PenOption,

    /// Text shown next to the hotkey
    pub text: &'static str,
}

impl PenOption {
    /// Text shown in the option menu.
    pub fn display_text(self) -> &'static str {
        match self {
            PenOption::Observe => "Observe pen",
            PenOption::Feed => "Feed humans",
            PenOption::Clothe => "Give humans cloth for warmth",
            PenOption::Eat => "Eat a human",
            PenOption::Pickup => "Pickup human",
            PenOption::Deposit => "Deposit human",
        }
    }

    /// Performs the option against `pen`.
    ///
    /// Availability is re-checked under the pen lock together with the
    /// mutation, so an option that went stale (e.g. Pickup after the last
    /// human starved) fails with `OptionUnavailable` instead of acting.
    ///
    /// Returns what the player carries afterwards. Bus failures are logged
    /// and do not undo the action.
    pub fn perform(
        self,
        pen: &PenHandle,
        carrying: CarriedItem,
        bus: &EventBus,
        rules: &Rules,
    ) -> Result<CarriedItem, PenError> {
        let (carrying_after, message) = pen.with(|enclosure| {
            if !enclosure.available_options(carrying).contains(&self) {
                return Err(PenError::OptionUnavailable {
                    option: self.display_text(),
                    pen: enclosure.id().clone(),
                });
            }

            let title = enclosure.title().to_string();
            let outcome = match self {
                PenOption::Observe => (
                    carrying,
                    Some(format!(
                        "This pen holds humans for eating!\n\
                         {} humans in this pen, with {} food\n\
                         Feed them each month",
                        enclosure.population(),
                        enclosure.food()
                    )),
                ),
                PenOption::Feed => {
                    enclosure.add_food(rules.feed_ration);
                    (
                        CarriedItem::Nothing,
                        Some(format!("You gave food to the humans in {title}")),
                    )
                }
                PenOption::Clothe => (
                    CarriedItem::Nothing,
                    Some(format!("You gave clothes to the humans in {title}")),
                ),
                PenOption::Eat => (carrying, Some(EAT_MESSAGE.to_string())),
                PenOption::Pickup => {
                    enclosure.remove_oldest_human()?;
                    (CarriedItem::Human, None)
                }
                PenOption::Deposit => {
                    enclosure.add_human();
                    (CarriedItem::Nothing, None)
                }
            };
            Ok(outcome)
        })?;

        debug!(pen = %pen.id(), option = ?self, "performed pen option");

        if let Some(text) = message {
            report(bus.notify(text));
        }
        if carrying_after != carrying {
            report(bus.carry(carrying_after.tag()));
        }
        if self == PenOption::Eat {
            report(bus.gain_resource(rules.eat_reward));
            report(bus.consumed(pen.id().clone()));
        }

        Ok(carrying_after)
    }
}

impl fmt::Display for PenOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

fn report(result: Result<(), EnvError>) {
    if let Err(e) = result {
        warn!("dropped pen event: {e}");
    }
}

impl PenHandle {
    /// Returns the numbered option menu, or `None` if this pen is not active.
    pub fn menu(&self, carrying: CarriedItem) -> Option<Vec<MenuEntry>> {
        self.with(|enclosure| {
            if !enclosure.is_active() {
                return None;
            }
            let entries = enclosure
                .available_options(carrying)
                .into_iter()
                .enumerate()
                .map(|(i, option)| MenuEntry {
                    hotkey: i + 1,
                    option,
                    text: option.display_text(),
                })
                .collect();
            Some(entries)
        })
    }

    /// Dispatches the option bound to number key `hotkey`.
    ///
    /// Returns `Ok(None)` when the pen is inactive or no option is bound to
    /// the key, otherwise the carried item after the action.
    pub fn select_hotkey(
        &self,
        hotkey: usize,
        carrying: CarriedItem,
        bus: &EventBus,
        rules: &Rules,
    ) -> Result<Option<CarriedItem>, PenError> {
        let option = self
            .menu(carrying)
            .and_then(|entries| entries.into_iter().find(|e| e.hotkey == hotkey))
            .map(|entry| entry.option);

        match option {
            Some(option) => option.perform(self, carrying, bus, rules).map(Some),
            None => Ok(None),
        }
    }
}
