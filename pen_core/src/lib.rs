//! Pen Core - Enclosure Simulation Engine
//!
//! Pens hold humans that must be fed every month or they starve, that
//! occasionally breed, and that the player can observe, feed, clothe, eat,
//! pick up or deposit. Three lines of execution touch the pens:
//! 1. **Scheduler**: background task applying the monthly feeding rule and
//!    processing "human eaten" events
//! 2. **Foreground loop**: per-frame breeding updates and option actions
//! 3. **Timer**: the fixed-interval feeding tick, supplied by the context
//!
//! Every pen sits behind its own lock (`PenHandle`), so a Pickup can never
//! race a starvation removal on the same pen.
//!
//! # Example
//!
//! ```ignore
//! use pen_core::{PensConfig, Registry, Scheduler};
//! use pen_env::{EventBus, TokioContext};
//!
//! let config = PensConfig::default();
//! let registry = Registry::from_config(&config)?;
//! let (bus, mut receivers) = EventBus::channel();
//! let scheduler = Scheduler::new(
//!     TokioContext::shared(),
//!     registry.clone(),
//!     bus.clone(),
//!     receivers.consumed,
//!     config.feeding_interval(),
//! );
//! let handle = scheduler.spawn();
//! ```

pub mod config;
pub mod enclosure;
pub mod error;
pub mod human;
pub mod options;
pub mod registry;
pub mod scheduler;

// Re-export key types for convenience
pub use config::{PenSpec, PensConfig, Rules};
pub use enclosure::{Enclosure, Rect};
pub use error::PenError;
pub use human::{Human, SpriteHandle};
pub use options::{CarriedItem, MenuEntry, PenOption};
pub use registry::{PenHandle, Registry};
pub use scheduler::{Scheduler, SchedulerHandle, SchedulerStats, NO_HUMANS_LEFT};
