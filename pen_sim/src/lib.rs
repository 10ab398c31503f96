//! Pen Simulation Harness
//!
//! This crate runs the pen engine headless: a virtual clock, a seeded
//! RNG and a scripted player replace the window, the wall clock and the
//! keyboard.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      ScenarioRunner                       │
//! │  ┌──────────────┐   options    ┌──────────────────────┐   │
//! │  │    Player    │─────────────►│  Registry (PenHandle │   │
//! │  │  (scripted)  │              │   per pen, locked)   │   │
//! │  └──────┬───────┘              └──────────▲───────────┘   │
//! │         │ consumed events                 │ tick/remove   │
//! │  ┌──────▼──────────────────────────────────┴───────────┐  │
//! │  │          Scheduler (background task)               │  │
//! │  └─────────────────────▲──────────────────────────────┘  │
//! │                        │ ticks                            │
//! │  ┌─────────────────────┴──────────────────────────────┐  │
//! │  │     SimContext (virtual clock + ChaCha8 RNG)        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pen_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).with_months(6).run(ScenarioId::Feast).await?;
//! assert!(result.passed);
//! ```

mod error;
mod player;
mod runner;
pub mod scenarios;

pub use error::SimError;
pub use player::{Player, PlayerStats, Strategy};
pub use runner::{ScenarioResult, ScenarioRunner};
