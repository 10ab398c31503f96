//! Pen Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the pen engine
//! to run in both **Production** (tokio) and **Simulation** (virtual clock) environments.
//!
//! # Core Concept: Injected Environment
//!
//! Everything the engine would otherwise reach for globally is passed in:
//! - Time (`now()`, `sleep()`, `ticker()`)
//! - Randomness (`roll_below()`)
//! - Channels (`EventBus`, `BusReceivers`)
//!
//! By deriving all entropy from a single 64-bit seed, any simulation run
//! becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use pen_env::{PenContext, PenId};
//!
//! async fn feeding_loop<Ctx: PenContext>(
//!     ctx: &Ctx,
//!     consumed: &mut tokio::sync::mpsc::UnboundedReceiver<PenId>,
//! ) {
//!     let mut ticker = ctx.ticker(Duration::from_secs(30));
//!     loop {
//!         tokio::select! {
//!             Some(pen) = consumed.recv() => remove_oldest(pen),
//!             _ = ticker.tick() => feed_all(),
//!         }
//!     }
//! }
//! ```

mod bus;
mod context;
mod error;
mod sim_impl;
mod tokio_impl;
mod types;

pub use bus::{BusReceivers, EventBus};
pub use context::{PenContext, Ticker};
pub use error::EnvError;
pub use sim_impl::SimContext;
pub use tokio_impl::TokioContext;
pub use types::{ItemTag, Notification, PenId};
