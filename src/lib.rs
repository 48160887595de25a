//! # Versus Env
//!
//! A gym-style Rust crate for driving real-time versus matches between AI
//! agents and an external game simulation.
//!
//! It provides:
//! - Match orchestration against an external simulation process (`MatchEnv`)
//! - A reduced discrete action table and controller encoding (`ActionSpace`)
//! - A zero-sum reward/termination signal over snapshots (`RewardModel`)
//! - Deadline-bounded per-agent action collection (`DeadlineActionLoop`)
//! - Declarative agent descriptors resolved through a factory registry
//!
//! The environment walks the simulation through its menus into a live match,
//! then each tick collects one action per agent, encodes it into controller
//! input, advances the process by one frame and scores the resulting state.
//! Agents are opaque policy functions; a policy that is late or returns an
//! invalid action id is substituted with the safe no-op action for that tick
//! and the match carries on.
//!
//! # Documentation Overview
//!
//! - For the match lifecycle (`start`/`reset`/`step`/`close`), see the
//!   [`env`] module.
//! - For the process and controller boundary contracts, see [`driver`] and
//!   [`controller`].
//! - For configuring behavior and deadlines, see
//!   [`Configuration`](crate::configuration::Configuration).
//! - For implementing and loading agents, see the
//!   [`Policy`](crate::action_loop::Policy) trait and the [`agent_loader`]
//!   module.
//!
//! # Usage Example
//!
//! ```no_run
//! # use versus_env::driver::ProcessDriver;
//! # use versus_env::controller::{Button, ControllerChannel, Shoulder, Stick};
//! # use versus_env::error::EnvError;
//! # use versus_env::snapshot::{MenuPhase, Snapshot};
//! # struct YourDriver;
//! # impl ProcessDriver for YourDriver {
//! #     fn run(&mut self) -> Result<(), EnvError> { Ok(()) }
//! #     fn connect(&mut self) -> Result<(), EnvError> { Ok(()) }
//! #     fn step(&mut self) -> Result<Snapshot, EnvError> {
//! #         Ok(Snapshot { phase: MenuPhase::InGame, entities: vec![] })
//! #     }
//! #     fn stop(&mut self) {}
//! # }
//! # struct YourChannel;
//! # impl ControllerChannel for YourChannel {
//! #     fn connect(&mut self) -> Result<(), EnvError> { Ok(()) }
//! #     fn disconnect(&mut self) {}
//! #     fn release_all(&mut self) {}
//! #     fn press(&mut self, _b: Button) {}
//! #     fn tilt_stick(&mut self, _s: Stick, _x: f32, _y: f32) {}
//! #     fn press_shoulder(&mut self, _s: Shoulder, _v: f32) {}
//! # }
//! use std::time::Duration;
//! use versus_env::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new()
//!         .with_action_timeout(Duration::from_millis(100))
//!         .with_max_ticks(10_000);
//!
//!     let slots = vec![
//!         AgentSlot::ai(1, Character::Fox, Box::new(YourChannel)),
//!         AgentSlot::ai(2, Character::Marth, Box::new(YourChannel)),
//!     ];
//!
//!     let mut env = MatchEnv::new(YourDriver, slots, config)?;
//!     env.start()?;
//!
//!     let mut actions = DeadlineActionLoop::new(2, config.action_timeout(), 45);
//!     actions.register(0, Box::new(|_s: &Snapshot| 9)); // always attack
//!     actions.register(1, Box::new(|_s: &Snapshot| 0)); // always idle
//!
//!     let settings = MatchSettings::from_config(Stage::FinalDestination, &config);
//!     let report = run_match(&mut env, &mut actions, &settings)?;
//!     println!("{:?}", report.outcome);
//!
//!     env.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Agent Requirements
//!
//! - A policy implements `act(&Snapshot) -> ActionId` (closures work too)
//! - Action ids must be in `[0, 45)`; anything else becomes the no-op
//! - Policy logic should return within the configured action deadline —
//!   overruns are not cancelled, but their results are discarded
#![warn(missing_docs)]

pub mod action_loop;
pub mod action_space;
pub mod agent_loader;
pub mod configuration;
pub mod controller;
pub mod driver;
pub mod env;
pub mod error;
mod hygiene;
mod logger;
pub mod match_runner;
mod menu;
pub mod recorder;
pub mod reward;
pub mod slot;
pub mod snapshot;

pub use anyhow;
pub use hygiene::kill_zombies;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use versus_env::prelude::*;
/// ```
pub mod prelude {
    pub use crate::action_loop::{DeadlineActionLoop, Policy};
    pub use crate::action_space::{ActionId, ActionSpace, NOOP_ACTION};
    pub use crate::agent_loader::{AgentDescriptor, PolicyFactory, PolicyRegistry};
    pub use crate::configuration::Configuration;
    pub use crate::controller::{ControllerChannel, ControllerFrame};
    pub use crate::driver::ProcessDriver;
    pub use crate::env::MatchEnv;
    pub use crate::error::EnvError;
    pub use crate::match_runner::{run_match, MatchOutcome, MatchReport, MatchSettings};
    pub use crate::recorder::{ActionRecorder, JsonActionRecorder};
    pub use crate::reward::{RewardModel, RewardSample};
    pub use crate::slot::{AgentSlot, Character, Role, Stage};
    pub use crate::snapshot::{EntityState, MenuPhase, Snapshot};
}
