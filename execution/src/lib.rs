//! Matchgrid execution layer.
//!
//! This crate contains the deterministic command execution logic ([`Engine`])
//! and the game/dashboard state machines it drives.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution; all timing comes from the
//!   host-supplied tick.
//! - Do not use randomness; every transition is a function of the supplied
//!   accounts, instruction, and tick.
//! - No I/O, blocking, or suspension: one invocation is a pure synchronous
//!   transform over the buffers handed in.
//!
//! ## Atomicity invariants
//! An invocation either succeeds and commits every staged buffer and balance
//! write, or fails and commits nothing. Validation precedes mutation in every
//! handler, and re-submitting a terminal game to the dashboard must converge
//! without double-counting (see `dashboard`).
//!
//! The primary entrypoint is [`Engine`].

pub mod dashboard;
pub mod funding;
pub mod tictactoe;

mod engine;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

#[cfg(test)]
mod dispatch_tests;


pub use dashboard::DashboardUpdate;
pub use engine::{AuthorizationError, DecodeError, Engine, EngineError, StateError};
pub use funding::{FundingOutcome, ResourceError};
pub use tictactoe::GameError;
