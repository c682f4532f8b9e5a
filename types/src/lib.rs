//! Common types for the matchgrid engine.
//!
//! This crate defines the host-facing account model and the wire formats the
//! engine reads and writes: the command payload carried by an instruction and
//! the tagged state stored in an account buffer. All multi-byte fields are
//! fixed-width little-endian; layouts are documented per module and covered by
//! exact-byte tests.

pub mod account;
pub mod command;
pub mod dashboard;
pub mod game;
pub mod state;

pub use account::{Account, AccountId, ACCOUNT_ID_LEN};
pub use command::Command;
pub use dashboard::{Dashboard, COMPLETED_GAME_SLOTS};
pub use game::{Cell, Game, GameState, BOARD_CELLS, PLAYER_SLOTS};
pub use state::{State, StateCodecError, StateTag, STATE_LEN, STATE_TAG_LEN};

/// Host-supplied logical clock value. Monotonically non-decreasing across
/// invocations; the engine never reads wall-clock time.
pub type Tick = u64;
