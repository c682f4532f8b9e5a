//! Command dispatcher.
//!
//! One invocation decodes the instruction, checks the per-command account
//! preconditions, routes to the matching handler, applies the funding policy,
//! and only then commits the staged buffer and balance writes. Preconditions
//! are a declarative table per command: the required role sequence (role
//! order is significant and not self-describing), which roles must have
//! signed, and which accounts are topped up on success.
//!
//! All validation happens before any mutation and all mutation happens on
//! staged copies, so a returned error leaves every account byte-identical.

use crate::funding::{self, FundingOutcome, ResourceError};
use crate::tictactoe::GameError;
use matchgrid_types::{Account, Command, State, StateCodecError, StateTag, Tick};
use thiserror::Error;
use tracing::debug;

mod handlers;

/// Failure to decode the instruction or an account buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("instruction malformed")]
    Instruction(#[source] commonware_codec::Error),
    #[error("expected at least {required} accounts, got {got}")]
    NotEnoughAccounts { required: usize, got: usize },
    #[error("account {index} buffer too short (len {len}, need {need})")]
    BufferTooShort {
        index: usize,
        len: usize,
        need: usize,
    },
    #[error("account {index} state malformed")]
    AccountState {
        index: usize,
        #[source]
        source: commonware_codec::Error,
    },
}

/// Failure to authorize an account for its role.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("account {index} did not sign the instruction")]
    MissingSignature { index: usize },
    #[error("account {index} is not a valid counterparty ({reason})")]
    InvalidCounterparty { index: usize, reason: &'static str },
}

/// An account whose decoded state does not admit the requested transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("account {index} holds {got} state, expected {expected}")]
    WrongAccountState {
        index: usize,
        expected: StateTag,
        got: StateTag,
    },
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Terminal outcome of a failed invocation. The host discards every buffer
/// and balance mutation when this is returned; the engine stages its writes
/// so none exist anyway.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl From<GameError> for EngineError {
    fn from(err: GameError) -> Self {
        Self::State(StateError::Game(err))
    }
}

/// What an account position must hold for a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    /// Engine-owned account that must still be uninitialized.
    Fresh,
    /// Engine-owned account already tagged as a game.
    Game,
    /// Engine-owned account already tagged as the dashboard.
    Dashboard,
    /// Plain value account paired with the engine-owned accounts: matching
    /// owner, empty buffer.
    Player,
}

impl Role {
    /// The tag an account in this role must decode to, if it holds engine
    /// state at all.
    fn expected_tag(&self) -> Option<StateTag> {
        match self {
            Role::Fresh => Some(StateTag::Uninitialized),
            Role::Game => Some(StateTag::Game),
            Role::Dashboard => Some(StateTag::Dashboard),
            Role::Player => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct AccountSpec {
    role: Role,
    signer: bool,
}

const fn spec(role: Role, signer: bool) -> AccountSpec {
    AccountSpec { role, signer }
}

/// Declarative preconditions for one command.
struct CommandShape {
    /// Required account roles, in position order.
    roles: &'static [AccountSpec],
    /// Positions topped up from the dashboard after the handler succeeds.
    funded: &'static [usize],
}

const INIT_DASHBOARD: CommandShape = CommandShape {
    roles: &[spec(Role::Fresh, true)],
    funded: &[],
};

const INIT_PLAYER: CommandShape = CommandShape {
    roles: &[spec(Role::Dashboard, false), spec(Role::Player, true)],
    funded: &[1],
};

const INIT_GAME: CommandShape = CommandShape {
    roles: &[
        spec(Role::Fresh, false),
        spec(Role::Dashboard, false),
        spec(Role::Player, true),
    ],
    funded: &[0, 2],
};

const GAME_COMMAND: CommandShape = CommandShape {
    roles: &[
        spec(Role::Game, false),
        spec(Role::Dashboard, false),
        spec(Role::Player, true),
    ],
    funded: &[2],
};

const UPDATE_DASHBOARD: CommandShape = CommandShape {
    roles: &[spec(Role::Dashboard, false), spec(Role::Game, false)],
    funded: &[],
};

fn shape(command: &Command) -> &'static CommandShape {
    match command {
        Command::InitDashboard => &INIT_DASHBOARD,
        Command::InitPlayer => &INIT_PLAYER,
        Command::InitGame => &INIT_GAME,
        Command::Join | Command::Move { .. } | Command::KeepAlive => &GAME_COMMAND,
        Command::UpdateDashboard => &UPDATE_DASHBOARD,
    }
}

/// One invocation's execution context.
pub struct Engine {
    tick: Tick,
}

impl Engine {
    /// Create an engine for one invocation at the host-supplied tick.
    pub fn new(tick: Tick) -> Self {
        Self { tick }
    }

    /// Decode and execute one instruction against the supplied accounts.
    ///
    /// On success every staged state and balance write has been committed; on
    /// failure the accounts are untouched.
    pub fn execute(
        &self,
        accounts: &mut [Account],
        instruction: &[u8],
    ) -> Result<(), EngineError> {
        let command = Command::decode(instruction).map_err(DecodeError::Instruction)?;
        debug!(?command, tick = self.tick, accounts = accounts.len(), "executing command");

        let shape = shape(&command);
        if accounts.len() < shape.roles.len() {
            return Err(DecodeError::NotEnoughAccounts {
                required: shape.roles.len(),
                got: accounts.len(),
            }
            .into());
        }

        for (index, spec) in shape.roles.iter().enumerate() {
            if spec.signer && !accounts[index].signer {
                return Err(AuthorizationError::MissingSignature { index }.into());
            }
        }

        // Decode engine-owned state and check every account fits its role.
        // Player positions get a placeholder that is never written back.
        let mut states = Vec::with_capacity(shape.roles.len());
        for (index, spec) in shape.roles.iter().enumerate() {
            let state = match spec.role.expected_tag() {
                None => State::Uninitialized,
                Some(expected) => {
                    let state = State::load(&accounts[index].data)
                        .map_err(|err| account_decode_error(index, err))?;
                    if state.tag() != expected {
                        return Err(StateError::WrongAccountState {
                            index,
                            expected,
                            got: state.tag(),
                        }
                        .into());
                    }
                    state
                }
            };
            states.push(state);
        }

        // Counterparty checks anchor on the dashboard account's owner: the
        // engine-owned accounts share one owner, and plain accounts must be
        // owned the same way with nothing stored in them.
        let anchor = shape
            .roles
            .iter()
            .position(|spec| spec.role == Role::Dashboard);
        if let Some(anchor) = anchor {
            let owner = accounts[anchor].owner;
            for (index, spec) in shape.roles.iter().enumerate() {
                if accounts[index].owner != owner {
                    return Err(AuthorizationError::InvalidCounterparty {
                        index,
                        reason: "owner mismatch",
                    }
                    .into());
                }
                if spec.role == Role::Player && !accounts[index].data.is_empty() {
                    return Err(AuthorizationError::InvalidCounterparty {
                        index,
                        reason: "buffer not empty",
                    }
                    .into());
                }
            }
        }

        self.apply(&command, accounts, &mut states)?;

        // Top up the originators of the next instruction from the dashboard.
        let mut balances: Vec<u64> = accounts.iter().map(|account| account.balance).collect();
        if let Some(source) = anchor {
            for &dest in shape.funded {
                let outcome = fund_pair(&mut balances, source, dest)?;
                if outcome == FundingOutcome::AlreadyFunded {
                    debug!(index = dest, "account already funded");
                }
            }
        }

        // Commit: every validation and mutation step succeeded.
        for (index, state) in states.into_iter().enumerate() {
            if shape.roles[index].role.expected_tag().is_some() {
                state
                    .store(&mut accounts[index].data)
                    .map_err(|err| account_decode_error(index, err))?;
            }
        }
        for (index, balance) in balances.into_iter().enumerate() {
            accounts[index].balance = balance;
        }
        Ok(())
    }
}

fn account_decode_error(index: usize, err: StateCodecError) -> EngineError {
    match err {
        StateCodecError::BufferTooShort { len, need } => {
            DecodeError::BufferTooShort { index, len, need }.into()
        }
        StateCodecError::Malformed(source) => DecodeError::AccountState { index, source }.into(),
    }
}

/// Move one funding unit between two distinct positions of the staged
/// balance list.
fn fund_pair(
    balances: &mut [u64],
    source: usize,
    dest: usize,
) -> Result<FundingOutcome, ResourceError> {
    if source < dest {
        let (left, right) = balances.split_at_mut(dest);
        funding::fund(&mut left[source], &mut right[0])
    } else {
        let (left, right) = balances.split_at_mut(source);
        funding::fund(&mut right[0], &mut left[dest])
    }
}
