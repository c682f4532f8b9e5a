//! Fixtures for exercising the engine in tests.

use crate::{Engine, EngineError};
use commonware_codec::Encode;
use matchgrid_types::{Account, AccountId, Command, Dashboard, Game, State, Tick, STATE_LEN};

/// Owner identity shared by all engine-owned fixture accounts.
pub const ENGINE_OWNER: AccountId = AccountId::new([0xE1; 32]);

/// Deterministic identifier from a one-byte seed.
pub fn account_id(seed: u8) -> AccountId {
    AccountId::new([seed; 32])
}

/// Engine-owned account with a zeroed (uninitialized) state buffer.
pub fn fresh_account(id: AccountId) -> Account {
    Account {
        id,
        owner: ENGINE_OWNER,
        signer: false,
        balance: 0,
        data: vec![0u8; STATE_LEN],
    }
}

/// Engine-owned account holding `state`.
pub fn stateful_account(id: AccountId, state: &State) -> Account {
    let mut account = fresh_account(id);
    state.store(&mut account.data).expect("state fits buffer");
    account
}

/// Initialized dashboard account with `balance` tokens to fund from.
pub fn dashboard_account(id: AccountId, balance: u64) -> Account {
    let mut account = stateful_account(id, &State::Dashboard(Dashboard::default()));
    account.balance = balance;
    account
}

/// Initialized game account.
pub fn game_account(id: AccountId, game: Game) -> Account {
    stateful_account(id, &State::Game(game))
}

/// Plain signing player account: empty buffer, engine owner.
pub fn player_account(id: AccountId) -> Account {
    Account {
        id,
        owner: ENGINE_OWNER,
        signer: true,
        balance: 0,
        data: Vec::new(),
    }
}

/// Decode the state an engine-owned fixture account currently holds.
pub fn decode_state(account: &Account) -> State {
    State::load(&account.data).expect("fixture state decodes")
}

/// Encode and execute one command at `tick`.
pub fn execute(
    tick: Tick,
    accounts: &mut [Account],
    command: Command,
) -> Result<(), EngineError> {
    Engine::new(tick).execute(accounts, &command.encode())
}
