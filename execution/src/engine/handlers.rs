//! Per-command handlers.
//!
//! Handlers run after the dispatcher has validated account shape, signatures,
//! tags, and counterparties, and they mutate only the staged state list. The
//! extraction helpers re-check the variant they were handed so a routing
//! mistake surfaces as a modeled error instead of a panic.

use super::{Engine, EngineError, StateError};
use crate::{dashboard, tictactoe};
use matchgrid_types::{Account, Command, Dashboard, Game, State, StateTag};
use tracing::debug;

// Position of each role within the command shapes in `super`.
const PRIMARY_INDEX: usize = 0;
const GAME_OF_UPDATE_INDEX: usize = 1;
const ACTOR_INDEX: usize = 2;

impl Engine {
    pub(super) fn apply(
        &self,
        command: &Command,
        accounts: &[Account],
        states: &mut [State],
    ) -> Result<(), EngineError> {
        match command {
            Command::InitDashboard => {
                states[PRIMARY_INDEX] = State::Dashboard(Dashboard::default());
                debug!(id = %accounts[PRIMARY_INDEX].id, "initialized dashboard");
                Ok(())
            }
            // Validation and funding are the whole command; there is no state
            // to create for a plain player account.
            Command::InitPlayer => Ok(()),
            Command::InitGame => {
                let player_x = accounts[ACTOR_INDEX].id;
                states[PRIMARY_INDEX] =
                    State::Game(tictactoe::create(player_x, self.tick));
                debug!(id = %accounts[PRIMARY_INDEX].id, %player_x, "initialized game");
                Ok(())
            }
            Command::Join => {
                let player_o = accounts[ACTOR_INDEX].id;
                let game = game_mut(states, PRIMARY_INDEX)?;
                tictactoe::join(game, player_o, self.tick)?;
                debug!(id = %accounts[PRIMARY_INDEX].id, %player_o, "player joined");
                Ok(())
            }
            Command::Move { x, y } => {
                let actor = accounts[ACTOR_INDEX].id;
                let game = game_mut(states, PRIMARY_INDEX)?;
                tictactoe::next_move(game, actor, *x, *y)?;
                debug!(id = %accounts[PRIMARY_INDEX].id, x = *x, y = *y, state = ?game.state, "move applied");
                Ok(())
            }
            Command::KeepAlive => {
                let actor = accounts[ACTOR_INDEX].id;
                let game = game_mut(states, PRIMARY_INDEX)?;
                tictactoe::keep_alive(game, actor, self.tick)?;
                Ok(())
            }
            Command::UpdateDashboard => {
                let game_id = accounts[GAME_OF_UPDATE_INDEX].id;
                let game = game_ref(states, GAME_OF_UPDATE_INDEX)?.clone();
                let dashboard = dashboard_mut(states, PRIMARY_INDEX)?;
                let outcome = dashboard::update(dashboard, game_id, &game);
                debug!(game = %game_id, ?outcome, "dashboard updated");
                Ok(())
            }
        }
    }
}

fn game_mut(states: &mut [State], index: usize) -> Result<&mut Game, EngineError> {
    let got = states[index].tag();
    match &mut states[index] {
        State::Game(game) => Ok(game),
        _ => Err(StateError::WrongAccountState {
            index,
            expected: StateTag::Game,
            got,
        }
        .into()),
    }
}

fn game_ref(states: &[State], index: usize) -> Result<&Game, EngineError> {
    match &states[index] {
        State::Game(game) => Ok(game),
        other => Err(StateError::WrongAccountState {
            index,
            expected: StateTag::Game,
            got: other.tag(),
        }
        .into()),
    }
}

fn dashboard_mut(states: &mut [State], index: usize) -> Result<&mut Dashboard, EngineError> {
    let got = states[index].tag();
    match &mut states[index] {
        State::Dashboard(dashboard) => Ok(dashboard),
        _ => Err(StateError::WrongAccountState {
            index,
            expected: StateTag::Dashboard,
            got,
        }
        .into()),
    }
}
