//! Game state machine: create, join, move, keep-alive.
//!
//! Transitions operate on a decoded [`Game`] and never touch buffers; the
//! engine commits the record back only after the whole invocation succeeds.
//! Every transition validates before mutating, so a returned error implies an
//! unchanged record.

use matchgrid_types::{AccountId, Cell, Game, GameState, Tick, BOARD_CELLS};
use thiserror::Error;

/// All 8 winning lines: 3 rows, 3 columns, 2 diagonals.
const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A rejected game transition.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("game is not waiting for a second player")]
    GameNotWaiting,
    #[error("cell ({x}, {y}) is out of range or already occupied")]
    InvalidCell { x: u8, y: u8 },
    #[error("no move is accepted in the current game phase")]
    NotYourTurn,
    #[error("it is the other player's turn")]
    WrongPlayer,
    #[error("game has already finished")]
    GameFinished,
    #[error("player is not part of this game")]
    UnknownPlayer,
    #[error("tick {tick} does not advance past the recorded keep-alive {last}")]
    StaleClock { tick: Tick, last: Tick },
}

/// Create a fresh game with `player_x` bound and their keep-alive recorded.
///
/// Infallible: the caller guarantees a freshly zeroed record.
pub fn create(player_x: AccountId, tick: Tick) -> Game {
    Game {
        keep_alive: [tick, 0],
        player_x,
        ..Game::default()
    }
}

/// Bind `player_o` to a waiting game and hand the first move to X.
pub fn join(game: &mut Game, player_o: AccountId, tick: Tick) -> Result<(), GameError> {
    if game.state != GameState::Waiting {
        return Err(GameError::GameNotWaiting);
    }
    if tick <= game.keep_alive[1] {
        return Err(GameError::StaleClock {
            tick,
            last: game.keep_alive[1],
        });
    }
    game.player_o = player_o;
    game.keep_alive[1] = tick;
    game.state = GameState::XMove;
    Ok(())
}

/// Mark cell `(x, y)` for the player on turn, then resolve win or draw.
pub fn next_move(game: &mut Game, player: AccountId, x: u8, y: u8) -> Result<(), GameError> {
    let index = usize::from(y) * 3 + usize::from(x);
    if index >= BOARD_CELLS || game.board[index] != Cell::Free {
        return Err(GameError::InvalidCell { x, y });
    }

    let (mark, won_state) = match game.state {
        GameState::XMove => {
            if player != game.player_x {
                return Err(GameError::WrongPlayer);
            }
            (Cell::X, GameState::XWon)
        }
        GameState::OMove => {
            if player != game.player_o {
                return Err(GameError::WrongPlayer);
            }
            (Cell::O, GameState::OWon)
        }
        _ => return Err(GameError::NotYourTurn),
    };

    game.board[index] = mark;
    game.state = match game.state {
        GameState::XMove => GameState::OMove,
        _ => GameState::XMove,
    };

    let won = WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&cell| game.board[cell] == mark));
    if won {
        game.state = won_state;
    } else if game.board.iter().all(|&cell| cell != Cell::Free) {
        game.state = GameState::Draw;
    }
    Ok(())
}

/// Record a strictly newer keep-alive tick for `player`'s slot.
pub fn keep_alive(game: &mut Game, player: AccountId, tick: Tick) -> Result<(), GameError> {
    if game.state.is_terminal() {
        return Err(GameError::GameFinished);
    }
    let slot = game.player_slot(&player).ok_or(GameError::UnknownPlayer)?;
    if tick <= game.keep_alive[slot] {
        return Err(GameError::StaleClock {
            tick,
            last: game.keep_alive[slot],
        });
    }
    game.keep_alive[slot] = tick;
    Ok(())
}
