//! Game record stored in a game account's state payload.
//!
//! Binary layout (93 bytes):
//! `[keep_alive_x:u64 LE] [keep_alive_o:u64 LE] [state:u32 LE]
//!  [player_x:32] [player_o:32] [board:9]`
//!
//! Board cells are one byte each (`0` free, `1` X, `2` O), indexed
//! `row * 3 + col`. The transition rules live in the execution crate; this
//! module only defines the record and its codec.

use crate::{AccountId, Tick};
use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};

/// Number of cells on the board.
pub const BOARD_CELLS: usize = 9;

/// Number of keep-alive slots (one per player; X is slot 0, O is slot 1).
pub const PLAYER_SLOTS: usize = 2;

/// One board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Free = 0,
    X = 1,
    O = 2,
}

impl Write for Cell {
    fn write(&self, writer: &mut impl BufMut) {
        writer.put_u8(*self as u8);
    }
}

impl Read for Cell {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < 1 {
            return Err(Error::EndOfBuffer);
        }
        match reader.get_u8() {
            0 => Ok(Cell::Free),
            1 => Ok(Cell::X),
            2 => Ok(Cell::O),
            other => Err(Error::InvalidEnum(other)),
        }
    }
}

impl FixedSize for Cell {
    const SIZE: usize = 1;
}

/// Phase of a game. `XWon`, `OWon`, and `Draw` are terminal: once reached, no
/// further board mutation is accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum GameState {
    #[default]
    Waiting = 0,
    XMove = 1,
    OMove = 2,
    XWon = 3,
    OWon = 4,
    Draw = 5,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::XWon | GameState::OWon | GameState::Draw)
    }
}

impl Write for GameState {
    fn write(&self, writer: &mut impl BufMut) {
        writer.put_u32_le(*self as u32);
    }
}

impl Read for GameState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < 4 {
            return Err(Error::EndOfBuffer);
        }
        match reader.get_u32_le() {
            0 => Ok(GameState::Waiting),
            1 => Ok(GameState::XMove),
            2 => Ok(GameState::OMove),
            3 => Ok(GameState::XWon),
            4 => Ok(GameState::OWon),
            5 => Ok(GameState::Draw),
            _ => Err(Error::Invalid("GameState", "unknown state")),
        }
    }
}

impl FixedSize for GameState {
    const SIZE: usize = 4;
}

/// One two-player game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Game {
    /// Last accepted keep-alive tick per player (X is slot 0, O is slot 1).
    /// Strictly increasing across accepted join and keep-alive operations.
    pub keep_alive: [Tick; PLAYER_SLOTS],
    /// Current phase.
    pub state: GameState,
    /// Player who initialized the game.
    pub player_x: AccountId,
    /// Player who joined, or the all-zero identifier while waiting.
    pub player_o: AccountId,
    /// Board marks, indexed `row * 3 + col`.
    pub board: [Cell; BOARD_CELLS],
}

impl Game {
    /// The keep-alive slot for `player`, if they are part of this game.
    pub fn player_slot(&self, player: &AccountId) -> Option<usize> {
        if *player == self.player_x {
            Some(0)
        } else if !self.player_o.is_unset() && *player == self.player_o {
            Some(1)
        } else {
            None
        }
    }
}

impl Write for Game {
    fn write(&self, writer: &mut impl BufMut) {
        writer.put_u64_le(self.keep_alive[0]);
        writer.put_u64_le(self.keep_alive[1]);
        self.state.write(writer);
        self.player_x.write(writer);
        self.player_o.write(writer);
        for cell in &self.board {
            cell.write(writer);
        }
    }
}

impl Read for Game {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < 16 {
            return Err(Error::EndOfBuffer);
        }
        let keep_alive = [reader.get_u64_le(), reader.get_u64_le()];
        let state = GameState::read(reader)?;
        let player_x = AccountId::read(reader)?;
        let player_o = AccountId::read(reader)?;
        let mut board = [Cell::Free; BOARD_CELLS];
        for cell in &mut board {
            *cell = Cell::read(reader)?;
        }
        Ok(Self {
            keep_alive,
            state,
            player_x,
            player_o,
            board,
        })
    }
}

impl FixedSize for Game {
    const SIZE: usize =
        2 * 8 + GameState::SIZE + 2 * AccountId::SIZE + BOARD_CELLS * Cell::SIZE;
}
