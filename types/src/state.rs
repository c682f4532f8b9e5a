//! Tagged account-state codec.
//!
//! Binary layout: `[tag:u32 LE] [payload...]`, where the tag selects the
//! payload type:
//!
//! | tag | variant       | payload                  |
//! |-----|---------------|--------------------------|
//! | 0   | Uninitialized | (none)                   |
//! | 1   | Dashboard     | [`Dashboard`] (201 bytes)|
//! | 2   | Game          | [`Game`] (93 bytes)      |
//!
//! Buffers are sized for the largest variant ([`STATE_LEN`] bytes) and the
//! tail beyond the active payload is kept zero, so the same account buffer
//! can hold either payload for its whole lifetime. [`State::load`] and
//! [`State::store`] are the only boundary through which the engine touches an
//! account buffer; both reject buffers shorter than [`STATE_LEN`] before any
//! payload access.
//!
//! The codec is a pure layout transform: tag transition rules (a tag is
//! written once, only over `Uninitialized`) are enforced by the dispatcher.

use crate::{Dashboard, Game};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use std::fmt;
use thiserror::Error as ThisError;

/// Length in bytes of the state tag.
pub const STATE_TAG_LEN: usize = 4;

/// Required length of every engine-owned account buffer: tag plus the
/// largest payload variant.
pub const STATE_LEN: usize = STATE_TAG_LEN + Dashboard::SIZE;

/// Failure to move state across the buffer boundary.
#[derive(Debug, ThisError)]
pub enum StateCodecError {
    #[error("buffer too short (len {len}, need {need})")]
    BufferTooShort { len: usize, need: usize },
    #[error(transparent)]
    Malformed(#[from] Error),
}

/// The tag identifying what an account buffer holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateTag {
    Uninitialized,
    Dashboard,
    Game,
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateTag::Uninitialized => f.write_str("uninitialized"),
            StateTag::Dashboard => f.write_str("dashboard"),
            StateTag::Game => f.write_str("game"),
        }
    }
}

/// Decoded contents of an account buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum State {
    Uninitialized,
    Dashboard(Dashboard),
    Game(Game),
}

impl State {
    pub fn tag(&self) -> StateTag {
        match self {
            State::Uninitialized => StateTag::Uninitialized,
            State::Dashboard(_) => StateTag::Dashboard,
            State::Game(_) => StateTag::Game,
        }
    }

    /// Decode the state held in `data`.
    ///
    /// Rejects buffers shorter than [`STATE_LEN`] before reading anything, so
    /// every accepted account can later hold either payload variant.
    pub fn load(data: &[u8]) -> Result<Self, StateCodecError> {
        if data.len() < STATE_LEN {
            return Err(StateCodecError::BufferTooShort {
                len: data.len(),
                need: STATE_LEN,
            });
        }
        let mut reader = data;
        Ok(Self::read_cfg(&mut reader, &())?)
    }

    /// Encode the state into the first [`STATE_LEN`] bytes of `data`,
    /// zeroing the union tail beyond the active payload.
    pub fn store(&self, data: &mut [u8]) -> Result<(), StateCodecError> {
        if data.len() < STATE_LEN {
            return Err(StateCodecError::BufferTooShort {
                len: data.len(),
                need: STATE_LEN,
            });
        }
        let mut framed = [0u8; STATE_LEN];
        let mut writer = &mut framed[..];
        self.write(&mut writer);
        data[..STATE_LEN].copy_from_slice(&framed);
        Ok(())
    }
}

impl Write for State {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            State::Uninitialized => writer.put_u32_le(0),
            State::Dashboard(dashboard) => {
                writer.put_u32_le(1);
                dashboard.write(writer);
            }
            State::Game(game) => {
                writer.put_u32_le(2);
                game.write(writer);
            }
        }
    }
}

impl Read for State {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < STATE_TAG_LEN {
            return Err(Error::EndOfBuffer);
        }
        match reader.get_u32_le() {
            0 => Ok(State::Uninitialized),
            1 => Ok(State::Dashboard(Dashboard::read(reader)?)),
            2 => Ok(State::Game(Game::read(reader)?)),
            _ => Err(Error::Invalid("State", "unknown tag")),
        }
    }
}

impl EncodeSize for State {
    fn encode_size(&self) -> usize {
        STATE_TAG_LEN
            + match self {
                State::Uninitialized => 0,
                State::Dashboard(dashboard) => dashboard.encode_size(),
                State::Game(game) => game.encode_size(),
            }
    }
}
