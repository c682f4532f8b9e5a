//! Instruction command codec.
//!
//! Binary layout: `[discriminant:u32 LE] [payload...]`
//!
//! | discriminant | command         | payload           |
//! |--------------|-----------------|-------------------|
//! | 0            | InitDashboard   | (none)            |
//! | 1            | InitPlayer      | (none)            |
//! | 2            | InitGame        | (none)            |
//! | 3            | Join            | (none)            |
//! | 4            | Move            | `[x:u8] [y:u8]`   |
//! | 5            | KeepAlive       | (none)            |
//! | 6            | UpdateDashboard | (none)            |
//!
//! Bytes past the decoded payload are ignored so callers may submit
//! fixed-size zero-padded instruction buffers. No timestamp is carried in any
//! command; all timing comes from the host-supplied tick.

use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, Write};

/// A decoded engine command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Initialize a dashboard account.
    InitDashboard,
    /// Validate and fund a player account.
    InitPlayer,
    /// Initialize a game account, binding player X.
    InitGame,
    /// Player O joins a waiting game.
    Join,
    /// Mark board position (x, y) for the player on turn.
    Move { x: u8, y: u8 },
    /// Refresh the acting player's keep-alive tick.
    KeepAlive,
    /// Fold a game's status into the dashboard.
    UpdateDashboard,
}

impl Command {
    /// Decode a command from a raw instruction buffer, ignoring any trailing
    /// bytes.
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let mut reader = data;
        Self::read_cfg(&mut reader, &())
    }
}

impl Write for Command {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Command::InitDashboard => writer.put_u32_le(0),
            Command::InitPlayer => writer.put_u32_le(1),
            Command::InitGame => writer.put_u32_le(2),
            Command::Join => writer.put_u32_le(3),
            Command::Move { x, y } => {
                writer.put_u32_le(4);
                writer.put_u8(*x);
                writer.put_u8(*y);
            }
            Command::KeepAlive => writer.put_u32_le(5),
            Command::UpdateDashboard => writer.put_u32_le(6),
        }
    }
}

impl Read for Command {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < 4 {
            return Err(Error::EndOfBuffer);
        }
        match reader.get_u32_le() {
            0 => Ok(Command::InitDashboard),
            1 => Ok(Command::InitPlayer),
            2 => Ok(Command::InitGame),
            3 => Ok(Command::Join),
            4 => {
                if reader.remaining() < 2 {
                    return Err(Error::EndOfBuffer);
                }
                let x = reader.get_u8();
                let y = reader.get_u8();
                Ok(Command::Move { x, y })
            }
            5 => Ok(Command::KeepAlive),
            6 => Ok(Command::UpdateDashboard),
            _ => Err(Error::Invalid("Command", "unknown discriminant")),
        }
    }
}

impl EncodeSize for Command {
    fn encode_size(&self) -> usize {
        4 + match self {
            Command::Move { .. } => 2,
            _ => 0,
        }
    }
}
