//! Dashboard record stored in the dashboard account's state payload.
//!
//! Binary layout (201 bytes):
//! `[total_games:u64 LE] [pending_game:32] [completed_games:5x32]
//!  [latest_completed_index:u8]`
//!
//! `completed_games` is a fixed-capacity ring: the cursor advances modulo the
//! capacity and the oldest entry is overwritten once the ring wraps. The fold
//! rules live in the execution crate.

use crate::AccountId;
use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};

/// Capacity of the completed-game ring.
pub const COMPLETED_GAME_SLOTS: usize = 5;

/// Aggregated view of pending and completed games.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dashboard {
    /// Total number of completed games ever observed.
    pub total_games: u64,
    /// Most recently advertised game still waiting for players.
    pub pending_game: AccountId,
    /// Last [`COMPLETED_GAME_SLOTS`] completed games.
    pub completed_games: [AccountId; COMPLETED_GAME_SLOTS],
    /// Ring slot of the most recently recorded completed game.
    pub latest_completed_index: u8,
}

impl Write for Dashboard {
    fn write(&self, writer: &mut impl BufMut) {
        writer.put_u64_le(self.total_games);
        self.pending_game.write(writer);
        for game in &self.completed_games {
            game.write(writer);
        }
        writer.put_u8(self.latest_completed_index);
    }
}

impl Read for Dashboard {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < Self::SIZE {
            return Err(Error::EndOfBuffer);
        }
        let total_games = reader.get_u64_le();
        let pending_game = AccountId::read(reader)?;
        let mut completed_games = [AccountId::default(); COMPLETED_GAME_SLOTS];
        for game in &mut completed_games {
            *game = AccountId::read(reader)?;
        }
        let latest_completed_index = reader.get_u8();
        if usize::from(latest_completed_index) >= COMPLETED_GAME_SLOTS {
            return Err(Error::Invalid("Dashboard", "cursor out of range"));
        }
        Ok(Self {
            total_games,
            pending_game,
            completed_games,
            latest_completed_index,
        })
    }
}

impl FixedSize for Dashboard {
    const SIZE: usize = 8 + (1 + COMPLETED_GAME_SLOTS) * AccountId::SIZE + 1;
}
