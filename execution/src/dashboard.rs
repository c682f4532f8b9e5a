//! Dashboard aggregator: fold one game's status into the dashboard record.
//!
//! Folding a terminal game is idempotent: the completed-game ring is scanned
//! for the identifier before any mutation, so re-submitting the same finished
//! game never double-counts. This is the engine's only idempotence
//! requirement under re-invocation.

use matchgrid_types::{AccountId, Dashboard, Game, GameState, COMPLETED_GAME_SLOTS};

/// Explicit outcome of one aggregation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardUpdate {
    /// The game is waiting for players and is now the advertised pending game.
    Advertised,
    /// The game is in progress; in-progress games are not tracked.
    Ignored,
    /// The game reached a terminal state and was recorded for the first time.
    Recorded,
    /// The game's terminal state was already recorded; nothing changed.
    AlreadyRecorded,
}

/// Fold `game`'s current status into `dashboard`.
pub fn update(dashboard: &mut Dashboard, game_id: AccountId, game: &Game) -> DashboardUpdate {
    match game.state {
        GameState::Waiting => {
            // Last-advertised-wins; "pending" has no multiplicity.
            dashboard.pending_game = game_id;
            DashboardUpdate::Advertised
        }
        GameState::XMove | GameState::OMove => DashboardUpdate::Ignored,
        GameState::XWon | GameState::OWon | GameState::Draw => {
            if dashboard.completed_games.contains(&game_id) {
                return DashboardUpdate::AlreadyRecorded;
            }
            dashboard.total_games += 1;
            dashboard.latest_completed_index =
                (dashboard.latest_completed_index + 1) % COMPLETED_GAME_SLOTS as u8;
            dashboard.completed_games[usize::from(dashboard.latest_completed_index)] = game_id;
            DashboardUpdate::Recorded
        }
    }
}
