//! Funding policy: keep participant accounts able to originate their next
//! instruction.
//!
//! After a successful state mutation the dispatcher tops up the accounts that
//! will need to submit the next command, one token at a time, sourced from
//! the dashboard account. The source always retains a reserve floor of one
//! token so the dashboard itself stays usable.

use thiserror::Error;
use tracing::debug;

/// Tokens moved per top-up.
pub const TRANSFER_UNIT: u64 = 1;

/// Minimum balance left on the funding source.
pub const RESERVE_FLOOR: u64 = 1;

/// A rejected funding transfer.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("funding source balance {balance} is at or below the reserve floor")]
    InsufficientFunds { balance: u64 },
}

/// Explicit outcome of one funding step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingOutcome {
    /// The destination already holds tokens; nothing moved.
    AlreadyFunded,
    /// One token moved from source to destination.
    Funded,
}

/// Move [`TRANSFER_UNIT`] from `source` to `dest` unless `dest` is already
/// funded. Fails without mutating either balance if `source` would drop below
/// the reserve floor.
pub fn fund(source: &mut u64, dest: &mut u64) -> Result<FundingOutcome, ResourceError> {
    if *dest != 0 {
        return Ok(FundingOutcome::AlreadyFunded);
    }
    if *source <= RESERVE_FLOOR {
        return Err(ResourceError::InsufficientFunds { balance: *source });
    }
    *source -= TRANSFER_UNIT;
    *dest += TRANSFER_UNIT;
    debug!(source = *source, dest = *dest, "funded next move");
    Ok(FundingOutcome::Funded)
}
