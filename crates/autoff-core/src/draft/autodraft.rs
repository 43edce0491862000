// Greedy best-available autodraft.

use tracing::{debug, info};

use super::error::DraftError;
use super::pick::{PlayerId, Slot};
use super::roster::Roster;
use crate::valuation::{RankedPlayer, ValuationEngine};

/// Draft exactly one player onto `roster`.
///
/// Ranks the pool, then tries candidates in rank order until one is placed.
/// A rejected candidate stays in the pool; it is only skipped for this call.
///
/// Errors with `RosterFull` when there is nothing left to fill, and with
/// `PoolExhausted` when no remaining player fits any open slot.
pub fn autodraft(roster: &mut Roster, engine: &ValuationEngine) -> Result<PlayerId, DraftError> {
    if roster.is_full() {
        return Err(DraftError::RosterFull);
    }

    let ranked = engine.rank(roster);
    for candidate in &ranked {
        match place_ranked(roster, candidate)? {
            Some(_) => return Ok(candidate.player_id),
            None => {
                debug!(
                    "player {} ({}) has no open slot, trying next",
                    candidate.player_id, candidate.position
                );
            }
        }
    }

    Err(DraftError::PoolExhausted {
        open: roster.open_slots(),
    })
}

/// Place a ranked candidate and log the pick.
pub(crate) fn place_ranked(
    roster: &mut Roster,
    candidate: &RankedPlayer,
) -> Result<Option<Slot>, DraftError> {
    let slot = roster.place(candidate.player_id)?;
    if let (Some(slot), Some(drafted)) = (slot, roster.drafted().last()) {
        info!(
            "Round {}: drafted {} ({}) into {} at value {:.2}",
            drafted.round, drafted.record.name, drafted.record.position, slot, candidate.value
        );
    }
    Ok(slot)
}
