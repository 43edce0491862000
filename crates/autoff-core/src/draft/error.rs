// Error taxonomy for the draft core.

use thiserror::Error;

use super::pick::PlayerId;

/// Faults raised by the pool, roster and autodraft loop.
///
/// A candidate with no open slot is not an error: `Roster::place` reports it
/// as `Ok(None)` and the autodraft loop moves on to the next candidate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    /// The referenced player is not (or no longer) in the draftable pool.
    #[error("player {0} is not in the draft pool")]
    UnknownPlayer(PlayerId),

    #[error("duplicate player id {0} in player pool")]
    DuplicatePlayer(PlayerId),

    #[error("unknown roster slot `{0}`")]
    UnknownSlot(String),

    #[error("roster is already full")]
    RosterFull,

    /// No remaining player fits any open slot. The slot schedule cannot be
    /// satisfied from the available positions.
    #[error("player pool exhausted with {open} roster slots still open")]
    PoolExhausted { open: usize },
}
