// The draft-room capability the session drives.
//
// Implementations own everything platform-specific (page navigation,
// element lookup, clicking the draft button). The session only sees
// player ids and turn signals.

use async_trait::async_trait;

use crate::draft::pick::PlayerId;

/// What the draft room says about the current pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSignal {
    /// Another team is on the clock.
    Waiting,
    /// The user is on the clock.
    MyTurn,
    /// The draft is over.
    Complete,
}

#[async_trait]
pub trait DraftDriver: Send {
    /// Ids of every player still available in the draft room.
    async fn get_candidate_pool(&mut self) -> anyhow::Result<Vec<PlayerId>>;

    async fn report_turn_signal(&mut self) -> anyhow::Result<TurnSignal>;

    /// Submit a pick. `Ok(false)` means the room rejected it (the player was
    /// taken or is otherwise unavailable).
    async fn confirm_pick(&mut self, player_id: PlayerId) -> anyhow::Result<bool>;
}
