// In-process mock draft room.
//
// Opponents always take the highest-projected player left. Useful for
// rehearsing a strategy offline and for exercising the session end to end.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::draft::pick::{PlayerId, PlayerRecord};
use crate::draft::pool::PlayerPool;
use crate::driver::{DraftDriver, TurnSignal};

/// How pick order runs from round to round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftOrder {
    /// Order reverses every round (1..n, n..1, ...).
    #[default]
    Snake,
    /// Same order every round.
    Linear,
}

impl DraftOrder {
    /// 1-indexed seat on the clock for the 0-indexed overall `pick`.
    pub fn seat_for_pick(&self, pick: usize, num_teams: usize) -> usize {
        let round = pick / num_teams;
        let idx = pick % num_teams;
        match self {
            DraftOrder::Snake if round % 2 == 1 => num_teams - idx,
            DraftOrder::Snake | DraftOrder::Linear => idx + 1,
        }
    }
}

/// A pick made in the mock room.
#[derive(Debug, Clone, PartialEq)]
pub struct MockPick {
    /// 1-indexed overall pick number.
    pub pick_number: usize,
    pub seat: usize,
    pub player_id: PlayerId,
}

#[derive(Debug, Clone)]
pub struct MockLeague {
    available: Vec<PlayerRecord>,
    num_teams: usize,
    user_seat: usize,
    rounds: usize,
    order: DraftOrder,
    next_pick: usize,
    log: Vec<MockPick>,
}

impl MockLeague {
    /// `user_seat` is 1-indexed. A zero or out-of-range seat is clamped into
    /// `1..=num_teams`; `num_teams` is at least 1.
    pub fn new(players: Vec<PlayerRecord>, num_teams: usize, user_seat: usize, rounds: usize) -> Self {
        let num_teams = num_teams.max(1);
        MockLeague {
            available: players,
            num_teams,
            user_seat: user_seat.clamp(1, num_teams),
            rounds,
            order: DraftOrder::Snake,
            next_pick: 0,
            log: Vec::new(),
        }
    }

    /// A room holding every player in `pool`.
    pub fn from_pool(pool: &PlayerPool, num_teams: usize, user_seat: usize, rounds: usize) -> Self {
        MockLeague::new(pool.iter().cloned().collect(), num_teams, user_seat, rounds)
    }

    pub fn with_order(mut self, order: DraftOrder) -> Self {
        self.order = order;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.next_pick >= self.num_teams * self.rounds || self.available.is_empty()
    }

    /// Seat on the clock, or `None` once the draft is over.
    pub fn seat_on_clock(&self) -> Option<usize> {
        if self.is_complete() {
            None
        } else {
            Some(self.order.seat_for_pick(self.next_pick, self.num_teams))
        }
    }

    pub fn is_available(&self, player_id: PlayerId) -> bool {
        self.available.iter().any(|p| p.player_id == player_id)
    }

    /// Every pick made so far, in order.
    pub fn draft_log(&self) -> &[MockPick] {
        &self.log
    }

    /// Player ids taken by the user's seat.
    pub fn user_picks(&self) -> Vec<PlayerId> {
        self.log
            .iter()
            .filter(|p| p.seat == self.user_seat)
            .map(|p| p.player_id)
            .collect()
    }

    fn take(&mut self, seat: usize, player_id: PlayerId) -> bool {
        let Some(idx) = self.available.iter().position(|p| p.player_id == player_id) else {
            return false;
        };
        let record = self.available.remove(idx);
        self.next_pick += 1;
        debug!(
            "Mock pick {}: seat {} takes {} ({})",
            self.next_pick, seat, record.name, record.position
        );
        self.log.push(MockPick {
            pick_number: self.next_pick,
            seat,
            player_id,
        });
        true
    }

    /// Highest projection left; the earliest listed wins a tie.
    fn best_projected(&self) -> Option<PlayerId> {
        let mut best: Option<&PlayerRecord> = None;
        for p in &self.available {
            if best.map_or(true, |b| p.projected_value > b.projected_value) {
                best = Some(p);
            }
        }
        best.map(|p| p.player_id)
    }

    /// Let opponents pick until the user is on the clock or the draft ends.
    fn advance_opponents(&mut self) {
        while let Some(seat) = self.seat_on_clock() {
            if seat == self.user_seat {
                return;
            }
            let Some(player_id) = self.best_projected() else {
                return;
            };
            self.take(seat, player_id);
        }
    }
}

#[async_trait]
impl DraftDriver for MockLeague {
    async fn get_candidate_pool(&mut self) -> anyhow::Result<Vec<PlayerId>> {
        Ok(self.available.iter().map(|p| p.player_id).collect())
    }

    async fn report_turn_signal(&mut self) -> anyhow::Result<TurnSignal> {
        self.advance_opponents();
        match self.seat_on_clock() {
            Some(_) => Ok(TurnSignal::MyTurn),
            None => {
                info!("Mock draft complete after {} picks", self.log.len());
                Ok(TurnSignal::Complete)
            }
        }
    }

    async fn confirm_pick(&mut self, player_id: PlayerId) -> anyhow::Result<bool> {
        if self.seat_on_clock() != Some(self.user_seat) {
            warn!("Pick {} submitted while not on the clock", player_id);
            return Ok(false);
        }
        Ok(self.take(self.user_seat, player_id))
    }
}
