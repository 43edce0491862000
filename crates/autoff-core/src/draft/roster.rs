// Roster construction and slot assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::DraftError;
use super::pick::{DraftedPlayer, PlayerId, PlayerRecord, Position, Slot};
use super::pool::PlayerPool;

// ---------------------------------------------------------------------------
// Slot schedule
// ---------------------------------------------------------------------------

/// Maximum capacity per roster slot. Fixed for the whole draft; slots that
/// were never configured have capacity 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotSchedule {
    capacities: HashMap<Slot, usize>,
}

impl SlotSchedule {
    pub fn new(capacities: HashMap<Slot, usize>) -> Self {
        SlotSchedule { capacities }
    }

    /// Build a schedule from league roster settings, e.g.
    /// `{"QB": 1, "RB": 2, "WR": 2, "TE": 1, "W/R/T": 1, "K": 1, "DEF": 1, "BN": 6, "IR": 1}`.
    ///
    /// A generic `BN` count is split in two: `BN/WR` gets the floor of half,
    /// `BN/RB` gets the rest. `IR` does not take part in the draft and is
    /// dropped. Explicit `BN/RB` and `BN/WR` keys add to the split.
    pub fn from_league_positions(positions: &HashMap<String, usize>) -> Result<Self, DraftError> {
        let mut capacities: HashMap<Slot, usize> = HashMap::new();

        for (key, &count) in positions {
            match key.trim().to_uppercase().as_str() {
                "BN" | "BE" => {
                    let wr_share = count / 2;
                    *capacities.entry(Slot::BenchWideReceiver).or_default() += wr_share;
                    *capacities.entry(Slot::BenchRunningBack).or_default() += count - wr_share;
                }
                "IR" | "IL" => {}
                other => {
                    let slot = Slot::from_key(other)
                        .ok_or_else(|| DraftError::UnknownSlot(key.clone()))?;
                    *capacities.entry(slot).or_default() += count;
                }
            }
        }

        Ok(SlotSchedule { capacities })
    }

    pub fn capacity(&self, slot: Slot) -> usize {
        self.capacities.get(&slot).copied().unwrap_or(0)
    }

    /// Total number of roster spots across all slots.
    pub fn total(&self) -> usize {
        self.capacities.values().sum()
    }
}

// ---------------------------------------------------------------------------
// Slot occupancy
// ---------------------------------------------------------------------------

/// Current fill count per slot. Only ever incremented, and never above the
/// schedule's capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotOccupancy {
    filled: HashMap<Slot, usize>,
}

impl SlotOccupancy {
    /// All-zero occupancy over the schedule's slots.
    pub fn empty(schedule: &SlotSchedule) -> Self {
        SlotOccupancy {
            filled: schedule.capacities.keys().map(|&s| (s, 0)).collect(),
        }
    }

    /// Occupancy with the given counts, unchecked against any schedule.
    #[cfg(test)]
    pub(crate) fn from_counts(filled: HashMap<Slot, usize>) -> Self {
        SlotOccupancy { filled }
    }

    pub fn filled(&self, slot: Slot) -> usize {
        self.filled.get(&slot).copied().unwrap_or(0)
    }

    /// Whether `slot` has remaining capacity under `schedule`.
    pub fn is_open(&self, slot: Slot, schedule: &SlotSchedule) -> bool {
        self.filled(slot) < schedule.capacity(slot)
    }

    fn increment(&mut self, slot: Slot) {
        *self.filled.entry(slot).or_default() += 1;
    }
}

/// Choose the slot a player of `position` should fill.
///
/// Priority:
/// 1. Dedicated position slot
/// 2. W/R/T flex (RB, WR, TE)
/// 3. BN/RB (RB)
/// 4. BN/WR (WR, TE)
pub fn slot_for_position(
    position: Position,
    occupancy: &SlotOccupancy,
    schedule: &SlotSchedule,
) -> Option<Slot> {
    let primary = position.primary_slot();
    if occupancy.is_open(primary, schedule) {
        return Some(primary);
    }

    if position.is_flex_eligible() && occupancy.is_open(Slot::Flex, schedule) {
        return Some(Slot::Flex);
    }

    match position {
        Position::RunningBack if occupancy.is_open(Slot::BenchRunningBack, schedule) => {
            Some(Slot::BenchRunningBack)
        }
        Position::WideReceiver | Position::TightEnd
            if occupancy.is_open(Slot::BenchWideReceiver, schedule) =>
        {
            Some(Slot::BenchWideReceiver)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// The user's roster during a draft, together with the pool it drafts from.
#[derive(Debug, Clone)]
pub struct Roster {
    pool: PlayerPool,
    schedule: SlotSchedule,
    occupancy: SlotOccupancy,
    drafted: Vec<DraftedPlayer>,
    round: u32,
}

impl Roster {
    pub fn new(pool: PlayerPool, schedule: SlotSchedule) -> Self {
        let occupancy = SlotOccupancy::empty(&schedule);
        Roster {
            pool,
            schedule,
            occupancy,
            drafted: Vec::new(),
            round: 1,
        }
    }

    /// The slot `player` would fill right now, if any.
    pub fn slot_for(&self, player: &PlayerRecord) -> Option<Slot> {
        slot_for_position(player.position, &self.occupancy, &self.schedule)
    }

    /// Whether a pool player could be placed right now.
    pub fn can_place(&self, player_id: PlayerId) -> Result<bool, DraftError> {
        let player = self
            .pool
            .get(player_id)
            .ok_or(DraftError::UnknownPlayer(player_id))?;
        Ok(self.slot_for(player).is_some())
    }

    /// Draft a pool player onto the roster.
    ///
    /// Returns the filled slot, or `Ok(None)` without touching any state when
    /// no slot fits the player.
    pub fn place(&mut self, player_id: PlayerId) -> Result<Option<Slot>, DraftError> {
        let player = self
            .pool
            .get(player_id)
            .ok_or(DraftError::UnknownPlayer(player_id))?;

        let Some(slot) = self.slot_for(player) else {
            debug!("no open slot for {} ({})", player.name, player.position);
            return Ok(None);
        };

        let record = self
            .pool
            .remove(player_id)
            .ok_or(DraftError::UnknownPlayer(player_id))?;
        self.occupancy.increment(slot);
        self.drafted.push(DraftedPlayer {
            record,
            slot,
            round: self.round,
        });
        self.round += 1;

        Ok(Some(slot))
    }

    /// Remove a player from the pool without drafting them (taken elsewhere
    /// or otherwise unavailable).
    pub fn discard(&mut self, player_id: PlayerId) -> Result<PlayerRecord, DraftError> {
        self.pool
            .remove(player_id)
            .ok_or(DraftError::UnknownPlayer(player_id))
    }

    /// Whether every slot is filled to capacity.
    pub fn is_full(&self) -> bool {
        Slot::ALL
            .iter()
            .all(|&slot| !self.occupancy.is_open(slot, &self.schedule))
    }

    /// Count of roster spots still open across all slots.
    pub fn open_slots(&self) -> usize {
        Slot::ALL
            .iter()
            .map(|&slot| {
                self.schedule
                    .capacity(slot)
                    .saturating_sub(self.occupancy.filled(slot))
            })
            .sum()
    }

    /// The current round (1-indexed). Advances after every placement.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Drafted players in draft order.
    pub fn drafted(&self) -> &[DraftedPlayer] {
        &self.drafted
    }

    /// Whether a player has been drafted onto this roster.
    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.drafted.iter().any(|d| d.record.player_id == player_id)
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }

    pub fn occupancy(&self) -> &SlotOccupancy {
        &self.occupancy
    }
}
