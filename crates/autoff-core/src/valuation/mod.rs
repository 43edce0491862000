// Draft valuation: projected points scaled by position modifiers, plus
// configured overrides, ranked across the remaining pool.

pub mod modifiers;
pub mod overrides;
pub mod projections;

use std::cmp::Ordering;

use crate::draft::pick::{PlayerId, PlayerRecord, Position};
use crate::draft::roster::{slot_for_position, Roster, SlotOccupancy, SlotSchedule};
use modifiers::{dynamic_position_modifier, static_position_modifier};
use overrides::{NoOverrides, ValueOverride};

/// Draft value of `player` for a roster in the given occupancy state.
///
/// Pure: `projected_value * static_modifier * dynamic_modifier`.
pub fn compute_value(
    player: &PlayerRecord,
    occupancy: &SlotOccupancy,
    schedule: &SlotSchedule,
) -> f64 {
    scaled_value(player.projected_value, player.position, occupancy, schedule)
}

fn scaled_value(
    base: f64,
    position: Position,
    occupancy: &SlotOccupancy,
    schedule: &SlotSchedule,
) -> f64 {
    base * static_position_modifier(position) * dynamic_position_modifier(position, occupancy, schedule)
}

/// A pool player with its current draft value.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub player_id: PlayerId,
    pub position: Position,
    pub value: f64,
}

/// Ranks the pool for a roster, applying the configured overrides.
pub struct ValuationEngine {
    overrides: Box<dyn ValueOverride + Send + Sync>,
}

impl Default for ValuationEngine {
    fn default() -> Self {
        ValuationEngine::new(NoOverrides)
    }
}

impl std::fmt::Debug for ValuationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuationEngine").finish_non_exhaustive()
    }
}

impl ValuationEngine {
    pub fn new(overrides: impl ValueOverride + Send + Sync + 'static) -> Self {
        ValuationEngine {
            overrides: Box::new(overrides),
        }
    }

    /// Current draft value of one player for `roster`.
    pub fn value_of(&self, player: &PlayerRecord, roster: &Roster) -> f64 {
        if let Some(forced) = self.overrides.forced_value(player, roster) {
            return forced;
        }
        let base = self
            .overrides
            .projection(player)
            .unwrap_or(player.projected_value);
        scaled_value(base, player.position, roster.occupancy(), roster.schedule())
    }

    /// Every pool player, highest value first. Equal values keep pool order.
    pub fn rank(&self, roster: &Roster) -> Vec<RankedPlayer> {
        let mut ranked: Vec<RankedPlayer> = roster
            .pool()
            .iter()
            .map(|p| RankedPlayer {
                player_id: p.player_id,
                position: p.position,
                value: self.value_of(p, roster),
            })
            .collect();

        ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        ranked
    }

    /// The highest-ranked player that currently fits an open slot. Does not
    /// mutate the roster.
    pub fn best_available(&self, roster: &Roster) -> Option<RankedPlayer> {
        self.rank(roster).into_iter().find(|r| {
            slot_for_position(r.position, roster.occupancy(), roster.schedule()).is_some()
        })
    }
}
