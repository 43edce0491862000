// Player-specific valuation overrides.
//
// Draft-day projection adjustments and correlated-pick rules are read from
// strategy.toml (`[[overrides]]`) rather than hard-coded, so the valuation
// engine itself stays a pure function of the pool and roster state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::draft::pick::{PlayerId, PlayerRecord};
use crate::draft::roster::Roster;

/// Hook consulted by the valuation engine for every pool player.
pub trait ValueOverride {
    /// Replacement for the player's projected points, applied before the
    /// position modifiers.
    fn projection(&self, _player: &PlayerRecord) -> Option<f64> {
        None
    }

    /// Final value forced regardless of the position modifiers.
    fn forced_value(&self, _player: &PlayerRecord, _roster: &Roster) -> Option<f64> {
        None
    }
}

/// No overrides at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl ValueOverride for NoOverrides {}

/// A single configured override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum OverrideRule {
    /// Use `value` as the player's projected points.
    Projection { player_id: PlayerId, value: f64 },
    /// Once `trigger` is on the roster and the roster is in `round`, force
    /// the player's value to `value`. Models drafting a handcuff or stack
    /// partner right after its anchor.
    PairedPick {
        player_id: PlayerId,
        trigger: PlayerId,
        round: u32,
        value: f64,
    },
}

impl OverrideRule {
    pub fn player_id(&self) -> PlayerId {
        match self {
            OverrideRule::Projection { player_id, .. } => *player_id,
            OverrideRule::PairedPick { player_id, .. } => *player_id,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            OverrideRule::Projection { value, .. } => *value,
            OverrideRule::PairedPick { value, .. } => *value,
        }
    }
}

/// Configured overrides keyed by player id. When several rules of the same
/// kind target one player, the one listed last wins.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: HashMap<PlayerId, Vec<OverrideRule>>,
}

impl OverrideTable {
    pub fn new(rules: &[OverrideRule]) -> Self {
        let mut table: HashMap<PlayerId, Vec<OverrideRule>> = HashMap::new();
        for rule in rules {
            table.entry(rule.player_id()).or_default().push(rule.clone());
        }
        OverrideTable { rules: table }
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn rules_for(&self, player_id: PlayerId) -> &[OverrideRule] {
        self.rules.get(&player_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl ValueOverride for OverrideTable {
    fn projection(&self, player: &PlayerRecord) -> Option<f64> {
        self.rules_for(player.player_id)
            .iter()
            .rev()
            .find_map(|rule| match rule {
                OverrideRule::Projection { value, .. } => Some(*value),
                _ => None,
            })
    }

    fn forced_value(&self, player: &PlayerRecord, roster: &Roster) -> Option<f64> {
        self.rules_for(player.player_id)
            .iter()
            .rev()
            .find_map(|rule| match rule {
                OverrideRule::PairedPick {
                    trigger,
                    round,
                    value,
                    ..
                } if roster.round() == *round && roster.has_player(*trigger) => Some(*value),
                _ => None,
            })
    }
}
