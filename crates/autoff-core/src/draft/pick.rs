// Player identity, positions and roster slot kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform player identifier. Unique within a pool.
pub type PlayerId = u32;

/// Football positions a player can be listed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
}

impl Position {
    /// Parse a position abbreviation ("QB", "RB", "WR", "TE", "K", "DEF").
    ///
    /// Case-insensitive. "D/ST" and "DST" are accepted for defenses.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }

    /// The dedicated starter slot for this position.
    pub fn primary_slot(&self) -> Slot {
        match self {
            Position::Quarterback => Slot::Quarterback,
            Position::RunningBack => Slot::RunningBack,
            Position::WideReceiver => Slot::WideReceiver,
            Position::TightEnd => Slot::TightEnd,
            Position::Kicker => Slot::Kicker,
            Position::Defense => Slot::Defense,
        }
    }

    /// Whether this position may fill the W/R/T flex slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A roster slot kind. Bench capacity is split between running backs
/// (`BN/RB`) and receivers/tight ends (`BN/WR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Flex,
    BenchRunningBack,
    BenchWideReceiver,
    Kicker,
    Defense,
}

impl Slot {
    /// Every slot kind, in roster display order.
    pub const ALL: [Slot; 9] = [
        Slot::Quarterback,
        Slot::RunningBack,
        Slot::WideReceiver,
        Slot::TightEnd,
        Slot::Flex,
        Slot::BenchRunningBack,
        Slot::BenchWideReceiver,
        Slot::Kicker,
        Slot::Defense,
    ];

    /// Parse a slot key as used in league settings ("QB", "W/R/T", "BN/RB", ...).
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Slot::Quarterback),
            "RB" => Some(Slot::RunningBack),
            "WR" => Some(Slot::WideReceiver),
            "TE" => Some(Slot::TightEnd),
            "W/R/T" | "FLEX" => Some(Slot::Flex),
            "BN/RB" => Some(Slot::BenchRunningBack),
            "BN/WR" => Some(Slot::BenchWideReceiver),
            "K" => Some(Slot::Kicker),
            "DEF" => Some(Slot::Defense),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Slot::Quarterback => "QB",
            Slot::RunningBack => "RB",
            Slot::WideReceiver => "WR",
            Slot::TightEnd => "TE",
            Slot::Flex => "W/R/T",
            Slot::BenchRunningBack => "BN/RB",
            Slot::BenchWideReceiver => "BN/WR",
            Slot::Kicker => "K",
            Slot::Defense => "DEF",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A draftable player as loaded from the projection source. Never mutated
/// after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Projected season fantasy points.
    pub projected_value: f64,
}

impl PlayerRecord {
    pub fn new(player_id: PlayerId, name: &str, position: Position, projected_value: f64) -> Self {
        PlayerRecord {
            player_id,
            name: name.to_string(),
            position,
            projected_value,
        }
    }
}

/// A player placed on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftedPlayer {
    pub record: PlayerRecord,
    pub slot: Slot,
    /// Round in which the player was placed (1-indexed).
    pub round: u32,
}
