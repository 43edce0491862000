// The diminishing pool of undrafted players.

use std::collections::HashMap;

use super::error::DraftError;
use super::pick::{PlayerId, PlayerRecord};

/// All undrafted players, kept in load order. Load order is the tie-break
/// order for equal valuations, so removal preserves the order of the rest.
///
/// Removal leaves a tombstone in `slots`; `index` maps each live id to its
/// slot so lookups and removals are O(1). Tombstones are compacted away once
/// they outnumber live players.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    slots: Vec<Option<PlayerRecord>>,
    index: HashMap<PlayerId, usize>,
}

impl PlayerPool {
    /// Build a pool from loaded records. Fails on a repeated `player_id`.
    pub fn new(players: Vec<PlayerRecord>) -> Result<Self, DraftError> {
        let mut index = HashMap::with_capacity(players.len());
        for (i, p) in players.iter().enumerate() {
            if index.insert(p.player_id, i).is_some() {
                return Err(DraftError::DuplicatePlayer(p.player_id));
            }
        }
        Ok(PlayerPool {
            slots: players.into_iter().map(Some).collect(),
            index,
        })
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&PlayerRecord> {
        let &i = self.index.get(&player_id)?;
        self.slots[i].as_ref()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.index.contains_key(&player_id)
    }

    /// Remove a player, returning its record if it was present.
    pub fn remove(&mut self, player_id: PlayerId) -> Option<PlayerRecord> {
        let i = self.index.remove(&player_id)?;
        let record = self.slots[i].take();
        if self.slots.len() > 2 * self.index.len() + 16 {
            self.compact();
        }
        record
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(p) = slot {
                self.index.insert(p.player_id, i);
            }
        }
    }

    /// Iterate over the remaining players in load order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.slots.iter().flatten()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.iter().map(|p| p.player_id).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::Position;

    fn sample() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new(1, "Alpha", Position::RunningBack, 180.0),
            PlayerRecord::new(2, "Bravo", Position::WideReceiver, 175.0),
            PlayerRecord::new(3, "Charlie", Position::TightEnd, 130.0),
        ]
    }

    #[test]
    fn new_pool_keeps_load_order() {
        let pool = PlayerPool::new(sample()).unwrap();
        assert_eq!(pool.ids(), vec![1, 2, 3]);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut players = sample();
        players.push(PlayerRecord::new(2, "Bravo Again", Position::WideReceiver, 1.0));
        assert_eq!(
            PlayerPool::new(players).unwrap_err(),
            DraftError::DuplicatePlayer(2)
        );
    }

    #[test]
    fn remove_preserves_order_of_rest() {
        let mut pool = PlayerPool::new(sample()).unwrap();
        let removed = pool.remove(2).unwrap();
        assert_eq!(removed.name, "Bravo");
        assert_eq!(pool.ids(), vec![1, 3]);
        assert!(!pool.contains(2));
    }

    #[test]
    fn remove_missing_is_none() {
        let mut pool = PlayerPool::new(sample()).unwrap();
        assert!(pool.remove(42).is_none());
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn empty_pool() {
        let pool = PlayerPool::new(vec![]).unwrap();
        assert!(pool.is_empty());
        assert!(pool.get(1).is_none());
    }

    #[test]
    fn lookups_survive_compaction() {
        let players: Vec<PlayerRecord> = (0..1_000u32)
            .map(|id| PlayerRecord::new(id, &format!("Player {id}"), Position::WideReceiver, 100.0))
            .collect();
        let mut pool = PlayerPool::new(players).unwrap();

        // Drop every id below 900 except multiples of 7, forcing several compactions.
        for id in (0..900u32).filter(|id| id % 7 != 0) {
            assert_eq!(pool.remove(id).unwrap().player_id, id);
        }

        let expected: Vec<PlayerId> = (0..1_000u32).filter(|id| id % 7 == 0 || *id >= 900).collect();
        assert_eq!(pool.ids(), expected);
        assert_eq!(pool.len(), expected.len());
        for &id in &expected {
            assert_eq!(pool.get(id).unwrap().player_id, id);
        }
        assert!(pool.get(1).is_none());
        assert!(pool.remove(1).is_none());
    }
}
