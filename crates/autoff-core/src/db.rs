// SQLite pick log for crash recovery.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::draft::pick::{DraftedPlayer, PlayerId};

/// A pick as stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPick {
    pub round: u32,
    pub player_id: PlayerId,
    pub player_name: String,
    pub position: String,
    pub slot: String,
}

impl From<&DraftedPlayer> for RecordedPick {
    fn from(drafted: &DraftedPlayer) -> Self {
        RecordedPick {
            round: drafted.round,
            player_id: drafted.record.player_id,
            player_name: drafted.record.name.clone(),
            position: drafted.record.position.display_str().to_string(),
            slot: drafted.slot.key().to_string(),
        }
    }
}

/// SQLite-backed persistence for the user's picks, discarded players, and
/// key-value draft state.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_picks (
                draft_id    TEXT NOT NULL,
                round       INTEGER NOT NULL,
                player_id   INTEGER NOT NULL,
                player_name TEXT NOT NULL,
                position    TEXT NOT NULL,
                slot        TEXT NOT NULL,
                timestamp   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (round, draft_id)
            );

            CREATE TABLE IF NOT EXISTS draft_discards (
                draft_id  TEXT NOT NULL,
                player_id INTEGER NOT NULL,
                timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (player_id, draft_id)
            );

            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_draft_picks_draft_id ON draft_picks(draft_id);
            CREATE INDEX IF NOT EXISTS idx_draft_discards_draft_id ON draft_discards(draft_id);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Record one of the user's picks. Re-recording the same round is a no-op.
    pub fn record_pick(&self, drafted: &DraftedPlayer, draft_id: &str) -> Result<()> {
        let pick = RecordedPick::from(drafted);
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO draft_picks
                (draft_id, round, player_id, player_name, position, slot)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft_id,
                pick.round,
                pick.player_id,
                pick.player_name,
                pick.position,
                pick.slot,
            ],
        )
        .context("failed to record draft pick")?;
        Ok(())
    }

    /// Load the user's picks for one draft, in round order.
    pub fn load_picks(&self, draft_id: &str) -> Result<Vec<RecordedPick>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT round, player_id, player_name, position, slot
                 FROM draft_picks WHERE draft_id = ?1 ORDER BY round",
            )
            .context("failed to prepare load_picks query")?;

        let picks = stmt
            .query_map(params![draft_id], |row| {
                Ok(RecordedPick {
                    round: row.get(0)?,
                    player_id: row.get(1)?,
                    player_name: row.get(2)?,
                    position: row.get(3)?,
                    slot: row.get(4)?,
                })
            })
            .context("failed to query draft picks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map draft pick rows")?;

        Ok(picks)
    }

    /// Record a player removed from the pool without being drafted by us.
    pub fn record_discard(&self, player_id: PlayerId, draft_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO draft_discards (draft_id, player_id) VALUES (?1, ?2)",
            params![draft_id, player_id],
        )
        .context("failed to record discard")?;
        Ok(())
    }

    /// Load discarded player ids for one draft, in the order recorded.
    pub fn load_discards(&self, draft_id: &str) -> Result<Vec<PlayerId>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT player_id FROM draft_discards WHERE draft_id = ?1 ORDER BY rowid")
            .context("failed to prepare load_discards query")?;

        let ids = stmt
            .query_map(params![draft_id], |row| row.get(0))
            .context("failed to query discards")?
            .collect::<std::result::Result<Vec<PlayerId>, _>>()
            .context("failed to map discard rows")?;

        Ok(ids)
    }

    /// Returns `true` if anything has been recorded for the given draft.
    pub fn has_draft_in_progress(&self, draft_id: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM draft_picks WHERE draft_id = ?1)
                     OR EXISTS(SELECT 1 FROM draft_discards WHERE draft_id = ?1)",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to check draft progress")?;
        Ok(exists)
    }

    /// Persist an arbitrary JSON value under `key`. Repeated saves overwrite
    /// the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM draft_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query draft state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete every recorded pick, discard and state entry.
    pub fn clear_draft(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM draft_picks", [])
            .context("failed to delete draft picks")?;
        tx.execute("DELETE FROM draft_discards", [])
            .context("failed to delete discards")?;
        tx.execute("DELETE FROM draft_state", [])
            .context("failed to delete draft state")?;
        tx.commit().context("failed to commit clear_draft")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Draft ID management
    // ------------------------------------------------------------------

    const DRAFT_ID_KEY: &'static str = "current_draft_id";

    /// The stored draft ID, if one has been set.
    pub fn get_draft_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::DRAFT_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    pub fn set_draft_id(&self, draft_id: &str) -> Result<()> {
        self.save_state(
            Self::DRAFT_ID_KEY,
            &serde_json::Value::String(draft_id.to_string()),
        )
    }

    const FINISHED_DRAFT_KEY: &'static str = "finished_draft_id";

    /// Mark a draft as over so the next start does not resume it.
    pub fn mark_draft_finished(&self, draft_id: &str) -> Result<()> {
        self.save_state(
            Self::FINISHED_DRAFT_KEY,
            &serde_json::Value::String(draft_id.to_string()),
        )
    }

    /// The stored draft ID if that draft is unfinished, otherwise a freshly
    /// generated (and stored) one.
    pub fn resume_or_new_draft_id(&self) -> Result<String> {
        let finished = self
            .load_state(Self::FINISHED_DRAFT_KEY)?
            .and_then(|v| v.as_str().map(|s| s.to_string()));
        if let Some(current) = self.get_draft_id()? {
            if finished.as_deref() != Some(current.as_str()) {
                return Ok(current);
            }
        }
        let draft_id = Self::generate_draft_id();
        self.set_draft_id(&draft_id)?;
        Ok(draft_id)
    }

    /// Generate a new draft ID from the current UTC time.
    ///
    /// Format: `draft_YYYYMMDD_HHMMSS_SSS` (e.g. `draft_20260905_183022_123`).
    pub fn generate_draft_id() -> String {
        let now = chrono::Utc::now();
        now.format("draft_%Y%m%d_%H%M%S_%3f").to_string()
    }
}
