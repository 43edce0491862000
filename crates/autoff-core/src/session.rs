// A single draft run: owns the roster and valuation engine, polls the
// driver for turns, and logs every pick for crash recovery.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::draft::autodraft::{autodraft, place_ranked};
use crate::draft::error::DraftError;
use crate::draft::pick::PlayerId;
use crate::draft::roster::Roster;
use crate::driver::{DraftDriver, TurnSignal};
use crate::valuation::ValuationEngine;

/// Default wait between turn polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Outcome of `DraftSession::run`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Players drafted during this run, in order.
    pub picks: Vec<PlayerId>,
    /// Players removed from the pool because another team took them or the
    /// room rejected them.
    pub discards: usize,
    pub roster_full: bool,
    /// The driver reported the draft over before the roster filled.
    pub draft_complete: bool,
}

pub struct DraftSession {
    roster: Roster,
    engine: ValuationEngine,
    db: Option<Database>,
    draft_id: String,
    poll_interval: Duration,
}

impl DraftSession {
    pub fn new(roster: Roster, engine: ValuationEngine, draft_id: impl Into<String>) -> Self {
        DraftSession {
            roster,
            engine,
            db: None,
            draft_id: draft_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Log picks and discards to `db`, and allow `restore` from it.
    pub fn with_database(mut self, db: Database) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn engine(&self) -> &ValuationEngine {
        &self.engine
    }

    pub fn draft_id(&self) -> &str {
        &self.draft_id
    }

    pub fn database(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    pub fn into_roster(self) -> Roster {
        self.roster
    }

    /// Put keepers on the roster before the first turn. Keepers already on
    /// the roster (from `restore`) are skipped. Returns how many were placed.
    pub fn place_keepers(&mut self, keepers: &[PlayerId]) -> anyhow::Result<usize> {
        let mut placed = 0;
        for &player_id in keepers {
            if self.roster.has_player(player_id) {
                debug!("keeper {} already on roster", player_id);
                continue;
            }
            if !self
                .roster
                .can_place(player_id)
                .with_context(|| format!("keeper {player_id} is not in the player pool"))?
            {
                bail!("no open roster slot for keeper {player_id}");
            }
            if let Some(slot) = self.roster.place(player_id)? {
                info!("Keeper {} placed into {}", player_id, slot);
                self.record_last_pick()?;
                placed += 1;
            }
        }
        Ok(placed)
    }

    /// Replay picks and discards recorded for this draft id.
    ///
    /// Returns `false` when there was nothing to restore (or no database).
    pub fn restore(&mut self) -> anyhow::Result<bool> {
        let Some(db) = &self.db else {
            return Ok(false);
        };
        if !db.has_draft_in_progress(&self.draft_id)? {
            info!("No draft in progress for draft_id={}, starting fresh", self.draft_id);
            return Ok(false);
        }

        let picks = db.load_picks(&self.draft_id)?;
        let discards = db.load_discards(&self.draft_id)?;
        info!(
            "Crash recovery: restoring {} picks and {} discards for draft_id={}",
            picks.len(),
            discards.len(),
            self.draft_id
        );

        for pick in &picks {
            if self.roster.has_player(pick.player_id) {
                continue;
            }
            let slot = self
                .roster
                .place(pick.player_id)
                .with_context(|| format!("recorded pick {} ({}) is not in the player pool", pick.player_id, pick.player_name))?;
            match slot {
                Some(slot) if slot.key() != pick.slot => warn!(
                    "recorded pick {} was in {}, restored into {}",
                    pick.player_name, pick.slot, slot
                ),
                Some(_) => {}
                None => bail!(
                    "no open roster slot to restore recorded pick {} ({})",
                    pick.player_id,
                    pick.player_name
                ),
            }
        }

        for player_id in discards {
            if self.roster.pool().contains(player_id) {
                self.roster.discard(player_id)?;
            }
        }

        info!(
            "Crash recovery complete: round {}, {} players remaining",
            self.roster.round(),
            self.roster.pool().len()
        );
        Ok(true)
    }

    /// Fill every open slot straight from the pool with no draft room, logging
    /// each pick. Returns the drafted ids in order.
    pub fn autodraft_remaining(&mut self) -> anyhow::Result<Vec<PlayerId>> {
        let mut picks = Vec::new();
        while !self.roster.is_full() {
            picks.push(autodraft(&mut self.roster, &self.engine)?);
            self.record_last_pick()?;
        }
        Ok(picks)
    }

    /// Draft until the roster is full or the driver reports the draft over.
    pub async fn run<D>(&mut self, driver: &mut D) -> anyhow::Result<SessionSummary>
    where
        D: DraftDriver + ?Sized,
    {
        let mut summary = SessionSummary::default();

        while !self.roster.is_full() {
            let signal = driver
                .report_turn_signal()
                .await
                .context("failed to read turn signal")?;
            match signal {
                TurnSignal::Waiting => {
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                }
                TurnSignal::Complete => {
                    info!("Draft complete with {} open slots", self.roster.open_slots());
                    summary.draft_complete = true;
                    break;
                }
                TurnSignal::MyTurn => {}
            }

            let candidates: HashSet<PlayerId> = driver
                .get_candidate_pool()
                .await
                .context("failed to read candidate pool")?
                .into_iter()
                .collect();
            summary.discards += self.sync_pool(&candidates)?;

            let player_id = self.take_turn(driver, &mut summary).await?;
            summary.picks.push(player_id);
        }

        summary.roster_full = self.roster.is_full();
        Ok(summary)
    }

    /// Discard every pool player the draft room no longer lists.
    fn sync_pool(&mut self, candidates: &HashSet<PlayerId>) -> anyhow::Result<usize> {
        let gone: Vec<PlayerId> = self
            .roster
            .pool()
            .ids()
            .into_iter()
            .filter(|id| !candidates.contains(id))
            .collect();
        for &player_id in &gone {
            self.discard(player_id)?;
        }
        if !gone.is_empty() {
            debug!("{} players taken since last turn", gone.len());
        }
        Ok(gone.len())
    }

    async fn take_turn<D>(
        &mut self,
        driver: &mut D,
        summary: &mut SessionSummary,
    ) -> anyhow::Result<PlayerId>
    where
        D: DraftDriver + ?Sized,
    {
        loop {
            let Some(best) = self.engine.best_available(&self.roster) else {
                return Err(DraftError::PoolExhausted {
                    open: self.roster.open_slots(),
                }
                .into());
            };

            let confirmed = driver
                .confirm_pick(best.player_id)
                .await
                .with_context(|| format!("failed to submit pick {}", best.player_id))?;
            if !confirmed {
                warn!("Pick {} was not confirmed, discarding", best.player_id);
                self.discard(best.player_id)?;
                summary.discards += 1;
                continue;
            }

            if place_ranked(&mut self.roster, &best)?.is_none() {
                bail!("confirmed pick {} has no open roster slot", best.player_id);
            }
            self.record_last_pick()?;
            return Ok(best.player_id);
        }
    }

    fn discard(&mut self, player_id: PlayerId) -> anyhow::Result<()> {
        self.roster.discard(player_id)?;
        if let Some(db) = &self.db {
            db.record_discard(player_id, &self.draft_id)?;
        }
        Ok(())
    }

    fn record_last_pick(&self) -> anyhow::Result<()> {
        if let (Some(db), Some(drafted)) = (&self.db, self.roster.drafted().last()) {
            db.record_pick(drafted, &self.draft_id)?;
        }
        Ok(())
    }
}
