// autoff entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file)
// 2. Load config
// 3. Open database, pick the draft id to resume or start
// 4. Load the player pool
// 5. Build the roster and valuation engine
// 6. Crash recovery, then keepers
// 7. Run the draft against the mock room, or fill the roster straight
//    from the pool with --offline
// 8. Print the final roster

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};

use autoff_core::config;
use autoff_core::db::Database;
use autoff_core::draft::roster::Roster;
use autoff_core::mock::MockLeague;
use autoff_core::session::{DraftSession, SessionSummary};
use autoff_core::valuation::overrides::OverrideTable;
use autoff_core::valuation::projections::load_player_pool;
use autoff_core::valuation::ValuationEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let fresh = args.iter().any(|a| a == "--fresh");
    let offline = args.iter().any(|a| a == "--offline");

    // 1. Initialize tracing
    let log_path = init_tracing()?;
    info!("autoff starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, drafting from seat {}",
        config.league.name, config.league.num_teams, config.league.draft_position
    );

    // 3. Open database
    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);
    if fresh {
        db.clear_draft().context("failed to clear previous draft")?;
        info!("--fresh: previous draft history cleared");
    }
    let draft_id = db.resume_or_new_draft_id()?;
    info!("Draft id: {}", draft_id);

    // 4. Load the player pool
    let pool = load_player_pool(&PathBuf::from(&config.data_paths.players))
        .context("failed to load player pool")?;

    // 5. Build the roster and valuation engine
    let schedule = config.league.slot_schedule()?;
    let rounds = schedule.total();
    let roster = Roster::new(pool, schedule);
    let overrides = OverrideTable::new(&config.strategy.overrides);
    info!("{} valuation overrides configured", overrides.len());
    let engine = ValuationEngine::new(overrides);

    let mut session = DraftSession::new(roster, engine, draft_id.clone())
        .with_database(db)
        .with_poll_interval(Duration::from_secs(config.strategy.poll_interval_secs));

    // 6. Crash recovery, then keepers
    match session.restore() {
        Ok(true) => info!("Draft state restored from previous session"),
        Ok(false) => info!("Starting fresh draft session"),
        Err(e) => {
            error!("Crash recovery failed: {}", e);
            return Err(e.context("crash recovery failed"));
        }
    }
    let keepers = session
        .place_keepers(&config.strategy.keepers)
        .context("failed to place keepers")?;
    if keepers > 0 {
        info!("{} keepers placed", keepers);
    }

    // 7. Run the draft
    let summary = if offline {
        session.autodraft_remaining().map(|picks| SessionSummary {
            picks,
            roster_full: true,
            ..SessionSummary::default()
        })
    } else {
        let mut room = MockLeague::from_pool(
            session.roster().pool(),
            config.league.num_teams,
            config.league.draft_position,
            rounds,
        );
        session.run(&mut room).await
    };
    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            error!("Draft failed: {:#}", e);
            return Err(e.context("draft failed"));
        }
    };
    info!(
        "Draft finished: {} picks, {} players discarded, roster full: {}",
        summary.picks.len(),
        summary.discards,
        summary.roster_full
    );
    if let Some(db) = session.database() {
        db.mark_draft_finished(&draft_id)?;
    }

    // 8. Print the final roster
    println!("{} ({})", config.league.name, draft_id);
    for drafted in session.roster().drafted() {
        println!(
            "{:>3}  {:<6} {:<4} {:<24} {:>7.1}",
            drafted.round,
            drafted.slot.key(),
            drafted.record.position.display_str(),
            drafted.record.name,
            drafted.record.projected_value
        );
    }
    if !summary.roster_full {
        println!("{} roster slots left open", session.roster().open_slots());
    }
    println!("Log: {}", log_path.display());

    Ok(())
}

/// Initialize tracing to log to a file. Logs go under the platform data
/// directory when one is available, else `./logs`.
fn init_tracing() -> anyhow::Result<PathBuf> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = match directories::ProjectDirs::from("", "", "autoff") {
        Some(dirs) => dirs.data_local_dir().join("logs"),
        None => std::env::current_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join("autoff.log");
    let log_file = std::fs::File::create(&log_path)?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autoff_core=info,autoff=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(log_path)
}
