// Player pool loading from projection CSVs.
//
// Expected columns: player_id, name, position, projected_value. Yahoo-style
// export headers ("Player ID", "Name", "Position", "Projection" or
// "Fantasy Pts") are accepted as aliases. Extra columns are ignored.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::draft::error::DraftError;
use crate::draft::pick::{PlayerRecord, Position};
use crate::draft::pool::PlayerPool;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pool(#[from] DraftError),
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    #[serde(alias = "Player ID", alias = "id")]
    player_id: u32,
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Position", alias = "pos")]
    position: String,
    #[serde(alias = "Projection", alias = "Fantasy Pts", alias = "projection")]
    projected_value: f64,
    /// Absorb any extra columns.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => {
                let name = raw.name.trim();
                if !raw.projected_value.is_finite() || raw.projected_value < 0.0 {
                    warn!("skipping player '{}': invalid projection {}", name, raw.projected_value);
                    continue;
                }
                let Some(position) = Position::from_str_pos(&raw.position) else {
                    warn!("skipping player '{}': unknown position '{}'", name, raw.position);
                    continue;
                };
                players.push(PlayerRecord::new(raw.player_id, name, position, raw.projected_value));
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Load player records from a CSV file, in file order.
pub fn load_player_records(path: &Path) -> Result<Vec<PlayerRecord>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|e| ProjectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file).map_err(|e| ProjectionError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the draftable pool from a CSV file.
pub fn load_player_pool(path: &Path) -> Result<PlayerPool, ProjectionError> {
    let records = load_player_records(path)?;
    if records.is_empty() {
        return Err(ProjectionError::Validation(format!(
            "{} produced zero valid player rows",
            path.display()
        )));
    }
    let pool = PlayerPool::new(records)?;
    info!("Loaded {} players from {}", pool.len(), path.display());
    Ok(pool)
}
