// Configuration loading and parsing (league.toml, strategy.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::pick::PlayerId;
use crate::draft::roster::SlotSchedule;
use crate::valuation::overrides::OverrideRule;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub db_path: String,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: usize,
    /// The user's 1-indexed seat in the first round of a snake draft.
    pub draft_position: usize,
    /// Roster settings as the platform reports them, e.g. `QB = 1`,
    /// `"W/R/T" = 1`, `BN = 4`, `IR = 1`.
    pub roster: HashMap<String, usize>,
}

impl LeagueConfig {
    /// The slot schedule derived from the roster settings.
    pub fn slot_schedule(&self) -> Result<SlotSchedule, ConfigError> {
        SlotSchedule::from_league_positions(&self.roster).map_err(|e| {
            ConfigError::ValidationError {
                field: "league.roster".into(),
                message: e.to_string(),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    draft: DraftSection,
    database: DatabaseSection,
    data_paths: DataPaths,
    #[serde(default)]
    overrides: Vec<OverrideRule>,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftSection {
    poll_interval_secs: u64,
    #[serde(default)]
    keepers: Vec<PlayerId>,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// Seconds between "is it my turn" polls.
    pub poll_interval_secs: u64,
    /// Players already on the roster before the draft starts.
    pub keepers: Vec<PlayerId>,
    pub overrides: Vec<OverrideRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, relative to the given `base_dir`.
///
/// Does not copy defaults. Prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let league = league_file.league;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let strategy = StrategyConfig {
        poll_interval_secs: strategy_file.draft.poll_interval_secs,
        keepers: strategy_file.draft.keepers,
        overrides: strategy_file.overrides,
    };

    let config = Config {
        league,
        strategy,
        db_path: strategy_file.database.path,
        data_paths: strategy_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Files `load_config_from` reads from `config/`.
pub const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// Copy each of `CONFIG_FILES` missing from `config/` out of `defaults/`.
/// Existing files are left alone so local edits survive. Returns the paths
/// that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let mut copied = Vec::new();
    for file in CONFIG_FILES {
        let target = config_dir.join(file);
        if target.exists() {
            continue;
        }
        let source = defaults_dir.join(file);
        if !source.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "{file} is in neither config/ nor defaults/ under {}",
                    base_dir.display()
                ),
            });
        }

        std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
        std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.num_teams == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: "must be greater than 0".into(),
        });
    }

    if !(1..=league.num_teams).contains(&league.draft_position) {
        return Err(ConfigError::ValidationError {
            field: "league.draft_position".into(),
            message: format!(
                "must be between 1 and {} inclusive, got {}",
                league.num_teams, league.draft_position
            ),
        });
    }

    let schedule = league.slot_schedule()?;
    if schedule.total() == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.roster".into(),
            message: "must contain at least one draftable slot".into(),
        });
    }

    if config.strategy.poll_interval_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.poll_interval_secs".into(),
            message: "must be > 0".into(),
        });
    }

    for (i, rule) in config.strategy.overrides.iter().enumerate() {
        let value = rule.value();
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("overrides[{i}].value"),
                message: format!("must be a finite number >= 0, got {value}"),
            });
        }
        if let OverrideRule::PairedPick { round: 0, .. } = rule {
            return Err(ConfigError::ValidationError {
                field: format!("overrides[{i}].round"),
                message: "rounds start at 1".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::Slot;
    use std::fs;
    use std::path::PathBuf;

    /// Helper: returns the workspace root holding `defaults/` (works whether
    /// `cargo test` runs from the crate directory or the workspace root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with `config/` holding copies of the default files.
    fn temp_with_defaults(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();

        let root = project_root();
        fs::copy(root.join("defaults/league.toml"), config_dir.join("league.toml")).unwrap();
        fs::copy(
            root.join("defaults/strategy.toml"),
            config_dir.join("strategy.toml"),
        )
        .unwrap();
        tmp
    }

    fn rewrite(tmp: &Path, file: &str, from: &str, to: &str) {
        let path = tmp.join("config").join(file);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(from), "{file} should contain `{from}`");
        fs::write(&path, text.replace(from, to)).unwrap();
    }

    fn expect_validation_field(tmp: &Path, expected: &str) {
        let err = load_config_from(tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_default_files() {
        let tmp = temp_with_defaults("autoff_config_defaults");
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.league.num_teams, 8);
        assert_eq!(config.league.draft_position, 3);
        assert_eq!(config.league.roster.get("W/R/T"), Some(&1));

        let schedule = config.league.slot_schedule().unwrap();
        assert_eq!(schedule.capacity(Slot::BenchRunningBack), 2);
        assert_eq!(schedule.capacity(Slot::BenchWideReceiver), 2);
        assert_eq!(schedule.total(), 13);

        assert_eq!(config.strategy.poll_interval_secs, 3);
        assert!(config.strategy.keepers.is_empty());
        assert!(config
            .strategy
            .overrides
            .iter()
            .any(|r| matches!(r, OverrideRule::PairedPick { round: 3, .. })));

        assert_eq!(config.db_path, "autoff.db");
        assert_eq!(config.data_paths.players, "data/players.csv");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_num_teams_zero() {
        let tmp = temp_with_defaults("autoff_config_num_teams_zero");
        rewrite(&tmp, "league.toml", "num_teams = 8", "num_teams = 0");
        expect_validation_field(&tmp, "league.num_teams");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_draft_position_past_last_seat() {
        let tmp = temp_with_defaults("autoff_config_draft_position");
        rewrite(&tmp, "league.toml", "draft_position = 3", "draft_position = 9");
        expect_validation_field(&tmp, "league.draft_position");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_roster_slot() {
        let tmp = temp_with_defaults("autoff_config_unknown_slot");
        rewrite(&tmp, "league.toml", "QB = 1", "QB = 1\nOP = 1");
        expect_validation_field(&tmp, "league.roster");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let tmp = temp_with_defaults("autoff_config_poll_zero");
        rewrite(&tmp, "strategy.toml", "poll_interval_secs = 3", "poll_interval_secs = 0");
        expect_validation_field(&tmp, "draft.poll_interval_secs");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_override_value() {
        let tmp = temp_with_defaults("autoff_config_negative_override");
        rewrite(&tmp, "strategy.toml", "value = 100000.0", "value = -1.0");
        expect_validation_field(&tmp, "overrides[0].value");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_round_zero_paired_pick() {
        let tmp = temp_with_defaults("autoff_config_round_zero");
        rewrite(&tmp, "strategy.toml", "round = 3", "round = 0");
        expect_validation_field(&tmp, "overrides[0].round");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn overrides_section_is_optional() {
        let tmp = std::env::temp_dir().join("autoff_config_no_overrides");
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        fs::copy(
            project_root().join("defaults/league.toml"),
            config_dir.join("league.toml"),
        )
        .unwrap();
        fs::write(
            config_dir.join("strategy.toml"),
            r#"
[draft]
poll_interval_secs = 5

[database]
path = ":memory:"

[data_paths]
players = "players.csv"
"#,
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load without overrides");
        assert!(config.strategy.overrides.is_empty());
        assert!(config.strategy.keepers.is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = temp_with_defaults("autoff_config_missing_league");
        fs::remove_file(tmp.join("config/league.toml")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_with_defaults("autoff_config_invalid_toml");
        fs::write(tmp.join("config/strategy.toml"), "this is not valid [[[ toml").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("strategy.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    /// Temp dir with `defaults/` holding the shipped config files.
    fn temp_with_shipped_defaults(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();

        let root = project_root();
        for file in CONFIG_FILES {
            fs::copy(root.join("defaults").join(file), defaults_dir.join(file)).unwrap();
        }
        tmp
    }

    #[test]
    fn first_run_copies_league_and_strategy() {
        let tmp = temp_with_shipped_defaults("autoff_config_first_run");
        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config/league.toml"), tmp.join("config/strategy.toml")]);

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.league.num_teams, 8);
        assert!(ensure_config_files(&tmp).unwrap().is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn customized_league_is_not_overwritten() {
        let tmp = temp_with_shipped_defaults("autoff_config_custom_league");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&config_dir).unwrap();
        let custom = fs::read_to_string(tmp.join("defaults/league.toml"))
            .unwrap()
            .replace("num_teams = 8", "num_teams = 10");
        fs::write(config_dir.join("league.toml"), &custom).unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![config_dir.join("strategy.toml")]);
        assert_eq!(fs::read_to_string(config_dir.join("league.toml")).unwrap(), custom);
        assert_eq!(load_config_from(&tmp).unwrap().league.num_teams, 10);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_strategy_everywhere_is_an_error() {
        let tmp = temp_with_shipped_defaults("autoff_config_no_strategy");
        fs::remove_file(tmp.join("defaults/strategy.toml")).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.starts_with("strategy.toml is in neither"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
