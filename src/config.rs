use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::engine::{ScoreRule, MIN_RUN_LENGTH};
use crate::error::ConfigError;
use crate::session::Budget;

/// Settings for a game session, loadable from TOML.
///
/// A time limit, when present, takes precedence over the move limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub move_limit: Option<u32>,
    pub time_limit_secs: Option<u64>,
    /// Fixed RNG seed for reproducible games. Drawn from entropy when absent.
    pub seed: Option<u64>,
    pub score_rule: ScoreRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 8,
            columns: 8,
            move_limit: Some(100),
            time_limit_secs: None,
            seed: None,
            score_rule: ScoreRule::Linear,
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < MIN_RUN_LENGTH || self.columns < MIN_RUN_LENGTH {
            return Err(ConfigError::Validation(format!(
                "board must be at least {MIN_RUN_LENGTH}x{MIN_RUN_LENGTH} (got {}x{})",
                self.rows, self.columns
            )));
        }
        if self.move_limit == Some(0) {
            return Err(ConfigError::Validation("move_limit must be > 0".into()));
        }
        if self.time_limit_secs == Some(0) {
            return Err(ConfigError::Validation("time_limit_secs must be > 0".into()));
        }
        Ok(())
    }

    /// The budget a new session starts with.
    pub fn budget(&self) -> Budget {
        match (self.time_limit_secs, self.move_limit) {
            (Some(secs), _) => Budget::time(Duration::from_secs(secs)),
            (None, Some(moves)) => Budget::Moves(moves),
            (None, None) => Budget::Unlimited,
        }
    }

    /// A TOML string with all default values, for seeding a config file.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        GameConfig::default()
            .validate()
            .expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GameConfig = toml::from_str("rows = 5\nseed = 9\n").unwrap();
        assert_eq!(config.rows, 5);
        assert_eq!(config.columns, 8);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.move_limit, Some(100));
        assert_eq!(config.score_rule, ScoreRule::Linear);
    }

    #[test]
    fn test_score_rule_from_toml() {
        let toml_str = r#"
[score_rule]
kind = "long_run_bonus"
bonus = 5
"#;
        let config: GameConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.score_rule, ScoreRule::LongRunBonus { bonus: 5 });
    }

    #[test]
    fn test_validation_rejects_small_board() {
        let config = GameConfig {
            columns: 2,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_budgets() {
        let no_moves = GameConfig {
            move_limit: Some(0),
            ..GameConfig::default()
        };
        assert!(no_moves.validate().is_err());

        let no_time = GameConfig {
            time_limit_secs: Some(0),
            ..GameConfig::default()
        };
        assert!(no_time.validate().is_err());
    }

    #[test]
    fn test_budget_selection() {
        assert_eq!(GameConfig::default().budget(), Budget::Moves(100));

        let unlimited = GameConfig {
            move_limit: None,
            ..GameConfig::default()
        };
        assert_eq!(unlimited.budget(), Budget::Unlimited);

        let timed = GameConfig {
            time_limit_secs: Some(60),
            ..GameConfig::default()
        };
        assert!(matches!(timed.budget(), Budget::Time { limit, .. } if limit == Duration::from_secs(60)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = GameConfig::load_or_default(Path::new("nonexistent_candy_config.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "rows = 6\ncolumns = 7\nmove_limit = 20").unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!((config.rows, config.columns), (6, 7));
        assert_eq!(config.move_limit, Some(20));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "rows = 1\n").unwrap();
        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Validation(_))));

        std::fs::write(&path, "rows = [").unwrap();
        assert!(matches!(GameConfig::load(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = GameConfig::default_toml().unwrap();
        let config: GameConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
