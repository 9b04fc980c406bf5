use std::path::{Path, PathBuf};

use tracing::warn;

use crate::ai::{AdaptiveConfig, HeuristicWeights, MctsConfig, MinimaxConfig};
use crate::error::ConfigError;

/// Opponent the adaptive agent trains and evaluates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    Random,
    Minimax,
    Mcts,
}

/// Settings for training runs driven by the `train` binary.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Training games to play.
    pub games: usize,
    /// Training games between learning-curve points.
    pub eval_every: usize,
    /// Frozen evaluation games per learning-curve point.
    pub eval_games: usize,
    pub opponent: OpponentKind,
    pub seed: u64,
    /// Directory holding saved tables.
    pub table_dir: PathBuf,
    pub table_name: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            games: 200,
            eval_every: 20,
            eval_games: 10,
            opponent: OpponentKind::Random,
            seed: 42,
            table_dir: PathBuf::from("tables"),
            table_name: "adaptive".to_string(),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub minimax: MinimaxConfig,
    pub mcts: MctsConfig,
    pub adaptive: AdaptiveConfig,
    pub heuristic: HeuristicWeights,
    pub arena: ArenaConfig,
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation(message.into())
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimax.search_depth == 0 {
            return Err(invalid("minimax.search_depth must be >= 1"));
        }
        if self.mcts.simulations == 0 {
            return Err(invalid("mcts.simulations must be >= 1"));
        }
        if self.mcts.exploration < 0.0 {
            return Err(invalid("mcts.exploration must be >= 0"));
        }

        let a = &self.adaptive;
        if a.alpha <= 0.0 || a.alpha > 1.0 {
            return Err(invalid("adaptive.alpha must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&a.gamma) {
            return Err(invalid("adaptive.gamma must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&a.epsilon_initial) {
            return Err(invalid("adaptive.epsilon_initial must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&a.epsilon_final) {
            return Err(invalid("adaptive.epsilon_final must be in [0, 1]"));
        }
        if a.epsilon_final > a.epsilon_initial {
            return Err(invalid(
                "adaptive.epsilon_final must be <= adaptive.epsilon_initial",
            ));
        }
        if a.epsilon_decay <= 0.0 || a.epsilon_decay > 1.0 {
            return Err(invalid("adaptive.epsilon_decay must be in (0, 1]"));
        }
        if !(a.thresholds[0] < a.thresholds[1] && a.thresholds[1] < a.thresholds[2]) {
            return Err(invalid("adaptive.thresholds must be strictly increasing"));
        }
        if a.simulations == 0 {
            return Err(invalid("adaptive.simulations must be >= 1"));
        }
        if a.exploration < 0.0 {
            return Err(invalid("adaptive.exploration must be >= 0"));
        }
        if a.reward <= 0.0 {
            return Err(invalid("adaptive.reward must be > 0"));
        }
        if a.init_range < 0.0 {
            return Err(invalid("adaptive.init_range must be >= 0"));
        }

        if self.heuristic.defense < 1.0 {
            return Err(invalid("heuristic.defense must be >= 1"));
        }

        if self.arena.eval_every == 0 {
            return Err(invalid("arena.eval_every must be >= 1"));
        }
        if self.arena.table_name.is_empty() {
            return Err(invalid("arena.table_name must not be empty"));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Level, RolloutPolicy};
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[adaptive]
alpha = 0.5
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.adaptive.alpha - 0.5).abs() < 1e-9);
        // Other fields should be defaults
        assert!((config.adaptive.epsilon_decay - 0.995).abs() < 1e-9);
        assert_eq!(config.adaptive.thresholds, [20, 40, 80]);
        assert_eq!(config.minimax.search_depth, 4);
    }

    #[test]
    fn test_enums_parse_from_toml() {
        let toml_str = r#"
[mcts]
rollout = "random"

[adaptive]
fallback_level = 3

[arena]
opponent = "minimax"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mcts.rollout, RolloutPolicy::Random);
        assert_eq!(config.adaptive.fallback_level, Level::Search);
        assert_eq!(config.arena.opponent, OpponentKind::Minimax);
    }

    #[test]
    fn test_out_of_range_level_is_parse_error() {
        let toml_str = "[adaptive]\nfallback_level = 9\n";
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = AppConfig::default();
        config.minimax.search_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_simulations() {
        let mut config = AppConfig::default();
        config.mcts.simulations = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.adaptive.simulations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_exploration() {
        let mut config = AppConfig::default();
        config.mcts.exploration = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_alpha_out_of_range() {
        let mut config = AppConfig::default();
        config.adaptive.alpha = 0.0;
        assert!(config.validate().is_err());
        config.adaptive.alpha = 1.5;
        assert!(config.validate().is_err());
        config.adaptive.alpha = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_invalid_gamma() {
        let mut config = AppConfig::default();
        config.adaptive.gamma = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_epsilon_final_gt_initial() {
        let mut config = AppConfig::default();
        config.adaptive.epsilon_initial = 0.1;
        config.adaptive.epsilon_final = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_epsilon_out_of_range() {
        let mut config = AppConfig::default();
        config.adaptive.epsilon_initial = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.adaptive.epsilon_final = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_decay() {
        let mut config = AppConfig::default();
        config.adaptive.epsilon_decay = 0.0;
        assert!(config.validate().is_err());
        config.adaptive.epsilon_decay = 1.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unordered_thresholds() {
        let mut config = AppConfig::default();
        config.adaptive.thresholds = [20, 20, 80];
        assert!(config.validate().is_err());
        config.adaptive.thresholds = [40, 20, 80];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_weak_defense() {
        let mut config = AppConfig::default();
        config.heuristic.defense = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_eval_every() {
        let mut config = AppConfig::default();
        config.arena.eval_every = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.arena.games, 200);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[minimax]
search_depth = 2

[arena]
games = 500
table_dir = "out/tables"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.minimax.search_depth, 2);
        assert_eq!(config.arena.games, 500);
        assert_eq!(config.arena.table_dir, PathBuf::from("out/tables"));
        // Others are defaults
        assert_eq!(config.mcts.simulations, 500);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[adaptive]\ngamma = 2.0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = AppConfig::load(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config.adaptive.fallback_level, Level::Block);
    }
}
