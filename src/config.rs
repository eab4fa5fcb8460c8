use std::path::Path;

use rand::Rng;
use tracing::warn;

use crate::error::ConfigError;
use crate::game::Piece;
use crate::mcts::LIVE_ITERATIONS;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub game: GameConfig,
}

/// Search settings for the computer opponent.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// MCTS iterations per AI move. Higher is stronger but slower.
    pub iterations: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            iterations: LIVE_ITERATIONS,
        }
    }
}

/// Who opens a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstTurn {
    #[default]
    Random,
    Player,
    Ai,
}

impl FirstTurn {
    /// Resolve to a concrete piece, flipping a coin for `Random`.
    pub fn resolve<R: Rng>(self, rng: &mut R) -> Piece {
        match self {
            FirstTurn::Player => Piece::Player,
            FirstTurn::Ai => Piece::Ai,
            FirstTurn::Random => {
                if rng.random_bool(0.5) {
                    Piece::Player
                } else {
                    Piece::Ai
                }
            }
        }
    }
}

impl std::str::FromStr for FirstTurn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(FirstTurn::Random),
            "player" => Ok(FirstTurn::Player),
            "ai" => Ok(FirstTurn::Ai),
            other => Err(format!(
                "unknown first turn '{other}' (expected 'random', 'player' or 'ai')"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub first_turn: FirstTurn,
    /// Fixed seed for the AI's random source. Unset means OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
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
        if self.ai.iterations == 0 {
            return Err(ConfigError::Validation(
                "ai.iterations must be > 0".into(),
            ));
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
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.ai.iterations, 800);
        assert_eq!(config.game.first_turn, FirstTurn::Random);
        assert_eq!(config.game.seed, None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[game]
first_turn = "ai"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.first_turn, FirstTurn::Ai);
        assert_eq!(config.ai.iterations, 800);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.ai.iterations, AiConfig::default().iterations);
        assert_eq!(config.game.first_turn, FirstTurn::Random);
    }

    #[test]
    fn test_unknown_first_turn_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[game]\nfirst_turn = \"nobody\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_iterations() {
        let mut config = AppConfig::default();
        config.ai.iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.ai.iterations, 800);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connect_four.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[ai]
iterations = 2500

[game]
seed = 7
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.ai.iterations, 2500);
        assert_eq!(config.game.seed, Some(7));
        assert_eq!(config.game.first_turn, FirstTurn::Random);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[ai]\niterations = 0\n").unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }

    #[test]
    fn test_first_turn_resolve() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(FirstTurn::Player.resolve(&mut rng), Piece::Player);
        assert_eq!(FirstTurn::Ai.resolve(&mut rng), Piece::Ai);

        let picks: Vec<Piece> = (0..64).map(|_| FirstTurn::Random.resolve(&mut rng)).collect();
        assert!(picks.contains(&Piece::Player));
        assert!(picks.contains(&Piece::Ai));
    }

    #[test]
    fn test_first_turn_from_str() {
        assert_eq!("AI".parse::<FirstTurn>(), Ok(FirstTurn::Ai));
        assert_eq!("player".parse::<FirstTurn>(), Ok(FirstTurn::Player));
        assert!("both".parse::<FirstTurn>().is_err());
    }
}
