use std::path::Path;

use crate::error::ConfigError;
use crate::game::grid::RUN_LENGTH;

/// Board setup: dimensions, starting allotment and any disabled cells.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
    pub pieces_per_side: u32,
    /// Cells disabled at setup, as `[x, y]` pairs.
    pub disabled: Vec<[usize; 2]>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: 7,
            height: 6,
            pieces_per_side: 21,
            disabled: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Search depth in plies.
    pub depth: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig { depth: 6 }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub ai: AiConfig,
}

const MAX_CELLS: usize = 4096;
const MAX_DEPTH: usize = 12;

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
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;
        if board.width < RUN_LENGTH || board.height < RUN_LENGTH {
            return Err(ConfigError::Validation(format!(
                "board must be at least {RUN_LENGTH}x{RUN_LENGTH}"
            )));
        }
        if board.width * board.height > MAX_CELLS {
            return Err(ConfigError::Validation(format!(
                "board.width * board.height must be <= {MAX_CELLS}"
            )));
        }
        if board.pieces_per_side == 0 {
            return Err(ConfigError::Validation(
                "board.pieces_per_side must be > 0".into(),
            ));
        }
        if let Some([x, y]) = board
            .disabled
            .iter()
            .find(|[x, y]| *x >= board.width || *y >= board.height)
        {
            return Err(ConfigError::Validation(format!(
                "board.disabled cell [{x}, {y}] is off the board"
            )));
        }
        if self.ai.depth == 0 || self.ai.depth > MAX_DEPTH {
            return Err(ConfigError::Validation(format!(
                "ai.depth must be in [1, {MAX_DEPTH}]"
            )));
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
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.board.width, 7);
        assert_eq!(config.board.height, 6);
        assert_eq!(config.board.pieces_per_side, 21);
        assert_eq!(config.ai.depth, 6);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[ai]
depth = 4
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ai.depth, 4);
        assert_eq!(config.board, BoardConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_disabled_cells_parse() {
        let toml_str = r#"
[board]
disabled = [[0, 0], [6, 0]]
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.board.disabled, vec![[0, 0], [6, 0]]);
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_small_board() {
        let mut config = AppConfig::default();
        config.board.height = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_huge_board() {
        let mut config = AppConfig::default();
        config.board.width = 100;
        config.board.height = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_pieces() {
        let mut config = AppConfig::default();
        config.board.pieces_per_side = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_offboard_disabled_cell() {
        let mut config = AppConfig::default();
        config.board.disabled = vec![[7, 0]];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_depth() {
        let mut config = AppConfig::default();
        config.ai.depth = 0;
        assert!(config.validate().is_err());
        config.ai.depth = 13;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[board]
width = 8
height = 8
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.board.width, 8);
        assert_eq!(config.board.height, 8);
        // Others are defaults
        assert_eq!(config.board.pieces_per_side, 21);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[ai]\ndepth = 0\n").unwrap();
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
        assert_eq!(config, AppConfig::default());
    }
}
