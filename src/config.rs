//! Game configuration: board size, mine count and optional seed.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Dimensions;

/// Board setup for a simulated game, deserializable from JS objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    /// Fixed seed for mine placement and guessing; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            height: 8,
            width: 8,
            mines: 8,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.height, self.width)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.height == 0 || self.width == 0 {
            return Err(ConfigError::Validation(
                "height and width must be > 0".into(),
            ));
        }
        if self.mines >= self.height * self.width {
            return Err(ConfigError::Validation(
                "mines must be < height * width".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dimensions(), Dimensions::new(8, 8));
    }

    #[test]
    fn test_rejects_empty_board() {
        let config = GameConfig {
            width: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_board_full_of_mines() {
        let config = GameConfig {
            height: 2,
            width: 2,
            mines: 4,
            seed: None,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Validation("mines must be < height * width".into()))
        );
    }
}
