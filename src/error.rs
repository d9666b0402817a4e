//! Error types for the knowledge base and game configuration.

use crate::sentence::Sentence;
use crate::types::Cell;

/// Errors raised when an observation or derivation would corrupt the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KnowledgeError {
    #[error("cell {cell} is outside the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("cell {cell} reports {count} nearby mines but has only {neighbors} neighbors")]
    CountTooLarge {
        cell: Cell,
        count: usize,
        neighbors: usize,
    },

    #[error("sentence claims {count} mines among {cells} cells")]
    InvalidSentence { cells: usize, count: usize },

    #[error("cell {cell} would be both a mine and safe")]
    Contradiction { cell: Cell },

    #[error("inconsistent observation, derived count out of range for {sentence}")]
    Inconsistent { sentence: String },
}

impl KnowledgeError {
    pub(crate) fn inconsistent(sentence: &Sentence) -> Self {
        KnowledgeError::Inconsistent {
            sentence: sentence.to_string(),
        }
    }
}

/// Errors that can occur when validating a game configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_display() {
        let err = KnowledgeError::OutOfBounds {
            cell: Cell::new(8, 0),
            height: 8,
            width: 8,
        };
        assert_eq!(err.to_string(), "cell (8, 0) is outside the 8x8 board");
    }

    #[test]
    fn test_count_too_large_display() {
        let err = KnowledgeError::CountTooLarge {
            cell: Cell::new(0, 0),
            count: 4,
            neighbors: 3,
        };
        assert_eq!(
            err.to_string(),
            "cell (0, 0) reports 4 nearby mines but has only 3 neighbors"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("mines must be < height * width".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: mines must be < height * width"
        );
    }
}
