//! Debt-ratio to rating mapping.

use thiserror::Error;

use livemeasure_types::{ProjectConfig, Rating};

/// Errors from grid construction.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("rating grid needs 4 strictly ascending positive thresholds, got {0:?}")]
    Invalid(Vec<f64>),
}

/// Maps a technical-debt ratio to a Rating via ascending thresholds.
///
/// A ratio at or below the first threshold rates A; above the last, E.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtRatingGrid {
    thresholds: [f64; 4],
}

impl Default for DebtRatingGrid {
    fn default() -> Self {
        Self {
            thresholds: [0.05, 0.1, 0.2, 0.5],
        }
    }
}

impl DebtRatingGrid {
    pub fn new(thresholds: [f64; 4]) -> Result<Self, GridError> {
        let ascending = thresholds.windows(2).all(|w| w[0] < w[1]);
        if !ascending || thresholds[0] <= 0.0 {
            return Err(GridError::Invalid(thresholds.to_vec()));
        }
        Ok(Self { thresholds })
    }

    pub fn from_config(config: &ProjectConfig) -> Result<Self, GridError> {
        let grid: [f64; 4] = config
            .rating_grid
            .as_slice()
            .try_into()
            .map_err(|_| GridError::Invalid(config.rating_grid.clone()))?;
        Self::new(grid)
    }

    #[must_use]
    pub fn rating_for(&self, ratio: f64) -> Rating {
        let [a, b, c, d] = self.thresholds;
        if ratio > d {
            Rating::E
        } else if ratio > c {
            Rating::D
        } else if ratio > b {
            Rating::C
        } else if ratio > a {
            Rating::B
        } else {
            Rating::A
        }
    }
}
