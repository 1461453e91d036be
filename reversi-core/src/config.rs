//! AI configuration

use crate::eval::Heuristics;
use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default search depth in plies
pub const DEFAULT_DEPTH: u32 = 4;

/// Deepest search accepted from configuration
pub const MAX_DEPTH: u32 = 8;

/// Below this many discs on the board, moves come from the opening heuristic
pub const OPENING_THRESHOLD: u32 = 20;

/// AI configuration for move selection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Search depth for alpha-beta
    pub depth: u32,
    /// Disc count at which search replaces the opening heuristic
    pub opening_threshold: u32,
    /// Heuristics for evaluation
    pub heuristics: Heuristics,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            opening_threshold: OPENING_THRESHOLD,
            heuristics: Heuristics::default(),
            seed: None,
        }
    }
}

impl AiConfig {
    /// Set search depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set custom heuristics
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Depth within `1..=MAX_DEPTH` and heuristics that cannot overflow
    pub fn validate(&self) -> Result<(), GameError> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(GameError::InvalidDepth(self.depth));
        }
        self.heuristics.validate()
    }

    /// Load from JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AiConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
