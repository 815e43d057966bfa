//! Difficulty table
//!
//! Fixed per-level timing and scoring constants.

use serde::{Deserialize, Serialize};

/// Difficulty level selected before a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Timing and scoring for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyConfig {
    /// How long a target stays live (ms)
    pub target_duration_ms: u64,
    /// Time between spawn ticks (ms)
    pub spawn_interval_ms: u64,
    /// Base points for one hit
    pub score_per_hit: u32,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub fn config(&self) -> DifficultyConfig {
        match self {
            Level::Easy => DifficultyConfig {
                target_duration_ms: 2500,
                spawn_interval_ms: 1500,
                score_per_hit: 10,
            },
            Level::Medium => DifficultyConfig {
                target_duration_ms: 1500,
                spawn_interval_ms: 1000,
                score_per_hit: 20,
            },
            Level::Hard => DifficultyConfig {
                target_duration_ms: 1000,
                spawn_interval_ms: 700,
                score_per_hit: 30,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Level::Easy),
            "medium" | "med" => Some(Level::Medium),
            "hard" => Some(Level::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_table() {
        let easy = Level::Easy.config();
        assert_eq!(
            (easy.target_duration_ms, easy.spawn_interval_ms, easy.score_per_hit),
            (2500, 1500, 10)
        );
        let medium = Level::Medium.config();
        assert_eq!(
            (medium.target_duration_ms, medium.spawn_interval_ms, medium.score_per_hit),
            (1500, 1000, 20)
        );
        let hard = Level::Hard.config();
        assert_eq!(
            (hard.target_duration_ms, hard.spawn_interval_ms, hard.score_per_hit),
            (1000, 700, 30)
        );
    }

    #[test]
    fn test_level_names() {
        for level in Level::ALL {
            assert_eq!(Level::from_str(level.as_str()), Some(level));
        }
        assert_eq!(Level::from_str(" MED "), Some(Level::Medium));
        assert_eq!(Level::from_str("nightmare"), None);
        assert_eq!(
            serde_json::to_string(&Level::Hard).unwrap(),
            "\"hard\""
        );
    }
}
