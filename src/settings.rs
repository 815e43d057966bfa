//! Game settings and preferences
//!
//! Persisted as JSON, separately from the leaderboard.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{Board, Level};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preselected on the start screen
    pub level: Level,

    // === Board ===
    pub board_width: f32,
    pub board_height: f32,

    // === Audio ===
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    /// Where the leaderboard JSON lives
    pub leaderboard_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let board = Board::default();
        Self {
            level: Level::Easy,

            board_width: board.width,
            board_height: board.height,

            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,

            leaderboard_path: PathBuf::from("reaction_rush_scores.json"),
        }
    }
}

impl Settings {
    pub fn board(&self) -> Board {
        Board::new(self.board_width.max(0.0), self.board_height.max(0.0))
    }

    /// Clamp out-of-range values read from disk
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.board_width = self.board_width.max(0.0);
        self.board_height = self.board_height.max(0.0);
        self
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<Settings>(&bytes) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings.sanitized();
                }
                Err(err) => log::warn!("Ignoring corrupt settings {}: {}", path.display(), err),
            },
            Err(_) => log::info!("Using default settings"),
        }
        Self::default()
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
