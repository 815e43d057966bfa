//! Reaction Rush - click the targets before they vanish
//!
//! Core modules:
//! - `sim`: Deterministic session engine (targets, scoring, timers, state machine)
//! - `highscores`: Top-10 leaderboard and its storage
//! - `settings`: Persisted preferences
//! - `audio`: Sound cues for the host to synthesize
//! - `autoplay`: Demo bot

pub mod audio;
pub mod autoplay;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, SoundEffect, SoundSystem};
pub use error::{GameError, Result};
pub use highscores::{JsonFileStore, Leaderboard, LeaderboardEntry, LeaderboardStore, MemoryStore};
pub use settings::Settings;
pub use sim::{GameSession, Level, SessionStatus};

/// Game configuration constants
pub mod consts {
    /// Session length (seconds)
    pub const SESSION_LENGTH_SECS: u32 = 60;
    /// Countdown warning kicks in at this many seconds left
    pub const LOW_TIME_SECS: u32 = 10;
    /// Countdown tick period (ms)
    pub const COUNTDOWN_PERIOD_MS: u64 = 1000;

    /// Targets are squares of this size
    pub const TARGET_SIZE: f32 = 60.0;

    /// Points lost when a target expires
    pub const MISS_PENALTY: u64 = 5;
    /// Points lost for clicking empty board
    pub const MISCLICK_PENALTY: u64 = 3;
    /// Every this many consecutive hits raises the multiplier
    pub const COMBO_STEP: u32 = 3;
}
