//! Deterministic session simulation
//!
//! All gameplay logic lives here:
//! - Simulated time only (advanced explicitly by the host)
//! - Seeded RNG only
//! - Stable iteration order (by target ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod difficulty;
pub mod scoring;
pub mod session;
pub mod targets;

pub use clock::{ClockTick, Interval, SessionClock};
pub use difficulty::{DifficultyConfig, Level};
pub use scoring::{HitScore, Penalty, on_hit, on_miss, on_misclick};
pub use session::{
    Click, FinalStats, GameEvent, GameSession, HitOutcome, SessionStatus, Snapshot,
};
pub use targets::{Board, Target, TargetId, TargetLifecycle, TargetState};
