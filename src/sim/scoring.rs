//! Combo scoring
//!
//! Pure functions: given the current combo/score, compute the next values.
//! The session applies the results; nothing here touches state.

use crate::consts::{COMBO_STEP, MISCLICK_PENALTY, MISS_PENALTY};

/// Result of scoring a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitScore {
    pub points: u64,
    pub combo: u32,
    /// Combo is at or past the first multiplier step (popup + combo sound)
    pub milestone: bool,
}

/// Score and combo after a penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Penalty {
    pub score: u64,
    pub combo: u32,
}

/// Score a hit on top of `combo_before` consecutive hits
pub fn on_hit(combo_before: u32, score_per_hit: u32) -> HitScore {
    let combo = combo_before.saturating_add(1);
    let base = score_per_hit as u64;
    if combo >= COMBO_STEP {
        HitScore {
            points: base * (combo / COMBO_STEP + 1) as u64,
            combo,
            milestone: true,
        }
    } else {
        HitScore {
            points: base,
            combo,
            milestone: false,
        }
    }
}

/// Target expired unhit
pub fn on_miss(score: u64) -> Penalty {
    Penalty {
        score: score.saturating_sub(MISS_PENALTY),
        combo: 0,
    }
}

/// Board clicked outside any target
pub fn on_misclick(score: u64) -> Penalty {
    Penalty {
        score: score.saturating_sub(MISCLICK_PENALTY),
        combo: 0,
    }
}
