//! Idle/demo mode - a bot plays the game
//!
//! Each new target gets a randomized reaction delay; when it elapses the bot
//! clicks the target's center (if it's still there). Now and then it fumbles
//! and clicks empty board instead.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::TARGET_SIZE;
use crate::sim::{FinalStats, GameSession, SessionStatus, TargetId};

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    /// Reaction delay range (ms)
    pub reaction_ms: (u64, u64),
    /// Chance per click of hitting empty board instead
    pub fumble_chance: f64,
    /// Target id -> when the bot will click it
    pending: BTreeMap<TargetId, u64>,
}

impl AutoPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            reaction_ms: (350, 1300),
            fumble_chance: 0.05,
            pending: BTreeMap::new(),
        }
    }

    /// Advance the session one frame, then act on whatever is due
    pub fn step(&mut self, session: &mut GameSession, frame_ms: u64) {
        session.advance(frame_ms);
        if session.status() != SessionStatus::Playing {
            self.pending.clear();
            return;
        }

        let now = session.now_ms();
        let (lo, hi) = self.reaction_ms;
        for target in session.live_targets() {
            if !self.pending.contains_key(&target.id) {
                let delay = self.rng.random_range(lo..=hi.max(lo));
                self.pending.insert(target.id, now + delay);
            }
        }

        let due: Vec<TargetId> = self
            .pending
            .iter()
            .filter(|&(_, &at)| at <= now)
            .map(|(&id, _)| id)
            .collect();
        for id in due {
            self.pending.remove(&id);
            if self.rng.random_bool(self.fumble_probability()) {
                session.record_misclick();
                continue;
            }
            if let Some(target) = session.target(id) {
                let (x, y) = (target.x + TARGET_SIZE / 2.0, target.y + TARGET_SIZE / 2.0);
                session.click_at(x, y);
            }
        }

        // Forget targets that expired before the bot reacted
        self.pending.retain(|id, _| session.target(*id).is_some());
    }

    /// `fumble_chance` as a valid probability; NaN counts as never
    fn fumble_probability(&self) -> f64 {
        if self.fumble_chance >= 0.0 {
            self.fumble_chance.min(1.0)
        } else {
            0.0
        }
    }

    /// Play a started session to the end
    pub fn play(&mut self, session: &mut GameSession, frame_ms: u64) -> Option<FinalStats> {
        if session.status() != SessionStatus::Playing {
            log::warn!("autoplay needs a running session, got {:?}", session.status());
            return None;
        }
        while session.status() == SessionStatus::Playing {
            self.step(session, frame_ms.max(1));
        }
        session.final_stats().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::{Board, Level};

    fn session() -> GameSession {
        GameSession::new(3, Board::default(), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_plays_to_game_over() {
        let mut s = session();
        s.start(Level::Easy).unwrap();
        let mut bot = AutoPlayer::new(9);
        let stats = bot.play(&mut s, 16).unwrap();

        assert_eq!(s.status(), SessionStatus::GameOver);
        assert!(stats.targets_hit > 0);
        assert!(stats.max_combo >= 1);
        assert_eq!(s.leaderboard().len(), 1);
    }

    #[test]
    fn test_slow_bot_misses_hard_targets() {
        let mut s = session();
        s.start(Level::Hard).unwrap();
        let mut bot = AutoPlayer::new(1);
        bot.reaction_ms = (1500, 2000);
        bot.fumble_chance = 0.0;
        let stats = bot.play(&mut s, 16).unwrap();

        assert_eq!(stats.targets_hit, 0);
        assert_eq!(stats.score, 0);
        assert!(stats.targets_missed > 0);
    }

    #[test]
    fn test_bad_fumble_chance_is_tolerated() {
        let mut s = session();
        s.start(Level::Easy).unwrap();
        let mut bot = AutoPlayer::new(5);
        bot.fumble_chance = f64::NAN;
        let stats = bot.play(&mut s, 16).unwrap();
        assert!(stats.targets_hit > 0);

        bot.fumble_chance = 7.0;
        s.play_again().unwrap();
        let stats = bot.play(&mut s, 16).unwrap();
        assert_eq!(stats.targets_hit, 0);
    }

    #[test]
    fn test_requires_running_session() {
        let mut s = session();
        assert!(AutoPlayer::new(1).play(&mut s, 16).is_none());
    }
}
