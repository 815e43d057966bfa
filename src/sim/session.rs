//! Game session state machine
//!
//! Owns score/combo/time state, the live targets and both intervals. Time
//! only moves through [`GameSession::advance`], which dispatches every due
//! countdown tick, spawn tick and target expiry in order. Each dispatch runs
//! to completion before the next, so the first resolution of a target wins.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{ClockTick, SessionClock};
use super::difficulty::Level;
use super::scoring;
use super::targets::{Board, Target, TargetId, TargetLifecycle};
use crate::audio::{AudioManager, Silent, SoundEffect, SoundSystem};
use crate::consts::{LOW_TIME_SECS, SESSION_LENGTH_SECS};
use crate::error::{GameError, Result};
use crate::highscores::{JsonFileStore, Leaderboard, LeaderboardEntry, LeaderboardStore};
use crate::settings::Settings;

/// Current status of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionStatus {
    /// On the menu, nothing running
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Timers keep ticking but every tick is ignored
    Paused,
    /// Time ran out; final stats available
    GameOver,
}

/// Read-only view for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub time_left: u32,
    pub combo: u32,
    pub level: Level,
    pub status: SessionStatus,
}

/// Results shown on the game over screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalStats {
    pub score: u64,
    pub level: Level,
    pub max_combo: u32,
    pub targets_hit: u32,
    pub targets_missed: u32,
    /// Leaderboard rank (1-indexed), None if the score didn't make the list
    pub rank: Option<usize>,
    pub new_high_score: bool,
    /// True only when the updated leaderboard was written. A score that
    /// didn't make the list, or an unreadable store, leaves this false.
    pub persisted: bool,
}

/// A successful hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub target_id: TargetId,
    pub points: u64,
    pub combo: u32,
    pub milestone: bool,
}

/// What a board click turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Hit(HitOutcome),
    Misclick,
    Ignored,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StatusChanged {
        from: SessionStatus,
        to: SessionStatus,
    },
    TargetSpawned {
        id: TargetId,
        x: f32,
        y: f32,
    },
    TargetHit {
        id: TargetId,
        points: u64,
        combo: u32,
    },
    /// Combo popup
    ComboMilestone { combo: u32 },
    TargetExpired { id: TargetId },
    /// Targets removed without scoring (quit/game over)
    TargetsCleared { ids: Vec<TargetId> },
    Misclick,
    TimeTick { time_left: u32 },
    GameOver { stats: FinalStats },
}

/// Something scheduled on the session clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Dispatch {
    Clock(ClockTick),
    Expire(TargetId),
}

pub struct GameSession {
    status: SessionStatus,
    score: u64,
    time_left: u32,
    level: Level,
    combo: u32,
    max_combo: u32,
    targets_hit: u32,
    targets_missed: u32,

    board: Board,
    now_ms: u64,
    paused_at: Option<u64>,
    rng: Pcg32,
    targets: TargetLifecycle,
    clock: SessionClock,

    store: Box<dyn LeaderboardStore>,
    sound: Box<dyn SoundSystem>,
    events: Vec<GameEvent>,
    final_stats: Option<FinalStats>,
}

impl GameSession {
    /// Idle session; `seed` drives target placement
    pub fn new(seed: u64, board: Board, store: Box<dyn LeaderboardStore>) -> Self {
        Self {
            status: SessionStatus::Idle,
            score: 0,
            time_left: SESSION_LENGTH_SECS,
            level: Level::default(),
            combo: 0,
            max_combo: 0,
            targets_hit: 0,
            targets_missed: 0,
            board,
            now_ms: 0,
            paused_at: None,
            rng: Pcg32::seed_from_u64(seed),
            targets: TargetLifecycle::new(),
            clock: SessionClock::new(),
            store,
            sound: Box::new(Silent),
            events: Vec::new(),
            final_stats: None,
        }
    }

    /// Session wired to the file leaderboard and audio described by `settings`
    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        let store = JsonFileStore::new(&settings.leaderboard_path);
        let mut session = Self::new(seed, settings.board(), Box::new(store))
            .with_sound(Box::new(AudioManager::from_settings(settings)));
        session.level = settings.level;
        session
    }

    pub fn with_sound(mut self, sound: Box<dyn SoundSystem>) -> Self {
        self.sound = sound;
        self
    }

    // === Lifecycle ===

    /// Pick the difficulty for the next start
    pub fn set_level(&mut self, level: Level) -> Result<()> {
        match self.status {
            SessionStatus::Idle | SessionStatus::GameOver => {
                self.level = level;
                Ok(())
            }
            status => Err(GameError::InvalidTransition {
                action: "change level",
                status,
            }),
        }
    }

    /// Idle → Playing
    pub fn start(&mut self, level: Level) -> Result<()> {
        self.expect_status("start", &[SessionStatus::Idle])?;
        self.begin(level);
        Ok(())
    }

    /// GameOver → Playing at the same level
    pub fn play_again(&mut self) -> Result<()> {
        self.expect_status("play again", &[SessionStatus::GameOver])?;
        self.begin(self.level);
        Ok(())
    }

    /// Playing → Paused. Live targets stay on the board with their
    /// deadlines frozen until `resume`.
    pub fn pause(&mut self) -> Result<()> {
        self.expect_status("pause", &[SessionStatus::Playing])?;
        self.paused_at = Some(self.now_ms);
        self.set_status(SessionStatus::Paused);
        Ok(())
    }

    /// Paused → Playing. Live target deadlines resume where they stopped.
    pub fn resume(&mut self) -> Result<()> {
        self.expect_status("resume", &[SessionStatus::Paused])?;
        if let Some(paused_at) = self.paused_at.take() {
            self.targets.shift_expiries(self.now_ms.saturating_sub(paused_at));
        }
        self.set_status(SessionStatus::Playing);
        Ok(())
    }

    /// Escape key: pause while playing, resume while paused
    pub fn toggle_pause(&mut self) -> Result<()> {
        match self.status {
            SessionStatus::Paused => self.resume(),
            _ => self.pause(),
        }
    }

    /// Playing/Paused → Idle, discarding the session without a score
    pub fn quit(&mut self) -> Result<()> {
        self.expect_status("quit", &[SessionStatus::Playing, SessionStatus::Paused])?;
        self.teardown();
        self.set_status(SessionStatus::Idle);
        Ok(())
    }

    /// GameOver → Idle
    pub fn return_to_menu(&mut self) -> Result<()> {
        self.expect_status("return to menu", &[SessionStatus::GameOver])?;
        self.set_status(SessionStatus::Idle);
        Ok(())
    }

    // === Player input ===

    /// Score a click on a live target. None if ignored (not playing, or
    /// the target was already hit/expired).
    pub fn record_hit(&mut self, id: TargetId) -> Option<HitOutcome> {
        if self.status != SessionStatus::Playing {
            log::debug!("hit on {} ignored while {:?}", id, self.status);
            return None;
        }
        if let Err(err) = self.targets.resolve_hit(id) {
            log::debug!("hit ignored: {}", err);
            return None;
        }

        let hit = scoring::on_hit(self.combo, self.level.config().score_per_hit);
        self.combo = hit.combo;
        self.max_combo = self.max_combo.max(hit.combo);
        self.targets_hit += 1;
        self.score += hit.points;

        self.events.push(GameEvent::TargetHit {
            id,
            points: hit.points,
            combo: hit.combo,
        });
        if hit.milestone {
            self.events.push(GameEvent::ComboMilestone { combo: hit.combo });
            self.sound.play(SoundEffect::Combo);
        } else {
            self.sound.play(SoundEffect::Hit);
        }

        Some(HitOutcome {
            target_id: id,
            points: hit.points,
            combo: hit.combo,
            milestone: hit.milestone,
        })
    }

    /// Penalize a target whose deadline passed. Returns false if ignored.
    pub fn record_miss(&mut self, id: TargetId) -> bool {
        if self.status != SessionStatus::Playing {
            log::debug!("expiry of {} ignored while {:?}", id, self.status);
            return false;
        }
        if let Err(err) = self.targets.expire(id) {
            log::debug!("expiry ignored: {}", err);
            return false;
        }

        let penalty = scoring::on_miss(self.score);
        self.score = penalty.score;
        self.combo = penalty.combo;
        self.targets_missed += 1;

        self.events.push(GameEvent::TargetExpired { id });
        self.sound.play(SoundEffect::Miss);
        true
    }

    /// Penalize a click on empty board. Returns false if ignored.
    pub fn record_misclick(&mut self) -> bool {
        if self.status != SessionStatus::Playing {
            return false;
        }

        let penalty = scoring::on_misclick(self.score);
        self.score = penalty.score;
        self.combo = penalty.combo;

        self.events.push(GameEvent::Misclick);
        self.sound.play(SoundEffect::Miss);
        true
    }

    /// Board click at a point: hits the topmost target there, otherwise a misclick
    pub fn click_at(&mut self, x: f32, y: f32) -> Click {
        if self.status != SessionStatus::Playing {
            return Click::Ignored;
        }
        match self.targets.target_at(x, y) {
            Some(id) => self.record_hit(id).map(Click::Hit).unwrap_or(Click::Ignored),
            None => {
                self.record_misclick();
                Click::Misclick
            }
        }
    }

    // === Time ===

    /// Move simulated time forward, firing everything that falls due
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.now_ms.saturating_add(dt_ms);
        if self.status == SessionStatus::Paused {
            // Every tick would be ignored; skip them in one step
            self.clock.skip_past(until);
            self.now_ms = until;
            return;
        }
        while let Some((due, what)) = self.next_dispatch() {
            if due > until {
                break;
            }
            self.now_ms = self.now_ms.max(due);
            self.dispatch(what);
        }
        self.now_ms = until;
    }

    fn next_dispatch(&self) -> Option<(u64, Dispatch)> {
        let tick = self
            .clock
            .next_due()
            .map(|(due, which)| (due, Dispatch::Clock(which)));
        // Deadlines are frozen while paused
        let expiry = if self.status == SessionStatus::Playing {
            self.targets
                .next_expiry()
                .map(|(due, id)| (due, Dispatch::Expire(id)))
        } else {
            None
        };
        match (tick, expiry) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn dispatch(&mut self, what: Dispatch) {
        match what {
            Dispatch::Clock(which) => {
                self.clock.fire(which);
                if self.status != SessionStatus::Playing {
                    return;
                }
                match which {
                    ClockTick::Countdown => self.countdown_tick(),
                    ClockTick::Spawn => self.spawn_target(),
                }
            }
            Dispatch::Expire(id) => {
                self.record_miss(id);
            }
        }
    }

    fn countdown_tick(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
        self.events.push(GameEvent::TimeTick {
            time_left: self.time_left,
        });
        if self.time_left == 0 {
            self.end_game();
        }
    }

    fn spawn_target(&mut self) {
        let target = self
            .targets
            .spawn(self.board, self.level, self.now_ms, &mut self.rng);
        log::debug!(
            "target {} at ({:.0}, {:.0}) until {}ms",
            target.id,
            target.x,
            target.y,
            target.expiry_ms
        );
        self.events.push(GameEvent::TargetSpawned {
            id: target.id,
            x: target.x,
            y: target.y,
        });
    }

    // === Transitions ===

    fn begin(&mut self, level: Level) {
        self.level = level;
        self.score = 0;
        self.time_left = SESSION_LENGTH_SECS;
        self.combo = 0;
        self.max_combo = 0;
        self.targets_hit = 0;
        self.targets_missed = 0;
        self.final_stats = None;
        self.paused_at = None;
        self.targets.clear_all();
        self.clock.start(self.now_ms, level.config().spawn_interval_ms);
        log::info!("Session started on {}", level);
        self.set_status(SessionStatus::Playing);
    }

    /// Stop both intervals and drop live targets
    fn teardown(&mut self) {
        self.clock.stop();
        self.paused_at = None;
        let ids = self.targets.clear_all();
        if !ids.is_empty() {
            self.events.push(GameEvent::TargetsCleared { ids });
        }
    }

    fn end_game(&mut self) {
        self.teardown();
        self.set_status(SessionStatus::GameOver);

        let entry =
            LeaderboardEntry::today(self.score, self.level, self.max_combo, self.targets_hit);
        let (rank, new_high_score, persisted) = self.submit_score(entry);

        let stats = FinalStats {
            score: self.score,
            level: self.level,
            max_combo: self.max_combo,
            targets_hit: self.targets_hit,
            targets_missed: self.targets_missed,
            rank,
            new_high_score,
            persisted,
        };
        log::info!(
            "Game over: score {} (max combo {}, {} hit, {} missed)",
            stats.score,
            stats.max_combo,
            stats.targets_hit,
            stats.targets_missed
        );

        self.sound.play(SoundEffect::GameOver);
        self.events.push(GameEvent::GameOver {
            stats: stats.clone(),
        });
        self.final_stats = Some(stats);
    }

    /// Insert into the stored leaderboard and write it back.
    /// Returns (rank, new high score, persisted).
    ///
    /// When the store can't be read nothing is written, so existing records
    /// are never replaced by a partial list; the result then claims no rank.
    fn submit_score(&mut self, entry: LeaderboardEntry) -> (Option<usize>, bool, bool) {
        let score = entry.score;
        let mut leaderboard = match self.store.load() {
            Ok(entries) => Leaderboard::from_entries(entries),
            Err(err) => {
                log::warn!("Leaderboard unavailable, score not recorded: {}", err);
                return (None, false, false);
            }
        };

        let Some(rank) = leaderboard.insert(entry) else {
            return (None, leaderboard.is_new_high_score(score), false);
        };
        let persisted = match self.store.save(&leaderboard.entries) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Could not save high scores: {}", err);
                false
            }
        };
        (Some(rank), leaderboard.is_new_high_score(score), persisted)
    }

    fn set_status(&mut self, to: SessionStatus) {
        let from = self.status;
        self.status = to;
        log::info!("{:?} -> {:?}", from, to);
        self.events.push(GameEvent::StatusChanged { from, to });
    }

    fn expect_status(&self, action: &'static str, allowed: &[SessionStatus]) -> Result<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                action,
                status: self.status,
            })
        }
    }

    // === Queries ===

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            time_left: self.time_left,
            combo: self.combo,
            level: self.level,
            status: self.status,
        }
    }

    /// Stored leaderboard, or an empty one if storage can't be read
    pub fn leaderboard(&self) -> Leaderboard {
        match self.store.load() {
            Ok(entries) => Leaderboard::from_entries(entries),
            Err(err) => {
                log::warn!("Leaderboard unavailable: {}", err);
                Leaderboard::new()
            }
        }
    }

    /// Events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Final countdown warning window
    pub fn low_time(&self) -> bool {
        matches!(self.status, SessionStatus::Playing | SessionStatus::Paused)
            && self.time_left <= LOW_TIME_SECS
    }

    pub fn final_stats(&self) -> Option<&FinalStats> {
        self.final_stats.as_ref()
    }

    pub fn live_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.live()
    }

    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(id)
    }

    /// Resize the play area; affects targets spawned from now on
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn targets_hit(&self) -> u32 {
        self.targets_hit
    }

    pub fn targets_missed(&self) -> u32 {
        self.targets_missed
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }
}
