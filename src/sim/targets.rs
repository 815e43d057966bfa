//! Target lifecycle
//!
//! Tracks live targets (spawned, not yet hit or expired). A target leaves the
//! live set on its first resolution; any later hit/expire for the same id is
//! rejected, which makes double clicks and hit-vs-expiry races harmless.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Level;
use crate::consts::TARGET_SIZE;
use crate::error::{GameError, Result};

pub type TargetId = u32;

/// Play area dimensions (same units as target positions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub width: f32,
    pub height: f32,
}

impl Board {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest top-left coordinate that keeps a target fully inside.
    /// Boards smaller than a target pin it to the origin.
    fn max_origin(&self) -> (f32, f32) {
        (
            (self.width - TARGET_SIZE).max(0.0),
            (self.height - TARGET_SIZE).max(0.0),
        )
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(800.0, 500.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    Active,
    Hit,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Top-left corner
    pub x: f32,
    pub y: f32,
    pub spawn_time_ms: u64,
    pub expiry_ms: u64,
    pub state: TargetState,
}

impl Target {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + TARGET_SIZE && py >= self.y && py <= self.y + TARGET_SIZE
    }
}

/// Live target set plus id allocator
#[derive(Debug, Clone, Default)]
pub struct TargetLifecycle {
    /// Keyed by id for stable iteration order
    live: BTreeMap<TargetId, Target>,
    next_id: TargetId,
}

impl TargetLifecycle {
    pub fn new() -> Self {
        Self {
            live: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Spawn a target at a uniformly random position that fits the board
    pub fn spawn<R: Rng>(&mut self, board: Board, level: Level, now_ms: u64, rng: &mut R) -> Target {
        let (max_x, max_y) = board.max_origin();
        let x = uniform(rng, max_x);
        let y = uniform(rng, max_y);

        let id = self.next_id.max(1);
        self.next_id = id + 1;

        let target = Target {
            id,
            x,
            y,
            spawn_time_ms: now_ms,
            expiry_ms: now_ms.saturating_add(level.config().target_duration_ms),
            state: TargetState::Active,
        };
        self.live.insert(id, target.clone());
        target
    }

    /// Resolve a target as hit. Fails if it is no longer live.
    pub fn resolve_hit(&mut self, id: TargetId) -> Result<Target> {
        let mut target = self.live.remove(&id).ok_or(GameError::AlreadyResolved(id))?;
        target.state = TargetState::Hit;
        Ok(target)
    }

    /// Resolve a target as expired. Fails if it is no longer live.
    pub fn expire(&mut self, id: TargetId) -> Result<Target> {
        let mut target = self.live.remove(&id).ok_or(GameError::AlreadyResolved(id))?;
        target.state = TargetState::Expired;
        Ok(target)
    }

    /// Drop every live target without scoring; returns the removed ids
    pub fn clear_all(&mut self) -> Vec<TargetId> {
        let ids = self.live.keys().copied().collect();
        self.live.clear();
        ids
    }

    /// Earliest deadline among live targets, ties broken by id
    pub fn next_expiry(&self) -> Option<(u64, TargetId)> {
        self.live.values().map(|t| (t.expiry_ms, t.id)).min()
    }

    /// Push every live deadline back (time spent paused doesn't count)
    pub fn shift_expiries(&mut self, delta_ms: u64) {
        for target in self.live.values_mut() {
            target.expiry_ms = target.expiry_ms.saturating_add(delta_ms);
        }
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.live.get(&id)
    }

    /// Live targets in id order
    pub fn live(&self) -> impl Iterator<Item = &Target> {
        self.live.values()
    }

    /// Topmost live target under a point (latest spawn wins on overlap)
    pub fn target_at(&self, px: f32, py: f32) -> Option<TargetId> {
        self.live.values().rev().find(|t| t.contains(px, py)).map(|t| t.id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

/// Uniform draw from `0..=max`
fn uniform<R: Rng>(rng: &mut R, max: f32) -> f32 {
    if max > 0.0 {
        rng.random_range(0.0..=max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_spawn_sets_expiry_and_ids() {
        let mut targets = TargetLifecycle::new();
        let mut rng = rng();
        let a = targets.spawn(Board::default(), Level::Easy, 1000, &mut rng);
        let b = targets.spawn(Board::default(), Level::Hard, 1200, &mut rng);
        assert_eq!(a.expiry_ms, 3500);
        assert_eq!(b.expiry_ms, 2200);
        assert_ne!(a.id, b.id);
        assert_eq!(a.state, TargetState::Active);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets.next_expiry(), Some((2200, b.id)));
    }

    #[test]
    fn test_hit_is_idempotent() {
        let mut targets = TargetLifecycle::new();
        let t = targets.spawn(Board::default(), Level::Easy, 0, &mut rng());
        let hit = targets.resolve_hit(t.id).unwrap();
        assert_eq!(hit.state, TargetState::Hit);
        assert!(targets.is_empty());
        assert!(matches!(
            targets.resolve_hit(t.id),
            Err(GameError::AlreadyResolved(id)) if id == t.id
        ));
    }

    #[test]
    fn test_first_resolution_wins() {
        let mut targets = TargetLifecycle::new();
        let mut rng = rng();
        let a = targets.spawn(Board::default(), Level::Easy, 0, &mut rng);
        let b = targets.spawn(Board::default(), Level::Easy, 0, &mut rng);

        // expiry first, then a late click
        assert_eq!(targets.expire(a.id).unwrap().state, TargetState::Expired);
        assert!(targets.resolve_hit(a.id).is_err());

        // click first, then the expiry callback
        assert!(targets.resolve_hit(b.id).is_ok());
        assert!(targets.expire(b.id).is_err());

        assert!(targets.expire(999).is_err());
    }

    #[test]
    fn test_clear_all() {
        let mut targets = TargetLifecycle::new();
        let mut rng = rng();
        for _ in 0..3 {
            targets.spawn(Board::default(), Level::Medium, 0, &mut rng);
        }
        assert_eq!(targets.clear_all(), vec![1, 2, 3]);
        assert!(targets.is_empty());
        assert_eq!(targets.next_expiry(), None);
    }

    #[test]
    fn test_shift_and_lookup() {
        let mut targets = TargetLifecycle::new();
        let t = targets.spawn(Board::new(60.0, 60.0), Level::Easy, 0, &mut rng());
        assert_eq!((t.x, t.y), (0.0, 0.0));
        targets.shift_expiries(500);
        assert_eq!(targets.get(t.id).map(|t| t.expiry_ms), Some(3000));
        targets.shift_expiries(u64::MAX);
        assert_eq!(targets.get(t.id).map(|t| t.expiry_ms), Some(u64::MAX));
        assert_eq!(targets.target_at(30.0, 30.0), Some(t.id));
        assert_eq!(targets.target_at(61.0, 30.0), None);
    }

    #[test]
    fn test_tiny_board_pins_to_origin() {
        let mut targets = TargetLifecycle::new();
        let t = targets.spawn(Board::new(10.0, 10.0), Level::Easy, 0, &mut rng());
        assert_eq!((t.x, t.y), (0.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_spawn_fits_board(seed in any::<u64>(), w in 60.0f32..2000.0, h in 60.0f32..2000.0) {
            let mut targets = TargetLifecycle::new();
            let mut rng = Pcg32::seed_from_u64(seed);
            let t = targets.spawn(Board::new(w, h), Level::Easy, 0, &mut rng);
            prop_assert!(t.x >= 0.0 && t.x + TARGET_SIZE <= w + 0.001);
            prop_assert!(t.y >= 0.0 && t.y + TARGET_SIZE <= h + 0.001);
        }
    }
}
