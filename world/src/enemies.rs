//! Authoritative enemy state: path traversal and status effects.

use glam::Vec2;
use rampart_core::{geometry, EnemyId, EnemyKind, EnemySnapshot, EnemySpec};

/// Speeds are expressed in world units per frame at this reference frame
/// rate, so movement distance per tick is `speed * dt * REFERENCE_FRAME_RATE`
/// regardless of the actual tick length.
pub(crate) const REFERENCE_FRAME_RATE: f32 = 60.0;

#[derive(Clone, Copy, Debug)]
struct Burning {
    damage_per_second: f32,
    remaining: f32,
}

#[derive(Clone, Copy, Debug)]
struct Slow {
    factor: f32,
    remaining: f32,
}

/// One enemy marching along the waypoint path.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) path_index: usize,
    pub(crate) max_health: f32,
    pub(crate) health: f32,
    speed: f32,
    pub(crate) reward: u32,
    pub(crate) damage: u32,
    pub(crate) alive: bool,
    pub(crate) reached_end: bool,
    facing: f32,
    burning: Option<Burning>,
    slow: Option<Slow>,
}

impl Enemy {
    pub(crate) fn from_spec(id: EnemyId, kind: EnemyKind, spec: &EnemySpec, start: Vec2) -> Self {
        Self {
            id,
            kind,
            position: start,
            path_index: 1,
            max_health: spec.health,
            health: spec.health,
            speed: spec.speed,
            reward: spec.reward,
            damage: spec.damage,
            alive: true,
            reached_end: false,
            facing: 0.0,
            burning: None,
            slow: None,
        }
    }

    /// Applies status effects, then advances toward the current waypoint.
    ///
    /// Reaching the final waypoint marks the enemy as escaped; the caller
    /// settles lives and removal afterwards.
    pub(crate) fn update(&mut self, dt: f32, waypoints: &[Vec2]) {
        if !self.alive {
            return;
        }

        self.tick_status(dt);
        if !self.alive {
            return;
        }

        let Some(&target) = waypoints.get(self.path_index) else {
            self.reached_end = true;
            self.alive = false;
            return;
        };

        let to_target = target - self.position;
        let distance = to_target.length();
        let step = self.speed * self.slow_factor() * dt * REFERENCE_FRAME_RATE;

        if distance <= step {
            // Snap to the waypoint instead of overshooting it.
            self.position = target;
            self.path_index += 1;
            if self.path_index >= waypoints.len() {
                self.reached_end = true;
                self.alive = false;
                return;
            }
        } else {
            self.position += geometry::direction_between(self.position, target) * step;
        }

        self.facing = geometry::facing_angle(to_target);
    }

    fn tick_status(&mut self, dt: f32) {
        if let Some(burning) = &mut self.burning {
            self.health -= burning.damage_per_second * dt;
            burning.remaining -= dt;
        }
        if self.burning.map_or(false, |burning| burning.remaining <= 0.0) {
            self.burning = None;
        }

        if let Some(slow) = &mut self.slow {
            slow.remaining -= dt;
        }
        if self.slow.map_or(false, |slow| slow.remaining <= 0.0) {
            self.slow = None;
        }

        if self.health <= 0.0 {
            self.alive = false;
        }
    }

    /// Refresh semantics: the stronger damage rate and the longer remaining
    /// duration win; burns never stack additively.
    pub(crate) fn apply_burning(&mut self, damage_per_second: f32, duration: f32) {
        match &mut self.burning {
            Some(burning) => {
                burning.damage_per_second = burning.damage_per_second.max(damage_per_second);
                burning.remaining = burning.remaining.max(duration);
            }
            None => {
                self.burning = Some(Burning {
                    damage_per_second,
                    remaining: duration,
                });
            }
        }
    }

    /// The strongest slow (lowest factor) and the longer duration win.
    pub(crate) fn apply_slow(&mut self, factor: f32, duration: f32) {
        match &mut self.slow {
            Some(slow) => {
                slow.factor = slow.factor.min(factor);
                slow.remaining = slow.remaining.max(duration);
            }
            None => {
                self.slow = Some(Slow {
                    factor,
                    remaining: duration,
                });
            }
        }
    }

    /// Subtracts health, reporting whether the hit was lethal.
    pub(crate) fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub(crate) fn slow_factor(&self) -> f32 {
        self.slow.map_or(1.0, |slow| slow.factor)
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            path_index: self.path_index,
            health: self.health,
            max_health: self.max_health,
            facing: self.facing,
            burning: self.burning.is_some(),
            slowed: self.slow.is_some(),
        }
    }
}
