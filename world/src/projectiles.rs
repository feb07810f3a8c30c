//! Authoritative projectile state: homing flight toward a tracked enemy.

use glam::Vec2;
use rampart_core::{geometry, EnemyId, ProjectileId, ProjectileSnapshot};

use crate::enemies::REFERENCE_FRAME_RATE;

/// Flight speed in world units per reference frame.
const PROJECTILE_SPEED: f32 = 10.0;

/// Distance at which a projectile counts as having hit its target.
const HIT_RADIUS: f32 = 20.0;

/// Burning effect a projectile delivers on impact.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BurningPayload {
    pub(crate) damage_per_second: f32,
    pub(crate) duration: f32,
}

/// One projectile in flight.
///
/// Damage is fixed at creation (critical rolls happen at fire time); the
/// target reference is weak and the projectile self-terminates without effect
/// once the target is gone.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) position: Vec2,
    facing: f32,
    pub(crate) target: EnemyId,
    pub(crate) damage: f32,
    pub(crate) splash_radius: f32,
    pub(crate) burning: Option<BurningPayload>,
    speed: f32,
    pub(crate) alive: bool,
}

impl Projectile {
    pub(crate) fn new(
        id: ProjectileId,
        origin: Vec2,
        target_position: Vec2,
        target: EnemyId,
        damage: f32,
        splash_radius: f32,
        burning: Option<BurningPayload>,
    ) -> Self {
        Self {
            id,
            position: origin,
            facing: geometry::facing_angle(geometry::direction_between(origin, target_position)),
            target,
            damage,
            splash_radius,
            burning,
            speed: PROJECTILE_SPEED,
            alive: true,
        }
    }

    /// Re-aims at the target's current position and advances, reporting
    /// whether the projectile closed within the hit radius.
    pub(crate) fn advance(&mut self, dt: f32, target_position: Vec2) -> bool {
        let direction = geometry::direction_between(self.position, target_position);
        if direction != Vec2::ZERO {
            self.facing = geometry::facing_angle(direction);
        }
        self.position += direction * (self.speed * dt * REFERENCE_FRAME_RATE);
        self.position.distance(target_position) < HIT_RADIUS
    }

    pub(crate) fn expire(&mut self) {
        self.alive = false;
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            facing: self.facing,
            target: self.target,
        }
    }
}

/// Splash damage with linear falloff: full damage at the impact point, half
/// at the splash edge. Callers exclude enemies beyond the radius.
pub(crate) fn splash_damage(base: f32, distance: f32, radius: f32) -> f32 {
    base * (1.0 - 0.5 * distance / radius)
}

#[cfg(test)]
mod tests {
    use super::{splash_damage, BurningPayload, Projectile, HIT_RADIUS};
    use glam::Vec2;
    use rampart_core::{EnemyId, ProjectileId};

    fn projectile(origin: Vec2, target_position: Vec2) -> Projectile {
        Projectile::new(
            ProjectileId::new(0),
            origin,
            target_position,
            EnemyId::new(0),
            10.0,
            0.0,
            None,
        )
    }

    #[test]
    fn falloff_matches_the_reference_curve() {
        assert!((splash_damage(100.0, 0.0, 80.0) - 100.0).abs() < 1e-4);
        assert!((splash_damage(100.0, 40.0, 80.0) - 75.0).abs() < 1e-4);
        assert!((splash_damage(100.0, 80.0, 80.0) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn flight_tracks_a_moving_target() {
        let mut projectile = projectile(Vec2::ZERO, Vec2::new(600.0, 0.0));

        // Target dodges sideways; the projectile re-aims each tick.
        let reached = projectile.advance(0.1, Vec2::new(600.0, 300.0));
        assert!(!reached);
        assert!(projectile.position.y > 0.0);
    }

    #[test]
    fn closing_within_the_hit_radius_reports_impact() {
        let mut projectile = projectile(Vec2::ZERO, Vec2::new(70.0, 0.0));

        // 0.1 s at speed 10 covers 60 units, leaving 10 < HIT_RADIUS.
        assert!(projectile.advance(0.1, Vec2::new(70.0, 0.0)));
        assert!((projectile.position.x - 60.0).abs() < 1e-3);
        assert!(70.0 - projectile.position.x < HIT_RADIUS);
    }

    #[test]
    fn expiry_clears_the_alive_flag() {
        let mut projectile = projectile(Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert!(projectile.alive);
        projectile.expire();
        assert!(!projectile.alive);
    }

    #[test]
    fn payload_rides_along_unchanged() {
        let payload = BurningPayload {
            damage_per_second: 10.0,
            duration: 3.0,
        };
        let projectile = Projectile::new(
            ProjectileId::new(1),
            Vec2::ZERO,
            Vec2::new(50.0, 0.0),
            EnemyId::new(2),
            42.0,
            80.0,
            Some(payload),
        );

        let carried = projectile.burning.expect("payload present");
        assert!((carried.damage_per_second - 10.0).abs() < f32::EPSILON);
        assert!((carried.duration - 3.0).abs() < f32::EPSILON);
    }
}
