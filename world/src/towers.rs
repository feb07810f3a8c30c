//! Authoritative tower state: stats, upgrade tracks, and firing readiness.

use std::time::Duration;

use glam::Vec2;
use rampart_core::{
    CellCoord, EnemyId, TargetingStrategy, TowerId, TowerKind, TowerSnapshot, TowerSpec,
    UpgradeError, UpgradeTier, UpgradeTrack, UpgradeTrackSnapshot,
};

/// Critical chance granted when a tier enables criticals without naming one.
const DEFAULT_CRITICAL_CHANCE: f32 = 0.1;

/// Upgrade progress of one track, resolved against the catalog at creation.
///
/// Lock-out flips the `locked` flag; tier data is never removed, so the
/// legality checks stay branch-free and the state remains inspectable.
#[derive(Clone, Debug)]
struct TrackState {
    tiers: Vec<UpgradeTier>,
    level: u8,
    locked: bool,
}

impl TrackState {
    fn new(tiers: &[UpgradeTier]) -> Self {
        Self {
            tiers: tiers.to_vec(),
            level: 0,
            locked: false,
        }
    }

    fn is_maxed(&self) -> bool {
        usize::from(self.level) >= self.tiers.len()
    }

    fn next_tier(&self) -> Option<&UpgradeTier> {
        if self.locked {
            return None;
        }
        self.tiers.get(usize::from(self.level))
    }

    fn snapshot(&self) -> UpgradeTrackSnapshot {
        UpgradeTrackSnapshot {
            level: self.level,
            tier_count: self.tiers.len() as u8,
            locked: self.locked,
            next_cost: self.next_tier().map_or(0, |tier| tier.cost),
        }
    }
}

/// One placed tower.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) cell: CellCoord,
    pub(crate) position: Vec2,
    pub(crate) cost: u32,
    pub(crate) damage: f32,
    pub(crate) range: f32,
    pub(crate) cooldown: Duration,
    pub(crate) splash_radius: f32,
    pub(crate) buff_multiplier: f32,
    pub(crate) adds_burning: bool,
    pub(crate) burning_damage_multiplier: f32,
    pub(crate) adds_critical: bool,
    pub(crate) critical_chance: f32,
    pub(crate) special_ability: bool,
    tracks: [TrackState; 2],
    pub(crate) strategy: TargetingStrategy,
    pub(crate) target: Option<EnemyId>,
    pub(crate) last_shot: Option<Duration>,
    pub(crate) selected: bool,
}

impl Tower {
    pub(crate) fn from_spec(
        id: TowerId,
        kind: TowerKind,
        cell: CellCoord,
        position: Vec2,
        spec: &TowerSpec,
    ) -> Self {
        Self {
            id,
            kind,
            cell,
            position,
            cost: spec.cost,
            damage: spec.damage,
            range: spec.range,
            cooldown: Duration::from_secs_f32(spec.cooldown),
            splash_radius: spec.splash_radius,
            buff_multiplier: spec.buff_multiplier,
            adds_burning: false,
            burning_damage_multiplier: 1.0,
            adds_critical: false,
            critical_chance: DEFAULT_CRITICAL_CHANCE,
            special_ability: false,
            tracks: [
                TrackState::new(spec.track(UpgradeTrack::Primary)),
                TrackState::new(spec.track(UpgradeTrack::Secondary)),
            ],
            strategy: TargetingStrategy::Closest,
            target: None,
            last_shot: None,
            selected: false,
        }
    }

    /// Cost of the named track's next tier, or the reason it cannot advance.
    pub(crate) fn upgrade_availability(&self, track: UpgradeTrack) -> Result<u32, UpgradeError> {
        let state = &self.tracks[track.index()];
        if state.locked {
            return Err(UpgradeError::TrackLocked);
        }
        if state.is_maxed() {
            return Err(UpgradeError::TrackMaxed);
        }
        Ok(state.tiers[usize::from(state.level)].cost)
    }

    /// Cost of the next tier, with `0` as the "no further upgrade" sentinel.
    pub(crate) fn upgrade_cost(&self, track: UpgradeTrack) -> u32 {
        self.tracks[track.index()].next_tier().map_or(0, |tier| tier.cost)
    }

    /// Applies the next tier of an available track, returning the new level.
    ///
    /// Availability must have been checked first; the tier's modifiers apply
    /// multiplicatively, and completing a track while the other is untouched
    /// locks the other permanently.
    pub(crate) fn apply_upgrade(&mut self, track: UpgradeTrack) -> u8 {
        debug_assert!(self.upgrade_availability(track).is_ok());

        let index = track.index();
        let tier = self.tracks[index].tiers[usize::from(self.tracks[index].level)].clone();

        self.damage *= tier.damage_multiplier;
        self.range *= tier.range_multiplier;
        self.cooldown = self.cooldown.mul_f32(tier.cooldown_multiplier);
        self.splash_radius *= tier.splash_radius_multiplier;
        if let Some(buff) = tier.buff_multiplier {
            self.buff_multiplier = buff;
        }
        if tier.adds_burning {
            self.adds_burning = true;
        }
        self.burning_damage_multiplier *= tier.burning_damage_multiplier;
        if tier.adds_critical {
            self.adds_critical = true;
        }
        if let Some(chance) = tier.critical_chance {
            self.critical_chance = chance;
        }
        if tier.adds_special_ability {
            self.special_ability = true;
        }

        self.tracks[index].level += 1;
        let other = track.other().index();
        if self.tracks[index].is_maxed() && self.tracks[other].level == 0 {
            self.tracks[other].locked = true;
        }

        self.tracks[index].level
    }

    /// Whether the tower may fire at `now`. Towers without damage (support
    /// kind) never fire.
    pub(crate) fn ready_to_fire(&self, now: Duration) -> bool {
        if self.damage <= 0.0 {
            return false;
        }
        match self.last_shot {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.cooldown,
        }
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            cost: self.cost,
            damage: self.damage,
            range: self.range,
            cooldown: self.cooldown,
            splash_radius: self.splash_radius,
            buff_multiplier: self.buff_multiplier,
            adds_burning: self.adds_burning,
            adds_critical: self.adds_critical,
            special_ability: self.special_ability,
            strategy: self.strategy,
            selected: self.selected,
            tracks: [self.tracks[0].snapshot(), self.tracks[1].snapshot()],
        }
    }
}
