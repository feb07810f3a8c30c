//! Static type catalog: tower and enemy base stats, upgrade tier tables, and
//! the global game rules.
//!
//! The catalog is plain configuration data. It ships with built-in defaults,
//! may be partially overridden from any serde-compatible source, and is
//! validated exactly once before a world is constructed — a malformed catalog
//! is a fatal load-time error, never a runtime condition.

use serde::{Deserialize, Serialize};

use crate::{EnemyKind, TowerKind, UpgradeTrack};

/// Seed used for the simulation RNG stream when no seed is configured.
const DEFAULT_SEED: u64 = 0x7d61_4aa5_29c3_5e01;

fn one() -> f32 {
    1.0
}

/// Reasons a catalog fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatalogError {
    /// An enemy entry carries a non-positive or missing required field.
    Enemy {
        /// Enemy kind whose entry is invalid.
        kind: EnemyKind,
        /// Name of the offending field.
        field: &'static str,
    },
    /// A tower entry carries an out-of-range base stat.
    Tower {
        /// Tower kind whose entry is invalid.
        kind: TowerKind,
        /// Name of the offending field.
        field: &'static str,
    },
    /// An upgrade tier carries an out-of-range modifier.
    Tier {
        /// Tower kind whose tier table is invalid.
        kind: TowerKind,
        /// Track containing the invalid tier.
        track: UpgradeTrack,
        /// Zero-based index of the invalid tier.
        tier: usize,
        /// Name of the offending field.
        field: &'static str,
    },
}

/// One purchasable tier of an upgrade track.
///
/// Multipliers default to `1.0` (no change); `buff_multiplier` and
/// `critical_chance` replace the tower's current value outright when present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeTier {
    /// Display name of the tier.
    pub name: String,
    /// Purchase price of the tier.
    pub cost: u32,
    /// Factor applied to the tower's damage.
    pub damage_multiplier: f32,
    /// Factor applied to the tower's range.
    pub range_multiplier: f32,
    /// Factor applied to the tower's cooldown (below `1.0` fires faster).
    pub cooldown_multiplier: f32,
    /// Factor applied to the tower's splash radius.
    pub splash_radius_multiplier: f32,
    /// Replacement value for the tower's buff multiplier, if present.
    pub buff_multiplier: Option<f32>,
    /// Grants the tower's projectiles a burning payload.
    pub adds_burning: bool,
    /// Factor applied to the tower's accumulated burning damage multiplier.
    pub burning_damage_multiplier: f32,
    /// Grants the tower a chance of critical hits.
    pub adds_critical: bool,
    /// Replacement value for the tower's critical chance, if present.
    pub critical_chance: Option<f32>,
    /// Marks the tower as carrying its kind's special ability.
    pub adds_special_ability: bool,
}

impl Default for UpgradeTier {
    fn default() -> Self {
        Self {
            name: String::new(),
            cost: 0,
            damage_multiplier: 1.0,
            range_multiplier: 1.0,
            cooldown_multiplier: 1.0,
            splash_radius_multiplier: 1.0,
            buff_multiplier: None,
            adds_burning: false,
            burning_damage_multiplier: 1.0,
            adds_critical: false,
            critical_chance: None,
            adds_special_ability: false,
        }
    }
}

/// Base statistics and upgrade tables for one tower kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSpec {
    /// Purchase price; also the basis for the sell refund.
    pub cost: u32,
    /// Damage per projectile before upgrades.
    pub damage: f32,
    /// Targeting radius in world units before upgrades.
    pub range: f32,
    /// Seconds between shots before upgrades.
    pub cooldown: f32,
    /// Splash radius carried by projectiles, `0` for single-target towers.
    #[serde(default)]
    pub splash_radius: f32,
    /// Damage multiplier granted to towers in range (support towers only).
    #[serde(default = "one")]
    pub buff_multiplier: f32,
    /// Tiers of the first upgrade track.
    #[serde(default)]
    pub path1: Vec<UpgradeTier>,
    /// Tiers of the second upgrade track.
    #[serde(default)]
    pub path2: Vec<UpgradeTier>,
}

impl TowerSpec {
    /// Tier table of the requested track.
    #[must_use]
    pub fn track(&self, track: UpgradeTrack) -> &[UpgradeTier] {
        match track {
            UpgradeTrack::Primary => &self.path1,
            UpgradeTrack::Secondary => &self.path2,
        }
    }
}

/// Base statistics for one enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Health the enemy spawns with.
    pub health: f32,
    /// Movement speed in world units per reference frame.
    pub speed: f32,
    /// Currency credited when the enemy is killed.
    pub reward: u32,
    /// Lives lost when the enemy reaches the end of the path.
    pub damage: u32,
}

/// Tower entries of the catalog, one per [`TowerKind`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerCatalog {
    /// Entry for [`TowerKind::Basic`].
    pub basic: TowerSpec,
    /// Entry for [`TowerKind::Sniper`].
    pub sniper: TowerSpec,
    /// Entry for [`TowerKind::Area`].
    pub area: TowerSpec,
    /// Entry for [`TowerKind::Support`].
    pub support: TowerSpec,
}

/// Enemy entries of the catalog, one per [`EnemyKind`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyCatalog {
    /// Entry for [`EnemyKind::Basic`].
    pub basic: EnemySpec,
    /// Entry for [`EnemyKind::Fast`].
    pub fast: EnemySpec,
    /// Entry for [`EnemyKind::Tank`].
    pub tank: EnemySpec,
    /// Entry for [`EnemyKind::Boss`].
    pub boss: EnemySpec,
}

/// Global rules of a single game session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Currency balance at the start of the session.
    pub starting_balance: u32,
    /// Lives at the start of the session.
    pub starting_lives: u32,
    /// Number of waves to survive for victory.
    pub total_waves: u32,
    /// Seconds between the end of one wave and the earliest start of the next.
    pub wave_cooldown: f32,
    /// Seed of the simulation RNG stream (wave shuffle, random targeting,
    /// critical rolls); two sessions with equal seeds replay identically.
    pub seed: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_balance: 500,
            starting_lives: 100,
            total_waves: 15,
            wave_cooldown: 10.0,
            seed: DEFAULT_SEED,
        }
    }
}

/// Complete static configuration consumed by the world at construction time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Tower entries.
    pub towers: TowerCatalog,
    /// Enemy entries.
    pub enemies: EnemyCatalog,
}

impl Catalog {
    /// Entry for the requested tower kind.
    #[must_use]
    pub fn tower(&self, kind: TowerKind) -> &TowerSpec {
        match kind {
            TowerKind::Basic => &self.towers.basic,
            TowerKind::Sniper => &self.towers.sniper,
            TowerKind::Area => &self.towers.area,
            TowerKind::Support => &self.towers.support,
        }
    }

    /// Entry for the requested enemy kind.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind) -> &EnemySpec {
        match kind {
            EnemyKind::Basic => &self.enemies.basic,
            EnemyKind::Fast => &self.enemies.fast,
            EnemyKind::Tank => &self.enemies.tank,
            EnemyKind::Boss => &self.enemies.boss,
        }
    }

    /// Validates every entry, reporting the first malformed field.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for kind in EnemyKind::ALL {
            let spec = self.enemy(kind);
            if spec.health <= 0.0 {
                return Err(CatalogError::Enemy { kind, field: "health" });
            }
            if spec.speed <= 0.0 {
                return Err(CatalogError::Enemy { kind, field: "speed" });
            }
            if spec.reward == 0 {
                return Err(CatalogError::Enemy { kind, field: "reward" });
            }
            if spec.damage == 0 {
                return Err(CatalogError::Enemy { kind, field: "damage" });
            }
        }

        for kind in TowerKind::ALL {
            let spec = self.tower(kind);
            if spec.cost == 0 {
                return Err(CatalogError::Tower { kind, field: "cost" });
            }
            if spec.damage < 0.0 {
                return Err(CatalogError::Tower { kind, field: "damage" });
            }
            if spec.range <= 0.0 {
                return Err(CatalogError::Tower { kind, field: "range" });
            }
            if spec.cooldown < 0.0 {
                return Err(CatalogError::Tower { kind, field: "cooldown" });
            }
            if spec.splash_radius < 0.0 {
                return Err(CatalogError::Tower {
                    kind,
                    field: "splash_radius",
                });
            }
            if spec.buff_multiplier < 1.0 {
                return Err(CatalogError::Tower {
                    kind,
                    field: "buff_multiplier",
                });
            }

            for track in UpgradeTrack::ALL {
                for (index, tier) in spec.track(track).iter().enumerate() {
                    validate_tier(kind, track, index, tier)?;
                }
            }
        }

        Ok(())
    }
}

fn validate_tier(
    kind: TowerKind,
    track: UpgradeTrack,
    index: usize,
    tier: &UpgradeTier,
) -> Result<(), CatalogError> {
    let invalid = |field: &'static str| CatalogError::Tier {
        kind,
        track,
        tier: index,
        field,
    };

    if tier.name.is_empty() {
        return Err(invalid("name"));
    }
    if tier.cost == 0 {
        return Err(invalid("cost"));
    }
    if tier.damage_multiplier <= 0.0 {
        return Err(invalid("damage_multiplier"));
    }
    if tier.range_multiplier <= 0.0 {
        return Err(invalid("range_multiplier"));
    }
    if tier.cooldown_multiplier <= 0.0 {
        return Err(invalid("cooldown_multiplier"));
    }
    if tier.splash_radius_multiplier <= 0.0 {
        return Err(invalid("splash_radius_multiplier"));
    }
    if tier.burning_damage_multiplier <= 0.0 {
        return Err(invalid("burning_damage_multiplier"));
    }
    if let Some(buff) = tier.buff_multiplier {
        if buff < 1.0 {
            return Err(invalid("buff_multiplier"));
        }
    }
    if let Some(chance) = tier.critical_chance {
        if chance <= 0.0 || chance > 1.0 {
            return Err(invalid("critical_chance"));
        }
    }

    Ok(())
}

impl Default for TowerCatalog {
    fn default() -> Self {
        Self {
            basic: TowerSpec {
                cost: 100,
                damage: 10.0,
                range: 150.0,
                cooldown: 1.0,
                splash_radius: 0.0,
                buff_multiplier: 1.0,
                path1: vec![
                    UpgradeTier {
                        name: "Faster Firing".to_owned(),
                        cost: 150,
                        cooldown_multiplier: 0.8,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Rapid Fire".to_owned(),
                        cost: 300,
                        cooldown_multiplier: 0.6,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Hypersonic".to_owned(),
                        cost: 600,
                        cooldown_multiplier: 0.4,
                        ..UpgradeTier::default()
                    },
                ],
                path2: vec![
                    UpgradeTier {
                        name: "Enhanced Damage".to_owned(),
                        cost: 200,
                        damage_multiplier: 1.5,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Heavy Rounds".to_owned(),
                        cost: 400,
                        damage_multiplier: 2.0,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Devastating Shots".to_owned(),
                        cost: 800,
                        damage_multiplier: 3.0,
                        ..UpgradeTier::default()
                    },
                ],
            },
            sniper: TowerSpec {
                cost: 250,
                damage: 50.0,
                range: 500.0,
                cooldown: 3.0,
                splash_radius: 0.0,
                buff_multiplier: 1.0,
                path1: vec![
                    UpgradeTier {
                        name: "Enhanced Scope".to_owned(),
                        cost: 200,
                        range_multiplier: 1.5,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Long Range".to_owned(),
                        cost: 400,
                        range_multiplier: 2.0,
                        cooldown_multiplier: 0.9,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Global Range".to_owned(),
                        cost: 800,
                        range_multiplier: 10.0,
                        ..UpgradeTier::default()
                    },
                ],
                path2: vec![
                    UpgradeTier {
                        name: "Armor Piercing".to_owned(),
                        cost: 300,
                        damage_multiplier: 2.0,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Critical Hits".to_owned(),
                        cost: 600,
                        damage_multiplier: 3.0,
                        adds_critical: true,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "One Shot One Kill".to_owned(),
                        cost: 1200,
                        damage_multiplier: 5.0,
                        critical_chance: Some(0.3),
                        ..UpgradeTier::default()
                    },
                ],
            },
            area: TowerSpec {
                cost: 300,
                damage: 15.0,
                range: 120.0,
                cooldown: 2.0,
                splash_radius: 80.0,
                buff_multiplier: 1.0,
                path1: vec![
                    UpgradeTier {
                        name: "Wider Blast".to_owned(),
                        cost: 200,
                        splash_radius_multiplier: 1.5,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Massive Explosion".to_owned(),
                        cost: 400,
                        splash_radius_multiplier: 2.0,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Nuclear Blast".to_owned(),
                        cost: 800,
                        splash_radius_multiplier: 3.0,
                        damage_multiplier: 1.5,
                        ..UpgradeTier::default()
                    },
                ],
                path2: vec![
                    UpgradeTier {
                        name: "Burning Effect".to_owned(),
                        cost: 250,
                        adds_burning: true,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Inferno".to_owned(),
                        cost: 500,
                        burning_damage_multiplier: 2.0,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Hellfire".to_owned(),
                        cost: 1000,
                        burning_damage_multiplier: 3.0,
                        splash_radius_multiplier: 1.5,
                        ..UpgradeTier::default()
                    },
                ],
            },
            support: TowerSpec {
                cost: 350,
                damage: 0.0,
                range: 200.0,
                cooldown: 0.0,
                splash_radius: 0.0,
                buff_multiplier: 1.2,
                path1: vec![
                    UpgradeTier {
                        name: "Extended Range".to_owned(),
                        cost: 200,
                        range_multiplier: 1.5,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Wide Support".to_owned(),
                        cost: 500,
                        range_multiplier: 2.5,
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Global Support".to_owned(),
                        cost: 1000,
                        range_multiplier: 10.0,
                        ..UpgradeTier::default()
                    },
                ],
                path2: vec![
                    UpgradeTier {
                        name: "Enhanced Buff".to_owned(),
                        cost: 300,
                        buff_multiplier: Some(1.5),
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Powerful Buff".to_owned(),
                        cost: 600,
                        buff_multiplier: Some(2.0),
                        ..UpgradeTier::default()
                    },
                    UpgradeTier {
                        name: "Ultimate Buff".to_owned(),
                        cost: 1200,
                        buff_multiplier: Some(3.0),
                        adds_special_ability: true,
                        ..UpgradeTier::default()
                    },
                ],
            },
        }
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self {
            basic: EnemySpec {
                health: 50.0,
                speed: 1.0,
                reward: 10,
                damage: 1,
            },
            fast: EnemySpec {
                health: 30.0,
                speed: 2.0,
                reward: 15,
                damage: 1,
            },
            tank: EnemySpec {
                health: 200.0,
                speed: 0.5,
                reward: 30,
                damage: 2,
            },
            boss: EnemySpec {
                health: 1000.0,
                speed: 0.7,
                reward: 200,
                damage: 10,
            },
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            towers: TowerCatalog::default(),
            enemies: EnemyCatalog::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, GameRules};
    use crate::{EnemyKind, TowerKind, UpgradeTrack};

    #[test]
    fn default_catalog_is_valid() {
        assert_eq!(Catalog::default().validate(), Ok(()));
    }

    #[test]
    fn default_rules_match_the_reference_session() {
        let rules = GameRules::default();
        assert_eq!(rules.starting_balance, 500);
        assert_eq!(rules.starting_lives, 100);
        assert!((rules.wave_cooldown - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn every_track_offers_three_tiers() {
        let catalog = Catalog::default();
        for kind in TowerKind::ALL {
            for track in UpgradeTrack::ALL {
                assert_eq!(catalog.tower(kind).track(track).len(), 3, "{kind:?}");
            }
        }
    }

    #[test]
    fn zero_health_enemies_are_rejected() {
        let mut catalog = Catalog::default();
        catalog.enemies.tank.health = 0.0;
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::Enemy {
                kind: EnemyKind::Tank,
                field: "health",
            })
        );
    }

    #[test]
    fn free_towers_are_rejected() {
        let mut catalog = Catalog::default();
        catalog.towers.sniper.cost = 0;
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::Tower {
                kind: TowerKind::Sniper,
                field: "cost",
            })
        );
    }

    #[test]
    fn out_of_range_critical_chance_is_rejected() {
        let mut catalog = Catalog::default();
        catalog.towers.sniper.path2[2].critical_chance = Some(1.5);
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::Tier {
                kind: TowerKind::Sniper,
                track: UpgradeTrack::Secondary,
                tier: 2,
                field: "critical_chance",
            })
        );
    }

    #[test]
    fn unnamed_tiers_are_rejected() {
        let mut catalog = Catalog::default();
        catalog.towers.basic.path1[0].name.clear();
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::Tier {
                kind: TowerKind::Basic,
                track: UpgradeTrack::Primary,
                tier: 0,
                field: "name",
            })
        );
    }
}
