#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Systems stay pure: they consume immutable snapshots and
//! respond with plain data for the world to act on.

pub mod catalog;
pub mod geometry;
pub mod map;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use catalog::{Catalog, CatalogError, EnemySpec, GameRules, TowerSpec, UpgradeTier};
pub use map::{MapError, MapLayout};

/// Unique identifier assigned to an enemy.
///
/// Identifiers are allocated monotonically by the world and never reused, so
/// a stale handle held by a tower or projectile simply fails lookup instead
/// of aliasing a newer enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single buildable grid cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap all-rounder with moderate damage and rate of fire.
    Basic,
    /// Long-range, slow-firing tower with heavy single-target damage.
    Sniper,
    /// Short-range tower whose shells splash damage around the impact point.
    Area,
    /// Non-firing tower that amplifies the damage of towers in its radius.
    Support,
}

impl TowerKind {
    /// Every tower kind in catalog order.
    pub const ALL: [TowerKind; 4] = [Self::Basic, Self::Sniper, Self::Area, Self::Support];
}

/// Types of enemies that march along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline unit with average health and speed.
    Basic,
    /// Fragile unit that moves twice as fast as the baseline.
    Fast,
    /// Slow unit with a large health pool.
    Tank,
    /// Rare heavyweight that appears on every fifth wave.
    Boss,
}

impl EnemyKind {
    /// Every enemy kind in catalog order.
    pub const ALL: [EnemyKind; 4] = [Self::Basic, Self::Fast, Self::Tank, Self::Boss];
}

/// Rule a tower uses to choose which in-range enemy to attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingStrategy {
    /// Attack the enemy nearest to the tower.
    Closest,
    /// Attack the enemy furthest along the path (highest waypoint index).
    First,
    /// Attack the enemy least far along the path (lowest waypoint index).
    Last,
    /// Attack a uniformly random in-range enemy.
    Random,
}

/// One of the two mutually exclusive upgrade progressions of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeTrack {
    /// The first upgrade track of the tower's catalog entry.
    Primary,
    /// The second upgrade track of the tower's catalog entry.
    Secondary,
}

impl UpgradeTrack {
    /// Both tracks in declaration order.
    pub const ALL: [UpgradeTrack; 2] = [Self::Primary, Self::Secondary];

    /// Returns the opposite track.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }

    /// Position of the track inside a two-element track array.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the next enemy wave begin spawning.
    StartWave,
    /// Requests placement of a tower on the provided grid cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Grid cell the tower should occupy.
        cell: CellCoord,
    },
    /// Requests the next tier of an upgrade track for an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
        /// Track whose next tier should be purchased.
        track: UpgradeTrack,
    },
    /// Requests removal of a tower in exchange for a partial refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Changes the targeting rule of an existing tower.
    SetTargetingStrategy {
        /// Identifier of the tower to reconfigure.
        tower: TowerId,
        /// Strategy the tower should use from the next tick onward.
        strategy: TargetingStrategy,
    },
    /// Selects the tower nearest to the provided position, if any is close
    /// enough, deselecting any previous selection.
    SelectTowerAt {
        /// World-space position of the selection request.
        position: Vec2,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a new wave began spawning.
    WaveStarted {
        /// One-indexed number of the wave that started.
        wave: u32,
    },
    /// Announces that the active wave finished (queue empty, no enemies left).
    WaveCompleted {
        /// One-indexed number of the wave that completed.
        wave: u32,
    },
    /// Reports that a wave-start request was rejected.
    WaveRejected {
        /// Specific reason the wave could not start.
        reason: WaveError,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy by the world.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
    },
    /// Announces that an enemy was destroyed and its bounty credited.
    EnemyDied {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Currency credited for the kill.
        reward: u32,
    },
    /// Announces that an enemy walked off the end of the path.
    EnemyReachedEnd {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Number of lives the escape cost.
        damage: u32,
        /// Lives remaining after the escape.
        lives_remaining: u32,
    },
    /// Confirms that a tower was placed and paid for.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Grid cell the tower occupies.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that an upgrade tier was applied and paid for.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Track that advanced.
        track: UpgradeTrack,
        /// Level of the track after the upgrade.
        level: u8,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower named in the request.
        tower: TowerId,
        /// Track named in the request.
        track: UpgradeTrack,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold and its refund credited.
    TowerSold {
        /// Identifier of the removed tower.
        tower: TowerId,
        /// Currency credited for the sale.
        refund: u32,
    },
    /// Reports that a sell request was rejected.
    TowerSaleRejected {
        /// Identifier of the tower named in the request.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SellError,
    },
    /// Confirms that a tower switched targeting rule.
    TargetingStrategyChanged {
        /// Identifier of the reconfigured tower.
        tower: TowerId,
        /// Strategy now in effect.
        strategy: TargetingStrategy,
    },
    /// Announces the tower selection that resulted from a selection request.
    TowerSelectionChanged {
        /// Newly selected tower, or `None` if the request hit empty ground.
        tower: Option<TowerId>,
    },
    /// Confirms that a tower fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile by the world.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile is tracking.
        target: EnemyId,
        /// Indicates whether the shot rolled a critical hit.
        critical: bool,
    },
    /// Announces that a projectile vanished because its target was gone.
    ProjectileExpired {
        /// Identifier of the expired projectile.
        projectile: ProjectileId,
    },
    /// Announces that a projectile detonated on its target.
    ProjectileImpacted {
        /// Identifier of the detonated projectile.
        projectile: ProjectileId,
        /// Enemies damaged by the impact, splash victims included.
        struck: Vec<EnemyId>,
    },
    /// Announces that the final wave was cleared with lives remaining.
    GameWon,
    /// Announces that the defenders ran out of lives.
    GameOver,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell is not buildable terrain.
    NotBuildable,
    /// The requested cell already hosts a tower.
    Occupied,
    /// The player cannot afford the tower's purchase cost.
    InsufficientFunds,
}

/// Reasons an upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The named track was locked out by the opposite track's completion.
    TrackLocked,
    /// The named track already reached its final tier.
    TrackMaxed,
    /// The player cannot afford the next tier's cost.
    InsufficientFunds,
}

/// Reasons a sell request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SellError {
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Reasons a wave-start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveError {
    /// A wave is still spawning or has live enemies on the path.
    WaveInProgress,
    /// The inter-wave cooldown has not elapsed yet.
    CooldownActive,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Current world-space position.
    pub position: Vec2,
    /// Index of the waypoint the enemy is currently walking toward.
    pub path_index: usize,
    /// Remaining health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Facing angle in radians derived from the movement direction.
    pub facing: f32,
    /// Indicates an active burning effect.
    pub burning: bool,
    /// Indicates an active slow effect.
    pub slowed: bool,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of spawn health, clamped to `[0, 1]`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Upgrade progress of a single track captured inside a tower snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeTrackSnapshot {
    /// Tiers already purchased on this track.
    pub level: u8,
    /// Total tiers the track offers.
    pub tier_count: u8,
    /// Indicates the track was locked out by the opposite track.
    pub locked: bool,
    /// Cost of the next tier, or `0` when no further tier is purchasable.
    pub next_cost: u32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Grid cell the tower occupies.
    pub cell: CellCoord,
    /// World-space center of the tower.
    pub position: Vec2,
    /// Purchase price, the basis for the sell refund.
    pub cost: u32,
    /// Damage per projectile after upgrades.
    pub damage: f32,
    /// Targeting radius in world units after upgrades.
    pub range: f32,
    /// Minimum time between shots after upgrades.
    pub cooldown: Duration,
    /// Splash radius carried by fired projectiles, `0` for single-target.
    pub splash_radius: f32,
    /// Damage multiplier granted to nearby towers (support towers only).
    pub buff_multiplier: f32,
    /// Indicates the tower's projectiles carry a burning payload.
    pub adds_burning: bool,
    /// Indicates the tower rolls for critical hits.
    pub adds_critical: bool,
    /// Indicates an upgrade granted the tower its kind's special ability.
    pub special_ability: bool,
    /// Targeting rule currently in effect.
    pub strategy: TargetingStrategy,
    /// Indicates the tower is selected for range display.
    pub selected: bool,
    /// Upgrade progress of both tracks.
    pub tracks: [UpgradeTrackSnapshot; 2],
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Current world-space position.
    pub position: Vec2,
    /// Heading angle in radians toward the tracked target.
    pub facing: f32,
    /// Enemy the projectile is tracking.
    pub target: EnemyId,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}
