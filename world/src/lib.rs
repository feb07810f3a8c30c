#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rampart.
//!
//! The world owns every live enemy, tower, and projectile. Adapters mutate it
//! exclusively through [`apply`] and observe it exclusively through the
//! [`query`] module. One [`Command::Tick`] runs the complete frame pipeline
//! in fixed order: wave spawning, enemy status effects and movement, tower
//! targeting and firing, projectile flight and impact resolution, economy and
//! life reconciliation, and finally the end-condition check. Entity removal
//! is deferred to the reconciliation phase, so no collection is mutated while
//! it is being traversed.

mod economy;
mod enemies;
mod projectiles;
mod towers;
mod waves;

use std::collections::BTreeMap;
use std::time::Duration;

use glam::Vec2;
use rampart_core::{
    Catalog, CellCoord, Command, EnemyId, Event, GameRules, MapLayout, PlacementError,
    ProjectileId, SellError, TargetingStrategy, TowerId, TowerKind, UpgradeTrack, WaveError,
};
use rampart_system_targeting::{TargetCandidate, TargetSelector};
use rampart_system_wave_generation::{generate_wave, WaveTuning};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use economy::Economy;
use enemies::Enemy;
use projectiles::{splash_damage, BurningPayload, Projectile};
use towers::Tower;
use waves::WaveScheduler;

/// Maximum distance between a selection request and a tower center.
const SELECTION_RADIUS: f32 = 40.0;

/// Damage per second of an un-upgraded burning payload.
const BURNING_BASE_DPS: f32 = 5.0;

/// Seconds a burning payload keeps dealing damage after impact.
const BURNING_DURATION: f32 = 3.0;

/// Speed factor a fully upgraded support tower's aura imposes on enemies.
const SUPPORT_SLOW_FACTOR: f32 = 0.5;

/// Seconds the support aura's slow persists after leaving the radius.
const SUPPORT_SLOW_DURATION: f32 = 1.0;

/// Configuration consumed once when constructing a [`World`].
///
/// The world holds no global state: everything it needs arrives here. The
/// catalog is expected to have passed [`Catalog::validate`] beforehand.
#[derive(Clone, Debug, Default)]
pub struct WorldConfig {
    /// Static tower and enemy type catalog.
    pub catalog: Catalog,
    /// Enemy path and buildable terrain.
    pub layout: MapLayout,
    /// Session rules: starting funds, lives, wave count, cooldown, RNG seed.
    pub rules: GameRules,
    /// Difficulty-curve coefficients for wave composition.
    pub tuning: WaveTuning,
}

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    catalog: Catalog,
    layout: MapLayout,
    tuning: WaveTuning,
    total_waves: u32,
    clock: Duration,
    lives: u32,
    economy: Economy,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: u32,
    towers: BTreeMap<TowerId, Tower>,
    next_tower_id: u32,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: u32,
    scheduler: WaveScheduler,
    selector: TargetSelector,
    candidates: Vec<TargetCandidate>,
    rng: ChaCha8Rng,
    selected: Option<TowerId>,
    game_over: bool,
    game_won: bool,
}

impl World {
    /// Creates a new world ready for simulation.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let WorldConfig {
            catalog,
            layout,
            rules,
            tuning,
        } = config;

        Self {
            total_waves: rules.total_waves,
            clock: Duration::ZERO,
            lives: rules.starting_lives,
            economy: Economy::new(rules.starting_balance),
            enemies: BTreeMap::new(),
            next_enemy_id: 0,
            towers: BTreeMap::new(),
            next_tower_id: 0,
            projectiles: BTreeMap::new(),
            next_projectile_id: 0,
            scheduler: WaveScheduler::new(Duration::from_secs_f32(rules.wave_cooldown.max(0.0))),
            selector: TargetSelector::new(),
            candidates: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(rules.seed),
            selected: None,
            game_over: false,
            game_won: false,
            catalog,
            layout,
            tuning,
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });
        let dt_seconds = dt.as_secs_f32();

        self.spawn_due_enemy(out_events);
        self.update_enemies(dt_seconds);
        self.update_towers(out_events);
        self.update_projectiles(dt_seconds, out_events);
        self.reconcile(out_events);
        self.check_end_conditions(out_events);
    }

    fn spawn_due_enemy(&mut self, out_events: &mut Vec<Event>) {
        if let Some(kind) = self.scheduler.pop_due(self.clock) {
            let spec = *self.catalog.enemy(kind);
            let id = EnemyId::new(self.next_enemy_id);
            self.next_enemy_id += 1;
            let start = self.layout.waypoints()[0];
            let _ = self
                .enemies
                .insert(id, Enemy::from_spec(id, kind, &spec, start));
            out_events.push(Event::EnemySpawned { enemy: id, kind });
        }
    }

    fn update_enemies(&mut self, dt_seconds: f32) {
        let waypoints = self.layout.waypoints();
        for enemy in self.enemies.values_mut() {
            enemy.update(dt_seconds, waypoints);
        }
    }

    fn update_towers(&mut self, out_events: &mut Vec<Event>) {
        self.candidates.clear();
        for enemy in self.enemies.values() {
            if enemy.alive {
                self.candidates.push(TargetCandidate {
                    id: enemy.id,
                    position: enemy.position,
                    path_index: enemy.path_index,
                });
            }
        }

        // Support auras are resolved against the pre-fire tower set so a
        // tower sold or upgraded mid-tick cannot skew another tower's shot.
        let mut buffs: Vec<(TowerId, f32)> = Vec::with_capacity(self.towers.len());
        for (id, tower) in &self.towers {
            if tower.kind == TowerKind::Support {
                continue;
            }
            let mut strongest = 1.0_f32;
            for support in self.towers.values() {
                if support.kind == TowerKind::Support
                    && support.position.distance(tower.position) <= support.range
                {
                    strongest = strongest.max(support.buff_multiplier);
                }
            }
            buffs.push((*id, strongest));
        }

        for (tower_id, tower) in self.towers.iter_mut() {
            if tower.kind == TowerKind::Support {
                // The ultimate support upgrade projects a slowing field.
                if tower.special_ability {
                    for enemy in self.enemies.values_mut() {
                        if enemy.alive && tower.position.distance(enemy.position) <= tower.range {
                            enemy.apply_slow(SUPPORT_SLOW_FACTOR, SUPPORT_SLOW_DURATION);
                        }
                    }
                }
                continue;
            }

            let target_valid = tower
                .target
                .and_then(|id| self.enemies.get(&id))
                .map_or(false, |enemy| {
                    enemy.alive && tower.position.distance(enemy.position) <= tower.range
                });
            if !target_valid {
                tower.target = self.selector.select(
                    tower.position,
                    tower.range,
                    tower.strategy,
                    &self.candidates,
                    &mut self.rng,
                );
            }

            let Some(target_id) = tower.target else {
                continue;
            };
            let Some(target) = self.enemies.get(&target_id) else {
                continue;
            };
            if !tower.ready_to_fire(self.clock) {
                continue;
            }

            let buff = buffs
                .iter()
                .find(|(id, _)| id == tower_id)
                .map_or(1.0, |(_, strongest)| *strongest);
            let mut damage = tower.damage * buff;
            let mut critical = false;
            if tower.adds_critical && self.rng.gen::<f32>() < tower.critical_chance {
                damage *= 2.0;
                critical = true;
            }

            let burning = if tower.adds_burning {
                Some(BurningPayload {
                    damage_per_second: BURNING_BASE_DPS * tower.burning_damage_multiplier,
                    duration: BURNING_DURATION,
                })
            } else {
                None
            };

            let projectile_id = ProjectileId::new(self.next_projectile_id);
            self.next_projectile_id += 1;
            let projectile = Projectile::new(
                projectile_id,
                tower.position,
                target.position,
                target_id,
                damage,
                tower.splash_radius,
                burning,
            );
            let _ = self.projectiles.insert(projectile_id, projectile);
            tower.last_shot = Some(self.clock);
            out_events.push(Event::ProjectileFired {
                projectile: projectile_id,
                tower: *tower_id,
                target: target_id,
                critical,
            });
        }
    }

    fn update_projectiles(&mut self, dt_seconds: f32, out_events: &mut Vec<Event>) {
        for (projectile_id, projectile) in self.projectiles.iter_mut() {
            if !projectile.alive {
                continue;
            }

            let target_position = match self.enemies.get(&projectile.target) {
                Some(enemy) if enemy.alive => enemy.position,
                _ => {
                    projectile.expire();
                    out_events.push(Event::ProjectileExpired {
                        projectile: *projectile_id,
                    });
                    continue;
                }
            };

            if !projectile.advance(dt_seconds, target_position) {
                continue;
            }
            projectile.expire();

            let mut struck = Vec::new();
            if projectile.splash_radius > 0.0 {
                for enemy in self.enemies.values_mut() {
                    if !enemy.alive {
                        continue;
                    }
                    let distance = target_position.distance(enemy.position);
                    if distance > projectile.splash_radius {
                        continue;
                    }
                    let _ = enemy.take_damage(splash_damage(
                        projectile.damage,
                        distance,
                        projectile.splash_radius,
                    ));
                    if let Some(payload) = projectile.burning {
                        enemy.apply_burning(payload.damage_per_second, payload.duration);
                    }
                    struck.push(enemy.id);
                }
            } else if let Some(enemy) = self.enemies.get_mut(&projectile.target) {
                if enemy.alive {
                    let _ = enemy.take_damage(projectile.damage);
                    if let Some(payload) = projectile.burning {
                        enemy.apply_burning(payload.damage_per_second, payload.duration);
                    }
                    struck.push(enemy.id);
                }
            }

            out_events.push(Event::ProjectileImpacted {
                projectile: *projectile_id,
                struck,
            });
        }
    }

    fn reconcile(&mut self, out_events: &mut Vec<Event>) {
        let settled: Vec<EnemyId> = self
            .enemies
            .values()
            .filter(|enemy| !enemy.alive)
            .map(|enemy| enemy.id)
            .collect();

        for id in settled {
            let Some(enemy) = self.enemies.remove(&id) else {
                continue;
            };
            if enemy.reached_end {
                self.lives = self.lives.saturating_sub(enemy.damage);
                out_events.push(Event::EnemyReachedEnd {
                    enemy: id,
                    damage: enemy.damage,
                    lives_remaining: self.lives,
                });
            } else {
                self.economy.credit(enemy.reward);
                out_events.push(Event::EnemyDied {
                    enemy: id,
                    reward: enemy.reward,
                });
            }
        }

        self.projectiles.retain(|_, projectile| projectile.alive);
    }

    fn check_end_conditions(&mut self, out_events: &mut Vec<Event>) {
        if self.lives == 0 {
            self.game_over = true;
            out_events.push(Event::GameOver);
            return;
        }

        if self.scheduler.complete_if_clear(self.clock, self.enemies.len()) {
            let wave = self.scheduler.current_wave();
            out_events.push(Event::WaveCompleted { wave });
            if wave >= self.total_waves {
                self.game_won = true;
                out_events.push(Event::GameWon);
            }
        }
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        if !self.scheduler.can_start(self.clock) {
            let reason = if self.scheduler.wave_in_progress() {
                WaveError::WaveInProgress
            } else {
                WaveError::CooldownActive
            };
            out_events.push(Event::WaveRejected { reason });
            return;
        }

        let plan = generate_wave(
            self.scheduler.current_wave() + 1,
            &self.tuning,
            &mut self.rng,
        );
        let wave = self.scheduler.start(self.clock, plan);
        out_events.push(Event::WaveStarted { wave });
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        let reject = |reason: PlacementError| Event::TowerPlacementRejected { kind, cell, reason };

        if !self.layout.is_buildable(cell) {
            out_events.push(reject(PlacementError::NotBuildable));
            return;
        }
        if self.towers.values().any(|tower| tower.cell == cell) {
            out_events.push(reject(PlacementError::Occupied));
            return;
        }
        let cost = self.catalog.tower(kind).cost;
        if !self.economy.try_spend(cost) {
            out_events.push(reject(PlacementError::InsufficientFunds));
            return;
        }

        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id += 1;
        let position = self.layout.cell_center(cell);
        let tower = Tower::from_spec(id, kind, cell, position, self.catalog.tower(kind));
        let _ = self.towers.insert(id, tower);
        out_events.push(Event::TowerPlaced {
            tower: id,
            kind,
            cell,
        });
    }

    fn upgrade_tower(&mut self, tower_id: TowerId, track: UpgradeTrack, out_events: &mut Vec<Event>) {
        let reject = |reason| Event::TowerUpgradeRejected {
            tower: tower_id,
            track,
            reason,
        };

        let Some(tower) = self.towers.get_mut(&tower_id) else {
            out_events.push(reject(rampart_core::UpgradeError::MissingTower));
            return;
        };
        let cost = match tower.upgrade_availability(track) {
            Ok(cost) => cost,
            Err(reason) => {
                out_events.push(reject(reason));
                return;
            }
        };
        if !self.economy.try_spend(cost) {
            out_events.push(reject(rampart_core::UpgradeError::InsufficientFunds));
            return;
        }

        let level = tower.apply_upgrade(track);
        out_events.push(Event::TowerUpgraded {
            tower: tower_id,
            track,
            level,
        });
    }

    fn sell_tower(&mut self, tower_id: TowerId, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.remove(&tower_id) else {
            out_events.push(Event::TowerSaleRejected {
                tower: tower_id,
                reason: SellError::MissingTower,
            });
            return;
        };

        let refund = tower.cost / 2;
        self.economy.credit(refund);
        if self.selected == Some(tower_id) {
            self.selected = None;
        }
        out_events.push(Event::TowerSold {
            tower: tower_id,
            refund,
        });
    }

    fn set_strategy(
        &mut self,
        tower_id: TowerId,
        strategy: TargetingStrategy,
        out_events: &mut Vec<Event>,
    ) {
        // A stale tower reference degrades to a no-op.
        let Some(tower) = self.towers.get_mut(&tower_id) else {
            return;
        };
        tower.strategy = strategy;
        tower.target = None;
        out_events.push(Event::TargetingStrategyChanged {
            tower: tower_id,
            strategy,
        });
    }

    fn select_tower_at(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let mut best: Option<(TowerId, f32)> = None;
        for (id, tower) in &self.towers {
            let distance = tower.position.distance(position);
            if distance < SELECTION_RADIUS && best.map_or(true, |(_, nearest)| distance < nearest) {
                best = Some((*id, distance));
            }
        }

        for tower in self.towers.values_mut() {
            tower.selected = false;
        }
        self.selected = best.map(|(id, _)| id);
        if let Some(id) = self.selected {
            if let Some(tower) = self.towers.get_mut(&id) {
                tower.selected = true;
            }
        }
        out_events.push(Event::TowerSelectionChanged {
            tower: self.selected,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the session reaches a terminal state (win or loss), `Tick` and
/// `StartWave` become silent no-ops; the remaining commands keep working so
/// an adapter can still inspect and clean up.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let terminal = world.game_over || world.game_won;
    match command {
        Command::Tick { dt } => {
            if !terminal {
                world.tick(dt, out_events);
            }
        }
        Command::StartWave => {
            if !terminal {
                world.start_wave(out_events);
            }
        }
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::UpgradeTower { tower, track } => world.upgrade_tower(tower, track, out_events),
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::SetTargetingStrategy { tower, strategy } => {
            world.set_strategy(tower, strategy, out_events);
        }
        Command::SelectTowerAt { position } => world.select_tower_at(position, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use rampart_core::{
        EnemyView, ProjectileView, TowerId, TowerView, UpgradeTrack,
    };

    use super::{World, SELECTION_RADIUS};

    /// Current currency balance.
    #[must_use]
    pub fn balance(world: &World) -> u32 {
        world.economy.balance()
    }

    /// Lives remaining before the session is lost.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Simulated time elapsed since the session began.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// One-indexed number of the most recently started wave, `0` before any.
    #[must_use]
    pub fn wave_number(world: &World) -> u32 {
        world.scheduler.current_wave()
    }

    /// Whether a wave is currently spawning or has enemies on the path.
    #[must_use]
    pub fn wave_in_progress(world: &World) -> bool {
        world.scheduler.wave_in_progress()
    }

    /// Enemies still to be dealt with: alive on the path plus queued spawns.
    #[must_use]
    pub fn enemies_remaining(world: &World) -> usize {
        world.enemies.values().filter(|enemy| enemy.alive).count() + world.scheduler.pending()
    }

    /// Seconds until the next wave may start, `0` once it is startable.
    #[must_use]
    pub fn cooldown_remaining(world: &World) -> Duration {
        world.scheduler.cooldown_remaining(world.clock)
    }

    /// Whether a `StartWave` command would currently be accepted.
    #[must_use]
    pub fn can_start_wave(world: &World) -> bool {
        !world.game_over && !world.game_won && world.scheduler.can_start(world.clock)
    }

    /// Whether the defenders ran out of lives.
    #[must_use]
    pub fn game_over(world: &World) -> bool {
        world.game_over
    }

    /// Whether the final wave was cleared with lives remaining.
    #[must_use]
    pub fn game_won(world: &World) -> bool {
        world.game_won
    }

    /// Captures a read-only view of all live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .values()
                .filter(|enemy| enemy.alive)
                .map(super::Enemy::snapshot)
                .collect(),
        )
    }

    /// Captures a read-only view of all placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.values().map(super::Tower::snapshot).collect())
    }

    /// Captures a read-only view of all projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .values()
                .filter(|projectile| projectile.alive)
                .map(super::Projectile::snapshot)
                .collect(),
        )
    }

    /// Tower nearest to `position` within the selection radius, if any.
    #[must_use]
    pub fn tower_at(world: &World, position: Vec2) -> Option<TowerId> {
        let mut best: Option<(TowerId, f32)> = None;
        for (id, tower) in &world.towers {
            let distance = tower.position.distance(position);
            if distance < SELECTION_RADIUS && best.map_or(true, |(_, nearest)| distance < nearest) {
                best = Some((*id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Tower currently selected for range display, if any.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<TowerId> {
        world.selected
    }

    /// Cost of a tower's next tier on the named track, `0` when the track is
    /// missing, maxed, or locked — or the tower itself is gone.
    #[must_use]
    pub fn upgrade_cost(world: &World, tower: TowerId, track: UpgradeTrack) -> u32 {
        world
            .towers
            .get(&tower)
            .map_or(0, |tower| tower.upgrade_cost(track))
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, World, WorldConfig};
    use glam::Vec2;
    use rampart_core::{
        CellCoord, Command, Event, PlacementError, SellError, TargetingStrategy, TowerId,
        TowerKind, UpgradeError, UpgradeTrack, WaveError,
    };
    use std::time::Duration;

    fn world() -> World {
        World::new(WorldConfig::default())
    }

    fn world_with_balance(balance: u32) -> World {
        let mut config = WorldConfig::default();
        config.rules.starting_balance = balance;
        World::new(config)
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn buildable_cell() -> CellCoord {
        CellCoord::new(0, 0)
    }

    #[test]
    fn placing_a_tower_deducts_its_cost() {
        let mut world = world();
        let events = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: buildable_cell(),
            },
        );

        assert_eq!(query::balance(&world), 400);
        assert!(matches!(events.as_slice(), [Event::TowerPlaced { .. }]));
        assert_eq!(query::tower_view(&world).into_vec().len(), 1);
    }

    #[test]
    fn placement_on_the_path_is_rejected() {
        let mut world = world();
        let events = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: CellCoord::new(0, 4),
            },
        );

        assert_eq!(query::balance(&world), 500);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::NotBuildable,
                ..
            }]
        ));
    }

    #[test]
    fn placement_on_an_occupied_cell_is_rejected() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: buildable_cell(),
            },
        );
        let events = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Sniper,
                cell: buildable_cell(),
            },
        );

        assert_eq!(query::balance(&world), 400);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::Occupied,
                ..
            }]
        ));
    }

    #[test]
    fn unaffordable_towers_leave_the_balance_unchanged() {
        let mut world = world_with_balance(50);
        let events = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: buildable_cell(),
            },
        );

        assert_eq!(query::balance(&world), 50);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::InsufficientFunds,
                ..
            }]
        ));
    }

    #[test]
    fn selling_refunds_half_the_purchase_price() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: buildable_cell(),
            },
        );

        let events = run(
            &mut world,
            Command::SellTower {
                tower: TowerId::new(0),
            },
        );

        assert_eq!(query::balance(&world), 450);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerSold { refund: 50, .. }]
        ));
        assert!(query::tower_view(&world).into_vec().is_empty());
    }

    #[test]
    fn selling_a_missing_tower_is_rejected_without_panicking() {
        let mut world = world();
        let events = run(
            &mut world,
            Command::SellTower {
                tower: TowerId::new(99),
            },
        );

        assert!(matches!(
            events.as_slice(),
            [Event::TowerSaleRejected {
                reason: SellError::MissingTower,
                ..
            }]
        ));
    }

    #[test]
    fn upgrading_deducts_the_tier_cost() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: buildable_cell(),
            },
        );

        let events = run(
            &mut world,
            Command::UpgradeTower {
                tower: TowerId::new(0),
                track: UpgradeTrack::Primary,
            },
        );

        assert_eq!(query::balance(&world), 250);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerUpgraded { level: 1, .. }]
        ));

        let snapshot = query::tower_view(&world).into_vec()[0];
        assert_eq!(snapshot.cooldown, Duration::from_secs_f32(1.0).mul_f32(0.8));
        assert_eq!(snapshot.tracks[0].level, 1);
        assert_eq!(snapshot.tracks[0].next_cost, 300);
    }

    #[test]
    fn upgrading_a_stale_reference_is_rejected_without_panicking() {
        let mut world = world();
        let events = run(
            &mut world,
            Command::UpgradeTower {
                tower: TowerId::new(7),
                track: UpgradeTrack::Primary,
            },
        );

        assert!(matches!(
            events.as_slice(),
            [Event::TowerUpgradeRejected {
                reason: UpgradeError::MissingTower,
                ..
            }]
        ));
    }

    #[test]
    fn unaffordable_upgrades_are_rejected_atomically() {
        let mut world = world_with_balance(100);
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: buildable_cell(),
            },
        );
        assert_eq!(query::balance(&world), 0);

        let events = run(
            &mut world,
            Command::UpgradeTower {
                tower: TowerId::new(0),
                track: UpgradeTrack::Primary,
            },
        );

        assert_eq!(query::balance(&world), 0);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerUpgradeRejected {
                reason: UpgradeError::InsufficientFunds,
                ..
            }]
        ));
    }

    #[test]
    fn completing_one_track_locks_the_other_through_the_command_surface() {
        let mut world = world_with_balance(5_000);
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: buildable_cell(),
            },
        );

        for _ in 0..3 {
            let _ = run(
                &mut world,
                Command::UpgradeTower {
                    tower: TowerId::new(0),
                    track: UpgradeTrack::Primary,
                },
            );
        }

        let events = run(
            &mut world,
            Command::UpgradeTower {
                tower: TowerId::new(0),
                track: UpgradeTrack::Secondary,
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerUpgradeRejected {
                reason: UpgradeError::TrackLocked,
                ..
            }]
        ));

        let snapshot = query::tower_view(&world).into_vec()[0];
        assert!(snapshot.tracks[1].locked);
        assert_eq!(snapshot.tracks[1].next_cost, 0);
        assert_eq!(
            query::upgrade_cost(&world, TowerId::new(0), UpgradeTrack::Secondary),
            0
        );
    }

    #[test]
    fn strategy_changes_apply_and_stale_references_are_ignored() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: buildable_cell(),
            },
        );

        let events = run(
            &mut world,
            Command::SetTargetingStrategy {
                tower: TowerId::new(0),
                strategy: TargetingStrategy::First,
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TargetingStrategyChanged {
                strategy: TargetingStrategy::First,
                ..
            }]
        ));

        let events = run(
            &mut world,
            Command::SetTargetingStrategy {
                tower: TowerId::new(55),
                strategy: TargetingStrategy::Random,
            },
        );
        assert!(events.is_empty());
    }

    #[test]
    fn selection_picks_the_nearest_tower_within_the_radius() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: CellCoord::new(0, 0),
            },
        );
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: CellCoord::new(5, 0),
            },
        );

        let near_second = Vec2::new(5.0 * 64.0 + 40.0, 30.0);
        let events = run(&mut world, Command::SelectTowerAt { position: near_second });
        assert!(matches!(
            events.as_slice(),
            [Event::TowerSelectionChanged {
                tower: Some(tower)
            }] if tower.get() == 1
        ));
        assert_eq!(query::selected_tower(&world), Some(TowerId::new(1)));

        let snapshot = query::tower_view(&world).into_vec();
        assert!(!snapshot[0].selected);
        assert!(snapshot[1].selected);

        let events = run(
            &mut world,
            Command::SelectTowerAt {
                position: Vec2::new(10_000.0, 10_000.0),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerSelectionChanged { tower: None }]
        ));
        assert_eq!(query::selected_tower(&world), None);
    }

    #[test]
    fn starting_a_wave_twice_is_rejected() {
        let mut world = world();
        let events = run(&mut world, Command::StartWave);
        assert!(matches!(events.as_slice(), [Event::WaveStarted { wave: 1 }]));
        assert_eq!(query::wave_number(&world), 1);

        let events = run(&mut world, Command::StartWave);
        assert!(matches!(
            events.as_slice(),
            [Event::WaveRejected {
                reason: WaveError::WaveInProgress
            }]
        ));
    }

    #[test]
    fn ticks_spawn_enemies_from_the_queue() {
        let mut world = world();
        let _ = run(&mut world, Command::StartWave);

        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
        );

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EnemySpawned { .. })));
        assert_eq!(query::enemy_view(&world).into_vec().len(), 1);
        assert_eq!(query::enemies_remaining(&world), 5);
    }

    #[test]
    fn equal_seeds_replay_identical_sessions() {
        let script = |world: &mut World| {
            let mut log = Vec::new();
            apply(world, Command::StartWave, &mut log);
            for _ in 0..200 {
                apply(
                    world,
                    Command::Tick {
                        dt: Duration::from_millis(50),
                    },
                    &mut log,
                );
            }
            log
        };

        let mut first = world();
        let mut second = world();
        assert_eq!(script(&mut first), script(&mut second));
        assert_eq!(
            query::enemy_view(&first).into_vec(),
            query::enemy_view(&second).into_vec()
        );
        assert_eq!(query::balance(&first), query::balance(&second));
    }

    #[test]
    fn lost_lives_end_the_session_and_freeze_the_clock() {
        let mut config = WorldConfig::default();
        config.rules.starting_lives = 1;
        config.tuning.basic_count = 1;
        config.tuning.basic_growth = 0;
        let mut world = World::new(config);

        let _ = run(&mut world, Command::StartWave);
        let mut saw_game_over = false;
        for _ in 0..2_000 {
            let events = run(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(50),
                },
            );
            if events.iter().any(|event| matches!(event, Event::GameOver)) {
                saw_game_over = true;
                break;
            }
        }

        assert!(saw_game_over, "the unopposed enemy never leaked");
        assert!(query::game_over(&world));
        assert_eq!(query::lives(&world), 0);

        let clock = query::clock(&world);
        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
        );
        assert!(events.is_empty());
        assert_eq!(query::clock(&world), clock);
    }
}
