#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Rampart session.
//!
//! The runner drives the simulation with a fixed tick, a greedy build order,
//! and automatic wave starts, then reports how the defence went. It exists to
//! exercise the full command surface without any rendering layer.

mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rampart_core::{CellCoord, Command, Event, MapLayout, TowerKind, UpgradeTrack};
use rampart_system_wave_generation::WaveTuning;
use rampart_world::{apply, query, World, WorldConfig};

/// Towers the autoplayer will build before switching to upgrades.
const MAX_TOWERS: usize = 12;

/// Arguments accepted by the headless runner.
#[derive(Debug, Parser)]
#[command(name = "rampart", about = "Headless Rampart tower-defence session")]
struct Args {
    /// Path to an optional TOML file with catalog and rule overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the RNG seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the number of waves to survive.
    #[arg(long)]
    waves: Option<u32>,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
    /// Hard cap on simulated ticks before the session is abandoned.
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = match &args.config {
        Some(path) => {
            config::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => config::ConfigFile::default(),
    };

    let mut rules = file.rules;
    if let Some(seed) = args.seed {
        rules.seed = seed;
    }
    if let Some(waves) = args.waves {
        rules.total_waves = waves;
    }

    let layout = MapLayout::default();
    let mut world = World::new(WorldConfig {
        catalog: file.catalog,
        layout: layout.clone(),
        rules,
        tuning: WaveTuning::default(),
    });

    println!(
        "rampart: surviving {} waves (seed {:#x})",
        rules.total_waves, rules.seed
    );

    let dt = Duration::from_millis(args.tick_ms.max(1));
    run(&mut world, &layout, dt, args.max_ticks);
    report(&world);
    Ok(())
}

fn run(world: &mut World, layout: &MapLayout, dt: Duration, max_ticks: u64) {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        build_defences(world, layout, &mut events);
        if query::can_start_wave(world) {
            apply(world, Command::StartWave, &mut events);
        }
        apply(world, Command::Tick { dt }, &mut events);

        for event in events.drain(..) {
            narrate(&event);
        }
        if query::game_over(world) || query::game_won(world) {
            break;
        }
    }
}

/// Greedy build order: fill free buildable cells with basic towers while the
/// balance allows, then sink spare funds into the primary upgrade track.
fn build_defences(world: &mut World, layout: &MapLayout, events: &mut Vec<Event>) {
    let towers = query::tower_view(world).into_vec();

    if towers.len() < MAX_TOWERS {
        let occupied: Vec<CellCoord> = towers.iter().map(|tower| tower.cell).collect();
        if let Some(cell) = best_build_site(layout, &occupied) {
            let before = events.len();
            apply(
                world,
                Command::PlaceTower {
                    kind: TowerKind::Basic,
                    cell,
                },
                events,
            );
            let placed = events[before..]
                .iter()
                .any(|event| matches!(event, Event::TowerPlaced { .. }));
            if placed {
                return;
            }
            // Unaffordable right now; drop the rejection instead of spamming
            // the narration every tick.
            events.truncate(before);
        }
    }

    for tower in &towers {
        let cost = query::upgrade_cost(world, tower.id, UpgradeTrack::Primary);
        if cost == 0 || cost > query::balance(world) {
            continue;
        }
        apply(
            world,
            Command::UpgradeTower {
                tower: tower.id,
                track: UpgradeTrack::Primary,
            },
            events,
        );
        return;
    }
}

/// Free buildable cell closest to the enemy path, so every tower bought
/// actually covers traffic.
fn best_build_site(layout: &MapLayout, occupied: &[CellCoord]) -> Option<CellCoord> {
    let mut best: Option<(CellCoord, f32)> = None;
    for cell in layout.buildable_cells() {
        if occupied.contains(&cell) {
            continue;
        }
        let center = layout.cell_center(cell);
        let distance = layout
            .waypoints()
            .windows(2)
            .map(|pair| rampart_core::geometry::point_segment_distance(center, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min);
        if best.map_or(true, |(_, nearest)| distance < nearest) {
            best = Some((cell, distance));
        }
    }
    best.map(|(cell, _)| cell)
}

fn narrate(event: &Event) {
    match event {
        Event::WaveStarted { wave } => log::info!("wave {wave} started"),
        Event::WaveCompleted { wave } => log::info!("wave {wave} cleared"),
        Event::TowerPlaced { tower, kind, cell } => log::info!(
            "placed {kind:?} tower #{} at ({}, {})",
            tower.get(),
            cell.column(),
            cell.row()
        ),
        Event::TowerUpgraded { tower, track, level } => {
            log::info!("tower #{} upgraded ({track:?} tier {level})", tower.get());
        }
        Event::EnemyDied { enemy, reward } => {
            log::debug!("enemy #{} down, +{reward} bounty", enemy.get());
        }
        Event::EnemyReachedEnd {
            enemy,
            lives_remaining,
            ..
        } => {
            log::warn!(
                "enemy #{} broke through, {lives_remaining} lives left",
                enemy.get()
            );
        }
        Event::GameWon => log::info!("all waves cleared"),
        Event::GameOver => log::warn!("the defence collapsed"),
        _ => {}
    }
}

fn report(world: &World) {
    let outcome = if query::game_won(world) {
        "victory"
    } else if query::game_over(world) {
        "defeat"
    } else {
        "abandoned"
    };

    println!(
        "{outcome} after {:.1}s simulated: wave {}, {} lives, {} gold",
        query::clock(world).as_secs_f32(),
        query::wave_number(world),
        query::lives(world),
        query::balance(world)
    );
}
