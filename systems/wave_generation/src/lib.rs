#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave composition.
//!
//! Every coefficient of the difficulty curve lives in [`WaveTuning`], so the
//! curve is configuration rather than logic. Composition itself is a pure
//! function of the wave number; only the spawn-order shuffle consumes the
//! caller's RNG, which keeps whole campaigns replayable from one seed.

use std::time::Duration;

use rampart_core::EnemyKind;
use rand::{seq::SliceRandom, Rng};

/// Coefficients of the wave difficulty curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveTuning {
    /// Basic units in the very first wave.
    pub basic_count: u32,
    /// Additional basic units per wave after the first.
    pub basic_growth: u32,
    /// Wave number after which fast units start appearing.
    pub fast_unlock_wave: u32,
    /// Fast units added per wave beyond the unlock wave.
    pub fast_per_wave: u32,
    /// Wave number after which tank units start appearing.
    pub tank_unlock_wave: u32,
    /// Tank units added per wave beyond the unlock wave.
    pub tank_per_wave: u32,
    /// Every Nth wave carries exactly one boss unit.
    pub boss_wave_interval: u32,
    /// Spawn interval of a hypothetical wave zero, in seconds.
    pub spawn_interval_base: f32,
    /// Seconds shaved off the spawn interval per wave number.
    pub spawn_interval_step: f32,
    /// Spawn interval never shrinks below this many seconds.
    pub spawn_interval_floor: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            basic_count: 5,
            basic_growth: 2,
            fast_unlock_wave: 3,
            fast_per_wave: 2,
            tank_unlock_wave: 5,
            tank_per_wave: 1,
            boss_wave_interval: 5,
            spawn_interval_base: 1.0,
            spawn_interval_step: 0.05,
            spawn_interval_floor: 0.5,
        }
    }
}

/// Spawn queue and cadence generated for one wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavePlan {
    spawns: Vec<EnemyKind>,
    spawn_interval: Duration,
}

impl WavePlan {
    /// Enemy kinds in spawn order.
    #[must_use]
    pub fn spawns(&self) -> &[EnemyKind] {
        &self.spawns
    }

    /// Time between consecutive spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Consumes the plan, yielding the spawn queue.
    #[must_use]
    pub fn into_spawns(self) -> Vec<EnemyKind> {
        self.spawns
    }
}

/// Generates the spawn plan for the provided one-indexed wave number.
///
/// The composition is a deterministic function of `wave` and `tuning`; the
/// RNG only shuffles the spawn order for variety.
pub fn generate_wave<R: Rng>(wave: u32, tuning: &WaveTuning, rng: &mut R) -> WavePlan {
    debug_assert!(wave >= 1, "wave numbers are one-indexed");

    let basic = tuning.basic_count + tuning.basic_growth * wave.saturating_sub(1);
    let fast = tuning.fast_per_wave * wave.saturating_sub(tuning.fast_unlock_wave);
    let tank = tuning.tank_per_wave * wave.saturating_sub(tuning.tank_unlock_wave);
    let boss = tuning.boss_wave_interval > 0 && wave % tuning.boss_wave_interval == 0;

    let capacity = (basic + fast + tank) as usize + usize::from(boss);
    let mut spawns = Vec::with_capacity(capacity);
    spawns.extend(std::iter::repeat(EnemyKind::Basic).take(basic as usize));
    spawns.extend(std::iter::repeat(EnemyKind::Fast).take(fast as usize));
    spawns.extend(std::iter::repeat(EnemyKind::Tank).take(tank as usize));
    if boss {
        spawns.push(EnemyKind::Boss);
    }

    spawns.shuffle(rng);

    WavePlan {
        spawns,
        spawn_interval: spawn_interval_for(wave, tuning),
    }
}

/// Spawn interval for the provided wave, clamped to the configured floor.
#[must_use]
pub fn spawn_interval_for(wave: u32, tuning: &WaveTuning) -> Duration {
    let shrunk = tuning.spawn_interval_base - tuning.spawn_interval_step * wave as f32;
    Duration::from_secs_f32(shrunk.max(tuning.spawn_interval_floor))
}
