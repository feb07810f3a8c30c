//! Wave scheduler state machine: cooldown, spawning, completion.

use std::collections::VecDeque;
use std::time::Duration;

use rampart_core::EnemyKind;
use rampart_system_wave_generation::WavePlan;

/// Tracks the active wave's spawn queue and the cooldown between waves.
///
/// A wave completes only when its queue is drained and no spawned enemy
/// remains on the path; the scheduler then rests for the cooldown duration
/// before the next wave may start. Wave one is exempt from the cooldown gate.
#[derive(Debug)]
pub(crate) struct WaveScheduler {
    current_wave: u32,
    pending: VecDeque<EnemyKind>,
    spawn_interval: Duration,
    next_spawn_at: Duration,
    wave_in_progress: bool,
    cooldown_start: Duration,
    cooldown: Duration,
}

impl WaveScheduler {
    pub(crate) fn new(cooldown: Duration) -> Self {
        Self {
            current_wave: 0,
            pending: VecDeque::new(),
            spawn_interval: Duration::ZERO,
            next_spawn_at: Duration::ZERO,
            wave_in_progress: false,
            cooldown_start: Duration::ZERO,
            cooldown,
        }
    }

    pub(crate) const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub(crate) const fn wave_in_progress(&self) -> bool {
        self.wave_in_progress
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn can_start(&self, now: Duration) -> bool {
        if self.wave_in_progress {
            return false;
        }
        if self.current_wave == 0 {
            return true;
        }
        now.saturating_sub(self.cooldown_start) >= self.cooldown
    }

    /// Begins the next wave, returning its one-indexed number.
    pub(crate) fn start(&mut self, now: Duration, plan: WavePlan) -> u32 {
        debug_assert!(self.can_start(now));

        self.current_wave += 1;
        self.spawn_interval = plan.spawn_interval();
        self.pending = plan.into_spawns().into();
        self.wave_in_progress = true;
        self.next_spawn_at = now;
        self.current_wave
    }

    /// Pops one queued spawn when its due time has arrived.
    pub(crate) fn pop_due(&mut self, now: Duration) -> Option<EnemyKind> {
        if !self.wave_in_progress || now < self.next_spawn_at {
            return None;
        }
        let kind = self.pending.pop_front()?;
        self.next_spawn_at = now + self.spawn_interval;
        Some(kind)
    }

    /// Transitions to cooldown once the queue is drained and the path is
    /// clear, reporting whether a wave just completed.
    pub(crate) fn complete_if_clear(&mut self, now: Duration, live_enemies: usize) -> bool {
        if self.wave_in_progress && self.pending.is_empty() && live_enemies == 0 {
            self.wave_in_progress = false;
            self.cooldown_start = now;
            return true;
        }
        false
    }

    pub(crate) fn cooldown_remaining(&self, now: Duration) -> Duration {
        if self.wave_in_progress || self.current_wave == 0 {
            return Duration::ZERO;
        }
        self.cooldown
            .saturating_sub(now.saturating_sub(self.cooldown_start))
    }
}
