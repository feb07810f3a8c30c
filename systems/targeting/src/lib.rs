#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects tower targets from enemy candidates.
//!
//! Selection is deterministic for every strategy except [`TargetingStrategy::Random`]:
//! ties are broken by enemy identifier, so equal simulations produce equal
//! target assignments. The random strategy draws from the caller's RNG, which
//! keeps the whole simulation replayable from a single seed.

use glam::Vec2;
use rampart_core::{EnemyId, TargetingStrategy};
use rand::Rng;

/// One enemy offered to the selector as a potential target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Identifier of the candidate enemy.
    pub id: EnemyId,
    /// Current world-space position of the enemy.
    pub position: Vec2,
    /// Index of the waypoint the enemy is walking toward; higher means
    /// further along the path.
    pub path_index: usize,
}

/// Target selector that reuses a scratch buffer to avoid per-tick allocations.
#[derive(Debug, Default)]
pub struct TargetSelector {
    in_range: Vec<RangedCandidate>,
}

impl TargetSelector {
    /// Creates a new selector with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks a target for a tower at `origin` with the given `range`.
    ///
    /// Candidates outside the range are never selected; an empty in-range set
    /// yields `None` regardless of strategy.
    pub fn select<R: Rng>(
        &mut self,
        origin: Vec2,
        range: f32,
        strategy: TargetingStrategy,
        candidates: &[TargetCandidate],
        rng: &mut R,
    ) -> Option<EnemyId> {
        self.in_range.clear();
        for candidate in candidates {
            let distance = origin.distance(candidate.position);
            if distance <= range {
                self.in_range.push(RangedCandidate {
                    id: candidate.id,
                    distance,
                    path_index: candidate.path_index,
                });
            }
        }

        if self.in_range.is_empty() {
            return None;
        }

        let chosen = match strategy {
            TargetingStrategy::Closest => best_by(&self.in_range, RangedCandidate::is_closer),
            TargetingStrategy::First => best_by(&self.in_range, RangedCandidate::is_further_along),
            TargetingStrategy::Last => best_by(&self.in_range, RangedCandidate::is_least_along),
            TargetingStrategy::Random => {
                let index = rng.gen_range(0..self.in_range.len());
                &self.in_range[index]
            }
        };

        Some(chosen.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct RangedCandidate {
    id: EnemyId,
    distance: f32,
    path_index: usize,
}

impl RangedCandidate {
    fn is_closer(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }
        self.id < other.id
    }

    fn is_further_along(&self, other: &Self) -> bool {
        if self.path_index != other.path_index {
            return self.path_index > other.path_index;
        }
        self.id < other.id
    }

    fn is_least_along(&self, other: &Self) -> bool {
        if self.path_index != other.path_index {
            return self.path_index < other.path_index;
        }
        self.id < other.id
    }
}

fn best_by<F>(candidates: &[RangedCandidate], precedes: F) -> &RangedCandidate
where
    F: Fn(&RangedCandidate, &RangedCandidate) -> bool,
{
    let mut best = &candidates[0];
    for candidate in &candidates[1..] {
        if precedes(candidate, best) {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{RangedCandidate, best_by};
    use rampart_core::EnemyId;

    #[test]
    fn tie_breaks_prefer_the_smaller_identifier() {
        let candidates = [
            RangedCandidate {
                id: EnemyId::new(9),
                distance: 10.0,
                path_index: 2,
            },
            RangedCandidate {
                id: EnemyId::new(3),
                distance: 10.0,
                path_index: 2,
            },
        ];
        let best = best_by(&candidates, RangedCandidate::is_closer);
        assert_eq!(best.id, EnemyId::new(3));
    }
}
