use rampart_core::EnemyKind;
use rampart_system_wave_generation::{generate_wave, WaveTuning};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn count(plan: &[EnemyKind], kind: EnemyKind) -> usize {
    plan.iter().filter(|spawn| **spawn == kind).count()
}

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[test]
fn wave_one_is_all_basic_units() {
    let tuning = WaveTuning::default();
    let plan = generate_wave(1, &tuning, &mut rng(7));

    assert_eq!(plan.spawns().len(), 5);
    assert_eq!(count(plan.spawns(), EnemyKind::Basic), 5);
}

#[test]
fn composition_follows_the_difficulty_curve() {
    let tuning = WaveTuning::default();
    let plan = generate_wave(7, &tuning, &mut rng(7));

    // Wave 7: 5 + 2*6 basic, 2*(7-3) fast, 7-5 tank, no boss.
    assert_eq!(count(plan.spawns(), EnemyKind::Basic), 17);
    assert_eq!(count(plan.spawns(), EnemyKind::Fast), 8);
    assert_eq!(count(plan.spawns(), EnemyKind::Tank), 2);
    assert_eq!(count(plan.spawns(), EnemyKind::Boss), 0);
}

#[test]
fn every_fifth_wave_carries_exactly_one_boss() {
    let tuning = WaveTuning::default();

    let wave_four = generate_wave(4, &tuning, &mut rng(42));
    assert_eq!(count(wave_four.spawns(), EnemyKind::Boss), 0);

    let wave_five = generate_wave(5, &tuning, &mut rng(42));
    assert_eq!(count(wave_five.spawns(), EnemyKind::Boss), 1);

    let wave_ten = generate_wave(10, &tuning, &mut rng(42));
    assert_eq!(count(wave_ten.spawns(), EnemyKind::Boss), 1);
}

#[test]
fn equal_seeds_replay_the_exact_spawn_order() {
    let tuning = WaveTuning::default();
    let first = generate_wave(6, &tuning, &mut rng(0xdead_beef));
    let second = generate_wave(6, &tuning, &mut rng(0xdead_beef));

    assert_eq!(first, second);
}

#[test]
fn shuffling_never_changes_the_composition() {
    let tuning = WaveTuning::default();
    let baseline = generate_wave(9, &tuning, &mut rng(1));

    for seed in 2..10 {
        let shuffled = generate_wave(9, &tuning, &mut rng(seed));
        for kind in EnemyKind::ALL {
            assert_eq!(
                count(shuffled.spawns(), kind),
                count(baseline.spawns(), kind),
                "{kind:?}"
            );
        }
    }
}

#[test]
fn spawn_interval_shrinks_with_the_wave_number() {
    let tuning = WaveTuning::default();
    let early = generate_wave(1, &tuning, &mut rng(3));
    let late = generate_wave(30, &tuning, &mut rng(3));

    assert!(late.spawn_interval() < early.spawn_interval());
    assert!(late.spawn_interval() >= std::time::Duration::from_secs_f32(0.5));
}
