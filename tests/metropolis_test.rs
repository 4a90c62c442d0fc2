//! Unit-test: Metropolis acceptance behaviour.

use ising_scan::lattice::{Lattice, Spin};
use ising_scan::metropolis::{metropolis_step, StepInfo};
use ising_scan::observables::evaluate;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn test_metropolis_acceptance_rate() {
    // -----------------------------------------------------------
    // Deterministic RNG so the test is repeatable.
    // -----------------------------------------------------------
    let mut rng = ChaCha20Rng::seed_from_u64(0xDEADBEEF);
    let mut lat = Lattice::random_with(&mut rng, 8).unwrap();

    let beta    = 0.4;
    let n_steps = 5_000;
    let mut accepted = 0usize;

    for _ in 0..n_steps {
        let StepInfo { accepted: acc, .. } = metropolis_step(&mut lat, beta, 1.0, &mut rng);
        if acc { accepted += 1; }
    }

    let acc_rate = accepted as f64 / n_steps as f64;

    // Near T_c the rate is neither 0 % nor 100 %.
    assert!(
        (0.01..=0.99).contains(&acc_rate),
        "Acceptance rate {acc_rate:.3} is outside plausible range"
    );
}

#[test]
fn test_downhill_flip_always_kept() {
    // Checkerboard: every single flip lowers the energy by 8J.
    let side = 4;
    let spins: Vec<Spin> = (0..side * side)
        .map(|k| if (k / side + k % side) % 2 == 0 { 1 } else { -1 })
        .collect();

    for seed in 0..50 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut lat = Lattice::from_spins(side, spins.clone()).unwrap();
        let info = metropolis_step(&mut lat, 1e6, 1.0, &mut rng);

        assert!(info.accepted);
        assert_eq!(info.delta_energy, -8.0);
        let (i, j) = info.site;
        assert_ne!(lat.get(i, j) as i32, spins[i * side + j] as i32);
    }
}

#[test]
fn test_zero_coupling_accepts_everything() {
    let mut rng = ChaCha20Rng::seed_from_u64(17);
    let mut lat = Lattice::random_with(&mut rng, 5).unwrap();
    for _ in 0..1_000 {
        assert!(metropolis_step(&mut lat, 10.0, 0.0, &mut rng).accepted);
    }
}

#[test]
fn test_rejected_flip_leaves_lattice_untouched() {
    // Ordered state at very low T: every flip costs 8J and is rejected.
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let mut lat = Lattice::uniform(6, -1).unwrap();
    let before = lat.clone();

    for _ in 0..500 {
        let info = metropolis_step(&mut lat, 100.0, 1.0, &mut rng);
        assert!(!info.accepted);
        assert_eq!(info.delta_energy, 8.0);
        assert_eq!(info.delta_magnetization, 0.0);
    }
    assert_eq!(lat, before);
}

#[test]
fn test_step_deltas_track_full_evaluation() {
    let mut rng = ChaCha20Rng::seed_from_u64(314);
    let mut lat = Lattice::random_with(&mut rng, 7).unwrap();
    let mut snap = evaluate(&lat, 1.0);

    for _ in 0..2_000 {
        let info = metropolis_step(&mut lat, 0.6, 1.0, &mut rng);
        if info.accepted {
            snap.energy += info.delta_energy;
            snap.magnetization += info.delta_magnetization;
        }
    }

    let full = evaluate(&lat, 1.0);
    assert_eq!(snap.energy, full.energy);
    assert!((snap.magnetization - full.magnetization).abs() < 1e-9);
}

#[test]
fn test_same_seed_same_trajectory() {
    let run = |seed: u64| {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut lat = Lattice::random_with(&mut rng, 6).unwrap();
        for _ in 0..1_000 {
            metropolis_step(&mut lat, 0.3, 1.0, &mut rng);
        }
        lat
    };
    assert_eq!(run(8), run(8));
}
