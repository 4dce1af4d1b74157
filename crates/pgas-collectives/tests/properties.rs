// crates/pgas-collectives/tests/properties.rs

//! Property tests for the eight invariants spec §8 states over every
//! active-set size, element count, and (type, op) pair. Integer `Sum`/`Max`
//! stand in for "every supported (type, op)" here; `pgas-core`'s own
//! proptests already cover the full operator table and active-set
//! arithmetic in isolation.
//!
//! Invariant 4 (aliasing) has no direct analogue: this workspace's
//! `SymmetricArray` makes `source` and `dest` distinct Rust objects by
//! construction (there is no raw pointer to alias without `unsafe`), so
//! "results are identical whether `source == dest` or disjoint" reduces to
//! the correctness invariant already covered by every other test here.

use pgas_core::{sync::psync_size, Max, PowerOfTwoSubset, Sum};
use pgas_collectives::{binomial, linear, rabenseifner, rec_dbl};
use pgas_fabric::{SymmetricArray, World};
use proptest::prelude::*;

fn run_all_four(
    pe_size: u32,
    source: &SymmetricArray<i32>,
) -> (Vec<i32>, Vec<i32>, Vec<i32>, Vec<i32>) {
    let n = source.len();
    let world = World::new(pe_size as i32);
    let p2s_size = PowerOfTwoSubset::new(pe_size).p2s_size;

    let dest_linear = world.alloc::<i32>(n, 0);
    let psync = world.alloc_psync(psync_size::linear());
    world.run(|me_as| {
        linear::reduce_to_all::<i32, Sum>(me_as, pe_size, &dest_linear, source, &psync).unwrap();
    });
    assert!(psync.all_quiescent());

    let dest_binomial = world.alloc::<i32>(n, 0);
    let psync = world.alloc_psync(psync_size::binomial(pe_size));
    world.run(|me_as| {
        binomial::reduce_to_all::<i32, Sum>(me_as, pe_size, &dest_binomial, source, &psync)
            .unwrap();
    });
    assert!(psync.all_quiescent());

    let dest_rec_dbl = world.alloc::<i32>(n, 0);
    let psync = world.alloc_psync(psync_size::rec_dbl(p2s_size));
    world.run(|me_as| {
        rec_dbl::reduce_to_all::<i32, Sum>(me_as, pe_size, &dest_rec_dbl, source, &psync).unwrap();
    });
    assert!(psync.all_quiescent());

    let dest_rabenseifner = world.alloc::<i32>(n, 0);
    let psync = world.alloc_psync(psync_size::rabenseifner(p2s_size));
    world.run(|me_as| {
        rabenseifner::reduce_to_all::<i32, Sum>(
            me_as,
            pe_size,
            &dest_rabenseifner,
            source,
            &psync,
        )
        .unwrap();
    });
    assert!(psync.all_quiescent());

    (
        dest_linear.snapshot_own(0),
        dest_binomial.snapshot_own(0),
        dest_rec_dbl.snapshot_own(0),
        dest_rabenseifner.snapshot_own(0),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn correctness_uniformity_and_cross_algorithm_equivalence(
        pe_size in 1u32..=9,
        n in 1usize..=4,
        values in prop::collection::vec(-50i32..50, 1..=9),
    ) {
        prop_assume!(values.len() >= pe_size as usize);
        let per_pe: Vec<Vec<i32>> = (0..pe_size as usize)
            .map(|pe| vec![values[pe]; n])
            .collect();
        let expected: i32 = per_pe.iter().map(|v| v[0]).sum();
        let source = SymmetricArray::from_per_pe(per_pe);

        let (lin, bin, rd, rb) = run_all_four(pe_size, &source);
        for got in [&lin, &bin, &rd, &rb] {
            prop_assert_eq!(got, &vec![expected; n]);
        }
    }

    #[test]
    fn non_power_of_two_neighbours_agree(base_log in 1u32..=3, n in 1usize..=3) {
        let p2 = 1u32 << base_log;
        for pe_size in [p2 - 1, p2 + 1] {
            let per_pe: Vec<Vec<i32>> = (0..pe_size as usize).map(|pe| vec![pe as i32; n]).collect();
            let expected: i32 = (0..pe_size as i32).sum();
            let source = SymmetricArray::from_per_pe(per_pe);
            let p2s_size = PowerOfTwoSubset::new(pe_size).p2s_size;

            let world = World::new(pe_size as i32);
            let dest_rd = world.alloc::<i32>(n, 0);
            let psync = world.alloc_psync(psync_size::rec_dbl(p2s_size));
            world.run(|me_as| {
                rec_dbl::reduce_to_all::<i32, Sum>(me_as, pe_size, &dest_rd, &source, &psync).unwrap();
            });

            let dest_rb = world.alloc::<i32>(n, 0);
            let psync = world.alloc_psync(psync_size::rabenseifner(p2s_size));
            world.run(|me_as| {
                rabenseifner::reduce_to_all::<i32, Sum>(me_as, pe_size, &dest_rb, &source, &psync).unwrap();
            });

            prop_assert_eq!(dest_rd.snapshot_own(0), vec![expected; n]);
            prop_assert_eq!(dest_rb.snapshot_own(0), vec![expected; n]);
        }
    }

    #[test]
    fn single_pe_is_the_identity_on_every_algorithm(n in 1usize..=6, values in prop::collection::vec(-1000i32..1000, 1..=6)) {
        prop_assume!(values.len() >= n);
        let values = values[..n].to_vec();
        let source = SymmetricArray::from_per_pe(vec![values.clone()]);
        let (lin, bin, rd, rb) = run_all_four(1, &source);
        for got in [&lin, &bin, &rd, &rb] {
            prop_assert_eq!(got, &values);
        }
    }

    #[test]
    fn rerunning_on_the_prior_result_scales_by_pe_size(pe_size in 1u32..=6, value in -20i32..20) {
        let world = World::new(pe_size as i32);
        let source = SymmetricArray::from_per_pe(vec![vec![value]; pe_size as usize]);
        let dest = world.alloc::<i32>(1, 0);
        let psync = world.alloc_psync(psync_size::binomial(pe_size));
        world.run(|me_as| {
            binomial::reduce_to_all::<i32, Sum>(me_as, pe_size, &dest, &source, &psync).unwrap();
        });
        let first = dest.snapshot_own(0)[0];
        prop_assert_eq!(first, value * pe_size as i32);

        let second_source = SymmetricArray::from_per_pe(vec![vec![first]; pe_size as usize]);
        let dest2 = world.alloc::<i32>(1, 0);
        let psync2 = world.alloc_psync(psync_size::binomial(pe_size));
        world.run(|me_as| {
            binomial::reduce_to_all::<i32, Sum>(me_as, pe_size, &dest2, &second_source, &psync2).unwrap();
        });
        prop_assert_eq!(dest2.snapshot_own(0)[0], first * pe_size as i32);
    }

    #[test]
    fn max_is_consistent_across_algorithms(pe_size in 1u32..=8, values in prop::collection::vec(-30i32..30, 1..=8)) {
        prop_assume!(values.len() >= pe_size as usize);
        let per_pe: Vec<Vec<i32>> = (0..pe_size as usize).map(|pe| vec![values[pe]]).collect();
        let expected = *values[..pe_size as usize].iter().max().unwrap();
        let source = SymmetricArray::from_per_pe(per_pe);
        let p2s_size = PowerOfTwoSubset::new(pe_size).p2s_size;
        let world = World::new(pe_size as i32);

        let dest_l = world.alloc::<i32>(1, 0);
        let psync = world.alloc_psync(psync_size::linear());
        world.run(|me_as| linear::reduce_to_all::<i32, Max>(me_as, pe_size, &dest_l, &source, &psync).unwrap());

        let dest_b = world.alloc::<i32>(1, 0);
        let psync = world.alloc_psync(psync_size::binomial(pe_size));
        world.run(|me_as| binomial::reduce_to_all::<i32, Max>(me_as, pe_size, &dest_b, &source, &psync).unwrap());

        let dest_r = world.alloc::<i32>(1, 0);
        let psync = world.alloc_psync(psync_size::rec_dbl(p2s_size));
        world.run(|me_as| rec_dbl::reduce_to_all::<i32, Max>(me_as, pe_size, &dest_r, &source, &psync).unwrap());

        prop_assert_eq!(dest_l.snapshot_own(0), vec![expected]);
        prop_assert_eq!(dest_b.snapshot_own(0), vec![expected]);
        prop_assert_eq!(dest_r.snapshot_own(0), vec![expected]);
    }
}
