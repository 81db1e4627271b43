//! Property-based tests for the engine.
//!
//! These tests check, over randomized inputs:
//! - `get_output` equals the output function of the seeded state
//! - the identity law of simplified automata
//! - the link invariant under random connect/disconnect sequences
//! - sampled inputs always reflect pre-step outputs

use moorenet::{words_for, AutomatonId, BitStore, Network};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn hold(next: &mut BitStore, _input: &BitStore, state: &BitStore) {
    next.copy_from(state);
}

/// Next state: state XOR input, bit by bit over the common width.
fn mix(next: &mut BitStore, input: &BitStore, state: &BitStore) {
    for bit in 0..state.num_bits() {
        let x = bit < input.num_bits() && input.get_bit(bit);
        next.assign_bit(bit, state.get_bit(bit) ^ x);
    }
}

/// Output: bit i is the complement of state bit (n - 1 - i).
fn reverse_complement(output: &mut BitStore, state: &BitStore) {
    let n = state.num_bits();
    for bit in 0..output.num_bits() {
        output.assign_bit(bit, !state.get_bit(n - 1 - (bit % n)));
    }
}

fn reference_output(state: &[u64], n_state: usize, n_output: usize) -> Vec<usize> {
    let get = |b: usize| (state[b / 64] >> (b % 64)) & 1 == 1;
    (0..n_output)
        .filter(|&bit| !get(n_state - 1 - (bit % n_state)))
        .collect()
}

proptest! {
    #[test]
    fn prop_set_state_drives_output(
        n_state in 1..200usize,
        n_output in 1..200usize,
        seed in any::<u64>(),
    ) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut state: Vec<u64> = (0..words_for(n_state)).map(|_| rng.gen()).collect();
        if n_state % 64 != 0 {
            let last = state.len() - 1;
            state[last] &= (1u64 << (n_state % 64)) - 1;
        }

        let mut net = Network::new();
        let zero = vec![0u64; words_for(n_state)];
        let a = net.create_full(0, n_output, n_state, hold, reverse_complement, &zero).unwrap();

        net.set_state(a, &state).unwrap();
        prop_assert_eq!(net.get_state(a).unwrap().words(), state.as_slice());
        prop_assert_eq!(
            net.get_output(a).unwrap().get_acts(),
            reference_output(&state, n_state, n_output)
        );
    }

    #[test]
    fn prop_simple_output_is_state(
        n_state in 1..300usize,
        n_input in 0..300usize,
        seed in any::<u64>(),
    ) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut net = Network::new();
        let a = net.create_simple(n_input, n_state, mix).unwrap();
        prop_assert_eq!(net.get_output(a).unwrap(), net.get_state(a).unwrap());

        let state: Vec<u64> = (0..words_for(n_state)).map(|_| rng.gen()).collect();
        net.set_state(a, &state).unwrap();
        prop_assert_eq!(net.get_output(a).unwrap(), net.get_state(a).unwrap());

        for _ in 0..4 {
            if n_input > 0 {
                let input: Vec<u64> = (0..words_for(n_input)).map(|_| rng.gen()).collect();
                net.set_input(a, &input).unwrap();
            }
            net.step(&[a]).unwrap();
            prop_assert_eq!(net.get_output(a).unwrap(), net.get_state(a).unwrap());
        }
    }

    #[test]
    fn prop_random_wiring_keeps_links(seed in any::<u64>(), n_ops in 1..200usize) {
        const N: usize = 4;
        const WIDTH: usize = 6;

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut net = Network::new();
        let ids: Vec<AutomatonId> = (0..N)
            .map(|_| net.create_simple(WIDTH, WIDTH, mix).unwrap())
            .collect();

        // (in automaton, in bit) -> (out automaton, out bit)
        let mut model: HashMap<(usize, usize), (usize, usize)> = HashMap::new();

        for _ in 0..n_ops {
            let a = rng.gen_range(0..N);
            let count = rng.gen_range(1..=WIDTH);
            let in_off = rng.gen_range(0..=WIDTH - count);

            if rng.gen_bool(0.7) {
                let b = rng.gen_range(0..N);
                let out_off = rng.gen_range(0..=WIDTH - count);
                net.connect(ids[a], in_off, ids[b], out_off, count).unwrap();
                for k in 0..count {
                    model.insert((a, in_off + k), (b, out_off + k));
                }
            } else {
                net.disconnect(ids[a], in_off, count).unwrap();
                for k in 0..count {
                    model.remove(&(a, in_off + k));
                }
            }

            prop_assert!(net.check_links());
        }

        for a in 0..N {
            for bit in 0..WIDTH {
                let expected = model.get(&(a, bit)).map(|&(b, j)| (ids[b], j));
                prop_assert_eq!(net.source_of(ids[a], bit).unwrap(), expected);
            }
        }

        for b in 0..N {
            for j in 0..WIDTH {
                let mut actual = net.destinations_of(ids[b], j).unwrap();
                actual.sort();
                let mut expected: Vec<_> = model
                    .iter()
                    .filter(|(_, &src)| src == (b, j))
                    .map(|(&(a, i), _)| (ids[a], i))
                    .collect();
                expected.sort();
                prop_assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn prop_inputs_sample_pre_step_outputs(seed in any::<u64>(), n_links in 1..40usize) {
        const N: usize = 5;
        const WIDTH: usize = 70;

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut net = Network::new();
        let ids: Vec<AutomatonId> = (0..N)
            .map(|_| net.create_simple(WIDTH, WIDTH, mix).unwrap())
            .collect();
        for &id in &ids {
            let state: Vec<u64> = (0..words_for(WIDTH)).map(|_| rng.gen()).collect();
            net.set_state(id, &state).unwrap();
        }
        for _ in 0..n_links {
            let a = rng.gen_range(0..N);
            let b = rng.gen_range(0..N);
            net.connect(ids[a], rng.gen_range(0..WIDTH), ids[b], rng.gen_range(0..WIDTH), 1).unwrap();
        }

        let mut batch = ids.clone();
        for i in (1..batch.len()).rev() {
            batch.swap(i, rng.gen_range(0..=i));
        }

        for _ in 0..3 {
            let before: HashMap<AutomatonId, BitStore> = ids
                .iter()
                .map(|&id| (id, net.get_output(id).unwrap().clone()))
                .collect();

            net.step(&batch).unwrap();

            for &id in &ids {
                for bit in 0..WIDTH {
                    if let Some((src, j)) = net.source_of(id, bit).unwrap() {
                        prop_assert_eq!(net.get_input(id).unwrap().get_bit(bit), before[&src].get_bit(j));
                    }
                }
            }
        }
    }
}
