//! Performance benchmarks for the stepping engine and registry.
//!
//! These benchmarks measure:
//! - step throughput on a ring of wide automata
//! - connect/disconnect cost on a heavily fanned-out output bit
//! - set_input on a partially connected input store

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use moorenet::{words_for, AutomatonId, BitStore, Network};
use rand::{Rng, SeedableRng};

fn xor_step(next: &mut BitStore, input: &BitStore, state: &BitStore) {
    for bit in 0..state.num_bits() {
        next.assign_bit(bit, state.get_bit(bit) ^ input.get_bit(bit));
    }
}

fn hold(next: &mut BitStore, _input: &BitStore, state: &BitStore) {
    next.copy_from(state);
}

/// Ring of `n` automata, each `width` bits, fully wired to its predecessor.
fn build_ring(n: usize, width: usize) -> (Network, Vec<AutomatonId>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let mut net = Network::new();
    let ids: Vec<_> = (0..n)
        .map(|_| net.create_simple(width, width, xor_step).unwrap())
        .collect();

    for i in 0..n {
        let prev = ids[(i + n - 1) % n];
        net.connect(ids[i], 0, prev, 0, width).unwrap();
        let state: Vec<u64> = (0..words_for(width)).map(|_| rng.gen()).collect();
        net.set_state(ids[i], &state).unwrap();
    }
    (net, ids)
}

// =============================================================================
// Stepping
// =============================================================================

fn bench_step_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_ring");

    for &(n, width) in &[(8, 64), (64, 64), (16, 1024)] {
        let (mut net, ids) = build_ring(n, width);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", n, width)),
            &ids,
            |b, ids| {
                b.iter(|| net.step(black_box(ids)).unwrap());
            },
        );
    }

    group.finish();
}

// =============================================================================
// Registry
// =============================================================================

fn bench_connect_disconnect(c: &mut Criterion) {
    let mut net = Network::new();
    let src = net.create_simple(0, 1, hold).unwrap();
    let sinks: Vec<_> = (0..1000)
        .map(|_| net.create_simple(1, 1, hold).unwrap())
        .collect();
    for &sink in &sinks {
        net.connect(sink, 0, src, 0, 1).unwrap();
    }

    c.bench_function("connect_disconnect_fanout_1000", |b| {
        let mut i = 0;
        b.iter(|| {
            let sink = sinks[i % sinks.len()];
            net.disconnect(black_box(sink), 0, 1).unwrap();
            net.connect(black_box(sink), 0, src, 0, 1).unwrap();
            i += 1;
        });
    });
}

fn bench_set_input(c: &mut Criterion) {
    let mut net = Network::new();
    let src = net.create_simple(0, 512, hold).unwrap();
    let a = net.create_simple(1024, 1, hold).unwrap();
    net.connect(a, 0, src, 0, 512).unwrap();
    let bits = vec![u64::MAX; words_for(1024)];

    c.bench_function("set_input_1024_half_connected", |b| {
        b.iter(|| net.set_input(a, black_box(&bits)).unwrap());
    });
}

criterion_group!(benches, bench_step_ring, bench_connect_disconnect, bench_set_input);
criterion_main!(benches);
