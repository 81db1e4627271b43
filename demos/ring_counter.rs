//! Ring counter built from one-bit automata.
//!
//! Eight D flip-flops are wired in a ring with a single high bit seeded in
//! stage 0. Each tick moves the bit one stage along.
//!
//! Run with: `cargo run --example ring_counter`

use anyhow::Result;
use moorenet::{BitStore, Network};

const STAGES: usize = 8;

/// D flip-flop: next state is the input.
fn flip_flop(next: &mut BitStore, input: &BitStore, _state: &BitStore) {
    next.copy_from(input);
}

fn main() -> Result<()> {
    let mut net = Network::new();
    let stages = (0..STAGES)
        .map(|_| net.create_simple(1, 1, flip_flop))
        .collect::<moorenet::Result<Vec<_>>>()?;

    for i in 0..STAGES {
        net.connect(stages[(i + 1) % STAGES], 0, stages[i], 0, 1)?;
    }
    net.set_state(stages[0], &[1])?;

    println!("{}", moorenet::version());
    for tick in 0..=STAGES {
        let row: String = stages
            .iter()
            .map(|&s| {
                net.get_output(s)
                    .map(|out| if out.get_bit(0) { '#' } else { '.' })
            })
            .collect::<moorenet::Result<_>>()?;
        println!("tick {:2}: {}", tick, row);
        net.step(&stages)?;
    }

    // Tear one stage out; its neighbours lose their links, nothing dangles.
    net.delete(stages[3]);
    anyhow::ensure!(net.check_links(), "link invariant violated after delete");
    println!("deleted stage 3, {} automata remain", net.len());
    Ok(())
}
