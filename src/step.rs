//! Synchronous stepping of a batch of automata.
//!
//! A tick runs in two phases over the whole batch:
//!
//! 1. **Sample**: every connected input bit copies its source's current
//!    output bit. Only `output` stores are read and only `input` stores are
//!    written.
//! 2. **Compute**: every automaton computes its next state from the sampled
//!    input, adopts it, and recomputes its output.
//!
//! Sampling finishes for the entire batch before any automaton computes, so
//! outputs produced in this tick are never seen by inputs in the same tick.
//! Feedback loops therefore resolve with exactly one tick of latency, and
//! the result does not depend on batch order. An automaton wired to a source
//! outside the batch samples that source's last output.

use crate::automaton::AutomatonId;
use crate::error::{MooreError, Result};
use crate::network::Network;
use std::collections::HashSet;
use tracing::{trace, warn};

impl Network {
    /// Advance every automaton in `batch` by one clock tick.
    ///
    /// The whole batch is validated before anything is touched.
    ///
    /// # Errors
    ///
    /// `InvalidArgument`, with no automaton modified, if `batch` is empty,
    /// names an unknown automaton, or names the same automaton twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use moorenet::{BitStore, Network};
    ///
    /// // Delay line: next state is the input.
    /// fn latch(next: &mut BitStore, input: &BitStore, _state: &BitStore) {
    ///     next.copy_from(input);
    /// }
    ///
    /// let mut net = Network::new();
    /// let a = net.create_simple(1, 1, latch).unwrap();
    /// let b = net.create_simple(1, 1, latch).unwrap();
    /// net.connect(b, 0, a, 0, 1).unwrap();
    ///
    /// net.set_input(a, &[1]).unwrap();
    /// net.step(&[a, b]).unwrap();
    /// // b sampled a's output from before the tick.
    /// assert_eq!(net.get_output(a).unwrap().words(), &[1]);
    /// assert_eq!(net.get_output(b).unwrap().words(), &[0]);
    ///
    /// net.step(&[a, b]).unwrap();
    /// assert_eq!(net.get_output(b).unwrap().words(), &[1]);
    /// ```
    pub fn step(&mut self, batch: &[AutomatonId]) -> Result<()> {
        self.validate_batch(batch)?;

        for &id in batch {
            self.sample_inputs(id);
        }
        for &id in batch {
            self.automata[id].compute();
        }

        trace!(batch = batch.len(), "stepped");
        Ok(())
    }

    /// Advance every automaton in the network as one batch.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the network is empty.
    pub fn step_all(&mut self) -> Result<()> {
        let batch: Vec<AutomatonId> = self.automata.keys().collect();
        self.step(&batch)
    }

    fn validate_batch(&self, batch: &[AutomatonId]) -> Result<()> {
        if batch.is_empty() {
            warn!("rejected empty step batch");
            return Err(MooreError::invalid("step batch is empty"));
        }

        let mut seen = HashSet::with_capacity(batch.len());
        for (pos, &id) in batch.iter().enumerate() {
            if !self.automata.contains_key(id) {
                warn!(?id, pos, "rejected step batch with unknown automaton");
                return Err(MooreError::invalid(format!(
                    "step batch entry {} ({:?}) not found",
                    pos, id
                )));
            }
            if !seen.insert(id) {
                warn!(?id, pos, "rejected step batch with duplicate automaton");
                return Err(MooreError::invalid(format!(
                    "step batch entry {} ({:?}) is a duplicate",
                    pos, id
                )));
            }
        }
        Ok(())
    }

    /// Copy the current output bit of each source into the connected input
    /// bits of `id`.
    fn sample_inputs(&mut self, id: AutomatonId) {
        for bit in 0..self.automata[id].num_inputs() {
            let Some(source) = self.automata[id].sources.get(bit) else {
                continue;
            };
            let value = self.automata[source.endpoint.automaton]
                .output
                .get_bit(source.endpoint.bit);
            self.automata[id].input.assign_bit(bit, value);
        }
    }
}
