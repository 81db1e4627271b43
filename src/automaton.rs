//! Automaton - One Moore machine instance and its callback contract.
//!
//! An automaton owns four bit stores (`state`, scratch `next_state`, `input`
//! and `output`) plus its half of the connection registry. Its transition
//! and output functions are supplied by the caller as pure callbacks.
//!
//! Automata never own each other. Cross-automaton references live in the
//! registry tables as [`AutomatonId`] handles owned by the
//! [`Network`](crate::Network) arena.

use crate::bit_store::BitStore;
use crate::error::{MooreError, Result};
use crate::registry::{InputSources, OutputDestinations};
use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to an automaton inside a [`Network`](crate::Network).
    ///
    /// A handle stays valid until the automaton is deleted. After that,
    /// every operation given the stale handle fails with `InvalidArgument`.
    pub struct AutomatonId;
}

/// Transition function `(input, state) -> next_state`.
///
/// `next_state` is zeroed and sized to the automaton's state width before
/// each call. Implementations must be total and free of side effects.
pub trait TransitionFunction {
    /// Compute the next state into `next_state`.
    fn transition(&self, next_state: &mut BitStore, input: &BitStore, state: &BitStore);
}

impl<F> TransitionFunction for F
where
    F: Fn(&mut BitStore, &BitStore, &BitStore),
{
    #[inline]
    fn transition(&self, next_state: &mut BitStore, input: &BitStore, state: &BitStore) {
        self(next_state, input, state)
    }
}

/// Output function `state -> output`.
///
/// `output` is zeroed and sized to the automaton's output width before each
/// call. Implementations must be total and free of side effects.
pub trait OutputFunction {
    /// Compute the output into `output`.
    fn output(&self, output: &mut BitStore, state: &BitStore);
}

impl<F> OutputFunction for F
where
    F: Fn(&mut BitStore, &BitStore),
{
    #[inline]
    fn output(&self, output: &mut BitStore, state: &BitStore) {
        self(output, state)
    }
}

/// Output function that copies the state unchanged.
///
/// Used by [`Network::create_simple`](crate::Network::create_simple), where
/// the output width equals the state width. When the widths differ, the
/// common low bits are copied and any extra output bits stay zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityOutput;

impl OutputFunction for IdentityOutput {
    #[inline]
    fn output(&self, output: &mut BitStore, state: &BitStore) {
        if output.num_bits() == state.num_bits() {
            output.copy_from(state);
            return;
        }
        for bit in 0..output.num_bits().min(state.num_bits()) {
            output.assign_bit(bit, state.get_bit(bit));
        }
    }
}

/// One Moore machine: fixed widths, bit stores, callbacks and registry tables.
pub struct Automaton {
    pub(crate) state: BitStore,
    pub(crate) next_state: BitStore,
    pub(crate) input: BitStore,
    pub(crate) output: BitStore,
    pub(crate) transition: Box<dyn TransitionFunction>,
    pub(crate) output_fn: Box<dyn OutputFunction>,
    pub(crate) sources: InputSources,
    pub(crate) destinations: OutputDestinations,
}

impl Automaton {
    /// Allocate every store and registry table, then seed the state and
    /// compute the initial output.
    ///
    /// Nothing escapes on failure: whatever was already allocated is
    /// dropped before the error is returned.
    pub(crate) fn try_new(
        n_input: usize,
        n_output: usize,
        n_state: usize,
        transition: Box<dyn TransitionFunction>,
        output_fn: Box<dyn OutputFunction>,
        initial_state: &[u64],
    ) -> Result<Self> {
        if n_output == 0 {
            return Err(MooreError::invalid("output width must be non-zero"));
        }
        if n_state == 0 {
            return Err(MooreError::invalid("state width must be non-zero"));
        }

        let mut state = BitStore::try_new(n_state)?;
        state.copy_from_words(initial_state)?;

        let mut automaton = Self {
            state,
            next_state: BitStore::try_new(n_state)?,
            input: BitStore::try_new(n_input)?,
            output: BitStore::try_new(n_output)?,
            transition,
            output_fn,
            sources: InputSources::try_new(n_input)?,
            destinations: OutputDestinations::try_new(n_output)?,
        };
        automaton.refresh_output();
        Ok(automaton)
    }

    /// Number of input bits.
    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.input.num_bits()
    }

    /// Number of output bits.
    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.output.num_bits()
    }

    /// Number of state bits.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.state.num_bits()
    }

    /// Recompute `output = output_fn(state)`.
    pub(crate) fn refresh_output(&mut self) {
        self.output.clear_all();
        self.output_fn.output(&mut self.output, &self.state);
    }

    /// Phase-two work of a tick: next state from the sampled input, then
    /// output from the new state.
    pub(crate) fn compute(&mut self) {
        self.next_state.clear_all();
        self.transition
            .transition(&mut self.next_state, &self.input, &self.state);
        std::mem::swap(&mut self.state, &mut self.next_state);
        self.refresh_output();
    }
}

impl std::fmt::Debug for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automaton")
            .field("n_input", &self.num_inputs())
            .field("n_output", &self.num_outputs())
            .field("n_state", &self.num_states())
            .field("state", &self.state.words())
            .field("output", &self.output.words())
            .finish()
    }
}
