//! Network - Arena of automata addressed by stable handles.
//!
//! The `Network` owns every automaton. Automata refer to each other only
//! through [`AutomatonId`] handles stored in the connection registry, so a
//! deleted automaton can never be reached through a dangling reference: its
//! links are severed on deletion and its handle simply stops resolving.
//!
//! # Lifecycle
//!
//! 1. Create network: `Network::new()`
//! 2. Create automata: `create_full()` / `create_simple()`
//! 3. Wire bits: `connect()` / `disconnect()`
//! 4. Drive: `set_input()` / `set_state()` / `step()`
//! 5. Observe: `get_output()`
//! 6. Tear down: `delete()`
//!
//! # Example
//!
//! ```
//! use moorenet::{BitStore, Network, Result};
//!
//! // One-bit toggle flip-flop: state flips when input bit 0 is high.
//! fn toggle(next: &mut BitStore, input: &BitStore, state: &BitStore) {
//!     next.assign_bit(0, state.get_bit(0) ^ input.get_bit(0));
//! }
//!
//! # fn main() -> Result<()> {
//! let mut net = Network::new();
//! let t = net.create_simple(1, 1, toggle)?;
//!
//! net.set_input(t, &[1])?;
//! net.step(&[t])?;
//! assert_eq!(net.get_output(t)?.words(), &[1]);
//!
//! net.step(&[t])?;
//! assert_eq!(net.get_output(t)?.words(), &[0]);
//! # Ok(())
//! # }
//! ```

use crate::automaton::{Automaton, AutomatonId, IdentityOutput, OutputFunction, TransitionFunction};
use crate::bit_store::{BitStore, BITS_PER_WORD};
use crate::config::NetworkConfig;
use crate::error::{MooreError, Result};
use slotmap::SlotMap;
use tracing::debug;

/// Owner of a set of wired automata.
pub struct Network {
    /// All automata owned by the network
    pub(crate) automata: SlotMap<AutomatonId, Automaton>,

    /// Allocation settings
    pub(crate) config: NetworkConfig,
}

impl Network {
    /// Create a new empty Network with default settings.
    pub fn new() -> Self {
        Self {
            automata: SlotMap::with_key(),
            config: NetworkConfig::default(),
        }
    }

    /// Create a new empty Network with the given settings.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the configuration fails validation.
    pub fn with_config(config: NetworkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            automata: SlotMap::with_capacity_and_key(config.automata_capacity),
            config,
        })
    }

    /// Settings this network was built with.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create an automaton with explicit widths, callbacks and initial state.
    ///
    /// `initial_state` must hold at least `ceil(n_state / 64)` words; bits
    /// past `n_state` are ignored. The output is computed from the initial
    /// state before this returns. `n_input` may be zero.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `n_output == 0`, `n_state == 0`, or
    ///   `initial_state` is too short
    /// - `OutOfMemory` if any store or table cannot be allocated; nothing is
    ///   added to the network in that case
    pub fn create_full<T, Y>(
        &mut self,
        n_input: usize,
        n_output: usize,
        n_state: usize,
        transition: T,
        output_fn: Y,
        initial_state: &[u64],
    ) -> Result<AutomatonId>
    where
        T: TransitionFunction + 'static,
        Y: OutputFunction + 'static,
    {
        let automaton = Automaton::try_new(
            n_input,
            n_output,
            n_state,
            Box::new(transition),
            Box::new(output_fn),
            initial_state,
        )?;
        let id = self.automata.insert(automaton);

        debug!(?id, n_input, n_output, n_state, "created automaton");
        Ok(id)
    }

    /// Create an automaton whose output is its state, starting from the
    /// all-zero state.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `n_state == 0`; `OutOfMemory` on allocation
    /// failure.
    pub fn create_simple<T>(&mut self, n_input: usize, n_state: usize, transition: T) -> Result<AutomatonId>
    where
        T: TransitionFunction + 'static,
    {
        if n_state == 0 {
            return Err(MooreError::invalid("state width must be non-zero"));
        }
        let zero = BitStore::try_new(n_state)?;
        self.create_full(n_input, n_state, n_state, transition, IdentityOutput, zero.words())
    }

    /// Delete an automaton, severing every connection into and out of it
    /// first. Unknown handles are ignored.
    pub fn delete(&mut self, id: AutomatonId) {
        let Some(automaton) = self.automata.get(id) else {
            return;
        };
        let n_input = automaton.num_inputs();
        let n_output = automaton.num_outputs();

        for bit in 0..n_input {
            self.sever(id, bit);
        }
        for bit in 0..n_output {
            while let Some(&dest) = self.automata[id].destinations.list(bit).first() {
                self.sever(dest.automaton, dest.bit);
            }
        }

        self.automata.remove(id);
        debug!(?id, "deleted automaton");
    }

    /// Delete every automaton.
    pub fn clear(&mut self) {
        self.automata.clear();
    }

    // =========================================================================
    // Bit Store Mutation
    // =========================================================================

    /// Overwrite every unconnected input bit of `id` from `bits`.
    ///
    /// Connected input bits are left untouched; their source drives them
    /// during `step`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unknown handle, an automaton without inputs,
    /// or a buffer shorter than `ceil(n_input / 64)` words.
    pub fn set_input(&mut self, id: AutomatonId, bits: &[u64]) -> Result<()> {
        let automaton = self.automaton_mut(id)?;
        let n_input = automaton.num_inputs();
        if n_input == 0 {
            return Err(MooreError::invalid("automaton has no inputs"));
        }
        if bits.len() < automaton.input.num_words() {
            return Err(MooreError::invalid(format!(
                "input buffer holds {} words, {} inputs need {}",
                bits.len(),
                n_input,
                automaton.input.num_words()
            )));
        }

        let Automaton { input, sources, .. } = automaton;
        for bit in (0..n_input).filter(|&bit| !sources.is_connected(bit)) {
            let value = (bits[bit / BITS_PER_WORD] >> (bit % BITS_PER_WORD)) & 1 == 1;
            input.assign_bit(bit, value);
        }
        Ok(())
    }

    /// Overwrite the state of `id`, bypassing the transition function, and
    /// recompute its output.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unknown handle or a buffer shorter than
    /// `ceil(n_state / 64)` words.
    pub fn set_state(&mut self, id: AutomatonId, bits: &[u64]) -> Result<()> {
        let automaton = self.automaton_mut(id)?;
        automaton.state.copy_from_words(bits)?;
        automaton.refresh_output();
        Ok(())
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Read-only view of the current output of `id`.
    pub fn get_output(&self, id: AutomatonId) -> Result<&BitStore> {
        Ok(&self.automaton(id)?.output)
    }

    /// Read-only view of the current state of `id`.
    pub fn get_state(&self, id: AutomatonId) -> Result<&BitStore> {
        Ok(&self.automaton(id)?.state)
    }

    /// Read-only view of the current input of `id`.
    pub fn get_input(&self, id: AutomatonId) -> Result<&BitStore> {
        Ok(&self.automaton(id)?.input)
    }

    /// Number of input bits of `id`.
    pub fn num_inputs(&self, id: AutomatonId) -> Result<usize> {
        Ok(self.automaton(id)?.num_inputs())
    }

    /// Number of output bits of `id`.
    pub fn num_outputs(&self, id: AutomatonId) -> Result<usize> {
        Ok(self.automaton(id)?.num_outputs())
    }

    /// Number of state bits of `id`.
    pub fn num_states(&self, id: AutomatonId) -> Result<usize> {
        Ok(self.automaton(id)?.num_states())
    }

    /// Whether `id` refers to a live automaton.
    pub fn contains(&self, id: AutomatonId) -> bool {
        self.automata.contains_key(id)
    }

    /// Get the number of automata in the network.
    pub fn len(&self) -> usize {
        self.automata.len()
    }

    /// Check if the network holds no automata.
    pub fn is_empty(&self) -> bool {
        self.automata.is_empty()
    }

    /// Iterate over the handles of all live automata, in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = AutomatonId> + '_ {
        self.automata.keys()
    }

    pub(crate) fn automaton(&self, id: AutomatonId) -> Result<&Automaton> {
        self.automata
            .get(id)
            .ok_or_else(|| MooreError::invalid(format!("automaton {:?} not found", id)))
    }

    pub(crate) fn automaton_mut(&mut self, id: AutomatonId) -> Result<&mut Automaton> {
        self.automata
            .get_mut(id)
            .ok_or_else(|| MooreError::invalid(format!("automaton {:?} not found", id)))
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("automata", &self.automata.len())
            .field("config", &self.config)
            .finish()
    }
}
