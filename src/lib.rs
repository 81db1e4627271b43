//! Moorenet - Synchronous Networks of Moore Automata
//!
//! Moorenet simulates networks of synchronous Moore machines whose output
//! bits can be wired into other machines' input bits, forming an arbitrary,
//! possibly cyclic signal graph. It is the model used for simulating
//! digital sequential circuits: every automaton samples its inputs from the
//! previous tick's outputs, then all automata compute their next state
//! together.
//!
//! # Architecture
//!
//! - **BitStore**: packed boolean storage over 64-bit words
//! - **Automaton**: one Moore machine with state, input and output stores
//!   and user-supplied transition/output functions
//! - **Connection registry**: per-bit source and destination tables with
//!   O(1) connect and disconnect
//! - **Network**: arena owning every automaton, addressed by
//!   [`AutomatonId`] handles; provides the stepping engine
//!
//! # Examples
//!
//! ## Two-automaton feedback loop
//!
//! ```
//! use moorenet::{BitStore, Network};
//!
//! // Next state is the input.
//! fn latch(next: &mut BitStore, input: &BitStore, _state: &BitStore) {
//!     next.copy_from(input);
//! }
//!
//! let mut net = Network::new();
//! let a = net.create_simple(1, 1, latch).unwrap();
//! let b = net.create_simple(1, 1, latch).unwrap();
//!
//! // a -> b and b -> a.
//! net.connect(b, 0, a, 0, 1).unwrap();
//! net.connect(a, 0, b, 0, 1).unwrap();
//! net.set_state(a, &[1]).unwrap();
//!
//! // The single high bit bounces between the two, one tick per hop.
//! net.step(&[a, b]).unwrap();
//! assert_eq!(net.get_output(a).unwrap().words(), &[0]);
//! assert_eq!(net.get_output(b).unwrap().words(), &[1]);
//!
//! net.step(&[b, a]).unwrap();
//! assert_eq!(net.get_output(a).unwrap().words(), &[1]);
//! assert_eq!(net.get_output(b).unwrap().words(), &[0]);
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`Result`], with [`MooreError`] being
//! either `InvalidArgument` (rejected before any mutation) or `OutOfMemory`.
//!
//! # Logging
//!
//! The engine emits `tracing` events (`debug` for wiring and lifecycle,
//! `trace` per step and per severed link, `warn` for rejected batches and
//! link violations). Install a subscriber in the host to see them.

// Module declarations
pub mod bit_store;
pub mod error;

pub mod automaton;
pub mod config;
pub mod network;
mod registry;
mod step;

// Re-exports for convenient access
pub use automaton::{AutomatonId, IdentityOutput, OutputFunction, TransitionFunction};
pub use bit_store::{words_for, BitStore, Word, BITS_PER_WORD};
pub use config::NetworkConfig;
pub use error::{MooreError, Result};
pub use network::Network;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "Moorenet";

/// Get version string
pub fn version() -> String {
    format!("{} v{}", NAME, VERSION)
}
