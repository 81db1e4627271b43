//! Connection registry - bit-level wiring between automata.
//!
//! Each automaton carries two tables:
//!
//! - `InputSources`: for every input bit, its single source output bit (if
//!   any) plus the slot that input occupies in the source's destination list
//! - `OutputDestinations`: for every output bit, the list of input bits it
//!   drives
//!
//! # Link Invariant
//!
//! Input bit `i` of `A` has source `(B, j)` at slot `s` exactly when
//! `B.destinations[j][s] == (A, i)`. Every mutation in this module keeps
//! both sides in step, which is what makes disconnect O(1): the input knows
//! where its entry lives, and removal swaps the last entry into the hole and
//! patches the moved entry's owner.
//!
//! Destination order carries no meaning and is not preserved.

use crate::automaton::AutomatonId;
use crate::error::{MooreError, Result};
use crate::network::Network;
use tracing::{debug, trace, warn};

/// One end of a bit-level connection: an automaton and a bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Endpoint {
    pub(crate) automaton: AutomatonId,
    pub(crate) bit: usize,
}

/// Source record of a connected input bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Source {
    /// Output bit driving this input
    pub(crate) endpoint: Endpoint,
    /// Position of this input inside the source's destination list
    pub(crate) slot: usize,
}

/// Per-input-bit source table.
#[derive(Debug, Default)]
pub(crate) struct InputSources {
    sources: Vec<Option<Source>>,
}

impl InputSources {
    pub(crate) fn try_new(n_input: usize) -> Result<Self> {
        let mut sources = Vec::new();
        sources.try_reserve_exact(n_input)?;
        sources.resize(n_input, None);
        Ok(Self { sources })
    }

    #[inline]
    pub(crate) fn get(&self, bit: usize) -> Option<Source> {
        self.sources[bit]
    }

    #[inline]
    pub(crate) fn is_connected(&self, bit: usize) -> bool {
        self.sources[bit].is_some()
    }

    #[inline]
    fn set(&mut self, bit: usize, source: Source) {
        self.sources[bit] = Some(source);
    }

    #[inline]
    fn take(&mut self, bit: usize) -> Option<Source> {
        self.sources[bit].take()
    }

    #[inline]
    fn relocate(&mut self, bit: usize, slot: usize) {
        if let Some(source) = self.sources[bit].as_mut() {
            source.slot = slot;
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, Source)> + '_ {
        self.sources
            .iter()
            .enumerate()
            .filter_map(|(bit, source)| source.map(|s| (bit, s)))
    }
}

/// Per-output-bit destination lists.
#[derive(Debug, Default)]
pub(crate) struct OutputDestinations {
    lists: Vec<Vec<Endpoint>>,
}

impl OutputDestinations {
    pub(crate) fn try_new(n_output: usize) -> Result<Self> {
        let mut lists = Vec::new();
        lists.try_reserve_exact(n_output)?;
        lists.resize_with(n_output, Vec::new);
        Ok(Self { lists })
    }

    #[inline]
    pub(crate) fn list(&self, bit: usize) -> &[Endpoint] {
        &self.lists[bit]
    }

    #[inline]
    fn list_mut(&mut self, bit: usize) -> &mut Vec<Endpoint> {
        &mut self.lists[bit]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &[Endpoint])> + '_ {
        self.lists
            .iter()
            .enumerate()
            .map(|(bit, list)| (bit, list.as_slice()))
    }
}

/// Make room for one more entry, growing geometrically.
///
/// The first allocation holds `initial` entries; later ones double.
fn reserve_one(list: &mut Vec<Endpoint>, initial: usize) -> Result<()> {
    if list.len() < list.capacity() {
        return Ok(());
    }
    let target = if list.capacity() == 0 {
        initial.max(1)
    } else {
        list.capacity() * 2
    };
    list.try_reserve_exact(target - list.len())?;
    Ok(())
}

/// Validate that `[offset, offset + count)` fits inside `width`.
pub(crate) fn check_range(offset: usize, count: usize, width: usize, what: &str) -> Result<()> {
    if count == 0 {
        return Err(MooreError::invalid("bit count must be non-zero"));
    }
    match offset.checked_add(count) {
        Some(end) if end <= width => Ok(()),
        _ => Err(MooreError::invalid(format!(
            "{} range [{}, {}+{}) exceeds width {}",
            what, offset, offset, count, width
        ))),
    }
}

impl Network {
    /// Wire `count` input bits of `in_id`, starting at `in_offset`, to the
    /// output bits of `out_id` starting at `out_offset`, one to one.
    ///
    /// An input bit that already has a source is rewired; its old connection
    /// is severed first. Self-loops and cycles are allowed.
    ///
    /// The call is all-or-nothing: room in every destination list touched is
    /// secured before any binding changes, so an `OutOfMemory` failure
    /// leaves the wiring exactly as it was.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an unknown handle, `count == 0`, or a range
    ///   past either automaton's width
    /// - `OutOfMemory` if a destination list cannot grow or would exceed
    ///   [`NetworkConfig::max_fanout`](crate::NetworkConfig::max_fanout)
    ///
    /// # Examples
    ///
    /// ```
    /// use moorenet::{BitStore, Network};
    ///
    /// fn hold(next: &mut BitStore, _input: &BitStore, state: &BitStore) {
    ///     next.copy_from(state);
    /// }
    ///
    /// let mut net = Network::new();
    /// let a = net.create_simple(4, 4, hold).unwrap();
    /// let b = net.create_simple(4, 4, hold).unwrap();
    ///
    /// net.connect(a, 0, b, 2, 2).unwrap();
    /// assert_eq!(net.source_of(a, 1).unwrap(), Some((b, 3)));
    /// assert_eq!(net.destinations_of(b, 2).unwrap(), vec![(a, 0)]);
    /// ```
    pub fn connect(
        &mut self,
        in_id: AutomatonId,
        in_offset: usize,
        out_id: AutomatonId,
        out_offset: usize,
        count: usize,
    ) -> Result<()> {
        let n_input = self.automaton(in_id)?.num_inputs();
        let n_output = self.automaton(out_id)?.num_outputs();
        check_range(in_offset, count, n_input, "input")?;
        check_range(out_offset, count, n_output, "output")?;

        self.reserve_destinations(in_id, in_offset, out_id, out_offset, count)?;

        for k in 0..count {
            self.sever(in_id, in_offset + k);
            self.bind(in_id, in_offset + k, out_id, out_offset + k);
        }

        debug!(
            ?in_id,
            in_offset,
            ?out_id,
            out_offset,
            count,
            "connected bits"
        );
        Ok(())
    }

    /// Sever the sources of `count` input bits of `id` starting at
    /// `in_offset`. Bits without a source are skipped.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unknown handle, `count == 0`, or a range past
    /// the input width.
    pub fn disconnect(&mut self, id: AutomatonId, in_offset: usize, count: usize) -> Result<()> {
        let n_input = self.automaton(id)?.num_inputs();
        check_range(in_offset, count, n_input, "input")?;

        for bit in in_offset..in_offset + count {
            self.sever(id, bit);
        }

        debug!(?id, in_offset, count, "disconnected bits");
        Ok(())
    }

    /// Source output bit of input bit `in_bit` of `id`, if connected.
    pub fn source_of(&self, id: AutomatonId, in_bit: usize) -> Result<Option<(AutomatonId, usize)>> {
        let automaton = self.automaton(id)?;
        check_range(in_bit, 1, automaton.num_inputs(), "input")?;
        Ok(automaton
            .sources
            .get(in_bit)
            .map(|s| (s.endpoint.automaton, s.endpoint.bit)))
    }

    /// Input bits currently driven by output bit `out_bit` of `id`, in
    /// destination-list order.
    pub fn destinations_of(&self, id: AutomatonId, out_bit: usize) -> Result<Vec<(AutomatonId, usize)>> {
        let automaton = self.automaton(id)?;
        check_range(out_bit, 1, automaton.num_outputs(), "output")?;
        Ok(automaton
            .destinations
            .list(out_bit)
            .iter()
            .map(|d| (d.automaton, d.bit))
            .collect())
    }

    /// Audit the link invariant across the whole network.
    ///
    /// Returns false and logs every violation found.
    pub fn check_links(&self) -> bool {
        let mut consistent = true;

        for (id, automaton) in self.automata.iter() {
            for (bit, source) in automaton.sources.iter() {
                let expected = Endpoint { automaton: id, bit };
                let entry = self
                    .automata
                    .get(source.endpoint.automaton)
                    .and_then(|src| src.destinations.lists.get(source.endpoint.bit))
                    .and_then(|list| list.get(source.slot));
                if entry != Some(&expected) {
                    warn!(?id, bit, ?source, "input source has no matching destination entry");
                    consistent = false;
                }
            }

            for (bit, list) in automaton.destinations.iter() {
                for (slot, dest) in list.iter().enumerate() {
                    let expected = Source {
                        endpoint: Endpoint { automaton: id, bit },
                        slot,
                    };
                    let source = self
                        .automata
                        .get(dest.automaton)
                        .and_then(|a| a.sources.sources.get(dest.bit).copied().flatten());
                    if source != Some(expected) {
                        warn!(?id, bit, slot, ?dest, "destination entry has no matching input source");
                        consistent = false;
                    }
                }
            }
        }

        consistent
    }

    /// Secure one free slot in each destination list `connect` will append
    /// to, and enforce the fan-out limit on the final list sizes.
    fn reserve_destinations(
        &mut self,
        in_id: AutomatonId,
        in_offset: usize,
        out_id: AutomatonId,
        out_offset: usize,
        count: usize,
    ) -> Result<()> {
        // Entries the rewiring itself will remove from each target list.
        let mut released = Vec::new();
        released.try_reserve_exact(count)?;
        released.resize(count, 0usize);
        for (_, source) in self.automata[in_id]
            .sources
            .iter()
            .filter(|(bit, _)| (in_offset..in_offset + count).contains(bit))
        {
            let Endpoint { automaton, bit } = source.endpoint;
            if automaton == out_id && (out_offset..out_offset + count).contains(&bit) {
                released[bit - out_offset] += 1;
            }
        }

        let initial = self.config.destination_capacity;
        let max_fanout = self.config.max_fanout;
        let destinations = &mut self.automata[out_id].destinations;

        for (k, released) in released.into_iter().enumerate() {
            let bit = out_offset + k;
            let list = destinations.list_mut(bit);
            let final_len = list.len() + 1 - released;
            if let Some(max) = max_fanout {
                if final_len > max {
                    warn!(?out_id, bit, max, "destination list capacity exhausted");
                    return Err(MooreError::OutOfMemory(format!(
                        "output bit {} would drive {} inputs, limit is {}",
                        bit, final_len, max
                    )));
                }
            }
            reserve_one(list, initial).map_err(|e| {
                warn!(?out_id, bit, "destination list growth failed");
                e
            })?;
        }
        Ok(())
    }

    /// Append `(in_id, in_bit)` to the destinations of `(out_id, out_bit)`
    /// and record the source on the input side.
    fn bind(&mut self, in_id: AutomatonId, in_bit: usize, out_id: AutomatonId, out_bit: usize) {
        let list = self.automata[out_id].destinations.list_mut(out_bit);
        let slot = list.len();
        list.push(Endpoint {
            automaton: in_id,
            bit: in_bit,
        });

        self.automata[in_id].sources.set(
            in_bit,
            Source {
                endpoint: Endpoint {
                    automaton: out_id,
                    bit: out_bit,
                },
                slot,
            },
        );
    }

    /// Remove the connection feeding input bit `in_bit` of `in_id`, if any.
    ///
    /// Swap-removal: the last destination entry moves into the vacated slot
    /// and its owner's recorded slot is updated.
    pub(crate) fn sever(&mut self, in_id: AutomatonId, in_bit: usize) {
        let Some(source) = self.automata[in_id].sources.take(in_bit) else {
            return;
        };
        let Endpoint { automaton: out_id, bit: out_bit } = source.endpoint;

        let list = self.automata[out_id].destinations.list_mut(out_bit);
        let removed = list.swap_remove(source.slot);
        debug_assert_eq!(
            removed,
            Endpoint {
                automaton: in_id,
                bit: in_bit
            }
        );

        if let Some(&moved) = list.get(source.slot) {
            self.automata[moved.automaton]
                .sources
                .relocate(moved.bit, source.slot);
        }

        trace!(?in_id, in_bit, ?out_id, out_bit, "severed link");
    }
}
