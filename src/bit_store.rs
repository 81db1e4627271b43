//! BitStore - Fixed-width packed boolean storage over 64-bit words.
//!
//! Every automaton keeps its state, scratch state, input and output as a
//! `BitStore`. The width is fixed at creation; a store of width `w` occupies
//! `ceil(w / 64)` words.
//!
//! # Design
//!
//! - Uses `BitVec<u64, Lsb0>` for storage (64-bit words, LSB-first ordering)
//! - Bit indexing: word_idx = bit_idx / 64, bit_offset = bit_idx % 64
//! - Padding bits past the width in the last word are always zero, so word
//!   comparison and word export are exact
//!
//! # Examples
//!
//! ```
//! use moorenet::BitStore;
//!
//! let mut bs = BitStore::new(70);
//! bs.set_bit(3);
//! bs.set_bit(65);
//! assert_eq!(bs.num_words(), 2);
//! assert_eq!(bs.words(), &[1 << 3, 1 << 1]);
//! ```

use crate::error::{MooreError, Result};
use bitvec::{order::Lsb0, vec::BitVec};

/// Word type for bit storage (64-bit unsigned integer)
pub type Word = u64;

/// Number of bits per word
pub const BITS_PER_WORD: usize = 64;

/// Maximum word value
const WORD_MAX: Word = Word::MAX;

/// Create bitmask with n bits set (from LSB)
#[inline(always)]
const fn bitmask(n: usize) -> Word {
    if n == 0 {
        0
    } else if n >= BITS_PER_WORD {
        WORD_MAX
    } else {
        WORD_MAX >> (BITS_PER_WORD - n)
    }
}

/// Number of words needed to hold `width` bits.
///
/// ```
/// use moorenet::bit_store::words_for;
///
/// assert_eq!(words_for(0), 0);
/// assert_eq!(words_for(64), 1);
/// assert_eq!(words_for(65), 2);
/// ```
#[inline(always)]
pub const fn words_for(width: usize) -> usize {
    width.div_ceil(BITS_PER_WORD)
}

/// Fixed-width packed bit array with word-level access.
///
/// All bit indices are 0-based. Bit accessors check bounds with
/// `debug_assert!` only; the engine validates ranges before touching a
/// store.
#[derive(Clone, Debug, Default)]
pub struct BitStore {
    /// Underlying bitvec storage with u64 words, LSB0 ordering
    bv: BitVec<u64, Lsb0>,
}

impl BitStore {
    /// Create a new BitStore with `width` bits, all initialized to 0.
    ///
    /// # Panics
    ///
    /// Aborts like any `Vec` allocation if memory is exhausted. Use
    /// [`BitStore::try_new`] to observe the failure instead.
    #[inline]
    pub fn new(width: usize) -> Self {
        Self {
            bv: BitVec::repeat(false, width),
        }
    }

    /// Create a new zeroed BitStore, reporting allocation failure as
    /// `OutOfMemory`.
    pub fn try_new(width: usize) -> Result<Self> {
        let num_words = words_for(width);
        let mut words: Vec<Word> = Vec::new();
        words.try_reserve_exact(num_words).map_err(|e| {
            MooreError::OutOfMemory(format!("bit store of {} bits: {}", width, e))
        })?;
        words.resize(num_words, 0);

        let mut bv = BitVec::from_vec(words);
        bv.truncate(width);
        Ok(Self { bv })
    }

    /// Create a BitStore of `width` bits from raw words.
    ///
    /// Fails with `InvalidArgument` if `words` is shorter than
    /// `words_for(width)`. Extra words and bits past `width` are ignored.
    pub fn from_words(width: usize, words: &[Word]) -> Result<Self> {
        let mut store = Self::try_new(width)?;
        store.copy_from_words(words)?;
        Ok(store)
    }

    /// Get total number of bits.
    #[inline(always)]
    pub fn num_bits(&self) -> usize {
        self.bv.len()
    }

    /// Get number of words.
    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.bv.as_raw_slice().len()
    }

    // =========================================================================
    // Single Bit Operations
    // =========================================================================

    /// Get bit at position `b`.
    #[inline]
    pub fn get_bit(&self, b: usize) -> bool {
        debug_assert!(b < self.bv.len(), "bit index {} out of bounds (length: {})", b, self.bv.len());
        self.bv[b]
    }

    /// Set bit at position `b` to 1.
    #[inline]
    pub fn set_bit(&mut self, b: usize) {
        self.assign_bit(b, true);
    }

    /// Clear bit at position `b` (set to 0).
    #[inline]
    pub fn clear_bit(&mut self, b: usize) {
        self.assign_bit(b, false);
    }

    /// Toggle bit at position `b` (0 -> 1, 1 -> 0).
    #[inline]
    pub fn toggle_bit(&mut self, b: usize) {
        debug_assert!(b < self.bv.len(), "bit index {} out of bounds (length: {})", b, self.bv.len());
        let current = self.bv[b];
        self.bv.set(b, !current);
    }

    /// Assign bit at position `b` to `val`.
    ///
    /// Leaves the word untouched when the bit already holds `val`.
    #[inline]
    pub fn assign_bit(&mut self, b: usize, val: bool) {
        debug_assert!(b < self.bv.len(), "bit index {} out of bounds (length: {})", b, self.bv.len());
        if self.bv[b] != val {
            self.bv.set(b, val);
        }
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Clear all bits to 0.
    pub fn clear_all(&mut self) {
        self.bv.fill(false);
    }

    /// Count number of set bits.
    #[inline]
    pub fn num_set(&self) -> usize {
        self.bv.count_ones()
    }

    /// Get indices of all set bits in ascending order.
    pub fn get_acts(&self) -> Vec<usize> {
        self.bv.iter_ones().collect()
    }

    // =========================================================================
    // Word-Level Access
    // =========================================================================

    /// Get direct read-only access to word storage.
    #[inline(always)]
    pub fn words(&self) -> &[Word] {
        self.bv.as_raw_slice()
    }

    /// Overwrite the whole store from `src` words.
    ///
    /// Copies `num_words()` words and masks the padding of the last word.
    /// Fails with `InvalidArgument` if `src` is too short; the store is left
    /// untouched in that case.
    pub fn copy_from_words(&mut self, src: &[Word]) -> Result<()> {
        let num_words = self.num_words();
        if src.len() < num_words {
            return Err(MooreError::invalid(format!(
                "buffer holds {} words, {} bits need {}",
                src.len(),
                self.num_bits(),
                num_words
            )));
        }

        let num_bits = self.bv.len();
        let words = self.bv.as_raw_mut_slice();
        words.copy_from_slice(&src[..num_words]);

        if num_bits % BITS_PER_WORD != 0 {
            words[num_words - 1] &= bitmask(num_bits % BITS_PER_WORD);
        }
        Ok(())
    }

    /// Word-level copy from another store of the same width.
    ///
    /// # Panics
    ///
    /// Panics if the widths differ.
    #[inline]
    pub fn copy_from(&mut self, src: &BitStore) {
        assert_eq!(self.bv.len(), src.bv.len(), "BitStores must have same size");
        self.bv
            .as_raw_mut_slice()
            .copy_from_slice(src.bv.as_raw_slice());
    }
}

impl PartialEq for BitStore {
    /// Compare BitStores word by word.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bv.len() == other.bv.len() && self.bv.as_raw_slice() == other.bv.as_raw_slice()
    }
}

impl Eq for BitStore {}
