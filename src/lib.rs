//! # concise
//!
//! A compressed, ordered set of non-negative integers backed by the CONCISE
//! (COmpressed 'N' Composable Integer SEt) word format: a run-length-encoded
//! bitmap where 32-bit words are either **literals** (one 31-bit block of the
//! uncompressed bitmap) or **sequences** (a run of identical all-zero or
//! all-one blocks, with at most one exception bit in the run's first block).
//!
//! The representation keeps every operation linear in the number of
//! *compressed* words rather than in the number of set bits, which is what
//! makes `ConciseSet` practical for sparse-or-dense integer sets spanning a
//! huge universe (`[0, MAX_ALLOWED]`).
//!
//! ## Example
//!
//! ```rs
//! use concise::ConciseSet;
//! let mut a = ConciseSet::new();
//! a.add(1).unwrap();
//! a.add(2).unwrap();
//! a.add(1000).unwrap();
//! let mut b = ConciseSet::new();
//! b.add(2).unwrap();
//! b.add(3).unwrap();
//! assert_eq!(a.intersection(&b).len(), 1);
//! ```

mod error;
mod iter;
mod ops;
mod word;

pub mod collaborators;
pub mod persist;

pub use error::Error;
pub use iter::{DescendingIter, Iter};

use std::cell::Cell;
use std::rc::Rc;
use word::{
    compact, is_literal, is_one_sequence, is_zero_sequence, literal_bit_count, literal_of, negate,
    sequence_count, sequence_exception, sequence_word, BLOCK_BITS, LITERAL_MARKER, PAYLOAD_MASK,
};

/// Largest integer a `ConciseSet` can hold: `31 * 2^25 + 30`, the limit
/// imposed by the 25-bit extra-blocks counter in a sequence word.
pub const MAX_ALLOWED: i32 = 31 * (1 << 25) + 30;

/// An ordered set of integers in `[0, MAX_ALLOWED]`, stored as a compressed
/// bitmap.
///
/// `words` and `generation` are `Rc`-shared rather than owned outright: this
/// lets a live [`Iter`]/[`DescendingIter`] hold its own handle to both without
/// borrowing `self`, so the set stays freely mutable while iterators are
/// alive, exactly as the generation-counter contract requires. Mutating
/// methods call `Rc::make_mut` on `words` (cloning only if an iterator is
/// still sharing the buffer) and always bump the shared `generation` cell.
pub struct ConciseSet {
    words: Rc<Vec<u32>>,
    /// Position (0..=30) of the highest set bit in the last word when the
    /// tail is a literal, or 30 when the tail is a 1-run. Meaningless
    /// (sentinel -1) while the set is empty.
    last_set_bit_of_last_word: i64,
    /// Largest member, or -1 when empty.
    max_set_bit: i64,
    /// Cardinality cache.
    size: usize,
    generation: Rc<Cell<u64>>,
}

impl ConciseSet {
    /// An empty set.
    pub fn new() -> Self {
        ConciseSet {
            words: Rc::new(Vec::new()),
            last_set_bit_of_last_word: -1,
            max_set_bit: -1,
            size: 0,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Builds a set from values already known to be strictly ascending and
    /// unique. `O(n)` via repeated `append`; fails if the ordering or range
    /// is violated.
    pub fn from_sorted_iter<I: IntoIterator<Item = i32>>(iter: I) -> Result<Self, Error> {
        let mut s = Self::new();
        for x in iter {
            Self::check_range(x)?;
            if x as i64 <= s.max_set_bit {
                return Err(Error::OutOfRange);
            }
            s.append_unchecked(x);
        }
        Ok(s)
    }

    /// Builds a set from an arbitrary collection: sorts and deduplicates
    /// first, then builds via [`ConciseSet::from_sorted_iter`].
    pub fn from_collection(values: impl IntoIterator<Item = i32>) -> Result<Self, Error> {
        let mut v: Vec<i32> = values.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Self::from_sorted_iter(v)
    }

    fn check_range(x: i32) -> Result<(), Error> {
        if x < 0 || x > MAX_ALLOWED {
            Err(Error::OutOfRange)
        } else {
            Ok(())
        }
    }

    pub(crate) fn singleton(x: i32) -> Self {
        let mut s = Self::new();
        s.append_unchecked(x);
        s
    }

    /// Builds a set directly from a finished word buffer: trims trailing
    /// zero words and recomputes the cached scalars in one linear pass.
    /// Crate-private; callers only ever reach this through a public
    /// operation that already produced a valid word sequence.
    pub(crate) fn from_raw_words(mut words: Vec<u32>) -> Self {
        let len = trim_zeros(&mut words);
        words.truncate(len);
        if words.is_empty() {
            return Self::new();
        }
        let (size, max_set_bit, last_set_bit_of_last_word) = recompute(&words);
        ConciseSet {
            words: Rc::new(words),
            last_set_bit_of_last_word,
            max_set_bit,
            size,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Swaps in the content of `other`, keeping this set's own generation
    /// cell (so outstanding iterators observe the bump) instead of adopting
    /// `other`'s fresh one.
    fn replace_with(&mut self, other: ConciseSet) {
        self.words = other.words;
        self.size = other.size;
        self.max_set_bit = other.max_set_bit;
        self.last_set_bit_of_last_word = other.last_set_bit_of_last_word;
        self.generation.set(self.generation.get() + 1);
    }

    pub(crate) fn words_slice(&self) -> &[u32] {
        &self.words
    }

    /// Number of compressed 32-bit words backing this set.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub(crate) fn last_set_bit(&self) -> i64 {
        self.max_set_bit
    }

    // ---- queries ----------------------------------------------------

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn contains(&self, x: i32) -> bool {
        if x < 0 || x as i64 > self.max_set_bit {
            return false;
        }
        let mut block_index = x / BLOCK_BITS as i32;
        let bit_pos = (x % BLOCK_BITS as i32) as u32;
        let mut i = 0usize;
        while i < self.words.len() {
            let w = self.words[i];
            if is_literal(w) {
                if block_index == 0 {
                    return w & (1 << bit_pos) != 0;
                }
                block_index -= 1;
                i += 1;
            } else {
                let count = sequence_count(w) as i32;
                if block_index <= count {
                    if block_index == 0 {
                        let exception = sequence_exception(w);
                        let is_exception_bit = exception != 0 && exception - 1 == bit_pos;
                        return if is_one_sequence(w) {
                            !is_exception_bit
                        } else {
                            is_exception_bit
                        };
                    }
                    return is_one_sequence(w);
                }
                block_index -= count + 1;
                i += 1;
            }
        }
        false
    }

    pub fn first(&self) -> Result<i32, Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let lit = literal_of(self.words[0]);
        Ok((lit & PAYLOAD_MASK).trailing_zeros() as i32)
    }

    pub fn last(&self) -> Result<i32, Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        Ok(self.max_set_bit as i32)
    }

    pub fn iter(&self) -> Iter {
        Iter::new(self)
    }

    pub fn descending_iter(&self) -> DescendingIter {
        DescendingIter::new(self)
    }

    pub fn contains_all(&self, other: &Self) -> bool {
        ops::contains_all(self, other)
    }

    pub fn contains_any(&self, other: &Self) -> bool {
        ops::contains_any(self, other)
    }

    pub fn contains_at_least(&self, other: &Self, min_elements: usize) -> bool {
        ops::contains_at_least(self, other, min_elements)
    }

    pub fn intersection_size(&self, other: &Self) -> usize {
        ops::intersection_size(self, other)
    }

    pub fn complement_size(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.max_set_bit as usize + 1) - self.size
    }

    pub fn bitmap_compression_ratio(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let bits = self.max_set_bit as u64 + 1;
        let words32 = (bits + 31) / 32;
        self.words.len() as f64 / words32 as f64
    }

    pub fn collection_compression_ratio(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.words.len() as f64 / self.size as f64
    }

    // ---- single-element mutations ------------------------------------

    pub fn add(&mut self, x: i32) -> Result<bool, Error> {
        Self::check_range(x)?;
        if self.is_empty() || x as i64 > self.max_set_bit {
            self.append_unchecked(x);
            return Ok(true);
        }
        if self.contains(x) {
            return Ok(false);
        }
        if self.try_add_fast_path(x) {
            self.generation.set(self.generation.get() + 1);
            log::trace!("add({x}) handled in place");
            return Ok(true);
        }
        log::trace!("add({x}) falling back to union with a singleton");
        let result = ops::apply(ops::BooleanOp::Or, self, &Self::singleton(x));
        self.replace_with(result);
        Ok(true)
    }

    /// Only handles the common case of landing on a literal with room to
    /// spare. Landing inside a sequence word is always routed to the slow
    /// path (see DESIGN.md): the spec allows this, since the observable
    /// result must match a full OR regardless of which path is taken.
    fn try_add_fast_path(&mut self, x: i32) -> bool {
        let words = Rc::make_mut(&mut self.words);
        let mut block_index = x / BLOCK_BITS as i32;
        let bit_pos = (x % BLOCK_BITS as i32) as u32;
        let mut i = 0usize;
        loop {
            if i >= words.len() {
                return false;
            }
            let w = words[i];
            if is_literal(w) {
                if block_index == 0 {
                    if literal_bit_count(w) >= BLOCK_BITS - 2 {
                        return false;
                    }
                    words[i] = w | (1 << bit_pos);
                    return true;
                }
                block_index -= 1;
                i += 1;
            } else {
                let count = sequence_count(w) as i32;
                if block_index <= count {
                    return false;
                }
                block_index -= count + 1;
                i += 1;
            }
        }
    }

    pub fn remove(&mut self, x: i32) -> Result<bool, Error> {
        Self::check_range(x)?;
        if !self.contains(x) {
            return Ok(false);
        }
        if x as i64 == self.max_set_bit {
            // Removing the current maximum always takes the slow path: the
            // boolean-op engine's recompute pass already finds the new
            // max_set_bit correctly, and a hand-written backward scan would
            // only pay off for repeated removal of the running maximum.
            log::trace!("remove({x}) is the current max, using AndNot slow path");
            let result = ops::apply(ops::BooleanOp::AndNot, self, &Self::singleton(x));
            self.replace_with(result);
            return Ok(true);
        }
        if self.try_remove_fast_path(x) {
            self.generation.set(self.generation.get() + 1);
            return Ok(true);
        }
        let result = ops::apply(ops::BooleanOp::AndNot, self, &Self::singleton(x));
        self.replace_with(result);
        Ok(true)
    }

    fn try_remove_fast_path(&mut self, x: i32) -> bool {
        let words = Rc::make_mut(&mut self.words);
        let mut block_index = x / BLOCK_BITS as i32;
        let bit_pos = (x % BLOCK_BITS as i32) as u32;
        let mut i = 0usize;
        loop {
            if i >= words.len() {
                return false;
            }
            let w = words[i];
            if is_literal(w) {
                if block_index == 0 {
                    let new_payload = (w & PAYLOAD_MASK) & !(1 << bit_pos);
                    if new_payload == 0 {
                        return false;
                    }
                    words[i] = LITERAL_MARKER | new_payload;
                    return true;
                }
                block_index -= 1;
                i += 1;
            } else {
                let count = sequence_count(w) as i32;
                if block_index <= count {
                    return false;
                }
                block_index -= count + 1;
                i += 1;
            }
        }
    }

    pub fn flip(&mut self, x: i32) -> Result<(), Error> {
        if self.contains(x) {
            self.remove(x)?;
        } else {
            self.add(x)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.words = Rc::new(Vec::new());
        self.size = 0;
        self.max_set_bit = -1;
        self.last_set_bit_of_last_word = -1;
        self.generation.set(self.generation.get() + 1);
    }

    // ---- bulk mutations ------------------------------------------------

    pub fn add_all(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        let result = ops::apply(ops::BooleanOp::Or, self, other);
        self.replace_with(result);
    }

    pub fn remove_all(&mut self, other: &Self) {
        if other.is_empty() || self.is_empty() {
            return;
        }
        let result = ops::apply(ops::BooleanOp::AndNot, self, other);
        self.replace_with(result);
    }

    pub fn retain_all(&mut self, other: &Self) {
        let result = ops::apply(ops::BooleanOp::And, self, other);
        self.replace_with(result);
    }

    pub fn complement(&mut self) -> Result<(), Error> {
        if self.max_set_bit <= 0 {
            self.clear();
            return Ok(());
        }
        let mut words: Vec<u32> = self.words.iter().map(|&w| negate(w)).collect();
        if self.last_set_bit_of_last_word < BLOCK_BITS as i64 - 1 {
            let idx = words.len() - 1;
            let keep_bits = (1u32 << (self.last_set_bit_of_last_word + 1)) - 1;
            words[idx] = LITERAL_MARKER | (words[idx] & PAYLOAD_MASK & keep_bits);
        }
        let len = compact(&mut words, words.len());
        words.truncate(len);
        let replacement = Self::from_raw_words(words);
        self.replace_with(replacement);
        Ok(())
    }

    pub fn fill(&mut self, from: i32, to: i32) -> Result<(), Error> {
        if from > to {
            return Err(Error::OutOfRange);
        }
        Self::check_range(from)?;
        Self::check_range(to)?;
        let range_set = Self::from_raw_words(range_words(from, to));
        let result = ops::apply(ops::BooleanOp::Or, self, &range_set);
        self.replace_with(result);
        Ok(())
    }

    pub fn clear_range(&mut self, from: i32, to: i32) -> Result<(), Error> {
        if from > to {
            return Err(Error::OutOfRange);
        }
        Self::check_range(from)?;
        Self::check_range(to)?;
        let range_set = Self::from_raw_words(range_words(from, to));
        let result = ops::apply(ops::BooleanOp::AndNot, self, &range_set);
        self.replace_with(result);
        Ok(())
    }

    // ---- pure operators --------------------------------------------------

    pub fn intersection(&self, other: &Self) -> Self {
        ops::apply(ops::BooleanOp::And, self, other)
    }

    pub fn union(&self, other: &Self) -> Self {
        ops::apply(ops::BooleanOp::Or, self, other)
    }

    pub fn difference(&self, other: &Self) -> Self {
        ops::apply(ops::BooleanOp::AndNot, self, other)
    }

    pub fn symmetric_difference(&self, other: &Self) -> Self {
        ops::apply(ops::BooleanOp::Xor, self, other)
    }

    pub fn complemented(&self) -> Self {
        let mut c = self.clone();
        let _ = c.complement();
        c
    }

    // ---- append/compaction engine ----------------------------------------

    /// Appends `x`, which must be strictly greater than `max_set_bit` (or the
    /// set must be empty). See SPEC_FULL.md §4.2 for the derivation of this
    /// algorithm from the `position`/`d` relative-offset bookkeeping.
    fn append_unchecked(&mut self, x: i32) {
        if self.words.is_empty() {
            self.append_first(x);
        } else {
            self.append_continuing(x);
        }
    }

    fn append_first(&mut self, x: i32) {
        let block_index = x / BLOCK_BITS as i32;
        let bit = (x % BLOCK_BITS as i32) as u32;
        let words = Rc::make_mut(&mut self.words);
        if block_index == 1 {
            words.push(LITERAL_MARKER);
        } else if block_index > 1 {
            words.push(sequence_word(0, false, (block_index - 1) as u32));
        }
        words.push(LITERAL_MARKER | (1 << bit));
        if bit == BLOCK_BITS - 1 {
            let len = compact(words, words.len());
            words.truncate(len);
        }
        self.max_set_bit = x as i64;
        self.size = 1;
        self.last_set_bit_of_last_word = bit as i64;
        self.generation.set(self.generation.get() + 1);
    }

    fn append_continuing(&mut self, x: i32) {
        let d = x as i64 - self.max_set_bit;
        let position = self.last_set_bit_of_last_word + d;
        let words = Rc::make_mut(&mut self.words);
        if position >= BLOCK_BITS as i64 {
            let zero_blocks = position / BLOCK_BITS as i64 - 1;
            let tail_idx = words.len() - 1;
            let tail = words[tail_idx];
            let tail_absorbs_exception = is_literal(tail) && literal_bit_count(tail) == 1;
            if zero_blocks == 0 {
                words.push(LITERAL_MARKER);
            } else if !tail_absorbs_exception {
                if zero_blocks == 1 {
                    words.push(LITERAL_MARKER);
                } else {
                    words.push(sequence_word(0, false, (zero_blocks - 1) as u32));
                }
                words.push(LITERAL_MARKER);
            } else {
                // The run must cover the absorbed literal's block plus all
                // `zero_blocks` intervening zero blocks, so `extra = zero_blocks`
                // (unlike the non-absorbing branch above, where the old literal
                // stays as its own word and only `zero_blocks - 1` run blocks
                // are needed before the new tail literal).
                let bit_index = (tail & PAYLOAD_MASK).trailing_zeros();
                words[tail_idx] = sequence_word(bit_index + 1, false, zero_blocks as u32);
                words.push(LITERAL_MARKER);
            }
        }
        let bit_in_block = position.rem_euclid(BLOCK_BITS as i64) as u32;
        let new_tail_idx = words.len() - 1;
        words[new_tail_idx] |= 1 << bit_in_block;
        if bit_in_block == BLOCK_BITS - 1 {
            let len = compact(words, words.len());
            words.truncate(len);
            log::trace!("append({x}) merged a full block into the preceding run");
        }
        self.max_set_bit = x as i64;
        self.size += 1;
        self.last_set_bit_of_last_word = bit_in_block as i64;
        self.generation.set(self.generation.get() + 1);
    }
}

impl Default for ConciseSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConciseSet {
    /// Shares the word buffer (copy-on-write) but starts a fresh generation
    /// counter: the clone is a logically independent instance, so mutating
    /// it must not poison iterators over the original and vice versa.
    fn clone(&self) -> Self {
        ConciseSet {
            words: Rc::clone(&self.words),
            last_set_bit_of_last_word: self.last_set_bit_of_last_word,
            max_set_bit: self.max_set_bit,
            size: self.size,
            generation: Rc::new(Cell::new(0)),
        }
    }
}

impl PartialEq for ConciseSet {
    fn eq(&self, other: &Self) -> bool {
        *self.words == *other.words
    }
}

impl Eq for ConciseSet {}

impl std::hash::Hash for ConciseSet {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (*self.words).hash(state);
    }
}

impl std::fmt::Debug for ConciseSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConciseSet")
            .field("len", &self.size)
            .field("words", &self.words.len())
            .field("max", &self.max_set_bit)
            .finish()
    }
}

/// Strips trailing all-zero words and folds a trailing no-exception 0-run
/// into its literal form. Returns the new logical length.
fn trim_zeros(words: &mut [u32]) -> usize {
    let mut len = words.len();
    while len > 0 {
        let last = words[len - 1];
        if is_literal(last) {
            if last & PAYLOAD_MASK == 0 {
                len -= 1;
                continue;
            }
            break;
        }
        if is_zero_sequence(last) {
            let lit = literal_of(last);
            if lit & PAYLOAD_MASK == 0 {
                len -= 1;
                continue;
            }
            words[len - 1] = lit;
            break;
        }
        break;
    }
    len
}

/// Derives `(size, max_set_bit, last_set_bit_of_last_word)` from a word
/// buffer already known to satisfy the tail invariant (last word is a
/// non-empty literal or a 1-run — guaranteed by [`trim_zeros`]).
fn recompute(words: &[u32]) -> (usize, i64, i64) {
    let mut size: u64 = 0;
    let mut blocks_before: i64 = 0;
    for &w in &words[..words.len() - 1] {
        if is_literal(w) {
            size += literal_bit_count(w) as u64;
            blocks_before += 1;
        } else {
            let count = sequence_count(w) as i64;
            let has_exception = sequence_exception(w) != 0;
            if is_one_sequence(w) {
                size += (count + 1) as u64 * BLOCK_BITS as u64 - u64::from(has_exception);
            } else {
                size += u64::from(has_exception);
            }
            blocks_before += count + 1;
        }
    }
    let tail = words[words.len() - 1];
    let (tail_size, max_set_bit, last_set_bit_of_last_word) = if is_literal(tail) {
        let bits = literal_bit_count(tail) as u64;
        let highest = (BLOCK_BITS - (tail & PAYLOAD_MASK).leading_zeros()) as i64;
        let max = blocks_before * BLOCK_BITS as i64 + highest;
        (bits, max, highest)
    } else {
        let count = sequence_count(tail) as i64;
        let has_exception = sequence_exception(tail) != 0;
        let bits = (count + 1) as u64 * BLOCK_BITS as u64 - u64::from(has_exception);
        let last_block_index = blocks_before + count;
        let max = last_block_index * BLOCK_BITS as i64 + (BLOCK_BITS as i64 - 1);
        (bits, max, BLOCK_BITS as i64 - 1)
    };
    size += tail_size;
    (size as usize, max_set_bit, last_set_bit_of_last_word)
}

/// Builds the compressed word form of the contiguous range `[from, to]`
/// directly (boundary literals plus one run for any full blocks between
/// them), so that `fill`/`clear_range` stay `O(words)` rather than `O(range)`.
fn range_words(from: i32, to: i32) -> Vec<u32> {
    let from_block = from / BLOCK_BITS as i32;
    let to_block = to / BLOCK_BITS as i32;
    let from_bit = (from % BLOCK_BITS as i32) as u32;
    let to_bit = (to % BLOCK_BITS as i32) as u32;

    let mut words = Vec::new();
    if from_block == to_block {
        let width = to_bit - from_bit + 1;
        let mask = if width == 32 { !0u32 } else { (1u32 << width) - 1 };
        words.push(LITERAL_MARKER | ((mask << from_bit) & PAYLOAD_MASK));
        return words;
    }
    let lead_mask = (!0u32 << from_bit) & PAYLOAD_MASK;
    words.push(LITERAL_MARKER | lead_mask);
    let full_blocks = to_block - from_block - 1;
    if full_blocks > 0 {
        words.push(sequence_word(0, true, (full_blocks - 1) as u32));
    }
    let trail_mask = if to_bit == BLOCK_BITS - 1 {
        PAYLOAD_MASK
    } else {
        (1u32 << (to_bit + 1)) - 1
    };
    words.push(LITERAL_MARKER | trail_mask);
    let len = compact(&mut words, words.len());
    words.truncate(len);
    words
}

#[cfg(test)]
impl ConciseSet {
    pub(crate) fn iter_values(&self) -> Vec<i32> {
        self.iter().map(|r| r.unwrap()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_contains() {
        let mut s = ConciseSet::new();
        assert!(s.is_empty());
        assert_eq!(s.add(5).unwrap(), true);
        assert_eq!(s.add(5).unwrap(), false);
        assert!(s.contains(5));
        assert!(!s.contains(6));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn append_compacts_two_block_run() {
        let mut s = ConciseSet::new();
        for x in 0..=61 {
            s.add(x).unwrap();
        }
        assert_eq!(s.len(), 62);
        assert_eq!(s.first().unwrap(), 0);
        assert_eq!(s.last().unwrap(), 61);
        assert_eq!(s.word_count(), 1);
    }

    #[test]
    fn out_of_range_rejected() {
        let mut s = ConciseSet::new();
        assert_eq!(s.add(MAX_ALLOWED), Ok(true));
        assert_eq!(s.add(MAX_ALLOWED + 1), Err(Error::OutOfRange));
    }

    #[test]
    fn remove_and_flip() {
        let mut s = ConciseSet::from_collection([1, 2, 3]).unwrap();
        assert_eq!(s.remove(2).unwrap(), true);
        assert!(!s.contains(2));
        assert_eq!(s.len(), 2);
        s.flip(2).unwrap();
        assert!(s.contains(2));
        s.flip(2).unwrap();
        assert!(!s.contains(2));
    }

    #[test]
    fn complement_involution() {
        let s = ConciseSet::from_collection([1, 2, 30000]).unwrap();
        assert_eq!(s.complement_size(), 30000 - 3 + 1);
        assert_eq!(s.complemented().complemented(), s);
    }

    #[test]
    fn complement_of_singleton_zero_is_empty() {
        let s = ConciseSet::from_collection([0]).unwrap();
        assert!(s.complemented().is_empty());
    }

    #[test]
    fn symmetric_difference_single_element() {
        let s = ConciseSet::from_collection([1, 100]).unwrap();
        let t = ConciseSet::from_collection([100]).unwrap();
        assert_eq!(s.symmetric_difference(&t), ConciseSet::from_collection([1]).unwrap());
        assert_eq!(s.symmetric_difference(&ConciseSet::new()), s);
    }

    #[test]
    fn fill_and_clear_range() {
        let mut s = ConciseSet::new();
        s.fill(10, 70).unwrap();
        assert_eq!(s.len(), 61);
        assert_eq!(s.first().unwrap(), 10);
        assert_eq!(s.last().unwrap(), 70);
        s.clear_range(20, 30).unwrap();
        assert!(!s.contains(25));
        assert!(s.contains(15));
        assert!(s.contains(65));
    }

    #[test]
    fn round_trip_via_iteration() {
        let values: Vec<i32> = vec![0, 1, 5, 31, 62, 1000, 100_000, MAX_ALLOWED];
        let s = ConciseSet::from_collection(values.clone()).unwrap();
        let rebuilt = ConciseSet::from_sorted_iter(s.iter_values()).unwrap();
        assert_eq!(rebuilt, s);
    }

    #[test]
    fn hash_matches_equal_sets() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let a = ConciseSet::from_collection([1, 2, 3]).unwrap();
        let b = ConciseSet::from_collection([3, 2, 1]).unwrap();
        assert_eq!(a, b);
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }
}
