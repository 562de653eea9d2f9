//! Word-level and bit-level iteration over a [`crate::ConciseSet`].
//!
//! [`WordIterator`] is the internal workhorse the boolean-op engine drives in
//! lock-step over two sets; it borrows its host's words for the duration of
//! one operation and never outlives it. [`Iter`] and [`DescendingIter`] are
//! the public, fail-fast member iterators: they hold their own `Rc` snapshot
//! of the word buffer, so the set they came from stays freely mutable while
//! they're alive (the whole point of the generation-counter design --
//! Rust's borrow checker would otherwise make a stale-iterator bug simply
//! impossible to trigger, which would defeat the purpose of testing it).

use crate::error::Error;
use crate::word::*;
use crate::ConciseSet;
use std::rc::Rc;

/// Lazily decodes a compressed word buffer into a stream of 31-bit literal
/// blocks, one block at a time, without ever materializing the whole
/// uncompressed bitmap. Internal use only (the boolean-op engine).
pub(crate) struct WordIterator<'a> {
    words: &'a [u32],
    word_index: usize,
    /// A mutable copy of `words[word_index]`; sequence words have their
    /// count decremented here as blocks are consumed.
    word_copy: u32,
    /// Words left strictly after `word_index`, or `-1` once exhausted.
    remaining_words: i64,
}

impl<'a> WordIterator<'a> {
    pub(crate) fn new(words: &'a [u32]) -> Self {
        if words.is_empty() {
            return Self {
                words,
                word_index: 0,
                word_copy: 0,
                remaining_words: -1,
            };
        }
        Self {
            words,
            word_index: 0,
            word_copy: words[0],
            remaining_words: (words.len() - 1) as i64,
        }
    }

    pub(crate) fn end_of_words(&self) -> bool {
        self.remaining_words < 0
    }

    pub(crate) fn has_more_literals(&self) -> bool {
        if self.end_of_words() {
            return false;
        }
        self.remaining_words > 0 || sequence_count(self.word_copy) > 0 || is_literal(self.word_copy)
    }

    /// The literal form of the block the cursor currently sits on.
    pub(crate) fn current_literal(&self) -> u32 {
        literal_of(self.word_copy)
    }

    pub(crate) fn is_no_exception_sequence(&self) -> bool {
        is_sequence(self.word_copy) && sequence_exception(self.word_copy) == 0
    }

    pub(crate) fn sequence_polarity_is_one(&self) -> bool {
        is_one_sequence(self.word_copy)
    }

    /// Moves one block forward.
    pub(crate) fn advance(&mut self) {
        if self.end_of_words() {
            return;
        }
        if is_literal(self.word_copy) || sequence_count(self.word_copy) == 0 {
            if self.remaining_words <= 0 {
                self.remaining_words = -1;
            } else {
                self.word_index += 1;
                self.word_copy = self.words[self.word_index];
                self.remaining_words -= 1;
            }
        } else {
            // Interior block of a run: drop the count, and the exception only
            // ever applies to the first block, so clear it for the rest.
            self.word_copy = sequence_without_exception(self.word_copy) - 1;
        }
    }

    /// Drains this iterator's current sequence down to zero blocks in one
    /// step, returning the number of blocks skipped. A later `advance()`
    /// moves on to the next stored word.
    pub(crate) fn skip_remaining_sequence(&mut self) -> u32 {
        let n = sequence_count(self.word_copy);
        self.word_copy -= n;
        n
    }

    /// When both iterators sit on a no-exception sequence of identical
    /// polarity, consumes `min(count_a, count_b)` blocks from both at once.
    pub(crate) fn skip_both_sequences(a: &mut WordIterator, b: &mut WordIterator) -> u32 {
        let n = sequence_count(a.word_copy).min(sequence_count(b.word_copy));
        a.word_copy -= n;
        b.word_copy -= n;
        n
    }
}

/// A single step of decoding through an `Rc`-backed word buffer: which word,
/// which block within it (for runs), and the absolute integer base of that
/// block. Shared by `Iter` and `DescendingIter`.
struct BlockCursor {
    words: Rc<Vec<u32>>,
    word_index: i64,
    /// Blocks of the current word not yet visited, counting the current one.
    blocks_left_in_word: i64,
}

impl BlockCursor {
    fn blocks_in(w: u32) -> i64 {
        if is_literal(w) {
            1
        } else {
            1 + sequence_count(w) as i64
        }
    }

    fn current_word(&self) -> u32 {
        self.words[self.word_index as usize]
    }
}

/// Forward, ascending iterator over the members of a `ConciseSet`.
///
/// Fails fast with [`Error::ConcurrentModification`] if the set is mutated
/// during iteration. Does not support removal; there is no such method on
/// this type (see [`Error::Unsupported`]).
pub struct Iter {
    words: Rc<Vec<u32>>,
    word_index: usize,
    word_copy: u32,
    remaining_words: i64,
    first_bit_of_current_word: i64,
    next_bit_to_check: u32,
    generation: Rc<std::cell::Cell<u64>>,
    generation_at_creation: u64,
    poisoned: bool,
}

impl Iter {
    pub(crate) fn new(source: &ConciseSet) -> Self {
        let words = Rc::clone(&source.words);
        let (word_index, word_copy, remaining_words) = if words.is_empty() {
            (0, 0, -1)
        } else {
            (0, words[0], (words.len() - 1) as i64)
        };
        Self {
            words,
            word_index,
            word_copy,
            remaining_words,
            first_bit_of_current_word: 0,
            next_bit_to_check: 0,
            generation: Rc::clone(&source.generation),
            generation_at_creation: source.generation.get(),
            poisoned: false,
        }
    }

    fn end_of_words(&self) -> bool {
        self.remaining_words < 0
    }

    fn advance_block(&mut self) {
        if is_literal(self.word_copy) || sequence_count(self.word_copy) == 0 {
            if self.remaining_words <= 0 {
                self.remaining_words = -1;
            } else {
                self.word_index += 1;
                self.word_copy = self.words[self.word_index];
                self.remaining_words -= 1;
            }
        } else {
            self.word_copy = sequence_without_exception(self.word_copy) - 1;
        }
    }
}

impl Iterator for Iter {
    type Item = Result<i32, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return Some(Err(Error::ConcurrentModification));
        }
        if self.generation.get() != self.generation_at_creation {
            self.poisoned = true;
            return Some(Err(Error::ConcurrentModification));
        }
        loop {
            if self.end_of_words() {
                return None;
            }
            let payload = literal_of(self.word_copy) & PAYLOAD_MASK;
            let mask = payload & (!0u32 << self.next_bit_to_check);
            if mask != 0 {
                let offset = mask.trailing_zeros();
                let value = self.first_bit_of_current_word + offset as i64;
                self.next_bit_to_check = offset + 1;
                return Some(Ok(value as i32));
            }
            // This block is spent. A zero-run can hide many more empty
            // blocks behind it; skip them all in one step.
            if is_zero_sequence(self.word_copy) {
                let remaining = sequence_count(self.word_copy);
                self.word_copy -= remaining;
                self.first_bit_of_current_word += BLOCK_BITS as i64 * remaining as i64;
            }
            self.first_bit_of_current_word += BLOCK_BITS as i64;
            self.advance_block();
            self.next_bit_to_check = 0;
        }
    }
}

/// Backward, descending iterator over the members of a `ConciseSet`.
///
/// Offered as a convenience: it walks the word array from the tail and does
/// not share `Iter`'s cursor machinery. Shares the same generation-check,
/// fail-fast contract.
pub struct DescendingIter {
    cursor: BlockCursor,
    current_block_base: i64,
    next_bit_to_check: i32,
    generation: Rc<std::cell::Cell<u64>>,
    generation_at_creation: u64,
    poisoned: bool,
}

impl DescendingIter {
    pub(crate) fn new(source: &ConciseSet) -> Self {
        let words = Rc::clone(&source.words);
        if words.is_empty() {
            return Self {
                cursor: BlockCursor {
                    words,
                    word_index: -1,
                    blocks_left_in_word: 0,
                },
                current_block_base: 0,
                next_bit_to_check: -1,
                generation: Rc::clone(&source.generation),
                generation_at_creation: source.generation.get(),
                poisoned: false,
            };
        }
        let word_index = (words.len() - 1) as i64;
        let w = words[word_index as usize];
        let blocks = BlockCursor::blocks_in(w);
        let current_block_base = source.max_set_bit as i64 - source.last_set_bit_of_last_word as i64;
        Self {
            cursor: BlockCursor {
                words,
                word_index,
                blocks_left_in_word: blocks,
            },
            current_block_base,
            next_bit_to_check: 30,
            generation: Rc::clone(&source.generation),
            generation_at_creation: source.generation.get(),
            poisoned: false,
        }
    }

    fn current_block_pattern(&self) -> u32 {
        let w = self.cursor.current_word();
        if is_literal(w) {
            w & PAYLOAD_MASK
        } else if self.cursor.blocks_left_in_word == 1 {
            // The exception, if any, only ever applies to the run's first block.
            literal_of(w) & PAYLOAD_MASK
        } else if is_one_sequence(w) {
            PAYLOAD_MASK
        } else {
            0
        }
    }

    fn move_to_previous_block(&mut self) {
        self.current_block_base -= BLOCK_BITS as i64;
        self.cursor.blocks_left_in_word -= 1;
        if self.cursor.blocks_left_in_word == 0 {
            self.cursor.word_index -= 1;
            if self.cursor.word_index < 0 {
                self.next_bit_to_check = -1;
                return;
            }
            let w = self.cursor.current_word();
            self.cursor.blocks_left_in_word = BlockCursor::blocks_in(w);
        }
        self.next_bit_to_check = 30;
    }
}

impl Iterator for DescendingIter {
    type Item = Result<i32, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return Some(Err(Error::ConcurrentModification));
        }
        if self.generation.get() != self.generation_at_creation {
            self.poisoned = true;
            return Some(Err(Error::ConcurrentModification));
        }
        loop {
            if self.cursor.word_index < 0 || self.next_bit_to_check < 0 {
                return None;
            }
            let pattern = self.current_block_pattern();
            if pattern == 0 {
                let w = self.cursor.current_word();
                if is_zero_sequence(w) && self.cursor.blocks_left_in_word > 1 {
                    // Entirely empty blocks behind the exception-bearing
                    // first one; skip straight to it.
                    let skip = self.cursor.blocks_left_in_word - 1;
                    self.current_block_base -= BLOCK_BITS as i64 * skip;
                    self.cursor.blocks_left_in_word = 1;
                    self.next_bit_to_check = 30;
                    continue;
                }
                self.move_to_previous_block();
                continue;
            }
            let keep = (1u64 << (self.next_bit_to_check + 1)) - 1;
            let mask = pattern & keep as u32;
            if mask != 0 {
                let bit = 31 - mask.leading_zeros() as i32;
                let value = self.current_block_base + bit as i64;
                self.next_bit_to_check = bit - 1;
                return Some(Ok(value as i32));
            }
            self.move_to_previous_block();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(values: &[i32]) -> ConciseSet {
        let mut s = ConciseSet::new();
        for &v in values {
            s.add(v).unwrap();
        }
        s
    }

    #[test]
    fn forward_matches_input() {
        let s = build(&[1, 2, 3, 100, 1000, 31 * 40]);
        let collected: Result<Vec<i32>, Error> = s.iter().collect();
        assert_eq!(collected.unwrap(), vec![1, 2, 3, 100, 1000, 31 * 40]);
    }

    #[test]
    fn descending_matches_reversed_input() {
        let s = build(&[1, 2, 3, 100, 1000, 31 * 40]);
        let collected: Result<Vec<i32>, Error> = s.descending_iter().collect();
        let mut expected = vec![1, 2, 3, 100, 1000, 31 * 40];
        expected.reverse();
        assert_eq!(collected.unwrap(), expected);
    }

    #[test]
    fn concurrent_modification_detected() {
        let mut s = build(&[10, 20, 30]);
        let mut it = s.iter();
        assert_eq!(it.next(), Some(Ok(10)));
        s.add(15).unwrap();
        assert_eq!(it.next(), Some(Err(Error::ConcurrentModification)));
        assert_eq!(it.next(), Some(Err(Error::ConcurrentModification)));
    }

    #[test]
    fn long_run_iterates_correctly() {
        let values: Vec<i32> = (0..10_000).collect();
        let s = build(&values);
        let collected: Result<Vec<i32>, Error> = s.iter().collect();
        assert_eq!(collected.unwrap(), values);
    }
}
