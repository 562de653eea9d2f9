//! The pair-wise boolean-operator engine that drives every binary
//! `ConciseSet` operation: union, intersection, difference, symmetric
//! difference, and the membership-aggregate queries that reuse the same
//! two-iterator traversal.

use crate::iter::WordIterator;
use crate::word::*;
use crate::ConciseSet;

/// Which boolean combination to compute. Expressed as a tagged enum so the
/// empty-operand fast path and the per-literal combinator are each one
/// small function keyed by the tag, rather than four duplicated traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BooleanOp {
    And,
    Or,
    Xor,
    AndNot,
}

impl BooleanOp {
    /// Combines two already-decoded literal words. Always returns a literal
    /// (marker bit forced on), regardless of whether the inputs came from a
    /// literal or a synthesized run block.
    fn combine(self, a: u32, b: u32) -> u32 {
        let a = a & PAYLOAD_MASK;
        let b = b & PAYLOAD_MASK;
        let payload = match self {
            BooleanOp::And => a & b,
            BooleanOp::Or => a | b,
            BooleanOp::Xor => a ^ b,
            BooleanOp::AndNot => a & !b & PAYLOAD_MASK,
        };
        payload | LITERAL_MARKER
    }

    /// Result for `(a empty, b empty)`, `(a empty, b non-empty)`, etc., when
    /// at least one side is empty.
    fn empty_operand_result(self, a: &ConciseSet, b: &ConciseSet) -> ConciseSet {
        match self {
            BooleanOp::And => ConciseSet::new(),
            BooleanOp::Or | BooleanOp::Xor => {
                if a.is_empty() {
                    b.clone()
                } else {
                    a.clone()
                }
            }
            BooleanOp::AndNot => a.clone(),
        }
    }
}

/// Writes `lit` into the scratch buffer, eagerly compacting it into a
/// preceding run if possible.
fn push_compact(scratch: &mut Vec<u32>, lit: u32) {
    scratch.push(lit);
    let new_len = compact(scratch, scratch.len());
    scratch.truncate(new_len);
}

/// Copies everything left in `it` into `scratch`, folding whole runs in as
/// single bulk additions rather than one block at a time.
fn append_remaining(scratch: &mut Vec<u32>, it: &mut WordIterator) {
    while it.has_more_literals() {
        push_compact(scratch, it.current_literal());
        if let Some(last) = scratch.last().copied() {
            if is_sequence(last) && it.is_no_exception_sequence() {
                let skip = it.skip_remaining_sequence();
                if skip > 0 {
                    let idx = scratch.len() - 1;
                    scratch[idx] = add_to_sequence_count(last, skip);
                }
            }
        }
        it.advance();
    }
}

pub(crate) fn apply(op: BooleanOp, a: &ConciseSet, b: &ConciseSet) -> ConciseSet {
    if a.is_empty() || b.is_empty() {
        return op.empty_operand_result(a, b);
    }

    let mut scratch: Vec<u32> = Vec::with_capacity(a.word_count() + b.word_count() + 1);
    let mut ia = WordIterator::new(a.words_slice());
    let mut ib = WordIterator::new(b.words_slice());

    while ia.has_more_literals() && ib.has_more_literals() {
        let r = op.combine(ia.current_literal(), ib.current_literal());
        push_compact(&mut scratch, r);
        if let Some(last) = scratch.last().copied() {
            if is_sequence(last)
                && ia.is_no_exception_sequence()
                && ib.is_no_exception_sequence()
                && ia.sequence_polarity_is_one() == ib.sequence_polarity_is_one()
            {
                let skip = WordIterator::skip_both_sequences(&mut ia, &mut ib);
                if skip > 0 {
                    let idx = scratch.len() - 1;
                    scratch[idx] = add_to_sequence_count(last, skip);
                }
            }
        }
        ia.advance();
        ib.advance();
    }

    match op {
        BooleanOp::And => {}
        BooleanOp::Or | BooleanOp::Xor => {
            if ia.has_more_literals() {
                append_remaining(&mut scratch, &mut ia);
            } else if ib.has_more_literals() {
                append_remaining(&mut scratch, &mut ib);
            }
        }
        BooleanOp::AndNot => {
            if ia.has_more_literals() {
                append_remaining(&mut scratch, &mut ia);
            }
        }
    }

    ConciseSet::from_raw_words(scratch)
}

/// Shared two-iterator walk for the aggregate membership queries: each one
/// folds the per-block outcome into a scalar instead of emitting words.
fn walk_aggregate<F, Acc>(a: &ConciseSet, b: &ConciseSet, mut init: Acc, mut step: F) -> Acc
where
    F: FnMut(&mut Acc, u32, u32) -> bool, // returns true to keep going
{
    let mut ia = WordIterator::new(a.words_slice());
    let mut ib = WordIterator::new(b.words_slice());
    while ia.has_more_literals() && ib.has_more_literals() {
        let la = ia.current_literal() & PAYLOAD_MASK;
        let lb = ib.current_literal() & PAYLOAD_MASK;
        if !step(&mut init, la, lb) {
            return init;
        }
        if ia.is_no_exception_sequence()
            && ib.is_no_exception_sequence()
            && ia.sequence_polarity_is_one() == ib.sequence_polarity_is_one()
        {
            WordIterator::skip_both_sequences(&mut ia, &mut ib);
        }
        ia.advance();
        ib.advance();
    }
    init
}

pub(crate) fn contains_all(a: &ConciseSet, b: &ConciseSet) -> bool {
    if b.is_empty() {
        return true;
    }
    if a.is_empty() {
        return false;
    }
    if b.len() > a.len() || b.last_set_bit() > a.last_set_bit() {
        return false;
    }
    walk_aggregate(a, b, true, |acc, la, lb| {
        if la & lb != lb {
            *acc = false;
            return false;
        }
        true
    })
}

pub(crate) fn contains_any(a: &ConciseSet, b: &ConciseSet) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    walk_aggregate(a, b, false, |acc, la, lb| {
        if la & lb != 0 {
            *acc = true;
            return false;
        }
        true
    })
}

pub(crate) fn intersection_size(a: &ConciseSet, b: &ConciseSet) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    walk_aggregate(a, b, 0usize, |acc, la, lb| {
        *acc += (la & lb).count_ones() as usize;
        true
    })
}

pub(crate) fn contains_at_least(a: &ConciseSet, b: &ConciseSet, min_elements: usize) -> bool {
    if min_elements == 0 {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }
    // See DESIGN.md: mirrors the source's own boundary quirk of only
    // returning true from inside the loop, never at the threshold exactly
    // on the final step's exit.
    walk_aggregate(a, b, 0usize, |acc, la, lb| {
        *acc += (la & lb).count_ones() as usize;
        *acc < min_elements
    }) >= min_elements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[i32]) -> ConciseSet {
        let mut s = ConciseSet::new();
        for &v in values {
            s.add(v).unwrap();
        }
        s
    }

    #[test]
    fn and_or_xor_andnot_sparse() {
        let a = set(&[1, 2, 3, 100, 1000]);
        let b = set(&[100, 101]);
        assert_eq!(apply(BooleanOp::And, &a, &b).iter_values(), vec![100]);
        assert_eq!(
            apply(BooleanOp::Or, &a, &b).iter_values(),
            vec![1, 2, 3, 100, 101, 1000]
        );
        assert_eq!(intersection_size(&a, &b), 1);
    }

    #[test]
    fn xor_with_self_is_empty() {
        let a = set(&[1, 2, 3, 1000, 100_000]);
        let r = apply(BooleanOp::Xor, &a, &a);
        assert!(r.is_empty());
    }

    #[test]
    fn and_over_long_runs() {
        let a: Vec<i32> = (0..5000).collect();
        let b: Vec<i32> = (2000..7000).collect();
        let expected: Vec<i32> = (2000..5000).collect();
        let sa = set(&a);
        let sb = set(&b);
        assert_eq!(apply(BooleanOp::And, &sa, &sb).iter_values(), expected);
    }

    #[test]
    fn contains_all_any() {
        let a = set(&[1, 2, 3, 100, 1000]);
        let b = set(&[100, 101]);
        assert!(!contains_all(&a, &b));
        assert!(contains_any(&a, &b));
        let c = set(&[1, 2]);
        assert!(contains_all(&a, &c));
    }
}
