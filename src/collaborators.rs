//! Thin adapters for the systems named in SPEC_FULL.md §1/§6 as external
//! collaborators: an uncompressed reference bitmap, an indexed-universe
//! facade, a process-wide stats counter, a binary-matrix wrapper, and a
//! transaction/item pair set. None of these expand their algorithmic scope
//! beyond "forward to a [`crate::ConciseSet`] of indices" or "thin wrapper".

use crate::{ConciseSet, Error};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, OnceLock};

/// Common read/write/Boolean-op surface shared by every set-like type in
/// this crate, so generic code can be written once against the trait.
pub trait IntegerSet {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn contains(&self, x: i32) -> bool;
    fn add(&mut self, x: i32) -> Result<bool, Error>;
    fn remove(&mut self, x: i32) -> Result<bool, Error>;
}

impl IntegerSet for ConciseSet {
    fn len(&self) -> usize {
        ConciseSet::len(self)
    }
    fn contains(&self, x: i32) -> bool {
        ConciseSet::contains(self, x)
    }
    fn add(&mut self, x: i32) -> Result<bool, Error> {
        ConciseSet::add(self, x)
    }
    fn remove(&mut self, x: i32) -> Result<bool, Error> {
        ConciseSet::remove(self, x)
    }
}

/// Uncompressed reference implementation of [`IntegerSet`], used as the
/// "ground truth" oracle in property tests and as a plain fallback when
/// compression isn't worth the bookkeeping. No compaction, no run-length
/// encoding: one `bool` per representable integer up to the current max.
#[derive(Debug, Clone, Default)]
pub struct FastSet {
    bits: Vec<bool>,
    size: usize,
}

impl FastSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_capacity(&mut self, x: i32) {
        let needed = x as usize + 1;
        if self.bits.len() < needed {
            self.bits.resize(needed, false);
        }
    }
}

impl IntegerSet for FastSet {
    fn len(&self) -> usize {
        self.size
    }

    fn contains(&self, x: i32) -> bool {
        x >= 0 && (x as usize) < self.bits.len() && self.bits[x as usize]
    }

    fn add(&mut self, x: i32) -> Result<bool, Error> {
        if x < 0 {
            return Err(Error::OutOfRange);
        }
        self.ensure_capacity(x);
        if self.bits[x as usize] {
            return Ok(false);
        }
        self.bits[x as usize] = true;
        self.size += 1;
        Ok(true)
    }

    fn remove(&mut self, x: i32) -> Result<bool, Error> {
        if x < 0 {
            return Err(Error::OutOfRange);
        }
        if !self.contains(x) {
            return Ok(false);
        }
        self.bits[x as usize] = false;
        self.size -= 1;
        Ok(true)
    }
}

/// Maps an arbitrary, hashable universe of values onto a `ConciseSet` of
/// indices, mirroring the host crate's practice of parameterizing container
/// helpers over the narrowest bound the operations need.
pub struct IndexedSet<T: Eq + Hash + Clone> {
    universe: Vec<T>,
    index_of: HashMap<T, u32>,
    indices: ConciseSet,
}

impl<T: Eq + Hash + Clone> IndexedSet<T> {
    pub fn new() -> Self {
        IndexedSet {
            universe: Vec::new(),
            index_of: HashMap::new(),
            indices: ConciseSet::new(),
        }
    }

    fn index_for(&mut self, value: &T) -> u32 {
        if let Some(&i) = self.index_of.get(value) {
            return i;
        }
        let i = self.universe.len() as u32;
        self.universe.push(value.clone());
        self.index_of.insert(value.clone(), i);
        i
    }

    pub fn add(&mut self, value: &T) -> Result<bool, Error> {
        let i = self.index_for(value);
        self.indices.add(i as i32)
    }

    pub fn contains(&self, value: &T) -> bool {
        match self.index_of.get(value) {
            Some(&i) => self.indices.contains(i as i32),
            None => false,
        }
    }

    pub fn remove(&mut self, value: &T) -> Result<bool, Error> {
        match self.index_of.get(value).copied() {
            Some(i) => self.indices.remove(i as i32),
            None => Ok(false),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Members in index order, resolved back to their original values.
    pub fn values(&self) -> Result<Vec<T>, Error> {
        self.indices
            .iter()
            .map(|r| r.map(|i| self.universe[i as usize].clone()))
            .collect()
    }
}

impl<T: Eq + Hash + Clone> Default for IndexedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide, best-effort event counter. The core never depends on its
/// presence or values for correctness; only the CLI and test harness bump it.
pub struct Stats;

static COUNTERS: OnceLock<Mutex<HashMap<&'static str, u64>>> = OnceLock::new();

impl Stats {
    pub fn bump(event: &'static str) {
        let counters = COUNTERS.get_or_init(|| Mutex::new(HashMap::new()));
        let mut guard = counters.lock().expect("stats mutex poisoned");
        *guard.entry(event).or_insert(0) += 1;
    }

    pub fn get(event: &'static str) -> u64 {
        match COUNTERS.get() {
            Some(counters) => *counters.lock().expect("stats mutex poisoned").get(event).unwrap_or(&0),
            None => 0,
        }
    }
}

/// A 2-D bitmap view over a `ConciseSet`, packing `(row, col)` into a single
/// integer `row * max_col + col`. Inherits linear-in-compressed-size scaling
/// directly from `ConciseSet`; this wrapper adds no algorithms of its own.
pub struct BitMatrix {
    max_col: i32,
    cells: ConciseSet,
}

impl BitMatrix {
    pub fn new(max_col: i32) -> Self {
        BitMatrix {
            max_col,
            cells: ConciseSet::new(),
        }
    }

    fn pack(&self, row: i32, col: i32) -> i32 {
        row * self.max_col + col
    }

    pub fn set(&mut self, row: i32, col: i32) -> Result<bool, Error> {
        let key = self.pack(row, col);
        self.cells.add(key)
    }

    pub fn clear(&mut self, row: i32, col: i32) -> Result<bool, Error> {
        let key = self.pack(row, col);
        self.cells.remove(key)
    }

    pub fn get(&self, row: i32, col: i32) -> bool {
        self.cells.contains(self.pack(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Packs two bounded indices `(a, b)` into one integer over a `ConciseSet`,
/// named for the transaction/item domain (the same packing `BitMatrix` uses
/// for rows/columns).
pub struct PairSet {
    b_bound: i32,
    pairs: ConciseSet,
}

impl PairSet {
    pub fn new(b_bound: i32) -> Self {
        PairSet {
            b_bound,
            pairs: ConciseSet::new(),
        }
    }

    fn pack(&self, a: i32, b: i32) -> i32 {
        a * self.b_bound + b
    }

    pub fn add(&mut self, a: i32, b: i32) -> Result<bool, Error> {
        let key = self.pack(a, b);
        self.pairs.add(key)
    }

    pub fn contains(&self, a: i32, b: i32) -> bool {
        self.pairs.contains(self.pack(a, b))
    }

    pub fn remove(&mut self, a: i32, b: i32) -> Result<bool, Error> {
        let key = self.pack(a, b);
        self.pairs.remove(key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// `PairSet` plus a side table of values keyed by the same packed index.
pub struct PairMap<V> {
    pairs: PairSet,
    values: HashMap<i32, V>,
}

impl<V> PairMap<V> {
    pub fn new(b_bound: i32) -> Self {
        PairMap {
            pairs: PairSet::new(b_bound),
            values: HashMap::new(),
        }
    }

    pub fn insert(&mut self, a: i32, b: i32, value: V) -> Result<(), Error> {
        let key = self.pairs.pack(a, b);
        self.pairs.add(a, b)?;
        self.values.insert(key, value);
        Ok(())
    }

    pub fn get(&self, a: i32, b: i32) -> Option<&V> {
        let key = self.pairs.pack(a, b);
        self.values.get(&key)
    }

    pub fn remove(&mut self, a: i32, b: i32) -> Result<Option<V>, Error> {
        let key = self.pairs.pack(a, b);
        self.pairs.remove(a, b)?;
        Ok(self.values.remove(&key))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Common surface shared by `ConciseSet`, `FastSet`, `IndexedSet`,
/// `BitMatrix`, and `PairSet`, so generic code can be written once. Each
/// concrete type forwards its trait methods to its own native API.
pub trait ExtendedSet {
    fn cardinality(&self) -> usize;
    fn is_empty_set(&self) -> bool {
        self.cardinality() == 0
    }
}

impl ExtendedSet for ConciseSet {
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl ExtendedSet for FastSet {
    fn cardinality(&self) -> usize {
        IntegerSet::len(self)
    }
}

impl<T: Eq + Hash + Clone> ExtendedSet for IndexedSet<T> {
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl ExtendedSet for BitMatrix {
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl ExtendedSet for PairSet {
    fn cardinality(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_set_matches_concise_set() {
        let mut fast = FastSet::new();
        let mut concise = ConciseSet::new();
        for x in [1, 2, 3, 100, 1000] {
            fast.add(x).unwrap();
            concise.add(x).unwrap();
        }
        for x in 0..1100 {
            assert_eq!(fast.contains(x), concise.contains(x));
        }
        assert_eq!(IntegerSet::len(&fast), concise.len());
    }

    #[test]
    fn indexed_set_round_trips_strings() {
        let mut s: IndexedSet<String> = IndexedSet::new();
        s.add(&"alpha".to_string()).unwrap();
        s.add(&"beta".to_string()).unwrap();
        assert!(s.contains(&"alpha".to_string()));
        assert!(!s.contains(&"gamma".to_string()));
        assert_eq!(s.len(), 2);
        let mut values = s.values().unwrap();
        values.sort();
        assert_eq!(values, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn stats_counts_events() {
        Stats::bump("test_event_collaborators");
        Stats::bump("test_event_collaborators");
        assert!(Stats::get("test_event_collaborators") >= 2);
    }

    #[test]
    fn bit_matrix_row_col_independence() {
        let mut m = BitMatrix::new(16);
        m.set(2, 3).unwrap();
        assert!(m.get(2, 3));
        assert!(!m.get(3, 2));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn pair_map_stores_values() {
        let mut m: PairMap<&'static str> = PairMap::new(10);
        m.insert(1, 2, "hello").unwrap();
        assert_eq!(m.get(1, 2), Some(&"hello"));
        assert_eq!(m.remove(1, 2).unwrap(), Some("hello"));
        assert_eq!(m.get(1, 2), None);
    }
}
