//! Sorted slot index with bisection search.

use slotring_types::Slot;

/// A sorted vector map from occupied slots to their values.
///
/// Slots are strictly increasing. Keeping each slot next to its value in a
/// single vector means positions can never drift between two sequences.
/// Lookups bisect in O(log n); insertion and removal shift in O(n), which is
/// fine for a ring bounded by `total_range`.
#[derive(Debug, Clone)]
pub struct SlotIndex<T> {
    entries: Vec<(Slot, T)>,
}

impl<T> SlotIndex<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Leftmost position whose slot is strictly greater than `x` (bisect right).
    ///
    /// Every slot before the returned position is `<= x`. This is both where
    /// a new slot `x` belongs and, modulo `len`, the first slot clockwise of
    /// a key hashing to `x`.
    pub fn insertion_point(&self, x: Slot) -> usize {
        let n = self.entries.len();
        if n == 0 {
            return 0;
        }
        if x < self.entries[0].0 {
            return 0;
        }
        if x > self.entries[n - 1].0 {
            return n;
        }

        // Invariant: slots[lo] <= x < slots[hi] (hi == n counts as +inf).
        let (mut lo, mut hi) = (0, n);
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if x < self.entries[mid].0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        hi
    }

    /// Leftmost position whose slot is `>= x` (bisect left).
    ///
    /// When `x` is occupied, this is its exact position.
    pub fn lower_bound(&self, x: Slot) -> usize {
        let n = self.entries.len();
        if n == 0 {
            return 0;
        }
        if x <= self.entries[0].0 {
            return 0;
        }
        if x > self.entries[n - 1].0 {
            return n;
        }

        // Invariant: slots[lo] < x <= slots[hi].
        let (mut lo, mut hi) = (0, n - 1);
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if x <= self.entries[mid].0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        hi
    }

    /// Position of `slot` if it is occupied.
    pub fn position(&self, slot: Slot) -> Option<usize> {
        let i = self.lower_bound(slot);
        (i < self.entries.len() && self.entries[i].0 == slot).then_some(i)
    }

    /// Slot at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn slot_at(&self, i: usize) -> Slot {
        self.entries[i].0
    }

    /// Value at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn value_at(&self, i: usize) -> &T {
        &self.entries[i].1
    }

    /// Value stored at `slot`, if occupied.
    pub fn get(&self, slot: Slot) -> Option<&T> {
        self.position(slot).map(|i| &self.entries[i].1)
    }

    /// Insert `(slot, value)` at position `i`.
    ///
    /// `i` must be the position [`insertion_point`](Self::insertion_point)
    /// reports for `slot`, and `slot` must not already be present.
    pub fn insert_at(&mut self, i: usize, slot: Slot, value: T) {
        debug_assert!(i == 0 || self.entries[i - 1].0 < slot, "slot order broken");
        debug_assert!(
            i == self.entries.len() || slot < self.entries[i].0,
            "slot order broken"
        );
        self.entries.insert(i, (slot, value));
    }

    /// Remove and return the entry at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn remove_at(&mut self, i: usize) -> (Slot, T) {
        self.entries.remove(i)
    }

    /// Iterate `(slot, value)` pairs in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &T)> {
        self.entries.iter().map(|(slot, value)| (*slot, value))
    }

    /// Occupied slots in ascending order.
    pub fn slots(&self) -> Vec<Slot> {
        self.entries.iter().map(|(slot, _)| *slot).collect()
    }
}

impl<T> Default for SlotIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
