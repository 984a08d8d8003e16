// Copyright (c) 2023, 2024 Frank Fischer <frank-fischer@shadow-soft.de>
// Copyright (c) 2026 The rs-netopt developers
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! Addressable binary min-heap.

/// Heap slot of a pushed element.
struct Slot<K, V> {
    key: K,
    value: V,
    /// Position on the heap, `None` once popped.
    pos: Option<usize>,
}

/// A binary min-heap whose elements can be decreased after insertion.
///
/// `push` returns a handle that stays valid until the next call to
/// `clear`. Popped elements keep their slot, so a handle of a popped
/// element may still be passed to [`BinHeap::contains`].
///
/// # Example
///
/// ```
/// use rs_netopt::collections::BinHeap;
///
/// let mut h = BinHeap::new();
/// let a = h.push('a', 5);
/// h.push('b', 3);
/// assert!(h.decrease_key(a, 1));
/// assert_eq!(h.pop_min(), Some(('a', 1)));
/// assert_eq!(h.pop_min(), Some(('b', 3)));
/// assert!(h.is_empty());
/// ```
pub struct BinHeap<K, V> {
    heap: Vec<usize>,
    slots: Vec<Slot<K, V>>,
}

impl<K, V> Default for BinHeap<K, V> {
    fn default() -> Self {
        BinHeap {
            heap: vec![],
            slots: vec![],
        }
    }
}

impl<K, V> BinHeap<K, V>
where
    K: Clone,
    V: PartialOrd + Clone,
{
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of elements currently on the heap.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    /// Return `true` if the element with this handle is still on the heap.
    pub fn contains(&self, item: usize) -> bool {
        self.slots.get(item).map_or(false, |s| s.pos.is_some())
    }

    /// The current value of an element.
    pub fn value(&self, item: usize) -> &V {
        &self.slots[item].value
    }

    /// Push a new element and return its handle.
    pub fn push(&mut self, key: K, value: V) -> usize {
        let item = self.slots.len();
        self.slots.push(Slot {
            key,
            value,
            pos: Some(self.heap.len()),
        });
        self.heap.push(item);
        self.upheap(item);
        item
    }

    /// Decrease the value of an element on the heap.
    ///
    /// Returns `true` if the new value is smaller than the old one (and
    /// hence has been set).
    pub fn decrease_key(&mut self, item: usize, value: V) -> bool {
        debug_assert!(self.contains(item));
        if self.slots[item].value > value {
            self.slots[item].value = value;
            self.upheap(item);
            true
        } else {
            false
        }
    }

    /// Remove the element with the smallest value.
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        if self.heap.is_empty() {
            return None;
        }
        let min_item = self.heap.swap_remove(0);
        self.slots[min_item].pos = None;

        if let Some(&item) = self.heap.first() {
            self.slots[item].pos = Some(0);
            self.downheap(item);
        }

        let slot = &self.slots[min_item];
        Some((slot.key.clone(), slot.value.clone()))
    }

    /// Move `item` up until its parent is not larger.
    fn upheap(&mut self, item: usize) {
        let mut cur_pos = match self.slots[item].pos {
            Some(pos) => pos,
            None => return,
        };
        while cur_pos > 0 {
            let parent_pos = (cur_pos - 1) / 2;
            let parent = self.heap[parent_pos];
            // using `>` moves equal values up, elements pushed last
            // are popped first among equals
            if self.slots[item].value > self.slots[parent].value {
                break;
            }
            self.heap[cur_pos] = parent;
            self.slots[parent].pos = Some(cur_pos);
            cur_pos = parent_pos;
        }
        self.heap[cur_pos] = item;
        self.slots[item].pos = Some(cur_pos);
    }

    /// Move `item` down until no child is smaller.
    fn downheap(&mut self, item: usize) {
        let n = self.heap.len();
        let mut cur_pos = match self.slots[item].pos {
            Some(pos) => pos,
            None => return,
        };
        loop {
            let left_pos = 2 * cur_pos + 1;
            let right_pos = left_pos + 1;
            if left_pos >= n {
                break;
            }
            let next_pos = if right_pos < n
                && self.slots[self.heap[right_pos]].value < self.slots[self.heap[left_pos]].value
            {
                right_pos
            } else {
                left_pos
            };
            let next = self.heap[next_pos];
            if self.slots[item].value <= self.slots[next].value {
                break;
            }
            self.heap[cur_pos] = next;
            self.slots[next].pos = Some(cur_pos);
            cur_pos = next_pos;
        }
        self.heap[cur_pos] = item;
        self.slots[item].pos = Some(cur_pos);
    }
}

#[cfg(test)]
mod tests {
    use super::BinHeap;

    #[test]
    fn test_sorted_output() {
        let values = [7, 3, 9, 1, 4, 4, 8, 0, 6, 2, 5];
        let mut h = BinHeap::new();
        for (i, &v) in values.iter().enumerate() {
            h.push(i, v);
        }
        assert_eq!(h.len(), values.len());

        let mut out = vec![];
        while let Some((_, v)) = h.pop_min() {
            out.push(v);
        }
        let mut sorted = values.to_vec();
        sorted.sort();
        assert_eq!(out, sorted);
    }

    #[test]
    fn test_decrease_key() {
        let mut h = BinHeap::new();
        let items: Vec<_> = (0..10).map(|i| h.push(i, 10 * (i + 1))).collect();
        assert!(h.decrease_key(items[9], 5));
        assert!(!h.decrease_key(items[0], 20));
        assert!(h.decrease_key(items[5], 15));

        assert_eq!(h.pop_min(), Some((9, 5)));
        assert!(!h.contains(items[9]));
        assert_eq!(h.pop_min(), Some((0, 10)));
        assert_eq!(h.pop_min(), Some((5, 15)));
        assert_eq!(h.pop_min(), Some((1, 20)));
        assert_eq!(*h.value(items[2]), 30);
    }

    #[test]
    fn test_clear() {
        let mut h = BinHeap::new();
        h.push("x", 1.5);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.pop_min(), None);
    }
}
