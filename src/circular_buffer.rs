//! Growable ring buffer usable as a double-ended queue.
//!
//! # Layout
//! Elements live in a `Vec<Option<T>>` whose length (the capacity) is always a
//! power of two, so physical positions wrap with a bitmask instead of a
//! modulo. `head` is the slot of the first element and `tail` the slot one past
//! the last; the buffer is empty iff `head == tail`.
//!
//! An insertion that makes `head == tail` means every slot is taken, and the
//! buffer grows right away by doubling (to at least
//! [`MIN_GROWTH_CAPACITY`](CircularBuffer::MIN_GROWTH_CAPACITY)). Growth
//! rotates the elements so the first one lands at slot 0. Capacity only
//! shrinks through [`clear_and_shrink`](CircularBuffer::clear_and_shrink).
//!
//! Vacated slots are reset to `None`, so popped or removed elements are
//! dropped or handed back to the caller instead of lingering in storage.

use core::cmp;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;
use core::ops::{Index, IndexMut};
use std::collections::VecDeque;
use tracing::trace;

use crate::CollectionError;

// ─── AnyDeque ─────────────────────────────────────────────────────────────────

/// An object-safe abstraction over double-ended queue types.
///
/// Implemented by both `VecDeque<T>` and [`CircularBuffer<T>`] so that code can
/// operate on a deque without knowing which one it holds.
pub trait AnyDeque<T> {
    /// Returns the number of elements in the deque.
    fn len(&self) -> usize;
    /// Returns `true` if the deque contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Appends an element to the back.
    fn push_back(&mut self, item: T);
    /// Prepends an element to the front.
    fn push_front(&mut self, item: T);
    /// Removes and returns the element from the back, or `None` if empty.
    fn pop_back(&mut self) -> Option<T>;
    /// Removes and returns the element from the front, or `None` if empty.
    fn pop_front(&mut self) -> Option<T>;
    /// Removes and returns the element at `index`, or `None` if out of bounds.
    fn remove(&mut self, index: usize) -> Option<T>;
    /// Removes all elements.
    fn clear(&mut self);
    fn front(&self) -> Option<&T>;
    fn back(&self) -> Option<&T>;
    fn front_mut(&mut self) -> Option<&mut T>;
    fn back_mut(&mut self) -> Option<&mut T>;
}

impl<T> AnyDeque<T> for VecDeque<T> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push_back(&mut self, item: T) {
        self.push_back(item);
    }
    fn push_front(&mut self, item: T) {
        self.push_front(item);
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn remove(&mut self, index: usize) -> Option<T> {
        self.remove(index)
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn front(&self) -> Option<&T> {
        self.front()
    }
    fn back(&self) -> Option<&T> {
        self.back()
    }
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
}

// ─── BufferIndex ──────────────────────────────────────────────────────────────

/// A logical position in a [`CircularBuffer`], counted as distance from the
/// current front.
///
/// Stepping an index only changes the distance; the mapping to a physical slot
/// happens when the buffer is accessed. Stepping before the start wraps the
/// distance around, which yields a position no buffer contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BufferIndex {
    distance: usize,
}

impl BufferIndex {
    #[inline]
    pub const fn new(distance: usize) -> Self {
        Self { distance }
    }

    /// Distance from the front of the buffer.
    #[inline]
    pub const fn distance(self) -> usize {
        self.distance
    }

    #[inline]
    pub const fn after(self) -> Self {
        Self::new(self.distance.wrapping_add(1))
    }

    #[inline]
    pub const fn before(self) -> Self {
        Self::new(self.distance.wrapping_sub(1))
    }

    #[inline]
    pub const fn offset_by(self, n: isize) -> Self {
        Self::new(self.distance.wrapping_add_signed(n))
    }
}

impl From<usize> for BufferIndex {
    fn from(distance: usize) -> Self {
        Self::new(distance)
    }
}

// ─── CircularBuffer ───────────────────────────────────────────────────────────

/// A double-ended queue over a power-of-two ring of slots.
///
/// # Complexity
/// | Operation | Cost |
/// |-----------|------|
/// | `push_back`, `push_front` | O(1) amortized |
/// | `pop_front`, `pop_back`, `get` | O(1) |
/// | `remove` at either end | O(1) |
/// | `remove` elsewhere | O(n), shifts the suffix towards the front |
///
/// `clone` produces an independent buffer.
#[derive(Clone)]
pub struct CircularBuffer<T> {
    storage: Vec<Option<T>>,
    head: usize,
    tail: usize,
}

impl<T> CircularBuffer<T> {
    /// Capacity used by [`new`](CircularBuffer::new).
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Smallest capacity a growth step produces.
    pub const MIN_GROWTH_CAPACITY: usize = 16;

    /// Creates an empty buffer with [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY) slots.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty buffer with `capacity` rounded up to a power of two
    /// (0 rounds to 1).
    ///
    /// # Panics
    /// Panics if the rounded capacity does not fit in `usize`.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(buffer) => buffer,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`with_capacity`](Self::with_capacity), but reports an
    /// unrepresentable capacity as an error.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, CollectionError> {
        let rounded = capacity
            .checked_next_power_of_two()
            .ok_or(CollectionError::CapacityOverflow {
                requested: capacity,
            })?;
        let mut storage = Vec::with_capacity(rounded);
        storage.resize_with(rounded, || None);
        Ok(Self {
            storage,
            head: 0,
            tail: 0,
        })
    }

    // --- Inspection ---

    /// Number of slots in the backing ring. Always a power of two.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of elements, derived from the cursors.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.tail.wrapping_sub(self.head) & self.mask()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.storage.len() - 1
    }

    #[inline(always)]
    fn wrap_add(&self, idx: usize, add: usize) -> usize {
        idx.wrapping_add(add) & self.mask()
    }

    #[inline(always)]
    fn wrap_sub(&self, idx: usize, sub: usize) -> usize {
        idx.wrapping_sub(sub) & self.mask()
    }

    /// Maps a logical position to its slot.
    #[inline(always)]
    fn slot(&self, index: usize) -> usize {
        self.wrap_add(self.head, index)
    }

    /// Returns the element at logical `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            self.storage[self.slot(index)].as_ref()
        } else {
            None
        }
    }

    /// Returns the element at logical `index` mutably, or `None` if out of range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            let slot = self.slot(index);
            self.storage[slot].as_mut()
        } else {
            None
        }
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len().checked_sub(1).and_then(|last| self.get_mut(last))
    }

    // --- Logical indices ---

    /// Position of the first element.
    pub fn start_index(&self) -> BufferIndex {
        BufferIndex::new(0)
    }

    /// Position one past the last element.
    pub fn end_index(&self) -> BufferIndex {
        BufferIndex::new(self.len())
    }

    /// Position immediately after `index`.
    #[inline]
    pub fn index_after(&self, index: BufferIndex) -> BufferIndex {
        index.after()
    }

    /// Position immediately before `index`. Stepping back from
    /// [`start_index`](Self::start_index) yields a position the buffer never
    /// contains.
    #[inline]
    pub fn index_before(&self, index: BufferIndex) -> BufferIndex {
        index.before()
    }

    /// Position `n` steps away from `index`; negative `n` walks towards the front.
    #[inline]
    pub fn index_offset(&self, index: BufferIndex, n: isize) -> BufferIndex {
        index.offset_by(n)
    }

    // --- Modification ---

    /// Appends `item` at the back, growing if the ring fills up.
    pub fn push_back(&mut self, item: T) {
        self.storage[self.tail] = Some(item);
        self.tail = self.wrap_add(self.tail, 1);
        if self.head == self.tail {
            self.grow();
        }
    }

    /// Prepends `item` at the front, growing if the ring fills up.
    pub fn push_front(&mut self, item: T) {
        self.head = self.wrap_sub(self.head, 1);
        self.storage[self.head] = Some(item);
        if self.head == self.tail {
            self.grow();
        }
    }

    /// Removes and returns the first element, or `None` if empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.storage[self.head].take();
        self.head = self.wrap_add(self.head, 1);
        item
    }

    /// Removes and returns the last element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.tail = self.wrap_sub(self.tail, 1);
        self.storage[self.tail].take()
    }

    /// Removes and returns the element at logical `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        match self.try_remove(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }

    /// Removes and returns the element at logical `index`, or an error if the
    /// position is not occupied.
    ///
    /// The first and last elements are removed in O(1). Anything else shifts
    /// every later element one slot towards the front; elements before
    /// `index` never move.
    pub fn try_remove(&mut self, index: usize) -> Result<T, CollectionError> {
        let len = self.len();
        if index >= len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }

        let item = if index == 0 {
            self.pop_front()
        } else if index == len - 1 {
            self.pop_back()
        } else {
            self.shift_remove(index)
        };
        item.ok_or(CollectionError::IndexOutOfBounds { index, len })
    }

    /// Removes all elements, keeping the backing storage.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
        self.head = 0;
        self.tail = 0;
    }

    /// Removes all elements and releases the backing storage, leaving a
    /// single-slot ring that grows again on the next push.
    pub fn clear_and_shrink(&mut self) {
        let old_capacity = self.capacity();
        self.storage = Vec::new();
        self.storage.push(None);
        self.head = 0;
        self.tail = 0;
        trace!("Shrank circular buffer from capacity {} to 1", old_capacity);
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            front: 0,
            back: self.len(),
        }
    }

    // --- Internals ---

    /// Takes the element at interior `index` and closes the gap by walking the
    /// hole towards `tail`.
    fn shift_remove(&mut self, index: usize) -> Option<T> {
        let mut hole = self.slot(index);
        let item = self.storage[hole].take();

        let mut next = self.wrap_add(hole, 1);
        while next != self.tail {
            self.storage.swap(hole, next);
            hole = next;
            next = self.wrap_add(hole, 1);
        }
        self.tail = self.wrap_sub(self.tail, 1);
        item
    }

    /// Cold path: called with every slot occupied and `head == tail`.
    #[cold]
    #[inline(never)]
    fn grow(&mut self) {
        let old_capacity = self.storage.len();
        let new_capacity = match old_capacity.checked_mul(2) {
            Some(doubled) => cmp::max(Self::MIN_GROWTH_CAPACITY, doubled),
            None => panic!(
                "{}",
                CollectionError::CapacityOverflow {
                    requested: old_capacity,
                }
            ),
        };

        let mut storage = mem::take(&mut self.storage);
        storage.rotate_left(self.head);
        storage.resize_with(new_capacity, || None);

        trace!(
            "Grew circular buffer from capacity {} to {}",
            old_capacity, new_capacity
        );

        self.storage = storage;
        self.head = 0;
        self.tail = old_capacity;
    }
}

// ─── Indexing ─────────────────────────────────────────────────────────────────

impl<T> Index<usize> for CircularBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!(
                "{}",
                CollectionError::IndexOutOfBounds {
                    index,
                    len: self.len(),
                }
            ),
        }
    }
}

impl<T> IndexMut<usize> for CircularBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("{}", CollectionError::IndexOutOfBounds { index, len }),
        }
    }
}

impl<T> Index<BufferIndex> for CircularBuffer<T> {
    type Output = T;

    fn index(&self, index: BufferIndex) -> &T {
        &self[index.distance()]
    }
}

impl<T> IndexMut<BufferIndex> for CircularBuffer<T> {
    fn index_mut(&mut self, index: BufferIndex) -> &mut T {
        &mut self[index.distance()]
    }
}

// ─── Iterators ────────────────────────────────────────────────────────────────

/// Borrowing iterator in front-to-back order.
pub struct Iter<'a, T> {
    buffer: &'a CircularBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = self.buffer.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.buffer.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Consuming iterator in front-to-back order.
pub struct IntoIter<T> {
    buffer: CircularBuffer<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.buffer.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.buffer.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.buffer.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for CircularBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { buffer: self }
    }
}

impl<'a, T> IntoIterator for &'a CircularBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// ─── Trait implementations ────────────────────────────────────────────────────

impl<T> AnyDeque<T> for CircularBuffer<T> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push_back(&mut self, item: T) {
        self.push_back(item);
    }
    fn push_front(&mut self, item: T) {
        self.push_front(item);
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn remove(&mut self, index: usize) -> Option<T> {
        self.try_remove(index).ok()
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn front(&self) -> Option<&T> {
        self.front()
    }
    fn back(&self) -> Option<&T> {
        self.back()
    }
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for CircularBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares logical contents; capacity and slot layout are ignored.
impl<T: PartialEq> PartialEq for CircularBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for CircularBuffer<T> {}

impl<T> Extend<T> for CircularBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for CircularBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buffer = Self::new();
        buffer.extend(iter);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_ints(count: usize) -> Vec<i64> {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| rng.r#gen::<i64>()).collect()
    }

    fn contents<T: Clone>(buffer: &CircularBuffer<T>) -> Vec<T> {
        buffer.iter().cloned().collect()
    }

    // ─── construction ────────────────────────────────────────────────────────
    #[test]
    fn test_buffer_capacity_rounding() {
        assert_eq!(CircularBuffer::<i32>::with_capacity(0).capacity(), 1);
        assert_eq!(CircularBuffer::<i32>::with_capacity(1).capacity(), 1);
        assert_eq!(CircularBuffer::<i32>::with_capacity(3).capacity(), 4);
        assert_eq!(CircularBuffer::<i32>::with_capacity(16).capacity(), 16);
        assert_eq!(CircularBuffer::<i32>::with_capacity(17).capacity(), 32);
        assert_eq!(CircularBuffer::<i32>::new().capacity(), 16);
        assert!(CircularBuffer::<i32>::default().is_empty());
    }

    #[test]
    fn test_buffer_try_with_capacity_overflow() {
        assert_eq!(
            CircularBuffer::<u8>::try_with_capacity(usize::MAX).err(),
            Some(CollectionError::CapacityOverflow {
                requested: usize::MAX
            })
        );
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_buffer_with_capacity_overflow_panics() {
        let _ = CircularBuffer::<u8>::with_capacity(usize::MAX);
    }

    // ─── push / pop ──────────────────────────────────────────────────────────
    #[test]
    fn test_buffer_ops_minimum_capacity_scenario() {
        let mut b = CircularBuffer::with_capacity(1);
        for i in 0..=16 {
            b.push_back(i);
        }
        assert_eq!(b.len(), 17);
        let drained: Vec<_> = std::iter::from_fn(|| b.pop_front()).take(17).collect();
        assert_eq!(drained, (0..=16).collect::<Vec<_>>());
        assert_eq!(b.pop_front(), None);
    }

    #[test]
    fn test_buffer_ops_push_back_pop_back() {
        let mut nums = random_ints(100);
        let mut b = CircularBuffer::new();
        for &x in &nums {
            b.push_back(x);
        }
        while let Some(last) = b.pop_back() {
            assert_eq!(Some(last), nums.pop());
        }
        assert!(nums.is_empty());
    }

    #[test]
    fn test_buffer_ops_push_front_pop_front_reverses() {
        let mut nums = random_ints(100);
        let mut b = CircularBuffer::new();
        for &x in &nums {
            b.push_front(x);
        }
        while let Some(first) = b.pop_front() {
            assert_eq!(Some(first), nums.pop());
        }
        assert!(nums.is_empty());
    }

    #[test]
    fn test_buffer_ops_pop_empty() {
        let mut b: CircularBuffer<i32> = CircularBuffer::new();
        assert_eq!(b.pop_front(), None);
        assert_eq!(b.pop_back(), None);
        assert_eq!(b.front(), None);
        assert_eq!(b.back(), None);
        assert!(b.is_empty());
    }

    #[test]
    fn test_buffer_ops_is_empty() {
        let mut b = CircularBuffer::new();
        assert!(b.is_empty());
        b.push_back(1);
        assert!(!b.is_empty());
        b.pop_back();
        assert!(b.is_empty());
    }

    // ─── growth ──────────────────────────────────────────────────────────────
    #[test]
    fn test_buffer_grow_exactly_when_full() {
        let mut b = CircularBuffer::with_capacity(32);
        for i in 0..31 {
            b.push_back(i);
        }
        assert_eq!(b.capacity(), 32);
        assert_eq!(b.len(), 31);

        b.push_back(31);
        assert_eq!(b.capacity(), 64);
        assert_eq!(b.len(), 32);
        assert_eq!(contents(&b), (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn test_buffer_grow_small_ring_jumps_to_minimum() {
        let mut b = CircularBuffer::with_capacity(4);
        b.extend([1, 2, 3]);
        assert_eq!(b.capacity(), 4);
        b.push_back(4);
        assert_eq!(b.capacity(), 16);
        assert_eq!(contents(&b), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_buffer_grow_with_wrapped_head() {
        let mut b = CircularBuffer::with_capacity(4);
        b.push_back(0);
        b.push_back(1);
        b.pop_front();
        b.pop_front();
        // head and tail both sit at slot 2
        b.push_back(3);
        b.push_back(4); // tail wraps to slot 0
        b.push_front(2);
        assert_eq!(b.capacity(), 4);
        assert_eq!(contents(&b), vec![2, 3, 4]);

        b.push_back(5); // full: grows while head is at slot 1
        assert_eq!(b.capacity(), 16);
        assert_eq!(contents(&b), vec![2, 3, 4, 5]);
        assert_eq!(b.front(), Some(&2));
        assert_eq!(b.back(), Some(&5));
    }

    #[test]
    fn test_buffer_grow_twice_keeps_order() {
        let mut b = CircularBuffer::with_capacity(2);
        for i in 0..40 {
            if i % 2 == 0 {
                b.push_back(i);
            } else {
                b.push_front(i);
            }
        }
        assert_eq!(b.capacity(), 64);
        let mut expected: Vec<i32> = (0..40).filter(|i| i % 2 == 1).rev().collect();
        expected.extend((0..40).filter(|i| i % 2 == 0));
        assert_eq!(contents(&b), expected);
    }

    // ─── remove ──────────────────────────────────────────────────────────────
    #[test]
    fn test_buffer_remove_head_tail_interior() {
        let base: Vec<i32> = (0..10).collect();
        for k in [0, 9, 4] {
            let mut b: CircularBuffer<i32> = base.iter().copied().collect();
            let mut expected = base.clone();
            assert_eq!(b.remove(k), expected.remove(k));
            assert_eq!(contents(&b), expected);
            assert_eq!(b.len(), 9);
        }
    }

    #[test]
    fn test_buffer_remove_across_wrap() {
        let mut b = CircularBuffer::with_capacity(8);
        for i in 0..6 {
            b.push_back(i);
        }
        for _ in 0..5 {
            b.pop_front();
        }
        // head at slot 5; the next pushes wrap around the end of the ring
        for i in 6..12 {
            b.push_back(i);
        }
        assert_eq!(b.capacity(), 8);
        assert_eq!(contents(&b), vec![5, 6, 7, 8, 9, 10, 11]);

        assert_eq!(b.remove(2), 7);
        assert_eq!(contents(&b), vec![5, 6, 8, 9, 10, 11]);
        assert_eq!(b.remove(4), 10);
        assert_eq!(contents(&b), vec![5, 6, 8, 9, 11]);

        b.push_back(12);
        b.push_front(4);
        assert_eq!(contents(&b), vec![4, 5, 6, 8, 9, 11, 12]);
    }

    #[test]
    fn test_buffer_remove_at_offset() {
        let mut b: CircularBuffer<i32> = (0..100).collect();
        let index = b.start_index().offset_by(10);
        assert_eq!(b.remove(index.distance()), 10);
        assert_eq!(b.len(), 99);
        assert_eq!(b[10], 11);
    }

    #[test]
    fn test_buffer_remove_random_position_count() {
        let mut b = CircularBuffer::new();
        for i in 0..100 {
            b.push_back(i);
            assert_eq!(b.len(), i + 1);
        }
        let k = rand::thread_rng().gen_range(0..100);
        assert_eq!(b.remove(k), k);
        assert_eq!(b.len(), 99);
    }

    #[test]
    #[should_panic(expected = "index 3 out of bounds for length 3")]
    fn test_buffer_remove_out_of_bounds_panics() {
        let mut b: CircularBuffer<i32> = (0..3).collect();
        b.remove(3);
    }

    #[test]
    fn test_buffer_try_remove_out_of_bounds() {
        let mut b: CircularBuffer<i32> = CircularBuffer::new();
        assert_eq!(
            b.try_remove(0),
            Err(CollectionError::IndexOutOfBounds { index: 0, len: 0 })
        );
        b.push_back(1);
        assert_eq!(b.try_remove(0), Ok(1));
    }

    // ─── slot release ────────────────────────────────────────────────────────
    #[test]
    fn test_buffer_vacated_slots_release_elements() {
        use std::rc::Rc;

        let tracked = Rc::new(());
        let mut b = CircularBuffer::new();
        for _ in 0..4 {
            b.push_back(Rc::clone(&tracked));
        }
        assert_eq!(Rc::strong_count(&tracked), 5);

        drop(b.pop_front());
        assert_eq!(Rc::strong_count(&tracked), 4);
        drop(b.remove(1));
        assert_eq!(Rc::strong_count(&tracked), 3);
        drop(b.pop_back());
        assert_eq!(Rc::strong_count(&tracked), 2);
        b.clear();
        assert_eq!(Rc::strong_count(&tracked), 1);
    }

    #[test]
    fn test_buffer_clear_keeps_capacity() {
        let mut b: CircularBuffer<i32> = (0..20).collect();
        assert_eq!(b.capacity(), 32);
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 32);
        b.push_back(7);
        assert_eq!(b.pop_front(), Some(7));
    }

    #[test]
    fn test_buffer_clear_and_shrink_releases_storage() {
        use std::rc::Rc;

        let tracked = Rc::new(0);
        let mut b: CircularBuffer<Rc<i32>> = (0..40).map(|_| tracked.clone()).collect();
        assert_eq!(b.capacity(), 64);
        assert_eq!(Rc::strong_count(&tracked), 41);

        b.clear_and_shrink();
        assert!(b.is_empty());
        assert_eq!(b.len(), 0);
        assert_eq!(b.capacity(), 1);
        assert_eq!(Rc::strong_count(&tracked), 1);
        assert_eq!(b.pop_front(), None);

        b.push_back(tracked.clone());
        assert_eq!(b.capacity(), 16);
        assert_eq!(b.len(), 1);
        b.push_front(tracked.clone());
        assert_eq!(b.len(), 2);
        assert_eq!(Rc::strong_count(&tracked), 3);
    }

    // ─── logical indices ─────────────────────────────────────────────────────
    #[test]
    fn test_buffer_index_walk_both_directions() {
        let nums = random_ints(100);
        let b: CircularBuffer<i64> = nums.iter().copied().collect();

        let mut index = b.start_index();
        for expected in &nums {
            assert_eq!(&b[index], expected);
            index = index.after();
        }
        assert_eq!(index, b.end_index());

        for expected in nums.iter().rev() {
            index = index.before();
            assert_eq!(&b[index], expected);
        }
        assert_eq!(index, b.start_index());
        assert_eq!(b.get(index.before().distance()), None);

        let mut index = b.start_index();
        for expected in &nums {
            assert_eq!(&b[index], expected);
            index = b.index_after(index);
        }
        assert_eq!(index, b.end_index());
        for expected in nums.iter().rev() {
            index = b.index_before(index);
            assert_eq!(&b[index], expected);
        }
        assert_eq!(b.get(b.index_before(index).distance()), None);

        let middle = b.index_offset(b.start_index(), 40);
        assert_eq!(b[middle], nums[40]);
        assert_eq!(b[b.index_offset(middle, -15)], nums[25]);
        assert_eq!(b.index_offset(b.end_index(), -100), b.start_index());
    }

    #[test]
    fn test_buffer_get_and_mutate() {
        let mut b: CircularBuffer<i32> = vec![10, 20, 30].into_iter().collect();
        assert_eq!(b.get(0), Some(&10));
        assert_eq!(b.get(2), Some(&30));
        assert_eq!(b.get(3), None);

        *b.get_mut(1).unwrap() += 1;
        b[2] = 33;
        b[BufferIndex::from(0)] = 11;
        *b.front_mut().unwrap() += 100;
        *b.back_mut().unwrap() += 100;
        assert_eq!(contents(&b), vec![111, 21, 133]);
    }

    // ─── traits ──────────────────────────────────────────────────────────────
    #[test]
    fn test_buffer_traits_clone_is_independent() {
        let mut b: CircularBuffer<i32> = vec![1, 2, 3].into_iter().collect();
        let mut cloned = b.clone();
        b.push_back(4);
        cloned.pop_front();
        assert_eq!(contents(&b), vec![1, 2, 3, 4]);
        assert_eq!(contents(&cloned), vec![2, 3]);
    }

    #[test]
    fn test_buffer_traits_eq_ignores_layout() {
        let a: CircularBuffer<i32> = vec![1, 2, 3].into_iter().collect();
        let mut b = CircularBuffer::with_capacity(4);
        b.push_back(2);
        b.push_back(3);
        b.push_front(1);
        assert_eq!(a, b);
        b.pop_back();
        assert_ne!(a, b);
    }

    #[test]
    fn test_buffer_traits_iter() {
        let b: CircularBuffer<i32> = (1..=4).collect();
        let mut it = b.iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&4));
        assert_eq!(it.len(), 2);
        assert_eq!(it.collect::<Vec<_>>(), vec![&2, &3]);

        let reversed: Vec<_> = b.iter().rev().copied().collect();
        assert_eq!(reversed, vec![4, 3, 2, 1]);
        let by_ref: Vec<_> = (&b).into_iter().copied().collect();
        assert_eq!(by_ref, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_buffer_traits_into_iter() {
        let b: CircularBuffer<i32> = (1..=4).collect();
        let mut it = b.into_iter();
        assert_eq!(it.size_hint(), (4, Some(4)));
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_buffer_traits_debug() {
        let b: CircularBuffer<i32> = vec![1, 2].into_iter().collect();
        assert_eq!(format!("{:?}", b), "[1, 2]");
    }

    #[test]
    fn test_buffer_any_deque_trait() {
        let mut ours: CircularBuffer<i32> = CircularBuffer::new();
        let mut std_deque: VecDeque<i32> = VecDeque::new();

        for any in [&mut ours as &mut dyn AnyDeque<i32>, &mut std_deque] {
            any.push_back(10);
            any.push_front(5);
            any.push_back(20);
            assert_eq!(any.len(), 3);
            assert_eq!(any.front(), Some(&5));
            assert_eq!(any.back(), Some(&20));
            if let Some(front) = any.front_mut() {
                *front += 1;
            }
            if let Some(back) = any.back_mut() {
                *back += 1;
            }
            assert_eq!(any.front(), Some(&6));
            assert_eq!(any.back(), Some(&21));
            assert_eq!(any.remove(1), Some(10));
            assert_eq!(any.remove(7), None);
            assert_eq!(any.pop_front(), Some(6));
            assert_eq!(any.pop_back(), Some(21));
            assert_eq!(any.front_mut(), None);
            assert_eq!(any.back_mut(), None);
            any.push_back(1);
            any.clear();
            assert!(any.is_empty());
        }
    }
}
