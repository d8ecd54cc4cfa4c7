//! Array-backed binary heap ordered by a caller-supplied comparator.
//!
//! The comparator answers "does `a` belong strictly closer to the root than
//! `b`?". Passing `|a, b| a > b` gives a max-heap, `|a, b| a < b` a min-heap,
//! and any other strict order works the same way. Equal elements keep no
//! particular relative order.
//!
//! Storage is a dense `Vec<T>` holding a complete binary tree by position:
//! the root lives at 0, the children of `i` at `2i + 1` and `2i + 2`, and the
//! parent of `i > 0` at `(i - 1) / 2`.

use core::fmt::{self, Debug, Formatter};
use core::iter::FusedIterator;
use core::mem;
use core::slice;
use tracing::trace;

use crate::CollectionError;

/// A trait for abstraction over different priority queue types.
pub trait AnyHeap<T> {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn push(&mut self, item: T);
    fn pop(&mut self) -> Option<T>;
    fn peek(&self) -> Option<&T>;
    fn clear(&mut self);
}

impl<T: Ord> AnyHeap<T> for std::collections::BinaryHeap<T> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push(&mut self, item: T) {
        self.push(item);
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn peek(&self) -> Option<&T> {
        self.peek()
    }
    fn clear(&mut self) {
        self.clear();
    }
}

#[cfg(feature = "kinds")]
pub use heapless::binary_heap::{Kind, Max, Min};

/// Bridges the `heapless` ordering markers to a root-closeness predicate.
#[cfg(feature = "kinds")]
pub trait HeapKind<T: Ord>: Kind {
    /// Returns `true` if `a` belongs strictly closer to the root than `b`.
    fn closer_to_root(a: &T, b: &T) -> bool;
}

#[cfg(feature = "kinds")]
impl<T: Ord> HeapKind<T> for Max {
    #[inline]
    fn closer_to_root(a: &T, b: &T) -> bool {
        a > b
    }
}

#[cfg(feature = "kinds")]
impl<T: Ord> HeapKind<T> for Min {
    #[inline]
    fn closer_to_root(a: &T, b: &T) -> bool {
        a < b
    }
}

/// A binary heap whose order is decided by the comparator `C`.
///
/// # Behavior
/// * **Order:** `C(a, b)` returning `true` means `a` sits closer to the root.
/// * **Complexity:** `push`, `pop`, `pop_and_push` and `remove` are O(log n);
///   `heapify`, `retain` and `remove_where` are O(n).
/// * **Values:** `clone` produces an independent heap.
/// * **Comparator type:** `C` defaults to a plain function pointer, the type
///   [`max`](BinaryHeap::max) and [`min`](BinaryHeap::min) produce, so
///   `BinaryHeap<T>` names those heaps.
///
/// # Invariants
/// * For every index `i > 0` with parent `p`, `C(data[i], data[p])` is `false`.
#[derive(Clone)]
pub struct BinaryHeap<T, C = fn(&T, &T) -> bool> {
    data: Vec<T>,
    cmp: C,
}

impl<T, C> BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    /// Creates an empty heap ordered by `cmp`.
    pub fn new(cmp: C) -> Self {
        Self {
            data: Vec::new(),
            cmp,
        }
    }

    /// Creates an empty heap with room for at least `capacity` elements.
    pub fn with_capacity(capacity: usize, cmp: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Builds a heap from an arbitrary sequence in O(n).
    ///
    /// The elements are loaded as-is, then every node that has a child is
    /// sifted down, walking from the last parent back to the root.
    pub fn heapify<I>(iter: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut heap = Self {
            data: iter.into_iter().collect(),
            cmp,
        };
        heap.rebuild();
        heap
    }

    // --- Inspection ---

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the comparator this heap is ordered by.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the root, or `None` if the heap is empty.
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Returns the backing storage in heap (level) order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    // --- Index queries ---

    /// Returns the parent of `index`, or `None` for the root and for
    /// positions outside the heap.
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        if index == 0 || index >= self.data.len() {
            None
        } else {
            Some((index - 1) / 2)
        }
    }

    /// Returns the left child of `index`, or `None` if it has none.
    pub fn left_child_index(&self, index: usize) -> Option<usize> {
        self.child_index(index, 1)
    }

    /// Returns the right child of `index`, or `None` if it has none.
    pub fn right_child_index(&self, index: usize) -> Option<usize> {
        self.child_index(index, 2)
    }

    #[inline]
    fn child_index(&self, index: usize, offset: usize) -> Option<usize> {
        let len = self.data.len();
        if index >= len {
            return None;
        }
        index
            .checked_mul(2)
            .and_then(|i| i.checked_add(offset))
            .filter(|&child| child < len)
    }

    // --- Modification ---

    /// Inserts `item` and returns the index it settled at.
    pub fn push(&mut self, item: T) -> usize {
        self.data.push(item);
        self.sift_up(self.data.len() - 1)
    }

    /// Removes and returns the root, or `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.remove_at(0))
        }
    }

    /// Replaces the root with `item` in a single sift and returns the old root.
    ///
    /// Equivalent to `pop()` followed by `push(item)`. On an empty heap the
    /// item is inserted and `None` is returned.
    pub fn pop_and_push(&mut self, item: T) -> Option<T> {
        match self.data.first_mut() {
            None => {
                self.data.push(item);
                None
            }
            Some(root) => {
                let old = mem::replace(root, item);
                self.sift_down(0);
                Some(old)
            }
        }
    }

    /// Removes and returns the element stored at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        match self.try_remove(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }

    /// Removes and returns the element stored at `index`, or an error if the
    /// position is not occupied.
    pub fn try_remove(&mut self, index: usize) -> Result<T, CollectionError> {
        let len = self.data.len();
        if index >= len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }
        Ok(self.remove_at(index))
    }

    /// Retains only the elements for which `keep` returns `true`, then
    /// rebuilds the heap in O(n).
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.data.retain(keep);
        self.rebuild();
    }

    /// Removes every element matching `should_remove`, then rebuilds the heap.
    pub fn remove_where<F>(&mut self, mut should_remove: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.retain(|item| !should_remove(item));
    }

    /// Removes all elements, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Removes all elements and releases the allocated storage.
    pub fn clear_and_shrink(&mut self) {
        trace!("Releasing heap storage of capacity {}", self.data.capacity());
        self.data = Vec::new();
    }

    // --- Consumption ---

    /// Consumes the heap and returns its storage in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Consumes the heap and returns its elements root-first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut vec = Vec::with_capacity(self.len());
        while let Some(item) = self.pop() {
            vec.push(item);
        }
        vec
    }

    /// Returns a root-first iterator over a copy of this heap.
    ///
    /// Each call starts from a fresh copy, so the heap itself is untouched
    /// and the sequence can be walked again.
    pub fn sorted_iter(&self) -> IntoIter<T, C>
    where
        T: Clone,
        C: Clone,
    {
        self.clone().into_iter()
    }

    // --- Internals ---

    /// Swaps the target with the last slot, drops that slot, then restores
    /// order around the relocated element in whichever direction it needs.
    fn remove_at(&mut self, index: usize) -> T {
        let item = self.data.swap_remove(index);
        if index < self.data.len() && self.sift_down(index) == index {
            self.sift_up(index);
        }
        item
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !(self.cmp)(&self.data[index], &self.data[parent]) {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.data.len();
        // Nodes at or past len / 2 are leaves.
        while index < len / 2 {
            let left = 2 * index + 1;
            let right = left + 1;

            let mut best = index;
            if (self.cmp)(&self.data[left], &self.data[best]) {
                best = left;
            }
            if right < len && (self.cmp)(&self.data[right], &self.data[best]) {
                best = right;
            }
            if best == index {
                break;
            }
            self.data.swap(index, best);
            index = best;
        }
        index
    }

    fn rebuild(&mut self) {
        let len = self.data.len();
        trace!("Rebuilding heap of {} elements", len);
        for index in (0..len / 2).rev() {
            self.sift_down(index);
        }
    }
}

impl<T, C> BinaryHeap<T, C> {
    /// Returns an iterator over the storage in heap (level) order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.data.iter()
    }
}

#[cfg(feature = "kinds")]
impl<T: Ord> BinaryHeap<T> {
    /// Creates an empty heap ordered by the marker kind `K`.
    pub fn with_kind<K: HeapKind<T>>() -> Self {
        Self::new(K::closer_to_root)
    }

    /// Creates an empty max-heap.
    pub fn max() -> Self {
        Self::with_kind::<Max>()
    }

    /// Creates an empty min-heap.
    pub fn min() -> Self {
        Self::with_kind::<Min>()
    }
}

impl<T, C> AnyHeap<T> for BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    fn len(&self) -> usize {
        self.len()
    }
    fn push(&mut self, item: T) {
        self.push(item);
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn peek(&self) -> Option<&T> {
        self.peek()
    }
    fn clear(&mut self) {
        self.clear();
    }
}

// --- Iterators ---

/// Consuming iterator that pops elements root-first.
pub struct IntoIter<T, C> {
    heap: BinaryHeap<T, C>,
}

impl<T, C> Iterator for IntoIter<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    type Item = T;
    fn next(&mut self) -> Option<T> {
        self.heap.pop()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<T, C> ExactSizeIterator for IntoIter<T, C> where C: Fn(&T, &T) -> bool {}

impl<T, C> FusedIterator for IntoIter<T, C> where C: Fn(&T, &T) -> bool {}

impl<T, C> IntoIterator for BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    type Item = T;
    type IntoIter = IntoIter<T, C>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { heap: self }
    }
}

impl<'a, T, C> IntoIterator for &'a BinaryHeap<T, C> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Trait Implementations ---

impl<T: Debug, C> Debug for BinaryHeap<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

#[cfg(feature = "kinds")]
impl<T: Ord> Default for BinaryHeap<T> {
    fn default() -> Self {
        Self::max()
    }
}

impl<T, C> Extend<T> for BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.data.reserve(lower);
        for item in iter {
            self.push(item);
        }
    }
}

#[cfg(feature = "kinds")]
impl<T: Ord> FromIterator<T> for BinaryHeap<T> {
    /// Collects into a max-heap.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::heapify(iter, <Max as HeapKind<T>>::closer_to_root)
    }
}

// --- Tests ---
