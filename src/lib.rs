//! # Easy Collections
//!
//! Two general-purpose in-memory containers with careful index arithmetic:
//!
//! * [`BinaryHeap`]: an array-backed priority queue ordered by any comparator
//!   you hand it, not only `Ord`.
//! * [`CircularBuffer`]: a growable ring buffer with amortized O(1) pushes and
//!   pops at both ends, over a power-of-two backing store.
//!
//! ## Key Features
//!
//! * **Comparator heaps:** `BinaryHeap::new(|a, b| a > b)` is a max-heap, `a < b`
//!   a min-heap, and any strict "closer to the root" predicate works.
//! * **Single-sift replace:** [`BinaryHeap::pop_and_push`] swaps out the root in
//!   one sift, which is what a fixed-size top-k heap wants.
//! * **Bitmask wrap-around:** ring capacity is always a power of two, so logical
//!   positions map to slots with a mask.
//! * **Values, not handles:** `clone` gives a fully independent container.
//!
//! ## Contracts
//!
//! * Removing at a position that holds no element is a caller bug and panics.
//!   The `try_remove` twins return a [`CollectionError`] instead.
//! * Popping or peeking an empty container is ordinary and returns `None`.
//! * Nothing here is synchronized. Wrap a container in a lock to share it.
//!
//! ## Cargo features
//!
//! * `kinds` (default): `BinaryHeap::max()` / `BinaryHeap::min()` for `T: Ord`,
//!   using the `heapless` `Max`/`Min` markers.
//!
//! ## Examples
//!
//! ### BinaryHeap
//!
//! ```rust
//! use easy_collections::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new(|a: &i32, b: &i32| a > b);
//! for x in [5, 3, 8, 1, 9, 2] {
//!     heap.push(x);
//! }
//!
//! assert_eq!(heap.peek(), Some(&9));
//! assert_eq!(heap.pop_and_push(4), Some(9));
//! assert_eq!(heap.into_sorted_vec(), vec![8, 5, 4, 3, 2, 1]);
//! ```
//!
//! ### CircularBuffer
//!
//! ```rust
//! use easy_collections::CircularBuffer;
//!
//! // Capacity 1 grows to 16 on the first push, then doubles.
//! let mut buffer = CircularBuffer::with_capacity(1);
//! for i in 0..17 {
//!     buffer.push_back(i);
//! }
//! assert_eq!(buffer.capacity(), 32);
//!
//! buffer.push_front(-1);
//! assert_eq!(buffer.remove(5), 4);
//! assert_eq!(buffer.pop_front(), Some(-1));
//! assert_eq!(buffer.pop_back(), Some(16));
//! ```

// --- Module Declarations ---

pub mod circular_buffer;
pub mod error;
pub mod heap;

// --- Re-exports ---

pub use circular_buffer::{AnyDeque, BufferIndex, CircularBuffer};
pub use error::CollectionError;
pub use heap::{AnyHeap, BinaryHeap};
#[cfg(feature = "kinds")]
pub use heap::{HeapKind, Max, Min};
