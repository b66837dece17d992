//! A double-ended queue stored as a directory of fixed-size blocks.
//!
//! `VecDeque` keeps its elements in one ring buffer. When that buffer is full, every element is
//! moved into a buffer twice the size. [`BlockDeque`] instead keeps its elements in blocks of
//! [`BLOCK_SIZE`] slots each, and keeps an array of pointers to those blocks, the *directory*.
//! Elements never move once they have been pushed. When the deque outgrows its directory, only
//! the directory, an array of pointers with one entry per block, is reallocated.
//!
//! Logically, the blocks form one flat address space (`slot * BLOCK_SIZE + cell`), and the
//! elements occupy one contiguous window `head..head + len` of it. Index `i` of the deque lives at
//! address `head + i`, which makes indexing a division and a remainder away:
//!
//! ```text
//!   directory:  [ -- ] [ blk ] [ blk ] [ blk ] [ -- ]
//!                         ^                ^
//!                   head (front)     head + len (back)
//! ```
//!
//! Blocks are allocated lazily when the window grows into them and freed as soon as the window
//! leaves them. When a push would run past either end of the directory, the directory doubles
//! and the existing blocks are re-centered in it, so both ends get room to grow again.
//!
//! Here's how this compares to `VecDeque`:
//!
//!  - Pushes at either end are amortized `O(1)`, and no push ever moves an element.
//!  - Indexing is `O(1)`, but has to go through the directory.
//!  - Memory is reclaimed block by block as the deque shrinks.
//!  - The elements are never in one contiguous slice.
//!
//! Besides the usual iterators, the deque hands out random-access [`Cursor`]s. A cursor can jump
//! any distance in `O(1)`, and two cursors can be compared or subtracted. A [`Position`] is a
//! cursor without the borrow. The deque detects, rather than misreads, a position that was taken
//! before the directory was last reallocated.
//!
//! # Panic safety
//!
//! Every operation either completes, or leaves the deque exactly as it was. This holds even when
//! an element's `Clone` panics or an allocation fails. A `Clone` that panics halfway through
//! drops exactly the elements it already cloned and frees exactly the blocks it already
//! allocated.

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rustdoc::broken_intra_doc_links)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg_attr(test, macro_use)]
extern crate alloc;

use core::cmp::{self, Ordering};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{repeat_with, FromIterator};
use core::mem;
use core::ops::Bound::{Excluded, Included, Unbounded};
use core::ops::{Index, IndexMut, RangeBounds};

use alloc::collections::{TryReserveError, VecDeque};
use alloc::vec::Vec;

mod block;
mod cursor;
mod error;
mod external_trait_impls;
mod iter;

use block::{locate, Block};

pub use cursor::{Cursor, CursorMut, Position, RevCursor, RevCursorMut};
pub use error::{Error, PushError};

/// Iterator types for [`BlockDeque`].
pub mod deque {
    pub use super::iter::*;

    /// Parallel iterator types, available with the `rayon` feature.
    #[cfg(feature = "rayon")]
    pub mod rayon {
        pub use crate::external_trait_impls::rayon::{IntoIter, Iter, IterMut};
    }
}

/// The number of elements held by each block.
pub const BLOCK_SIZE: usize = 16;

/// A fresh deque starts out with this many directory slots.
const INITIAL_BLOCKS: usize = 2;

/// A double-ended queue stored as a directory of fixed-size blocks.
///
/// See the [crate-level documentation] for details.
///
/// [crate-level documentation]: index.html
pub struct BlockDeque<T> {
    // Every address in head..head + len is in an owned block and initialized. Nothing else is
    // initialized. An empty deque owns at most one (spare) block.
    blocks: Vec<Option<Block<T>>>,
    head: usize,
    len: usize,
    // bumped on every directory reallocation
    epoch: usize,
}

#[cold]
#[inline(never)]
fn alloc_failed(e: TryReserveError) -> ! {
    panic!("block deque allocation failed: {}", e);
}

impl<T: Clone> Clone for BlockDeque<T> {
    fn clone(&self) -> BlockDeque<T> {
        // Same directory shape and head, so the pushes below never reallocate and only allocate
        // the blocks that hold live elements. If an element's clone panics, `copy` is dropped,
        // which drops the elements cloned so far and frees the blocks allocated so far.
        let mut copy = BlockDeque::with_shape(self.blocks.len(), self.head);
        for value in self.iter() {
            copy.push_back(value.clone());
        }
        debug_assert_eq!(copy.epoch, 0, "clone reallocated its directory");
        copy
    }

    fn clone_from(&mut self, other: &Self) {
        // copy-and-swap: a panic while cloning leaves `self` untouched
        let copy = other.clone();
        *self = copy;
    }
}

impl<T> Default for BlockDeque<T> {
    /// Creates an empty `BlockDeque<T>`.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for BlockDeque<T> {
    fn drop(&mut self) {
        // Blocks free themselves; only the live elements need dropping.
        self.truncate(0);
    }
}

impl<T> BlockDeque<T> {
    /// Creates an empty `BlockDeque`.
    ///
    /// The deque starts with a two-slot directory and one block allocated in the middle, so
    /// that pushes at either end have room before anything needs to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let deque: BlockDeque<u32> = BlockDeque::new();
    /// assert_eq!(deque.block_count(), 2);
    /// ```
    pub fn new() -> Self {
        let spare = Block::try_new().unwrap_or_else(|e| alloc_failed(e));
        let mut blocks = Vec::with_capacity(INITIAL_BLOCKS);
        blocks.push(None);
        blocks.push(Some(spare));
        Self {
            blocks,
            head: BLOCK_SIZE,
            len: 0,
            epoch: 0,
        }
    }

    fn with_shape(block_count: usize, head: usize) -> Self {
        Self {
            blocks: repeat_with(|| None).take(block_count).collect(),
            head,
            len: 0,
            epoch: 0,
        }
    }

    /// Creates a deque holding `count` default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let deque: BlockDeque<u8> = BlockDeque::with_len(3);
    /// assert_eq!(deque, [0, 0, 0]);
    /// ```
    pub fn with_len(count: usize) -> Self
    where
        T: Default,
    {
        repeat_with(T::default).take(count).collect()
    }

    /// Creates a deque holding `count` clones of `value`.
    ///
    /// If cloning `value` panics, every clone made so far is dropped before the panic
    /// propagates.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let deque = BlockDeque::from_elem(5, 'x');
    /// assert_eq!(deque.len(), 5);
    /// assert!(deque.iter().all(|&c| c == 'x'));
    /// ```
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut deque = Self::new();
        if count == 0 {
            return deque;
        }
        deque.reserve(count);
        for _ in 1..count {
            deque.push_back(value.clone());
        }
        deque.push_back(value);
        deque
    }

    #[inline]
    fn midpoint(&self) -> usize {
        self.blocks.len() / 2 * BLOCK_SIZE
    }

    /// The number of addresses covered by the directory.
    #[inline]
    fn extent(&self) -> usize {
        self.blocks.len() * BLOCK_SIZE
    }

    /// # Safety
    ///
    /// `slot` must hold a block.
    #[inline]
    unsafe fn block(&self, slot: usize) -> &Block<T> {
        Block::expect(self.blocks.get_unchecked(slot))
    }

    /// # Safety
    ///
    /// `slot` must hold a block.
    #[inline]
    unsafe fn block_mut(&mut self, slot: usize) -> &mut Block<T> {
        Block::expect_mut(self.blocks.get_unchecked_mut(slot))
    }

    /// Replaces the directory with one of `block_count` slots, with the current blocks centered
    /// in it.
    ///
    /// Only block handles move; elements stay where they are. Allocating the new directory is
    /// the only thing that can fail, and if it does, nothing has changed.
    fn reallocate(&mut self, block_count: usize) -> Result<(), TryReserveError> {
        let old = self.blocks.len();
        debug_assert!(block_count > old);
        let gap = (block_count - old) / 2;

        let mut blocks = Vec::new();
        blocks.try_reserve_exact(block_count)?;
        blocks.extend(repeat_with(|| None).take(gap));
        blocks.append(&mut self.blocks);
        blocks.resize_with(block_count, || None);

        self.blocks = blocks;
        self.head += gap * BLOCK_SIZE;
        self.epoch = self.epoch.wrapping_add(1);
        Ok(())
    }

    /// Makes the address just past the back writable, and returns its coordinates.
    fn prepare_back(&mut self) -> Result<(usize, usize), TryReserveError> {
        let addr = self.head + self.len;
        let grow = addr == self.extent();
        // Acquire the block before growing, so a failed growth just drops it again.
        let fresh = if grow || self.blocks[addr / BLOCK_SIZE].is_none() {
            Some(Block::try_new()?)
        } else {
            None
        };
        if grow {
            self.reallocate(self.blocks.len() * 2)?;
        }

        let (slot, cell) = locate(self.head + self.len);
        if let Some(block) = fresh {
            debug_assert!(self.blocks[slot].is_none());
            self.blocks[slot] = Some(block);
        }
        Ok((slot, cell))
    }

    /// Makes the address just before the front writable, and returns its coordinates.
    fn prepare_front(&mut self) -> Result<(usize, usize), TryReserveError> {
        let grow = self.head == 0;
        let fresh = if grow || self.blocks[(self.head - 1) / BLOCK_SIZE].is_none() {
            // An empty deque may still own the block its head points into (the one `new`
            // allocates). Move that one over rather than allocating another.
            let spare = if self.len == 0 && !grow {
                self.blocks[self.head / BLOCK_SIZE].take()
            } else {
                None
            };
            match spare {
                Some(block) => Some(block),
                None => Some(Block::try_new()?),
            }
        } else {
            None
        };
        if grow {
            self.reallocate(self.blocks.len() * 2)?;
        }

        let (slot, cell) = locate(self.head - 1);
        if let Some(block) = fresh {
            debug_assert!(self.blocks[slot].is_none());
            self.blocks[slot] = Some(block);
        }
        Ok((slot, cell))
    }

    /// Frees the block in `slot`, which must not hold any live elements.
    #[inline]
    fn release(&mut self, slot: usize) {
        self.blocks[slot] = None;
    }

    /// Provides a reference to the element at the given index.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// buf.push_back(5);
    /// assert_eq!(buf.get(1), Some(&4));
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(unsafe { self.get_unchecked(index) })
        } else {
            None
        }
    }

    /// Provides a mutable reference to the element at the given index.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// buf.push_back(5);
    /// if let Some(elem) = buf.get_mut(1) {
    ///     *elem = 7;
    /// }
    ///
    /// assert_eq!(buf[1], 7);
    /// ```
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            Some(unsafe { self.get_unchecked_mut(index) })
        } else {
            None
        }
    }

    /// Returns a reference to the element at `index`, without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        let (slot, cell) = locate(self.head + index);
        self.block(slot).get(cell)
    }

    /// Returns a mutable reference to the element at `index`, without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        let (slot, cell) = locate(self.head + index);
        self.block_mut(slot).get_mut(cell)
    }

    /// Provides a reference to the element at the given index, or reports the index as out of
    /// range.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::{BlockDeque, Error};
    ///
    /// let buf: BlockDeque<_> = vec![1, 2].into();
    /// assert_eq!(buf.at(1), Ok(&2));
    /// assert_eq!(buf.at(2), Err(Error::OutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.len;
        self.get(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Provides a mutable reference to the element at the given index, or reports the index as
    /// out of range.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len;
        self.get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Resolves a position taken in the current directory generation to the coordinates of a
    /// live element.
    fn live_coords(&self, pos: &Position) -> Option<(usize, usize)> {
        if pos.epoch() != self.epoch {
            return None;
        }
        let index = pos.flat() - self.head as isize;
        if index < 0 || index >= self.len as isize {
            return None;
        }
        Some(locate(pos.flat() as usize))
    }

    pub(crate) fn get_at(&self, pos: &Position) -> Option<&T> {
        let (slot, cell) = self.live_coords(pos)?;
        Some(unsafe { self.block(slot).get(cell) })
    }

    pub(crate) fn get_at_mut(&mut self, pos: &Position) -> Option<&mut T> {
        let (slot, cell) = self.live_coords(pos)?;
        Some(unsafe { self.block_mut(slot).get_mut(cell) })
    }

    /// Turns a position back into a logical index in `0..=len()`.
    fn resolve(&self, pos: Position) -> Result<usize, Error> {
        if pos.epoch() != self.epoch {
            return Err(Error::StalePosition);
        }
        let index = pos.flat() - self.head as isize;
        if index < 0 || index > self.len as isize {
            return Err(Error::DanglingPosition);
        }
        Ok(index as usize)
    }

    /// Swaps elements at indices `i` and `j`.
    ///
    /// `i` and `j` may be equal.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// buf.push_back(5);
    /// assert_eq!(buf, vec![3, 4, 5]);
    /// buf.swap(0, 2);
    /// assert_eq!(buf, vec![5, 4, 3]);
    /// ```
    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len, "swap index (is {}) should be < len (is {})", i, self.len);
        assert!(j < self.len, "swap index (is {}) should be < len (is {})", j, self.len);
        let (si, ci) = locate(self.head + i);
        let (sj, cj) = locate(self.head + j);
        if si == sj {
            unsafe { self.block_mut(si) }.swap_cells(ci, cj);
        } else {
            // different blocks: split the directory so both can be borrowed at once
            let ((lo, lo_cell), (hi, hi_cell)) = if si < sj {
                ((si, ci), (sj, cj))
            } else {
                ((sj, cj), (si, ci))
            };
            let (left, right) = self.blocks.split_at_mut(hi);
            let a = unsafe { Block::expect_mut(&mut left[lo]) }.cell_mut(lo_cell);
            let b = unsafe { Block::expect_mut(&mut right[0]) }.cell_mut(hi_cell);
            mem::swap(a, b);
        }
    }

    /// Returns the number of directory slots, i.e. the number of blocks the deque can address
    /// before it has to reallocate its directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::{BlockDeque, BLOCK_SIZE};
    ///
    /// let mut buf = BlockDeque::new();
    /// assert_eq!(buf.block_count(), 2);
    /// buf.extend(0..2 * BLOCK_SIZE);
    /// assert!(buf.block_count() > 2);
    /// ```
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of elements the directory can address, counting both ends.
    ///
    /// Blocks are only allocated once elements are pushed into them, so this is not the amount of
    /// memory held by the deque.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.extent()
    }

    #[inline]
    #[doc(hidden)]
    pub fn allocated_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    /// Reserves directory room for at least `additional` more elements at the back.
    ///
    /// After this, `additional` calls to [`push_back`](Self::push_back) will not reallocate the
    /// directory, so they leave outstanding [`Position`]s valid. Blocks are still allocated as
    /// the elements arrive.
    ///
    /// # Panics
    ///
    /// Panics if the new directory cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf: BlockDeque<i32> = vec![1].into();
    /// buf.reserve(100);
    /// assert!(buf.capacity() >= 101);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        if let Err(e) = self.try_reserve(additional) {
            alloc_failed(e);
        }
    }

    /// Tries to reserve directory room for at least `additional` more elements at the back.
    ///
    /// On failure the deque is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let old = self.blocks.len();
        let room = self.extent() - (self.head + self.len);
        let mut count = old;
        // Re-centering puts half of the added slots in front, so only the other (rounded up)
        // half adds room at the back.
        while ((count - old + 1) / 2)
            .saturating_mul(BLOCK_SIZE)
            .saturating_add(room)
            < additional
        {
            count = match count.checked_mul(2) {
                Some(count) => count,
                None => {
                    // let the allocator report the overflow
                    let mut probe = Vec::<Option<Block<T>>>::new();
                    probe.try_reserve_exact(usize::MAX)?;
                    unreachable!("reserving usize::MAX slots succeeded");
                }
            };
        }
        if count > old {
            self.reallocate(count)?;
        }
        Ok(())
    }

    /// Shortens the `BlockDeque`, keeping the first `len` elements and dropping
    /// the rest.
    ///
    /// If `len` is greater than the `BlockDeque`'s current length, this has no
    /// effect. Blocks left without live elements are freed.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(10);
    /// buf.push_back(15);
    /// assert_eq!(buf, vec![5, 10, 15]);
    /// buf.truncate(1);
    /// assert_eq!(buf, vec![5]);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let start = self.head + len;
        let end = self.head + self.len;
        // Shrink first: if a destructor panics, the remaining elements leak instead of being
        // dropped twice.
        self.len = len;

        /// Frees the blocks left without live elements, and re-centers an emptied deque. Runs
        /// on unwind too, so a panicking destructor cannot leave stray blocks behind.
        struct Release<'a, T> {
            deque: &'a mut BlockDeque<T>,
            start: usize,
            end: usize,
        }

        impl<T> Drop for Release<'_, T> {
            fn drop(&mut self) {
                let deque = &mut *self.deque;
                let (first, cell) = locate(self.start);
                // a partially kept block stays
                let first = if cell == 0 || deque.len == 0 {
                    first
                } else {
                    first + 1
                };
                let last = (self.end - 1) / BLOCK_SIZE;
                for slot in first..=last {
                    deque.release(slot);
                }
                if deque.len == 0 {
                    deque.head = deque.midpoint();
                }
            }
        }

        let mut guard = Release {
            deque: self,
            start,
            end,
        };
        let mut addr = start;
        while addr < end {
            let (slot, cell) = locate(addr);
            let stop = cmp::min(end, (slot + 1) * BLOCK_SIZE);
            unsafe { guard.deque.block_mut(slot).drop_live(cell..cell + (stop - addr)) };
            addr = stop;
        }
        drop(guard);
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// let b: &[_] = &[&5, &3, &4];
    /// let c: Vec<&i32> = buf.iter().collect();
    /// assert_eq!(&c[..], b);
    /// ```
    pub fn iter(&self) -> iter::Iter<'_, T> {
        iter::Iter {
            blocks: &self.blocks,
            head: self.head,
            tail: self.head + self.len,
        }
    }

    /// Returns a front-to-back iterator that returns mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(3);
    /// buf.push_back(4);
    /// for num in buf.iter_mut() {
    ///     *num = *num - 2;
    /// }
    /// let b: &[_] = &[&mut 3, &mut 1, &mut 2];
    /// assert_eq!(&buf.iter_mut().collect::<Vec<&mut i32>>()[..], b);
    /// ```
    pub fn iter_mut(&mut self) -> iter::IterMut<'_, T> {
        let (start, end) = (self.head, self.head + self.len);
        iter::IterMut::new(&mut self.blocks, start, end)
    }

    /// Returns the number of elements in the `BlockDeque`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut v = BlockDeque::new();
    /// assert_eq!(v.len(), 0);
    /// v.push_back(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the `BlockDeque` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut v = BlockDeque::new();
    /// assert!(v.is_empty());
    /// v.push_front(1);
    /// assert!(!v.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn range_start_end<R>(&self, range: R) -> (usize, usize)
    where
        R: RangeBounds<usize>,
    {
        let len = self.len();
        let start = match range.start_bound() {
            Included(&n) => n,
            Excluded(&n) => n + 1,
            Unbounded => 0,
        };
        let end = match range.end_bound() {
            Included(&n) => n + 1,
            Excluded(&n) => n,
            Unbounded => len,
        };
        assert!(start <= end, "lower bound was too large");
        assert!(end <= len, "upper bound was too large");
        (start, end)
    }

    /// Creates an iterator that covers the specified range in the `BlockDeque`.
    ///
    /// # Panics
    ///
    /// Panics if the starting point is greater than the end point or if
    /// the end point is greater than the length of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let v: BlockDeque<_> = vec![1, 2, 3].into_iter().collect();
    /// let range = v.range(2..).copied().collect::<BlockDeque<_>>();
    /// assert_eq!(range, vec![3]);
    ///
    /// // A full range covers all contents
    /// let all = v.range(..);
    /// assert_eq!(all.len(), 3);
    /// ```
    pub fn range<R>(&self, range: R) -> iter::Iter<'_, T>
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = self.range_start_end(range);
        iter::Iter {
            blocks: &self.blocks,
            head: self.head + start,
            tail: self.head + end,
        }
    }

    /// Creates an iterator that covers the specified mutable range in the `BlockDeque`.
    ///
    /// # Panics
    ///
    /// Panics if the starting point is greater than the end point or if
    /// the end point is greater than the length of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut v: BlockDeque<_> = vec![1, 2, 3].into_iter().collect();
    /// for v in v.range_mut(2..) {
    ///   *v *= 2;
    /// }
    /// assert_eq!(v, vec![1, 2, 6]);
    /// ```
    pub fn range_mut<R>(&mut self, range: R) -> iter::IterMut<'_, T>
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = self.range_start_end(range);
        let head = self.head;
        iter::IterMut::new(&mut self.blocks, head + start, head + end)
    }

    /// Clears the `BlockDeque`, removing all values and freeing every block.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut v = BlockDeque::new();
    /// v.push_back(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Returns `true` if the `BlockDeque` contains an element equal to the
    /// given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut deque: BlockDeque<u32> = BlockDeque::new();
    ///
    /// deque.push_back(0);
    /// deque.push_back(1);
    ///
    /// assert_eq!(deque.contains(&1), true);
    /// assert_eq!(deque.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }

    /// Provides a reference to the front element, or `None` if the `BlockDeque` is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut d = BlockDeque::new();
    /// assert_eq!(d.front(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d.front(), Some(&1));
    /// ```
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Provides a mutable reference to the front element, or `None` if the
    /// `BlockDeque` is empty.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Provides a reference to the back element, or `None` if the `BlockDeque` is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut d = BlockDeque::new();
    /// assert_eq!(d.back(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d.back(), Some(&2));
    /// ```
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Provides a mutable reference to the back element, or `None` if the
    /// `BlockDeque` is empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len.checked_sub(1).and_then(move |i| self.get_mut(i))
    }

    /// Removes the first element and returns it, or `None` if the `BlockDeque` is
    /// empty.
    ///
    /// The block holding the element is freed if the element was the last one in it.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut d = BlockDeque::new();
    /// d.push_back(1);
    /// d.push_back(2);
    ///
    /// assert_eq!(d.pop_front(), Some(1));
    /// assert_eq!(d.pop_front(), Some(2));
    /// assert_eq!(d.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let (slot, cell) = locate(self.head);
        let value = unsafe { self.block_mut(slot).read(cell) };
        self.head += 1;
        self.len -= 1;
        if cell == BLOCK_SIZE - 1 || self.len == 0 {
            self.release(slot);
        }
        if self.len == 0 {
            self.head = self.midpoint();
        }
        Some(value)
    }

    /// Removes the last element from the `BlockDeque` and returns it, or `None` if
    /// it is empty.
    ///
    /// The block holding the element is freed if the element was the last one in it.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// assert_eq!(buf.pop_back(), None);
    /// buf.push_back(1);
    /// buf.push_back(3);
    /// assert_eq!(buf.pop_back(), Some(3));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let (slot, cell) = locate(self.head + self.len);
        let value = unsafe { self.block_mut(slot).read(cell) };
        if cell == 0 || self.len == 0 {
            self.release(slot);
        }
        if self.len == 0 {
            self.head = self.midpoint();
        }
        Some(value)
    }

    /// Appends an element to the back of the `BlockDeque`.
    ///
    /// # Panics
    ///
    /// Panics if a block or a larger directory cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(1);
    /// buf.push_back(3);
    /// assert_eq!(3, *buf.back().unwrap());
    /// ```
    pub fn push_back(&mut self, value: T) {
        if let Err(e) = self.try_push_back(value) {
            alloc_failed(e.cause);
        }
    }

    /// Appends an element to the back of the `BlockDeque`, or hands it back if memory for it
    /// could not be allocated.
    ///
    /// On failure the deque is unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        match self.prepare_back() {
            Ok((slot, cell)) => {
                unsafe { self.block_mut(slot) }.write(cell, value);
                self.len += 1;
                Ok(())
            }
            Err(cause) => Err(PushError { value, cause }),
        }
    }

    /// Prepends an element to the `BlockDeque`.
    ///
    /// # Panics
    ///
    /// Panics if a block or a larger directory cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut d = BlockDeque::new();
    /// d.push_front(1);
    /// d.push_front(2);
    /// d.push_front(3);
    /// assert_eq!(d, [3, 2, 1]);
    /// ```
    pub fn push_front(&mut self, value: T) {
        if let Err(e) = self.try_push_front(value) {
            alloc_failed(e.cause);
        }
    }

    /// Prepends an element to the `BlockDeque`, or hands it back if memory for it could not be
    /// allocated.
    ///
    /// On failure the deque is unchanged.
    pub fn try_push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        match self.prepare_front() {
            Ok((slot, cell)) => {
                unsafe { self.block_mut(slot) }.write(cell, value);
                self.head -= 1;
                self.len += 1;
                Ok(())
            }
            Err(cause) => Err(PushError { value, cause }),
        }
    }

    /// Inserts an element at `index` within the `BlockDeque`, shifting all elements with indices
    /// greater than or equal to `index` towards the back.
    ///
    /// The elements between `index` and the nearer end are shifted one by one, so this is
    /// `O(min(index, len - index))`. Inserting at `len()` is a [`push_back`](Self::push_back).
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than `BlockDeque`'s length
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut deque = BlockDeque::new();
    /// deque.push_back('a');
    /// deque.push_back('b');
    /// deque.push_back('c');
    /// assert_eq!(deque, vec!['a', 'b', 'c']);
    ///
    /// deque.insert(1, 'd');
    /// assert_eq!(deque, vec!['a', 'd', 'b', 'c']);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(e) = self.try_insert(index, value) {
            alloc_failed(e.cause);
        }
    }

    /// Inserts an element at `index`, or hands it back if memory for it could not be allocated.
    ///
    /// On failure the deque is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than `BlockDeque`'s length
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), PushError<T>> {
        #[cold]
        #[inline(never)]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {}) should be <= len (is {})", index, len);
        }

        if index > self.len {
            assert_failed(index, self.len);
        }
        // The push is the only step that can fail; the swaps after it cannot.
        if index < self.len / 2 {
            self.try_push_front(value)?;
            for i in 0..index {
                self.swap(i, i + 1);
            }
        } else {
            self.try_push_back(value)?;
            for i in (index..self.len - 1).rev() {
                self.swap(i, i + 1);
            }
        }
        Ok(())
    }

    /// Removes and returns the element at `index` from the `BlockDeque`.
    /// Whichever end is closer to the removal point will be moved to make
    /// room, and all the affected elements will be moved to new positions.
    /// Returns `None` if `index` is out of bounds.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(1);
    /// buf.push_back(2);
    /// buf.push_back(3);
    /// assert_eq!(buf, vec![1, 2, 3]);
    ///
    /// assert_eq!(buf.remove(1), Some(2));
    /// assert_eq!(buf, vec![1, 3]);
    /// ```
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        if index < self.len / 2 {
            for i in (0..index).rev() {
                self.swap(i, i + 1);
            }
            self.pop_front()
        } else {
            for i in index..self.len - 1 {
                self.swap(i, i + 1);
            }
            self.pop_back()
        }
    }

    /// Inserts an element at the given position, shifting the elements at and after it
    /// towards the back.
    ///
    /// `at` may be the [`end`](Self::end) position, in which case this is a
    /// [`push_back`](Self::push_back).
    ///
    /// # Errors
    ///
    /// Fails with [`Error::StalePosition`] if the directory has been reallocated since `at` was
    /// taken, and with [`Error::DanglingPosition`] if `at` lies outside `begin()..=end()`. If memory
    /// for the new element cannot be allocated, `value` is dropped, the deque is left unchanged,
    /// and this fails with [`Error::Alloc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut d: BlockDeque<_> = (0..4).collect();
    /// let at = (d.begin() + 1).position();
    /// d.insert_at(at, 10).unwrap();
    /// assert_eq!(d, [0, 10, 1, 2, 3]);
    /// ```
    pub fn insert_at(&mut self, at: Position, value: T) -> Result<(), Error> {
        let index = self.resolve(at)?;
        self.try_insert(index, value)?;
        Ok(())
    }

    /// Removes the element at the given position, shifting the elements after it towards the
    /// front, and returns it.
    ///
    /// Erasing at the [`end`](Self::end) position removes nothing and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::StalePosition`] if the directory has been reallocated since `at` was
    /// taken, and with [`Error::DanglingPosition`] if `at` lies outside `begin()..=end()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut d = BlockDeque::from_elem(5, 'x');
    /// d[3] = 'y';
    /// let third = (d.begin() + 2).position();
    /// assert_eq!(d.erase(third), Ok(Some('x')));
    /// assert_eq!(d, ['x', 'x', 'y', 'x']);
    /// ```
    pub fn erase(&mut self, at: Position) -> Result<Option<T>, Error> {
        let index = self.resolve(at)?;
        Ok(self.remove(index))
    }

    /// Moves all the elements of `other` into `self`, leaving `other` empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf: BlockDeque<_> = vec![1, 2].into_iter().collect();
    /// let mut buf2: BlockDeque<_> = vec![3, 4].into_iter().collect();
    /// buf.append(&mut buf2);
    /// assert_eq!(buf, [1, 2, 3, 4]);
    /// assert!(buf2.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        self.reserve(other.len());
        while let Some(e) = other.pop_front() {
            self.push_back(e);
        }
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all elements `e` such that `f(&e)` returns false.
    /// This method operates in place, visiting each element exactly once in the
    /// original order, and preserves the order of the retained elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf: BlockDeque<_> = (1..=40).collect();
    /// buf.retain(|&x| x % 2 == 0);
    /// assert_eq!(buf.len(), 20);
    /// assert_eq!(buf[19], 40);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let len = self.len;
        let mut kept = 0;
        for i in 0..len {
            if f(unsafe { self.get_unchecked(i) }) {
                if kept != i {
                    self.swap(kept, i);
                }
                kept += 1;
            }
        }
        self.truncate(kept);
    }

    /// Modifies the `BlockDeque` in-place so that `len()` is equal to `new_len`,
    /// either by removing excess elements from the back or by appending
    /// elements generated by calling `generator` to the back.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(10);
    /// buf.push_back(15);
    ///
    /// buf.resize_with(5, Default::default);
    /// assert_eq!(buf, [5, 10, 15, 0, 0]);
    ///
    /// buf.resize_with(2, || unreachable!());
    /// assert_eq!(buf, [5, 10]);
    /// ```
    pub fn resize_with(&mut self, new_len: usize, generator: impl FnMut() -> T) {
        let len = self.len();

        if new_len > len {
            self.extend(repeat_with(generator).take(new_len - len))
        } else {
            self.truncate(new_len);
        }
    }

    /// Returns the detached position of the element at `index`.
    ///
    /// `index` may be `len()`, which gives the end position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than `len()`.
    pub fn position(&self, index: usize) -> Position {
        assert!(
            index <= self.len,
            "position index (is {}) should be <= len (is {})",
            index,
            self.len
        );
        Position::from_addr(self.head + index, self.epoch)
    }

    /// Returns a cursor at the front element.
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.position(0))
    }

    /// Returns a cursor one past the back element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.position(self.len))
    }

    /// Same as [`begin`](Self::begin).
    #[inline]
    pub fn cbegin(&self) -> Cursor<'_, T> {
        self.begin()
    }

    /// Same as [`end`](Self::end).
    #[inline]
    pub fn cend(&self) -> Cursor<'_, T> {
        self.end()
    }

    /// Returns a mutable cursor at the front element.
    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        let pos = self.position(0);
        CursorMut::new(self, pos)
    }

    /// Returns a mutable cursor one past the back element.
    #[inline]
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        let pos = self.position(self.len);
        CursorMut::new(self, pos)
    }

    /// Returns a reverse cursor at the back element.
    #[inline]
    pub fn rbegin(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.end())
    }

    /// Returns a reverse cursor one before the front element.
    #[inline]
    pub fn rend(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.begin())
    }

    /// Same as [`rbegin`](Self::rbegin).
    #[inline]
    pub fn crbegin(&self) -> RevCursor<'_, T> {
        self.rbegin()
    }

    /// Same as [`rend`](Self::rend).
    #[inline]
    pub fn crend(&self) -> RevCursor<'_, T> {
        self.rend()
    }

    /// Returns a mutable reverse cursor at the back element.
    #[inline]
    pub fn rbegin_mut(&mut self) -> RevCursorMut<'_, T> {
        RevCursorMut::new(self.end_mut())
    }

    /// Returns a mutable reverse cursor one before the front element.
    #[inline]
    pub fn rend_mut(&mut self) -> RevCursorMut<'_, T> {
        RevCursorMut::new(self.begin_mut())
    }
}

impl<T: Clone> BlockDeque<T> {
    /// Modifies the `BlockDeque` in-place so that `len()` is equal to new_len,
    /// either by removing excess elements from the back or by appending clones of `value`
    /// to the back.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdeque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(5);
    /// buf.push_back(10);
    /// buf.push_back(15);
    /// assert_eq!(buf, [5, 10, 15]);
    ///
    /// buf.resize(2, 0);
    /// assert_eq!(buf, [5, 10]);
    ///
    /// buf.resize(5, 20);
    /// assert_eq!(buf, [5, 10, 20, 20, 20]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        self.resize_with(new_len, || value.clone());
    }
}

impl<A: PartialEq> PartialEq for BlockDeque<A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<A: Eq> Eq for BlockDeque<A> {}

macro_rules! __impl_slice_eq1 {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
        impl<A, B, $($vars)*> PartialEq<$rhs> for $lhs
        where
            A: PartialEq<B>,
        {
            fn eq(&self, other: &$rhs) -> bool {
                self.len() == other.len() && self.iter().eq(other.iter())
            }
        }
    }
}

__impl_slice_eq1! { [] BlockDeque<A>, Vec<B> }
__impl_slice_eq1! { [] BlockDeque<A>, &[B] }
__impl_slice_eq1! { [] BlockDeque<A>, &mut [B] }
__impl_slice_eq1! { [const N: usize] BlockDeque<A>, [B; N] }
__impl_slice_eq1! { [const N: usize] BlockDeque<A>, &[B; N] }

// For symmetry:

macro_rules! __impl_slice_eq2 {
    ($lhs:ty, $rhs:ty) => {
        impl<A, B> PartialEq<$lhs> for $rhs
        where
            A: PartialEq<B>,
        {
            fn eq(&self, other: &$lhs) -> bool {
                other.len() == self.len() && other.iter().eq(self.iter())
            }
        }
    };
}

__impl_slice_eq2! { BlockDeque<A>, Vec<B> }
__impl_slice_eq2! { BlockDeque<A>, &[B] }
__impl_slice_eq2! { BlockDeque<A>, &mut [B] }

impl<A: PartialOrd> PartialOrd for BlockDeque<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<A: Ord> Ord for BlockDeque<A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<A: Hash> Hash for BlockDeque<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        self.iter().for_each(|elem| elem.hash(state));
    }
}

impl<A> Index<usize> for BlockDeque<A> {
    type Output = A;

    #[inline]
    fn index(&self, index: usize) -> &A {
        self.get(index).expect("Out of bounds access")
    }
}

impl<A> IndexMut<usize> for BlockDeque<A> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut A {
        self.get_mut(index).expect("Out of bounds access")
    }
}

impl<A> FromIterator<A> for BlockDeque<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        let iterator = iter.into_iter();
        let (lower, _) = iterator.size_hint();
        let mut deq = Self::new();
        deq.reserve(lower);
        deq.extend(iterator);
        deq
    }
}

impl<T> IntoIterator for BlockDeque<T> {
    type Item = T;
    type IntoIter = iter::IntoIter<T>;

    fn into_iter(self) -> iter::IntoIter<T> {
        iter::IntoIter { inner: self }
    }
}

impl<'a, T> IntoIterator for &'a BlockDeque<T> {
    type Item = &'a T;
    type IntoIter = iter::Iter<'a, T>;

    fn into_iter(self) -> iter::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut BlockDeque<T> {
    type Item = &'a mut T;
    type IntoIter = iter::IterMut<'a, T>;

    fn into_iter(self) -> iter::IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<A> Extend<A> for BlockDeque<A> {
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        iter.for_each(move |v| self.push_back(v));
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for BlockDeque<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: fmt::Debug> fmt::Debug for BlockDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T> From<Vec<T>> for BlockDeque<T> {
    fn from(other: Vec<T>) -> Self {
        other.into_iter().collect()
    }
}

impl<T> From<VecDeque<T>> for BlockDeque<T> {
    fn from(other: VecDeque<T>) -> Self {
        other.into_iter().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for BlockDeque<T> {
    fn from(other: [T; N]) -> Self {
        other.into_iter().collect()
    }
}

impl<T> From<BlockDeque<T>> for Vec<T> {
    fn from(other: BlockDeque<T>) -> Self {
        other.into_iter().collect()
    }
}

impl<T> From<BlockDeque<T>> for VecDeque<T> {
    fn from(other: BlockDeque<T>) -> Self {
        other.into_iter().collect()
    }
}
