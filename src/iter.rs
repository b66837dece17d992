use core::fmt;
use core::iter::FusedIterator;
use core::slice;

use crate::block::{locate, Block};
use crate::{BlockDeque, BLOCK_SIZE};

/// An iterator over the elements of a `BlockDeque`.
///
/// This `struct` is created by the [`iter`] and [`range`] methods on [`BlockDeque`]. See their
/// documentation for more.
///
/// [`iter`]: struct.BlockDeque.html#method.iter
/// [`range`]: struct.BlockDeque.html#method.range
/// [`BlockDeque`]: struct.BlockDeque.html
pub struct Iter<'a, T> {
    // flattened addresses of the remaining window; every address in head..tail is live
    pub(super) blocks: &'a [Option<Block<T>>],
    pub(super) head: usize,
    pub(super) tail: usize,
}

impl<'a, T> Iter<'a, T> {
    #[inline]
    unsafe fn at(&self, addr: usize) -> &'a T {
        let (slot, cell) = locate(addr);
        Block::expect(self.blocks.get_unchecked(slot)).get(cell)
    }

    /// Splits the remaining window after `index` elements.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn split_at(self, index: usize) -> (Self, Self) {
        debug_assert!(index <= self.len());
        let mid = self.head + index;
        (
            Iter {
                blocks: self.blocks,
                head: self.head,
                tail: mid,
            },
            Iter {
                blocks: self.blocks,
                head: mid,
                tail: self.tail,
            },
        )
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            blocks: self.blocks,
            head: self.head,
            tail: self.tail,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.head == self.tail {
            return None;
        }
        let v = unsafe { self.at(self.head) };
        self.head += 1;
        Some(v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.tail - self.head;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        if n >= self.tail - self.head {
            self.head = self.tail;
            return None;
        }
        self.head += n;
        self.next()
    }

    #[inline]
    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.head == self.tail {
            return None;
        }
        self.tail -= 1;
        Some(unsafe { self.at(self.tail) })
    }

    fn nth_back(&mut self, n: usize) -> Option<&'a T> {
        if n >= self.tail - self.head {
            self.tail = self.head;
            return None;
        }
        self.tail -= n;
        self.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// A mutable iterator over the elements of a `BlockDeque`.
///
/// This `struct` is created by the [`iter_mut`] and [`range_mut`] methods on [`BlockDeque`]. See
/// their documentation for more.
///
/// [`iter_mut`]: struct.BlockDeque.html#method.iter_mut
/// [`range_mut`]: struct.BlockDeque.html#method.range_mut
/// [`BlockDeque`]: struct.BlockDeque.html
pub struct IterMut<'a, T> {
    // live cells of the partially consumed first and last blocks, with the untouched full blocks
    // in between
    front: slice::IterMut<'a, T>,
    blocks: slice::IterMut<'a, Option<Block<T>>>,
    back: slice::IterMut<'a, T>,
    len: usize,
}

impl<'a, T> IterMut<'a, T> {
    /// Iterates over the flattened addresses `start..end` of `blocks`, all of which must be live.
    pub(super) fn new(blocks: &'a mut [Option<Block<T>>], start: usize, end: usize) -> Self {
        let mut iter = IterMut {
            front: Default::default(),
            blocks: Default::default(),
            back: Default::default(),
            len: end - start,
        };
        if start == end {
            return iter;
        }

        let (first, first_cell) = locate(start);
        let (last, last_cell) = locate(end - 1);
        match &mut blocks[first..=last] {
            [only] => {
                iter.front =
                    unsafe { Block::expect_mut(only).live_mut(first_cell..last_cell + 1) }
                        .iter_mut();
            }
            [head, middle @ .., tail] => {
                iter.front =
                    unsafe { Block::expect_mut(head).live_mut(first_cell..BLOCK_SIZE) }.iter_mut();
                iter.blocks = middle.iter_mut();
                iter.back =
                    unsafe { Block::expect_mut(tail).live_mut(0..last_cell + 1) }.iter_mut();
            }
            [] => unreachable!("first..=last is never empty"),
        }
        iter
    }
}

impl<T: fmt::Debug> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("len", &self.len).finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        loop {
            if let Some(v) = self.front.next() {
                self.len -= 1;
                return Some(v);
            }
            match self.blocks.next() {
                // every block between the first and the last is entirely live
                Some(block) => {
                    self.front =
                        unsafe { Block::expect_mut(block).live_mut(0..BLOCK_SIZE) }.iter_mut();
                }
                None => break,
            }
        }
        let v = self.back.next();
        if v.is_some() {
            self.len -= 1;
        }
        v
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    #[inline]
    fn last(mut self) -> Option<&'a mut T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        loop {
            if let Some(v) = self.back.next_back() {
                self.len -= 1;
                return Some(v);
            }
            match self.blocks.next_back() {
                Some(block) => {
                    self.back =
                        unsafe { Block::expect_mut(block).live_mut(0..BLOCK_SIZE) }.iter_mut();
                }
                None => break,
            }
        }
        let v = self.front.next_back();
        if v.is_some() {
            self.len -= 1;
        }
        v
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// An owning iterator over the elements of a `BlockDeque`.
///
/// This `struct` is created by the [`into_iter`] method on [`BlockDeque`]
/// (provided by the `IntoIterator` trait). See its documentation for more.
///
/// [`into_iter`]: struct.BlockDeque.html#method.into_iter
/// [`BlockDeque`]: struct.BlockDeque.html
#[derive(Clone)]
pub struct IntoIter<T> {
    pub(super) inner: BlockDeque<T>,
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
