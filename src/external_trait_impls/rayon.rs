//! This module contains the parallel iterator types for `BlockDeque<T>`.
//! You will rarely need to interact with it directly
//! unless you have need to name one of the iterator types.

use crate::{iter, BlockDeque};

use alloc::collections::LinkedList;
use alloc::vec::Vec;
use rayon_::iter::plumbing::*;
use rayon_::iter::*;
use rayon_::vec;

// NOTE: the following macros are lifted from
// https://github.com/rayon-rs/rayon/blob/44b641e7a8b664c47c35109195441a1e54f1c1b9/src/delegate.rs

/// Creates a parallel iterator implementation which simply wraps an inner type
/// and delegates all methods inward.  The actual struct must already be
/// declared with an `inner` field.
///
/// The implementation of `IntoParallelIterator` should be added separately.
macro_rules! delegate_iterator {
    ($iter:ty => $item:ty ,
     impl $( $args:tt )*
     ) => {
        impl $( $args )* ParallelIterator for $iter {
            type Item = $item;

            fn drive_unindexed<C>(self, consumer: C) -> C::Result
                where C: UnindexedConsumer<Self::Item>
            {
                self.inner.drive_unindexed(consumer)
            }

            fn opt_len(&self) -> Option<usize> {
                self.inner.opt_len()
            }
        }
    }
}

/// Creates an indexed parallel iterator implementation which simply wraps an
/// inner type and delegates all methods inward.  The actual struct must already
/// be declared with an `inner` field.
macro_rules! delegate_indexed_iterator {
    ($iter:ty => $item:ty ,
     impl $( $args:tt )*
     ) => {
        delegate_iterator!{
            $iter => $item ,
            impl $( $args )*
        }

        impl $( $args )* IndexedParallelIterator for $iter {
            fn drive<C>(self, consumer: C) -> C::Result
                where C: Consumer<Self::Item>
            {
                self.inner.drive(consumer)
            }

            fn len(&self) -> usize {
                self.inner.len()
            }

            fn with_producer<CB>(self, callback: CB) -> CB::Output
                where CB: ProducerCallback<Self::Item>
            {
                self.inner.with_producer(callback)
            }
        }
    }
}

/// Parallel iterator over a `BlockDeque`
#[derive(Debug, Clone)]
pub struct IntoIter<T: Send> {
    inner: vec::IntoIter<T>,
}

impl<T: Send> IntoParallelIterator for BlockDeque<T> {
    type Item = T;
    type Iter = IntoIter<T>;

    fn into_par_iter(self) -> Self::Iter {
        IntoIter {
            inner: Vec::from(self).into_par_iter(),
        }
    }
}

delegate_indexed_iterator! {
    IntoIter<T> => T,
    impl<T: Send>
}

/// Parallel iterator over an immutable reference to a `BlockDeque`
///
/// Splits happen directly on the flattened address range, so no element is copied or collected
/// up front.
#[derive(Debug)]
pub struct Iter<'a, T: Sync> {
    inner: iter::Iter<'a, T>,
}

impl<'a, T: Sync> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T: Sync> IntoParallelIterator for &'a BlockDeque<T> {
    type Item = &'a T;
    type Iter = Iter<'a, T>;

    fn into_par_iter(self) -> Self::Iter {
        Iter { inner: self.iter() }
    }
}

impl<'a, T: Sync + 'a> ParallelIterator for Iter<'a, T> {
    type Item = &'a T;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn opt_len(&self) -> Option<usize> {
        Some(self.inner.len())
    }
}

impl<'a, T: Sync + 'a> IndexedParallelIterator for Iter<'a, T> {
    fn drive<C>(self, consumer: C) -> C::Result
    where
        C: Consumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn with_producer<CB>(self, callback: CB) -> CB::Output
    where
        CB: ProducerCallback<Self::Item>,
    {
        callback.callback(IterProducer(self.inner))
    }
}

struct IterProducer<'a, T>(iter::Iter<'a, T>);

impl<'a, T: Sync + 'a> Producer for IterProducer<'a, T> {
    type Item = &'a T;
    type IntoIter = iter::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0
    }

    fn split_at(self, index: usize) -> (Self, Self) {
        let (left, right) = self.0.split_at(index);
        (IterProducer(left), IterProducer(right))
    }
}

/// Parallel iterator over a mutable reference to a `BlockDeque`
#[derive(Debug)]
pub struct IterMut<'a, T: Send> {
    inner: vec::IntoIter<&'a mut T>,
}

impl<'a, T: Send> IntoParallelIterator for &'a mut BlockDeque<T> {
    type Item = &'a mut T;
    type Iter = IterMut<'a, T>;

    fn into_par_iter(self) -> Self::Iter {
        // one pointer per element, gathered block by block
        let refs: Vec<&'a mut T> = self.iter_mut().collect();
        IterMut {
            inner: refs.into_par_iter(),
        }
    }
}

delegate_indexed_iterator! {
    IterMut<'a, T> => &'a mut T,
    impl<'a, T: Send + 'a>
}

impl<T> FromParallelIterator<T> for BlockDeque<T>
where
    T: Send,
{
    fn from_par_iter<I>(par_iter: I) -> Self
    where
        I: IntoParallelIterator<Item = T>,
    {
        Vec::from_par_iter(par_iter).into()
    }
}

// The ParallelExtend impl is basically
// https://github.com/rayon-rs/rayon/blob/f0d2e708216edae7386e5343a27efc3948ee9001/src/iter/extend.rs

impl<T> ParallelExtend<T> for BlockDeque<T>
where
    T: Send,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = T>,
    {
        let list = par_iter
            .into_par_iter()
            .fold(Vec::new, |mut v, i| {
                v.push(i);
                v
            })
            .map(|item| {
                let mut list = LinkedList::new();
                list.push_back(item);
                list
            })
            .reduce(LinkedList::new, |mut list1, mut list2| {
                list1.append(&mut list2);
                list1
            });
        self.reserve(list.iter().map(Vec::len).sum());
        for vec in list {
            self.extend(vec);
        }
    }
}

impl<'a, T> ParallelExtend<&'a T> for BlockDeque<T>
where
    T: 'a + Copy + Send + Sync,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = &'a T>,
    {
        self.par_extend(par_iter.into_par_iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use crate::{BlockDeque, BLOCK_SIZE};
    use rayon_::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
    use std::vec::Vec;

    #[test]
    fn splits_across_blocks() {
        let mut d = BlockDeque::new();
        for i in 0..3 * BLOCK_SIZE {
            d.push_back(i);
        }
        for i in 1..=7 {
            d.push_front(3 * BLOCK_SIZE + i);
        }
        let seq: Vec<_> = d.iter().copied().collect();
        // tiny splits force plenty of producer splits, including ones inside a block
        let par: Vec<_> = d.par_iter().with_max_len(3).copied().collect();
        assert_eq!(seq, par);
        assert_eq!(d.par_iter().len(), d.len());
        assert_eq!(d.par_iter().rev().copied().collect::<Vec<_>>().len(), d.len());
    }
}
