//! Random-access cursors over a [`BlockDeque`].
//!
//! A cursor is a `(slot, cell)` coordinate into the deque's block directory. Moving a cursor by
//! any distance, comparing two cursors, or taking their difference is `O(1)` and never looks at
//! the elements, so cursors behave like the random-access iterators of a block-based deque.
//!
//! [`Cursor`] and [`CursorMut`] borrow the deque, so the borrow checker rules out any reallocation
//! while they are alive. A [`Position`] is the same coordinate with the borrow dropped; it carries
//! the directory generation it was taken in, and the deque refuses it once the directory has been
//! reallocated since.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::{BlockDeque, BLOCK_SIZE};

const B: isize = BLOCK_SIZE as isize;

/// A detached cursor coordinate: a directory slot, a cell within that slot's block, and the
/// directory generation it belongs to.
///
/// Arithmetic on positions is pure coordinate math. Whether a position refers to something is
/// only decided when it is handed back to the deque, e.g. through [`BlockDeque::erase`].
///
/// Positions taken from the same deque in the same generation are totally ordered by
/// `(slot, cell)`. Positions from different generations are never equal and do not compare.
#[derive(Clone, Copy, Debug)]
pub struct Position {
    slot: isize,
    cell: usize,
    epoch: usize,
}

impl Position {
    #[inline]
    pub(crate) fn from_addr(addr: usize, epoch: usize) -> Self {
        Position {
            slot: (addr / BLOCK_SIZE) as isize,
            cell: addr % BLOCK_SIZE,
            epoch,
        }
    }

    /// The flattened address `slot * BLOCK_SIZE + cell`, which may be negative for positions
    /// stepped before the first directory slot.
    #[inline]
    pub(crate) fn flat(&self) -> isize {
        self.slot * B + self.cell as isize
    }

    #[inline]
    pub(crate) fn epoch(&self) -> usize {
        self.epoch
    }

    /// The directory slot this position refers to.
    #[inline]
    pub fn slot(&self) -> isize {
        self.slot
    }

    /// The cell within the slot's block, always in `0..BLOCK_SIZE`.
    #[inline]
    pub fn cell(&self) -> usize {
        self.cell
    }

    /// Advances by one element, carrying into the next slot at a block boundary.
    #[inline]
    pub fn step_forward(&mut self) {
        if self.cell == BLOCK_SIZE - 1 {
            self.slot += 1;
            self.cell = 0;
        } else {
            self.cell += 1;
        }
    }

    /// Retreats by one element, borrowing from the previous slot at a block boundary.
    #[inline]
    pub fn step_back(&mut self) {
        if self.cell == 0 {
            self.slot -= 1;
            self.cell = BLOCK_SIZE - 1;
        } else {
            self.cell -= 1;
        }
    }

    /// Moves by `n` elements in either direction.
    #[inline]
    pub fn advance(&mut self, n: isize) {
        // floor division: cell 0 moved by -1 lands on the previous slot's last cell
        let combined = self.cell as isize + n;
        self.slot += combined.div_euclid(B);
        self.cell = combined.rem_euclid(B) as usize;
    }

    /// The number of elements from `origin` to `self`.
    #[inline]
    pub fn distance_from(&self, origin: &Position) -> isize {
        debug_assert_eq!(self.epoch, origin.epoch, "positions from different generations");
        (self.slot - origin.slot) * B + (self.cell as isize - origin.cell as isize)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.epoch == other.epoch && self.slot == other.slot && self.cell == other.cell
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.epoch != other.epoch {
            return None;
        }
        Some(
            self.slot
                .cmp(&other.slot)
                .then_with(|| self.cell.cmp(&other.cell)),
        )
    }
}

impl Add<isize> for Position {
    type Output = Position;

    #[inline]
    fn add(mut self, n: isize) -> Position {
        self.advance(n);
        self
    }
}

impl Sub<isize> for Position {
    type Output = Position;

    #[inline]
    fn sub(mut self, n: isize) -> Position {
        self.advance(-n);
        self
    }
}

impl AddAssign<isize> for Position {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.advance(n);
    }
}

impl SubAssign<isize> for Position {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.advance(-n);
    }
}

impl Sub for Position {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Position) -> isize {
        self.distance_from(&origin)
    }
}

// Shared plumbing for the forward cursors. Both hold `deque` and `pos` fields.
macro_rules! cursor_arith {
    ($cursor:ident) => {
        impl<'a, T> $cursor<'a, T> {
            /// The detached coordinate of this cursor.
            #[inline]
            pub fn position(&self) -> Position {
                self.pos
            }

            /// The logical index this cursor points at. `0` is the front element and `len()` is
            /// the end; anything outside `0..len()` does not refer to an element.
            #[inline]
            pub fn index(&self) -> isize {
                self.pos.flat() - self.deque.head as isize
            }

            /// Steps to the next element.
            #[inline]
            pub fn move_next(&mut self) {
                self.pos.step_forward();
            }

            /// Steps to the previous element.
            #[inline]
            pub fn move_prev(&mut self) {
                self.pos.step_back();
            }
        }

        impl<'a, T> Add<isize> for $cursor<'a, T> {
            type Output = Self;

            #[inline]
            fn add(mut self, n: isize) -> Self {
                self.pos.advance(n);
                self
            }
        }

        impl<'a, T> Sub<isize> for $cursor<'a, T> {
            type Output = Self;

            #[inline]
            fn sub(mut self, n: isize) -> Self {
                self.pos.advance(-n);
                self
            }
        }

        impl<'a, T> AddAssign<isize> for $cursor<'a, T> {
            #[inline]
            fn add_assign(&mut self, n: isize) {
                self.pos.advance(n);
            }
        }

        impl<'a, T> SubAssign<isize> for $cursor<'a, T> {
            #[inline]
            fn sub_assign(&mut self, n: isize) {
                self.pos.advance(-n);
            }
        }
    };
}

/// A read-only random-access cursor into a [`BlockDeque`].
///
/// This `struct` is created by [`BlockDeque::begin`], [`BlockDeque::end`] and friends, or by
/// converting a [`CursorMut`].
///
/// # Examples
///
/// ```
/// use blockdeque::BlockDeque;
///
/// let d: BlockDeque<_> = (0..40).collect();
/// let first = d.begin();
/// let last = d.end() - 1;
/// assert_eq!(last.get(), Some(&39));
/// assert_eq!(last - first, 39);
/// assert!(first < last);
/// assert_eq!((first + 17).get(), Some(&17));
/// ```
pub struct Cursor<'a, T> {
    pub(crate) deque: &'a BlockDeque<T>,
    pub(crate) pos: Position,
}

impl<'a, T> Cursor<'a, T> {
    #[inline]
    pub(crate) fn new(deque: &'a BlockDeque<T>, pos: Position) -> Self {
        Cursor { deque, pos }
    }

    /// Returns the element under the cursor, or `None` if the cursor is not on a live element
    /// (for example, at [`end`](BlockDeque::end)).
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        self.deque.get_at(&self.pos)
    }
}

cursor_arith!(Cursor);

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> Sub for Cursor<'_, T> {
    type Output = isize;

    /// The element distance between two cursors of the same deque.
    #[inline]
    fn sub(self, origin: Self) -> isize {
        debug_assert!(core::ptr::eq(self.deque, origin.deque));
        self.pos - origin.pos
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.deque, other.deque) && self.pos == other.pos
    }
}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !core::ptr::eq(self.deque, other.deque) {
            return None;
        }
        self.pos.partial_cmp(&other.pos)
    }
}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.pos)
            .field("element", &self.get())
            .finish()
    }
}

/// A random-access cursor into a [`BlockDeque`] that can modify the element under it.
///
/// This `struct` is created by [`BlockDeque::begin_mut`] and [`BlockDeque::end_mut`]. It can be
/// turned into a read-only [`Cursor`] with `From`/`Into`, but not the other way around.
///
/// # Examples
///
/// ```
/// use blockdeque::{BlockDeque, Cursor};
///
/// let mut d: BlockDeque<_> = (0..20).collect();
/// let mut c = d.begin_mut() + 16;
/// if let Some(v) = c.get_mut() {
///     *v *= 10;
/// }
/// let c: Cursor<'_, _> = c.into();
/// assert_eq!(c.get(), Some(&160));
/// ```
pub struct CursorMut<'a, T> {
    pub(crate) deque: &'a mut BlockDeque<T>,
    pub(crate) pos: Position,
}

impl<'a, T> CursorMut<'a, T> {
    #[inline]
    pub(crate) fn new(deque: &'a mut BlockDeque<T>, pos: Position) -> Self {
        CursorMut { deque, pos }
    }

    /// Returns the element under the cursor, or `None` if the cursor is not on a live element.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.deque.get_at(&self.pos)
    }

    /// Returns the element under the cursor mutably, or `None` if the cursor is not on a live
    /// element.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.deque.get_at_mut(&self.pos)
    }

    /// Consumes the cursor, returning a mutable reference to the element under it for the
    /// remainder of the borrow.
    #[inline]
    pub fn into_mut(self) -> Option<&'a mut T> {
        self.deque.get_at_mut(&self.pos)
    }

    /// Reborrows this cursor as a read-only [`Cursor`].
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.deque, self.pos)
    }
}

cursor_arith!(CursorMut);

impl<'a, T> From<CursorMut<'a, T>> for Cursor<'a, T> {
    #[inline]
    fn from(cursor: CursorMut<'a, T>) -> Self {
        Cursor::new(cursor.deque, cursor.pos)
    }
}

impl<T: fmt::Debug> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("position", &self.pos)
            .field("element", &self.get())
            .finish()
    }
}

/// A [`Cursor`] that walks the deque back to front.
///
/// The reverse cursor wraps a base cursor and refers to the element just before it, so
/// [`rbegin`](BlockDeque::rbegin) wraps `end()` and [`rend`](BlockDeque::rend) wraps `begin()`.
///
/// # Examples
///
/// ```
/// use blockdeque::BlockDeque;
///
/// let d: BlockDeque<_> = (1..=3).collect();
/// let mut r = d.rbegin();
/// assert_eq!(r.get(), Some(&3));
/// r.move_next();
/// assert_eq!(r.get(), Some(&2));
/// assert_eq!(d.rend() - r, 2);
/// ```
pub struct RevCursor<'a, T> {
    base: Cursor<'a, T>,
}

impl<'a, T> RevCursor<'a, T> {
    /// Wraps `base`; the new cursor refers to the element before `base`.
    #[inline]
    pub fn new(base: Cursor<'a, T>) -> Self {
        RevCursor { base }
    }

    /// The forward cursor this reverse cursor wraps.
    #[inline]
    pub fn base(&self) -> Cursor<'a, T> {
        self.base
    }

    /// Returns the element this cursor refers to.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        (self.base - 1).get()
    }

    /// Steps towards the front of the deque.
    #[inline]
    pub fn move_next(&mut self) {
        self.base.move_prev();
    }

    /// Steps towards the back of the deque.
    #[inline]
    pub fn move_prev(&mut self) {
        self.base.move_next();
    }
}

impl<T> Clone for RevCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RevCursor<'_, T> {}

impl<T> Add<isize> for RevCursor<'_, T> {
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self.base -= n;
        self
    }
}

impl<T> Sub<isize> for RevCursor<'_, T> {
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self.base += n;
        self
    }
}

impl<T> AddAssign<isize> for RevCursor<'_, T> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.base -= n;
    }
}

impl<T> SubAssign<isize> for RevCursor<'_, T> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.base += n;
    }
}

impl<T> Sub for RevCursor<'_, T> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        origin.base - self.base
    }
}

impl<T> PartialEq for RevCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<T> PartialOrd for RevCursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        other.base.partial_cmp(&self.base)
    }
}

impl<T: fmt::Debug> fmt::Debug for RevCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevCursor")
            .field("base", &self.base.pos)
            .field("element", &self.get())
            .finish()
    }
}

/// A [`CursorMut`] that walks the deque back to front.
///
/// Like [`RevCursor`], it refers to the element just before its base cursor.
pub struct RevCursorMut<'a, T> {
    base: CursorMut<'a, T>,
}

impl<'a, T> RevCursorMut<'a, T> {
    /// Wraps `base`; the new cursor refers to the element before `base`.
    #[inline]
    pub fn new(base: CursorMut<'a, T>) -> Self {
        RevCursorMut { base }
    }

    /// Unwraps the forward cursor.
    #[inline]
    pub fn into_base(self) -> CursorMut<'a, T> {
        self.base
    }

    /// Returns the element this cursor refers to.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.base.deque.get_at(&(self.base.pos - 1))
    }

    /// Returns the element this cursor refers to mutably.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.base.deque.get_at_mut(&(self.base.pos - 1))
    }

    /// Steps towards the front of the deque.
    #[inline]
    pub fn move_next(&mut self) {
        self.base.move_prev();
    }

    /// Steps towards the back of the deque.
    #[inline]
    pub fn move_prev(&mut self) {
        self.base.move_next();
    }
}

impl<T> Add<isize> for RevCursorMut<'_, T> {
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self.base -= n;
        self
    }
}

impl<T> Sub<isize> for RevCursorMut<'_, T> {
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self.base += n;
        self
    }
}

impl<T> AddAssign<isize> for RevCursorMut<'_, T> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.base -= n;
    }
}

impl<T> SubAssign<isize> for RevCursorMut<'_, T> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.base += n;
    }
}

impl<'a, T> From<RevCursorMut<'a, T>> for RevCursor<'a, T> {
    #[inline]
    fn from(cursor: RevCursorMut<'a, T>) -> Self {
        RevCursor::new(cursor.base.into())
    }
}

impl<T: fmt::Debug> fmt::Debug for RevCursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevCursorMut")
            .field("base", &self.base.pos)
            .field("element", &self.get())
            .finish()
    }
}
