use core::mem::MaybeUninit;
use core::ops::Range;

use alloc::boxed::Box;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use crate::BLOCK_SIZE;

/// A fixed-capacity buffer of `BLOCK_SIZE` possibly-uninitialized cells.
///
/// A `Block` does not know which of its cells are live. The owning deque tracks that through its
/// `head`/`len` window and is responsible for dropping live cells before the block goes away;
/// dropping a `Block` only frees the buffer.
pub(crate) struct Block<T> {
    cells: Box<[MaybeUninit<T>; BLOCK_SIZE]>,
}

impl<T> Block<T> {
    /// Allocates a fresh block, reporting allocation failure instead of aborting.
    pub(crate) fn try_new() -> Result<Self, TryReserveError> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(BLOCK_SIZE)?;
        cells.resize_with(BLOCK_SIZE, MaybeUninit::uninit);
        match Box::<[MaybeUninit<T>; BLOCK_SIZE]>::try_from(cells.into_boxed_slice()) {
            Ok(cells) => Ok(Self { cells }),
            Err(_) => unreachable!("block buffer holds exactly BLOCK_SIZE cells"),
        }
    }

    /// Moves `value` into `cell`.
    ///
    /// Whatever was in `cell` is overwritten without being dropped.
    #[inline]
    pub(crate) fn write(&mut self, cell: usize, value: T) {
        self.cells[cell].write(value);
    }

    /// Moves the value out of `cell`, leaving it logically uninitialized.
    ///
    /// # Safety
    ///
    /// `cell` must be initialized, and must be treated as uninitialized afterwards.
    #[inline]
    pub(crate) unsafe fn read(&mut self, cell: usize) -> T {
        self.cells[cell].assume_init_read()
    }

    /// # Safety
    ///
    /// `cell` must be initialized.
    #[inline]
    pub(crate) unsafe fn get(&self, cell: usize) -> &T {
        self.cells[cell].assume_init_ref()
    }

    /// # Safety
    ///
    /// `cell` must be initialized.
    #[inline]
    pub(crate) unsafe fn get_mut(&mut self, cell: usize) -> &mut T {
        self.cells[cell].assume_init_mut()
    }

    /// # Safety
    ///
    /// Every cell in `cells` must be initialized.
    #[inline]
    pub(crate) unsafe fn live_mut(&mut self, cells: Range<usize>) -> &mut [T] {
        &mut *(&mut self.cells[cells] as *mut [MaybeUninit<T>] as *mut [T])
    }

    /// Runs the destructors of the values in `cells`.
    ///
    /// # Safety
    ///
    /// Every cell in `cells` must be initialized, and must be treated as uninitialized afterwards.
    #[inline]
    pub(crate) unsafe fn drop_live(&mut self, cells: Range<usize>) {
        core::ptr::drop_in_place(self.live_mut(cells));
    }

    /// Swaps two cells of this block, initialized or not.
    #[inline]
    pub(crate) fn swap_cells(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, cell: usize) -> &mut MaybeUninit<T> {
        &mut self.cells[cell]
    }

    /// Returns the block held by a directory slot that is known to be owned.
    ///
    /// # Safety
    ///
    /// `slot` must be `Some`.
    #[inline]
    pub(crate) unsafe fn expect(slot: &Option<Self>) -> &Self {
        debug_assert!(slot.is_some(), "no block for live slot");
        slot.as_ref()
            .unwrap_or_else(|| core::hint::unreachable_unchecked())
    }

    /// # Safety
    ///
    /// `slot` must be `Some`.
    #[inline]
    pub(crate) unsafe fn expect_mut(slot: &mut Option<Self>) -> &mut Self {
        debug_assert!(slot.is_some(), "no block for live slot");
        slot.as_mut()
            .unwrap_or_else(|| core::hint::unreachable_unchecked())
    }
}

/// Splits a flattened address into its directory slot and the cell within that slot's block.
#[inline]
pub(crate) const fn locate(addr: usize) -> (usize, usize) {
    (addr / BLOCK_SIZE, addr % BLOCK_SIZE)
}
