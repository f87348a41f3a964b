use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::CapacityOverflow;

/// An exclusively owned, untyped block of storage for `cap` slots of `T`.
///
/// A `RawBlock` knows nothing about live elements: it allocates, reallocates and releases raw
/// memory, and its `Drop` releases the block *without* dropping any `T`. Whoever layers a length
/// over it is responsible for running element destructors first. Allocation accounting always
/// uses `Layout::array::<T>(cap)`, so release matches acquisition exactly.
///
/// Zero-sized types never allocate: the pointer stays dangling and every operation is a no-op on
/// the allocator.
pub(crate) struct RawBlock<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> RawBlock<T> {
    /// Allocates a block with exactly `cap` slots, all uninitialized.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`].
    pub(crate) fn alloc(cap: usize) -> RawBlock<T> {
        let layout = Self::layout_for(cap);

        RawBlock {
            ptr: Self::alloc_ptr(layout),
            cap,
            _phantom: PhantomData,
        }
    }

    /// Reallocates to exactly `new_cap` slots, relocating the block's contents bitwise. Slots
    /// beyond the old capacity are uninitialized; slots cut off by a shrinking reallocation are
    /// discarded without any destructor running.
    ///
    /// # Panics
    /// Panics if the new memory layout size would exceed [`isize::MAX`].
    pub(crate) fn realloc(&mut self, new_cap: usize) {
        self.try_realloc(new_cap).expect("Capacity overflow!");
    }

    /// Fallible form of [`realloc`](RawBlock::realloc): an oversized layout is reported rather
    /// than panicking. Allocation failure itself still goes through
    /// [`handle_alloc_error`](alloc::handle_alloc_error).
    pub(crate) fn try_realloc(&mut self, new_cap: usize) -> Result<(), CapacityOverflow> {
        let new_ptr = match (self.cap, new_cap) {
            (_, _) if size_of::<T>() == 0 => {
                // Zero-sized types are never allocated for. Keep the dangling pointer and just
                // record the new capacity.
                self.ptr
            }
            (old, new) if old == new => return Ok(()),
            (0, _) => {
                // Nothing was allocated for capacity 0, so this is a fresh allocation rather
                // than a resize.
                Self::alloc_ptr(Self::try_layout_for(new_cap)?)
            }
            (_, 0) => {
                // SAFETY: The block was allocated with this layout, which has non-zero size
                // because both capacity 0 and zero-sized T are handled above.
                unsafe {
                    alloc::dealloc(self.ptr.as_ptr().cast(), Self::layout_for(self.cap));
                }
                NonNull::dangling()
            }
            (old, new) => {
                let old_layout = Self::layout_for(old);
                let new_layout = Self::try_layout_for(new)?;

                // SAFETY: ptr was allocated in the global allocator with old_layout, and the new
                // size is non-zero and was just validated against isize::MAX.
                let raw_ptr: *mut T = unsafe {
                    alloc::realloc(self.ptr.as_ptr().cast(), old_layout, new_layout.size()).cast()
                };

                NonNull::new(raw_ptr).unwrap_or_else(|| alloc::handle_alloc_error(new_layout))
            }
        };

        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// A helper to build the [`Layout`] for `cap` slots of `T`.
    ///
    /// # Panics
    /// Panics if the layout size exceeds [`isize::MAX`].
    pub(crate) fn layout_for(cap: usize) -> Layout {
        Self::try_layout_for(cap).expect("Capacity overflow!")
    }

    fn try_layout_for(cap: usize) -> Result<Layout, CapacityOverflow> {
        Layout::array::<T>(cap).map_err(|_| CapacityOverflow)
    }

    /// A helper to allocate a pointer for the provided [`Layout`]. Returns a dangling pointer for
    /// a zero-sized layout.
    ///
    /// # Errors
    /// In the event of an allocation error, this method calls [`alloc::handle_alloc_error`] as
    /// recommended, to avoid new allocations rather than panicking.
    fn alloc_ptr(layout: Layout) -> NonNull<T> {
        if layout.size() == 0 {
            NonNull::dangling()
        } else {
            NonNull::new(
                // SAFETY: Zero-sized layouts have been guarded against.
                unsafe { alloc::alloc(layout).cast() },
            )
            .unwrap_or_else(|| alloc::handle_alloc_error(layout))
        }
    }
}

impl<T> Drop for RawBlock<T> {
    fn drop(&mut self) {
        let layout = Self::layout_for(self.cap);

        if layout.size() != 0 {
            // SAFETY: ptr is always allocated in the global allocator and layout is the same as
            // when allocated. Zero-sized layouts aren't allocated and are guarded against
            // deallocation.
            unsafe {
                alloc::dealloc(self.ptr.as_ptr().cast(), layout);
            }
        }
    }
}

// SAFETY: A RawBlock is an exclusively owned allocation; sending it to another thread is safe
// whenever T itself is Send.
unsafe impl<T: Send> Send for RawBlock<T> {}
// SAFETY: RawBlock exposes no interior mutability, so sharing references is safe when T: Sync.
unsafe impl<T: Sync> Sync for RawBlock<T> {}
