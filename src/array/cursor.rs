use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};
use std::slice;

use super::DynArray;
use super::raw::RawBlock;
use crate::util::panic::checked_assert;

/// A forward traversal cursor over a [`DynArray`], produced by [`DynArray::begin`] and
/// [`DynArray::end`].
///
/// A cursor is a (storage pointer, index) pair. Equality and ordering compare the index alone,
/// which assumes both cursors come from the same array; comparing cursors from different arrays
/// is meaningless but not unsafe. The borrow on the array means any mutation (growth, erase,
/// push) invalidates outstanding cursors at compile time.
///
/// Besides the explicit [`get`](Cursor::get) / [`advance`](Cursor::advance) pair, a cursor is a
/// standard [`Iterator`] over `&T`, so `for x in arr.begin()` and `for x in &arr` both walk the
/// live elements in index order.
#[derive(Debug)]
pub struct Cursor<'a, T> {
    ptr: NonNull<T>,
    index: usize,
    len: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) const fn new(ptr: NonNull<T>, index: usize, len: usize) -> Cursor<'a, T> {
        Cursor {
            ptr,
            index,
            len,
            _marker: PhantomData,
        }
    }

    /// Returns the index this cursor is positioned at.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns a reference to the element at the cursor's position.
    ///
    /// With the `checked` feature (default), asserts that the cursor is not at or past the end.
    ///
    /// # Safety (unchecked configuration)
    /// Without the `checked` feature, calling this on an end (or further advanced) cursor is
    /// undefined behavior.
    ///
    /// # Panics
    /// Panics if the cursor is at or past the end and the `checked` feature is enabled.
    pub fn get(&self) -> &'a T {
        checked_assert!(
            self.index < self.len,
            "cursor at index {} dereferenced on array with {} elements",
            self.index,
            self.len
        );

        // SAFETY: index < len in the checked configuration; otherwise staying in bounds is the
        // caller's contract. All slots below len hold live values for the borrow's duration.
        unsafe { &*self.ptr.as_ptr().add(self.index) }
    }

    /// Advances the cursor by one index. Advancing past the end position is allowed but leaves
    /// the cursor non-dereferenceable.
    pub const fn advance(&mut self) {
        self.index += 1;
    }
}

// Derived Clone/Copy would be fine, but the manual comparison impls below must ignore the
// pointer, so everything is spelled out together.
impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Cursor<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.len {
            // SAFETY: index < len, and all slots below len hold live values for the borrow's
            // duration.
            let value = unsafe { &*self.ptr.as_ptr().add(self.index) };
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Cursor<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.index < self.len {
            self.len -= 1;
            // SAFETY: len was just decremented to the last unvisited index, which is at least
            // index and therefore in bounds and live.
            Some(unsafe { &*self.ptr.as_ptr().add(self.len) })
        } else {
            None
        }
    }
}

impl<T> FusedIterator for Cursor<'_, T> {}

impl<T> ExactSizeIterator for Cursor<'_, T> {
    fn len(&self) -> usize {
        self.len - self.index
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;

    type IntoIter = Cursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;

    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        // SAFETY: self is wrapped in ManuallyDrop so its Drop never runs; ownership of the
        // block and the live prefix transfers wholesale to the iterator.
        let block = unsafe { ptr::read(&this.block) };

        IntoIter {
            block,
            start: 0,
            end: this.len,
        }
    }
}

/// An owned iterator over a [`DynArray`], moving elements out one at a time. Produced by
/// [`DynArray`]'s owned [`IntoIterator`] impl.
///
/// Elements in `[start, end)` are still live; anything already yielded from either end is
/// logically dead storage. Dropping the iterator drops the unconsumed elements and then releases
/// the block.
pub struct IntoIter<T> {
    block: RawBlock<T>,
    start: usize,
    end: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            // SAFETY: start < end, so the slot is live. Reading relocates the value to the
            // caller; advancing start marks the slot logically dead so it is never read or
            // dropped again.
            let value = unsafe { self.block.ptr.add(self.start).read() };
            self.start += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            self.end -= 1;
            // SAFETY: end was just decremented to the last live index; the slot becomes
            // logically dead once the value is relocated out.
            Some(unsafe { self.block.ptr.add(self.end).read() })
        } else {
            None
        }
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Unconsumed elements still need their destructors; the block then releases the raw
        // memory.
        for i in self.start..self.end {
            // SAFETY: Slots in [start, end) are live and dropped exactly once here.
            unsafe {
                ptr::drop_in_place(self.block.ptr.add(i).as_ptr());
            }
        }
    }
}
