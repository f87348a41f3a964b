use std::borrow::{Borrow, BorrowMut};
use std::cmp;
use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice;

use crate::array::Cursor;
use crate::array::raw::RawBlock;
use crate::error::{IndexOutOfBounds, NonGrowingReserve, ReserveError};
use crate::util::panic::checked_assert;

const GROWTH_FACTOR: usize = 2;

/// A resizable contiguous sequence over a manually managed allocation.
///
/// The backing block holds `capacity` raw slots of `T`; exactly the prefix `[0, len)` contains
/// live, constructed values. Construction and destruction of elements are explicit: [`push`]
/// and [`emplace_with`] construct into the next raw slot, [`erase`] and [`swap_erase`] run the
/// destructor of the removed element, and dropping the array runs one destructor per live
/// element before releasing the block.
///
/// A fresh array allocates a single slot up front, so `capacity() >= 1` after [`new`]. Growth
/// doubles the capacity and relocates every live element into the new block in index order;
/// capacity never shrinks implicitly.
///
/// `DynArray` does not implement [`Clone`]: the backing block is owned singularly and is never
/// duplicated implicitly. This is a deliberate ownership restriction, not an oversight.
///
/// # Checked preconditions
/// [`at`], [`at_mut`], [`reserve`], [`erase`] and [`swap_erase`] assert their preconditions only
/// when the `checked` feature (on by default) is enabled. Without it, violating a precondition
/// is undefined behavior; the methods compile to the raw access with no runtime branch.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the array.
/// - `i`: The index of the item in question.
///
/// | Method | Complexity |
/// |-|-|
/// | `at` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `emplace_with` | `O(1)`*, `O(n)` |
/// | `erase` | `O(n-i)` |
/// | `swap_erase` | `O(1)` |
/// | `reserve` | `O(n)` |
///
/// \* If the array doesn't have enough capacity for the new element, insertion takes `O(n)`.
///
/// [`new`]: DynArray::new
/// [`push`]: DynArray::push
/// [`emplace_with`]: DynArray::emplace_with
/// [`erase`]: DynArray::erase
/// [`swap_erase`]: DynArray::swap_erase
/// [`at`]: DynArray::at
/// [`at_mut`]: DynArray::at_mut
/// [`reserve`]: DynArray::reserve
pub struct DynArray<T> {
    pub(crate) block: RawBlock<T>,
    pub(crate) len: usize,
}

impl<T> DynArray<T> {
    /// Creates a new array with length 0 and a single allocated slot.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let arr: DynArray<u8> = DynArray::new();
    /// assert_eq!(arr.len(), 0);
    /// assert_eq!(arr.capacity(), 1);
    /// ```
    pub fn new() -> DynArray<T> {
        DynArray {
            block: RawBlock::alloc(1),
            len: 0,
        }
    }

    /// Returns the number of live elements in the array.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let arr: DynArray<_> = (1_u8..=3).collect();
    /// assert_eq!(arr.len(), 3);
    /// ```
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of allocated slots. Unlike [`Vec`], the capacity is guaranteed to be
    /// exactly the value produced by construction, growth or [`reserve`](DynArray::reserve).
    pub const fn capacity(&self) -> usize {
        self.block.cap
    }

    /// Returns true if the array contains no live elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value` to the end of the array, growing the allocation first if it is full, and
    /// returns a reference to the element's new slot.
    ///
    /// The value is constructed into raw storage (a plain write), never assigned over an
    /// uninitialized slot.
    ///
    /// # Panics
    /// Panics if growth would produce a memory layout larger than [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let mut arr = DynArray::new();
    /// for i in 0..=5 {
    ///     arr.push(i);
    /// }
    /// assert_eq!(arr.as_slice(), &[0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn push(&mut self, value: T) -> &mut T {
        self.emplace_with(|| value)
    }

    /// Constructs a new element in place at the end of the array, growing the allocation first
    /// if it is full, and returns a reference to it.
    ///
    /// The closure's result is written directly into the slot, so the element is never
    /// constructed on the caller's stack and then moved.
    ///
    /// # Panics
    /// Panics if growth would produce a memory layout larger than [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let mut arr: DynArray<String> = DynArray::new();
    /// arr.emplace_with(|| "first".to_owned());
    /// assert_eq!(arr.at(0), "first");
    /// ```
    pub fn emplace_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        if self.len == self.capacity() {
            self.grow();
        }

        // SAFETY: The capacity has just been adjusted to exceed len, so the slot at len is
        // within the allocation and holds no live value to overwrite.
        unsafe {
            let slot = self.block.ptr.add(self.len);
            slot.write(f());
            self.len += 1;
            &mut *slot.as_ptr()
        }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// With the `checked` feature (default), asserts `index < len` and panics on violation.
    ///
    /// # Safety (unchecked configuration)
    /// Without the `checked` feature no bounds check is performed and an out-of-range `index` is
    /// undefined behavior. The caller is responsible for staying in bounds.
    ///
    /// # Panics
    /// Panics if `index >= len` and the `checked` feature is enabled.
    pub fn at(&self, index: usize) -> &T {
        checked_assert!(
            index < self.len,
            "index {} out of bounds for array with {} elements",
            index,
            self.len
        );

        // SAFETY: index < len in the checked configuration; otherwise in-bounds access is the
        // caller's contract. All slots below len hold live values.
        unsafe { self.block.ptr.add(index).as_ref() }
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// With the `checked` feature (default), asserts `index < len` and panics on violation.
    ///
    /// # Safety (unchecked configuration)
    /// Without the `checked` feature no bounds check is performed and an out-of-range `index` is
    /// undefined behavior. The caller is responsible for staying in bounds.
    ///
    /// # Panics
    /// Panics if `index >= len` and the `checked` feature is enabled.
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        checked_assert!(
            index < self.len,
            "index {} out of bounds for array with {} elements",
            index,
            self.len
        );

        // SAFETY: index < len in the checked configuration; otherwise in-bounds access is the
        // caller's contract. All slots below len hold live values.
        unsafe { self.block.ptr.add(index).as_mut() }
    }

    /// Returns a reference to the element at `index`, or [`IndexOutOfBounds`] if `index >= len`.
    /// The fallible counterpart to [`at`](DynArray::at), independent of the `checked` feature.
    pub fn try_at(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        if index < self.len {
            // SAFETY: index has just been checked against len.
            Ok(unsafe { self.block.ptr.add(index).as_ref() })
        } else {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            })
        }
    }

    /// Returns a mutable reference to the element at `index`, or [`IndexOutOfBounds`] if
    /// `index >= len`.
    pub fn try_at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        if index < self.len {
            // SAFETY: index has just been checked against len.
            Ok(unsafe { self.block.ptr.add(index).as_mut() })
        } else {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            })
        }
    }

    /// Returns a reference to the element at `index` without any bounds check, regardless of the
    /// feature configuration.
    ///
    /// # Safety
    /// `index` must be less than [`len`](DynArray::len). Anything else is undefined behavior.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        // SAFETY: index < len is the caller's contract; all slots below len hold live values.
        unsafe { self.block.ptr.add(index).as_ref() }
    }

    /// Returns a mutable reference to the element at `index` without any bounds check,
    /// regardless of the feature configuration.
    ///
    /// # Safety
    /// `index` must be less than [`len`](DynArray::len). Anything else is undefined behavior.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        // SAFETY: index < len is the caller's contract; all slots below len hold live values.
        unsafe { self.block.ptr.add(index).as_mut() }
    }

    /// Removes the element at `index`, relocating every subsequent element one slot down. The
    /// relative order of the remaining elements is preserved. `O(len - index)`.
    ///
    /// The removed element's destructor runs immediately; the tail is relocated bitwise, so no
    /// destructor or move constructor runs for the shifted elements.
    ///
    /// # Safety (unchecked configuration)
    /// Without the `checked` feature no bounds check is performed and an out-of-range `index` is
    /// undefined behavior.
    ///
    /// # Panics
    /// Panics if `index >= len` and the `checked` feature is enabled.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let mut arr: DynArray<_> = [1, 2, 3, 4].into_iter().collect();
    /// arr.erase(1);
    /// assert_eq!(arr.as_slice(), &[1, 3, 4]);
    /// ```
    pub fn erase(&mut self, index: usize) {
        checked_assert!(
            index < self.len,
            "index {} out of bounds for array with {} elements",
            index,
            self.len
        );

        self.len -= 1;
        // SAFETY: index <= the old len - 1, so both the read slot and the copied range
        // [index + 1, old len) are within the allocation. Reading relocates the removed value
        // into a local, the tail copy fills its slot and len already excludes the vacated last
        // slot, so the array is consistent before the removed value's destructor runs.
        unsafe {
            let hole = self.block.ptr.add(index);
            let removed = hole.read();
            ptr::copy(hole.add(1).as_ptr(), hole.as_ptr(), self.len - index);
            drop(removed);
        }
    }

    /// Removes the element at `index` by relocating the last live element into its slot. Does
    /// not preserve order. `O(1)`.
    ///
    /// The removed element's destructor runs immediately. The last element is relocated bitwise:
    /// its old slot becomes logically dead raw storage and no second destructor ever runs for
    /// it, so this is sound for every element type, resource-owning or not.
    ///
    /// # Safety (unchecked configuration)
    /// Without the `checked` feature no bounds check is performed and an out-of-range `index` is
    /// undefined behavior.
    ///
    /// # Panics
    /// Panics if `index >= len` and the `checked` feature is enabled.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let mut arr: DynArray<_> = [1, 2, 3, 4].into_iter().collect();
    /// arr.swap_erase(1);
    /// assert_eq!(arr.as_slice(), &[1, 4, 3]);
    /// ```
    pub fn swap_erase(&mut self, index: usize) {
        checked_assert!(
            index < self.len,
            "index {} out of bounds for array with {} elements",
            index,
            self.len
        );

        self.len -= 1;
        // SAFETY: index <= the old len - 1 and the old last slot is at the new len, both within
        // the allocation. Reading relocates the removed value into a local; the last element's
        // bits then fill the hole (a no-op self-copy when index was the last element, which
        // ptr::copy permits). The relocated value lives at index only, its old slot is excluded
        // by len and never dropped, and the removed value's destructor runs once the array is
        // consistent.
        unsafe {
            let hole = self.block.ptr.add(index);
            let removed = hole.read();
            ptr::copy(self.block.ptr.add(self.len).as_ptr(), hole.as_ptr(), 1);
            drop(removed);
        }
    }

    /// Reallocates the backing block to exactly `new_cap` slots, relocating all live elements in
    /// index order. Capacity-expanding, like every reallocation here: with the `checked` feature
    /// (default), asserts `new_cap > capacity()`.
    ///
    /// # Safety (unchecked configuration)
    /// Without the `checked` feature the precondition is unenforced; reserving fewer slots than
    /// there are live elements is undefined behavior and the caller is responsible for never
    /// doing so.
    ///
    /// # Panics
    /// Panics if `new_cap <= capacity()` and the `checked` feature is enabled, or if the new
    /// memory layout size would exceed [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let mut arr: DynArray<_> = (0..4).collect();
    /// arr.reserve(64);
    /// assert_eq!(arr.capacity(), 64);
    /// assert_eq!(arr.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn reserve(&mut self, new_cap: usize) {
        checked_assert!(
            new_cap > self.capacity(),
            "reserve to {} slots does not grow capacity {}",
            new_cap,
            self.capacity()
        );

        self.block.realloc(new_cap);
    }

    /// Fallible form of [`reserve`](DynArray::reserve): reports a non-growing request or an
    /// oversized layout as an error instead of asserting, leaving the array untouched.
    pub fn try_reserve(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        if new_cap <= self.capacity() {
            return Err(NonGrowingReserve {
                requested: new_cap,
                cap: self.capacity(),
            }
            .into());
        }

        self.block.try_realloc(new_cap)?;
        Ok(())
    }

    /// Returns a raw pointer to the backing storage.
    pub const fn as_ptr(&self) -> *const T {
        self.block.ptr.as_ptr()
    }

    /// Returns a mutable raw pointer to the backing storage.
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.block.ptr.as_ptr()
    }

    /// Returns the live elements as a slice.
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: The prefix [0, len) always holds live, properly initialized values in an
        // allocation made with Layout::array, and len * size_of::<T>() <= isize::MAX.
        unsafe { slice::from_raw_parts(self.block.ptr.as_ptr(), self.len) }
    }

    /// Returns the live elements as a mutable slice.
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: The prefix [0, len) always holds live, properly initialized values in an
        // allocation made with Layout::array, and len * size_of::<T>() <= isize::MAX.
        unsafe { slice::from_raw_parts_mut(self.block.ptr.as_ptr(), self.len) }
    }

    /// Returns a cursor positioned at index 0.
    ///
    /// The cursor walks the live elements in index order and compares by index, so
    /// `begin() == end()` exactly when the array is empty. Any mutation of the array invalidates
    /// it (enforced by the borrow on `self`).
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let arr: DynArray<_> = (0..3).collect();
    /// let mut cursor = arr.begin();
    /// while cursor != arr.end() {
    ///     println!("{}", cursor.get());
    ///     cursor.advance();
    /// }
    /// ```
    pub const fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.block.ptr, 0, self.len)
    }

    /// Returns a cursor positioned one past the last live element. Useful only as a bound for
    /// comparison against an advancing cursor.
    pub const fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.block.ptr, self.len, self.len)
    }
}

impl<T> DynArray<T> {
    pub(crate) fn grow(&mut self) {
        // max() covers arrays built with capacity 0 (repeat with count 0), which doubling alone
        // would leave stuck.
        let new_cap = cmp::max(self.capacity() * GROWTH_FACTOR, 1);
        self.block.realloc(new_cap);
    }
}

impl<T: Clone> DynArray<T> {
    /// Creates an array of `count` clones of `value`, with length and capacity exactly `count`.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::DynArray;
    /// let arr = DynArray::repeat(7_u8, 3);
    /// assert_eq!(arr.len(), 3);
    /// assert_eq!(arr.capacity(), 3);
    /// assert_eq!(arr.as_slice(), &[7, 7, 7]);
    /// ```
    pub fn repeat(value: T, count: usize) -> DynArray<T> {
        let mut arr = DynArray {
            block: RawBlock::alloc(count),
            len: 0,
        };

        for i in 0..count {
            // SAFETY: The block was just allocated with count slots, so every i is in bounds and
            // uninitialized. len tracks the constructed prefix, keeping a panicking clone() from
            // leaking or dropping uninitialized slots.
            unsafe {
                arr.block.ptr.add(i).write(value.clone());
            }
            arr.len += 1;
        }

        arr
    }
}

impl<T: Default> DynArray<T> {
    /// Creates an array of `count` default values of `T`, with length and capacity exactly
    /// `count`.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`].
    pub fn repeat_default(count: usize) -> DynArray<T> {
        let mut arr = DynArray {
            block: RawBlock::alloc(count),
            len: 0,
        };

        for i in 0..count {
            // SAFETY: The block was just allocated with count slots, so every i is in bounds and
            // uninitialized. len tracks the constructed prefix.
            unsafe {
                arr.block.ptr.add(i).write(T::default());
            }
            arr.len += 1;
        }

        arr
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // Drop the live prefix in index order; the block releases the raw memory afterwards
        // without touching elements.
        for i in 0..self.len {
            // SAFETY: Every slot below len holds a live value, properly aligned and dropped
            // exactly once here.
            unsafe {
                ptr::drop_in_place(self.block.ptr.add(i).as_ptr());
            }
        }
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = DynArray::new();
        arr.extend(iter);
        arr
    }
}

impl<T> Index<usize> for DynArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.at(index)
    }
}

impl<T> IndexMut<usize> for DynArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.at_mut(index)
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Borrow<[T]> for DynArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> BorrowMut<[T]> for DynArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: Debug> Debug for DynArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArray")
            .field("contents", &self.as_slice())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<T: Debug> Display for DynArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
