#![cfg(test)]

use std::iter;

use super::*;
use crate::error::{IndexOutOfBounds, ReserveError};
use crate::util::alloc::{CountedDrop, ZeroSizedType};
use crate::util::panic::assert_panics;

#[test]
fn test_new() {
    let arr: DynArray<u8> = DynArray::new();
    assert_eq!(arr.len(), 0, "A new array should be empty.");
    assert_eq!(
        arr.capacity(),
        1,
        "A new array should allocate exactly one slot."
    );
    assert!(arr.is_empty());
    assert_eq!(arr.begin(), arr.end(), "begin == end for an empty array.");
}

#[test]
fn test_push_growth_doubles() {
    let mut arr = DynArray::new();
    for i in 0..100_usize {
        arr.push(i);
        assert_eq!(arr.len(), i + 1, "Each push should add exactly one element.");
        assert!(
            arr.capacity().is_power_of_two(),
            "Capacity {} should be a power of two after pushes from new().",
            arr.capacity()
        );
        assert!(
            arr.capacity() >= arr.len(),
            "Capacity should never fall below the length."
        );
    }

    let mut arr = DynArray::new();
    let mut caps = Vec::new();
    for i in 0..9_u32 {
        caps.push(arr.capacity());
        arr.push(i);
    }
    assert_eq!(
        caps,
        [1, 1, 2, 4, 4, 8, 8, 8, 8],
        "Growth should double the capacity exactly when the array is full."
    );
}

#[test]
fn test_push_then_at() {
    let mut arr = DynArray::new();
    for i in 0..10_i64 {
        let slot = *arr.push(i * 3);
        assert_eq!(slot, i * 3, "push should return the inserted value's slot.");
        assert_eq!(
            *arr.at(arr.len() - 1),
            i * 3,
            "The last element should be the value just pushed."
        );
    }
}

#[test]
fn test_repeat() {
    let arr = DynArray::repeat(7_u8, 5);
    assert_eq!(arr.len(), 5);
    assert_eq!(
        arr.capacity(),
        5,
        "A sized construction should allocate exactly count slots."
    );
    assert_eq!(arr.as_slice(), &[7, 7, 7, 7, 7]);

    let arr: DynArray<String> = DynArray::repeat_default(3);
    assert_eq!(arr.as_slice(), &["", "", ""]);

    // count 0 leaves capacity 0; growth has to recover from that.
    let mut arr = DynArray::repeat(1_u8, 0);
    assert_eq!(arr.capacity(), 0);
    arr.push(9);
    assert_eq!(arr.as_slice(), &[9]);
    assert_eq!(arr.capacity(), 1);
}

#[test]
fn test_emplace() {
    let mut arr: DynArray<String> = DynArray::new();
    let len_before = arr.len();

    let made = arr.emplace_with(|| "built in place".to_owned());
    made.push_str(", then extended");

    assert_eq!(
        arr.len(),
        len_before + 1,
        "emplace_with should add exactly one element."
    );
    assert_eq!(arr.at(0), "built in place, then extended");
}

#[test]
fn test_erase_ordered() {
    let mut arr: DynArray<_> = ["a", "b", "c", "d"].into_iter().collect();
    arr.erase(1);
    assert_eq!(
        arr.as_slice(),
        &["a", "c", "d"],
        "Ordered erase should preserve the relative order of survivors."
    );

    arr.erase(2);
    assert_eq!(arr.as_slice(), &["a", "c"], "Erasing the last index should work.");
    arr.erase(0);
    arr.erase(0);
    assert!(arr.is_empty());
}

#[test]
fn test_swap_erase() {
    let mut arr: DynArray<_> = ["a", "b", "c", "d"].into_iter().collect();
    arr.swap_erase(1);
    assert_eq!(arr.len(), 3);
    assert_eq!(
        arr.as_slice(),
        &["a", "d", "c"],
        "The former last element should fill the erased slot."
    );

    arr.swap_erase(2);
    assert_eq!(
        arr.as_slice(),
        &["a", "d"],
        "Swap-erasing the last element should just shrink the array."
    );
}

#[test]
fn test_swap_erase_drop_balance() {
    let counter = CountedDrop::new(0);
    let mut arr: DynArray<_> = iter::repeat_with(|| counter.clone()).take(4).collect();

    arr.swap_erase(1);
    assert_eq!(
        *counter.borrow(),
        1,
        "Swap erase should drop exactly the removed element, not the relocated one."
    );

    drop(arr);
    assert_eq!(
        counter.take(),
        4,
        "Every constructed element should be dropped exactly once."
    );
}

#[test]
fn test_reserve() {
    let mut arr: DynArray<_> = (0..4_u32).collect();
    let len_before = arr.len();

    arr.reserve(64);
    assert_eq!(arr.capacity(), 64, "Reserve should produce the exact capacity.");
    assert_eq!(arr.len(), len_before, "Reserve should not change the length.");
    assert_eq!(
        arr.as_slice(),
        &[0, 1, 2, 3],
        "All elements should survive the relocation."
    );
}

#[test]
fn test_try_reserve() {
    let mut arr: DynArray<u8> = (0..4).collect();

    let err = arr.try_reserve(2).expect_err("2 <= capacity, must not grow");
    assert!(err.is_non_growing(), "A too-small reserve should be reported.");
    assert_eq!(arr.as_slice(), &[0, 1, 2, 3], "A failed reserve should change nothing.");

    let err = arr
        .try_reserve(isize::MAX as usize + 1)
        .expect_err("the layout cannot be represented");
    assert!(matches!(err, ReserveError::CapacityOverflow(_)));

    arr.try_reserve(16).expect("a growing reserve should succeed");
    assert_eq!(arr.capacity(), 16);
}

#[test]
fn test_try_at() {
    let mut arr: DynArray<_> = (0..3_u8).collect();
    assert_eq!(arr.try_at(2), Ok(&2));
    assert_eq!(
        arr.try_at(3),
        Err(IndexOutOfBounds { index: 3, len: 3 }),
        "One past the end should be reported with the offending index."
    );

    *arr.try_at_mut(0).expect("index 0 is in bounds") = 9;
    assert_eq!(arr[0], 9);
}

#[test]
fn test_cursor_traversal() {
    let arr: DynArray<_> = (10..15_i32).collect();

    let mut visited = Vec::new();
    let mut cursor = arr.begin();
    while cursor != arr.end() {
        visited.push(*cursor.get());
        cursor.advance();
    }
    assert_eq!(
        visited,
        [10, 11, 12, 13, 14],
        "A cursor should visit every element in index order."
    );

    assert!(arr.begin() < arr.end(), "begin should order before end when non-empty.");
    assert_eq!(arr.end().index(), arr.len());

    let for_looped: Vec<_> = (&arr).into_iter().copied().collect();
    assert_eq!(for_looped, visited, "Iterating a cursor should match manual traversal.");

    let empty: DynArray<i32> = DynArray::new();
    assert_eq!(
        empty.begin(),
        empty.end(),
        "begin == end exactly when the array is empty."
    );
}

#[test]
fn test_cursor_back_traversal() {
    let arr: DynArray<_> = (0..5_u8).collect();
    let mut cursor = arr.begin();
    assert_eq!(cursor.next_back(), Some(&4));
    assert_eq!(cursor.next(), Some(&0));
    assert_eq!(cursor.len(), 3, "Three elements should remain unvisited.");
}

#[test]
fn test_index_and_slice_ops() {
    let mut arr: DynArray<_> = (0..5_usize).collect();
    arr[2] = 100;
    assert_eq!(arr[2], 100);
    assert_eq!(*arr.at(2), 100);

    assert!(arr.contains(&100), "Deref to slice should provide contains.");
    for value in &mut arr {
        *value *= 2;
    }
    assert_eq!(&*arr, &[0, 2, 200, 6, 8]);

    // SAFETY: 0 < len.
    assert_eq!(unsafe { *arr.get_unchecked(0) }, 0);

    assert_eq!(arr.as_ptr(), arr.as_slice().as_ptr());
}

#[test]
fn test_equality_and_format() {
    let arr: DynArray<_> = (0..3_u8).collect();
    let same: DynArray<_> = [0, 1, 2].into_iter().collect();
    assert_eq!(arr, same, "Different construction orders should compare equal.");
    assert_ne!(arr, DynArray::repeat(0, 3));

    assert_eq!(format!("{arr}"), "[0, 1, 2]");
    let debug = format!("{arr:?}");
    assert!(debug.contains("len: 3"), "Debug output should include the length.");
}

#[test]
fn test_drop_balance() {
    let counter = CountedDrop::new(0);
    let arr: DynArray<_> = iter::repeat_with(|| counter.clone()).take(10).collect();

    drop(arr);
    assert_eq!(counter.take(), 10, "10 elements should have been dropped.");

    let mut arr: DynArray<_> = iter::repeat_with(|| counter.clone()).take(10).collect();
    arr.erase(4);
    assert_eq!(
        *counter.borrow(),
        1,
        "Ordered erase should drop exactly the removed element."
    );
    drop(arr);
    assert_eq!(counter.take(), 10, "Relocated elements should drop exactly once.");
}

#[test]
fn test_into_iter() {
    let arr: DynArray<_> = (0..5_u32).collect();
    let mut iter = arr.into_iter();
    assert_eq!(iter.next(), Some(0));
    assert_eq!(iter.next_back(), Some(4));
    assert_eq!(iter.len(), 3);

    let counter = CountedDrop::new(0);
    let arr: DynArray<_> = iter::repeat_with(|| counter.clone()).take(10).collect();
    let mut iter = arr.into_iter();
    let taken = iter.next().expect("10 elements were collected");
    drop(iter);
    drop(taken);
    assert_eq!(
        counter.take(),
        10,
        "Dropping a part-consumed owned iterator should drop every element once."
    );
}

#[test]
fn test_zst_support() {
    let mut arr = DynArray::new();
    for _ in 0..20 {
        arr.push(ZeroSizedType);
    }
    assert_eq!(arr.len(), 20);
    assert_eq!(arr[0], ZeroSizedType, "Indexing with no offset should work.");
    assert_eq!(
        arr[19], ZeroSizedType,
        "Indexing with an in-bounds offset should work."
    );

    arr.erase(5);
    arr.swap_erase(0);
    assert_eq!(arr.len(), 18);

    assert_eq!(
        arr.begin().count(),
        18,
        "Should iterate over the right number of ZST instances."
    );
}

#[test]
fn test_capacity_overflow_panics() {
    assert_panics!({
        let mut arr: DynArray<u64> = DynArray::new();
        arr.reserve(isize::MAX as usize + 1);
    });
}

#[cfg(feature = "checked")]
#[test]
fn test_checked_at_aborts() {
    assert_panics!({
        let arr: DynArray<_> = (0..3_u8).collect();
        arr.at(arr.len());
    });

    assert_panics!({
        let mut arr: DynArray<_> = (0..3_u8).collect();
        *arr.at_mut(17);
    });
}

#[cfg(feature = "checked")]
#[test]
fn test_checked_erase_aborts() {
    assert_panics!({
        let mut arr: DynArray<_> = (0..3_u8).collect();
        arr.erase(3);
    });

    assert_panics!({
        let mut arr: DynArray<_> = (0..3_u8).collect();
        arr.swap_erase(5);
    });
}

#[cfg(feature = "checked")]
#[test]
fn test_checked_reserve_aborts() {
    assert_panics!({
        let mut arr: DynArray<_> = (0..8_u8).collect();
        arr.reserve(8);
    });
}

#[cfg(feature = "checked")]
#[test]
fn test_checked_cursor_aborts() {
    assert_panics!({
        let arr: DynArray<_> = (0..3_u8).collect();
        arr.end().get();
    });
}
