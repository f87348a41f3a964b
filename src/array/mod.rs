//! The [`DynArray`] container and its traversal types. [`RawBlock`](raw::RawBlock) holds the
//! untyped allocation; [`DynArray`] layers a live-element count over it.
#![warn(missing_docs)]

pub mod cursor;
pub mod dyn_array;

pub(crate) mod raw;

mod tests;

#[doc(inline)]
pub use cursor::{Cursor, IntoIter};
#[doc(inline)]
pub use dyn_array::DynArray;
