//! A resizable, contiguous, generic sequence with manual control over allocation, element
//! construction/destruction, and growth.
//!
//! The single container here, [`DynArray<T>`](array::DynArray), exists for code that wants
//! explicit control over when memory is acquired, when elements are constructed and when their
//! destructors run, rather than reaching for [`Vec`]. The backing block is raw storage sized in
//! units of `T`; only the prefix `[0, len)` holds live values, and the container tracks that
//! boundary itself.
//!
//! # Ownership
//! A `DynArray` owns its block uniquely. The container deliberately does not implement [`Clone`]:
//! ownership of the backing block is singular and is never duplicated implicitly. Elements may
//! still be copied or moved into and out of the array through
//! [`push`](array::DynArray::push), [`emplace_with`](array::DynArray::emplace_with) and
//! [`erase`](array::DynArray::erase).
//!
//! # Checked and unchecked configurations
//! The crate has exactly one configuration switch: the `checked` cargo feature, which is enabled
//! by default. With it on, [`at`](array::DynArray::at), [`reserve`](array::DynArray::reserve),
//! [`erase`](array::DynArray::erase) and friends assert their preconditions and panic on
//! violation: a fail-fast diagnostic, not a recoverable error. Building with
//! `default-features = false` compiles those assertions out entirely: precondition violations
//! become undefined behavior, trading safety for an access path with no runtime branch. Methods
//! affected by the switch say so in their docs.
//!
//! For callers that want typed errors instead of assertions, `try_` variants
//! ([`try_at`](array::DynArray::try_at), [`try_reserve`](array::DynArray::try_reserve)) surface
//! the same conditions as [`Result`]s.
//!
//! # Invalidation
//! Any operation that reallocates (growth, [`reserve`](array::DynArray::reserve)) or mutates the
//! length invalidates previously obtained references and cursors. The borrow checker enforces
//! this; it is stated here because it is the API contract, not an artifact.
//!
//! # Error Handling
//! Errors are strongly typed, using enums for static dispatch rather than dynamic, with structs
//! that implement [`Error`](std::error::Error). Allocation failure is not handled specially: it
//! propagates through [`handle_alloc_error`](std::alloc::handle_alloc_error) like any direct
//! allocation request.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod array;
pub mod error;

pub(crate) mod util;

#[doc(inline)]
pub use array::DynArray;
