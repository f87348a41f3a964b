//! Error types for fallible array operations. Each condition is its own struct implementing
//! [`Error`](std::error::Error); operations that can fail in more than one way return an enum
//! over them, dispatched statically.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

/// An index was at or past the number of live elements. Returned by
/// [`try_at`](crate::DynArray::try_at) and [`try_at_mut`](crate::DynArray::try_at_mut).
#[derive(Debug, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    /// The offending index.
    pub index: usize,
    /// The number of live elements at the time of the access.
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index {} out of bounds for array with {} elements!",
            self.index, self.len
        )
    }
}

impl Error for IndexOutOfBounds {}

/// A requested capacity's memory layout would exceed [`isize::MAX`] bytes.
#[derive(Debug, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

/// A reserve requested no more slots than are already allocated. Reservations must strictly
/// grow the backing block.
#[derive(Debug, PartialEq, Eq)]
pub struct NonGrowingReserve {
    /// The requested capacity.
    pub requested: usize,
    /// The capacity already allocated.
    pub cap: usize,
}

impl Display for NonGrowingReserve {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reserve of {} slots does not grow current capacity {}!",
            self.requested, self.cap
        )
    }
}

impl Error for NonGrowingReserve {}

/// The ways [`try_reserve`](crate::DynArray::try_reserve) can fail.
#[derive(Debug, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
pub enum ReserveError {
    /// The request would not grow the allocation.
    NonGrowing(NonGrowingReserve),
    /// The request's layout is unrepresentable.
    CapacityOverflow(CapacityOverflow),
}
