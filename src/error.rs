use core::fmt;

use alloc::collections::TryReserveError;

/// The error type for checked [`BlockDeque`](crate::BlockDeque) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An index was not less than the length of the deque.
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the deque at the time of the access.
        len: usize,
    },
    /// A [`Position`](crate::Position) was taken before the deque last reallocated its block
    /// directory.
    StalePosition,
    /// A [`Position`](crate::Position) points neither at a live element nor at the end of the
    /// deque.
    DanglingPosition,
    /// Growing the block directory or acquiring a block failed.
    Alloc(TryReserveError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { index, len } => {
                write!(f, "index (is {}) should be < len (is {})", index, len)
            }
            Error::StalePosition => f.write_str("position predates a directory reallocation"),
            Error::DanglingPosition => f.write_str("position is outside the live range"),
            Error::Alloc(e) => write!(f, "allocation failed: {}", e),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Error::Alloc(e)
    }
}

/// The error returned by [`try_push_back`] and [`try_push_front`].
///
/// Hands the rejected value back to the caller.
///
/// [`try_push_back`]: crate::BlockDeque::try_push_back
/// [`try_push_front`]: crate::BlockDeque::try_push_front
#[derive(Clone, PartialEq, Eq)]
pub struct PushError<T> {
    pub(crate) value: T,
    pub(crate) cause: TryReserveError,
}

impl<T> PushError<T> {
    /// Returns the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// The allocation failure that caused the push to be rejected.
    pub fn cause(&self) -> &TryReserveError {
        &self.cause
    }
}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("cause", &self.cause)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "push failed: {}", self.cause)
    }
}

impl<T> core::error::Error for PushError<T> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl<T> From<PushError<T>> for Error {
    fn from(e: PushError<T>) -> Self {
        Error::Alloc(e.cause)
    }
}
