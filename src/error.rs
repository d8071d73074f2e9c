//! Error types for parsing and minimization.

use std::collections::TryReserveError;
use std::fmt;
use std::io;

/// Why a single truth-table entry was rejected.
///
/// Parse errors are local to one entry: the input layer reports the line and
/// moves on to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The argument vector has no digits.
    EmptyVector,
    /// The argument vector is longer than [`Vector::MAX_LEN`][crate::vector::Vector::MAX_LEN].
    TooLong { len: usize },
    /// A character outside `{0, 1, -}` in the argument vector.
    InvalidDigit { ch: char, position: usize },
    /// A character outside `{0, 1, -}` in the value column.
    InvalidOutcome { ch: char },
    /// The value maps to a definite zero, which is never stored.
    ZeroOutcome,
    /// The line has a vector but no value column.
    MissingOutcome,
    /// The line does not have the `<vector> <value>` shape.
    MalformedLine,
    /// A `mode` directive after the first entry.
    MisplacedMode,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyVector => write!(f, "argument vector is empty"),
            ParseError::TooLong { len } => write!(
                f,
                "argument vector has {} digits (at most {} allowed)",
                len,
                crate::vector::Vector::MAX_LEN
            ),
            ParseError::InvalidDigit { ch, position } => {
                write!(f, "invalid digit {:?} at position {}", ch, position)
            }
            ParseError::InvalidOutcome { ch } => write!(f, "invalid value {:?}", ch),
            ParseError::ZeroOutcome => write!(f, "rows with a zero value are not stored"),
            ParseError::MissingOutcome => write!(f, "missing value column"),
            ParseError::MalformedLine => write!(f, "expected `<vector> <value>`"),
            ParseError::MisplacedMode => {
                write!(f, "`mode` is only allowed before the first entry")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors surfaced by the minimizer.
#[derive(Debug)]
pub enum Error {
    /// A single entry could not be parsed.
    Parse(ParseError),
    /// Growing a table, an ancestor list, or the counting index failed.
    Allocation(TryReserveError),
    /// The engine was handed no entries at all.
    EmptyInput,
    /// A phase was requested without the layer it needs.
    IllegalData(&'static str),
    /// [`CountingIndex::collect_slots`][crate::index::CountingIndex::collect_slots]
    /// was given a buffer shorter than the number of entries.
    BufferTooSmall { needed: usize, got: usize },
    /// Reading the input stream failed.
    Io(io::Error),
}

impl Error {
    /// True for failures caused by the input rather than by resources.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::EmptyInput | Error::IllegalData(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Allocation(e) => write!(f, "Allocation failure: {}", e),
            Error::EmptyInput => write!(f, "Illegal data: no entries"),
            Error::IllegalData(what) => write!(f, "Illegal data: {}", what),
            Error::BufferTooSmall { needed, got } => {
                write!(f, "Buffer too small: need {} slots, got {}", needed, got)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Allocation(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Error::Allocation(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
