//! Small value types shared by the whole minimizer.
//!
//! [`Digit`] is one packed ternary position, [`Outcome`] is the value a stored
//! truth-table row maps to, [`Mode`] is the polarity switch applied to the
//! outcome column, and [`LeafId`] names an original input row.
use std::fmt;

use crate::error::ParseError;

/// A single ternary position of an argument vector.
///
/// The discriminants are the 2-bit codes used by the packed representation.
/// `Pad` is the all-zero code, so an unused tail of the packed word reads as
/// padding and the declared length can be recovered from the bit pattern.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Digit {
    /// Beyond the declared length. Compares and merges as [`Digit::Zero`].
    Pad = 0b00,
    Zero = 0b01,
    One = 0b10,
    DontCare = 0b11,
}

impl Digit {
    /// Width of one digit in the packed word.
    pub const BITS: u32 = 2;
    pub const MASK: u64 = 0b11;

    pub const fn from_bits(bits: u64) -> Self {
        match bits & Self::MASK {
            0b00 => Digit::Pad,
            0b01 => Digit::Zero,
            0b10 => Digit::One,
            _ => Digit::DontCare,
        }
    }

    pub const fn bits(self) -> u64 {
        self as u64
    }

    /// Parse an argument-vector character. Argument digits are never
    /// affected by the [`Mode`].
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(Digit::Zero),
            '1' => Some(Digit::One),
            '-' => Some(Digit::DontCare),
            _ => None,
        }
    }

    /// The textual form, or `None` for padding.
    pub fn to_char(self) -> Option<char> {
        match self {
            Digit::Pad => None,
            Digit::Zero => Some('0'),
            Digit::One => Some('1'),
            Digit::DontCare => Some('-'),
        }
    }

    /// Padding is read as zero whenever two vectors are compared.
    pub fn unpadded(self) -> Self {
        match self {
            Digit::Pad => Digit::Zero,
            d => d,
        }
    }
}

/// The value column of a stored row.
///
/// There is no `Zero` outcome: rows whose value is a definite zero contribute
/// nothing to a sum-of-products and are rejected while parsing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    One,
    DontCare,
}

impl Outcome {
    pub fn is_one(self) -> bool {
        self == Outcome::One
    }

    pub fn is_dont_care(self) -> bool {
        self == Outcome::DontCare
    }

    /// Render the outcome the way it was written in the given mode.
    pub fn to_char(self, mode: Mode) -> char {
        match (self, mode) {
            (Outcome::One, Mode::One) => '1',
            (Outcome::One, Mode::Zero) => '0',
            (Outcome::DontCare, _) => '-',
        }
    }
}

/// Polarity of the outcome column.
///
/// In [`Mode::Zero`] the meaning of `0` and `1` in the value column is
/// swapped, which minimizes the complement of the tabulated function.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mode {
    #[default]
    One,
    Zero,
}

impl Mode {
    /// Interpret a `mode <c>` directive: `'0'` selects zero-mode, anything
    /// else selects the default one-mode.
    pub fn from_directive(ch: char) -> Self {
        if ch == '0' {
            Mode::Zero
        } else {
            Mode::One
        }
    }

    /// Apply the polarity to a value-column digit.
    pub fn translate(self, digit: Digit) -> Digit {
        match (self, digit) {
            (Mode::Zero, Digit::Zero) => Digit::One,
            (Mode::Zero, Digit::One) => Digit::Zero,
            (_, d) => d,
        }
    }

    /// Parse a value-column character into a storable [`Outcome`].
    pub fn parse_outcome(self, ch: char) -> Result<Outcome, ParseError> {
        let digit = Digit::from_char(ch).ok_or(ParseError::InvalidOutcome { ch })?;
        match self.translate(digit) {
            Digit::One => Ok(Outcome::One),
            Digit::DontCare => Ok(Outcome::DontCare),
            _ => Err(ParseError::ZeroOutcome),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::One => write!(f, "one"),
            Mode::Zero => write!(f, "zero"),
        }
    }
}

/// Index of an original input row in the leaf layer of a run.
///
/// Leaf ids stay valid for the whole run: the leaf layer is never mutated
/// once the engine has been built.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LeafId(u32);

impl LeafId {
    pub fn new(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "Leaf index {} overflows u32", index);
        LeafId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<LeafId> for usize {
    fn from(id: LeafId) -> Self {
        id.index()
    }
}
