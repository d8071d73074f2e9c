//! Bit-packed ternary argument vectors.
//!
//! A [`Vector`] is one row of the truth table (or an implicant derived from
//! rows by merging). Its digits live in a single `u64`, two bits per position:
//!
//! ```text
//! bit:    63 62 | 61 60 | ... | 3 2 | 1 0
//! digit:    31  |   30  | ... |  1  |  0
//! ```
//!
//! Digit 0 is the *rightmost* character of the textual vector. Unused high
//! positions hold [`Digit::Pad`] (`00`), so the declared length is recovered
//! from the highest non-zero digit code. Whenever two vectors of different
//! length meet, padding reads as [`Digit::Zero`].
//!
//! Besides its digits a vector carries its weight (number of `1` digits), its
//! [`Outcome`], and the set of original `one` rows it subsumes (its
//! ancestors), stored as [`LeafId`] handles into the run's leaf layer.

use std::fmt;

use crate::error::{ParseError, Result};
use crate::types::{Digit, LeafId, Mode, Outcome};

/// Low bit of every 2-bit digit.
const LO: u64 = 0x5555_5555_5555_5555;

#[derive(Debug, Clone)]
pub struct Vector {
    bits: u64,
    weight: u8,
    outcome: Outcome,
    /// Set for rows parsed from input, `None` for merge products.
    origin: Option<LeafId>,
    /// Sorted, without duplicates. Only `one`-outcome leaves ever appear here.
    ancestors: Vec<LeafId>,
}

impl Vector {
    /// Maximum number of digits in a vector.
    pub const MAX_LEN: usize = 32;

    /// An empty (all padding) vector with the given outcome.
    pub fn new(outcome: Outcome) -> Self {
        Self {
            bits: 0,
            weight: 0,
            outcome,
            origin: None,
            ancestors: Vec::new(),
        }
    }

    /// Parse one truth-table entry.
    ///
    /// `text` is the argument vector over `{0, 1, -}`, at most
    /// [`MAX_LEN`](Self::MAX_LEN) characters. `outcome` is the value column,
    /// translated through `mode`; a value meaning a definite zero is rejected.
    pub fn parse(text: &str, outcome: char, mode: Mode) -> std::result::Result<Self, ParseError> {
        let len = text.chars().count();
        if len == 0 {
            return Err(ParseError::EmptyVector);
        }
        if len > Self::MAX_LEN {
            return Err(ParseError::TooLong { len });
        }

        let mut digits = [Digit::Pad; Self::MAX_LEN];
        for (position, ch) in text.chars().enumerate() {
            digits[position] = Digit::from_char(ch).ok_or(ParseError::InvalidDigit { ch, position })?;
        }

        let mut vector = Self::new(mode.parse_outcome(outcome)?);
        // Stored reversed: the last character becomes digit 0.
        for (i, &digit) in digits[..len].iter().rev().enumerate() {
            vector.set_digit(i, digit);
        }
        Ok(vector)
    }

    /// Build a vector straight from its packed digits.
    pub fn from_bits(bits: u64, outcome: Outcome) -> Self {
        Self {
            bits,
            weight: count_ones(bits),
            outcome,
            origin: None,
            ancestors: Vec::new(),
        }
    }

    /// Packed digit word. Also the key a minterm is tracked under during
    /// the cover search.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of `1` digits.
    pub fn weight(&self) -> u8 {
        self.weight
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn origin(&self) -> Option<LeafId> {
        self.origin
    }

    pub fn ancestors(&self) -> &[LeafId] {
        &self.ancestors
    }

    pub(crate) fn set_origin(&mut self, id: LeafId) {
        self.origin = Some(id);
    }

    pub fn digit(&self, index: usize) -> Digit {
        assert!(index < Self::MAX_LEN, "Digit index {} out of range", index);
        Digit::from_bits(self.bits >> (index as u32 * Digit::BITS))
    }

    /// Overwrite one digit, keeping the weight in sync.
    pub fn set_digit(&mut self, index: usize, digit: Digit) {
        assert!(index < Self::MAX_LEN, "Digit index {} out of range", index);
        let shift = index as u32 * Digit::BITS;
        let prev = self.digit(index);
        if digit == Digit::One && prev != Digit::One {
            self.weight += 1;
        } else if digit != Digit::One && prev == Digit::One {
            self.weight -= 1;
        }
        self.bits = (self.bits & !(Digit::MASK << shift)) | (digit.bits() << shift);
    }

    /// Declared length: index of the highest non-padding digit plus one.
    pub fn len(&self) -> usize {
        packed_len(self.bits)
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate over the digits from index 0 up to the declared length.
    pub fn digits(&self) -> impl Iterator<Item = Digit> + '_ {
        (0..self.len()).map(move |i| self.digit(i))
    }

    /// Record `leaf` as covered by this vector.
    ///
    /// Callers only pass leaves whose own outcome is `one`.
    pub(crate) fn add_ancestor(&mut self, leaf: LeafId) -> Result<()> {
        if let Err(pos) = self.ancestors.binary_search(&leaf) {
            self.ancestors.try_reserve(1)?;
            self.ancestors.insert(pos, leaf);
        }
        Ok(())
    }

    /// Digit-wise equality with padding read as zero.
    ///
    /// Positions past both declared lengths are padding on both sides, so
    /// only the common declared range and the zero tail of the longer
    /// vector take part in the comparison.
    pub fn equal(&self, other: &Vector) -> bool {
        let len = self.len().max(other.len());
        unpad(self.bits, len) == unpad(other.bits, len)
    }

    /// Whether the two vectors differ in at most one position.
    ///
    /// Outcomes never block a merge. [`Outcome`] has no zero variant, so a
    /// `one` can never meet a definite zero here.
    pub fn can_merge(&self, other: &Vector) -> bool {
        differing_positions(self, other).count_ones() <= 1
    }

    /// Combine two vectors at distance at most one.
    ///
    /// Agreeing positions keep their digit, the differing one becomes
    /// don't-care. The result is don't-care only if both inputs are, and its
    /// ancestors are the union of the parents' covered `one` leaves (a parent
    /// without ancestors contributes itself, if it is a `one` leaf).
    ///
    /// Returns `Ok(None)` if the vectors are not mergeable.
    pub fn merge(&self, other: &Vector) -> Result<Option<Vector>> {
        if !self.can_merge(other) {
            return Ok(None);
        }

        let len = self.len().max(other.len());
        let diff = differing_positions(self, other);
        let bits = unpad(self.bits, len) | diff | (diff << 1);

        let outcome = if self.outcome.is_dont_care() && other.outcome.is_dont_care() {
            Outcome::DontCare
        } else {
            Outcome::One
        };

        let mut merged = Vector::from_bits(bits, outcome);
        merged
            .ancestors
            .try_reserve(self.ancestors.len().max(1) + other.ancestors.len().max(1))?;
        for parent in [self, other] {
            match parent.covered_self() {
                Some(leaf) => merged.ancestors.push(leaf),
                None => merged.ancestors.extend_from_slice(&parent.ancestors),
            }
        }
        merged.ancestors.sort_unstable();
        merged.ancestors.dedup();
        merged.ancestors.shrink_to_fit();

        Ok(Some(merged))
    }

    /// A parent with no ancestors stands for itself if it is a `one` leaf.
    fn covered_self(&self) -> Option<LeafId> {
        if self.ancestors.is_empty() && self.outcome.is_one() {
            self.origin
        } else {
            None
        }
    }

    /// Prepare a copy for the next layer: an input row that never merged
    /// and has a `one` outcome becomes its own single ancestor.
    pub(crate) fn carry_forward(&self) -> Result<Vector> {
        let mut carried = self.clone();
        if let Some(leaf) = self.covered_self() {
            carried.add_ancestor(leaf)?;
        }
        Ok(carried)
    }

    /// Digit text, most significant (index `len - 1`) first.
    pub fn to_text(&self) -> String {
        let len = self.len();
        (0..len)
            .rev()
            .map(|i| self.digit(i).to_char().unwrap_or('0'))
            .collect()
    }

    /// The value-column character in the given mode.
    pub fn outcome_char(&self, mode: Mode) -> char {
        self.outcome.to_char(mode)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_text())
    }
}

fn packed_len(bits: u64) -> usize {
    (64 - bits.leading_zeros() as usize).div_ceil(Digit::BITS as usize)
}

fn len_mask(len: usize) -> u64 {
    if len >= Vector::MAX_LEN {
        u64::MAX
    } else {
        (1u64 << (len as u32 * Digit::BITS)) - 1
    }
}

/// Replace every padding digit below `len` with an explicit zero.
fn unpad(bits: u64, len: usize) -> u64 {
    let occupied = (bits | (bits >> 1)) & LO;
    bits | (!occupied & LO & len_mask(len))
}

/// Low-bit mask of the positions where `a` and `b` differ (padding as zero).
fn differing_positions(a: &Vector, b: &Vector) -> u64 {
    let len = a.len().max(b.len());
    let x = unpad(a.bits, len) ^ unpad(b.bits, len);
    (x | (x >> 1)) & LO
}

fn count_ones(bits: u64) -> u8 {
    // A `1` digit is `10`: high bit set, low bit clear.
    ((bits >> 1) & !bits & LO).count_ones() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str, outcome: char) -> Vector {
        Vector::parse(text, outcome, Mode::One).unwrap()
    }

    fn leaf(text: &str, outcome: char, id: usize) -> Vector {
        let mut vector = v(text, outcome);
        vector.set_origin(LeafId::new(id));
        vector
    }

    #[test]
    fn test_parse_round_trip() {
        for text in ["0", "1", "-", "0101", "--10", "000", "1-0-1-0-1-0-1-0-1-0-1-0-1-0-1-0-"] {
            let vector = v(text, '1');
            assert_eq!(vector.to_text(), text);
            assert_eq!(vector.len(), text.len());
        }
    }

    #[test]
    fn test_parse_reverses_digits() {
        let vector = v("110", '1');
        assert_eq!(vector.digit(0), Digit::Zero);
        assert_eq!(vector.digit(1), Digit::One);
        assert_eq!(vector.digit(2), Digit::One);
        assert_eq!(vector.digit(3), Digit::Pad);
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(Vector::parse("", '1', Mode::One).unwrap_err(), ParseError::EmptyVector);
        assert_eq!(
            Vector::parse("01x", '1', Mode::One).unwrap_err(),
            ParseError::InvalidDigit { ch: 'x', position: 2 }
        );
        assert_eq!(
            Vector::parse(&"0".repeat(33), '1', Mode::One).unwrap_err(),
            ParseError::TooLong { len: 33 }
        );
        assert!(Vector::parse(&"0".repeat(32), '1', Mode::One).is_ok());
        assert_eq!(Vector::parse("01", '0', Mode::One).unwrap_err(), ParseError::ZeroOutcome);
        assert_eq!(
            Vector::parse("01", 'q', Mode::One).unwrap_err(),
            ParseError::InvalidOutcome { ch: 'q' }
        );
    }

    #[test]
    fn test_parse_zero_mode() {
        let vector = Vector::parse("01", '0', Mode::Zero).unwrap();
        assert_eq!(vector.outcome(), Outcome::One);
        assert_eq!(vector.to_text(), "01");
        assert_eq!(vector.outcome_char(Mode::Zero), '0');
        assert_eq!(Vector::parse("01", '1', Mode::Zero).unwrap_err(), ParseError::ZeroOutcome);
    }

    #[test]
    fn test_weight_tracks_writes() {
        let mut vector = Vector::new(Outcome::One);
        let writes = [
            (0, Digit::One),
            (3, Digit::One),
            (0, Digit::DontCare),
            (5, Digit::One),
            (3, Digit::One),
            (5, Digit::Zero),
            (31, Digit::One),
        ];
        for (i, d) in writes {
            vector.set_digit(i, d);
            let scanned = (0..Vector::MAX_LEN)
                .filter(|&i| vector.digit(i) == Digit::One)
                .count();
            assert_eq!(vector.weight() as usize, scanned);
        }
        assert_eq!(vector.weight(), 2);
    }

    #[test]
    fn test_full_width_vector() {
        let text = "1".repeat(32);
        let vector = v(&text, '1');
        assert_eq!(vector.len(), 32);
        assert_eq!(vector.weight(), 32);
        assert_eq!(vector.to_text(), text);
    }

    #[test]
    fn test_equal_treats_padding_as_zero() {
        assert!(v("01", '1').equal(&v("1", '1')));
        assert!(v("1", '1').equal(&v("001", '-')));
        assert!(!v("11", '1').equal(&v("1", '1')));
        assert!(v("0-", '1').equal(&v("-", '1')));
        assert!(!v("1-", '1').equal(&v("-", '1')));
        assert!(v("1-0", '1').equal(&v("1-0", '1')));
    }

    #[test]
    fn test_can_merge() {
        assert!(v("00", '1').can_merge(&v("01", '1')));
        assert!(v("0-", '1').can_merge(&v("1-", '1')));
        assert!(!v("00", '1').can_merge(&v("11", '1')));
        assert!(!v("0-", '1').can_merge(&v("-0", '1')));
        // Padding reads as zero.
        assert!(v("1", '1').can_merge(&v("11", '1')));
        assert!(!v("1", '1').can_merge(&v("110", '1')));
        assert!(v("01", '1').can_merge(&v("1", '1')));
    }

    #[test]
    fn test_outcomes_never_block_merge() {
        for (a, b) in [('1', '1'), ('1', '-'), ('-', '1'), ('-', '-')] {
            let x = v("10", a);
            let y = v("11", b);
            assert!(x.can_merge(&y));
            assert!(x.merge(&y).unwrap().is_some());
        }
    }

    #[test]
    fn test_merge_digits() {
        let a = leaf("010", '1', 0);
        let b = leaf("011", '1', 1);
        let m = a.merge(&b).unwrap().unwrap();
        assert_eq!(m.to_text(), "01-");
        assert_eq!(m.weight(), 1);
        assert_eq!(m.outcome(), Outcome::One);
        assert_eq!(m.ancestors(), &[LeafId::new(0), LeafId::new(1)]);
        assert_eq!(m.origin(), None);

        assert!(a.merge(&leaf("101", '1', 2)).unwrap().is_none());
    }

    #[test]
    fn test_merge_pads_to_longer() {
        let m = leaf("1", '1', 0).merge(&leaf("11", '1', 1)).unwrap().unwrap();
        assert_eq!(m.to_text(), "-1");
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_merge_identical() {
        let m = leaf("10", '1', 0).merge(&leaf("10", '1', 1)).unwrap().unwrap();
        assert_eq!(m.to_text(), "10");
    }

    #[test]
    fn test_merge_outcomes_and_dont_care_leaves() {
        let one = leaf("00", '1', 0);
        let dc = leaf("01", '-', 1);
        let dc2 = leaf("11", '-', 2);

        let m = one.merge(&dc).unwrap().unwrap();
        assert_eq!(m.outcome(), Outcome::One);
        assert_eq!(m.ancestors(), &[LeafId::new(0)]);

        let m = dc.merge(&dc2).unwrap().unwrap();
        assert_eq!(m.outcome(), Outcome::DontCare);
        assert!(m.ancestors().is_empty());
    }

    #[test]
    fn test_ancestor_flattening_is_order_independent() {
        let leaves: Vec<Vector> = ["00", "01", "10", "11"]
            .iter()
            .enumerate()
            .map(|(i, t)| leaf(t, '1', i))
            .collect();
        let all: Vec<LeafId> = (0..4).map(LeafId::new).collect();

        let x = leaves[0].merge(&leaves[1]).unwrap().unwrap(); // 0-
        let y = leaves[2].merge(&leaves[3]).unwrap().unwrap(); // 1-
        let first = x.merge(&y).unwrap().unwrap();

        let x = leaves[3].merge(&leaves[1]).unwrap().unwrap(); // -1
        let y = leaves[2].merge(&leaves[0]).unwrap().unwrap(); // -0
        let second = y.merge(&x).unwrap().unwrap();

        assert_eq!(first.to_text(), "--");
        assert!(first.equal(&second));
        assert_eq!(first.ancestors(), all.as_slice());
        assert_eq!(second.ancestors(), all.as_slice());
    }

    #[test]
    fn test_carry_forward() {
        let carried = leaf("10", '1', 4).carry_forward().unwrap();
        assert_eq!(carried.ancestors(), &[LeafId::new(4)]);
        let carried = leaf("10", '-', 5).carry_forward().unwrap();
        assert!(carried.ancestors().is_empty());
        // Already carried once: nothing to add.
        let again = carried.carry_forward().unwrap();
        assert!(again.ancestors().is_empty());
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(format!("{:>5}", v("1-", '1')), "   1-");
    }
}
