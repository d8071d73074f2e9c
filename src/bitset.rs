//! Fixed-size bit set for per-pass bookkeeping.
//!
//! A merge pass marks every entry of the previous layer that took part in at
//! least one merge; whatever stays unmarked is carried forward as prime.

use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct BitSet {
    words: Vec<u64>,
    /// Number of addressable bits.
    len: usize,
    /// Number of set bits.
    count: usize,
}

impl BitSet {
    const BITS_PER_WORD: usize = 64;

    /// All-clear set addressing bits `0..len`.
    pub fn new(len: usize) -> Result<Self> {
        let num_words = len.div_ceil(Self::BITS_PER_WORD);
        let mut words = Vec::new();
        words.try_reserve_exact(num_words)?;
        words.resize(num_words, 0);
        Ok(Self { words, len, count: 0 })
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, u64) {
        assert!(index < self.len, "Bit {} out of range 0..{}", index, self.len);
        (index / Self::BITS_PER_WORD, 1u64 << (index % Self::BITS_PER_WORD))
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let (word, mask) = self.locate(index);
        self.words[word] & mask != 0
    }

    /// Set a bit. Returns true if it was clear before.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, mask) = self.locate(index);
        let was_clear = self.words[word] & mask == 0;
        if was_clear {
            self.words[word] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Indices in `0..len` whose bit is clear, ascending.
    pub fn iter_clear(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| !self.contains(i))
    }
}
