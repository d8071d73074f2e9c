//! Ordered tables of vectors.
//!
//! A [`VectorTable`] is one generation ("layer") of the minimizer, one input
//! table, or one minimal cover. It owns its vectors exclusively; the only
//! cross-table links are the [`LeafId`][crate::types::LeafId] ancestor
//! handles inside the vectors.

use std::ops::{Index, Range};

use log::trace;

use crate::error::Result;
use crate::vector::Vector;

#[derive(Debug, Clone, Default)]
pub struct VectorTable {
    vectors: Vec<Vector>,
}

/// A maximal run of equal-weight entries in a weight-sorted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightBucket {
    pub weight: u8,
    pub range: Range<usize>,
}

impl VectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut vectors = Vec::new();
        vectors.try_reserve(capacity)?;
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.vectors.capacity()
    }

    /// Append a vector. Fails only if the table cannot grow.
    pub fn push(&mut self, vector: Vector) -> Result<()> {
        self.vectors.try_reserve(1)?;
        self.vectors.push(vector);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Vector> {
        self.vectors.pop()
    }

    pub fn last(&self) -> Option<&Vector> {
        self.vectors.last()
    }

    pub fn get(&self, index: usize) -> Option<&Vector> {
        self.vectors.get(index)
    }

    pub fn as_slice(&self) -> &[Vector] {
        &self.vectors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.vectors.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Vector> {
        self.vectors.iter_mut()
    }

    pub fn shrink_to_fit(&mut self) {
        self.vectors.shrink_to_fit();
    }

    /// Order by non-decreasing weight. Ties keep their relative order.
    pub fn sort_by_weight(&mut self) {
        self.vectors.sort_by_key(Vector::weight);
    }

    pub fn is_weight_sorted(&self) -> bool {
        self.vectors.windows(2).all(|w| w[0].weight() <= w[1].weight())
    }

    /// Drop structural duplicates from a weight-sorted table.
    ///
    /// Equal digits imply equal weight, so each entry is only compared with
    /// the kept entries of its own weight run. Returns how many entries were
    /// removed.
    pub fn remove_duplicates(&mut self) -> usize {
        debug_assert!(self.is_weight_sorted(), "remove_duplicates needs a weight-sorted table");

        let before = self.vectors.len();
        let mut i = 1;
        while i < self.vectors.len() {
            let current = &self.vectors[i];
            let duplicate = self.vectors[..i]
                .iter()
                .rev()
                .take_while(|prev| prev.weight() == current.weight())
                .any(|prev| prev.equal(current));
            if duplicate {
                trace!("remove_duplicates: dropping {}", current);
                self.vectors.remove(i);
            } else {
                i += 1;
            }
        }
        before - self.vectors.len()
    }

    /// Split a weight-sorted table into its runs of equal weight.
    pub fn weight_buckets(&self) -> Vec<WeightBucket> {
        let mut buckets: Vec<WeightBucket> = Vec::new();
        for (i, vector) in self.vectors.iter().enumerate() {
            match buckets.last_mut() {
                Some(bucket) if bucket.weight == vector.weight() => bucket.range.end = i + 1,
                _ => buckets.push(WeightBucket {
                    weight: vector.weight(),
                    range: i..i + 1,
                }),
            }
        }
        buckets
    }
}

impl Index<usize> for VectorTable {
    type Output = Vector;

    fn index(&self, index: usize) -> &Self::Output {
        &self.vectors[index]
    }
}

impl<'a> IntoIterator for &'a VectorTable {
    type Item = &'a Vector;
    type IntoIter = std::slice::Iter<'a, Vector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}

impl From<Vec<Vector>> for VectorTable {
    fn from(vectors: Vec<Vector>) -> Self {
        Self { vectors }
    }
}
