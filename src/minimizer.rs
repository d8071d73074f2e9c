//! The minimization engine.
//!
//! A [`Minimizer`] owns a stack of [`VectorTable`] layers. Layer 0 holds the
//! input rows (the leaves) sorted by weight; every other layer is derived from
//! the one below it by a *merge pass*:
//!
//! 1. split the previous layer into runs of equal weight;
//! 2. for every pair of runs with weights `w` and `w + 1`, try to merge every
//!    entry of the first with every entry of the second;
//! 3. carry every entry that took part in no merge forward unchanged;
//! 4. sort the new layer by weight, drop duplicates and shrink it.
//!
//! Passes repeat until one performs no merge. That last layer is the table of
//! prime implicants, and the cover search (see [`cover`][crate::cover]) picks
//! the minimum subsets of it that cover every `one` row.
//!
//! ```text
//! Building --(pass without merges)--> Stable --cover()--> Covering --> Done
//! ```
//!
//! Leaves are never dropped or reordered once the engine is built, so the
//! [`LeafId`] handles stored as ancestors stay valid for the whole run.
//!
//! # Example
//!
//! ```rust
//! use qmc_rs::minimizer::Minimizer;
//! use qmc_rs::table::VectorTable;
//! use qmc_rs::types::Mode;
//! use qmc_rs::vector::Vector;
//!
//! let mut input = VectorTable::new();
//! for row in ["00", "01", "11"] {
//!     input.push(Vector::parse(row, '1', Mode::One).unwrap()).unwrap();
//! }
//!
//! let mut minimizer = Minimizer::new(input).unwrap();
//! let primes = minimizer.reduce().unwrap();
//! assert_eq!(primes.len(), 2); // 0- and -1
//!
//! let covers = minimizer.cover().unwrap();
//! assert_eq!(covers.len(), 1);
//! assert_eq!(covers[0].len(), 2);
//! ```

use std::fmt;

use log::{debug, trace};

use crate::bitset::BitSet;
use crate::config::MinimizerConfig;
use crate::error::{Error, Result};
use crate::table::VectorTable;
use crate::types::LeafId;
use crate::vector::Vector;

/// Where the engine is in its run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// Merge passes still make progress.
    Building,
    /// The last pass merged nothing; the top layer holds the prime implicants.
    Stable,
    /// The cover search is running.
    Covering,
    /// Covers are available.
    Done,
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinimizerStats {
    /// Merge passes performed, including the final one without merges.
    pub passes: usize,
    /// Successful pairwise merges over all passes.
    pub merges: usize,
    /// Duplicates dropped over all passes.
    pub duplicates: usize,
    /// Candidate combinations visited by the cover search.
    pub combinations: u64,
    /// Times the cover search found a strictly smaller cover.
    pub improvements: usize,
}

impl fmt::Display for MinimizerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "passes={} merges={} duplicates={} combinations={} improvements={}",
            self.passes, self.merges, self.duplicates, self.combinations, self.improvements
        )
    }
}

pub struct Minimizer {
    pub(crate) config: MinimizerConfig,
    /// `layers[0]` is the leaf layer; the top is the current layer.
    pub(crate) layers: Vec<VectorTable>,
    pub(crate) covers: Vec<VectorTable>,
    pub(crate) phase: Phase,
    pub(crate) stats: MinimizerStats,
}

impl Minimizer {
    /// Take ownership of the input table with the default configuration.
    pub fn new(input: VectorTable) -> Result<Self> {
        Self::with_config(input, MinimizerConfig::default())
    }

    pub fn with_config(mut input: VectorTable, config: MinimizerConfig) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }

        input.sort_by_weight();
        for (i, leaf) in input.iter_mut().enumerate() {
            leaf.set_origin(LeafId::new(i));
        }
        debug!("minimizer: {} leaves, mode {}", input.len(), config.mode);

        let mut layers = Vec::new();
        layers.try_reserve(1)?;
        layers.push(input);

        Ok(Self {
            config,
            layers,
            covers: Vec::new(),
            phase: Phase::Building,
            stats: MinimizerStats::default(),
        })
    }

    /// Minimize `input` completely: merge to a fixpoint, then search covers.
    pub fn run(input: VectorTable, config: MinimizerConfig) -> Result<Self> {
        let mut minimizer = Self::with_config(input, config)?;
        minimizer.reduce()?;
        minimizer.cover()?;
        debug!("minimizer: done ({})", minimizer.stats);
        Ok(minimizer)
    }

    pub fn config(&self) -> &MinimizerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> &MinimizerStats {
        &self.stats
    }

    /// All merge layers, leaf layer first.
    pub fn layers(&self) -> &[VectorTable] {
        &self.layers
    }

    /// The top of the layer stack.
    pub fn current_layer(&self) -> &VectorTable {
        // `with_config` always pushes the leaf layer and layers are never popped.
        &self.layers[self.layers.len() - 1]
    }

    /// The input rows, sorted by weight. [`LeafId`]s index into this table.
    pub fn leaves(&self) -> &VectorTable {
        &self.layers[0]
    }

    pub fn leaf(&self, id: LeafId) -> &Vector {
        &self.layers[0][id.index()]
    }

    /// The original `one` rows a vector covers.
    pub fn covered_leaves<'a>(&'a self, vector: &'a Vector) -> impl Iterator<Item = &'a Vector> + 'a {
        vector.ancestors().iter().map(move |&id| self.leaf(id))
    }

    /// The prime-implicant layer, once the merge phase is stable.
    pub fn prime_implicants(&self) -> Option<&VectorTable> {
        match self.phase {
            Phase::Building => None,
            _ => Some(self.current_layer()),
        }
    }

    /// The minimum covers found by [`cover`](Self::cover).
    pub fn covers(&self) -> &[VectorTable] {
        &self.covers
    }

    pub fn into_covers(self) -> Vec<VectorTable> {
        self.covers
    }

    /// Run a single merge pass on the top layer and push its result.
    ///
    /// Returns whether the pass merged anything. A pass without merges moves
    /// the engine to [`Phase::Stable`]. On error the partial layer is dropped
    /// and the stack is left as it was.
    pub fn merge_pass(&mut self) -> Result<bool> {
        if self.phase != Phase::Building {
            return Err(Error::IllegalData("merge pass after the merge phase finished"));
        }

        let (next, outcome) = merge_layer(self.current_layer())?;
        self.layers.try_reserve(1)?;
        self.layers.push(next);

        self.stats.passes += 1;
        self.stats.merges += outcome.merges;
        self.stats.duplicates += outcome.duplicates;
        debug!(
            "merge pass {}: {} merges, {} carried, {} duplicates, {} entries",
            self.stats.passes,
            outcome.merges,
            outcome.carried,
            outcome.duplicates,
            self.current_layer().len()
        );

        let progress = outcome.merges > 0;
        if !progress {
            self.phase = Phase::Stable;
        }
        Ok(progress)
    }

    /// Repeat merge passes until one makes no progress and return the
    /// prime-implicant layer.
    pub fn reduce(&mut self) -> Result<&VectorTable> {
        if self.phase == Phase::Building {
            while self.merge_pass()? {}
        }
        Ok(self.current_layer())
    }
}

impl fmt::Debug for Minimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Minimizer")
            .field("phase", &self.phase)
            .field("leaves", &self.leaves().len())
            .field("layers", &self.layers.len())
            .field("covers", &self.covers.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[derive(Debug, Default)]
struct PassOutcome {
    merges: usize,
    carried: usize,
    duplicates: usize,
}

/// Build the layer that follows `prev`, which must be weight-sorted.
fn merge_layer(prev: &VectorTable) -> Result<(VectorTable, PassOutcome)> {
    let mut next = VectorTable::new();
    let mut consumed = BitSet::new(prev.len())?;
    let mut outcome = PassOutcome::default();

    for pair in prev.weight_buckets().windows(2) {
        let (low, high) = (&pair[0], &pair[1]);
        if low.weight + 1 != high.weight {
            continue;
        }
        for j in low.range.clone() {
            for k in high.range.clone() {
                if let Some(merged) = prev[j].merge(&prev[k])? {
                    trace!("merge: {} + {} -> {}", prev[j], prev[k], merged);
                    next.push(merged)?;
                    consumed.insert(j);
                    consumed.insert(k);
                    outcome.merges += 1;
                }
            }
        }
    }

    outcome.carried = prev.len() - consumed.count();
    for i in consumed.iter_clear() {
        next.push(prev[i].carry_forward()?)?;
    }

    next.sort_by_weight();
    outcome.duplicates = next.remove_duplicates();
    next.shrink_to_fit();

    Ok((next, outcome))
}
