//! Minimum-cover search over the prime implicants.
//!
//! Only implicants with outcome `one` are candidates; don't-care implicants
//! cover no required row. The *universe* is the set of distinct digit words
//! of all rows the candidates cover. Each universe key gets a counter in a
//! [`CountingIndex`] holding how many selected candidates cover it.
//!
//! The search walks strictly increasing index combinations depth-first. When
//! a candidate is selected its rows are incremented, and the combination is a
//! cover iff no counter is zero. The best size found so far bounds the depth:
//!
//! - a strictly smaller cover drops every recorded cover and lowers the bound;
//! - a cover at the bound is recorded next to the others;
//! - no combination of the bound's size or larger is ever extended.
//!
//! Covers are recorded in the order the walk meets them.

use log::debug;

use crate::error::{Error, Result};
use crate::index::{CountingIndex, Slot};
use crate::minimizer::{Minimizer, Phase};
use crate::table::VectorTable;
use crate::vector::Vector;

impl Minimizer {
    /// Search all minimum covers of the prime-implicant layer.
    ///
    /// Requires a stable merge phase (see [`reduce`](Minimizer::reduce)).
    /// Calling it again after it finished returns the same covers.
    pub fn cover(&mut self) -> Result<&[VectorTable]> {
        match self.phase {
            Phase::Building => {
                return Err(Error::IllegalData("cover search before the merge phase is stable"))
            }
            Phase::Done => return Ok(&self.covers),
            Phase::Stable | Phase::Covering => {}
        }
        self.phase = Phase::Covering;

        let primes = self.current_layer();
        let candidates: Vec<&Vector> = primes.iter().filter(|p| p.outcome().is_one()).collect();
        debug!(
            "cover: {} candidates out of {} prime implicants",
            candidates.len(),
            primes.len()
        );

        let (covers, combinations, improvements) = if candidates.len() < 2 {
            let mut cover = VectorTable::with_capacity(candidates.len())?;
            for candidate in candidates {
                cover.push(candidate.clone())?;
            }
            (vec![cover], 0, 0)
        } else {
            let mut search = CoverSearch::new(self, candidates)?;
            search.explore(0, 0)?;
            (search.found, search.combinations, search.improvements)
        };

        debug!(
            "cover: {} minimum cover(s) of size {}",
            covers.len(),
            covers.first().map_or(0, VectorTable::len)
        );
        self.stats.combinations = combinations;
        self.stats.improvements = improvements;
        self.covers = covers;
        self.phase = Phase::Done;
        Ok(&self.covers)
    }
}

struct CoverSearch<'a> {
    candidates: Vec<&'a Vector>,
    /// Counter slots of the rows each candidate covers.
    hits: Vec<Vec<Slot>>,
    counts: CountingIndex<u32>,
    universe: Vec<Slot>,
    /// Candidate indices of the current combination.
    chosen: Vec<usize>,
    /// Size of the smallest cover found so far; combinations never reach it.
    best: usize,
    max_covers: Option<usize>,
    found: Vec<VectorTable>,
    combinations: u64,
    improvements: usize,
}

impl<'a> CoverSearch<'a> {
    fn new(minimizer: &'a Minimizer, candidates: Vec<&'a Vector>) -> Result<Self> {
        let buckets = minimizer.config.index_buckets.unwrap_or(candidates.len());
        let mut counts = CountingIndex::new(buckets)?;

        let mut hits = Vec::new();
        hits.try_reserve_exact(candidates.len())?;
        for candidate in &candidates {
            let mut slots = Vec::new();
            slots.try_reserve_exact(candidate.ancestors().len())?;
            for leaf in minimizer.covered_leaves(candidate) {
                slots.push(counts.get_or_create(leaf.bits())?);
            }
            hits.push(slots);
        }

        let mut universe = Vec::new();
        universe.try_reserve_exact(counts.len())?;
        universe.resize(counts.len(), Slot::default());
        counts.collect_slots(&mut universe)?;

        let mut chosen = Vec::new();
        chosen.try_reserve_exact(universe.len())?;

        debug!(
            "cover: universe of {} rows over {} buckets",
            universe.len(),
            counts.bucket_count()
        );

        Ok(Self {
            candidates,
            hits,
            counts,
            best: universe.len(),
            universe,
            chosen,
            max_covers: minimizer.config.max_covers,
            found: Vec::new(),
            combinations: 0,
            improvements: 0,
        })
    }

    /// Extend the current combination (of size `depth`) with every candidate
    /// from `start` on.
    fn explore(&mut self, depth: usize, start: usize) -> Result<()> {
        if depth >= self.best {
            return Ok(());
        }
        for i in start..self.candidates.len() {
            self.chosen.truncate(depth);
            self.chosen.push(i);
            self.select(i);
            self.combinations += 1;

            if self.is_covered() {
                self.record(depth + 1)?;
            }
            self.explore(depth + 1, i + 1)?;

            self.deselect(i);
        }
        self.chosen.truncate(depth);
        Ok(())
    }

    fn select(&mut self, candidate: usize) {
        for &slot in &self.hits[candidate] {
            self.counts[slot] += 1;
        }
    }

    fn deselect(&mut self, candidate: usize) {
        for &slot in &self.hits[candidate] {
            self.counts[slot] -= 1;
        }
    }

    fn is_covered(&self) -> bool {
        self.universe.iter().all(|&slot| self.counts[slot] > 0)
    }

    fn record(&mut self, size: usize) -> Result<()> {
        if size < self.best {
            debug!("cover: size {} improves on {}, dropping {} cover(s)", size, self.best, self.found.len());
            self.found.clear();
            self.best = size;
            self.improvements += 1;
        }
        if self.max_covers.is_some_and(|max| self.found.len() >= max) {
            return Ok(());
        }

        let mut cover = VectorTable::with_capacity(size)?;
        for &i in &self.chosen {
            cover.push(self.candidates[i].clone())?;
        }
        self.found.try_reserve(1)?;
        self.found.push(cover);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::config::MinimizerConfig;
    use crate::types::Mode;

    fn run(rows: &[(&str, char)], config: MinimizerConfig) -> Minimizer {
        let mut table = VectorTable::new();
        for &(text, value) in rows {
            table.push(Vector::parse(text, value, Mode::One).unwrap()).unwrap();
        }
        Minimizer::run(table, config).unwrap()
    }

    fn cover_texts(cover: &VectorTable) -> Vec<String> {
        let mut texts: Vec<String> = cover.iter().map(Vector::to_text).collect();
        texts.sort();
        texts
    }

    #[test]
    fn test_cover_before_reduce() {
        let mut table = VectorTable::new();
        table.push(Vector::parse("1", '1', Mode::One).unwrap()).unwrap();
        let mut m = Minimizer::new(table).unwrap();
        assert!(matches!(m.cover(), Err(Error::IllegalData(_))));
    }

    #[test]
    fn test_essential_primes_only() {
        // f = a'b' + ab over `ab`.
        let m = run(&[("00", '1'), ("11", '1')], MinimizerConfig::default());
        assert_eq!(m.covers().len(), 1);
        assert_eq!(cover_texts(&m.covers()[0]), vec!["00", "11"]);
        assert_eq!(m.phase(), Phase::Done);
    }

    #[test]
    fn test_redundant_prime_is_dropped() {
        // Primes 00-, 0-1, -11; the middle one is redundant.
        let m = run(
            &[("000", '1'), ("001", '1'), ("011", '1'), ("111", '1')],
            MinimizerConfig::default(),
        );
        assert_eq!(m.covers().len(), 1);
        assert_eq!(cover_texts(&m.covers()[0]), vec!["-11", "00-"]);
    }

    #[test]
    fn test_cyclic_cover_has_two_solutions() {
        // Minterms 0,1,2,5,6,7 over three variables: the classic cyclic core
        // with two minimum covers of three implicants each.
        let rows = ["000", "001", "010", "101", "110", "111"];
        let rows: Vec<(&str, char)> = rows.iter().map(|r| (*r, '1')).collect();
        let m = run(&rows, MinimizerConfig::default());

        assert_eq!(m.prime_implicants().unwrap().len(), 6);
        let mut covers: Vec<Vec<String>> = m.covers().iter().map(cover_texts).collect();
        covers.sort();
        assert_eq!(
            covers,
            vec![
                vec!["-01".to_string(), "0-0".to_string(), "11-".to_string()],
                vec!["-10".to_string(), "00-".to_string(), "1-1".to_string()],
            ]
        );
        assert!(m.stats().improvements >= 1);
    }

    #[test]
    fn test_max_covers_caps_results() {
        let rows = ["000", "001", "010", "101", "110", "111"];
        let rows: Vec<(&str, char)> = rows.iter().map(|r| (*r, '1')).collect();
        let m = run(&rows, MinimizerConfig::default().with_max_covers(1));
        assert_eq!(m.covers().len(), 1);
        assert_eq!(m.covers()[0].len(), 3);
    }

    #[test]
    fn test_dont_care_implicants_are_not_candidates() {
        let m = run(&[("0", '-'), ("1", '-')], MinimizerConfig::default());
        assert_eq!(m.covers().len(), 1);
        assert!(m.covers()[0].is_empty());
    }

    #[test]
    fn test_dont_cares_enlarge_implicants() {
        // -1 only covers 01 thanks to the don't-care at 11; 0- covers both.
        let m = run(&[("00", '1'), ("01", '1'), ("11", '-')], MinimizerConfig::default());
        assert_eq!(m.covers().len(), 1);
        assert_eq!(cover_texts(&m.covers()[0]), vec!["0-"]);
    }

    #[test]
    fn test_small_index_still_works() {
        let rows = ["000", "001", "010", "101", "110", "111"];
        let rows: Vec<(&str, char)> = rows.iter().map(|r| (*r, '1')).collect();
        let m = run(&rows, MinimizerConfig::default().with_index_buckets(1));
        assert_eq!(m.covers().len(), 2);
    }

    #[test]
    fn test_cover_is_idempotent() {
        let mut m = run(&[("00", '1'), ("11", '1')], MinimizerConfig::default());
        let again = m.cover().unwrap();
        assert_eq!(again.len(), 1);
    }
}
