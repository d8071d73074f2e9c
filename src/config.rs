//! Run configuration for the [`Minimizer`][crate::minimizer::Minimizer].

use crate::types::Mode;

/// Settings for one minimization run.
///
/// ```rust
/// use qmc_rs::config::MinimizerConfig;
/// use qmc_rs::types::Mode;
///
/// let config = MinimizerConfig::default()
///     .with_mode(Mode::Zero)
///     .with_max_covers(4);
/// assert_eq!(config.mode, Mode::Zero);
/// assert_eq!(config.max_covers, Some(4));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinimizerConfig {
    /// Polarity the input was parsed with, used when rendering outcomes.
    pub mode: Mode,
    /// Initial bucket request for the cover-search index. `None` sizes it
    /// by the number of candidate implicants.
    pub index_buckets: Option<usize>,
    /// Keep at most this many minimum covers. `None` keeps all of them.
    pub max_covers: Option<usize>,
}

impl MinimizerConfig {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_index_buckets(mut self, buckets: usize) -> Self {
        self.index_buckets = Some(buckets);
        self
    }

    pub fn with_max_covers(mut self, max: usize) -> Self {
        self.max_covers = Some(max.max(1));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MinimizerConfig::default();
        assert_eq!(config.mode, Mode::One);
        assert_eq!(config.index_buckets, None);
        assert_eq!(config.max_covers, None);
    }

    #[test]
    fn test_builder() {
        let config = MinimizerConfig::default()
            .with_index_buckets(31)
            .with_max_covers(0);
        assert_eq!(config.index_buckets, Some(31));
        // At least one cover is always kept.
        assert_eq!(config.max_covers, Some(1));
    }
}
