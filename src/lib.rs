//! # qmc-rs: exact two-level logic minimization
//!
//! **`qmc-rs`** minimizes a completely or incompletely specified boolean function, given as a
//! truth table, into a minimum sum-of-products using the Quine–McCluskey method.
//!
//! ## How it works
//!
//! The input is a list of *argument vectors* over `{0, 1, -}` together with a value:
//! `1` (the function is true there) or `-` (don't care). Rows whose value is `0` carry no
//! information for a sum-of-products and are never stored.
//!
//! 1. **Merge phase.** Rows are grouped by weight (number of `1` digits). Vectors from
//!    adjacent groups that differ in exactly one position are merged, the position becoming
//!    `-`. Passes repeat until nothing merges; what is left are the *prime implicants*.
//! 2. **Cover phase.** Among the prime implicants with value `1`, find every smallest subset
//!    that still covers each original `1` row.
//!
//! Each vector keeps track of the original rows it covers (its *ancestors*) as
//! [`LeafId`][crate::types::LeafId] handles into the input layer, so both phases work on
//! plain indices.
//!
//! ## Basic Usage
//!
//! ```rust
//! use qmc_rs::config::MinimizerConfig;
//! use qmc_rs::io::parse_table;
//! use qmc_rs::minimizer::Minimizer;
//!
//! let input = parse_table("00 1\n01 1\n10 1\n11 1\n").unwrap();
//! assert!(input.rejected.is_empty());
//!
//! let config = MinimizerConfig::default().with_mode(input.mode);
//! let minimizer = Minimizer::run(input.table, config).unwrap();
//!
//! // f = 1 everywhere, so the only minimum cover is the single implicant `--`.
//! let covers = minimizer.covers();
//! assert_eq!(covers.len(), 1);
//! assert_eq!(covers[0][0].to_text(), "--");
//! ```
//!
//! ## Core Components
//!
//! - **[`vector`]**: bit-packed ternary vectors, merging and equality.
//! - **[`minimizer`]**: the [`Minimizer`][crate::minimizer::Minimizer] engine and its merge phase.
//! - **[`cover`]**: the minimum-cover search.
//! - **[`index`]**: the counting hash index used by the cover search.
//! - **[`io`]** and **[`display`]**: reading truth tables and printing results.

pub mod bitset;
pub mod config;
pub mod cover;
pub mod display;
pub mod error;
pub mod index;
pub mod io;
pub mod minimizer;
pub mod table;
pub mod types;
pub mod utils;
pub mod vector;
