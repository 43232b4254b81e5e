//! Clinical significance handling
//!
//! Parses packed clinical significance values into terms and filters
//! variants by them.
//!
//! # Examples
//!
//! ```
//! use ferro_paralogues::clinvar::{
//!     parse_clnsig, ClinicalFilterSpec, ClinicalSignificanceFilter, MatchMode,
//! };
//!
//! let filter = ClinicalSignificanceFilter::new(Some(ClinicalFilterSpec::new(
//!     "pathogenic",
//!     MatchMode::Partial,
//! )))
//! .unwrap();
//!
//! assert!(filter.matches(&parse_clnsig("Likely_pathogenic")));
//! assert!(!filter.matches(&parse_clnsig("Benign")));
//! ```

mod filter;
mod terms;

pub use filter::{ClinicalFilterSpec, ClinicalSignificanceFilter, MatchMode};
pub use terms::parse_clnsig;
