//! Paralogue annotation store
//!
//! Homology records are looked up by reference protein and genomic interval
//! through an interval index over the homology table.

pub mod index;
pub mod record;
pub mod store;

pub use index::{IntervalEntry, IntervalIndex, RangeQueryable};
pub use record::{HomologyRecord, ProteinInterval, HOMOLOGY_COLUMNS};
pub use store::{
    load_homology_table, AnnotationStore, HomologyFilter, LoadStats, DEFAULT_MIN_PERC_COV,
    DEFAULT_MIN_PERC_POS,
};
