//! Pairwise protein alignments
//!
//! Reconstructs gapped rows from run-length encodings and translates between
//! residue indices and alignment columns.

pub mod cigar;
pub mod pairwise;
pub mod source;

pub use cigar::{parse_cigar, reconstruct, AlignmentEncoding, CigarOp, GAP, MAX_ALIGNMENT_COLUMNS};
pub use pairwise::{
    AlignedSequence, AlignmentStats, ColumnResidue, GenomicAnchor, MatchType, PairwiseAlignment,
};
pub use source::{AlignmentSource, EncodedRow, PLACEHOLDER_RESIDUE};
