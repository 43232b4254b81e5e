//! Coordinate conversion
//!
//! Provides conversion from peptide residues to genomic coordinates:
//! - Peptide → CDS codon range
//! - CDS → Genomic, through a transcript's coding exons

pub mod mapper;
pub mod protein;

pub use mapper::{CoordinateMapper, GenomicInterval};
