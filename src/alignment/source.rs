//! Upstream alignment representations
//!
//! Homology data arrives either as raw sequences plus run-length encodings
//! (the annotation store form) or as two pre-gapped rows. Both collapse to a
//! [`PairwiseAlignment`] before any mapping runs.

use super::cigar::AlignmentEncoding;
use super::pairwise::{AlignedSequence, PairwiseAlignment};
use crate::error::FerroError;

/// Residue used when a protein's sequence is unknown
pub const PLACEHOLDER_RESIDUE: char = 'X';

/// One side of an encoded alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRow {
    /// Protein stable id
    pub id: String,
    /// Raw ungapped sequence, if known
    pub sequence: Option<String>,
    /// Run-length encoding (e.g. `2M1D3M`)
    pub encoding: String,
}

impl EncodedRow {
    pub fn new(id: impl Into<String>, sequence: Option<String>, encoding: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence,
            encoding: encoding.into(),
        }
    }

    /// Expand this row into its gapped form
    ///
    /// Without a known sequence, a run of [`PLACEHOLDER_RESIDUE`] of the
    /// encoding's Match length stands in.
    pub fn reconstruct(&self) -> Result<AlignedSequence, FerroError> {
        let encoding: AlignmentEncoding = self.encoding.parse()?;
        let aligned = match &self.sequence {
            Some(raw) => encoding.reconstruct(raw)?,
            None => {
                let (match_len, _) = encoding.checked_lengths()?;
                let placeholder: String = std::iter::repeat(PLACEHOLDER_RESIDUE)
                    .take(match_len as usize)
                    .collect();
                encoding.reconstruct(&placeholder)?
            }
        };
        Ok(AlignedSequence::new(self.id.clone(), aligned))
    }
}

/// An alignment in one of its upstream forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentSource {
    /// Raw sequences with run-length encodings
    Encoded { first: EncodedRow, second: EncodedRow },
    /// Two already-gapped rows
    Gapped {
        first: AlignedSequence,
        second: AlignedSequence,
    },
}

impl AlignmentSource {
    /// Normalize into a [`PairwiseAlignment`]
    pub fn into_alignment(self) -> Result<PairwiseAlignment, FerroError> {
        match self {
            AlignmentSource::Encoded { first, second } => {
                PairwiseAlignment::new(first.reconstruct()?, second.reconstruct()?)
            }
            AlignmentSource::Gapped { first, second } => PairwiseAlignment::new(first, second),
        }
    }
}
