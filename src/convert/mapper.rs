//! Peptide to genomic coordinate mapping
//!
//! # Coordinate Systems
//!
//! | System | Basis | Notes |
//! |--------|-------|-------|
//! | Genomic | 1-based | Inclusive intervals |
//! | CDS | 1-based | Position along the spliced coding sequence |
//! | Peptide | 1-based | Residue number |
//!
//! A codon that straddles an exon junction maps to the smallest genomic
//! interval covering all of its exonic bases, so the returned interval can
//! include intronic sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::protein::{protein_to_cds_range, validate_residue};
use crate::error::FerroError;
use crate::reference::transcript::{Strand, TranscriptModel};

/// A genomic interval (1-based, inclusive)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicInterval {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicInterval {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    /// Length of the interval
    pub fn len(&self) -> u64 {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

/// Maps peptide residues to the genome for a transcript
pub struct CoordinateMapper<'a> {
    transcript: &'a TranscriptModel,
}

impl<'a> CoordinateMapper<'a> {
    /// Create a new mapper for a transcript
    pub fn new(transcript: &'a TranscriptModel) -> Self {
        Self { transcript }
    }

    /// Convert a CDS position (1-based) to a genomic position
    ///
    /// Returns `None` for positions outside the coding sequence.
    pub fn cds_to_genomic(&self, cds_pos: i64) -> Option<u64> {
        if cds_pos < 1 {
            return None;
        }
        let mut remaining = cds_pos as u64 - 1;
        for seg in self.transcript.coding_segments() {
            let len = seg.len();
            if remaining < len {
                return Some(match self.transcript.strand {
                    Strand::Plus => seg.genomic_start + remaining,
                    Strand::Minus => seg.genomic_end - remaining,
                });
            }
            remaining -= len;
        }
        None
    }

    /// Genomic interval of the codon encoding a residue (1-based)
    ///
    /// # Errors
    ///
    /// Returns [`FerroError::ResidueOutOfRange`] if the residue is 0 or
    /// beyond the translated protein length.
    pub fn translate_peptide_to_genomic(&self, residue: u64) -> Result<GenomicInterval, FerroError> {
        validate_residue(residue, self.transcript)?;

        let (cds_start, cds_end) = protein_to_cds_range(residue, self.transcript.start_phase);
        let positions: Vec<u64> = (cds_start..=cds_end)
            .filter_map(|pos| self.cds_to_genomic(pos))
            .collect();

        // validate_residue guarantees at least one base of the codon exists
        let (Some(start), Some(end)) = (positions.iter().min(), positions.iter().max()) else {
            return Err(FerroError::ResidueOutOfRange {
                id: self.transcript.id.clone(),
                residue,
                length: self.transcript.translated_length(),
            });
        };

        Ok(GenomicInterval::new(
            self.transcript.chromosome.clone(),
            *start,
            *end,
        ))
    }
}
