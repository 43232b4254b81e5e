//! Peptide coordinate handling
//!
//! # Coordinate System
//!
//! | Position Type | Basis | Notes |
//! |---------------|-------|-------|
//! | Residue | 1-based | Amino acid position |
//! | CDS range return | 1-based | `(start, end)` inclusive, may be < 1 with a start phase |

use crate::error::FerroError;
use crate::reference::transcript::TranscriptModel;

/// Validate a residue against a transcript's translated length
pub fn validate_residue(residue: u64, transcript: &TranscriptModel) -> Result<(), FerroError> {
    let protein_length = transcript.translated_length();
    if residue < 1 || residue > protein_length {
        return Err(FerroError::ResidueOutOfRange {
            id: transcript
                .protein_id
                .clone()
                .unwrap_or_else(|| transcript.id.clone()),
            residue,
            length: protein_length,
        });
    }
    Ok(())
}

/// Convert a residue to the CDS positions of its codon
///
/// `start_phase` bases of padding precede CDS position 1, so the first
/// codon of a transcript with an incomplete 5' end starts below 1.
pub fn protein_to_cds_range(residue: u64, start_phase: u8) -> (i64, i64) {
    let pad = i64::from(start_phase);
    let start = (residue as i64 - 1) * 3 + 1 - pad;
    let end = residue as i64 * 3 - pad;
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::transcript::{Exon, Strand};

    fn make_test_transcript() -> TranscriptModel {
        TranscriptModel::new("ENST_TEST", "1", Strand::Plus, vec![Exon::new(1, 1, 18)])
            .with_protein_id("ENSP_TEST")
            .with_coding_region(1, 18)
    }

    #[test]
    fn test_validate_residue() {
        let tx = make_test_transcript();
        assert!(validate_residue(1, &tx).is_ok());
        assert!(validate_residue(6, &tx).is_ok());

        let err = validate_residue(7, &tx).unwrap_err();
        assert_eq!(
            err,
            FerroError::ResidueOutOfRange {
                id: "ENSP_TEST".to_string(),
                residue: 7,
                length: 6
            }
        );
        assert!(validate_residue(0, &tx).is_err());
    }

    #[test]
    fn test_protein_to_cds_range() {
        assert_eq!(protein_to_cds_range(1, 0), (1, 3));
        assert_eq!(protein_to_cds_range(2, 0), (4, 6));
        // Two bases of the first codon are missing
        assert_eq!(protein_to_cds_range(1, 2), (-1, 1));
        assert_eq!(protein_to_cds_range(2, 2), (2, 4));
    }
}
