//! Pairwise alignment with residue/column lookup
//!
//! # Coordinate System
//!
//! | Quantity | Basis | Notes |
//! |----------|-------|-------|
//! | Residue index | 1-based | Counts non-gap characters of one row |
//! | Alignment column | 1-based | Position in the gapped row |
//! | `GenomicAnchor.genomic_start` | 1-based | First base of the protein's region |

use std::collections::HashMap;

use log::trace;

use super::cigar::GAP;
use crate::error::FerroError;
use crate::reference::transcript::Strand;

/// Whether an alignment column holds a residue or a gap for a given row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// The column holds a residue of the row
    Exact,
    /// The column is a gap in the row
    Gap,
}

/// Result of looking up a column in one row of the alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnResidue {
    /// Residue index (1-based). For a gap, the last residue before the gap (0 if none).
    pub residue: u64,
    /// Whether the column is a residue or a gap
    pub match_type: MatchType,
}

impl ColumnResidue {
    /// The residue index if the column is an exact correspondence
    pub fn exact(&self) -> Option<u64> {
        match self.match_type {
            MatchType::Exact => Some(self.residue),
            MatchType::Gap => None,
        }
    }
}

/// Per-sequence alignment statistics (percentages, 0-100)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlignmentStats {
    /// Percentage of the sequence covered by the alignment
    pub percent_coverage: f64,
    /// Percentage of aligned residues that are positive (chemically similar)
    pub percent_positivity: f64,
    /// Percentage of aligned residues that are identical, when known
    pub percent_identity: Option<f64>,
}

/// Genomic location of an aligned protein
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicAnchor {
    pub chromosome: String,
    pub genomic_start: u64,
    pub strand: Strand,
}

/// One gapped row of an alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSequence {
    /// Sequence identifier (protein stable id)
    pub id: String,
    /// Gapped sequence, `-` for gap columns
    pub aligned: String,
}

impl AlignedSequence {
    pub fn new(id: impl Into<String>, aligned: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aligned: aligned.into(),
        }
    }

    /// Number of alignment columns
    pub fn column_count(&self) -> u64 {
        self.aligned.len() as u64
    }

    /// Number of residues (non-gap characters)
    pub fn residue_count(&self) -> u64 {
        self.aligned.bytes().filter(|b| *b != GAP).count() as u64
    }

    /// The ungapped sequence
    pub fn ungapped(&self) -> String {
        self.aligned.chars().filter(|c| *c != GAP as char).collect()
    }

    /// Character at a 1-based column
    pub fn char_at(&self, column: u64) -> Option<char> {
        if column == 0 {
            return None;
        }
        self.aligned
            .as_bytes()
            .get(column as usize - 1)
            .map(|b| *b as char)
    }

    /// Column (1-based) holding the `residue`-th non-gap character
    pub fn column_from_residue(&self, residue: u64) -> Result<u64, FerroError> {
        if residue >= 1 {
            let mut seen = 0u64;
            for (i, b) in self.aligned.bytes().enumerate() {
                if b != GAP {
                    seen += 1;
                    if seen == residue {
                        return Ok(i as u64 + 1);
                    }
                }
            }
        }
        Err(FerroError::ResidueOutOfRange {
            id: self.id.clone(),
            residue,
            length: self.residue_count(),
        })
    }

    /// Residue index and match type at a 1-based column
    pub fn residue_at_column(&self, column: u64) -> Result<ColumnResidue, FerroError> {
        let bytes = self.aligned.as_bytes();
        if column == 0 || column > bytes.len() as u64 {
            return Err(FerroError::ResidueOutOfRange {
                id: self.id.clone(),
                residue: column,
                length: bytes.len() as u64,
            });
        }

        let idx = column as usize - 1;
        let residue = bytes[..=idx].iter().filter(|b| **b != GAP).count() as u64;
        let match_type = if bytes[idx] == GAP {
            MatchType::Gap
        } else {
            MatchType::Exact
        };
        Ok(ColumnResidue {
            residue,
            match_type,
        })
    }

    fn pad_to(&mut self, columns: u64) {
        let missing = columns.saturating_sub(self.column_count()) as usize;
        self.aligned.extend(std::iter::repeat(GAP as char).take(missing));
    }
}

/// Two aligned sequences of equal column count
///
/// Built per homology hit and discarded after use. Statistics and genomic
/// anchors are keyed by sequence id.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseAlignment {
    first: AlignedSequence,
    second: AlignedSequence,
    stats: HashMap<String, AlignmentStats>,
    anchors: HashMap<String, GenomicAnchor>,
}

impl PairwiseAlignment {
    /// Create an alignment from two gapped rows
    ///
    /// If the rows differ in column count the shorter one is padded with
    /// trailing gap columns.
    pub fn new(
        mut first: AlignedSequence,
        mut second: AlignedSequence,
    ) -> Result<Self, FerroError> {
        if first.id == second.id {
            return Err(FerroError::encoding(
                format!("{}/{}", first.aligned, second.aligned),
                format!("both alignment rows are named {}", first.id),
            ));
        }

        let columns = first.column_count().max(second.column_count());
        if first.column_count() != second.column_count() {
            trace!(
                "Padding alignment of {} ({} columns) and {} ({} columns) to {}",
                first.id,
                first.column_count(),
                second.id,
                second.column_count(),
                columns
            );
            first.pad_to(columns);
            second.pad_to(columns);
        }

        Ok(Self {
            first,
            second,
            stats: HashMap::new(),
            anchors: HashMap::new(),
        })
    }

    /// Attach statistics for one of the sequences
    pub fn with_stats(mut self, id: impl Into<String>, stats: AlignmentStats) -> Self {
        self.stats.insert(id.into(), stats);
        self
    }

    /// Attach a genomic anchor for one of the sequences
    pub fn with_anchor(mut self, id: impl Into<String>, anchor: GenomicAnchor) -> Self {
        self.anchors.insert(id.into(), anchor);
        self
    }

    /// Number of alignment columns (identical for both rows)
    pub fn column_count(&self) -> u64 {
        self.first.column_count()
    }

    /// The first row
    pub fn first(&self) -> &AlignedSequence {
        &self.first
    }

    /// The second row
    pub fn second(&self) -> &AlignedSequence {
        &self.second
    }

    /// Get a row by sequence id
    pub fn row(&self, id: &str) -> Result<&AlignedSequence, FerroError> {
        if self.first.id == id {
            Ok(&self.first)
        } else if self.second.id == id {
            Ok(&self.second)
        } else {
            Err(FerroError::UnknownSequence { id: id.to_string() })
        }
    }

    /// Id of the row that is not `id`
    pub fn partner_of(&self, id: &str) -> Result<&str, FerroError> {
        if self.first.id == id {
            Ok(&self.second.id)
        } else if self.second.id == id {
            Ok(&self.first.id)
        } else {
            Err(FerroError::UnknownSequence { id: id.to_string() })
        }
    }

    /// Statistics recorded for a sequence
    pub fn stats(&self, id: &str) -> Option<&AlignmentStats> {
        self.stats.get(id)
    }

    /// Genomic anchor recorded for a sequence
    pub fn anchor(&self, id: &str) -> Option<&GenomicAnchor> {
        self.anchors.get(id)
    }

    /// Alignment column of the `residue`-th residue (1-based) of `id`
    pub fn column_from_residue(&self, id: &str, residue: u64) -> Result<u64, FerroError> {
        self.row(id)?.column_from_residue(residue)
    }

    /// Residue index and match type of `id` at a 1-based column
    pub fn residue_at_column(&self, id: &str, column: u64) -> Result<ColumnResidue, FerroError> {
        self.row(id)?.residue_at_column(column)
    }

    /// Map a residue of `from` to the correspondent residue of its partner
    pub fn correspondent_residue(
        &self,
        from: &str,
        residue: u64,
    ) -> Result<ColumnResidue, FerroError> {
        let column = self.column_from_residue(from, residue)?;
        let partner = self.partner_of(from)?;
        self.residue_at_column(partner, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_alignment() -> PairwiseAlignment {
        PairwiseAlignment::new(
            AlignedSequence::new("REF", "AC-DEF"),
            AlignedSequence::new("PAR", "ACGD-F"),
        )
        .unwrap()
    }

    #[test]
    fn test_column_from_residue() {
        let aln = make_alignment();
        assert_eq!(aln.column_from_residue("REF", 1).unwrap(), 1);
        assert_eq!(aln.column_from_residue("REF", 3).unwrap(), 4);
        assert_eq!(aln.column_from_residue("REF", 5).unwrap(), 6);
        assert_eq!(aln.column_from_residue("PAR", 4).unwrap(), 4);
    }

    #[test]
    fn test_column_from_residue_out_of_range() {
        let aln = make_alignment();
        let err = aln.column_from_residue("REF", 6).unwrap_err();
        assert_eq!(
            err,
            FerroError::ResidueOutOfRange {
                id: "REF".to_string(),
                residue: 6,
                length: 5
            }
        );
        assert!(aln.column_from_residue("REF", 0).is_err());
    }

    #[test]
    fn test_residue_at_column() {
        let aln = make_alignment();
        let hit = aln.residue_at_column("PAR", 3).unwrap();
        assert_eq!(hit.residue, 3);
        assert_eq!(hit.match_type, MatchType::Exact);
        assert_eq!(hit.exact(), Some(3));

        let gap = aln.residue_at_column("PAR", 5).unwrap();
        assert_eq!(gap.match_type, MatchType::Gap);
        assert_eq!(gap.residue, 4);
        assert_eq!(gap.exact(), None);

        assert!(aln.residue_at_column("PAR", 7).is_err());
        assert!(aln.residue_at_column("PAR", 0).is_err());
    }

    #[test]
    fn test_unknown_sequence() {
        let aln = make_alignment();
        assert_eq!(
            aln.column_from_residue("OTHER", 1).unwrap_err(),
            FerroError::UnknownSequence {
                id: "OTHER".to_string()
            }
        );
    }

    #[test]
    fn test_correspondent_residue() {
        let aln = make_alignment();
        // REF residue 3 (D) sits in column 4, PAR has D there too
        let hit = aln.correspondent_residue("REF", 3).unwrap();
        assert_eq!(hit.exact(), Some(4));
        // REF residue 4 (E) sits in column 5, a gap in PAR
        let gap = aln.correspondent_residue("REF", 4).unwrap();
        assert_eq!(gap.match_type, MatchType::Gap);
    }

    #[test]
    fn test_unequal_rows_are_padded() {
        let aln = PairwiseAlignment::new(
            AlignedSequence::new("REF", "ABCDE"),
            AlignedSequence::new("PAR", "AB-CDE"),
        )
        .unwrap();
        assert_eq!(aln.column_count(), 6);
        assert_eq!(aln.first().aligned, "ABCDE-");
        assert_eq!(aln.second().column_count(), 6);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = PairwiseAlignment::new(
            AlignedSequence::new("SAME", "A"),
            AlignedSequence::new("SAME", "A"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_and_anchors() {
        let aln = make_alignment()
            .with_stats(
                "REF",
                AlignmentStats {
                    percent_coverage: 90.0,
                    percent_positivity: 75.0,
                    percent_identity: Some(60.0),
                },
            )
            .with_anchor(
                "PAR",
                GenomicAnchor {
                    chromosome: "7".to_string(),
                    genomic_start: 1000,
                    strand: Strand::Minus,
                },
            );
        assert_eq!(aln.stats("REF").unwrap().percent_positivity, 75.0);
        assert!(aln.stats("PAR").is_none());
        assert_eq!(aln.anchor("PAR").unwrap().chromosome, "7");
    }

    #[test]
    fn test_aligned_sequence_helpers() {
        let row = AlignedSequence::new("X", "-AB-C");
        assert_eq!(row.residue_count(), 3);
        assert_eq!(row.ungapped(), "ABC");
        assert_eq!(row.char_at(2), Some('A'));
        assert_eq!(row.char_at(0), None);
        assert_eq!(row.char_at(6), None);
    }
}
