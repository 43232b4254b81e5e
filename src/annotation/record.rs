//! Homology records from the paralogue annotation table
//!
//! One row per (reference protein, paralogue protein) pair, tab-separated:
//!
//! | # | Column | Notes |
//! |---|--------|-------|
//! | 1 | `homology_id` | |
//! | 2-7 | `chr start end strand stable_id version` | Reference protein region |
//! | 8-10 | `perc_cov perc_id perc_pos` | Percentages, 0-100 |
//! | 11 | `cigar_line` | Reference row encoding |
//! | 12-17 | `paralogue_chr ... paralogue_version` | Paralogue protein region |
//! | 18 | `paralogue_cigar_line` | Paralogue row encoding |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alignment::{AlignmentSource, AlignmentStats, EncodedRow, GenomicAnchor};
use crate::error::FerroError;
use crate::reference::transcript::Strand;

/// Column names of the homology table, in order
pub const HOMOLOGY_COLUMNS: [&str; 18] = [
    "homology_id",
    "chr",
    "start",
    "end",
    "strand",
    "stable_id",
    "version",
    "perc_cov",
    "perc_id",
    "perc_pos",
    "cigar_line",
    "paralogue_chr",
    "paralogue_start",
    "paralogue_end",
    "paralogue_strand",
    "paralogue_stable_id",
    "paralogue_version",
    "paralogue_cigar_line",
];

/// Genomic region of one protein of a homology pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProteinInterval {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    /// Protein stable id, without version
    pub stable_id: String,
    pub version: Option<u32>,
}

impl ProteinInterval {
    /// `stable_id.version`, or the bare stable id
    pub fn versioned_id(&self) -> String {
        match self.version {
            Some(v) => format!("{}.{}", self.stable_id, v),
            None => self.stable_id.clone(),
        }
    }

    /// Whether a (possibly versioned) protein id names this protein
    pub fn matches_id(&self, protein_id: &str) -> bool {
        if protein_id == self.stable_id {
            return true;
        }
        match protein_id.split_once('.') {
            Some((base, version)) => {
                base == self.stable_id
                    && self
                        .version
                        .map_or(true, |v| version.parse::<u32>().ok() == Some(v))
            }
            None => false,
        }
    }

    /// Genomic anchor of this protein
    pub fn anchor(&self) -> GenomicAnchor {
        GenomicAnchor {
            chromosome: self.chromosome.clone(),
            genomic_start: self.start,
            strand: self.strand,
        }
    }

    /// Whether `[start, end]` on `chromosome` overlaps this region
    pub fn overlaps(&self, chromosome: &str, start: u64, end: u64) -> bool {
        crate::reference::canonical_chromosome(chromosome)
            == crate::reference::canonical_chromosome(&self.chromosome)
            && self.start <= end
            && self.end >= start
    }
}

/// A stored pairing of two paralogous protein regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomologyRecord {
    pub homology_id: String,
    pub reference: ProteinInterval,
    pub reference_encoding: String,
    pub perc_cov: f64,
    pub perc_id: f64,
    pub perc_pos: f64,
    pub paralogue: ProteinInterval,
    pub paralogue_encoding: String,
}

impl HomologyRecord {
    /// Parse one tab-separated row; `line` is used in error messages
    pub fn from_tsv_line(row: &str, line: usize) -> Result<Self, FerroError> {
        let fields: Vec<&str> = row.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields.len() < HOMOLOGY_COLUMNS.len() {
            return Err(FerroError::InvalidRecord {
                line,
                msg: format!(
                    "expected {} columns, found {}",
                    HOMOLOGY_COLUMNS.len(),
                    fields.len()
                ),
            });
        }

        let reference = parse_interval(&fields[1..7], line, "")?;
        let paralogue = parse_interval(&fields[11..17], line, "paralogue_")?;

        Ok(Self {
            homology_id: fields[0].to_string(),
            reference,
            perc_cov: parse_field(fields[7], line, "perc_cov")?,
            perc_id: parse_field(fields[8], line, "perc_id")?,
            perc_pos: parse_field(fields[9], line, "perc_pos")?,
            reference_encoding: fields[10].to_string(),
            paralogue,
            paralogue_encoding: fields[17].to_string(),
        })
    }

    /// Alignment statistics recorded for the pair
    pub fn stats(&self) -> AlignmentStats {
        AlignmentStats {
            percent_coverage: self.perc_cov,
            percent_positivity: self.perc_pos,
            percent_identity: Some(self.perc_id),
        }
    }

    /// The pair's alignment in its encoded form
    ///
    /// Sequences are optional; without them the rows are reconstructed from
    /// placeholder residues.
    pub fn alignment_source(
        &self,
        reference_sequence: Option<String>,
        paralogue_sequence: Option<String>,
    ) -> AlignmentSource {
        AlignmentSource::Encoded {
            first: EncodedRow::new(
                self.reference.stable_id.clone(),
                reference_sequence,
                self.reference_encoding.clone(),
            ),
            second: EncodedRow::new(
                self.paralogue.stable_id.clone(),
                paralogue_sequence,
                self.paralogue_encoding.clone(),
            ),
        }
    }
}

fn parse_field<T: FromStr>(value: &str, line: usize, column: &str) -> Result<T, FerroError> {
    value.trim().parse().map_err(|_| FerroError::InvalidRecord {
        line,
        msg: format!("invalid {} '{}'", column, value),
    })
}

fn parse_interval(fields: &[&str], line: usize, prefix: &str) -> Result<ProteinInterval, FerroError> {
    let strand = Strand::parse(fields[3]).ok_or_else(|| FerroError::InvalidRecord {
        line,
        msg: format!("invalid {}strand '{}'", prefix, fields[3]),
    })?;
    let version = match fields[5].trim() {
        "" | "NA" | "\\N" | "." => None,
        v => Some(parse_field(v, line, &format!("{}version", prefix))?),
    };

    Ok(ProteinInterval {
        chromosome: fields[0].to_string(),
        start: parse_field(fields[1], line, &format!("{}start", prefix))?,
        end: parse_field(fields[2], line, &format!("{}end", prefix))?,
        strand,
        stable_id: fields[4].to_string(),
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = "h1\t1\t100\t399\t1\tENSP_A\t2\t95.5\t60\t80\t5M\t7\t1000\t1300\t-1\tENSP_B\t\\N\t2M1D3M";

    #[test]
    fn test_parse_row() {
        let rec = HomologyRecord::from_tsv_line(ROW, 2).unwrap();
        assert_eq!(rec.homology_id, "h1");
        assert_eq!(rec.reference.chromosome, "1");
        assert_eq!(rec.reference.strand, Strand::Plus);
        assert_eq!(rec.reference.version, Some(2));
        assert_eq!(rec.perc_cov, 95.5);
        assert_eq!(rec.perc_pos, 80.0);
        assert_eq!(rec.reference_encoding, "5M");
        assert_eq!(rec.paralogue.strand, Strand::Minus);
        assert_eq!(rec.paralogue.version, None);
        assert_eq!(rec.paralogue_encoding, "2M1D3M");
    }

    #[test]
    fn test_parse_row_too_few_columns() {
        let err = HomologyRecord::from_tsv_line("h1\t1\t100", 7).unwrap_err();
        assert_eq!(
            err,
            FerroError::InvalidRecord {
                line: 7,
                msg: "expected 18 columns, found 3".to_string()
            }
        );
    }

    #[test]
    fn test_parse_row_bad_number() {
        let row = ROW.replace("95.5", "high");
        let err = HomologyRecord::from_tsv_line(&row, 3).unwrap_err();
        assert!(err.to_string().contains("perc_cov"));
    }

    #[test]
    fn test_parse_row_bad_strand() {
        let row = ROW.replace("\t-1\t", "\t?\t");
        let err = HomologyRecord::from_tsv_line(&row, 3).unwrap_err();
        assert!(err.to_string().contains("paralogue_strand"));
    }

    #[test]
    fn test_matches_id() {
        let rec = HomologyRecord::from_tsv_line(ROW, 1).unwrap();
        assert!(rec.reference.matches_id("ENSP_A"));
        assert!(rec.reference.matches_id("ENSP_A.2"));
        assert!(!rec.reference.matches_id("ENSP_A.3"));
        assert!(!rec.reference.matches_id("ENSP_B"));
        assert!(rec.paralogue.matches_id("ENSP_B.9"));
        assert_eq!(rec.reference.versioned_id(), "ENSP_A.2");
    }

    #[test]
    fn test_overlaps() {
        let rec = HomologyRecord::from_tsv_line(ROW, 1).unwrap();
        assert!(rec.reference.overlaps("chr1", 399, 500));
        assert!(!rec.reference.overlaps("1", 400, 500));
        assert!(!rec.reference.overlaps("2", 100, 200));
    }

    #[test]
    fn test_alignment_source() {
        let rec = HomologyRecord::from_tsv_line(ROW, 1).unwrap();
        let aln = rec.alignment_source(None, None).into_alignment().unwrap();
        assert_eq!(aln.first().aligned, "XXXXX-");
        assert_eq!(aln.second().aligned, "XX-XXX");
        assert_eq!(rec.stats().percent_identity, Some(60.0));
    }
}
