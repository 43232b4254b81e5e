//! Transcript and exon models
//!
//! # Coordinate System
//!
//! All coordinates in this module are **1-based inclusive**:
//!
//! | Field | Basis | Notes |
//! |-------|-------|-------|
//! | `Exon.genomic_start`, `Exon.genomic_end` | 1-based | Genomic coordinates (inclusive) |
//! | `TranscriptModel.coding_start`, `coding_end` | 1-based | Lowest/highest coding base on the genome |
//! | `CodingSegment.genomic_start`, `genomic_end` | 1-based | Coding part of one exon |
//!
//! `coding_start <= coding_end` regardless of strand; the 5' end of the coding
//! sequence is `coding_end` on the minus strand.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// Parse a strand from `+`/`-`/`1`/`-1`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "+" | "1" | "+1" => Some(Strand::Plus),
            "-" | "-1" => Some(Strand::Minus),
            _ => None,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// An exon in a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exon {
    /// Exon number (1-based, in transcript order)
    pub number: u32,
    /// Genomic start position (1-based, inclusive)
    pub genomic_start: u64,
    /// Genomic end position (1-based, inclusive)
    pub genomic_end: u64,
}

impl Exon {
    pub fn new(number: u32, genomic_start: u64, genomic_end: u64) -> Self {
        Self {
            number,
            genomic_start,
            genomic_end,
        }
    }

    /// Length of the exon
    pub fn len(&self) -> u64 {
        if self.genomic_end >= self.genomic_start {
            self.genomic_end - self.genomic_start + 1
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a genomic position is within this exon
    pub fn contains(&self, pos: u64) -> bool {
        pos >= self.genomic_start && pos <= self.genomic_end
    }
}

/// The coding part of an exon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingSegment {
    pub genomic_start: u64,
    pub genomic_end: u64,
}

impl CodingSegment {
    pub fn len(&self) -> u64 {
        (self.genomic_end + 1).saturating_sub(self.genomic_start)
    }

    pub fn is_empty(&self) -> bool {
        self.genomic_end < self.genomic_start
    }
}

/// A transcript's exon structure
///
/// Resolved once per protein id and shared read-only afterwards.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptModel {
    /// Transcript stable id (e.g., "ENST00000269305")
    pub id: String,

    /// Translation stable id (e.g., "ENSP00000269305")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_id: Option<String>,

    /// Gene symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,

    /// Chromosome name (e.g., "chr1", "1", "X")
    pub chromosome: String,

    /// Strand orientation
    pub strand: Strand,

    /// Exons sorted by genomic start
    pub exons: Vec<Exon>,

    /// Lowest coding base (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_start: Option<u64>,

    /// Highest coding base (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_end: Option<u64>,

    /// Phase of the first coding base; the number of bases missing from an
    /// incomplete first codon
    #[serde(default)]
    pub start_phase: u8,

    /// Translated protein sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_sequence: Option<String>,

    #[serde(skip)]
    pub(crate) cached_segments: OnceLock<Vec<CodingSegment>>,
}

impl Clone for TranscriptModel {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            protein_id: self.protein_id.clone(),
            gene_symbol: self.gene_symbol.clone(),
            chromosome: self.chromosome.clone(),
            strand: self.strand,
            exons: self.exons.clone(),
            coding_start: self.coding_start,
            coding_end: self.coding_end,
            start_phase: self.start_phase,
            protein_sequence: self.protein_sequence.clone(),
            // Cache is reset on clone
            cached_segments: OnceLock::new(),
        }
    }
}

impl PartialEq for TranscriptModel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.protein_id == other.protein_id
            && self.gene_symbol == other.gene_symbol
            && self.chromosome == other.chromosome
            && self.strand == other.strand
            && self.exons == other.exons
            && self.coding_start == other.coding_start
            && self.coding_end == other.coding_end
            && self.start_phase == other.start_phase
            && self.protein_sequence == other.protein_sequence
    }
}

impl Eq for TranscriptModel {}

impl TranscriptModel {
    /// Create a transcript model; exons are sorted by genomic start
    pub fn new(
        id: impl Into<String>,
        chromosome: impl Into<String>,
        strand: Strand,
        mut exons: Vec<Exon>,
    ) -> Self {
        exons.sort_by_key(|e| e.genomic_start);
        Self {
            id: id.into(),
            protein_id: None,
            gene_symbol: None,
            chromosome: chromosome.into(),
            strand,
            exons,
            coding_start: None,
            coding_end: None,
            start_phase: 0,
            protein_sequence: None,
            cached_segments: OnceLock::new(),
        }
    }

    pub fn with_protein_id(mut self, protein_id: impl Into<String>) -> Self {
        self.protein_id = Some(protein_id.into());
        self
    }

    /// Set the coding region (genomic low/high, any order)
    pub fn with_coding_region(mut self, start: u64, end: u64) -> Self {
        self.coding_start = Some(start.min(end));
        self.coding_end = Some(start.max(end));
        self.cached_segments = OnceLock::new();
        self
    }

    pub fn with_start_phase(mut self, phase: u8) -> Self {
        self.start_phase = phase % 3;
        self
    }

    pub fn with_protein_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.protein_sequence = Some(sequence.into());
        self
    }

    /// Check if this is a coding transcript
    pub fn is_coding(&self) -> bool {
        self.coding_start.is_some() && self.coding_end.is_some()
    }

    /// Genomic span of the transcript
    pub fn genomic_start(&self) -> Option<u64> {
        self.exons.iter().map(|e| e.genomic_start).min()
    }

    pub fn genomic_end(&self) -> Option<u64> {
        self.exons.iter().map(|e| e.genomic_end).max()
    }

    /// Check if a genomic position falls within this transcript's span
    pub fn contains_genomic_pos(&self, pos: u64) -> bool {
        match (self.genomic_start(), self.genomic_end()) {
            (Some(start), Some(end)) => pos >= start && pos <= end,
            _ => false,
        }
    }

    /// Coding parts of the exons, in transcript (5' to 3') order
    pub fn coding_segments(&self) -> &[CodingSegment] {
        self.cached_segments
            .get_or_init(|| self.compute_coding_segments())
    }

    /// Number of coding bases
    pub fn coding_length(&self) -> u64 {
        self.coding_segments().iter().map(CodingSegment::len).sum()
    }

    /// Number of residues the coding sequence translates to, counting an
    /// incomplete first or last codon
    pub fn translated_length(&self) -> u64 {
        let padded = self.coding_length() + u64::from(self.start_phase);
        padded.div_ceil(3)
    }

    /// Amino acid at a 1-based residue, if the protein sequence is known
    pub fn residue_at(&self, residue: u64) -> Option<char> {
        if residue == 0 {
            return None;
        }
        self.protein_sequence
            .as_ref()
            .and_then(|seq| seq.chars().nth(residue as usize - 1))
    }

    fn compute_coding_segments(&self) -> Vec<CodingSegment> {
        let (Some(cds_start), Some(cds_end)) = (self.coding_start, self.coding_end) else {
            return Vec::new();
        };

        let mut segments: Vec<CodingSegment> = self
            .exons
            .iter()
            .filter(|e| e.genomic_end >= cds_start && e.genomic_start <= cds_end)
            .map(|e| CodingSegment {
                genomic_start: e.genomic_start.max(cds_start),
                genomic_end: e.genomic_end.min(cds_end),
            })
            .collect();
        segments.sort_by_key(|s| s.genomic_start);

        if self.strand == Strand::Minus {
            segments.reverse();
        }
        segments
    }
}
