//! Transcript database loading
//!
//! This module provides a local, region-bucketed transcript database and
//! loaders for the annotation formats it is usually built from (GFF3, GTF)
//! plus a JSON dump of [`TranscriptModel`]s.

use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

use log::{debug, warn};

use super::canonical_chromosome;
use crate::error::FerroError;
use crate::io::open_reader;
use crate::reference::transcript::{Exon, Strand, TranscriptModel};

/// Default width of a region bucket in bases
pub const DEFAULT_BUCKET_SIZE: u64 = 1_000_000;

/// A database of transcripts indexed for lookup by protein id and position
#[derive(Debug)]
pub struct TranscriptDb {
    /// Transcripts indexed by transcript id
    transcripts: HashMap<String, TranscriptModel>,
    /// Index from protein id (with and without version) to transcript id
    protein_index: HashMap<String, String>,
    /// Index from (canonical chromosome, bucket) to transcript ids
    region_index: HashMap<(String, u64), Vec<String>>,
    bucket_size: u64,
}

impl Default for TranscriptDb {
    fn default() -> Self {
        Self::with_bucket_size(DEFAULT_BUCKET_SIZE)
    }
}

impl TranscriptDb {
    /// Create a new empty transcript database
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty database with a specific bucket width
    pub fn with_bucket_size(bucket_size: u64) -> Self {
        Self {
            transcripts: HashMap::new(),
            protein_index: HashMap::new(),
            region_index: HashMap::new(),
            bucket_size: bucket_size.max(1),
        }
    }

    /// Re-index every transcript with a different bucket width
    pub fn rebucket(self, bucket_size: u64) -> Self {
        let mut db = Self::with_bucket_size(bucket_size);
        for (_, transcript) in self.transcripts {
            db.add(transcript);
        }
        db
    }

    pub fn bucket_size(&self) -> u64 {
        self.bucket_size
    }

    fn bucket(&self, pos: u64) -> u64 {
        pos / self.bucket_size
    }

    /// Add a transcript to the database
    pub fn add(&mut self, transcript: TranscriptModel) {
        let id = transcript.id.clone();

        if let Some(ref protein_id) = transcript.protein_id {
            self.index_protein(protein_id, &id);
            let bare = unversioned(protein_id);
            if bare != protein_id {
                self.index_protein(bare, &id);
            }
        }

        if let (Some(start), Some(end)) = (transcript.genomic_start(), transcript.genomic_end()) {
            let chrom = canonical_chromosome(&transcript.chromosome).to_string();
            for bucket in self.bucket(start)..=self.bucket(end) {
                let ids = self.region_index.entry((chrom.clone(), bucket)).or_default();
                if let Err(pos) = ids.binary_search(&id) {
                    ids.insert(pos, id.clone());
                }
            }
        }

        self.transcripts.insert(id, transcript);
    }

    /// Transcripts sharing a protein id resolve to the smallest transcript id,
    /// whatever order they were added in
    fn index_protein(&mut self, protein_id: &str, transcript_id: &str) {
        self.protein_index
            .entry(protein_id.to_string())
            .and_modify(|current| {
                if transcript_id < current.as_str() {
                    *current = transcript_id.to_string();
                }
            })
            .or_insert_with(|| transcript_id.to_string());
    }

    /// Get a transcript by its id
    pub fn get(&self, id: &str) -> Option<&TranscriptModel> {
        self.transcripts.get(id)
    }

    /// Get the transcript encoding a protein
    ///
    /// Accepts versioned (`ENSP0001.4`) and unversioned ids.
    pub fn get_by_protein(&self, protein_id: &str) -> Option<&TranscriptModel> {
        self.protein_index
            .get(protein_id)
            .or_else(|| self.protein_index.get(unversioned(protein_id)))
            .and_then(|id| self.transcripts.get(id))
    }

    /// Get all transcripts overlapping a genomic position
    pub fn get_by_position(&self, chrom: &str, pos: u64) -> Vec<&TranscriptModel> {
        let key = (canonical_chromosome(chrom).to_string(), self.bucket(pos));
        self.region_index
            .get(&key)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.transcripts.get(id))
                    .filter(|tx| tx.contains_genomic_pos(pos))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the transcript encoding a protein that overlaps a genomic position
    pub fn get_by_protein_at(
        &self,
        protein_id: &str,
        chrom: &str,
        pos: u64,
    ) -> Option<&TranscriptModel> {
        let bare = unversioned(protein_id);
        self.get_by_position(chrom, pos).into_iter().find(|tx| {
            tx.protein_id
                .as_deref()
                .is_some_and(|p| p == protein_id || unversioned(p) == bare)
        })
    }

    /// Get the number of transcripts
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    /// Check if the database is empty
    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Iterate over all transcripts
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TranscriptModel)> {
        self.transcripts.iter()
    }
}

fn unversioned(id: &str) -> &str {
    id.split_once('.').map(|(base, _)| base).unwrap_or(id)
}

/// GFF3 attribute parser
#[derive(Default)]
struct Gff3Attributes {
    id: Option<String>,
    parent: Option<String>,
    name: Option<String>,
    gene_name: Option<String>,
    transcript_id: Option<String>,
    protein_id: Option<String>,
}

impl Gff3Attributes {
    fn parse(attr_str: &str) -> Self {
        let mut attrs = Self::default();

        for part in attr_str.split(';') {
            let part = part.trim();
            if let Some((key, value)) = part.split_once('=') {
                let value = url_decode(value);
                match key {
                    "ID" => attrs.id = Some(value),
                    "Parent" => attrs.parent = Some(value),
                    "Name" => attrs.name = Some(value),
                    "gene" | "gene_name" => attrs.gene_name = Some(value),
                    "transcript_id" => attrs.transcript_id = Some(value),
                    "protein_id" => attrs.protein_id = Some(value),
                    _ => {}
                }
            }
        }

        attrs
    }
}

/// Simple URL decoding for GFF3 attributes
fn url_decode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            } else {
                result.push('%');
                result.push_str(&hex);
            }
        } else {
            result.push(c);
        }
    }

    result
}

fn parse_phase(s: &str) -> Option<u8> {
    s.parse::<u8>().ok().filter(|p| *p < 3)
}

fn parse_coord(s: &str, line: usize) -> Result<u64, FerroError> {
    s.parse().map_err(|_| FerroError::InvalidRecord {
        line,
        msg: format!("invalid coordinate '{}'", s),
    })
}

/// Load transcripts from a GFF3 file (plain or gzipped)
///
/// GFF3 format has tab-separated columns:
/// 1. seqid (chromosome)
/// 2. source
/// 3. type (mRNA, exon, CDS, etc.)
/// 4. start (1-based)
/// 5. end (1-based, inclusive)
/// 6. score
/// 7. strand (+/-)
/// 8. phase
/// 9. attributes (ID=..;Parent=..;protein_id=..)
pub fn load_gff3<P: AsRef<Path>>(path: P) -> Result<TranscriptDb, FerroError> {
    read_gff3(open_reader(path)?)
}

fn read_gff3<R: BufRead>(reader: R) -> Result<TranscriptDb, FerroError> {
    let mut tx_builders: HashMap<String, TranscriptBuilder> = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| FerroError::Io {
            msg: format!("Failed to read line: {}", e),
        })?;

        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            continue;
        }

        let seqid = fields[0];
        let feature_type = fields[2];
        let start = parse_coord(fields[3], idx + 1)?;
        let end = parse_coord(fields[4], idx + 1)?;
        let strand = Strand::parse(fields[6]).unwrap_or_default();
        let attrs = Gff3Attributes::parse(fields[8]);

        match feature_type {
            "mRNA" | "transcript" => {
                if let Some(id) = attrs.id.or(attrs.transcript_id) {
                    let builder = tx_builders
                        .entry(id.clone())
                        .or_insert_with(|| TranscriptBuilder::new(id, seqid, strand));
                    builder.gene_symbol = attrs.gene_name.or(attrs.name);
                }
            }
            "exon" => {
                if let Some(parent) = attrs.parent {
                    // Handle multiple parents (comma-separated)
                    for parent_id in parent.split(',') {
                        tx_builders
                            .entry(parent_id.to_string())
                            .or_insert_with(|| TranscriptBuilder::new(parent_id, seqid, strand))
                            .exons
                            .push((start, end));
                    }
                }
            }
            "CDS" => {
                if let Some(parent) = attrs.parent {
                    for parent_id in parent.split(',') {
                        let builder = tx_builders
                            .entry(parent_id.to_string())
                            .or_insert_with(|| TranscriptBuilder::new(parent_id, seqid, strand));
                        builder.cds_ranges.push((start, end, parse_phase(fields[7])));
                        if builder.protein_id.is_none() {
                            builder.protein_id = attrs.protein_id.clone();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(build_db(tx_builders))
}

/// Load transcripts from a GTF file (plain or gzipped)
///
/// GTF format is similar to GFF but uses `key "value";` attributes
pub fn load_gtf<P: AsRef<Path>>(path: P) -> Result<TranscriptDb, FerroError> {
    read_gtf(open_reader(path)?)
}

fn read_gtf<R: BufRead>(reader: R) -> Result<TranscriptDb, FerroError> {
    let mut tx_builders: HashMap<String, TranscriptBuilder> = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| FerroError::Io {
            msg: format!("Failed to read line: {}", e),
        })?;

        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            continue;
        }

        let feature_type = fields[2];
        if !matches!(feature_type, "transcript" | "exon" | "CDS") {
            continue;
        }

        let attrs = parse_gtf_attributes(fields[8]);
        let Some(transcript_id) = attrs.get("transcript_id").cloned() else {
            continue;
        };

        let seqid = fields[0];
        let start = parse_coord(fields[3], idx + 1)?;
        let end = parse_coord(fields[4], idx + 1)?;
        let strand = Strand::parse(fields[6]).unwrap_or_default();

        let builder = tx_builders
            .entry(transcript_id.clone())
            .or_insert_with(|| TranscriptBuilder::new(transcript_id, seqid, strand));
        if builder.gene_symbol.is_none() {
            builder.gene_symbol = attrs
                .get("gene_name")
                .or_else(|| attrs.get("gene_id"))
                .cloned();
        }

        match feature_type {
            "exon" => builder.exons.push((start, end)),
            "CDS" => {
                builder.cds_ranges.push((start, end, parse_phase(fields[7])));
                if builder.protein_id.is_none() {
                    builder.protein_id = attrs.get("protein_id").cloned();
                }
            }
            _ => {}
        }
    }

    Ok(build_db(tx_builders))
}

/// Load transcripts from a JSON array of [`TranscriptModel`]s (plain or gzipped)
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<TranscriptDb, FerroError> {
    let reader = open_reader(path)?;
    let transcripts: Vec<TranscriptModel> = serde_json::from_reader(reader)?;
    let mut db = TranscriptDb::new();
    for mut transcript in transcripts {
        transcript.exons.sort_by_key(|e| e.genomic_start);
        db.add(transcript);
    }
    Ok(db)
}

fn build_db(tx_builders: HashMap<String, TranscriptBuilder>) -> TranscriptDb {
    let mut db = TranscriptDb::new();
    let mut skipped = 0usize;
    let mut builders: Vec<_> = tx_builders.into_iter().collect();
    builders.sort_by(|a, b| a.0.cmp(&b.0));
    for (_, builder) in builders {
        match builder.build() {
            Some(transcript) => db.add(transcript),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("Skipped {} transcripts without exons", skipped);
    }
    db
}

/// Parse GTF attribute string
fn parse_gtf_attributes(attr_str: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();

    for part in attr_str.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        // GTF format: key "value"
        let mut iter = part.splitn(2, ' ');
        if let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            let value = value.trim_matches('"').to_string();
            attrs.insert(key.to_string(), value);
        }
    }

    attrs
}

/// Builder for constructing transcripts from annotation features
struct TranscriptBuilder {
    id: String,
    protein_id: Option<String>,
    gene_symbol: Option<String>,
    chromosome: String,
    strand: Strand,
    exons: Vec<(u64, u64)>,
    cds_ranges: Vec<(u64, u64, Option<u8>)>,
}

impl TranscriptBuilder {
    fn new(id: impl Into<String>, chromosome: &str, strand: Strand) -> Self {
        Self {
            id: id.into(),
            protein_id: None,
            gene_symbol: None,
            chromosome: chromosome.to_string(),
            strand,
            exons: Vec::new(),
            cds_ranges: Vec::new(),
        }
    }

    fn build(mut self) -> Option<TranscriptModel> {
        // CDS-only records still describe the coding exons
        if self.exons.is_empty() {
            self.exons = self.cds_ranges.iter().map(|(s, e, _)| (*s, *e)).collect();
        }
        if self.exons.is_empty() {
            return None;
        }

        let mut seen = HashSet::new();
        self.exons.retain(|range| seen.insert(*range));
        self.exons.sort_by_key(|(start, _)| *start);

        // Exons are numbered in transcript order
        let count = self.exons.len();
        let exons: Vec<Exon> = self
            .exons
            .iter()
            .enumerate()
            .map(|(i, (start, end))| {
                let number = match self.strand {
                    Strand::Plus => i + 1,
                    Strand::Minus => count - i,
                };
                Exon::new(number as u32, *start, *end)
            })
            .collect();

        let mut transcript = TranscriptModel::new(self.id, self.chromosome, self.strand, exons);
        transcript.protein_id = self.protein_id;
        transcript.gene_symbol = self.gene_symbol;

        let cds_start = self.cds_ranges.iter().map(|(s, _, _)| *s).min();
        let cds_end = self.cds_ranges.iter().map(|(_, e, _)| *e).max();
        if let (Some(cds_start), Some(cds_end)) = (cds_start, cds_end) {
            transcript = transcript.with_coding_region(cds_start, cds_end);

            // The 5'-most CDS feature carries the frame of the first codon
            let first = match self.strand {
                Strand::Plus => self.cds_ranges.iter().min_by_key(|(s, _, _)| *s),
                Strand::Minus => self.cds_ranges.iter().max_by_key(|(_, e, _)| *e),
            };
            match first.and_then(|(_, _, phase)| *phase) {
                Some(phase) => transcript = transcript.with_start_phase((3 - phase) % 3),
                None => warn!("CDS of {} has no phase, assuming 0", transcript.id),
            }
        }

        Some(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn shared_protein(id: &str, start: u64) -> TranscriptModel {
        TranscriptModel::new(id, "1", Strand::Plus, vec![Exon::new(1, start, start + 299)])
            .with_protein_id("ENSP_SHARED.1")
            .with_coding_region(start, start + 299)
    }

    #[test]
    fn test_shared_protein_id_resolution_is_order_independent() {
        for order in [["ENST_B", "ENST_A"], ["ENST_A", "ENST_B"]] {
            let mut db = TranscriptDb::with_bucket_size(1_000);
            for id in order {
                db.add(shared_protein(id, 100));
            }
            assert_eq!(db.get_by_protein("ENSP_SHARED.1").unwrap().id, "ENST_A");
            assert_eq!(db.get_by_protein("ENSP_SHARED").unwrap().id, "ENST_A");
            assert_eq!(db.get_by_protein_at("ENSP_SHARED", "1", 150).unwrap().id, "ENST_A");

            let db = db.rebucket(10);
            assert_eq!(db.get_by_protein("ENSP_SHARED").unwrap().id, "ENST_A");
        }
    }

    #[test]
    fn test_shared_protein_id_from_gff3() {
        let gff = "\
1\tens\tmRNA\t100\t399\t.\t+\t.\tID=T2
1\tens\texon\t100\t399\t.\t+\t.\tParent=T2
1\tens\tCDS\t100\t399\t.\t+\t0\tParent=T2;protein_id=P1
1\tens\tmRNA\t100\t399\t.\t+\t.\tID=T1
1\tens\texon\t100\t399\t.\t+\t.\tParent=T1
1\tens\tCDS\t100\t399\t.\t+\t0\tParent=T1;protein_id=P1
";
        let db = read_gff3(Cursor::new(gff)).unwrap();
        assert_eq!(db.get_by_protein("P1").unwrap().id, "T1");
    }

    fn make_transcript(id: &str, protein: &str, chrom: &str, start: u64, end: u64) -> TranscriptModel {
        TranscriptModel::new(id, chrom, Strand::Plus, vec![Exon::new(1, start, end)])
            .with_protein_id(protein)
            .with_coding_region(start, end)
    }

    #[test]
    fn test_transcript_db_new() {
        let db = TranscriptDb::new();
        assert!(db.is_empty());
        assert_eq!(db.bucket_size(), DEFAULT_BUCKET_SIZE);
    }

    #[test]
    fn test_transcript_db_add_and_get() {
        let mut db = TranscriptDb::new();
        db.add(make_transcript("ENST1", "ENSP1.2", "1", 100, 400));
        assert_eq!(db.len(), 1);
        assert!(db.get("ENST1").is_some());
        assert_eq!(db.get_by_protein("ENSP1.2").unwrap().id, "ENST1");
        assert_eq!(db.get_by_protein("ENSP1").unwrap().id, "ENST1");
        assert_eq!(db.get_by_protein("ENSP1.3").unwrap().id, "ENST1");
        assert!(db.get_by_protein("ENSP2").is_none());
    }

    #[test]
    fn test_get_by_position_across_buckets() {
        let mut db = TranscriptDb::with_bucket_size(100);
        db.add(make_transcript("ENST1", "ENSP1", "chr2", 150, 420));
        assert_eq!(db.get_by_position("2", 160).len(), 1);
        assert_eq!(db.get_by_position("chr2", 399).len(), 1);
        assert_eq!(db.get_by_position("2", 420).len(), 1);
        assert!(db.get_by_position("2", 421).is_empty());
        assert!(db.get_by_position("2", 149).is_empty());
        assert!(db.get_by_position("3", 160).is_empty());
    }

    #[test]
    fn test_get_by_protein_at() {
        let mut db = TranscriptDb::with_bucket_size(1000);
        db.add(make_transcript("ENST1", "ENSP1", "1", 100, 400));
        db.add(make_transcript("ENST2", "ENSP2", "1", 200, 500));
        assert_eq!(db.get_by_protein_at("ENSP2", "chr1", 300).unwrap().id, "ENST2");
        assert_eq!(db.get_by_protein_at("ENSP1.1", "1", 300).unwrap().id, "ENST1");
        assert!(db.get_by_protein_at("ENSP1", "1", 450).is_none());
    }

    #[test]
    fn test_rebucket() {
        let mut db = TranscriptDb::new();
        db.add(make_transcript("ENST1", "ENSP1", "1", 100, 400));
        let db = db.rebucket(10);
        assert_eq!(db.bucket_size(), 10);
        assert_eq!(db.get_by_position("1", 255).len(), 1);
    }

    #[test]
    fn test_parse_gtf_attributes() {
        let attrs = parse_gtf_attributes(r#"gene_id "G1"; transcript_id "T1"; protein_id "P1";"#);
        assert_eq!(attrs.get("transcript_id").unwrap(), "T1");
        assert_eq!(attrs.get("protein_id").unwrap(), "P1");
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("a%3Bb"), "a;b");
        assert_eq!(url_decode("plain"), "plain");
    }

    #[test]
    fn test_gff3_attributes_parse() {
        let attrs = Gff3Attributes::parse("ID=CDS:ENSP1;Parent=transcript:ENST1;protein_id=ENSP1");
        assert_eq!(attrs.id.as_deref(), Some("CDS:ENSP1"));
        assert_eq!(attrs.parent.as_deref(), Some("transcript:ENST1"));
        assert_eq!(attrs.protein_id.as_deref(), Some("ENSP1"));
    }

    #[test]
    fn test_read_gff3_plus_strand() {
        let gff = "\
##gff-version 3
1\tens\tmRNA\t100\t399\t.\t+\t.\tID=transcript:ENST1;Name=GENE1
1\tens\texon\t100\t199\t.\t+\t.\tParent=transcript:ENST1
1\tens\texon\t300\t399\t.\t+\t.\tParent=transcript:ENST1
1\tens\tCDS\t110\t199\t.\t+\t0\tParent=transcript:ENST1;protein_id=ENSP1
1\tens\tCDS\t300\t350\t.\t+\t0\tParent=transcript:ENST1;protein_id=ENSP1
";
        let db = read_gff3(Cursor::new(gff)).unwrap();
        let tx = db.get_by_protein("ENSP1").unwrap();
        assert_eq!(tx.id, "transcript:ENST1");
        assert_eq!(tx.gene_symbol.as_deref(), Some("GENE1"));
        assert_eq!(tx.exons.len(), 2);
        assert_eq!(tx.coding_start, Some(110));
        assert_eq!(tx.coding_end, Some(350));
        assert_eq!(tx.start_phase, 0);
    }

    #[test]
    fn test_read_gff3_minus_strand_phase() {
        let gff = "\
1\tens\tmRNA\t100\t399\t.\t-\t.\tID=T1
1\tens\texon\t100\t199\t.\t-\t.\tParent=T1
1\tens\texon\t300\t399\t.\t-\t.\tParent=T1
1\tens\tCDS\t100\t199\t.\t-\t2\tParent=T1;protein_id=P1
1\tens\tCDS\t300\t399\t.\t-\t1\tParent=T1;protein_id=P1
";
        let db = read_gff3(Cursor::new(gff)).unwrap();
        let tx = db.get("T1").unwrap();
        // 5'-most CDS on the minus strand is the 300-399 feature, GFF phase 1
        assert_eq!(tx.start_phase, 2);
        assert_eq!(tx.exons[1].number, 1);
        assert_eq!(tx.exons[0].number, 2);
    }

    #[test]
    fn test_read_gff3_invalid_coordinate() {
        let gff = "1\tens\texon\tabc\t199\t.\t+\t.\tParent=T1\n";
        let err = read_gff3(Cursor::new(gff)).unwrap_err();
        assert_eq!(
            err,
            FerroError::InvalidRecord {
                line: 1,
                msg: "invalid coordinate 'abc'".to_string()
            }
        );
    }

    #[test]
    fn test_read_gtf() {
        let gtf = "\
#!genome-build GRCh38
7\tens\ttranscript\t100\t399\t.\t+\t.\tgene_id \"G1\"; transcript_id \"ENST9\"; gene_name \"ABC\";
7\tens\texon\t100\t199\t.\t+\t.\tgene_id \"G1\"; transcript_id \"ENST9\";
7\tens\texon\t300\t399\t.\t+\t.\tgene_id \"G1\"; transcript_id \"ENST9\";
7\tens\tCDS\t100\t199\t.\t+\t0\tgene_id \"G1\"; transcript_id \"ENST9\"; protein_id \"ENSP9\";
7\tens\tCDS\t300\t396\t.\t+\t2\tgene_id \"G1\"; transcript_id \"ENST9\"; protein_id \"ENSP9\";
";
        let db = read_gtf(Cursor::new(gtf)).unwrap();
        let tx = db.get_by_protein_at("ENSP9", "chr7", 150).unwrap();
        assert_eq!(tx.id, "ENST9");
        assert_eq!(tx.gene_symbol.as_deref(), Some("ABC"));
        assert_eq!(tx.coding_end, Some(396));
        assert_eq!(tx.coding_length(), 197);
        assert_eq!(tx.translated_length(), 66);
    }

    #[test]
    fn test_cds_only_transcript() {
        let gtf = "1\tens\tCDS\t10\t30\t.\t+\t0\ttranscript_id \"T\"; protein_id \"P\";\n";
        let db = read_gtf(Cursor::new(gtf)).unwrap();
        let tx = db.get("T").unwrap();
        assert_eq!(tx.exons.len(), 1);
        assert_eq!(tx.coding_length(), 21);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcripts.json");
        let tx = make_transcript("ENST1", "ENSP1", "1", 100, 400);
        std::fs::write(&path, serde_json::to_string(&vec![tx.clone()]).unwrap()).unwrap();
        let db = load_json(&path).unwrap();
        assert_eq!(db.get("ENST1"), Some(&tx));
    }

    #[test]
    fn test_load_json_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_json(&path).unwrap_err(), FerroError::Json { .. }));
    }
}
