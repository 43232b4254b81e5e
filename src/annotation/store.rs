//! Range-query access to homology records
//!
//! The store wraps any [`RangeQueryable`] source of [`HomologyRecord`]s and
//! applies the protein-id match and the coverage/positivity thresholds after
//! fetching.

use std::io::BufRead;
use std::path::Path;

use log::{debug, info, warn};

use super::index::{IntervalIndex, RangeQueryable};
use super::record::{HomologyRecord, HOMOLOGY_COLUMNS};
use crate::error::FerroError;
use crate::io::open_reader;

/// Default minimum alignment coverage (percent)
pub const DEFAULT_MIN_PERC_COV: f64 = 0.0;
/// Default minimum alignment positivity (percent)
pub const DEFAULT_MIN_PERC_POS: f64 = 50.0;

/// Thresholds applied to fetched homology records
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomologyFilter {
    pub min_perc_cov: f64,
    pub min_perc_pos: f64,
}

impl Default for HomologyFilter {
    fn default() -> Self {
        Self {
            min_perc_cov: DEFAULT_MIN_PERC_COV,
            min_perc_pos: DEFAULT_MIN_PERC_POS,
        }
    }
}

impl HomologyFilter {
    /// Whether a record passes both thresholds
    pub fn accepts(&self, record: &HomologyRecord) -> bool {
        record.perc_cov >= self.min_perc_cov && record.perc_pos >= self.min_perc_pos
    }
}

/// Row counts from loading a homology table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows parsed into records
    pub loaded: usize,
    /// Malformed rows that were skipped
    pub skipped: usize,
}

/// Homology records keyed by reference protein and genomic interval
pub struct AnnotationStore<Q = IntervalIndex<HomologyRecord>> {
    source: Q,
    filter: HomologyFilter,
    load_stats: LoadStats,
}

impl AnnotationStore<IntervalIndex<HomologyRecord>> {
    /// Load a homology table (plain or gzipped) into an in-process index
    ///
    /// Malformed rows are skipped and counted in [`AnnotationStore::load_stats`].
    pub fn from_file<P: AsRef<Path>>(path: P, filter: HomologyFilter) -> Result<Self, FerroError> {
        let path = path.as_ref();
        let (index, stats) = load_homology_table(path)?;
        info!(
            "Loaded {} homology records from {} ({} malformed rows skipped)",
            stats.loaded,
            path.display(),
            stats.skipped
        );
        Ok(Self::new(index, filter).with_load_stats(stats))
    }
}

impl<Q: RangeQueryable<HomologyRecord>> AnnotationStore<Q> {
    pub fn new(source: Q, filter: HomologyFilter) -> Self {
        Self {
            source,
            filter,
            load_stats: LoadStats::default(),
        }
    }

    pub fn with_load_stats(mut self, stats: LoadStats) -> Self {
        self.load_stats = stats;
        self
    }

    pub fn filter(&self) -> &HomologyFilter {
        &self.filter
    }

    pub fn load_stats(&self) -> LoadStats {
        self.load_stats
    }

    /// Records whose reference protein is `protein_id` and whose reference
    /// region intersects `[start, end]`, passing the thresholds
    ///
    /// Source failures propagate unchanged.
    pub fn query(
        &self,
        protein_id: &str,
        chromosome: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<HomologyRecord>, FerroError> {
        let fetched = self.source.range_query(chromosome, start, end)?;
        let total = fetched.len();
        let records: Vec<HomologyRecord> = fetched
            .into_iter()
            .filter(|r| r.reference.matches_id(protein_id))
            .filter(|r| r.reference.overlaps(chromosome, start, end))
            .filter(|r| self.filter.accepts(r))
            .collect();
        debug!(
            "{} of {} homology records kept for {} at {}:{}-{}",
            records.len(),
            total,
            protein_id,
            chromosome,
            start,
            end
        );
        Ok(records)
    }
}

/// Read a homology table into an interval index over reference regions
///
/// The first line must be the header; lines starting with `#` are skipped.
/// Rows that fail to parse are logged and skipped; a missing header or a
/// read failure aborts the load.
pub fn load_homology_table<P: AsRef<Path>>(
    path: P,
) -> Result<(IntervalIndex<HomologyRecord>, LoadStats), FerroError> {
    read_homology_table(open_reader(path)?)
}

pub(crate) fn read_homology_table<R: BufRead>(
    reader: R,
) -> Result<(IntervalIndex<HomologyRecord>, LoadStats), FerroError> {
    let mut records = Vec::new();
    let mut stats = LoadStats::default();
    let mut header_seen = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        if !header_seen {
            header_seen = true;
            let first = line.trim_start_matches('#').split('\t').next().unwrap_or("");
            if first.trim() == HOMOLOGY_COLUMNS[0] {
                continue;
            }
            return Err(FerroError::InvalidRecord {
                line: line_no,
                msg: format!("expected a header starting with '{}'", HOMOLOGY_COLUMNS[0]),
            });
        }
        if line.starts_with('#') {
            continue;
        }

        let record = match HomologyRecord::from_tsv_line(&line, line_no) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping homology row: {}", e);
                stats.skipped += 1;
                continue;
            }
        };
        stats.loaded += 1;
        records.push((
            record.reference.chromosome.clone(),
            record.reference.start,
            record.reference.end,
            record,
        ));
    }

    Ok((IntervalIndex::build(records), stats))
}
