//! In-process interval index
//!
//! A per-chromosome binary interval search: entries are sorted by start and
//! a query starts its scan at the first entry that could reach the query,
//! found by binary search on `start - max_len`.
//!
//! # Coordinate System
//!
//! Intervals and queries are **1-based inclusive**. Chromosome names are
//! compared after [`canonical_chromosome`], so `chr1` and `1` match.

use std::collections::HashMap;

use crate::error::FerroError;
use crate::reference::canonical_chromosome;

/// Capability to fetch every value whose interval overlaps a range
///
/// The index may be in-process or backed by an external service; either way
/// the call is blocking and failures are returned unmodified.
pub trait RangeQueryable<T>: Send + Sync {
    /// Values overlapping `[start, end]` on `chromosome`, in the source's natural order
    fn range_query(&self, chromosome: &str, start: u64, end: u64) -> Result<Vec<T>, FerroError>;
}

impl<T, Q: RangeQueryable<T> + ?Sized> RangeQueryable<T> for Box<Q> {
    fn range_query(&self, chromosome: &str, start: u64, end: u64) -> Result<Vec<T>, FerroError> {
        (**self).range_query(chromosome, start, end)
    }
}

/// An interval with an attached value
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalEntry<T> {
    pub start: u64,
    pub end: u64,
    pub value: T,
}

#[derive(Debug, Clone)]
struct ChromIndex<T> {
    entries: Vec<IntervalEntry<T>>,
    max_len: u64,
}

impl<T> ChromIndex<T> {
    fn new(mut entries: Vec<IntervalEntry<T>>) -> Self {
        // Stable sort keeps insertion order among equal starts
        entries.sort_by_key(|e| e.start);
        let max_len = entries
            .iter()
            .map(|e| e.end.saturating_sub(e.start))
            .max()
            .unwrap_or(0);
        Self { entries, max_len }
    }

    fn find(&self, start: u64, end: u64) -> impl Iterator<Item = &IntervalEntry<T>> {
        let lower = start.saturating_sub(self.max_len);
        let offset = self.entries.partition_point(|e| e.start < lower);
        self.entries[offset..]
            .iter()
            .take_while(move |e| e.start <= end)
            .filter(move |e| e.end >= start)
    }
}

/// Genome-wide interval index keyed by chromosome
#[derive(Debug, Clone)]
pub struct IntervalIndex<T> {
    chroms: HashMap<String, ChromIndex<T>>,
    len: usize,
}

impl<T> Default for IntervalIndex<T> {
    fn default() -> Self {
        Self {
            chroms: HashMap::new(),
            len: 0,
        }
    }
}

impl<T> IntervalIndex<T> {
    /// Build an index from `(chromosome, start, end, value)` tuples
    pub fn build<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, u64, u64, T)>,
        S: AsRef<str>,
    {
        let mut grouped: HashMap<String, Vec<IntervalEntry<T>>> = HashMap::new();
        let mut len = 0;
        for (chrom, start, end, value) in items {
            grouped
                .entry(canonical_chromosome(chrom.as_ref()).to_string())
                .or_default()
                .push(IntervalEntry {
                    start: start.min(end),
                    end: start.max(end),
                    value,
                });
            len += 1;
        }

        let chroms = grouped
            .into_iter()
            .map(|(chrom, entries)| (chrom, ChromIndex::new(entries)))
            .collect();
        Self { chroms, len }
    }

    /// Entries overlapping `[start, end]`, sorted by start
    pub fn find(&self, chromosome: &str, start: u64, end: u64) -> Vec<&IntervalEntry<T>> {
        self.chroms
            .get(canonical_chromosome(chromosome))
            .map(|index| index.find(start, end).collect())
            .unwrap_or_default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Chromosomes present in the index (canonical names)
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.chroms.keys().map(String::as_str)
    }
}

impl<T: Clone + Send + Sync> RangeQueryable<T> for IntervalIndex<T> {
    fn range_query(&self, chromosome: &str, start: u64, end: u64) -> Result<Vec<T>, FerroError> {
        Ok(self
            .find(chromosome, start, end)
            .into_iter()
            .map(|e| e.value.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_index() -> IntervalIndex<&'static str> {
        IntervalIndex::build(vec![
            ("chr1", 100, 150, "a"),
            ("1", 200, 250, "b"),
            ("1", 225, 275, "c"),
            ("1", 10, 1000, "long"),
            ("2", 100, 150, "other"),
        ])
    }

    #[test]
    fn test_find_overlaps() {
        let index = make_index();
        let hits: Vec<_> = index.find("1", 210, 240).iter().map(|e| e.value).collect();
        assert_eq!(hits, vec!["long", "b", "c"]);
    }

    #[test]
    fn test_find_is_inclusive() {
        let index = make_index();
        let hits: Vec<_> = index.find("chr1", 150, 150).iter().map(|e| e.value).collect();
        assert_eq!(hits, vec!["long", "a"]);
        let hits: Vec<_> = index.find("1", 276, 276).iter().map(|e| e.value).collect();
        assert_eq!(hits, vec!["long"]);
    }

    #[test]
    fn test_find_uses_max_len() {
        let index = make_index();
        // Only the long interval reaches this far
        let hits: Vec<_> = index.find("1", 900, 950).iter().map(|e| e.value).collect();
        assert_eq!(hits, vec!["long"]);
    }

    #[test]
    fn test_chromosome_alias() {
        let index = make_index();
        assert_eq!(index.find("chr2", 120, 130).len(), 1);
        assert!(index.find("3", 120, 130).is_empty());
    }

    #[test]
    fn test_range_query() {
        let index = make_index();
        assert_eq!(index.range_query("2", 1, 100).unwrap(), vec!["other"]);
        assert_eq!(index.len(), 5);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_reversed_interval_normalized() {
        let index = IntervalIndex::build(vec![("1", 50, 10, 1u8)]);
        assert_eq!(index.find("1", 20, 20).len(), 1);
    }

    #[test]
    fn test_empty_index() {
        let index: IntervalIndex<u8> = IntervalIndex::default();
        assert!(index.find("1", 1, 10).is_empty());
        assert!(index.is_empty());
    }
}
