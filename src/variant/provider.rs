//! Variant provider capability
//!
//! Two kinds of provider exist: a remote query service and a local indexed
//! variant file. They expose different field schedules; see
//! [`super::fields`].

use std::fmt;

use crate::annotation::index::{IntervalIndex, RangeQueryable};
use crate::error::FerroError;
use crate::variant::record::VariantRecord;

/// Which field schedule a provider serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantSourceKind {
    /// Remote variant query service
    Remote,
    /// Local indexed variant file (e.g. a ClinVar VCF)
    LocalFile,
}

impl fmt::Display for VariantSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantSourceKind::Remote => write!(f, "remote"),
            VariantSourceKind::LocalFile => write!(f, "local file"),
        }
    }
}

/// Source of known variants overlapping a genomic interval
///
/// Calls are blocking; no timeout or retry is applied here.
pub trait VariantProvider: Send + Sync {
    /// The provider's field schedule
    fn kind(&self) -> VariantSourceKind;

    /// Variants overlapping `[start, end]` (1-based, inclusive)
    fn query(&self, chromosome: &str, start: u64, end: u64)
        -> Result<Vec<VariantRecord>, FerroError>;

    /// Fields available beyond the kind's fixed schedule
    fn extra_fields(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether records carry clinical significance terms
    fn has_clinical_significance(&self) -> bool {
        true
    }
}

impl<P: VariantProvider + ?Sized> VariantProvider for Box<P> {
    fn kind(&self) -> VariantSourceKind {
        (**self).kind()
    }

    fn query(&self, chromosome: &str, start: u64, end: u64) -> Result<Vec<VariantRecord>, FerroError> {
        (**self).query(chromosome, start, end)
    }

    fn extra_fields(&self) -> Vec<String> {
        (**self).extra_fields()
    }

    fn has_clinical_significance(&self) -> bool {
        (**self).has_clinical_significance()
    }
}

/// In-memory provider serving the remote field schedule
///
/// Stands in for the remote service in tests and adapters that prefetch
/// variants.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVariantProvider {
    index: IntervalIndex<VariantRecord>,
}

impl InMemoryVariantProvider {
    pub fn new(records: Vec<VariantRecord>) -> Self {
        let index = IntervalIndex::build(
            records
                .into_iter()
                .map(|r| (r.chromosome.clone(), r.start, r.end, r)),
        );
        Self { index }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl VariantProvider for InMemoryVariantProvider {
    fn kind(&self) -> VariantSourceKind {
        VariantSourceKind::Remote
    }

    fn query(&self, chromosome: &str, start: u64, end: u64) -> Result<Vec<VariantRecord>, FerroError> {
        self.index.range_query(chromosome, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_query() {
        let provider = InMemoryVariantProvider::new(vec![
            VariantRecord::new("rs1", "chr7", 100, 100),
            VariantRecord::new("rs2", "7", 150, 152),
            VariantRecord::new("rs3", "8", 100, 100),
        ]);
        assert_eq!(provider.len(), 3);
        let ids: Vec<_> = provider
            .query("7", 99, 151)
            .unwrap()
            .into_iter()
            .map(|r| r.identifier)
            .collect();
        assert_eq!(ids, vec!["rs1", "rs2"]);
        assert!(provider.query("7", 200, 300).unwrap().is_empty());
        assert_eq!(provider.kind(), VariantSourceKind::Remote);
    }

    #[test]
    fn test_boxed_provider() {
        let provider: Box<dyn VariantProvider> = Box::new(InMemoryVariantProvider::default());
        assert!(provider.extra_fields().is_empty());
        assert!(provider.has_clinical_significance());
        assert_eq!(provider.kind().to_string(), "remote");
    }
}
