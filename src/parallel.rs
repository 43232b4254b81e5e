//! Parallel paralogue annotation using rayon
//!
//! Each reference variant is processed independently; the only shared
//! mutable state is the transcript cache, which tolerates concurrent first
//! inserts. Enable with the `parallel` feature.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() -> Result<(), ferro_paralogues::FerroError> {
//! use ferro_paralogues::annotation::{AnnotationStore, HomologyFilter};
//! use ferro_paralogues::clinvar::ClinicalSignificanceFilter;
//! use ferro_paralogues::parallel::annotate_batch;
//! use ferro_paralogues::paralogues::{ParalogueAnnotator, ReferenceVariant};
//! use ferro_paralogues::reference::{MockTranscriptSource, TranscriptResolver};
//! use ferro_paralogues::variant::InMemoryVariantProvider;
//!
//! let store = AnnotationStore::from_file("homologies.tsv.gz", HomologyFilter::default())?;
//! let resolver = TranscriptResolver::remote_only(Box::new(MockTranscriptSource::with_test_data()));
//! let annotator = ParalogueAnnotator::new(
//!     store,
//!     resolver,
//!     Box::new(InMemoryVariantProvider::default()),
//!     ClinicalSignificanceFilter::accept_all(),
//! )?;
//!
//! let variants = vec![ReferenceVariant::new("ENSP00000000002", 10, "12", 1050, 1050)];
//! let results = annotate_batch(&annotator, &variants);
//! assert_eq!(results.len(), 1);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::annotation::{HomologyRecord, RangeQueryable};
use crate::error::FerroError;
use crate::paralogues::{ParalogueAnnotator, ParalogueHit, ReferenceVariant};

/// Annotate many variants in parallel
///
/// Returns one result per input variant. Order is preserved.
pub fn annotate_batch<Q: RangeQueryable<HomologyRecord>>(
    annotator: &ParalogueAnnotator<Q>,
    variants: &[ReferenceVariant],
) -> Vec<Result<Vec<ParalogueHit>, FerroError>> {
    variants.par_iter().map(|v| annotator.annotate(v)).collect()
}

/// Annotate many variants in parallel, keeping per-batch statistics
pub fn annotate_batch_with_stats<Q: RangeQueryable<HomologyRecord>>(
    annotator: &ParalogueAnnotator<Q>,
    variants: &[ReferenceVariant],
) -> (Vec<Result<Vec<ParalogueHit>, FerroError>>, ParallelStats) {
    let results = annotate_batch(annotator, variants);
    let mut stats = ParallelStats {
        total: results.len(),
        ..Default::default()
    };
    for result in &results {
        match result {
            Ok(hits) if hits.is_empty() => stats.success += 1,
            Ok(_) => {
                stats.success += 1;
                stats.annotated += 1;
            }
            Err(_) => stats.errors += 1,
        }
    }
    (results, stats)
}

/// Statistics from parallel processing
#[derive(Debug, Clone, Default)]
pub struct ParallelStats {
    /// Total variants processed
    pub total: usize,
    /// Variants processed without error
    pub success: usize,
    /// Variants with at least one paralogue hit
    pub annotated: usize,
    /// Variants that failed
    pub errors: usize,
}

impl ParallelStats {
    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }
}
