//! Transcript reference data
//!
//! Provides transcript models, a region-bucketed local transcript database,
//! the transcript source trait, and the memoizing resolver used to find the
//! transcript behind a protein id.

pub mod loader;
pub mod mock;
pub mod provider;
pub mod resolver;
pub mod transcript;

pub use loader::{load_gff3, load_gtf, load_json, TranscriptDb, DEFAULT_BUCKET_SIZE};
pub use mock::MockTranscriptSource;
pub use provider::TranscriptSource;
pub use resolver::TranscriptResolver;
pub use transcript::{CodingSegment, Exon, Strand, TranscriptModel};

/// Chromosome name without a `chr` prefix, with `M` spelled `MT`
///
/// `chr1` and `1` compare equal after canonicalization.
pub fn canonical_chromosome(name: &str) -> &str {
    let stripped = ["chr", "Chr", "CHR"]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name);
    if stripped == "M" {
        "MT"
    } else {
        stripped
    }
}
