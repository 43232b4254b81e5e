//! Transcript source trait
//!
//! Defines the interface for resolving a protein id to its transcript model.

use std::sync::Arc;

use crate::error::FerroError;
use crate::reference::loader::TranscriptDb;
use crate::reference::transcript::TranscriptModel;

/// Trait for sources of transcript models
///
/// Implementations might include:
/// - TranscriptDb for local GFF3/GTF/JSON annotation
/// - MockTranscriptSource for testing
/// - A remote adapter over a REST annotation service
///
/// Calls are blocking. Failures of the underlying service are reported as
/// [`FerroError::Provider`] and are not retried.
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript encoding a protein
    ///
    /// Returns `Ok(None)` when the source knows nothing about the protein.
    fn fetch(&self, protein_id: &str) -> Result<Option<TranscriptModel>, FerroError>;
}

impl TranscriptSource for TranscriptDb {
    fn fetch(&self, protein_id: &str) -> Result<Option<TranscriptModel>, FerroError> {
        Ok(self.get_by_protein(protein_id).cloned())
    }
}

/// Blanket implementation for boxed trait objects
impl TranscriptSource for Box<dyn TranscriptSource> {
    fn fetch(&self, protein_id: &str) -> Result<Option<TranscriptModel>, FerroError> {
        (**self).fetch(protein_id)
    }
}

impl<T: TranscriptSource + ?Sized> TranscriptSource for Arc<T> {
    fn fetch(&self, protein_id: &str) -> Result<Option<TranscriptModel>, FerroError> {
        (**self).fetch(protein_id)
    }
}
