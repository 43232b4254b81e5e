//! Mock transcript source for testing

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::FerroError;
use crate::reference::provider::TranscriptSource;
use crate::reference::transcript::{Exon, Strand, TranscriptModel};

/// Mock transcript source keyed by protein id
///
/// Counts calls to [`TranscriptSource::fetch`] so tests can check memoization,
/// and can be told to fail like an unavailable remote service.
#[derive(Default)]
pub struct MockTranscriptSource {
    transcripts: HashMap<String, TranscriptModel>,
    calls: AtomicUsize,
    failure: Option<String>,
}

impl MockTranscriptSource {
    /// Create an empty mock source
    pub fn new() -> Self {
        Self::default()
    }

    /// Load transcripts from a JSON file
    pub fn from_json(path: &Path) -> Result<Self, FerroError> {
        let content = std::fs::read_to_string(path)?;
        let transcripts: Vec<TranscriptModel> = serde_json::from_str(&content)?;

        let mut source = Self::new();
        for tx in transcripts {
            source.add_transcript(tx);
        }
        Ok(source)
    }

    /// Add a transcript, keyed by its protein id (or transcript id if none)
    pub fn add_transcript(&mut self, transcript: TranscriptModel) {
        let key = transcript
            .protein_id
            .clone()
            .unwrap_or_else(|| transcript.id.clone());
        self.transcripts.insert(key, transcript);
    }

    /// Make every fetch fail with a provider error
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            failure: Some(msg.into()),
            ..Self::default()
        }
    }

    /// Number of fetch calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Create a source with a two-exon forward-strand and a minus-strand transcript
    pub fn with_test_data() -> Self {
        let mut source = Self::new();

        source.add_transcript(
            TranscriptModel::new(
                "ENST00000000001",
                "7",
                Strand::Plus,
                vec![Exon::new(1, 100, 199), Exon::new(2, 300, 399)],
            )
            .with_protein_id("ENSP00000000001")
            .with_coding_region(100, 399),
        );

        source.add_transcript(
            TranscriptModel::new(
                "ENST00000000002",
                "12",
                Strand::Minus,
                vec![Exon::new(2, 1000, 1099), Exon::new(1, 2000, 2099)],
            )
            .with_protein_id("ENSP00000000002")
            .with_coding_region(1000, 2099),
        );

        source
    }
}

impl TranscriptSource for MockTranscriptSource {
    fn fetch(&self, protein_id: &str) -> Result<Option<TranscriptModel>, FerroError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(ref msg) = self.failure {
            return Err(FerroError::Provider { msg: msg.clone() });
        }
        Ok(self.transcripts.get(protein_id).cloned())
    }
}
