//! Protein id to transcript resolution
//!
//! Resolution order for a protein id:
//!
//! 1. The [`TranscriptCache`]
//! 2. The local [`TranscriptDb`], by position when a hint is given, then by id
//! 3. The remote [`TranscriptSource`], unless local-only mode is on
//!
//! Successful resolutions are cached for the lifetime of the resolver.

use std::sync::Arc;

use log::debug;

use crate::cache::{CacheStats, TranscriptCache};
use crate::error::FerroError;
use crate::reference::loader::TranscriptDb;
use crate::reference::provider::TranscriptSource;
use crate::reference::transcript::TranscriptModel;

const LOCAL_ONLY_HINT: &str =
    "not found in the local transcript annotation; remote lookup requires disabling local-only mode";
const NOT_FOUND_HINT: &str = "not found in the local transcript annotation or the remote source";

/// Resolves protein ids to shared, memoized transcript models
pub struct TranscriptResolver {
    local: Option<TranscriptDb>,
    remote: Option<Box<dyn TranscriptSource>>,
    local_only: bool,
    cache: Arc<TranscriptCache>,
}

impl TranscriptResolver {
    /// Create a resolver over a local database, in local-only mode
    pub fn new(local: TranscriptDb) -> Self {
        Self {
            local: Some(local),
            remote: None,
            local_only: true,
            cache: Arc::new(TranscriptCache::new()),
        }
    }

    /// Create a resolver that only consults a remote source
    pub fn remote_only(remote: Box<dyn TranscriptSource>) -> Self {
        Self {
            local: None,
            remote: Some(remote),
            local_only: false,
            cache: Arc::new(TranscriptCache::new()),
        }
    }

    /// Attach a remote source and leave local-only mode
    pub fn with_remote(mut self, remote: Box<dyn TranscriptSource>) -> Self {
        self.remote = Some(remote);
        self.local_only = false;
        self
    }

    /// Set local-only mode; the remote source is kept but not consulted
    pub fn with_local_only(mut self, local_only: bool) -> Self {
        self.local_only = local_only;
        self
    }

    /// Share a cache with other resolvers
    pub fn with_cache(mut self, cache: Arc<TranscriptCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn is_local_only(&self) -> bool {
        self.local_only
    }

    /// Statistics of the underlying cache
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve a protein id to its transcript model
    ///
    /// `hint_chromosome`/`hint_position` locate the protein on the genome and
    /// enable the bucketed positional lookup.
    ///
    /// # Errors
    ///
    /// Returns [`FerroError::TranscriptNotFound`] when no source yields a
    /// model; the message says whether disabling local-only mode could help.
    /// Remote failures propagate unchanged.
    pub fn resolve(
        &self,
        protein_id: &str,
        hint_chromosome: Option<&str>,
        hint_position: Option<u64>,
    ) -> Result<Arc<TranscriptModel>, FerroError> {
        let resolved = self.cache.get_or_try_insert_with(protein_id, || {
            if let Some(tx) = self.lookup_local(protein_id, hint_chromosome, hint_position) {
                debug!("Resolved {} locally to {}", protein_id, tx.id);
                return Ok(Some(tx.clone()));
            }
            match (&self.remote, self.local_only) {
                (Some(remote), false) => {
                    debug!("Resolving {} through the remote source", protein_id);
                    remote.fetch(protein_id)
                }
                _ => Ok(None),
            }
        })?;

        resolved.ok_or_else(|| FerroError::TranscriptNotFound {
            protein_id: protein_id.to_string(),
            hint: if self.local_only {
                LOCAL_ONLY_HINT.to_string()
            } else {
                NOT_FOUND_HINT.to_string()
            },
        })
    }

    fn lookup_local(
        &self,
        protein_id: &str,
        hint_chromosome: Option<&str>,
        hint_position: Option<u64>,
    ) -> Option<&TranscriptModel> {
        let db = self.local.as_ref()?;
        if let (Some(chrom), Some(pos)) = (hint_chromosome, hint_position) {
            if let Some(tx) = db.get_by_protein_at(protein_id, chrom, pos) {
                return Some(tx);
            }
        }
        db.get_by_protein(protein_id)
    }
}
