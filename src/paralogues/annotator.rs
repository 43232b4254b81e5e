//! Paralogue variant lookup for a single reference variant
//!
//! For each homology record overlapping the variant the annotator rebuilds
//! the pairwise alignment, maps the reference residue to its correspondent
//! paralogue residue, resolves the paralogue transcript, converts the
//! residue to a genomic interval and fetches the known variants there.
//!
//! Per-pair outcomes:
//!
//! | Outcome | Handling |
//! |---------|----------|
//! | Malformed encoding | pair skipped, `warn!` |
//! | Residue out of range | pair skipped, `debug!` |
//! | Correspondent column is a gap | pair skipped, `trace!` |
//! | Transcript not found | error returned |
//! | Store or provider failure | error returned |

use log::{debug, trace, warn};
use serde::Serialize;

use crate::alignment::{ColumnResidue, MatchType, PairwiseAlignment};
use crate::annotation::{AnnotationStore, HomologyRecord, IntervalIndex, RangeQueryable};
use crate::clinvar::ClinicalSignificanceFilter;
use crate::convert::{CoordinateMapper, GenomicInterval};
use crate::error::{ConfigurationKind, FerroError};
use crate::reference::TranscriptResolver;
use crate::variant::{VariantProvider, VariantRecord};

/// A variant affecting one residue of a reference protein
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceVariant {
    /// Reference protein id, versioned or not
    pub protein_id: String,
    /// Affected residue (1-based)
    pub residue: u64,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    /// Reference protein sequence, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_sequence: Option<String>,
}

impl ReferenceVariant {
    pub fn new(
        protein_id: impl Into<String>,
        residue: u64,
        chromosome: impl Into<String>,
        start: u64,
        end: u64,
    ) -> Self {
        Self {
            protein_id: protein_id.into(),
            residue,
            chromosome: chromosome.into(),
            start,
            end,
            reference_sequence: None,
        }
    }

    pub fn with_reference_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.reference_sequence = Some(sequence.into());
        self
    }

    fn reference_aa(&self) -> Option<char> {
        let index = usize::try_from(self.residue.checked_sub(1)?).ok()?;
        self.reference_sequence.as_ref()?.chars().nth(index)
    }
}

/// One EXACT-mapped paralogue position and the variants found there
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParalogueHit {
    pub homology_id: String,
    /// Versioned paralogue protein id
    pub paralogue_protein_id: String,
    pub reference_residue: u64,
    pub paralogue_residue: u64,
    /// Genomic span of the paralogue residue's codon
    pub interval: GenomicInterval,
    pub perc_cov: f64,
    pub perc_pos: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_aa: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paralogue_aa: Option<char>,
    /// Variants overlapping `interval` that pass the clinical filter
    pub variants: Vec<VariantRecord>,
}

/// Maps reference variants onto their paralogues and collects known variants
pub struct ParalogueAnnotator<Q = IntervalIndex<HomologyRecord>> {
    store: AnnotationStore<Q>,
    resolver: TranscriptResolver,
    provider: Box<dyn VariantProvider>,
    filter: ClinicalSignificanceFilter,
}

impl<Q: RangeQueryable<HomologyRecord>> ParalogueAnnotator<Q> {
    /// Assemble an annotator
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the clinical filter is active but
    /// the provider's records carry no clinical significance.
    pub fn new(
        store: AnnotationStore<Q>,
        resolver: TranscriptResolver,
        provider: Box<dyn VariantProvider>,
        filter: ClinicalSignificanceFilter,
    ) -> Result<Self, FerroError> {
        if filter.is_active() && !provider.has_clinical_significance() {
            return Err(FerroError::config_kind(
                ConfigurationKind::MissingColumn,
                format!(
                    "clinical significance filter configured but the {} variant source has no clinical significance column",
                    provider.kind()
                ),
            ));
        }
        Ok(Self {
            store,
            resolver,
            provider,
            filter,
        })
    }

    pub fn provider(&self) -> &dyn VariantProvider {
        self.provider.as_ref()
    }

    pub fn resolver(&self) -> &TranscriptResolver {
        &self.resolver
    }

    /// All EXACT-mapped paralogue positions for `variant`
    ///
    /// An empty result is normal. Skippable per-pair errors are logged and
    /// dropped; anything else aborts.
    pub fn annotate(&self, variant: &ReferenceVariant) -> Result<Vec<ParalogueHit>, FerroError> {
        let records = self.store.query(
            &variant.protein_id,
            &variant.chromosome,
            variant.start,
            variant.end,
        )?;

        let mut hits = Vec::new();
        for record in &records {
            match self.annotate_pair(variant, record) {
                Ok(Some(hit)) => hits.push(hit),
                Ok(None) => {}
                Err(e @ FerroError::Encoding { .. }) => {
                    warn!("Skipping homology {}: {}", record.homology_id, e);
                }
                Err(e) if e.is_skippable() => {
                    debug!("Skipping homology {}: {}", record.homology_id, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(hits)
    }

    fn annotate_pair(
        &self,
        variant: &ReferenceVariant,
        record: &HomologyRecord,
    ) -> Result<Option<ParalogueHit>, FerroError> {
        let alignment = build_alignment(record, variant.reference_sequence.clone())?;

        let correspondent =
            alignment.correspondent_residue(&record.reference.stable_id, variant.residue)?;
        let paralogue_residue = match correspondent {
            ColumnResidue {
                residue,
                match_type: MatchType::Exact,
            } => residue,
            ColumnResidue {
                match_type: MatchType::Gap,
                ..
            } => {
                trace!(
                    "{} residue {} aligns to a gap in {}",
                    variant.protein_id,
                    variant.residue,
                    record.paralogue.stable_id
                );
                return Ok(None);
            }
        };

        let paralogue_id = record.paralogue.versioned_id();
        let anchor = alignment.anchor(&record.paralogue.stable_id);
        let transcript = self.resolver.resolve(
            &paralogue_id,
            anchor.map(|a| a.chromosome.as_str()),
            anchor.map(|a| a.genomic_start),
        )?;

        let interval = CoordinateMapper::new(&transcript).translate_peptide_to_genomic(paralogue_residue)?;

        let variants: Vec<VariantRecord> = self
            .provider
            .query(&interval.chromosome, interval.start, interval.end)?
            .into_iter()
            .filter(|v| self.filter.matches(&v.clinical_significance))
            .collect();

        debug!(
            "{}:{} maps to {}:{} at {} ({} variants)",
            variant.protein_id,
            variant.residue,
            paralogue_id,
            paralogue_residue,
            interval,
            variants.len()
        );

        Ok(Some(ParalogueHit {
            homology_id: record.homology_id.clone(),
            paralogue_protein_id: paralogue_id,
            reference_residue: variant.residue,
            paralogue_residue,
            interval,
            perc_cov: record.perc_cov,
            perc_pos: record.perc_pos,
            reference_aa: variant.reference_aa(),
            paralogue_aa: transcript.residue_at(paralogue_residue),
            variants,
        }))
    }
}

/// Pairwise alignment of a homology record with stats and anchors attached
pub fn build_alignment(
    record: &HomologyRecord,
    reference_sequence: Option<String>,
) -> Result<PairwiseAlignment, FerroError> {
    let alignment = record
        .alignment_source(reference_sequence, None)
        .into_alignment()?;
    Ok(alignment
        .with_stats(record.reference.stable_id.clone(), record.stats())
        .with_anchor(record.reference.stable_id.clone(), record.reference.anchor())
        .with_anchor(record.paralogue.stable_id.clone(), record.paralogue.anchor()))
}
