// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-paralogues: known variants at paralogous protein positions
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Given a variant hitting a residue of one protein, finds the proteins
//! paralogous to it over an aligned region, maps the residue through the
//! pairwise alignment, converts the correspondent residue to genomic
//! coordinates and reports the known variants found there.
//!
//! # Example
//!
//! ```
//! use ferro_paralogues::{AlignedSequence, MatchType, PairwiseAlignment};
//!
//! let alignment = PairwiseAlignment::new(
//!     AlignedSequence::new("ENSP_A", ferro_paralogues::alignment::reconstruct("MKLVA", "5M").unwrap()),
//!     AlignedSequence::new("ENSP_B", ferro_paralogues::alignment::reconstruct("MKVA", "2M1D2M").unwrap()),
//! )
//! .unwrap();
//!
//! // Residue 3 of ENSP_A sits opposite a gap in ENSP_B
//! let hit = alignment.correspondent_residue("ENSP_A", 3).unwrap();
//! assert_eq!(hit.match_type, MatchType::Gap);
//!
//! // Residue 4 maps to residue 3
//! let hit = alignment.correspondent_residue("ENSP_A", 4).unwrap();
//! assert_eq!(hit.exact(), Some(3));
//! ```

pub mod alignment;
pub mod annotation;
pub mod cache;
pub mod clinvar;
pub mod config;
pub mod convert;
pub mod error;
pub mod io;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod paralogues;
pub mod reference;
pub mod variant;
pub mod vcf;

// Re-export commonly used types
pub use alignment::{AlignedSequence, AlignmentEncoding, AlignmentSource, MatchType, PairwiseAlignment};
pub use annotation::{AnnotationStore, HomologyFilter, HomologyRecord, IntervalIndex, RangeQueryable};
pub use cache::TranscriptCache;
pub use clinvar::{ClinicalFilterSpec, ClinicalSignificanceFilter, MatchMode};
pub use config::ParalogueConfig;
pub use convert::{CoordinateMapper, GenomicInterval};
pub use error::FerroError;
pub use paralogues::{OutputMode, ParalogueAnnotation, ParalogueAnnotator, ParalogueHit, ReferenceVariant};
pub use reference::{TranscriptDb, TranscriptModel, TranscriptResolver, TranscriptSource};
pub use variant::{VariantFieldExtractor, VariantProvider, VariantRecord, VariantSourceKind};
pub use vcf::VcfVariantProvider;

/// Result type alias for ferro-paralogues operations
pub type Result<T> = std::result::Result<T, FerroError>;
