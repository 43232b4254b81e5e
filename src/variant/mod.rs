//! Known variants at paralogue positions
//!
//! Variant records, the provider capability that fetches them by genomic
//! interval, and the projection of records onto output fields.

pub mod fields;
pub mod provider;
pub mod record;

pub use fields::{sanitize, VariantFieldExtractor, DEFAULT_FIELDS, LOCAL_FIELDS, MISSING_VALUE, REMOTE_FIELDS};
pub use provider::{InMemoryVariantProvider, VariantProvider, VariantSourceKind};
pub use record::VariantRecord;
