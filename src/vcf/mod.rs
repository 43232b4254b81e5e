//! VCF (Variant Call Format) support
//!
//! Serves known variants from a local VCF file through the
//! [`crate::variant::VariantProvider`] capability.

mod provider;

pub use provider::{VcfVariantProvider, INFO_CLNSIG, INFO_GENEINFO, INFO_MC};
