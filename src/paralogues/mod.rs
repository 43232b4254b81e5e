//! Paralogue annotation pipeline
//!
//! [`ParalogueAnnotator`] finds the known variants at positions equivalent
//! to a reference variant in paralogous proteins; [`ParalogueAnnotation`]
//! lays the results out as output keys.

mod annotator;
mod output;

pub use annotator::{build_alignment, ParalogueAnnotator, ParalogueHit, ReferenceVariant};
pub use output::{OutputMode, ParalogueAnnotation, KEY_REGIONS, KEY_VARIANTS};
