//! Clinical significance term parsing
//!
//! ClinVar VCF `CLNSIG` values pack several classifications into one field,
//! e.g. `Pathogenic/Likely_pathogenic|_risk_factor`. They are split into
//! separate human-readable terms before filtering.

use std::collections::BTreeSet;

/// Split a packed clinical significance value into terms
///
/// Separators are `/`, `|`, `,` and `;`. Underscores become spaces, terms are
/// trimmed, and empty or `.` terms are dropped.
pub fn parse_clnsig(value: &str) -> BTreeSet<String> {
    value
        .split(['/', '|', ',', ';'])
        .map(|term| term.replace('_', " ").trim().to_string())
        .filter(|term| !term.is_empty() && term != ".")
        .collect()
}
