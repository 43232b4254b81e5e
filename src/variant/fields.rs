//! Output field selection and formatting
//!
//! Each provider kind has a fixed schedule of field names; local files add
//! the INFO keys declared in their header. Values are sanitized so the
//! colon-joined output stays parseable:
//!
//! | Character | Replacement |
//! |-----------|-------------|
//! | `,` | space |
//! | `:` | `_` |
//! | `\|` | `_` |

use crate::error::{ConfigurationKind, FerroError};
use crate::variant::provider::{VariantProvider, VariantSourceKind};
use crate::variant::record::VariantRecord;

/// Fields served by the remote variant service
pub const REMOTE_FIELDS: &[&str] = &[
    "identifier",
    "chromosome",
    "start",
    "end",
    "strand",
    "alleles",
    "clinical_significance",
    "source",
    "consequence",
    "gene_symbols",
];

/// Fields served by a local variant file, before header INFO keys
pub const LOCAL_FIELDS: &[&str] = &[
    "identifier",
    "chromosome",
    "start",
    "end",
    "alleles",
    "clinical_significance",
];

/// Default output fields
pub const DEFAULT_FIELDS: &[&str] = &["identifier", "alleles", "clinical_significance"];

/// Sentinel for a missing value in split aggregation
pub const MISSING_VALUE: &str = "NA";

/// Fixed field schedule of a provider kind
pub fn schedule(kind: VariantSourceKind) -> &'static [&'static str] {
    match kind {
        VariantSourceKind::Remote => REMOTE_FIELDS,
        VariantSourceKind::LocalFile => LOCAL_FIELDS,
    }
}

/// Replace characters that would break the colon-joined output
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ',' => ' ',
            ':' | '|' => '_',
            other => other,
        })
        .collect()
}

/// Projects variant records onto a validated, ordered field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFieldExtractor {
    fields: Vec<String>,
}

impl VariantFieldExtractor {
    /// Validate `fields` against a schedule plus extra field names
    ///
    /// An empty list selects [`DEFAULT_FIELDS`]. Duplicates are kept in
    /// their requested positions.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first unknown field.
    pub fn new<S: AsRef<str>>(
        fields: &[S],
        kind: VariantSourceKind,
        extra_fields: &[String],
    ) -> Result<Self, FerroError> {
        let fields: Vec<String> = if fields.is_empty() {
            DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
        } else {
            fields.iter().map(|f| f.as_ref().trim().to_string()).collect()
        };

        let known = schedule(kind);
        for field in &fields {
            let available =
                known.contains(&field.as_str()) || extra_fields.iter().any(|f| f == field);
            if !available {
                return Err(FerroError::config_kind(
                    ConfigurationKind::Field,
                    format!(
                        "unknown field '{}' for {} variant source (available: {})",
                        field,
                        kind,
                        known
                            .iter()
                            .map(|s| s.to_string())
                            .chain(extra_fields.iter().cloned())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                ));
            }
        }

        Ok(Self { fields })
    }

    /// Validate `fields` against a provider's schedule
    pub fn for_provider<S: AsRef<str>>(
        fields: &[S],
        provider: &dyn VariantProvider,
    ) -> Result<Self, FerroError> {
        Self::new(fields, provider.kind(), &provider.extra_fields())
    }

    /// The validated field names, in output order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Sanitized values in field order, `None` where undefined
    pub fn extract(&self, record: &VariantRecord) -> Vec<Option<String>> {
        self.fields
            .iter()
            .map(|field| record.get_field(field).map(|v| sanitize(&v)))
            .collect()
    }

    /// One record's output string: defined values joined with `:`
    pub fn record_string(&self, record: &VariantRecord) -> String {
        self.extract(record)
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(":")
    }
}
