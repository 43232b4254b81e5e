//! Output keys assembled from paralogue hits
//!
//! | Key | Mode | Values |
//! |-----|------|--------|
//! | `PARALOGUE_VARIANTS` | grouped | one `:`-joined string per variant |
//! | `PARALOGUE_VARIANTS_<field>` | split | one value per variant, `NA` if missing |
//! | `PARALOGUE_REGIONS` | either, opt-in | `chr:start-end:protein:residue:perc_cov:perc_pos` per hit |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FerroError;
use crate::paralogues::annotator::ParalogueHit;
use crate::variant::{VariantFieldExtractor, MISSING_VALUE};

pub const KEY_VARIANTS: &str = "PARALOGUE_VARIANTS";
pub const KEY_REGIONS: &str = "PARALOGUE_REGIONS";

/// How matched variants are laid out across output keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One key, one colon-joined string per variant
    #[default]
    Grouped,
    /// One key per field
    Split,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Grouped => write!(f, "grouped"),
            OutputMode::Split => write!(f, "split"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = FerroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(OutputMode::Grouped),
            "split" => Ok(OutputMode::Split),
            other => Err(FerroError::config(format!(
                "unknown output mode '{}' (expected grouped or split)",
                other
            ))),
        }
    }
}

/// Ordered output keys and their values for one reference variant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParalogueAnnotation {
    entries: Vec<(String, Vec<String>)>,
}

impl ParalogueAnnotation {
    /// Lay out `hits` according to `mode`
    ///
    /// Keys with no values are omitted, so a variant without paralogue
    /// matches produces an empty annotation.
    pub fn build(
        hits: &[ParalogueHit],
        extractor: &VariantFieldExtractor,
        mode: OutputMode,
        include_regions: bool,
    ) -> Self {
        let mut entries = Vec::new();
        let variants: Vec<_> = hits.iter().flat_map(|h| h.variants.iter()).collect();

        if !variants.is_empty() {
            match mode {
                OutputMode::Grouped => {
                    // A record with none of the selected fields defined has nothing to report
                    let values: Vec<String> = variants
                        .iter()
                        .map(|v| extractor.record_string(v))
                        .filter(|s| !s.is_empty())
                        .collect();
                    if !values.is_empty() {
                        entries.push((KEY_VARIANTS.to_string(), values));
                    }
                }
                OutputMode::Split => {
                    let rows: Vec<Vec<Option<String>>> =
                        variants.iter().map(|v| extractor.extract(v)).collect();
                    for (i, field) in extractor.fields().iter().enumerate() {
                        let values = rows
                            .iter()
                            .map(|row| {
                                row.get(i)
                                    .cloned()
                                    .flatten()
                                    .unwrap_or_else(|| MISSING_VALUE.to_string())
                            })
                            .collect();
                        entries.push((format!("{}_{}", KEY_VARIANTS, field), values));
                    }
                }
            }
        }

        if include_regions && !hits.is_empty() {
            let values = hits.iter().map(region_string).collect();
            entries.push((KEY_REGIONS.to_string(), values));
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys with their values, in output order
    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    /// Values under `key`
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// `KEY=v1,v2` strings, one per key
    pub fn to_columns(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.join(",")))
            .collect()
    }
}

fn region_string(hit: &ParalogueHit) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        hit.interval,
        hit.paralogue_protein_id,
        hit.paralogue_residue,
        hit.perc_cov,
        hit.perc_pos
    )
}
