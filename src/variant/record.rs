//! Known variant records returned by variant providers

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::reference::transcript::Strand;

/// A known variant overlapping a queried genomic interval
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Variant identifier (e.g. an rsID or ClinVar variation id)
    pub identifier: String,
    pub chromosome: String,
    /// First base (1-based, inclusive)
    pub start: u64,
    /// Last base (1-based, inclusive)
    pub end: u64,
    pub strand: Strand,
    /// Alleles joined by `/`, reference first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allele_string: Option<String>,
    #[serde(default)]
    pub clinical_significance: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence: Option<String>,
    #[serde(default)]
    pub gene_symbols: Vec<String>,
    /// Additional source-specific fields (INFO keys of a local file)
    #[serde(default)]
    pub info: BTreeMap<String, String>,
}

impl VariantRecord {
    pub fn new(identifier: impl Into<String>, chromosome: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            identifier: identifier.into(),
            chromosome: chromosome.into(),
            start,
            end,
            ..Default::default()
        }
    }

    pub fn with_alleles(mut self, alleles: impl Into<String>) -> Self {
        self.allele_string = Some(alleles.into());
        self
    }

    pub fn with_clinical_significance<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clinical_significance = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Raw (unsanitized) value of a named field
    ///
    /// Returns `None` for undefined or empty values. Names not in either
    /// field schedule are looked up in [`VariantRecord::info`].
    pub fn get_field(&self, field: &str) -> Option<String> {
        let value = match field {
            "identifier" => Some(self.identifier.clone()),
            "chromosome" => Some(self.chromosome.clone()),
            "start" => Some(self.start.to_string()),
            "end" => Some(self.end.to_string()),
            "strand" => Some(self.strand.to_string()),
            "alleles" => self.allele_string.clone(),
            "clinical_significance" => join_set(self.clinical_significance.iter()),
            "source" => self.source.clone(),
            "consequence" => self.consequence.clone(),
            "gene_symbols" => join_set(self.gene_symbols.iter()),
            other => self.info.get(other).cloned(),
        };
        value.filter(|v| !v.is_empty())
    }
}

fn join_set<'a, I: Iterator<Item = &'a String>>(values: I) -> Option<String> {
    let joined = values.map(String::as_str).collect::<Vec<_>>().join("/");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
