//! Configuration file support for ferro-paralogues.
//!
//! This module loads `.paralogues.toml` configuration files covering the
//! homology thresholds, the clinical significance filter, output layout and
//! transcript resolution.
//!
//! # Example Configuration
//!
//! ```toml
//! [homology]
//! min_perc_cov = 0
//! min_perc_pos = 50
//!
//! [clinical]
//! term = "pathogenic"
//! match = "partial"
//!
//! [output]
//! fields = ["identifier", "alleles", "clinical_significance"]
//! mode = "grouped"
//! regions = false
//!
//! [transcripts]
//! local_only = true
//! bucket_size = 1000000
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.paralogues.toml` in current directory
//! 2. `~/.config/ferro/paralogues.toml`
//!
//! CLI flags take precedence over config file settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::annotation::{HomologyFilter, DEFAULT_MIN_PERC_COV, DEFAULT_MIN_PERC_POS};
use crate::clinvar::{ClinicalFilterSpec, ClinicalSignificanceFilter, MatchMode};
use crate::error::{ConfigurationKind, FerroError};
use crate::paralogues::OutputMode;
use crate::reference::DEFAULT_BUCKET_SIZE;
use crate::variant::{VariantFieldExtractor, VariantProvider, DEFAULT_FIELDS};

/// File name searched in the working directory
pub const CONFIG_FILE_NAME: &str = ".paralogues.toml";

/// Parsed configuration from a `.paralogues.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParalogueConfig {
    pub homology: HomologySection,
    pub clinical: ClinicalSection,
    pub output: OutputSection,
    pub transcripts: TranscriptSection,
}

/// Homology record thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomologySection {
    pub min_perc_cov: f64,
    pub min_perc_pos: f64,
}

impl Default for HomologySection {
    fn default() -> Self {
        Self {
            min_perc_cov: DEFAULT_MIN_PERC_COV,
            min_perc_pos: DEFAULT_MIN_PERC_POS,
        }
    }
}

/// Clinical significance filter; no term disables filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClinicalSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    /// Kept as text so an unknown mode surfaces as a validation error
    #[serde(rename = "match")]
    pub match_mode: String,
}

impl Default for ClinicalSection {
    fn default() -> Self {
        Self {
            term: None,
            match_mode: MatchMode::default().to_string(),
        }
    }
}

/// Output layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub fields: Vec<String>,
    pub mode: OutputMode,
    /// Also emit `PARALOGUE_REGIONS`
    pub regions: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            mode: OutputMode::default(),
            regions: false,
        }
    }
}

/// Transcript resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscriptSection {
    pub local_only: bool,
    pub bucket_size: u64,
}

impl Default for TranscriptSection {
    fn default() -> Self {
        Self {
            local_only: true,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Values given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub min_perc_cov: Option<f64>,
    pub min_perc_pos: Option<f64>,
    pub clinical_term: Option<String>,
    pub clinical_match: Option<String>,
    pub fields: Option<Vec<String>>,
    pub mode: Option<OutputMode>,
    pub regions: Option<bool>,
    pub local_only: Option<bool>,
}

impl ParalogueConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.paralogues.toml` in current directory
    /// 2. `~/.config/ferro/paralogues.toml`
    ///
    /// Returns `Ok(None)` when neither file exists. A file that exists but
    /// does not parse is an error.
    pub fn load() -> Result<Option<Self>, FerroError> {
        let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
        if cwd_config.exists() {
            return Self::load_from_path(&cwd_config).map(Some);
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("paralogues.toml");
            if home_config.exists() {
                return Self::load_from_path(&home_config).map(Some);
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, FerroError> {
        let content = fs::read_to_string(path).map_err(|e| FerroError::Io {
            msg: format!("failed to read {}: {}", path.display(), e),
        })?;
        let config = Self::parse(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, FerroError> {
        Ok(toml::from_str(content)?)
    }

    /// Merge CLI arguments into this config.
    /// CLI arguments take precedence.
    pub fn merge_with_cli(mut self, cli: &CliOverrides) -> Self {
        if let Some(v) = cli.min_perc_cov {
            self.homology.min_perc_cov = v;
        }
        if let Some(v) = cli.min_perc_pos {
            self.homology.min_perc_pos = v;
        }
        if let Some(term) = &cli.clinical_term {
            self.clinical.term = Some(term.clone());
        }
        if let Some(mode) = &cli.clinical_match {
            self.clinical.match_mode = mode.clone();
        }
        if let Some(fields) = &cli.fields {
            self.output.fields = fields.clone();
        }
        if let Some(mode) = cli.mode {
            self.output.mode = mode;
        }
        if let Some(regions) = cli.regions {
            self.output.regions = regions;
        }
        if let Some(local_only) = cli.local_only {
            self.transcripts.local_only = local_only;
        }
        self
    }

    pub fn homology_filter(&self) -> HomologyFilter {
        HomologyFilter {
            min_perc_cov: self.homology.min_perc_cov,
            min_perc_pos: self.homology.min_perc_pos,
        }
    }

    /// Build the clinical filter; fails on an unknown mode or bad regex.
    pub fn clinical_filter(&self) -> Result<ClinicalSignificanceFilter, FerroError> {
        ClinicalSignificanceFilter::from_parts(
            self.clinical.term.as_deref(),
            &self.clinical.match_mode,
        )
    }

    /// Checks that do not depend on the variant provider
    pub fn validate(&self) -> Result<(), FerroError> {
        for (name, value) in [
            ("min_perc_cov", self.homology.min_perc_cov),
            ("min_perc_pos", self.homology.min_perc_pos),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(FerroError::config(format!(
                    "homology.{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        if self.transcripts.bucket_size == 0 {
            return Err(FerroError::config("transcripts.bucket_size must be positive"));
        }
        self.clinical_filter()?;
        Ok(())
    }

    /// Full validation against the selected variant provider.
    ///
    /// Returns the field extractor and clinical filter ready for use.
    pub fn validate_for(
        &self,
        provider: &dyn VariantProvider,
    ) -> Result<(VariantFieldExtractor, ClinicalSignificanceFilter), FerroError> {
        self.validate()?;
        let filter = self.clinical_filter()?;
        if filter.is_active() && !provider.has_clinical_significance() {
            return Err(FerroError::config_kind(
                ConfigurationKind::MissingColumn,
                format!(
                    "clinical.term is set but the {} variant source has no clinical significance column",
                    provider.kind()
                ),
            ));
        }
        let extractor = VariantFieldExtractor::for_provider(&self.output.fields, provider)?;
        Ok((extractor, filter))
    }

    /// The clinical filter spec, if a term is configured
    pub fn clinical_spec(&self) -> Result<Option<ClinicalFilterSpec>, FerroError> {
        Ok(self.clinical_filter()?.spec().cloned())
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
