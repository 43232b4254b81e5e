//! Clinical significance filtering
//!
//! A filter is a term plus a match mode. All modes are case-insensitive.
//!
//! | Mode | Matches when |
//! |------|--------------|
//! | `partial` | the term is a substring of any variant term |
//! | `exact` | the term equals any variant term |
//! | `regex` | the pattern matches any variant term |

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationKind, FerroError};

/// How a filter term is compared against variant terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Partial,
    Exact,
    Regex,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Partial => "partial",
            MatchMode::Exact => "exact",
            MatchMode::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = FerroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "partial" => Ok(MatchMode::Partial),
            "exact" => Ok(MatchMode::Exact),
            "regex" => Ok(MatchMode::Regex),
            other => Err(FerroError::config_kind(
                ConfigurationKind::MatchMode,
                format!(
                    "unknown clinical significance match mode '{}' (expected partial, exact or regex)",
                    other
                ),
            )),
        }
    }
}

/// A configured clinical significance filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClinicalFilterSpec {
    pub term: String,
    #[serde(rename = "match", default)]
    pub match_mode: MatchMode,
}

impl ClinicalFilterSpec {
    pub fn new(term: impl Into<String>, match_mode: MatchMode) -> Self {
        Self {
            term: term.into(),
            match_mode,
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Substring(String),
    Equal(String),
    Pattern(Regex),
}

/// Matches variant clinical significance terms against an optional spec
///
/// Construction does all validation, so matching cannot fail.
#[derive(Debug, Clone)]
pub struct ClinicalSignificanceFilter {
    spec: Option<ClinicalFilterSpec>,
    matcher: Option<Matcher>,
}

impl ClinicalSignificanceFilter {
    /// Build a filter; `None` accepts every variant
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a regex term does not compile.
    pub fn new(spec: Option<ClinicalFilterSpec>) -> Result<Self, FerroError> {
        let matcher = match &spec {
            None => None,
            Some(spec) => Some(match spec.match_mode {
                MatchMode::Partial => Matcher::Substring(spec.term.to_lowercase()),
                MatchMode::Exact => Matcher::Equal(spec.term.to_lowercase()),
                MatchMode::Regex => Matcher::Pattern(
                    RegexBuilder::new(&spec.term)
                        .case_insensitive(true)
                        .build()?,
                ),
            }),
        };
        Ok(Self { spec, matcher })
    }

    /// Build a filter from a term and a textual match mode
    ///
    /// The mode is validated even without a term.
    pub fn from_parts(term: Option<&str>, match_mode: &str) -> Result<Self, FerroError> {
        let mode: MatchMode = match_mode.parse()?;
        Self::new(term.map(|t| ClinicalFilterSpec::new(t, mode)))
    }

    /// A filter that accepts everything
    pub fn accept_all() -> Self {
        Self {
            spec: None,
            matcher: None,
        }
    }

    pub fn spec(&self) -> Option<&ClinicalFilterSpec> {
        self.spec.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.matcher.is_some()
    }

    /// Whether any of `terms` satisfies the filter
    ///
    /// Without a spec this is always true; with one, an empty term set never
    /// matches.
    pub fn matches<I, S>(&self, terms: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(matcher) = &self.matcher else {
            return true;
        };
        terms.into_iter().any(|term| {
            let term = term.as_ref();
            match matcher {
                Matcher::Substring(needle) => term.to_lowercase().contains(needle.as_str()),
                Matcher::Equal(expected) => term.to_lowercase() == *expected,
                Matcher::Pattern(re) => re.is_match(term),
            }
        })
    }
}

impl Default for ClinicalSignificanceFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn filter(term: &str, mode: MatchMode) -> ClinicalSignificanceFilter {
        ClinicalSignificanceFilter::new(Some(ClinicalFilterSpec::new(term, mode))).unwrap()
    }

    #[rstest]
    #[case(&["Pathogenic"], "pathogenic", MatchMode::Partial, true)]
    #[case(&["Likely pathogenic"], "pathogenic", MatchMode::Partial, true)]
    #[case(&["Benign"], "pathogenic", MatchMode::Partial, false)]
    #[case(&["Likely benign"], "pathogenic", MatchMode::Exact, false)]
    #[case(&["PATHOGENIC"], "pathogenic", MatchMode::Exact, true)]
    #[case(&["Likely pathogenic"], "pathogenic", MatchMode::Exact, false)]
    #[case(&["Benign", "Pathogenic"], "pathogenic", MatchMode::Exact, true)]
    #[case(&["Likely pathogenic"], "^(likely )?pathogenic$", MatchMode::Regex, true)]
    #[case(&["Pathogenic/Likely pathogenic"], "^pathogenic$", MatchMode::Regex, false)]
    #[case(&["risk factor"], "RISK", MatchMode::Regex, true)]
    fn test_matches(
        #[case] terms: &[&str],
        #[case] term: &str,
        #[case] mode: MatchMode,
        #[case] expected: bool,
    ) {
        assert_eq!(filter(term, mode).matches(terms), expected);
    }

    #[rstest]
    #[case(MatchMode::Partial)]
    #[case(MatchMode::Exact)]
    #[case(MatchMode::Regex)]
    fn test_empty_terms_never_match(#[case] mode: MatchMode) {
        assert!(!filter("pathogenic", mode).matches(Vec::<String>::new()));
    }

    #[test]
    fn test_no_spec_always_matches() {
        let f = ClinicalSignificanceFilter::new(None).unwrap();
        assert!(f.matches(["anything"]));
        assert!(f.matches(Vec::<&str>::new()));
        assert!(!f.is_active());
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!("partial".parse::<MatchMode>().unwrap(), MatchMode::Partial);
        assert_eq!("EXACT".parse::<MatchMode>().unwrap(), MatchMode::Exact);
        assert_eq!(" regex ".parse::<MatchMode>().unwrap(), MatchMode::Regex);
    }

    #[test]
    fn test_unknown_match_mode_is_configuration_error() {
        let err = ClinicalSignificanceFilter::from_parts(Some("pathogenic"), "fuzzy").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::UnknownMatchMode);
        // Validated even without a term
        assert!(ClinicalSignificanceFilter::from_parts(None, "fuzzy").is_err());
    }

    #[test]
    fn test_invalid_regex_is_configuration_error() {
        let err = ClinicalSignificanceFilter::new(Some(ClinicalFilterSpec::new(
            "(unclosed",
            MatchMode::Regex,
        )))
        .unwrap_err();
        assert!(matches!(err, FerroError::Configuration { .. }));
    }

    #[test]
    fn test_spec_deserialize() {
        let spec: ClinicalFilterSpec =
            toml::from_str("term = \"pathogenic\"\nmatch = \"exact\"").unwrap();
        assert_eq!(spec, ClinicalFilterSpec::new("pathogenic", MatchMode::Exact));
        let spec: ClinicalFilterSpec = toml::from_str("term = \"benign\"").unwrap();
        assert_eq!(spec.match_mode, MatchMode::Partial);
    }
}
