//! Clinical significance parsing and filtering using rstest parameterized tests

use ferro_paralogues::clinvar::{
    parse_clnsig, ClinicalFilterSpec, ClinicalSignificanceFilter, MatchMode,
};
use ferro_paralogues::error::ErrorCode;
use rstest::rstest;

fn filter(term: &str, mode: MatchMode) -> ClinicalSignificanceFilter {
    ClinicalSignificanceFilter::new(Some(ClinicalFilterSpec::new(term, mode))).unwrap()
}

#[rstest]
#[case("Pathogenic", "pathogenic", MatchMode::Partial, true)]
#[case("Likely_pathogenic", "pathogenic", MatchMode::Partial, true)]
#[case("Benign", "pathogenic", MatchMode::Partial, false)]
#[case("Likely_benign", "pathogenic", MatchMode::Exact, false)]
#[case("Pathogenic", "PATHOGENIC", MatchMode::Exact, true)]
#[case("Likely_pathogenic", "pathogenic", MatchMode::Exact, false)]
#[case("Pathogenic/Likely_pathogenic", "likely pathogenic", MatchMode::Exact, true)]
#[case("Conflicting_interpretations_of_pathogenicity", "pathogenic", MatchMode::Exact, false)]
#[case("Uncertain_significance", "^uncertain", MatchMode::Regex, true)]
#[case("Likely_pathogenic", "^pathogenic$", MatchMode::Regex, false)]
#[case("Pathogenic|risk_factor", "risk factor", MatchMode::Exact, true)]
fn test_matches(
    #[case] clnsig: &str,
    #[case] term: &str,
    #[case] mode: MatchMode,
    #[case] expected: bool,
) {
    let terms = parse_clnsig(clnsig);
    assert_eq!(
        filter(term, mode).matches(&terms),
        expected,
        "{} against {:?} ({})",
        term,
        terms,
        mode
    );
}

#[rstest]
#[case(MatchMode::Partial)]
#[case(MatchMode::Exact)]
#[case(MatchMode::Regex)]
fn test_empty_terms_never_match(#[case] mode: MatchMode) {
    assert!(!filter("pathogenic", mode).matches(parse_clnsig("")));
    assert!(!filter("pathogenic", mode).matches(parse_clnsig(".")));
}

#[test]
fn test_no_spec_matches_anything() {
    let filter = ClinicalSignificanceFilter::new(None).unwrap();
    assert!(!filter.is_active());
    assert!(filter.matches(parse_clnsig("Benign")));
    assert!(filter.matches(Vec::<String>::new()));
}

#[rstest]
#[case("fuzzy")]
#[case("")]
#[case("substring")]
fn test_unknown_mode_rejected_at_construction(#[case] mode: &str) {
    let err = ClinicalSignificanceFilter::from_parts(Some("pathogenic"), mode).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownMatchMode);
}

#[test]
fn test_unknown_mode_rejected_without_term() {
    assert!(ClinicalSignificanceFilter::from_parts(None, "fuzzy").is_err());
}

#[test]
fn test_invalid_regex_is_configuration_error() {
    let err = ClinicalSignificanceFilter::new(Some(ClinicalFilterSpec::new(
        "[unclosed",
        MatchMode::Regex,
    )))
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidConfiguration);
}

#[rstest]
#[case("Pathogenic", &["Pathogenic"])]
#[case("Likely_pathogenic", &["Likely pathogenic"])]
#[case("Pathogenic/Likely_pathogenic", &["Likely pathogenic", "Pathogenic"])]
#[case("Benign|drug_response,_other", &["Benign", "drug response", "other"])]
#[case(".", &[])]
fn test_parse_clnsig(#[case] value: &str, #[case] expected: &[&str]) {
    let terms: Vec<String> = parse_clnsig(value).into_iter().collect();
    assert_eq!(terms, expected);
}
