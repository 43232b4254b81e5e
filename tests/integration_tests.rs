//! Integration tests for the full pipeline
//!
//! Builds a compressed homology table, a GFF3 transcript file and a ClinVar
//! style VCF on disk, then runs reference variants through the annotator.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use ferro_paralogues::annotation::{AnnotationStore, HomologyFilter};
use ferro_paralogues::error::ErrorCode;
use ferro_paralogues::reference::load_gff3;
use ferro_paralogues::variant::VariantFieldExtractor;
use ferro_paralogues::{
    ClinicalFilterSpec, ClinicalSignificanceFilter, FerroError, GenomicInterval, MatchMode,
    OutputMode, ParalogueAnnotation, ParalogueAnnotator, ReferenceVariant, TranscriptResolver,
    VariantProvider, VcfVariantProvider,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

const HOMOLOGY_HEADER: &str = "homology_id\tchr\tstart\tend\tstrand\tstable_id\tversion\tperc_cov\tperc_id\tperc_pos\tcigar_line\tparalogue_chr\tparalogue_start\tparalogue_end\tparalogue_strand\tparalogue_stable_id\tparalogue_version\tparalogue_cigar_line";

const GFF3: &str = "##gff-version 3
7\ttest\tmRNA\t100\t399\t.\t+\t.\tID=ENST_PAR.1;Name=PARG
7\ttest\texon\t100\t199\t.\t+\t.\tParent=ENST_PAR.1
7\ttest\texon\t300\t399\t.\t+\t.\tParent=ENST_PAR.1
7\ttest\tCDS\t100\t199\t.\t+\t0\tParent=ENST_PAR.1;protein_id=ENSP_PAR.2
7\ttest\tCDS\t300\t399\t.\t+\t2\tParent=ENST_PAR.1;protein_id=ENSP_PAR.2
";

const VCF: &str = "##fileformat=VCFv4.1
##contig=<ID=7>
##INFO=<ID=CLNSIG,Number=.,Type=String,Description=\"Clinical significance\">
##INFO=<ID=CLNREVSTAT,Number=.,Type=String,Description=\"Review status\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
7\t107\t1001\tC\tT\t.\t.\tCLNSIG=Pathogenic;CLNREVSTAT=criteria_provided,_single_submitter
7\t108\t1002\tG\tA\t.\t.\tCLNSIG=Benign
7\t300\t1003\tA\tG\t.\t.\tCLNSIG=Likely_pathogenic
";

struct Fixture {
    _dir: TempDir,
    homology: PathBuf,
    gff3: PathBuf,
    vcf: PathBuf,
}

fn homology_row(id: &str, ref_cigar: &str, par_cigar: &str, perc_pos: f64) -> String {
    format!(
        "{id}\t3\t1000\t2000\t1\tENSP_REF\t1\t95\t80\t{perc_pos}\t{ref_cigar}\tchr7\t100\t399\t1\tENSP_PAR\t2\t{par_cigar}"
    )
}

fn write_gz(path: &Path, content: &str) {
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn fixture(rows: &[String]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let homology = dir.path().join("homologies.tsv.gz");
    let gff3 = dir.path().join("genes.gff3");
    let vcf = dir.path().join("clinvar.vcf.gz");

    let mut table = format!("{}\n", HOMOLOGY_HEADER);
    for row in rows {
        table.push_str(row);
        table.push('\n');
    }
    write_gz(&homology, &table);
    std::fs::write(&gff3, GFF3).unwrap();
    write_gz(&vcf, VCF);

    Fixture {
        _dir: dir,
        homology,
        gff3,
        vcf,
    }
}

fn annotator(fixture: &Fixture, filter: ClinicalSignificanceFilter) -> ParalogueAnnotator {
    let store = AnnotationStore::from_file(&fixture.homology, HomologyFilter::default()).unwrap();
    let resolver = TranscriptResolver::new(load_gff3(&fixture.gff3).unwrap());
    let provider = VcfVariantProvider::from_path(&fixture.vcf).unwrap();
    ParalogueAnnotator::new(store, resolver, Box::new(provider), filter).unwrap()
}

fn variant(residue: u64) -> ReferenceVariant {
    ReferenceVariant::new("ENSP_REF.1", residue, "chr3", 1500, 1502)
}

#[test]
fn test_gap_in_paralogue_skips_pair() {
    let fixture = fixture(&[homology_row("H1", "5M", "2M1D3M", 85.0)]);
    let annotator = annotator(&fixture, ClinicalSignificanceFilter::accept_all());
    let hits = annotator.annotate(&variant(3)).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_exact_column_produces_record() {
    let fixture = fixture(&[homology_row("H1", "5M", "5M", 85.0)]);
    let annotator = annotator(&fixture, ClinicalSignificanceFilter::accept_all());

    let hits = annotator.annotate(&variant(3)).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].paralogue_protein_id, "ENSP_PAR.2");
    assert_eq!(hits[0].paralogue_residue, 3);
    assert_eq!(hits[0].interval, GenomicInterval::new("7", 106, 108));

    let extractor = VariantFieldExtractor::for_provider(
        &["identifier", "alleles", "clinical_significance"],
        annotator.provider(),
    )
    .unwrap();
    let annotation = ParalogueAnnotation::build(&hits, &extractor, OutputMode::Grouped, false);
    assert_eq!(
        annotation.to_columns(),
        vec!["PARALOGUE_VARIANTS=1001:C/T:Pathogenic,1002:G/A:Benign".to_string()]
    );
}

#[test]
fn test_clinical_filter_keeps_matching_variants() {
    let fixture = fixture(&[homology_row("H1", "5M", "5M", 85.0)]);
    let filter = ClinicalSignificanceFilter::new(Some(ClinicalFilterSpec::new(
        "pathogenic",
        MatchMode::Exact,
    )))
    .unwrap();
    let hits = annotator(&fixture, filter).annotate(&variant(3)).unwrap();
    let ids: Vec<_> = hits[0].variants.iter().map(|v| v.identifier.as_str()).collect();
    assert_eq!(ids, vec!["1001"]);
}

#[test]
fn test_codon_spanning_exon_junction() {
    let fixture = fixture(&[homology_row("H1", "40M", "40M", 85.0)]);
    let annotator = annotator(&fixture, ClinicalSignificanceFilter::accept_all());

    let hits = annotator.annotate(&variant(34)).unwrap();
    assert_eq!(hits[0].interval, GenomicInterval::new("7", 199, 301));
    let ids: Vec<_> = hits[0].variants.iter().map(|v| v.identifier.as_str()).collect();
    assert_eq!(ids, vec!["1003"]);
}

#[test]
fn test_split_mode_and_regions() {
    let fixture = fixture(&[homology_row("H1", "5M", "5M", 85.0)]);
    let annotator = annotator(&fixture, ClinicalSignificanceFilter::accept_all());
    let hits = annotator.annotate(&variant(3)).unwrap();

    let extractor =
        VariantFieldExtractor::for_provider(&["identifier", "CLNREVSTAT"], annotator.provider())
            .unwrap();
    let annotation = ParalogueAnnotation::build(&hits, &extractor, OutputMode::Split, true);
    assert_eq!(
        annotation.get("PARALOGUE_VARIANTS_CLNREVSTAT").unwrap(),
        &["criteria_provided _single_submitter".to_string(), "NA".to_string()]
    );
    assert_eq!(
        annotation.get("PARALOGUE_REGIONS").unwrap(),
        &["7:106-108:ENSP_PAR.2:3:95:85".to_string()]
    );
}

#[test]
fn test_low_positivity_records_dropped() {
    let fixture = fixture(&[homology_row("H1", "5M", "5M", 40.0)]);
    let annotator = annotator(&fixture, ClinicalSignificanceFilter::accept_all());
    assert!(annotator.annotate(&variant(3)).unwrap().is_empty());
}

#[test]
fn test_malformed_record_does_not_abort_run() {
    let fixture = fixture(&[
        homology_row("H1", "5M", "5Z", 85.0),
        homology_row("H2", "5M", "5M", 85.0),
    ]);
    let annotator = annotator(&fixture, ClinicalSignificanceFilter::accept_all());
    let hits = annotator.annotate(&variant(3)).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].homology_id, "H2");
}

#[test]
fn test_local_only_transcript_not_found() {
    let mut row = homology_row("H1", "5M", "5M", 85.0);
    row = row.replace("ENSP_PAR", "ENSP_MISSING");
    let fixture = fixture(&[row]);
    let annotator = annotator(&fixture, ClinicalSignificanceFilter::accept_all());

    let err = annotator.annotate(&variant(3)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TranscriptNotFound);
    assert!(err.to_string().contains("local-only"));
    assert!(matches!(err, FerroError::TranscriptNotFound { .. }));
}

#[test]
fn test_clinical_filter_requires_clnsig_column() {
    let dir = tempfile::tempdir().unwrap();
    let vcf = dir.path().join("plain.vcf");
    std::fs::write(
        &vcf,
        "##fileformat=VCFv4.3\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n7\t107\trs1\tC\tT\t.\t.\t.\n",
    )
    .unwrap();
    let provider = VcfVariantProvider::from_path(&vcf).unwrap();
    assert!(!provider.has_clinical_significance());

    let fixture = fixture(&[homology_row("H1", "5M", "5M", 85.0)]);
    let store = AnnotationStore::from_file(&fixture.homology, HomologyFilter::default()).unwrap();
    let resolver = TranscriptResolver::new(load_gff3(&fixture.gff3).unwrap());
    let filter = ClinicalSignificanceFilter::from_parts(Some("pathogenic"), "partial").unwrap();
    let err = ParalogueAnnotator::new(store, resolver, Box::new(provider), filter)
        .err()
        .unwrap();
    assert_eq!(err.code(), ErrorCode::MissingColumn);
}

#[test]
fn test_cache_reused_across_variants() {
    let fixture = fixture(&[homology_row("H1", "5M", "5M", 85.0)]);
    let annotator = annotator(&fixture, ClinicalSignificanceFilter::accept_all());
    annotator.annotate(&variant(2)).unwrap();
    annotator.annotate(&variant(3)).unwrap();
    let stats = annotator.resolver().cache_stats();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.hits, 1);
}
