// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-paralogues CLI
//!
//! Command-line interface for paralogue variant annotation.

use clap::{ArgAction, Parser, Subcommand};
use ferro_paralogues::config::{CliOverrides, ParalogueConfig};
use ferro_paralogues::io::open_reader;
use ferro_paralogues::reference::{load_gff3, load_gtf, load_json, TranscriptDb};
use ferro_paralogues::{
    AnnotationStore, FerroError, OutputMode, ParalogueAnnotation, ParalogueAnnotator,
    ParalogueHit, ReferenceVariant, TranscriptResolver, VariantProvider, VariantRecord,
    VcfVariantProvider,
};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "ferro-paralogues")]
#[command(author, version, about = "Known variants at paralogous protein positions")]
#[command(
    long_about = "Map protein variants onto their paralogues and report the known variants found at the equivalent positions.

Examples:
  ferro-paralogues annotate -i variants.tsv --homology homologies.tsv.gz --gff3 genes.gff3.gz --vcf clinvar.vcf.gz
  ferro-paralogues annotate -i variants.tsv --homology homologies.tsv.gz --gtf genes.gtf --vcf clinvar.vcf.gz --clinical-term pathogenic
  ferro-paralogues check-config --config .paralogues.toml --vcf clinvar.vcf.gz"
)]
struct Cli {
    /// Log level or filter directive (e.g. info, debug, ferro_paralogues=trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Configuration file (default: .paralogues.toml, then ~/.config/ferro/paralogues.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate reference variants with paralogue variants
    Annotate {
        /// Input TSV: protein_id, residue, chromosome, start, end[, protein sequence] (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Homology table (plain or gzip-compressed TSV)
        #[arg(long)]
        homology: PathBuf,

        /// Transcript models in GFF3
        #[arg(long, conflicts_with_all = ["gtf", "transcripts_json"])]
        gff3: Option<PathBuf>,

        /// Transcript models in GTF
        #[arg(long, conflicts_with = "transcripts_json")]
        gtf: Option<PathBuf>,

        /// Transcript models as JSON
        #[arg(long)]
        transcripts_json: Option<PathBuf>,

        /// Transcript file (GFF3, GTF or JSON, by extension) consulted when the
        /// local annotation has no model; requires `--local-only false`
        #[arg(long)]
        remote_transcripts: Option<PathBuf>,

        /// Only resolve transcripts from the local annotation (overrides config)
        #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
        local_only: Option<bool>,

        /// Local variant file (VCF, optionally gzip/bgzip-compressed)
        #[arg(long, conflicts_with = "variants_json")]
        vcf: Option<PathBuf>,

        /// Pre-fetched variant records as JSON
        #[arg(long)]
        variants_json: Option<PathBuf>,

        /// Minimum percentage of the reference covered by the alignment
        #[arg(long)]
        min_perc_cov: Option<f64>,

        /// Minimum percentage of positive aligned residues
        #[arg(long)]
        min_perc_pos: Option<f64>,

        /// Keep only variants whose clinical significance matches this term
        #[arg(long)]
        clinical_term: Option<String>,

        /// How the clinical term is matched (partial, exact, regex)
        #[arg(long)]
        clinical_match: Option<String>,

        /// Comma-separated output fields
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,

        /// Output layout (grouped, split)
        #[arg(long)]
        mode: Option<OutputMode>,

        /// Report the mapped paralogue regions (overrides config)
        #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
        regions: Option<bool>,
    },

    /// Validate a configuration file
    CheckConfig {
        /// Validate output fields against this local variant file
        #[arg(long)]
        vcf: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Annotate {
            input,
            output,
            homology,
            gff3,
            gtf,
            transcripts_json,
            remote_transcripts,
            local_only,
            vcf,
            variants_json,
            min_perc_cov,
            min_perc_pos,
            clinical_term,
            clinical_match,
            fields,
            mode,
            regions,
        } => {
            let overrides = CliOverrides {
                min_perc_cov,
                min_perc_pos,
                clinical_term,
                clinical_match,
                fields,
                mode,
                regions,
                local_only,
            };
            let config = config.merge_with_cli(&overrides);
            let transcripts = load_transcripts(gff3.as_deref(), gtf.as_deref(), transcripts_json.as_deref())?;
            let remote = remote_transcripts
                .as_deref()
                .map(load_transcript_file)
                .transpose()?;
            let provider = load_provider(vcf.as_deref(), variants_json.as_deref())?;
            let sources = Sources {
                transcripts,
                remote,
                provider,
            };
            run_annotate(&config, &input, output.as_deref(), &homology, sources)
        }
        Commands::CheckConfig { vcf } => run_check_config(&config, vcf.as_deref()),
    }
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ParalogueConfig, FerroError> {
    match path {
        Some(path) => ParalogueConfig::load_from_path(path),
        None => Ok(ParalogueConfig::load()?.unwrap_or_default()),
    }
}

fn load_transcripts(
    gff3: Option<&Path>,
    gtf: Option<&Path>,
    json: Option<&Path>,
) -> Result<TranscriptDb, FerroError> {
    let db = match (gff3, gtf, json) {
        (Some(path), _, _) => load_gff3(path)?,
        (_, Some(path), _) => load_gtf(path)?,
        (_, _, Some(path)) => load_json(path)?,
        _ => {
            return Err(FerroError::config(
                "a transcript source is required (--gff3, --gtf or --transcripts-json)",
            ))
        }
    };
    info!("Loaded {} transcripts", db.len());
    Ok(db)
}

/// Load a transcript file, choosing the format from its extension
fn load_transcript_file(path: &Path) -> Result<TranscriptDb, FerroError> {
    let name = path.to_string_lossy().to_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let db = if name.ends_with(".gff3") || name.ends_with(".gff") {
        load_gff3(path)?
    } else if name.ends_with(".gtf") {
        load_gtf(path)?
    } else if name.ends_with(".json") {
        load_json(path)?
    } else {
        return Err(FerroError::config(format!(
            "cannot tell the format of {} (expected .gff3, .gtf or .json)",
            path.display()
        )));
    };
    info!("Loaded {} fallback transcripts from {}", db.len(), path.display());
    Ok(db)
}

fn load_provider(
    vcf: Option<&Path>,
    variants_json: Option<&Path>,
) -> Result<Box<dyn VariantProvider>, FerroError> {
    match (vcf, variants_json) {
        (Some(path), _) => Ok(Box::new(VcfVariantProvider::from_path(path)?)),
        (_, Some(path)) => {
            let records: Vec<VariantRecord> = serde_json::from_reader(open_reader(path)?)?;
            info!("Loaded {} variant records", records.len());
            Ok(Box::new(ferro_paralogues::variant::InMemoryVariantProvider::new(records)))
        }
        _ => Err(FerroError::config(
            "a variant source is required (--vcf or --variants-json)",
        )),
    }
}

/// Transcript and variant sources for one annotation run
struct Sources {
    transcripts: TranscriptDb,
    remote: Option<TranscriptDb>,
    provider: Box<dyn VariantProvider>,
}

fn run_annotate(
    config: &ParalogueConfig,
    input: &Path,
    output: Option<&Path>,
    homology: &Path,
    sources: Sources,
) -> Result<(), Box<dyn std::error::Error>> {
    let Sources {
        transcripts,
        remote,
        provider,
    } = sources;

    // Every configuration error surfaces before any input is read
    let (extractor, filter) = config.validate_for(provider.as_ref())?;
    if remote.is_some() && config.transcripts.local_only {
        warn!("--remote-transcripts is ignored in local-only mode; pass --local-only false");
    }

    let store = AnnotationStore::from_file(homology, config.homology_filter())?;
    let mut resolver = TranscriptResolver::new(transcripts.rebucket(config.transcripts.bucket_size));
    if let Some(remote) = remote {
        resolver = resolver.with_remote(Box::new(remote));
    }
    let resolver = resolver.with_local_only(config.transcripts.local_only);
    let annotator = ParalogueAnnotator::new(store, resolver, provider, filter)?;

    let (lines, variants) = read_variants(input)?;
    let results = annotate_all(&annotator, &variants);

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut annotated = 0usize;
    for (line, result) in lines.iter().zip(results) {
        let hits = result?;
        let annotation =
            ParalogueAnnotation::build(&hits, &extractor, config.output.mode, config.output.regions);
        if !annotation.is_empty() {
            annotated += 1;
        }
        let mut columns = vec![line.clone()];
        columns.extend(annotation.to_columns());
        writeln!(writer, "{}", columns.join("\t"))?;
    }
    writer.flush()?;

    let stats = annotator.resolver().cache_stats();
    info!(
        "Annotated {} of {} variants ({} transcripts cached, hit rate {:.1}%)",
        annotated,
        variants.len(),
        stats.size,
        stats.hit_rate()
    );
    Ok(())
}

#[cfg(feature = "parallel")]
fn annotate_all(
    annotator: &ParalogueAnnotator,
    variants: &[ReferenceVariant],
) -> Vec<Result<Vec<ParalogueHit>, FerroError>> {
    ferro_paralogues::parallel::annotate_batch(annotator, variants)
}

#[cfg(not(feature = "parallel"))]
fn annotate_all(
    annotator: &ParalogueAnnotator,
    variants: &[ReferenceVariant],
) -> Vec<Result<Vec<ParalogueHit>, FerroError>> {
    variants.iter().map(|v| annotator.annotate(v)).collect()
}

/// Read the input TSV, returning the raw lines alongside parsed variants
fn read_variants(input: &Path) -> Result<(Vec<String>, Vec<ReferenceVariant>), FerroError> {
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        open_reader(input)?
    };

    let mut lines = Vec::new();
    let mut variants = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        variants.push(parse_variant_line(trimmed, i + 1)?);
        lines.push(trimmed.to_string());
    }
    Ok((lines, variants))
}

fn parse_variant_line(line: &str, line_number: usize) -> Result<ReferenceVariant, FerroError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 5 {
        return Err(FerroError::InvalidRecord {
            line: line_number,
            msg: format!("expected at least 5 columns, found {}", fields.len()),
        });
    }
    let number = |value: &str, column: &str| -> Result<u64, FerroError> {
        value.trim().parse().map_err(|_| FerroError::InvalidRecord {
            line: line_number,
            msg: format!("invalid {} '{}'", column, value),
        })
    };

    let mut variant = ReferenceVariant::new(
        fields[0].trim(),
        number(fields[1], "residue")?,
        fields[2].trim(),
        number(fields[3], "start")?,
        number(fields[4], "end")?,
    );
    if let Some(sequence) = fields.get(5).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        variant = variant.with_reference_sequence(sequence);
    }
    Ok(variant)
}

fn run_check_config(
    config: &ParalogueConfig,
    vcf: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match vcf {
        Some(path) => {
            let provider = VcfVariantProvider::from_path(path)?;
            config.validate_for(&provider)?;
        }
        None => config.validate()?,
    }
    println!("Configuration OK");
    print!("{}", toml::to_string(config)?);
    Ok(())
}
