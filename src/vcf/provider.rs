//! Local variant file provider using noodles-vcf
//!
//! Loads a (optionally gzip/bgzip-compressed) VCF such as the ClinVar
//! release into an in-memory interval index. Record fields map as follows:
//!
//! | Field | VCF source |
//! |-------|------------|
//! | identifier | ID column, or `chrom:pos` when missing |
//! | start / end | POS and POS + len(REF) - 1 |
//! | alleles | `REF/ALT1/ALT2...` |
//! | clinical_significance | INFO `CLNSIG`, split into terms |
//! | consequence | INFO `MC`, sequence ontology names |
//! | gene_symbols | INFO `GENEINFO`, symbols only |
//!
//! Every INFO key declared in the header is also available as an extra
//! output field.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use noodles_vcf as nvcf;
use nvcf::variant::record::{AlternateBases, Ids};

use crate::annotation::index::{IntervalIndex, RangeQueryable};
use crate::clinvar::parse_clnsig;
use crate::error::FerroError;
use crate::io::open_reader;
use crate::variant::provider::{VariantProvider, VariantSourceKind};
use crate::variant::record::VariantRecord;

/// INFO key holding clinical significance
pub const INFO_CLNSIG: &str = "CLNSIG";
/// INFO key holding `SYMBOL:GENEID` pairs
pub const INFO_GENEINFO: &str = "GENEINFO";
/// INFO key holding molecular consequences
pub const INFO_MC: &str = "MC";

/// Variant provider backed by a local VCF file
#[derive(Debug, Clone)]
pub struct VcfVariantProvider {
    index: IntervalIndex<VariantRecord>,
    info_keys: Vec<String>,
    has_clnsig: bool,
}

impl VcfVariantProvider {
    /// Load every record of the VCF at `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FerroError> {
        let path = path.as_ref();
        let provider = Self::from_reader(open_reader(path)?)?;
        log::info!(
            "Loaded {} variants from {} ({} INFO fields)",
            provider.len(),
            path.display(),
            provider.info_keys.len()
        );
        Ok(provider)
    }

    /// Load every record from an uncompressed VCF stream
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, FerroError> {
        let mut inner = nvcf::io::Reader::new(reader);
        let header = inner.read_header().map_err(|e| FerroError::Io {
            msg: format!("Failed to parse VCF header: {}", e),
        })?;

        let info_keys: Vec<String> = header.infos().keys().map(|k| k.to_string()).collect();
        let has_clnsig = info_keys.iter().any(|k| k == INFO_CLNSIG);

        let mut records = Vec::new();
        let mut record = nvcf::variant::RecordBuf::default();
        loop {
            match inner.read_record_buf(&header, &mut record) {
                Ok(0) => break,
                Ok(_) => records.push(convert_record(&record)?),
                Err(e) => {
                    return Err(FerroError::Io {
                        msg: format!("Failed to parse VCF record: {}", e),
                    })
                }
            }
        }

        let index = IntervalIndex::build(
            records
                .into_iter()
                .map(|r| (r.chromosome.clone(), r.start, r.end, r)),
        );

        Ok(Self {
            index,
            info_keys,
            has_clnsig,
        })
    }

    /// Parse VCF text
    pub fn from_vcf_str(content: &str) -> Result<Self, FerroError> {
        Self::from_reader(content.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// INFO keys declared in the header
    pub fn info_keys(&self) -> &[String] {
        &self.info_keys
    }
}

impl VariantProvider for VcfVariantProvider {
    fn kind(&self) -> VariantSourceKind {
        VariantSourceKind::LocalFile
    }

    fn query(&self, chromosome: &str, start: u64, end: u64) -> Result<Vec<VariantRecord>, FerroError> {
        self.index.range_query(chromosome, start, end)
    }

    fn extra_fields(&self) -> Vec<String> {
        self.info_keys.clone()
    }

    fn has_clinical_significance(&self) -> bool {
        self.has_clnsig
    }
}

fn convert_record(record: &nvcf::variant::RecordBuf) -> Result<VariantRecord, FerroError> {
    let chromosome = record.reference_sequence_name().to_string();

    let start = record
        .variant_start()
        .map(|p| p.get() as u64)
        .ok_or_else(|| FerroError::Io {
            msg: format!("Missing position in VCF record on {}", chromosome),
        })?;

    let reference = record.reference_bases().to_string();
    let end = start + (reference.len().max(1) as u64) - 1;

    let identifier = {
        let ids: Vec<String> = record.ids().iter().map(|id| id.to_string()).collect();
        if ids.is_empty() {
            format!("{}:{}", chromosome, start)
        } else {
            ids.join(";")
        }
    };

    let mut alleles = vec![reference];
    alleles.extend(record.alternate_bases().iter().map(|a| match a {
        Ok(allele) => allele.to_string(),
        Err(_) => ".".to_string(),
    }));

    let mut info = BTreeMap::new();
    for (key, value) in record.info().as_ref() {
        let rendered = match value {
            Some(v) => info_value_to_string(v),
            None => key.to_string(),
        };
        info.insert(key.to_string(), rendered);
    }

    let clinical_significance = info
        .get(INFO_CLNSIG)
        .map(|v| parse_clnsig(v))
        .unwrap_or_default();
    let gene_symbols = info
        .get(INFO_GENEINFO)
        .map(|v| parse_gene_info(v))
        .unwrap_or_default();
    let consequence = info.get(INFO_MC).and_then(|v| parse_molecular_consequence(v));

    Ok(VariantRecord {
        identifier,
        chromosome,
        start,
        end,
        allele_string: Some(alleles.join("/")),
        clinical_significance,
        source: Some("VCF".to_string()),
        consequence,
        gene_symbols,
        info,
        ..Default::default()
    })
}

fn info_value_to_string(value: &nvcf::variant::record_buf::info::field::Value) -> String {
    use nvcf::variant::record_buf::info::field::value::Array;
    use nvcf::variant::record_buf::info::field::Value;

    fn join<T, F: Fn(&T) -> String>(values: &[Option<T>], f: F) -> String {
        values
            .iter()
            .map(|v| v.as_ref().map(&f).unwrap_or_else(|| ".".to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }

    match value {
        Value::Integer(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Flag => "true".to_string(),
        Value::Character(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(arr) => match arr {
            Array::Integer(vals) => join(vals, |v| v.to_string()),
            Array::Float(vals) => join(vals, |v| v.to_string()),
            Array::Character(vals) => join(vals, |v| v.to_string()),
            Array::String(vals) => join(vals, |v| v.clone()),
        },
    }
}

/// Gene symbols from `SYMBOL:GENEID|SYMBOL:GENEID`
fn parse_gene_info(value: &str) -> Vec<String> {
    value
        .split('|')
        .filter_map(|pair| pair.split(':').next())
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string)
        .collect()
}

/// Consequence names from `SO:0001583|missense_variant,SO:...|...`
fn parse_molecular_consequence(value: &str) -> Option<String> {
    let names: Vec<&str> = value
        .split(',')
        .filter_map(|entry| entry.split_once('|').map(|(_, name)| name).or(Some(entry)))
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(","))
    }
}
