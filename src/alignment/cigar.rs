//! Run-length alignment encodings and gapped sequence reconstruction.
//!
//! Homology records store each side of a pairwise alignment as a compact
//! run-length encoding over the ungapped protein (e.g. `2M1D3M`). Expanding the
//! encoding against the raw sequence yields the gapped row of the alignment.
//!
//! # Format
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `<n>M` | copy the next `n` residues of the raw sequence |
//! | `<n>D` | insert `n` gap columns (`-`) |
//! | `M` / `D` | count defaults to 1 |

use std::fmt;
use std::str::FromStr;

use crate::error::FerroError;

/// Gap character used in aligned sequences.
pub const GAP: u8 = b'-';

/// Upper bound on the columns a single encoding may expand to.
///
/// The longest known proteins are a few tens of thousands of residues long.
pub const MAX_ALIGNMENT_COLUMNS: u64 = 1_000_000;

/// A single run of the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarOp {
    /// `n` aligned residues copied from the raw sequence.
    Match(u64),
    /// `n` gap columns.
    Delete(u64),
}

impl CigarOp {
    /// Run length of this operation.
    pub fn len(&self) -> u64 {
        match self {
            CigarOp::Match(n) | CigarOp::Delete(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn op_char(&self) -> char {
        match self {
            CigarOp::Match(_) => 'M',
            CigarOp::Delete(_) => 'D',
        }
    }
}

/// Parse a run-length encoding into its operations.
///
/// Returns an empty vector for empty or whitespace-only input.
///
/// # Errors
///
/// Returns [`FerroError::Encoding`] if the input contains anything other than
/// digits and the `M`/`D` operation letters, or ends with a dangling count.
pub fn parse_cigar(cigar: &str) -> Result<Vec<CigarOp>, FerroError> {
    let trimmed = cigar.trim();
    let mut ops = Vec::new();
    let mut count: Option<u64> = None;

    for (i, c) in trimmed.char_indices() {
        match c {
            '0'..='9' => {
                let digit = u64::from(c as u8 - b'0');
                let next = count
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit))
                    .ok_or_else(|| {
                        FerroError::encoding(trimmed, format!("run length overflows at offset {i}"))
                    })?;
                count = Some(next);
            }
            'M' => ops.push(CigarOp::Match(count.take().unwrap_or(1))),
            'D' => ops.push(CigarOp::Delete(count.take().unwrap_or(1))),
            other => {
                return Err(FerroError::encoding(
                    trimmed,
                    format!("unknown operation '{other}' at offset {i}"),
                ));
            }
        }
    }

    if let Some(n) = count {
        return Err(FerroError::encoding(
            trimmed,
            format!("run length {n} is missing its operation"),
        ));
    }

    Ok(ops)
}

/// A parsed run-length alignment encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentEncoding {
    ops: Vec<CigarOp>,
}

impl AlignmentEncoding {
    /// Build an encoding from already-parsed operations.
    pub fn new(ops: Vec<CigarOp>) -> Self {
        Self { ops }
    }

    /// The encoding's operations in order.
    pub fn ops(&self) -> &[CigarOp] {
        &self.ops
    }

    /// Number of residues the encoding consumes from the raw sequence.
    pub fn match_len(&self) -> u64 {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CigarOp::Match(n) => Some(*n),
                CigarOp::Delete(_) => None,
            })
            .fold(0u64, u64::saturating_add)
    }

    /// Total number of alignment columns produced.
    pub fn column_count(&self) -> u64 {
        self.ops.iter().map(CigarOp::len).fold(0u64, u64::saturating_add)
    }

    /// Match length and column count, checked before anything is expanded.
    ///
    /// # Errors
    ///
    /// Returns [`FerroError::Encoding`] if the run totals overflow or exceed
    /// [`MAX_ALIGNMENT_COLUMNS`].
    pub fn checked_lengths(&self) -> Result<(u64, u64), FerroError> {
        let mut matched = 0u64;
        let mut columns = 0u64;
        for op in &self.ops {
            if let CigarOp::Match(n) = op {
                matched = matched.checked_add(*n).ok_or_else(|| self.too_long())?;
            }
            columns = columns.checked_add(op.len()).ok_or_else(|| self.too_long())?;
        }
        if columns > MAX_ALIGNMENT_COLUMNS {
            return Err(self.too_long());
        }
        Ok((matched, columns))
    }

    fn too_long(&self) -> FerroError {
        FerroError::encoding(
            self.to_string(),
            format!("alignment exceeds {} columns", MAX_ALIGNMENT_COLUMNS),
        )
    }

    /// Expand this encoding against a raw ungapped sequence.
    ///
    /// Match runs copy residues through unchanged and Delete runs insert `-`
    /// at their cumulative position, in a single forward pass.
    ///
    /// # Errors
    ///
    /// Returns [`FerroError::Encoding`] if the Match runs do not consume the
    /// raw sequence exactly, or the run totals are out of bounds.
    pub fn reconstruct(&self, raw: &str) -> Result<String, FerroError> {
        let bytes = raw.as_bytes();
        let (expected, columns) = self.checked_lengths()?;
        if expected != bytes.len() as u64 {
            return Err(FerroError::encoding(
                self.to_string(),
                format!(
                    "length mismatch: encoding consumes {} residues, sequence has {}",
                    expected,
                    bytes.len()
                ),
            ));
        }

        let mut aligned = Vec::with_capacity(columns as usize);
        let mut cursor = 0usize;
        for op in &self.ops {
            match *op {
                CigarOp::Match(n) => {
                    let end = cursor + n as usize;
                    aligned.extend_from_slice(&bytes[cursor..end]);
                    cursor = end;
                }
                CigarOp::Delete(n) => {
                    aligned.resize(aligned.len() + n as usize, GAP);
                }
            }
        }

        String::from_utf8(aligned).map_err(|e| FerroError::encoding(self.to_string(), e.to_string()))
    }
}

impl FromStr for AlignmentEncoding {
    type Err = FerroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cigar(s).map(Self::new)
    }
}

impl fmt::Display for AlignmentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{}{}", op.len(), op.op_char())?;
        }
        Ok(())
    }
}

/// Expand a raw sequence with an encoding string in one call.
pub fn reconstruct(raw: &str, cigar: &str) -> Result<String, FerroError> {
    cigar.parse::<AlignmentEncoding>()?.reconstruct(raw)
}
