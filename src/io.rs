//! File opening helpers shared by the loaders

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::FerroError;

/// Open a text file for line reading, decompressing `.gz`/`.bgz` files
///
/// Uses a multi-member decoder so bgzip output reads as one stream.
pub fn open_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, FerroError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FerroError::Io {
        msg: format!("Failed to open {}: {}", path.display(), e),
    })?;

    let compressed = path
        .extension()
        .is_some_and(|e| e == "gz" || e == "bgz");
    if compressed {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
