//! Fuzz target for the alignment encoding parser and reconstruction
//!
//! Feeds arbitrary encodings paired with arbitrary sequences; neither the
//! parser nor reconstruction may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let (cigar, raw) = input.split_once('\n').unwrap_or((input, ""));
        if let Ok(encoding) = cigar.parse::<ferro_paralogues::AlignmentEncoding>() {
            if let Ok(aligned) = encoding.reconstruct(raw) {
                assert_eq!(aligned.len() as u64, encoding.column_count());
                assert!(encoding.column_count() <= ferro_paralogues::alignment::MAX_ALIGNMENT_COLUMNS);
            }
            let placeholder = ferro_paralogues::alignment::EncodedRow::new("PAR", None, cigar);
            let _ = placeholder.reconstruct();
        }
    }
});
