//! Fuzz target: `LineReader::feed` + `Message::parse`
//!
//! Drives arbitrary byte sequences through the line reader and classifies
//! every line it yields.  Asserts that it never panics, never yields an
//! empty or over-long line, and resynchronises after a reset.
//!
//! cargo fuzz run fuzz_line_reader

#![no_main]

use libfuzzer_sys::fuzz_target;
use petfeeder::link::{LineReader, MAX_LINE_LEN, Message};

fuzz_target!(|data: &[u8]| {
    let mut reader = LineReader::new();

    for &b in data {
        if let Some(line) = reader.feed(b) {
            assert!(!line.is_empty(), "reader must not yield empty lines");
            assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
            // Classification is total: every line maps to some variant.
            let _ = Message::parse(&line);
        }
    }

    // After a reset the reader must accept a clean line again.
    reader.reset();
    let mut got = None;
    for &b in b"PI_PONG\n" {
        got = reader.feed(b).or(got);
    }
    assert_eq!(got.as_deref(), Some("PI_PONG"));
});
