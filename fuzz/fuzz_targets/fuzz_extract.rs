// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use pagecraft_core::instruction::{extract, fragment_span};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Some(span) = fragment_span(text) {
        assert!(text.is_char_boundary(span.start) && text.is_char_boundary(span.end));
    }
    if let Ok(extraction) = extract(text) {
        assert!(extraction.remainder.len() < text.len());
    }
});
