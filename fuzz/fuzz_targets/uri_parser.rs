//! Fuzz target for the connection string parser.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_uri_parser
//! ```

#![no_main]

use connstr_core::{ConnectionString, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Untyped inputs must be classified without panicking.
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(input) {
        let _ = parse(&value);
    }

    let Ok(conn) = ConnectionString::parse(input) else {
        return;
    };

    // A canonical form always re-parses to the same descriptor.
    let canonical = conn.to_uri();
    let reparsed = ConnectionString::parse(&canonical)
        .unwrap_or_else(|e| panic!("canonical form {canonical:?} rejected: {e}"));
    assert_eq!(conn, reparsed, "canonical form {canonical:?} changed meaning");
    assert_eq!(reparsed.to_uri(), canonical);
});
