//! Fuzz target for environment variable expansion.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_env_expansion
//! ```

#![no_main]

use arbitrary::Arbitrary;
use connstr_core::{EnvExpander, MapEnvSource};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    template: String,
    vars: Vec<(String, String)>,
}

fuzz_target!(|input: Input| {
    let source = input
        .vars
        .into_iter()
        .fold(MapEnvSource::new(), |source, (name, value)| source.set(name, value));
    let expander = EnvExpander::with_source(source);

    // Strings without references pass through untouched.
    let result = expander.expand(&input.template);
    if !EnvExpander::<MapEnvSource>::has_variables(&input.template) {
        assert_eq!(result.as_deref().ok(), Some(input.template.as_str()));
    }
});
