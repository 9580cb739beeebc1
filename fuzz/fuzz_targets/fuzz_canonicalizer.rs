//! Fuzz target for cell normalization.
//!
//! Normalized codes must be non-empty and trimmed, and a code pair must
//! never hold the same code twice.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_canonicalizer -- -max_total_time=600

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sodscan_engine::{Canonicalizer, CodePair};

#[derive(Arbitrary, Debug)]
struct CellInput {
    first: Option<String>,
    second: Option<String>,
    markers: Vec<String>,
}

fuzz_target!(|input: CellInput| {
    if input.markers.len() > 16 {
        return;
    }

    let canon = Canonicalizer::default().with_missing_markers(&input.markers);

    let first = canon.code(input.first.as_deref());
    if let Some(code) = &first {
        let s = code.as_str();
        assert!(!s.is_empty());
        assert_eq!(s, s.trim());
    }
    assert_eq!(first.is_none(), canon.is_missing(input.first.as_deref()));

    let second = canon.code(input.second.as_deref());
    if let (Some(a), Some(b)) = (first, second) {
        let same = a == b;
        match CodePair::new(a.clone(), b.clone()) {
            Some(pair) => {
                assert!(!same);
                assert!(pair.low() < pair.high());
                assert!(pair.contains(&a) && pair.contains(&b));
                assert_eq!(Some(pair.clone()), CodePair::new(b, a));
            }
            None => assert!(same),
        }
    }
});
