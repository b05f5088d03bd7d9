//! Decode fuzz target: arbitrary bytes against a fixed set of record shapes. Decoding must
//! not panic, and anything that decodes must re-encode and decode to the same value.
//! Build with: cargo fuzz run decode_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
const SHAPES: &[&str] = &[
    "(address,bool,byte[])",
    "(uint64,string,string)",
    "(byte[][2],(bool,string),uint256)",
    "string[]",
];

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let ty = arc4abi::parse_type(SHAPES[selector as usize % SHAPES.len()]).expect("shape");
    if let Ok(value) = arc4abi::decode(body, &ty) {
        let bytes = arc4abi::encode(&value).expect("decoded value re-encodes");
        let again = arc4abi::decode(&bytes, &ty).expect("re-encoded value decodes");
        assert_eq!(value, again);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
