//! Type-string parser fuzz target: feed arbitrary text to the ABI type and method parsers.
//! Neither may panic, and every parsed type must print back to a string that parses to the
//! same type.
//! Build with: cargo fuzz run type_parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(ty) = arc4abi::parse_type(s) {
        let again = arc4abi::parse_type(&ty.to_string()).expect("canonical type reparses");
        assert_eq!(ty, again);
    }
    let _ = arc4abi::parse_method(s);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run type_parser_fuzz");
}
