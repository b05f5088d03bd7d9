//! Inspect ABI encodings from the command line.
//!
//! Usage:
//!   abi_tool selector SIGNATURE          e.g. abi_tool selector "add(uint64,uint64)uint64"
//!   abi_tool decode [--return] TYPE HEX  e.g. abi_tool decode "(bool,byte[])" 0100030003010203
//!   abi_tool dump HEX
//!
//! Options:
//!   --return, -r  The input is a logged return value: verify and strip the 4-byte marker.
//!
//! Set RUST_LOG (e.g. RUST_LOG=arc4abi=trace) to see per-field decode events on stderr.

use anyhow::{bail, Context};
use arc4abi::dump::{format_value, hex_dump};
use arc4abi::{parse_method, parse_type, selector_of, Codec, Envelope};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: abi_tool selector SIGNATURE | decode [--return] TYPE HEX | dump HEX";

fn parse_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).with_context(|| format!("invalid hex: {}", s))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let envelope = if let Some(pos) = args.iter().position(|a| a == "--return" || a == "-r") {
        args.remove(pos);
        Envelope::ReturnValue
    } else {
        Envelope::Bare
    };

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["selector", signature] => {
            // Canonicalise through the parser when possible so spacing does not matter.
            let selector = match parse_method(signature) {
                Ok(method) => method.selector(),
                Err(e) => {
                    eprintln!("warning: {}; hashing signature verbatim", e);
                    selector_of(signature)
                }
            };
            println!("{}", hex::encode(selector));
        }
        ["decode", ty, data] => {
            let ty = parse_type(ty)?;
            let bytes = parse_hex(data)?;
            let value = Codec::new(ty.clone(), envelope)
                .decode(&bytes)
                .with_context(|| format!("decoding {}", ty))?;
            println!("{}", format_value(&value));
        }
        ["dump", data] => {
            print!("{}", hex_dump(&parse_hex(data)?));
        }
        _ => bail!(USAGE),
    }
    Ok(())
}
