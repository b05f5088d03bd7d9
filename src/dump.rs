//! Format values and raw buffers for display.

use crate::value::AbiValue;

/// Render a value on one line: integers in decimal, addresses and byte strings as `0x` hex,
/// arrays as `[a, b]` and records as `{name: value, ...}`.
pub fn format_value(v: &AbiValue) -> String {
    let mut out = String::new();
    write_value(&mut out, v);
    out
}

fn write_value(out: &mut String, v: &AbiValue) {
    match v {
        AbiValue::Uint64(x) => out.push_str(&x.to_string()),
        AbiValue::Byte(x) => out.push_str(&x.to_string()),
        AbiValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        AbiValue::Uint256(x) => match x.to_u128() {
            Ok(n) => out.push_str(&n.to_string()),
            Err(_) => {
                out.push_str("0x");
                out.push_str(&hex::encode(x.as_bytes()));
            }
        },
        AbiValue::Address(a) => {
            out.push_str("0x");
            out.push_str(&hex::encode(a.as_bytes()));
        }
        AbiValue::ByteString(b) => {
            out.push_str("0x");
            out.push_str(&hex::encode(b));
        }
        AbiValue::FixedArray(_) | AbiValue::VariableArray(_) => {
            out.push('[');
            for (i, item) in v.as_items().unwrap_or_default().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        AbiValue::Record(r) => {
            out.push('{');
            for (i, (field, value)) in r.fields().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&field.name);
                out.push_str(": ");
                write_value(out, value);
            }
            out.push('}');
        }
    }
}

/// Hex dump, 16 bytes per line, each line prefixed with its offset.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        out.push_str(&format!("{:04x}:", i * 16));
        for b in chunk {
            out.push_str(&format!(" {:02x}", b));
        }
        out.push('\n');
    }
    out
}
