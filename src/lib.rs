//! # arc4abi: ARC4-style ABI codec
//!
//! Serializes typed values into the byte blobs passed to a smart-contract method call, and
//! reads a method's return value back out of its execution logs.
//!
//! ## Wire format
//!
//! - Scalars, big-endian and fixed width: `byte`/`bool` 1 byte, `uint64` 8 bytes,
//!   `uint256`/`address` 32 bytes.
//! - `string` and `T[]`: 2-byte length/count header, then the bytes/elements.
//! - `T[N]`: the N element encodings concatenated, no header.
//! - Records `(A,B,...)`: a head of static fields and 2-byte offset slots (one per dynamic
//!   field), followed by the dynamic payloads in field order. Offsets count from the start
//!   of the record.
//! - Return values: logged as `15 1f 7c 75 ++ encoding`, in the last log entry.
//!
//! ## Example
//!
//! ```
//! use arc4abi::{codec, parse_type, AbiValue, Address, Record};
//!
//! let ty = parse_type("(address,bool,byte[])").unwrap();
//! let desc = match &ty {
//!     arc4abi::AbiType::Record(d) => d.clone(),
//!     _ => unreachable!(),
//! };
//! let record = Record::new(
//!     desc,
//!     vec![
//!         AbiValue::Address(Address::ZERO),
//!         AbiValue::Bool(true),
//!         AbiValue::byte_array(&[1, 2, 3]),
//!     ],
//! )
//! .unwrap();
//! let bytes = record.to_bytes().unwrap();
//! assert_eq!(bytes.len(), 40);
//! assert_eq!(&bytes[33..35], &[0x00, 0x23]);
//! assert_eq!(codec::decode(&bytes, &ty).unwrap(), AbiValue::Record(record));
//! ```

pub mod ast;
pub mod codec;
pub mod dump;
pub mod envelope;
pub mod method;
pub mod parser;
pub mod value;

pub use ast::{AbiType, Field, RecordDescriptor};
pub use codec::{decode, decode_exact, decode_prefix, encode, Codec, CodecError};
pub use envelope::{decode_return, strip_marker, Envelope, RETURN_MARKER};
pub use method::{selector_of, CallError, CallExecutor, Method, MethodError};
pub use parser::{parse_method, parse_type};
pub use value::{AbiValue, Address, FixedArray, Record, VariableArray, U256};
