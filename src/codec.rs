//! Encode/decode ABI values.
//!
//! Scalars are fixed-width big-endian. Byte strings and variable arrays carry a 2-byte
//! length/count header. Fixed arrays are a plain concatenation of their elements. Records use
//! head/tail framing: static fields and 2-byte offset slots form the head, and the payloads
//! of dynamic fields are appended after the head in field order, each slot holding the
//! payload's offset from the start of the record.

use crate::ast::{AbiType, RecordDescriptor, HEADER_WIDTH, WORD_WIDTH};
use crate::envelope::{self, Envelope};
use crate::value::{AbiValue, Address, FixedArray, Record, VariableArray, U256};
use byteorder::{BigEndian, ByteOrder};
use std::io::Cursor;
use tracing::trace;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("insufficient data: need {needed} bytes, {available} available")]
    InsufficientData { needed: usize, available: usize },
    #[error("invalid return marker: expected 151f7c75, found {}", hex::encode(.found))]
    InvalidMarker { found: Vec<u8> },
    #[error("no log entries to take a return value from")]
    MissingReturnValue,
    #[error("overflow: {0}")]
    Overflow(String),
    #[error("offset {offset} out of range for buffer of {len} bytes")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    #[error("invalid bool byte: {0:#04x}")]
    InvalidBool(u8),
    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },
    #[error("array length mismatch: expected {expected}, found {found}")]
    ArrayLength { expected: usize, found: usize },
    #[error("field count mismatch: expected {expected}, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("duplicate field: {0}")]
    DuplicateField(String),
    #[error("address must be 32 bytes, got {0}")]
    AddressLength(usize),
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
    #[error("syntax: {0}")]
    Syntax(String),
}

/// Codec bound to one ABI type and an envelope mode.
#[derive(Debug, Clone)]
pub struct Codec {
    ty: AbiType,
    envelope: Envelope,
}

impl Codec {
    pub fn new(ty: AbiType, envelope: Envelope) -> Self {
        Codec { ty, envelope }
    }

    /// Encode a value of the bound type, prefixing the return marker in `ReturnValue` mode.
    pub fn encode(&self, value: &AbiValue) -> Result<Vec<u8>, CodecError> {
        let found = value.abi_type();
        if found != self.ty {
            return Err(CodecError::TypeMismatch {
                context: "value".to_string(),
                expected: self.ty.to_string(),
                found: found.to_string(),
            });
        }
        let body = encode(value)?;
        Ok(match self.envelope {
            Envelope::Bare => body,
            Envelope::ReturnValue => envelope::with_marker(&body),
        })
    }

    /// Decode a value of the bound type. In `ReturnValue` mode the marker is verified and
    /// stripped first; offsets are then relative to the byte after the marker.
    pub fn decode(&self, bytes: &[u8]) -> Result<AbiValue, CodecError> {
        let body = match self.envelope {
            Envelope::Bare => bytes,
            Envelope::ReturnValue => envelope::strip_marker(bytes)?,
        };
        decode(body, &self.ty)
    }
}

/// Encode one value to a fresh buffer.
pub fn encode(value: &AbiValue) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_into(&mut out, value)?;
    Ok(out)
}

/// Decode a value of type `ty` from the front of `bytes`. Trailing bytes are ignored.
pub fn decode(bytes: &[u8], ty: &AbiType) -> Result<AbiValue, CodecError> {
    decode_prefix(bytes, ty).map(|(value, _)| value)
}

/// Decode a value and require that it spans the whole input.
pub fn decode_exact(bytes: &[u8], ty: &AbiType) -> Result<AbiValue, CodecError> {
    let (value, consumed) = decode_prefix(bytes, ty)?;
    if consumed != bytes.len() {
        return Err(CodecError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(value)
}

/// Decode a value and return `(value, bytes_consumed)`. For records the consumed length is
/// the furthest byte reached by the head or any tail payload.
pub fn decode_prefix(bytes: &[u8], ty: &AbiType) -> Result<(AbiValue, usize), CodecError> {
    let mut r = Cursor::new(bytes);
    let value = decode_value(&mut r, ty)?;
    Ok((value, r.position() as usize))
}

pub(crate) fn encode_record(record: &Record) -> Result<Vec<u8>, CodecError> {
    let mut enc = RecordEncoder::with_head(record.descriptor().head_width());
    for (field, value) in record.fields() {
        if field.ty.is_dynamic() {
            enc.push_dynamic(value)?;
        } else {
            enc.push_static(value)?;
        }
    }
    enc.finish()
}

/// Decode a record whose offsets are relative to the start of `origin`.
pub(crate) fn decode_record(
    origin: &[u8],
    desc: &RecordDescriptor,
) -> Result<(Record, usize), CodecError> {
    let mut r = Cursor::new(origin);
    let mut values = Vec::with_capacity(desc.len());
    let mut extent = 0usize;
    for field in desc.fields() {
        if field.ty.is_dynamic() {
            // The cursor only steps over the offset slot; the payload lives in the tail.
            let offset = read_u16(&mut r)? as usize;
            if offset > origin.len() {
                return Err(CodecError::OffsetOutOfRange {
                    offset,
                    len: origin.len(),
                });
            }
            let (value, consumed) = decode_prefix(&origin[offset..], &field.ty)?;
            trace!(field = %field.name, offset, consumed, "dynamic field");
            extent = extent.max(offset + consumed);
            values.push(value);
        } else {
            let value = decode_value(&mut r, &field.ty)?;
            trace!(field = %field.name, "static field");
            values.push(value);
        }
    }
    extent = extent.max(r.position() as usize);
    Ok((Record::from_parts(desc.clone(), values), extent))
}

/// Pending offset slot: where the offset goes, and the payload it will point at.
#[derive(Debug)]
struct PatchSite {
    position: usize,
    payload: Vec<u8>,
}

/// Two-pass record builder: the head is written first with zeroed offset slots, then
/// `finish` appends each payload and backpatches its slot.
#[derive(Debug)]
struct RecordEncoder {
    buf: Vec<u8>,
    pending: Vec<PatchSite>,
}

impl RecordEncoder {
    fn with_head(head_width: usize) -> Self {
        RecordEncoder {
            buf: Vec::with_capacity(head_width),
            pending: Vec::new(),
        }
    }

    fn push_static(&mut self, value: &AbiValue) -> Result<(), CodecError> {
        encode_into(&mut self.buf, value)
    }

    fn push_dynamic(&mut self, value: &AbiValue) -> Result<(), CodecError> {
        let payload = encode(value)?;
        self.pending.push(PatchSite {
            position: self.buf.len(),
            payload,
        });
        self.buf.extend_from_slice(&[0u8; HEADER_WIDTH]);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, CodecError> {
        for site in std::mem::take(&mut self.pending) {
            let offset = u16::try_from(self.buf.len()).map_err(|_| {
                CodecError::Overflow(format!(
                    "tail offset {} does not fit 16 bits",
                    self.buf.len()
                ))
            })?;
            BigEndian::write_u16(&mut self.buf[site.position..site.position + HEADER_WIDTH], offset);
            self.buf.extend_from_slice(&site.payload);
        }
        Ok(self.buf)
    }
}

fn encode_into(w: &mut Vec<u8>, value: &AbiValue) -> Result<(), CodecError> {
    match value {
        AbiValue::Uint64(x) => {
            let mut buf = [0u8; 8];
            BigEndian::write_u64(&mut buf, *x);
            w.extend_from_slice(&buf);
        }
        AbiValue::Uint256(x) => w.extend_from_slice(x.as_bytes()),
        AbiValue::Byte(b) => w.push(*b),
        AbiValue::Bool(b) => w.push(u8::from(*b)),
        AbiValue::Address(a) => w.extend_from_slice(a.as_bytes()),
        AbiValue::ByteString(bytes) => {
            write_header(w, bytes.len(), "byte string length")?;
            w.extend_from_slice(bytes);
        }
        AbiValue::FixedArray(arr) => {
            for item in arr.items() {
                encode_into(w, item)?;
            }
        }
        AbiValue::VariableArray(arr) => {
            write_header(w, arr.len(), "array element count")?;
            for item in arr.items() {
                encode_into(w, item)?;
            }
        }
        // A nested record is framed on its own, so its offsets stay relative to its start.
        AbiValue::Record(rec) => w.extend_from_slice(&encode_record(rec)?),
    }
    Ok(())
}

fn write_header(w: &mut Vec<u8>, n: usize, what: &str) -> Result<(), CodecError> {
    let n = u16::try_from(n)
        .map_err(|_| CodecError::Overflow(format!("{} {} does not fit 16 bits", what, n)))?;
    let mut buf = [0u8; HEADER_WIDTH];
    BigEndian::write_u16(&mut buf, n);
    w.extend_from_slice(&buf);
    Ok(())
}

fn decode_value(r: &mut Cursor<&[u8]>, ty: &AbiType) -> Result<AbiValue, CodecError> {
    Ok(match ty {
        AbiType::Uint64 => AbiValue::Uint64(BigEndian::read_u64(take(r, 8)?)),
        AbiType::Uint256 => AbiValue::Uint256(U256::from_be_bytes(read_word(r)?)),
        AbiType::Byte => AbiValue::Byte(take(r, 1)?[0]),
        AbiType::Bool => match take(r, 1)?[0] {
            0 => AbiValue::Bool(false),
            1 => AbiValue::Bool(true),
            b => return Err(CodecError::InvalidBool(b)),
        },
        AbiType::Address => AbiValue::Address(Address::new(read_word(r)?)),
        AbiType::ByteString => {
            let len = read_u16(r)? as usize;
            AbiValue::ByteString(take(r, len)?.to_vec())
        }
        AbiType::FixedArray(elem, n) => {
            // Zero-width elements read no input, so the length is the only bound on the work.
            if *n > usize::from(u16::MAX) {
                return Err(CodecError::Overflow(format!(
                    "fixed array length {} does not fit 16 bits",
                    n
                )));
            }
            if let Some(needed) = ty.static_width() {
                let available = r.get_ref().len().saturating_sub(r.position() as usize);
                if available < needed {
                    return Err(CodecError::InsufficientData { needed, available });
                }
            }
            let mut items = Vec::with_capacity(*n);
            for _ in 0..*n {
                items.push(decode_value(r, elem)?);
            }
            AbiValue::FixedArray(FixedArray::from_parts((**elem).clone(), items))
        }
        AbiType::VariableArray(elem) => {
            let count = read_u16(r)? as usize;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(decode_value(r, elem)?);
            }
            AbiValue::VariableArray(VariableArray::from_parts((**elem).clone(), items))
        }
        AbiType::Record(desc) => {
            let start = r.position() as usize;
            let origin: &[u8] = *r.get_ref();
            let (record, extent) = decode_record(&origin[start.min(origin.len())..], desc)?;
            r.set_position((start + extent) as u64);
            AbiValue::Record(record)
        }
    })
}

/// Borrow the next `n` bytes and advance the cursor.
fn take<'a>(r: &mut Cursor<&'a [u8]>, n: usize) -> Result<&'a [u8], CodecError> {
    let buf: &'a [u8] = *r.get_ref();
    let pos = r.position() as usize;
    let available = buf.len().saturating_sub(pos);
    if available < n {
        return Err(CodecError::InsufficientData { needed: n, available });
    }
    r.set_position((pos + n) as u64);
    Ok(&buf[pos..pos + n])
}

fn read_u16(r: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    take(r, HEADER_WIDTH).map(BigEndian::read_u16)
}

fn read_word(r: &mut Cursor<&[u8]>) -> Result<[u8; WORD_WIDTH], CodecError> {
    let mut word = [0u8; WORD_WIDTH];
    word.copy_from_slice(take(r, WORD_WIDTH)?);
    Ok(word)
}
