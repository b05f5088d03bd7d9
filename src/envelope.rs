//! Return-value envelope: the 4-byte marker that prefixes a method's logged return value.
//!
//! A contract call produces an ordered list of log entries; the last one carries the return
//! value as `RETURN_MARKER ++ encoded value`. Offsets inside the value are relative to the
//! first byte after the marker.

use crate::ast::AbiType;
use crate::codec::{self, CodecError};
use crate::value::AbiValue;
use tracing::{debug, warn};

/// Prefix identifying a log entry as an ABI return value.
pub const RETURN_MARKER: [u8; 4] = [0x15, 0x1F, 0x7C, 0x75];

/// Whether a buffer is a bare encoding or a marker-prefixed return value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Envelope {
    #[default]
    Bare,
    ReturnValue,
}

/// Verify the marker and return the bytes after it.
pub fn strip_marker(entry: &[u8]) -> Result<&[u8], CodecError> {
    match entry.strip_prefix(&RETURN_MARKER[..]) {
        Some(body) => Ok(body),
        None => {
            let found = entry[..entry.len().min(RETURN_MARKER.len())].to_vec();
            warn!(len = entry.len(), found = %hex::encode(&found), "log entry is not a return value");
            Err(CodecError::InvalidMarker { found })
        }
    }
}

/// `RETURN_MARKER ++ body`.
pub fn with_marker(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(RETURN_MARKER.len() + body.len());
    out.extend_from_slice(&RETURN_MARKER);
    out.extend_from_slice(body);
    out
}

/// Take the last log entry and strip its marker.
pub fn return_payload<L: AsRef<[u8]>>(logs: &[L]) -> Result<&[u8], CodecError> {
    let last = logs.last().ok_or(CodecError::MissingReturnValue)?;
    let body = strip_marker(last.as_ref())?;
    debug!(logs = logs.len(), payload = body.len(), "return value located");
    Ok(body)
}

/// Locate the return value in `logs` and decode it as `ty`.
pub fn decode_return<L: AsRef<[u8]>>(logs: &[L], ty: &AbiType) -> Result<AbiValue, CodecError> {
    codec::decode(return_payload(logs)?, ty)
}
