//! Runtime values for encoding/decoding (codec representation).

use crate::ast::{AbiType, Field, RecordDescriptor, WORD_WIDTH};
use crate::codec::{self, CodecError};
use byteorder::{BigEndian, ByteOrder};
use std::hash::{Hash, Hasher};

/// 256-bit unsigned integer, stored big-endian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct U256([u8; WORD_WIDTH]);

impl U256 {
    pub const ZERO: U256 = U256([0u8; WORD_WIDTH]);

    pub fn from_be_bytes(bytes: [u8; WORD_WIDTH]) -> Self {
        U256(bytes)
    }

    /// Parse a big-endian integer of any length. Leading zero bytes are ignored; more than
    /// 32 significant bytes is an overflow.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        let significant = &bytes[first..];
        if significant.len() > WORD_WIDTH {
            return Err(CodecError::Overflow(format!(
                "{} significant bytes do not fit uint256",
                significant.len()
            )));
        }
        let mut out = [0u8; WORD_WIDTH];
        out[WORD_WIDTH - significant.len()..].copy_from_slice(significant);
        Ok(U256(out))
    }

    pub fn as_bytes(&self) -> &[u8; WORD_WIDTH] {
        &self.0
    }

    pub fn to_u128(&self) -> Result<u128, CodecError> {
        if self.0[..16].iter().any(|&b| b != 0) {
            return Err(CodecError::Overflow("uint256 value does not fit u128".to_string()));
        }
        Ok(BigEndian::read_u128(&self.0[16..]))
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        U256::from(u128::from(v))
    }
}

impl From<u128> for U256 {
    fn from(v: u128) -> Self {
        let mut out = [0u8; WORD_WIDTH];
        BigEndian::write_u128(&mut out[16..], v);
        U256(out)
    }
}

/// 32-byte account address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; WORD_WIDTH]);

impl Address {
    pub const ZERO: Address = Address([0u8; WORD_WIDTH]);

    pub fn new(bytes: [u8; WORD_WIDTH]) -> Self {
        Address(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let arr: [u8; WORD_WIDTH] = bytes
            .try_into()
            .map_err(|_| CodecError::AddressLength(bytes.len()))?;
        Ok(Address(arr))
    }

    pub fn as_bytes(&self) -> &[u8; WORD_WIDTH] {
        &self.0
    }
}

/// A single ABI value (scalar or compound).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiValue {
    Uint64(u64),
    Uint256(U256),
    Byte(u8),
    Bool(bool),
    Address(Address),
    ByteString(Vec<u8>),
    FixedArray(FixedArray),
    VariableArray(VariableArray),
    Record(Record),
}

impl AbiValue {
    /// Build a scalar of the declared type from a native integer, failing if it does not fit.
    pub fn from_native(ty: &AbiType, v: u128) -> Result<Self, CodecError> {
        let overflow = || CodecError::Overflow(format!("{} does not fit {}", v, ty));
        Ok(match ty {
            AbiType::Byte => AbiValue::Byte(u8::try_from(v).map_err(|_| overflow())?),
            AbiType::Uint64 => AbiValue::Uint64(u64::try_from(v).map_err(|_| overflow())?),
            AbiType::Uint256 => AbiValue::Uint256(U256::from(v)),
            AbiType::Bool => match v {
                0 => AbiValue::Bool(false),
                1 => AbiValue::Bool(true),
                _ => return Err(overflow()),
            },
            other => return Err(CodecError::UnsupportedType(other.to_string())),
        })
    }

    /// `byte[]` holding the given bytes.
    pub fn byte_array(bytes: &[u8]) -> Self {
        AbiValue::VariableArray(VariableArray {
            elem: AbiType::Byte,
            items: bytes.iter().map(|&b| AbiValue::Byte(b)).collect(),
        })
    }

    /// Type tag of this value.
    pub fn abi_type(&self) -> AbiType {
        match self {
            AbiValue::Uint64(_) => AbiType::Uint64,
            AbiValue::Uint256(_) => AbiType::Uint256,
            AbiValue::Byte(_) => AbiType::Byte,
            AbiValue::Bool(_) => AbiType::Bool,
            AbiValue::Address(_) => AbiType::Address,
            AbiValue::ByteString(_) => AbiType::ByteString,
            AbiValue::FixedArray(a) => AbiType::fixed_array(a.elem.clone(), a.items.len()),
            AbiValue::VariableArray(a) => AbiType::variable_array(a.elem.clone()),
            AbiValue::Record(r) => AbiType::Record(r.descriptor.clone()),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiValue::ByteString(_) | AbiValue::VariableArray(_) => true,
            AbiValue::FixedArray(a) => a.elem.is_dynamic(),
            AbiValue::Record(r) => r.descriptor.fields().iter().any(|f| f.ty.is_dynamic()),
            _ => false,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AbiValue::Byte(x) => Some(u64::from(*x)),
            AbiValue::Uint64(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_u256(&self) -> Option<&U256> {
        match self {
            AbiValue::Uint256(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            AbiValue::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AbiValue::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Elements of a fixed or variable array.
    pub fn as_items(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::FixedArray(a) => Some(&a.items),
            AbiValue::VariableArray(a) => Some(&a.items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            AbiValue::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<u64> for AbiValue {
    fn from(v: u64) -> Self {
        AbiValue::Uint64(v)
    }
}

impl From<bool> for AbiValue {
    fn from(v: bool) -> Self {
        AbiValue::Bool(v)
    }
}

impl From<U256> for AbiValue {
    fn from(v: U256) -> Self {
        AbiValue::Uint256(v)
    }
}

impl From<Address> for AbiValue {
    fn from(v: Address) -> Self {
        AbiValue::Address(v)
    }
}

impl From<Record> for AbiValue {
    fn from(v: Record) -> Self {
        AbiValue::Record(v)
    }
}

fn check_items(elem: &AbiType, items: &[AbiValue]) -> Result<(), CodecError> {
    for (i, item) in items.iter().enumerate() {
        let found = item.abi_type();
        if &found != elem {
            return Err(CodecError::TypeMismatch {
                context: format!("element {}", i),
                expected: elem.to_string(),
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

/// `T[N]`: the length is the number of items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedArray {
    elem: AbiType,
    items: Vec<AbiValue>,
}

impl FixedArray {
    pub fn new(elem: AbiType, items: Vec<AbiValue>) -> Result<Self, CodecError> {
        check_items(&elem, &items)?;
        Ok(FixedArray { elem, items })
    }

    /// Build against a declared length.
    pub fn with_len(elem: AbiType, len: usize, items: Vec<AbiValue>) -> Result<Self, CodecError> {
        if items.len() != len {
            return Err(CodecError::ArrayLength { expected: len, found: items.len() });
        }
        FixedArray::new(elem, items)
    }

    pub(crate) fn from_parts(elem: AbiType, items: Vec<AbiValue>) -> Self {
        FixedArray { elem, items }
    }

    pub fn elem(&self) -> &AbiType {
        &self.elem
    }

    pub fn items(&self) -> &[AbiValue] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `T[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableArray {
    elem: AbiType,
    items: Vec<AbiValue>,
}

impl VariableArray {
    pub fn new(elem: AbiType, items: Vec<AbiValue>) -> Result<Self, CodecError> {
        check_items(&elem, &items)?;
        Ok(VariableArray { elem, items })
    }

    pub fn empty(elem: AbiType) -> Self {
        VariableArray { elem, items: Vec::new() }
    }

    pub(crate) fn from_parts(elem: AbiType, items: Vec<AbiValue>) -> Self {
        VariableArray { elem, items }
    }

    pub fn elem(&self) -> &AbiType {
        &self.elem
    }

    pub fn items(&self) -> &[AbiValue] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ordered, named, heterogeneous record (struct or tuple).
///
/// Two records are equal when their encodings are identical, and hash by encoded content.
#[derive(Debug, Clone)]
pub struct Record {
    descriptor: RecordDescriptor,
    values: Vec<AbiValue>,
}

impl Record {
    /// Build a record; values are given in descriptor order and must match the field types.
    pub fn new(descriptor: RecordDescriptor, values: Vec<AbiValue>) -> Result<Self, CodecError> {
        if values.len() != descriptor.len() {
            return Err(CodecError::FieldCount {
                expected: descriptor.len(),
                found: values.len(),
            });
        }
        for (field, value) in descriptor.fields().iter().zip(&values) {
            check_field(field, value)?;
        }
        Ok(Record { descriptor, values })
    }

    pub(crate) fn from_parts(descriptor: RecordDescriptor, values: Vec<AbiValue>) -> Self {
        Record { descriptor, values }
    }

    /// Decode a record of the given shape from `bytes`.
    pub fn parse(descriptor: &RecordDescriptor, bytes: &[u8]) -> Result<Self, CodecError> {
        codec::decode_record(bytes, descriptor).map(|(record, _)| record)
    }

    /// Encode with head/tail framing.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode_record(self)
    }

    pub fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    pub fn values(&self) -> &[AbiValue] {
        &self.values
    }

    /// `(field, value)` pairs in descriptor order.
    pub fn fields(&self) -> impl Iterator<Item = (&Field, &AbiValue)> {
        self.descriptor.fields().iter().zip(self.values.iter())
    }

    pub fn get(&self, name: &str) -> Option<&AbiValue> {
        self.descriptor.index_of(name).map(|i| &self.values[i])
    }

    /// Replace a field's value, keeping the declared type.
    pub fn set(&mut self, name: &str, value: AbiValue) -> Result<(), CodecError> {
        let i = self
            .descriptor
            .index_of(name)
            .ok_or_else(|| CodecError::UnknownField(name.to_string()))?;
        check_field(&self.descriptor.fields()[i], &value)?;
        self.values[i] = value;
        Ok(())
    }
}

fn check_field(field: &Field, value: &AbiValue) -> Result<(), CodecError> {
    let found = value.abi_type();
    if found != field.ty {
        return Err(CodecError::TypeMismatch {
            context: format!("field {}", field.name),
            expected: field.ty.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        match (self.to_bytes(), other.to_bytes()) {
            (Ok(a), Ok(b)) => a == b,
            // Unencodable records (offset overflow) fall back to structural comparison.
            (Err(_), Err(_)) => self.descriptor == other.descriptor && self.values == other.values,
            _ => false,
        }
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.to_bytes() {
            Ok(bytes) => bytes.hash(state),
            Err(_) => {
                self.descriptor.hash(state);
                self.values.hash(state);
            }
        }
    }
}
