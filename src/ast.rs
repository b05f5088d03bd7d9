//! ABI type tags: the static description of what a value looks like on the wire.

use crate::codec::CodecError;
use std::fmt;

/// Width in bytes of the length/count header of dynamic sequences and of record offsets.
pub const HEADER_WIDTH: usize = 2;
/// Width in bytes of an address and of a 256-bit unsigned integer.
pub const WORD_WIDTH: usize = 32;

/// An ABI type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    Uint64,
    Uint256,
    Byte,
    Bool,
    Address,
    /// Raw variable-length bytes (`string`).
    ByteString,
    FixedArray(Box<AbiType>, usize),
    VariableArray(Box<AbiType>),
    Record(RecordDescriptor),
}

impl AbiType {
    pub fn fixed_array(elem: AbiType, len: usize) -> Self {
        AbiType::FixedArray(Box::new(elem), len)
    }

    pub fn variable_array(elem: AbiType) -> Self {
        AbiType::VariableArray(Box::new(elem))
    }

    /// True when the encoded width depends on content.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Uint64 | AbiType::Uint256 | AbiType::Byte | AbiType::Bool | AbiType::Address => false,
            AbiType::ByteString | AbiType::VariableArray(_) => true,
            AbiType::FixedArray(elem, _) => elem.is_dynamic(),
            AbiType::Record(desc) => desc.fields().iter().any(|f| f.ty.is_dynamic()),
        }
    }

    /// Encoded width of a static type; `None` for dynamic types.
    pub fn static_width(&self) -> Option<usize> {
        match self {
            AbiType::Byte | AbiType::Bool => Some(1),
            AbiType::Uint64 => Some(8),
            AbiType::Uint256 | AbiType::Address => Some(WORD_WIDTH),
            AbiType::ByteString | AbiType::VariableArray(_) => None,
            AbiType::FixedArray(elem, n) => elem.static_width().map(|w| w.saturating_mul(*n)),
            AbiType::Record(desc) => desc
                .fields()
                .iter()
                .try_fold(0usize, |acc, f| f.ty.static_width().map(|w| acc.saturating_add(w))),
        }
    }

    /// Width this type occupies in the head of an enclosing record.
    pub fn head_width(&self) -> usize {
        self.static_width().unwrap_or(HEADER_WIDTH)
    }
}

impl fmt::Display for AbiType {
    /// Canonical ABI type string, as used in method signatures.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint64 => f.write_str("uint64"),
            AbiType::Uint256 => f.write_str("uint256"),
            AbiType::Byte => f.write_str("byte"),
            AbiType::Bool => f.write_str("bool"),
            AbiType::Address => f.write_str("address"),
            AbiType::ByteString => f.write_str("string"),
            AbiType::FixedArray(elem, n) => write!(f, "{}[{}]", elem, n),
            AbiType::VariableArray(elem) => write!(f, "{}[]", elem),
            AbiType::Record(desc) => {
                f.write_str("(")?;
                for (i, field) in desc.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// One named field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: AbiType,
}

/// Ordered `(name, type)` list describing a record. Order is fixed at construction and is
/// the only order used when encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordDescriptor {
    fields: Vec<Field>,
}

impl RecordDescriptor {
    /// Build a descriptor from named fields. Field names must be unique.
    pub fn new<I, S>(fields: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (S, AbiType)>,
        S: Into<String>,
    {
        let mut out: Vec<Field> = Vec::new();
        for (name, ty) in fields {
            let name = name.into();
            if out.iter().any(|f| f.name == name) {
                return Err(CodecError::DuplicateField(name));
            }
            out.push(Field { name, ty });
        }
        Ok(RecordDescriptor { fields: out })
    }

    /// Anonymous tuple: fields are named by position ("0", "1", ...).
    pub fn tuple<I>(types: I) -> Self
    where
        I: IntoIterator<Item = AbiType>,
    {
        let fields = types
            .into_iter()
            .enumerate()
            .map(|(i, ty)| Field { name: i.to_string(), ty })
            .collect();
        RecordDescriptor { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field by name. Only for construction and inspection; the codec never
    /// looks fields up by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Total width of the head (static fields plus one offset slot per dynamic field).
    pub fn head_width(&self) -> usize {
        self.fields.iter().map(|f| f.ty.head_width()).sum()
    }
}
