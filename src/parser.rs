//! Parse ABI type strings and method signatures using PEST.
//!
//! Strings are resolved to [`AbiType`] once, at the boundary; the codec itself only ever
//! matches on the enum.

use crate::ast::{AbiType, RecordDescriptor};
use crate::codec::CodecError;
use crate::method::Method;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::str::FromStr;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct AbiParser;

/// Parse a single type, e.g. `(address,bool,byte[])`.
pub fn parse_type(source: &str) -> Result<AbiType, CodecError> {
    let pair = parse_rule(Rule::type_only, source)?;
    let ty = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::abi_type)
        .ok_or_else(|| CodecError::Syntax("empty type".to_string()))?;
    build_type(ty)
}

/// Parse a method signature, e.g. `transfer(address,uint64)bool`. A `void` return type
/// means the method returns nothing.
pub fn parse_method(source: &str) -> Result<Method, CodecError> {
    let pair = parse_rule(Rule::method, source)?;
    let mut name = String::new();
    let mut args = Vec::new();
    let mut returns = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::method_name => name = inner.as_str().to_string(),
            Rule::arg_list => {
                for arg in inner.into_inner() {
                    args.push(build_type(arg)?);
                }
            }
            Rule::abi_type => {
                if inner.as_str().trim() != "void" {
                    returns = Some(build_type(inner)?);
                }
            }
            _ => {}
        }
    }
    Ok(Method::new(name, args, returns))
}

fn parse_rule(rule: Rule, source: &str) -> Result<Pair<'_, Rule>, CodecError> {
    let mut pairs =
        AbiParser::parse(rule, source).map_err(|e| CodecError::Syntax(e.to_string()))?;
    pairs
        .next()
        .ok_or_else(|| CodecError::Syntax("empty input".to_string()))
}

fn build_type(pair: Pair<Rule>) -> Result<AbiType, CodecError> {
    let mut inner = pair.into_inner();
    let base = inner
        .next()
        .ok_or_else(|| CodecError::Syntax("empty type".to_string()))?;
    let mut ty = match base.as_rule() {
        Rule::tuple => {
            let elems = base
                .into_inner()
                .map(build_type)
                .collect::<Result<Vec<_>, _>>()?;
            AbiType::Record(RecordDescriptor::tuple(elems))
        }
        Rule::type_name => scalar(base.as_str())?,
        other => return Err(CodecError::Syntax(format!("unexpected {:?}", other))),
    };
    // Suffixes apply left to right: `byte[4][]` is a variable array of `byte[4]`.
    for suffix in inner {
        ty = match suffix.into_inner().next() {
            Some(len) => {
                // Same 16-bit bound as the headers and offsets.
                let n: u16 = len.as_str().parse().map_err(|_| {
                    CodecError::Overflow(format!("array length {} does not fit 16 bits", len.as_str()))
                })?;
                AbiType::fixed_array(ty, usize::from(n))
            }
            None => AbiType::variable_array(ty),
        };
    }
    Ok(ty)
}

fn scalar(name: &str) -> Result<AbiType, CodecError> {
    Ok(match name {
        "uint64" => AbiType::Uint64,
        "uint256" => AbiType::Uint256,
        "byte" | "uint8" => AbiType::Byte,
        "bool" => AbiType::Bool,
        "address" => AbiType::Address,
        "string" => AbiType::ByteString,
        other => return Err(CodecError::UnsupportedType(other.to_string())),
    })
}

impl FromStr for AbiType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s)
    }
}

impl FromStr for Method {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_method(s)
    }
}
