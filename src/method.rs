//! Method descriptors and the call boundary.
//!
//! A call is an ordered list of byte blobs: the 4-byte selector followed by one encoded blob
//! per argument. Building and submitting the transaction that carries those blobs is the
//! job of a [`CallExecutor`]; this module only produces the blobs and reads the return value
//! back out of the resulting logs.

use crate::ast::AbiType;
use crate::codec::{self, CodecError};
use crate::envelope;
use crate::value::AbiValue;
use sha2::{Digest, Sha512_256};
use std::fmt;
use tracing::debug;

/// Width in bytes of a method selector.
pub const SELECTOR_WIDTH: usize = 4;

/// First four bytes of SHA-512/256 over a canonical method signature.
pub fn selector_of(signature: &str) -> [u8; SELECTOR_WIDTH] {
    let digest = Sha512_256::digest(signature.as_bytes());
    let mut out = [0u8; SELECTOR_WIDTH];
    out.copy_from_slice(&digest[..SELECTOR_WIDTH]);
    out
}

/// Executes an encoded call against a contract and returns its log entries in order.
pub trait CallExecutor {
    fn execute(&mut self, app_args: Vec<Vec<u8>>) -> anyhow::Result<Vec<Vec<u8>>>;
}

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("expected {expected} arguments, got {found}")]
    Arity { expected: usize, found: usize },
    #[error("executor: {0}")]
    Executor(anyhow::Error),
}

/// Failure of a method call, labelled with the method name.
#[derive(Debug, thiserror::Error)]
#[error("method {method}: {source}")]
pub struct MethodError {
    pub method: String,
    #[source]
    pub source: CallError,
}

/// A contract method: name, argument types and optional return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub args: Vec<AbiType>,
    pub returns: Option<AbiType>,
}

impl Method {
    pub fn new(name: impl Into<String>, args: Vec<AbiType>, returns: Option<AbiType>) -> Self {
        Method {
            name: name.into(),
            args,
            returns,
        }
    }

    /// Canonical signature, e.g. `transfer(address,uint64)bool`.
    pub fn signature(&self) -> String {
        self.to_string()
    }

    pub fn selector(&self) -> [u8; SELECTOR_WIDTH] {
        selector_of(&self.signature())
    }

    fn fail(&self, source: impl Into<CallError>) -> MethodError {
        MethodError {
            method: self.name.clone(),
            source: source.into(),
        }
    }

    /// Selector blob followed by one encoded blob per argument.
    pub fn encode_call(&self, args: &[AbiValue]) -> Result<Vec<Vec<u8>>, MethodError> {
        if args.len() != self.args.len() {
            return Err(self.fail(CallError::Arity {
                expected: self.args.len(),
                found: args.len(),
            }));
        }
        let mut out = Vec::with_capacity(args.len() + 1);
        out.push(self.selector().to_vec());
        for (i, (ty, value)) in self.args.iter().zip(args).enumerate() {
            let found = value.abi_type();
            if &found != ty {
                return Err(self.fail(CodecError::TypeMismatch {
                    context: format!("argument {}", i),
                    expected: ty.to_string(),
                    found: found.to_string(),
                }));
            }
            out.push(codec::encode(value).map_err(|e| self.fail(e))?);
        }
        Ok(out)
    }

    /// Read the return value from the call's logs. Void methods return `None` without
    /// inspecting the logs.
    pub fn decode_return<L: AsRef<[u8]>>(&self, logs: &[L]) -> Result<Option<AbiValue>, MethodError> {
        match &self.returns {
            None => Ok(None),
            Some(ty) => envelope::decode_return(logs, ty)
                .map(Some)
                .map_err(|e| self.fail(e)),
        }
    }

    /// Encode, execute and decode in one step.
    pub fn call<E>(&self, executor: &mut E, args: &[AbiValue]) -> Result<Option<AbiValue>, MethodError>
    where
        E: CallExecutor + ?Sized,
    {
        let app_args = self.encode_call(args)?;
        debug!(method = %self.name, args = app_args.len() - 1, "calling");
        let logs = executor
            .execute(app_args)
            .map_err(|e| self.fail(CallError::Executor(e)))?;
        self.decode_return(&logs)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")?;
        match &self.returns {
            Some(ty) => write!(f, "{}", ty),
            None => f.write_str("void"),
        }
    }
}
