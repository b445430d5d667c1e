// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Common error types and macros.

use std::collections::TryReserveError;
use std::error::Error;
use std::string::FromUtf8Error;
use std::{io, result, str};

/// Error raised while encoding or decoding compact protocol data.
///
/// Every failure mode of the codec and the binding layer maps onto exactly
/// one variant, so callers can dispatch on the kind without parsing
/// messages.
#[derive(Debug)]
pub enum ThriftError {
    /// Failure of the underlying byte source or sink.
    Transport(io::Error),
    /// The byte source was exhausted in the middle of a value.
    Eof(String),
    /// A varint ran past the bit width declared for its position.
    Overflow(String),
    /// An unknown 4-bit type code was found on the wire.
    InvalidType(u8),
    /// An operation was attempted in a protocol state that forbids it.
    InvalidState(String),
    /// An allocation requested during decoding could not be satisfied.
    OutOfMemory(String),
    /// Struct or list nesting exceeded the fixed depth bound.
    StackDepth(String),
    /// The wire data uses a feature this crate does not implement.
    NotImplemented(String),
    /// A union was decoded without any recognized variant being set.
    CantParseUnion(String),
    /// A struct was decoded without one of its required fields.
    RequiredFieldMissing(String),
    /// A string value was not valid UTF-8.
    Utf8(String),
    /// The bytes were well-formed at the protocol level but carry a value
    /// outside the expected domain, e.g. an unknown enum code.
    InvalidData(String),
}

impl std::fmt::Display for ThriftError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            ThriftError::Transport(e) => write!(fmt, "Transport error: {e}"),
            ThriftError::Eof(message) => write!(fmt, "EOF: {message}"),
            ThriftError::Overflow(message) => write!(fmt, "Varint overflow: {message}"),
            ThriftError::InvalidType(value) => {
                write!(fmt, "Invalid compact type code: {value}")
            }
            ThriftError::InvalidState(message) => write!(fmt, "Invalid state: {message}"),
            ThriftError::OutOfMemory(message) => write!(fmt, "Out of memory: {message}"),
            ThriftError::StackDepth(message) => write!(fmt, "Nesting too deep: {message}"),
            ThriftError::NotImplemented(message) => write!(fmt, "NYI: {message}"),
            ThriftError::CantParseUnion(message) => write!(fmt, "Union error: {message}"),
            ThriftError::RequiredFieldMissing(message) => {
                write!(fmt, "Missing required field: {message}")
            }
            ThriftError::Utf8(message) => write!(fmt, "Invalid UTF-8: {message}"),
            ThriftError::InvalidData(message) => write!(fmt, "Invalid data: {message}"),
        }
    }
}

impl Error for ThriftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ThriftError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ThriftError {
    fn from(e: io::Error) -> ThriftError {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => ThriftError::Eof("unexpected end of stream".to_owned()),
            _ => ThriftError::Transport(e),
        }
    }
}

impl From<str::Utf8Error> for ThriftError {
    fn from(e: str::Utf8Error) -> ThriftError {
        ThriftError::Utf8(e.to_string())
    }
}

impl From<FromUtf8Error> for ThriftError {
    fn from(e: FromUtf8Error) -> ThriftError {
        ThriftError::Utf8(e.to_string())
    }
}

impl From<TryReserveError> for ThriftError {
    fn from(e: TryReserveError) -> ThriftError {
        ThriftError::OutOfMemory(e.to_string())
    }
}

/// A specialized `Result` for thrift codec errors.
pub type Result<T, E = ThriftError> = result::Result<T, E>;

// ----------------------------------------------------------------------
// Convenient macros for different errors

macro_rules! eof_err {
    ($fmt:expr) => (ThriftError::Eof($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ThriftError::Eof(format!($fmt, $($args),*)));
}

macro_rules! overflow_err {
    ($fmt:expr) => (ThriftError::Overflow($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ThriftError::Overflow(format!($fmt, $($args),*)));
}

macro_rules! state_err {
    ($fmt:expr) => (ThriftError::InvalidState($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ThriftError::InvalidState(format!($fmt, $($args),*)));
}

macro_rules! stack_err {
    ($fmt:expr) => (ThriftError::StackDepth($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ThriftError::StackDepth(format!($fmt, $($args),*)));
}

macro_rules! nyi_err {
    ($fmt:expr) => (ThriftError::NotImplemented($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ThriftError::NotImplemented(format!($fmt, $($args),*)));
}

macro_rules! data_err {
    ($fmt:expr) => (ThriftError::InvalidData($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ThriftError::InvalidData(format!($fmt, $($args),*)));
}
