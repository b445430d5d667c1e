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

//! Low-level codec for the Thrift [compact] protocol.
//!
//! The codec is split into:
//! * [`CompactReader`]: decodes compact protocol byte streams pulled from a
//!   [`ByteSource`] ([`SliceSource`] for in-memory buffers, [`IoSource`] for
//!   [`std::io::Read`] values).
//! * [`CompactWriter`]: encodes compact protocol byte streams into a
//!   [`std::io::Write`] sink.
//!
//! Both halves validate call ordering against the protocol grammar and fail
//! with [`ThriftError::InvalidState`](crate::errors::ThriftError) when a
//! caller strays from it.
//!
//! [compact]: https://github.com/apache/thrift/blob/master/doc/specs/thrift-compact-protocol.md

pub mod reader;
pub(crate) mod state;
pub(crate) mod varint;
pub mod writer;

pub use reader::{ByteSource, CompactReader, IoSource, SliceSource};
pub use state::MAX_NESTING_DEPTH;
pub use writer::CompactWriter;

use crate::errors::{Result, ThriftError};

/// Logical thrift types.
///
/// `BOOL` struct fields are packed into the field header on the wire while
/// `BOOL` list elements occupy one body byte each; both are `Bool` here.
/// The thrift `byte` and `i8` types are interchangeable and both map to
/// `Byte`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TType {
    /// End-of-fields marker of a struct.
    Stop,
    /// The return type of fieldless results; never a field or element type.
    Void,
    Bool,
    Byte,
    Double,
    I16,
    I32,
    I64,
    String,
    Struct,
    List,
    Set,
    Map,
}

// Thrift compact protocol 4-bit wire codes.
//
// `BooleanTrue`/`BooleanFalse` double as the value encoding for boolean
// struct fields; `Binary` carries both `string` and `binary` logical types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CType {
    Stop = 0,
    BooleanTrue = 1,
    BooleanFalse = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
}

impl TryFrom<u8> for CType {
    type Error = ThriftError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Stop),
            1 => Ok(Self::BooleanTrue),
            2 => Ok(Self::BooleanFalse),
            3 => Ok(Self::Byte),
            4 => Ok(Self::I16),
            5 => Ok(Self::I32),
            6 => Ok(Self::I64),
            7 => Ok(Self::Double),
            8 => Ok(Self::Binary),
            9 => Ok(Self::List),
            10 => Ok(Self::Set),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            _ => Err(ThriftError::InvalidType(value)),
        }
    }
}

impl CType {
    /// Wire code used when writing a value of logical type `t`.
    ///
    /// Boolean struct fields pick `BooleanTrue`/`BooleanFalse` per value at
    /// the call site; this mapping is for list headers and therefore returns
    /// `BooleanTrue` for `Bool`, matching the current thrift specification.
    /// `Stop` and `Void` never appear as value types and are rejected.
    pub(crate) fn for_ttype(t: TType) -> Result<CType> {
        match t {
            TType::Bool => Ok(Self::BooleanTrue),
            TType::Byte => Ok(Self::Byte),
            TType::I16 => Ok(Self::I16),
            TType::I32 => Ok(Self::I32),
            TType::I64 => Ok(Self::I64),
            TType::Double => Ok(Self::Double),
            TType::String => Ok(Self::Binary),
            TType::Struct => Ok(Self::Struct),
            TType::List => Ok(Self::List),
            TType::Set => Ok(Self::Set),
            TType::Map => Ok(Self::Map),
            TType::Stop | TType::Void => {
                Err(state_err!("{t:?} cannot be encoded as a value type"))
            }
        }
    }
}

impl From<CType> for TType {
    fn from(value: CType) -> Self {
        match value {
            CType::Stop => TType::Stop,
            CType::BooleanTrue | CType::BooleanFalse => TType::Bool,
            CType::Byte => TType::Byte,
            CType::I16 => TType::I16,
            CType::I32 => TType::I32,
            CType::I64 => TType::I64,
            CType::Double => TType::Double,
            CType::Binary => TType::String,
            CType::List => TType::List,
            CType::Set => TType::Set,
            CType::Map => TType::Map,
            CType::Struct => TType::Struct,
        }
    }
}

impl TType {
    /// Decode the element type nibble of a list or set header.
    ///
    /// The original compact specification used `2` for boolean elements, but
    /// a widespread implementation bug made `1` the de-facto standard, so
    /// both are accepted. See
    /// <https://github.com/apache/thrift/blob/master/doc/specs/thrift-compact-protocol.md#list-and-set>.
    pub(crate) fn element_from_wire(code: u8) -> Result<TType> {
        match code {
            1 | 2 => Ok(TType::Bool),
            _ => {
                let ctype = CType::try_from(code)?;
                match ctype {
                    CType::Stop => Err(ThriftError::InvalidType(code)),
                    _ => Ok(TType::from(ctype)),
                }
            }
        }
    }
}

/// Decoded header of one struct field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldHeader {
    /// Logical type of the field value. [`TType::Stop`] marks the end of the
    /// enclosing struct's fields.
    pub ttype: TType,
    /// The field id, either computed from a delta or decoded in full.
    pub id: i16,
}

/// Decoded header of a list or set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListHeader {
    /// Logical type of each element.
    pub element: TType,
    /// Number of elements in the body.
    pub size: u32,
}
