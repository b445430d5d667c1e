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

//! Traits binding in-memory values to the protocol codec.
//!
//! * [`ReadCompact`]: decode a value from a [`CompactReader`].
//! * [`WriteCompact`]: encode a value into a [`CompactWriter`].
//! * [`WriteCompactField`]: encode a value as a struct field, header and
//!   all. A blanket impl covers every [`WriteCompact`] type.
//!
//! Implementations for the thrift primitive types live here; aggregate
//! types get theirs from the [`thrift_struct!`](crate::thrift_struct),
//! [`thrift_union!`](crate::thrift_union) and
//! [`thrift_enum!`](crate::thrift_enum) macros.

use std::cmp::Ordering;
use std::io::Write;

pub use bytes::Bytes;

use crate::errors::Result;
use crate::protocol::{ByteSource, CompactReader, CompactWriter, TType};

// Element count reserved up front when decoding a list. Larger lists grow on
// demand so a corrupt size cannot force a huge allocation before any element
// has been decoded.
const LIST_PREALLOC_LIMIT: usize = 1024;

/// Values decodable from a compact protocol stream.
pub trait ReadCompact: Sized {
    /// Read one value of type `Self` positioned at the current point of the
    /// stream.
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self>;
}

/// Values encodable to a compact protocol stream.
pub trait WriteCompact {
    /// Logical type announced in field and list headers for this value.
    const TTYPE: TType;

    /// Write this value at the current point of the stream.
    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()>;
}

/// Struct-field encoding: header, value, field end.
pub trait WriteCompactField {
    /// Write this value as the struct field `field_id`.
    fn write_compact_field<W: Write>(
        &self,
        writer: &mut CompactWriter<W>,
        field_id: i16,
    ) -> Result<()>;
}

// The writer owns the delta base and the boolean header latch, so one
// blanket impl serves every field type, booleans included.
impl<T: WriteCompact> WriteCompactField for T {
    fn write_compact_field<W: Write>(
        &self,
        writer: &mut CompactWriter<W>,
        field_id: i16,
    ) -> Result<()> {
        writer.write_field_begin(Self::TTYPE, field_id)?;
        self.write_compact(writer)?;
        writer.write_field_end()
    }
}

/// Wrapper for thrift `double` values providing `Eq` and `Ord` via the
/// IEEE 754 total order, so generated types containing doubles still derive
/// `Eq`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedF64(f64);

impl From<f64> for OrderedF64 {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<OrderedF64> for f64 {
    fn from(value: OrderedF64) -> Self {
        value.0
    }
}

impl Eq for OrderedF64 {} // Marker trait, requires PartialEq

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ReadCompact for bool {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        reader.read_bool()
    }
}

impl ReadCompact for i8 {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        reader.read_i8()
    }
}

impl ReadCompact for i16 {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        reader.read_i16()
    }
}

impl ReadCompact for i32 {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        reader.read_i32()
    }
}

impl ReadCompact for i64 {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        reader.read_i64()
    }
}

impl ReadCompact for f64 {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        reader.read_double()
    }
}

impl ReadCompact for OrderedF64 {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        Ok(OrderedF64(reader.read_double()?))
    }
}

impl ReadCompact for String {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        reader.read_string()
    }
}

impl ReadCompact for Bytes {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        Ok(Bytes::from(reader.read_binary()?))
    }
}

/// Lists decode element by element after their header; the element count is
/// taken from the wire, with pre-allocation clamped against corrupt sizes.
impl<T: ReadCompact> ReadCompact for Vec<T> {
    fn read_compact<S: ByteSource>(reader: &mut CompactReader<S>) -> Result<Self> {
        let header = reader.read_list_begin()?;
        let size = header.size as usize;
        let mut out = Vec::new();
        out.try_reserve(size.min(LIST_PREALLOC_LIMIT))?;
        for _ in 0..size {
            out.push(T::read_compact(reader)?);
        }
        reader.read_list_end()?;
        Ok(out)
    }
}

impl WriteCompact for bool {
    const TTYPE: TType = TType::Bool;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_bool(*self)
    }
}

impl WriteCompact for i8 {
    const TTYPE: TType = TType::Byte;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_i8(*self)
    }
}

impl WriteCompact for i16 {
    const TTYPE: TType = TType::I16;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_i16(*self)
    }
}

impl WriteCompact for i32 {
    const TTYPE: TType = TType::I32;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_i32(*self)
    }
}

impl WriteCompact for i64 {
    const TTYPE: TType = TType::I64;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_i64(*self)
    }
}

impl WriteCompact for f64 {
    const TTYPE: TType = TType::Double;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_double(*self)
    }
}

impl WriteCompact for OrderedF64 {
    const TTYPE: TType = TType::Double;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_double(self.0)
    }
}

impl WriteCompact for String {
    const TTYPE: TType = TType::String;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_string(self)
    }
}

impl WriteCompact for &str {
    const TTYPE: TType = TType::String;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_string(self)
    }
}

impl WriteCompact for Bytes {
    const TTYPE: TType = TType::String;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_binary(self)
    }
}

impl WriteCompact for &[u8] {
    const TTYPE: TType = TType::String;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_binary(self)
    }
}

impl<T: WriteCompact> WriteCompact for Vec<T> {
    const TTYPE: TType = TType::List;

    fn write_compact<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_list_begin(T::TTYPE, self.len())?;
        for item in self {
            item.write_compact(writer)?;
        }
        writer.write_list_end()
    }
}
