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

//! Compact protocol decoder.

use std::io::Read;

use crate::errors::{Result, ThriftError};
use crate::protocol::state::{ProtocolState, MAX_NESTING_DEPTH};
use crate::protocol::varint::{max_varint_len, zigzag_decode};
use crate::protocol::{CType, FieldHeader, ListHeader, TType};

// Bytes reserved up front for a length-prefixed value read from an untrusted
// stream. Larger values grow on demand so a corrupt length cannot force a
// huge allocation before any payload byte has been seen.
const PREALLOC_LIMIT: usize = 1 << 14;

/// Abstract byte source feeding a [`CompactReader`].
///
/// The codec borrows the source for its own lifetime and never closes it.
pub trait ByteSource {
    /// Read a single byte.
    fn read_byte(&mut self) -> Result<u8>;

    /// Fill `buf` completely.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Read `len` bytes into a freshly allocated buffer.
    fn read_owned(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Discard `len` bytes.
    fn skip_bytes(&mut self, len: usize) -> Result<()>;
}

/// A [`ByteSource`] over an in-memory slice.
pub struct SliceSource<'a> {
    buf: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Create a source reading from the bytes in `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// The bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        self.buf
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        let ret = *self
            .buf
            .first()
            .ok_or_else(|| eof_err!("input exhausted"))?;
        self.buf = &self.buf[1..];
        Ok(ret)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let src = self
            .buf
            .get(..buf.len())
            .ok_or_else(|| eof_err!("input exhausted after {} bytes", self.buf.len()))?;
        buf.copy_from_slice(src);
        self.buf = &self.buf[buf.len()..];
        Ok(())
    }

    fn read_owned(&mut self, len: usize) -> Result<Vec<u8>> {
        let src = self
            .buf
            .get(..len)
            .ok_or_else(|| eof_err!("input ends inside a {} byte value", len))?;
        let mut out = Vec::new();
        out.try_reserve_exact(len)?;
        out.extend_from_slice(src);
        self.buf = &self.buf[len..];
        Ok(out)
    }

    #[inline]
    fn skip_bytes(&mut self, len: usize) -> Result<()> {
        if self.buf.len() < len {
            return Err(eof_err!("input ends inside a {} byte value", len));
        }
        self.buf = &self.buf[len..];
        Ok(())
    }
}

/// A [`ByteSource`] wrapping a [`Read`] value, for streaming inputs such as
/// files.
pub struct IoSource<R: Read> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Create a source pulling bytes from `inner`.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0_u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)?;
        Ok(())
    }

    fn read_owned(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve(len.min(PREALLOC_LIMIT))?;
        let read = self
            .inner
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut out)?;
        if read < len {
            return Err(eof_err!("input ends inside a {} byte value", len));
        }
        Ok(out)
    }

    fn skip_bytes(&mut self, len: usize) -> Result<()> {
        let copied = std::io::copy(
            &mut self.inner.by_ref().take(len as u64),
            &mut std::io::sink(),
        )?;
        if (copied as usize) < len {
            return Err(eof_err!("input ends inside a {} byte value", len));
        }
        Ok(())
    }
}

/// Decoder for byte streams in the Thrift [compact] protocol.
///
/// Call ordering is validated against the protocol grammar: struct, field
/// and list begin/end operations must nest properly, values must follow
/// their headers, and violations fail with
/// [`ThriftError::InvalidState`]. Boolean struct fields carry their value in
/// the field header; [`read_field_begin`](Self::read_field_begin) latches it
/// and a following [`read_bool`](Self::read_bool) returns it without
/// touching the source.
///
/// [compact]: https://github.com/apache/thrift/blob/master/doc/specs/thrift-compact-protocol.md
pub struct CompactReader<S: ByteSource> {
    src: S,
    state: ProtocolState,
    // Value of a boolean field decoded from its header, pending the
    // read_bool call that consumes it.
    pending_bool: Option<bool>,
}

impl<S: ByteSource> CompactReader<S> {
    /// Create a reader decoding from `src`.
    pub fn new(src: S) -> Self {
        Self {
            src,
            state: ProtocolState::new(),
            pending_bool: None,
        }
    }

    /// Consume the reader, returning the underlying source.
    pub fn into_inner(self) -> S {
        self.src
    }

    /// Read a ULEB128 varint of at most `width` significant bits.
    ///
    /// Encodings longer than the width permits are rejected even when the
    /// excess bytes only carry zeros, so a hostile stream cannot stall the
    /// decoder with continuation bytes.
    fn read_uvarint(&mut self, width: u32) -> Result<u64> {
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.src.read_byte()?;
            if shift >= width {
                return Err(overflow_err!(
                    "varint exceeds {} bytes",
                    max_varint_len(width)
                ));
            }
            let bits = (byte & 0x7f) as u64;
            if shift + 7 > width && (bits >> (width - shift)) != 0 {
                return Err(overflow_err!("varint exceeds {} bits", width));
            }
            result |= bits << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
    }

    /// Read a zig-zag encoded signed varint of at most `width` bits.
    fn read_zigzag(&mut self, width: u32) -> Result<i64> {
        Ok(zigzag_decode(self.read_uvarint(width)?))
    }

    /// Enter a struct. Saves the enclosing delta base and starts a new field
    /// scope; consumes no bytes.
    pub fn read_struct_begin(&mut self) -> Result<()> {
        self.state.begin_struct()
    }

    /// Leave a struct, restoring the enclosing scope. The caller must have
    /// observed the stop field first.
    pub fn read_struct_end(&mut self) -> Result<()> {
        self.state.end_struct()
    }

    /// Read the header of the next struct field.
    ///
    /// Returns a [`TType::Stop`] header at the end of the struct's fields
    /// without changing state; the caller then proceeds to
    /// [`read_struct_end`](Self::read_struct_end).
    pub fn read_field_begin(&mut self) -> Result<FieldHeader> {
        self.state.check_field()?;
        let header = self.src.read_byte()?;
        let delta = (header & 0xf0) >> 4;
        let ctype = CType::try_from(header & 0x0f)?;

        if ctype == CType::Stop {
            return Ok(FieldHeader {
                ttype: TType::Stop,
                id: 0,
            });
        }

        let id = if delta != 0 {
            self.state
                .last_field_id()
                .checked_add(delta as i16)
                .ok_or_else(|| {
                    overflow_err!(
                        "cannot add field delta {} to {}",
                        delta,
                        self.state.last_field_id()
                    )
                })?
        } else {
            self.read_zigzag(16)? as i16
        };

        let is_bool = match ctype {
            CType::BooleanTrue => {
                self.pending_bool = Some(true);
                true
            }
            CType::BooleanFalse => {
                self.pending_bool = Some(false);
                true
            }
            _ => false,
        };

        self.state.begin_field(is_bool)?;
        self.state.set_last_field_id(id);
        Ok(FieldHeader {
            ttype: TType::from(ctype),
            id,
        })
    }

    /// Finish the current field. An unconsumed boolean latch is discarded;
    /// its value was already decoded from the header.
    pub fn read_field_end(&mut self) -> Result<()> {
        self.pending_bool = None;
        self.state.end_field()
    }

    /// Read the header of a list or set.
    pub fn read_list_begin(&mut self) -> Result<ListHeader> {
        self.state.begin_list()?;
        let header = self.src.read_byte()?;
        // some writers emit a bare zero byte for an empty list; report it as
        // an empty byte list rather than rejecting the element type
        if header == 0 {
            return Ok(ListHeader {
                element: TType::Byte,
                size: 0,
            });
        }
        let element = TType::element_from_wire(header & 0x0f)?;
        let size_nibble = (header & 0xf0) >> 4;
        let size = if size_nibble != 15 {
            size_nibble as u32
        } else {
            self.read_uvarint(32)? as u32
        };
        Ok(ListHeader { element, size })
    }

    /// Finish the current list, restoring the enclosing scope.
    pub fn read_list_end(&mut self) -> Result<()> {
        self.state.end_list()
    }

    /// Read a boolean value.
    ///
    /// A latched field-header value is returned without consuming input;
    /// otherwise (a list element) one body byte is read, zero meaning false.
    pub fn read_bool(&mut self) -> Result<bool> {
        self.state.check_bool()?;
        if let Some(val) = self.pending_bool.take() {
            return Ok(val);
        }
        Ok(self.src.read_byte()? != 0)
    }

    /// Read an `i8`.
    pub fn read_i8(&mut self) -> Result<i8> {
        self.state.check_scalar()?;
        Ok(self.src.read_byte()? as i8)
    }

    /// Read an `i16`.
    pub fn read_i16(&mut self) -> Result<i16> {
        self.state.check_scalar()?;
        Ok(self.read_zigzag(16)? as i16)
    }

    /// Read an `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.state.check_scalar()?;
        Ok(self.read_zigzag(32)? as i32)
    }

    /// Read an `i64`.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.state.check_scalar()?;
        self.read_zigzag(64)
    }

    /// Read a `double` stored as a little-endian IEEE 754 bit pattern.
    pub fn read_double(&mut self) -> Result<f64> {
        self.state.check_scalar()?;
        let mut buf = [0_u8; 8];
        self.src.read_exact(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }

    /// Read a length-prefixed binary value into an owned buffer.
    pub fn read_binary(&mut self) -> Result<Vec<u8>> {
        self.state.check_scalar()?;
        let len = self.read_uvarint(64)?;
        let len = usize::try_from(len)
            .map_err(|_| overflow_err!("binary length {} does not fit in memory", len))?;
        self.src.read_owned(len)
    }

    /// Read a binary value and validate it as UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        Ok(String::from_utf8(self.read_binary()?)?)
    }

    /// Skip one value of logical type `ttype`, up to the default nesting
    /// depth of [`MAX_NESTING_DEPTH`].
    ///
    /// Total over well-formed substructure: scalars consume their exact
    /// byte count, structs are walked field by field until the stop marker,
    /// lists and sets element by element. Map values are not implemented.
    pub fn skip(&mut self, ttype: TType) -> Result<()> {
        self.skip_till_depth(ttype, MAX_NESTING_DEPTH)
    }

    /// Skip one value of logical type `ttype` with an explicit recursion
    /// budget; descending past it fails with
    /// [`ThriftError::StackDepth`].
    pub fn skip_till_depth(&mut self, ttype: TType, depth: usize) -> Result<()> {
        match ttype {
            // consumes the field latch, or one body byte in a list
            TType::Bool => self.read_bool().map(drop),
            TType::Byte => self.read_i8().map(drop),
            TType::I16 | TType::I32 | TType::I64 => {
                self.state.check_scalar()?;
                self.skip_uvarint()
            }
            TType::Double => {
                self.state.check_scalar()?;
                self.src.skip_bytes(8)
            }
            TType::String => {
                self.state.check_scalar()?;
                self.skip_binary()
            }
            TType::Struct => {
                self.state.check_scalar()?;
                self.skip_struct_body(depth)
            }
            TType::List | TType::Set => {
                self.state.check_scalar()?;
                self.skip_list_body(depth)
            }
            TType::Map => Err(nyi_err!("cannot skip map values")),
            TType::Stop | TType::Void => {
                Err(state_err!("cannot skip a value of type {ttype:?}"))
            }
        }
    }

    // Consume a varint without keeping the value, still bounding its length.
    fn skip_uvarint(&mut self) -> Result<()> {
        for _ in 0..max_varint_len(64) {
            if self.src.read_byte()? & 0x80 == 0 {
                return Ok(());
            }
        }
        Err(overflow_err!(
            "varint exceeds {} bytes",
            max_varint_len(64)
        ))
    }

    fn skip_binary(&mut self) -> Result<()> {
        let len = self.read_uvarint(64)?;
        let len = usize::try_from(len)
            .map_err(|_| overflow_err!("binary length {} does not fit in memory", len))?;
        self.src.skip_bytes(len)
    }

    // Walks raw field headers without touching the protocol state; a skip
    // consumes exactly one value, so the caller's state is already correct.
    fn skip_struct_body(&mut self, depth: usize) -> Result<()> {
        if depth == 0 {
            return Err(stack_err!("skip exceeded the nesting budget"));
        }
        let mut last_field_id = 0i16;
        loop {
            let header = self.src.read_byte()?;
            let delta = (header & 0xf0) >> 4;
            let ctype = CType::try_from(header & 0x0f)?;
            if ctype == CType::Stop {
                return Ok(());
            }
            last_field_id = if delta != 0 {
                last_field_id.checked_add(delta as i16).ok_or_else(|| {
                    overflow_err!("cannot add field delta {} to {}", delta, last_field_id)
                })?
            } else {
                self.read_zigzag(16)? as i16
            };
            self.skip_value_body(ctype, depth - 1)?;
        }
    }

    fn skip_list_body(&mut self, depth: usize) -> Result<()> {
        if depth == 0 {
            return Err(stack_err!("skip exceeded the nesting budget"));
        }
        let header = self.src.read_byte()?;
        if header == 0 {
            return Ok(());
        }
        let element = TType::element_from_wire(header & 0x0f)?;
        let size_nibble = (header & 0xf0) >> 4;
        let size = if size_nibble != 15 {
            size_nibble as u32
        } else {
            self.read_uvarint(32)? as u32
        };
        for _ in 0..size {
            match element {
                // list elements store the boolean in the body
                TType::Bool => {
                    self.src.read_byte()?;
                }
                _ => {
                    let ctype = CType::for_ttype(element)?;
                    self.skip_value_body(ctype, depth - 1)?;
                }
            }
        }
        Ok(())
    }

    fn skip_value_body(&mut self, ctype: CType, depth: usize) -> Result<()> {
        if depth == 0 {
            return Err(stack_err!("skip exceeded the nesting budget"));
        }
        match ctype {
            // boolean fields carry their value in the header
            CType::BooleanTrue | CType::BooleanFalse => Ok(()),
            CType::Byte => self.src.read_byte().map(drop),
            CType::I16 | CType::I32 | CType::I64 => self.skip_uvarint(),
            CType::Double => self.src.skip_bytes(8),
            CType::Binary => self.skip_binary(),
            CType::Struct => self.skip_struct_body(depth),
            CType::List | CType::Set => self.skip_list_body(depth),
            CType::Map => Err(nyi_err!("cannot skip map values")),
            CType::Stop => Err(ThriftError::InvalidType(CType::Stop as u8)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(bytes: &[u8]) -> CompactReader<SliceSource<'_>> {
        CompactReader::new(SliceSource::new(bytes))
    }

    #[test]
    fn test_read_single_i64_field() {
        // struct { 1: i64 } carrying 1234567890
        let bytes = [0x16, 0xa4, 0x8b, 0xb0, 0x99, 0x09, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        let field = r.read_field_begin().unwrap();
        assert_eq!(field.id, 1);
        assert_eq!(field.ttype, TType::I64);
        assert_eq!(r.read_i64().unwrap(), 1234567890);
        r.read_field_end().unwrap();
        let stop = r.read_field_begin().unwrap();
        assert_eq!(stop.ttype, TType::Stop);
        r.read_struct_end().unwrap();
    }

    #[test]
    fn test_bool_field_consumes_no_body() {
        // struct { 1: bool = true, 2: bool = false }
        let bytes = [0x11, 0x12, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();

        let field = r.read_field_begin().unwrap();
        assert_eq!((field.id, field.ttype), (1, TType::Bool));
        assert!(r.read_bool().unwrap());
        r.read_field_end().unwrap();

        let field = r.read_field_begin().unwrap();
        assert_eq!((field.id, field.ttype), (2, TType::Bool));
        assert!(!r.read_bool().unwrap());
        r.read_field_end().unwrap();

        assert_eq!(r.read_field_begin().unwrap().ttype, TType::Stop);
        r.read_struct_end().unwrap();
        // the two values came from the headers alone
        assert!(r.into_inner().remaining().is_empty());
    }

    #[test]
    fn test_invalid_type_nibble() {
        let bytes = [0x1f, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        match r.read_field_begin() {
            Err(ThriftError::InvalidType(15)) => {}
            other => panic!("expected InvalidType, got {other:?}"),
        }
    }

    #[test]
    fn test_varint_overflow() {
        // six continuation bytes can never fit an i32
        let bytes = [0x15, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        r.read_field_begin().unwrap();
        match r.read_i32() {
            Err(ThriftError::Overflow(_)) => {}
            other => panic!("expected Overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_varint_value_overflow() {
        // three bytes whose top bits push past 16
        let bytes = [0xff, 0xff, 0x7f];
        let mut r = CompactReader::new(SliceSource::new(&bytes));
        match r.read_uvarint(16) {
            Err(ThriftError::Overflow(_)) => {}
            other => panic!("expected Overflow, got {other:?}"),
        }
        // while the same bits are fine as a 32 bit read
        let mut r = CompactReader::new(SliceSource::new(&bytes));
        assert_eq!(r.read_uvarint(32).unwrap(), 0x1fffff);
    }

    #[test]
    fn test_eof_mid_varint() {
        let bytes = [0x16, 0x80, 0x80];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        r.read_field_begin().unwrap();
        match r.read_i64() {
            Err(ThriftError::Eof(_)) => {}
            other => panic!("expected Eof, got {other:?}"),
        }
    }

    #[test]
    fn test_absolute_field_id() {
        // delta nibble of zero means a zig-zag encoded absolute id follows
        let bytes = [0x05, 0xa4, 0x13, 0x14, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        let field = r.read_field_begin().unwrap();
        assert_eq!(field.id, 1234);
        assert_eq!(field.ttype, TType::I32);
        assert_eq!(r.read_i32().unwrap(), 10);
    }

    #[test]
    fn test_bool_list_reads_body_bytes() {
        // list<bool> [true, false, true]
        let bytes = [0x19, 0x31, 0x01, 0x00, 0x01, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        r.read_field_begin().unwrap();
        let header = r.read_list_begin().unwrap();
        assert_eq!(header.element, TType::Bool);
        assert_eq!(header.size, 3);
        assert!(r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert!(r.read_bool().unwrap());
        r.read_list_end().unwrap();
        r.read_field_end().unwrap();
    }

    #[test]
    fn test_long_list_header() {
        // 20 byte-sized elements force the varint size encoding
        let mut bytes = vec![0x19, 0xf3, 0x14];
        bytes.extend(std::iter::repeat_n(0x02, 20));
        bytes.push(0x00);
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        r.read_field_begin().unwrap();
        let header = r.read_list_begin().unwrap();
        assert_eq!(header.element, TType::Byte);
        assert_eq!(header.size, 20);
        for _ in 0..20 {
            assert_eq!(r.read_i8().unwrap(), 2);
        }
        r.read_list_end().unwrap();
        r.read_field_end().unwrap();
    }

    #[test]
    fn test_skip_is_transparent() {
        // struct { 5: string "abc", 1: i32 7 } where field 5 is skipped
        let bytes = [0x58, 0x03, b'a', b'b', b'c', 0x05, 0x02, 0x0e, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();

        let field = r.read_field_begin().unwrap();
        assert_eq!(field.id, 5);
        r.skip(field.ttype).unwrap();
        r.read_field_end().unwrap();

        let field = r.read_field_begin().unwrap();
        assert_eq!(field.id, 1);
        assert_eq!(r.read_i32().unwrap(), 7);
        r.read_field_end().unwrap();

        assert_eq!(r.read_field_begin().unwrap().ttype, TType::Stop);
        r.read_struct_end().unwrap();
    }

    #[test]
    fn test_skip_depth_bound() {
        // structs nested 30 deep, each at field 1
        let mut bytes = Vec::new();
        for _ in 0..30 {
            bytes.push(0x1c);
        }
        bytes.extend(std::iter::repeat_n(0x00, 31));

        // a budget of 20 is exhausted
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        r.read_field_begin().unwrap();
        match r.skip_till_depth(TType::Struct, 20) {
            Err(ThriftError::StackDepth(_)) => {}
            other => panic!("expected StackDepth, got {other:?}"),
        }

        // while the default budget walks it fine
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        r.read_field_begin().unwrap();
        r.skip(TType::Struct).unwrap();
        r.read_field_end().unwrap();
    }

    #[test]
    fn test_skip_map_not_implemented() {
        let bytes = [0x1b, 0x01, 0x55, 0x02, 0x04, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        let field = r.read_field_begin().unwrap();
        assert_eq!(field.ttype, TType::Map);
        match r.skip(field.ttype) {
            Err(ThriftError::NotImplemented(_)) => {}
            other => panic!("expected NotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_outside_value_position() {
        let bytes = [0x00];
        let mut r = reader(&bytes);
        match r.read_i32() {
            Err(ThriftError::InvalidState(_)) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
        r.read_struct_begin().unwrap();
        match r.read_i32() {
            Err(ThriftError::InvalidState(_)) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_quirk() {
        // a bare zero header byte decodes as an empty list
        let bytes = [0x19, 0x00, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        r.read_field_begin().unwrap();
        let header = r.read_list_begin().unwrap();
        assert_eq!(header.size, 0);
        assert_eq!(header.element, TType::Byte);
        r.read_list_end().unwrap();
        r.read_field_end().unwrap();
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        let bytes = [0x18, 0x02, 0xc3, 0x28, 0x00];
        let mut r = reader(&bytes);
        r.read_struct_begin().unwrap();
        r.read_field_begin().unwrap();
        match r.read_string() {
            Err(ThriftError::Utf8(_)) => {}
            other => panic!("expected Utf8, got {other:?}"),
        }
    }

    #[test]
    fn test_io_source_matches_slice_source() {
        let bytes = [0x18, 0x05, b'A', b'l', b'i', b'c', b'e', 0x00];
        let mut r = CompactReader::new(IoSource::new(&bytes[..]));
        r.read_struct_begin().unwrap();
        let field = r.read_field_begin().unwrap();
        assert_eq!((field.id, field.ttype), (1, TType::String));
        assert_eq!(r.read_string().unwrap(), "Alice");
        r.read_field_end().unwrap();
        assert_eq!(r.read_field_begin().unwrap().ttype, TType::Stop);
        r.read_struct_end().unwrap();
    }
}
