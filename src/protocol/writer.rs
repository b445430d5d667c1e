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

//! Compact protocol encoder.

use std::io::Write;

use crate::errors::{Result, ThriftError};
use crate::protocol::state::ProtocolState;
use crate::protocol::varint::zigzag_encode;
use crate::protocol::{CType, TType};

/// Encoder producing Thrift [compact] protocol bytes into a [`Write`] sink.
///
/// The writer mirrors [`CompactReader`](crate::protocol::CompactReader):
/// it validates call ordering against the same grammar and keeps the field
/// delta base internally, so callers never thread the previous field id by
/// hand. Boolean fields delay their header until the value arrives, because
/// the value selects the type nibble.
///
/// [compact]: https://github.com/apache/thrift/blob/master/doc/specs/thrift-compact-protocol.md
pub struct CompactWriter<W: Write> {
    sink: W,
    state: ProtocolState,
    // Field id of a boolean field whose header is deferred until the value
    // picks the true/false type nibble.
    pending_bool_field: Option<i16>,
}

impl<W: Write> CompactWriter<W> {
    /// Create a writer encoding into `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: ProtocolState::new(),
            pending_bool_field: None,
        }
    }

    /// Consume the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_byte(&mut self, b: u8) -> Result<()> {
        self.sink.write_all(&[b])?;
        Ok(())
    }

    // Shortest-form ULEB128.
    fn write_uvarint(&mut self, val: u64) -> Result<()> {
        let mut v = val;
        while v > 0x7f {
            self.write_byte(v as u8 | 0x80)?;
            v >>= 7;
        }
        self.write_byte(v as u8)
    }

    fn write_zigzag(&mut self, val: i64) -> Result<()> {
        self.write_uvarint(zigzag_encode(val))
    }

    /// Enter a struct. Saves the enclosing delta base; emits no bytes.
    pub fn write_struct_begin(&mut self) -> Result<()> {
        self.state.begin_struct()
    }

    /// Leave a struct, restoring the enclosing scope. The caller must have
    /// written the stop marker via
    /// [`write_field_stop`](Self::write_field_stop) first.
    pub fn write_struct_end(&mut self) -> Result<()> {
        self.state.end_struct()
    }

    /// Start a field of type `ttype` with the given id.
    ///
    /// Ids within reach of the previous field id encode as a one byte
    /// delta; others as the full zig-zag id. For [`TType::Bool`] the header
    /// is deferred until [`write_bool`](Self::write_bool) supplies the
    /// value.
    pub fn write_field_begin(&mut self, ttype: TType, id: i16) -> Result<()> {
        if ttype == TType::Bool {
            self.state.begin_field(true)?;
            self.pending_bool_field = Some(id);
            return Ok(());
        }
        let ctype = CType::for_ttype(ttype)?;
        self.state.begin_field(false)?;
        self.write_field_header(ctype, id)
    }

    fn write_field_header(&mut self, ctype: CType, id: i16) -> Result<()> {
        let delta = id.wrapping_sub(self.state.last_field_id());
        if delta > 0 && delta <= 15 {
            self.write_byte((delta as u8) << 4 | ctype as u8)?;
        } else {
            self.write_byte(ctype as u8)?;
            self.write_zigzag(id as i64)?;
        }
        self.state.set_last_field_id(id);
        Ok(())
    }

    /// Finish the current field. Fails if a boolean field header is still
    /// pending, since its value was never written.
    pub fn write_field_end(&mut self) -> Result<()> {
        if let Some(id) = self.pending_bool_field {
            return Err(state_err!("bool field {} has no value", id));
        }
        self.state.end_field()
    }

    /// Write the end-of-fields marker of the current struct.
    pub fn write_field_stop(&mut self) -> Result<()> {
        self.state.check_field()?;
        self.write_byte(CType::Stop as u8)
    }

    /// Start a list of `size` elements of type `element`.
    pub fn write_list_begin(&mut self, element: TType, size: usize) -> Result<()> {
        let ctype = CType::for_ttype(element)?;
        let size = u32::try_from(size)
            .map_err(|_| overflow_err!("list size {} exceeds the wire format", size))?;
        self.state.begin_list()?;
        if size <= 14 {
            self.write_byte((size as u8) << 4 | ctype as u8)
        } else {
            self.write_byte(0xf0 | ctype as u8)?;
            self.write_uvarint(size as u64)
        }
    }

    /// Finish the current list, restoring the enclosing scope.
    pub fn write_list_end(&mut self) -> Result<()> {
        self.state.end_list()
    }

    /// Write a boolean value.
    ///
    /// After a boolean [`write_field_begin`](Self::write_field_begin) this
    /// emits the combined header carrying the value in its type nibble; as a
    /// list element it emits one body byte.
    pub fn write_bool(&mut self, val: bool) -> Result<()> {
        match self.pending_bool_field.take() {
            Some(id) => {
                let ctype = if val {
                    CType::BooleanTrue
                } else {
                    CType::BooleanFalse
                };
                self.write_field_header(ctype, id)
            }
            None => {
                self.state.check_container()?;
                self.write_byte(val as u8)
            }
        }
    }

    /// Write an `i8`.
    pub fn write_i8(&mut self, val: i8) -> Result<()> {
        self.state.check_scalar()?;
        self.write_byte(val as u8)
    }

    /// Write a zig-zag varint encoded `i16`.
    pub fn write_i16(&mut self, val: i16) -> Result<()> {
        self.state.check_scalar()?;
        self.write_zigzag(val as i64)
    }

    /// Write a zig-zag varint encoded `i32`.
    pub fn write_i32(&mut self, val: i32) -> Result<()> {
        self.state.check_scalar()?;
        self.write_zigzag(val as i64)
    }

    /// Write a zig-zag varint encoded `i64`.
    pub fn write_i64(&mut self, val: i64) -> Result<()> {
        self.state.check_scalar()?;
        self.write_zigzag(val)
    }

    /// Write a `double` as its little-endian IEEE 754 bit pattern.
    pub fn write_double(&mut self, val: f64) -> Result<()> {
        self.state.check_scalar()?;
        self.sink.write_all(&val.to_le_bytes())?;
        Ok(())
    }

    /// Write a length-prefixed binary value.
    pub fn write_binary(&mut self, val: &[u8]) -> Result<()> {
        self.state.check_scalar()?;
        self.write_uvarint(val.len() as u64)?;
        self.sink.write_all(val)?;
        Ok(())
    }

    /// Write a string as a length-prefixed binary value.
    pub fn write_string(&mut self, val: &str) -> Result<()> {
        self.write_binary(val.as_bytes())
    }

    /// Write a struct with no fields: a lone stop marker. Used for union
    /// variants whose payload type carries no data.
    pub fn write_empty_struct(&mut self) -> Result<()> {
        self.write_struct_begin()?;
        self.write_field_stop()?;
        self.write_struct_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> CompactWriter<Vec<u8>> {
        CompactWriter::new(Vec::new())
    }

    #[test]
    fn test_field_delta_boundaries() {
        let mut w = writer();
        w.write_struct_begin().unwrap();

        // delta 1..=15 packs into the header byte
        w.write_field_begin(TType::I32, 1).unwrap();
        w.write_i32(0).unwrap();
        w.write_field_end().unwrap();
        w.write_field_begin(TType::I32, 16).unwrap();
        w.write_i32(0).unwrap();
        w.write_field_end().unwrap();

        // a delta of 16 needs the long form
        w.write_field_begin(TType::I32, 32).unwrap();
        w.write_i32(0).unwrap();
        w.write_field_end().unwrap();

        // so does a backwards jump
        w.write_field_begin(TType::I32, 2).unwrap();
        w.write_i32(0).unwrap();
        w.write_field_end().unwrap();

        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();

        let bytes = w.into_inner();
        assert_eq!(
            bytes,
            [
                0x15, 0x00, // id 1, delta 1
                0xf5, 0x00, // id 16, delta 15
                0x05, 0x40, 0x00, // id 32, absolute
                0x05, 0x04, 0x00, // id 2, absolute
                0x00, // stop
            ]
        );
    }

    #[test]
    fn test_bool_field_packs_value_into_header() {
        let mut w = writer();
        w.write_struct_begin().unwrap();
        w.write_field_begin(TType::Bool, 1).unwrap();
        w.write_bool(true).unwrap();
        w.write_field_end().unwrap();
        w.write_field_begin(TType::Bool, 2).unwrap();
        w.write_bool(false).unwrap();
        w.write_field_end().unwrap();
        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();

        assert_eq!(w.into_inner(), [0x11, 0x12, 0x00]);
    }

    #[test]
    fn test_dangling_bool_field_is_rejected() {
        let mut w = writer();
        w.write_struct_begin().unwrap();
        w.write_field_begin(TType::Bool, 1).unwrap();
        match w.write_field_end() {
            Err(ThriftError::InvalidState(_)) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_list_header_forms() {
        let mut w = writer();
        w.write_struct_begin().unwrap();
        w.write_field_begin(TType::List, 1).unwrap();
        w.write_list_begin(TType::I64, 3).unwrap();
        for v in [1i64, 2, 3] {
            w.write_i64(v).unwrap();
        }
        w.write_list_end().unwrap();
        w.write_field_end().unwrap();
        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();
        assert_eq!(w.into_inner(), [0x19, 0x36, 0x02, 0x04, 0x06, 0x00]);

        // 15 elements force the varint size form
        let mut w = writer();
        w.write_struct_begin().unwrap();
        w.write_field_begin(TType::List, 1).unwrap();
        w.write_list_begin(TType::Bool, 15).unwrap();
        for _ in 0..15 {
            w.write_bool(true).unwrap();
        }
        w.write_list_end().unwrap();
        w.write_field_end().unwrap();
        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();

        let bytes = w.into_inner();
        assert_eq!(&bytes[..3], [0x19, 0xf1, 0x0f]);
        // one body byte per boolean element
        assert_eq!(&bytes[3..18], [1u8; 15]);
        assert_eq!(bytes[18], 0x00);
    }

    #[test]
    fn test_nested_struct_restores_delta_base() {
        let mut w = writer();
        w.write_struct_begin().unwrap();
        w.write_field_begin(TType::I32, 5).unwrap();
        w.write_i32(1).unwrap();
        w.write_field_end().unwrap();

        // the nested struct starts its own delta scope at zero
        w.write_field_begin(TType::Struct, 6).unwrap();
        w.write_struct_begin().unwrap();
        w.write_field_begin(TType::I32, 1).unwrap();
        w.write_i32(2).unwrap();
        w.write_field_end().unwrap();
        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();
        w.write_field_end().unwrap();

        // delta continues from 6 in the outer struct
        w.write_field_begin(TType::I32, 7).unwrap();
        w.write_i32(3).unwrap();
        w.write_field_end().unwrap();
        w.write_field_stop().unwrap();
        w.write_struct_end().unwrap();

        assert_eq!(
            w.into_inner(),
            [0x55, 0x02, 0x1c, 0x15, 0x04, 0x00, 0x15, 0x06, 0x00]
        );
    }

    #[test]
    fn test_value_required_after_header() {
        let mut w = writer();
        w.write_struct_begin().unwrap();
        w.write_field_begin(TType::I32, 1).unwrap();
        // a second header without a value is out of order
        match w.write_field_begin(TType::I32, 2) {
            Err(ThriftError::InvalidState(_)) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_stop_outside_struct_is_rejected() {
        let mut w = writer();
        match w.write_field_stop() {
            Err(ThriftError::InvalidState(_)) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }
}
