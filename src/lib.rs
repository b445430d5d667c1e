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

//! Implementation of the Thrift [compact] binary protocol, with generated
//! bindings for the Thrift types that make up Parquet file footers.
//!
//! The crate is layered:
//!
//! * [`protocol`] holds the byte-level codec:
//!   [`CompactReader`](protocol::CompactReader) and
//!   [`CompactWriter`](protocol::CompactWriter) expose the compact
//!   protocol's operation vocabulary (struct/field/list begin and end,
//!   scalar reads and writes, skipping unknown subtrees) and enforce its
//!   call-ordering grammar.
//! * [`bind`] holds the [`ReadCompact`](bind::ReadCompact) and
//!   [`WriteCompact`](bind::WriteCompact) traits connecting in-memory
//!   values to the codec, with impls for the thrift primitive types.
//! * [`thrift_struct!`], [`thrift_union!`], [`thrift_union_all_empty!`] and
//!   [`thrift_enum!`] generate aggregate types and their codec impls from
//!   pasted thrift IDL.
//! * [`format`] applies the macros to the Parquet footer IDL, yielding
//!   [`FileMetaData`](format::FileMetaData) and friends together with
//!   [`decode_file_metadata`](format::decode_file_metadata) and
//!   [`encode_file_metadata`](format::encode_file_metadata).
//!
//! # Example
//!
//! ```
//! use thrift_compact::bind::{ReadCompact, WriteCompact};
//! use thrift_compact::protocol::{CompactReader, CompactWriter, SliceSource};
//! use thrift_compact::thrift_struct;
//!
//! thrift_struct!(
//! pub struct Person {
//!   1: required string name
//!   2: optional i64 favorite_number
//!   3: optional list<string> interests
//! }
//! );
//!
//! # fn main() -> thrift_compact::errors::Result<()> {
//! let person = Person {
//!     name: "Alice".to_owned(),
//!     favorite_number: Some(1234567890),
//!     interests: Some(vec!["programming".to_owned(), "music".to_owned()]),
//! };
//!
//! let mut writer = CompactWriter::new(Vec::new());
//! person.write_compact(&mut writer)?;
//! let bytes = writer.into_inner();
//!
//! let mut reader = CompactReader::new(SliceSource::new(&bytes));
//! assert_eq!(Person::read_compact(&mut reader)?, person);
//! # Ok(())
//! # }
//! ```
//!
//! Maps are not implemented: Parquet does not use them, and
//! [`skip`](protocol::CompactReader::skip) reports them as such.
//!
//! [compact]: https://github.com/apache/thrift/blob/master/doc/specs/thrift-compact-protocol.md

#[macro_use]
pub mod errors;
pub mod bind;
pub mod format;
mod macros;
pub mod protocol;
