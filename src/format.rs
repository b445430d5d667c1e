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

//! Rust mappings of the Parquet footer Thrift definitions.
//!
//! The types here are generated by pasting sections of the
//! [`parquet.thrift`] IDL into the binding macros. [`decode_file_metadata`]
//! and [`encode_file_metadata`] connect them to the codec, and
//! [`FooterTail`] handles the fixed eight bytes that close every Parquet
//! file.
//!
//! [`parquet.thrift`]: https://github.com/apache/parquet-format/blob/master/src/main/thrift/parquet.thrift

use std::io::Write;

use crate::bind::{ReadCompact, WriteCompact};
use crate::errors::{Result, ThriftError};
use crate::protocol::{CompactReader, CompactWriter, SliceSource};
use crate::{thrift_enum, thrift_struct, thrift_union, thrift_union_all_empty};

/// Magic bytes closing every Parquet file.
pub const PARQUET_MAGIC: [u8; 4] = *b"PAR1";

/// Size of the fixed footer tail: metadata length plus magic.
pub const FOOTER_TAIL_SIZE: usize = 8;

// ----------------------------------------------------------------------
// Mirrors thrift enum `Type`

thrift_enum!(
/// Physical types supported by Parquet.
///
/// These are intended to be used in combination with encodings to control
/// the on-disk storage format. For example INT16 is not included as a type
/// since a good encoding of INT32 would handle this.
enum Type {
  BOOLEAN = 0;
  INT32 = 1;
  INT64 = 2;
  INT96 = 3;  // deprecated, only used by legacy implementations.
  FLOAT = 4;
  DOUBLE = 5;
  BYTE_ARRAY = 6;
  FIXED_LEN_BYTE_ARRAY = 7;
}
);

// ----------------------------------------------------------------------
// Mirrors thrift enum `ConvertedType`

thrift_enum!(
/// DEPRECATED: Common types used by frameworks such as hive or pig using
/// parquet. ConvertedType is superseded by [`LogicalType`].
enum ConvertedType {
  UTF8 = 0;
  MAP = 1;
  MAP_KEY_VALUE = 2;
  LIST = 3;
  ENUM = 4;
  DECIMAL = 5;
  DATE = 6;
  TIME_MILLIS = 7;
  TIME_MICROS = 8;
  TIMESTAMP_MILLIS = 9;
  TIMESTAMP_MICROS = 10;
  UINT_8 = 11;
  UINT_16 = 12;
  UINT_32 = 13;
  UINT_64 = 14;
  INT_8 = 15;
  INT_16 = 16;
  INT_32 = 17;
  INT_64 = 18;
  JSON = 19;
  BSON = 20;
  INTERVAL = 21;
}
);

// ----------------------------------------------------------------------
// Mirrors thrift enum `FieldRepetitionType`

thrift_enum!(
/// Representation of schema element repetition.
enum FieldRepetitionType {
  /// The field count is required and can be exactly one.
  REQUIRED = 0;
  /// The field count can be zero or one.
  OPTIONAL = 1;
  /// The field count can be zero or more.
  REPEATED = 2;
}
);

// ----------------------------------------------------------------------
// Mirrors thrift enum `Encoding`

thrift_enum!(
/// Encodings supported by Parquet. Not all encodings are valid for all
/// types.
enum Encoding {
  PLAIN = 0;
  PLAIN_DICTIONARY = 2;
  RLE = 3;
  BIT_PACKED = 4;  // deprecated
  DELTA_BINARY_PACKED = 5;
  DELTA_LENGTH_BYTE_ARRAY = 6;
  DELTA_BYTE_ARRAY = 7;
  RLE_DICTIONARY = 8;
  BYTE_STREAM_SPLIT = 9;
}
);

// ----------------------------------------------------------------------
// Mirrors thrift enum `CompressionCodec`

thrift_enum!(
/// Supported block compression algorithms.
enum CompressionCodec {
  UNCOMPRESSED = 0;
  SNAPPY = 1;
  GZIP = 2;
  LZO = 3;
  BROTLI = 4;
  LZ4 = 5;
  ZSTD = 6;
  LZ4_RAW = 7;
}
);

// ----------------------------------------------------------------------
// Mirrors thrift enum `PageType`

thrift_enum!(
enum PageType {
  DATA_PAGE = 0;
  INDEX_PAGE = 1;
  DICTIONARY_PAGE = 2;
  DATA_PAGE_V2 = 3;
}
);

// ----------------------------------------------------------------------
// Mirrors thrift union `TimeUnit`

thrift_union_all_empty!(
/// Time units for logical types.
union TimeUnit {
  1: MilliSeconds MILLIS;
  2: MicroSeconds MICROS;
  3: NanoSeconds NANOS;
}
);

// ----------------------------------------------------------------------
// Mirrors thrift union `ColumnOrder`

thrift_union_all_empty!(
/// Union to specify the order used for the min and max values of a column.
union ColumnOrder {
  /// Values are ordered by signed comparison, unsigned comparison or
  /// lexicographic comparison depending on the column type.
  1: TypeDefinedOrder TYPE_ORDER;
}
);

thrift_struct!(
/// Decimal logical type annotation: scale and precision of the stored
/// numbers.
pub struct DecimalType {
  1: required i32 scale;
  2: required i32 precision;
}
);

thrift_struct!(
/// Time logical type annotation.
pub struct TimeType {
  1: required bool isAdjustedToUTC;
  2: required TimeUnit unit;
}
);

thrift_struct!(
/// Timestamp logical type annotation.
pub struct TimestampType {
  1: required bool isAdjustedToUTC;
  2: required TimeUnit unit;
}
);

thrift_struct!(
/// Integer logical type annotation: bit width and signedness of the stored
/// values.
pub struct IntType {
  1: required i8 bitWidth;
  2: required bool isSigned;
}
);

// ----------------------------------------------------------------------
// Mirrors thrift union `LogicalType`

thrift_union!(
/// Logical types used to annotate the physical types stored in the schema.
union LogicalType {
  1: STRING
  2: MAP
  3: LIST
  4: ENUM
  5: (DecimalType) DECIMAL
  6: DATE
  7: (TimeType) TIME
  8: (TimestampType) TIMESTAMP
  10: (IntType) INTEGER
  11: UNKNOWN
  12: JSON
  13: BSON
  14: UUID
  15: FLOAT16
}
);

thrift_struct!(
/// Element of the flattened schema tree.
///
/// Nesting is flattened to a single list by a depth-first traversal; the
/// children count reconstructs the nested relationship. Leaf elements carry
/// a physical type, inner nodes a children count.
pub struct SchemaElement {
  /// Data type for this field. Not set if the current element is a
  /// non-leaf node.
  1: optional Type type_;
  /// If type is FIXED_LEN_BYTE_ARRAY, this is the byte length of the
  /// values.
  2: optional i32 type_length;
  /// Repetition of the field. The root of the schema does not have a
  /// repetition_type; all other elements must have one.
  3: optional FieldRepetitionType repetition_type;
  /// Name of the field in the schema.
  4: required string name;
  /// Number of nested elements; not set for primitive elements.
  5: optional i32 num_children;
  /// DEPRECATED: record of the original type, superseded by logical_type.
  6: optional ConvertedType converted_type;
  /// DEPRECATED: scale of decimal columns, superseded by logical_type.
  7: optional i32 scale
  8: optional i32 precision
  /// Original field id when the source schema supports field ids.
  9: optional i32 field_id;
  /// The logical type of this element.
  10: optional LogicalType logical_type
}
);

thrift_struct!(
/// Statistics per row group and per page.
///
/// All fields are optional.
pub struct Statistics {
   /// DEPRECATED min and max in signed comparison order, superseded by the
   /// `*_value` fields below.
   1: optional binary max;
   2: optional binary min;
   /// Count of null values in the column.
   3: optional i64 null_count;
   /// Count of distinct values occurring.
   4: optional i64 distinct_count;
   /// Lower and upper bound values in the sort order of the column.
   5: optional binary max_value;
   6: optional binary min_value;
   7: optional bool is_max_value_exact;
   8: optional bool is_min_value_exact;
}
);

thrift_struct!(
/// Unencoded size statistics of a column chunk.
pub struct SizeStatistics {
   1: optional i64 unencoded_byte_array_data_bytes;
   2: optional list<i64> repetition_level_histogram;
   3: optional list<i64> definition_level_histogram;
}
);

thrift_struct!(
/// Wrapper struct to store key-value pairs.
pub struct KeyValue {
  1: required string key
  2: optional string value
}
);

thrift_struct!(
/// Sort order within a row group of a single column.
pub struct SortingColumn {
  /// The ordinal position of the column (in this row group).
  1: required i32 column_idx
  /// If true, indicates this column is sorted in descending order.
  2: required bool descending
  /// If true, nulls will come before non-null values.
  3: required bool nulls_first
}
);

thrift_struct!(
/// Statistics of a given page type and encoding.
pub struct PageEncodingStats {
  1: required PageType page_type;
  2: required Encoding encoding;
  /// Number of pages of this type with this encoding.
  3: required i32 count;
}
);

thrift_struct!(
/// Description of column metadata.
pub struct ColumnMetaData {
  /// Type of this column.
  1: required Type type_
  /// Set of all encodings used for this column.
  2: required list<Encoding> encodings
  /// Path in the schema.
  3: required list<string> path_in_schema
  /// Compression codec.
  4: required CompressionCodec codec
  /// Number of values in this column.
  5: required i64 num_values
  /// Total byte size of all uncompressed pages in this column chunk,
  /// including the headers.
  6: required i64 total_uncompressed_size
  /// Total byte size of all compressed and potentially encrypted pages in
  /// this column chunk, including the headers.
  7: required i64 total_compressed_size
  /// Optional key/value metadata.
  8: optional list<KeyValue> key_value_metadata
  /// Byte offset from beginning of file to first data page.
  9: required i64 data_page_offset
  /// Byte offset from beginning of file to root index page.
  10: optional i64 index_page_offset
  /// Byte offset from the beginning of file to first (only) dictionary
  /// page.
  11: optional i64 dictionary_page_offset
  /// optional statistics for this column chunk.
  12: optional Statistics statistics
  /// Set of all encodings used for pages in this column chunk.
  13: optional list<PageEncodingStats> encoding_stats;
  /// Byte offset from beginning of file to Bloom filter data.
  14: optional i64 bloom_filter_offset;
  /// Size of Bloom filter data including the serialized header, in bytes.
  15: optional i32 bloom_filter_length;
  /// Optional statistics to help estimate total memory when converted to
  /// in-memory representations.
  16: optional SizeStatistics size_statistics;
}
);

thrift_struct!(
/// Metadata of one column chunk within a row group.
pub struct ColumnChunk {
  /// File where column data is stored. If not set, assumed to be the same
  /// file as metadata. This path is relative to the current file.
  1: optional string file_path
  /// DEPRECATED: Byte offset in file_path to the ColumnMetaData.
  2: required i64 file_offset = 0
  /// Column metadata for this chunk.
  3: optional ColumnMetaData meta_data
  /// File offset of ColumnChunk's OffsetIndex.
  4: optional i64 offset_index_offset
  /// Size of ColumnChunk's OffsetIndex, in bytes.
  5: optional i32 offset_index_length
  /// File offset of ColumnChunk's ColumnIndex.
  6: optional i64 column_index_offset
  /// Size of ColumnChunk's ColumnIndex, in bytes.
  7: optional i32 column_index_length
}
);

thrift_struct!(
/// Metadata of one row group.
pub struct RowGroup {
  /// Metadata for each column chunk in this row group, in the same order as
  /// the SchemaElement list in FileMetaData.
  1: required list<ColumnChunk> columns
  /// Total byte size of all the uncompressed column data in this row group.
  2: required i64 total_byte_size
  /// Number of rows in this row group.
  3: required i64 num_rows
  /// If set, specifies a sort ordering of the rows in this group.
  4: optional list<SortingColumn> sorting_columns
  /// Byte offset from beginning of file to first page (data or dictionary)
  /// in this row group.
  5: optional i64 file_offset
  /// Total byte size of all compressed (and potentially encrypted) column
  /// data in this row group.
  6: optional i64 total_compressed_size
  /// Row group ordinal in the file.
  7: optional i16 ordinal
}
);

thrift_struct!(
/// Description of the Parquet file metadata stored in its footer.
pub struct FileMetaData {
  /// Version of this file.
  1: required i32 version
  /// Parquet schema for this file, stored as a flattened tree.
  2: required list<SchemaElement> schema;
  /// Number of rows in this file.
  3: required i64 num_rows
  /// Row groups in this file.
  4: required list<RowGroup> row_groups
  /// Optional key/value metadata.
  5: optional list<KeyValue> key_value_metadata
  /// String for application that wrote this file.
  6: optional string created_by
  /// Sort order used for the min_value and max_value fields in the
  /// Statistics objects and the min_values and max_values fields in the
  /// ColumnIndex objects of each column in this file. One entry per leaf
  /// column, in the same order as the SchemaElement list.
  7: optional list<ColumnOrder> column_orders;
}
);

/// Decode a [`FileMetaData`] from compact protocol bytes, e.g. the footer
/// metadata section of a Parquet file.
pub fn decode_file_metadata(buf: &[u8]) -> Result<FileMetaData> {
    let mut reader = CompactReader::new(SliceSource::new(buf));
    FileMetaData::read_compact(&mut reader)
}

/// Encode a [`FileMetaData`] to compact protocol bytes.
pub fn encode_file_metadata<W: Write>(metadata: &FileMetaData, sink: W) -> Result<()> {
    let mut writer = CompactWriter::new(sink);
    metadata.write_compact(&mut writer)
}

/// The fixed eight bytes closing a Parquet file:
///
/// ```text
/// +-----+--------+
/// | len | 'PAR1' |
/// +-----+--------+
/// ```
///
/// where `len` is the little-endian byte length of the metadata section
/// immediately preceding the tail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FooterTail {
    metadata_length: usize,
}

impl FooterTail {
    /// Decode the footer tail, checking the magic.
    pub fn try_new(tail: &[u8; FOOTER_TAIL_SIZE]) -> Result<Self> {
        if tail[4..] != PARQUET_MAGIC {
            return Err(data_err!("corrupt footer magic"));
        }
        let metadata_length = u32::from_le_bytes(tail[..4].try_into().unwrap());
        Ok(Self {
            metadata_length: metadata_length as usize,
        })
    }

    /// The length of the metadata section preceding the tail, in bytes.
    pub fn metadata_length(&self) -> usize {
        self.metadata_length
    }

    /// Encode the footer tail.
    pub fn encode<W: Write>(metadata_length: usize, mut sink: W) -> Result<()> {
        let len = u32::try_from(metadata_length)
            .map_err(|_| data_err!("metadata length {} exceeds the footer format", metadata_length))?;
        sink.write_all(&len.to_le_bytes())?;
        sink.write_all(&PARQUET_MAGIC)?;
        Ok(())
    }
}
