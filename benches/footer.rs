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

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use thrift_compact::bind::Bytes;
use thrift_compact::format::{
    decode_file_metadata, encode_file_metadata, ColumnChunk, ColumnMetaData, CompressionCodec,
    Encoding, FieldRepetitionType, FileMetaData, RowGroup, SchemaElement, Statistics, Type,
};

const NUM_COLUMNS: usize = 1_000;
const NUM_ROW_GROUPS: usize = 10;

fn sample_statistics(rng: &mut StdRng) -> Statistics {
    let mut min = [0u8; 8];
    let mut max = [0u8; 8];
    rng.fill(&mut min[..]);
    rng.fill(&mut max[..]);
    Statistics {
        max: None,
        min: None,
        null_count: Some(rng.random_range(0..100)),
        distinct_count: None,
        max_value: Some(Bytes::copy_from_slice(&max)),
        min_value: Some(Bytes::copy_from_slice(&min)),
        is_max_value_exact: Some(true),
        is_min_value_exact: Some(true),
    }
}

fn encoded_meta() -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);

    let mut schema = Vec::with_capacity(NUM_COLUMNS + 1);
    schema.push(SchemaElement {
        type_: None,
        type_length: None,
        repetition_type: None,
        name: "schema".to_owned(),
        num_children: Some(NUM_COLUMNS as i32),
        converted_type: None,
        scale: None,
        precision: None,
        field_id: None,
        logical_type: None,
    });
    for i in 0..NUM_COLUMNS {
        schema.push(SchemaElement {
            type_: Some(Type::DOUBLE),
            type_length: None,
            repetition_type: Some(FieldRepetitionType::REQUIRED),
            name: format!("col_{i}"),
            num_children: None,
            converted_type: None,
            scale: None,
            precision: None,
            field_id: None,
            logical_type: None,
        });
    }

    let row_groups = (0..NUM_ROW_GROUPS)
        .map(|i| {
            let columns = (0..NUM_COLUMNS)
                .map(|c| ColumnChunk {
                    file_path: None,
                    file_offset: 0,
                    meta_data: Some(ColumnMetaData {
                        type_: Type::DOUBLE,
                        encodings: vec![Encoding::PLAIN, Encoding::RLE],
                        path_in_schema: vec![format!("col_{c}")],
                        codec: CompressionCodec::SNAPPY,
                        num_values: 10_000,
                        total_uncompressed_size: 80_000,
                        total_compressed_size: 40_000,
                        key_value_metadata: None,
                        data_page_offset: (i * NUM_COLUMNS + c) as i64 * 40_000,
                        index_page_offset: None,
                        dictionary_page_offset: None,
                        statistics: Some(sample_statistics(&mut rng)),
                        encoding_stats: None,
                        bloom_filter_offset: None,
                        bloom_filter_length: None,
                        size_statistics: None,
                    }),
                    offset_index_offset: None,
                    offset_index_length: None,
                    column_index_offset: None,
                    column_index_length: None,
                })
                .collect();
            RowGroup {
                columns,
                total_byte_size: 40_000 * NUM_COLUMNS as i64,
                num_rows: 10_000,
                sorting_columns: None,
                file_offset: None,
                total_compressed_size: None,
                ordinal: Some(i as i16),
            }
        })
        .collect();

    let metadata = FileMetaData {
        version: 2,
        schema,
        num_rows: 10_000 * NUM_ROW_GROUPS as i64,
        row_groups,
        key_value_metadata: None,
        created_by: Some("thrift-compact bench".to_owned()),
        column_orders: None,
    };

    let mut buf = Vec::new();
    encode_file_metadata(&metadata, &mut buf).unwrap();
    buf
}

fn criterion_benchmark(c: &mut Criterion) {
    let buf = encoded_meta();
    c.bench_function("decode file metadata", |b| {
        b.iter(|| black_box(decode_file_metadata(&buf).unwrap()))
    });

    let metadata = decode_file_metadata(&buf).unwrap();
    c.bench_function("encode file metadata", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(buf.len());
            encode_file_metadata(black_box(&metadata), &mut out).unwrap();
            black_box(out)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
