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

//! Zig-zag integer mapping used by the compact protocol varint encoding.
//!
//! The byte-level ULEB128 loops live on the reader and writer, which own the
//! byte source and sink; the pure integer arithmetic lives here.

/// Map a signed integer onto the unsigned domain, keeping small magnitudes
/// small: `0, -1, 1, -2, ...` become `0, 1, 2, 3, ...`.
pub(crate) const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
pub(crate) const fn zigzag_decode(value: u64) -> i64 {
    (value >> 1) as i64 ^ -((value & 1) as i64)
}

/// Longest legal ULEB128 encoding, in bytes, of an integer of `width` bits.
pub(crate) const fn max_varint_len(width: u32) -> usize {
    (width as usize).div_ceil(7)
}
