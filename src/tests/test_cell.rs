/*
* Copyright (C) 2019-2024 EverX. All Rights Reserved.
*
* Licensed under the SOFTWARE EVALUATION License (the "License"); you may not use
* this file except in compliance with the License.
*
* Unless required by applicable law or agreed to in writing, software
* distributed under the License is distributed on an "AS IS" BASIS,
* WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
* See the License for the specific EVERX DEV software governing permissions and
* limitations under the License.
*/

use super::*;
use std::str::FromStr;

fn assert_overflow(err: crate::Error) {
    assert!(
        matches!(err.downcast_ref::<VaultError>(), Some(VaultError::CellOverflow { .. })),
        "unexpected error {}", err
    );
}

fn assert_schema_mismatch(err: crate::Error) {
    assert!(
        matches!(err.downcast_ref::<VaultError>(), Some(VaultError::SchemaMismatch(_))),
        "unexpected error {}", err
    );
}

#[test]
fn test_empty_cell_hash() {
    let empty = BuilderData::new().into_cell().unwrap();
    assert_eq!(empty.repr_hash(), UInt256::DEFAULT_CELL_HASH);
    assert_eq!(
        empty.repr_hash(),
        UInt256::from_str("96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7").unwrap()
    );
    assert_eq!(empty, Cell::default());
    assert!(empty.is_empty());
    assert_eq!(empty.depth(), 0);
}

#[test]
fn test_repr_hash_vectors() {
    let mut b = BuilderData::new();
    b.append_u8(0xff).unwrap();
    let byte = b.into_cell().unwrap();
    assert_eq!(byte.repr_hash().as_hex_string(), "81f3b92f222078b1606cfc3eebfee22216cc40ac99e6524b00fbaa933a6bcd47");

    // one bit: completion tag lands in the same byte
    let mut b = BuilderData::new();
    b.append_bit_one().unwrap();
    let bit = b.into_cell().unwrap();
    assert_eq!(bit.repr_hash().as_hex_string(), "7c6c1a965fd501d2938c2c0e06626bdaa3531357016e169070c9ef79c4c46bc0");

    let mut b = BuilderData::new();
    b.checked_append_reference(Cell::default()).unwrap();
    let parent = b.into_cell().unwrap();
    assert_eq!(parent.repr_hash().as_hex_string(), "6c64b3153333f7af728149b88cd7b27f5ded7cd17ac88893ee47fc208a15e640");
    assert_eq!(parent.depth(), 1);
}

#[test]
fn test_cell_display() {
    let mut b = BuilderData::new();
    b.append_u8(0xff).unwrap();
    b.append_bit_one().unwrap();
    let child = b.into_cell().unwrap();
    assert_eq!(child.to_string(), "x{ffc_}");

    let mut b = BuilderData::new();
    b.append_bits(0b1010, 4).unwrap();
    b.checked_append_reference(child).unwrap();
    let cell = b.into_cell().unwrap();
    assert_eq!(cell.to_string(), "x{a} ^x{ffc_}");
}

#[test]
fn test_bits_overflow() {
    let mut b = BuilderData::new();
    b.append_raw(&[0x55; 128], 1023).unwrap();
    assert_eq!(b.bits_free(), 0);
    assert_overflow(b.append_bit_zero().expect_err("1024th bit must not fit"));
    assert_eq!(b.length_in_bits(), 1023);
    let cell = b.into_cell().unwrap();
    assert_eq!(cell.bit_length(), 1023);
}

#[test]
fn test_references_overflow() {
    let mut b = BuilderData::new();
    for _ in 0..4 {
        b.checked_append_reference(Cell::default()).unwrap();
    }
    assert_eq!(b.references_free(), 0);
    assert_overflow(b.checked_append_reference(Cell::default()).expect_err("5th reference must not fit"));
    assert_eq!(b.into_cell().unwrap().references_count(), 4);

    let mut full = BuilderData::new();
    full.append_raw(&[0; 128], 1000).unwrap();
    let mut tail = BuilderData::new();
    tail.append_raw(&[0; 4], 24).unwrap();
    assert_overflow(full.append_builder(&tail).expect_err("1024 bits in total"));
}

#[test]
fn test_uint_width_overflow() {
    let mut b = BuilderData::new();
    b.append_uint(u32::max_value() as u128, 32).unwrap();
    let err = b.append_uint(1u128 << 32, 32).expect_err("2^32 does not fit into 32 bits");
    match err.downcast_ref::<VaultError>() {
        Some(VaultError::FieldOverflow { value, bits }) => {
            assert_eq!(value, "4294967296");
            assert_eq!(*bits, 32);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(b.length_in_bits(), 32);
    b.append_uint(1, 1).unwrap();
    b.append_uint(2, 1).expect_err("2 does not fit into 1 bit");
}

#[test]
fn test_signed_round_trip() {
    let mut b = BuilderData::new();
    b.append_int(-128, 8).unwrap();
    b.append_int(127, 8).unwrap();
    b.append_int(-1, 3).unwrap();
    b.append_i8(-1).unwrap();
    b.append_int(128, 8).expect_err("128 does not fit into int8");
    b.append_int(-129, 8).expect_err("-129 does not fit into int8");

    let mut slice = SliceData::load_cell(b.into_cell().unwrap());
    assert_eq!(slice.get_next_signed(8).unwrap(), -128);
    assert_eq!(slice.get_next_signed(8).unwrap(), 127);
    assert_eq!(slice.get_next_signed(3).unwrap(), -1);
    assert_eq!(slice.get_next_byte().unwrap(), 0xff);
    assert!(slice.is_empty());
}

#[test]
fn test_wide_uint() {
    let mut b = BuilderData::new();
    b.append_uint(u128::max_value(), 256).unwrap();
    let mut slice = SliceData::load_cell(b.into_cell().unwrap());
    assert_eq!(slice.get_next_uint(128).unwrap(), 0);
    assert_eq!(slice.get_next_uint(128).unwrap(), u128::max_value());
}

#[test]
fn test_read_past_end() {
    let mut b = BuilderData::new();
    b.append_u16(0xbeef).unwrap();
    let mut slice = SliceData::load_cell(b.into_cell().unwrap());
    assert_schema_mismatch(slice.get_next_u32().expect_err("only 16 bits stored"));
    assert_eq!(slice.remaining_bits(), 16);
    assert!(slice.peek_u32().is_err());
    assert_eq!(slice.get_next_int(16).unwrap(), 0xbeef);
    assert_schema_mismatch(slice.get_next_bit().expect_err("slice is exhausted"));
    assert_schema_mismatch(slice.checked_drain_reference().expect_err("no references stored"));
}

#[test]
fn test_references_in_order() {
    let first = {
        let mut b = BuilderData::new();
        b.append_u8(1).unwrap();
        b.into_cell().unwrap()
    };
    let second = {
        let mut b = BuilderData::new();
        b.append_u8(2).unwrap();
        b.into_cell().unwrap()
    };
    let mut b = BuilderData::new();
    b.checked_append_reference(first.clone()).unwrap();
    b.checked_append_reference(second.clone()).unwrap();
    let cell = b.into_cell().unwrap();
    assert_ne!(first, second);
    assert_eq!(cell.reference(1).unwrap(), second);
    assert_schema_mismatch(cell.reference(2).expect_err("only two references"));

    let mut slice = SliceData::from(cell);
    assert_eq!(slice.checked_drain_reference().unwrap(), first);
    assert_eq!(slice.remaining_references(), 1);
    assert_eq!(slice.checked_drain_reference().unwrap(), second);
}

#[test]
fn test_equal_content_equal_cells() {
    let build = || {
        let mut b = BuilderData::new();
        b.append_u64(0x0123456789abcdef).unwrap();
        b.checked_append_reference(Cell::default()).unwrap();
        b.into_cell().unwrap()
    };
    let a = build();
    let b = build();
    assert_eq!(a, b);
    assert_eq!(a.repr_hash(), b.repr_hash());

    let mut other = BuilderData::new();
    other.append_u64(0x0123456789abcdee).unwrap();
    other.checked_append_reference(Cell::default()).unwrap();
    assert_ne!(a, other.into_cell().unwrap());
}
