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
use crate::write_read_and_assert;
use std::sync::Arc;

#[test]
fn test_uint256_formatting() {
    let value = UInt256::from_str("1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef").unwrap();
    assert_eq!(value.to_string(), "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef");
    assert_eq!(format!("{:?}", value), "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef");
    assert_eq!(format!("{:#x}", value), "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef");
    assert_eq!(value.as_hex_string(), value.to_string());

    UInt256::from_str("1234").expect_err("too short");
    UInt256::from_str("zz34567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef").expect_err("not hex");
}

#[test]
fn test_uint256_construct() {
    assert_eq!(
        UInt256::from_be_bytes(&0x0123456789ABCDEFu64.to_be_bytes()),
        UInt256::from_str("0000000000000000000000000000000000000000000000000123456789abcdef").unwrap()
    );
    assert_eq!(
        UInt256::from_be_bytes(&[1, 2, 3]),
        UInt256::from_str("0000000000000000000000000000000000000000000000000000000000010203").unwrap()
    );
    assert!(UInt256::new().is_zero());
    assert!(!UInt256::MAX.is_zero());
    assert_eq!(UInt256::calc_sha256(&[0, 0]), UInt256::DEFAULT_CELL_HASH);
    write_read_and_assert(UInt256::MAX);
}

#[test]
fn test_grams_encoding() {
    let zero = Grams::zero().serialize().unwrap();
    assert_eq!(zero.bit_length(), 4);
    assert_eq!(zero.data(), &[0x00]);

    let one = Grams::from(1u32).serialize().unwrap();
    assert_eq!(one.bit_length(), 12);
    assert_eq!(one.data(), &[0x10, 0x10]);

    // one coin in nano units: 0x3b9aca00, four bytes
    let coin = Grams::from(1_000_000_000u64).serialize().unwrap();
    assert_eq!(coin.bit_length(), 36);
    assert_eq!(coin.data(), &[0x43, 0xb9, 0xac, 0xa0, 0x00]);

    let max = Grams::MAX.serialize().unwrap();
    assert_eq!(max.bit_length(), 4 + 15 * 8);
}

#[test]
fn test_grams_boundaries() {
    for value in &[0u128, 1, 0xff, 0x100, u64::max_value() as u128, (1u128 << 120) - 1] {
        let grams = Grams::new(*value).unwrap();
        assert_eq!(write_read_and_assert(grams).as_u128(), *value);
    }
    let err = Grams::new(1u128 << 120).expect_err("above the coin maximum");
    assert!(matches!(err.downcast_ref::<VaultError>(), Some(VaultError::FieldOverflow { bits: 120, .. })));
    Grams::new(u128::max_value()).expect_err("above the coin maximum");
    assert_eq!(Grams::MAX, Grams::new((1u128 << 120) - 1).unwrap());
}

#[test]
fn test_grams_truncated() {
    let mut b = BuilderData::new();
    b.append_bits(3, 4).unwrap();
    b.append_u8(0xff).unwrap();
    let err = Grams::construct_from_cell(b.into_cell().unwrap()).expect_err("three bytes declared, one stored");
    assert!(matches!(err.downcast_ref::<VaultError>(), Some(VaultError::SchemaMismatch(_))));
}

#[test]
fn test_query_id() {
    assert_eq!(write_read_and_assert(QueryId(u64::max_value())), QueryId(u64::max_value()));
    assert_eq!(QueryId::from(5).to_string(), "5");
    assert_eq!(QueryId::default(), QueryId(0));
    let ids: Vec<QueryId> = (0..4).map(|_| QueryId::random()).collect();
    assert!(ids.iter().any(|id| *id != ids[0]));
}

#[test]
fn test_query_id_generator() {
    let generator = Arc::new(QueryIdGenerator::starting_at(100));
    assert_eq!(generator.next_id(), QueryId(100));
    assert_eq!(generator.next_id(), QueryId(101));

    let threads: Vec<_> = (0..4).map(|_| {
        let generator = generator.clone();
        std::thread::spawn(move || (0..25).map(|_| generator.next_id().0).collect::<Vec<_>>())
    }).collect();
    let mut ids: Vec<u64> = threads.into_iter().flat_map(|t| t.join().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100);
    assert_eq!(ids[0], 102);
    assert_eq!(ids[99], 201);
}

#[test]
fn test_pool_type() {
    assert_eq!(write_read_and_assert(PoolType::Stable), PoolType::Stable);
    assert_eq!(PoolType::Volatile.serialize().unwrap().bit_length(), 1);
    assert_eq!(PoolType::from_u64(1).unwrap(), PoolType::Stable);
    PoolType::from_u64(2).expect_err("pool type is one bit");
    PoolType::from_u64(256).expect_err("no truncation to the low byte");
}

#[test]
fn test_primitive_round_trip() {
    write_read_and_assert(0u16);
    write_read_and_assert(u32::max_value());
    write_read_and_assert(u64::max_value());
    write_read_and_assert(-1i8);
    write_read_and_assert(true);
}
