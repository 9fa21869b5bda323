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

use crate::{
    error::VaultError,
    BuilderData, SliceData, Deserializable, Serializable, Result,
};
use sha2::{Digest, Sha256};
use std::{
    convert::TryInto, fmt, str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

pub fn sha256_digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.input(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(hasher.result().as_slice());
    result
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct UInt256([u8; 32]);

impl UInt256 {
    pub const fn new() -> Self {
        Self::ZERO
    }

    pub const fn with_array(data: [u8; 32]) -> Self {
        Self(data)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub const fn as_slice(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn as_hex_string(&self) -> String {
        hex::encode(self.0)
    }

    pub fn calc_sha256(bytes: &[u8]) -> Self {
        Self(sha256_digest(bytes))
    }

    pub fn from_be_bytes(value: &[u8]) -> Self {
        let mut data = [0; 32];
        let len = std::cmp::min(value.len(), 32);
        let offset = 32 - len;
        (0..len).for_each(|i| data[i + offset] = value[i]);
        Self(data)
    }

    pub const ZERO: UInt256 = UInt256([0; 32]);
    pub const MAX: UInt256 = UInt256([0xFF; 32]);
    // hash of default cell 0x96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7;
    pub const DEFAULT_CELL_HASH: UInt256 = UInt256([150, 162, 150, 210, 36, 242, 133, 198, 123, 238, 147,
        195, 15, 138, 48, 145, 87, 240, 218, 163, 93, 197, 184, 126, 65, 11, 120, 99, 10, 9, 207, 199]);
}

impl From<[u8; 32]> for UInt256 {
    fn from(data: [u8; 32]) -> Self {
        UInt256(data)
    }
}

impl FromStr for UInt256 {
    type Err = crate::Error;

    fn from_str(value: &str) -> Result<Self> {
        if value.len() != 64 {
            fail!(VaultError::InvalidArg(
                format!("hash must be 64 hex digits, got {}", value.len())
            ))
        }
        let bytes = hex::decode(value)?;
        Ok(Self(bytes.as_slice().try_into()?))
    }
}

impl fmt::Debug for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Display for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::LowerHex for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serializable for UInt256 {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_raw(self.as_slice(), 256)?;
        Ok(())
    }
}

impl Deserializable for UInt256 {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        Ok(Self(slice.get_next_bytes(32)?.as_slice().try_into()?))
    }
}

///
/// nanograms$_ amount:(VarUInteger 16) = Grams;
///
/// x nanograms are serialized as an unsigned 4-bit length l < 16 such that
/// x < 2^(8*l), followed by x as an unsigned 8*l-bit integer. Four zero bits
/// represent a zero amount.
///
#[derive(Eq, Copy, Clone, Debug, Default, Ord, PartialEq, PartialOrd, Hash)]
pub struct Grams(u128);

impl Grams {
    const LEN_BITS: usize = 4;
    const MAX_BYTES: usize = 15;

    pub const MAX: Grams = Grams((1u128 << 120) - 1);

    pub fn new(value: u128) -> Result<Self> {
        Self::check_overflow(value)?;
        Ok(Self(value))
    }
    pub const fn zero() -> Self { Self(0) }
    pub const fn is_zero(&self) -> bool { self.0 == 0 }
    pub const fn as_u128(&self) -> u128 { self.0 }

    fn byte_len(value: u128) -> usize {
        (128 - value.leading_zeros() as usize + 7) / 8
    }

    fn check_overflow(value: u128) -> Result<()> {
        if Self::byte_len(value) > Self::MAX_BYTES {
            fail!(VaultError::FieldOverflow { value: value.to_string(), bits: Self::MAX_BYTES * 8 })
        }
        Ok(())
    }
}

impl From<u64> for Grams {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl From<u32> for Grams {
    fn from(value: u32) -> Self {
        Self(value as u128)
    }
}

impl fmt::Display for Grams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serializable for Grams {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        Self::check_overflow(self.0)?;
        let bytes = Self::byte_len(self.0);
        cell.append_bits(bytes, Self::LEN_BITS)?;
        let be_bytes = self.0.to_be_bytes();
        cell.append_raw(&be_bytes[be_bytes.len() - bytes..], bytes * 8)?;
        Ok(())
    }
}

impl Deserializable for Grams {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let bytes = slice.get_next_int(Self::LEN_BITS)? as usize;
        let data = slice.get_next_bytes(bytes)?;
        let value = data.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128);
        Ok(Self(value))
    }
}

/// Caller-chosen 64-bit correlation token of an outbound message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId(pub u64);

impl QueryId {
    pub fn random() -> Self {
        QueryId(rand::random::<u64>())
    }
}

impl From<u64> for QueryId {
    fn from(value: u64) -> Self {
        QueryId(value)
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serializable for QueryId {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_u64(self.0)?;
        Ok(())
    }
}

impl Deserializable for QueryId {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        Ok(QueryId(slice.get_next_u64()?))
    }
}

/// Monotonic query id source shared between concurrent senders.
#[derive(Debug, Default)]
pub struct QueryIdGenerator {
    next: AtomicU64,
}

impl QueryIdGenerator {
    pub fn starting_at(first: u64) -> Self {
        Self { next: AtomicU64::new(first) }
    }

    pub fn next_id(&self) -> QueryId {
        QueryId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// pool_type:uint1
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolType {
    Volatile = 0,
    Stable = 1,
}

impl Default for PoolType {
    fn default() -> Self {
        PoolType::Volatile
    }
}

impl PoolType {
    pub fn from_u64(value: u64) -> Result<Self> {
        match value {
            0 => Ok(PoolType::Volatile),
            1 => Ok(PoolType::Stable),
            _ => fail!(VaultError::FieldOverflow { value: value.to_string(), bits: 1 })
        }
    }
}

impl Serializable for PoolType {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_bits(*self as usize, 1)?;
        Ok(())
    }
}

impl Deserializable for PoolType {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        Self::from_u64(slice.get_next_int(1)?)
    }
}

impl Serializable for u64 {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_u64(*self)?;
        Ok(())
    }
}

impl Deserializable for u64 {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        slice.get_next_u64()
    }
}

impl Serializable for u32 {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_u32(*self)?;
        Ok(())
    }
}

impl Deserializable for u32 {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        slice.get_next_u32()
    }
}

impl Serializable for u16 {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_u16(*self)?;
        Ok(())
    }
}

impl Deserializable for u16 {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        Ok(slice.get_next_int(16)? as u16)
    }
}

impl Serializable for i8 {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_i8(*self)?;
        Ok(())
    }
}

impl Deserializable for i8 {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        slice.get_next_byte().map(|v| v as i8)
    }
}

impl Serializable for bool {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_bit_bool(*self)?;
        Ok(())
    }
}

impl Deserializable for bool {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        slice.get_next_bit()
    }
}

#[cfg(test)]
#[path = "tests/test_types.rs"]
mod tests;
