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

use crate::{error::VaultError, types::UInt256, Result};
use std::{fmt, hash::{Hash, Hasher}, sync::Arc};

pub const MAX_DATA_BITS: usize = 1023;
pub const MAX_REFERENCES_COUNT: usize = 4;
pub const MAX_DEPTH: u16 = 1024;

#[cfg(test)]
#[path = "tests/test_cell.rs"]
mod tests;

struct CellData {
    data: Vec<u8>,
    bit_length: usize,
    references: Vec<Cell>,
    repr_hash: UInt256,
    depth: u16,
}

///
/// Ordinary cell: up to 1023 data bits and up to 4 references.
/// Cells are immutable, shared with `Arc` and compared by representation hash.
///
#[derive(Clone)]
pub struct Cell(Arc<CellData>);

impl Cell {
    fn with_data(data: Vec<u8>, bit_length: usize, references: Vec<Cell>) -> Result<Self> {
        if bit_length > MAX_DATA_BITS || references.len() > MAX_REFERENCES_COUNT {
            fail!(VaultError::CellOverflow { bits: bit_length, refs: references.len() })
        }
        let depth = match references.iter().map(|r| r.depth()).max() {
            Some(max) if max >= MAX_DEPTH => fail!("cell depth exceeds {}", MAX_DEPTH),
            Some(max) => max + 1,
            None => 0,
        };
        let repr_hash = Self::calc_repr_hash(&data, bit_length, &references);
        Ok(Cell(Arc::new(CellData { data, bit_length, references, repr_hash, depth })))
    }

    // d1 d2 data* (depth of refs)* (hash of refs)*
    fn calc_repr_hash(data: &[u8], bit_length: usize, references: &[Cell]) -> UInt256 {
        let full_bytes = bit_length / 8;
        let data_bytes = (bit_length + 7) / 8;
        let mut repr = Vec::with_capacity(2 + data_bytes + references.len() * 34);
        repr.push(references.len() as u8);
        repr.push((full_bytes + data_bytes) as u8);
        repr.extend_from_slice(&data[..data_bytes]);
        if bit_length % 8 != 0 {
            let last = repr.len() - 1;
            repr[last] |= 0x80 >> (bit_length % 8);
        }
        for child in references {
            repr.extend_from_slice(&child.depth().to_be_bytes());
        }
        for child in references {
            repr.extend_from_slice(child.repr_hash().as_slice());
        }
        UInt256::calc_sha256(&repr)
    }

    pub fn repr_hash(&self) -> UInt256 {
        self.0.repr_hash
    }

    pub fn depth(&self) -> u16 {
        self.0.depth
    }

    pub fn bit_length(&self) -> usize {
        self.0.bit_length
    }

    pub fn references_count(&self) -> usize {
        self.0.references.len()
    }

    pub fn reference(&self, index: usize) -> Result<Cell> {
        match self.0.references.get(index) {
            Some(cell) => Ok(cell.clone()),
            None => fail!(VaultError::schema(
                format!("reference {} is absent, cell has {}", index, self.references_count())
            ))
        }
    }

    /// Data bits without completion tag, zero-padded to a whole byte.
    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    pub fn is_empty(&self) -> bool {
        self.bit_length() == 0 && self.references_count() == 0
    }

    fn bit_at(&self, index: usize) -> bool {
        (self.0.data[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    // fift-style: completion tag and `_` when the length is not a whole nibble
    fn to_hex_string(&self) -> String {
        let bits = self.bit_length();
        let mut data = self.0.data.clone();
        if bits % 4 != 0 {
            data[bits / 8] |= 0x80 >> (bits % 8);
        }
        let mut text = hex::encode(&data);
        text.truncate((bits + 3) / 4);
        if bits % 4 != 0 {
            text.push('_');
        }
        text
    }
}

impl Default for Cell {
    fn default() -> Self {
        // bit_length and references are both zero, construction cannot fail
        let repr_hash = UInt256::DEFAULT_CELL_HASH;
        Cell(Arc::new(CellData { data: Vec::new(), bit_length: 0, references: Vec::new(), repr_hash, depth: 0 }))
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Cell) -> bool {
        self.repr_hash() == other.repr_hash()
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.repr_hash().hash(state)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{{{}}}", self.to_hex_string())?;
        for child in &self.0.references {
            write!(f, " ^{}", child)?;
        }
        Ok(())
    }
}

///
/// Cell builder. Bits are appended most significant first.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuilderData {
    data: Vec<u8>,
    length_in_bits: usize,
    references: Vec<Cell>,
}

impl BuilderData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length_in_bits(&self) -> usize {
        self.length_in_bits
    }

    pub fn references_used(&self) -> usize {
        self.references.len()
    }

    pub fn bits_free(&self) -> usize {
        MAX_DATA_BITS - self.length_in_bits
    }

    pub fn references_free(&self) -> usize {
        MAX_REFERENCES_COUNT - self.references.len()
    }

    fn check_capacity(&self, bits: usize, refs: usize) -> Result<()> {
        if bits > self.bits_free() || refs > self.references_free() {
            fail!(VaultError::CellOverflow {
                bits: self.length_in_bits + bits,
                refs: self.references.len() + refs,
            })
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.length_in_bits % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            self.data[self.length_in_bits / 8] |= 0x80 >> (self.length_in_bits % 8);
        }
        self.length_in_bits += 1;
    }

    pub fn append_bit_bool(&mut self, bit: bool) -> Result<&mut Self> {
        self.check_capacity(1, 0)?;
        self.push_bit(bit);
        Ok(self)
    }

    pub fn append_bit_one(&mut self) -> Result<&mut Self> {
        self.append_bit_bool(true)
    }

    pub fn append_bit_zero(&mut self) -> Result<&mut Self> {
        self.append_bit_bool(false)
    }

    /// Appends `bits` most significant bits of `data`.
    pub fn append_raw(&mut self, data: &[u8], bits: usize) -> Result<&mut Self> {
        if bits > data.len() * 8 {
            fail!(VaultError::InvalidArg(
                format!("{} bits requested from {} bytes", bits, data.len())
            ))
        }
        self.check_capacity(bits, 0)?;
        for i in 0..bits {
            self.push_bit((data[i / 8] >> (7 - i % 8)) & 1 == 1);
        }
        Ok(self)
    }

    /// Unsigned big-endian integer of `bits` width, up to 256 bits.
    pub fn append_uint(&mut self, value: u128, bits: usize) -> Result<&mut Self> {
        if bits > 256 || (bits < 128 && value >> bits != 0) {
            fail!(VaultError::FieldOverflow { value: value.to_string(), bits })
        }
        self.check_capacity(bits, 0)?;
        for i in (0..bits).rev() {
            self.push_bit(i < 128 && (value >> i) & 1 == 1);
        }
        Ok(self)
    }

    /// Signed two's complement integer of `bits` width, up to 128 bits.
    pub fn append_int(&mut self, value: i128, bits: usize) -> Result<&mut Self> {
        let fits = match bits {
            0 => value == 0,
            1..=127 => {
                let bound = 1i128 << (bits - 1);
                value >= -bound && value < bound
            }
            128 => true,
            _ => false,
        };
        if !fits {
            fail!(VaultError::FieldOverflow { value: value.to_string(), bits })
        }
        self.check_capacity(bits, 0)?;
        let raw = value as u128;
        for i in (0..bits).rev() {
            self.push_bit((raw >> i) & 1 == 1);
        }
        Ok(self)
    }

    pub fn append_bits(&mut self, value: usize, bits: usize) -> Result<&mut Self> {
        self.append_uint(value as u128, bits)
    }

    pub fn append_u8(&mut self, value: u8) -> Result<&mut Self> {
        self.append_uint(value as u128, 8)
    }

    pub fn append_u16(&mut self, value: u16) -> Result<&mut Self> {
        self.append_uint(value as u128, 16)
    }

    pub fn append_u32(&mut self, value: u32) -> Result<&mut Self> {
        self.append_uint(value as u128, 32)
    }

    pub fn append_u64(&mut self, value: u64) -> Result<&mut Self> {
        self.append_uint(value as u128, 64)
    }

    pub fn append_i8(&mut self, value: i8) -> Result<&mut Self> {
        self.append_int(value as i128, 8)
    }

    pub fn checked_append_reference(&mut self, cell: Cell) -> Result<&mut Self> {
        self.check_capacity(0, 1)?;
        self.references.push(cell);
        Ok(self)
    }

    /// Appends all bits and references of another builder.
    pub fn append_builder(&mut self, other: &BuilderData) -> Result<&mut Self> {
        self.check_capacity(other.length_in_bits, other.references.len())?;
        for i in 0..other.length_in_bits {
            self.push_bit((other.data[i / 8] >> (7 - i % 8)) & 1 == 1);
        }
        self.references.extend(other.references.iter().cloned());
        Ok(self)
    }

    pub fn into_cell(self) -> Result<Cell> {
        Cell::with_data(self.data, self.length_in_bits, self.references)
    }
}

///
/// Read cursor over a cell. Fields are consumed strictly in order,
/// reading past the end is a schema mismatch.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceData {
    cell: Cell,
    data_window: std::ops::Range<usize>,
    references_window: std::ops::Range<usize>,
}

impl SliceData {
    pub fn load_cell(cell: Cell) -> Self {
        let data_window = 0..cell.bit_length();
        let references_window = 0..cell.references_count();
        Self { cell, data_window, references_window }
    }

    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    pub fn remaining_bits(&self) -> usize {
        self.data_window.end - self.data_window.start
    }

    pub fn remaining_references(&self) -> usize {
        self.references_window.end - self.references_window.start
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_references() == 0
    }

    fn check_bits(&self, bits: usize) -> Result<()> {
        if bits > self.remaining_bits() {
            fail!(VaultError::schema(
                format!("cannot read {} bits, {} remaining", bits, self.remaining_bits())
            ))
        }
        Ok(())
    }

    pub fn get_next_bit(&mut self) -> Result<bool> {
        self.check_bits(1)?;
        let bit = self.cell.bit_at(self.data_window.start);
        self.data_window.start += 1;
        Ok(bit)
    }

    /// Unsigned big-endian integer up to 128 bits wide.
    pub fn get_next_uint(&mut self, bits: usize) -> Result<u128> {
        if bits > 128 {
            fail!(VaultError::InvalidArg(format!("{} bits do not fit into u128", bits)))
        }
        self.check_bits(bits)?;
        let mut value = 0u128;
        for _ in 0..bits {
            value = (value << 1) | self.cell.bit_at(self.data_window.start) as u128;
            self.data_window.start += 1;
        }
        Ok(value)
    }

    pub fn get_next_int(&mut self, bits: usize) -> Result<u64> {
        if bits > 64 {
            fail!(VaultError::InvalidArg(format!("{} bits do not fit into u64", bits)))
        }
        self.get_next_uint(bits).map(|value| value as u64)
    }

    /// Signed two's complement integer up to 128 bits wide.
    pub fn get_next_signed(&mut self, bits: usize) -> Result<i128> {
        let raw = self.get_next_uint(bits)?;
        if bits == 0 || bits == 128 {
            return Ok(raw as i128)
        }
        let sign = 1u128 << (bits - 1);
        Ok(if raw & sign != 0 {
            (raw as i128) - (1i128 << bits)
        } else {
            raw as i128
        })
    }

    pub fn get_next_byte(&mut self) -> Result<u8> {
        self.get_next_int(8).map(|value| value as u8)
    }

    pub fn get_next_u32(&mut self) -> Result<u32> {
        self.get_next_int(32).map(|value| value as u32)
    }

    pub fn get_next_u64(&mut self) -> Result<u64> {
        self.get_next_int(64)
    }

    pub fn get_next_bytes(&mut self, bytes: usize) -> Result<Vec<u8>> {
        self.check_bits(bytes * 8)?;
        let mut result = Vec::with_capacity(bytes);
        for _ in 0..bytes {
            result.push(self.get_next_byte()?);
        }
        Ok(result)
    }

    /// Reads the leading 32 bits without consuming them.
    pub fn peek_u32(&self) -> Result<u32> {
        self.clone().get_next_u32()
    }

    pub fn checked_drain_reference(&mut self) -> Result<Cell> {
        if self.remaining_references() == 0 {
            fail!(VaultError::schema("no references left to read"))
        }
        let cell = self.cell.reference(self.references_window.start)?;
        self.references_window.start += 1;
        Ok(cell)
    }
}

impl From<Cell> for SliceData {
    fn from(cell: Cell) -> Self {
        SliceData::load_cell(cell)
    }
}
