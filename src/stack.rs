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
    Cell, Grams, MsgAddrStd, MsgAddress, SliceData,
    Deserializable, Serializable, Result,
};
use num::BigInt;
use num_traits::ToPrimitive;
use std::{collections::VecDeque, fmt};

#[cfg(test)]
#[path = "tests/test_stack.rs"]
mod tests;

///
/// Get-method stack value. Integers are up to 257 bits wide on chain.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackEntry {
    Null,
    Int(BigInt),
    Cell(Cell),
    Slice(Cell),
}

impl StackEntry {
    pub fn int(value: impl Into<BigInt>) -> Self {
        StackEntry::Int(value.into())
    }

    /// Address argument, passed as a slice holding the serialized address.
    pub fn address(address: &MsgAddrStd) -> Result<Self> {
        Ok(StackEntry::Slice(address.to_slice_cell()?))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            StackEntry::Null => "null",
            StackEntry::Int(_) => "int",
            StackEntry::Cell(_) => "cell",
            StackEntry::Slice(_) => "slice",
        }
    }
}

impl fmt::Display for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StackEntry::Null => write!(f, "null"),
            StackEntry::Int(value) => write!(f, "{}", value),
            StackEntry::Cell(cell) => write!(f, "cell {:x}", cell.repr_hash()),
            StackEntry::Slice(cell) => write!(f, "slice {:x}", cell.repr_hash()),
        }
    }
}

///
/// Consumes a get-method result in declared field order.
///
#[derive(Clone, Debug)]
pub struct StackReader {
    method: &'static str,
    entries: VecDeque<StackEntry>,
}

impl StackReader {
    pub fn new(method: &'static str, entries: Vec<StackEntry>) -> Self {
        Self { method, entries: entries.into() }
    }

    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    fn next(&mut self, expected: &str) -> Result<StackEntry> {
        match self.entries.pop_front() {
            Some(entry) => Ok(entry),
            None => fail!(VaultError::schema(
                format!("{}: stack exhausted while reading {}", self.method, expected)
            ))
        }
    }

    fn mismatch<T>(&self, expected: &str, found: &StackEntry) -> Result<T> {
        fail!(VaultError::schema(
            format!("{}: expected {}, found {}", self.method, expected, found.type_name())
        ))
    }

    pub fn read_big_int(&mut self) -> Result<BigInt> {
        match self.next("int")? {
            StackEntry::Int(value) => Ok(value),
            other => self.mismatch("int", &other),
        }
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let value = self.read_big_int()?;
        match value.to_u64() {
            Some(value) => Ok(value),
            None => fail!(VaultError::FieldOverflow { value: value.to_string(), bits: 64 })
        }
    }

    pub fn read_grams(&mut self) -> Result<Grams> {
        let value = self.read_big_int()?;
        match value.to_u128() {
            Some(value) => Grams::new(value),
            None => fail!(VaultError::FieldOverflow { value: value.to_string(), bits: 120 })
        }
    }

    pub fn read_cell(&mut self) -> Result<Cell> {
        match self.next("cell")? {
            StackEntry::Cell(cell) | StackEntry::Slice(cell) => Ok(cell),
            other => self.mismatch("cell", &other),
        }
    }

    pub fn read_address_any(&mut self) -> Result<MsgAddress> {
        let cell = self.read_cell()?;
        MsgAddress::construct_from(&mut SliceData::load_cell(cell))
    }

    pub fn read_address(&mut self) -> Result<MsgAddrStd> {
        let cell = self.read_cell()?;
        MsgAddrStd::construct_from(&mut SliceData::load_cell(cell))
    }
}
