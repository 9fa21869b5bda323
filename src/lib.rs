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

#![cfg_attr(feature = "ci_run", deny(warnings))]

#[macro_use]
pub mod error;
pub use self::error::*;

pub mod cell;
pub use self::cell::*;

pub mod types;
pub use self::types::*;

pub mod address;
pub use self::address::*;

pub mod opcodes;
pub use self::opcodes::*;

#[macro_use]
pub mod messages;
pub use self::messages::*;

pub mod upgrade;
pub use self::upgrade::*;

pub mod reinvest;
pub use self::reinvest::*;

pub mod stack;
pub use self::stack::*;

pub mod provider;
pub use self::provider::*;

pub mod wallet;
pub use self::wallet::*;

pub mod strategy;
pub use self::strategy::*;

pub mod factory;
pub use self::factory::*;

pub trait Serializable {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()>;

    fn write_to_new_cell(&self) -> Result<BuilderData> {
        let mut cell = BuilderData::new();
        self.write_to(&mut cell)?;
        Ok(cell)
    }

    fn serialize(&self) -> Result<Cell> {
        self.write_to_new_cell()?.into_cell()
    }
}

pub trait Deserializable: Sized {
    fn construct_from(slice: &mut SliceData) -> Result<Self>;

    fn construct_from_cell(cell: Cell) -> Result<Self> {
        Self::construct_from(&mut SliceData::load_cell(cell))
    }

    fn construct_from_reference(slice: &mut SliceData) -> Result<Self> {
        Self::construct_from_cell(slice.checked_drain_reference()?)
    }
}

pub trait MaybeSerialize {
    fn write_maybe_to(&self, cell: &mut BuilderData) -> Result<()>;
}

impl<T: Serializable> MaybeSerialize for Option<T> {
    fn write_maybe_to(&self, cell: &mut BuilderData) -> Result<()> {
        match self {
            Some(x) => {
                cell.append_bit_one()?;
                x.write_to(cell)?;
            }
            None => {
                cell.append_bit_zero()?;
            }
        }
        Ok(())
    }
}

pub trait MaybeDeserialize: Deserializable {
    fn read_maybe_from(slice: &mut SliceData) -> Result<Option<Self>> {
        match slice.get_next_bit()? {
            true => Ok(Some(Self::construct_from(slice)?)),
            false => Ok(None),
        }
    }
}

impl<T: Deserializable> MaybeDeserialize for T {}

/// A cell stored in place of a field is a reference.
impl Serializable for Cell {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.checked_append_reference(self.clone())?;
        Ok(())
    }
}

impl Deserializable for Cell {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        slice.checked_drain_reference()
    }
}

/// Serializes, deserializes and checks the value survived unchanged.
#[cfg(test)]
pub fn write_read_and_assert<T>(s: T) -> T
where
    T: Serializable + Deserializable + std::fmt::Debug + PartialEq
{
    let cell = s.serialize().unwrap();
    let s2 = T::construct_from_cell(cell.clone()).unwrap();
    assert_eq!(s, s2);
    assert_eq!(cell, s2.serialize().unwrap());
    s2
}
