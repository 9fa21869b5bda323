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
    BuilderData, Cell, SliceData, UInt256,
    Deserializable, Serializable, Result,
};
use std::{fmt, str::FromStr};

#[cfg(test)]
#[path = "tests/test_address.rs"]
mod tests;

/*
addr_none$00 = MsgAddressExt;
addr_std$10 anycast:(Maybe Anycast)
workchain_id:int8 address:uint256 = MsgAddressInt;
*/

const ADDR_NONE_TAG: usize = 0b00;
const ADDR_STD_TAG: usize = 0b10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MsgAddrStd {
    pub workchain_id: i8,
    pub address: UInt256,
}

impl MsgAddrStd {
    pub const fn with_address(workchain_id: i8, address: UInt256) -> Self {
        MsgAddrStd { workchain_id, address }
    }

    /// `0:000..0`, the "nobody" address contracts use for unset slots.
    pub const fn hole() -> Self {
        MsgAddrStd { workchain_id: 0, address: UInt256::ZERO }
    }

    pub fn is_hole(&self) -> bool {
        self.workchain_id == 0 && self.address.is_zero()
    }

    /// Address packed alone into a cell, the form get-methods take as a slice argument.
    pub fn to_slice_cell(&self) -> Result<Cell> {
        self.serialize()
    }
}

impl Serializable for MsgAddrStd {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_bits(ADDR_STD_TAG, 2)?;
        cell.append_bit_zero()?;                // anycast
        cell.append_i8(self.workchain_id)?;
        self.address.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for MsgAddrStd {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        match MsgAddress::construct_from(slice)? {
            MsgAddress::AddrStd(addr) => Ok(addr),
            MsgAddress::AddrNone => fail!(VaultError::schema("expected standard address, found addr_none"))
        }
    }
}

impl fmt::Display for MsgAddrStd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{:x}", self.workchain_id, self.address)
    }
}

impl FromStr for MsgAddrStd {
    type Err = crate::Error;

    fn from_str(string: &str) -> Result<Self> {
        let parts: Vec<&str> = string.split(':').collect();
        if parts.len() != 2 {
            fail!(VaultError::InvalidArg(format!("wrong address format `{}`", string)))
        }
        let workchain_id = parts[0].parse::<i8>()
            .map_err(|err| VaultError::InvalidArg(format!("wrong workchain `{}`: {}", parts[0], err)))?;
        let address = UInt256::from_str(parts[1])?;
        Ok(MsgAddrStd { workchain_id, address })
    }
}

///
/// Any address a contract may store: either nothing or a standard address.
/// External and variable-length addresses are never produced by the vault contracts.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MsgAddress {
    AddrNone,
    AddrStd(MsgAddrStd),
}

impl Default for MsgAddress {
    fn default() -> Self {
        MsgAddress::AddrNone
    }
}

impl MsgAddress {
    pub fn std(&self) -> Option<&MsgAddrStd> {
        match self {
            MsgAddress::AddrStd(addr) => Some(addr),
            MsgAddress::AddrNone => None,
        }
    }

    /// True for `addr_none` and for the hole address.
    pub fn is_unset(&self) -> bool {
        match self {
            MsgAddress::AddrNone => true,
            MsgAddress::AddrStd(addr) => addr.is_hole(),
        }
    }
}

impl From<MsgAddrStd> for MsgAddress {
    fn from(addr: MsgAddrStd) -> Self {
        MsgAddress::AddrStd(addr)
    }
}

impl From<Option<MsgAddrStd>> for MsgAddress {
    fn from(addr: Option<MsgAddrStd>) -> Self {
        match addr {
            Some(addr) => MsgAddress::AddrStd(addr),
            None => MsgAddress::AddrNone,
        }
    }
}

impl Serializable for MsgAddress {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        match self {
            MsgAddress::AddrNone => {
                cell.append_bits(ADDR_NONE_TAG, 2)?;
            }
            MsgAddress::AddrStd(addr) => addr.write_to(cell)?,
        }
        Ok(())
    }
}

impl Deserializable for MsgAddress {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        match slice.get_next_int(2)? as usize {
            ADDR_NONE_TAG => Ok(MsgAddress::AddrNone),
            ADDR_STD_TAG => {
                if slice.get_next_bit()? {
                    fail!(VaultError::schema("anycast addresses are not supported"))
                }
                let workchain_id = slice.get_next_byte()? as i8;
                let address = UInt256::construct_from(slice)?;
                Ok(MsgAddress::AddrStd(MsgAddrStd { workchain_id, address }))
            }
            tag => fail!(VaultError::schema(format!("unsupported address tag {:02b}", tag)))
        }
    }
}

impl fmt::Display for MsgAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MsgAddress::AddrNone => write!(f, ""),
            MsgAddress::AddrStd(addr) => write!(f, "{}", addr),
        }
    }
}

///
/// _ split_depth:(Maybe (## 5)) special:(Maybe TickTock)
/// code:(Maybe ^Cell) data:(Maybe ^Cell)
/// library:(Maybe ^Cell) = StateInit;
///
/// Vault contracts are always deployed with code and data and nothing else.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateInit {
    pub code: Cell,
    pub data: Cell,
}

impl StateInit {
    pub fn with_code_and_data(code: Cell, data: Cell) -> Self {
        StateInit { code, data }
    }

    pub fn hash(&self) -> Result<UInt256> {
        Ok(self.serialize()?.repr_hash())
    }

    pub fn address(&self, workchain_id: i8) -> Result<MsgAddrStd> {
        derive_address(workchain_id, self)
    }
}

impl Serializable for StateInit {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        cell.append_bit_zero()?;                   // split_depth
        cell.append_bit_zero()?;                   // special
        cell.append_bit_one()?;                    // code
        cell.checked_append_reference(self.code.clone())?;
        cell.append_bit_one()?;                    // data
        cell.checked_append_reference(self.data.clone())?;
        cell.append_bit_zero()?;                   // library
        Ok(())
    }
}

impl Deserializable for StateInit {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        if slice.get_next_bit()? || slice.get_next_bit()? {
            fail!(VaultError::schema("split_depth and special are not supported in StateInit"))
        }
        if !slice.get_next_bit()? {
            fail!(VaultError::schema("StateInit without code"))
        }
        let code = slice.checked_drain_reference()?;
        if !slice.get_next_bit()? {
            fail!(VaultError::schema("StateInit without data"))
        }
        let data = slice.checked_drain_reference()?;
        if slice.get_next_bit()? {
            fail!(VaultError::schema("StateInit libraries are not supported"))
        }
        Ok(StateInit { code, data })
    }
}

/// Address of the contract that `state_init` deploys into `workchain_id`.
pub fn derive_address(workchain_id: i8, state_init: &StateInit) -> Result<MsgAddrStd> {
    let hash = state_init.hash()?;
    log::trace!(target: "vault", "derived address {}:{:x}", workchain_id, hash);
    Ok(MsgAddrStd::with_address(workchain_id, hash))
}

/// Recomputes the address from `state_init` and compares it with one reported by chain state.
pub fn check_address(reported: &MsgAddrStd, state_init: &StateInit) -> Result<()> {
    let derived = derive_address(reported.workchain_id, state_init)?;
    if &derived != reported {
        log::warn!(target: "vault", "address mismatch: derived {}, reported {}", derived, reported);
        fail!(VaultError::AddressMismatch {
            derived: derived.to_string(),
            reported: reported.to_string(),
        })
    }
    Ok(())
}
