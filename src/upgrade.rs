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
    messages::{read_header, write_header, MessageBody, OpMessage},
    BuilderData, Cell, SliceData, MsgAddrStd, MsgAddress, Operation, QueryId,
    Deserializable, Serializable, Result,
};
use std::fmt;

#[cfg(test)]
#[path = "tests/test_upgrade.rs"]
mod tests;

/*
init_code_upgrade#df1e233d query_id:uint64 code:^Cell = InternalMsgBody;
init_admin_upgrade#2fb94384 query_id:uint64 admin:MsgAddress = InternalMsgBody;
finalize_upgrades#6378509f query_id:uint64 = InternalMsgBody;
cancel_admin_upgrade#a4ed9981 query_id:uint64 = InternalMsgBody;
cancel_code_upgrade#357ccc67 query_id:uint64 = InternalMsgBody;
*/

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitCodeUpgrade {
    pub query_id: QueryId,
    pub code: Cell,
}

impl OpMessage for InitCodeUpgrade {
    const OPERATION: Operation = Operation::InitCodeUpgrade;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for InitCodeUpgrade {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.code.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for InitCodeUpgrade {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self { query_id, code: Cell::construct_from(slice)? })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitAdminUpgrade {
    pub query_id: QueryId,
    pub admin: MsgAddrStd,
}

impl OpMessage for InitAdminUpgrade {
    const OPERATION: Operation = Operation::InitAdminUpgrade;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for InitAdminUpgrade {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.admin.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for InitAdminUpgrade {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self { query_id, admin: MsgAddrStd::construct_from(slice)? })
    }
}

define_bare_message!(
    /// Commits every pending upgrade whose timelock has expired.
    FinalizeUpgrades, Operation::FinalizeUpgrades
);
define_bare_message!(CancelAdminUpgrade, Operation::CancelAdminUpgrade);
define_bare_message!(CancelCodeUpgrade, Operation::CancelCodeUpgrade);

///
/// Pending upgrade record kept in contract data:
/// end_code:uint64 end_admin:uint64 admin:MsgAddress code:^Cell
///
/// A zero timestamp means the slot is idle. The hole address (or addr_none)
/// in the admin position means no admin rotation is pending.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TempUpgrade {
    pub code_ready_at: u64,
    pub admin_ready_at: u64,
    pub pending_admin: MsgAddress,
    pub pending_code: Cell,
}

impl Default for TempUpgrade {
    fn default() -> Self {
        TempUpgrade {
            code_ready_at: 0,
            admin_ready_at: 0,
            pending_admin: MsgAddress::AddrStd(MsgAddrStd::hole()),
            pending_code: Cell::default(),
        }
    }
}

impl TempUpgrade {
    pub fn pending_admin_address(&self) -> Option<MsgAddrStd> {
        match self.pending_admin.is_unset() {
            true => None,
            false => self.pending_admin.std().copied(),
        }
    }
}

impl Serializable for TempUpgrade {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        self.code_ready_at.write_to(cell)?;
        self.admin_ready_at.write_to(cell)?;
        self.pending_admin.write_to(cell)?;
        self.pending_code.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for TempUpgrade {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        Ok(Self {
            code_ready_at: u64::construct_from(slice)?,
            admin_ready_at: u64::construct_from(slice)?,
            pending_admin: MsgAddress::construct_from(slice)?,
            pending_code: Cell::construct_from(slice)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    Code,
    Admin,
}

impl UpgradeKind {
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::Code => "code",
            UpgradeKind::Admin => "admin",
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpgradeSlot<T> {
    Idle,
    Pending {
        value: T,
        ready_at: u64,
    },
}

impl<T> Default for UpgradeSlot<T> {
    fn default() -> Self {
        UpgradeSlot::Idle
    }
}

impl<T> UpgradeSlot<T> {
    pub fn is_pending(&self) -> bool {
        match self {
            UpgradeSlot::Pending { .. } => true,
            UpgradeSlot::Idle => false,
        }
    }

    pub fn ready_at(&self) -> Option<u64> {
        match self {
            UpgradeSlot::Pending { ready_at, .. } => Some(*ready_at),
            UpgradeSlot::Idle => None,
        }
    }

    pub fn is_ready(&self, now: u64) -> bool {
        self.ready_at().map_or(false, |ready_at| now >= ready_at)
    }

    fn check_ready(&self, kind: UpgradeKind, now: u64) -> Result<()> {
        match self {
            UpgradeSlot::Idle => fail!(VaultError::UpgradeNotPending(kind.name())),
            UpgradeSlot::Pending { ready_at, .. } if now < *ready_at => {
                fail!(VaultError::UpgradeNotReady { kind: kind.name(), ready_at: *ready_at, now })
            }
            UpgradeSlot::Pending { .. } => Ok(()),
        }
    }

    /// Takes the value out if the slot is ready, leaving it Idle.
    fn commit(&mut self, now: u64) -> Option<T> {
        if !self.is_ready(now) {
            return None
        }
        match std::mem::replace(self, UpgradeSlot::Idle) {
            UpgradeSlot::Pending { value, .. } => Some(value),
            UpgradeSlot::Idle => None,
        }
    }
}

/// Values committed by one `finalize_upgrades`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinalizeReport {
    pub code: Option<Cell>,
    pub admin: Option<MsgAddrStd>,
}

impl FinalizeReport {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.admin.is_none()
    }
}

///
/// Client-side model of the two-phase upgrade protocol of a single contract.
/// The contract is the authority, the model only predicts what it will do
/// with a given message at a given time.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeState {
    code: Cell,
    admin: MsgAddrStd,
    pending_code: UpgradeSlot<Cell>,
    pending_admin: UpgradeSlot<MsgAddrStd>,
    timelock: u64,
}

impl UpgradeState {
    pub fn new(code: Cell, admin: MsgAddrStd, timelock: u64) -> Self {
        Self {
            code,
            admin,
            pending_code: UpgradeSlot::Idle,
            pending_admin: UpgradeSlot::Idle,
            timelock,
        }
    }

    /// Rebuilds the model from a temp upgrade record read from contract data.
    pub fn with_temp_upgrade(code: Cell, admin: MsgAddrStd, temp: &TempUpgrade, timelock: u64) -> Self {
        let mut state = Self::new(code, admin, timelock);
        if temp.code_ready_at != 0 {
            state.pending_code = UpgradeSlot::Pending {
                value: temp.pending_code.clone(),
                ready_at: temp.code_ready_at,
            };
        }
        if let Some(pending_admin) = temp.pending_admin_address() {
            state.pending_admin = UpgradeSlot::Pending {
                value: pending_admin,
                ready_at: temp.admin_ready_at,
            };
        }
        state
    }

    pub fn code(&self) -> &Cell {
        &self.code
    }

    pub fn admin(&self) -> &MsgAddrStd {
        &self.admin
    }

    pub fn pending_code(&self) -> &UpgradeSlot<Cell> {
        &self.pending_code
    }

    pub fn pending_admin(&self) -> &UpgradeSlot<MsgAddrStd> {
        &self.pending_admin
    }

    /// Temp upgrade record matching the current slots.
    pub fn temp_upgrade(&self) -> TempUpgrade {
        let mut temp = TempUpgrade::default();
        if let UpgradeSlot::Pending { value, ready_at } = &self.pending_code {
            temp.code_ready_at = *ready_at;
            temp.pending_code = value.clone();
        }
        if let UpgradeSlot::Pending { value, ready_at } = &self.pending_admin {
            temp.admin_ready_at = *ready_at;
            temp.pending_admin = MsgAddress::AddrStd(*value);
        }
        temp
    }

    fn ready_at(&self, now: u64) -> Result<u64> {
        match now.checked_add(self.timelock) {
            Some(ready_at) => Ok(ready_at),
            None => fail!(VaultError::InvalidArg(
                format!("timelock {} from {} overflows the clock", self.timelock, now)
            )),
        }
    }

    /// Proposes new code; a still pending proposal is replaced.
    pub fn init_code_upgrade(&mut self, code: Cell, now: u64) -> Result<()> {
        let ready_at = self.ready_at(now)?;
        log::debug!(target: "vault", "code upgrade {:x} pending until {}", code.repr_hash(), ready_at);
        self.pending_code = UpgradeSlot::Pending { value: code, ready_at };
        Ok(())
    }

    /// Proposes a new admin; a still pending proposal is replaced.
    pub fn init_admin_upgrade(&mut self, admin: MsgAddrStd, now: u64) -> Result<()> {
        let ready_at = self.ready_at(now)?;
        log::debug!(target: "vault", "admin upgrade to {} pending until {}", admin, ready_at);
        self.pending_admin = UpgradeSlot::Pending { value: admin, ready_at };
        Ok(())
    }

    pub fn cancel_code_upgrade(&mut self) -> Result<()> {
        if !self.pending_code.is_pending() {
            fail!(VaultError::UpgradeNotPending(UpgradeKind::Code.name()))
        }
        self.pending_code = UpgradeSlot::Idle;
        Ok(())
    }

    pub fn cancel_admin_upgrade(&mut self) -> Result<()> {
        if !self.pending_admin.is_pending() {
            fail!(VaultError::UpgradeNotPending(UpgradeKind::Admin.name()))
        }
        self.pending_admin = UpgradeSlot::Idle;
        Ok(())
    }

    /// Commits each ready slot independently. Slots that are not ready stay untouched.
    pub fn finalize_upgrades(&mut self, now: u64) -> FinalizeReport {
        let report = FinalizeReport {
            code: self.pending_code.commit(now),
            admin: self.pending_admin.commit(now),
        };
        if let Some(code) = &report.code {
            log::debug!(target: "vault", "code upgrade {:x} committed", code.repr_hash());
            self.code = code.clone();
        }
        if let Some(admin) = &report.admin {
            log::debug!(target: "vault", "admin upgrade to {} committed", admin);
            self.admin = *admin;
        }
        report
    }

    /// Predicts whether `kind` would be committed by a finalize sent at `now`.
    pub fn check_ready(&self, kind: UpgradeKind, now: u64) -> Result<()> {
        match kind {
            UpgradeKind::Code => self.pending_code.check_ready(kind, now),
            UpgradeKind::Admin => self.pending_admin.check_ready(kind, now),
        }
    }

    /// Applies an upgrade message the contract would accept at `now`.
    pub fn apply(&mut self, body: &MessageBody, now: u64) -> Result<FinalizeReport> {
        match body {
            MessageBody::InitCodeUpgrade(msg) => self.init_code_upgrade(msg.code.clone(), now)?,
            MessageBody::InitAdminUpgrade(msg) => self.init_admin_upgrade(msg.admin, now)?,
            MessageBody::CancelCodeUpgrade(_) => self.cancel_code_upgrade()?,
            MessageBody::CancelAdminUpgrade(_) => self.cancel_admin_upgrade()?,
            MessageBody::FinalizeUpgrades(_) => return Ok(self.finalize_upgrades(now)),
            other => fail!(VaultError::InvalidArg(
                format!("{} is not an upgrade operation", other.operation())
            )),
        }
        Ok(FinalizeReport::default())
    }
}
