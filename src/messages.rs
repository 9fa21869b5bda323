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
    factory::{CreateJjtAll, CreateJjtStrategy, CreateTjtAll, CreateTjtStrategy, CreateVault, SetStrategyCode},
    opcodes::{ContractKind, Operation},
    strategy::{DepositLiquidity, Reinvest, StrategyInit, StrategyWithdrawJettons},
    upgrade::{CancelAdminUpgrade, CancelCodeUpgrade, FinalizeUpgrades, InitAdminUpgrade, InitCodeUpgrade},
    wallet::{Burn, BurnNotification, Transfer, WalletWithdrawJettons, WithdrawTon},
    BuilderData, Cell, SliceData, Grams, MsgAddrStd, MsgAddress, QueryId,
    Deserializable, MaybeDeserialize, MaybeSerialize, Serializable, Result,
};

#[cfg(test)]
#[path = "tests/test_messages.rs"]
mod tests;

///
/// Contract-bound message body: `op:uint32 query_id:uint64` followed by
/// the operation fields.
///
pub trait OpMessage: Serializable + Deserializable {
    const OPERATION: Operation;

    fn query_id(&self) -> QueryId;

    /// Encodes the body into a cell ready to be handed to a sender.
    fn body(&self) -> Result<Cell> {
        let cell = self.serialize()?;
        log::debug!(
            target: "vault", "{} body built: {} bits, {} refs, query_id {}",
            Self::OPERATION, cell.bit_length(), cell.references_count(), self.query_id()
        );
        Ok(cell)
    }
}

pub(crate) fn write_header(cell: &mut BuilderData, op: Operation, query_id: QueryId) -> Result<()> {
    cell.append_u32(op.opcode())?;
    query_id.write_to(cell)
}

pub(crate) fn read_header(slice: &mut SliceData, op: Operation) -> Result<QueryId> {
    let found = slice.get_next_u32()?;
    if found != op.opcode() {
        fail!(VaultError::WrongOpcode { expected: op.opcode(), found, name: op.name() })
    }
    QueryId::construct_from(slice)
}

/// Message that carries nothing but the header.
macro_rules! define_bare_message {
    ( $(#[$attr:meta])* $name:ident, $op:expr ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            pub query_id: $crate::QueryId,
        }

        impl $name {
            pub fn with_query_id(query_id: impl Into<$crate::QueryId>) -> Self {
                Self { query_id: query_id.into() }
            }
        }

        impl $crate::messages::OpMessage for $name {
            const OPERATION: $crate::Operation = $op;
            fn query_id(&self) -> $crate::QueryId {
                self.query_id
            }
        }

        impl $crate::Serializable for $name {
            fn write_to(&self, cell: &mut $crate::BuilderData) -> $crate::Result<()> {
                $crate::messages::write_header(cell, $op, self.query_id)
            }
        }

        impl $crate::Deserializable for $name {
            fn construct_from(slice: &mut $crate::SliceData) -> $crate::Result<Self> {
                Ok(Self { query_id: $crate::messages::read_header(slice, $op)? })
            }
        }
    };
}

/*
transfer_notification#7362d09c query_id:uint64 amount:Coins
    sender:MsgAddress forward_payload:(Maybe ^Cell) = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferNotification {
    pub query_id: QueryId,
    pub amount: Grams,
    pub sender: MsgAddrStd,
    pub forward_payload: Option<Cell>,
}

impl OpMessage for TransferNotification {
    const OPERATION: Operation = Operation::TransferNotification;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for TransferNotification {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.amount.write_to(cell)?;
        self.sender.write_to(cell)?;
        self.forward_payload.write_maybe_to(cell)?;
        Ok(())
    }
}

impl Deserializable for TransferNotification {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        let amount = Grams::construct_from(slice)?;
        let sender = MsgAddrStd::construct_from(slice)?;
        let forward_payload = Cell::read_maybe_from(slice)?;
        Ok(Self { query_id, amount, sender, forward_payload })
    }
}

/*
internal_transfer#178d4519 query_id:uint64 amount:Coins from:MsgAddress
    response_address:MsgAddress forward_ton_amount:Coins
    forward_payload:(Maybe ^Cell) = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InternalTransfer {
    pub query_id: QueryId,
    pub amount: Grams,
    pub from: MsgAddrStd,
    pub response_address: MsgAddress,
    pub forward_amount: Grams,
    pub forward_payload: Option<Cell>,
}

impl OpMessage for InternalTransfer {
    const OPERATION: Operation = Operation::InternalTransfer;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for InternalTransfer {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.amount.write_to(cell)?;
        self.from.write_to(cell)?;
        self.response_address.write_to(cell)?;
        self.forward_amount.write_to(cell)?;
        self.forward_payload.write_maybe_to(cell)?;
        Ok(())
    }
}

impl Deserializable for InternalTransfer {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            amount: Grams::construct_from(slice)?,
            from: MsgAddrStd::construct_from(slice)?,
            response_address: MsgAddress::construct_from(slice)?,
            forward_amount: Grams::construct_from(slice)?,
            forward_payload: Cell::read_maybe_from(slice)?,
        })
    }
}

///
/// Any body a vault-family contract accepts, decoded by opcode.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageBody {
    Transfer(Transfer),
    TransferNotification(TransferNotification),
    InternalTransfer(InternalTransfer),
    Burn(Burn),
    BurnNotification(BurnNotification),
    WithdrawTon(WithdrawTon),
    WalletWithdrawJettons(WalletWithdrawJettons),
    StrategyWithdrawJettons(StrategyWithdrawJettons),
    Reinvest(Reinvest),
    DepositLiquidity(DepositLiquidity),
    Init(StrategyInit),
    InitCodeUpgrade(InitCodeUpgrade),
    InitAdminUpgrade(InitAdminUpgrade),
    FinalizeUpgrades(FinalizeUpgrades),
    CancelAdminUpgrade(CancelAdminUpgrade),
    CancelCodeUpgrade(CancelCodeUpgrade),
    CreateVault(CreateVault),
    CreateTjtStrategy(CreateTjtStrategy),
    CreateTjtAll(CreateTjtAll),
    CreateJjtStrategy(CreateJjtStrategy),
    CreateJjtAll(CreateJjtAll),
    SetStrategyCode(SetStrategyCode),
    /// Contract-to-contract callback; its fields are left unread.
    Callback {
        operation: Operation,
        query_id: QueryId,
    },
}

impl MessageBody {
    /// Decodes a body addressed to a contract of `kind`.
    pub fn decode(kind: ContractKind, cell: Cell) -> Result<Self> {
        let mut slice = SliceData::load_cell(cell);
        let operation = Operation::from_opcode(kind, slice.peek_u32()?)?;
        let slice = &mut slice;
        let body = match operation {
            Operation::Transfer => MessageBody::Transfer(Transfer::construct_from(slice)?),
            Operation::TransferNotification =>
                MessageBody::TransferNotification(TransferNotification::construct_from(slice)?),
            Operation::InternalTransfer =>
                MessageBody::InternalTransfer(InternalTransfer::construct_from(slice)?),
            Operation::Burn => MessageBody::Burn(Burn::construct_from(slice)?),
            Operation::BurnNotification =>
                MessageBody::BurnNotification(BurnNotification::construct_from(slice)?),
            Operation::WithdrawTon => MessageBody::WithdrawTon(WithdrawTon::construct_from(slice)?),
            Operation::WithdrawJettons => match kind {
                ContractKind::SharesWallet =>
                    MessageBody::WalletWithdrawJettons(WalletWithdrawJettons::construct_from(slice)?),
                _ => MessageBody::StrategyWithdrawJettons(StrategyWithdrawJettons::construct_from(slice)?),
            },
            Operation::Reinvest => MessageBody::Reinvest(Reinvest::construct_from(slice)?),
            Operation::DepositLiquidity =>
                MessageBody::DepositLiquidity(DepositLiquidity::construct_from(slice)?),
            Operation::Init => MessageBody::Init(StrategyInit::construct_from(slice)?),
            Operation::InitCodeUpgrade =>
                MessageBody::InitCodeUpgrade(InitCodeUpgrade::construct_from(slice)?),
            Operation::InitAdminUpgrade =>
                MessageBody::InitAdminUpgrade(InitAdminUpgrade::construct_from(slice)?),
            Operation::FinalizeUpgrades =>
                MessageBody::FinalizeUpgrades(FinalizeUpgrades::construct_from(slice)?),
            Operation::CancelAdminUpgrade =>
                MessageBody::CancelAdminUpgrade(CancelAdminUpgrade::construct_from(slice)?),
            Operation::CancelCodeUpgrade =>
                MessageBody::CancelCodeUpgrade(CancelCodeUpgrade::construct_from(slice)?),
            Operation::CreateVault => MessageBody::CreateVault(CreateVault::construct_from(slice)?),
            Operation::CreateTjtStrategy =>
                MessageBody::CreateTjtStrategy(CreateTjtStrategy::construct_from(slice)?),
            Operation::CreateTjtAll => MessageBody::CreateTjtAll(CreateTjtAll::construct_from(slice)?),
            Operation::CreateJjtStrategy =>
                MessageBody::CreateJjtStrategy(CreateJjtStrategy::construct_from(slice)?),
            Operation::CreateJjtAll => MessageBody::CreateJjtAll(CreateJjtAll::construct_from(slice)?),
            Operation::SetStrategyCode =>
                MessageBody::SetStrategyCode(SetStrategyCode::construct_from(slice)?),
            Operation::CbFailSwapOrInvest
            | Operation::StopDepositToPool
            | Operation::CbSuccessSwap
            | Operation::CompleteReinvest
            | Operation::ContinueDepositToPool => {
                slice.get_next_u32()?;
                MessageBody::Callback { operation, query_id: QueryId::construct_from(slice)? }
            }
        };
        Ok(body)
    }

    pub fn operation(&self) -> Operation {
        match self {
            MessageBody::Transfer(_) => Operation::Transfer,
            MessageBody::TransferNotification(_) => Operation::TransferNotification,
            MessageBody::InternalTransfer(_) => Operation::InternalTransfer,
            MessageBody::Burn(_) => Operation::Burn,
            MessageBody::BurnNotification(_) => Operation::BurnNotification,
            MessageBody::WithdrawTon(_) => Operation::WithdrawTon,
            MessageBody::WalletWithdrawJettons(_)
            | MessageBody::StrategyWithdrawJettons(_) => Operation::WithdrawJettons,
            MessageBody::Reinvest(_) => Operation::Reinvest,
            MessageBody::DepositLiquidity(_) => Operation::DepositLiquidity,
            MessageBody::Init(_) => Operation::Init,
            MessageBody::InitCodeUpgrade(_) => Operation::InitCodeUpgrade,
            MessageBody::InitAdminUpgrade(_) => Operation::InitAdminUpgrade,
            MessageBody::FinalizeUpgrades(_) => Operation::FinalizeUpgrades,
            MessageBody::CancelAdminUpgrade(_) => Operation::CancelAdminUpgrade,
            MessageBody::CancelCodeUpgrade(_) => Operation::CancelCodeUpgrade,
            MessageBody::CreateVault(_) => Operation::CreateVault,
            MessageBody::CreateTjtStrategy(_) => Operation::CreateTjtStrategy,
            MessageBody::CreateTjtAll(_) => Operation::CreateTjtAll,
            MessageBody::CreateJjtStrategy(_) => Operation::CreateJjtStrategy,
            MessageBody::CreateJjtAll(_) => Operation::CreateJjtAll,
            MessageBody::SetStrategyCode(_) => Operation::SetStrategyCode,
            MessageBody::Callback { operation, .. } => *operation,
        }
    }
}

impl Serializable for MessageBody {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        match self {
            MessageBody::Transfer(body) => body.write_to(cell),
            MessageBody::TransferNotification(body) => body.write_to(cell),
            MessageBody::InternalTransfer(body) => body.write_to(cell),
            MessageBody::Burn(body) => body.write_to(cell),
            MessageBody::BurnNotification(body) => body.write_to(cell),
            MessageBody::WithdrawTon(body) => body.write_to(cell),
            MessageBody::WalletWithdrawJettons(body) => body.write_to(cell),
            MessageBody::StrategyWithdrawJettons(body) => body.write_to(cell),
            MessageBody::Reinvest(body) => body.write_to(cell),
            MessageBody::DepositLiquidity(body) => body.write_to(cell),
            MessageBody::Init(body) => body.write_to(cell),
            MessageBody::InitCodeUpgrade(body) => body.write_to(cell),
            MessageBody::InitAdminUpgrade(body) => body.write_to(cell),
            MessageBody::FinalizeUpgrades(body) => body.write_to(cell),
            MessageBody::CancelAdminUpgrade(body) => body.write_to(cell),
            MessageBody::CancelCodeUpgrade(body) => body.write_to(cell),
            MessageBody::CreateVault(body) => body.write_to(cell),
            MessageBody::CreateTjtStrategy(body) => body.write_to(cell),
            MessageBody::CreateTjtAll(body) => body.write_to(cell),
            MessageBody::CreateJjtStrategy(body) => body.write_to(cell),
            MessageBody::CreateJjtAll(body) => body.write_to(cell),
            MessageBody::SetStrategyCode(body) => body.write_to(cell),
            MessageBody::Callback { operation, query_id } => write_header(cell, *operation, *query_id),
        }
    }
}
