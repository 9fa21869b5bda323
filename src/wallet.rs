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
    messages::{read_header, write_header, OpMessage},
    provider::{ContractHandle, GetMethodRunner, MessageSender},
    upgrade::InitCodeUpgrade,
    BuilderData, Cell, SliceData, Grams, MsgAddrStd, MsgAddress, Operation, QueryId, StateInit,
    Deserializable, MaybeDeserialize, MaybeSerialize, Serializable, Result,
};

#[cfg(test)]
#[path = "tests/test_wallet.rs"]
mod tests;

/*
transfer#0f8a7ea5 query_id:uint64 amount:Coins destination:MsgAddress
    response_destination:MsgAddress custom_payload:(Maybe ^Cell)
    forward_ton_amount:Coins forward_payload:(Maybe ^Cell) = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transfer {
    pub query_id: QueryId,
    pub amount: Grams,
    pub destination: MsgAddrStd,
    pub response_address: MsgAddress,
    pub custom_payload: Option<Cell>,
    pub forward_amount: Grams,
    pub forward_payload: Option<Cell>,
}

impl OpMessage for Transfer {
    const OPERATION: Operation = Operation::Transfer;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for Transfer {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.amount.write_to(cell)?;
        self.destination.write_to(cell)?;
        self.response_address.write_to(cell)?;
        self.custom_payload.write_maybe_to(cell)?;
        self.forward_amount.write_to(cell)?;
        self.forward_payload.write_maybe_to(cell)?;
        Ok(())
    }
}

impl Deserializable for Transfer {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            amount: Grams::construct_from(slice)?,
            destination: MsgAddrStd::construct_from(slice)?,
            response_address: MsgAddress::construct_from(slice)?,
            custom_payload: Cell::read_maybe_from(slice)?,
            forward_amount: Grams::construct_from(slice)?,
            forward_payload: Cell::read_maybe_from(slice)?,
        })
    }
}

/*
burn#595f07bc query_id:uint64 amount:Coins
    response_destination:MsgAddress custom_payload:(Maybe ^Cell) = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Burn {
    pub query_id: QueryId,
    pub amount: Grams,
    pub response_address: MsgAddress,
    pub custom_payload: Option<Cell>,
}

impl OpMessage for Burn {
    const OPERATION: Operation = Operation::Burn;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for Burn {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.amount.write_to(cell)?;
        self.response_address.write_to(cell)?;
        self.custom_payload.write_maybe_to(cell)?;
        Ok(())
    }
}

impl Deserializable for Burn {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            amount: Grams::construct_from(slice)?,
            response_address: MsgAddress::construct_from(slice)?,
            custom_payload: Cell::read_maybe_from(slice)?,
        })
    }
}

/*
burn_notification#7bdd97de query_id:uint64 amount:Coins
    sender:MsgAddress response_destination:MsgAddress = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BurnNotification {
    pub query_id: QueryId,
    pub amount: Grams,
    pub sender: MsgAddrStd,
    pub response_address: MsgAddress,
}

impl OpMessage for BurnNotification {
    const OPERATION: Operation = Operation::BurnNotification;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for BurnNotification {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.amount.write_to(cell)?;
        self.sender.write_to(cell)?;
        self.response_address.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for BurnNotification {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            amount: Grams::construct_from(slice)?,
            sender: MsgAddrStd::construct_from(slice)?,
            response_address: MsgAddress::construct_from(slice)?,
        })
    }
}

/// Pulls jettons the shares wallet holds on `wallet_address` back to the owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletWithdrawJettons {
    pub query_id: QueryId,
    pub wallet_address: MsgAddrStd,
    pub amount: Grams,
    pub custom_payload: Option<Cell>,
}

impl OpMessage for WalletWithdrawJettons {
    const OPERATION: Operation = Operation::WithdrawJettons;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for WalletWithdrawJettons {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.wallet_address.write_to(cell)?;
        self.amount.write_to(cell)?;
        self.custom_payload.write_maybe_to(cell)?;
        Ok(())
    }
}

impl Deserializable for WalletWithdrawJettons {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            wallet_address: MsgAddrStd::construct_from(slice)?,
            amount: Grams::construct_from(slice)?,
            custom_payload: Cell::read_maybe_from(slice)?,
        })
    }
}

define_bare_message!(
    /// Returns the TON balance above storage reserve to the owner.
    WithdrawTon, Operation::WithdrawTon
);

///
/// Shares wallet data cell:
/// balance:Coins owner_address:MsgAddress jetton_master_address:MsgAddress
/// jetton_wallet_code:^Cell
///
/// `get_wallet_data` returns the same four values in the same order.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharesWalletConfig {
    pub balance: Grams,
    pub owner_address: MsgAddrStd,
    pub jetton_master_address: MsgAddrStd,
    pub jetton_wallet_code: Cell,
}

pub type SharesWalletData = SharesWalletConfig;

impl Serializable for SharesWalletConfig {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        self.balance.write_to(cell)?;
        self.owner_address.write_to(cell)?;
        self.jetton_master_address.write_to(cell)?;
        self.jetton_wallet_code.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for SharesWalletConfig {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        Ok(Self {
            balance: Grams::construct_from(slice)?,
            owner_address: MsgAddrStd::construct_from(slice)?,
            jetton_master_address: MsgAddrStd::construct_from(slice)?,
            jetton_wallet_code: Cell::construct_from(slice)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharesWallet {
    handle: ContractHandle,
}

impl SharesWallet {
    pub fn create_from_address(address: MsgAddrStd) -> Self {
        Self { handle: ContractHandle::with_address(address) }
    }

    pub fn create_from_config(config: &SharesWalletConfig, code: Cell, workchain_id: i8) -> Result<Self> {
        let init = StateInit::with_code_and_data(code, config.serialize()?);
        Ok(Self { handle: ContractHandle::with_state_init(workchain_id, init)? })
    }

    pub fn address(&self) -> &MsgAddrStd {
        &self.handle.address
    }

    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    pub fn send_deploy<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams) -> Result<()> {
        self.handle.send_deploy(sender, value)
    }

    pub fn send_transfer<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, transfer: &Transfer) -> Result<()> {
        self.handle.send(sender, value, transfer)
    }

    pub fn send_internal_transfer<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        transfer: &crate::InternalTransfer,
    ) -> Result<()> {
        self.handle.send(sender, value, transfer)
    }

    pub fn send_burn<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, burn: &Burn) -> Result<()> {
        self.handle.send(sender, value, burn)
    }

    pub fn send_withdraw_jettons<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        withdraw: &WalletWithdrawJettons,
    ) -> Result<()> {
        self.handle.send(sender, value, withdraw)
    }

    pub fn send_withdraw_ton<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, query_id: QueryId) -> Result<()> {
        self.handle.send(sender, value, &WithdrawTon::with_query_id(query_id))
    }

    pub fn send_init_code_upgrade<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        upgrade: &InitCodeUpgrade,
    ) -> Result<()> {
        self.handle.send(sender, value, upgrade)
    }

    pub fn get_wallet_data<R: GetMethodRunner + ?Sized>(&self, runner: &mut R) -> Result<SharesWalletData> {
        let mut stack = self.handle.run_get_method(runner, "get_wallet_data", vec![])?;
        Ok(SharesWalletData {
            balance: stack.read_grams()?,
            owner_address: stack.read_address()?,
            jetton_master_address: stack.read_address()?,
            jetton_wallet_code: stack.read_cell()?,
        })
    }
}
