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
    stack::StackReader,
    upgrade::{
        CancelAdminUpgrade, CancelCodeUpgrade, FinalizeUpgrades, InitAdminUpgrade,
        InitCodeUpgrade, TempUpgrade,
    },
    BuilderData, Cell, SliceData, Grams, MsgAddrStd, Operation, PoolType, QueryId, StateInit,
    Deserializable, MaybeDeserialize, MaybeSerialize, Serializable, Result,
};
use std::marker::PhantomData;

#[cfg(test)]
#[path = "tests/test_strategy.rs"]
mod tests;

/*
init#c674e474 query_id:uint64 deposit_lp_wallet:MsgAddress
    jetton_wallet:MsgAddress = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyInit {
    pub query_id: QueryId,
    pub deposit_lp_wallet_address: MsgAddrStd,
    pub jetton_wallet_address: MsgAddrStd,
}

impl OpMessage for StrategyInit {
    const OPERATION: Operation = Operation::Init;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for StrategyInit {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.deposit_lp_wallet_address.write_to(cell)?;
        self.jetton_wallet_address.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for StrategyInit {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            deposit_lp_wallet_address: MsgAddrStd::construct_from(slice)?,
            jetton_wallet_address: MsgAddrStd::construct_from(slice)?,
        })
    }
}

/*
withdraw_jettons#18a9ed91 query_id:uint64 wallet:MsgAddress
    receiver:MsgAddress amount:Coins = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyWithdrawJettons {
    pub query_id: QueryId,
    pub wallet_address: MsgAddrStd,
    pub receiver_address: MsgAddrStd,
    pub amount: Grams,
}

impl OpMessage for StrategyWithdrawJettons {
    const OPERATION: Operation = Operation::WithdrawJettons;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for StrategyWithdrawJettons {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.wallet_address.write_to(cell)?;
        self.receiver_address.write_to(cell)?;
        self.amount.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for StrategyWithdrawJettons {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            wallet_address: MsgAddrStd::construct_from(slice)?,
            receiver_address: MsgAddrStd::construct_from(slice)?,
            amount: Grams::construct_from(slice)?,
        })
    }
}

/*
reinvest#0812d4e3 query_id:uint64 total_reward:Coins amount_to_swap:Coins
    limit:Coins deadline:uint32 ton_target:Coins jetton_target:Coins = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reinvest {
    pub query_id: QueryId,
    pub total_reward: Grams,
    pub amount_to_swap: Grams,
    pub limit: Grams,
    pub deadline: u32,
    pub ton_target_balance: Grams,
    pub jetton_target_balance: Grams,
}

impl OpMessage for Reinvest {
    const OPERATION: Operation = Operation::Reinvest;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for Reinvest {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.total_reward.write_to(cell)?;
        self.amount_to_swap.write_to(cell)?;
        self.limit.write_to(cell)?;
        self.deadline.write_to(cell)?;
        self.ton_target_balance.write_to(cell)?;
        self.jetton_target_balance.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for Reinvest {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            total_reward: Grams::construct_from(slice)?,
            amount_to_swap: Grams::construct_from(slice)?,
            limit: Grams::construct_from(slice)?,
            deadline: u32::construct_from(slice)?,
            ton_target_balance: Grams::construct_from(slice)?,
            jetton_target_balance: Grams::construct_from(slice)?,
        })
    }
}

/*
deposit_liquidity#d55e4686 query_id:uint64 payload:(Maybe ^Cell) = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepositLiquidity {
    pub query_id: QueryId,
    pub payload: Option<Cell>,
}

impl OpMessage for DepositLiquidity {
    const OPERATION: Operation = Operation::DepositLiquidity;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for DepositLiquidity {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.payload.write_maybe_to(cell)?;
        Ok(())
    }
}

impl Deserializable for DepositLiquidity {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self { query_id, payload: Cell::read_maybe_from(slice)? })
    }
}

///
/// Data cell layout of one strategy flavor. `get_strategy_data` returns
/// the same fields flattened, in the order they are stored.
///
pub trait StrategyData: Serializable + Deserializable + Clone {
    const FLAVOR: &'static str;

    fn read_stack(stack: &mut StackReader) -> Result<Self>;

    fn admin_address(&self) -> &MsgAddrStd;
    fn pool_address(&self) -> &MsgAddrStd;
    fn temp_upgrade_cell(&self) -> &Cell;

    fn temp_upgrade(&self) -> Result<TempUpgrade> {
        TempUpgrade::construct_from_cell(self.temp_upgrade_cell().clone())
    }
}

///
/// Ton-jetton-ton strategy data:
/// vault:MsgAddress jetton_master:MsgAddress pool:MsgAddress pool_type:uint1
/// ^[deposit_lp_wallet:MsgAddress jetton_wallet:MsgAddress admin:MsgAddress]
/// ^[jetton_vault:MsgAddress native_vault:MsgAddress]
/// temp_upgrade:^TempUpgrade
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TjtStrategyConfig {
    pub vault_address: MsgAddrStd,
    pub jetton_master_address: MsgAddrStd,
    pub pool_address: MsgAddrStd,
    pub pool_type: PoolType,
    pub deposit_lp_wallet_address: MsgAddrStd,
    pub jetton_wallet_address: MsgAddrStd,
    pub admin_address: MsgAddrStd,
    pub jetton_vault_address: MsgAddrStd,
    pub native_vault_address: MsgAddrStd,
    pub temp_upgrade: Cell,
}

impl Serializable for TjtStrategyConfig {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        self.vault_address.write_to(cell)?;
        self.jetton_master_address.write_to(cell)?;
        self.pool_address.write_to(cell)?;
        self.pool_type.write_to(cell)?;

        let mut wallets = BuilderData::new();
        self.deposit_lp_wallet_address.write_to(&mut wallets)?;
        self.jetton_wallet_address.write_to(&mut wallets)?;
        self.admin_address.write_to(&mut wallets)?;
        cell.checked_append_reference(wallets.into_cell()?)?;

        let mut vaults = BuilderData::new();
        self.jetton_vault_address.write_to(&mut vaults)?;
        self.native_vault_address.write_to(&mut vaults)?;
        cell.checked_append_reference(vaults.into_cell()?)?;

        self.temp_upgrade.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for TjtStrategyConfig {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let vault_address = MsgAddrStd::construct_from(slice)?;
        let jetton_master_address = MsgAddrStd::construct_from(slice)?;
        let pool_address = MsgAddrStd::construct_from(slice)?;
        let pool_type = PoolType::construct_from(slice)?;
        let wallets = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let vaults = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        Ok(Self {
            vault_address,
            jetton_master_address,
            pool_address,
            pool_type,
            deposit_lp_wallet_address: MsgAddrStd::construct_from(wallets)?,
            jetton_wallet_address: MsgAddrStd::construct_from(wallets)?,
            admin_address: MsgAddrStd::construct_from(wallets)?,
            jetton_vault_address: MsgAddrStd::construct_from(vaults)?,
            native_vault_address: MsgAddrStd::construct_from(vaults)?,
            temp_upgrade: Cell::construct_from(slice)?,
        })
    }
}

impl StrategyData for TjtStrategyConfig {
    const FLAVOR: &'static str = "tjt";

    fn read_stack(stack: &mut StackReader) -> Result<Self> {
        Ok(Self {
            vault_address: stack.read_address()?,
            jetton_master_address: stack.read_address()?,
            pool_address: stack.read_address()?,
            pool_type: PoolType::from_u64(stack.read_u64()?)?,
            deposit_lp_wallet_address: stack.read_address()?,
            jetton_wallet_address: stack.read_address()?,
            admin_address: stack.read_address()?,
            jetton_vault_address: stack.read_address()?,
            native_vault_address: stack.read_address()?,
            temp_upgrade: stack.read_cell()?,
        })
    }

    fn admin_address(&self) -> &MsgAddrStd {
        &self.admin_address
    }

    fn pool_address(&self) -> &MsgAddrStd {
        &self.pool_address
    }

    fn temp_upgrade_cell(&self) -> &Cell {
        &self.temp_upgrade
    }
}

///
/// Jetton-jetton-ton strategy data:
/// vault:MsgAddress jetton_master:MsgAddress pool:MsgAddress pool_type:uint1
/// ^[usdt_master:MsgAddress deposit_lp_wallet:MsgAddress admin:MsgAddress]
/// ^[usdt_vault:MsgAddress jetton_vault:MsgAddress native_vault:MsgAddress]
/// ^[usdt_wallet:MsgAddress jetton_wallet:MsgAddress usdt_ton_pool:MsgAddress]
/// temp_upgrade:^TempUpgrade
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JjtStrategyConfig {
    pub vault_address: MsgAddrStd,
    pub jetton_master_address: MsgAddrStd,
    pub pool_address: MsgAddrStd,
    pub pool_type: PoolType,
    pub usdt_master_address: MsgAddrStd,
    pub deposit_lp_wallet_address: MsgAddrStd,
    pub admin_address: MsgAddrStd,
    pub usdt_vault_address: MsgAddrStd,
    pub jetton_vault_address: MsgAddrStd,
    pub native_vault_address: MsgAddrStd,
    pub usdt_wallet_address: MsgAddrStd,
    pub jetton_wallet_address: MsgAddrStd,
    pub usdt_ton_pool_address: MsgAddrStd,
    pub temp_upgrade: Cell,
}

pub(crate) fn addresses_cell(addresses: &[&MsgAddrStd]) -> Result<Cell> {
    let mut cell = BuilderData::new();
    for address in addresses {
        address.write_to(&mut cell)?;
    }
    cell.into_cell()
}

impl Serializable for JjtStrategyConfig {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        self.vault_address.write_to(cell)?;
        self.jetton_master_address.write_to(cell)?;
        self.pool_address.write_to(cell)?;
        self.pool_type.write_to(cell)?;
        cell.checked_append_reference(addresses_cell(&[
            &self.usdt_master_address,
            &self.deposit_lp_wallet_address,
            &self.admin_address,
        ])?)?;
        cell.checked_append_reference(addresses_cell(&[
            &self.usdt_vault_address,
            &self.jetton_vault_address,
            &self.native_vault_address,
        ])?)?;
        cell.checked_append_reference(addresses_cell(&[
            &self.usdt_wallet_address,
            &self.jetton_wallet_address,
            &self.usdt_ton_pool_address,
        ])?)?;
        self.temp_upgrade.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for JjtStrategyConfig {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let vault_address = MsgAddrStd::construct_from(slice)?;
        let jetton_master_address = MsgAddrStd::construct_from(slice)?;
        let pool_address = MsgAddrStd::construct_from(slice)?;
        let pool_type = PoolType::construct_from(slice)?;
        let admins = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let vaults = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let wallets = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        Ok(Self {
            vault_address,
            jetton_master_address,
            pool_address,
            pool_type,
            usdt_master_address: MsgAddrStd::construct_from(admins)?,
            deposit_lp_wallet_address: MsgAddrStd::construct_from(admins)?,
            admin_address: MsgAddrStd::construct_from(admins)?,
            usdt_vault_address: MsgAddrStd::construct_from(vaults)?,
            jetton_vault_address: MsgAddrStd::construct_from(vaults)?,
            native_vault_address: MsgAddrStd::construct_from(vaults)?,
            usdt_wallet_address: MsgAddrStd::construct_from(wallets)?,
            jetton_wallet_address: MsgAddrStd::construct_from(wallets)?,
            usdt_ton_pool_address: MsgAddrStd::construct_from(wallets)?,
            temp_upgrade: Cell::construct_from(slice)?,
        })
    }
}

impl StrategyData for JjtStrategyConfig {
    const FLAVOR: &'static str = "jjt";

    fn read_stack(stack: &mut StackReader) -> Result<Self> {
        Ok(Self {
            vault_address: stack.read_address()?,
            jetton_master_address: stack.read_address()?,
            pool_address: stack.read_address()?,
            pool_type: PoolType::from_u64(stack.read_u64()?)?,
            usdt_master_address: stack.read_address()?,
            deposit_lp_wallet_address: stack.read_address()?,
            admin_address: stack.read_address()?,
            usdt_vault_address: stack.read_address()?,
            jetton_vault_address: stack.read_address()?,
            native_vault_address: stack.read_address()?,
            usdt_wallet_address: stack.read_address()?,
            jetton_wallet_address: stack.read_address()?,
            usdt_ton_pool_address: stack.read_address()?,
            temp_upgrade: stack.read_cell()?,
        })
    }

    fn admin_address(&self) -> &MsgAddrStd {
        &self.admin_address
    }

    fn pool_address(&self) -> &MsgAddrStd {
        &self.pool_address
    }

    fn temp_upgrade_cell(&self) -> &Cell {
        &self.temp_upgrade
    }
}

/// Strategy contract of either flavor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Strategy<D: StrategyData> {
    handle: ContractHandle,
    phantom: PhantomData<D>,
}

pub type TjtStrategy = Strategy<TjtStrategyConfig>;
pub type JjtStrategy = Strategy<JjtStrategyConfig>;

impl<D: StrategyData> Strategy<D> {
    pub fn create_from_address(address: MsgAddrStd) -> Self {
        Self { handle: ContractHandle::with_address(address), phantom: PhantomData }
    }

    pub fn create_from_config(config: &D, code: Cell, workchain_id: i8) -> Result<Self> {
        let init = StateInit::with_code_and_data(code, config.serialize()?);
        let handle = ContractHandle::with_state_init(workchain_id, init)?;
        log::debug!(target: "vault", "{} strategy address predicted: {}", D::FLAVOR, handle.address);
        Ok(Self { handle, phantom: PhantomData })
    }

    pub fn address(&self) -> &MsgAddrStd {
        &self.handle.address
    }

    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    pub fn verify_address(&self) -> Result<()> {
        self.handle.verify_address()
    }

    pub fn send_deploy<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams) -> Result<()> {
        self.handle.send_deploy(sender, value)
    }

    pub fn send_init<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, init: &StrategyInit) -> Result<()> {
        self.handle.send(sender, value, init)
    }

    pub fn send_withdraw_jettons<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        withdraw: &StrategyWithdrawJettons,
    ) -> Result<()> {
        self.handle.send(sender, value, withdraw)
    }

    pub fn send_reinvest<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, reinvest: &Reinvest) -> Result<()> {
        self.handle.send(sender, value, reinvest)
    }

    pub fn send_deposit_liquidity<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        deposit: &DepositLiquidity,
    ) -> Result<()> {
        self.handle.send(sender, value, deposit)
    }

    pub fn send_init_code_upgrade<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        upgrade: &InitCodeUpgrade,
    ) -> Result<()> {
        self.handle.send(sender, value, upgrade)
    }

    pub fn send_init_admin_upgrade<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        upgrade: &InitAdminUpgrade,
    ) -> Result<()> {
        self.handle.send(sender, value, upgrade)
    }

    pub fn send_finalize_upgrades<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, query_id: QueryId) -> Result<()> {
        self.handle.send(sender, value, &FinalizeUpgrades::with_query_id(query_id))
    }

    pub fn send_cancel_code_upgrade<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, query_id: QueryId) -> Result<()> {
        self.handle.send(sender, value, &CancelCodeUpgrade::with_query_id(query_id))
    }

    pub fn send_cancel_admin_upgrade<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, query_id: QueryId) -> Result<()> {
        self.handle.send(sender, value, &CancelAdminUpgrade::with_query_id(query_id))
    }

    pub fn get_strategy_data<R: GetMethodRunner + ?Sized>(&self, runner: &mut R) -> Result<D> {
        let mut stack = self.handle.run_get_method(runner, "get_strategy_data", vec![])?;
        D::read_stack(&mut stack)
    }

    /// Third value of `get_strategy_data`, the rest of the stack is not decoded.
    pub fn get_strategy_pool_address<R: GetMethodRunner + ?Sized>(&self, runner: &mut R) -> Result<MsgAddrStd> {
        let mut stack = self.handle.run_get_method(runner, "get_strategy_data", vec![])?;
        stack.read_address()?;
        stack.read_address()?;
        stack.read_address()
    }

    pub fn get_temp_upgrade<R: GetMethodRunner + ?Sized>(&self, runner: &mut R) -> Result<TempUpgrade> {
        self.get_strategy_data(runner)?.temp_upgrade()
    }
}
