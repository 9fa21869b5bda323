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
    address::check_address,
    messages::{read_header, write_header, OpMessage},
    provider::{ContractHandle, GetMethodRunner, MessageSender},
    stack::StackEntry,
    strategy::addresses_cell,
    upgrade::{
        CancelAdminUpgrade, CancelCodeUpgrade, FinalizeUpgrades, InitAdminUpgrade,
        InitCodeUpgrade, TempUpgrade,
    },
    BuilderData, Cell, SliceData, Grams, MsgAddrStd, Operation, PoolType, QueryId, StateInit,
    Deserializable, Serializable, Result,
};

#[cfg(test)]
#[path = "tests/test_factory.rs"]
mod tests;

///
/// Vault factory data:
/// admin:MsgAddress manager:MsgAddress strategy_code:^Cell vault_code:^Cell
/// shares_wallet_code:^Cell temp_upgrade:^TempUpgrade
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VaultFactoryConfig {
    pub admin_address: MsgAddrStd,
    pub manager_address: MsgAddrStd,
    pub strategy_code: Cell,
    pub vault_code: Cell,
    pub shares_wallet_code: Cell,
    pub temp_upgrade: TempUpgrade,
}

impl Serializable for VaultFactoryConfig {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        self.admin_address.write_to(cell)?;
        self.manager_address.write_to(cell)?;
        self.strategy_code.write_to(cell)?;
        self.vault_code.write_to(cell)?;
        self.shares_wallet_code.write_to(cell)?;
        self.temp_upgrade.serialize()?.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for VaultFactoryConfig {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        Ok(Self {
            admin_address: MsgAddrStd::construct_from(slice)?,
            manager_address: MsgAddrStd::construct_from(slice)?,
            strategy_code: Cell::construct_from(slice)?,
            vault_code: Cell::construct_from(slice)?,
            shares_wallet_code: Cell::construct_from(slice)?,
            temp_upgrade: TempUpgrade::construct_from_reference(slice)?,
        })
    }
}

/*
create_vault#cbdf3140 query_id:uint64 distribution_pool:MsgAddress
    management_fee_rate:Coins admin:MsgAddress manager:MsgAddress = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateVault {
    pub query_id: QueryId,
    pub distribution_pool_address: MsgAddrStd,
    pub management_fee_rate: Grams,
    pub admin_address: MsgAddrStd,
    pub manager_address: MsgAddrStd,
}

impl OpMessage for CreateVault {
    const OPERATION: Operation = Operation::CreateVault;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for CreateVault {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.distribution_pool_address.write_to(cell)?;
        self.management_fee_rate.write_to(cell)?;
        self.admin_address.write_to(cell)?;
        self.manager_address.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for CreateVault {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self {
            query_id,
            distribution_pool_address: MsgAddrStd::construct_from(slice)?,
            management_fee_rate: Grams::construct_from(slice)?,
            admin_address: MsgAddrStd::construct_from(slice)?,
            manager_address: MsgAddrStd::construct_from(slice)?,
        })
    }
}

///
/// Ton-jetton strategy parameters, the factory derives the strategy
/// address from them.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TjtStrategyParams {
    pub vault_address: MsgAddrStd,
    pub jetton_master_address: MsgAddrStd,
    pub pool_address: MsgAddrStd,
    pub pool_type: PoolType,
    pub admin_address: MsgAddrStd,
    pub jetton_vault_address: MsgAddrStd,
    pub native_vault_address: MsgAddrStd,
}

impl TjtStrategyParams {
    /// Arguments of `get_tjt_strategy_address`.
    pub fn to_stack(&self) -> Result<Vec<StackEntry>> {
        Ok(vec![
            StackEntry::address(&self.vault_address)?,
            StackEntry::address(&self.jetton_master_address)?,
            StackEntry::address(&self.pool_address)?,
            StackEntry::int(self.pool_type as u8),
            StackEntry::address(&self.admin_address)?,
            StackEntry::address(&self.jetton_vault_address)?,
            StackEntry::address(&self.native_vault_address)?,
        ])
    }
}

/*
create_tjt_strategy#d2b2749c query_id:uint64 vault:MsgAddress jetton_master:MsgAddress
    pool:MsgAddress pool_type:uint1
    ^[admin:MsgAddress jetton_vault:MsgAddress native_vault:MsgAddress] = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateTjtStrategy {
    pub query_id: QueryId,
    pub strategy: TjtStrategyParams,
}

impl OpMessage for CreateTjtStrategy {
    const OPERATION: Operation = Operation::CreateTjtStrategy;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for CreateTjtStrategy {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        let strategy = &self.strategy;
        write_header(cell, Self::OPERATION, self.query_id)?;
        strategy.vault_address.write_to(cell)?;
        strategy.jetton_master_address.write_to(cell)?;
        strategy.pool_address.write_to(cell)?;
        strategy.pool_type.write_to(cell)?;
        cell.checked_append_reference(addresses_cell(&[
            &strategy.admin_address,
            &strategy.jetton_vault_address,
            &strategy.native_vault_address,
        ])?)?;
        Ok(())
    }
}

impl Deserializable for CreateTjtStrategy {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        let vault_address = MsgAddrStd::construct_from(slice)?;
        let jetton_master_address = MsgAddrStd::construct_from(slice)?;
        let pool_address = MsgAddrStd::construct_from(slice)?;
        let pool_type = PoolType::construct_from(slice)?;
        let ref1 = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let strategy = TjtStrategyParams {
            vault_address,
            jetton_master_address,
            pool_address,
            pool_type,
            admin_address: MsgAddrStd::construct_from(ref1)?,
            jetton_vault_address: MsgAddrStd::construct_from(ref1)?,
            native_vault_address: MsgAddrStd::construct_from(ref1)?,
        };
        Ok(Self { query_id, strategy })
    }
}

/// Jetton-jetton strategy parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JjtStrategyParams {
    pub vault_address: MsgAddrStd,
    pub jetton_master_address: MsgAddrStd,
    pub pool_address: MsgAddrStd,
    pub pool_type: PoolType,
    pub usdt_master_address: MsgAddrStd,
    pub admin_address: MsgAddrStd,
    pub usdt_vault_address: MsgAddrStd,
    pub jetton_vault_address: MsgAddrStd,
    pub native_vault_address: MsgAddrStd,
    pub usdt_ton_pool_address: MsgAddrStd,
}

impl JjtStrategyParams {
    /// Arguments of `get_jjt_strategy_address`.
    pub fn to_stack(&self) -> Result<Vec<StackEntry>> {
        Ok(vec![
            StackEntry::address(&self.vault_address)?,
            StackEntry::address(&self.jetton_master_address)?,
            StackEntry::address(&self.pool_address)?,
            StackEntry::int(self.pool_type as u8),
            StackEntry::address(&self.usdt_master_address)?,
            StackEntry::address(&self.admin_address)?,
            StackEntry::address(&self.usdt_vault_address)?,
            StackEntry::address(&self.jetton_vault_address)?,
            StackEntry::address(&self.native_vault_address)?,
            StackEntry::address(&self.usdt_ton_pool_address)?,
        ])
    }
}

/*
create_jjt_strategy#379b4a7e query_id:uint64 vault:MsgAddress jetton_master:MsgAddress
    pool:MsgAddress pool_type:uint1
    ^[usdt_master:MsgAddress admin:MsgAddress usdt_vault:MsgAddress]
    ^[jetton_vault:MsgAddress native_vault:MsgAddress usdt_ton_pool:MsgAddress]
    = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateJjtStrategy {
    pub query_id: QueryId,
    pub strategy: JjtStrategyParams,
}

impl OpMessage for CreateJjtStrategy {
    const OPERATION: Operation = Operation::CreateJjtStrategy;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for CreateJjtStrategy {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        let strategy = &self.strategy;
        write_header(cell, Self::OPERATION, self.query_id)?;
        strategy.vault_address.write_to(cell)?;
        strategy.jetton_master_address.write_to(cell)?;
        strategy.pool_address.write_to(cell)?;
        strategy.pool_type.write_to(cell)?;
        cell.checked_append_reference(addresses_cell(&[
            &strategy.usdt_master_address,
            &strategy.admin_address,
            &strategy.usdt_vault_address,
        ])?)?;
        cell.checked_append_reference(addresses_cell(&[
            &strategy.jetton_vault_address,
            &strategy.native_vault_address,
            &strategy.usdt_ton_pool_address,
        ])?)?;
        Ok(())
    }
}

impl Deserializable for CreateJjtStrategy {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        let vault_address = MsgAddrStd::construct_from(slice)?;
        let jetton_master_address = MsgAddrStd::construct_from(slice)?;
        let pool_address = MsgAddrStd::construct_from(slice)?;
        let pool_type = PoolType::construct_from(slice)?;
        let ref1 = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let ref2 = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let strategy = JjtStrategyParams {
            vault_address,
            jetton_master_address,
            pool_address,
            pool_type,
            usdt_master_address: MsgAddrStd::construct_from(ref1)?,
            admin_address: MsgAddrStd::construct_from(ref1)?,
            usdt_vault_address: MsgAddrStd::construct_from(ref1)?,
            jetton_vault_address: MsgAddrStd::construct_from(ref2)?,
            native_vault_address: MsgAddrStd::construct_from(ref2)?,
            usdt_ton_pool_address: MsgAddrStd::construct_from(ref2)?,
        };
        Ok(Self { query_id, strategy })
    }
}

/*
create_tjt_all#55796149 query_id:uint64 distribution_pool:MsgAddress
    admin:MsgAddress manager:MsgAddress management_fee_rate:uint16
    ^[jetton_master:MsgAddress jetton_vault:MsgAddress pool:MsgAddress pool_type:uint1]
    ^[native_vault:MsgAddress vault_lp_wallet:MsgAddress strategy_lp_wallet:MsgAddress]
    ^[strategy_jetton_wallet:MsgAddress fwd_fee:Coins] = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateTjtAll {
    pub query_id: QueryId,
    pub distribution_pool_address: MsgAddrStd,
    pub admin_address: MsgAddrStd,
    pub manager_address: MsgAddrStd,
    pub management_fee_rate: u16,
    pub jetton_master_address: MsgAddrStd,
    pub jetton_vault_address: MsgAddrStd,
    pub pool_address: MsgAddrStd,
    pub pool_type: PoolType,
    pub native_vault_address: MsgAddrStd,
    pub vault_lp_wallet_address: MsgAddrStd,
    pub strategy_lp_wallet_address: MsgAddrStd,
    pub strategy_jetton_wallet_address: MsgAddrStd,
    pub fwd_fee: Grams,
}

impl OpMessage for CreateTjtAll {
    const OPERATION: Operation = Operation::CreateTjtAll;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for CreateTjtAll {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.distribution_pool_address.write_to(cell)?;
        self.admin_address.write_to(cell)?;
        self.manager_address.write_to(cell)?;
        self.management_fee_rate.write_to(cell)?;

        let mut pool = BuilderData::new();
        self.jetton_master_address.write_to(&mut pool)?;
        self.jetton_vault_address.write_to(&mut pool)?;
        self.pool_address.write_to(&mut pool)?;
        self.pool_type.write_to(&mut pool)?;
        cell.checked_append_reference(pool.into_cell()?)?;

        cell.checked_append_reference(addresses_cell(&[
            &self.native_vault_address,
            &self.vault_lp_wallet_address,
            &self.strategy_lp_wallet_address,
        ])?)?;

        let mut wallet = BuilderData::new();
        self.strategy_jetton_wallet_address.write_to(&mut wallet)?;
        self.fwd_fee.write_to(&mut wallet)?;
        cell.checked_append_reference(wallet.into_cell()?)?;
        Ok(())
    }
}

impl Deserializable for CreateTjtAll {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        let distribution_pool_address = MsgAddrStd::construct_from(slice)?;
        let admin_address = MsgAddrStd::construct_from(slice)?;
        let manager_address = MsgAddrStd::construct_from(slice)?;
        let management_fee_rate = u16::construct_from(slice)?;
        let pool = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let wallets = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let wallet = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        Ok(Self {
            query_id,
            distribution_pool_address,
            admin_address,
            manager_address,
            management_fee_rate,
            jetton_master_address: MsgAddrStd::construct_from(pool)?,
            jetton_vault_address: MsgAddrStd::construct_from(pool)?,
            pool_address: MsgAddrStd::construct_from(pool)?,
            pool_type: PoolType::construct_from(pool)?,
            native_vault_address: MsgAddrStd::construct_from(wallets)?,
            vault_lp_wallet_address: MsgAddrStd::construct_from(wallets)?,
            strategy_lp_wallet_address: MsgAddrStd::construct_from(wallets)?,
            strategy_jetton_wallet_address: MsgAddrStd::construct_from(wallet)?,
            fwd_fee: Grams::construct_from(wallet)?,
        })
    }
}

/*
create_jjt_all#629886da query_id:uint64 distribution_pool:MsgAddress
    admin:MsgAddress manager:MsgAddress management_fee_rate:uint16
    ^[usdt_master:MsgAddress jetton_master:MsgAddress pool:MsgAddress pool_type:uint1]
    ^[usdt_vault:MsgAddress jetton_vault:MsgAddress native_vault:MsgAddress]
    ^[usdt_ton_pool:MsgAddress vault_lp_wallet:MsgAddress strategy_lp_wallet:MsgAddress]
    ^[strategy_usdt_wallet:MsgAddress strategy_jetton_wallet:MsgAddress fwd_fee:Coins]
    = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateJjtAll {
    pub query_id: QueryId,
    pub distribution_pool_address: MsgAddrStd,
    pub admin_address: MsgAddrStd,
    pub manager_address: MsgAddrStd,
    pub management_fee_rate: u16,
    pub usdt_master_address: MsgAddrStd,
    pub jetton_master_address: MsgAddrStd,
    pub pool_address: MsgAddrStd,
    pub pool_type: PoolType,
    pub usdt_vault_address: MsgAddrStd,
    pub jetton_vault_address: MsgAddrStd,
    pub native_vault_address: MsgAddrStd,
    pub usdt_ton_pool_address: MsgAddrStd,
    pub vault_lp_wallet_address: MsgAddrStd,
    pub strategy_lp_wallet_address: MsgAddrStd,
    pub strategy_usdt_wallet_address: MsgAddrStd,
    pub strategy_jetton_wallet_address: MsgAddrStd,
    pub fwd_fee: Grams,
}

impl OpMessage for CreateJjtAll {
    const OPERATION: Operation = Operation::CreateJjtAll;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for CreateJjtAll {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.distribution_pool_address.write_to(cell)?;
        self.admin_address.write_to(cell)?;
        self.manager_address.write_to(cell)?;
        self.management_fee_rate.write_to(cell)?;

        let mut pool = BuilderData::new();
        self.usdt_master_address.write_to(&mut pool)?;
        self.jetton_master_address.write_to(&mut pool)?;
        self.pool_address.write_to(&mut pool)?;
        self.pool_type.write_to(&mut pool)?;
        cell.checked_append_reference(pool.into_cell()?)?;

        cell.checked_append_reference(addresses_cell(&[
            &self.usdt_vault_address,
            &self.jetton_vault_address,
            &self.native_vault_address,
        ])?)?;
        cell.checked_append_reference(addresses_cell(&[
            &self.usdt_ton_pool_address,
            &self.vault_lp_wallet_address,
            &self.strategy_lp_wallet_address,
        ])?)?;

        let mut wallets = BuilderData::new();
        self.strategy_usdt_wallet_address.write_to(&mut wallets)?;
        self.strategy_jetton_wallet_address.write_to(&mut wallets)?;
        self.fwd_fee.write_to(&mut wallets)?;
        cell.checked_append_reference(wallets.into_cell()?)?;
        Ok(())
    }
}

impl Deserializable for CreateJjtAll {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        let distribution_pool_address = MsgAddrStd::construct_from(slice)?;
        let admin_address = MsgAddrStd::construct_from(slice)?;
        let manager_address = MsgAddrStd::construct_from(slice)?;
        let management_fee_rate = u16::construct_from(slice)?;
        let pool = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let vaults = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let lp = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        let wallets = &mut SliceData::load_cell(slice.checked_drain_reference()?);
        Ok(Self {
            query_id,
            distribution_pool_address,
            admin_address,
            manager_address,
            management_fee_rate,
            usdt_master_address: MsgAddrStd::construct_from(pool)?,
            jetton_master_address: MsgAddrStd::construct_from(pool)?,
            pool_address: MsgAddrStd::construct_from(pool)?,
            pool_type: PoolType::construct_from(pool)?,
            usdt_vault_address: MsgAddrStd::construct_from(vaults)?,
            jetton_vault_address: MsgAddrStd::construct_from(vaults)?,
            native_vault_address: MsgAddrStd::construct_from(vaults)?,
            usdt_ton_pool_address: MsgAddrStd::construct_from(lp)?,
            vault_lp_wallet_address: MsgAddrStd::construct_from(lp)?,
            strategy_lp_wallet_address: MsgAddrStd::construct_from(lp)?,
            strategy_usdt_wallet_address: MsgAddrStd::construct_from(wallets)?,
            strategy_jetton_wallet_address: MsgAddrStd::construct_from(wallets)?,
            fwd_fee: Grams::construct_from(wallets)?,
        })
    }
}

/*
set_strategy_code#43157f38 query_id:uint64 code:^Cell = InternalMsgBody;
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetStrategyCode {
    pub query_id: QueryId,
    pub code: Cell,
}

impl OpMessage for SetStrategyCode {
    const OPERATION: Operation = Operation::SetStrategyCode;
    fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Serializable for SetStrategyCode {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        write_header(cell, Self::OPERATION, self.query_id)?;
        self.code.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for SetStrategyCode {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let query_id = read_header(slice, Self::OPERATION)?;
        Ok(Self { query_id, code: Cell::construct_from(slice)? })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultFactory {
    handle: ContractHandle,
}

impl VaultFactory {
    pub fn create_from_address(address: MsgAddrStd) -> Self {
        Self { handle: ContractHandle::with_address(address) }
    }

    pub fn create_from_config(config: &VaultFactoryConfig, code: Cell, workchain_id: i8) -> Result<Self> {
        let init = StateInit::with_code_and_data(code, config.serialize()?);
        Ok(Self { handle: ContractHandle::with_state_init(workchain_id, init)? })
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

    pub fn send_create_vault<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, msg: &CreateVault) -> Result<()> {
        self.handle.send(sender, value, msg)
    }

    pub fn send_create_tjt_strategy<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        msg: &CreateTjtStrategy,
    ) -> Result<()> {
        self.handle.send(sender, value, msg)
    }

    pub fn send_create_jjt_strategy<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        msg: &CreateJjtStrategy,
    ) -> Result<()> {
        self.handle.send(sender, value, msg)
    }

    pub fn send_create_tjt_all<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, msg: &CreateTjtAll) -> Result<()> {
        self.handle.send(sender, value, msg)
    }

    pub fn send_create_jjt_all<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams, msg: &CreateJjtAll) -> Result<()> {
        self.handle.send(sender, value, msg)
    }

    pub fn send_set_strategy_code<S: MessageSender + ?Sized>(
        &self,
        sender: &mut S,
        value: Grams,
        msg: &SetStrategyCode,
    ) -> Result<()> {
        self.handle.send(sender, value, msg)
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

    pub fn get_vault_address<R: GetMethodRunner + ?Sized>(
        &self,
        runner: &mut R,
        distribution_pool_address: &MsgAddrStd,
        management_fee_rate: Grams,
        admin_address: &MsgAddrStd,
        manager_address: &MsgAddrStd,
    ) -> Result<MsgAddrStd> {
        let args = vec![
            StackEntry::address(distribution_pool_address)?,
            StackEntry::int(management_fee_rate.as_u128()),
            StackEntry::address(admin_address)?,
            StackEntry::address(manager_address)?,
        ];
        self.handle.run_get_method(runner, "get_vault_address", args)?.read_address()
    }

    pub fn get_tjt_strategy_address<R: GetMethodRunner + ?Sized>(
        &self,
        runner: &mut R,
        strategy: &TjtStrategyParams,
    ) -> Result<MsgAddrStd> {
        let args = strategy.to_stack()?;
        self.handle.run_get_method(runner, "get_tjt_strategy_address", args)?.read_address()
    }

    pub fn get_jjt_strategy_address<R: GetMethodRunner + ?Sized>(
        &self,
        runner: &mut R,
        strategy: &JjtStrategyParams,
    ) -> Result<MsgAddrStd> {
        let args = strategy.to_stack()?;
        self.handle.run_get_method(runner, "get_jjt_strategy_address", args)?.read_address()
    }

    ///
    /// Asks the factory for the vault address and checks it against the one
    /// derived from `expected`, the StateInit the caller intends to deploy.
    ///
    pub fn verify_vault_address<R: GetMethodRunner + ?Sized>(
        &self,
        runner: &mut R,
        distribution_pool_address: &MsgAddrStd,
        management_fee_rate: Grams,
        admin_address: &MsgAddrStd,
        manager_address: &MsgAddrStd,
        expected: &StateInit,
    ) -> Result<MsgAddrStd> {
        let reported = self.get_vault_address(
            runner, distribution_pool_address, management_fee_rate, admin_address, manager_address
        )?;
        check_address(&reported, expected)?;
        Ok(reported)
    }

    pub fn verify_tjt_strategy_address<R: GetMethodRunner + ?Sized>(
        &self,
        runner: &mut R,
        strategy: &TjtStrategyParams,
        expected: &StateInit,
    ) -> Result<MsgAddrStd> {
        let reported = self.get_tjt_strategy_address(runner, strategy)?;
        check_address(&reported, expected)?;
        Ok(reported)
    }

    pub fn verify_jjt_strategy_address<R: GetMethodRunner + ?Sized>(
        &self,
        runner: &mut R,
        strategy: &JjtStrategyParams,
        expected: &StateInit,
    ) -> Result<MsgAddrStd> {
        let reported = self.get_jjt_strategy_address(runner, strategy)?;
        check_address(&reported, expected)?;
        Ok(reported)
    }
}
