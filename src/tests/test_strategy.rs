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

use super::*;
use crate::{
    error::VaultError,
    provider::tests::{test_address, test_code, RecordingProvider},
    stack::StackEntry,
    write_read_and_assert, MsgAddress, UpgradeState,
};

fn pending_temp_upgrade() -> TempUpgrade {
    TempUpgrade {
        code_ready_at: 1_700_086_400,
        admin_ready_at: 0,
        pending_admin: MsgAddress::AddrNone,
        pending_code: test_code(0x0b0b),
    }
}

fn tjt_config() -> TjtStrategyConfig {
    TjtStrategyConfig {
        vault_address: test_address(1),
        jetton_master_address: test_address(2),
        pool_address: test_address(3),
        pool_type: PoolType::Stable,
        deposit_lp_wallet_address: test_address(4),
        jetton_wallet_address: test_address(5),
        admin_address: test_address(6),
        jetton_vault_address: test_address(7),
        native_vault_address: test_address(8),
        temp_upgrade: pending_temp_upgrade().serialize().unwrap(),
    }
}

fn jjt_config() -> JjtStrategyConfig {
    JjtStrategyConfig {
        vault_address: test_address(1),
        jetton_master_address: test_address(2),
        pool_address: test_address(3),
        pool_type: PoolType::Volatile,
        usdt_master_address: test_address(4),
        deposit_lp_wallet_address: test_address(5),
        admin_address: test_address(6),
        usdt_vault_address: test_address(7),
        jetton_vault_address: test_address(8),
        native_vault_address: test_address(9),
        usdt_wallet_address: test_address(10),
        jetton_wallet_address: test_address(11),
        usdt_ton_pool_address: test_address(12),
        temp_upgrade: TempUpgrade::default().serialize().unwrap(),
    }
}

fn address_entries(bytes: &[u8]) -> Vec<StackEntry> {
    bytes.iter().map(|byte| StackEntry::address(&test_address(*byte)).unwrap()).collect()
}

#[test]
fn test_tjt_config_layout() {
    let config = write_read_and_assert(tjt_config());
    let cell = config.serialize().unwrap();
    assert_eq!(cell.bit_length(), 3 * 267 + 1);
    assert_eq!(cell.references_count(), 3);
    assert_eq!(cell.reference(0).unwrap().bit_length(), 3 * 267);
    assert_eq!(cell.reference(1).unwrap().bit_length(), 2 * 267);
    assert_eq!(config.temp_upgrade().unwrap(), pending_temp_upgrade());
}

#[test]
fn test_jjt_config_layout() {
    let config = write_read_and_assert(jjt_config());
    let cell = config.serialize().unwrap();
    assert_eq!(cell.bit_length(), 3 * 267 + 1);
    assert_eq!(cell.references_count(), 4);
    for index in 0..3 {
        assert_eq!(cell.reference(index).unwrap().bit_length(), 3 * 267);
    }
    let mut vaults = SliceData::load_cell(cell.reference(1).unwrap());
    assert_eq!(MsgAddrStd::construct_from(&mut vaults).unwrap(), test_address(7));
    assert_eq!(config.temp_upgrade().unwrap(), TempUpgrade::default());
}

#[test]
fn test_create_from_config() {
    let strategy = TjtStrategy::create_from_config(&tjt_config(), test_code(1), 0).unwrap();
    strategy.verify_address().unwrap();
    let other = JjtStrategy::create_from_config(&jjt_config(), test_code(1), 0).unwrap();
    assert_ne!(strategy.address(), other.address());
    assert_eq!(
        strategy.address(),
        &StateInit::with_code_and_data(test_code(1), tjt_config().serialize().unwrap()).address(0).unwrap()
    );
}

#[test]
fn test_get_tjt_strategy_data() {
    let strategy = TjtStrategy::create_from_address(test_address(0x55));
    let mut provider = RecordingProvider::default();
    let mut stack = address_entries(&[1, 2, 3]);
    stack.push(StackEntry::int(1));
    stack.extend(address_entries(&[4, 5, 6, 7, 8]));
    stack.push(StackEntry::Cell(pending_temp_upgrade().serialize().unwrap()));
    provider.respond(stack.clone());

    let data = strategy.get_strategy_data(&mut provider).unwrap();
    assert_eq!(data, tjt_config());
    assert_eq!(data.admin_address(), &test_address(6));
    assert_eq!(provider.calls[0].1, "get_strategy_data");

    provider.respond(stack.clone());
    assert_eq!(strategy.get_strategy_pool_address(&mut provider).unwrap(), test_address(3));

    provider.respond(stack);
    let temp = strategy.get_temp_upgrade(&mut provider).unwrap();
    let upgrades = UpgradeState::with_temp_upgrade(test_code(1), test_address(6), &temp, 86400);
    assert_eq!(upgrades.pending_code().ready_at(), Some(1_700_086_400));
    assert!(!upgrades.pending_admin().is_pending());
}

#[test]
fn test_get_jjt_strategy_data() {
    let strategy = JjtStrategy::create_from_address(test_address(0x55));
    let mut provider = RecordingProvider::default();
    let mut stack = address_entries(&[1, 2, 3]);
    stack.push(StackEntry::int(0));
    stack.extend(address_entries(&[4, 5, 6, 7, 8, 9, 10, 11, 12]));
    stack.push(StackEntry::Cell(TempUpgrade::default().serialize().unwrap()));
    provider.respond(stack);

    let data = strategy.get_strategy_data(&mut provider).unwrap();
    assert_eq!(data, jjt_config());
    assert_eq!(data.pool_address(), &test_address(3));
}

#[test]
fn test_pool_type_out_of_range() {
    let strategy = TjtStrategy::create_from_address(test_address(0x55));
    let mut provider = RecordingProvider::default();
    let mut stack = address_entries(&[1, 2, 3]);
    stack.push(StackEntry::int(2));
    provider.respond(stack);
    let err = strategy.get_strategy_data(&mut provider).expect_err("pool type is one bit");
    assert!(matches!(err.downcast_ref::<VaultError>(), Some(VaultError::FieldOverflow { bits: 1, .. })));
}

#[test]
fn test_strategy_messages() {
    let reinvest = write_read_and_assert(Reinvest {
        query_id: QueryId(1),
        total_reward: Grams::from(1_000u32),
        amount_to_swap: Grams::from(400u32),
        limit: Grams::from(390u32),
        deadline: 1_700_000_000,
        ton_target_balance: Grams::from(10u32),
        jetton_target_balance: Grams::from(20u32),
    });
    assert_eq!(reinvest.serialize().unwrap().bit_length(), 96 + 20 + 20 + 20 + 32 + 12 + 12);

    let deposit = write_read_and_assert(DepositLiquidity { query_id: QueryId(2), payload: None });
    assert_eq!(deposit.serialize().unwrap().bit_length(), 97);
    write_read_and_assert(DepositLiquidity { query_id: QueryId(2), payload: Some(test_code(3)) });

    let init = write_read_and_assert(StrategyInit {
        query_id: QueryId(3),
        deposit_lp_wallet_address: test_address(1),
        jetton_wallet_address: test_address(2),
    });
    assert_eq!(init.serialize().unwrap().bit_length(), 96 + 2 * 267);

    write_read_and_assert(StrategyWithdrawJettons {
        query_id: QueryId(4),
        wallet_address: test_address(1),
        receiver_address: test_address(2),
        amount: Grams::from(5u32),
    });
}

#[test]
fn test_strategy_sends() {
    let strategy = JjtStrategy::create_from_address(test_address(0x55));
    let mut provider = RecordingProvider::default();
    let value = Grams::from(100_000_000u32);

    strategy.send_init(&mut provider, value, &StrategyInit::default()).unwrap();
    strategy.send_reinvest(&mut provider, value, &Reinvest::default()).unwrap();
    strategy.send_deposit_liquidity(&mut provider, value, &DepositLiquidity::default()).unwrap();
    strategy.send_withdraw_jettons(&mut provider, value, &StrategyWithdrawJettons::default()).unwrap();
    strategy.send_init_code_upgrade(&mut provider, value, &InitCodeUpgrade::default()).unwrap();
    strategy.send_init_admin_upgrade(&mut provider, value, &InitAdminUpgrade::default()).unwrap();
    strategy.send_finalize_upgrades(&mut provider, value, QueryId(7)).unwrap();
    strategy.send_cancel_code_upgrade(&mut provider, value, QueryId(8)).unwrap();
    strategy.send_cancel_admin_upgrade(&mut provider, value, QueryId(9)).unwrap();

    let ops: Vec<u32> = provider.sent.iter()
        .map(|message| SliceData::load_cell(message.body.clone()).get_next_u32().unwrap())
        .collect();
    assert_eq!(ops, vec![
        Operation::Init.opcode(),
        Operation::Reinvest.opcode(),
        Operation::DepositLiquidity.opcode(),
        Operation::WithdrawJettons.opcode(),
        Operation::InitCodeUpgrade.opcode(),
        Operation::InitAdminUpgrade.opcode(),
        Operation::FinalizeUpgrades.opcode(),
        Operation::CancelCodeUpgrade.opcode(),
        Operation::CancelAdminUpgrade.opcode(),
    ]);
    assert!(provider.sent.iter().all(|message| message.destination == test_address(0x55)));
    assert_eq!(
        CancelAdminUpgrade::construct_from_cell(provider.last_sent().body.clone()).unwrap(),
        CancelAdminUpgrade::with_query_id(9)
    );
}
