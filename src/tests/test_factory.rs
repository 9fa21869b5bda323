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
    derive_address,
    error::VaultError,
    provider::tests::{test_address, test_code, RecordingProvider},
    write_read_and_assert, ContractKind, MessageBody, TjtStrategyConfig,
};
use num::BigInt;

fn factory_config() -> VaultFactoryConfig {
    VaultFactoryConfig {
        admin_address: test_address(1),
        manager_address: test_address(2),
        strategy_code: test_code(10),
        vault_code: test_code(11),
        shares_wallet_code: test_code(12),
        temp_upgrade: TempUpgrade::default(),
    }
}

fn tjt_params() -> TjtStrategyParams {
    TjtStrategyParams {
        vault_address: test_address(1),
        jetton_master_address: test_address(2),
        pool_address: test_address(3),
        pool_type: PoolType::Stable,
        admin_address: test_address(4),
        jetton_vault_address: test_address(5),
        native_vault_address: test_address(6),
    }
}

fn jjt_params() -> JjtStrategyParams {
    JjtStrategyParams {
        vault_address: test_address(1),
        jetton_master_address: test_address(2),
        pool_address: test_address(3),
        pool_type: PoolType::Volatile,
        usdt_master_address: test_address(4),
        admin_address: test_address(5),
        usdt_vault_address: test_address(6),
        jetton_vault_address: test_address(7),
        native_vault_address: test_address(8),
        usdt_ton_pool_address: test_address(9),
    }
}

#[test]
fn test_factory_config_layout() {
    let config = write_read_and_assert(factory_config());
    let cell = config.serialize().unwrap();
    assert_eq!(cell.bit_length(), 2 * 267);
    assert_eq!(cell.references_count(), 4);
    assert_eq!(cell.reference(3).unwrap(), TempUpgrade::default().serialize().unwrap());

    let factory = VaultFactory::create_from_config(&config, test_code(1), 0).unwrap();
    factory.verify_address().unwrap();
    let upgraded = VaultFactoryConfig { vault_code: test_code(13), ..config };
    assert_ne!(
        VaultFactory::create_from_config(&upgraded, test_code(1), 0).unwrap().address(),
        factory.address()
    );
}

#[test]
fn test_create_vault_message() {
    let msg = write_read_and_assert(CreateVault {
        query_id: QueryId(1),
        distribution_pool_address: test_address(1),
        management_fee_rate: Grams::from(200u32),
        admin_address: test_address(2),
        manager_address: test_address(3),
    });
    let cell = msg.serialize().unwrap();
    assert_eq!(cell.bit_length(), 96 + 267 + 12 + 267 + 267);
    assert_eq!(cell.references_count(), 0);
}

#[test]
fn test_create_strategy_messages() {
    let tjt = write_read_and_assert(CreateTjtStrategy { query_id: QueryId(1), strategy: tjt_params() });
    let cell = tjt.serialize().unwrap();
    assert_eq!(cell.bit_length(), 96 + 3 * 267 + 1);
    assert_eq!(cell.references_count(), 1);
    let mut tail = SliceData::load_cell(cell.reference(0).unwrap());
    assert_eq!(MsgAddrStd::construct_from(&mut tail).unwrap(), test_address(4));

    let jjt = write_read_and_assert(CreateJjtStrategy { query_id: QueryId(2), strategy: jjt_params() });
    let cell = jjt.serialize().unwrap();
    assert_eq!(cell.bit_length(), 96 + 3 * 267 + 1);
    assert_eq!(cell.references_count(), 2);
    let mut second = SliceData::load_cell(cell.reference(1).unwrap());
    assert_eq!(MsgAddrStd::construct_from(&mut second).unwrap(), test_address(7));
}

#[test]
fn test_create_all_messages() {
    let tjt = write_read_and_assert(CreateTjtAll {
        query_id: QueryId(1),
        distribution_pool_address: test_address(1),
        admin_address: test_address(2),
        manager_address: test_address(3),
        management_fee_rate: 500,
        jetton_master_address: test_address(4),
        jetton_vault_address: test_address(5),
        pool_address: test_address(6),
        pool_type: PoolType::Stable,
        native_vault_address: test_address(7),
        vault_lp_wallet_address: test_address(8),
        strategy_lp_wallet_address: test_address(9),
        strategy_jetton_wallet_address: test_address(10),
        fwd_fee: Grams::from(50_000_000u32),
    });
    let cell = tjt.serialize().unwrap();
    assert_eq!(cell.bit_length(), 96 + 3 * 267 + 16);
    assert_eq!(cell.references_count(), 3);
    assert_eq!(cell.reference(0).unwrap().bit_length(), 3 * 267 + 1);
    assert_eq!(cell.reference(2).unwrap().bit_length(), 267 + 36);

    let jjt = write_read_and_assert(CreateJjtAll {
        query_id: QueryId(2),
        management_fee_rate: 300,
        pool_type: PoolType::Stable,
        fwd_fee: Grams::from(1u32),
        ..CreateJjtAll::default()
    });
    let cell = jjt.serialize().unwrap();
    assert_eq!(cell.references_count(), 4);
    assert_eq!(cell.reference(3).unwrap().bit_length(), 2 * 267 + 12);
    assert_eq!(
        MessageBody::decode(ContractKind::VaultFactory, cell).unwrap(),
        MessageBody::CreateJjtAll(jjt)
    );
}

#[test]
fn test_set_strategy_code() {
    let msg = write_read_and_assert(SetStrategyCode { query_id: QueryId(3), code: test_code(5) });
    let cell = msg.serialize().unwrap();
    assert_eq!(cell.bit_length(), 96);
    assert_eq!(cell.reference(0).unwrap(), test_code(5));
}

#[test]
fn test_get_vault_address() {
    let factory = VaultFactory::create_from_address(test_address(0x77));
    let mut provider = RecordingProvider::default();
    provider.respond(vec![StackEntry::address(&test_address(0x99)).unwrap()]);

    let vault = factory.get_vault_address(
        &mut provider, &test_address(1), Grams::from(200u32), &test_address(2), &test_address(3)
    ).unwrap();
    assert_eq!(vault, test_address(0x99));

    let (address, method, args) = &provider.calls[0];
    assert_eq!(address, &test_address(0x77));
    assert_eq!(method, "get_vault_address");
    assert_eq!(args, &vec![
        StackEntry::Slice(test_address(1).serialize().unwrap()),
        StackEntry::Int(BigInt::from(200)),
        StackEntry::Slice(test_address(2).serialize().unwrap()),
        StackEntry::Slice(test_address(3).serialize().unwrap()),
    ]);
}

#[test]
fn test_get_strategy_addresses() {
    let factory = VaultFactory::create_from_address(test_address(0x77));
    let mut provider = RecordingProvider::default();
    provider.respond(vec![StackEntry::address(&test_address(0xa1)).unwrap()]);
    provider.respond(vec![StackEntry::address(&test_address(0xa2)).unwrap()]);

    assert_eq!(factory.get_tjt_strategy_address(&mut provider, &tjt_params()).unwrap(), test_address(0xa1));
    assert_eq!(factory.get_jjt_strategy_address(&mut provider, &jjt_params()).unwrap(), test_address(0xa2));

    let (_, method, args) = &provider.calls[0];
    assert_eq!(method, "get_tjt_strategy_address");
    assert_eq!(args.len(), 7);
    assert_eq!(args[3], StackEntry::int(1));
    assert_eq!(args[4], StackEntry::address(&test_address(4)).unwrap());

    let (_, method, args) = &provider.calls[1];
    assert_eq!(method, "get_jjt_strategy_address");
    assert_eq!(args.len(), 10);
    assert_eq!(args[3], StackEntry::int(0));
    assert_eq!(args[9], StackEntry::address(&test_address(9)).unwrap());
}

#[test]
fn test_verify_reported_addresses() {
    let factory = VaultFactory::create_from_address(test_address(0x77));
    let mut provider = RecordingProvider::default();

    let config = TjtStrategyConfig {
        vault_address: test_address(1),
        jetton_master_address: test_address(2),
        pool_address: test_address(3),
        pool_type: PoolType::Stable,
        admin_address: test_address(4),
        jetton_vault_address: test_address(5),
        native_vault_address: test_address(6),
        ..TjtStrategyConfig::default()
    };
    let strategy_init = StateInit::with_code_and_data(test_code(10), config.serialize().unwrap());
    let derived = derive_address(0, &strategy_init).unwrap();
    provider.respond(vec![StackEntry::address(&derived).unwrap()]);
    assert_eq!(factory.verify_tjt_strategy_address(&mut provider, &tjt_params(), &strategy_init).unwrap(), derived);

    provider.respond(vec![StackEntry::address(&test_address(0xa1)).unwrap()]);
    let err = factory.verify_tjt_strategy_address(&mut provider, &tjt_params(), &strategy_init)
        .expect_err("factory reports another address");
    assert!(matches!(err.downcast_ref::<VaultError>(), Some(VaultError::AddressMismatch { .. })));

    provider.respond(vec![StackEntry::address(&test_address(0xa2)).unwrap()]);
    factory.verify_jjt_strategy_address(&mut provider, &jjt_params(), &strategy_init)
        .expect_err("jjt code differs");

    let vault_init = StateInit::with_code_and_data(test_code(11), test_code(12));
    let vault = derive_address(0, &vault_init).unwrap();
    provider.respond(vec![StackEntry::address(&vault).unwrap()]);
    assert_eq!(
        factory.verify_vault_address(
            &mut provider, &test_address(1), Grams::from(200u32), &test_address(2), &test_address(3), &vault_init
        ).unwrap(),
        vault
    );
    assert_eq!(provider.calls.len(), 4);
    assert_eq!(provider.calls[3].1, "get_vault_address");
}

#[test]
fn test_factory_sends() {
    let factory = VaultFactory::create_from_address(test_address(0x77));
    let mut provider = RecordingProvider::default();
    let value = Grams::from(1_000_000_000u64);

    factory.send_create_vault(&mut provider, value, &CreateVault::default()).unwrap();
    factory.send_create_tjt_strategy(&mut provider, value, &CreateTjtStrategy::default()).unwrap();
    factory.send_create_jjt_strategy(&mut provider, value, &CreateJjtStrategy::default()).unwrap();
    factory.send_create_tjt_all(&mut provider, value, &CreateTjtAll::default()).unwrap();
    factory.send_create_jjt_all(&mut provider, value, &CreateJjtAll::default()).unwrap();
    factory.send_set_strategy_code(&mut provider, value, &SetStrategyCode::default()).unwrap();
    factory.send_init_code_upgrade(&mut provider, value, &InitCodeUpgrade::default()).unwrap();
    factory.send_init_admin_upgrade(&mut provider, value, &InitAdminUpgrade::default()).unwrap();
    factory.send_finalize_upgrades(&mut provider, value, QueryId(1)).unwrap();
    factory.send_cancel_code_upgrade(&mut provider, value, QueryId(2)).unwrap();
    factory.send_cancel_admin_upgrade(&mut provider, value, QueryId(3)).unwrap();

    assert_eq!(provider.sent.len(), 11);
    for message in &provider.sent {
        let body = MessageBody::decode(ContractKind::VaultFactory, message.body.clone()).unwrap();
        assert_eq!(body.serialize().unwrap(), message.body);
    }
}
