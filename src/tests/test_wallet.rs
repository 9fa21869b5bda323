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
    provider::{tests::{test_address, test_code, RecordingProvider}, SendMode},
    stack::StackEntry,
    write_read_and_assert,
};

fn test_config() -> SharesWalletConfig {
    SharesWalletConfig {
        balance: Grams::from(1_000u32),
        owner_address: test_address(1),
        jetton_master_address: test_address(2),
        jetton_wallet_code: test_code(0xc0de),
    }
}

#[test]
fn test_wallet_config_layout() {
    let config = write_read_and_assert(test_config());
    let cell = config.serialize().unwrap();
    assert_eq!(cell.bit_length(), 4 + 16 + 267 + 267);
    assert_eq!(cell.references_count(), 1);
    assert_eq!(cell.reference(0).unwrap(), test_code(0xc0de));
}

#[test]
fn test_create_from_config() {
    let config = test_config();
    let wallet = SharesWallet::create_from_config(&config, test_code(7), 0).unwrap();
    let init = StateInit::with_code_and_data(test_code(7), config.serialize().unwrap());
    assert_eq!(wallet.address(), &derive_address(0, &init).unwrap());
    assert_eq!(wallet.handle().init, Some(init));
    wallet.handle().verify_address().unwrap();

    let other = SharesWallet::create_from_config(
        &SharesWalletConfig { balance: Grams::zero(), ..config }, test_code(7), 0
    ).unwrap();
    assert_ne!(wallet.address(), other.address());

    let known = SharesWallet::create_from_address(test_address(3));
    assert_eq!(known.address(), &test_address(3));
    assert_eq!(known.handle().init, None);
}

#[test]
fn test_wallet_sends() {
    let wallet = SharesWallet::create_from_address(test_address(3));
    let mut provider = RecordingProvider::default();

    let transfer = Transfer {
        query_id: QueryId(1),
        amount: Grams::from(500u32),
        destination: test_address(4),
        response_address: test_address(5).into(),
        ..Transfer::default()
    };
    wallet.send_transfer(&mut provider, Grams::from(50_000_000u32), &transfer).unwrap();
    let sent = provider.last_sent();
    assert_eq!(sent.destination, test_address(3));
    assert_eq!(sent.value, Grams::from(50_000_000u32));
    assert_eq!(sent.mode, SendMode::PAY_GAS_SEPARATELY);
    assert_eq!(sent.state_init, None);
    assert_eq!(Transfer::construct_from_cell(sent.body.clone()).unwrap(), transfer);

    let burn = Burn { query_id: QueryId(2), amount: Grams::from(7u32), ..Burn::default() };
    wallet.send_burn(&mut provider, Grams::from(1u32), &burn).unwrap();
    assert_eq!(Burn::construct_from_cell(provider.last_sent().body.clone()).unwrap(), burn);

    wallet.send_withdraw_ton(&mut provider, Grams::from(1u32), QueryId(3)).unwrap();
    assert_eq!(
        WithdrawTon::construct_from_cell(provider.last_sent().body.clone()).unwrap(),
        WithdrawTon::with_query_id(3)
    );

    let withdraw = WalletWithdrawJettons {
        query_id: QueryId(4),
        wallet_address: test_address(6),
        amount: Grams::from(9u32),
        custom_payload: Some(test_code(1)),
    };
    wallet.send_withdraw_jettons(&mut provider, Grams::from(1u32), &withdraw).unwrap();
    assert_eq!(provider.last_sent().body.references_count(), 1);

    let upgrade = InitCodeUpgrade { query_id: QueryId(5), code: test_code(2) };
    wallet.send_init_code_upgrade(&mut provider, Grams::from(1u32), &upgrade).unwrap();
    assert_eq!(provider.sent.len(), 5);
}

#[test]
fn test_wallet_deploy() {
    let wallet = SharesWallet::create_from_config(&test_config(), test_code(7), 0).unwrap();
    let mut provider = RecordingProvider::default();
    wallet.send_deploy(&mut provider, Grams::from(100u32)).unwrap();
    let sent = provider.last_sent();
    assert_eq!(sent.destination, *wallet.address());
    assert_eq!(sent.state_init.as_ref(), wallet.handle().init.as_ref());
    assert!(sent.body.is_empty());
}

#[test]
fn test_get_wallet_data() {
    let wallet = SharesWallet::create_from_address(test_address(3));
    let mut provider = RecordingProvider::default();
    provider.respond(vec![
        StackEntry::int(1_000u32),
        StackEntry::address(&test_address(1)).unwrap(),
        StackEntry::address(&test_address(2)).unwrap(),
        StackEntry::Cell(test_code(0xc0de)),
    ]);
    let data = wallet.get_wallet_data(&mut provider).unwrap();
    assert_eq!(data, test_config());
    assert_eq!(provider.calls.len(), 1);
    let (address, method, args) = &provider.calls[0];
    assert_eq!(address, &test_address(3));
    assert_eq!(method, "get_wallet_data");
    assert!(args.is_empty());

    provider.respond(vec![StackEntry::int(1u32)]);
    wallet.get_wallet_data(&mut provider).expect_err("short stack");
    wallet.get_wallet_data(&mut provider).expect_err("no response");
}
