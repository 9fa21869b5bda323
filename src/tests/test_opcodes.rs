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
use std::collections::HashSet;

const ALL_KINDS: [ContractKind; 3] = [
    ContractKind::SharesWallet,
    ContractKind::Strategy,
    ContractKind::VaultFactory,
];

#[test]
fn test_opcode_values() {
    assert_eq!(Operation::Transfer.opcode(), 0x0f8a7ea5);
    assert_eq!(Operation::Burn.opcode(), 0x595f07bc);
    assert_eq!(Operation::WithdrawTon.opcode(), 0x0a38b63c);
    assert_eq!(Operation::Reinvest.opcode(), 0x0812d4e3);
    assert_eq!(Operation::Init.opcode(), 0xc674e474);
    assert_eq!(Operation::FinalizeUpgrades.opcode(), 0x6378509f);
    assert_eq!(Operation::CreateTjtStrategy.opcode(), 0xd2b2749c);
    assert_eq!(Operation::CreateJjtStrategy.opcode(), 0x379b4a7e);
    assert_eq!(Operation::CreateTjtAll.opcode(), 0x55796149);
    assert_eq!(Operation::CreateJjtAll.opcode(), 0x629886da);
    assert_eq!(Operation::SetStrategyCode.opcode(), 0x43157f38);
}

#[test]
fn test_opcodes_unique_per_contract() {
    for kind in ALL_KINDS.iter() {
        let ops = Operation::supported_by(*kind);
        let opcodes: HashSet<u32> = ops.iter().map(|op| op.opcode()).collect();
        assert_eq!(opcodes.len(), ops.len(), "duplicate opcode in {}", kind);
        for op in ops {
            assert_eq!(Operation::from_opcode(*kind, op.opcode()).unwrap(), *op);
        }
    }
}

#[test]
fn test_upgrade_operations_shared() {
    for kind in ALL_KINDS.iter() {
        assert!(Operation::supported_by(*kind).contains(&Operation::InitCodeUpgrade));
    }
    assert!(!Operation::supported_by(ContractKind::SharesWallet).contains(&Operation::FinalizeUpgrades));
    assert!(Operation::supported_by(ContractKind::VaultFactory).contains(&Operation::CancelAdminUpgrade));
    assert!(Operation::supported_by(ContractKind::Strategy).contains(&Operation::CompleteReinvest));
}

#[test]
fn test_unknown_opcode() {
    let err = Operation::from_opcode(ContractKind::VaultFactory, OP_TRANSFER)
        .expect_err("factory does not accept transfers");
    match err.downcast_ref::<VaultError>() {
        Some(VaultError::UnknownOpcode { op, contract }) => {
            assert_eq!(*op, OP_TRANSFER);
            assert_eq!(contract, "vault factory");
        }
        other => panic!("unexpected error {:?}", other),
    }
    Operation::from_opcode(ContractKind::Strategy, 0xffffffff).expect_err("not an opcode");
    Operation::from_opcode(ContractKind::SharesWallet, OP_CREATE_VAULT).expect_err("factory-only opcode");
}

#[test]
fn test_operation_names() {
    assert_eq!(Operation::TransferNotification.to_string(), "transfer_notification");
    assert_eq!(Operation::CancelCodeUpgrade.name(), "cancel_code_upgrade");
    assert_eq!(ContractKind::Strategy.to_string(), "strategy");
}

#[test]
fn test_exit_codes() {
    assert_eq!(describe_exit_code(ContractKind::Strategy, 88), Some("INVALID_DEADLINE"));
    assert_eq!(describe_exit_code(ContractKind::Strategy, 801), Some("WRONG_ADMIN_OP"));
    assert_eq!(describe_exit_code(ContractKind::Strategy, 91), None);
    assert_eq!(describe_exit_code(ContractKind::SharesWallet, 0xffff), Some("wrong_op"));
    assert_eq!(describe_exit_code(ContractKind::SharesWallet, 73), Some("not_owner"));
    assert_eq!(describe_exit_code(ContractKind::SharesWallet, 80), None);
    assert_eq!(describe_exit_code(ContractKind::VaultFactory, 80), None);
    assert_eq!(StrategyExitCode::from_i32(82), Some(StrategyExitCode::InvalidAmount));
    assert_eq!(WalletExitCode::from_i32(333), Some(WalletExitCode::WrongWorkchain));
}
