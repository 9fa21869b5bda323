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

use crate::{error::VaultError, Result};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;

#[cfg(test)]
#[path = "tests/test_opcodes.rs"]
mod tests;

// Opcodes are fixed by the deployed contract bytecode.

pub const OP_TRANSFER:                u32 = 0x0f8a7ea5;
pub const OP_TRANSFER_NOTIFICATION:   u32 = 0x7362d09c;
pub const OP_INTERNAL_TRANSFER:       u32 = 0x178d4519;
pub const OP_BURN:                    u32 = 0x595f07bc;
pub const OP_BURN_NOTIFICATION:       u32 = 0x7bdd97de;
pub const OP_WITHDRAW_TON:            u32 = 0x0a38b63c;
pub const OP_WITHDRAW_JETTONS:        u32 = 0x18a9ed91;

pub const OP_REINVEST:                u32 = 0x0812d4e3;
pub const OP_DEPOSIT_LIQUIDITY:       u32 = 0xd55e4686;
pub const OP_INIT:                    u32 = 0xc674e474;
pub const OP_CB_FAIL_SWAP_OR_INVEST:  u32 = 0x474f86cf;
pub const OP_STOP_DEPOSIT_TO_POOL:    u32 = 0x53cd6d4b;
pub const OP_CB_SUCCESS_SWAP:         u32 = 0x32d0ad4a;
pub const OP_COMPLETE_REINVEST:       u32 = 0x973280f5;
pub const OP_CONTINUE_DEPOSIT_TO_POOL: u32 = 0xbbe82bd8;

pub const OP_INIT_CODE_UPGRADE:       u32 = 0xdf1e233d;
pub const OP_INIT_ADMIN_UPGRADE:      u32 = 0x2fb94384;
pub const OP_FINALIZE_UPGRADES:       u32 = 0x6378509f;
pub const OP_CANCEL_ADMIN_UPGRADE:    u32 = 0xa4ed9981;
pub const OP_CANCEL_CODE_UPGRADE:     u32 = 0x357ccc67;

pub const OP_CREATE_VAULT:            u32 = 0xcbdf3140;
pub const OP_CREATE_TJT_STRATEGY:     u32 = 0xd2b2749c;
pub const OP_CREATE_TJT_ALL:          u32 = 0x55796149;
pub const OP_CREATE_JJT_STRATEGY:     u32 = 0x379b4a7e;
pub const OP_CREATE_JJT_ALL:          u32 = 0x629886da;
pub const OP_SET_STRATEGY_CODE:       u32 = 0x43157f38;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractKind {
    SharesWallet,
    Strategy,
    VaultFactory,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContractKind::SharesWallet => write!(f, "shares wallet"),
            ContractKind::Strategy => write!(f, "strategy"),
            ContractKind::VaultFactory => write!(f, "vault factory"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Transfer,
    TransferNotification,
    InternalTransfer,
    Burn,
    BurnNotification,
    WithdrawTon,
    WithdrawJettons,
    Reinvest,
    DepositLiquidity,
    Init,
    CbFailSwapOrInvest,
    StopDepositToPool,
    CbSuccessSwap,
    CompleteReinvest,
    ContinueDepositToPool,
    InitCodeUpgrade,
    InitAdminUpgrade,
    FinalizeUpgrades,
    CancelAdminUpgrade,
    CancelCodeUpgrade,
    CreateVault,
    CreateTjtStrategy,
    CreateTjtAll,
    CreateJjtStrategy,
    CreateJjtAll,
    SetStrategyCode,
}

const WALLET_OPERATIONS: &[Operation] = &[
    Operation::Transfer,
    Operation::InternalTransfer,
    Operation::Burn,
    Operation::BurnNotification,
    Operation::TransferNotification,
    Operation::WithdrawJettons,
    Operation::WithdrawTon,
    Operation::InitCodeUpgrade,
];

const STRATEGY_OPERATIONS: &[Operation] = &[
    Operation::TransferNotification,
    Operation::InternalTransfer,
    Operation::Reinvest,
    Operation::DepositLiquidity,
    Operation::CbFailSwapOrInvest,
    Operation::StopDepositToPool,
    Operation::CbSuccessSwap,
    Operation::CompleteReinvest,
    Operation::ContinueDepositToPool,
    Operation::InitCodeUpgrade,
    Operation::InitAdminUpgrade,
    Operation::FinalizeUpgrades,
    Operation::Init,
    Operation::WithdrawJettons,
    Operation::CancelAdminUpgrade,
    Operation::CancelCodeUpgrade,
];

const FACTORY_OPERATIONS: &[Operation] = &[
    Operation::CreateVault,
    Operation::CreateTjtStrategy,
    Operation::CreateTjtAll,
    Operation::CreateJjtStrategy,
    Operation::CreateJjtAll,
    Operation::SetStrategyCode,
    Operation::CancelAdminUpgrade,
    Operation::CancelCodeUpgrade,
    Operation::InitCodeUpgrade,
    Operation::InitAdminUpgrade,
    Operation::FinalizeUpgrades,
];

impl Operation {
    pub fn opcode(&self) -> u32 {
        match self {
            Operation::Transfer              => OP_TRANSFER,
            Operation::TransferNotification  => OP_TRANSFER_NOTIFICATION,
            Operation::InternalTransfer      => OP_INTERNAL_TRANSFER,
            Operation::Burn                  => OP_BURN,
            Operation::BurnNotification      => OP_BURN_NOTIFICATION,
            Operation::WithdrawTon           => OP_WITHDRAW_TON,
            Operation::WithdrawJettons       => OP_WITHDRAW_JETTONS,
            Operation::Reinvest              => OP_REINVEST,
            Operation::DepositLiquidity      => OP_DEPOSIT_LIQUIDITY,
            Operation::Init                  => OP_INIT,
            Operation::CbFailSwapOrInvest    => OP_CB_FAIL_SWAP_OR_INVEST,
            Operation::StopDepositToPool     => OP_STOP_DEPOSIT_TO_POOL,
            Operation::CbSuccessSwap         => OP_CB_SUCCESS_SWAP,
            Operation::CompleteReinvest      => OP_COMPLETE_REINVEST,
            Operation::ContinueDepositToPool => OP_CONTINUE_DEPOSIT_TO_POOL,
            Operation::InitCodeUpgrade       => OP_INIT_CODE_UPGRADE,
            Operation::InitAdminUpgrade      => OP_INIT_ADMIN_UPGRADE,
            Operation::FinalizeUpgrades      => OP_FINALIZE_UPGRADES,
            Operation::CancelAdminUpgrade    => OP_CANCEL_ADMIN_UPGRADE,
            Operation::CancelCodeUpgrade     => OP_CANCEL_CODE_UPGRADE,
            Operation::CreateVault           => OP_CREATE_VAULT,
            Operation::CreateTjtStrategy     => OP_CREATE_TJT_STRATEGY,
            Operation::CreateTjtAll          => OP_CREATE_TJT_ALL,
            Operation::CreateJjtStrategy     => OP_CREATE_JJT_STRATEGY,
            Operation::CreateJjtAll          => OP_CREATE_JJT_ALL,
            Operation::SetStrategyCode       => OP_SET_STRATEGY_CODE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Transfer              => "transfer",
            Operation::TransferNotification  => "transfer_notification",
            Operation::InternalTransfer      => "internal_transfer",
            Operation::Burn                  => "burn",
            Operation::BurnNotification      => "burn_notification",
            Operation::WithdrawTon           => "withdraw_ton",
            Operation::WithdrawJettons       => "withdraw_jettons",
            Operation::Reinvest              => "reinvest",
            Operation::DepositLiquidity      => "deposit_liquidity",
            Operation::Init                  => "init",
            Operation::CbFailSwapOrInvest    => "cb_fail_swap_or_invest",
            Operation::StopDepositToPool     => "stop_deposit_to_pool",
            Operation::CbSuccessSwap         => "cb_success_swap",
            Operation::CompleteReinvest      => "complete_reinvest",
            Operation::ContinueDepositToPool => "continue_deposit_to_pool",
            Operation::InitCodeUpgrade       => "init_code_upgrade",
            Operation::InitAdminUpgrade      => "init_admin_upgrade",
            Operation::FinalizeUpgrades      => "finalize_upgrades",
            Operation::CancelAdminUpgrade    => "cancel_admin_upgrade",
            Operation::CancelCodeUpgrade     => "cancel_code_upgrade",
            Operation::CreateVault           => "create_vault",
            Operation::CreateTjtStrategy     => "create_tjt_strategy",
            Operation::CreateTjtAll          => "create_tjt_all",
            Operation::CreateJjtStrategy     => "create_jjt_strategy",
            Operation::CreateJjtAll          => "create_jjt_all",
            Operation::SetStrategyCode       => "set_strategy_code",
        }
    }

    pub fn supported_by(kind: ContractKind) -> &'static [Operation] {
        match kind {
            ContractKind::SharesWallet => WALLET_OPERATIONS,
            ContractKind::Strategy => STRATEGY_OPERATIONS,
            ContractKind::VaultFactory => FACTORY_OPERATIONS,
        }
    }

    /// Resolves an opcode in the operation set of `kind`.
    pub fn from_opcode(kind: ContractKind, opcode: u32) -> Result<Operation> {
        match Self::supported_by(kind).iter().find(|op| op.opcode() == opcode) {
            Some(op) => Ok(*op),
            None => {
                log::debug!(target: "vault", "unknown opcode {:08x} for {}", opcode, kind);
                fail!(VaultError::UnknownOpcode { op: opcode, contract: kind.to_string() })
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Exit codes *****************************************************************

#[derive(Clone, Copy, Debug, FromPrimitive, PartialEq, Eq)]
pub enum StrategyExitCode {
    WrongOp = 80,
    WrongWorkchain = 81,
    InvalidAmount = 82,
    InsufficientRewardsBalance = 83,
    InvalidJettonToken = 84,
    WrongVaultOp = 85,
    UnknownTransferNotification = 86,
    WrongInitOp = 87,
    InvalidDeadline = 88,
    CantWithdrawLp = 89,
    CantWithdrawJetton = 90,
    WrongAdminOp = 801,
}

impl StrategyExitCode {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyExitCode::WrongOp                     => "WRONG_OP",
            StrategyExitCode::WrongWorkchain              => "WRONG_WORKCHAIN",
            StrategyExitCode::InvalidAmount               => "INVALID_AMOUNT",
            StrategyExitCode::InsufficientRewardsBalance  => "INSUFFICIENT_REWARDS_BALANCE",
            StrategyExitCode::InvalidJettonToken          => "INVALID_JETTON_TOKEN",
            StrategyExitCode::WrongVaultOp                => "WRONG_VAULT_OP",
            StrategyExitCode::UnknownTransferNotification => "UNKNOWN_TRANSFER_NOTIFICATION",
            StrategyExitCode::WrongInitOp                 => "WRONG_INIT_OP",
            StrategyExitCode::InvalidDeadline             => "INVALID_DEADLINE",
            StrategyExitCode::CantWithdrawLp              => "CANT_WITHDRAW_LP",
            StrategyExitCode::CantWithdrawJetton          => "CANT_WITHDRAW_JETTON",
            StrategyExitCode::WrongAdminOp                => "WRONG_ADMIN_OP",
        }
    }
}

#[derive(Clone, Copy, Debug, FromPrimitive, PartialEq, Eq)]
pub enum WalletExitCode {
    WrongOp = 0xffff,
    NotOwner = 73,
    NotValidWallet = 74,
    WrongWorkchain = 333,
    BalanceError = 47,
    NotEnoughGas = 48,
    InvalidMessage = 49,
}

impl WalletExitCode {
    pub fn name(&self) -> &'static str {
        match self {
            WalletExitCode::WrongOp        => "wrong_op",
            WalletExitCode::NotOwner       => "not_owner",
            WalletExitCode::NotValidWallet => "not_valid_wallet",
            WalletExitCode::WrongWorkchain => "wrong_workchain",
            WalletExitCode::BalanceError   => "balance_error",
            WalletExitCode::NotEnoughGas   => "not_enough_gas",
            WalletExitCode::InvalidMessage => "invalid_message",
        }
    }
}

/// Diagnostic name of a contract exit code. The code itself is opaque and is
/// reported to callers unchanged.
pub fn describe_exit_code(kind: ContractKind, code: i32) -> Option<&'static str> {
    match kind {
        ContractKind::SharesWallet => WalletExitCode::from_i32(code).map(|c| c.name()),
        ContractKind::Strategy => StrategyExitCode::from_i32(code).map(|c| c.name()),
        ContractKind::VaultFactory => None,
    }
}
