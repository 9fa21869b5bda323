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
    messages::OpMessage,
    stack::{StackEntry, StackReader},
    Cell, Grams, MsgAddrStd, StateInit, Result,
};
use std::ops::BitOr;

#[cfg(test)]
#[path = "tests/test_provider.rs"]
pub(crate) mod tests;

/// Flags of the outbound message send action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SendMode(u8);

impl SendMode {
    pub const ORDINARY: SendMode = SendMode(0);
    pub const PAY_GAS_SEPARATELY: SendMode = SendMode(1);
    pub const IGNORE_ERRORS: SendMode = SendMode(2);
    pub const DESTROY_ACCOUNT_IF_ZERO: SendMode = SendMode(32);
    pub const CARRY_ALL_REMAINING_INCOMING_VALUE: SendMode = SendMode(64);
    pub const CARRY_ALL_REMAINING_BALANCE: SendMode = SendMode(128);

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: SendMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SendMode {
    type Output = SendMode;
    fn bitor(self, other: SendMode) -> SendMode {
        SendMode(self.0 | other.0)
    }
}

/// Internal message handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    pub destination: MsgAddrStd,
    pub value: Grams,
    pub mode: SendMode,
    pub state_init: Option<StateInit>,
    pub body: Cell,
}

///
/// Transport that submits messages to the ledger. Implementations only
/// acknowledge submission, they do not wait for the transaction.
///
pub trait MessageSender {
    fn send(&mut self, message: OutboundMessage) -> Result<()>;
}

/// Runs get-methods of deployed contracts.
pub trait GetMethodRunner {
    fn run_get_method(&mut self, address: &MsgAddrStd, method: &str, args: Vec<StackEntry>) -> Result<Vec<StackEntry>>;
}

///
/// Address of a contract plus the StateInit it was (or will be) deployed with.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractHandle {
    pub address: MsgAddrStd,
    pub init: Option<StateInit>,
}

impl ContractHandle {
    pub fn with_address(address: MsgAddrStd) -> Self {
        Self { address, init: None }
    }

    pub fn with_state_init(workchain_id: i8, init: StateInit) -> Result<Self> {
        Ok(Self { address: init.address(workchain_id)?, init: Some(init) })
    }

    /// Deploys the contract with an empty body.
    pub fn send_deploy<S: MessageSender + ?Sized>(&self, sender: &mut S, value: Grams) -> Result<()> {
        sender.send(OutboundMessage {
            destination: self.address,
            value,
            mode: SendMode::PAY_GAS_SEPARATELY,
            state_init: self.init.clone(),
            body: Cell::default(),
        })
    }

    pub fn send<S, M>(&self, sender: &mut S, value: Grams, message: &M) -> Result<()>
    where
        S: MessageSender + ?Sized,
        M: OpMessage,
    {
        sender.send(OutboundMessage {
            destination: self.address,
            value,
            mode: SendMode::PAY_GAS_SEPARATELY,
            state_init: None,
            body: message.body()?,
        })
    }

    pub fn run_get_method<R: GetMethodRunner + ?Sized>(
        &self,
        runner: &mut R,
        method: &'static str,
        args: Vec<StackEntry>,
    ) -> Result<StackReader> {
        log::trace!(target: "vault", "{} {} with {} args", self.address, method, args.len());
        let stack = runner.run_get_method(&self.address, method, args)?;
        Ok(StackReader::new(method, stack))
    }

    /// Cross-checks the address against the StateInit, if one is known.
    pub fn verify_address(&self) -> Result<()> {
        match &self.init {
            Some(init) => check_address(&self.address, init),
            None => Ok(()),
        }
    }
}
