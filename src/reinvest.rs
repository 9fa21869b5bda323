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
    BuilderData, Cell, SliceData, Grams,
    Deserializable, MaybeSerialize, Serializable, Result,
};

#[cfg(test)]
#[path = "tests/test_reinvest.rs"]
mod tests;

/*
jjt_swap0$_ amount:Coins limit:Coins deadline:uint32 = JjtSwap0;
jjt_swap1$_ amount:Coins limit:Coins deadline:uint32 fwd_fee:Coins = JjtSwap1;
deposit_targets$_ usdt_target:Coins jetton_target:Coins deposit_fee:Coins
    deposit_fwd_fee:Coins transfer_fee:Coins deposit_limit:Coins = DepositTargets;

jjt_reinvest$_ swap0:(Maybe ^JjtSwap0) swap1:(Maybe ^JjtSwap1)
    targets:^DepositTargets = JjtReinvestData;
*/

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapLeg {
    pub amount: Grams,
    pub limit: Grams,
}

impl SwapLeg {
    pub fn new(amount: Grams, limit: Grams) -> Self {
        Self { amount, limit }
    }
}

///
/// Which swap legs of a jetton-jetton strategy reinvest are active.
/// Each leg is gated on its own, both share the deadline.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapPlan {
    NoSwap,
    OneLeg {
        first: SwapLeg,
        deadline: u32,
    },
    SecondLeg {
        second: SwapLeg,
        deadline: u32,
        forward_fee: Grams,
    },
    TwoLegs {
        first: SwapLeg,
        second: SwapLeg,
        deadline: u32,
        forward_fee: Grams,
    },
}

impl Default for SwapPlan {
    fn default() -> Self {
        SwapPlan::NoSwap
    }
}

impl SwapPlan {
    ///
    /// Picks the plan from loosely supplied options. Zero amounts, deadlines
    /// and fees count as absent. A missing limit defaults to zero.
    ///
    pub fn from_options(
        amount0: Option<Grams>,
        limit0: Option<Grams>,
        amount1: Option<Grams>,
        limit1: Option<Grams>,
        deadline: Option<u32>,
        forward_fee: Option<Grams>,
    ) -> Self {
        let amount0 = amount0.filter(|amount| !amount.is_zero());
        let amount1 = amount1.filter(|amount| !amount.is_zero());
        let forward_fee = forward_fee.filter(|fee| !fee.is_zero());
        let deadline = match deadline.filter(|deadline| *deadline != 0) {
            Some(deadline) => deadline,
            None => return SwapPlan::NoSwap,
        };
        let first = amount0.map(|amount| SwapLeg::new(amount, limit0.unwrap_or_default()));
        let second = match (amount1, forward_fee) {
            (Some(amount), Some(forward_fee)) => Some((SwapLeg::new(amount, limit1.unwrap_or_default()), forward_fee)),
            _ => None,
        };
        SwapPlan::from_legs(first, second, deadline)
    }

    fn from_legs(first: Option<SwapLeg>, second: Option<(SwapLeg, Grams)>, deadline: u32) -> Self {
        match (first, second) {
            (None, None) => SwapPlan::NoSwap,
            (Some(first), None) => SwapPlan::OneLeg { first, deadline },
            (None, Some((second, forward_fee))) => SwapPlan::SecondLeg { second, deadline, forward_fee },
            (Some(first), Some((second, forward_fee))) =>
                SwapPlan::TwoLegs { first, second, deadline, forward_fee },
        }
    }

    pub fn first(&self) -> Option<&SwapLeg> {
        match self {
            SwapPlan::OneLeg { first, .. } | SwapPlan::TwoLegs { first, .. } => Some(first),
            _ => None,
        }
    }

    pub fn second(&self) -> Option<&SwapLeg> {
        match self {
            SwapPlan::SecondLeg { second, .. } | SwapPlan::TwoLegs { second, .. } => Some(second),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<u32> {
        match self {
            SwapPlan::NoSwap => None,
            SwapPlan::OneLeg { deadline, .. }
            | SwapPlan::SecondLeg { deadline, .. }
            | SwapPlan::TwoLegs { deadline, .. } => Some(*deadline),
        }
    }

    pub fn forward_fee(&self) -> Option<Grams> {
        match self {
            SwapPlan::SecondLeg { forward_fee, .. } | SwapPlan::TwoLegs { forward_fee, .. } => Some(*forward_fee),
            _ => None,
        }
    }

    fn first_leg_cell(&self) -> Result<Option<Cell>> {
        match (self.first(), self.deadline()) {
            (Some(leg), Some(deadline)) => {
                let mut cell = BuilderData::new();
                leg.amount.write_to(&mut cell)?;
                leg.limit.write_to(&mut cell)?;
                deadline.write_to(&mut cell)?;
                Ok(Some(cell.into_cell()?))
            }
            _ => Ok(None),
        }
    }

    fn second_leg_cell(&self) -> Result<Option<Cell>> {
        match (self.second(), self.deadline(), self.forward_fee()) {
            (Some(leg), Some(deadline), Some(forward_fee)) => {
                let mut cell = BuilderData::new();
                leg.amount.write_to(&mut cell)?;
                leg.limit.write_to(&mut cell)?;
                deadline.write_to(&mut cell)?;
                forward_fee.write_to(&mut cell)?;
                Ok(Some(cell.into_cell()?))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositTargets {
    pub first_target_balance: Grams,
    pub second_target_balance: Grams,
    pub deposit_fee: Grams,
    pub deposit_fwd_fee: Grams,
    pub transfer_fee: Grams,
    pub deposit_limit: Grams,
}

impl Serializable for DepositTargets {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        self.first_target_balance.write_to(cell)?;
        self.second_target_balance.write_to(cell)?;
        self.deposit_fee.write_to(cell)?;
        self.deposit_fwd_fee.write_to(cell)?;
        self.transfer_fee.write_to(cell)?;
        self.deposit_limit.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for DepositTargets {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        Ok(Self {
            first_target_balance: Grams::construct_from(slice)?,
            second_target_balance: Grams::construct_from(slice)?,
            deposit_fee: Grams::construct_from(slice)?,
            deposit_fwd_fee: Grams::construct_from(slice)?,
            transfer_fee: Grams::construct_from(slice)?,
            deposit_limit: Grams::construct_from(slice)?,
        })
    }
}

/// Reinvest parameters of a jetton-jetton strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JjtReinvestData {
    pub swap: SwapPlan,
    pub targets: DepositTargets,
}

impl Serializable for JjtReinvestData {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        self.swap.first_leg_cell()?.write_maybe_to(cell)?;
        self.swap.second_leg_cell()?.write_maybe_to(cell)?;
        self.targets.serialize()?.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for JjtReinvestData {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let first = match slice.get_next_bit()? {
            true => {
                let mut leg = SliceData::load_cell(slice.checked_drain_reference()?);
                let first = SwapLeg::new(Grams::construct_from(&mut leg)?, Grams::construct_from(&mut leg)?);
                Some((first, u32::construct_from(&mut leg)?))
            }
            false => None,
        };
        let second = match slice.get_next_bit()? {
            true => {
                let mut leg = SliceData::load_cell(slice.checked_drain_reference()?);
                let second = SwapLeg::new(Grams::construct_from(&mut leg)?, Grams::construct_from(&mut leg)?);
                let deadline = u32::construct_from(&mut leg)?;
                Some((second, deadline, Grams::construct_from(&mut leg)?))
            }
            false => None,
        };
        let targets = DepositTargets::construct_from_reference(slice)?;
        let swap = match (first, second) {
            (None, None) => SwapPlan::NoSwap,
            (Some((first, deadline)), None) => SwapPlan::from_legs(Some(first), None, deadline),
            (None, Some((second, deadline, forward_fee))) =>
                SwapPlan::from_legs(None, Some((second, forward_fee)), deadline),
            (Some((first, deadline)), Some((second, second_deadline, forward_fee))) => {
                if deadline != second_deadline {
                    fail!(VaultError::InvalidData(
                        format!("swap legs disagree on deadline: {} and {}", deadline, second_deadline)
                    ))
                }
                SwapPlan::from_legs(Some(first), Some((second, forward_fee)), deadline)
            }
        };
        Ok(Self { swap, targets })
    }
}

///
/// Caller-side options of a jetton-jetton reinvest, as operators supply them.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JjtReinvestParams {
    pub amount_to_swap0: Option<Grams>,
    pub amount_to_swap1: Option<Grams>,
    pub swap0_limit: Option<Grams>,
    pub swap1_limit: Option<Grams>,
    pub swap_fwd_fee: Option<Grams>,
    pub deadline: Option<u32>,
    pub usdt_target_balance: Grams,
    pub jetton_target_balance: Grams,
    pub deposit_fee: Grams,
    pub deposit_fwd_fee: Grams,
    pub transfer_fee: Grams,
    pub deposit_limit: Grams,
}

impl JjtReinvestParams {
    pub fn to_data(&self) -> JjtReinvestData {
        let swap = SwapPlan::from_options(
            self.amount_to_swap0,
            self.swap0_limit,
            self.amount_to_swap1,
            self.swap1_limit,
            self.deadline,
            self.swap_fwd_fee,
        );
        JjtReinvestData {
            swap,
            targets: DepositTargets {
                first_target_balance: self.usdt_target_balance,
                second_target_balance: self.jetton_target_balance,
                deposit_fee: self.deposit_fee,
                deposit_fwd_fee: self.deposit_fwd_fee,
                transfer_fee: self.transfer_fee,
                deposit_limit: self.deposit_limit,
            },
        }
    }
}

pub fn pack_jjt_reinvest(params: &JjtReinvestParams) -> Result<Cell> {
    let data = params.to_data();
    log::debug!(target: "vault", "packing jjt reinvest: {:?}", data.swap);
    data.serialize()
}

/*
tjt_reinvest$_ amount:Coins {amount > 0} limit:Coins deadline:uint32
    ton_target:Coins jetton_target:Coins deposit_fee:Coins deposit_fwd_fee:Coins
    transfer_fee:Coins ^[deposit_limit:Coins] = TjtReinvestData;
tjt_reinvest$_ amount:Coins {amount = 0}
    ton_target:Coins jetton_target:Coins deposit_fee:Coins deposit_fwd_fee:Coins
    transfer_fee:Coins ^[deposit_limit:Coins] = TjtReinvestData;
*/

///
/// Reinvest parameters of a ton-jetton strategy. The swap limit and deadline
/// are only stored when `amount_to_swap` is positive, otherwise they read
/// back as zero.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TjtReinvestParams {
    pub amount_to_swap: Grams,
    pub swap_limit: Grams,
    pub deadline: u32,
    pub ton_target_balance: Grams,
    pub jetton_target_balance: Grams,
    pub deposit_fee: Grams,
    pub deposit_fwd_fee: Grams,
    pub transfer_fee: Grams,
    pub deposit_limit: Grams,
}

impl TjtReinvestParams {
    pub fn has_swap(&self) -> bool {
        !self.amount_to_swap.is_zero()
    }
}

impl Serializable for TjtReinvestParams {
    fn write_to(&self, cell: &mut BuilderData) -> Result<()> {
        self.amount_to_swap.write_to(cell)?;
        if self.has_swap() {
            self.swap_limit.write_to(cell)?;
            self.deadline.write_to(cell)?;
        }
        self.ton_target_balance.write_to(cell)?;
        self.jetton_target_balance.write_to(cell)?;
        self.deposit_fee.write_to(cell)?;
        self.deposit_fwd_fee.write_to(cell)?;
        self.transfer_fee.write_to(cell)?;
        self.deposit_limit.serialize()?.write_to(cell)?;
        Ok(())
    }
}

impl Deserializable for TjtReinvestParams {
    fn construct_from(slice: &mut SliceData) -> Result<Self> {
        let mut params = TjtReinvestParams::default();
        params.amount_to_swap = Grams::construct_from(slice)?;
        if params.has_swap() {
            params.swap_limit = Grams::construct_from(slice)?;
            params.deadline = u32::construct_from(slice)?;
        }
        params.ton_target_balance = Grams::construct_from(slice)?;
        params.jetton_target_balance = Grams::construct_from(slice)?;
        params.deposit_fee = Grams::construct_from(slice)?;
        params.deposit_fwd_fee = Grams::construct_from(slice)?;
        params.transfer_fee = Grams::construct_from(slice)?;
        params.deposit_limit = Grams::construct_from_reference(slice)?;
        Ok(params)
    }
}

pub fn pack_tjt_reinvest(params: &TjtReinvestParams) -> Result<Cell> {
    log::debug!(target: "vault", "packing tjt reinvest, swap {}", params.has_swap());
    params.serialize()
}
