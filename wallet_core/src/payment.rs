//! Payment request building.

use anima_types::{AccountId, E8s, PaymentRequest};
use tracing::debug;

use crate::memo::{MemoGenerator, MemoRandom};

/// Mint fee in whole ICP. Fixed; not configurable at runtime.
pub const MINT_FEE_ICP: u64 = 1;

/// Builds transfers to the treasury.
#[derive(Clone, Debug)]
pub struct PaymentBuilder {
    treasury: AccountId,
}

impl PaymentBuilder {
    pub fn new(treasury: AccountId) -> Self {
        Self { treasury }
    }

    pub fn treasury(&self) -> &AccountId {
        &self.treasury
    }

    /// The fee charged per mint.
    pub fn mint_fee() -> E8s {
        E8s::from_icp(MINT_FEE_ICP)
    }

    /// A fresh request for `amount`, stamped with a new memo.
    pub fn payment<R: MemoRandom>(
        &self,
        amount: E8s,
        memos: &MemoGenerator<R>,
        now_millis: u64,
    ) -> PaymentRequest {
        let memo = memos.next(now_millis);
        debug!(memo = %memo, amount = %amount, to = %self.treasury, "built payment request");
        PaymentRequest {
            to: self.treasury.clone(),
            amount,
            memo,
            created_at_millis: now_millis,
        }
    }

    /// A fresh request for the mint fee.
    pub fn mint_payment<R: MemoRandom>(
        &self,
        memos: &MemoGenerator<R>,
        now_millis: u64,
    ) -> PaymentRequest {
        self.payment(Self::mint_fee(), memos, now_millis)
    }
}
