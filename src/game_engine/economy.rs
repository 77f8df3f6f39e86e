//! Player balance and bank reserve.
//!
//! `balance` is signed and unclamped: going negative is what triggers a
//! borrow. `bank_reserve` is unsigned, and borrowing only ever moves funds
//! from the reserve to the balance. These three operations are the only
//! mutators.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorrowOutcome {
    /// The full amount was transferred.
    Success { transferred: u32 },
    /// The reserve held less than asked; all of it was transferred.
    PartialSuccess { transferred: u32 },
    /// The reserve was already empty; nothing moved.
    Depleted,
}

impl BorrowOutcome {
    pub fn transferred(self) -> u32 {
        match self {
            BorrowOutcome::Success { transferred }
            | BorrowOutcome::PartialSuccess { transferred } => transferred,
            BorrowOutcome::Depleted => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrisisTick {
    /// The loss was absorbed, first by the balance and then by the reserve.
    Charged { from_balance: u32, from_reserve: u32 },
    /// Balance and reserve together could not cover the loss.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyState {
    balance: i64,
    bank_reserve: u32,
}

impl EconomyState {
    pub fn new(balance: i64, bank_reserve: u32) -> Self {
        EconomyState { balance, bank_reserve }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn bank_reserve(&self) -> u32 {
        self.bank_reserve
    }

    pub fn is_in_debt(&self) -> bool {
        self.balance < 0
    }

    /// Add `profit_points` on a correct answer, `loss_points` otherwise.
    pub fn apply_answer(&mut self, correct: bool, profit_points: i64, loss_points: i64) -> i64 {
        self.balance += if correct { profit_points } else { loss_points };
        self.balance
    }

    pub fn borrow(&mut self, amount: u32) -> BorrowOutcome {
        if self.bank_reserve == 0 {
            return BorrowOutcome::Depleted;
        }
        if self.bank_reserve >= amount {
            self.bank_reserve -= amount;
            self.balance += i64::from(amount);
            BorrowOutcome::Success { transferred: amount }
        } else {
            let transferred = self.bank_reserve;
            self.bank_reserve = 0;
            self.balance += i64::from(transferred);
            BorrowOutcome::PartialSuccess { transferred }
        }
    }

    /// Charge one crisis tick. A positive balance pays first and is pinned at
    /// zero; the reserve covers the shortfall.
    pub fn apply_crisis_tick(&mut self, loss_per_tick: u32) -> CrisisTick {
        let available = u32::try_from(self.balance.max(0)).unwrap_or(u32::MAX);
        let from_balance = loss_per_tick.min(available);
        self.balance -= i64::from(from_balance);

        let shortfall = loss_per_tick - from_balance;
        if shortfall == 0 {
            return CrisisTick::Charged { from_balance, from_reserve: 0 };
        }
        if self.bank_reserve >= shortfall {
            self.bank_reserve -= shortfall;
            CrisisTick::Charged { from_balance, from_reserve: shortfall }
        } else {
            self.bank_reserve = 0;
            CrisisTick::GameOver
        }
    }
}
