use serde::{Deserialize, Serialize};

use crate::error::LienError;
use crate::LienResult;

/// Monetary amounts in the smallest currency unit. Never floating point.
pub type Amount = u128;

/// Annualized rates in basis points (1 bips = 0.01%).
pub type Bips = u64;

/// Epoch seconds, supplied by the caller, never read internally.
pub type Timestamp = u64;

/// Signed 1e18-scale fixed-point value.
pub type Wad = i128;

/// Opaque account / address identifier. Routing only, no behavior.
pub type AccountId = String;

/// Immutable terms of a lien, fixed at origination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Principal in the smallest currency unit.
    pub principal: Amount,
    /// Ordinary annualized rate, basis points.
    pub rate_bips: Bips,
    /// Punitive annualized rate applied past the grace window, basis points.
    pub default_rate_bips: Bips,
    /// Annualized protocol/servicer fee, basis points.
    pub fee_bips: Bips,
    /// Duration of one installment, seconds.
    pub period: u64,
    /// Number of scheduled installments.
    pub installments: u64,
    /// Origination time, epoch seconds.
    pub start_time: Timestamp,
}

impl LoanTerms {
    /// Total scheduled duration: `period * installments`, saturating at
    /// `u64::MAX` for terms that `validate` rejects as overflowing.
    pub fn tenor(&self) -> u64 {
        self.period.saturating_mul(self.installments)
    }

    pub fn validate(&self) -> LienResult<()> {
        if self.principal == 0 {
            return Err(LienError::InvalidInput {
                field: "principal".into(),
                reason: "Principal must be positive.".into(),
            });
        }
        if self.period == 0 {
            return Err(LienError::InvalidInput {
                field: "period".into(),
                reason: "Installment period must be positive.".into(),
            });
        }
        if self.installments == 0 {
            return Err(LienError::InvalidInput {
                field: "installments".into(),
                reason: "Must have at least one installment.".into(),
            });
        }
        if self.period.checked_mul(self.installments).is_none() {
            return Err(LienError::ArithmeticOverflow {
                context: "tenor".into(),
            });
        }
        Ok(())
    }
}

/// Mutable per-loan state, updated only at payment checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanState {
    /// Principal-plus-accrued balance as of the last checkpoint.
    pub amount_owed: Amount,
    /// Epoch seconds up to which obligations are settled. Never decreases.
    pub paid_through: Timestamp,
}

impl LoanState {
    /// State of a freshly originated loan.
    pub fn originate(terms: &LoanTerms) -> Self {
        LoanState {
            amount_owed: terms.principal,
            paid_through: terms.start_time,
        }
    }

    /// Installments fully settled so far, derived from `paid_through`.
    pub fn installments_paid(&self, terms: &LoanTerms) -> u64 {
        self.paid_through.saturating_sub(terms.start_time) / terms.period.max(1)
    }

    /// Advance to a new checkpoint. `paid_through` may only move forward.
    pub fn checkpoint(&self, amount_owed: Amount, paid_through: Timestamp) -> LienResult<Self> {
        if paid_through < self.paid_through {
            return Err(LienError::InvalidInput {
                field: "paid_through".into(),
                reason: "Checkpoint cannot move paid_through backwards.".into(),
            });
        }
        Ok(LoanState {
            amount_owed,
            paid_through,
        })
    }
}

/// One of the three prioritized payment claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrancheKind {
    Principal,
    Interest,
    Fee,
}

/// A prioritized claim and where it is owed. The allocation unit inside the
/// payment waterfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionTranche {
    pub kind: TrancheKind,
    pub amount: Amount,
    pub recipient: AccountId,
}

/// Output of an interest model at an instant: what is owed and to whom,
/// split into past (default-rate) and current (in-period) components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBreakdown {
    pub principal_due: Amount,
    pub past_interest_due: Amount,
    pub past_fee_due: Amount,
    pub current_interest_due: Amount,
    pub current_fee_due: Amount,
}

impl ClaimBreakdown {
    pub fn interest_due(&self) -> Amount {
        self.past_interest_due + self.current_interest_due
    }

    pub fn fee_due(&self) -> Amount {
        self.past_fee_due + self.current_fee_due
    }

    pub fn total(&self) -> Amount {
        self.principal_due + self.interest_due() + self.fee_due()
    }

    /// Collapse past+current components into the three waterfall tranches.
    pub fn tranches(
        &self,
        lender: &AccountId,
        fee_recipient: &AccountId,
    ) -> [DistributionTranche; 3] {
        [
            DistributionTranche {
                kind: TrancheKind::Principal,
                amount: self.principal_due,
                recipient: lender.clone(),
            },
            DistributionTranche {
                kind: TrancheKind::Interest,
                amount: self.interest_due(),
                recipient: lender.clone(),
            },
            DistributionTranche {
                kind: TrancheKind::Fee,
                amount: self.fee_due(),
                recipient: fee_recipient.clone(),
            },
        ]
    }
}

/// Token-standard classification of an asset. Detection itself lives with
/// the transfer executor, outside the accounting core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Fungible,
    NonFungible,
    Unknown,
}

/// The currency/asset a payment is denominated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub code: String,
    pub kind: AssetKind,
}

impl Asset {
    pub fn fungible(code: impl Into<String>) -> Self {
        Asset {
            code: code.into(),
            kind: AssetKind::Fungible,
        }
    }
}

/// One value-movement instruction for the transfer executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub asset: Asset,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}
