//! Interest accrual models.
//!
//! Three mutually exclusive strategies, selected per loan and dispatched
//! through one capability surface:
//! - continuously-compounding (`compounding`)
//! - fixed installment, simple interest per period (`fixed_installment`)
//! - pro-rated fixed installment (`pro_rated`)
//!
//! Every computation is a pure function of loan terms, prior payment state
//! and a caller-supplied clock. All arithmetic is wad fixed-point. No `f64`.

pub mod compounding;
pub mod fixed_installment;
pub mod pro_rated;

use serde::{Deserialize, Serialize};

use crate::types::{Amount, ClaimBreakdown, LoanState, LoanTerms, Timestamp};
use crate::LienResult;

/// The accrual strategy attached to a loan. New models slot in here without
/// touching the payment waterfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestModel {
    /// Continuous compounding over the whole balance.
    Compounding,
    /// Flat simple-interest charge per installment on the fixed principal.
    FixedInstallment,
    /// Installment model with the current period pro-rated to elapsed time.
    ProRatedInstallment {
        /// When false, the current period is charged in full even mid-period.
        pro_rata: bool,
    },
}

/// Amount owed at an instant, decomposed into its accrual legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtBreakdown {
    /// Full balance owed now.
    pub debt: Amount,
    /// Servicer fee portion of the accrual since the last checkpoint.
    pub fee_interest: Amount,
    /// Lender interest portion of the accrual since the last checkpoint.
    pub lender_interest: Amount,
}

/// Per-installment charges. "Past" accrued at the default rate on a missed
/// installment; "current" is the ordinary in-period accrual. Both can apply
/// at once; they are additive, not exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentCharges {
    pub past_interest: Amount,
    pub past_fee: Amount,
    pub current_interest: Amount,
    pub current_fee: Amount,
}

impl InstallmentCharges {
    pub fn total(&self) -> Amount {
        self.past_interest + self.past_fee + self.current_interest + self.current_fee
    }
}

impl InterestModel {
    /// Full balance owed at `now`, with the fee and lender-interest legs.
    pub fn compute_debt(
        &self,
        terms: &LoanTerms,
        state: &LoanState,
        now: Timestamp,
    ) -> LienResult<DebtBreakdown> {
        match self {
            InterestModel::Compounding => compounding::compute_debt(terms, state, now),
            InterestModel::FixedInstallment | InterestModel::ProRatedInstallment { .. } => {
                let charges = self.compute_interest_and_fees(terms, state, now, true)?;
                Ok(DebtBreakdown {
                    debt: state.amount_owed + charges.total(),
                    fee_interest: charges.past_fee + charges.current_fee,
                    lender_interest: charges.past_interest + charges.current_interest,
                })
            }
        }
    }

    /// Past/current interest and fee charges as of `now`.
    ///
    /// With `repayment_check` set, an instant before `paid_through` owes
    /// nothing new; without it the models treat a reversed interval as
    /// invalid input.
    pub fn compute_interest_and_fees(
        &self,
        terms: &LoanTerms,
        state: &LoanState,
        now: Timestamp,
        repayment_check: bool,
    ) -> LienResult<InstallmentCharges> {
        match self {
            InterestModel::Compounding => {
                if repayment_check && now <= state.paid_through {
                    return Ok(InstallmentCharges::default());
                }
                let breakdown = compounding::compute_debt(terms, state, now)?;
                Ok(InstallmentCharges {
                    past_interest: 0,
                    past_fee: 0,
                    current_interest: breakdown.lender_interest,
                    current_fee: breakdown.fee_interest,
                })
            }
            InterestModel::FixedInstallment => fixed_installment::compute_interest_and_fees(
                terms,
                state.installments_paid(terms),
                now,
                repayment_check,
            ),
            InterestModel::ProRatedInstallment { pro_rata } => pro_rated::compute_interest_and_fees(
                terms,
                state.installments_paid(terms),
                now,
                *pro_rata,
            ),
        }
    }

    /// The installment index the loan advances to after a payment at `now`.
    pub fn next_installment(
        &self,
        terms: &LoanTerms,
        state: &LoanState,
        now: Timestamp,
        cure_only: bool,
    ) -> u64 {
        fixed_installment::next_installment(terms, state.installments_paid(terms), now, cure_only)
    }

    /// The three-way claim breakdown consumed by the payment waterfall.
    pub fn claims(
        &self,
        terms: &LoanTerms,
        state: &LoanState,
        now: Timestamp,
        repayment_check: bool,
    ) -> LienResult<ClaimBreakdown> {
        let charges = self.compute_interest_and_fees(terms, state, now, repayment_check)?;
        Ok(ClaimBreakdown {
            principal_due: state.amount_owed,
            past_interest_due: charges.past_interest,
            past_fee_due: charges.past_fee,
            current_interest_due: charges.current_interest,
            current_fee_due: charges.current_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_terms() -> LoanTerms {
        LoanTerms {
            principal: 1_000_000,
            rate_bips: 1_200,
            default_rate_bips: 3_000,
            fee_bips: 100,
            period: 30 * 86_400,
            installments: 12,
            start_time: 0,
        }
    }

    #[test]
    fn test_dispatch_agrees_with_installment_module() {
        let terms = sample_terms();
        let state = LoanState::originate(&terms);
        let now = terms.period / 2;
        let via_enum = InterestModel::FixedInstallment
            .compute_interest_and_fees(&terms, &state, now, true)
            .unwrap();
        let direct =
            fixed_installment::compute_interest_and_fees(&terms, 0, now, true).unwrap();
        assert_eq!(via_enum, direct);
    }

    #[test]
    fn test_installment_debt_is_owed_plus_charges() {
        let terms = sample_terms();
        let state = LoanState::originate(&terms);
        let now = terms.period / 2;
        let model = InterestModel::FixedInstallment;
        let charges = model
            .compute_interest_and_fees(&terms, &state, now, true)
            .unwrap();
        let breakdown = model.compute_debt(&terms, &state, now).unwrap();
        assert_eq!(breakdown.debt, state.amount_owed + charges.total());
        assert_eq!(
            breakdown.debt,
            state.amount_owed + breakdown.fee_interest + breakdown.lender_interest
        );
    }

    #[test]
    fn test_compounding_repayment_check_before_paid_through_owes_nothing() {
        let terms = sample_terms();
        let state = LoanState {
            amount_owed: 1_000_000,
            paid_through: 1_000,
        };
        let charges = InterestModel::Compounding
            .compute_interest_and_fees(&terms, &state, 500, true)
            .unwrap();
        assert_eq!(charges, InstallmentCharges::default());
    }

    #[test]
    fn test_claims_route_principal_from_state() {
        let terms = sample_terms();
        let state = LoanState {
            amount_owed: 777_000,
            paid_through: 0,
        };
        let claims = InterestModel::FixedInstallment
            .claims(&terms, &state, terms.period / 2, true)
            .unwrap();
        assert_eq!(claims.principal_due, 777_000);
        assert!(claims.current_interest_due > 0);
    }
}
