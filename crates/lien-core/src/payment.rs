//! Payment processing checkpoint.
//!
//! The one-way pipeline: interest model -> claim breakdown -> tranches ->
//! waterfall -> transfer instructions, plus the LoanState advance. Pure:
//! callers get back the new state and the movement list; applying the
//! movements (atomically, all-or-nothing) is the transfer executor's job.

use serde::{Deserialize, Serialize};

use crate::interest::InterestModel;
use crate::types::{
    AccountId, Amount, Asset, ClaimBreakdown, LoanState, LoanTerms, Timestamp, Transfer,
};
use crate::waterfall::distribute;
use crate::LienResult;

/// Everything a payment checkpoint needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub model: InterestModel,
    pub terms: LoanTerms,
    pub state: LoanState,
    pub asset: Asset,
    /// Payment amount offered by the primary payer.
    pub amount: Amount,
    /// Caller-supplied current time, epoch seconds.
    pub now: Timestamp,
    pub lender: AccountId,
    pub fee_recipient: AccountId,
    pub primary_payer: AccountId,
    pub residual_payer: AccountId,
    pub residual_recipient: AccountId,
    /// Only a single cure installment permitted when behind.
    pub cure_only: bool,
}

/// Result of a payment checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Movements to hand to the transfer executor, in order.
    pub transfers: Vec<Transfer>,
    /// Loan state after the checkpoint.
    pub new_state: LoanState,
    /// The claim breakdown the payment was allocated against.
    pub claims: ClaimBreakdown,
    /// Total outstanding balance at `now`.
    pub debt: Amount,
}

/// Compute the claims at `now`, allocate the payment through the waterfall,
/// and advance the loan state.
///
/// `amount_owed` after the checkpoint is whatever debt the payment did not
/// extinguish, zero on full payoff. `paid_through`
/// advances to `now` for the compounding model and to the next installment
/// boundary for the installment models; it never moves backwards.
pub fn process_payment(input: &PaymentInput) -> LienResult<PaymentOutcome> {
    let claims = input
        .model
        .claims(&input.terms, &input.state, input.now, true)?;
    let debt = claims.total();

    let [principal, interest, fee] = claims.tranches(&input.lender, &input.fee_recipient);
    let transfers = distribute(
        &input.asset,
        input.amount,
        debt,
        principal,
        interest,
        fee,
        &input.primary_payer,
        &input.residual_payer,
        &input.residual_recipient,
    )?;

    // The checkpoint records the debt the payment itself did not cover.
    let applied = input.amount.min(debt);
    let remaining = debt - applied;

    let paid_through = match input.model {
        InterestModel::Compounding => input.now,
        InterestModel::FixedInstallment | InterestModel::ProRatedInstallment { .. } => {
            let next = input.model.next_installment(
                &input.terms,
                &input.state,
                input.now,
                input.cure_only,
            );
            input
                .terms
                .start_time
                .saturating_add(next.saturating_mul(input.terms.period))
        }
    };
    let paid_through = paid_through.max(input.state.paid_through);
    let new_state = input.state.checkpoint(remaining, paid_through)?;

    Ok(PaymentOutcome {
        transfers,
        new_state,
        claims,
        debt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_point::SECONDS_PER_YEAR;
    use pretty_assertions::assert_eq;

    const DAY: u64 = 86_400;

    fn sample_input() -> PaymentInput {
        let terms = LoanTerms {
            principal: 1_000_000,
            rate_bips: 1_000,
            default_rate_bips: 2_500,
            fee_bips: 100,
            period: 30 * DAY,
            installments: 12,
            start_time: 0,
        };
        let state = LoanState::originate(&terms);
        PaymentInput {
            model: InterestModel::FixedInstallment,
            terms,
            state,
            asset: Asset::fungible("USDC"),
            amount: 0,
            now: 10 * DAY,
            lender: "lender".into(),
            fee_recipient: "servicer".into(),
            primary_payer: "borrower".into(),
            residual_payer: "guarantor".into(),
            residual_recipient: "borrower".into(),
            cure_only: true,
        }
    }

    #[test]
    fn test_full_payoff_zeroes_the_balance() {
        let mut input = sample_input();
        let debt = input
            .model
            .compute_debt(&input.terms, &input.state, input.now)
            .unwrap()
            .debt;
        input.amount = debt;
        let outcome = process_payment(&input).unwrap();
        assert_eq!(outcome.debt, debt);
        assert_eq!(outcome.new_state.amount_owed, 0);
    }

    #[test]
    fn test_partial_payment_keeps_remainder_owed() {
        let mut input = sample_input();
        input.amount = 400_000;
        let outcome = process_payment(&input).unwrap();
        assert_eq!(outcome.new_state.amount_owed, outcome.debt - 400_000);
    }

    #[test]
    fn test_installment_payment_advances_one_period() {
        let mut input = sample_input();
        input.amount = 10_000;
        let outcome = process_payment(&input).unwrap();
        assert_eq!(outcome.new_state.paid_through, input.terms.period);
    }

    #[test]
    fn test_late_payment_advances_two_periods_when_cure_only() {
        let mut input = sample_input();
        input.now = input.terms.period * 2 + DAY; // more than one period behind
        input.amount = 10_000;
        let outcome = process_payment(&input).unwrap();
        assert_eq!(outcome.new_state.paid_through, 2 * input.terms.period);
        assert!(outcome.claims.past_interest_due > 0);
    }

    #[test]
    fn test_compounding_checkpoint_advances_to_now() {
        let mut input = sample_input();
        input.model = InterestModel::Compounding;
        input.terms.period = SECONDS_PER_YEAR;
        input.terms.installments = 1;
        input.now = SECONDS_PER_YEAR / 2;
        input.amount = 123;
        let outcome = process_payment(&input).unwrap();
        assert_eq!(outcome.new_state.paid_through, input.now);
    }

    #[test]
    fn test_transfers_cover_the_full_debt() {
        let mut input = sample_input();
        input.amount = 300_000;
        let outcome = process_payment(&input).unwrap();
        let total: Amount = outcome.transfers.iter().map(|t| t.amount).sum();
        assert_eq!(total, outcome.debt);
    }

    #[test]
    fn test_paid_through_never_rewinds() {
        let mut input = sample_input();
        input.state.paid_through = 5 * input.terms.period;
        input.now = 2 * input.terms.period; // repayment check: nothing new due
        input.amount = 0;
        let outcome = process_payment(&input).unwrap();
        assert!(outcome.new_state.paid_through >= input.state.paid_through);
    }
}
