//! Fixed-installment interest model.
//!
//! Each installment is a flat, linearly-computed charge on the fixed
//! principal: simple interest per period, never on the running balance.
//! A missed installment (one full grace period elapsed) adds a past-due
//! charge at the default rate; both past and current charges can apply to
//! the same instant.

use crate::error::LienError;
use crate::fixed_point::{mul_amount_wad, rate_fraction};
use crate::interest::InstallmentCharges;
use crate::types::{Amount, Bips, LoanTerms, Timestamp};
use crate::LienResult;

/// Simple (linear, non-compounding) interest on `principal` at `rate_bips`
/// over `span` seconds.
pub(crate) fn period_charge(principal: Amount, rate_bips: Bips, span: u64) -> LienResult<Amount> {
    mul_amount_wad(principal, rate_fraction(rate_bips, 0, span)?)
}

/// Settlement horizon for a given installment index.
pub(crate) fn paid_through(terms: &LoanTerms, installment: u64) -> LienResult<Timestamp> {
    installment
        .checked_mul(terms.period)
        .and_then(|offset| terms.start_time.checked_add(offset))
        .ok_or_else(|| LienError::ArithmeticOverflow {
            context: "paid_through".into(),
        })
}

/// Charges owed at `now` for a loan paid through `installment` installments.
pub fn compute_interest_and_fees(
    terms: &LoanTerms,
    installment: u64,
    now: Timestamp,
    repayment_check: bool,
) -> LienResult<InstallmentCharges> {
    terms.validate()?;
    let paid_through = paid_through(terms, installment)?;

    let mut charges = InstallmentCharges::default();
    if repayment_check && now < paid_through {
        // Already settled through this point; nothing is due yet.
        return Ok(charges);
    }

    // Strictly greater: an instant exactly at the end of the grace period is
    // not yet in default.
    let in_default = now > paid_through.saturating_add(terms.period);
    let past_tenor = now > terms.start_time.saturating_add(terms.tenor());

    if in_default {
        charges.past_interest = period_charge(terms.principal, terms.default_rate_bips, terms.period)?;
        charges.past_fee = period_charge(terms.principal, terms.fee_bips, terms.period)?;
    }
    if !past_tenor {
        charges.current_interest = period_charge(terms.principal, terms.rate_bips, terms.period)?;
        charges.current_fee = period_charge(terms.principal, terms.fee_bips, terms.period)?;
    }
    Ok(charges)
}

/// Installment index after a payment at `now`.
///
/// A borrower more than one full period behind advances by two when only a
/// single cure installment is permitted; exactly one period late still
/// advances by one and covers the arrears through the past-due charges.
pub fn next_installment(terms: &LoanTerms, installment: u64, now: Timestamp, cure_only: bool) -> u64 {
    let paid_through = terms
        .start_time
        .saturating_add(installment.saturating_mul(terms.period));
    if cure_only && now > paid_through.saturating_add(terms.period) {
        installment + 2
    } else {
        installment + 1
    }
}
