//! Pro-rated fixed-installment interest model.
//!
//! Variant of the fixed-installment model where the current, not-yet-complete
//! period is charged for its elapsed fraction only, and default handling
//! spans two periods: the first period past `paid_through` is a grace window
//! with no charge at all; beyond it the missed period is charged in full at
//! the default rate while the second period accrues at the ordinary rate,
//! pro-rata or in full per the `pro_rata` flag.
//!
//! Fee is never rounded independently here: each leg computes the combined
//! (rate + fee) charge and the without-fee charge, and the fee is the
//! residual. `fee + lender_interest` therefore reconciles exactly to the
//! total added debt, with no rounding leak.

use crate::interest::fixed_installment::{paid_through, period_charge};
use crate::interest::InstallmentCharges;
use crate::types::{Amount, Bips, LoanTerms, Timestamp};
use crate::LienResult;

/// Combined-minus-base split: charge at `rate + fee` and at `rate` alone,
/// fee as the residual.
fn split_charge(
    principal: Amount,
    rate_bips: Bips,
    fee_bips: Bips,
    span: u64,
) -> LienResult<(Amount, Amount)> {
    let lender = period_charge(principal, rate_bips, span)?;
    let combined = period_charge(principal, rate_bips + fee_bips, span)?;
    Ok((lender, combined - lender))
}

/// Charges owed at `now` for a loan paid through `installment` installments.
///
/// Inside the grace window (one full period past `paid_through`) nothing new
/// is due; the debt is simply the checkpointed balance.
pub fn compute_interest_and_fees(
    terms: &LoanTerms,
    installment: u64,
    now: Timestamp,
    pro_rata: bool,
) -> LienResult<InstallmentCharges> {
    terms.validate()?;
    let paid_through = paid_through(terms, installment)?;

    let mut charges = InstallmentCharges::default();
    let grace_end = paid_through.saturating_add(terms.period);
    if now <= grace_end {
        return Ok(charges);
    }

    // The missed period is charged in full at the default rate.
    let (past_interest, past_fee) = split_charge(
        terms.principal,
        terms.default_rate_bips,
        terms.fee_bips,
        terms.period,
    )?;
    charges.past_interest = past_interest;
    charges.past_fee = past_fee;

    // The second period accrues at the ordinary rate, pro-rated to the
    // elapsed fraction unless the flag asks for the full period.
    let past_tenor = now > terms.start_time.saturating_add(terms.tenor());
    if !past_tenor {
        let elapsed = (now - grace_end).min(terms.period);
        let span = if pro_rata { elapsed } else { terms.period };
        let (current_interest, current_fee) =
            split_charge(terms.principal, terms.rate_bips, terms.fee_bips, span)?;
        charges.current_interest = current_interest;
        charges.current_fee = current_fee;
    }
    Ok(charges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DAY: u64 = 86_400;

    fn sample_terms() -> LoanTerms {
        LoanTerms {
            principal: 10_000_000,
            rate_bips: 1_200,
            default_rate_bips: 3_000,
            fee_bips: 100,
            period: 30 * DAY,
            installments: 12,
            start_time: 0,
        }
    }

    #[test]
    fn test_grace_window_owes_nothing() {
        let terms = sample_terms();
        // anywhere up to and including one full period past paid_through
        for now in [0, DAY, 15 * DAY, 30 * DAY] {
            let charges = compute_interest_and_fees(&terms, 0, now, true).unwrap();
            assert_eq!(charges, InstallmentCharges::default(), "charged at t = {now}");
        }
    }

    #[test]
    fn test_missed_period_charged_in_full_at_default_rate() {
        let terms = sample_terms();
        let charges = compute_interest_and_fees(&terms, 0, 31 * DAY, true).unwrap();
        let (expected_interest, expected_fee) = split_charge(
            terms.principal,
            terms.default_rate_bips,
            terms.fee_bips,
            terms.period,
        )
        .unwrap();
        assert_eq!(charges.past_interest, expected_interest);
        assert_eq!(charges.past_fee, expected_fee);
    }

    #[test]
    fn test_current_period_pro_rated_to_elapsed_fraction() {
        let terms = sample_terms();
        // 10 days into the second period
        let charges = compute_interest_and_fees(&terms, 0, 40 * DAY, true).unwrap();
        let (expected_interest, _) =
            split_charge(terms.principal, terms.rate_bips, terms.fee_bips, 10 * DAY).unwrap();
        assert_eq!(charges.current_interest, expected_interest);
    }

    #[test]
    fn test_full_flag_charges_whole_period() {
        let terms = sample_terms();
        let charges = compute_interest_and_fees(&terms, 0, 40 * DAY, false).unwrap();
        let (expected_interest, _) =
            split_charge(terms.principal, terms.rate_bips, terms.fee_bips, terms.period).unwrap();
        assert_eq!(charges.current_interest, expected_interest);
    }

    #[test]
    fn test_pro_rata_caps_at_one_period() {
        // deep in arrears: the elapsed fraction never exceeds one period
        let terms = sample_terms();
        let capped = compute_interest_and_fees(&terms, 0, 90 * DAY, true).unwrap();
        let full = compute_interest_and_fees(&terms, 0, 60 * DAY + 1, false).unwrap();
        assert_eq!(capped.current_interest, full.current_interest);
    }

    #[test]
    fn test_fee_is_residual_with_zero_rounding_leak() {
        let terms = LoanTerms {
            // awkward principal to force truncation in every leg
            principal: 99_999_999,
            rate_bips: 777,
            default_rate_bips: 1_333,
            fee_bips: 99,
            period: 29 * DAY + 7_717,
            installments: 7,
            start_time: 11,
        };
        // 12_345 seconds into the second period
        let now = terms.start_time + terms.period + 12_345;
        let charges = compute_interest_and_fees(&terms, 0, now, true).unwrap();

        // past leg reconciles against the combined charge exactly
        let combined_past = period_charge(
            terms.principal,
            terms.default_rate_bips + terms.fee_bips,
            terms.period,
        )
        .unwrap();
        assert_eq!(charges.past_interest + charges.past_fee, combined_past);

        // current leg likewise
        let elapsed = now - (terms.start_time + terms.period);
        let combined_current =
            period_charge(terms.principal, terms.rate_bips + terms.fee_bips, elapsed).unwrap();
        assert_eq!(charges.current_interest + charges.current_fee, combined_current);
    }

    #[test]
    fn test_past_tenor_stops_current_accrual() {
        let terms = sample_terms();
        let now = terms.tenor() + 2 * terms.period;
        let charges =
            compute_interest_and_fees(&terms, terms.installments - 1, now, true).unwrap();
        assert!(charges.past_interest > 0);
        assert_eq!(charges.current_interest, 0);
        assert_eq!(charges.current_fee, 0);
    }
}
