//! Payment waterfall.
//!
//! Splits one incoming payment across the three prioritized claims
//! (principal, interest, fee) and across the two payer roles: the primary
//! payer covers the debt up to the payment amount, the residual payer covers
//! any shortfall. Recipients are always made whole; the only variable is
//! which payer contributes which portion. The output is an ordered list of
//! value-movement instructions; executing them is someone else's job.

use crate::error::LienError;
use crate::types::{AccountId, Amount, Asset, DistributionTranche, Transfer};
use crate::LienResult;

/// Stable descending sort of exactly three tranches, closed form.
///
/// Equal amounts keep their insertion order (principal, interest, fee), so
/// the largest claim is made whole first and ties favor seniority.
pub fn sort_tranches(
    principal: DistributionTranche,
    interest: DistributionTranche,
    fee: DistributionTranche,
) -> [DistributionTranche; 3] {
    let mut tranches = [principal, interest, fee];
    if tranches[1].amount > tranches[0].amount {
        tranches.swap(0, 1);
    }
    if tranches[2].amount > tranches[1].amount {
        tranches.swap(1, 2);
    }
    if tranches[1].amount > tranches[0].amount {
        tranches.swap(0, 1);
    }
    tranches
}

/// Allocate `amount` against `debt` across the three tranches.
///
/// Every computed movement of zero amount, or from an account to itself, is
/// elided from the result as a no-op, not an error. The full schedule is
/// verified for conservation before eliding; a mismatch is a programming
/// defect and surfaces as `InvariantViolation`.
#[allow(clippy::too_many_arguments)]
pub fn distribute(
    asset: &Asset,
    amount: Amount,
    debt: Amount,
    principal: DistributionTranche,
    interest: DistributionTranche,
    fee: DistributionTranche,
    primary_payer: &AccountId,
    residual_payer: &AccountId,
    residual_recipient: &AccountId,
) -> LienResult<Vec<Transfer>> {
    let tranche_sum = principal
        .amount
        .checked_add(interest.amount)
        .and_then(|sum| sum.checked_add(fee.amount))
        .ok_or_else(|| LienError::ArithmeticOverflow {
            context: "tranche sum".into(),
        })?;
    if tranche_sum != debt {
        return Err(LienError::InvalidInput {
            field: "debt".into(),
            reason: "Tranche amounts must sum to the outstanding debt.".into(),
        });
    }

    let mut schedule: Vec<Transfer> = Vec::with_capacity(4);
    let mut push = |from: &AccountId, to: &AccountId, amount: Amount| {
        schedule.push(Transfer {
            asset: asset.clone(),
            from: from.clone(),
            to: to.clone(),
            amount,
        });
    };

    if amount >= debt {
        // Full payoff: every tranche paid in full by the primary payer, the
        // overpayment routed onward to the residual recipient.
        push(primary_payer, &principal.recipient, principal.amount);
        push(primary_payer, &interest.recipient, interest.amount);
        push(primary_payer, &fee.recipient, fee.amount);
        push(primary_payer, residual_recipient, amount - debt);
    } else {
        let [t0, t1, t2] = sort_tranches(principal, interest, fee);
        if amount > t0.amount + t1.amount {
            // Payment clears the two largest claims; the smallest splits
            // between the payers.
            let remainder = amount - t0.amount - t1.amount;
            push(primary_payer, &t0.recipient, t0.amount);
            push(primary_payer, &t1.recipient, t1.amount);
            push(primary_payer, &t2.recipient, remainder);
            push(residual_payer, &t2.recipient, t2.amount - remainder);
        } else if amount > t0.amount {
            // Payment clears the largest claim only.
            let remainder = amount - t0.amount;
            push(primary_payer, &t0.recipient, t0.amount);
            push(primary_payer, &t1.recipient, remainder);
            push(residual_payer, &t1.recipient, t1.amount - remainder);
            push(residual_payer, &t2.recipient, t2.amount);
        } else {
            // Payment does not even cover the largest claim.
            push(primary_payer, &t0.recipient, amount);
            push(residual_payer, &t0.recipient, t0.amount - amount);
            push(residual_payer, &t1.recipient, t1.amount);
            push(residual_payer, &t2.recipient, t2.amount);
        }
    }

    verify_conservation(&schedule, amount, debt, primary_payer)?;

    schedule.retain(|t| t.amount > 0 && t.from != t.to);
    Ok(schedule)
}

/// Conservation check over the pre-elision schedule: the primary payer
/// contributes exactly the payment amount, and recipients together receive
/// the debt (plus the overpayment remainder in the payoff branch).
fn verify_conservation(
    schedule: &[Transfer],
    amount: Amount,
    debt: Amount,
    primary_payer: &AccountId,
) -> LienResult<()> {
    let primary_total: Amount = schedule
        .iter()
        .filter(|t| t.from == *primary_payer)
        .map(|t| t.amount)
        .sum();
    let total: Amount = schedule.iter().map(|t| t.amount).sum();

    let (expected_primary, expected_total) = if amount >= debt {
        (amount, amount)
    } else {
        (amount, debt)
    };

    if primary_total != expected_primary || total != expected_total {
        return Err(LienError::InvariantViolation(format!(
            "waterfall scheduled {primary_total} from the primary payer and {total} overall; \
             expected {expected_primary} and {expected_total}"
        )));
    }
    Ok(())
}
