//! Continuously-compounding interest model.
//!
//! The servicer fee is its own compounding leg on the same base as interest,
//! so fee and interest combine through successive compounding rather than
//! summed rates. Past the tenor boundary the punitive default rate takes
//! over, computed as a second compounding leg over `[boundary, now]`.

use crate::error::LienError;
use crate::fixed_point::compound;
use crate::interest::DebtBreakdown;
use crate::types::{LoanState, LoanTerms, Timestamp};
use crate::LienResult;

/// Amount owed at `now` on the checkpointed balance.
///
/// First compounds the balance by the fee rate over `[paid_through, now]`,
/// then by the ordinary rate up to the tenor boundary and the default rate
/// beyond it. `now` before `paid_through` is invalid input.
pub fn compute_debt(
    terms: &LoanTerms,
    state: &LoanState,
    now: Timestamp,
) -> LienResult<DebtBreakdown> {
    if now < state.paid_through {
        return Err(LienError::InvalidInterval {
            start: state.paid_through,
            end: now,
        });
    }
    terms.validate()?;

    let base = state.amount_owed;
    let debt_with_fee = compound(base, terms.fee_bips, state.paid_through, now)?;

    let boundary = terms
        .start_time
        .checked_add(terms.tenor())
        .ok_or_else(|| LienError::ArithmeticOverflow {
            context: "tenor boundary".into(),
        })?
        .max(state.paid_through);

    let debt = if now <= boundary {
        compound(debt_with_fee, terms.rate_bips, state.paid_through, now)?
    } else {
        let at_boundary = compound(debt_with_fee, terms.rate_bips, state.paid_through, boundary)?;
        compound(at_boundary, terms.default_rate_bips, boundary, now)?
    };

    Ok(DebtBreakdown {
        debt,
        fee_interest: debt_with_fee - base,
        lender_interest: debt - debt_with_fee,
    })
}
