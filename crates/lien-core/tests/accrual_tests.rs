use lien_core::fixed_point::{compound, SECONDS_PER_YEAR};
use lien_core::interest::InterestModel;
use lien_core::{LienError, LoanState, LoanTerms};

// ===========================================================================
// Interest model tests across the three strategies
// ===========================================================================

const DAY: u64 = 86_400;

fn monthly_terms() -> LoanTerms {
    LoanTerms {
        principal: 1_000_000,
        rate_bips: 1_000,
        default_rate_bips: 2_500,
        fee_bips: 100,
        period: 30 * DAY,
        installments: 12,
        start_time: 1_700_000_000,
    }
}

fn yearly_bullet_terms() -> LoanTerms {
    LoanTerms {
        principal: 1_000,
        rate_bips: 1_000,
        default_rate_bips: 2_000,
        fee_bips: 0,
        period: SECONDS_PER_YEAR,
        installments: 1,
        start_time: 0,
    }
}

#[test]
fn test_compounding_one_year_scenario() {
    // 1000 at 10% continuous for one year: e^0.10 ~ 1.10517 -> 1105
    let terms = yearly_bullet_terms();
    let state = LoanState::originate(&terms);
    let breakdown = InterestModel::Compounding
        .compute_debt(&terms, &state, SECONDS_PER_YEAR)
        .unwrap();
    assert_eq!(breakdown.debt, 1_105);
}

#[test]
fn test_compounding_reversed_clock_fails_fast() {
    let terms = yearly_bullet_terms();
    let state = LoanState {
        amount_owed: 1_000,
        paid_through: 500,
    };
    let result = InterestModel::Compounding.compute_debt(&terms, &state, 499);
    assert!(matches!(result, Err(LienError::InvalidInterval { .. })));
}

#[test]
fn test_all_models_report_zero_at_origination_instant() {
    let terms = monthly_terms();
    let state = LoanState::originate(&terms);
    for model in [
        InterestModel::Compounding,
        InterestModel::ProRatedInstallment { pro_rata: true },
    ] {
        let b = model.compute_debt(&terms, &state, terms.start_time).unwrap();
        assert_eq!(b.debt, terms.principal, "{model:?}");
        assert_eq!(b.fee_interest + b.lender_interest, 0, "{model:?}");
    }
}

#[test]
fn test_debt_monotone_in_now_for_every_model() {
    // Installment models stop charging the current period once past tenor,
    // so their monotone window is the tenor itself; the compounding model
    // accrues forever.
    let terms = monthly_terms();
    let state = LoanState::originate(&terms);
    let cases = [
        (InterestModel::Compounding, 400),
        (InterestModel::FixedInstallment, 360),
        (InterestModel::ProRatedInstallment { pro_rata: true }, 360),
        (InterestModel::ProRatedInstallment { pro_rata: false }, 360),
    ];
    for (model, horizon_days) in cases {
        let mut previous = 0;
        for day in 0..=horizon_days {
            let now = terms.start_time + day * DAY;
            let b = model.compute_debt(&terms, &state, now).unwrap();
            assert!(
                b.debt >= previous,
                "{model:?}: debt decreased on day {day} ({} -> {})",
                previous,
                b.debt
            );
            previous = b.debt;
        }
    }
}

#[test]
fn test_reconciliation_has_no_rounding_leak() {
    // fee_interest + lender_interest must equal the total debt increase
    // exactly, for every model and at awkward instants
    let terms = LoanTerms {
        principal: 99_999_999,
        rate_bips: 1_234,
        default_rate_bips: 4_321,
        fee_bips: 77,
        period: 29 * DAY + 1,
        installments: 11,
        start_time: 13,
    };
    let state = LoanState::originate(&terms);
    for model in [
        InterestModel::Compounding,
        InterestModel::FixedInstallment,
        InterestModel::ProRatedInstallment { pro_rata: true },
    ] {
        for day in [0, 1, 17, 29, 30, 31, 59, 61, 200, 400] {
            let now = terms.start_time + day * DAY;
            let b = model.compute_debt(&terms, &state, now).unwrap();
            assert_eq!(
                b.debt,
                state.amount_owed + b.fee_interest + b.lender_interest,
                "{model:?} leaked at day {day}"
            );
        }
    }
}

#[test]
fn test_installment_boundary_is_not_yet_default() {
    // now exactly at paid_through + period: strictly-greater comparison means
    // no past-due charge, only the current-period charge
    let terms = monthly_terms();
    let state = LoanState::originate(&terms);
    let boundary = terms.start_time + terms.period;

    let at_boundary = InterestModel::FixedInstallment
        .compute_interest_and_fees(&terms, &state, boundary, true)
        .unwrap();
    assert_eq!(at_boundary.past_interest, 0);
    assert_eq!(at_boundary.past_fee, 0);
    assert!(at_boundary.current_interest > 0);

    let past_boundary = InterestModel::FixedInstallment
        .compute_interest_and_fees(&terms, &state, boundary + 1, true)
        .unwrap();
    assert!(past_boundary.past_interest > 0);
}

#[test]
fn test_fixed_installment_charges_flat_regardless_of_balance() {
    // simple interest on the fixed principal, not the running balance
    let terms = monthly_terms();
    let low_balance = LoanState {
        amount_owed: 1,
        paid_through: terms.start_time,
    };
    let high_balance = LoanState {
        amount_owed: terms.principal,
        paid_through: terms.start_time,
    };
    let now = terms.start_time + 10 * DAY;
    let a = InterestModel::FixedInstallment
        .compute_interest_and_fees(&terms, &low_balance, now, true)
        .unwrap();
    let b = InterestModel::FixedInstallment
        .compute_interest_and_fees(&terms, &high_balance, now, true)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_pro_rated_grace_then_two_period_charge() {
    let terms = monthly_terms();
    let state = LoanState::originate(&terms);
    let model = InterestModel::ProRatedInstallment { pro_rata: true };

    // within the grace window: nothing due
    let grace = model
        .compute_debt(&terms, &state, terms.start_time + terms.period)
        .unwrap();
    assert_eq!(grace.debt, state.amount_owed);

    // past it: missed period at the default rate plus a pro-rated current leg
    let late = model
        .compute_debt(&terms, &state, terms.start_time + terms.period + 10 * DAY)
        .unwrap();
    assert!(late.debt > state.amount_owed);
    let charges = model
        .compute_interest_and_fees(&terms, &state, terms.start_time + terms.period + 10 * DAY, true)
        .unwrap();
    assert!(charges.past_interest > 0);
    assert!(charges.current_interest > 0);
    assert!(charges.current_interest < charges.past_interest);
}

#[test]
fn test_pro_rated_flag_off_charges_full_period() {
    let terms = monthly_terms();
    let state = LoanState::originate(&terms);
    let now = terms.start_time + terms.period + 5 * DAY;
    let pro_rated = InterestModel::ProRatedInstallment { pro_rata: true }
        .compute_interest_and_fees(&terms, &state, now, true)
        .unwrap();
    let full = InterestModel::ProRatedInstallment { pro_rata: false }
        .compute_interest_and_fees(&terms, &state, now, true)
        .unwrap();
    assert!(pro_rated.current_interest < full.current_interest);
    assert_eq!(pro_rated.past_interest, full.past_interest);
}

#[test]
fn test_default_rate_split_exceeds_ordinary_compounding() {
    let terms = yearly_bullet_terms();
    let state = LoanState::originate(&terms);
    let two_years = 2 * SECONDS_PER_YEAR;

    let defaulted = InterestModel::Compounding
        .compute_debt(&terms, &state, two_years)
        .unwrap()
        .debt;
    let ordinary_whole_way = compound(terms.principal, terms.rate_bips, 0, two_years).unwrap();
    assert!(
        defaulted > ordinary_whole_way,
        "punitive leg must accrue strictly more: {defaulted} vs {ordinary_whole_way}"
    );
}
