use clap::Args;
use serde_json::{json, Value};

use lien_core::{LoanState, LoanTerms};

use super::{format_amount, parse_timestamp, ModelArg};

/// Loan terms and state shared by the accrual commands.
#[derive(Args)]
pub struct LoanArgs {
    /// Interest model
    #[arg(long, value_enum)]
    pub model: ModelArg,

    /// Pro-rate the current period (pro-rated model only)
    #[arg(long)]
    pub pro_rata: bool,

    /// Principal, smallest currency unit
    #[arg(long)]
    pub principal: u128,

    /// Annualized rate, basis points
    #[arg(long)]
    pub rate_bips: u64,

    /// Annualized default rate, basis points
    #[arg(long)]
    pub default_rate_bips: u64,

    /// Annualized servicer fee, basis points
    #[arg(long, default_value_t = 0)]
    pub fee_bips: u64,

    /// Installment period, seconds
    #[arg(long)]
    pub period: u64,

    /// Number of installments
    #[arg(long, default_value_t = 1)]
    pub installments: u64,

    /// Origination time (epoch seconds or RFC3339)
    #[arg(long, default_value = "0")]
    pub start: String,

    /// Balance owed as of the last checkpoint (defaults to principal)
    #[arg(long)]
    pub amount_owed: Option<u128>,

    /// Settled-through time (epoch seconds or RFC3339; defaults to start)
    #[arg(long)]
    pub paid_through: Option<String>,

    /// Current time (epoch seconds or RFC3339)
    #[arg(long)]
    pub now: String,

    /// Token decimal places for display
    #[arg(long, default_value_t = 0)]
    pub decimals: u32,
}

impl LoanArgs {
    pub fn resolve(&self) -> Result<(LoanTerms, LoanState, u64), Box<dyn std::error::Error>> {
        let start_time = parse_timestamp(&self.start)?;
        let terms = LoanTerms {
            principal: self.principal,
            rate_bips: self.rate_bips,
            default_rate_bips: self.default_rate_bips,
            fee_bips: self.fee_bips,
            period: self.period,
            installments: self.installments,
            start_time,
        };
        let paid_through = match &self.paid_through {
            Some(raw) => parse_timestamp(raw)?,
            None => start_time,
        };
        let state = LoanState {
            amount_owed: self.amount_owed.unwrap_or(self.principal),
            paid_through,
        };
        let now = parse_timestamp(&self.now)?;
        Ok((terms, state, now))
    }
}

/// Arguments for debt computation
#[derive(Args)]
pub struct ComputeDebtArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for the charge breakdown
#[derive(Args)]
pub struct ChargesArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Treat the query as a repayment-amount check (nothing due before
    /// paid_through)
    #[arg(long)]
    pub repayment_check: bool,
}

pub fn run_compute_debt(args: ComputeDebtArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (terms, state, now) = args.loan.resolve()?;
    let model = args.loan.model.to_model(args.loan.pro_rata);
    let breakdown = model.compute_debt(&terms, &state, now)?;
    Ok(json!({
        "result": {
            "debt": breakdown.debt,
            "fee_interest": breakdown.fee_interest,
            "lender_interest": breakdown.lender_interest,
            "debt_display": format_amount(breakdown.debt, args.loan.decimals),
        },
        "model": model,
    }))
}

pub fn run_charges(args: ChargesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (terms, state, now) = args.loan.resolve()?;
    let model = args.loan.model.to_model(args.loan.pro_rata);
    let charges = model.compute_interest_and_fees(&terms, &state, now, args.repayment_check)?;
    Ok(json!({
        "result": {
            "past_interest": charges.past_interest,
            "past_fee": charges.past_fee,
            "current_interest": charges.current_interest,
            "current_fee": charges.current_fee,
            "total": charges.total(),
            "total_display": format_amount(charges.total(), args.loan.decimals),
        },
        "model": model,
    }))
}
