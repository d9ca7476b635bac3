use clap::Args;
use serde_json::{json, Value};

use lien_core::payment::{process_payment, PaymentInput};

use crate::input;

/// Arguments for a full payment checkpoint
#[derive(Args)]
pub struct PayArgs {
    /// Path to a JSON file holding the PaymentInput
    #[arg(long)]
    pub input: String,

    /// Override the payment amount from the file
    #[arg(long)]
    pub amount: Option<u128>,

    /// Override the current time from the file (epoch seconds or RFC3339)
    #[arg(long)]
    pub now: Option<String>,
}

pub fn run_pay(args: PayArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut payment: PaymentInput = input::read_json(&args.input)?;
    if let Some(amount) = args.amount {
        payment.amount = amount;
    }
    if let Some(now) = &args.now {
        payment.now = super::parse_timestamp(now)?;
    }

    let outcome = process_payment(&payment)?;
    Ok(json!({
        "result": {
            "debt": outcome.debt,
            "claims": outcome.claims,
            "new_state": outcome.new_state,
            "transfers": outcome.transfers,
        },
    }))
}
