use clap::Args;
use serde_json::{json, Value};

use lien_core::waterfall;
use lien_core::{Asset, DistributionTranche, TrancheKind};

use super::format_amount;

/// Arguments for the payment waterfall
#[derive(Args)]
pub struct DistributeArgs {
    /// Payment amount, smallest currency unit
    #[arg(long)]
    pub amount: u128,

    /// Principal claim
    #[arg(long)]
    pub principal: u128,

    /// Interest claim
    #[arg(long)]
    pub interest: u128,

    /// Fee claim
    #[arg(long)]
    pub fee: u128,

    /// Asset code the payment is denominated in
    #[arg(long, default_value = "USDC")]
    pub asset: String,

    #[arg(long, default_value = "lender")]
    pub lender: String,

    #[arg(long, default_value = "fee-recipient")]
    pub fee_recipient: String,

    #[arg(long, default_value = "payer")]
    pub primary_payer: String,

    #[arg(long, default_value = "residual-payer")]
    pub residual_payer: String,

    #[arg(long, default_value = "payer")]
    pub residual_recipient: String,

    /// Token decimal places for display
    #[arg(long, default_value_t = 0)]
    pub decimals: u32,
}

pub fn run_distribute(args: DistributeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let debt = args
        .principal
        .checked_add(args.interest)
        .and_then(|sum| sum.checked_add(args.fee))
        .ok_or("tranche amounts overflow when summed")?;
    let transfers = waterfall::distribute(
        &Asset::fungible(args.asset.clone()),
        args.amount,
        debt,
        DistributionTranche {
            kind: TrancheKind::Principal,
            amount: args.principal,
            recipient: args.lender.clone(),
        },
        DistributionTranche {
            kind: TrancheKind::Interest,
            amount: args.interest,
            recipient: args.lender.clone(),
        },
        DistributionTranche {
            kind: TrancheKind::Fee,
            amount: args.fee,
            recipient: args.fee_recipient.clone(),
        },
        &args.primary_payer,
        &args.residual_payer,
        &args.residual_recipient,
    )?;

    let movements: Vec<Value> = transfers
        .iter()
        .map(|t| {
            json!({
                "asset": t.asset.code,
                "from": t.from,
                "to": t.to,
                "amount": t.amount,
                "amount_display": format_amount(t.amount, args.decimals),
            })
        })
        .collect();

    Ok(json!({
        "result": movements,
        "debt": debt,
        "amount": args.amount,
    }))
}
