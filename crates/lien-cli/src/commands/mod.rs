pub mod debt;
pub mod distribute;
pub mod pay;

use chrono::DateTime;
use clap::ValueEnum;
use rust_decimal::Decimal;

use lien_core::interest::InterestModel;

/// Accrual strategy selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModelArg {
    /// Continuously-compounding on the whole balance
    Compounding,
    /// Flat simple-interest charge per installment
    Fixed,
    /// Installment model with the current period pro-rated
    ProRated,
}

impl ModelArg {
    pub fn to_model(self, pro_rata: bool) -> InterestModel {
        match self {
            ModelArg::Compounding => InterestModel::Compounding,
            ModelArg::Fixed => InterestModel::FixedInstallment,
            ModelArg::ProRated => InterestModel::ProRatedInstallment { pro_rata },
        }
    }
}

/// Accept either epoch seconds or an RFC3339 timestamp.
pub fn parse_timestamp(raw: &str) -> Result<u64, Box<dyn std::error::Error>> {
    if let Ok(seconds) = raw.parse::<u64>() {
        return Ok(seconds);
    }
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| format!("'{raw}' is neither epoch seconds nor RFC3339: {e}"))?;
    let seconds = parsed.timestamp();
    if seconds < 0 {
        return Err(format!("'{raw}' is before the epoch").into());
    }
    Ok(seconds as u64)
}

/// Render a smallest-unit amount with a token's decimal places.
pub fn format_amount(amount: u128, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    // Decimal holds a 96-bit mantissa and scales up to 28; fall back to the
    // raw integer outside that range
    const MAX_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;
    if amount > MAX_MANTISSA || decimals > 28 {
        return amount.to_string();
    }
    Decimal::from_i128_with_scale(amount as i128, decimals).to_string()
}
