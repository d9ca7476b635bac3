//! Signed 1e18 fixed-point ("wad") arithmetic on `i128`.
//!
//! All interest math runs through these primitives. Everything is integer
//! arithmetic with truncation toward zero, so results are bit-reproducible
//! across platforms. No `f64` anywhere.

use crate::error::LienError;
use crate::types::{Amount, Bips, Timestamp, Wad};
use crate::LienResult;

/// One whole unit in wad scale.
pub const WAD: Wad = 1_000_000_000_000_000_000;
/// Basis points per whole (10_000 bips = 100%).
pub const BPS_DIVISOR: Wad = 10_000;
/// Year basis for annualized rates: 365 days.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

const WAD_U128: u128 = WAD as u128;

/// Largest exponent `wad_exp` accepts. e^42 in wad scale still fits `i128`;
/// anything above it cannot be represented.
const MAX_EXP_INPUT: Wad = 42 * WAD;

/// Taylor terms evaluated after argument halving to `x <= WAD/2`. The series
/// tail is below 1e-18 resolution well before this bound.
const EXP_TAYLOR_TERMS: i128 = 32;

fn overflow(context: &str) -> LienError {
    LienError::ArithmeticOverflow {
        context: context.to_string(),
    }
}

/// Wad-scale multiply: `a * b / 1e18`, truncating.
pub fn wad_mul(a: Wad, b: Wad) -> LienResult<Wad> {
    a.checked_mul(b)
        .map(|p| p / WAD)
        .ok_or_else(|| overflow("wad_mul"))
}

/// Wad-scale multiply for non-negative operands, widened through limb
/// splitting. The squaring step of `wad_exp` feeds intermediates whose raw
/// `a * b` product no longer fits `i128` even though `a * b / 1e18` does.
fn wad_mul_wide(a: Wad, b: Wad) -> LienResult<Wad> {
    debug_assert!(a >= 0 && b >= 0);
    let (ah, al) = (a / WAD, a % WAD);
    let (bh, bl) = (b / WAD, b % WAD);
    // a * b / WAD == ah*bh*WAD + ah*bl + al*bh + al*bl/WAD
    let mut acc = ah
        .checked_mul(bh)
        .and_then(|p| p.checked_mul(WAD))
        .ok_or_else(|| overflow("wad_mul_wide"))?;
    acc = ah
        .checked_mul(bl)
        .and_then(|p| acc.checked_add(p))
        .ok_or_else(|| overflow("wad_mul_wide"))?;
    acc = al
        .checked_mul(bh)
        .and_then(|p| acc.checked_add(p))
        .ok_or_else(|| overflow("wad_mul_wide"))?;
    acc.checked_add(al * bl / WAD)
        .ok_or_else(|| overflow("wad_mul_wide"))
}

/// Wad-scale divide: `a * 1e18 / b`, truncating.
pub fn wad_div(a: Wad, b: Wad) -> LienResult<Wad> {
    if b == 0 {
        return Err(LienError::DivisionByZero {
            context: "wad_div".into(),
        });
    }
    a.checked_mul(WAD)
        .map(|p| p / b)
        .ok_or_else(|| overflow("wad_div"))
}

/// Convert annualized basis points to a wad-scale fraction of one.
pub fn bips_to_wad(bips: Bips) -> Wad {
    bips as Wad * WAD / BPS_DIVISOR
}

/// Deterministic integer exponential: `e^(x / 1e18)` in wad scale.
///
/// The argument is halved until it is at most one half, the Taylor series is
/// summed there (where every intermediate product fits comfortably), and the
/// result is squared back up. Negative arguments go through the reciprocal;
/// arguments below `-MAX_EXP_INPUT` truncate to zero.
pub fn wad_exp(x: Wad) -> LienResult<Wad> {
    if x < 0 {
        if x <= -MAX_EXP_INPUT {
            return Ok(0);
        }
        let positive = wad_exp(-x)?;
        return wad_div(WAD, positive);
    }
    if x > MAX_EXP_INPUT {
        return Err(overflow("wad_exp"));
    }

    let mut halvings = 0u32;
    let mut y = x;
    while y > WAD / 2 {
        y /= 2;
        halvings += 1;
    }

    let mut sum = WAD;
    let mut term = WAD;
    for k in 1..EXP_TAYLOR_TERMS {
        term = wad_mul(term, y)? / k;
        if term == 0 {
            break;
        }
        sum += term;
    }

    let mut result = sum;
    for _ in 0..halvings {
        result = wad_mul_wide(result, result)?;
    }
    Ok(result)
}

/// Fraction of a year at `rate_bips` over `[start, end]`, in wad scale.
///
/// `end < start` is invalid input, not an underflow.
pub fn rate_fraction(rate_bips: Bips, start: Timestamp, end: Timestamp) -> LienResult<Wad> {
    if end < start {
        return Err(LienError::InvalidInterval { start, end });
    }
    let elapsed = (end - start) as i128;
    bips_to_wad(rate_bips)
        .checked_mul(elapsed)
        .map(|p| p / SECONDS_PER_YEAR as i128)
        .ok_or_else(|| overflow("rate_fraction"))
}

/// Scale an amount by a non-negative wad factor, truncating to the smallest
/// currency unit.
///
/// Split into high and low wad limbs so that amounts near the top of `u128`
/// survive multiplication by factors above one.
pub fn mul_amount_wad(amount: Amount, factor: Wad) -> LienResult<Amount> {
    if factor < 0 {
        return Err(LienError::InvalidInput {
            field: "factor".into(),
            reason: "Amount scaling factor cannot be negative.".into(),
        });
    }
    let f = factor as u128;
    let hi = amount / WAD_U128;
    let lo = amount % WAD_U128;
    let hi_part = hi
        .checked_mul(f)
        .ok_or_else(|| overflow("mul_amount_wad"))?;
    let lo_part = lo
        .checked_mul(f)
        .ok_or_else(|| overflow("mul_amount_wad"))?
        / WAD_U128;
    hi_part
        .checked_add(lo_part)
        .ok_or_else(|| overflow("mul_amount_wad"))
}

/// Continuously compound `amount` at `rate_bips` over `[start, end]`:
/// `amount * e^(rate * elapsed / year)`.
///
/// A zero-length interval or a zero rate is the identity.
pub fn compound(amount: Amount, rate_bips: Bips, start: Timestamp, end: Timestamp) -> LienResult<Amount> {
    let fraction = rate_fraction(rate_bips, start, end)?;
    if fraction == 0 {
        return Ok(amount);
    }
    let factor = wad_exp(fraction)?;
    mul_amount_wad(amount, factor)
}
