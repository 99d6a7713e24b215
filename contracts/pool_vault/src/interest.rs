use crate::storage::{BASIS_POINTS, SECONDS_PER_YEAR};

/// Projected simple interest over the lock period
///
/// Formula: principal × rate_bps × lock_seconds / (10,000 × 365 days)
///
/// Example:
/// - principal: 10,000, rate: 2000 bps, lock: 30 days
/// - interest: 10,000 × 2000 × 2,592,000 / (10,000 × 31,536,000) ≈ 164.38
pub fn projected_interest(principal: i128, rate_bps: u32, lock_seconds: u64) -> Option<i128> {
    let denominator = BASIS_POINTS.checked_mul(SECONDS_PER_YEAR as i128)?;

    principal
        .checked_mul(rate_bps as i128)?
        .checked_mul(lock_seconds as i128)?
        .checked_div(denominator)
}

/// Shares minted for a deposit, priced against the pool's current state
///
/// First deposit (zero supply) bootstraps 1:1. A zero deposited total with
/// nonzero supply can only occur after every prior position fully exited;
/// the same 1:1 fallback applies rather than dividing by zero.
///
/// Otherwise: shares = scaled_amount × supply / total_deposited_scaled.
/// Both sides of the ratio are in ledger scale and move together with every
/// mint and burn, so the price basis is never stale.
pub fn shares_for_deposit(
    scaled_amount: i128,
    share_supply: i128,
    total_deposited_scaled: i128,
) -> Option<i128> {
    if share_supply == 0 || total_deposited_scaled == 0 {
        return Some(scaled_amount);
    }

    scaled_amount
        .checked_mul(share_supply)?
        .checked_div(total_deposited_scaled)
}

/// Split freshly issued shares into the tax leg and the user leg
///
/// tax = shares × tax_rate_bps / 10,000; user = shares − tax
pub fn split_tax(shares: i128, tax_rate_bps: u32) -> Option<(i128, i128)> {
    let tax = shares
        .checked_mul(tax_rate_bps as i128)?
        .checked_div(BASIS_POINTS)?;
    let user = shares.checked_sub(tax)?;
    Some((user, tax))
}

/// One leg's proportional claim on a position's interest
///
/// leg_amount = interest × leg_shares / total_shares
pub fn leg_amount(interest: i128, leg_shares: i128, total_shares: i128) -> Option<i128> {
    if total_shares == 0 {
        return Some(0);
    }

    interest
        .checked_mul(leg_shares)?
        .checked_div(total_shares)
}
