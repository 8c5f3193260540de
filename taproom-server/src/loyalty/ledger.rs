//! Ledger accrual arithmetic
//!
//! A customer's ledger is the pair (`beer_count`, `free_beers`).
//! Every credit adds to `beer_count`; when the running count reaches
//! the campaign threshold, exactly one threshold's worth is folded
//! into one free beer. A single credit can award at most one reward
//! no matter how large its quantity is.

/// Result of applying a credit to a customer ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualOutcome {
    /// New running count toward the next reward
    pub beer_count: i64,
    /// New earned-reward balance
    pub free_beers: i64,
    /// Whether this credit crossed the threshold
    pub reward_earned: bool,
}

/// Apply a credit of `quantity` drinks to a ledger.
///
/// The threshold is subtracted at most once per call: crediting 25
/// drinks at threshold 10 leaves `old + 15`, not `old + 5`. That
/// matches the campaign rule that one visit earns one reward.
pub fn apply_accrual(
    beer_count: i64,
    free_beers: i64,
    quantity: i64,
    threshold: i64,
) -> AccrualOutcome {
    debug_assert!(quantity >= 1);
    debug_assert!(threshold >= 1);

    let mut count = beer_count + quantity;
    let mut free = free_beers;
    let reward_earned = count >= threshold;
    if reward_earned {
        count -= threshold;
        free += 1;
    }

    AccrualOutcome {
        beer_count: count,
        free_beers: free,
        reward_earned,
    }
}

/// Counts at which a gift scan may fire.
///
/// The reward button sets the count to the threshold; if the bar is
/// busy the counter may have been bumped once more before the code is
/// scanned, hence the +1 tolerance. Matches the printed campaign
/// cards, which assume the standard threshold of 10.
pub const GIFT_SCAN_COUNTS: [i64; 2] = [10, 11];

/// Whether a gift scan is allowed at the given running count
pub fn gift_scan_allowed(beer_count: i64) -> bool {
    GIFT_SCAN_COUNTS.contains(&beer_count)
}
