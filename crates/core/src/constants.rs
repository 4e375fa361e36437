//! Application-wide constants.

/// Stored rates are truncated to this many fractional digits.
pub const RATE_SCALE: u32 = 6;

/// Converted amounts are rounded to this many fractional digits.
pub const AMOUNT_SCALE: u32 = 2;

/// Default number of retries a backfill run attempts after the first failure.
pub const DEFAULT_BACKFILL_RETRIES: u32 = 3;

/// Default pause between backfill attempts, in seconds.
pub const DEFAULT_BACKFILL_DELAY_SECS: u64 = 60;

/// Placeholder rendered for conversion targets with no obtainable rate.
pub const UNAVAILABLE: &str = "N/A";
