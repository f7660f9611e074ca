use crate::model::Ms;

pub const MAX_NAME_LEN: usize = 256;
pub const MAX_REVIEW_LEN: usize = 4096;
pub const MAX_REVIEWS_PER_SPACE: usize = 10_000;
pub const MAX_SPACES: usize = 100_000;

/// Upper bound for `EngineOptions::horizon_hours`. A year of hours is
/// 138 `u64` words.
pub const MAX_HORIZON_HOURS: u64 = 24 * 366 * 10;
pub const DEFAULT_HORIZON_HOURS: u64 = 24 * 366 * 2;

/// Largest timestamp accepted anywhere (year 9999).
pub const MAX_VALID_TIMESTAMP_MS: Ms = 253_402_300_799_999;
