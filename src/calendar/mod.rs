mod block;
mod error;

pub use block::Block;
pub use error::CalendarError;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::limits::MAX_HORIZON_HOURS;
use crate::model::{HOUR_MS, Ms, Span, next_hour_boundary};

/// Hours a calendar can address. Bounds `blocks` at a few KiB.
pub const MAX_CALENDAR_HOURS: u64 = MAX_HORIZON_HOURS;

fn check_rate(rate: f64) -> Result<(), CalendarError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(CalendarError::InvalidRate(rate));
    }
    Ok(())
}

/// What cancelling an hour that is not reserved does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Free hours are cleared again; nothing is reported.
    #[default]
    Lenient,
    /// Any free hour in the range rejects the whole cancellation.
    Strict,
}

impl std::str::FromStr for CancelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(CancelPolicy::Lenient),
            "strict" => Ok(CancelPolicy::Strict),
            other => Err(format!("unknown cancel policy: {other}")),
        }
    }
}

/// Inclusive range of hour offsets from a calendar origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub first: u64,
    pub last: u64,
}

impl HourRange {
    pub fn new(first: u64, last: u64) -> Self {
        debug_assert!(first <= last, "HourRange first must not exceed last");
        Self { first, last }
    }

    /// Number of hours, counting both ends.
    pub fn len(&self) -> u64 {
        self.last - self.first + 1
    }

    pub fn contains(&self, hour: u64) -> bool {
        self.first <= hour && hour <= self.last
    }
}

/// Flat persistence shape of a calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub origin: Ms,
    pub rate: f64,
    pub blocks: Vec<u64>,
}

/// Hourly occupancy bitmap anchored at an hour-aligned origin.
///
/// Bit `i` of `blocks[b]` is set iff hour `b * B::BITS + i` after `origin`
/// is reserved. The calendar does not know which booking owns an hour, so a
/// cancellation must name the same range that was booked.
///
/// `blocks` grows on demand and never shrinks. A successful booking or any
/// cancellation leaves it long enough to cover the last hour it named.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar<B: Block = u64> {
    origin: Ms,
    rate: f64,
    blocks: Vec<B>,
    cancel_policy: CancelPolicy,
}

impl<B: Block> Calendar<B> {
    /// Open a calendar at the first hour boundary after `now`.
    pub fn new(now: Ms, rate: f64) -> Result<Self, CalendarError> {
        check_rate(rate)?;
        Ok(Self::from_parts(next_hour_boundary(now), rate, Vec::new()))
    }

    fn from_parts(origin: Ms, rate: f64, blocks: Vec<B>) -> Self {
        Self {
            origin,
            rate,
            blocks,
            cancel_policy: CancelPolicy::default(),
        }
    }

    pub fn with_cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.cancel_policy = policy;
        self
    }

    pub fn set_cancel_policy(&mut self, policy: CancelPolicy) {
        self.cancel_policy = policy;
    }

    pub fn cancel_policy(&self) -> CancelPolicy {
        self.cancel_policy
    }

    pub fn origin(&self) -> Ms {
        self.origin
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f64) -> Result<(), CalendarError> {
        check_rate(rate)?;
        self.rate = rate;
        Ok(())
    }

    pub fn blocks(&self) -> &[B] {
        &self.blocks
    }

    /// Hours covered by the allocated words.
    pub fn horizon_hours(&self) -> u64 {
        self.blocks.len() as u64 * u64::from(B::BITS)
    }

    /// Whole hours from the origin to `t`, floored. Negative before the origin.
    pub fn hour_offset(&self, t: Ms) -> i64 {
        t.saturating_sub(self.origin).div_euclid(HOUR_MS)
    }

    /// Instant at which hour offset `hour` begins.
    pub fn hour_start(&self, hour: u64) -> Ms {
        self.origin + hour as Ms * HOUR_MS
    }

    /// Half-open span covering every hour of `range`.
    pub fn range_span(&self, range: HourRange) -> Span {
        Span::new(self.hour_start(range.first), self.hour_start(range.last + 1))
    }

    /// Map `[start, end]` to hour offsets. `end` lies inside the last hour.
    pub fn hour_range(&self, start: Ms, end: Ms) -> Result<HourRange, CalendarError> {
        let first = self.hour_offset(start);
        let last = self.hour_offset(end);
        if last < first || first < 0 {
            return Err(CalendarError::InvalidRange { first, last });
        }
        if last >= MAX_CALENDAR_HOURS as i64 {
            return Err(CalendarError::TooFar { hour: last });
        }
        Ok(HourRange::new(first as u64, last as u64))
    }

    pub fn is_reserved(&self, hour: u64) -> bool {
        let bits = u64::from(B::BITS);
        self.word((hour / bits) as usize).is_set((hour % bits) as u32)
    }

    /// Total number of reserved hours.
    pub fn reserved_hours(&self) -> u64 {
        self.blocks.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    /// Maximal runs of consecutive reserved hours, in order.
    pub fn reserved_runs(&self) -> Vec<HourRange> {
        let bits = u64::from(B::BITS);
        let mut runs: Vec<HourRange> = Vec::new();
        for (b, &word) in self.blocks.iter().enumerate() {
            if word == B::ZERO {
                continue;
            }
            for bit in 0..B::BITS {
                if !word.is_set(bit) {
                    continue;
                }
                let hour = b as u64 * bits + u64::from(bit);
                match runs.last_mut() {
                    Some(run) if run.last + 1 == hour => run.last = hour,
                    _ => runs.push(HourRange::new(hour, hour)),
                }
            }
        }
        runs
    }

    /// Price `[start, end]` without booking it.
    pub fn quote(&self, start: Ms, end: Ms) -> Result<f64, CalendarError> {
        let range = self.hour_range(start, end)?;
        self.check_free(range)?;
        Ok(self.price(range))
    }

    /// Reserve every hour from the one containing `start` through the one
    /// containing `end`, returning `rate * hours`.
    ///
    /// All-or-nothing: the whole range is checked before any bit is set, and
    /// a rejected call leaves the calendar untouched.
    pub fn add_reservation(&mut self, start: Ms, end: Ms) -> Result<f64, CalendarError> {
        let range = self.hour_range(start, end)?;
        // Missing words read as free, so growth can wait for the commit.
        self.check_free(range)?;
        self.grow_to(range.last);
        for (b, mask) in block_masks::<B>(range) {
            if mask == B::ONES {
                self.blocks[b] = B::ONES;
            } else {
                self.blocks[b] |= mask;
            }
        }
        Ok(self.price(range))
    }

    /// Free every hour from the one containing `start` through the one
    /// containing `end`. Pricing and refunds are up to the caller.
    pub fn remove_reservation(&mut self, start: Ms, end: Ms) -> Result<(), CalendarError> {
        let range = self.hour_range(start, end)?;
        if self.cancel_policy == CancelPolicy::Strict {
            self.check_reserved(range)?;
        }
        self.grow_to(range.last);
        for (b, mask) in block_masks::<B>(range) {
            if mask == B::ONES {
                self.blocks[b] = B::ZERO;
            } else {
                self.blocks[b] &= !mask;
            }
        }
        Ok(())
    }

    pub fn to_record(&self) -> CalendarRecord {
        CalendarRecord {
            origin: self.origin,
            rate: self.rate,
            blocks: self.blocks.iter().map(|w| w.to_word()).collect(),
        }
    }

    /// Rebuild a calendar exactly as stored. `origin` is taken as-is.
    pub fn from_record(record: CalendarRecord) -> Result<Self, CalendarError> {
        check_rate(record.rate)?;
        let blocks = record
            .blocks
            .into_iter()
            .map(|w| B::from_word(w).ok_or(CalendarError::WordOverflow(w)))
            .collect::<Result<Vec<B>, _>>()?;
        Ok(Self::from_parts(record.origin, record.rate, blocks))
    }

    fn word(&self, b: usize) -> B {
        self.blocks.get(b).copied().unwrap_or(B::ZERO)
    }

    fn check_free(&self, range: HourRange) -> Result<(), CalendarError> {
        for (b, mask) in block_masks::<B>(range) {
            if let Some(bit) = (self.word(b) & mask).first_set() {
                return Err(CalendarError::Conflict {
                    hour: b as u64 * u64::from(B::BITS) + u64::from(bit),
                });
            }
        }
        Ok(())
    }

    fn check_reserved(&self, range: HourRange) -> Result<(), CalendarError> {
        for (b, mask) in block_masks::<B>(range) {
            if let Some(bit) = (!self.word(b) & mask).first_set() {
                return Err(CalendarError::NotReserved {
                    hour: b as u64 * u64::from(B::BITS) + u64::from(bit),
                });
            }
        }
        Ok(())
    }

    fn grow_to(&mut self, hour: u64) {
        let needed = (hour / u64::from(B::BITS)) as usize + 1;
        if self.blocks.len() < needed {
            self.blocks.resize(needed, B::ZERO);
        }
    }

    fn price(&self, range: HourRange) -> f64 {
        self.rate * range.len() as f64
    }
}

/// Words touched by `range`, each with the bits of `range` it holds.
/// Interior words get `B::ONES`.
fn block_masks<B: Block>(range: HourRange) -> impl Iterator<Item = (usize, B)> {
    let bits = u64::from(B::BITS);
    let first_block = range.first / bits;
    let last_block = range.last / bits;
    (first_block..=last_block).map(move |b| {
        let lo = if b == first_block { (range.first % bits) as u32 } else { 0 };
        let hi = if b == last_block {
            (range.last % bits) as u32
        } else {
            B::BITS - 1
        };
        (b as usize, B::mask(lo, hi))
    })
}

impl<B: Block> Serialize for Calendar<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de, B: Block> Deserialize<'de> for Calendar<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = CalendarRecord::deserialize(deserializer)?;
        Calendar::from_record(record).map_err(serde::de::Error::custom)
    }
}
