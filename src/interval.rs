use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Contiguous, inclusive run of `count` ids starting at `first`. Fields are
/// private so a constructed interval is always valid: `first >= 0`,
/// `count >= 1`, and one past `last()` still fits in an `i64`.
///
/// Ordering is by `first`, then by `count`.
#[must_use]
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    first: i64,
    count: i64,
}

#[derive(Deserialize)]
struct RawInterval {
    first: i64,
    count: i64,
}

impl TryFrom<RawInterval> for Interval {
    type Error = Error;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Self::new(raw.first, raw.count)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.first, self.last())
    }
}

impl Interval {
    pub fn new(first: i64, count: i64) -> Result<Self> {
        if first < 0 {
            return Err(Error::invalid(format!("first must be non-negative: {first}")));
        }
        if count < 1 {
            return Err(Error::invalid(format!("count must be positive: {count}")));
        }
        if first.checked_add(count).is_none() {
            return Err(Error::invalid(format!("interval {first}+{count} overflows the id space")));
        }
        Ok(Self { first, count })
    }

    /// Only for callers that have already established the invariants.
    pub(crate) const fn new_unchecked(first: i64, count: i64) -> Self {
        Self { first, count }
    }

    #[must_use]
    pub const fn first(&self) -> i64 {
        self.first
    }

    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    #[must_use]
    pub const fn last(&self) -> i64 {
        self.first + self.count - 1
    }

    #[must_use]
    pub const fn contains(&self, id: i64) -> bool {
        self.first <= id && id <= self.last()
    }

    /// Whether this interval shares any id with the inclusive span
    /// `[first, last]`.
    #[must_use]
    pub const fn overlaps(&self, first: i64, last: i64) -> bool {
        first <= self.last() && self.first <= last
    }

    #[must_use]
    pub const fn range_inclusive(&self) -> RangeInclusive<i64> {
        self.first..=self.last()
    }
}

impl From<Interval> for RangeInclusive<i64> {
    fn from(r: Interval) -> Self {
        r.range_inclusive()
    }
}

impl TryFrom<RangeInclusive<i64>> for Interval {
    type Error = Error;

    fn try_from(r: RangeInclusive<i64>) -> Result<Self> {
        let (first, last) = r.into_inner();
        if last < first {
            return Err(Error::invalid(format!("empty range {first}..={last}")));
        }
        let count = last
            .checked_sub(first)
            .and_then(|d| d.checked_add(1))
            .ok_or_else(|| Error::invalid(format!("range {first}..={last} is too large")))?;
        Self::new(first, count)
    }
}
