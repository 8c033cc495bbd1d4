use std::cmp;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minutes since the Unix epoch, or a duration in minutes.
pub type Minutes = i64;

/// An inclusive `[start, end]` interval of minutes.
///
/// Used both for an order's delivery window and for the departure interval of
/// a route. The window is empty when `start > end`.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: Minutes,
    end: Minutes,
}

impl TimeWindow {
    pub const UNBOUNDED: TimeWindow = TimeWindow {
        start: Minutes::MIN,
        end: Minutes::MAX,
    };

    pub const fn new(start: Minutes, end: Minutes) -> Self {
        TimeWindow { start, end }
    }

    /// Everything from `start` onwards.
    pub const fn starting_at(start: Minutes) -> Self {
        TimeWindow {
            start,
            end: Minutes::MAX,
        }
    }

    pub const fn start(&self) -> Minutes {
        self.start
    }

    pub const fn end(&self) -> Minutes {
        self.end
    }

    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub const fn contains(&self, minute: Minutes) -> bool {
        self.start <= minute && minute <= self.end
    }

    pub fn intersect(&self, other: &TimeWindow) -> TimeWindow {
        TimeWindow {
            start: cmp::max(self.start, other.start),
            end: cmp::min(self.end, other.end),
        }
    }

    /// Moves both bounds by `delta`, saturating at the ends of the time axis so
    /// that open bounds stay open.
    pub fn shift(&self, delta: Minutes) -> TimeWindow {
        TimeWindow {
            start: self.start.saturating_add(delta),
            end: self.end.saturating_add(delta),
        }
    }
}

#[derive(Default)]
pub struct TimeWindowBuilder {
    start: Option<Minutes>,
    end: Option<Minutes>,
}

impl TimeWindowBuilder {
    pub fn with_start(mut self, start: Minutes) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: Minutes) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_timestamps(mut self, start: jiff::Timestamp, end: jiff::Timestamp) -> Self {
        self.start = Some(minutes_from_timestamp(start));
        self.end = Some(minutes_from_timestamp(end));
        self
    }

    pub fn build(self) -> TimeWindow {
        TimeWindow {
            start: self.start.unwrap_or(Minutes::MIN),
            end: self.end.unwrap_or(Minutes::MAX),
        }
    }
}

/// Whole minutes since the Unix epoch, rounding towards negative infinity.
pub fn minutes_from_timestamp(timestamp: jiff::Timestamp) -> Minutes {
    timestamp.as_second().div_euclid(60)
}

pub fn timestamp_from_minutes(minutes: Minutes) -> Option<jiff::Timestamp> {
    minutes
        .checked_mul(60)
        .and_then(|seconds| jiff::Timestamp::from_second(seconds).ok())
}
