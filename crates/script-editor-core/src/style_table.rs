//! Sorted interval table for styled character ranges.
//!
//! Intervals are kept sorted by start offset, together with a prefix maximum of their end
//! offsets. The prefix maximum lets point and range queries stop scanning as soon as no earlier
//! interval can reach the query, so lookups stay O(log n + k) for the disjoint ranges a token
//! stream produces.

use crate::marks::StyleMarker;

/// A styled half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleInterval {
    /// Inclusive start char offset.
    pub start: usize,
    /// Exclusive end char offset.
    pub end: usize,
    /// Marker painted over the range.
    pub marker: StyleMarker,
}

impl StyleInterval {
    /// Create an interval.
    pub fn new(start: usize, end: usize, marker: StyleMarker) -> Self {
        Self { start, end, marker }
    }

    /// Check if the interval contains `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Style intervals indexed for point and range queries.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    intervals: Vec<StyleInterval>,
    /// `prefix_max_end[i] = max(intervals[0..=i].end)`
    prefix_max_end: Vec<usize>,
}

impl StyleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from intervals in any order. Empty intervals are dropped.
    pub fn from_intervals(mut intervals: Vec<StyleInterval>) -> Self {
        intervals.retain(|i| i.start < i.end);
        intervals.sort_by_key(|i| (i.start, i.end));

        let mut prefix_max_end = Vec::with_capacity(intervals.len());
        let mut max_end = 0;
        for interval in &intervals {
            max_end = max_end.max(interval.end);
            prefix_max_end.push(max_end);
        }

        Self {
            intervals,
            prefix_max_end,
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.intervals.clear();
        self.prefix_max_end.clear();
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// All intervals, sorted by start.
    pub fn iter(&self) -> impl Iterator<Item = &StyleInterval> {
        self.intervals.iter()
    }

    /// Intervals containing `offset`.
    pub fn query_point(&self, offset: usize) -> Vec<&StyleInterval> {
        // First index whose start is > offset; everything that can contain `offset` is before it.
        let upper = self.intervals.partition_point(|i| i.start <= offset);

        let mut result = Vec::new();
        for idx in (0..upper).rev() {
            if self.prefix_max_end[idx] <= offset {
                break;
            }
            let interval = &self.intervals[idx];
            if interval.contains(offset) {
                result.push(interval);
            }
        }
        result.reverse();
        result
    }

    /// Intervals overlapping `[start, end)`.
    pub fn query_range(&self, start: usize, end: usize) -> Vec<&StyleInterval> {
        if start >= end {
            return Vec::new();
        }

        let upper = self.intervals.partition_point(|i| i.start < end);
        let mut lower = self.intervals[..upper].partition_point(|i| i.start < start);
        while lower > 0 && self.prefix_max_end[lower - 1] > start {
            lower -= 1;
        }

        self.intervals[lower..upper]
            .iter()
            .filter(|i| i.end > start)
            .collect()
    }
}
