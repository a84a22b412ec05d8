//! Solid-span occlusion map.
//!
//! A sorted, disjoint list of screen-column ranges already fully covered by
//! nearer opaque walls. Two open-ended sentinel spans bracket the visible
//! area so every lookup finds a neighbour without edge cases. Ranges that
//! merely touch (`last` of one == `first` of the next minus one) count as
//! overlapping and coalesce, which is also what keeps the list inside its
//! bound: `width / 2 + 1` entries is the most that alternating one-pixel
//! solid/open columns can ever produce, sentinels included.

use crate::engine::RenderError;
use smallvec::SmallVec;

/// Inclusive range of occluded screen columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRange {
    pub first: i32,
    pub last: i32,
}

pub struct SolidSpans {
    spans: Vec<ClipRange>,
    capacity: usize,
    width: i32,
}

impl SolidSpans {
    pub fn new(width: usize) -> Self {
        let capacity = width / 2 + 1;
        let mut s = SolidSpans {
            spans: Vec::with_capacity(capacity),
            capacity,
            width: width as i32,
        };
        s.reset();
        s
    }

    /// Start-of-frame state: every column in `[0, width)` open.
    pub fn reset(&mut self) {
        self.spans.clear();
        self.spans.push(ClipRange {
            first: i32::MIN,
            last: -1,
        });
        self.spans.push(ClipRange {
            first: self.width,
            last: i32::MAX,
        });
    }

    pub fn spans(&self) -> &[ClipRange] {
        &self.spans
    }

    /// Occlude `[first, last]` for the rest of the frame, coalescing with
    /// any overlapping or touching span.
    ///
    /// Fails without mutating when the list would outgrow its bound; that
    /// means the scene holds more distinct wall fragments than are possible
    /// for the configured width, i.e. the bound was computed for a
    /// different width than the columns being fed in.
    pub fn mark_solid(&mut self, first: i32, last: i32) -> Result<(), RenderError> {
        debug_assert!(first <= last);

        // Skip spans ending left of ours, non-touching.
        let mut i = 0;
        while self.spans[i].last < first - 1 {
            i += 1;
        }

        // Swallowed whole by an existing span.
        if first >= self.spans[i].first && last <= self.spans[i].last {
            return Ok(());
        }

        // Coalesce every span that overlaps or touches [first, last].
        let mut merged = ClipRange { first, last };
        let mut j = i;
        while j < self.spans.len() && self.spans[j].first <= last + 1 {
            merged.first = merged.first.min(self.spans[j].first);
            merged.last = merged.last.max(self.spans[j].last);
            j += 1;
        }

        if j == i {
            // Nothing to merge with: the list grows by one.
            if self.spans.len() >= self.capacity {
                return Err(RenderError::SolidSpanOverflow {
                    capacity: self.capacity,
                });
            }
            self.spans.insert(i, merged);
        } else {
            self.spans[i] = merged;
            self.spans.drain(i + 1..j);
        }
        Ok(())
    }

    /// Maximal sub-ranges of `[first, last]` not yet occluded, ascending.
    /// Pure query; pass-through walls use it without occluding.
    pub fn open_ranges(&self, first: i32, last: i32) -> SmallVec<[ClipRange; 8]> {
        let mut out = SmallVec::new();
        let mut lo = first;
        for span in &self.spans {
            if span.last < lo {
                continue;
            }
            if span.first > last {
                break;
            }
            if span.first > lo {
                out.push(ClipRange {
                    first: lo,
                    last: (span.first - 1).min(last),
                });
            }
            lo = lo.max(span.last.saturating_add(1));
            if lo > last {
                break;
            }
        }
        if lo <= last {
            out.push(ClipRange { first: lo, last });
        }
        out
    }

    /// True when one existing span covers all of `[first, last]`. The
    /// bounding-box pruning test during traversal.
    pub fn covers(&self, first: i32, last: i32) -> bool {
        self.spans
            .iter()
            .any(|s| s.first <= first && last <= s.last)
    }
}
