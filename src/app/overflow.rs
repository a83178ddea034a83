//! Deferred overflow measurement for a rendered text block. The
//! measurement runs once, a short delay after mount, so layout has
//! settled; the pending deadline is dropped on unmount so a late tick
//! can never mutate state for a block that is gone.

use std::time::{Duration, Instant};

pub(crate) const MEASURE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OverflowState {
    pub(crate) expanded: bool,
    pub(crate) overflowing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeasurePhase {
    Idle,
    Scheduled { fire_at: Instant },
    Settled,
}

#[derive(Debug)]
pub(crate) struct OverflowDetector {
    phase: MeasurePhase,
    expanded: bool,
    overflowing: bool,
}

impl OverflowDetector {
    pub(crate) fn new() -> Self {
        Self {
            phase: MeasurePhase::Idle,
            expanded: false,
            overflowing: false,
        }
    }

    /// Arms the one-shot measurement. Mounting again while armed or
    /// settled changes nothing; deadlines never accumulate.
    pub(crate) fn mount(&mut self, now: Instant) {
        if self.phase == MeasurePhase::Idle {
            self.phase = MeasurePhase::Scheduled {
                fire_at: now + MEASURE_DELAY,
            };
        }
    }

    /// Unmount: drops any pending deadline and resets to the initial
    /// state. Required on every teardown path.
    pub(crate) fn cancel(&mut self) {
        self.phase = MeasurePhase::Idle;
        self.expanded = false;
        self.overflowing = false;
    }

    /// Runs the measurement once the armed deadline has passed. Ticks
    /// while idle or settled are no-ops.
    pub(crate) fn on_tick(&mut self, now: Instant, content_lines: u16, container_lines: u16) {
        let MeasurePhase::Scheduled { fire_at } = self.phase else {
            return;
        };
        if now < fire_at {
            return;
        }
        self.overflowing = content_lines > container_lines;
        self.phase = MeasurePhase::Settled;
    }

    /// Explicit user action only; does not re-trigger measurement.
    pub(crate) fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub(crate) fn state(&self) -> OverflowState {
        OverflowState {
            expanded: self.expanded,
            overflowing: self.overflowing,
        }
    }
}

/// Rows a text block occupies when word-wrapped at `width`, counted the
/// same way the paragraphs render: one row minimum per input line,
/// oversized tokens wrapping hard.
pub(crate) fn wrapped_line_count(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let width = usize::from(width);
    let mut total: usize = 0;
    for raw_line in text.lines() {
        let mut rows = 1usize;
        let mut used = 0usize;
        for word in raw_line.split_whitespace() {
            let len = word.chars().count();
            if len > width {
                if used > 0 {
                    rows += 1;
                }
                rows += (len - 1) / width;
                used = ((len - 1) % width) + 1;
            } else if used == 0 {
                used = len;
            } else if used + 1 + len <= width {
                used += 1 + len;
            } else {
                rows += 1;
                used = len;
            }
        }
        total += rows;
    }
    total.min(usize::from(u16::MAX)) as u16
}
