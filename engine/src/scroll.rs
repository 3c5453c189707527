//! Looping auto-scroll for the open-ticket list.

use std::time::Duration;

/// Rows each ticket occupies in the list: headline, status, spacer.
pub const ROWS_PER_TICKET: usize = 3;

/// Row offset into an endlessly repeating list.
///
/// The list is conceptually rendered twice back to back; once the offset
/// reaches the height of one copy it wraps to zero, which is visually seamless.
/// Scrolling only runs while the list is taller than the viewport.
#[derive(Debug, Clone)]
pub struct AutoScroll {
    offset: usize,
    carry: Duration,
    step: Duration,
    viewport_rows: usize,
    paused: bool,
}

impl AutoScroll {
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            offset: 0,
            carry: Duration::ZERO,
            step: step.max(Duration::from_millis(1)),
            viewport_rows: 0,
            paused: false,
        }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.carry = Duration::ZERO;
    }

    /// Height available to the list, reported by the renderer each frame.
    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport_rows = rows;
    }

    /// Whether a list of `cycle_rows` rows needs to scroll at all.
    #[must_use]
    pub fn is_scrolling(&self, cycle_rows: usize) -> bool {
        cycle_rows > self.viewport_rows
    }

    /// Advance by `delta` of elapsed time through a list `cycle_rows` tall.
    pub fn advance(&mut self, delta: Duration, cycle_rows: usize) {
        if !self.is_scrolling(cycle_rows) {
            self.offset = 0;
            self.carry = Duration::ZERO;
            return;
        }

        // The list may have shrunk since the last frame.
        self.offset %= cycle_rows;

        if self.paused {
            return;
        }

        self.carry = self.carry.saturating_add(delta);
        let steps = self.carry.as_nanos() / self.step.as_nanos();
        if steps == 0 {
            return;
        }
        self.carry -= self.step * (steps as u32);
        self.offset = ((self.offset as u128 + steps) % cycle_rows as u128) as usize;
    }
}
