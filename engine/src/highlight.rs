//! Growth highlights for the category tiles.

use std::time::Duration;

use ticketwall_types::{CategoryCounts, StatusCategory, ui::EffectTimer};

/// Tracks which categories grew in the latest snapshot and for how long their
/// tiles stay highlighted.
///
/// Each category is compared against its own count in the previous snapshot.
/// Before the first snapshot every count is taken as zero, so non-empty
/// categories flash once on startup.
#[derive(Debug, Clone)]
pub struct HighlightTracker {
    previous: CategoryCounts,
    timers: [Option<EffectTimer>; 4],
    duration: Duration,
}

impl HighlightTracker {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            previous: CategoryCounts::default(),
            timers: Default::default(),
            duration,
        }
    }

    /// Record a new snapshot and (re)start highlights for every category that grew.
    pub fn observe(&mut self, counts: CategoryCounts) -> Vec<StatusCategory> {
        let grown = counts.grown_since(&self.previous);
        if !self.duration.is_zero() {
            for category in &grown {
                let slot = &mut self.timers[category.index()];
                if let Some(timer) = slot {
                    timer.restart();
                } else {
                    *slot = Some(EffectTimer::new(self.duration));
                }
            }
        }
        self.previous = counts;
        grown
    }

    /// Advance all running highlights; expired ones are cleared.
    pub fn advance(&mut self, delta: Duration) {
        for slot in &mut self.timers {
            if let Some(timer) = slot {
                timer.advance(delta);
                if timer.is_finished() {
                    *slot = None;
                }
            }
        }
    }

    #[must_use]
    pub fn effect(&self, category: StatusCategory) -> Option<&EffectTimer> {
        self.timers[category.index()].as_ref()
    }

    #[must_use]
    pub fn is_active(&self, category: StatusCategory) -> bool {
        self.effect(category).is_some()
    }
}
