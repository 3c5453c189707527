//! Application state for ticketwall.
//!
//! [`App`] owns everything the renderer needs: the latest [`Board`], the feed
//! status, per-category highlights, and the auto-scroll position. It is driven
//! from the render loop: drain poll events, `tick()`, draw.

mod highlight;
mod poller;
mod scroll;

pub use highlight::HighlightTracker;
pub use poller::{PollEvent, Poller, PollerStopped, TicketSource};
pub use scroll::{AutoScroll, ROWS_PER_TICKET};

pub use ticketwall_config::DashboardConfig;
pub use ticketwall_types::{
    Board, CategoryCounts, StatusCategory, Ticket,
    ui::{EffectTimer, UiOptions},
};

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Health of the ticket feed as shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    /// No poll has completed yet.
    #[default]
    Loading,
    /// The last poll succeeded.
    Live { at: DateTime<Local> },
    /// The last poll failed; the board still shows the last good snapshot, if any.
    Stale {
        last_success: Option<DateTime<Local>>,
        error: String,
    },
}

impl FeedStatus {
    #[must_use]
    pub fn last_success(&self) -> Option<DateTime<Local>> {
        match self {
            FeedStatus::Loading => None,
            FeedStatus::Live { at } => Some(*at),
            FeedStatus::Stale { last_success, .. } => *last_success,
        }
    }
}

pub struct App {
    title: String,
    endpoint: String,
    poll_interval: Duration,
    options: UiOptions,
    board: Board,
    feed: FeedStatus,
    highlights: HighlightTracker,
    scroll: AutoScroll,
    poller: Option<Poller>,
    last_tick: Instant,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            title: config.app.title.clone(),
            endpoint: config.api.url.clone(),
            poll_interval: config.api.poll_interval(),
            options: config.ui_options(),
            board: Board::default(),
            feed: FeedStatus::Loading,
            highlights: HighlightTracker::new(config.display.highlight_duration()),
            scroll: AutoScroll::new(config.display.scroll_step()),
            poller: None,
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    /// Start polling `source` on the current tokio runtime.
    pub fn start_polling<S: TicketSource>(&mut self, source: S) {
        tracing::info!(
            endpoint = %self.endpoint,
            interval_ms = self.poll_interval.as_millis(),
            "Starting ticket poller"
        );
        self.poller = Some(Poller::spawn(source, self.poll_interval));
    }

    /// Drain every poll result that has arrived since the last frame.
    pub fn process_poll_events(&mut self) {
        let Some(poller) = self.poller.as_mut() else {
            return;
        };
        let mut pending = Vec::new();
        let stopped = loop {
            match poller.try_next() {
                Ok(Some(event)) => pending.push(event),
                Ok(None) => break None,
                Err(stopped) => break Some(stopped),
            }
        };
        for event in pending {
            self.apply_event(event);
        }
        if let Some(stopped) = stopped {
            tracing::warn!("Ticket poller stopped unexpectedly");
            self.poller = None;
            self.apply_failure(stopped.to_string(), Local::now());
        }
    }

    pub fn apply_event(&mut self, event: PollEvent) {
        match event {
            PollEvent::Updated { tickets, at } => self.apply_snapshot(tickets, at),
            PollEvent::Failed { error, at } => self.apply_failure(error, at),
        }
    }

    pub fn apply_snapshot(&mut self, tickets: Vec<Ticket>, at: DateTime<Local>) {
        let board = Board::from_tickets(tickets);
        let grown = self.highlights.observe(board.counts());
        if !grown.is_empty() {
            tracing::info!(categories = ?grown, "Ticket counts grew");
        }
        self.board = board;
        self.feed = FeedStatus::Live { at };
    }

    pub fn apply_failure(&mut self, error: String, at: DateTime<Local>) {
        tracing::debug!(%at, "Keeping last snapshot after failed poll");
        self.feed = FeedStatus::Stale {
            last_success: self.feed.last_success(),
            error,
        };
    }

    /// Advance animations by the wall-clock time since the previous tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance(delta);
    }

    /// Advance animations by an explicit delta.
    pub fn advance(&mut self, delta: Duration) {
        self.highlights.advance(delta);
        if self.options.reduced_motion {
            // Reduced motion pins the list to the top.
            self.scroll.advance(Duration::ZERO, 0);
        } else {
            self.scroll.advance(delta, self.list_rows());
        }
    }

    /// Height of one copy of the open-ticket list.
    #[must_use]
    pub fn list_rows(&self) -> usize {
        self.board.open_len() * ROWS_PER_TICKET
    }

    pub fn set_list_viewport(&mut self, rows: usize) {
        self.scroll.set_viewport(rows);
    }

    pub fn request_refresh(&mut self) {
        if let Some(poller) = &self.poller {
            tracing::debug!("Refresh requested from keyboard");
            poller.refresh();
        }
    }

    pub fn toggle_scroll_pause(&mut self) {
        self.scroll.toggle_pause();
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn shutdown(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.shutdown().await;
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn feed(&self) -> &FeedStatus {
        &self.feed
    }

    #[must_use]
    pub fn highlight(&self, category: StatusCategory) -> Option<&EffectTimer> {
        self.highlights.effect(category)
    }

    #[must_use]
    pub fn scroll(&self) -> &AutoScroll {
        &self.scroll
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.options
    }
}
