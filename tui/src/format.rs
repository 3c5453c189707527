use chrono::{DateTime, Local};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use ticketwall_engine::FeedStatus;

use crate::theme::Glyphs;

pub(crate) fn format_clock(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Status-bar text for the feed, without styling.
pub(crate) fn format_feed_status(feed: &FeedStatus, glyphs: &Glyphs) -> String {
    match feed {
        FeedStatus::Loading => format!("{} Waiting for first poll", glyphs.loading),
        FeedStatus::Live { at } => format!("{} Live {} updated {}", glyphs.live, glyphs.separator, format_clock(*at)),
        FeedStatus::Stale {
            last_success: Some(at),
            error,
        } => format!(
            "{} Stale since {} {} {}",
            glyphs.stale,
            format_clock(*at),
            glyphs.separator,
            error
        ),
        FeedStatus::Stale {
            last_success: None,
            error,
        } => format!("{} Unreachable {} {}", glyphs.stale, glyphs.separator, error),
    }
}

/// Clip `text` to `max_width` terminal columns, ending with `ellipsis` when cut.
pub(crate) fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let ellipsis_width = ellipsis.width();
    if max_width <= ellipsis_width {
        return ellipsis.chars().take(max_width).collect();
    }

    let budget = max_width - ellipsis_width;
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    out
}
