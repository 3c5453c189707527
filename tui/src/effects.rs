//! Highlight effects for category tiles.

use ratatui::style::{Color, Modifier, Style};

use ticketwall_types::ui::{EffectTimer, UiOptions};

/// On/off blinks across one highlight; 250ms halves at the default 2s.
const BLINKS_PER_HIGHLIGHT: f32 = 4.0;

/// Whether a highlighted tile is in the "lit" half of its blink.
///
/// The phase comes from the highlight's progress, so a tile always blinks the
/// same number of times whatever `highlight_ms` is. With reduced motion the
/// tile stays lit for the whole highlight instead.
#[must_use]
pub fn blink_lit(effect: &EffectTimer, options: UiOptions) -> bool {
    if options.reduced_motion {
        return true;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let half_periods = (effect.progress() * BLINKS_PER_HIGHLIGHT * 2.0).floor() as u32;
    half_periods % 2 == 0
}

/// Style for a category tile given its color and optional highlight.
///
/// Lit tiles invert: the category color fills the tile and text turns dark.
#[must_use]
pub fn tile_style(color: Color, bg: Color, effect: Option<&EffectTimer>, options: UiOptions) -> Style {
    match effect {
        Some(effect) if blink_lit(effect, options) => Style::default()
            .fg(bg)
            .bg(color)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().fg(color).bg(bg),
    }
}
