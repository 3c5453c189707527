//! UI state types shared by the engine and the TUI.
//!
//! Pure data types with no IO, no async, no ratatui dependency.

mod animation;

pub use animation::EffectTimer;

/// Accessibility and rendering switches from `[app]` config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    /// Use ASCII-only glyphs for borders and markers.
    pub ascii_only: bool,
    /// Use the high-contrast palette.
    pub high_contrast: bool,
    /// Replace blinking and scrolling with static presentation.
    pub reduced_motion: bool,
}
