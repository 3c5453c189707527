//! Color theme and glyphs for the ticketwall TUI.
//!
//! Kanagawa Wave for chrome, pastel tiles for the four status categories, and an
//! optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::widgets::{Block, BorderType};

use ticketwall_types::{StatusCategory, ui::UiOptions};

mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed

    // === Category tiles ===
    pub const TILE_OPEN: Color = Color::Rgb(208, 230, 165); // #D0E6A5
    pub const TILE_UNLINKED: Color = Color::Rgb(255, 204, 203); // #FFCCCB
    pub const TILE_AGENT: Color = Color::Rgb(173, 216, 230); // #ADD8E6
    pub const TILE_CUSTOMER: Color = Color::Rgb(253, 230, 138); // #FDE68A
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub peach: Color,
    pub tile_open: Color,
    pub tile_unlinked: Color,
    pub tile_agent: Color,
    pub tile_customer: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::PRIMARY,
            success: colors::GREEN,
            warning: colors::YELLOW,
            error: colors::RED,
            peach: colors::ORANGE,
            tile_open: colors::TILE_OPEN,
            tile_unlinked: colors::TILE_UNLINKED,
            tile_agent: colors::TILE_AGENT,
            tile_customer: colors::TILE_CUSTOMER,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::Gray,
            primary: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            peach: Color::Yellow,
            tile_open: Color::LightGreen,
            tile_unlinked: Color::LightRed,
            tile_agent: Color::LightCyan,
            tile_customer: Color::LightYellow,
        }
    }

    /// Tile color for a status category.
    #[must_use]
    pub fn category(&self, category: StatusCategory) -> Color {
        match category {
            StatusCategory::Open => self.tile_open,
            StatusCategory::Unlinked => self.tile_unlinked,
            StatusCategory::AnsweredByAgent => self.tile_agent,
            StatusCategory::AnsweredByCustomer => self.tile_customer,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for borders and status markers.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub ascii_borders: bool,
    pub live: &'static str,
    pub stale: &'static str,
    pub loading: &'static str,
    pub paused: &'static str,
    pub bullet: &'static str,
    pub separator: &'static str,
    pub ellipsis: &'static str,
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            ascii_borders: true,
            live: "*",
            stale: "!",
            loading: "~",
            paused: "||",
            bullet: "*",
            separator: "|",
            ellipsis: "...",
        }
    } else {
        Glyphs {
            ascii_borders: false,
            live: "●",
            stale: "○",
            loading: "◌",
            paused: "⏸",
            bullet: "•",
            separator: "│",
            ellipsis: "…",
        }
    }
}

impl Glyphs {
    /// A fully bordered block: rounded box drawing, or `+-|` in ASCII mode.
    #[must_use]
    pub fn block<'a>(&self) -> Block<'a> {
        if self.ascii_borders {
            Block::bordered().border_set(border::Set {
                top_left: "+",
                top_right: "+",
                bottom_left: "+",
                bottom_right: "+",
                vertical_left: "|",
                vertical_right: "|",
                horizontal_top: "-",
                horizontal_bottom: "-",
            })
        } else {
            Block::bordered().border_type(BorderType::Rounded)
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn headline(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn secondary(palette: &Palette) -> Style {
        Style::default().fg(palette.text_secondary)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}
