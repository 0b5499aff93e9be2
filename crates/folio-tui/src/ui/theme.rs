//! Theme and styling definitions for the folio TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(12, 12, 12);
    pub const FG: Color = Color::Rgb(229, 231, 235);
    pub const DIM: Color = Color::Rgb(156, 163, 175);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(255, 153, 0);
    pub const ACCENT_DIM: Color = Color::Rgb(230, 137, 0);

    // Message bubbles
    pub const USER_BG: Color = Color::Rgb(26, 26, 26);
    pub const ASSISTANT_BG: Color = Color::Rgb(17, 17, 17);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(38, 38, 38);
    pub const STATUS_KEY_BG: Color = Color::Rgb(60, 60, 60);

    pub const ERROR: Color = Color::Rgb(240, 100, 100);

    // Border colors
    pub const BORDER: Color = Color::Rgb(38, 38, 38);
    pub const BORDER_ACTIVE: Color = Color::Rgb(255, 153, 0);
}

/// Status indicator symbols (with ASCII fallbacks).
pub struct Symbols;

impl Symbols {
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted/selected item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// Error status.
    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::FG)
            .add_modifier(Modifier::BOLD)
    }

    /// Text the user sent.
    pub fn user_message() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::USER_BG)
    }

    /// Text the assistant sent.
    pub fn assistant_message() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::ASSISTANT_BG)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::BG)
            .bg(Palette::ACCENT_DIM)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}

/// Spinner frame for the given tick.
pub fn spinner(tick: usize) -> &'static str {
    Symbols::SPINNER[tick % Symbols::SPINNER.len()]
}
