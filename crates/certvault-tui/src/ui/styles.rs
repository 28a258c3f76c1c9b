//! Colors and text styles shared by every screen.
//!
//! The palette leans on a deep teal "seal" color for focus and titles, with
//! warm paper tones for body text. Messages use the form colors: green for a
//! stored certificate, brick for anything the server or validation refused.

use ratatui::style::{Color, Modifier, Style};

mod palette {
    use ratatui::style::Color;

    pub const SEAL: Color = Color::Rgb(38, 166, 154);
    pub const STAMP: Color = Color::Rgb(230, 184, 92);
    pub const PAPER: Color = Color::Rgb(236, 230, 214);
    pub const INK_FADED: Color = Color::Rgb(134, 142, 150);
    pub const ACCEPTED: Color = Color::Rgb(129, 199, 132);
    pub const REFUSED: Color = Color::Rgb(214, 96, 77);
    pub const LINK: Color = Color::Rgb(100, 181, 246);
    pub const ROW_SELECTED: Color = Color::Rgb(30, 58, 62);
    pub const STATUS_BAR: Color = Color::Rgb(24, 34, 38);
}

use palette::*;

fn focus_style() -> Style {
    Style::default().fg(SEAL).add_modifier(Modifier::BOLD)
}

pub fn title_style() -> Style {
    focus_style()
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(ROW_SELECTED)
        .fg(PAPER)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(PAPER)
}

pub fn muted_style() -> Style {
    Style::default().fg(INK_FADED)
}

/// Section headings and prompts
pub fn highlight_style() -> Style {
    Style::default().fg(STAMP)
}

pub fn success_style() -> Style {
    Style::default().fg(ACCEPTED).add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(REFUSED).add_modifier(Modifier::BOLD)
}

/// Download URLs in the file table
pub fn link_style() -> Style {
    Style::default().fg(LINK).add_modifier(Modifier::UNDERLINED)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        focus_style().add_modifier(Modifier::REVERSED)
    } else {
        list_item_style()
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(SEAL)
    } else {
        Style::default().fg(INK_FADED).add_modifier(Modifier::DIM)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(STATUS_BAR).fg(PAPER)
}

pub fn help_key_style() -> Style {
    Style::default().fg(STAMP).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    list_item_style()
}
