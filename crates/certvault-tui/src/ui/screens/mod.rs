//! Per-route screen rendering.
//!
//! Each screen is a small form. The helpers here draw the pieces they share:
//! labelled input fields, buttons, and the outcome line under a form.

pub mod files;
pub mod login;
pub mod upload;

use ratatui::text::{Line, Span};

use certvault_core::flows::SubmitState;
use certvault_core::models::CertificateCategory;

use crate::ui::styles;

/// Visible width of an input field
pub const FIELD_WIDTH: usize = 32;

/// A labelled text field. Long values show their tail so the cursor stays visible.
pub fn field_line(label: &str, value: &str, focused: bool, masked: bool) -> Line<'static> {
    let shown: String = if masked {
        "*".repeat(value.chars().count().min(FIELD_WIDTH))
    } else {
        let count = value.chars().count();
        value.chars().skip(count.saturating_sub(FIELD_WIDTH)).collect()
    };
    let cursor = if focused { "▌" } else { "" };
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    Line::from(vec![
        Span::styled(format!("  {:>14}: [", label), styles::muted_style()),
        Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

/// A category selector showing the current choice between arrows
pub fn category_line(label: &str, category: Option<CertificateCategory>, focused: bool) -> Line<'static> {
    let shown = category.map(|c| c.display_name()).unwrap_or("Select category");
    let style = match (focused, category) {
        (true, _) => styles::selected_style(),
        (false, Some(_)) => styles::list_item_style(),
        (false, None) => styles::muted_style(),
    };

    Line::from(vec![
        Span::styled(format!("  {:>14}: ", label), styles::muted_style()),
        Span::styled(if focused { "◀ " } else { "  " }, styles::highlight_style()),
        Span::styled(format!("{:<16}", shown), style),
        Span::styled(if focused { " ▶" } else { "  " }, styles::highlight_style()),
    ])
}

/// A button; the focused one is marked with arrows
pub fn button_span(label: &str, focused: bool) -> Vec<Span<'static>> {
    if focused {
        vec![
            Span::raw("["),
            Span::styled(format!(" ▶ {} ◀ ", label), styles::selected_style()),
            Span::raw("]"),
        ]
    } else {
        vec![
            Span::raw("["),
            Span::styled(format!("   {}   ", label), styles::list_item_style()),
            Span::raw("]"),
        ]
    }
}

/// The outcome of the last submission, if any
pub fn feedback_line(state: &SubmitState, pending: &str) -> Option<Line<'static>> {
    match state {
        SubmitState::Idle => None,
        SubmitState::Submitting => Some(Line::from(Span::styled(
            format!("  {}", pending),
            styles::highlight_style(),
        ))),
        SubmitState::Succeeded(message) => Some(Line::from(Span::styled(
            format!("  {}", message),
            styles::success_style(),
        ))),
        SubmitState::Failed(message) => Some(Line::from(Span::styled(
            format!("  {}", message),
            styles::error_style(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_masked_field_hides_value() {
        let line = field_line("Password", "hunter2", false, true);
        let rendered = text(&line);
        assert!(rendered.contains("*******"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_long_value_shows_tail() {
        let value = format!("{}END", "x".repeat(50));
        let rendered = text(&field_line("File", &value, false, false));
        assert!(rendered.contains("END]"));
    }

    #[test]
    fn test_feedback_line_per_state() {
        assert!(feedback_line(&SubmitState::Idle, "Working...").is_none());
        let line = feedback_line(&SubmitState::Failed("Invalid credentials".to_string()), "").unwrap();
        assert!(text(&line).contains("Invalid credentials"));
        let line = feedback_line(&SubmitState::Submitting, "Signing in...").unwrap();
        assert!(text(&line).contains("Signing in..."));
    }

    #[test]
    fn test_unset_category_prompts() {
        let rendered = text(&category_line("Category", None, false));
        assert!(rendered.contains("Select category"));
        let rendered = text(&category_line("Category", Some(CertificateCategory::Education), true));
        assert!(rendered.contains("Education"));
    }
}
