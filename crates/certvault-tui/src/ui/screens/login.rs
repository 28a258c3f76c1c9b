use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{button_span, feedback_line, field_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let feedback = feedback_line(&app.login_state, "Signing in...");
    let height = if feedback.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(60, height, area);

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("  Sign in to upload and view certificates", styles::title_style())),
        Line::from(""),
        field_line(
            "Username",
            &app.login_form.username,
            app.login_focus == LoginFocus::Username,
            false,
        ),
        field_line(
            "Password",
            &app.login_form.password,
            app.login_focus == LoginFocus::Password,
            true,
        ),
        Line::from(""),
    ];

    let mut button = vec![Span::raw(" ".repeat(22))];
    button.extend(button_span("Login", app.login_focus == LoginFocus::Button));
    lines.push(Line::from(button));

    if let Some(line) = feedback {
        lines.push(Line::from(""));
        lines.push(line);
    }

    let block = Block::default()
        .title(" Login ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
