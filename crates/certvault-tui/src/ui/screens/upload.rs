use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, UploadFocus};
use crate::ui::styles;

use super::{button_span, category_line, feedback_line, field_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(13), Constraint::Min(3)])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_result(frame, app, chunks[1]);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.upload_form;
    let focus = app.upload_focus;

    let mut buttons = vec![Span::raw(" ".repeat(4))];
    buttons.extend(button_span("Upload", focus == UploadFocus::Upload));
    buttons.push(Span::raw("  "));
    buttons.extend(button_span("View files", focus == UploadFocus::ViewFiles));
    buttons.push(Span::raw("  "));
    buttons.extend(button_span("Logout", focus == UploadFocus::Logout));

    let lines = vec![
        Line::from(""),
        field_line("Owner name", &form.owner_name, focus == UploadFocus::Owner, false),
        category_line("Category", form.category, focus == UploadFocus::Category),
        field_line("Document name", &form.document_name, focus == UploadFocus::Document, false),
        field_line("PDF file", &form.file_path, focus == UploadFocus::File, false),
        Line::from(Span::styled(
            "                    path to a PDF on this machine",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(buttons),
    ];

    let block = Block::default()
        .title(" Upload Certificate ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    if let Some(line) = feedback_line(&app.upload_state, "Uploading...") {
        lines.push(line);
    }
    if let Some(ref key) = app.last_file_key {
        lines.push(Line::from(vec![
            Span::styled("  Stored as ", styles::muted_style()),
            Span::styled(key.clone(), styles::list_item_style()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
