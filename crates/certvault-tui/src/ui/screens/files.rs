use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use certvault_core::flows::listing::FileListState;
use certvault_core::utils::truncate_string;

use crate::app::{App, FilesFocus};
use crate::ui::styles;

use super::{button_span, category_line, field_line};

/// File names longer than this are cut with an ellipsis
const MAX_FILE_NAME_WIDTH: usize = 40;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(area);

    render_query(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
}

fn render_query(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.files_form;
    let focus = app.files_focus;

    let mut buttons = vec![Span::raw(" ".repeat(4))];
    buttons.extend(button_span("List", focus == FilesFocus::List));
    buttons.push(Span::raw("  "));
    buttons.extend(button_span("Back", focus == FilesFocus::Back));

    let lines = vec![
        field_line("Owner name", &form.owner_name, focus == FilesFocus::Owner, false),
        category_line("Category", form.category, focus == FilesFocus::Category),
        field_line("Document name", &form.document_name, focus == FilesFocus::Document, false),
        Line::from(""),
        Line::from(buttons),
    ];

    let block = Block::default()
        .title(" Uploaded Files ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focus != FilesFocus::Table));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// What to show in place of rows, if anything
fn placeholder(state: &FileListState) -> Option<Line<'static>> {
    match state {
        FileListState::Idle => Some(Line::from(Span::styled(
            "  Enter an owner, category and document name, then List.",
            styles::muted_style(),
        ))),
        FileListState::Loading => Some(Line::from(Span::styled(
            "  Loading files...",
            styles::highlight_style(),
        ))),
        FileListState::Failed(message) => Some(Line::from(Span::styled(
            format!("  {}", message),
            styles::error_style(),
        ))),
        FileListState::Loaded(files) if files.is_empty() => Some(Line::from(Span::styled(
            "  No files found.",
            styles::muted_style(),
        ))),
        FileListState::Loaded(_) => None,
    }
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.files_focus == FilesFocus::Table;
    let rows = app.file_rows();

    let block = Block::default()
        .title(format!(" Files ({}) - [r]efresh ", rows.len()))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if let Some(line) = placeholder(&app.files_state) {
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let header = Row::new([
        Cell::from("File Name"),
        Cell::from("Size (KB)"),
        Cell::from("Last Modified"),
        Cell::from("Download"),
    ])
    .style(styles::title_style())
    .height(1);

    let table_rows: Vec<Row> = rows
        .into_iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(truncate_string(&row.file_name, MAX_FILE_NAME_WIDTH)),
                Cell::from(row.size_kb),
                Cell::from(row.last_modified),
                Cell::from(Span::styled(row.download_url, styles::link_style())),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Percentage(25),
        Constraint::Length(10),
        Constraint::Length(24),
        Constraint::Fill(1),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if focused {
        state.select(Some(app.files_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use certvault_core::models::FileDescriptor;

    #[test]
    fn test_placeholder_only_hides_loaded_rows() {
        assert!(placeholder(&FileListState::Idle).is_some());
        assert!(placeholder(&FileListState::Loading).is_some());
        assert!(placeholder(&FileListState::Loaded(Vec::new())).is_some());

        let failed = placeholder(&FileListState::Failed("Failed to load files.".to_string())).unwrap();
        assert!(failed.spans[0].content.contains("Failed to load files."));

        let files = vec![FileDescriptor {
            file_name: "a.pdf".to_string(),
            size: 1,
            last_modified: String::new(),
            file_key: "k".to_string(),
        }];
        assert!(placeholder(&FileListState::Loaded(files)).is_none());
    }
}
