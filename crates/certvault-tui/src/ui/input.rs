//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Every screen is a form, so printable keys
//! go to the focused field and commands live on function keys and buttons.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use certvault_core::auth::Route;

use crate::app::{
    can_add_name_char, can_add_password_char, can_add_path_char, can_add_username_char,
    cycle_category, App, AppState, FilesFocus, LoginFocus, UploadFocus,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::F(1) => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::F(2) => {
            app.navigate(Route::Upload);
            return Ok(false);
        }
        KeyCode::F(3) => {
            app.navigate(Route::Files);
            return Ok(false);
        }
        _ => {}
    }

    match app.route {
        Route::Login => handle_login_input(app, key),
        Route::Upload => handle_upload_input(app, key),
        Route::Files => handle_files_input(app, key),
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit straight from the login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password => app.login_focus = LoginFocus::Button,
            LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_form.username.pop();
            }
            LoginFocus::Password => {
                app.login_form.password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_form.username.len(), c) {
                    app.login_form.username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_form.password.len(), c) {
                    app.login_form.password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_upload_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.upload_focus = app.upload_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.upload_focus = app.upload_focus.prev();
        }
        KeyCode::Left if app.upload_focus == UploadFocus::Category => {
            app.upload_form.category = cycle_category(app.upload_form.category, false);
        }
        KeyCode::Right if app.upload_focus == UploadFocus::Category => {
            app.upload_form.category = cycle_category(app.upload_form.category, true);
        }
        KeyCode::Char(' ') if app.upload_focus == UploadFocus::Category => {
            app.upload_form.category = cycle_category(app.upload_form.category, true);
        }
        KeyCode::Enter => match app.upload_focus {
            UploadFocus::Upload => app.submit_upload(),
            UploadFocus::ViewFiles => app.open_files_from_upload(),
            UploadFocus::Logout => app.logout(),
            _ => app.upload_focus = app.upload_focus.next(),
        },
        KeyCode::Backspace => {
            if let Some(field) = upload_text_field(app) {
                field.pop();
            }
        }
        KeyCode::Char(c) => {
            let accept = match app.upload_focus {
                UploadFocus::Owner => can_add_name_char(app.upload_form.owner_name.len(), c),
                UploadFocus::Document => can_add_name_char(app.upload_form.document_name.len(), c),
                UploadFocus::File => can_add_path_char(app.upload_form.file_path.len(), c),
                _ => false,
            };
            if accept {
                if let Some(field) = upload_text_field(app) {
                    field.push(c);
                }
            }
        }
        _ => {}
    }
    Ok(false)
}

fn upload_text_field(app: &mut App) -> Option<&mut String> {
    match app.upload_focus {
        UploadFocus::Owner => Some(&mut app.upload_form.owner_name),
        UploadFocus::Document => Some(&mut app.upload_form.document_name),
        UploadFocus::File => Some(&mut app.upload_form.file_path),
        _ => None,
    }
}

fn handle_files_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Row navigation while the table has focus
    if app.files_focus == FilesFocus::Table {
        let row_count = app.files_state.files().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.files_selection = app.files_selection.saturating_sub(1);
                return Ok(false);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.files_selection + 1 < row_count {
                    app.files_selection += 1;
                }
                return Ok(false);
            }
            KeyCode::Home => {
                app.files_selection = 0;
                return Ok(false);
            }
            KeyCode::End => {
                app.files_selection = row_count.saturating_sub(1);
                return Ok(false);
            }
            KeyCode::Char('r') => {
                app.refresh_files();
                return Ok(false);
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.files_focus = app.files_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.files_focus = app.files_focus.prev();
        }
        KeyCode::Left if app.files_focus == FilesFocus::Category => {
            app.files_form.category = cycle_category(app.files_form.category, false);
        }
        KeyCode::Right if app.files_focus == FilesFocus::Category => {
            app.files_form.category = cycle_category(app.files_form.category, true);
        }
        KeyCode::Char(' ') if app.files_focus == FilesFocus::Category => {
            app.files_form.category = cycle_category(app.files_form.category, true);
        }
        KeyCode::Enter => match app.files_focus {
            FilesFocus::List => app.refresh_files(),
            FilesFocus::Back => app.navigate(Route::Upload),
            FilesFocus::Table => {}
            _ => app.files_focus = app.files_focus.next(),
        },
        KeyCode::Backspace => match app.files_focus {
            FilesFocus::Owner => {
                app.files_form.owner_name.pop();
            }
            FilesFocus::Document => {
                app.files_form.document_name.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match app.files_focus {
            FilesFocus::Owner => {
                if can_add_name_char(app.files_form.owner_name.len(), c) {
                    app.files_form.owner_name.push(c);
                }
            }
            FilesFocus::Document => {
                if can_add_name_char(app.files_form.document_name.len(), c) {
                    app.files_form.document_name.push(c);
                }
            }
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}
