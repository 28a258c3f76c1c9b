//! Application state management for certvault.
//!
//! This module contains the core `App` struct that owns the session store,
//! the API client, per-screen form state, and the channel background
//! requests report back on.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use certvault_core::api::ApiClient;
use certvault_core::auth::{authorize, Route, SessionStore};
use certvault_core::config::Config;
use certvault_core::flows::listing::{self, FileListQuery, FileListState};
use certvault_core::flows::login::{self, LoginForm, LoginSuccess, REDIRECT_DELAY};
use certvault_core::flows::upload::{self, UploadForm, UploadSuccess, MISSING_FIELDS};
use certvault_core::flows::{FlowError, SubmitState};
use certvault_core::models::{to_rows, CertificateCategory, FileDescriptor, FileRow};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for owner and document name inputs.
const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for the file path input.
const MAX_PATH_LENGTH: usize = 1024;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// Upload form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFocus {
    Owner,
    Category,
    Document,
    File,
    Upload,
    ViewFiles,
    Logout,
}

impl UploadFocus {
    pub fn next(&self) -> Self {
        match self {
            UploadFocus::Owner => UploadFocus::Category,
            UploadFocus::Category => UploadFocus::Document,
            UploadFocus::Document => UploadFocus::File,
            UploadFocus::File => UploadFocus::Upload,
            UploadFocus::Upload => UploadFocus::ViewFiles,
            UploadFocus::ViewFiles => UploadFocus::Logout,
            UploadFocus::Logout => UploadFocus::Owner,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            UploadFocus::Owner => UploadFocus::Logout,
            UploadFocus::Category => UploadFocus::Owner,
            UploadFocus::Document => UploadFocus::Category,
            UploadFocus::File => UploadFocus::Document,
            UploadFocus::Upload => UploadFocus::File,
            UploadFocus::ViewFiles => UploadFocus::Upload,
            UploadFocus::Logout => UploadFocus::ViewFiles,
        }
    }
}

/// File list screen focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilesFocus {
    Owner,
    Category,
    Document,
    List,
    Back,
    Table,
}

impl FilesFocus {
    pub fn next(&self) -> Self {
        match self {
            FilesFocus::Owner => FilesFocus::Category,
            FilesFocus::Category => FilesFocus::Document,
            FilesFocus::Document => FilesFocus::List,
            FilesFocus::List => FilesFocus::Back,
            FilesFocus::Back => FilesFocus::Table,
            FilesFocus::Table => FilesFocus::Owner,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FilesFocus::Owner => FilesFocus::Table,
            FilesFocus::Category => FilesFocus::Owner,
            FilesFocus::Document => FilesFocus::Category,
            FilesFocus::List => FilesFocus::Document,
            FilesFocus::Back => FilesFocus::List,
            FilesFocus::Table => FilesFocus::Back,
        }
    }
}

/// Editable listing parameters on the file list screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilesForm {
    pub owner_name: String,
    pub category: Option<CertificateCategory>,
    pub document_name: String,
}

impl FilesForm {
    pub fn to_query(&self) -> FileListQuery {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        FileListQuery::new(
            non_empty(&self.owner_name),
            self.category,
            non_empty(&self.document_name),
        )
    }
}

/// Step a category selector; an unset selector starts at the first category
pub fn cycle_category(current: Option<CertificateCategory>, forward: bool) -> Option<CertificateCategory> {
    Some(match (current, forward) {
        (None, true) => CertificateCategory::Professional,
        (None, false) => CertificateCategory::Education,
        (Some(c), true) => c.next(),
        (Some(c), false) => c.prev(),
    })
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from request tasks.
///
/// Each carries the navigation generation it was started under so that a
/// reply for a screen the user has left is dropped instead of applied.
enum TaskResult {
    Login {
        generation: u64,
        result: Result<LoginSuccess, FlowError>,
    },
    Upload {
        generation: u64,
        result: Result<UploadSuccess, FlowError>,
    },
    Files {
        generation: u64,
        result: Result<Vec<FileDescriptor>, FlowError>,
    },
}

impl TaskResult {
    fn generation(&self) -> u64 {
        match self {
            TaskResult::Login { generation, .. }
            | TaskResult::Upload { generation, .. }
            | TaskResult::Files { generation, .. } => *generation,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    /// Where `config` is saved; unset keeps it in memory only
    config_path: Option<PathBuf>,
    pub session: SessionStore,
    pub api: ApiClient,

    // Navigation
    pub state: AppState,
    pub route: Route,
    /// Bumped on every screen change
    generation: u64,
    /// Delayed navigation after a successful login
    pub pending_redirect: Option<(Instant, Route)>,

    // Login screen
    pub login_form: LoginForm,
    pub login_focus: LoginFocus,
    pub login_state: SubmitState,

    // Upload screen
    pub upload_form: UploadForm,
    pub upload_focus: UploadFocus,
    pub upload_state: SubmitState,
    pub last_file_key: Option<String>,

    // File list screen
    pub files_form: FilesForm,
    pub files_focus: FilesFocus,
    pub files_state: FileListState,
    pub files_selection: usize,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance from config and the persisted session
    pub fn new(start: Route) -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(api = %config.api_base_url, bucket = %config.storage.bucket, "Config loaded");

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        let mut session = SessionStore::new(cache_dir);
        match session.load() {
            Ok(found) => debug!(found, "Session loaded"),
            Err(e) => warn!(error = %e, "Failed to load session, starting signed out"),
        }

        let api = ApiClient::new(&config.api_base_url)?;
        let mut app = Self::from_parts(config, session, api, start);
        app.config_path = Config::config_path().ok();
        Ok(app)
    }

    pub fn from_parts(config: Config, session: SessionStore, mut api: ApiClient, start: Route) -> Self {
        if let Some(token) = session.token() {
            api.set_token(token.to_string());
        }

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_form = LoginForm {
            username: config.last_username.clone().unwrap_or_default(),
            password: String::new(),
        };

        let mut app = Self {
            config,
            config_path: None,
            session,
            api,

            state: AppState::Normal,
            route: Route::Login,
            generation: 0,
            pending_redirect: None,

            login_form,
            login_focus: LoginFocus::Username,
            login_state: SubmitState::Idle,

            upload_form: UploadForm::default(),
            upload_focus: UploadFocus::Owner,
            upload_state: SubmitState::Idle,
            last_file_key: None,

            files_form: FilesForm::default(),
            files_focus: FilesFocus::Owner,
            files_state: FileListState::Idle,
            files_selection: 0,

            task_rx: rx,
            task_tx: tx,

            status_message: None,
        };
        app.enter(authorize(start, &app.session));
        app
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch screens. The route guard decides where the user actually lands.
    pub fn navigate(&mut self, requested: Route) {
        let target = authorize(requested, &self.session);
        if target != self.route {
            self.enter(target);
        }
    }

    fn enter(&mut self, route: Route) {
        self.generation += 1;
        self.route = route;
        self.pending_redirect = None;
        self.status_message = None;
        debug!(route = route.path(), generation = self.generation, "Entered screen");

        match route {
            Route::Login => {
                self.login_state.reset();
                self.login_focus = if self.login_form.username.is_empty() {
                    LoginFocus::Username
                } else {
                    LoginFocus::Password
                };
            }
            Route::Upload => {
                self.upload_state.reset();
                self.upload_focus = UploadFocus::Owner;
                if self.upload_form.owner_name.is_empty() {
                    if let Some(username) = self.session.username() {
                        self.upload_form.owner_name = username.to_string();
                    }
                }
            }
            Route::Files => {
                self.files_focus = FilesFocus::Owner;
                self.files_state = FileListState::Idle;
                self.files_selection = 0;
                self.refresh_files();
            }
        }
    }

    /// Apply delayed navigation once its time has come
    pub fn tick(&mut self, now: Instant) {
        if let Some((at, route)) = self.pending_redirect {
            if now >= at {
                self.pending_redirect = None;
                self.navigate(route);
            }
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Submit the login form
    pub fn submit_login(&mut self) {
        let credentials = match self.login_form.validate() {
            Ok(c) => c,
            Err(e) => {
                self.login_state.fail(&e);
                return;
            }
        };
        if let Err(e) = self.login_state.begin() {
            self.status_message = Some(e.to_string());
            return;
        }

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = login::authenticate(&api, &credentials).await;
            Self::send_result(&tx, TaskResult::Login { generation, result }).await;
        });
    }

    fn complete_login(&mut self, result: Result<LoginSuccess, FlowError>) {
        let result = result.and_then(|success| {
            login::establish_session(&mut self.session, &success)?;
            Ok(success)
        });

        if let Ok(ref success) = result {
            if let Some(ref token) = success.token {
                self.api.set_token(token.clone());
            }
            self.login_form.password.clear();

            self.config.last_username = Some(success.username.clone());
            if let Some(ref path) = self.config_path {
                if let Err(e) = Config::remember_username(path, &success.username) {
                    warn!(error = %e, "Failed to save config");
                }
            }

            self.pending_redirect = Some((Instant::now() + REDIRECT_DELAY, Route::Upload));
        }
        self.login_state.finish(&result, |s| s.message.clone());
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Submit the upload form. The file is read on the background task.
    pub fn submit_upload(&mut self) {
        if self.upload_form.is_incomplete() {
            self.upload_state
                .fail(&FlowError::Validation(MISSING_FIELDS.to_string()));
            return;
        }
        if let Err(e) = self.upload_state.begin() {
            self.status_message = Some(e.to_string());
            return;
        }
        self.last_file_key = None;

        let api = self.api.clone();
        let form = self.upload_form.clone();
        let tx = self.task_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = upload::upload(&api, &form).await;
            Self::send_result(&tx, TaskResult::Upload { generation, result }).await;
        });
    }

    fn complete_upload(&mut self, result: Result<UploadSuccess, FlowError>) {
        if let Ok(ref success) = result {
            self.last_file_key = success.file_key.clone();
        }
        self.upload_state.finish(&result, |s| s.message.clone());
    }

    /// End the session locally and return to the login screen
    pub fn logout(&mut self) {
        if let Err(e) = upload::logout(&mut self.session) {
            warn!(error = %e, "Failed to remove session file");
        }
        self.api.clear_token();
        self.login_form.password.clear();
        self.upload_form = UploadForm::default();
        self.files_form = FilesForm::default();
        self.last_file_key = None;
        self.navigate(Route::Login);
    }

    // =========================================================================
    // File list
    // =========================================================================

    /// Open the file list for the document on the upload form
    pub fn open_files_from_upload(&mut self) {
        self.files_form = FilesForm {
            owner_name: self.upload_form.owner_name.clone(),
            category: self.upload_form.category,
            document_name: self.upload_form.document_name.clone(),
        };
        self.navigate(Route::Files);
    }

    /// Fetch the listing for the current parameters. Missing parameters
    /// leave the list empty without a request.
    pub fn refresh_files(&mut self) {
        if self.files_state.is_loading() {
            self.status_message = Some(FlowError::Busy.to_string());
            return;
        }

        let Some(query) = self.files_form.to_query().resolve(self.session.username()) else {
            self.files_state = FileListState::Idle;
            self.files_selection = 0;
            return;
        };

        self.files_state = FileListState::Loading;
        self.files_selection = 0;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = listing::fetch(&api, &query).await;
            Self::send_result(&tx, TaskResult::Files { generation, result }).await;
        });
    }

    /// Display rows for the loaded listing
    pub fn file_rows(&self) -> Vec<FileRow> {
        to_rows(self.files_state.files(), &self.config.storage)
    }

    pub fn selected_file_row(&self) -> Option<FileRow> {
        self.file_rows().into_iter().nth(self.files_selection)
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        if result.generation() != self.generation {
            debug!(
                stale = result.generation(),
                current = self.generation,
                "Dropping result for a screen that is no longer shown"
            );
            return;
        }

        match result {
            TaskResult::Login { result, .. } => self.complete_login(result),
            TaskResult::Upload { result, .. } => self.complete_upload(result),
            TaskResult::Files { result, .. } => {
                if let Ok(ref files) = result {
                    info!(count = files.len(), "File list loaded");
                }
                self.files_state = FileListState::from_result(result);
            }
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if an owner or document name character should be accepted
pub fn can_add_name_char(current_len: usize, c: char) -> bool {
    current_len < MAX_NAME_LENGTH && is_valid_input_char(c)
}

/// Check if a file path character should be accepted
pub fn can_add_path_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PATH_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
