//! Headless commands: sign in, sign out, and list files without the TUI.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::warn;

use certvault_core::api::{ApiClient, CertificateApi};
use certvault_core::auth::{authorize, Route, SessionStore};
use certvault_core::config::Config;
use certvault_core::flows::listing::{self, FileListQuery};
use certvault_core::flows::login::{self, LoginForm};
use certvault_core::flows::upload;
use certvault_core::models::{to_rows, CertificateCategory, StorageLocation};

pub const USAGE: &str = "\
Usage:
  certvault [/login | /upload | /download]   Open the TUI on a screen
  certvault --login                          Sign in and save the session
  certvault --logout                         Remove the saved session
  certvault --list <category> <document> [owner]
                                             Print stored files and their links
  certvault --help                           Show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tui(Route),
    Login,
    Logout,
    List {
        category: CertificateCategory,
        document_name: String,
        owner_name: Option<String>,
    },
    Help,
}

/// Parse arguments (without the program name)
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(first) = args.first() else {
        return Ok(Command::Tui(Route::Upload));
    };

    match first.as_str() {
        "--help" | "-h" => Ok(Command::Help),
        "--login" => Ok(Command::Login),
        "--logout" => Ok(Command::Logout),
        "--list" => {
            let (category, document_name) = match (args.get(1), args.get(2)) {
                (Some(c), Some(d)) => (c, d),
                _ => bail!("--list needs a category and a document name\n\n{}", USAGE),
            };
            let category = category.parse::<CertificateCategory>()?;
            Ok(Command::List {
                category,
                document_name: document_name.clone(),
                owner_name: args.get(3).cloned(),
            })
        }
        path if path.starts_with('/') => Route::from_path(path)
            .map(Command::Tui)
            .ok_or_else(|| anyhow!("Unknown screen: {}\n\n{}", path, USAGE)),
        other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
    }
}

fn open_session(config: &Config) -> Result<SessionStore> {
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let mut session = SessionStore::new(cache_dir);
    session.load()?;
    Ok(session)
}

/// Run a headless command
pub async fn run(command: Command) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(&config)?;
    let mut out = io::stdout();

    match command {
        Command::Help | Command::Tui(_) => {
            writeln!(out, "{}", USAGE)?;
        }
        Command::Login => {
            let form = prompt_credentials(config.last_username.as_deref())?;
            let api = ApiClient::new(&config.api_base_url)?;
            let success = login::login(&api, &mut session, &form).await?;

            let saved = Config::config_path()
                .and_then(|path| Config::remember_username(&path, &success.username));
            if let Err(e) = saved {
                warn!(error = %e, "Failed to save config");
            }
            writeln!(out, "{}", success.message)?;
        }
        Command::Logout => sign_out(&mut session, &mut out)?,
        Command::List {
            category,
            document_name,
            owner_name,
        } => {
            let api = ApiClient::new(&config.api_base_url)?;
            let api = match session.token() {
                Some(token) => api.with_token(token.to_string()),
                None => api,
            };
            let query = FileListQuery::new(owner_name, Some(category), Some(document_name));
            list_files(&api, &session, &query, &config.storage, &mut out).await?;
        }
    }
    Ok(())
}

/// Remove the saved session
fn sign_out<W: Write>(session: &mut SessionStore, out: &mut W) -> Result<()> {
    upload::logout(session)?;
    writeln!(out, "Logged out.")?;
    Ok(())
}

/// Print one tab-separated line per stored file and return how many there
/// were. Refused before any request when there is no session.
async fn list_files<A, W>(
    api: &A,
    session: &SessionStore,
    query: &FileListQuery,
    storage: &StorageLocation,
    out: &mut W,
) -> Result<usize>
where
    A: CertificateApi + ?Sized,
    W: Write,
{
    if authorize(Route::Files, session) != Route::Files {
        bail!("Not logged in. Run `certvault --login` first.");
    }
    let query = query
        .resolve(session.username())
        .ok_or_else(|| anyhow!("An owner name, category and document name are required"))?;

    let files = listing::fetch(api, &query).await?;
    if files.is_empty() {
        writeln!(out, "No files found.")?;
    }
    let rows = to_rows(&files, storage);
    for row in &rows {
        writeln!(
            out,
            "{}\t{} KB\t{}\t{}",
            row.file_name, row.size_kb, row.last_modified, row.download_url
        )?;
    }
    Ok(rows.len())
}

fn prompt_credentials(last_username: Option<&str>) -> Result<LoginForm> {
    let mut stdout = io::stdout();
    match last_username {
        Some(name) => write!(stdout, "Username [{}]: ", name)?,
        None => write!(stdout, "Username: ")?,
    }
    stdout.flush()?;

    let mut username = String::new();
    io::stdin()
        .lock()
        .read_line(&mut username)
        .context("Failed to read username")?;
    let mut username = username.trim().to_string();
    if username.is_empty() {
        username = last_username.unwrap_or_default().to_string();
    }

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    Ok(LoginForm { username, password })
}
