use std::time::Duration;

use tracing::{error, info};

use crate::api::{CertificateApi, Credentials};
use crate::auth::SessionStore;

use super::FlowError;

pub const MISSING_CREDENTIALS: &str = "Username and Password are required.";

/// Shown when the server rejects a login without saying why, or can't be reached
pub const LOGIN_FALLBACK_ERROR: &str = "Invalid credentials.";

pub const LOGIN_SUCCESS_DEFAULT: &str = "Login successful!";

/// Shown when the server accepted the login but the session file can't be written
pub const SESSION_SAVE_ERROR: &str = "Signed in, but the session could not be saved.";

/// Pause between the success message and the switch to the upload screen
pub const REDIRECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FlowError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(FlowError::Validation(MISSING_CREDENTIALS.to_string()));
        }
        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub username: String,
    /// Absent when the server signs in without issuing a token
    pub token: Option<String>,
    pub message: String,
}

/// Send the credentials. Nothing is persisted here.
pub async fn authenticate<A>(api: &A, credentials: &Credentials) -> Result<LoginSuccess, FlowError>
where
    A: CertificateApi + ?Sized,
{
    let reply = api
        .login(credentials)
        .await
        .map_err(|e| FlowError::from_api(&e, LOGIN_FALLBACK_ERROR, LOGIN_FALLBACK_ERROR))?;

    Ok(LoginSuccess {
        username: credentials.username.clone(),
        token: reply.token,
        message: reply
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| LOGIN_SUCCESS_DEFAULT.to_string()),
    })
}

/// Store the token and the submitted username. A login whose session can't
/// be written is reported as a failure and leaves the user signed out.
pub fn establish_session(session: &mut SessionStore, success: &LoginSuccess) -> Result<(), FlowError> {
    session
        .establish(&success.username, success.token.as_deref())
        .map_err(|e| {
            error!(error = %e, "Failed to save session");
            FlowError::Storage(SESSION_SAVE_ERROR.to_string())
        })?;
    info!(username = %success.username, "Login successful");
    Ok(())
}

/// Validate, authenticate, and on success persist the session
pub async fn login<A>(
    api: &A,
    session: &mut SessionStore,
    form: &LoginForm,
) -> Result<LoginSuccess, FlowError>
where
    A: CertificateApi + ?Sized,
{
    let credentials = form.validate()?;
    let success = authenticate(api, &credentials).await?;
    establish_session(session, &success)?;
    Ok(success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, LoginReply};
    use crate::flows::fake::FakeApi;
    use reqwest::StatusCode;

    fn form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_fields_never_reach_network() {
        let api = FakeApi::new();
        let mut session = SessionStore::in_memory();

        for (user, pass) in [("", "secret"), ("alice", ""), ("", "")] {
            let err = login(&api, &mut session, &form(user, pass)).await.unwrap_err();
            assert_eq!(err, FlowError::Validation(MISSING_CREDENTIALS.to_string()));
        }

        assert!(api.calls().is_empty());
        assert!(!session.is_valid());
    }

    #[tokio::test]
    async fn test_success_persists_token_and_username() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi::new();
        let mut session = SessionStore::new(dir.path().to_path_buf());

        let success = login(&api, &mut session, &form("alice", "secret")).await.unwrap();

        assert_eq!(api.calls(), vec!["login alice"]);
        assert_eq!(success.message, "Login successful");
        assert_eq!(session.token(), Some("tok-123"));
        assert_eq!(session.username(), Some("alice"));

        let mut reloaded = SessionStore::new(dir.path().to_path_buf());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.token(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_success_without_message_uses_default() {
        let api = FakeApi::new().on_login(|| {
            Ok(LoginReply {
                message: None,
                token: Some("t".to_string()),
            })
        });
        let mut session = SessionStore::in_memory();

        let success = login(&api, &mut session, &form("bob", "pw")).await.unwrap();
        assert_eq!(success.message, LOGIN_SUCCESS_DEFAULT);
    }

    #[tokio::test]
    async fn test_rejection_shows_server_error_and_persists_nothing() {
        let api = FakeApi::new().on_login(|| {
            Err(ApiError::from_status(
                StatusCode::UNAUTHORIZED,
                r#"{"error": "Invalid credentials"}"#,
            ))
        });
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionStore::new(dir.path().to_path_buf());

        let err = login(&api, &mut session, &form("alice", "wrong")).await.unwrap_err();
        assert_eq!(err, FlowError::Server("Invalid credentials".to_string()));
        assert!(!session.is_valid());
        assert!(session.username().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_rejection_without_error_field_uses_fallback() {
        let api = FakeApi::new()
            .on_login(|| Err(ApiError::from_status(StatusCode::FORBIDDEN, "Forbidden")));
        let mut session = SessionStore::in_memory();

        let err = login(&api, &mut session, &form("alice", "pw")).await.unwrap_err();
        assert_eq!(err.to_string(), LOGIN_FALLBACK_ERROR);
        assert!(!session.is_valid());
    }

    #[tokio::test]
    async fn test_success_without_token_still_signs_in() {
        let api = FakeApi::new().on_login(|| {
            Ok(LoginReply {
                message: Some("Login successful".to_string()),
                token: None,
            })
        });
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionStore::new(dir.path().to_path_buf());

        let success = login(&api, &mut session, &form("alice", "pw")).await.unwrap();
        assert_eq!(success.message, "Login successful");
        assert!(success.token.is_none());
        assert!(session.is_valid());
        assert_eq!(session.username(), Some("alice"));
        assert!(dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_unsaved_session_is_a_failure() {
        let api = FakeApi::new();
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let mut session = SessionStore::new(blocker.join("certvault"));

        let err = login(&api, &mut session, &form("alice", "secret")).await.unwrap_err();
        assert_eq!(err, FlowError::Storage(SESSION_SAVE_ERROR.to_string()));
        assert_eq!(api.calls(), vec!["login alice"]);
        assert!(!session.is_valid());
    }

    #[tokio::test]
    async fn test_unreadable_reply_uses_fallback() {
        let api = FakeApi::new()
            .on_login(|| Err(ApiError::InvalidResponse("not json".to_string())));
        let mut session = SessionStore::in_memory();

        let err = login(&api, &mut session, &form("alice", "pw")).await.unwrap_err();
        assert_eq!(err, FlowError::Transport(LOGIN_FALLBACK_ERROR.to_string()));
        assert!(!session.is_valid());
    }
}
