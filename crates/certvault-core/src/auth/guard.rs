use tracing::debug;

use super::SessionStore;

/// Screens of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Upload,
    Files,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Upload => "/upload",
            Route::Files => "/download",
        }
    }

    /// Parse a route path; `/` is the login screen
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" | "/login" => Some(Route::Login),
            "/upload" => Some(Route::Upload),
            "/download" => Some(Route::Files),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Upload => "Upload Certificate",
            Route::Files => "Uploaded Files",
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Decide which screen to show for a requested route
pub fn authorize(requested: Route, session: &SessionStore) -> Route {
    if requested.requires_session() && !session.is_valid() {
        debug!(route = requested.path(), "No session, redirecting to login");
        Route::Login
    } else {
        requested
    }
}
