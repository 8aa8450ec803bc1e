//! Authentication session storage and role-based route guards

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Role of a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

/// Profile stored alongside the token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Bearer token plus the user it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists the signed-in session between runs
#[derive(Debug, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    current: Option<AuthSession>,
}

impl SessionStore {
    fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "clientdesk", "clientdesk-tui")
            .map(|dirs| dirs.data_dir().join("session.json"))
    }

    /// Load the stored session from the default location
    pub fn load() -> Result<Self, AuthError> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Load the stored session from `path`; a missing file means signed out
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        let current = if path.exists() {
            let content = fs::read_to_string(&path)?;
            Some(serde_json::from_str(&content)?)
        } else {
            None
        };
        Ok(Self {
            path: Some(path),
            current,
        })
    }

    pub fn current(&self) -> Option<&AuthSession> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Store a new session, replacing any previous one
    pub fn save(&mut self, session: AuthSession) -> Result<(), AuthError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(&session)?)?;
        }
        self.current = Some(session);
        Ok(())
    }

    /// Forget the session
    pub fn clear(&mut self) -> Result<(), AuthError> {
        self.current = None;
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Top-level screens of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Login,
    AdminDashboard,
    FormBuilder,
    ClientDashboard,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::AdminDashboard => "Forms",
            Self::FormBuilder => "Form Builder",
            Self::ClientDashboard => "My Forms",
        }
    }
}

/// Result of checking a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(Route),
}

/// Allow any signed-in user
pub fn require_auth(session: Option<&AuthSession>) -> GuardOutcome {
    if session.is_some() {
        GuardOutcome::Allow
    } else {
        tracing::debug!("not authenticated, redirecting to login");
        GuardOutcome::Redirect(Route::Login)
    }
}

fn require_role(session: Option<&AuthSession>, role: Role) -> GuardOutcome {
    if let GuardOutcome::Redirect(to) = require_auth(session) {
        return GuardOutcome::Redirect(to);
    }
    match session {
        Some(s) if s.user.role == role => GuardOutcome::Allow,
        _ => {
            tracing::debug!(?role, "role check failed, redirecting to login");
            GuardOutcome::Redirect(Route::Login)
        }
    }
}

pub fn require_admin(session: Option<&AuthSession>) -> GuardOutcome {
    require_role(session, Role::Admin)
}

pub fn require_client(session: Option<&AuthSession>) -> GuardOutcome {
    require_role(session, Role::Client)
}

/// Guard protecting a route
pub fn guard_route(route: Route, session: Option<&AuthSession>) -> GuardOutcome {
    match route {
        Route::Login => GuardOutcome::Allow,
        Route::AdminDashboard | Route::FormBuilder => require_admin(session),
        Route::ClientDashboard => require_client(session),
    }
}

/// Landing screen for the signed-in user
pub fn redirect_by_role(session: Option<&AuthSession>) -> Route {
    match session.map(|s| s.user.role) {
        Some(Role::Admin) => Route::AdminDashboard,
        Some(Role::Client) => Route::ClientDashboard,
        None => Route::Login,
    }
}
