//! Credential resolution. The token itself only ever lives in a resolved
//! [`Credentials`] value that is handed to the API client; it is never
//! written back to the config or the log.

use crate::config::{EnvOverlay, Settings};
use crate::error::{Result, TrayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Email plus API token over HTTP basic auth (Jira Cloud).
    Basic,
    /// `Authorization: Bearer <token>`.
    Bearer,
    /// Personal access token for self-hosted Jira. Sent as a bearer token.
    Pat,
}

impl AuthMode {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("basic") {
            Some(AuthMode::Basic)
        } else if value.eq_ignore_ascii_case("bearer") {
            Some(AuthMode::Bearer)
        } else if value.eq_ignore_ascii_case("pat") {
            Some(AuthMode::Pat)
        } else {
            None
        }
    }
}

/// Resolved credentials, ready to be attached to requests.
#[derive(Clone)]
pub struct Credentials {
    mode: AuthMode,
    user: Option<String>,
    token: String,
}

impl Credentials {
    /// Resolve the configured auth mode against the process environment and
    /// the optional env file overlay. Fails when the mode is unknown, the
    /// token variable is unset or empty, or basic auth has no email.
    pub fn resolve(settings: &Settings, env: &EnvOverlay) -> Result<Self> {
        let mode = AuthMode::parse(&settings.auth_mode).ok_or_else(|| {
            TrayError::Auth(format!(
                "unknown auth_mode '{}' (expected basic, bearer or pat)",
                settings.auth_mode
            ))
        })?;

        let token = env
            .get(&settings.token_env)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                TrayError::Auth(format!(
                    "environment variable '{}' is not set; export it or point env_file at a file that does",
                    settings.token_env
                ))
            })?;

        let user = match mode {
            AuthMode::Basic => {
                let email = settings
                    .email
                    .as_deref()
                    .map(str::trim)
                    .filter(|email| !email.is_empty())
                    .ok_or_else(|| {
                        TrayError::Auth("auth_mode 'basic' requires email to be set".to_string())
                    })?;
                Some(email.to_string())
            }
            AuthMode::Bearer | AuthMode::Pat => None,
        };

        Ok(Credentials { mode, user, token })
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Attach the auth header to a request.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.mode {
            AuthMode::Basic => {
                let user = self.user.as_deref().unwrap_or_default();
                request.basic_auth(user, Some(&self.token))
            }
            AuthMode::Bearer | AuthMode::Pat => request.bearer_auth(&self.token),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("mode", &self.mode)
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}
