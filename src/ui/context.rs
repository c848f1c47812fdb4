//! Per-request context handed to every rendered page.
//!
//! Session and theme are plain values built from cookies and passed into
//! templates explicitly; nothing here is global.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

use crate::AppState;

pub const SESSION_COOKIE: &str = "campus_session";
pub const THEME_COOKIE: &str = "campus_theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }

    pub fn all() -> [Theme; 3] {
        [Theme::Light, Theme::Dark, Theme::System]
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authentication state visible to pages. Issuing and checking session
/// tokens belongs to the auth service; the shell only carries the cookie.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Option<String>,
}

impl SessionContext {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());
        Self { token }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThemeContext {
    pub theme: Theme,
}

impl ThemeContext {
    /// Theme cookie if it names a known theme, otherwise the configured default
    pub fn from_jar(jar: &CookieJar, default: Theme) -> Self {
        let theme = jar
            .get(THEME_COOKIE)
            .and_then(|c| Theme::from_str(c.value()))
            .unwrap_or(default);
        Self { theme }
    }
}

/// Layout context: the session provider wraps the theme provider
#[derive(Debug, Clone)]
pub struct Shell {
    pub session: SessionContext,
    pub theme: ThemeContext,
    pub version: &'static str,
}

impl Shell {
    pub fn new(session: SessionContext, theme: ThemeContext) -> Self {
        Self {
            session,
            theme,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Shell {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Shell::new(
            SessionContext::from_jar(&jar),
            ThemeContext::from_jar(&jar, state.config.ui.default_theme),
        ))
    }
}
