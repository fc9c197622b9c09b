// src/app/routes.rs
use std::fmt;

use crate::session::Session;

/// The screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Login,
    Register,
    Dashboard,
    Editor,
    Admin,
}

impl Screen {
    /// Screens that need a stored token.
    pub fn is_protected(self) -> bool {
        matches!(self, Screen::Dashboard | Screen::Editor | Screen::Admin)
    }

    /// Command that opens the screen from the command line.
    pub fn command(self) -> &'static str {
        match self {
            Screen::Home => "tiacher help",
            Screen::Login => "tiacher login <mail> <password>",
            Screen::Register => "tiacher register <name> <mail> <password> <confirm>",
            Screen::Dashboard => "tiacher models",
            Screen::Editor => "tiacher show",
            Screen::Admin => "tiacher users",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Home => "home",
            Screen::Login => "login",
            Screen::Register => "register",
            Screen::Dashboard => "dashboard",
            Screen::Editor => "editor",
            Screen::Admin => "admin",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(t) | Notice::Warning(t) | Notice::Error(t) => t,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// What a page action leaves behind: a message and where to go next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub notice: Option<Notice>,
    pub redirect: Option<Screen>,
}

impl Outcome {
    pub fn redirect(to: Screen) -> Self {
        Self {
            notice: None,
            redirect: Some(to),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::default().with_notice(Notice::Success(text.into()))
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::default().with_notice(Notice::Warning(text.into()))
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::default().with_notice(Notice::Error(text.into()))
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn with_error(self, text: impl Into<String>) -> Self {
        self.with_notice(Notice::Error(text.into()))
    }

    pub fn with_success(self, text: impl Into<String>) -> Self {
        self.with_notice(Notice::Success(text.into()))
    }

    pub fn then(mut self, to: Screen) -> Self {
        self.redirect = Some(to);
        self
    }

    pub fn is_error(&self) -> bool {
        self.notice.as_ref().is_some_and(Notice::is_error)
    }
}

/// Result of opening a page: its data, or an interruption.
pub type Page<T> = std::result::Result<T, Outcome>;

/// Session guard run before any protected page renders.
pub fn guard(session: &Session) -> Page<String> {
    session.token().ok_or_else(|| {
        log::info!("No session token, redirecting to {}", Screen::Login);
        Outcome::redirect(Screen::Login)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccessLevel;

    #[tokio::test]
    async fn test_guard_redirects_without_token() {
        let mut session = Session::in_memory();
        assert_eq!(guard(&session), Err(Outcome::redirect(Screen::Login)));

        session.store_login("a@b", AccessLevel::NORMAL, "tok").await.unwrap();
        assert_eq!(guard(&session), Ok("tok".to_string()));
    }

    #[test]
    fn test_outcome_builders() {
        let outcome = Outcome::redirect(Screen::Home).with_error("boom");
        assert!(outcome.is_error());
        assert_eq!(outcome.redirect, Some(Screen::Home));
        assert_eq!(outcome.notice.unwrap().text(), "boom");

        assert!(!Outcome::success("ok").then(Screen::Dashboard).is_error());
        assert!(Screen::Admin.is_protected());
        assert!(!Screen::Register.is_protected());
    }
}
