// src/app/handlers/login.rs
use log::{error, info, warn};

use crate::app::handlers::CONNECTION_FAILED;
use crate::app::{AppState, Outcome, Screen};
use crate::errors::TiacherError;

pub const PENDING_ACCESS: &str =
    "Your account has no access permissions or is pending activation.";

pub async fn login(state: &mut AppState, mail: &str, password: &str) -> Outcome {
    if state.session.token().is_some() {
        return Outcome::redirect(Screen::Dashboard);
    }

    let reply = match state.backend.login(mail, password).await {
        Ok(reply) => reply,
        Err(TiacherError::ApiError { status, message }) => {
            warn!("Login rejected with status {}", status);
            return Outcome::error(message);
        }
        Err(TiacherError::Request(e)) => {
            error!("Error logging in: {}", e);
            return Outcome::redirect(Screen::Home).with_error(CONNECTION_FAILED);
        }
        Err(e) => {
            error!("Error logging in: {}", e);
            return Outcome::redirect(Screen::Home).with_error(e.to_string());
        }
    };

    if !(reply.logged && reply.access.can_enter()) {
        info!("Login for {} accepted without access (level {})", mail, reply.access);
        return Outcome::error(PENDING_ACCESS);
    }

    let Some(token) = reply.token.filter(|t| !t.is_empty()) else {
        error!("Login reply for {} carried no token", mail);
        return Outcome::error("The server did not return a session token.");
    };
    let email = reply.mail.unwrap_or_else(|| mail.to_string());

    match state.session.store_login(&email, reply.access, &token).await {
        Ok(()) => {
            info!("Login successful for {}", email);
            Outcome::redirect(Screen::Dashboard).with_success(format!("Logged in as {}.", email))
        }
        Err(e) => Outcome::error(format!("Could not store the session: {}", e)),
    }
}
