// src/app/handlers/register.rs
use log::{error, info};

use crate::app::handlers::CONNECTION_FAILED;
use crate::app::{AppState, Outcome, Screen};
use crate::errors::{Result, TiacherError};

pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";
pub const INVALID_MAIL: &str = "The mail address is not valid.";
pub const REGISTERED: &str = "Registration successful. You can log in now.";

/// Local checks run before anything is sent; returns the normalized mail.
pub fn validate(mail: &str, password: &str, confirm: &str, domain: &str) -> Result<String> {
    if password != confirm {
        return Err(TiacherError::Validation(PASSWORD_MISMATCH.to_string()));
    }
    let mail = mail.trim().to_lowercase();
    if !mail.ends_with(&domain.to_lowercase()) {
        return Err(TiacherError::Validation(INVALID_MAIL.to_string()));
    }
    Ok(mail)
}

pub async fn register(
    state: &mut AppState,
    name: &str,
    mail: &str,
    password: &str,
    confirm: &str,
) -> Outcome {
    if state.session.token().is_some() {
        return Outcome::redirect(Screen::Dashboard);
    }

    let mail = match validate(mail, password, confirm, &state.config().mail_domain) {
        Ok(mail) => mail,
        Err(e) => return Outcome::error(e.to_string()),
    };

    match state.backend.register(name, &mail, password).await {
        Ok(()) => {
            info!("Registered {}", mail);
            Outcome::redirect(Screen::Login).with_success(REGISTERED)
        }
        Err(TiacherError::ApiError { message, .. }) => Outcome::error(message),
        Err(e) => {
            error!("Error registering: {}", e);
            Outcome::error(CONNECTION_FAILED)
        }
    }
}
