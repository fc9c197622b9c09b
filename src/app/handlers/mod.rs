// src/app/handlers/mod.rs
pub mod admin;
pub mod dashboard;
pub mod editor;
pub mod login;
pub mod register;

use log::{error, info};

use crate::app::{AppState, Outcome, Screen};

pub const CONNECTION_FAILED: &str = "Could not connect to the server. Please try again later.";

/// Forgets the whole session and goes back to the home screen.
pub async fn logout(state: &mut AppState) -> Outcome {
    match state.session.clear().await {
        Ok(()) => {
            info!("Session cleared");
            Outcome::redirect(Screen::Home).with_success("Logged out.")
        }
        Err(e) => {
            error!("Failed to clear session: {}", e);
            Outcome::error(format!("Could not clear the session: {}", e))
        }
    }
}
