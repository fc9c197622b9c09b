// src/app/handlers/admin.rs
use log::{error, info};

use crate::app::{AppState, Outcome, Page, Screen, guard};
use crate::models::{Role, User};

pub const LOAD_USERS_FAILED: &str = "Error loading the user list. Please try again.";
pub const CHANGE_ROLE_FAILED: &str = "Error changing the user's role. Please try again.";

pub async fn open_admin(state: &AppState) -> Page<Vec<User>> {
    let token = guard(&state.session)?;

    state.backend.list_users(&token).await.map_err(|e| {
        error!("Error loading users: {}", e);
        Outcome::redirect(Screen::Dashboard).with_error(LOAD_USERS_FAILED)
    })
}

pub async fn change_role(state: &AppState, user_id: u64, role: Role) -> Outcome {
    let token = match guard(&state.session) {
        Ok(token) => token,
        Err(outcome) => return outcome,
    };

    match state.backend.change_role(&token, user_id, &role).await {
        Ok(()) => {
            info!("User {} is now {}", user_id, role);
            Outcome::success(format!("User {} is now {}.", user_id, role))
        }
        Err(e) => {
            error!("Error changing role: {}", e);
            Outcome::error(CHANGE_ROLE_FAILED)
        }
    }
}
