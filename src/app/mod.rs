// src/app/mod.rs
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::{Notice, Outcome, Page, Screen, guard};
pub use state::AppState;
