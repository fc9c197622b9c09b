// src/app/handlers/editor.rs
use log::{error, info};
use std::path::PathBuf;

use crate::app::{AppState, Outcome, Page, Screen, guard};
use crate::download::save_document;
use crate::errors::Result;
use crate::exam::ExamDraft;

pub const SAVE_FAILED: &str = "Error saving the exam. Please try again.";

/// Loads the draft left by the dashboard.
pub fn open_editor(state: &AppState) -> Page<ExamDraft> {
    guard(&state.session)?;

    match state.session.exam_draft() {
        Ok(Some(draft)) => Ok(draft),
        Ok(None) => Err(Outcome::redirect(Screen::Dashboard)),
        Err(e) => {
            error!("Error reading the stored exam: {}", e);
            Err(Outcome::redirect(Screen::Dashboard)
                .with_error(format!("The stored exam is unreadable: {}", e)))
        }
    }
}

/// Applies one edit to the stored draft and writes it back.
pub async fn edit<F>(state: &mut AppState, apply: F) -> Page<ExamDraft>
where
    F: FnOnce(&mut ExamDraft) -> Result<()>,
{
    let mut draft = open_editor(state)?;
    apply(&mut draft).map_err(|e| Outcome::error(e.to_string()))?;
    state
        .session
        .store_draft(&draft)
        .await
        .map_err(|e| Outcome::error(format!("Could not store the draft: {}", e)))?;
    Ok(draft)
}

/// Submits the draft and writes the returned PDF to the output directory.
pub async fn save_exam(state: &mut AppState, draft: &ExamDraft) -> Page<PathBuf> {
    guard(&state.session)?;

    match submit(state, draft).await {
        Ok(path) => {
            info!("Exam {} saved to {}", draft.id, path.display());
            Ok(path)
        }
        Err(e) => {
            error!("Error saving the exam: {}", e);
            Err(Outcome::error(SAVE_FAILED))
        }
    }
}

async fn submit(state: &mut AppState, draft: &ExamDraft) -> Result<PathBuf> {
    state.session.store_exam_meta(&draft.meta).await?;
    let token = state.session.require_token()?;

    let document = state
        .backend
        .finalize_exam(&token, &draft.to_final())
        .await?;
    save_document(&state.config().output_dir, &document.filename, &document.bytes).await
}
