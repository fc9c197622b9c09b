// src/app/handlers/dashboard.rs
use log::{error, info, warn};

use crate::app::handlers::CONNECTION_FAILED;
use crate::app::{AppState, Outcome, Page, Screen, guard};
use crate::catalog::{AutoSelectStrategy, ModelCatalog, auto_select};
use crate::errors::TiacherError;
use crate::models::{AiModel, GenerationKind};
use crate::upload::FileSelection;

pub const NO_MATCHING_MODELS: &str = "No AI models match your search.";
pub const NO_MODEL_SELECTED: &str = "Select an AI model first.";
pub const NO_FILES_SELECTED: &str = "Add at least one PDF file first.";

pub struct Dashboard {
    /// Prioritized catalog.
    pub catalog: ModelCatalog,
    /// True when the backend list could not be loaded and samples are shown.
    pub fallback: bool,
    pub is_admin: bool,
    pub email: Option<String>,
}

pub async fn open_dashboard(state: &AppState) -> Page<Dashboard> {
    let token = guard(&state.session)?;

    let (catalog, fallback) = match state.backend.list_models(&token).await {
        Ok(catalog) => (catalog, false),
        Err(e) => {
            warn!("Error loading models, showing sample catalog: {}", e);
            (ModelCatalog::fallback(), true)
        }
    };

    Ok(Dashboard {
        catalog: catalog.prioritized(&state.config().model_priority),
        fallback,
        is_admin: state.session.is_admin(),
        email: state.session.user_email(),
    })
}

/// Resolves the model to use from the search term and either auto-select
/// or an explicit name/identifier.
pub fn select_model(
    catalog: &ModelCatalog,
    search: &str,
    requested: Option<&str>,
    auto: bool,
    strategy: AutoSelectStrategy,
) -> Page<AiModel> {
    let filtered = catalog.search(search);
    if filtered.is_empty() {
        return Err(Outcome::warning(NO_MATCHING_MODELS));
    }

    let picked = if auto {
        auto_select(&filtered, strategy)
    } else {
        let Some(requested) = requested else {
            return Err(Outcome::warning(NO_MODEL_SELECTED));
        };
        catalog
            .find(requested)
            .filter(|m| filtered.iter().any(|f| f.value == m.value))
    };

    picked
        .cloned()
        .ok_or_else(|| Outcome::warning(NO_MATCHING_MODELS))
}

/// Sends the selected PDFs to the backend and keeps the resulting draft.
pub async fn generate(
    state: &mut AppState,
    model: &AiModel,
    files: &FileSelection,
    kind: GenerationKind,
) -> Outcome {
    let token = match guard(&state.session) {
        Ok(token) => token,
        Err(outcome) => return outcome,
    };
    if files.is_empty() {
        return Outcome::warning(NO_FILES_SELECTED);
    }

    let payload = match files.load().await {
        Ok(payload) => payload,
        Err(e) => return Outcome::error(format!("Could not read the selected files: {}", e)),
    };

    let created = match state
        .backend
        .create_exam(&token, &model.value, kind, payload)
        .await
    {
        Ok(created) => created,
        Err(TiacherError::ApiError { message, .. }) => {
            return Outcome::error(format!("Error: {}", message));
        }
        Err(e) => {
            error!("Exam creation request failed: {}", e);
            return Outcome::error(CONNECTION_FAILED);
        }
    };

    let stored = match created.exam_id() {
        Ok(id) => match state.session.store_created_exam(&id, &created.questions).await {
            Ok(()) => Ok(id),
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };
    match stored {
        Ok(id) => {
            info!("Exam {} created", id);
            Outcome::redirect(Screen::Editor).with_success(format!(
                "Exam created with {} question(s).",
                created.questions.len()
            ))
        }
        Err(e) => {
            error!("Could not keep the created exam: {}", e);
            Outcome::error(format!("Error: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ModelCatalog {
        ModelCatalog::fallback().prioritized(&["claude".to_string()])
    }

    #[test]
    fn test_explicit_selection_respects_search() {
        let catalog = catalog();
        let model = select_model(&catalog, "", Some("grok-1.5"), false, AutoSelectStrategy::First).unwrap();
        assert_eq!(model.name, "Grok 1.5");

        let hidden = select_model(&catalog, "gemini", Some("grok-1.5"), false, AutoSelectStrategy::First);
        assert_eq!(hidden.unwrap_err(), Outcome::warning(NO_MATCHING_MODELS));

        let none = select_model(&catalog, "", None, false, AutoSelectStrategy::First);
        assert_eq!(none.unwrap_err(), Outcome::warning(NO_MODEL_SELECTED));
    }

    #[test]
    fn test_auto_selection_uses_prioritized_order() {
        let catalog = catalog();
        let model = select_model(&catalog, "", Some("grok-1.5"), true, AutoSelectStrategy::First).unwrap();
        assert_eq!(model.value, "claude-3-5-sonnet");

        let model = select_model(&catalog, "gem", None, true, AutoSelectStrategy::First).unwrap();
        assert_eq!(model.value, "gemini-1.5-flash");

        let empty = select_model(&catalog, "zzz", None, true, AutoSelectStrategy::First);
        assert!(empty.is_err());
    }
}
