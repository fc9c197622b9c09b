// src/catalog.rs
use log::{debug, warn};
use rand::seq::SliceRandom;
use std::str::FromStr;

use crate::errors::TiacherError;
use crate::models::AiModel;

const LEGACY_PREFERRED: &str = "chat gpt 4.5 preview";
const LEGACY_FAMILY_PREFIX: &str = "chat gpt 4.";

/// How a model is picked when auto-select is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoSelectStrategy {
    /// First entry of the filtered, prioritized list.
    #[default]
    First,
    /// Preferred name, else a random member of its family, else any random entry.
    Legacy,
}

impl FromStr for AutoSelectStrategy {
    type Err = TiacherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(AutoSelectStrategy::First),
            "legacy" => Ok(AutoSelectStrategy::Legacy),
            other => Err(TiacherError::Config(format!(
                "Unknown auto-select strategy '{}', expected first or legacy",
                other
            ))),
        }
    }
}

/// The list of selectable models, in display order.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<AiModel>,
}

impl ModelCatalog {
    /// Builds a catalog from `(name, identifier)` pairs in backend order.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            models: pairs.into_iter().map(|(n, v)| AiModel::new(n, v)).collect(),
        }
    }

    /// Sample catalog shown when the backend list cannot be loaded.
    pub fn fallback() -> Self {
        Self::from_pairs([
            ("OpenAI GPT 4o mini", "gpt-4o-mini"),
            ("Claude 3.5 Sonnet", "claude-3-5-sonnet"),
            ("Gemini 1.5 Flash", "gemini-1.5-flash"),
            ("Grok 1.5", "grok-1.5"),
        ])
    }

    pub fn models(&self) -> &[AiModel] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Moves entries matching `priority` to the front.
    ///
    /// Each entry goes into the bucket of the first priority fragment its
    /// name contains (case-insensitive). Buckets come out in priority
    /// order followed by the unmatched rest, all keeping backend order.
    pub fn prioritized(self, priority: &[String]) -> Self {
        let needles: Vec<String> = priority.iter().map(|p| p.to_lowercase()).collect();
        let mut buckets: Vec<Vec<AiModel>> = vec![Vec::new(); needles.len() + 1];

        for model in self.models {
            let name = model.name.to_lowercase();
            let slot = needles
                .iter()
                .position(|needle| !needle.is_empty() && name.contains(needle.as_str()))
                .unwrap_or(needles.len());
            buckets[slot].push(model);
        }

        Self {
            models: buckets.into_iter().flatten().collect(),
        }
    }

    /// Case-insensitive substring filter on the display name.
    pub fn search(&self, term: &str) -> Vec<&AiModel> {
        let term = term.to_lowercase();
        self.models
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&term))
            .collect()
    }

    /// Finds a model by display name (case-insensitive) or by identifier.
    pub fn find(&self, key: &str) -> Option<&AiModel> {
        let lowered = key.trim().to_lowercase();
        self.models
            .iter()
            .find(|m| m.name.to_lowercase() == lowered)
            .or_else(|| self.models.iter().find(|m| m.value == key.trim()))
    }
}

/// Picks a model out of an already filtered list.
pub fn auto_select<'a>(candidates: &[&'a AiModel], strategy: AutoSelectStrategy) -> Option<&'a AiModel> {
    if candidates.is_empty() {
        return None;
    }

    let picked = match strategy {
        AutoSelectStrategy::First => candidates.first().copied(),
        AutoSelectStrategy::Legacy => {
            let mut rng = rand::thread_rng();
            let lowered: Vec<String> = candidates.iter().map(|m| m.name.to_lowercase()).collect();

            if let Some(idx) = lowered.iter().position(|n| n.contains(LEGACY_PREFERRED)) {
                Some(candidates[idx])
            } else {
                let family: Vec<&AiModel> = candidates
                    .iter()
                    .zip(&lowered)
                    .filter(|(_, n)| n.starts_with(LEGACY_FAMILY_PREFIX))
                    .map(|(m, _)| *m)
                    .collect();
                if family.is_empty() {
                    warn!("No '{}' model available, picking at random", LEGACY_FAMILY_PREFIX);
                    candidates.choose(&mut rng).copied()
                } else {
                    family.choose(&mut rng).copied()
                }
            }
        }
    };

    if let Some(model) = picked {
        debug!("Auto-selected model {} ({})", model.name, model.value);
    }
    picked
}
