// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TiacherError;

/// Role as stored by the backend and shown in the admin roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Normal,
    Admin,
    Removed,
    /// A value this client does not know about, kept verbatim.
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Normal => "NORMAL",
            Role::Admin => "ADMIN",
            Role::Removed => "ELIMINADO",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "NORMAL" => Role::Normal,
            "ADMIN" => Role::Admin,
            "ELIMINADO" => Role::Removed,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl FromStr for Role {
    type Err = TiacherError;

    /// Parses a role given by a user; unknown values are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Role::from(s.to_string()) {
            Role::Other(raw) => Err(TiacherError::Validation(format!(
                "Unknown role '{}', expected NORMAL, ADMIN or ELIMINADO",
                raw
            ))),
            role => Ok(role),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row of the admin roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "id_usuario")]
    pub id: u64,
    pub name: String,
    #[serde(rename = "mail")]
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// Numeric access level returned at login and stored under `rol`.
/// Defaults to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AccessLevel(pub i64);

impl AccessLevel {
    pub const PENDING: AccessLevel = AccessLevel(0);
    pub const NORMAL: AccessLevel = AccessLevel(1);
    pub const ADMIN: AccessLevel = AccessLevel(2);

    pub fn can_enter(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logo shown next to a model, picked by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelLogo {
    Claude,
    Grok,
    Gemini,
    Gpt,
}

impl ModelLogo {
    pub fn for_name(name: &str) -> Self {
        let key = name.to_lowercase();
        if key.contains("claude") {
            ModelLogo::Claude
        } else if key.contains("grok") {
            ModelLogo::Grok
        } else if key.contains("gemini") {
            ModelLogo::Gemini
        } else {
            ModelLogo::Gpt
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            ModelLogo::Claude => "/images/claude-logo.png",
            ModelLogo::Grok => "/images/grok-logo.png",
            ModelLogo::Gemini => "/images/gemini-logo.png",
            ModelLogo::Gpt => "/images/gpt-logo.png",
        }
    }
}

/// An entry of the model catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiModel {
    pub name: String,
    pub value: String,
    pub logo: ModelLogo,
}

impl AiModel {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let logo = ModelLogo::for_name(&name);
        Self {
            name,
            value: value.into(),
            logo,
        }
    }
}

/// What the generation request should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationKind {
    #[default]
    Exam,
    Exercise,
}

impl GenerationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationKind::Exam => "exam",
            GenerationKind::Exercise => "exercise",
        }
    }
}

impl FromStr for GenerationKind {
    type Err = TiacherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exam" => Ok(GenerationKind::Exam),
            "exercise" => Ok(GenerationKind::Exercise),
            other => Err(TiacherError::Validation(format!(
                "Unknown generation type '{}', expected exam or exercise",
                other
            ))),
        }
    }
}
