// src/session.rs
//! Session state kept between invocations: the login token, role and the
//! in-progress exam. All storage keys are read and written here only.

use async_trait::async_trait;
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TiacherError};
use crate::exam::{ExamDraft, ExamMeta, RawQuestion};
use crate::models::AccessLevel;

const TOKEN: &str = "token";
const ROLE: &str = "rol";
const USER_EMAIL: &str = "userEmail";
const EXAM_ID: &str = "examId";
const EXAM_DATA: &str = "examData";
const EXAM_META: &str = "examMeta";

const SESSION_FILE: &str = "session.json";

/// A string key/value store with the semantics of browser local storage.
/// Reads come from memory; writes may hit the disk.
#[async_trait]
pub trait Storage: Send {
    fn get(&self, key: &str) -> Option<String>;
    async fn set(&mut self, key: &str, value: &str) -> Result<()>;
    async fn clear(&mut self) -> Result<()>;
}

/// In-process store, used by tests and one-shot runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

#[async_trait]
impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// Store backed by a JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl FileStorage {
    /// Opens (or starts) the session file inside `dir`.
    pub async fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(SESSION_FILE);
        let entries = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            if raw.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&raw)? {
                    Value::Object(map) => map,
                    _ => {
                        return Err(TiacherError::Config(format!(
                            "session file {} is not a JSON object",
                            path.display()
                        )));
                    }
                }
            }
        } else {
            Map::new()
        };
        debug!("Opened session store at {}", path.display());
        Ok(Self { path, entries })
    }

    async fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_string_pretty(&self.entries)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .insert(key.to_string(), Value::String(value.to_string()));
        self.flush().await
    }

    async fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.flush().await
    }
}

/// Typed access to the session keys.
pub struct Session {
    store: Box<dyn Storage>,
}

impl Session {
    pub fn new(store: impl Storage + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN).filter(|t| !t.is_empty())
    }

    /// The token, or `MissingToken` when nobody is logged in.
    pub fn require_token(&self) -> Result<String> {
        self.token().ok_or(TiacherError::MissingToken)
    }

    pub fn role(&self) -> Option<String> {
        self.store.get(ROLE)
    }

    /// UI-level admin check on the stored role value.
    pub fn is_admin(&self) -> bool {
        self.role()
            .is_some_and(|role| role.trim() == AccessLevel::ADMIN.to_string())
    }

    pub fn user_email(&self) -> Option<String> {
        self.store.get(USER_EMAIL)
    }

    pub async fn store_login(&mut self, email: &str, access: AccessLevel, token: &str) -> Result<()> {
        self.store.set(USER_EMAIL, email).await?;
        self.store.set(ROLE, &access.to_string()).await?;
        self.store.set(TOKEN, token).await?;
        info!("Stored session for {}", email);
        Ok(())
    }

    pub fn exam_id(&self) -> Option<String> {
        self.store.get(EXAM_ID).filter(|id| !id.is_empty())
    }

    /// Keeps a freshly created exam for the editor.
    pub async fn store_created_exam(&mut self, id: &str, questions: &[RawQuestion]) -> Result<()> {
        self.store.set(EXAM_ID, id).await?;
        let data = serde_json::to_string(questions)?;
        self.store.set(EXAM_DATA, &data).await?;
        Ok(())
    }

    pub fn exam_meta(&self) -> ExamMeta {
        ExamMeta::from_stored(self.store.get(EXAM_META).as_deref())
    }

    pub async fn store_exam_meta(&mut self, meta: &ExamMeta) -> Result<()> {
        let meta = serde_json::to_string(meta)?;
        self.store.set(EXAM_META, &meta).await
    }

    /// Stored questions; an unreadable payload yields an empty list.
    pub fn exam_questions(&self) -> Vec<RawQuestion> {
        match self.store.get(EXAM_DATA) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::error!("Error parsing stored exam data: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// Rebuilds the draft from storage, `None` when no exam was created.
    pub fn exam_draft(&self) -> Result<Option<ExamDraft>> {
        let Some(id) = self.exam_id() else {
            return Ok(None);
        };
        let draft = ExamDraft::from_raw(id, self.exam_meta(), &self.exam_questions())?;
        Ok(Some(draft))
    }

    /// Writes an edited draft back so a later run resumes it.
    pub async fn store_draft(&mut self, draft: &ExamDraft) -> Result<()> {
        self.store.set(EXAM_ID, &draft.id).await?;
        let data = serde_json::to_string(&draft.to_raw())?;
        self.store.set(EXAM_DATA, &data).await?;
        self.store_exam_meta(&draft.meta).await
    }

    /// Logout: forgets everything.
    pub async fn clear(&mut self) -> Result<()> {
        self.store.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_keys_and_admin_gate() {
        let mut session = Session::in_memory();
        assert!(matches!(session.require_token(), Err(TiacherError::MissingToken)));
        assert!(!session.is_admin());

        session
            .store_login("ana@educa.jcyl.es", AccessLevel::ADMIN, "tok-1")
            .await
            .unwrap();
        assert_eq!(session.require_token().unwrap(), "tok-1");
        assert_eq!(session.role().as_deref(), Some("2"));
        assert!(session.is_admin());

        session
            .store_login("ana@educa.jcyl.es", AccessLevel::NORMAL, "tok-2")
            .await
            .unwrap();
        assert!(!session.is_admin());

        session.clear().await.unwrap();
        assert!(session.token().is_none());
        assert!(session.user_email().is_none());
    }

    #[tokio::test]
    async fn test_draft_round_trip_through_storage() {
        let mut session = Session::in_memory();
        assert!(session.exam_draft().unwrap().is_none());

        let raw: Vec<RawQuestion> = serde_json::from_value(json!([{
            "pregunta": "Q1",
            "respuestas": {"1": "a", "2": "b", "3": "c", "4": "d"},
            "correcta": 2
        }]))
        .unwrap();
        session.store_created_exam("99", &raw).await.unwrap();

        let mut draft = session.exam_draft().unwrap().unwrap();
        assert_eq!(draft.id, "99");
        assert_eq!(draft.meta, ExamMeta::default());

        draft.mark_correct(1, 4).unwrap();
        draft.meta.title = "Parcial".to_string();
        session.store_draft(&draft).await.unwrap();

        let resumed = session.exam_draft().unwrap().unwrap();
        assert_eq!(resumed, draft);
    }

    #[tokio::test]
    async fn test_file_storage_persists_and_clears() {
        let dir = std::env::temp_dir().join(format!("tiacher-session-{}", uuid::Uuid::new_v4()));

        let mut store = FileStorage::open(&dir).await.unwrap();
        assert!(store.get(TOKEN).is_none());
        store.set(TOKEN, "tok-9").await.unwrap();
        store.set(ROLE, "1").await.unwrap();

        let mut reopened = FileStorage::open(&dir).await.unwrap();
        assert_eq!(reopened.get(TOKEN).as_deref(), Some("tok-9"));
        assert_eq!(reopened.get(ROLE).as_deref(), Some("1"));

        reopened.clear().await.unwrap();
        assert!(FileStorage::open(&dir).await.unwrap().get(TOKEN).is_none());

        tokio::fs::write(dir.join(SESSION_FILE), "[1, 2]").await.unwrap();
        assert!(matches!(FileStorage::open(&dir).await, Err(TiacherError::Config(_))));
    }
}
