use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use serde_json::Value;
use service_core::error::AppError;
use tokio::sync::RwLock;

use crate::models::Session;
use crate::services::MongoDb;

/// Persistence seam for sessions.
///
/// Handlers only ever talk to this trait; backends decide how documents are
/// kept. Ids are assigned by the store at insert time and opaque to callers,
/// so a malformed id is indistinguishable from an unknown one.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session and return its assigned id.
    async fn insert(&self, data: Value) -> Result<String, AppError>;

    /// Every stored session, in no particular order.
    async fn find_all(&self) -> Result<Vec<Session>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError>;

    /// Swap an existing session's payload wholesale. Returns `false` when no
    /// session with that id exists.
    async fn replace(&self, id: &str, data: Value) -> Result<bool, AppError>;

    /// Remove a session if present. Deleting an unknown id is not an error;
    /// the result says whether anything was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, AppError>;

    /// Liveness probe backing the health endpoint.
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Sessions in a MongoDB collection, one document per session.
pub struct MongoSessionStore {
    db: MongoDb,
}

impl MongoSessionStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn insert(&self, data: Value) -> Result<String, AppError> {
        let session = Session::new(data);
        self.db
            .sessions()
            .insert_one(&session, None)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session.id, "Failed to insert session: {}", e);
                AppError::from(e)
            })?;
        Ok(session.id)
    }

    async fn find_all(&self) -> Result<Vec<Session>, AppError> {
        let cursor = self
            .db
            .sessions()
            .find(None, None)
            .await
            .map_err(AppError::from)?;
        let sessions = cursor.try_collect().await.map_err(AppError::from)?;
        Ok(sessions)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError> {
        let session = self
            .db
            .sessions()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)?;
        Ok(session)
    }

    async fn replace(&self, id: &str, data: Value) -> Result<bool, AppError> {
        let replacement = Session {
            id: id.to_string(),
            data,
        };
        let result = self
            .db
            .sessions()
            .replace_one(doc! { "_id": id }, &replacement, None)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %id, "Failed to replace session: {}", e);
                AppError::from(e)
            })?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, AppError> {
        let result = self
            .db
            .sessions()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }
}

/// Hash-map backend: a substitutable fake for tests and a non-durable mode
/// for local development without a mongod.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, data: Value) -> Result<String, AppError> {
        let session = Session::new(data);
        let id = session.id.clone();
        self.sessions.write().await.insert(id.clone(), session);
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Session>, AppError> {
        Ok(self.sessions.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn replace(&self, id: &str, data: Value) -> Result<bool, AppError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) => {
                session.data = data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
