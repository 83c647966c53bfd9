use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client as MongoClient, Collection, Database};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;

use crate::models::Session;

/// Process-wide MongoDB connection, established once at startup.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &Secret<String>, database: &str) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(uri.expose_secret()).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::DatabaseError(e.into())
        })?;
        options.app_name = Some("session-service".to_string());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(e.into())
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Connected to MongoDB");

        Ok(Self { client, db })
    }

    /// Ping the server; the driver connects lazily, so this is the first
    /// moment a bad URI actually surfaces.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB ping failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn sessions(&self) -> Collection<Session> {
        self.db.collection("sessions")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}
