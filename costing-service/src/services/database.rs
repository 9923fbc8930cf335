use crate::models::{Client, CostRecord, System};
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

/// Unique indexes on client contact fields, by the field they guard.
pub const CLIENT_UNIQUE_INDEXES: [(&str, &str); 3] = [
    ("phone_number", "client_phone_number_unique"),
    ("email", "client_email_unique"),
    ("address", "client_address_unique"),
];

#[derive(Clone)]
pub struct CostingDb {
    client: MongoClient,
    db: Database,
}

impl CostingDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for costing-service");

        let client_indexes = CLIENT_UNIQUE_INDEXES.map(|(field, name)| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(name.to_string())
                        .unique(true)
                        .build(),
                )
                .build()
        });
        self.clients()
            .create_indexes(client_indexes, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create unique indexes on clients collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique indexes on clients.(phone_number, email, address)");

        let owner_index = IndexModel::builder()
            .keys(doc! { "client_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("system_client_lookup".to_string())
                    .build(),
            )
            .build();
        self.systems()
            .create_index(owner_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create client_id index on systems collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on systems.client_id");

        // Serves both the per-system listing and the newest-first page
        let system_recent_index = IndexModel::builder()
            .keys(doc! { "system_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("cost_system_recent".to_string())
                    .build(),
            )
            .build();
        let recent_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("cost_recent".to_string())
                    .build(),
            )
            .build();
        self.costs()
            .create_indexes([system_recent_index, recent_index], None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create indexes on costs collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created indexes on costs.(system_id, created_at)");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn clients(&self) -> Collection<Client> {
        self.db.collection("clients")
    }

    pub fn systems(&self) -> Collection<System> {
        self.db.collection("systems")
    }

    pub fn costs(&self) -> Collection<CostRecord> {
        self.db.collection("costs")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}
