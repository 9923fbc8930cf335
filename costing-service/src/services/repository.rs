use crate::models::{Client, ClientDetails, CostRecord, System, SystemDetails};
use crate::services::database::{CostingDb, CLIENT_UNIQUE_INDEXES};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection,
};
use serde::Serialize;
use service_core::error::AppError;

const DUPLICATE_KEY: i32 = 11000;

/// What a cascading delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub clients: u64,
    pub systems: u64,
    pub costs: u64,
}

/// One page of cost records, newest first.
#[derive(Debug, Clone, Copy)]
pub struct CostPage {
    pub skip: u64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct CostingRepository {
    clients: Collection<Client>,
    systems: Collection<System>,
    costs: Collection<CostRecord>,
}

impl CostingRepository {
    pub fn new(db: &CostingDb) -> Self {
        Self {
            clients: db.clients(),
            systems: db.systems(),
            costs: db.costs(),
        }
    }

    // Clients

    pub async fn create_client(&self, client: &Client) -> Result<(), AppError> {
        self.clients
            .insert_one(client, None)
            .await
            .map_err(client_write_error)?;
        tracing::info!(client_id = %client.id, "Client created");
        Ok(())
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.clients.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get_client(&self, id: &str) -> Result<Option<Client>, AppError> {
        Ok(self.clients.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn update_client(
        &self,
        id: &str,
        details: &ClientDetails,
    ) -> Result<Option<Client>, AppError> {
        let update = doc! {
            "$set": {
                "name": &details.name,
                "phone_number": &details.phone_number,
                "email": &details.email,
                "address": &details.address,
                "updated_at": bson::DateTime::now(),
            }
        };
        let client = self
            .clients
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await
            .map_err(client_write_error)?;
        if client.is_some() {
            tracing::info!(client_id = %id, "Client updated");
        }
        Ok(client)
    }

    /// Delete a client with its systems and their cost records, children
    /// first. Returns `None` when the client does not exist.
    pub async fn delete_client(&self, id: &str) -> Result<Option<DeleteSummary>, AppError> {
        if self.get_client(id).await?.is_none() {
            return Ok(None);
        }

        let system_ids = self
            .systems
            .distinct("_id", doc! { "client_id": id }, None)
            .await?;
        let costs = self
            .costs
            .delete_many(doc! { "system_id": { "$in": system_ids } }, None)
            .await?
            .deleted_count;
        let systems = self
            .systems
            .delete_many(doc! { "client_id": id }, None)
            .await?
            .deleted_count;
        let clients = self
            .clients
            .delete_one(doc! { "_id": id }, None)
            .await?
            .deleted_count;

        let summary = DeleteSummary {
            clients,
            systems,
            costs,
        };
        tracing::info!(client_id = %id, ?summary, "Client deleted");
        Ok(Some(summary))
    }

    // Systems

    pub async fn create_system(&self, system: &System) -> Result<(), AppError> {
        self.systems.insert_one(system, None).await?;
        tracing::info!(system_id = %system.id, client_id = %system.client_id, "System created");
        Ok(())
    }

    pub async fn list_systems(&self, client_id: &str) -> Result<Vec<System>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .systems
            .find(doc! { "client_id": client_id }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get_system(&self, id: &str) -> Result<Option<System>, AppError> {
        Ok(self.systems.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn update_system(
        &self,
        id: &str,
        details: &SystemDetails,
    ) -> Result<Option<System>, AppError> {
        let update = doc! {
            "$set": {
                "system_size": &details.system_size,
                "system_type": details.system_type.as_str(),
                "system_location": &details.system_location,
                "updated_at": bson::DateTime::now(),
            }
        };
        let system = self
            .systems
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await?;
        if system.is_some() {
            tracing::info!(system_id = %id, "System updated");
        }
        Ok(system)
    }

    /// Delete a system and its cost records. Returns `None` when the system
    /// does not exist.
    pub async fn delete_system(&self, id: &str) -> Result<Option<DeleteSummary>, AppError> {
        if self.get_system(id).await?.is_none() {
            return Ok(None);
        }

        let costs = self
            .costs
            .delete_many(doc! { "system_id": id }, None)
            .await?
            .deleted_count;
        let systems = self
            .systems
            .delete_one(doc! { "_id": id }, None)
            .await?
            .deleted_count;

        let summary = DeleteSummary {
            clients: 0,
            systems,
            costs,
        };
        tracing::info!(system_id = %id, ?summary, "System deleted");
        Ok(Some(summary))
    }

    // Cost records

    pub async fn insert_cost(&self, record: &CostRecord) -> Result<(), AppError> {
        self.costs.insert_one(record, None).await?;
        tracing::info!(
            cost_id = %record.id,
            system_id = %record.system_id,
            final_price = record.final_price,
            "Cost record created"
        );
        Ok(())
    }

    pub async fn get_cost(&self, id: &str) -> Result<Option<CostRecord>, AppError> {
        Ok(self.costs.find_one(doc! { "_id": id }, None).await?)
    }

    /// Overwrite a stored record with its re-submission. Returns `false` when
    /// the record vanished in between.
    pub async fn replace_cost(&self, record: &CostRecord) -> Result<bool, AppError> {
        let result = self
            .costs
            .replace_one(doc! { "_id": &record.id }, record, None)
            .await?;
        if result.matched_count > 0 {
            tracing::info!(
                cost_id = %record.id,
                final_price = record.final_price,
                "Cost record updated"
            );
        }
        Ok(result.matched_count > 0)
    }

    pub async fn list_costs(
        &self,
        system_id: Option<&str>,
        page: CostPage,
    ) -> Result<(Vec<CostRecord>, u64), AppError> {
        let filter = match system_id {
            Some(system_id) => doc! { "system_id": system_id },
            None => doc! {},
        };

        let total = self.costs.count_documents(filter.clone(), None).await?;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(page.skip)
            .limit(page.limit)
            .build();
        let cursor = self.costs.find(filter, options).await?;
        Ok((cursor.try_collect().await?, total))
    }

    pub async fn list_costs_for_system(
        &self,
        system_id: &str,
    ) -> Result<Vec<CostRecord>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .costs
            .find(doc! { "system_id": system_id }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn delete_cost(&self, id: &str) -> Result<bool, AppError> {
        let deleted = self
            .costs
            .delete_one(doc! { "_id": id }, None)
            .await?
            .deleted_count;
        if deleted > 0 {
            tracing::info!(cost_id = %id, "Cost record deleted");
        }
        Ok(deleted > 0)
    }
}

fn return_updated() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

/// Turn a unique-index violation on the clients collection into a 409 naming
/// the contact field already in use.
fn client_write_error(err: MongoError) -> AppError {
    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY =>
        {
            Some(write_error.message.as_str())
        }
        ErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY => {
            Some(command_error.message.as_str())
        }
        _ => None,
    };

    match message {
        Some(message) => {
            let field = duplicate_field(message);
            tracing::warn!(field, "Rejected duplicate client contact");
            AppError::Conflict(anyhow::anyhow!(
                "A client with this {} already exists",
                field
            ))
        }
        None => AppError::from(err),
    }
}

fn duplicate_field(message: &str) -> &'static str {
    CLIENT_UNIQUE_INDEXES
        .iter()
        .find(|(_, index)| message.contains(index))
        .map(|(field, _)| match *field {
            "phone_number" => "phoneNumber",
            "email" => "email",
            _ => "address",
        })
        .unwrap_or("contact detail")
}
