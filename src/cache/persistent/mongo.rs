//! MongoDB-backed [`DocumentCollection`].

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, Collection};

use super::document::{CacheDocument, DocumentCollection};
use crate::error::Result;

/// Cache collection living in a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoCollection {
    client: Client,
    collection: Collection<CacheDocument>,
}

impl MongoCollection {
    /// Builds a client for `uri` and binds it to `database.collection`.
    ///
    /// The driver connects lazily, so this only fails on an unusable URI or
    /// client configuration.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::from_client(client, database, collection))
    }

    /// Wraps an existing client.
    pub fn from_client(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection(collection);
        Self { client, collection }
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find_one(&self, key: &str) -> Result<Option<CacheDocument>> {
        Ok(self.collection.find_one(doc! { "_id": key }).await?)
    }

    async fn update_one(&self, document: &CacheDocument) -> Result<u64> {
        let update = doc! {
            "$set": {
                "expired_at": document.expired_at,
                "value": document.value.as_str(),
            }
        };
        let result = self
            .collection
            .update_one(doc! { "_id": document.key.as_str() }, update)
            .await?;
        Ok(result.matched_count)
    }

    async fn insert_one(&self, document: &CacheDocument) -> Result<()> {
        self.collection.insert_one(document).await?;
        Ok(())
    }

    async fn delete_one(&self, key: &str) -> Result<u64> {
        let result = self.collection.delete_one(doc! { "_id": key }).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
