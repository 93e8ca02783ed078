use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use shared_api_client::{ApiClient, ResourceClient};
use shared_models::{AppError, EntityId};

use crate::schema::EntitySchema;

/// Read-only copy of another entity's collection, used to fill selection
/// inputs. Never merged into the owning manager's items.
pub struct ReferenceLookup<S: EntitySchema> {
    client: ResourceClient,
    options: Arc<RwLock<Vec<S::Entity>>>,
    _schema: PhantomData<S>,
}

impl<S: EntitySchema> Clone for ReferenceLookup<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            options: self.options.clone(),
            _schema: PhantomData,
        }
    }
}

impl<S: EntitySchema> ReferenceLookup<S> {
    pub fn new(api: &ApiClient) -> Self {
        Self {
            client: api.resource(S::COLLECTION),
            options: Arc::new(RwLock::new(Vec::new())),
            _schema: PhantomData,
        }
    }

    /// Fetches the collection without touching the current options.
    pub async fn fetch(&self) -> Result<Vec<S::Entity>, AppError> {
        let items = self.client.list::<S::Entity>().await?;
        debug!("Fetched {} {} for selection", items.len(), S::PLURAL);
        Ok(items)
    }

    pub async fn replace(&self, items: Vec<S::Entity>) {
        *self.options.write().await = items;
    }

    pub async fn options(&self) -> Vec<S::Entity> {
        self.options.read().await.clone()
    }

    pub async fn find(&self, id: &EntityId) -> Option<S::Entity> {
        self.options.read().await
            .iter()
            .find(|item| S::entity_id(item) == id)
            .cloned()
    }

    pub async fn contains(&self, id: &EntityId) -> bool {
        self.find(id).await.is_some()
    }
}
