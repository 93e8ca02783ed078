use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use notification_cell::NotificationChannel;
use shared_api_client::{ApiClient, ResourceClient};
use shared_models::{AppError, EntityId};

use crate::confirm::Confirm;
use crate::models::{FormMode, Outcome, TableView};
use crate::schema::EntitySchema;
use crate::services::filter::filter_items;

struct ManagerState<S: EntitySchema> {
    items: Vec<S::Entity>,
    search_term: String,
    is_form_open: bool,
    mode: FormMode<S::Entity>,
    draft: S::Draft,
}

impl<S: EntitySchema> Default for ManagerState<S> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search_term: String::new(),
            is_form_open: false,
            mode: FormMode::Create,
            draft: S::Draft::default(),
        }
    }
}

/// List view plus edit form for one entity type.
///
/// The collection is always replaced wholesale from the server after a
/// successful mutation; local state is never patched. No lock is held while
/// a request is in flight, so operations may overlap and the last `load` to
/// finish wins.
pub struct ResourceManager<S: EntitySchema> {
    client: ResourceClient,
    notifier: NotificationChannel,
    confirm: Arc<dyn Confirm>,
    state: Arc<RwLock<ManagerState<S>>>,
}

impl<S: EntitySchema> Clone for ResourceManager<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            notifier: self.notifier.clone(),
            confirm: self.confirm.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S: EntitySchema> ResourceManager<S> {
    pub fn new(api: &ApiClient, notifier: NotificationChannel, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            client: api.resource(S::COLLECTION),
            notifier,
            confirm,
            state: Arc::new(RwLock::new(ManagerState::default())),
        }
    }

    pub fn notifier(&self) -> &NotificationChannel {
        &self.notifier
    }

    /// Replaces `items` with the server's collection.
    #[instrument(skip(self), fields(collection = S::COLLECTION))]
    pub async fn load(&self) -> Outcome {
        match self.client.list::<S::Entity>().await {
            Ok(items) => {
                debug!("Loaded {} {}", items.len(), S::PLURAL);
                self.state.write().await.items = items;
                Outcome::Completed
            }
            Err(e) => {
                error!("Error fetching {}: {}", S::PLURAL, e);
                self.notifier.error(S::fetch_failure_message()).await;
                Outcome::Failed
            }
        }
    }

    pub async fn begin_create(&self) {
        let mut state = self.state.write().await;
        state.mode = FormMode::Create;
        state.draft = S::Draft::default();
        state.is_form_open = true;
    }

    pub async fn begin_edit(&self, item: &S::Entity) {
        let mut state = self.state.write().await;
        state.mode = FormMode::Edit(item.clone());
        state.draft = S::draft_from(item);
        state.is_form_open = true;
    }

    /// Opens the form for the loaded item with `id`. Returns `false` when it
    /// is not in the current collection.
    pub async fn begin_edit_by_id(&self, id: &EntityId) -> bool {
        let item = self.find(id).await;
        match item {
            Some(item) => {
                self.begin_edit(&item).await;
                true
            }
            None => {
                warn!("No {} with id {} in the current list", S::SINGULAR, id);
                false
            }
        }
    }

    /// Closes the form without submitting. Drafts are discarded on the next
    /// `begin_create` or `begin_edit`.
    pub async fn cancel_form(&self) {
        self.state.write().await.is_form_open = false;
    }

    #[instrument(skip(self), fields(collection = S::COLLECTION))]
    pub async fn submit(&self) -> Outcome {
        let (target, draft) = {
            let state = self.state.read().await;
            if !state.is_form_open {
                warn!("Submit ignored: {} form is not open", S::SINGULAR);
                return Outcome::Declined;
            }
            (state.mode.current().map(|item| S::entity_id(item).clone()), state.draft.clone())
        };

        let result = match S::payload(&draft) {
            Ok(payload) => {
                debug!("Submitting {} payload: {:?}", S::SINGULAR, payload);
                match &target {
                    None => self.client.create(&payload).await,
                    Some(id) => self.client.update(id, &payload).await,
                }
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.state.write().await.is_form_open = false;
                let message = match &target {
                    None => S::created_message(),
                    Some(_) => S::updated_message(),
                };
                info!("{}", message);
                self.notifier.success(message).await;
                self.load().await;
                Outcome::Completed
            }
            Err(e) => {
                error!("Error saving {}: {}", S::SINGULAR, e);
                self.notifier.error(S::save_failure_message()).await;
                Outcome::Failed
            }
        }
    }

    #[instrument(skip(self), fields(collection = S::COLLECTION))]
    pub async fn delete(&self, id: &EntityId) -> Outcome {
        if !self.confirm.confirm(&S::delete_prompt()).await {
            debug!("Deletion of {} {} declined", S::SINGULAR, id);
            return Outcome::Declined;
        }

        match self.client.delete(id).await {
            Ok(()) => {
                let message = S::deleted_message();
                info!("{}", message);
                self.notifier.success(message).await;
                self.load().await;
                Outcome::Completed
            }
            Err(e) => {
                error!("Error deleting {} {}: {}", S::SINGULAR, id, e);
                self.notifier.error(S::delete_failure_message()).await;
                Outcome::Failed
            }
        }
    }

    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.state.write().await.search_term = term.into();
    }

    /// Display sequence for the current items and search term.
    pub async fn filtered(&self) -> Vec<S::Entity> {
        let state = self.state.read().await;
        filter_items::<S>(&state.items, &state.search_term)
    }

    pub async fn items(&self) -> Vec<S::Entity> {
        self.state.read().await.items.clone()
    }

    pub async fn find(&self, id: &EntityId) -> Option<S::Entity> {
        self.state.read().await
            .items
            .iter()
            .find(|item| S::entity_id(item) == id)
            .cloned()
    }

    pub async fn is_form_open(&self) -> bool {
        self.state.read().await.is_form_open
    }

    pub async fn mode(&self) -> FormMode<S::Entity> {
        self.state.read().await.mode.clone()
    }

    pub async fn draft(&self) -> S::Draft {
        self.state.read().await.draft.clone()
    }

    pub async fn update_draft<F>(&self, edit: F)
    where F: FnOnce(&mut S::Draft) {
        edit(&mut self.state.write().await.draft);
    }

    /// Form input binding by field name.
    pub async fn set_field(&self, field: &str, value: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        S::set_draft_field(&mut state.draft, field, value)
    }

    pub async fn render_table(&self) -> TableView {
        let rows = self.filtered().await;
        let searching = !self.state.read().await.search_term.is_empty();

        let mut empty_message = format!("No {} found.", S::PLURAL);
        if searching {
            empty_message.push_str(" Try a different search term.");
        }

        TableView {
            title: format!("{} Management", S::TITLE),
            columns: S::columns().iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|item| (S::entity_id(item).clone(), S::row(item)))
                .collect(),
            empty_message,
        }
    }
}
