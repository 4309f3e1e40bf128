//! # Generic Store Actor
//!
//! `ResourceActor` is the server half of a store. It owns every row of one record type
//! plus the unique-key index, and processes requests one at a time, so no lock guards the
//! rows.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that owns a collection of rows.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2. **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3. **Run**: spawn the run loop in a background task.
///
/// # Write Semantics
///
/// * **Create** assigns the next id from a monotonic counter, builds the row, runs
///   `on_create`, checks the unique key and inserts. A rejected create still consumes
///   its id, so ids stay monotonic but may have gaps.
/// * **Update** and **Action** run the hook on a clone of the row and commit it only if
///   the hook succeeds and the unique key stays free. A failed write leaves the stored
///   row untouched.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    keys: HashMap<String, T::Id>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the mailbox capacity; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            keys: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        // "Order" instead of "order_desk::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    let result = self.insert(id, params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, %id, size = self.store.len(), "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::FindByKey { key, respond_to } => {
                    let item = self
                        .keys
                        .get(&key)
                        .and_then(|id| self.store.get(id))
                        .cloned();
                    debug!(entity_type, %key, found = item.is_some(), "FindByKey");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| filter.matches(item))
                        .cloned()
                        .collect();
                    debug!(entity_type, matched = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    let result = match draft.on_update(update, &context).await {
                        Ok(()) => self.commit(&id, draft.clone()).map(|()| draft),
                        Err(e) => Err(FrameworkError::EntityError(Box::new(e))),
                    };
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    let result = match draft.handle_action(action, &context).await {
                        Ok(outcome) => self.commit(&id, draft).map(|()| outcome),
                        Err(e) => Err(FrameworkError::EntityError(Box::new(e))),
                    };
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn insert(
        &mut self,
        id: T::Id,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let mut item = T::from_create_params(id.clone(), params)
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        item.on_create(context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

        if let Some(key) = item.unique_key() {
            if self.keys.contains_key(&key) {
                return Err(FrameworkError::Conflict(key));
            }
            self.keys.insert(key, id.clone());
        }
        self.store.insert(id.clone(), item);
        Ok(id)
    }

    /// Replace a stored row with its updated draft, keeping the key index in step.
    fn commit(&mut self, id: &T::Id, draft: T) -> Result<(), FrameworkError> {
        let old_key = self.store.get(id).and_then(|item| item.unique_key());
        let new_key = draft.unique_key();

        if new_key != old_key {
            if let Some(key) = &new_key {
                if self.keys.get(key).is_some_and(|owner| owner != id) {
                    return Err(FrameworkError::Conflict(key.clone()));
                }
            }
            if let Some(key) = old_key {
                self.keys.remove(&key);
            }
            if let Some(key) = new_key {
                self.keys.insert(key, id.clone());
            }
        }
        self.store.insert(id.clone(), draft);
        Ok(())
    }
}
