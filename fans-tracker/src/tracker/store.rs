use std::collections::HashMap;
use std::sync::Arc;

use chrono::Datelike;
use tokio::sync::Mutex;
use tracing::debug;

use super::TrackedEntity;

/// Shared handle to one entity. Holding its lock serializes polling cycles
/// for that id.
pub type EntityHandle = Arc<Mutex<TrackedEntity>>;

/// Owner of all tracked entities, keyed by tracked id.
///
/// Cloning the store yields another handle to the same map. The map lock is
/// only held while looking up or inserting a handle, so different ids never
/// wait on each other.
#[derive(Clone, Default)]
pub struct TrackerStore {
    entities: Arc<Mutex<HashMap<String, EntityHandle>>>,
}

impl TrackerStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `id`, creating a fresh entity anchored at
    /// `now` if the id has not been seen before.
    pub async fn entry<D: Datelike>(&self, id: &str, now: &D) -> EntityHandle {
        let mut entities = self.entities.lock().await;
        entities
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!("Tracking new id {}", id);
                Arc::new(Mutex::new(TrackedEntity::new(id, now)))
            })
            .clone()
    }

    /// Inserts previously recorded state, replacing any existing entity.
    pub async fn insert(&self, entity: TrackedEntity) {
        let mut entities = self.entities.lock().await;
        entities.insert(entity.id().to_string(), Arc::new(Mutex::new(entity)));
    }

    /// Returns a copy of the current state for `id`.
    pub async fn get(&self, id: &str) -> Option<TrackedEntity> {
        let handle = self.entities.lock().await.get(id).cloned()?;
        let entity = handle.lock().await;
        Some(entity.clone())
    }

    /// Stops tracking `id`, returning its last state.
    pub async fn remove(&self, id: &str) -> Option<TrackedEntity> {
        let handle = self.entities.lock().await.remove(id)?;
        let entity = handle.lock().await;
        Some(entity.clone())
    }

    /// Returns the tracked ids in ascending order.
    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entities.lock().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns the number of tracked ids.
    pub async fn len(&self) -> usize {
        self.entities.lock().await.len()
    }

    /// Check if no id is tracked.
    pub async fn is_empty(&self) -> bool {
        self.entities.lock().await.is_empty()
    }
}
