use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    notices::Bus,
    store::{MemoryStore, SnapshotStore},
    subscribers::{Subscribe, SubscriberSet},
};

use super::registrar::Registrar;

/// Builder for a [`Registrar`] with optional subscribers and snapshot store.
pub struct RegistrarBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl RegistrarBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            store: None,
        }
    }

    /// Sets notice subscribers.
    ///
    /// Subscribers receive every committed notice through dedicated workers
    /// with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the snapshot store. Defaults to an in-memory store.
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the registrar and spawns its notice listener.
    ///
    /// Must be called inside a tokio runtime. The registrar starts without an
    /// event; call [`Registrar::restore`] to load the stored one.
    pub fn build(self) -> Arc<Registrar> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn SnapshotStore>);

        let registrar = Arc::new(Registrar::new_internal(
            self.cfg,
            bus,
            subs,
            store,
            CancellationToken::new(),
        ));
        registrar.spawn_listener();
        registrar
    }
}
