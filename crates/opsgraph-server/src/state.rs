//! Application state shared by all handlers.
//!
//! [`AppState`] wraps the [`GraphService`] in `Arc<tokio::sync::Mutex<>>` so
//! handlers await the lock without blocking the tokio runtime. The peer
//! registry sits beside it and is updated without taking that lock.

use std::sync::Arc;

use opsgraph_core::GraphStore;

use crate::config::ServerConfig;
use crate::peers::PeerRegistry;
use crate::service::GraphService;

#[derive(Clone)]
pub struct AppState {
    /// The authority's graph and event fan-out.
    pub service: Arc<tokio::sync::Mutex<GraphService>>,
    /// Connected WebSocket peers.
    pub peers: Arc<PeerRegistry>,
}

impl AppState {
    pub fn new(store: GraphStore) -> Self {
        Self::with_service(GraphService::new(store))
    }

    /// State whose broadcast buffer holds `capacity` frames per peer.
    pub fn with_event_capacity(store: GraphStore, capacity: usize) -> Self {
        Self::with_service(GraphService::with_capacity(store, capacity))
    }

    fn with_service(service: GraphService) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            peers: Arc::new(PeerRegistry::new()),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        if config.seed_demo {
            Self::demo()
        } else {
            Self::empty()
        }
    }

    /// State seeded with the four-node demo graph.
    pub fn demo() -> Self {
        Self::new(GraphStore::demo())
    }

    pub fn empty() -> Self {
        Self::new(GraphStore::new())
    }
}
