//! Lazily-populated backend registry
//!
//! Each backend id is initialized at most once, even when several stages
//! ask for it at the same moment. A failed initialization is not cached.

use async_trait::async_trait;
use ensemble_application::{BackendError, BackendGateway, TextGenerator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, info};

type Slot = Arc<OnceCell<Arc<dyn TextGenerator>>>;

/// Creates a generator for a backend id
#[async_trait]
pub trait BackendFactory: Send + Sync {
    async fn create(&self, backend_id: &str) -> Result<Arc<dyn TextGenerator>, BackendError>;
}

/// [`BackendGateway`] that caches one generator per backend id
pub struct BackendRegistry {
    factory: Arc<dyn BackendFactory>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl BackendRegistry {
    pub fn new(factory: Arc<dyn BackendFactory>) -> Self {
        Self {
            factory,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, backend_id: &str) -> Result<Slot, BackendError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| BackendError::Unavailable("backend registry poisoned".to_string()))?;
        Ok(Arc::clone(slots.entry(backend_id.to_string()).or_default()))
    }

    /// Number of backends initialized so far
    pub fn loaded_count(&self) -> usize {
        self.slots
            .lock()
            .map(|slots| slots.values().filter(|slot| slot.initialized()).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl BackendGateway for BackendRegistry {
    async fn connect(&self, backend_id: &str) -> Result<Arc<dyn TextGenerator>, BackendError> {
        let slot = self.slot(backend_id)?;
        if let Some(generator) = slot.get() {
            return Ok(Arc::clone(generator));
        }

        let generator = slot
            .get_or_try_init(|| async {
                info!("Loading backend {}", backend_id);
                self.factory.create(backend_id).await
            })
            .await?;
        debug!("Backend {} ready", backend_id);
        Ok(Arc::clone(generator))
    }
}
