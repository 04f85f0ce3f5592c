use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lingopop_config::Config;
use lingopop_config::gateway::GatewayConfig;
use lingopop_core::notebook::{Notebook, NotebookStore};
use lingopop_gateway::{Gateway, GatewayError, GeminiGateway};
use tokio::sync::RwLock;

use crate::audio::{AudioCache, AudioSink};
use crate::profile::ProfileStore;

/// Builds the gateway from its config section
pub type GatewayFactory =
    Box<dyn Fn(&GatewayConfig) -> Result<Arc<dyn Gateway>, GatewayError> + Send + Sync>;

pub fn gemini_gateway(config: &GatewayConfig) -> Result<Arc<dyn Gateway>, GatewayError> {
    Ok(Arc::new(GeminiGateway::new(config.clone())?))
}

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub notebook: NotebookStore,
    audio: Mutex<AudioCache>,
    pub audio_sink: Arc<dyn AudioSink>,
    /// Profile that config updates are written back to
    pub profile: Option<(ProfileStore, String)>,
    gateway: RwLock<Arc<dyn Gateway>>,
    gateway_factory: GatewayFactory,
}

impl AppState {
    pub fn new(
        config: Config,
        notebook: NotebookStore,
        audio_sink: Arc<dyn AudioSink>,
        gateway_factory: GatewayFactory,
    ) -> Result<Self, GatewayError> {
        let gateway = gateway_factory(&config.gateway)?;
        log_gateway(gateway.as_ref());

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            notebook,
            audio: Mutex::new(AudioCache::new()),
            audio_sink,
            profile: None,
            gateway: RwLock::new(gateway),
            gateway_factory,
        })
    }

    pub fn with_profile(mut self, store: ProfileStore, name: impl Into<String>) -> Self {
        self.profile = Some((store, name.into()));
        self
    }

    pub fn audio_cache(&self) -> MutexGuard<'_, AudioCache> {
        self.audio.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle to the current gateway
    pub async fn gateway(&self) -> Arc<dyn Gateway> {
        self.gateway.read().await.clone()
    }

    /// Swap in a gateway built from the current config. In-flight requests
    /// finish on the old one.
    pub async fn rebuild_gateway(&self) -> Result<(), GatewayError> {
        let gateway_config = self.config.read().await.gateway.clone();
        let gateway = (self.gateway_factory)(&gateway_config)?;
        log_gateway(gateway.as_ref());

        *self.gateway.write().await = gateway;
        Ok(())
    }

    /// Saved notebook, empty when storage is unreadable
    pub async fn load_notebook(&self) -> Notebook {
        let backup_key = self.config.read().await.storage.backup_key();

        self.notebook
            .load_or_recover(&backup_key)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to load notebook: {}", e);
                Notebook::new()
            })
    }
}

fn log_gateway(gateway: &dyn Gateway) {
    let meta = gateway.metadata();
    if meta.requires_api_key && !meta.has_credential {
        tracing::warn!("{} gateway has no API key, lookups will ask for one", meta.name);
    } else {
        tracing::info!("Using {} gateway", meta.name);
    }
}
