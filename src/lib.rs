//! Obra Gestor Backend
//!
//! Construction-site tracking of pending items (issues) and material
//! deliveries.
//!
//! Layered architecture:
//! - domain: Entities and workflow rules (state machines, ordering)
//! - store / context / forms: In-memory collections and UI state
//! - bridge: Delivery problems handed over to the pending module
//! - suggest: Image suggestion client
//! - repository: Collection snapshots persisted in SQLite
//! - commands: Handlers applying one user action to the application state

use std::sync::Arc;

pub mod bridge;
pub mod commands;
pub mod config;
pub mod context;
pub mod domain;
pub mod forms;
pub mod repository;
pub mod store;
pub mod suggest;

use config::AppConfig;
use context::UiContext;
use domain::{DeliveryItem, DomainResult, PendingItem};
use repository::{init_db, Repository, SlotRepository};
use store::ItemStore;
use suggest::{GeminiClient, ImageAnalyzer};

/// Application state shared across commands
pub struct AppState {
    pub store: ItemStore,
    pub ui: UiContext,
    pub config: AppConfig,
    pending_repo: Arc<dyn Repository<PendingItem>>,
    delivery_repo: Arc<dyn Repository<DeliveryItem>>,
    analyzer: Option<Arc<dyn ImageAnalyzer>>,
}

impl AppState {
    /// Load both collections once and start on the pending list
    pub async fn load(
        config: AppConfig,
        pending_repo: Arc<dyn Repository<PendingItem>>,
        delivery_repo: Arc<dyn Repository<DeliveryItem>>,
    ) -> DomainResult<Self> {
        let pending = pending_repo.load_all().await?;
        let deliveries = delivery_repo.load_all().await?;
        log::info!(
            "Loaded {} pending items and {} deliveries",
            pending.len(),
            deliveries.len()
        );

        Ok(Self {
            store: ItemStore::from_collections(pending, deliveries),
            ui: UiContext::new(),
            config,
            pending_repo,
            delivery_repo,
            analyzer: None,
        })
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn analyzer(&self) -> Option<Arc<dyn ImageAnalyzer>> {
        self.analyzer.clone()
    }

    /// Mirror the pending collection. Failures are logged, never undone.
    pub(crate) async fn persist_pending(&self) {
        if let Err(e) = self.pending_repo.save_all(self.store.pending()).await {
            log::error!("Failed to save pending items: {}", e);
        }
    }

    /// Mirror the delivery collection. Failures are logged, never undone.
    pub(crate) async fn persist_deliveries(&self) {
        if let Err(e) = self.delivery_repo.save_all(self.store.deliveries()).await {
            log::error!("Failed to save deliveries: {}", e);
        }
    }
}

/// Current time in epoch milliseconds
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Initialize logging, open the database and load the collections
pub async fn bootstrap(config: AppConfig) -> DomainResult<AppState> {
    if let Err(e) = rolling_logger::init_logger(&config.log_dir, &config.app_name) {
        eprintln!("[{}] Logger unavailable: {}", chrono::Local::now().format("%H:%M:%S%.3f"), e);
    }
    let _ = rolling_logger::info("App setup starting");

    let db = init_db(&config.db_path()).await?;
    let pending_repo = Arc::new(SlotRepository::<PendingItem>::new(db.connection()));
    let delivery_repo = Arc::new(SlotRepository::<DeliveryItem>::new(db.connection()));

    let gemini = GeminiClient::new(config.gemini.clone());
    let state = AppState::load(config, pending_repo, delivery_repo).await?;

    match gemini {
        Ok(client) => {
            if !client.has_credentials() {
                log::warn!("No image analysis key configured, suggestions will be unavailable");
            }
            Ok(state.with_analyzer(Arc::new(client)))
        }
        Err(e) => {
            log::error!("Image analysis client unavailable: {}", e);
            Ok(state)
        }
    }
}
