//! Startup and shutdown of the whole stack.

use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;

use playguard_adapter_http_axum::state::AppState;
use playguard_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqliteDeviceRepository, SqliteEntityRepository, SqliteEventStore,
    StorageError,
};
use playguard_adapter_time_control::TimeControlIntegration;
use playguard_adapter_virtual::VirtualIntegration;
use playguard_app::event_bus::InProcessEventBus;
use playguard_app::event_recorder::EventRecorder;
use playguard_app::playback_guard::PlaybackGuard;
use playguard_app::services::device_service::DeviceService;
use playguard_app::services::entity_service::EntityService;
use playguard_app::services::integration_context::ServiceContext;
use playguard_app::services::player_control::ServicePlayerControl;
use playguard_domain::error::PlayGuardError;

use crate::config::{Config, ConfigError};
use crate::hub::IntegrationHub;

const EVENT_BUS_CAPACITY: usize = 256;

type Bus = Arc<InProcessEventBus>;
type Hub = IntegrationHub<SqliteEntityRepository, Bus>;

/// Errors that prevent the daemon from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("configuration error")]
    Config(#[from] ConfigError),
    #[error("failed to open database")]
    Database(#[from] StorageError),
    #[error("integration setup failed")]
    Integration(#[from] PlayGuardError),
}

/// A started stack: integrations are set up and the background tasks run.
pub struct Runtime {
    router: Router,
    hub: Arc<Hub>,
    tasks: Vec<JoinHandle<()>>,
}

impl Runtime {
    /// Open the database, set up the integrations and spawn the playback
    /// guard and the event recorder.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`StartError`] when the database cannot be opened, the time
    /// control settings are invalid, or an integration fails to set up.
    pub async fn start(config: &Config) -> Result<Self, StartError> {
        let time_control = config.time_control.to_integration_config()?;

        let db = DatabaseConfig {
            database_url: config.database_url().to_string(),
        }
        .build()
        .await?;
        let pool = db.pool().clone();

        let entity_repo = SqliteEntityRepository::new(pool.clone());
        let device_repo = SqliteDeviceRepository::new(pool.clone());
        let event_store = SqliteEventStore::new(pool);

        let bus: Bus = Arc::new(InProcessEventBus::new(EVENT_BUS_CAPACITY));

        let entity_service = Arc::new(EntityService::new(entity_repo.clone(), Arc::clone(&bus)));
        let device_service = Arc::new(DeviceService::new(device_repo));

        // recording starts before setup so discovery shows up in the log
        let recorder = EventRecorder::new(event_store.clone());
        let recorder_rx = bus.subscribe();
        let mut tasks = vec![tokio::spawn(async move { recorder.run(recorder_rx).await })];

        let virtual_players = config
            .integrations
            .virtual_enabled
            .then(|| VirtualIntegration::new(&config.integrations.virtual_players));
        let hub = Arc::new(IntegrationHub::new(
            Arc::clone(&entity_service),
            Arc::clone(&bus),
            virtual_players,
            TimeControlIntegration::new(time_control),
        ));
        let ctx = ServiceContext::new(
            Arc::clone(&device_service),
            Arc::clone(&entity_service),
            Arc::clone(&bus),
        );
        hub.setup(&ctx).await?;

        let guard = PlaybackGuard::new(
            entity_repo,
            ServicePlayerControl::new(Arc::clone(&hub)),
            Arc::clone(&bus),
        )
        .with_language(config.time_control.language());
        let guard_rx = bus.subscribe();
        tasks.push(tokio::spawn(async move { guard.run(guard_rx).await }));

        let state = AppState::new(
            entity_service,
            device_service,
            Arc::new(event_store),
            Arc::clone(&hub),
        );
        let router = playguard_adapter_http_axum::router::build(state);

        Ok(Self { router, hub, tasks })
    }

    /// The HTTP application.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Tear down the integrations and stop the background tasks.
    pub async fn shutdown(self) {
        self.hub.teardown().await;
        for task in &self.tasks {
            task.abort();
        }
        tracing::info!("playguard stopped");
    }
}
