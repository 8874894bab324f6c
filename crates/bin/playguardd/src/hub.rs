//! Integration hub: owns the integrations and routes service calls to them.

use std::sync::Arc;

use tokio::sync::RwLock;

use playguard_adapter_time_control::TimeControlIntegration;
use playguard_adapter_virtual::VirtualIntegration;
use playguard_app::ports::{
    EntityRepository, EventPublisher, Integration, IntegrationContext, ServiceCaller,
};
use playguard_app::services::entity_service::EntityService;
use playguard_domain::entity::Entity;
use playguard_domain::error::{NotFoundError, PlayGuardError};
use playguard_domain::event::{Event, EventType};
use playguard_domain::service::ServiceCall;

struct Integrations {
    virtual_players: Option<VirtualIntegration>,
    time_control: TimeControlIntegration,
}

/// Runs the integrations and dispatches [`ServiceCall`]s to whichever one
/// owns the target entity.
///
/// The entity an integration hands back is persisted through
/// [`EntityService`], so state changes reach the event bus.
pub struct IntegrationHub<ER, EP> {
    entity_service: Arc<EntityService<ER, EP>>,
    publisher: EP,
    integrations: RwLock<Integrations>,
}

impl<ER, EP> IntegrationHub<ER, EP>
where
    ER: EntityRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    pub fn new(
        entity_service: Arc<EntityService<ER, EP>>,
        publisher: EP,
        virtual_players: Option<VirtualIntegration>,
        time_control: TimeControlIntegration,
    ) -> Self {
        Self {
            entity_service,
            publisher,
            integrations: RwLock::new(Integrations {
                virtual_players,
                time_control,
            }),
        }
    }

    /// Set up the players first, then the time control that discovers them.
    ///
    /// # Errors
    ///
    /// Returns the first setup error.
    pub async fn setup(&self, ctx: &impl IntegrationContext) -> Result<(), PlayGuardError> {
        let mut integrations = self.integrations.write().await;
        if let Some(players) = integrations.virtual_players.as_mut() {
            players.setup(ctx).await?;
            tracing::info!(integration = players.name(), "integration ready");
        }
        integrations.time_control.setup(ctx).await?;
        tracing::info!(
            integration = integrations.time_control.name(),
            players = integrations.time_control.player_count(),
            "integration ready"
        );
        Ok(())
    }

    /// Tear down every integration, logging failures.
    pub async fn teardown(&self) {
        let mut integrations = self.integrations.write().await;
        if let Err(err) = integrations.time_control.teardown().await {
            tracing::warn!(error = %err, "time control teardown failed");
        }
        if let Some(players) = integrations.virtual_players.as_mut()
            && let Err(err) = players.teardown().await
        {
            tracing::warn!(error = %err, "virtual teardown failed");
        }
    }

    async fn dispatch(&self, entity: &Entity, call: ServiceCall) -> Result<Entity, PlayGuardError> {
        let integrations = self.integrations.read().await;
        if let Some(players) = integrations
            .virtual_players
            .as_ref()
            .filter(|players| players.owns_entity(entity))
        {
            return players.handle_service_call(call).await;
        }
        if integrations.time_control.owns_entity(entity) {
            integrations.time_control.refresh(entity);
            return integrations.time_control.handle_service_call(call).await;
        }
        Err(NotFoundError {
            entity: "Integration",
            id: entity.entity_id.clone(),
        }
        .into())
    }
}

impl<ER, EP> ServiceCaller for IntegrationHub<ER, EP>
where
    ER: EntityRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self, call), fields(entity_id = %call.entity_id, service = %call.service))]
    async fn call_service(&self, call: ServiceCall) -> Result<Entity, PlayGuardError> {
        let target = self.entity_service.get_entity(call.entity_id).await?;
        let event_data = serde_json::json!({
            "entity_id": target.entity_id,
            "service": call.service,
            "data": call.data,
        });

        let handled = self.dispatch(&target, call).await?;
        let stored = self.entity_service.upsert_entity(handled).await?;

        self.publisher
            .publish(Event::new(
                EventType::ServiceCalled,
                Some(stored.id),
                event_data,
            ))
            .await?;
        Ok(stored)
    }
}
