//! [`MediaPlayerControl`] expressed as service calls.

use playguard_domain::entity::Entity;
use playguard_domain::error::PlayGuardError;
use playguard_domain::service::{MEDIA_STOP, SPEAK, ServiceCall};

use crate::ports::{MediaPlayerControl, ServiceCaller};

/// Drives media players by issuing `speak` and `media_stop` service calls
/// through a [`ServiceCaller`].
pub struct ServicePlayerControl<SC> {
    caller: SC,
}

impl<SC> ServicePlayerControl<SC> {
    pub fn new(caller: SC) -> Self {
        Self { caller }
    }
}

impl<SC: ServiceCaller> MediaPlayerControl for ServicePlayerControl<SC> {
    async fn speak(&self, player: &Entity, message: &str) -> Result<(), PlayGuardError> {
        let call = ServiceCall::new(player.id, SPEAK, serde_json::json!({ "message": message }));
        self.caller.call_service(call).await.map(|_| ())
    }

    async fn stop(&self, player: &Entity) -> Result<(), PlayGuardError> {
        let call = ServiceCall::new(player.id, MEDIA_STOP, serde_json::Value::Null);
        self.caller.call_service(call).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingCaller;
    use std::sync::Arc;

    fn player() -> Entity {
        Entity::builder()
            .entity_id("media_player.kitchen_echo")
            .friendly_name("Kitchen Echo")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_issue_speak_then_stop_calls() {
        let caller = Arc::new(RecordingCaller::default());
        let control = ServicePlayerControl::new(Arc::clone(&caller));
        let player = player();

        control.speak(&player, "Emma, bedtime").await.unwrap();
        control.stop(&player).await.unwrap();

        let calls = caller.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].service, SPEAK);
        assert_eq!(calls[0].required_str("message").unwrap(), "Emma, bedtime");
        assert_eq!(calls[0].entity_id, player.id);
        assert_eq!(calls[1].service, MEDIA_STOP);
    }
}
