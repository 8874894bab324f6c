//! Media player ports: issuing commands against players.

use std::future::Future;
use std::sync::Arc;

use playguard_domain::entity::Entity;
use playguard_domain::error::PlayGuardError;
use playguard_domain::service::ServiceCall;

/// Routes a [`ServiceCall`] to the integration owning the target entity.
pub trait ServiceCaller: Send + Sync {
    /// Execute the call and return the entity after it has been handled.
    fn call_service(
        &self,
        call: ServiceCall,
    ) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send;
}

impl<T: ServiceCaller> ServiceCaller for Arc<T> {
    fn call_service(
        &self,
        call: ServiceCall,
    ) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send {
        (**self).call_service(call)
    }
}

/// The two commands the playback guard needs from a media player.
pub trait MediaPlayerControl {
    /// Announce `message` on the player.
    fn speak(
        &self,
        player: &Entity,
        message: &str,
    ) -> impl Future<Output = Result<(), PlayGuardError>> + Send;

    /// Stop whatever the player is playing.
    fn stop(&self, player: &Entity) -> impl Future<Output = Result<(), PlayGuardError>> + Send;
}

impl<T: MediaPlayerControl + Send + Sync> MediaPlayerControl for Arc<T> {
    fn speak(
        &self,
        player: &Entity,
        message: &str,
    ) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        (**self).speak(player, message)
    }

    fn stop(&self, player: &Entity) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        (**self).stop(player)
    }
}
