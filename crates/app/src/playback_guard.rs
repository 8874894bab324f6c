//! Playback guard: stops media players that start playing outside their
//! allowed window.
//!
//! The guard subscribes to the event bus and reacts to `StateChanged`
//! events whose transition enters the playing state. For such a player it
//! reads the five companion entities of the time control, evaluates the
//! policy and, when playback is not allowed, announces a notice on the
//! player and stops it.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use playguard_domain::control::{ControlKind, ControlRecord};
use playguard_domain::entity::Entity;
use playguard_domain::error::PlayGuardError;
use playguard_domain::event::{Event, EventType, StateTransition};
use playguard_domain::notice::{self, Language};
use playguard_domain::policy::Decision;
use playguard_domain::time::TimeOfDay;

use crate::ports::{EntityRepository, EventPublisher, MediaPlayerControl};

/// Event-driven enforcement of the per-player time control.
pub struct PlaybackGuard<ER, PC, EP> {
    entity_repo: ER,
    player_control: PC,
    publisher: EP,
    language: Language,
}

impl<ER, PC, EP> PlaybackGuard<ER, PC, EP>
where
    ER: EntityRepository,
    PC: MediaPlayerControl,
    EP: EventPublisher,
{
    pub fn new(entity_repo: ER, player_control: PC, publisher: EP) -> Self {
        Self {
            entity_repo,
            player_control,
            publisher,
            language: Language::default(),
        }
    }

    /// Language the spoken notices are rendered in.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Consume events until the channel closes.
    ///
    /// Processing errors are logged and never stop the loop.
    pub async fn run(&self, mut receiver: broadcast::Receiver<Event>) {
        tracing::info!(language = self.language.as_str(), "playback guard started");
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(err) = self.process_event(&event).await {
                        tracing::warn!(error = %err, event_id = %event.id, "playback guard failed");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "playback guard lagged behind the event bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::info!("playback guard stopped");
    }

    /// Handle one event using the current local wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the repository and errors from stopping
    /// the player.
    pub async fn process_event(&self, event: &Event) -> Result<Option<Decision>, PlayGuardError> {
        self.process_event_at(event, TimeOfDay::now_local()).await
    }

    /// Handle one event as if the local time were `now`.
    ///
    /// Returns the decision taken, or `None` when the event was not a
    /// playback start of a controlled player.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the repository and errors from stopping
    /// the player.
    pub async fn process_event_at(
        &self,
        event: &Event,
        now: TimeOfDay,
    ) -> Result<Option<Decision>, PlayGuardError> {
        let Some(transition) = StateTransition::from_event(event) else {
            return Ok(None);
        };
        if !transition.started_playing() {
            return Ok(None);
        }
        let Some(player) = self.entity_repo.get_by_id(transition.entity_id).await? else {
            tracing::debug!(entity_id = %transition.entity_id, "unknown entity started playing");
            return Ok(None);
        };
        if !player.is_media_player() {
            return Ok(None);
        }
        let Some(record) = self.load_record(&player).await? else {
            return Ok(None);
        };

        let decision = match record.evaluate(now) {
            Ok(Some(decision)) => decision,
            Ok(None) => {
                tracing::debug!(player = %player.entity_id, "time control disabled");
                return Ok(None);
            }
            Err(err) => {
                tracing::warn!(player = %player.entity_id, error = %err, "skipping playback check");
                return Ok(None);
            }
        };

        if decision.requires_action() {
            self.interrupt(&player, &record, decision, now).await?;
        } else {
            tracing::debug!(player = %player.entity_id, %now, "playback allowed");
        }
        Ok(Some(decision))
    }

    async fn load_record(&self, player: &Entity) -> Result<Option<ControlRecord>, PlayGuardError> {
        let mut record = ControlRecord::default();
        let mut found = 0_usize;
        let mut missing = Vec::new();

        for kind in ControlKind::ALL {
            let entity_id = kind.entity_id_for(&player.entity_id);
            match self.entity_repo.find_by_entity_id(&entity_id).await? {
                Some(entity) => {
                    record.apply(kind, &entity.state);
                    found += 1;
                }
                None if kind.is_required() => missing.push(entity_id),
                None => {}
            }
        }

        if found == 0 {
            tracing::debug!(player = %player.entity_id, "player has no time control");
            return Ok(None);
        }
        if !missing.is_empty() {
            tracing::warn!(
                player = %player.entity_id,
                missing = ?missing,
                "time control is incomplete"
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn interrupt(
        &self,
        player: &Entity,
        record: &ControlRecord,
        decision: Decision,
        now: TimeOfDay,
    ) -> Result<(), PlayGuardError> {
        let message = notice::render(
            self.language,
            decision,
            record.name.as_deref(),
            now,
            record.window(),
        )
        .unwrap_or_default();

        tracing::info!(player = %player.entity_id, %decision, %now, "interrupting playback");

        if !message.is_empty() {
            if let Err(err) = self.player_control.speak(player, &message).await {
                tracing::warn!(player = %player.entity_id, error = %err, "failed to announce notice");
            }
        }
        self.player_control.stop(player).await?;

        self.publisher
            .publish(Event::new(
                EventType::PlaybackInterrupted,
                Some(player.id),
                serde_json::json!({
                    "entity_id": player.entity_id,
                    "decision": decision.as_str(),
                    "message": message,
                    "at": now.to_string(),
                }),
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryEntityRepo, PlayerCommand, RecordingPlayer, RecordingPublisher};
    use playguard_domain::entity::EntityState;
    use playguard_domain::id::EntityId;
    use std::sync::Arc;

    const PLAYER: &str = "media_player.kitchen_echo";

    type Guard = PlaybackGuard<InMemoryEntityRepo, Arc<RecordingPlayer>, Arc<RecordingPublisher>>;

    struct Setup {
        enabled: bool,
        blocked: bool,
        start: &'static str,
        end: &'static str,
        name: Option<&'static str>,
    }

    impl Default for Setup {
        fn default() -> Self {
            Self {
                enabled: true,
                blocked: false,
                start: "08:00:00",
                end: "20:00:00",
                name: Some("Emma"),
            }
        }
    }

    fn companion(kind: ControlKind, state: EntityState) -> Entity {
        Entity::builder()
            .entity_id(kind.entity_id_for(PLAYER))
            .friendly_name(kind.friendly_suffix())
            .state(state)
            .build()
            .unwrap()
    }

    fn switch(on: bool) -> EntityState {
        if on { EntityState::On } else { EntityState::Off }
    }

    fn player() -> Entity {
        Entity::builder()
            .entity_id(PLAYER)
            .friendly_name("Kitchen Echo")
            .state(EntityState::Playing)
            .build()
            .unwrap()
    }

    fn guard_with(
        entities: Vec<Entity>,
        player_control: RecordingPlayer,
    ) -> (Guard, Arc<RecordingPlayer>, Arc<RecordingPublisher>) {
        let control = Arc::new(player_control);
        let publisher = Arc::new(RecordingPublisher::default());
        let guard = PlaybackGuard::new(
            InMemoryEntityRepo::with(entities),
            Arc::clone(&control),
            Arc::clone(&publisher),
        );
        (guard, control, publisher)
    }

    fn make_guard(setup: &Setup) -> (Guard, Entity, Arc<RecordingPlayer>, Arc<RecordingPublisher>) {
        let player = player();
        let mut entities = vec![
            player.clone(),
            companion(ControlKind::Enabled, switch(setup.enabled)),
            companion(ControlKind::Blocked, switch(setup.blocked)),
            companion(
                ControlKind::StartTime,
                EntityState::Value(setup.start.to_string()),
            ),
            companion(ControlKind::EndTime, EntityState::Value(setup.end.to_string())),
        ];
        if let Some(name) = setup.name {
            entities.push(companion(
                ControlKind::Name,
                EntityState::Value(name.to_string()),
            ));
        }
        let (guard, control, publisher) = guard_with(entities, RecordingPlayer::default());
        (guard, player, control, publisher)
    }

    fn started_playing(id: EntityId) -> Event {
        Event::state_changed(id, &EntityState::Idle, &EntityState::Playing)
    }

    fn at(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    #[tokio::test]
    async fn should_allow_playback_inside_window() {
        let (guard, player, control, publisher) = make_guard(&Setup::default());

        let decision = guard
            .process_event_at(&started_playing(player.id), at(12, 0))
            .await
            .unwrap();

        assert_eq!(decision, Some(Decision::Allowed));
        assert!(control.commands().is_empty());
        assert!(publisher.of_type(EventType::PlaybackInterrupted).is_empty());
    }

    #[tokio::test]
    async fn should_announce_and_stop_outside_window() {
        let (guard, player, control, publisher) = make_guard(&Setup::default());

        let decision = guard
            .process_event_at(&started_playing(player.id), at(21, 5))
            .await
            .unwrap();

        assert_eq!(decision, Some(Decision::OutsideWindow));
        assert_eq!(
            control.commands(),
            vec![
                PlayerCommand::Speak(
                    PLAYER.to_string(),
                    "Emma, actually it is 21:05, your alexa has been enabled up to 20:00 \
                     and can be used at 08:00 again"
                        .to_string()
                ),
                PlayerCommand::Stop(PLAYER.to_string()),
            ]
        );
        let interrupted = publisher.of_type(EventType::PlaybackInterrupted);
        assert_eq!(interrupted.len(), 1);
        assert_eq!(interrupted[0].data["decision"], "outside_window");
    }

    #[tokio::test]
    async fn should_block_inside_window_when_flag_is_set() {
        let setup = Setup {
            blocked: true,
            name: None,
            ..Setup::default()
        };
        let (guard, player, control, _) = make_guard(&setup);

        let decision = guard
            .process_event_at(&started_playing(player.id), at(12, 0))
            .await
            .unwrap();

        assert_eq!(decision, Some(Decision::BlockedByFlag));
        assert_eq!(
            control.commands()[0],
            PlayerCommand::Speak(
                PLAYER.to_string(),
                "Your device is currently blocked".to_string()
            )
        );
    }

    #[tokio::test]
    async fn should_stop_blocked_player_even_with_malformed_window() {
        let setup = Setup {
            blocked: true,
            start: "not a time",
            ..Setup::default()
        };
        let (guard, player, control, _) = make_guard(&setup);

        let decision = guard
            .process_event_at(&started_playing(player.id), at(12, 0))
            .await
            .unwrap();

        assert_eq!(decision, Some(Decision::BlockedByFlag));
        assert!(control.commands().contains(&PlayerCommand::Stop(PLAYER.to_string())));
    }

    #[tokio::test]
    async fn should_skip_when_window_is_malformed() {
        let setup = Setup {
            end: "25:00:00",
            ..Setup::default()
        };
        let (guard, player, control, _) = make_guard(&setup);

        let decision = guard
            .process_event_at(&started_playing(player.id), at(23, 0))
            .await
            .unwrap();

        assert_eq!(decision, None);
        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn should_do_nothing_when_disabled() {
        let setup = Setup {
            enabled: false,
            blocked: true,
            ..Setup::default()
        };
        let (guard, player, control, _) = make_guard(&setup);

        let decision = guard
            .process_event_at(&started_playing(player.id), at(23, 0))
            .await
            .unwrap();

        assert_eq!(decision, None);
        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn should_handle_window_wrapping_midnight() {
        let setup = Setup {
            start: "22:00:00",
            end: "06:00:00",
            ..Setup::default()
        };
        let (guard, player, _, _) = make_guard(&setup);
        let event = started_playing(player.id);

        assert_eq!(
            guard.process_event_at(&event, at(23, 30)).await.unwrap(),
            Some(Decision::Allowed)
        );
        assert_eq!(
            guard.process_event_at(&event, at(12, 0)).await.unwrap(),
            Some(Decision::OutsideWindow)
        );
    }

    #[tokio::test]
    async fn should_only_trigger_on_transition_into_playing() {
        let (guard, player, control, _) = make_guard(&Setup::default());

        let still_playing = Event::state_changed(player.id, &EntityState::Playing, &EntityState::Playing);
        let paused = Event::state_changed(player.id, &EntityState::Playing, &EntityState::Paused);

        assert_eq!(guard.process_event_at(&still_playing, at(23, 0)).await.unwrap(), None);
        assert_eq!(guard.process_event_at(&paused, at(23, 0)).await.unwrap(), None);
        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn should_ignore_players_without_time_control() {
        let player = player();
        let (guard, control, _) = guard_with(vec![player.clone()], RecordingPlayer::default());

        let decision = guard
            .process_event_at(&started_playing(player.id), at(23, 0))
            .await
            .unwrap();

        assert_eq!(decision, None);
        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn should_skip_when_required_companion_is_missing() {
        let player = player();
        let entities = vec![
            player.clone(),
            companion(ControlKind::Enabled, EntityState::On),
            companion(ControlKind::Blocked, EntityState::On),
        ];
        let (guard, control, _) = guard_with(entities, RecordingPlayer::default());

        let decision = guard
            .process_event_at(&started_playing(player.id), at(23, 0))
            .await
            .unwrap();

        assert_eq!(decision, None);
        assert!(control.commands().is_empty());
    }

    #[tokio::test]
    async fn should_still_stop_when_announcement_fails() {
        let player = player();
        let entities = vec![
            player.clone(),
            companion(ControlKind::Enabled, EntityState::On),
            companion(ControlKind::Blocked, EntityState::On),
            companion(ControlKind::StartTime, EntityState::Value("08:00:00".into())),
            companion(ControlKind::EndTime, EntityState::Value("20:00:00".into())),
        ];
        let (guard, control, publisher) = guard_with(entities, RecordingPlayer::failing_speak());

        guard
            .process_event_at(&started_playing(player.id), at(12, 0))
            .await
            .unwrap();

        assert_eq!(control.commands(), vec![PlayerCommand::Stop(PLAYER.to_string())]);
        assert_eq!(publisher.of_type(EventType::PlaybackInterrupted).len(), 1);
    }

    #[tokio::test]
    async fn should_render_notice_in_configured_language() {
        let (guard, player, control, _) = make_guard(&Setup {
            blocked: true,
            ..Setup::default()
        });
        let guard = guard.with_language(Language::De);

        guard
            .process_event_at(&started_playing(player.id), at(12, 0))
            .await
            .unwrap();

        assert_eq!(
            control.commands()[0],
            PlayerCommand::Speak(
                PLAYER.to_string(),
                "Emma, dein Gerät ist derzeit gesperrt".to_string()
            )
        );
    }

    #[tokio::test]
    async fn should_keep_running_until_bus_closes() {
        let (guard, player, control, _) = make_guard(&Setup {
            blocked: true,
            ..Setup::default()
        });
        let (sender, receiver) = broadcast::channel(8);
        sender.send(started_playing(player.id)).unwrap();
        drop(sender);

        guard.run(receiver).await;

        assert!(control.commands().contains(&PlayerCommand::Stop(PLAYER.to_string())));
    }

    #[tokio::test]
    async fn should_resume_after_lagging_behind_bus() {
        let (guard, player, control, _) = make_guard(&Setup {
            blocked: true,
            ..Setup::default()
        });
        let (sender, receiver) = broadcast::channel(1);
        for _ in 0..2 {
            sender
                .send(Event::new(EventType::ServiceCalled, None, serde_json::json!({})))
                .unwrap();
        }
        sender.send(started_playing(player.id)).unwrap();
        drop(sender);

        guard.run(receiver).await;

        assert_eq!(
            control.commands(),
            vec![
                PlayerCommand::Speak(
                    PLAYER.to_string(),
                    "Emma, your device is currently blocked".to_string()
                ),
                PlayerCommand::Stop(PLAYER.to_string()),
            ]
        );
    }
}
