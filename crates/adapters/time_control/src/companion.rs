//! Companion entities: building them and applying service calls to them.

use playguard_domain::control::{ControlKind, NAME_MAX_LEN};
use playguard_domain::entity::{AttributeValue, Entity, EntityState};
use playguard_domain::error::{PlayGuardError, ValidationError};
use playguard_domain::id::DeviceId;
use playguard_domain::service::{self, ServiceCall};
use playguard_domain::time::TimeOfDay;

use crate::discovery::TimeControlConfig;

/// Build the companion entity of `kind` for `player`.
///
/// A usable `previous` state (from an earlier run) wins over the configured
/// default.
pub(crate) fn build(
    config: &TimeControlConfig,
    player: &Entity,
    device_id: DeviceId,
    kind: ControlKind,
    previous: Option<&Entity>,
) -> Result<Entity, PlayGuardError> {
    let state = previous
        .map(|entity| entity.state.clone())
        .filter(|state| is_valid(kind, state))
        .unwrap_or_else(|| default_state(config, kind));

    let mut builder = Entity::builder()
        .device_id(device_id)
        .entity_id(kind.entity_id_for(&player.entity_id))
        .friendly_name(format!(
            "{} {}",
            player_label(player),
            kind.friendly_suffix()
        ))
        .state(state)
        .attribute("player", AttributeValue::from(player.entity_id.as_str()));
    if kind == ControlKind::Name {
        builder = builder.attribute(
            "max",
            AttributeValue::Int(i64::try_from(NAME_MAX_LEN).unwrap_or(i64::MAX)),
        );
    }
    builder.build()
}

/// The player's friendly name, or its object id when that is blank.
pub(crate) fn player_label(player: &Entity) -> &str {
    let name = player.friendly_name.trim();
    if name.is_empty() {
        player.object_id()
    } else {
        name
    }
}

fn default_state(config: &TimeControlConfig, kind: ControlKind) -> EntityState {
    match kind {
        ControlKind::Enabled | ControlKind::Blocked => EntityState::Off,
        ControlKind::StartTime => EntityState::Value(config.default_start.to_state_string()),
        ControlKind::EndTime => EntityState::Value(config.default_end.to_state_string()),
        ControlKind::Name => EntityState::Value(String::new()),
    }
}

fn is_valid(kind: ControlKind, state: &EntityState) -> bool {
    match kind {
        ControlKind::Enabled | ControlKind::Blocked => {
            matches!(state, EntityState::On | EntityState::Off)
        }
        ControlKind::StartTime | ControlKind::EndTime => state
            .value()
            .is_some_and(|value| value.parse::<TimeOfDay>().is_ok()),
        ControlKind::Name => state.value().is_some(),
    }
}

/// Compute the new state of a companion entity for `call`.
///
/// `Ok(None)` means the service does not apply to this kind.
pub(crate) fn apply(
    kind: ControlKind,
    current: &EntityState,
    call: &ServiceCall,
) -> Result<Option<EntityState>, PlayGuardError> {
    let next = match (kind, call.service.as_str()) {
        (ControlKind::Enabled | ControlKind::Blocked, service::TURN_ON) => EntityState::On,
        (ControlKind::Enabled | ControlKind::Blocked, service::TURN_OFF) => EntityState::Off,
        (ControlKind::Enabled | ControlKind::Blocked, service::TOGGLE) => {
            if current.is_on() {
                EntityState::Off
            } else {
                EntityState::On
            }
        }
        (ControlKind::StartTime | ControlKind::EndTime, service::SET_VALUE) => {
            let time: TimeOfDay = call
                .required_str("value")?
                .parse()
                .map_err(ValidationError::from)?;
            EntityState::Value(time.to_state_string())
        }
        (ControlKind::Name, service::SET_VALUE) => {
            let value = call.required_str("value")?;
            let len = value.chars().count();
            if len > NAME_MAX_LEN {
                return Err(ValidationError::TextTooLong {
                    len,
                    max: NAME_MAX_LEN,
                }
                .into());
            }
            EntityState::Value(value.to_string())
        }
        _ => return Ok(None),
    };
    Ok(Some(next))
}
