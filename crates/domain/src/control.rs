//! Per-player time control: companion entities and the control record.
//!
//! Every tracked media player gets five companion entities whose ids are
//! derived from the player's object id:
//!
//! | Kind | Entity ID |
//! |------|-----------|
//! | Enabled | `switch.<obj>_time_control_enabled` |
//! | Blocked | `switch.<obj>_time_control_blocked` |
//! | Start time | `time.<obj>_time_control_start_time` |
//! | End time | `time.<obj>_time_control_end_time` |
//! | Name | `text.<obj>_time_control_name` |
//!
//! Their current values form a [`ControlRecord`], which is what the policy
//! evaluator consumes.

use crate::entity::{EntityState, split_entity_id};
use crate::error::ControlError;
use crate::policy::{Decision, Window, decide};
use crate::time::TimeOfDay;

/// Marker inserted between the player object id and the control suffix.
pub const CONTROL_INFIX: &str = "_time_control_";

/// Maximum length of the name label.
pub const NAME_MAX_LEN: usize = 100;

/// One of the five companion entities of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Enabled,
    Blocked,
    StartTime,
    EndTime,
    Name,
}

impl ControlKind {
    pub const ALL: [Self; 5] = [
        Self::Enabled,
        Self::Blocked,
        Self::StartTime,
        Self::EndTime,
        Self::Name,
    ];

    /// Entity domain of the companion entity.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            Self::Enabled | Self::Blocked => "switch",
            Self::StartTime | Self::EndTime => "time",
            Self::Name => "text",
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Blocked => "blocked",
            Self::StartTime => "start_time",
            Self::EndTime => "end_time",
            Self::Name => "name",
        }
    }

    /// Suffix appended to the player's friendly name.
    #[must_use]
    pub fn friendly_suffix(self) -> &'static str {
        match self {
            Self::Enabled => "Time control enabled",
            Self::Blocked => "Blocked",
            Self::StartTime => "Allowed from",
            Self::EndTime => "Allowed until",
            Self::Name => "Name",
        }
    }

    /// Whether the kind must be present for the record to be evaluated.
    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(self, Self::Name)
    }

    /// The companion entity id for `player_entity_id`.
    #[must_use]
    pub fn entity_id_for(self, player_entity_id: &str) -> String {
        let (_, object_id) = split_entity_id(player_entity_id);
        format!(
            "{}.{object_id}{CONTROL_INFIX}{}",
            self.domain(),
            self.suffix()
        )
    }

    /// Recognise a companion entity id, returning its kind.
    #[must_use]
    pub fn from_entity_id(entity_id: &str) -> Option<Self> {
        let (domain, object_id) = split_entity_id(entity_id);
        let (_, suffix) = object_id.rsplit_once(CONTROL_INFIX)?;
        Self::ALL
            .into_iter()
            .find(|kind| kind.domain() == domain && kind.suffix() == suffix)
    }
}

/// The control values of one player, read from its companion entities.
///
/// Start and end are optional so that a malformed time does not hide the
/// blocked flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlRecord {
    pub enabled: bool,
    pub blocked: bool,
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
    pub name: Option<String>,
}

impl ControlRecord {
    /// Set the field matching `kind` from an entity state.
    ///
    /// Switches are on only for [`EntityState::On`]; times that fail to
    /// parse become `None`; an empty name becomes `None`.
    pub fn apply(&mut self, kind: ControlKind, state: &EntityState) {
        match kind {
            ControlKind::Enabled => self.enabled = state.is_on(),
            ControlKind::Blocked => self.blocked = state.is_on(),
            ControlKind::StartTime => self.start = parse_time_state(state),
            ControlKind::EndTime => self.end = parse_time_state(state),
            ControlKind::Name => {
                self.name = state
                    .value()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(ToString::to_string);
            }
        }
    }

    /// The allowed window, when both bounds are valid.
    #[must_use]
    pub fn window(&self) -> Option<Window> {
        Some(Window::new(self.start?, self.end?))
    }

    /// Evaluate the policy at `now`.
    ///
    /// `Ok(None)` means the control is disabled and nothing should happen.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::MissingWindow`] when enabled, not blocked, and
    /// either bound is missing or malformed.
    pub fn evaluate(&self, now: TimeOfDay) -> Result<Option<Decision>, ControlError> {
        if !self.enabled {
            return Ok(None);
        }
        if self.blocked {
            return Ok(Some(Decision::BlockedByFlag));
        }
        let window = self.window().ok_or(ControlError::MissingWindow)?;
        Ok(decide(self.enabled, self.blocked, window, now))
    }
}

fn parse_time_state(state: &EntityState) -> Option<TimeOfDay> {
    state.value()?.parse().ok()
}
