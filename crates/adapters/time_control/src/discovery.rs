//! Selecting the players that get a time control.

use playguard_domain::control::ControlKind;
use playguard_domain::entity::{AttributeValue, Entity};
use playguard_domain::time::TimeOfDay;

pub const DEFAULT_START: TimeOfDay = TimeOfDay::from_hm(8, 0);
pub const DEFAULT_END: TimeOfDay = TimeOfDay::from_hm(20, 0);

/// Which players are controlled, and the values new controls start with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeControlConfig {
    /// Substrings matched case-insensitively against the player entity id.
    pub keywords: Vec<String>,
    /// Values of the `integration` attribute that mark a player.
    pub integrations: Vec<String>,
    pub default_start: TimeOfDay,
    pub default_end: TimeOfDay,
}

impl Default for TimeControlConfig {
    fn default() -> Self {
        Self {
            keywords: vec!["alexa".to_string(), "echo".to_string()],
            integrations: vec!["alexa_media".to_string()],
            default_start: DEFAULT_START,
            default_end: DEFAULT_END,
        }
    }
}

impl TimeControlConfig {
    /// Whether `entity` is a player that should get a time control.
    ///
    /// Companion entities never qualify, whatever their name.
    #[must_use]
    pub fn is_candidate(&self, entity: &Entity) -> bool {
        if !entity.is_media_player() || ControlKind::from_entity_id(&entity.entity_id).is_some() {
            return false;
        }
        let entity_id = entity.entity_id.to_lowercase();
        let by_keyword = self
            .keywords
            .iter()
            .filter(|keyword| !keyword.is_empty())
            .any(|keyword| entity_id.contains(&keyword.to_lowercase()));

        by_keyword
            || entity
                .get_attribute("integration")
                .and_then(AttributeValue::as_str)
                .is_some_and(|integration| self.integrations.iter().any(|i| i == integration))
    }
}
