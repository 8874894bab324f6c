//! Entity state: the current operational state of an entity.

use serde::{Deserialize, Serialize};

/// Domains whose state is always a free-form value.
const VALUE_DOMAINS: [&str; 2] = ["time", "text"];

/// Operational state of an entity.
///
/// Switches use [`On`](Self::On) / [`Off`](Self::Off), media players use
/// [`Playing`](Self::Playing) / [`Paused`](Self::Paused) / [`Idle`](Self::Idle).
/// Entities holding a free-form value (time, text) store it in
/// [`Value`](Self::Value).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    On,
    Off,
    Playing,
    Paused,
    Idle,
    #[default]
    Unknown,
    Unavailable,
    #[serde(untagged)]
    Value(String),
}

impl EntityState {
    /// Whether the entity is reachable (anything but [`Unavailable`](Self::Unavailable)).
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    /// Whether a switch-like entity is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Whether a media player is playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// The free-form value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Parse the textual form produced by [`Display`](std::fmt::Display).
    ///
    /// Unrecognised words become [`Value`](Self::Value).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(text.to_string()))
            .unwrap_or_else(|_| Self::Value(text.to_string()))
    }

    /// Parse the textual state of an entity in `domain`.
    ///
    /// Time and text entities always hold a [`Value`](Self::Value), so a
    /// name such as `on` is not mistaken for a switch state.
    #[must_use]
    pub fn parse_in_domain(domain: &str, text: &str) -> Self {
        if VALUE_DOMAINS.contains(&domain) {
            Self::Value(text.to_string())
        } else {
            Self::parse(text)
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Playing => f.write_str("playing"),
            Self::Paused => f.write_str("paused"),
            Self::Idle => f.write_str("idle"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
            Self::Value(value) => f.write_str(value),
        }
    }
}
