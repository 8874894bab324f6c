//! Spoken notices announced on a player before playback is stopped.

use std::str::FromStr;

use crate::policy::{Decision, Window};
use crate::time::TimeOfDay;

/// Languages the notice catalog is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    /// Resolve a language tag (`en`, `de`, `de-DE`, `de_AT`).
    ///
    /// Anything not in the catalog falls back to English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match primary.as_str() {
            "de" => Self::De,
            _ => Self::En,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

/// Render the notice for `decision`.
///
/// `name` is the optional label of the person using the player; when set
/// the notice is addressed to them. Returns `None` for
/// [`Decision::Allowed`].
#[must_use]
pub fn render(
    language: Language,
    decision: Decision,
    name: Option<&str>,
    now: TimeOfDay,
    window: Option<Window>,
) -> Option<String> {
    let body = match (language, decision) {
        (_, Decision::Allowed) => return None,
        (Language::En, Decision::BlockedByFlag) => "your device is currently blocked".to_string(),
        (Language::De, Decision::BlockedByFlag) => "dein Gerät ist derzeit gesperrt".to_string(),
        (Language::En, Decision::OutsideWindow) => {
            let (start, end) = bounds(window);
            format!(
                "actually it is {now}, your alexa has been enabled up to {end} \
                 and can be used at {start} again"
            )
        }
        (Language::De, Decision::OutsideWindow) => {
            let (start, end) = bounds(window);
            format!(
                "es ist jetzt {now}, deine Alexa ist bis {end} freigeschaltet \
                 und kann ab {start} wieder benutzt werden"
            )
        }
    };

    Some(match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{name}, {body}"),
        None => capitalize(&body),
    })
}

fn bounds(window: Option<Window>) -> (String, String) {
    window.map_or_else(
        || ("--:--".to_string(), "--:--".to_string()),
        |w| (w.start.to_string(), w.end.to_string()),
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
