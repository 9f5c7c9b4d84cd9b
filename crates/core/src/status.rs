//! Maps free-text spoken status phrases onto a fixed set of Slack profile
//! presets (display text plus emoji).

/// A Slack profile payload fragment: display text and emoji shortcode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusProfile {
    pub text: String,
    pub emoji: String,
}

impl StatusProfile {
    /// The empty profile used to clear a previously set status.
    pub fn cleared() -> Self {
        Self { text: String::new(), emoji: String::new() }
    }
}

const DEFAULT_EMOJI: &str = ":mute:";

// First match wins; order is the priority. Keyword matching is substring
// based and case-sensitive (`DND` and `AFK` are spoken as acronyms).
const STATUS_PRESETS: &[(&[&str], &str, &str)] = &[
    (&["lunch"], "Out for lunch", ":taco:"),
    (&["coffee"], "Out for coffee", ":coffee:"),
    (
        &["busy", "unavailable", "head down", "DND", "do not disturb"],
        "Do not disturb",
        ":no_entry_sign:",
    ),
    (&["errand"], "Running an errand", ":running:"),
    (&["doctor"], "Doctor's appointment", ":face_with_thermometer:"),
    (&["away", "AFK"], "AFK", ":zzz:"),
    (&["call"], "On a call", ":phone:"),
    (&["meeting"], "In a meeting", ":calendar:"),
    (&["sick"], "Out sick", ":face_with_thermometer:"),
    (&["commuting"], "Commuting", ":bus:"),
    (&["vacation"], "On vacation", ":palm_tree:"),
];

/// Classifies a spoken status phrase into a profile preset. Unmatched text
/// becomes the literal display text with the default emoji. Pure: every call
/// returns a fresh value.
pub fn classify_status(spoken: &str) -> StatusProfile {
    for (keywords, text, emoji) in STATUS_PRESETS {
        if keywords.iter().any(|keyword| spoken.contains(keyword)) {
            return StatusProfile { text: (*text).to_owned(), emoji: (*emoji).to_owned() };
        }
    }

    StatusProfile { text: spoken.to_owned(), emoji: DEFAULT_EMOJI.to_owned() }
}
