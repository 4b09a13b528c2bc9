//! Trigger payloads. Whatever carries the payload, its entire content is the
//! organization name.

pub mod pubsub;

pub use pubsub::{PubSubMessage, PushEnvelope};

/// Strip the single line break a shell pipe leaves after a payload read from stdin.
pub fn strip_line_break(raw: &str) -> &str {
    raw.strip_suffix("\r\n")
        .or_else(|| raw.strip_suffix('\n'))
        .unwrap_or(raw)
}
