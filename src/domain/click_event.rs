//! Click event model for asynchronous click tracking.

/// A redirect served from the cache whose click still has to be recorded.
///
/// Sent from the coordinator to the background worker via a bounded channel,
/// so cache hits never wait on storage. Clicks recorded this way are best
/// effort: a full queue drops the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// Short code or custom alias the visitor used.
    pub key: String,
}

impl ClickEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}
