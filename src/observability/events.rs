//! Observability events for the sync server
//!
//! Every lifecycle and operation event that call sites log. Events are
//! explicit and typed; log lines carry `event = %Event::X`.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Server bound and ready for requests
    Serving,
    /// Server stopped
    Shutdown,

    // Mutations
    /// Commit durably appended
    CommitAppended,
    /// Entry written to the store
    EntryUpserted,
    /// State-changed event handed to listeners
    StateChangedPublished,
    /// Publishing failed after a successful mutation
    NotificationFailed,

    // Rejections / failures
    /// Request failed to parse
    RequestRejected,
    /// Store or commit log failed
    StorageFailed,

    // Listeners
    /// Listener subscribed
    ListenerJoined,
    /// Listener unsubscribed
    ListenerLeft,

    // Replay
    /// Commit replay begins
    ReplayBegin,
    /// Commit replay complete
    ReplayComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "SERVING",
            Event::Shutdown => "SHUTDOWN",

            Event::CommitAppended => "COMMIT_APPENDED",
            Event::EntryUpserted => "ENTRY_UPSERTED",
            Event::StateChangedPublished => "STATE_CHANGED_PUBLISHED",
            Event::NotificationFailed => "NOTIFICATION_FAILED",

            Event::RequestRejected => "REQUEST_REJECTED",
            Event::StorageFailed => "STORAGE_FAILED",

            Event::ListenerJoined => "LISTENER_JOINED",
            Event::ListenerLeft => "LISTENER_LEFT",

            Event::ReplayBegin => "REPLAY_BEGIN",
            Event::ReplayComplete => "REPLAY_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
