//! # Real-Time Module
//!
//! State-changed events and the publish/subscribe channel that delivers them
//! to every connected client.
//!
//! ## Architecture
//!
//! - **Event**: `StateChangedEvent`, built by the sync service per mutation
//! - **Broadcast**: `NotificationChannel` trait and the in-process `Broadcaster`

pub mod broadcast;
pub mod errors;
pub mod event;

pub use broadcast::{Broadcaster, DispatchResult, Listener, ListenerId, NotificationChannel};
pub use errors::{RealtimeError, RealtimeResult};
pub use event::StateChangedEvent;
