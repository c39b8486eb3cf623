//! Event distribution for live sessions.
//!
//! Workers publish every [`battle_core::BattleEvent`] they produce, tagged
//! with its session, plus lifecycle notices for session creation and
//! settlement. Consumers subscribe per [`Topic`].
mod bus;

pub use bus::{Event, EventBus, LifecycleEvent, SessionEvent, Topic};
