//! Async session runtime for duels and raids.
//!
//! This crate hosts live battle sessions on top of the synchronous
//! `battle-core` engines. Consumers build an [`Arena`], start duels or open
//! raids through it, and talk to each session through a cloneable handle.
//!
//! Modules are organized by responsibility:
//! - [`arena`] hosts the coordinator, its builder, and runtime tuning
//! - [`api`] exposes handles, errors, and the account-layer collaborator traits
//! - [`events`] provides the topic-based event bus
//! - [`registry`] tracks live sessions and which accounts are engaged
//! - [`oracle`] bundles the immutable content every session reads
//! - `workers` keeps the per-session tasks internal to the crate
pub mod api;
pub mod arena;
pub mod events;
pub mod oracle;
pub mod registry;

mod workers;

pub use api::{
    AccountDirectory, AccountRecord, DuelHandle, DuelView, InMemoryDirectory, LoggingSink,
    OutcomeSink, RaidHandle, RecordingSink, Result, RuntimeError,
};
pub use arena::{Arena, ArenaBuilder, Contender, RuntimeConfig};
pub use events::{Event, EventBus, LifecycleEvent, SessionEvent, Topic};
pub use oracle::BattleOracles;
pub use registry::{SessionHandle, SessionRegistry};
