//! Public API surface for clients embedding the arena runtime.
//!
//! Re-exports session handles, the collaborator traits toward the account
//! layer, and the runtime error type.
mod errors;
mod handle;
mod providers;

pub use errors::{Result, RuntimeError};
pub use handle::{DuelHandle, DuelView, RaidHandle};
pub use providers::{
    AccountDirectory, AccountRecord, InMemoryDirectory, LoggingSink, OutcomeSink, RecordingSink,
};
