//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors ([`ActionError`](crate::engine::ActionError),
//! [`SetupError`](crate::engine::SetupError),
//! [`RaidError`](crate::raid::RaidError)) live next to the operations they
//! validate. This module provides the shared classification they implement.

/// Severity level of an error, used for categorization and logging.
///
/// - **Validation**: invalid input rejected without any state change
/// - **Recoverable**: the same request may succeed later (e.g. not your turn yet)
/// - **Internal**: unexpected state inconsistency that indicates a defect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Validation,
    Recoverable,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Recoverable => "recoverable",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Keep `error_code` stable; the runtime uses it as a log field
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
