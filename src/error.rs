//! Recoverable error taxonomy (see spec §7).
//!
//! Invariant violations (mesh/frontier inconsistency, out-of-range index)
//! are *not* represented here: they are programmer bugs, signalled with
//! `debug_assert!` at the point of detection and undefined in release, per
//! the spec's error-handling design. Only the genuinely recoverable cases
//! get a `SimError` variant.

use thiserror::Error;

/// Recoverable failure surfaced by a core operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// `PointStore::add_ephemeral` found every ephemeral slot alive and was
    /// called with `force_steal = false`. The caller should skip spawning
    /// the particle; nothing else needs to happen.
    #[error("no free ephemeral slot available")]
    OutOfEphemeralSlots,

    /// A tool (`destroy_at`, `toggle_pin_at`, ...) found no point within its
    /// search radius.
    #[error("no point found within radius")]
    NoPointInRadius,

    /// `restore` was called on a point that was never detached.
    #[error("point is not detached")]
    PointNotDetached,

    /// `restore` was called on a point that is not damaged.
    #[error("point is not damaged")]
    PointNotDamaged,
}

pub type SimResult<T> = Result<T, SimError>;
