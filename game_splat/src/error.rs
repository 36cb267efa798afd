use thiserror::Error;

use crate::cache::ChunkId;

/// Errors surfaced by the splat core.
///
/// Capacity violations (a generator or sort write landing outside its
/// allocated slice) are not part of this enum: per the error handling
/// design they imply a caller bug and are raised as a panic via `assert!`
/// at the call site instead of being returned as a recoverable `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// A component was constructed with an invalid parameter range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Packed or extended primitive data could not be decoded.
    #[error("failed to decode primitive data: {0}")]
    Decode(String),

    /// The render surface failed to satisfy a resource request (e.g. an
    /// over-sized texture allocation).
    #[error("render surface resource error: {0}")]
    Resource(String),

    /// A paged-cache chunk fetch failed and was rescheduled.
    #[error("fetch failed for chunk {0:?}, rescheduled")]
    TransientFetch(ChunkId),
}
