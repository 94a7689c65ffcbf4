//! Error types.

use thiserror::Error;

use crate::channels::ChannelSet;

/// Why a persisted state blob was rejected.
///
/// Rejection is never reported to the host; the store simply keeps its current values.
#[derive(Debug, Error)]
pub enum StateError {
    /// The blob is not a parameter document at all.
    #[error("malformed state document: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The document parsed, but belongs to another schema.
    #[error("state document tag `{found}` does not match `{expected}`")]
    SchemaMismatch {
        /// Tag this plugin writes.
        expected: &'static str,
        /// Tag found in the document.
        found: String,
    },
    /// A known parameter carries NaN or an infinity.
    #[error("state document holds a non-finite value for `{id}`")]
    NonFinite {
        /// Identifier of the offending parameter.
        id: String,
    },
}

/// A bus layout proposed by the host that this plugin cannot run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Only mono and stereo outputs are handled.
    #[error("output bus `{0}` is not supported, expected mono or stereo")]
    UnsupportedOutput(ChannelSet),
    /// Input and output must carry the same channel set.
    #[error("input bus `{input}` does not match output bus `{output}`")]
    Mismatched {
        /// Proposed input set.
        input: ChannelSet,
        /// Proposed output set.
        output: ChannelSet,
    },
}
