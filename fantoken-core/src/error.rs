//! Structured error types for the fetch engine and artifact layer.
//!
//! Propagation policy: nothing is swallowed. Transport failures are the only
//! kind with local recovery (the retry loop in `client::retry`); every other
//! error aborts the current pipeline run immediately.

use crate::client::transport::TransportError;
use crate::model::EntityType;
use thiserror::Error;

/// Errors raised by the remote-fetch engine and the join pipeline.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure that survived the full retry budget.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response did not have the expected top-level key shape. Never retried:
    /// a malformed response will not fix itself on a second attempt.
    #[error("unexpected response envelope: {0}")]
    EnvelopeShape(String),

    /// An earnings record's join key has no entry in the symbol table.
    /// Dropping or defaulting the record would corrupt downstream analytics,
    /// so this aborts the run.
    #[error("no {entity_type:?} auction entity matches earnings join key '{key}'")]
    JoinKeyMissing { entity_type: EntityType, key: String },

    /// The server kept reporting `hasNextPage` past the configured ceiling.
    #[error("pagination exceeded the configured limit of {limit} pages")]
    PageLimitExceeded { limit: u32 },

    /// A record failed typed deserialization.
    #[error("failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from reading or writing hand-off artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("artifact is empty, refusing to write")]
    Empty,

    #[error("record for entity '{entity_id}' has no symbol attached")]
    Unenriched { entity_id: String },
}
