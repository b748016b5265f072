//! Fan token data pipeline core.
//!
//! Ingests auction and lifetime-earnings data for fan tokens from a GraphQL
//! API, joins earnings against a symbol lookup built from the auction
//! listing, and persists enriched records to hand-off artifacts:
//! - Remote-fetch engine: transport seam, bounded retry with fixed delay,
//!   bounded cursor pagination
//! - Fixed-size batching for the earnings query's id-list argument
//! - Per-entity-type fetch-and-join pipeline
//! - Atomic JSON/CSV artifact persistence with content-hash metadata

pub mod artifact;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;

pub use artifact::ArtifactStore;
pub use config::ApiConfig;
pub use error::{ArtifactError, FetchError};
pub use model::{AuctionEntity, AuctionsByType, EarningStat, EntityType};
pub use pipeline::{fetch_auctions, EntityJoinPipeline};
