//! Domain types for the fan token pipeline.
//!
//! Wire names follow the upstream GraphQL schema (camelCase fields,
//! SCREAMING_SNAKE_CASE enums); Rust-side names are snake_case via serde
//! renames so both artifacts and API responses round-trip unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of subject a fan token can be issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Network,
    Channel,
    User,
}

impl EntityType {
    /// All entity types, in the order the pipeline processes them.
    pub const ALL: [EntityType; 3] = [EntityType::Network, EntityType::Channel, EntityType::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Network => "NETWORK",
            EntityType::Channel => "CHANNEL",
            EntityType::User => "USER",
        }
    }
}

/// Auction lifecycle status. Only completed auctions are fetched; the other
/// variants exist so a server-side filter regression fails loudly at decode
/// rather than silently admitting live auctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionStatus {
    Completed,
    Active,
    Upcoming,
}

/// One fan-token-eligible subject, as listed by the auctions query.
///
/// Immutable once fetched; lives for one pipeline run and is persisted to the
/// auctions hand-off artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionEntity {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub entity_symbol: String,
    pub entity_name: String,
    pub status: AuctionStatus,
}

/// Lifetime earnings record for one entity.
///
/// `entity_symbol` is absent as fetched and attached exactly once by the join
/// stage; the final artifact always carries it so every record has a uniform
/// field set for the tabular export.
///
/// The amount stays a string end to end. Wei values overflow f64 and the
/// downstream warehouse ingests the column as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningStat {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub all_earnings_amount_in_wei: String,
    pub start_timestamp: String,
    pub end_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_symbol: Option<String>,
}

/// Upstream hand-off artifact: completed auctions grouped by entity type.
///
/// A BTreeMap keeps artifact serialization order deterministic across runs.
pub type AuctionsByType = BTreeMap<EntityType, Vec<AuctionEntity>>;
