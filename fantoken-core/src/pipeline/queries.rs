//! GraphQL query documents.

/// Cursor-paginated listing of completed fan token auctions for one entity
/// type, ordered by estimated start ascending.
pub const FAN_TOKEN_AUCTIONS: &str = r#"
query GetFanTokenAuctions($cursor: String, $entityType: FarcasterFanTokenAuctionEntityType!) {
  FarcasterFanTokenAuctions(
    input: {
        blockchain: ALL,
        filter: {
            entityType: {_eq: $entityType},
            status: {_eq: COMPLETED}
        },
        order: {estimatedStartTimestamp: ASC},
        limit: 100,
        cursor: $cursor
    }
  ) {
    FarcasterFanTokenAuction {
      entityId
      entityType
      entitySymbol
      entityName
      status
    }
    pageInfo {
        hasNextPage
        nextCursor
    }
  }
}
"#;

/// Lifetime earnings for a batch of entity ids. Flat (single-page) response.
pub const LIFETIME_EARNINGS: &str = r#"
query GetMoxieEarnings($entityType: FarcasterMoxieEarningStatsEntityType!, $entityIds: [String!]) {
    FarcasterMoxieEarningStats(
        input: {
            blockchain: ALL,
            timeframe: LIFETIME,
            filter: {
                entityType: {_eq: $entityType},
                entityId: {_in: $entityIds}
            }
        }
    ) {
        FarcasterMoxieEarningStat {
            allEarningsAmountInWei
            endTimestamp
            startTimestamp
            entityId
            entityType
        }
    }
}
"#;
