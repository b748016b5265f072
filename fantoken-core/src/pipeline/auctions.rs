//! Auction listing stage: fetch all completed fan token auctions.
//!
//! For each entity type, walks the cursor-paginated auctions query to
//! completion and groups the results by type. The grouped map is the upstream
//! hand-off artifact the earnings join stage reads.

use crate::client::{CursorPaginator, GraphqlTransport, RetryingCaller};
use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{AuctionEntity, AuctionsByType, EntityType};
use crate::pipeline::queries;
use serde_json::{json, Map};

/// Fetch every completed auction for every entity type.
pub fn fetch_auctions(
    transport: &dyn GraphqlTransport,
    config: &ApiConfig,
) -> Result<AuctionsByType, FetchError> {
    let caller = RetryingCaller::new(transport, config);
    let paginator = CursorPaginator::new(&caller, config.max_pages);

    let mut result = AuctionsByType::new();
    for entity_type in EntityType::ALL {
        log::info!("fetching {} auctions", entity_type.as_str());

        let mut variables = Map::new();
        variables.insert("entityType".to_string(), json!(entity_type.as_str()));

        let records = paginator.fetch_all(queries::FAN_TOKEN_AUCTIONS, &variables)?;
        let entities = records
            .into_iter()
            .map(serde_json::from_value::<AuctionEntity>)
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("{} {} auctions", entities.len(), entity_type.as_str());
        result.insert(entity_type, entities);
    }
    Ok(result)
}
