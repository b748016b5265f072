//! Earnings join stage: fetch lifetime earnings in batches and attach
//! each record's display symbol from the auction listing.
//!
//! The two upstream systems label the network entity differently, which
//! forces two distinct key transformations that must not be conflated:
//!
//! - the earnings *query* argument for a NETWORK entity is the literal
//!   `"FARCASTER"`, while every other type passes its raw entity id;
//! - the *join* key for a returned NETWORK earnings record is the literal
//!   `"network:farcaster"`, which is how the auction listing spells the same
//!   entity's id, so the verbatim lookup table resolves it.

use crate::batch::batches;
use crate::client::{retry::descend, GraphqlTransport, RetryingCaller};
use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{AuctionEntity, AuctionsByType, EarningStat, EntityType};
use crate::pipeline::queries;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Query-side spelling of the network entity id.
pub const NETWORK_QUERY_KEY: &str = "FARCASTER";

/// Auction-listing-side spelling of the network entity id, used as the join
/// key for NETWORK earnings records.
pub const NETWORK_JOIN_KEY: &str = "network:farcaster";

/// Per-entity-type fetch-and-join orchestrator.
pub struct EntityJoinPipeline<'a> {
    caller: RetryingCaller<'a>,
    batch_size: usize,
}

impl<'a> EntityJoinPipeline<'a> {
    pub fn new(transport: &'a dyn GraphqlTransport, config: &ApiConfig) -> Self {
        Self {
            caller: RetryingCaller::new(transport, config),
            batch_size: config.batch_size,
        }
    }

    /// Enrich lifetime earnings for every entity type in the auctions
    /// artifact, concatenated in type order then batch order.
    pub fn run(&self, auctions: &AuctionsByType) -> Result<Vec<EarningStat>, FetchError> {
        let mut result = Vec::new();
        for (entity_type, entities) in auctions {
            result.extend(self.run_entity_type(*entity_type, entities)?);
        }
        Ok(result)
    }

    /// One category pass: build the symbol lookup, fetch earnings in batches,
    /// attach symbols.
    fn run_entity_type(
        &self,
        entity_type: EntityType,
        entities: &[AuctionEntity],
    ) -> Result<Vec<EarningStat>, FetchError> {
        // Lookup keys are the auction listing's entity ids, verbatim.
        let symbols: HashMap<&str, &str> = entities
            .iter()
            .map(|e| (e.entity_id.as_str(), e.entity_symbol.as_str()))
            .collect();

        let mut enriched = Vec::new();
        for batch in batches(entities, self.batch_size) {
            let entity_ids: Vec<&str> = batch.iter().map(query_key).collect();
            let variables = json!({
                "entityType": entity_type.as_str(),
                "entityIds": entity_ids,
            });

            log::debug!(
                "fetching earnings for {} {} entities",
                batch.len(),
                entity_type.as_str()
            );

            // Earnings responses are flat (single-page) but use the same
            // single-keyed envelope, nested once more around the record list.
            let response = self.caller.execute(queries::LIFETIME_EARNINGS, &variables)?;
            for record in record_list(descend(response)?)? {
                let mut stat: EarningStat = serde_json::from_value(record)?;
                let key = join_key(&stat);
                let symbol = symbols.get(key).ok_or_else(|| FetchError::JoinKeyMissing {
                    entity_type: stat.entity_type,
                    key: key.to_string(),
                })?;
                stat.entity_symbol = Some((*symbol).to_string());
                enriched.push(stat);
            }
        }
        Ok(enriched)
    }
}

/// Query-side identifier for an auction entity.
fn query_key(entity: &AuctionEntity) -> &str {
    match entity.entity_type {
        EntityType::Network => NETWORK_QUERY_KEY,
        _ => entity.entity_id.as_str(),
    }
}

/// Lookup-side join key for an earnings record. Distinct from `query_key`:
/// the two literals spell the same entity differently.
fn join_key(stat: &EarningStat) -> &str {
    match stat.entity_type {
        EntityType::Network => NETWORK_JOIN_KEY,
        _ => stat.entity_id.as_str(),
    }
}

/// The unwrapped earnings value must be the record list. The API spells an
/// empty result as null rather than an empty list.
fn record_list(value: Value) -> Result<Vec<Value>, FetchError> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        other => Err(FetchError::EnvelopeShape(format!(
            "expected a record list, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::TransportError;
    use crate::model::AuctionStatus;
    use std::cell::RefCell;

    fn entity(id: &str, entity_type: EntityType, symbol: &str) -> AuctionEntity {
        AuctionEntity {
            entity_id: id.to_string(),
            entity_type,
            entity_symbol: symbol.to_string(),
            entity_name: format!("name of {id}"),
            status: AuctionStatus::Completed,
        }
    }

    fn stat_json(id: &str, entity_type: EntityType, wei: &str) -> Value {
        json!({
            "entityId": id,
            "entityType": entity_type.as_str(),
            "allEarningsAmountInWei": wei,
            "startTimestamp": "2024-07-01T00:00:00Z",
            "endTimestamp": "2024-12-31T00:00:00Z",
        })
    }

    /// Stub that records each request's variables and echoes one earnings
    /// record per requested entity id.
    struct EchoTransport {
        requests: RefCell<Vec<Value>>,
        responses: RefCell<Vec<Value>>,
    }

    impl EchoTransport {
        fn with_responses(responses: Vec<Value>) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                responses: RefCell::new(responses),
            }
        }
    }

    impl GraphqlTransport for EchoTransport {
        fn execute(&self, _query: &str, variables: &Value) -> Result<Value, TransportError> {
            self.requests.borrow_mut().push(variables.clone());
            let response = self.responses.borrow_mut().remove(0);
            Ok(response)
        }
    }

    fn test_config(batch_size: usize) -> ApiConfig {
        ApiConfig {
            batch_size,
            retry_delay_secs: 0,
            ..ApiConfig::new("test-token")
        }
    }

    fn earnings_response(stats: Vec<Value>) -> Value {
        json!({ "FarcasterMoxieEarningStats": { "FarcasterMoxieEarningStat": stats } })
    }

    #[test]
    fn network_entity_uses_both_special_spellings() {
        // Auction side spells the network as "network:farcaster"; the query
        // must say "FARCASTER"; the join must resolve back through the
        // verbatim auction id.
        let transport = EchoTransport::with_responses(vec![earnings_response(vec![stat_json(
            "network:farcaster",
            EntityType::Network,
            "1000",
        )])]);
        let config = test_config(10);
        let pipeline = EntityJoinPipeline::new(&transport, &config);

        let mut auctions = AuctionsByType::new();
        auctions.insert(
            EntityType::Network,
            vec![entity("network:farcaster", EntityType::Network, "FARCASTER-SYM")],
        );

        let enriched = pipeline.run(&auctions).unwrap();

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["entityIds"], json!(["FARCASTER"]));
        assert_eq!(requests[0]["entityType"], "NETWORK");

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].entity_symbol.as_deref(), Some("FARCASTER-SYM"));
    }

    #[test]
    fn non_network_entities_pass_raw_ids() {
        let transport = EchoTransport::with_responses(vec![earnings_response(vec![
            stat_json("123", EntityType::User, "5"),
            stat_json("456", EntityType::User, "7"),
        ])]);
        let config = test_config(10);
        let pipeline = EntityJoinPipeline::new(&transport, &config);

        let mut auctions = AuctionsByType::new();
        auctions.insert(
            EntityType::User,
            vec![
                entity("123", EntityType::User, "fid:123"),
                entity("456", EntityType::User, "fid:456"),
            ],
        );

        let enriched = pipeline.run(&auctions).unwrap();

        assert_eq!(
            transport.requests.borrow()[0]["entityIds"],
            json!(["123", "456"])
        );
        assert_eq!(enriched[0].entity_symbol.as_deref(), Some("fid:123"));
        assert_eq!(enriched[1].entity_symbol.as_deref(), Some("fid:456"));
    }

    #[test]
    fn entities_are_queried_in_batches() {
        let transport = EchoTransport::with_responses(vec![
            earnings_response(vec![stat_json("1", EntityType::Channel, "1")]),
            earnings_response(vec![stat_json("3", EntityType::Channel, "3")]),
        ]);
        let config = test_config(2);
        let pipeline = EntityJoinPipeline::new(&transport, &config);

        let mut auctions = AuctionsByType::new();
        auctions.insert(
            EntityType::Channel,
            vec![
                entity("1", EntityType::Channel, "ch1"),
                entity("2", EntityType::Channel, "ch2"),
                entity("3", EntityType::Channel, "ch3"),
            ],
        );

        let enriched = pipeline.run(&auctions).unwrap();

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["entityIds"], json!(["1", "2"]));
        assert_eq!(requests[1]["entityIds"], json!(["3"]));
        // Batch order is preserved in the output
        assert_eq!(enriched[0].entity_id, "1");
        assert_eq!(enriched[1].entity_id, "3");
    }

    #[test]
    fn unknown_join_key_aborts() {
        let transport = EchoTransport::with_responses(vec![earnings_response(vec![stat_json(
            "999",
            EntityType::User,
            "1",
        )])]);
        let config = test_config(10);
        let pipeline = EntityJoinPipeline::new(&transport, &config);

        let mut auctions = AuctionsByType::new();
        auctions.insert(
            EntityType::User,
            vec![entity("123", EntityType::User, "fid:123")],
        );

        let err = pipeline.run(&auctions).unwrap_err();
        match err {
            FetchError::JoinKeyMissing { entity_type, key } => {
                assert_eq!(entity_type, EntityType::User);
                assert_eq!(key, "999");
            }
            other => panic!("expected JoinKeyMissing, got: {other:?}"),
        }
    }

    #[test]
    fn null_record_list_means_no_earnings() {
        let transport = EchoTransport::with_responses(vec![json!({
            "FarcasterMoxieEarningStats": { "FarcasterMoxieEarningStat": null }
        })]);
        let config = test_config(10);
        let pipeline = EntityJoinPipeline::new(&transport, &config);

        let mut auctions = AuctionsByType::new();
        auctions.insert(
            EntityType::User,
            vec![entity("123", EntityType::User, "fid:123")],
        );

        assert!(pipeline.run(&auctions).unwrap().is_empty());
    }

    #[test]
    fn empty_category_issues_no_queries() {
        let transport = EchoTransport::with_responses(vec![]);
        let config = test_config(10);
        let pipeline = EntityJoinPipeline::new(&transport, &config);

        let mut auctions = AuctionsByType::new();
        auctions.insert(EntityType::Channel, vec![]);

        assert!(pipeline.run(&auctions).unwrap().is_empty());
        assert!(transport.requests.borrow().is_empty());
    }
}
