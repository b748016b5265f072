//! Bounded retry around a single GraphQL execute call.
//!
//! Transport failures are retried up to a fixed attempt budget with a fixed
//! sleep between attempts; the final failure propagates unchanged. Successful
//! responses are unwrapped one level: the API nests every query result under
//! a single top-level field, so the caller descends into the sole key after
//! validating there is exactly one.

use crate::client::transport::GraphqlTransport;
use crate::config::ApiConfig;
use crate::error::FetchError;
use serde_json::Value;
use std::time::Duration;

/// Wraps a transport with bounded-retry-with-fixed-delay semantics.
pub struct RetryingCaller<'a> {
    transport: &'a dyn GraphqlTransport,
    max_retries: u32,
    retry_delay: Duration,
}

impl<'a> RetryingCaller<'a> {
    pub fn new(transport: &'a dyn GraphqlTransport, config: &ApiConfig) -> Self {
        Self {
            transport,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        }
    }

    /// Execute one remote call, retrying transport failures, and unwrap the
    /// single-keyed response envelope.
    pub fn execute(&self, query: &str, variables: &Value) -> Result<Value, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.transport.execute(query, variables) {
                Ok(response) => return descend(response),
                Err(e) if attempt < self.max_retries => {
                    log::info!(
                        "request failed (attempt {attempt}/{}): {e}; retrying in {:?}",
                        self.max_retries,
                        self.retry_delay
                    );
                    std::thread::sleep(self.retry_delay);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Extract the sole value under a single-keyed envelope object.
///
/// The API wraps every result in an object whose one key is the query's root
/// field name. Anything other than exactly one key is a contract violation
/// and fails immediately; retrying would not change the shape.
pub fn descend(envelope: Value) -> Result<Value, FetchError> {
    match envelope {
        Value::Object(map) if map.len() == 1 => {
            Ok(map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null))
        }
        Value::Object(map) => Err(FetchError::EnvelopeShape(format!(
            "expected exactly one top-level key, got {}: [{}]",
            map.len(),
            map.keys().cloned().collect::<Vec<_>>().join(", ")
        ))),
        other => Err(FetchError::EnvelopeShape(format!(
            "expected an object envelope, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::TransportError;
    use serde_json::json;
    use std::cell::Cell;
    use std::time::Instant;

    /// Stub transport that fails the first `failures` calls, then succeeds.
    struct FlakyTransport {
        calls: Cell<u32>,
        failures: u32,
    }

    impl FlakyTransport {
        fn new(failures: u32) -> Self {
            Self {
                calls: Cell::new(0),
                failures,
            }
        }
    }

    impl GraphqlTransport for FlakyTransport {
        fn execute(&self, _query: &str, _variables: &Value) -> Result<Value, TransportError> {
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if call <= self.failures {
                Err(TransportError::Network("connection reset".into()))
            } else {
                Ok(json!({ "Result": { "ok": true } }))
            }
        }
    }

    fn config(max_retries: u32, delay_secs: u64) -> ApiConfig {
        ApiConfig {
            max_retries,
            retry_delay_secs: delay_secs,
            ..ApiConfig::new("test-token")
        }
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let transport = FlakyTransport::new(3);
        let caller = RetryingCaller::new(&transport, &config(10, 0));
        let result = caller.execute("query", &json!({})).unwrap();
        assert_eq!(result, json!({ "ok": true }));
        // 3 failures + 1 success
        assert_eq!(transport.calls.get(), 4);
    }

    #[test]
    fn exhausts_budget_and_propagates_final_failure() {
        let transport = FlakyTransport::new(u32::MAX);
        let caller = RetryingCaller::new(&transport, &config(10, 0));
        let err = caller.execute("query", &json!({})).unwrap_err();
        assert_eq!(transport.calls.get(), 10);
        assert!(matches!(
            err,
            FetchError::Transport(TransportError::Network(_))
        ));
    }

    #[test]
    fn sleeps_between_attempts() {
        // retry_delay_secs only takes whole seconds, so observe the delay at
        // one-second granularity: 2 failures -> 2 sleeps -> >= 2s elapsed.
        let transport = FlakyTransport::new(2);
        let caller = RetryingCaller::new(&transport, &config(10, 1));
        let started = Instant::now();
        caller.execute("query", &json!({})).unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(transport.calls.get(), 3);
    }

    #[test]
    fn multi_key_envelope_is_fatal_not_retried() {
        struct MultiKey {
            calls: Cell<u32>,
        }
        impl GraphqlTransport for MultiKey {
            fn execute(&self, _: &str, _: &Value) -> Result<Value, TransportError> {
                self.calls.set(self.calls.get() + 1);
                Ok(json!({ "A": 1, "B": 2 }))
            }
        }
        let transport = MultiKey {
            calls: Cell::new(0),
        };
        let caller = RetryingCaller::new(&transport, &config(10, 0));
        let err = caller.execute("query", &json!({})).unwrap_err();
        assert!(matches!(err, FetchError::EnvelopeShape(_)));
        // Shape violations are not retried
        assert_eq!(transport.calls.get(), 1);
    }

    #[test]
    fn empty_envelope_is_a_shape_violation() {
        assert!(matches!(
            descend(json!({})),
            Err(FetchError::EnvelopeShape(_))
        ));
        assert!(matches!(
            descend(json!([1, 2])),
            Err(FetchError::EnvelopeShape(_))
        ));
    }
}
