//! Cursor-based pagination over a retried GraphQL call.
//!
//! Each page response carries exactly two top-level fields: a `pageInfo`
//! object with `hasNextPage` / `nextCursor`, and one other field holding the
//! page's record list. The paginator identifies the records field as
//! "whichever key is not pageInfo", which keeps it agnostic to the specific
//! query shape. Pages are followed until the server reports
//! `hasNextPage: false` or the configured page ceiling is hit.

use crate::client::retry::RetryingCaller;
use crate::error::FetchError;
use serde::Deserialize;
use serde_json::{Map, Value};

const PAGE_INFO_KEY: &str = "pageInfo";

/// Server-side pagination state for one page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    /// Opaque continuation token. Carries no meaning to the client; it is
    /// passed back verbatim as the next page's cursor.
    #[serde(default)]
    next_cursor: Value,
}

/// Follows a cursor-paginated query to completion, accumulating all pages
/// into one ordered sequence.
pub struct CursorPaginator<'a, 'b> {
    caller: &'a RetryingCaller<'b>,
    max_pages: u32,
}

impl<'a, 'b> CursorPaginator<'a, 'b> {
    pub fn new(caller: &'a RetryingCaller<'b>, max_pages: u32) -> Self {
        Self { caller, max_pages }
    }

    /// Fetch every page of `query`, merging the current cursor into
    /// `base_variables` (null on the first page). Records are returned in
    /// first-seen order: page order, then within-page server order.
    pub fn fetch_all(
        &self,
        query: &str,
        base_variables: &Map<String, Value>,
    ) -> Result<Vec<Value>, FetchError> {
        let mut all_records = Vec::new();
        let mut cursor = Value::Null;

        for page_no in 1..=self.max_pages {
            log::info!("fetching page {page_no}");

            let mut variables = base_variables.clone();
            variables.insert("cursor".to_string(), cursor);

            let page = self.caller.execute(query, &Value::Object(variables))?;
            let (records, page_info) = split_page(page)?;
            all_records.extend(records);

            if !page_info.has_next_page {
                return Ok(all_records);
            }
            cursor = page_info.next_cursor;
        }

        Err(FetchError::PageLimitExceeded {
            limit: self.max_pages,
        })
    }
}

/// Split a page into its record list and pagination state, validating the
/// two-key envelope.
fn split_page(page: Value) -> Result<(Vec<Value>, PageInfo), FetchError> {
    let Value::Object(mut fields) = page else {
        return Err(FetchError::EnvelopeShape(format!(
            "expected a page object, got {page}"
        )));
    };

    if fields.len() != 2 || !fields.contains_key(PAGE_INFO_KEY) {
        return Err(FetchError::EnvelopeShape(format!(
            "expected pageInfo plus one records field, got: [{}]",
            fields.keys().cloned().collect::<Vec<_>>().join(", ")
        )));
    }

    let page_info_value = fields
        .remove(PAGE_INFO_KEY)
        .ok_or_else(|| FetchError::EnvelopeShape("pageInfo vanished from page".into()))?;
    let page_info: PageInfo = serde_json::from_value(page_info_value)
        .map_err(|e| FetchError::EnvelopeShape(format!("malformed pageInfo: {e}")))?;

    let (records_key, records_value) = fields
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::EnvelopeShape("page has no records field".into()))?;
    let Value::Array(records) = records_value else {
        return Err(FetchError::EnvelopeShape(format!(
            "records field '{records_key}' is not a list"
        )));
    };

    Ok((records, page_info))
}
