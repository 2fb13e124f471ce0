//! Collection response
//!
//! A `GraphResponse` whose body is known to carry a `value` array.

use super::envelope::{link_field, GraphResponse};
use crate::error::{Error, Result};
use crate::types::{JsonValue, ODATA_DELTA_LINK, ODATA_NEXT_LINK, VALUE_FIELD};

/// One page of a paginated collection
#[derive(Debug, Clone)]
pub struct CollectionResponse {
    response: GraphResponse,
}

impl CollectionResponse {
    /// Raw records of this page, in server order
    pub fn items(&self) -> &[JsonValue] {
        self.response
            .decoded_body()
            .and_then(|body| body.get(VALUE_FIELD))
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Check for an empty page
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// URL of the next page
    pub fn next_link(&self) -> Option<&str> {
        self.response
            .decoded_body()
            .and_then(|body| link_field(body, ODATA_NEXT_LINK))
    }

    /// Change-tracking URL, present on the last page of a delta query
    pub fn delta_link(&self) -> Option<&str> {
        self.response
            .decoded_body()
            .and_then(|body| link_field(body, ODATA_DELTA_LINK))
    }

    /// Check if another page follows this one
    pub fn has_next(&self) -> bool {
        self.next_link().is_some()
    }

    /// The wrapped response
    pub fn response(&self) -> &GraphResponse {
        &self.response
    }

    /// Unwrap the response
    pub fn into_response(self) -> GraphResponse {
        self.response
    }
}

impl TryFrom<GraphResponse> for CollectionResponse {
    type Error = Error;

    fn try_from(response: GraphResponse) -> Result<Self> {
        let is_collection = matches!(
            response.body()?.get(VALUE_FIELD),
            Some(JsonValue::Array(_))
        );
        if !is_collection {
            return Err(Error::client(format!(
                "expected a collection response with a '{VALUE_FIELD}' array"
            )));
        }
        Ok(Self { response })
    }
}

impl GraphResponse {
    /// Convert into a collection response
    pub fn into_collection(self) -> Result<CollectionResponse> {
        CollectionResponse::try_from(self)
    }
}
