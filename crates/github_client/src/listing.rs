//! Decoding of GitHub list responses.
//!
//! GitHub does not wrap its lists consistently. `/app/installations` has been seen to
//! return a bare array as well as an object with an `installations` key, and
//! `/installation/repositories` returns an object with a `repositories` key and a
//! `total_count`. Both call sites go through [`decode_listing`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Error;

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;

/// The shapes a list response can take.
#[derive(Debug)]
enum ListingEnvelope {
    /// A top-level JSON array.
    Bare(Vec<Value>),
    /// A JSON object that may hold the array under a known key.
    Wrapped(Map<String, Value>),
}

impl ListingEnvelope {
    fn parse(operation: &'static str, body: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Protocol {
            operation,
            reason: format!("response is not valid JSON: {e}"),
        })?;

        match value {
            Value::Array(items) => Ok(ListingEnvelope::Bare(items)),
            Value::Object(fields) => Ok(ListingEnvelope::Wrapped(fields)),
            other => Err(Error::Protocol {
                operation,
                reason: format!("expected a JSON array or object, got {}", json_kind(&other)),
            }),
        }
    }
}

/// Items decoded from a list response.
#[derive(Debug)]
pub(crate) struct Listing<T> {
    /// The items, in response order
    pub(crate) items: Vec<T>,
    /// The total number of items GitHub reported, if any
    pub(crate) total_count: Option<u64>,
}

/// Decodes a list response that is either a bare array or an object holding the
/// array under `key`.
///
/// An object without `key` (or with `key` set to `null`) decodes to an empty list.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the body is not JSON, is neither an array nor an
/// object, or contains items that do not decode as `T`.
pub(crate) fn decode_listing<T: DeserializeOwned>(
    operation: &'static str,
    body: &str,
    key: &str,
) -> Result<Listing<T>, Error> {
    let (items, total_count) = match ListingEnvelope::parse(operation, body)? {
        ListingEnvelope::Bare(items) => (items, None),
        ListingEnvelope::Wrapped(mut fields) => {
            let total_count = fields.get("total_count").and_then(Value::as_u64);
            let items = match fields.remove(key) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(Error::Protocol {
                        operation,
                        reason: format!("'{key}' should be an array, got {}", json_kind(&other)),
                    })
                }
            };
            (items, total_count)
        }
    };

    let items = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| Error::Protocol {
            operation,
            reason: format!("unexpected item in '{key}': {e}"),
        })?;

    Ok(Listing { items, total_count })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
