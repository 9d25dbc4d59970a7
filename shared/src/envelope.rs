//! Response envelope adapter.
//!
//! List endpoints answer with one of two shapes:
//!
//! ```text
//! { "success": true, "data": { "<key>": [...], "pagination": {...} } }
//! { "success": true, "data": [...], "pagination": {...} }
//! ```
//!
//! where `<key>` is either `items` or the resource's collection key.
//! Everything here folds both into a [`Page`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::Resource;

const GENERIC_FAILURE: &str = "Request failed";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The backend answered `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Pagination block as sent on the wire. `pages` is not kept: the page count
/// is always recomputed from `total` and `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default = "first_page", alias = "currentPage")]
    pub page: u32,
    /// Zero when the backend did not say; callers fall back to their own size.
    #[serde(default, alias = "perPage", alias = "per_page", alias = "pageSize")]
    pub limit: u32,
    #[serde(default, alias = "totalItems", alias = "count")]
    pub total: u64,
}

fn first_page() -> u32 {
    1
}

impl PageMeta {
    /// Meta for an unpaginated answer holding `len` items. The page size is
    /// left unstated so the caller keeps the one it asked for.
    pub fn single(len: usize) -> Self {
        Self {
            page: 1,
            limit: 0,
            total: len as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    pub message: Option<String>,
}

pub fn decode_list<R: Resource>(body: &str) -> Result<Page<R>, EnvelopeError> {
    let value: Value = serde_json::from_str(body)?;
    decode_list_value(value)
}

pub fn decode_list_value<R: Resource>(mut value: Value) -> Result<Page<R>, EnvelopeError> {
    let Some(root) = value.as_object_mut() else {
        return Err(EnvelopeError::Malformed("expected a JSON object".into()));
    };

    if !root.get("success").and_then(Value::as_bool).unwrap_or(true) {
        return Err(EnvelopeError::Rejected(message_of(root)));
    }

    let data = root
        .remove("data")
        .ok_or_else(|| EnvelopeError::Malformed("missing `data`".into()))?;

    let (items, nested_meta) = match data {
        Value::Array(items) => (Value::Array(items), None),
        Value::Object(mut map) => {
            let items = map
                .remove(R::COLLECTION_KEY)
                .or_else(|| map.remove("items"))
                .ok_or_else(|| {
                    EnvelopeError::Malformed(format!(
                        "`data` has neither `{}` nor `items`",
                        R::COLLECTION_KEY
                    ))
                })?;
            (items, map.remove("pagination"))
        }
        _ => return Err(EnvelopeError::Malformed("`data` is not a list or object".into())),
    };

    let items: Vec<R> = serde_json::from_value(items)?;
    let meta = match nested_meta.or_else(|| root.remove("pagination")) {
        Some(meta) => serde_json::from_value(meta)?,
        None => PageMeta::single(items.len()),
    };

    Ok(Page { items, meta })
}

/// Decode a `{ success, data }` answer carrying a single object.
pub fn decode_item<T: DeserializeOwned>(body: &str) -> Result<T, EnvelopeError> {
    let mut value: Value = serde_json::from_str(body)?;
    let Some(root) = value.as_object_mut() else {
        return Err(EnvelopeError::Malformed("expected a JSON object".into()));
    };

    if !root.get("success").and_then(Value::as_bool).unwrap_or(true) {
        return Err(EnvelopeError::Rejected(message_of(root)));
    }

    let data = root
        .remove("data")
        .ok_or_else(|| EnvelopeError::Malformed("missing `data`".into()))?;
    Ok(serde_json::from_value(data)?)
}

/// Decode the `{ success, message? }` answer of a mutating endpoint.
pub fn decode_mutation(body: &str) -> Result<MutationOutcome, EnvelopeError> {
    // Some endpoints answer 204 with nothing at all.
    if body.trim().is_empty() {
        return Ok(MutationOutcome::default());
    }

    let value: Value = serde_json::from_str(body)?;
    let Some(root) = value.as_object() else {
        return Err(EnvelopeError::Malformed("expected a JSON object".into()));
    };

    if !root.get("success").and_then(Value::as_bool).unwrap_or(true) {
        return Err(EnvelopeError::Rejected(message_of(root)));
    }

    Ok(MutationOutcome {
        message: root.get("message").and_then(Value::as_str).map(str::to_owned),
    })
}

/// Pull a user-displayable message out of an error body, if it has one.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let root = value.as_object()?;
    root.get("message")
        .or_else(|| root.get("error"))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

fn message_of(root: &serde_json::Map<String, Value>) -> String {
    root.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(GENERIC_FAILURE)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dormitory, Listing, SearchHit};
    use serde_json::json;

    fn dorm(id: &str) -> Value {
        json!({
            "_id": id,
            "name": format!("Dorm {id}"),
            "city": "Nicosia",
            "genderPolicy": "female",
            "availability": "available",
            "status": "approved",
            "createdAt": "2024-05-01"
        })
    }

    #[test]
    fn nested_shape_with_collection_key() {
        let body = json!({
            "success": true,
            "data": {
                "dormitories": [dorm("a"), dorm("b")],
                "pagination": { "page": 2, "limit": 2, "total": 7, "pages": 4 }
            }
        });

        let page: Page<Dormitory> = decode_list_value(body).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].id.as_str(), "b");
        assert_eq!(page.meta, PageMeta { page: 2, limit: 2, total: 7 });
    }

    #[test]
    fn nested_shape_with_generic_items_key() {
        let body = json!({
            "success": true,
            "data": { "items": [dorm("a")], "pagination": { "page": 1, "limit": 10, "total": 1 } }
        });

        let page: Page<Dormitory> = decode_list_value(body).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta.total, 1);
    }

    #[test]
    fn flat_shape_with_top_level_pagination() {
        let body = json!({
            "success": true,
            "data": [dorm("x")],
            "pagination": { "currentPage": 3, "perPage": 12, "totalItems": 30 }
        });

        let page: Page<Dormitory> = decode_list_value(body).unwrap();
        assert_eq!(page.meta, PageMeta { page: 3, limit: 12, total: 30 });
    }

    #[test]
    fn missing_pagination_is_a_single_page() {
        let body = json!({ "success": true, "data": [dorm("x"), dorm("y"), dorm("z")] });

        let page: Page<Dormitory> = decode_list_value(body).unwrap();
        assert_eq!(page.meta, PageMeta { page: 1, limit: 0, total: 3 });
    }

    #[test]
    fn unsuccessful_envelope_carries_message() {
        let body = r#"{ "success": false, "message": "Not allowed to view this list" }"#;

        match decode_list::<Listing>(body) {
            Err(EnvelopeError::Rejected(msg)) => assert_eq!(msg, "Not allowed to view this list"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn unsuccessful_envelope_without_message_gets_generic_text() {
        match decode_list::<Listing>(r#"{ "success": false }"#) {
            Err(EnvelopeError::Rejected(msg)) => assert_eq!(msg, GENERIC_FAILURE),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn wrong_collection_key_is_malformed() {
        let body = json!({ "success": true, "data": { "listings": [] } });
        assert!(matches!(
            decode_list_value::<SearchHit>(body),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn single_item_envelope() {
        let stats: crate::PaymentStats = decode_item(
            r#"{ "success": true, "data": { "total": 9, "proofSubmitted": 4, "verifiedAmount": 1250.5 } }"#,
        )
        .unwrap();
        assert_eq!(stats.total, 9);
        assert_eq!(stats.proof_submitted, 4);
        assert_eq!(stats.verified, 0);

        assert!(matches!(
            decode_item::<crate::PaymentStats>(r#"{ "success": false, "message": "Admins only" }"#),
            Err(EnvelopeError::Rejected(m)) if m == "Admins only"
        ));
    }

    #[test]
    fn mutation_envelopes() {
        assert_eq!(
            decode_mutation(r#"{ "success": true, "message": "Listing approved" }"#).unwrap(),
            MutationOutcome { message: Some("Listing approved".into()) }
        );
        assert_eq!(decode_mutation("").unwrap(), MutationOutcome::default());
        assert!(matches!(
            decode_mutation(r#"{ "success": false, "message": "Already verified" }"#),
            Err(EnvelopeError::Rejected(m)) if m == "Already verified"
        ));
    }

    #[test]
    fn error_message_prefers_message_then_error() {
        assert_eq!(error_message(r#"{ "message": "Token expired" }"#).as_deref(), Some("Token expired"));
        assert_eq!(error_message(r#"{ "error": "Bad filter" }"#).as_deref(), Some("Bad filter"));
        assert_eq!(error_message(r#"{ "message": "  " }"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }
}
