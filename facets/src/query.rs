use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::filter::FilterState;
use crate::pagination::PaginationState;
use crate::schema::FacetSchema;

pub const PAGE_PARAM: &str = "page";
pub const LIMIT_PARAM: &str = "limit";

/// Request parameters derived from filters and pagination at fetch time.
///
/// Ordered so that equal inputs always render the same query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Percent-encoded `k=v&k=v`, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Derive the parameters for a list request.
///
/// Only facets holding an active constraint are included; `page` and `limit`
/// are always present.
pub fn build_query(
    schema: &FacetSchema,
    filters: &FilterState,
    pagination: &PaginationState,
) -> QueryParams {
    let mut params = QueryParams::default();

    for facet in schema.facets() {
        if let Some(value) = filters.get(facet.name).and_then(|raw| facet.normalize(raw)) {
            params.insert(facet.name, value);
        }
    }

    params.insert(PAGE_PARAM, pagination.page().to_string());
    params.insert(LIMIT_PARAM, pagination.limit().to_string());
    params
}
