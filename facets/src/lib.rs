//! Search, filter and paginate state for list pages.
//!
//! A page describes its filters as a [`FacetSchema`] and drives a
//! [`ListController`]; the controller decides when to fetch, what to send,
//! and which response may update the page.

mod controller;
mod debounce;
mod error;
mod fetch;
mod filter;
mod pagination;
mod query;
mod schema;

pub use controller::{
    Command, ControllerConfig, ListController, ViewState, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE,
};
pub use debounce::{DebounceToken, Debouncer};
pub use error::FetchError;
pub use fetch::{join_independent, perform, FetchRequest, ListSource, RequestId, RequestTracker};
pub use filter::FilterState;
pub use pagination::PaginationState;
pub use query::{build_query, QueryParams, LIMIT_PARAM, PAGE_PARAM};
pub use schema::{Choice, Facet, FacetError, FacetKind, FacetSchema, ALL};
