//! Faceted list controller.
//!
//! [`ListController`] owns everything a list page needs between user input
//! and the network: filter values, pagination, the current result page and
//! its loading/error state. It performs no I/O. Every action returns an
//! optional [`Command`] that the host executes (start a fetch, start a
//! debounce timer) and later reports back through [`ListController::resolve`]
//! or [`ListController::debounce_elapsed`].

use std::time::Duration;

use bazaar_shared::Page;
use tracing::{debug, trace, warn};

use crate::debounce::{DebounceToken, Debouncer};
use crate::error::FetchError;
use crate::fetch::{FetchRequest, RequestId, RequestTracker};
use crate::filter::FilterState;
use crate::pagination::PaginationState;
use crate::query::{build_query, QueryParams};
use crate::schema::{FacetError, FacetSchema};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub page_size: u32,
    /// Quiet period after the last keystroke in a search facet.
    pub search_debounce: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

/// Work the host has to carry out on behalf of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch(FetchRequest),
    /// Call [`ListController::debounce_elapsed`] with `token` after `delay`.
    Debounce { token: DebounceToken, delay: Duration },
}

/// What the page should show. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing has been requested yet.
    Idle,
    Fetching,
    Error,
    Empty,
    Populated,
}

#[derive(Debug, Clone)]
pub struct ListController<R> {
    schema: FacetSchema,
    filters: FilterState,
    pagination: PaginationState,
    items: Vec<R>,
    error: Option<FetchError>,
    loading: bool,
    requests: RequestTracker,
    last_params: Option<QueryParams>,
    debounce: Debouncer,
}

impl<R> ListController<R> {
    pub fn new(schema: FacetSchema, config: ControllerConfig) -> Self {
        Self {
            schema,
            filters: FilterState::new(&schema),
            pagination: PaginationState::new(config.page_size),
            items: Vec::new(),
            error: None,
            loading: false,
            requests: RequestTracker::default(),
            last_params: None,
            debounce: Debouncer::new(config.search_debounce),
        }
    }

    /// Preset a facet before the first load, e.g. from the page URL.
    pub fn with_filter(mut self, name: &str, value: impl Into<String>) -> Result<Self, FacetError> {
        let facet = self.schema.require(name)?;
        self.filters.set(facet, value.into());
        Ok(self)
    }

    pub fn schema(&self) -> &FacetSchema {
        &self.schema
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_default(&self.schema)
    }

    /// Parameters a fetch issued right now would carry.
    pub fn query(&self) -> QueryParams {
        build_query(&self.schema, &self.filters, &self.pagination)
    }

    pub fn view_state(&self) -> ViewState {
        if self.requests.latest().is_none() {
            ViewState::Idle
        } else if self.loading {
            ViewState::Fetching
        } else if self.error.is_some() {
            ViewState::Error
        } else if self.items.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Populated
        }
    }

    /// Initial fetch on mount.
    pub fn load(&mut self) -> Command {
        self.issue_fetch()
    }

    /// Re-issue the fetch for the current filters and page, e.g. after an
    /// error or after a mutation changed the underlying data.
    pub fn retry(&mut self) -> Command {
        self.debounce.cancel();
        self.issue_fetch()
    }

    /// Change one facet. The page always goes back to 1.
    ///
    /// Search facets answer with [`Command::Debounce`]; other facets fetch at
    /// once and supersede any pending debounce.
    pub fn set_facet(&mut self, name: &str, value: impl Into<String>) -> Result<Option<Command>, FacetError> {
        let facet = self.schema.require(name)?;
        if !self.filters.set(facet, value.into()) {
            return Ok(None);
        }
        self.pagination.reset_page();

        let delay = self.debounce.delay();
        if facet.is_debounced() && !delay.is_zero() {
            let token = self.debounce.schedule();
            trace!(facet = facet.name, "search input debounced");
            return Ok(Some(Command::Debounce { token, delay }));
        }

        self.debounce.cancel();
        Ok(self.fetch_if_changed())
    }

    /// Reset every facet and the page at once, with a single fetch.
    pub fn clear_filters(&mut self) -> Command {
        self.filters.reset(&self.schema);
        self.pagination.reset_page();
        self.debounce.cancel();
        self.issue_fetch()
    }

    pub fn debounce_elapsed(&mut self, token: DebounceToken) -> Option<Command> {
        if !self.debounce.fire(token) {
            return None;
        }
        self.fetch_if_changed()
    }

    /// Jump to page `n`; ignored unless `1 <= n <= pages`.
    ///
    /// A search still waiting out its debounce has already put the list back
    /// on page 1. Page navigation flushes that search instead of moving, as
    /// do [`Self::next_page`] and [`Self::prev_page`].
    pub fn go_to_page(&mut self, n: u32) -> Option<Command> {
        if let Some(cmd) = self.flush_pending_search() {
            return Some(cmd);
        }
        if !self.pagination.contains(n) {
            return None;
        }
        self.pagination.set_page(n);
        Some(self.issue_fetch())
    }

    pub fn next_page(&mut self) -> Option<Command> {
        if let Some(cmd) = self.flush_pending_search() {
            return Some(cmd);
        }
        if self.pagination.is_out_of_range() {
            return Some(self.clamp_to_last());
        }
        if !self.pagination.has_next() {
            return None;
        }
        self.pagination.set_page(self.pagination.page() + 1);
        Some(self.issue_fetch())
    }

    pub fn prev_page(&mut self) -> Option<Command> {
        if let Some(cmd) = self.flush_pending_search() {
            return Some(cmd);
        }
        if self.pagination.is_out_of_range() {
            return Some(self.clamp_to_last());
        }
        if !self.pagination.has_prev() {
            return None;
        }
        self.pagination.set_page(self.pagination.page() - 1);
        Some(self.issue_fetch())
    }

    /// Commit the outcome of request `id`. Outcomes of superseded requests
    /// are dropped; returns whether this one was committed.
    pub fn resolve(&mut self, id: RequestId, outcome: Result<Page<R>, FetchError>) -> bool {
        if !self.requests.is_current(id) {
            trace!(request = id.get(), "discarding superseded response");
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(page) => {
                self.pagination.apply(page.meta);
                self.items = page.items;
                self.error = None;
                debug!(
                    request = id.get(),
                    items = self.items.len(),
                    total = self.pagination.total(),
                    "list page committed"
                );
            }
            Err(err) => {
                warn!(request = id.get(), error = %err, "list fetch failed");
                self.error = Some(err);
            }
        }
        true
    }

    fn flush_pending_search(&mut self) -> Option<Command> {
        if !self.debounce.is_pending() {
            return None;
        }
        self.debounce.cancel();
        self.fetch_if_changed()
    }

    fn clamp_to_last(&mut self) -> Command {
        let last = self.pagination.last_valid();
        debug!(from = self.pagination.page(), to = last, "page out of range, clamping");
        self.pagination.set_page(last);
        self.issue_fetch()
    }

    /// Skip the fetch when the derived parameters equal those of the latest
    /// request and that request did not fail.
    fn fetch_if_changed(&mut self) -> Option<Command> {
        let unchanged = self.error.is_none() && self.last_params.as_ref() == Some(&self.query());
        if unchanged {
            trace!("parameters unchanged, no fetch");
            return None;
        }
        Some(self.issue_fetch())
    }

    fn issue_fetch(&mut self) -> Command {
        let id = self.requests.issue();
        let params = self.query();
        debug!(request = id.get(), params = %params, "issuing list fetch");

        self.loading = true;
        self.error = None;
        self.last_params = Some(params.clone());
        Command::Fetch(FetchRequest { id, params })
    }
}
