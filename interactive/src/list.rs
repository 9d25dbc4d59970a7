//! Binds a [`ListController`] to Leptos signals and renders the parts every
//! list page shares: filter bar, status banner, results and pager.

use bazaar_facets::{perform, Command, Facet, FacetKind, FacetSchema, FetchError, ListController, ViewState};
use bazaar_shared::Resource;
use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::config::AppConfig;

/// Copyable handle to one list page's controller.
pub struct ListHandle<R: Send + Sync + 'static> {
    state: RwSignal<ListController<R>>,
    client: ApiClient,
}

impl<R: Send + Sync + 'static> Clone for ListHandle<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Send + Sync + 'static> Copy for ListHandle<R> {}

pub fn use_list<R: Resource>(schema: FacetSchema) -> ListHandle<R> {
    use_list_with(schema, &[])
}

/// Like [`use_list`], with facets preset before the first load.
pub fn use_list_with<R: Resource>(schema: FacetSchema, presets: &[(&str, String)]) -> ListHandle<R> {
    let config = expect_context::<AppConfig>().controller();
    let client = expect_context::<ApiClient>();

    let preset = presets
        .iter()
        .try_fold(ListController::new(schema, config), |c, (name, value)| {
            c.with_filter(name, value.clone())
        });
    let controller = preset.unwrap_or_else(|err| {
        warn!(error = %err, "ignoring list presets");
        ListController::new(schema, config)
    });

    let handle = ListHandle { state: RwSignal::new(controller), client };
    let load = handle.state.try_update(|c| c.load());
    handle.dispatch(load);
    handle
}

impl<R: Resource> ListHandle<R> {
    /// Tracked read of the controller.
    pub fn with<U>(&self, f: impl FnOnce(&ListController<R>) -> U) -> U {
        self.state.with(f)
    }

    pub fn with_untracked<U>(&self, f: impl FnOnce(&ListController<R>) -> U) -> U {
        self.state.with_untracked(f)
    }

    pub fn client(&self) -> ApiClient {
        self.client
    }

    pub fn set_facet(self, name: &str, value: String) {
        let cmd = self.state.try_update(|c| c.set_facet(name, value)).and_then(|r| {
            r.unwrap_or_else(|err| {
                warn!(error = %err, "facet change ignored");
                None
            })
        });
        self.dispatch(cmd);
    }

    pub fn clear(self) {
        let cmd = self.state.try_update(|c| c.clear_filters());
        self.dispatch(cmd);
    }

    /// Same parameters again; also used to refresh after a mutation.
    pub fn retry(self) {
        let cmd = self.state.try_update(|c| c.retry());
        self.dispatch(cmd);
    }

    pub fn go_to_page(self, n: u32) {
        let cmd = self.state.try_update(|c| c.go_to_page(n)).flatten();
        self.dispatch(cmd);
    }

    pub fn next_page(self) {
        let cmd = self.state.try_update(|c| c.next_page()).flatten();
        self.dispatch(cmd);
    }

    pub fn prev_page(self) {
        let cmd = self.state.try_update(|c| c.prev_page()).flatten();
        self.dispatch(cmd);
    }

    fn dispatch(self, cmd: Option<Command>) {
        match cmd {
            None => {}
            Some(Command::Fetch(request)) => {
                let Self { state, client } = self;
                spawn_local(async move {
                    let (id, outcome) = perform::<R, _>(&client, request).await;
                    // The page may have been unmounted while the request was in flight.
                    state.try_update(|c| c.resolve(id, outcome));
                });
            }
            Some(Command::Debounce { token, delay }) => {
                set_timeout(
                    move || {
                        let cmd = self.state.try_update(|c| c.debounce_elapsed(token)).flatten();
                        self.dispatch(cmd);
                    },
                    delay,
                );
            }
        }
    }
}

/// Full list page body. Pages supply only a heading and an item renderer.
pub fn list_shell<R, F, V>(handle: ListHandle<R>, heading: &'static str, render_item: F) -> impl IntoView
where
    R: Resource,
    F: Fn(R) -> V + Send + Sync + 'static,
    V: IntoView + 'static,
{
    let results = move || {
        let visible = handle.with(|c| matches!(c.view_state(), ViewState::Populated | ViewState::Fetching));
        if !visible {
            return Vec::new();
        }
        handle.with(|c| c.items().to_vec()).into_iter().map(&render_item).collect::<Vec<_>>()
    };

    view! {
        <section class="bazaar-list">
            <h2>{heading}</h2>
            {filter_bar(handle)}
            {status_banner(handle)}
            <div
                class="bazaar-results"
                class:bazaar-stale=move || handle.with(|c| c.is_loading())
            >
                {results}
            </div>
            {pager(handle)}
        </section>
    }
}

pub fn filter_bar<R: Resource>(handle: ListHandle<R>) -> impl IntoView {
    let schema = handle.with_untracked(|c| *c.schema());

    view! {
        <div class="bazaar-filters">
            {schema.facets().iter().map(|facet| facet_control(handle, facet)).collect_view()}
            <button
                class="bazaar-btn bazaar-btn-sm"
                disabled=move || !handle.with(|c| c.has_active_filters())
                on:click=move |_| handle.clear()
            >
                "Clear filters"
            </button>
        </div>
    }
}

fn facet_control<R: Resource>(handle: ListHandle<R>, facet: &'static Facet) -> AnyView {
    let value = move || handle.with(|c| c.filters().get(facet.name).unwrap_or_default().to_string());

    match facet.kind {
        FacetKind::Search => view! {
            <label class="bazaar-facet">
                <span>{facet.label}</span>
                <input
                    class="bazaar-input"
                    type="search"
                    placeholder=facet.label
                    prop:value=value
                    on:input=move |ev| handle.set_facet(facet.name, event_target_value(&ev))
                />
            </label>
        }
        .into_any(),
        FacetKind::Text => view! {
            <label class="bazaar-facet">
                <span>{facet.label}</span>
                <input
                    class="bazaar-input"
                    type="text"
                    prop:value=value
                    on:change=move |ev| handle.set_facet(facet.name, event_target_value(&ev))
                />
            </label>
        }
        .into_any(),
        FacetKind::Number { min } => view! {
            <label class="bazaar-facet">
                <span>{facet.label}</span>
                <input
                    class="bazaar-input"
                    type="number"
                    min=min.map(|m| m.to_string())
                    prop:value=value
                    on:change=move |ev| handle.set_facet(facet.name, event_target_value(&ev))
                />
            </label>
        }
        .into_any(),
        FacetKind::Choice(options) => {
            let any_option = (!options.iter().any(|o| o.value == facet.unset)).then(|| {
                view! {
                    <option value=facet.unset prop:selected=move || value() == facet.unset>
                        "All"
                    </option>
                }
            });
            view! {
                <label class="bazaar-facet">
                    <span>{facet.label}</span>
                    <select
                        class="bazaar-select"
                        on:change=move |ev| handle.set_facet(facet.name, event_target_value(&ev))
                    >
                        {any_option}
                        {options
                            .iter()
                            .map(|o| {
                                view! {
                                    <option value=o.value prop:selected=move || value() == o.value>
                                        {o.label}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </label>
            }
            .into_any()
        }
    }
}

fn status_banner<R: Resource>(handle: ListHandle<R>) -> impl IntoView {
    move || match handle.with(|c| c.view_state()) {
        ViewState::Idle | ViewState::Populated => ().into_any(),
        ViewState::Fetching => view! { <p class="bazaar-loading">"Loading..."</p> }.into_any(),
        ViewState::Error => {
            let message = handle.with(|c| c.error().map(FetchError::user_message).unwrap_or_default());
            view! {
                <div class="bazaar-error" role="alert">
                    <p>{message}</p>
                    <button class="bazaar-btn bazaar-btn-sm" on:click=move |_| handle.retry()>
                        "Retry"
                    </button>
                </div>
            }
            .into_any()
        }
        ViewState::Empty => {
            let filtered = handle.with(|c| c.has_active_filters());
            view! {
                <div class="bazaar-empty">
                    <p>"No results found."</p>
                    {filtered
                        .then(|| {
                            view! {
                                <button class="bazaar-btn bazaar-btn-sm" on:click=move |_| handle.clear()>
                                    "Clear filters"
                                </button>
                            }
                        })}
                </div>
            }
            .into_any()
        }
    }
}

fn pager<R: Resource>(handle: ListHandle<R>) -> impl IntoView {
    move || {
        let (slots, page, pages, total, out_of_range, has_prev, has_next) = handle.with(|c| {
            let p = c.pagination();
            (p.window(), p.page(), p.pages(), p.total(), p.is_out_of_range(), p.has_prev(), p.has_next())
        });
        if pages <= 1 && !out_of_range {
            return ().into_any();
        }

        view! {
            <nav class="bazaar-pagination">
                <button
                    class="bazaar-btn bazaar-btn-sm"
                    disabled={!(has_prev || out_of_range)}
                    on:click=move |_| handle.prev_page()
                >
                    "Prev"
                </button>
                {slots
                    .into_iter()
                    .map(|slot| match slot {
                        Some(n) => view! {
                            <button
                                class="bazaar-btn bazaar-btn-sm"
                                class:active={n == page}
                                on:click=move |_| handle.go_to_page(n)
                            >
                                {n}
                            </button>
                        }
                        .into_any(),
                        None => view! { <span class="bazaar-gap">"..."</span> }.into_any(),
                    })
                    .collect_view()}
                <button
                    class="bazaar-btn bazaar-btn-sm"
                    disabled={!(has_next || out_of_range)}
                    on:click=move |_| handle.next_page()
                >
                    "Next"
                </button>
                <span class="bazaar-total">{format!("{total} results")}</span>
            </nav>
        }
        .into_any()
    }
}
