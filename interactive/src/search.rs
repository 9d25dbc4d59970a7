//! Site-wide search. The header search form lands here with `?q=...`.

use bazaar_facets::{Choice, Facet, FacetSchema};
use bazaar_shared::{Resource, SearchHit};
use leptos::prelude::*;
use web_sys::window;

use crate::list::{list_shell, use_list_with};

const KINDS: &[Choice] = &[
    Choice::new("listing", "Properties"),
    Choice::new("dormitory", "Dormitories"),
    Choice::new("job", "Jobs"),
    Choice::new("program", "Education"),
];

const FACETS: &[Facet] = &[
    Facet::search("q", "Search everything"),
    Facet::choice("type", "Show", KINDS),
];

pub const SCHEMA: FacetSchema = FacetSchema::new(FACETS);

/// `q` from the page URL, if any.
fn url_query() -> Option<String> {
    let href = window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    url.search_params().get("q").filter(|q| !q.trim().is_empty())
}

fn kind_label(kind: &str) -> &str {
    KINDS.iter().find(|c| c.value == kind).map_or(kind, |c| c.label)
}

#[component]
pub fn SearchPage() -> impl IntoView {
    let presets: Vec<(&str, String)> = url_query().map(|q| ("q", q)).into_iter().collect();
    let list = use_list_with::<SearchHit>(SCHEMA, &presets);
    list_shell(list, "Search", hit_row)
}

fn hit_row(hit: SearchHit) -> impl IntoView {
    let image = hit.image().map(str::to_owned);
    let kind = kind_label(&hit.kind).to_owned();

    view! {
        <a class="bazaar-search-hit" href=hit.url>
            {image.map(|src| view! { <img class="bazaar-thumb" src=src alt="" loading="lazy" /> })}
            <span class="bazaar-badge">{kind}</span>
            <span class="bazaar-search-title">{hit.title}</span>
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels() {
        assert_eq!(kind_label("job"), "Jobs");
        assert_eq!(kind_label("event"), "event");
    }
}
