use bazaar_facets::{Choice, Facet, FacetSchema};
use bazaar_shared::{EducationProgram, Resource};
use leptos::prelude::*;

use crate::format::format_price;
use crate::list::{list_shell, use_list};

const DEGREES: &[Choice] = &[
    Choice::new("foundation", "Foundation"),
    Choice::new("bachelor", "Bachelor"),
    Choice::new("master", "Master"),
    Choice::new("phd", "PhD"),
];

const LANGUAGES: &[Choice] = &[
    Choice::new("english", "English"),
    Choice::new("turkish", "Turkish"),
];

const SORTS: &[Choice] = &[
    Choice::new("newest", "Newest first"),
    Choice::new("name", "Name"),
    Choice::new("tuition_asc", "Tuition: low to high"),
];

const FACETS: &[Facet] = &[
    Facet::search("search", "Search programs"),
    Facet::choice("degreeLevel", "Degree", DEGREES),
    Facet::choice("language", "Language", LANGUAGES),
    Facet::choice("sort", "Sort by", SORTS).unset_as("newest"),
];

pub const SCHEMA: FacetSchema = FacetSchema::new(FACETS);

#[component]
pub fn Education() -> impl IntoView {
    let list = use_list::<EducationProgram>(SCHEMA);
    list_shell(list, "Study programs", program_card)
}

fn program_card(program: EducationProgram) -> impl IntoView {
    let image = program.image().map(str::to_owned);
    let tuition = program
        .tuition
        .map_or_else(|| "Tuition on request".to_string(), |t| format!("{} / year", format_price(t, "EUR")));

    view! {
        <article class="bazaar-card">
            {image.map(|src| view! { <img class="bazaar-card-image" src=src alt="" loading="lazy" /> })}
            <div class="bazaar-card-body">
                <h3>{program.name}</h3>
                <p class="bazaar-meta">{program.institution}</p>
                <p class="bazaar-meta">{program.degree_level}" · "{program.language}</p>
                <p class="bazaar-price">{tuition}</p>
            </div>
        </article>
    }
}
