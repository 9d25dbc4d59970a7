use bazaar_facets::{Choice, Facet, FacetSchema};
use bazaar_shared::{Dormitory, Resource};
use leptos::prelude::*;

use crate::format::format_price_range;
use crate::list::{list_shell, use_list};
use crate::listings::{CITIES, PRICE_SORTS};

const GENDERS: &[Choice] = &[
    Choice::new("female", "Female only"),
    Choice::new("male", "Male only"),
    Choice::new("mixed", "Mixed"),
];

const AVAILABILITY: &[Choice] = &[
    Choice::new("available", "Rooms available"),
    Choice::new("limited", "Few rooms left"),
    Choice::new("full", "Full"),
];

const FACETS: &[Facet] = &[
    Facet::search("search", "Search dormitories"),
    Facet::choice("city", "City", CITIES),
    Facet::choice("gender", "Gender", GENDERS),
    Facet::choice("availability", "Availability", AVAILABILITY),
    Facet::number("minPrice", "Min monthly price").at_least(0),
    Facet::number("maxPrice", "Max monthly price").at_least(0),
    Facet::choice("sort", "Sort by", PRICE_SORTS).unset_as("newest"),
];

pub const SCHEMA: FacetSchema = FacetSchema::new(FACETS);

#[component]
pub fn Dormitories() -> impl IntoView {
    let list = use_list::<Dormitory>(SCHEMA);
    list_shell(list, "Dormitories", dormitory_card)
}

fn label_of(options: &[Choice], value: &str) -> String {
    options
        .iter()
        .find(|c| c.value == value)
        .map_or_else(|| value.to_string(), |c| c.label.to_string())
}

fn dormitory_card(dorm: Dormitory) -> impl IntoView {
    let image = dorm.image().map(str::to_owned);
    let price = format!("{} / month", format_price_range(dorm.price_min, dorm.price_max, "EUR"));
    let gender = label_of(GENDERS, &dorm.gender_policy);
    let availability = label_of(AVAILABILITY, &dorm.availability);
    let full = dorm.availability == "full";

    view! {
        <article class="bazaar-card">
            {image.map(|src| view! { <img class="bazaar-card-image" src=src alt="" loading="lazy" /> })}
            <div class="bazaar-card-body">
                <h3>{dorm.name}</h3>
                <p class="bazaar-meta">{dorm.city}" · "{gender}</p>
                <p class="bazaar-price">{price}</p>
                <span class="bazaar-badge" class:bazaar-badge-muted=full>{availability}</span>
            </div>
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_facets::{build_query, FilterState, PaginationState};

    #[test]
    fn default_dormitory_query_is_bare() {
        let filters = FilterState::new(&SCHEMA);
        let q = build_query(&SCHEMA, &filters, &PaginationState::new(12));
        assert_eq!(q.to_query_string(), "limit=12&page=1");
    }

    #[test]
    fn female_dorms_in_kyrenia() {
        let mut filters = FilterState::new(&SCHEMA);
        filters.set(SCHEMA.require("city").unwrap(), "Kyrenia".into());
        filters.set(SCHEMA.require("gender").unwrap(), "female".into());
        filters.set(SCHEMA.require("maxPrice").unwrap(), "400".into());

        let q = build_query(&SCHEMA, &filters, &PaginationState::new(12));
        assert_eq!(q.to_query_string(), "city=Kyrenia&gender=female&limit=12&maxPrice=400&page=1");
    }

    #[test]
    fn unknown_values_keep_their_raw_label() {
        assert_eq!(label_of(GENDERS, "female"), "Female only");
        assert_eq!(label_of(GENDERS, "couples"), "couples");
    }
}
