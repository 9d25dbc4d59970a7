use bazaar_facets::{Choice, Facet, FacetSchema};
use bazaar_shared::{Listing, Resource};
use leptos::prelude::*;

use crate::format::{format_date, format_price};
use crate::list::{list_shell, use_list};

pub const CITIES: &[Choice] = &[
    Choice::new("Nicosia", "Nicosia"),
    Choice::new("Kyrenia", "Kyrenia"),
    Choice::new("Famagusta", "Famagusta"),
    Choice::new("Lefke", "Lefke"),
    Choice::new("Guzelyurt", "Guzelyurt"),
];

pub const PRICE_SORTS: &[Choice] = &[
    Choice::new("newest", "Newest first"),
    Choice::new("price_asc", "Price: low to high"),
    Choice::new("price_desc", "Price: high to low"),
];

const CATEGORIES: &[Choice] = &[
    Choice::new("apartment", "Apartment"),
    Choice::new("villa", "Villa"),
    Choice::new("house", "House"),
    Choice::new("land", "Land"),
    Choice::new("commercial", "Commercial"),
];

const FACETS: &[Facet] = &[
    Facet::search("search", "Search listings"),
    Facet::choice("category", "Category", CATEGORIES),
    Facet::choice("city", "City", CITIES),
    Facet::number("minPrice", "Min price").at_least(0),
    Facet::number("maxPrice", "Max price").at_least(0),
    Facet::choice("sort", "Sort by", PRICE_SORTS).unset_as("newest"),
];

pub const SCHEMA: FacetSchema = FacetSchema::new(FACETS);

#[component]
pub fn Listings() -> impl IntoView {
    let list = use_list::<Listing>(SCHEMA);
    list_shell(list, "Properties", listing_card)
}

fn listing_card(listing: Listing) -> impl IntoView {
    let image = listing.image().map(str::to_owned);
    let price = format_price(listing.price, &listing.currency);
    let posted = format_date(&listing.created_at).to_owned();

    view! {
        <article class="bazaar-card">
            {image.map(|src| view! { <img class="bazaar-card-image" src=src alt="" loading="lazy" /> })}
            <div class="bazaar-card-body">
                <h3>{listing.title}</h3>
                <p class="bazaar-price">{price}</p>
                <p class="bazaar-meta">
                    <span>{listing.city}</span>
                    " · "
                    <span>{listing.category}</span>
                </p>
                <time>{posted}</time>
            </div>
        </article>
    }
}
