mod admin;
mod api;
mod auth;
mod config;
mod dormitories;
mod education;
mod format;
mod list;
mod listings;
mod logging;
mod moderation;
mod payments;
mod promotions;
mod search;

use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::config::AppConfig;

/// Mount a widget into the element with `id`, if the host page has one.
///
/// `prepare` reads whatever it needs from the element and returns the
/// builder, which runs inside the auth provider so the page finds its
/// context.
fn mount<P, F, V>(document: &Document, id: &str, config: &AppConfig, prepare: P)
where
    P: FnOnce(&Element) -> F,
    F: FnOnce() -> V + Send + 'static,
    V: IntoView + 'static,
{
    let Some(el) = document.get_element_by_id(id) else {
        return;
    };
    let build = prepare(&el);
    let config = config.clone();
    let html_el: HtmlElement = el.unchecked_into();
    leptos::mount::mount_to(html_el, move || {
        view! { <auth::AuthProvider config=config>{build()}</auth::AuthProvider> }
    })
    .forget();
    info!(widget = id, "mounted");
}

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_errors) = AppConfig::from_document();
    if let Err(err) = logging::init(&config.log_level) {
        web_sys::console::error_1(&format!("logging disabled: {err}").into());
    }
    for err in config_errors {
        warn!(error = %err, "falling back to default");
    }

    let document = web_sys::window()
        .expect("no window")
        .document()
        .expect("no document");

    mount(&document, "bazaar-dormitories", &config, |_| || view! { <dormitories::Dormitories /> });
    mount(&document, "bazaar-listings", &config, |_| || view! { <listings::Listings /> });
    mount(&document, "bazaar-education", &config, |_| || view! { <education::Education /> });
    mount(&document, "bazaar-search", &config, |_| || view! { <search::SearchPage /> });
    mount(&document, "bazaar-promotions", &config, |_| || view! { <promotions::Promotions /> });
    mount(&document, "bazaar-admin", &config, |_| || view! { <admin::AdminApp /> });
    mount(&document, "bazaar-payment-proof", &config, |el| {
        let payment_id = el.get_attribute("data-payment-id").unwrap_or_default();
        move || view! { <payments::PaymentProofForm payment_id=payment_id /> }
    });
}
