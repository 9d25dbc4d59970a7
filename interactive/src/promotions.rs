use bazaar_facets::{Choice, Facet, FacetSchema};
use bazaar_shared::{ModerationStatus, Promotion, Resource};
use leptos::prelude::*;

use crate::auth::AuthState;
use crate::format::format_date;
use crate::list::{list_shell, use_list, ListHandle};
use crate::moderation::{moderation_actions, notice_view, Notice};

pub const STATUSES: &[Choice] = &[
    Choice::new("pending", "Pending review"),
    Choice::new("approved", "Approved"),
    Choice::new("rejected", "Rejected"),
];

const PLANS: &[Choice] = &[
    Choice::new("featured", "Featured"),
    Choice::new("top", "Top of list"),
    Choice::new("highlight", "Highlight"),
];

const FACETS: &[Facet] = &[
    Facet::choice("status", "Status", STATUSES),
    Facet::choice("plan", "Plan", PLANS),
];

pub const SCHEMA: FacetSchema = FacetSchema::new(FACETS);

/// Promoted placements. Admins get moderation controls on every row.
#[component]
pub fn Promotions() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let list = use_list::<Promotion>(SCHEMA);
    let notice = RwSignal::new(None::<Notice>);

    view! {
        {notice_view(notice)}
        {list_shell(list, "Promotions", move |p| promotion_row(list, p, auth, notice))}
    }
}

fn promotion_row(
    list: ListHandle<Promotion>,
    promotion: Promotion,
    auth: AuthState,
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let status = promotion.moderation().unwrap_or(ModerationStatus::Unknown);
    let period = match (&promotion.starts_at, &promotion.ends_at) {
        (Some(from), Some(to)) => format!("{} to {}", format_date(from), format_date(to)),
        (Some(from), None) => format!("from {}", format_date(from)),
        _ => "Not scheduled".to_string(),
    };
    let owner = promotion.owner().map(|o| o.name.clone()).unwrap_or_default();
    let actions = auth.is_admin().then(|| moderation_actions(list, &promotion, notice));

    view! {
        <article class="bazaar-row">
            <h3>{promotion.listing_title}</h3>
            <span class="bazaar-badge">{promotion.plan}</span>
            <span class=format!("bazaar-status bazaar-status-{}", status.as_str())>{status.label()}</span>
            <span class="bazaar-meta">{period}</span>
            <span class="bazaar-meta">{owner}</span>
            {actions}
        </article>
    }
}
