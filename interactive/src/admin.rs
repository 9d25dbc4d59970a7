//! Admin SPA, mounted on /admin/*.

use bazaar_facets::{join_independent, Choice, Facet, FacetSchema, FetchError};
use bazaar_shared::{
    AccountUser, AdminListing, Job, ModerationStats, ModerationStatus, PaymentStats, Resource, UpdateUserStatus,
};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::auth::{AuthState, LoginButton};
use crate::format::{format_compact, format_date, format_price};
use crate::list::{list_shell, use_list, ListHandle};
use crate::moderation::{confirm, moderation_actions, notice_view, Notice};
use crate::payments::AdminPayments;
use crate::promotions::STATUSES;

const PAYMENT_STATS_PATH: &str = "/api/admin/payments/stats";
const MODERATION_STATS_PATH: &str = "/api/admin/moderation/stats";

#[component]
pub fn AdminApp() -> impl IntoView {
    let auth = expect_context::<AuthState>();

    view! {
        <Router>
            <div class="bazaar-admin">
                <nav class="bazaar-admin-nav">
                    <A href="/admin/">"Overview"</A>
                    <A href="/admin/listings">"Listings"</A>
                    <A href="/admin/jobs">"Jobs"</A>
                    <A href="/admin/users">"Users"</A>
                    <A href="/admin/payments">"Payments"</A>
                    <LoginButton />
                </nav>
                <Show
                    when=move || auth.is_admin()
                    fallback=|| view! { <p class="bazaar-empty">"Administrator access required."</p> }
                >
                    <Routes fallback=|| view! { <p>"Page not found."</p> }>
                        <Route path=path!("/admin/") view=AdminOverview />
                        <Route path=path!("/admin/listings") view=AdminListings />
                        <Route path=path!("/admin/jobs") view=AdminJobs />
                        <Route path=path!("/admin/users") view=AdminUsers />
                        <Route path=path!("/admin/payments") view=AdminPayments />
                    </Routes>
                </Show>
            </div>
        </Router>
    }
}

// ── Overview ──

#[component]
fn AdminOverview() -> impl IntoView {
    let client = expect_context::<ApiClient>();
    let payments: RwSignal<Option<Result<PaymentStats, FetchError>>> = RwSignal::new(None);
    let moderation: RwSignal<Option<Result<ModerationStats, FetchError>>> = RwSignal::new(None);

    spawn_local(async move {
        // Either tile can fail without blanking the other.
        let (p, m) = join_independent(
            client.get::<PaymentStats>(PAYMENT_STATS_PATH),
            client.get::<ModerationStats>(MODERATION_STATS_PATH),
        )
        .await;
        payments.try_set(Some(p));
        moderation.try_set(Some(m));
    });

    view! {
        <section class="bazaar-overview">
            <h2>"Overview"</h2>
            <div class="bazaar-tiles">
                {move || match moderation.get() {
                    None => view! { <p class="bazaar-loading">"Loading..."</p> }.into_any(),
                    Some(Err(err)) => view! { <p class="bazaar-error">{err.user_message()}</p> }.into_any(),
                    Some(Ok(m)) => view! {
                        {tile("Listings awaiting review", format_compact(m.pending_listings))}
                        {tile("Jobs awaiting review", format_compact(m.pending_jobs))}
                        {tile("Promotions awaiting review", format_compact(m.pending_promotions))}
                    }
                    .into_any(),
                }}
                {move || match payments.get() {
                    None => view! { <p class="bazaar-loading">"Loading..."</p> }.into_any(),
                    Some(Err(err)) => view! { <p class="bazaar-error">{err.user_message()}</p> }.into_any(),
                    Some(Ok(p)) => payment_tiles(p).into_any(),
                }}
            </div>
        </section>
    }
}

pub fn tile(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="bazaar-tile">
            <span class="bazaar-tile-value">{value}</span>
            <span class="bazaar-tile-label">{label}</span>
        </div>
    }
}

pub fn payment_tiles(stats: PaymentStats) -> impl IntoView {
    view! {
        {tile("Proofs to review", format_compact(stats.proof_submitted))}
        {tile("Awaiting payment", format_compact(stats.awaiting_payment))}
        {tile("Verified", format_compact(stats.verified))}
        {tile("Verified volume", format_price(stats.verified_amount, "USDT"))}
    }
}

// ── Listings ──

const LISTING_FACETS: &[Facet] = &[
    Facet::search("search", "Search listings"),
    Facet::choice("status", "Status", STATUSES),
];

pub const LISTING_SCHEMA: FacetSchema = FacetSchema::new(LISTING_FACETS);

#[component]
fn AdminListings() -> impl IntoView {
    let list = use_list::<AdminListing>(LISTING_SCHEMA);
    let notice = RwSignal::new(None::<Notice>);

    view! {
        {notice_view(notice)}
        {list_shell(list, "Listings", move |l| moderated_row(list, l, notice))}
    }
}

/// Table row for anything with a moderation status.
fn moderated_row<R: Resource>(list: ListHandle<R>, item: R, notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let status = item.moderation().unwrap_or(ModerationStatus::Unknown);
    let owner = item.owner().map(|o| o.name.clone()).unwrap_or_default();
    let posted = format_date(item.created_at()).to_owned();
    let title = item.title().to_owned();
    let actions = moderation_actions(list, &item, notice);

    view! {
        <article class="bazaar-row">
            <h3>{title}</h3>
            <span class=format!("bazaar-status bazaar-status-{}", status.as_str())>{status.label()}</span>
            <span class="bazaar-meta">{owner}</span>
            <time>{posted}</time>
            {actions}
        </article>
    }
}

// ── Jobs ──

const EMPLOYMENT_TYPES: &[Choice] = &[
    Choice::new("full_time", "Full time"),
    Choice::new("part_time", "Part time"),
    Choice::new("internship", "Internship"),
    Choice::new("contract", "Contract"),
];

const JOB_FACETS: &[Facet] = &[
    Facet::search("search", "Search jobs"),
    Facet::choice("status", "Status", STATUSES),
    Facet::choice("employmentType", "Type", EMPLOYMENT_TYPES),
];

pub const JOB_SCHEMA: FacetSchema = FacetSchema::new(JOB_FACETS);

#[component]
fn AdminJobs() -> impl IntoView {
    let list = use_list::<Job>(JOB_SCHEMA);
    let notice = RwSignal::new(None::<Notice>);

    view! {
        {notice_view(notice)}
        {list_shell(list, "Jobs", move |j| moderated_row(list, j, notice))}
    }
}

// ── Users ──

const ROLES: &[Choice] = &[
    Choice::new("student", "Student"),
    Choice::new("landlord", "Landlord"),
    Choice::new("employer", "Employer"),
    Choice::new("admin", "Admin"),
];

const ACTIVITY: &[Choice] = &[Choice::new("true", "Active"), Choice::new("false", "Deactivated")];

const USER_FACETS: &[Facet] = &[
    Facet::search("search", "Search by name or email"),
    Facet::choice("role", "Role", ROLES),
    Facet::choice("isActive", "Account", ACTIVITY),
];

pub const USER_SCHEMA: FacetSchema = FacetSchema::new(USER_FACETS);

#[component]
fn AdminUsers() -> impl IntoView {
    let list = use_list::<AccountUser>(USER_SCHEMA);
    let notice = RwSignal::new(None::<Notice>);

    view! {
        {notice_view(notice)}
        {list_shell(list, "Users", move |u| user_row(list, u, notice))}
    }
}

fn user_row(list: ListHandle<AccountUser>, user: AccountUser, notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let busy = RwSignal::new(false);
    let active = user.is_active;
    let id = user.id.clone();

    let toggle = move |_| {
        if busy.get_untracked() {
            return;
        }
        if active && !confirm("Deactivate this account? The user will be signed out.") {
            return;
        }
        busy.set(true);
        let client = list.client();
        let id = id.clone();
        spawn_local(async move {
            let path = format!("{}/{}/status", AccountUser::PATH, id);
            let result = client.patch(&path, &UpdateUserStatus { is_active: !active }).await;
            match &result {
                Ok(_) => info!(%id, active = !active, "account status changed"),
                Err(err) => warn!(%id, error = %err, "account status change failed"),
            }
            let succeeded = result.is_ok();
            notice.try_set(Some(Notice::from_result(
                result,
                if active { "Account deactivated" } else { "Account activated" },
            )));
            busy.try_set(false);
            if succeeded {
                list.retry();
            }
        });
    };

    view! {
        <article class="bazaar-row">
            <h3>{user.name}</h3>
            <span class="bazaar-meta">{user.email}</span>
            <span class="bazaar-badge">{user.role}</span>
            <span class="bazaar-status" class:bazaar-status-rejected={!active}>
                {if active { "Active" } else { "Deactivated" }}
            </span>
            <button class="bazaar-btn bazaar-btn-sm" disabled=move || busy.get() on:click=toggle>
                {if active { "Deactivate" } else { "Activate" }}
            </button>
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_facets::{build_query, FilterState, PaginationState};

    #[test]
    fn inactive_users_filter() {
        let mut filters = FilterState::new(&USER_SCHEMA);
        filters.set(USER_SCHEMA.require("isActive").unwrap(), "false".into());
        filters.set(USER_SCHEMA.require("role").unwrap(), "landlord".into());

        let q = build_query(&USER_SCHEMA, &filters, &PaginationState::new(20));
        assert_eq!(q.get("isActive"), Some("false"));
        assert_eq!(q.get("role"), Some("landlord"));
        assert_eq!(q.get("limit"), Some("20"));
    }

    #[test]
    fn unknown_job_status_is_not_sent() {
        let mut filters = FilterState::new(&JOB_SCHEMA);
        filters.set(JOB_SCHEMA.require("status").unwrap(), "archived".into());

        let q = build_query(&JOB_SCHEMA, &filters, &PaginationState::new(12));
        assert!(!q.contains("status"));
    }
}
