//! Crypto payment review (admin) and proof submission (payer).
//!
//! A submitted hash is only checked for shape. Reviewers are told so on
//! every row; confirming the transfer on chain is their job.

use bazaar_facets::{Choice, Facet, FacetSchema, FetchError};
use bazaar_shared::{
    Payment, PaymentError, PaymentStats, PaymentStatus, Resource, ReviewPayment, SubmitProof, Transition, TxHash,
};
use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::admin::payment_tiles;
use crate::api::ApiClient;
use crate::format::{format_date, format_price, shorten_hash};
use crate::list::{list_shell, use_list, ListHandle};
use crate::moderation::{confirm, notice_view, Notice};

const STATS_PATH: &str = "/api/admin/payments/stats";

const STATUSES: &[Choice] = &[
    Choice::new("awaiting_payment", "Awaiting payment"),
    Choice::new("proof_submitted", "Proof submitted"),
    Choice::new("verified", "Verified"),
    Choice::new("rejected", "Rejected"),
];

const NETWORKS: &[Choice] = &[
    Choice::new("TRC20", "TRON (TRC20)"),
    Choice::new("ERC20", "Ethereum (ERC20)"),
    Choice::new("BEP20", "BNB Chain (BEP20)"),
];

const FACETS: &[Facet] = &[
    Facet::search("search", "Reference or payer"),
    Facet::choice("status", "Status", STATUSES),
    Facet::choice("network", "Network", NETWORKS),
];

pub const SCHEMA: FacetSchema = FacetSchema::new(FACETS);

/// Body for moving a payment to `next`, or `None` when it is already there.
pub fn review_request(current: PaymentStatus, next: PaymentStatus) -> Result<Option<ReviewPayment>, PaymentError> {
    Ok(match current.transition(next)? {
        Transition::Unchanged => None,
        Transition::Changed => Some(ReviewPayment { status: next, note: None }),
    })
}

/// Validate the payer's input before anything is sent.
pub fn proof_submission(tx_hash: &str, note: &str) -> Result<SubmitProof, PaymentError> {
    let hash = TxHash::parse(tx_hash)?;
    let note = note.trim();
    Ok(SubmitProof {
        tx_hash: hash.to_string(),
        note: (!note.is_empty()).then(|| note.to_string()),
    })
}

// ── Admin review ──

#[component]
pub fn AdminPayments() -> impl IntoView {
    let client = expect_context::<ApiClient>();
    let list = use_list::<Payment>(SCHEMA);
    let notice = RwSignal::new(None::<Notice>);
    let stats: RwSignal<Option<Result<PaymentStats, FetchError>>> = RwSignal::new(None);

    // Runs alongside the list's own initial fetch.
    spawn_local(async move {
        let result = client.get::<PaymentStats>(STATS_PATH).await;
        if let Err(err) = &result {
            warn!(error = %err, "payment stats unavailable");
        }
        stats.try_set(Some(result));
    });

    view! {
        <div class="bazaar-tiles">
            {move || match stats.get() {
                None => ().into_any(),
                Some(Err(err)) => view! { <p class="bazaar-error">{err.user_message()}</p> }.into_any(),
                Some(Ok(s)) => payment_tiles(s).into_any(),
            }}
        </div>
        {notice_view(notice)}
        {list_shell(list, "Payments", move |p| payment_row(list, p, notice))}
    }
}

fn payment_row(list: ListHandle<Payment>, payment: Payment, notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let busy = RwSignal::new(false);
    let status = payment.status;
    let id = payment.id.clone();
    let amount = format_price(payment.amount, &payment.currency);
    let payer = payment.payer.as_ref().map(|p| p.name.clone()).unwrap_or_default();
    let hash = payment.tx_hash.as_deref().map(|raw| match TxHash::parse(raw) {
        Ok(hash) => (shorten_hash(hash.as_str()), true),
        Err(_) => (shorten_hash(raw), false),
    });

    let review = move |next: PaymentStatus| {
        if busy.get_untracked() {
            return;
        }
        let body = match review_request(status, next) {
            Ok(Some(body)) => body,
            Ok(None) => return,
            Err(err) => {
                notice.set(Some(Notice::Failed(err.to_string())));
                return;
            }
        };
        let question = match next {
            PaymentStatus::Verified => "Mark this payment as verified? Check the transaction on chain first.",
            _ => "Reject this payment proof?",
        };
        if !confirm(question) {
            return;
        }

        busy.set(true);
        let client = list.client();
        let id = id.clone();
        spawn_local(async move {
            let result = client.patch(&format!("{}/{}/review", Payment::PATH, id), &body).await;
            match &result {
                Ok(_) => info!(%id, status = next.as_str(), "payment reviewed"),
                Err(err) => warn!(%id, error = %err, "payment review failed"),
            }
            let succeeded = result.is_ok();
            notice.try_set(Some(Notice::from_result(result, next.label())));
            busy.try_set(false);
            if succeeded {
                list.retry();
            }
        });
    };
    let actions = status.is_reviewable().then(|| {
        let reject = review.clone();
        view! {
            <div class="bazaar-actions">
                <button
                    class="bazaar-btn bazaar-btn-sm"
                    disabled=move || busy.get()
                    on:click=move |_| review(PaymentStatus::Verified)
                >
                    "Verify"
                </button>
                <button
                    class="bazaar-btn bazaar-btn-sm bazaar-btn-danger"
                    disabled=move || busy.get()
                    on:click=move |_| reject(PaymentStatus::Rejected)
                >
                    "Reject"
                </button>
            </div>
        }
    });

    view! {
        <article class="bazaar-row">
            <h3>{payment.reference}</h3>
            <span class="bazaar-meta">{payer}</span>
            <span class="bazaar-price">{amount}</span>
            <span class="bazaar-badge">{payment.network}</span>
            <span class=format!("bazaar-status bazaar-status-{}", status.as_str())>{status.label()}</span>
            {hash.map(|(text, valid)| view! {
                <code class="bazaar-hash" class:bazaar-hash-invalid={!valid}>{text}</code>
                <span class="bazaar-meta">
                    {if valid { "Not verified on-chain" } else { "Malformed hash" }}
                </span>
            })}
            {payment.proof_url.map(|url| view! {
                <a href=url target="_blank" rel="noopener">"Proof"</a>
            })}
            <time>{format_date(&payment.created_at).to_owned()}</time>
            {actions}
        </article>
    }
}

// ── Proof submission ──

#[component]
pub fn PaymentProofForm(payment_id: String) -> impl IntoView {
    let client = expect_context::<ApiClient>();
    let payment: RwSignal<Option<Result<Payment, FetchError>>> = RwSignal::new(None);
    let tx_hash = RwSignal::new(String::new());
    let note = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);
    let payment_id = StoredValue::new(payment_id);

    let load = move || {
        let path = format!("/api/payments/{}", payment_id.get_value());
        spawn_local(async move {
            let result = client.get::<Payment>(&path).await;
            payment.try_set(Some(result));
        });
    };
    load();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let body = match proof_submission(&tx_hash.get_untracked(), &note.get_untracked()) {
            Ok(body) => body,
            Err(err) => {
                error.set(Some(err.to_string()));
                return;
            }
        };
        error.set(None);
        submitting.set(true);
        let path = format!("/api/payments/{}/proof", payment_id.get_value());
        spawn_local(async move {
            match client.post(&path, &body).await {
                Ok(_) => {
                    info!("payment proof submitted");
                    tx_hash.try_set(String::new());
                    note.try_set(String::new());
                    load();
                }
                Err(err) => {
                    error.try_set(Some(err.user_message()));
                }
            }
            submitting.try_set(false);
        });
    };

    let form = move |p: &Payment| {
        let open = p.status.can_transition_to(PaymentStatus::ProofSubmitted);
        if !open {
            return view! { <p class="bazaar-notice">{format!("Status: {}", p.status.label())}</p> }.into_any();
        }
        view! {
            <form class="bazaar-proof-form" on:submit=on_submit>
                <label>
                    <span>"Transaction hash"</span>
                    <input
                        class="bazaar-input"
                        type="text"
                        placeholder="0x..."
                        prop:value=move || tx_hash.get()
                        on:input=move |ev| tx_hash.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    <span>"Note (optional)"</span>
                    <textarea
                        class="bazaar-textarea"
                        prop:value=move || note.get()
                        on:input=move |ev| note.set(event_target_value(&ev))
                    />
                </label>
                {move || error.get().map(|e| view! { <p class="bazaar-error" role="alert">{e}</p> })}
                <button class="bazaar-btn" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Submitting..." } else { "Submit proof" }}
                </button>
            </form>
        }
        .into_any()
    };

    view! {
        <section class="bazaar-payment">
            {move || match payment.get() {
                None => view! { <p class="bazaar-loading">"Loading..."</p> }.into_any(),
                Some(Err(err)) => view! { <p class="bazaar-error">{err.user_message()}</p> }.into_any(),
                Some(Ok(p)) => view! {
                    <div class="bazaar-payment-details">
                        <h3>{p.reference.clone()}</h3>
                        <p class="bazaar-price">{format_price(p.amount, &p.currency)}</p>
                        <p>"Send to "<code>{p.wallet_address.clone()}</code>" on "{p.network.clone()}</p>
                    </div>
                    {form(&p)}
                }
                .into_any(),
            }}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "0xAB12cd34ef56ab12cd34ef56ab12cd34ef56ab12cd34ef56ab12cd34ef56ab12";

    #[test]
    fn review_body_only_for_real_changes() {
        let body = review_request(PaymentStatus::ProofSubmitted, PaymentStatus::Verified).unwrap();
        assert_eq!(body.map(|b| b.status), Some(PaymentStatus::Verified));

        assert!(review_request(PaymentStatus::Verified, PaymentStatus::Verified).unwrap().is_none());
    }

    #[test]
    fn cannot_verify_without_proof() {
        assert!(matches!(
            review_request(PaymentStatus::AwaitingPayment, PaymentStatus::Verified),
            Err(PaymentError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn proof_is_normalized_before_sending() {
        let body = proof_submission(&format!("  {HASH} "), "  ").unwrap();
        assert_eq!(body.tx_hash, HASH.to_ascii_lowercase());
        assert!(body.note.is_none());

        let body = proof_submission(HASH, "paid from Binance").unwrap();
        assert_eq!(body.note.as_deref(), Some("paid from Binance"));
    }

    #[test]
    fn malformed_hash_is_refused() {
        assert!(matches!(proof_submission("0x1234", ""), Err(PaymentError::InvalidTxHash)));
        assert!(matches!(proof_submission(&HASH.replace('A', "g"), ""), Err(PaymentError::InvalidTxHash)));
    }
}
