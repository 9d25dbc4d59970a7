//! Approve / reject / delete controls shared by the moderation tables.

use bazaar_facets::FetchError;
use bazaar_shared::{ModerationDecision, ModerationStatus, MutationOutcome, Resource};
use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::window;

use crate::list::ListHandle;

/// Ask before anything destructive. No window means no confirmation.
pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Outcome line shown next to a list after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Done(String),
    Failed(String),
}

impl Notice {
    pub fn from_result(result: Result<MutationOutcome, FetchError>, done: &str) -> Self {
        match result {
            Ok(outcome) => Self::Done(outcome.message.unwrap_or_else(|| done.to_string())),
            Err(err) => Self::Failed(err.user_message()),
        }
    }
}

pub fn notice_view(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    move || {
        notice.get().map(|n| match n {
            Notice::Done(text) => view! { <p class="bazaar-notice">{text}</p> }.into_any(),
            Notice::Failed(text) => view! { <p class="bazaar-notice bazaar-notice-error" role="alert">{text}</p> }.into_any(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Approve,
    Reject,
    Delete,
}

impl Action {
    fn confirmation(self) -> Option<&'static str> {
        match self {
            Self::Approve => None,
            Self::Reject => Some("Reject this item? The owner will be notified."),
            Self::Delete => Some("Delete this item permanently?"),
        }
    }

    fn done(self) -> &'static str {
        match self {
            Self::Approve => "Approved",
            Self::Reject => "Rejected",
            Self::Delete => "Deleted",
        }
    }
}

/// Buttons for one row. After a successful change the list is fetched
/// again with the same parameters.
pub fn moderation_actions<R: Resource>(
    list: ListHandle<R>,
    item: &R,
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let id = item.id().to_string();
    let status = item.moderation();
    let busy = RwSignal::new(false);

    let run = move |action: Action, id: String| {
        if busy.get_untracked() {
            return;
        }
        if let Some(question) = action.confirmation() {
            if !confirm(question) {
                return;
            }
        }
        busy.set(true);
        let client = list.client();
        spawn_local(async move {
            let path = format!("{}/{}", R::PATH, id);
            let result = match action {
                Action::Approve => client.patch(&format!("{path}/status"), &decision(ModerationStatus::Approved)).await,
                Action::Reject => client.patch(&format!("{path}/status"), &decision(ModerationStatus::Rejected)).await,
                Action::Delete => client.delete(&path).await,
            };
            match &result {
                Ok(_) => info!(%id, ?action, "moderation applied"),
                Err(err) => warn!(%id, ?action, error = %err, "moderation failed"),
            }
            let succeeded = result.is_ok();
            notice.try_set(Some(Notice::from_result(result, action.done())));
            busy.try_set(false);
            if succeeded {
                list.retry();
            }
        });
    };

    let (approve_id, reject_id, delete_id) = (id.clone(), id.clone(), id);
    view! {
        <div class="bazaar-actions">
            <button
                class="bazaar-btn bazaar-btn-sm"
                disabled=move || busy.get() || status == Some(ModerationStatus::Approved)
                on:click=move |_| run(Action::Approve, approve_id.clone())
            >
                "Approve"
            </button>
            <button
                class="bazaar-btn bazaar-btn-sm"
                disabled=move || busy.get() || status == Some(ModerationStatus::Rejected)
                on:click=move |_| run(Action::Reject, reject_id.clone())
            >
                "Reject"
            </button>
            <button
                class="bazaar-btn bazaar-btn-sm bazaar-btn-danger"
                disabled=move || busy.get()
                on:click=move |_| run(Action::Delete, delete_id.clone())
            >
                "Delete"
            </button>
        </div>
    }
}

fn decision(status: ModerationStatus) -> ModerationDecision {
    ModerationDecision { status, reason: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_prefers_server_message() {
        let ok = Ok(MutationOutcome { message: Some("Listing approved".into()) });
        assert_eq!(Notice::from_result(ok, "Approved"), Notice::Done("Listing approved".into()));

        let ok = Ok(MutationOutcome::default());
        assert_eq!(Notice::from_result(ok, "Deleted"), Notice::Done("Deleted".into()));
    }

    #[test]
    fn failures_use_user_facing_text() {
        let err = Err(FetchError::Application("Listing already removed".into()));
        assert_eq!(Notice::from_result(err, "Deleted"), Notice::Failed("Listing already removed".into()));
    }

    #[test]
    fn only_destructive_actions_confirm() {
        assert!(Action::Approve.confirmation().is_none());
        assert!(Action::Reject.confirmation().is_some());
        assert!(Action::Delete.confirmation().is_some());
    }
}
