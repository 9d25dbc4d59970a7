use bazaar_facets::FetchError;
use bazaar_shared::SessionUser;
use leptos::prelude::*;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Storage};

use crate::api::{self, ApiClient};
use crate::config::AppConfig;

const TOKEN_KEY: &str = "bazaar_token";
const ADMIN_ROLE: &str = "admin";

fn storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

fn stored_token() -> Option<String> {
    storage()?.get_item(TOKEN_KEY).ok()?
}

fn store_token(token: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

fn clear_token() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

/// Reactive auth state shared via context.
#[derive(Clone, Copy, Debug)]
pub struct AuthState {
    pub user: RwSignal<Option<SessionUser>>,
    pub token: RwSignal<Option<String>>,
}

impl AuthState {
    /// Tracked; use inside views to gate admin controls.
    pub fn is_admin(&self) -> bool {
        self.user.with(|u| u.as_ref().is_some_and(|u| u.role == ADMIN_ROLE))
    }

    /// Drop the token everywhere. Tolerates an already disposed owner.
    pub fn sign_out(&self) {
        clear_token();
        self.token.try_set(None);
        self.user.try_set(None);
    }
}

/// Pick up a `?token=...` left by the login page, store it and strip it
/// from the visible URL.
fn consume_url_token() -> Option<String> {
    let win = window()?;
    let href = win.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    let params = url.search_params();
    let token = params.get("token")?;

    store_token(&token);
    params.delete("token");
    let query = params.to_string().as_string().unwrap_or_default();
    let clean = if query.is_empty() {
        url.pathname()
    } else {
        format!("{}?{}", url.pathname(), query)
    };
    if let Ok(history) = win.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&clean));
    }

    Some(token)
}

/// Provides [`AppConfig`], [`AuthState`] and [`ApiClient`] to everything below it.
#[component]
pub fn AuthProvider(config: AppConfig, children: Children) -> impl IntoView {
    let token = RwSignal::new(consume_url_token().or_else(stored_token));
    let user: RwSignal<Option<SessionUser>> = RwSignal::new(None);
    let auth = AuthState { user, token };
    let client = ApiClient::new(config.clone(), auth);

    provide_context(config);
    provide_context(auth);
    provide_context(client);

    Effect::new(move |_| {
        if token.get().is_none() {
            user.set(None);
            return;
        }
        spawn_local(async move {
            match client.session().await {
                Ok(me) => {
                    debug!(user = %me.id, role = %me.role, "session restored");
                    user.try_set(Some(me));
                }
                // The client already signed out.
                Err(FetchError::Unauthorized) => {}
                Err(err) => warn!(error = %err, "session check failed"),
            }
        });
    });

    children()
}

/// Login link or the signed-in user's name with a logout button.
#[component]
pub fn LoginButton() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let config = expect_context::<AppConfig>();

    move || match auth.user.get() {
        Some(user) => view! {
            <div class="bazaar-auth">
                <span class="bazaar-username">{user.name}</span>
                <button class="bazaar-btn bazaar-btn-sm" on:click=move |_| auth.sign_out()>"Logout"</button>
            </div>
        }
        .into_any(),
        None => view! {
            <a class="bazaar-btn" href=api::login_url(&config.login_path)>"Log in"</a>
        }
        .into_any(),
    }
}
