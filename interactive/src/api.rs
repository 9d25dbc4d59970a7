//! Authenticated access to the marketplace API.
//!
//! Every request goes through [`ApiClient`], which attaches the bearer token,
//! applies the configured timeout and folds transport failures, error
//! statuses and `success: false` envelopes into one [`FetchError`].

use bazaar_facets::{FetchError, ListSource, QueryParams};
use bazaar_shared::{decode_item, decode_list, decode_mutation, error_message, MutationOutcome, Page, Resource, SessionUser};
use futures::future::{select, Either};
use futures::pin_mut;
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use web_sys::window;

use crate::auth::AuthState;
use crate::config::AppConfig;

const SESSION_PATH: &str = "/api/auth/me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Post,
    Patch,
    Delete,
}

/// What to do when the backend answers 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    SignOutAndRedirect,
    SignOut,
}

#[derive(Clone, Copy)]
pub struct ApiClient {
    config: StoredValue<AppConfig>,
    auth: AuthState,
}

impl ApiClient {
    pub fn new(config: AppConfig, auth: AuthState) -> Self {
        Self { config: StoredValue::new(config), auth }
    }

    fn url(&self, path: &str) -> String {
        self.config.with_value(|c| format!("{}{}", c.api_base, path))
    }

    /// One page of `R` for the given query.
    pub async fn list<R: Resource>(&self, params: &QueryParams) -> Result<Page<R>, FetchError> {
        let url = format!("{}?{}", self.url(R::PATH), params.to_query_string());
        let body = self.execute(Request::get(&url), None, OnUnauthorized::SignOutAndRedirect).await?;
        Ok(decode_list::<R>(&body)?)
    }

    /// A single `{ success, data }` object.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let body = self
            .execute(Request::get(&self.url(path)), None, OnUnauthorized::SignOutAndRedirect)
            .await?;
        Ok(decode_item(&body)?)
    }

    /// The signed-in user. A stale token is dropped without leaving the page.
    pub async fn session(&self) -> Result<SessionUser, FetchError> {
        let body = self
            .execute(Request::get(&self.url(SESSION_PATH)), None, OnUnauthorized::SignOut)
            .await?;
        Ok(decode_item(&body)?)
    }

    pub async fn send<B: Serialize>(
        &self,
        method: Mutation,
        path: &str,
        body: Option<&B>,
    ) -> Result<MutationOutcome, FetchError> {
        let url = self.url(path);
        let builder = match method {
            Mutation::Post => Request::post(&url),
            Mutation::Patch => Request::patch(&url),
            Mutation::Delete => Request::delete(&url),
        };
        let json = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let body = self.execute(builder, json, OnUnauthorized::SignOutAndRedirect).await?;
        Ok(decode_mutation(&body)?)
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<MutationOutcome, FetchError> {
        self.send(Mutation::Post, path, Some(body)).await
    }

    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> Result<MutationOutcome, FetchError> {
        self.send(Mutation::Patch, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<MutationOutcome, FetchError> {
        self.send::<()>(Mutation::Delete, path, None).await
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        json: Option<String>,
        on_unauthorized: OnUnauthorized,
    ) -> Result<String, FetchError> {
        let builder = match self.auth.token.get_untracked() {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        };
        let request = match json {
            Some(json) => builder.header("Content-Type", "application/json").body(json),
            None => builder.build(),
        }
        .map_err(|e| FetchError::Network(e.to_string()))?;

        let (timeout_ms, login_path) = self.config.with_value(|c| (c.timeout_ms, c.login_path.clone()));
        let url = request.url();
        debug!(%url, "api request");

        let send = request.send();
        let timer = TimeoutFuture::new(u32::try_from(timeout_ms).unwrap_or(u32::MAX));
        pin_mut!(send, timer);
        let response = match select(send, timer).await {
            Either::Left((sent, _)) => sent.map_err(|e| FetchError::Network(e.to_string()))?,
            Either::Right(_) => {
                warn!(%url, timeout_ms, "api request timed out");
                return Err(FetchError::Timeout(timeout_ms));
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(|e| FetchError::Network(e.to_string()))?;

        match classify(status, text) {
            Err(FetchError::Unauthorized) => {
                warn!(%url, "unauthorized, signing out");
                self.auth.sign_out();
                if on_unauthorized == OnUnauthorized::SignOutAndRedirect {
                    redirect_to_login(&login_path);
                }
                Err(FetchError::Unauthorized)
            }
            Err(err) => {
                warn!(%url, status, error = %err, "api error status");
                Err(err)
            }
            ok => ok,
        }
    }
}

/// Map an HTTP status and body to the body to decode or the error to show.
///
/// A failing status with a `message` in its body is the backend talking to
/// the user; anything else is treated as a transport problem worth a retry.
fn classify(status: u16, body: String) -> Result<String, FetchError> {
    match status {
        401 => Err(FetchError::Unauthorized),
        200..=299 => Ok(body),
        _ => Err(match error_message(&body) {
            Some(message) => FetchError::Application(message),
            None => FetchError::Network(format!("HTTP {status}")),
        }),
    }
}

impl<R: Resource> ListSource<R> for ApiClient {
    async fn fetch(&self, params: &QueryParams) -> Result<Page<R>, FetchError> {
        self.list(params).await
    }
}

/// Login page URL carrying the current location as the post-login target.
pub fn login_url(login_path: &str) -> String {
    let here = window().and_then(|w| w.location().href().ok()).unwrap_or_default();
    format!("{}?redirect={}", login_path, encode_uri_component(&here))
}

fn redirect_to_login(login_path: &str) {
    if let Some(win) = window() {
        let _ = win.location().set_href(&login_url(login_path));
    }
}

pub fn encode_uri_component(s: &str) -> String {
    web_sys::js_sys::encode_uri_component(s).as_string().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_pass_the_body_through() {
        assert_eq!(classify(200, r#"{"success":true}"#.into()), Ok(r#"{"success":true}"#.into()));
        assert_eq!(classify(204, String::new()), Ok(String::new()));
    }

    #[test]
    fn unauthorized_wins_over_any_body() {
        assert_eq!(
            classify(401, r#"{"message":"Token expired"}"#.into()),
            Err(FetchError::Unauthorized)
        );
    }

    #[test]
    fn error_status_with_message_is_shown_verbatim() {
        let err = classify(422, r#"{"success":false,"message":"Price must be positive"}"#.into()).unwrap_err();
        assert_eq!(err, FetchError::Application("Price must be positive".into()));
        assert_eq!(err.user_message(), "Price must be positive");
        assert!(!err.is_retryable());
    }

    #[test]
    fn error_status_without_message_is_a_retryable_network_error() {
        let err = classify(502, "<html><body>Bad Gateway</body></html>".into()).unwrap_err();
        assert_eq!(err, FetchError::Network("HTTP 502".into()));
        assert!(err.is_retryable());
    }
}
