use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::{server::AppState, session::TokenStore, utils, warning};

/// Initiates the Spotify sign-in flow.
///
/// Issues a fresh OAuth `state`, remembers it in the session, and sends
/// the user to Spotify's consent page.
pub async fn sign_in(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let oauth_state = utils::generate_oauth_state();
    let store = TokenStore::new(jar).remember_oauth_state(&oauth_state);
    let url = state.auth.authorize_url(&oauth_state);
    (store.into_jar(), Redirect::to(&url))
}

/// Signs the user out by clearing all session state.
pub async fn sign_out(jar: SignedCookieJar) -> impl IntoResponse {
    (TokenStore::new(jar).clear().into_jar(), Redirect::to("/"))
}

/// Handles the OAuth callback from Spotify.
///
/// A callback without a `code` parameter means the user cancelled the
/// consent screen: the session is cleared and the user lands back on the
/// home page, never in a partially authenticated state. Otherwise the
/// echoed `state` is verified and the code is exchanged for a token pair,
/// after which the user returns to the page they originally asked for.
pub async fn callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let store = TokenStore::new(jar);

    let Some(code) = params.get("code") else {
        return (store.clear().into_jar(), Redirect::to("/")).into_response();
    };

    let (store, expected_state) = store.take_oauth_state();
    if expected_state.as_deref() != params.get("state").map(String::as_str) {
        warning!("OAuth state mismatch on callback, discarding authorization code");
        return (store.clear().into_jar(), Redirect::to("/")).into_response();
    }

    match state.auth.exchange_code(code).await {
        Ok(token) => {
            let store = match store.set_token(&token) {
                Ok(store) => store,
                Err(e) => return e.into_response(),
            };
            let (store, next_url) = store.take_next_url();
            (
                store.into_jar(),
                Redirect::to(next_url.as_deref().unwrap_or("/")),
            )
                .into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            e.into_response()
        }
    }
}
