//! Cookie-backed session token store.
//!
//! The token pair lives in a signed cookie, so the browser session is the
//! only storage; there is no server-side state to clean up. [`TokenStore`]
//! wraps the request's [`SignedCookieJar`] and owns the whole token
//! lifecycle: expiry detection, refresh through a [`TokenRefresher`], and
//! teardown on sign-out or cancelled consent.
//!
//! The store moves through three states: absent, valid, and expired. An
//! expired token is refreshed in place before it is handed out; a failed
//! refresh clears the session, which the presentation layer answers with a
//! redirect to sign-in. Concurrent requests from the same browser may race
//! on refresh; the last written cookie wins.

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

use crate::{
    Res,
    error::Error,
    types::Token,
};

pub const TOKEN_COOKIE: &str = "spotify_token";
pub const NEXT_URL_COOKIE: &str = "next_url";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Exchanges a refresh token for a fresh token pair.
///
/// Implemented by the Spotify OAuth client; test code substitutes fakes.
#[async_trait]
pub trait TokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Res<Token>;
}

/// The session token store for one request.
///
/// Methods consume and return the store because cookie jars are
/// value-based in axum: every mutation produces a new jar that must be
/// included in the response for the browser to see it.
pub struct TokenStore {
    jar: SignedCookieJar,
}

impl TokenStore {
    pub fn new(jar: SignedCookieJar) -> Self {
        TokenStore { jar }
    }

    /// Returns the stored token without checking expiry.
    ///
    /// An unreadable or tampered cookie is treated the same as an absent
    /// one.
    pub fn token(&self) -> Option<Token> {
        let cookie = self.jar.get(TOKEN_COOKIE)?;
        serde_json::from_str(cookie.value()).ok()
    }

    /// Stores a token, overwriting any previous one.
    pub fn set_token(mut self, token: &Token) -> Res<Self> {
        let json = serde_json::to_string(token)
            .map_err(|e| Error::Format(format!("token serialization failed: {e}")))?;
        self.jar = self
            .jar
            .add(Cookie::build((TOKEN_COOKIE, json)).path("/").http_only(true));
        Ok(self)
    }

    /// Removes the token and all other session-scoped state.
    pub fn clear(mut self) -> Self {
        for name in [TOKEN_COOKIE, NEXT_URL_COOKIE, OAUTH_STATE_COOKIE] {
            self.jar = self.jar.remove(Cookie::build(name).path("/"));
        }
        self
    }

    /// Returns the current token, refreshing it first if it has expired.
    ///
    /// Absent token yields `None`. A refreshed token atomically replaces
    /// the stored one. Refresh failure clears the session and also yields
    /// `None`, so the caller redirects to sign-in instead of retrying.
    pub async fn get_token<R>(self, refresher: &R) -> Res<(Self, Option<Token>)>
    where
        R: TokenRefresher + ?Sized,
    {
        let Some(token) = self.token() else {
            return Ok((self, None));
        };

        if !token.is_expired() {
            return Ok((self, Some(token)));
        }

        match refresher.refresh(&token.refresh_token).await {
            Ok(fresh) => {
                let store = self.set_token(&fresh)?;
                Ok((store, Some(fresh)))
            }
            Err(e) => {
                crate::warning!("Token refresh failed, clearing session: {}", e);
                Ok((self.clear(), None))
            }
        }
    }

    /// Remembers the URL to return to after a successful sign-in.
    pub fn remember_next_url(mut self, url: &str) -> Self {
        self.jar = self.jar.add(
            Cookie::build((NEXT_URL_COOKIE, url.to_string()))
                .path("/")
                .http_only(true),
        );
        self
    }

    /// Takes the remembered post-sign-in URL, removing it from the session.
    pub fn take_next_url(mut self) -> (Self, Option<String>) {
        let url = self
            .jar
            .get(NEXT_URL_COOKIE)
            .map(|c| c.value().to_string());
        self.jar = self.jar.remove(Cookie::build(NEXT_URL_COOKIE).path("/"));
        (self, url)
    }

    /// Remembers the OAuth `state` parameter issued at sign-in.
    pub fn remember_oauth_state(mut self, state: &str) -> Self {
        self.jar = self.jar.add(
            Cookie::build((OAUTH_STATE_COOKIE, state.to_string()))
                .path("/")
                .http_only(true),
        );
        self
    }

    /// Takes the OAuth `state` parameter for callback verification.
    pub fn take_oauth_state(mut self) -> (Self, Option<String>) {
        let state = self
            .jar
            .get(OAUTH_STATE_COOKIE)
            .map(|c| c.value().to_string());
        self.jar = self.jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path("/"));
        (self, state)
    }

    /// Releases the jar so it can be returned with the response.
    pub fn into_jar(self) -> SignedCookieJar {
        self.jar
    }
}
