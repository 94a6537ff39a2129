use async_trait::async_trait;
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use chrono::Utc;
use tunecanvas::Res;
use tunecanvas::error::Error;
use tunecanvas::session::{TokenRefresher, TokenStore};
use tunecanvas::types::Token;

fn fresh_jar() -> SignedCookieJar {
    SignedCookieJar::new(Key::generate())
}

fn token(access: &str, obtained_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: "refresh-1".to_string(),
        scope: "user-top-read user-read-recently-played".to_string(),
        expires_in,
        obtained_at,
    }
}

fn now() -> u64 {
    Utc::now().timestamp() as u64
}

/// Refresher that always succeeds with a fixed replacement token.
struct Refreshes {
    replacement: Token,
}

#[async_trait]
impl TokenRefresher for Refreshes {
    async fn refresh(&self, refresh_token: &str) -> Res<Token> {
        assert_eq!(refresh_token, "refresh-1");
        Ok(self.replacement.clone())
    }
}

/// Refresher that always fails, as the token endpoint does for revoked
/// grants.
struct RefusesRefresh;

#[async_trait]
impl TokenRefresher for RefusesRefresh {
    async fn refresh(&self, _refresh_token: &str) -> Res<Token> {
        Err(Error::Auth("refresh grant revoked".to_string()))
    }
}

#[tokio::test]
async fn absent_token_yields_none() {
    let store = TokenStore::new(fresh_jar());

    let (store, token) = store.get_token(&RefusesRefresh).await.unwrap();

    assert!(token.is_none());
    assert!(store.token().is_none());
}

#[tokio::test]
async fn valid_token_passes_through_without_refresh() {
    let stored = token("valid-access", now(), 3_600);
    let store = TokenStore::new(fresh_jar()).set_token(&stored).unwrap();

    // RefusesRefresh would turn any refresh attempt into a cleared
    // session, so getting the token back proves no refresh happened.
    let (store, got) = store.get_token(&RefusesRefresh).await.unwrap();

    let got = got.unwrap();
    assert_eq!(got.access_token, "valid-access");
    assert!(!got.is_expired());
    assert_eq!(store.token().unwrap().access_token, "valid-access");
}

#[tokio::test]
async fn expired_token_is_refreshed_and_replaced() {
    let stale = token("stale-access", now() - 7_200, 3_600);
    let replacement = token("fresh-access", now(), 3_600);
    let store = TokenStore::new(fresh_jar()).set_token(&stale).unwrap();

    let (store, got) = store
        .get_token(&Refreshes {
            replacement: replacement.clone(),
        })
        .await
        .unwrap();

    let got = got.unwrap();
    assert_eq!(got.access_token, "fresh-access");
    assert!(got.expires_at() > now());
    // The stored token was atomically replaced, not just returned.
    assert_eq!(store.token().unwrap().access_token, "fresh-access");
}

#[tokio::test]
async fn failed_refresh_clears_the_session() {
    let stale = token("stale-access", now() - 7_200, 3_600);
    let store = TokenStore::new(fresh_jar())
        .set_token(&stale)
        .unwrap()
        .remember_next_url("/display-top-tracks");

    let (store, got) = store.get_token(&RefusesRefresh).await.unwrap();

    assert!(got.is_none());
    assert!(store.token().is_none());
    let (_store, next_url) = store.take_next_url();
    assert!(next_url.is_none());
}

#[tokio::test]
async fn set_token_overwrites_the_previous_one() {
    let first = token("first", now(), 3_600);
    let second = token("second", now(), 3_600);

    let store = TokenStore::new(fresh_jar())
        .set_token(&first)
        .unwrap()
        .set_token(&second)
        .unwrap();

    assert_eq!(store.token().unwrap().access_token, "second");
}

#[tokio::test]
async fn cancelled_sign_in_leaves_no_partial_state() {
    // Mid-flow session: an OAuth state and a remembered URL, no token yet.
    let store = TokenStore::new(fresh_jar())
        .remember_oauth_state("state-abc")
        .remember_next_url("/display-image");

    // Consent was cancelled; the callback clears everything.
    let store = store.clear();

    assert!(store.token().is_none());
    let (store, oauth_state) = store.take_oauth_state();
    assert!(oauth_state.is_none());
    let (_store, next_url) = store.take_next_url();
    assert!(next_url.is_none());
}

#[tokio::test]
async fn next_url_is_consumed_on_take() {
    let store = TokenStore::new(fresh_jar()).remember_next_url("/display-recommended-songs");

    let (store, first) = store.take_next_url();
    assert_eq!(first.as_deref(), Some("/display-recommended-songs"));

    let (_store, second) = store.take_next_url();
    assert!(second.is_none());
}

#[tokio::test]
async fn oauth_state_roundtrips_once() {
    let store = TokenStore::new(fresh_jar()).remember_oauth_state("state-xyz");

    let (store, first) = store.take_oauth_state();
    assert_eq!(first.as_deref(), Some("state-xyz"));

    let (_store, second) = store.take_oauth_state();
    assert!(second.is_none());
}
