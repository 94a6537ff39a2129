use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;

use crate::{
    Res, config,
    error::Error,
    session::TokenRefresher,
    types::{Token, TokenResponse},
};

/// OAuth 2.0 authorization-code client for Spotify.
///
/// Builds the authorization URL the user is redirected to, exchanges the
/// callback code for a token pair, and refreshes expired tokens. The
/// client secret is sent as an HTTP Basic `Authorization` header on the
/// token endpoint, as the authorization-code grant requires.
#[derive(Clone)]
pub struct SpotifyAuth {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    scope: String,
}

impl SpotifyAuth {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        auth_url: String,
        token_url: String,
        scope: String,
    ) -> Self {
        SpotifyAuth {
            http: Client::new(),
            client_id,
            client_secret,
            redirect_uri,
            auth_url,
            token_url,
            scope,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            config::spotify_client_id(),
            config::spotify_client_secret(),
            config::spotify_redirect_uri(),
            config::spotify_auth_url(),
            config::spotify_token_url(),
            config::spotify_scope(),
        )
    }

    /// The authorization URL the user is sent to for consent.
    ///
    /// `state` is echoed back on the callback and must be verified there.
    /// `show_dialog=true` forces the consent screen even for users who
    /// already granted access, matching the sign-in link semantics.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}&state={state}&show_dialog=true",
            auth_url = self.auth_url,
            client_id = self.client_id,
            redirect_uri = self.redirect_uri,
            scope = self.scope.replace(' ', "%20"),
            state = state,
        )
    }

    /// Exchanges the authorization code from the callback for a token pair.
    pub async fn exchange_code(&self, code: &str) -> Res<Token> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Res<Token> {
        let basic = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        let res = self
            .http
            .post(&self.token_url)
            .header("Authorization", format!("Basic {basic}"))
            .form(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse = res.json().await?;
        Ok(self.into_token(parsed, None))
    }

    fn into_token(&self, parsed: TokenResponse, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: parsed.access_token,
            // Refresh responses may omit the refresh token when it is not
            // rotated; keep using the previous one then.
            refresh_token: parsed
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: parsed.scope.unwrap_or_else(|| self.scope.clone()),
            expires_in: parsed.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

#[async_trait]
impl TokenRefresher for SpotifyAuth {
    /// Exchanges a refresh token for a fresh token pair. Failure is an
    /// authentication error; the session layer clears the session and the
    /// user signs in again. No retry is attempted.
    async fn refresh(&self, refresh_token: &str) -> Res<Token> {
        let basic = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        let res = self
            .http
            .post(&self.token_url)
            .header("Authorization", format!("Basic {basic}"))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "token refresh rejected with status {status}: {body}",
                status = status.as_u16(),
            )));
        }

        let parsed: TokenResponse = res.json().await?;
        Ok(self.into_token(parsed, Some(refresh_token)))
    }
}
