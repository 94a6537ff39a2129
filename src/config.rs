//! Configuration management for Tunecanvas.
//!
//! All configuration comes from environment variables, optionally seeded
//! from a `.env` file in the working directory. Credentials have no
//! defaults and panic at first use when missing; endpoint URLs and model
//! names default to the production values and only need to be set when
//! pointing the app at a mock or a different model.

use std::env;

/// Loads environment variables from a `.env` file in the working directory.
///
/// A missing `.env` file is not an error; the process environment may
/// already carry everything the app needs.
pub fn load_env() {
    let _ = dotenv::dotenv();
}

/// Returns the address the HTTP server binds to.
///
/// Read from `SERVER_ADDRESS`, defaulting to `127.0.0.1:8888`.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8888".to_string())
}

/// Returns the secret used to sign session cookies.
///
/// Read from `SESSION_SECRET`. The value must be at least 64 bytes long;
/// shorter keys are rejected when the signing key is constructed.
///
/// # Panics
///
/// Panics if the `SESSION_SECRET` environment variable is not set.
pub fn session_secret() -> String {
    env::var("SESSION_SECRET").expect("SESSION_SECRET must be set")
}

/// Returns the Spotify API client ID.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_CLIENT_ID").expect("SPOTIFY_CLIENT_ID must be set")
}

/// Returns the Spotify API client secret.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_SECRET` environment variable is not set.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_CLIENT_SECRET").expect("SPOTIFY_CLIENT_SECRET must be set")
}

/// Returns the OAuth redirect URI registered with Spotify.
///
/// This must match the redirect URI configured in the Spotify application
/// settings, e.g. `http://127.0.0.1:8888/callback`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI").expect("SPOTIFY_REDIRECT_URI must be set")
}

/// Returns the OAuth scopes requested during sign-in.
///
/// Read from `SPOTIFY_SCOPE`, defaulting to the two read scopes the app
/// actually uses.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_SCOPE")
        .unwrap_or_else(|_| "user-top-read user-read-recently-played".to_string())
}

/// Returns the Spotify OAuth authorization URL (`SPOTIFY_AUTH_URL`).
pub fn spotify_auth_url() -> String {
    env::var("SPOTIFY_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth token exchange URL (`SPOTIFY_TOKEN_URL`).
pub fn spotify_token_url() -> String {
    env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_api_url() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the OpenAI API key.
///
/// # Panics
///
/// Panics if the `OPENAI_API_KEY` environment variable is not set.
pub fn openai_api_key() -> String {
    env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set")
}

/// Returns the OpenAI API base URL (`OPENAI_API_URL`).
pub fn openai_api_url() -> String {
    env::var("OPENAI_API_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

/// Returns the chat model used for image-prompt generation
/// (`OPENAI_CHAT_MODEL`).
pub fn openai_chat_model() -> String {
    env::var("OPENAI_CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

/// Returns the chat model used for structured-output recommendations
/// (`OPENAI_RECOMMENDATION_MODEL`). Must be a model that supports
/// `json_schema` response formats.
pub fn openai_recommendation_model() -> String {
    env::var("OPENAI_RECOMMENDATION_MODEL").unwrap_or_else(|_| "gpt-4o-2024-08-06".to_string())
}

/// Returns the image generation model (`OPENAI_IMAGE_MODEL`).
pub fn openai_image_model() -> String {
    env::var("OPENAI_IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string())
}

/// Returns the policy applied when a recommended track has no catalog
/// match (`MISSING_TRACK_POLICY`, `fail` or `skip`). Defaults to `fail`.
pub fn missing_track_policy() -> String {
    env::var("MISSING_TRACK_POLICY").unwrap_or_else(|_| "fail".to_string())
}
