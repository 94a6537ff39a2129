use std::{net::SocketAddr, str::FromStr};

use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;

use crate::{
    api, config, error, info,
    openai::OpenAiClient,
    pipeline::MissingTrackPolicy,
    spotify::{SpotifyAuth, SpotifyClient},
};

/// Process-wide state shared by all request handlers.
///
/// Built once at startup from the environment; read-only afterwards. The
/// per-user token never lives here, it travels in the session cookie.
#[derive(Clone)]
pub struct AppState {
    pub key: Key,
    pub auth: SpotifyAuth,
    pub spotify: SpotifyClient,
    pub openai: OpenAiClient,
    pub policy: MissingTrackPolicy,
}

impl AppState {
    pub fn from_env() -> Self {
        let policy = match config::missing_track_policy().parse() {
            Ok(policy) => policy,
            Err(e) => error!("Bad MISSING_TRACK_POLICY: {}", e),
        };

        AppState {
            key: Key::from(config::session_secret().as_bytes()),
            auth: SpotifyAuth::from_env(),
            spotify: SpotifyClient::from_env(),
            openai: OpenAiClient::from_env(),
            policy,
        }
    }
}

// Lets SignedCookieJar find the signing key in the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

pub async fn serve(addr_override: Option<String>) {
    let state = AppState::from_env();

    let app = Router::new()
        .route("/", get(api::index))
        .route("/sign-in", get(api::sign_in))
        .route("/sign-out", get(api::sign_out))
        .route("/callback", get(api::callback))
        .route("/health", get(api::health))
        .route("/display-top-tracks", get(api::display_top_tracks))
        .route("/display-top-artists", get(api::display_top_artists))
        .route("/display-recently-played", get(api::display_recently_played))
        .route("/display-image", get(api::display_image))
        .route(
            "/display-recommended-songs",
            get(api::display_recommended_songs),
        )
        .with_state(state);

    let addr = addr_override.unwrap_or_else(config::server_addr);
    let addr = match SocketAddr::from_str(&addr) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
