//! # API Module
//!
//! HTTP route handlers for the web surface. This layer is deliberately
//! thin: it owns session extraction, redirects, and HTML rendering, and
//! delegates everything else to the clients and pipelines.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`sign_in`] - issues an OAuth `state` and redirects to Spotify's
//!   consent page
//! - [`sign_out`] - clears the session and redirects home
//! - [`callback`] - completes the authorization-code flow; a callback
//!   without a `code` parameter (cancelled consent) clears the session
//!   and redirects home
//!
//! ### Display
//!
//! - [`index`] - home page with sign-in status
//! - [`display_top_tracks`] / [`display_top_artists`] /
//!   [`display_recently_played`] - listening data pages
//! - [`display_image`] - AI-generated artwork for the current listening
//! - [`display_recommended_songs`] - catalog-verified recommendations
//!
//! Display endpoints require a valid session token; when it is absent the
//! originally requested URL is remembered and the user is redirected to
//! sign-in.
//!
//! ### Monitoring
//!
//! - [`health`] - status and version for monitoring systems

mod auth;
mod health;
mod pages;

pub use auth::{callback, sign_in, sign_out};
pub use health::health;
pub use pages::{
    display_image, display_recently_played, display_recommended_songs, display_top_artists,
    display_top_tracks, index,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::Error;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            // An unusable session is not an error page; the user just
            // signs in again.
            Error::Auth(_) => Redirect::to("/sign-in").into_response(),
            Error::Upstream { status, body } => (
                StatusCode::BAD_GATEWAY,
                format!("Upstream API failure ({status}): {body}"),
            )
                .into_response(),
            Error::NotFound(query) => (
                StatusCode::NOT_FOUND,
                format!("No catalog match for {query:?}"),
            )
                .into_response(),
            Error::Format(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Generative response was malformed: {detail}"),
            )
                .into_response(),
        }
    }
}
