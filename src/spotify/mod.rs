//! # Spotify Integration Module
//!
//! The integration layer between Tunecanvas and the Spotify Web API. It
//! owns all HTTP communication with Spotify: the OAuth 2.0
//! authorization-code flow and the data endpoints the app reads from.
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth authorization-code flow: building the authorize URL,
//!   exchanging the callback code for a token pair, and refreshing expired
//!   tokens. Client credentials are sent as an HTTP Basic header on the
//!   token endpoint.
//! - [`client`] - [`SpotifyClient`], the [`MusicService`] implementation
//!   backed by `reqwest`.
//!
//! ## API coverage
//!
//! - `GET /me/top/tracks` - top tracks over an aggregation window
//! - `GET /me/top/artists` - top artists over an aggregation window
//! - `GET /me/player/recently-played` - listening history
//! - `GET /search` - track search, used to resolve recommendations
//! - `POST /api/token` - code exchange and token refresh
//!
//! Every data call carries a bearer access token and fetches a single
//! bounded page of at most 50 items. Non-success responses map to
//! [`crate::error::Error::Upstream`] (or `Auth` on 401); nothing is
//! retried.

pub mod auth;
pub mod client;

pub use auth::SpotifyAuth;
pub use client::SpotifyClient;

use async_trait::async_trait;

use crate::{
    Res,
    types::{ArtistSummary, PlayEvent, TrackSummary},
};

/// The upstream aggregation window for top-items rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Roughly the last four weeks.
    ShortTerm,
    /// Roughly the last six months.
    MediumTerm,
    /// Several years of data.
    LongTerm,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::ShortTerm => "short_term",
            TimeWindow::MediumTerm => "medium_term",
            TimeWindow::LongTerm => "long_term",
        }
    }
}

/// Read access to the music catalog and the user's listening data.
///
/// Every operation requires a valid access token; limits above 50 are
/// clamped to the API maximum.
#[async_trait]
pub trait MusicService {
    /// The user's top tracks, ranked 1-indexed by response position, each
    /// carrying its primary album image.
    async fn top_tracks(
        &self,
        token: &str,
        limit: u32,
        window: TimeWindow,
    ) -> Res<Vec<TrackSummary>>;

    /// The user's top artists, ranked 1-indexed by response position.
    async fn top_artists(
        &self,
        token: &str,
        limit: u32,
        window: TimeWindow,
    ) -> Res<Vec<ArtistSummary>>;

    /// The user's most recent plays, timestamps already converted to
    /// local time.
    async fn recently_played(&self, token: &str, limit: u32) -> Res<Vec<PlayEvent>>;

    /// The first-ranked catalog match for a query, or
    /// [`crate::error::Error::NotFound`] when the catalog has none.
    async fn search_track(&self, token: &str, query: &str) -> Res<TrackSummary>;
}
