use serde::{Deserialize, Serialize};

/// Seconds before nominal expiry at which a token is already treated as
/// expired, so a request never goes out with a token about to lapse.
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// An OAuth access/refresh token pair for the current user session.
///
/// Lives only inside the signed session cookie; replaced atomically on
/// refresh and destroyed on sign-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Unix timestamp at which the access token stops being valid.
    pub fn expires_at(&self) -> u64 {
        self.obtained_at + self.expires_in
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        now + TOKEN_EXPIRY_MARGIN_SECS >= self.expires_at()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp() as u64)
    }
}

/// One entry of a ranked top-tracks listing, or a resolved recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSummary {
    /// 1-indexed position in the listing.
    pub rank: u32,
    /// URL of the primary album image; empty when the album carries none.
    pub image_url: String,
    pub title: String,
    pub artists: Vec<String>,
}

/// One entry of a ranked top-artists listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub rank: u32,
    pub image_url: String,
    pub name: String,
}

/// A single play from the listening history, with the timestamp already
/// converted to the process-local timezone and formatted for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayEvent {
    pub title: String,
    pub artists: Vec<String>,
    /// `MM/DD/YYYY, hh:mm AM/PM` in local time.
    pub played_at: String,
}

/// A flattened (title, artists) pair handed to the generative API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPair {
    pub title: String,
    /// Comma-separated artist names.
    pub artists: String,
}

impl std::fmt::Display for TrackPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {}", self.title, self.artists)
    }
}

/// A model-suggested track, unvalidated against the real catalog until
/// resolved through search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationCandidate {
    pub track_name: String,
    pub artist_name: String,
}

/// Structured-output payload of the recommendation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationList {
    pub tracks: Vec<RecommendationCandidate>,
}

// --- Spotify wire types ---

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Absent on refresh responses that do not rotate the refresh token.
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageObject {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumObject {
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub name: String,
    pub album: AlbumObject,
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
    pub name: String,
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopArtistsResponse {
    pub items: Vec<ArtistObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistoryObject {
    pub track: TrackObject,
    /// ISO 8601 UTC timestamp as sent by the API.
    pub played_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayedResponse {
    pub items: Vec<PlayHistoryObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

// --- OpenAI wire types ---

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    pub data: Vec<GeneratedImage>,
}
