//! # OpenAI Integration Module
//!
//! Wraps the two OpenAI endpoints the app consumes:
//!
//! - `POST /chat/completions` - free-text image prompts and, with a
//!   `json_schema` response format, structured song recommendations
//! - `POST /images/generations` - one 1024x1024 image per call
//!
//! The structured-output call constrains the model's response to an
//! object holding a list of `{track_name, artist_name}` pairs; anything
//! that fails to parse against that contract, or that violates it after
//! parsing (wrong count, empty names), is a
//! [`crate::error::Error::Format`]. Results are only as deterministic as
//! the underlying model; nothing is cached or retried.

pub mod client;

pub use client::OpenAiClient;

use async_trait::async_trait;

use crate::{
    Res,
    types::{RecommendationCandidate, TrackPair},
};

/// Number of candidates a recommendation call must yield.
pub const RECOMMENDATION_COUNT: usize = 10;

/// Most (title, artists) pairs an image-prompt call accepts.
pub const IMAGE_PROMPT_TRACK_CAP: usize = 5;

/// Generative text and image operations backed by a language model.
#[async_trait]
pub trait GenerativeService {
    /// A descriptive image prompt drawn from at most
    /// [`IMAGE_PROMPT_TRACK_CAP`] (title, artists) pairs, instructed not
    /// to name the tracks or artists directly.
    async fn generate_image_prompt(&self, tracks: &[TrackPair]) -> Res<String>;

    /// URL of one generated 1024x1024 image for the given prompt.
    async fn generate_image(&self, prompt: &str) -> Res<String>;

    /// Exactly [`RECOMMENDATION_COUNT`] candidates derived from the given
    /// listening profile, each with non-empty track and artist names.
    async fn generate_recommendations(
        &self,
        tracks: &[TrackPair],
    ) -> Res<Vec<RecommendationCandidate>>;
}
