//! Recommendation and listening-image pipelines.
//!
//! Both pipelines are sequential: each upstream call completes before the
//! next is issued, and any failure aborts the whole request. They are
//! written against the [`MusicService`] and [`GenerativeService`] traits
//! so tests can drive them with fakes.

use crate::{
    Res,
    error::Error,
    openai::{GenerativeService, IMAGE_PROMPT_TRACK_CAP},
    spotify::{MusicService, TimeWindow},
    types::TrackSummary,
    utils,
};

/// Tracks fed into the recommendation call.
const PROFILE_TRACK_COUNT: u32 = 50;

/// What to do when a recommended candidate has no catalog match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingTrackPolicy {
    /// Abort the whole request with a not-found error.
    Fail,
    /// Drop the candidate and renumber the remaining recommendations.
    Skip,
}

impl std::str::FromStr for MissingTrackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(MissingTrackPolicy::Fail),
            "skip" => Ok(MissingTrackPolicy::Skip),
            other => Err(format!("unknown missing-track policy {other:?}")),
        }
    }
}

/// A generated image together with the prompt that produced it.
#[derive(Debug, Clone)]
pub struct ListeningImage {
    pub prompt: String,
    pub image_url: String,
}

/// Turns the user's top short-term tracks into catalog-verified
/// recommendations.
///
/// Fetches the top 50 short-term tracks, asks the generative service for
/// candidates, then resolves each candidate in order against track search
/// and renumbers the results 1-up. Candidate order is preserved end to
/// end: the Nth resolved recommendation corresponds to the Nth candidate.
pub async fn recommend_tracks<M, G>(
    music: &M,
    generative: &G,
    token: &str,
    policy: MissingTrackPolicy,
) -> Res<Vec<TrackSummary>>
where
    M: MusicService + ?Sized,
    G: GenerativeService + ?Sized,
{
    let top = music
        .top_tracks(token, PROFILE_TRACK_COUNT, TimeWindow::ShortTerm)
        .await?;
    let pairs = utils::track_pairs(&top, top.len());

    let candidates = generative.generate_recommendations(&pairs).await?;

    let mut resolved = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let query = format!("{} {}", candidate.track_name, candidate.artist_name);
        match music.search_track(token, &query).await {
            Ok(track) => resolved.push(track),
            Err(Error::NotFound(_)) if policy == MissingTrackPolicy::Skip => continue,
            Err(e) => return Err(e),
        }
    }

    for (idx, track) in resolved.iter_mut().enumerate() {
        track.rank = idx as u32 + 1;
    }
    Ok(resolved)
}

/// Produces an image inspired by the user's current listening.
///
/// Feeds at most [`IMAGE_PROMPT_TRACK_CAP`] short-term top tracks into
/// the prompt generator; a user with fewer tracks contributes exactly
/// those, with no padding.
pub async fn generate_listening_image<M, G>(
    music: &M,
    generative: &G,
    token: &str,
) -> Res<ListeningImage>
where
    M: MusicService + ?Sized,
    G: GenerativeService + ?Sized,
{
    let top = music
        .top_tracks(token, IMAGE_PROMPT_TRACK_CAP as u32, TimeWindow::ShortTerm)
        .await?;
    let pairs = utils::track_pairs(&top, IMAGE_PROMPT_TRACK_CAP);

    let prompt = generative.generate_image_prompt(&pairs).await?;
    let image_url = generative.generate_image(&prompt).await?;

    Ok(ListeningImage { prompt, image_url })
}
