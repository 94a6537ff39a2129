use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tunecanvas::error::Error;
use tunecanvas::openai::GenerativeService;
use tunecanvas::pipeline::{self, MissingTrackPolicy};
use tunecanvas::spotify::{MusicService, TimeWindow};
use tunecanvas::types::{
    ArtistSummary, PlayEvent, RecommendationCandidate, TrackPair, TrackSummary,
};
use tunecanvas::Res;

fn track(rank: u32, title: &str, artist: &str) -> TrackSummary {
    TrackSummary {
        rank,
        image_url: format!("https://img.example/{rank}.jpg"),
        title: title.to_string(),
        artists: vec![artist.to_string()],
    }
}

fn candidates(n: usize) -> Vec<RecommendationCandidate> {
    (1..=n)
        .map(|i| RecommendationCandidate {
            track_name: format!("Suggestion {i}"),
            artist_name: format!("Artist {i}"),
        })
        .collect()
}

/// Music service fake: a fixed top-tracks profile and a catalog that
/// resolves every search to a track titled after the query, minus an
/// explicit set of misses.
struct FakeMusic {
    top: Vec<TrackSummary>,
    missing: HashSet<String>,
    searches: Mutex<Vec<String>>,
}

impl FakeMusic {
    fn new(top: Vec<TrackSummary>) -> Self {
        FakeMusic {
            top,
            missing: HashSet::new(),
            searches: Mutex::new(Vec::new()),
        }
    }

    fn without(mut self, query: &str) -> Self {
        self.missing.insert(query.to_string());
        self
    }
}

#[async_trait]
impl MusicService for FakeMusic {
    async fn top_tracks(
        &self,
        _token: &str,
        limit: u32,
        _window: TimeWindow,
    ) -> Res<Vec<TrackSummary>> {
        Ok(self.top.iter().take(limit as usize).cloned().collect())
    }

    async fn top_artists(
        &self,
        _token: &str,
        _limit: u32,
        _window: TimeWindow,
    ) -> Res<Vec<ArtistSummary>> {
        Ok(Vec::new())
    }

    async fn recently_played(&self, _token: &str, _limit: u32) -> Res<Vec<PlayEvent>> {
        Ok(Vec::new())
    }

    async fn search_track(&self, _token: &str, query: &str) -> Res<TrackSummary> {
        self.searches.lock().unwrap().push(query.to_string());
        if self.missing.contains(query) {
            return Err(Error::NotFound(query.to_string()));
        }
        Ok(TrackSummary {
            rank: 1,
            image_url: "https://img.example/found.jpg".to_string(),
            title: query.to_string(),
            artists: vec!["Resolved Artist".to_string()],
        })
    }
}

/// Generative fake that records every input it is handed.
struct FakeGenerative {
    candidates: Vec<RecommendationCandidate>,
    prompt_inputs: Mutex<Vec<Vec<TrackPair>>>,
    recommendation_inputs: Mutex<Vec<Vec<TrackPair>>>,
}

impl FakeGenerative {
    fn new(candidates: Vec<RecommendationCandidate>) -> Self {
        FakeGenerative {
            candidates,
            prompt_inputs: Mutex::new(Vec::new()),
            recommendation_inputs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerativeService for FakeGenerative {
    async fn generate_image_prompt(&self, tracks: &[TrackPair]) -> Res<String> {
        self.prompt_inputs.lock().unwrap().push(tracks.to_vec());
        Ok("a neon skyline dissolving into rain".to_string())
    }

    async fn generate_image(&self, prompt: &str) -> Res<String> {
        assert!(!prompt.is_empty());
        Ok("https://images.example/artwork.png".to_string())
    }

    async fn generate_recommendations(
        &self,
        tracks: &[TrackPair],
    ) -> Res<Vec<RecommendationCandidate>> {
        self.recommendation_inputs
            .lock()
            .unwrap()
            .push(tracks.to_vec());
        Ok(self.candidates.clone())
    }
}

fn profile(n: usize) -> Vec<TrackSummary> {
    (1..=n)
        .map(|i| track(i as u32, &format!("Top {i}"), &format!("Artist {i}")))
        .collect()
}

#[tokio::test]
async fn recommendations_preserve_candidate_order() {
    let music = FakeMusic::new(profile(50));
    let generative = FakeGenerative::new(candidates(10));

    let resolved = pipeline::recommend_tracks(&music, &generative, "tok", MissingTrackPolicy::Fail)
        .await
        .unwrap();

    assert_eq!(resolved.len(), 10);
    for (idx, rec) in resolved.iter().enumerate() {
        // The fake catalog titles every hit after its query, so the Nth
        // result must come from the Nth candidate's query.
        let n = idx + 1;
        assert_eq!(rec.title, format!("Suggestion {n} Artist {n}"));
        assert_eq!(rec.rank, n as u32);
    }

    // Searches were issued in candidate order as well.
    let searches = music.searches.lock().unwrap();
    assert_eq!(searches.len(), 10);
    assert_eq!(searches[0], "Suggestion 1 Artist 1");
    assert_eq!(searches[9], "Suggestion 10 Artist 10");
}

#[tokio::test]
async fn recommendation_call_sees_the_whole_profile() {
    let music = FakeMusic::new(profile(7));
    let generative = FakeGenerative::new(candidates(10));

    pipeline::recommend_tracks(&music, &generative, "tok", MissingTrackPolicy::Fail)
        .await
        .unwrap();

    let inputs = generative.recommendation_inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].len(), 7);
    assert_eq!(inputs[0][0].title, "Top 1");
    assert_eq!(inputs[0][6].title, "Top 7");
}

#[tokio::test]
async fn skip_policy_drops_unmatched_candidates_and_renumbers() {
    let music = FakeMusic::new(profile(50))
        .without("Suggestion 3 Artist 3")
        .without("Suggestion 7 Artist 7");
    let generative = FakeGenerative::new(candidates(10));

    let resolved = pipeline::recommend_tracks(&music, &generative, "tok", MissingTrackPolicy::Skip)
        .await
        .unwrap();

    assert_eq!(resolved.len(), 8);
    // Ranks stay contiguous after the drops.
    let ranks: Vec<u32> = resolved.iter().map(|t| t.rank).collect();
    assert_eq!(ranks, (1..=8).collect::<Vec<u32>>());
    // The surviving candidates keep their relative order.
    assert_eq!(resolved[1].title, "Suggestion 2 Artist 2");
    assert_eq!(resolved[2].title, "Suggestion 4 Artist 4");
    assert_eq!(resolved[5].title, "Suggestion 8 Artist 8");
}

#[tokio::test]
async fn fail_policy_surfaces_the_missing_candidate() {
    let music = FakeMusic::new(profile(50)).without("Suggestion 4 Artist 4");
    let generative = FakeGenerative::new(candidates(10));

    let result =
        pipeline::recommend_tracks(&music, &generative, "tok", MissingTrackPolicy::Fail).await;

    match result {
        Err(Error::NotFound(query)) => assert_eq!(query, "Suggestion 4 Artist 4"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn listening_image_feeds_at_most_five_pairs() {
    let music = FakeMusic::new(profile(8));
    let generative = FakeGenerative::new(candidates(10));

    let image = pipeline::generate_listening_image(&music, &generative, "tok")
        .await
        .unwrap();

    assert_eq!(image.prompt, "a neon skyline dissolving into rain");
    assert!(!image.image_url.is_empty());

    let inputs = generative.prompt_inputs.lock().unwrap();
    assert_eq!(inputs[0].len(), 5);
}

#[tokio::test]
async fn listening_image_does_not_pad_a_short_profile() {
    let music = FakeMusic::new(profile(3));
    let generative = FakeGenerative::new(candidates(10));

    let image = pipeline::generate_listening_image(&music, &generative, "tok")
        .await
        .unwrap();

    assert!(!image.image_url.is_empty());

    let inputs = generative.prompt_inputs.lock().unwrap();
    assert_eq!(inputs[0].len(), 3);
    assert_eq!(inputs[0][0].title, "Top 1");
    assert_eq!(inputs[0][2].title, "Top 3");
}
