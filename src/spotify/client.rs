use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    Res, config,
    error::Error,
    types::{
        ArtistSummary, PlayEvent, RecentlyPlayedResponse, SearchResponse, TopArtistsResponse,
        TopTracksResponse, TrackObject, TrackSummary,
    },
    utils,
};

use super::{MusicService, TimeWindow};

/// Largest page the top-items, recently-played, and search endpoints
/// accept.
const MAX_PAGE_SIZE: u32 = 50;

/// Spotify Web API data client.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(api_url: String) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url,
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::spotify_api_url())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<T> {
        let res = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Auth("access token rejected by the music API".to_string()));
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(res.json::<T>().await?)
    }
}

/// Shapes a raw track object into a display summary at the given rank.
fn track_summary(rank: u32, track: TrackObject) -> TrackSummary {
    TrackSummary {
        rank,
        image_url: track
            .album
            .images
            .first()
            .map(|img| img.url.clone())
            .unwrap_or_default(),
        title: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
    }
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn top_tracks(
        &self,
        token: &str,
        limit: u32,
        window: TimeWindow,
    ) -> Res<Vec<TrackSummary>> {
        let res: TopTracksResponse = self
            .get_json(
                token,
                "/me/top/tracks",
                &[
                    ("limit", limit.min(MAX_PAGE_SIZE).to_string()),
                    ("time_range", window.as_str().to_string()),
                ],
            )
            .await?;

        Ok(res
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, track)| track_summary(idx as u32 + 1, track))
            .collect())
    }

    async fn top_artists(
        &self,
        token: &str,
        limit: u32,
        window: TimeWindow,
    ) -> Res<Vec<ArtistSummary>> {
        let res: TopArtistsResponse = self
            .get_json(
                token,
                "/me/top/artists",
                &[
                    ("limit", limit.min(MAX_PAGE_SIZE).to_string()),
                    ("time_range", window.as_str().to_string()),
                ],
            )
            .await?;

        Ok(res
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, artist)| ArtistSummary {
                rank: idx as u32 + 1,
                image_url: artist
                    .images
                    .first()
                    .map(|img| img.url.clone())
                    .unwrap_or_default(),
                name: artist.name,
            })
            .collect())
    }

    async fn recently_played(&self, token: &str, limit: u32) -> Res<Vec<PlayEvent>> {
        let res: RecentlyPlayedResponse = self
            .get_json(
                token,
                "/me/player/recently-played",
                &[("limit", limit.min(MAX_PAGE_SIZE).to_string())],
            )
            .await?;

        let mut plays = Vec::with_capacity(res.items.len());
        for item in res.items {
            plays.push(PlayEvent {
                title: item.track.name,
                artists: item.track.artists.into_iter().map(|a| a.name).collect(),
                played_at: utils::format_played_at(&item.played_at)?,
            });
        }
        Ok(plays)
    }

    async fn search_track(&self, token: &str, query: &str) -> Res<TrackSummary> {
        let res: SearchResponse = self
            .get_json(
                token,
                "/search",
                &[
                    ("type", "track".to_string()),
                    ("q", query.to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        match res.tracks.items.into_iter().next() {
            Some(track) => Ok(track_summary(1, track)),
            None => Err(Error::NotFound(query.to_string())),
        }
    }
}
