use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::{
    Res, config,
    error::Error,
    types::{ChatResponse, ImageResponse, RecommendationCandidate, RecommendationList, TrackPair},
};

use super::{GenerativeService, IMAGE_PROMPT_TRACK_CAP, RECOMMENDATION_COUNT};

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_url: String,
    api_key: String,
    chat_model: String,
    recommendation_model: String,
    image_model: String,
}

impl OpenAiClient {
    pub fn new(
        api_url: String,
        api_key: String,
        chat_model: String,
        recommendation_model: String,
        image_model: String,
    ) -> Self {
        OpenAiClient {
            http: Client::new(),
            api_url,
            api_key,
            chat_model,
            recommendation_model,
            image_model,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            config::openai_api_url(),
            config::openai_api_key(),
            config::openai_chat_model(),
            config::openai_recommendation_model(),
            config::openai_image_model(),
        )
    }

    async fn post_json<T: serde::de::DeserializeOwned>(&self, path: &str, body: Value) -> Res<T> {
        let res = self
            .http
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.api_key)
            .json(&body)
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

        Ok(res.json::<T>().await?)
    }

    async fn chat_completion(&self, model: &str, body: Value) -> Res<String> {
        let res: ChatResponse = self.post_json("/chat/completions", body).await?;
        res.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Format(format!("model {model} returned no choices")))
    }
}

fn song_list(tracks: &[TrackPair]) -> String {
    tracks
        .iter()
        .map(TrackPair::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON schema the recommendation response must conform to.
fn recommendation_schema() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "track_recommendations",
            "schema": {
                "type": "object",
                "properties": {
                    "tracks": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "track_name": {
                                    "description": "The name of the track",
                                    "type": "string"
                                },
                                "artist_name": {
                                    "description": "A comma-separated list of all artist names for the track",
                                    "type": "string"
                                }
                            },
                            "required": ["track_name", "artist_name"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["tracks"],
                "additionalProperties": false
            }
        }
    })
}

/// Checks a parsed recommendation list against the structured-output
/// contract: exactly the requested count, every name non-empty.
fn validate_candidates(list: RecommendationList) -> Res<Vec<RecommendationCandidate>> {
    if list.tracks.len() != RECOMMENDATION_COUNT {
        return Err(Error::Format(format!(
            "expected {RECOMMENDATION_COUNT} recommendations, got {}",
            list.tracks.len()
        )));
    }
    for candidate in &list.tracks {
        if candidate.track_name.trim().is_empty() || candidate.artist_name.trim().is_empty() {
            return Err(Error::Format(
                "recommendation with empty track or artist name".to_string(),
            ));
        }
    }
    Ok(list.tracks)
}

#[async_trait]
impl GenerativeService for OpenAiClient {
    async fn generate_image_prompt(&self, tracks: &[TrackPair]) -> Res<String> {
        let tracks = &tracks[..tracks.len().min(IMAGE_PROMPT_TRACK_CAP)];
        let body = json!({
            "model": self.chat_model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an AI assistant specializing in creating detailed and imaginative prompts for an image generation model based on given song lists."
                },
                {
                    "role": "user",
                    "content": format!(
                        "Create a prompt for an image that combines elements inspired by the themes, lyrics, mood, genre, and cultural imagery of the following songs:\n{}\nDo not include the song titles or artists in the description.",
                        song_list(tracks)
                    )
                }
            ]
        });

        self.chat_completion(&self.chat_model, body).await
    }

    async fn generate_image(&self, prompt: &str) -> Res<String> {
        let body = json!({
            "model": self.image_model,
            "prompt": prompt,
            "size": "1024x1024",
            "n": 1,
        });

        let res: ImageResponse = self.post_json("/images/generations", body).await?;
        res.data
            .into_iter()
            .next()
            .map(|img| img.url)
            .ok_or_else(|| Error::Format("image response carried no image".to_string()))
    }

    async fn generate_recommendations(
        &self,
        tracks: &[TrackPair],
    ) -> Res<Vec<RecommendationCandidate>> {
        let body = json!({
            "model": self.recommendation_model,
            "messages": [
                {
                    "role": "system",
                    "content": "You analyze user data and generate a JSON response containing music tracks based on user preferences."
                },
                {
                    "role": "user",
                    "content": format!(
                        "Based on my top songs:\n{}\nprovide a list of {RECOMMENDATION_COUNT} recommended tracks. Each track should include its name and the artist's name.",
                        song_list(tracks)
                    )
                }
            ],
            "response_format": recommendation_schema(),
        });

        let content = self.chat_completion(&self.recommendation_model, body).await?;
        let list: RecommendationList = serde_json::from_str(&content)
            .map_err(|e| Error::Format(format!("recommendation payload did not parse: {e}")))?;
        validate_candidates(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(track: &str, artist: &str) -> RecommendationCandidate {
        RecommendationCandidate {
            track_name: track.to_string(),
            artist_name: artist.to_string(),
        }
    }

    fn full_list() -> RecommendationList {
        RecommendationList {
            tracks: (0..RECOMMENDATION_COUNT)
                .map(|i| candidate(&format!("Track {i}"), &format!("Artist {i}")))
                .collect(),
        }
    }

    #[test]
    fn full_list_passes_validation() {
        let tracks = validate_candidates(full_list()).unwrap();
        assert_eq!(tracks.len(), RECOMMENDATION_COUNT);
        assert!(tracks
            .iter()
            .all(|c| !c.track_name.is_empty() && !c.artist_name.is_empty()));
    }

    #[test]
    fn short_list_is_a_format_error() {
        let mut list = full_list();
        list.tracks.pop();
        assert!(matches!(
            validate_candidates(list),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn blank_artist_is_a_format_error() {
        let mut list = full_list();
        list.tracks[3].artist_name = "  ".to_string();
        assert!(matches!(
            validate_candidates(list),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn structured_payload_parses_into_candidates() {
        let content = r#"{"tracks":[{"track_name":"Holocene","artist_name":"Bon Iver"}]}"#;
        let list: RecommendationList = serde_json::from_str(content).unwrap();
        assert_eq!(list.tracks[0].track_name, "Holocene");
        assert_eq!(list.tracks[0].artist_name, "Bon Iver");
    }
}
