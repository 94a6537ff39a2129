use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::{
    pipeline,
    server::AppState,
    session::TokenStore,
    spotify::{MusicService, TimeWindow},
    types::{ArtistSummary, PlayEvent, Token, TrackSummary},
};

const PAGE_LIMIT: u32 = 50;

/// Renders the home page with the current sign-in status.
pub async fn index(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let store = TokenStore::new(jar);
    let (store, token) = match store.get_token(&state.auth).await {
        Ok(result) => result,
        Err(e) => return e.into_response(),
    };
    (store.into_jar(), home_page(token.is_some())).into_response()
}

pub async fn display_top_tracks(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let (store, token) = match require_token(&state, jar, "/display-top-tracks").await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state
        .spotify
        .top_tracks(&token.access_token, PAGE_LIMIT, TimeWindow::ShortTerm)
        .await
    {
        Ok(tracks) => (store.into_jar(), tracks_page("Your Top Tracks", &tracks)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn display_top_artists(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let (store, token) = match require_token(&state, jar, "/display-top-artists").await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state
        .spotify
        .top_artists(&token.access_token, PAGE_LIMIT, TimeWindow::ShortTerm)
        .await
    {
        Ok(artists) => (store.into_jar(), artists_page(&artists)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn display_recently_played(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    let (store, token) = match require_token(&state, jar, "/display-recently-played").await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state
        .spotify
        .recently_played(&token.access_token, PAGE_LIMIT)
        .await
    {
        Ok(plays) => (store.into_jar(), recently_played_page(&plays)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Generates and displays an image inspired by the user's top tracks.
pub async fn display_image(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let (store, token) = match require_token(&state, jar, "/display-image").await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match pipeline::generate_listening_image(&state.spotify, &state.openai, &token.access_token)
        .await
    {
        Ok(image) => (store.into_jar(), image_page(&image.prompt, &image.image_url)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Displays catalog-verified song recommendations.
pub async fn display_recommended_songs(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    let (store, token) = match require_token(&state, jar, "/display-recommended-songs").await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match pipeline::recommend_tracks(
        &state.spotify,
        &state.openai,
        &token.access_token,
        state.policy,
    )
    .await
    {
        Ok(tracks) => {
            (store.into_jar(), tracks_page("Recommended Songs", &tracks)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Produces a valid session token or the redirect that replaces the page.
///
/// An absent (or unrefreshable) token remembers `original_url` so the
/// callback can return the user to the page they asked for.
async fn require_token(
    state: &AppState,
    jar: SignedCookieJar,
    original_url: &str,
) -> Result<(TokenStore, Token), Response> {
    let store = TokenStore::new(jar);
    let (store, token) = match store.get_token(&state.auth).await {
        Ok(result) => result,
        Err(e) => return Err(e.into_response()),
    };

    match token {
        Some(token) => Ok((store, token)),
        None => {
            let store = store.remember_next_url(original_url);
            Err((store.into_jar(), Redirect::to("/sign-in")).into_response())
        }
    }
}

// --- HTML rendering ---

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n{body}\n<p><a href=\"/\">Home</a></p>\n</body>\n</html>",
        title = escape(title),
        body = body,
    ))
}

fn home_page(logged_in: bool) -> Html<String> {
    let body = if logged_in {
        concat!(
            "<ul>",
            "<li><a href=\"/display-top-tracks\">Top tracks</a></li>",
            "<li><a href=\"/display-top-artists\">Top artists</a></li>",
            "<li><a href=\"/display-recently-played\">Recently played</a></li>",
            "<li><a href=\"/display-image\">Listening artwork</a></li>",
            "<li><a href=\"/display-recommended-songs\">Recommended songs</a></li>",
            "</ul>",
            "<p><a href=\"/sign-out\">Sign out</a></p>",
        )
        .to_string()
    } else {
        "<p><a href=\"/sign-in\">Sign in with Spotify</a></p>".to_string()
    };
    page("Tunecanvas", &body)
}

fn tracks_page(title: &str, tracks: &[TrackSummary]) -> Html<String> {
    let rows: String = tracks
        .iter()
        .map(|t| {
            format!(
                "<li><img src=\"{img}\" alt=\"\" width=\"64\"> {title} — {artists}</li>\n",
                img = escape(&t.image_url),
                title = escape(&t.title),
                artists = escape(&t.artists.join(", ")),
            )
        })
        .collect();
    page(title, &format!("<ol>\n{rows}</ol>"))
}

fn artists_page(artists: &[ArtistSummary]) -> Html<String> {
    let rows: String = artists
        .iter()
        .map(|a| {
            format!(
                "<li><img src=\"{img}\" alt=\"\" width=\"64\"> {name}</li>\n",
                img = escape(&a.image_url),
                name = escape(&a.name),
            )
        })
        .collect();
    page("Your Top Artists", &format!("<ol>\n{rows}</ol>"))
}

fn recently_played_page(plays: &[PlayEvent]) -> Html<String> {
    let rows: String = plays
        .iter()
        .map(|p| {
            format!(
                "<li>{title} — {artists} <em>({played_at})</em></li>\n",
                title = escape(&p.title),
                artists = escape(&p.artists.join(", ")),
                played_at = escape(&p.played_at),
            )
        })
        .collect();
    page("Recently Played", &format!("<ul>\n{rows}</ul>"))
}

fn image_page(prompt: &str, image_url: &str) -> Html<String> {
    page(
        "Your Listening Artwork",
        &format!(
            "<p>{prompt}</p>\n<img src=\"{url}\" alt=\"Generated artwork\" width=\"512\">",
            prompt = escape(prompt),
            url = escape(image_url),
        ),
    )
}
