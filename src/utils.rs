use chrono::{DateTime, Local, TimeZone, Utc};
use rand::{Rng, distr::Alphanumeric};

use crate::{
    Res,
    error::Error,
    types::{TrackPair, TrackSummary},
};

/// Generates a random value for the OAuth `state` parameter.
pub fn generate_oauth_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

pub fn join_artists(names: &[String]) -> String {
    names.join(", ")
}

/// Formats a UTC instant in the given timezone as `MM/DD/YYYY, hh:mm AM/PM`.
pub fn format_timestamp<Tz: TimeZone>(utc: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    utc.with_timezone(tz).format("%m/%d/%Y, %I:%M %p").to_string()
}

/// Converts an ISO 8601 UTC timestamp from the listening history into the
/// process-local timezone, formatted for display.
pub fn format_played_at(iso: &str) -> Res<String> {
    let utc = DateTime::parse_from_rfc3339(iso)
        .map_err(|e| Error::Format(format!("bad played_at timestamp {iso:?}: {e}")))?
        .with_timezone(&Utc);
    Ok(format_timestamp(utc, &Local))
}

/// Flattens ranked tracks into the (title, artists) pairs the generative
/// calls consume, keeping listing order and taking at most `cap` entries.
/// A user with fewer tracks than `cap` yields fewer pairs; no padding.
pub fn track_pairs(tracks: &[TrackSummary], cap: usize) -> Vec<TrackPair> {
    tracks
        .iter()
        .take(cap)
        .map(|t| TrackPair {
            title: t.title.clone(),
            artists: join_artists(&t.artists),
        })
        .collect()
}
