//! Error taxonomy for upstream calls and session handling.
//!
//! Every client in the crate returns one of four explicit kinds instead of
//! letting transport errors bubble up untyped:
//!
//! - [`Error::Auth`] - no usable session token, a failed refresh, or a 401
//!   from the music API; handlers answer with a redirect to sign-in
//! - [`Error::Upstream`] - a non-success response from Spotify or OpenAI
//! - [`Error::Format`] - a generative response that does not match the
//!   structured-output contract
//! - [`Error::NotFound`] - a catalog search that returned zero results

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing, expired-and-unrefreshable, or rejected credentials.
    #[error("not authenticated: {0}")]
    Auth(String),

    /// Non-success status from an upstream API. No retry is attempted.
    #[error("upstream API returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// A generative response that could not be parsed against the
    /// declared schema, or that violated the contract after parsing.
    #[error("malformed generative response: {0}")]
    Format(String),

    /// A catalog search that matched nothing.
    #[error("no catalog match for {0:?}")]
    NotFound(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16()).unwrap_or(502);
        Error::Upstream {
            status,
            body: err.to_string(),
        }
    }
}
