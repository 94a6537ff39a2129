//! Tunecanvas
//!
//! A small web application that signs a user in with Spotify, pulls their
//! listening history, and hands derived summaries to the OpenAI API to
//! produce artwork and song recommendations.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers for the web surface
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by all clients and handlers
//! - `openai` - OpenAI API client (chat completions, image generation)
//! - `pipeline` - Recommendation and listening-image pipelines
//! - `server` - Router assembly and serve loop
//! - `session` - Cookie-backed session token store
//! - `spotify` - Spotify Web API client and OAuth flow
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod config;
pub mod error;
pub mod openai;
pub mod pipeline;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// All fallible operations in the crate return this alias over
/// [`error::Error`], which carries the explicit error kinds
/// (authentication, upstream, format, not-found) that route handlers
/// translate into HTTP responses.
pub type Res<T> = std::result::Result<T, error::Error>;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Reserved for unrecoverable startup failures (bad configuration, bind
/// errors); request-scoped failures go through [`error::Error`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
