use std::path::PathBuf;
use thiserror::Error;

/// Errors from the few fallible operations in this crate. Resolving settings and building URL
/// strings never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not load settings from `{}`: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("`{url}` is not a valid URL: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
