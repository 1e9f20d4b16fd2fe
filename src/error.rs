use std::io;
use thiserror::Error;

/// Everything that can go wrong while recording or reloading workouts.
///
/// Missing stored data is deliberately NOT an error: an absent blob just
/// means "no history yet" and loading yields an empty store.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field} must be a finite, positive number")]
    Validation { field: &'static str },

    #[error("could not determine the current position")]
    GeolocationDenied,

    #[error("stored workout data is not valid JSON")]
    CorruptBlob(#[from] serde_json::Error),

    #[error("storage backend error")]
    Storage(#[from] io::Error),
}
