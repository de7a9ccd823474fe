pub mod provider;
pub mod questions;
pub mod service;

use thiserror::Error;

/// Any failure inside the extraction flow. The POST handler renders these as
/// a single `{"error": message}` payload; no partial results survive.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Image decoding failed: {0}")]
    Decode(String),
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Model API error ({status}): {detail}")]
    Api { status: u16, detail: String },
    #[error("Model returned no answer text")]
    EmptyResponse,
}
