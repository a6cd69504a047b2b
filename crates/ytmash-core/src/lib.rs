//! ytmash-core: pipeline for building singer mashups from YouTube audio

pub mod assembler;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod request;

pub use config::Config;
pub use error::{MashupError, Result};
pub use request::MashupRequest;
