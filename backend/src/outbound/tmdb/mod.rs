//! TMDB outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `MovieMetadataGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::{DEFAULT_TMDB_API_BASE_URL, TmdbHttpGateway};
