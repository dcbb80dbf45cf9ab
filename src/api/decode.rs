//! Pluggable decoding of raw response bodies into typed domain values.
//!
//! The facade never touches `serde_json` directly; it goes through a
//! `ResponseDecoder` so tests and alternative wire formats can swap the
//! implementation. Decode failures are typed and recovered at the facade
//! boundary - they never reach the presentation layer as panics.

use std::collections::HashSet;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

/// One page of a paginated endpoint, with the server's total object count
/// when it was reported (the `X-Result-Total` response header).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<usize>,
}

/// Decoder contract: raw body text in, typed values out.
///
/// Implementations must be side-effect-free and idempotent; the query cache
/// may invoke them again at any time after an eviction.
pub trait ResponseDecoder: Send + Sync {
    /// Decode a single object.
    fn decode_one<T: DeserializeOwned>(&self, raw: &str) -> Result<T, DecodeError>;

    /// Decode a homogeneous list, preserving server response order.
    fn decode_list<T: DeserializeOwned>(&self, raw: &str) -> Result<Vec<T>, DecodeError>;

    /// Decode a set of enum-like flags, dropping duplicates.
    fn decode_flags<T>(&self, raw: &str) -> Result<HashSet<T>, DecodeError>
    where
        T: DeserializeOwned + Eq + Hash;

    /// Decode one page of a paginated result.
    fn decode_page<T: DeserializeOwned>(
        &self,
        raw: &str,
        total: Option<usize>,
    ) -> Result<Page<T>, DecodeError>;
}

/// The production decoder: plain serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    fn decode_one<T: DeserializeOwned>(&self, raw: &str) -> Result<T, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    fn decode_list<T: DeserializeOwned>(&self, raw: &str) -> Result<Vec<T>, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    fn decode_flags<T>(&self, raw: &str) -> Result<HashSet<T>, DecodeError>
    where
        T: DeserializeOwned + Eq + Hash,
    {
        let values: Vec<T> = serde_json::from_str(raw)?;
        Ok(values.into_iter().collect())
    }

    fn decode_page<T: DeserializeOwned>(
        &self,
        raw: &str,
        total: Option<usize>,
    ) -> Result<Page<T>, DecodeError> {
        let items: Vec<T> = serde_json::from_str(raw)?;
        Ok(Page { items, total })
    }
}
