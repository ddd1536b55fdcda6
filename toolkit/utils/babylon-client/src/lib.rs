//! This crate provides a high-level API for querying the Babylon REST (LCD) gateway
//! for data needed to compute BTC staking power of finality providers.
//!
//! Queries are grouped into traits by the Babylon module they target. Each trait is
//! implemented for every [BabylonClient], so a single transport serves all of them.

pub mod query_btc_checkpoint;
pub mod query_btc_staking;
pub mod query_wasm;
pub mod types;

#[cfg(feature = "lcd-client")]
pub mod lcd;

use serde::de::DeserializeOwned;
use std::future::Future;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BabylonClientError {
	#[error("Couldn't construct request: '{0}'")]
	ParametersError(String),
	#[error("Babylon request failed: '{0}'")]
	RequestError(String),
	#[error("Could not parse response: '{0}'")]
	ResponseError(String),
	#[error("Not found: '{0}'")]
	NotFound(String),
}

/// Transport of Babylon queries
pub trait BabylonClient {
	/// Performs a GET request of `path` with query string built from `params`
	/// and deserializes the JSON response.
	fn request<T: DeserializeOwned>(
		&self,
		path: &str,
		params: QueryParams,
	) -> impl Future<Output = Result<T, BabylonClientError>> + Send;
}

/// Query string parameters, in insertion order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(mut self, key: &'static str, value: impl ToString) -> Self {
		self.0.push((key, value.to_string()));
		self
	}

	pub fn insert_opt(self, key: &'static str, value: Option<impl ToString>) -> Self {
		match value {
			Some(value) => self.insert(key, value),
			None => self,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
		self.0.iter().map(|(key, value)| (*key, value.as_str()))
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.iter().find(|(k, _)| *k == key).map(|(_, value)| value)
	}
}

/// Escapes `value` for use as a single path segment.
///
/// Every character that could change the structure of the URL (`/`, `?`, `#`, `%`, ...)
/// is percent-encoded. Empty and dot segments are rejected.
pub fn path_segment(value: &str) -> Result<String, BabylonClientError> {
	if matches!(value, "" | "." | "..") {
		return Err(BabylonClientError::ParametersError(format!(
			"'{value}' is not a valid path segment"
		)));
	}
	Ok(url::form_urlencoded::byte_serialize(value.as_bytes()).collect())
}

/// Cosmos SDK pagination of list queries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
	/// `next_key` returned with the previous page, `None` for the first page
	pub key: Option<String>,
	/// Maximal number of entries on a page, server default if `None`
	pub limit: Option<u64>,
}

impl PageRequest {
	pub fn to_params(&self) -> QueryParams {
		QueryParams::new()
			.insert_opt("pagination.key", self.key.as_ref())
			.insert_opt("pagination.limit", self.limit)
	}
}
