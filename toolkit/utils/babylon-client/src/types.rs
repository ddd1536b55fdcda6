//! Types shared by responses of different Babylon modules, and deserialization helpers
//! for the Cosmos SDK JSON encoding.

use serde::{Deserialize, Deserializer};
use std::{fmt::Display, str::FromStr};

/// Cosmos SDK pagination of list responses
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PageResponse {
	/// Key of the next page, `None` or empty on the last page
	#[serde(default)]
	pub next_key: Option<String>,
	/// Total number of entries, only filled when requested
	#[serde(default, deserialize_with = "parse_str_or_number")]
	pub total: u64,
}

/// Cosmos SDK JSON encodes 64-bit integers as strings, and smaller ones as numbers.
/// This accepts both.
pub fn parse_str_or_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: FromStr + Deserialize<'de>,
	T::Err: Display,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum StrOrNumber<T> {
		Str(String),
		Number(T),
	}

	match StrOrNumber::<T>::deserialize(deserializer)? {
		StrOrNumber::Str(value) => value.parse().map_err(serde::de::Error::custom),
		StrOrNumber::Number(value) => Ok(value),
	}
}

/// Deserializes `null` as the default value of `T`
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[derive(Debug, Deserialize, PartialEq)]
	struct Amount {
		#[serde(deserialize_with = "parse_str_or_number")]
		value: u64,
	}

	#[test]
	fn integers_are_accepted_as_strings_and_numbers() {
		let from_str: Amount =
			serde_json::from_value(json!({"value": "18446744073709551615"})).unwrap();
		let from_number: Amount = serde_json::from_value(json!({"value": 42})).unwrap();
		assert_eq!(from_str, Amount { value: u64::MAX });
		assert_eq!(from_number, Amount { value: 42 });
		assert!(serde_json::from_value::<Amount>(json!({"value": "forty two"})).is_err());
	}

	#[test]
	fn page_response_with_null_next_key() {
		let page: PageResponse =
			serde_json::from_value(json!({"next_key": null, "total": "0"})).unwrap();
		assert_eq!(page, PageResponse { next_key: None, total: 0 });
	}
}
