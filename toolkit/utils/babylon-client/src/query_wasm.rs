//! Queries of the `cosmwasm/wasm/v1` module.

use crate::{BabylonClient, BabylonClientError, QueryParams, path_segment};
use base64::Engine;
use serde::Deserialize;
use std::future::Future;

pub trait QueryWasm {
	/// Runs the smart query `query_data` (JSON) against the contract at `contract_address`.
	///
	/// Returns the JSON encoded query result, or an empty vector if the contract
	/// returned no data.
	fn smart_contract_state(
		&self,
		contract_address: &str,
		query_data: &[u8],
	) -> impl Future<Output = Result<Vec<u8>, BabylonClientError>> + Send;
}

impl<T: BabylonClient + Sync> QueryWasm for T {
	async fn smart_contract_state(
		&self,
		contract_address: &str,
		query_data: &[u8],
	) -> Result<Vec<u8>, BabylonClientError> {
		let contract_address = path_segment(contract_address)?;
		let query_data = base64::engine::general_purpose::URL_SAFE.encode(query_data);
		let response: SmartContractStateResponse = self
			.request(
				&format!("/cosmwasm/wasm/v1/contract/{contract_address}/smart/{query_data}"),
				QueryParams::new(),
			)
			.await?;
		response.into_bytes()
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SmartContractStateResponse {
	#[serde(default)]
	pub data: serde_json::Value,
}

impl SmartContractStateResponse {
	pub fn into_bytes(self) -> Result<Vec<u8>, BabylonClientError> {
		if self.data.is_null() {
			return Ok(Vec::new());
		}
		serde_json::to_vec(&self.data).map_err(|e| BabylonClientError::ResponseError(e.to_string()))
	}
}
