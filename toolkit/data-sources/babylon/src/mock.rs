use babylon_client::{BabylonClient, BabylonClientError, QueryParams};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

/// Client answering with canned JSON, keyed by path and pagination key
#[derive(Default)]
pub struct MockBabylonClient {
	responses: HashMap<String, Value>,
	hang: bool,
	pub requests: Mutex<Vec<(String, QueryParams)>>,
}

fn response_key(path: &str, page_key: Option<&str>) -> String {
	match page_key {
		Some(key) => format!("{path}?{key}"),
		None => path.to_string(),
	}
}

impl MockBabylonClient {
	pub fn with_response(mut self, path: &str, response: Value) -> Self {
		self.responses.insert(response_key(path, None), response);
		self
	}

	pub fn with_page(mut self, path: &str, page_key: &str, response: Value) -> Self {
		self.responses.insert(response_key(path, Some(page_key)), response);
		self
	}

	pub fn with_contract_response(self, contract: &str, query: Value, response: Value) -> Self {
		let path = smart_query_path(contract, &query);
		self.with_response(&path, response)
	}

	/// Requests never complete
	pub fn hanging() -> Self {
		Self { hang: true, ..Default::default() }
	}

	pub fn requested_params(&self) -> Vec<QueryParams> {
		self.requests.lock().unwrap().iter().map(|(_, params)| params.clone()).collect()
	}
}

pub fn smart_query_path(contract: &str, query: &Value) -> String {
	let encoded =
		base64::engine::general_purpose::URL_SAFE.encode(serde_json::to_vec(query).unwrap());
	format!("/cosmwasm/wasm/v1/contract/{contract}/smart/{encoded}")
}

impl BabylonClient for MockBabylonClient {
	fn request<T: DeserializeOwned>(
		&self,
		path: &str,
		params: QueryParams,
	) -> impl Future<Output = Result<T, BabylonClientError>> + Send {
		let key = response_key(path, params.get("pagination.key"));
		let response = self.responses.get(&key).cloned();
		self.requests.lock().unwrap().push((path.to_string(), params));
		let hang = self.hang;
		async move {
			if hang {
				std::future::pending::<()>().await;
			}
			let response = response.ok_or(BabylonClientError::NotFound(key))?;
			serde_json::from_value(response)
				.map_err(|e| BabylonClientError::ResponseError(e.to_string()))
		}
	}
}
