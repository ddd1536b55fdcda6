use babylon_client::{BabylonClient, BabylonClientError, QueryParams};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Mutex;

/// Answers every request with the same JSON and records requested paths and params
pub struct FixtureClient {
	response: Value,
	pub requests: Mutex<Vec<(String, QueryParams)>>,
}

impl FixtureClient {
	pub fn new(response: Value) -> Self {
		Self { response, requests: Mutex::new(Vec::new()) }
	}

	pub fn single_request(&self) -> (String, QueryParams) {
		let requests = self.requests.lock().unwrap();
		assert_eq!(requests.len(), 1, "expected exactly one request, got {requests:?}");
		requests[0].clone()
	}
}

impl BabylonClient for FixtureClient {
	fn request<T: DeserializeOwned>(
		&self,
		path: &str,
		params: QueryParams,
	) -> impl Future<Output = Result<T, BabylonClientError>> + Send {
		self.requests.lock().unwrap().push((path.to_string(), params));
		let response = self.response.clone();
		async move {
			serde_json::from_value(response)
				.map_err(|e| BabylonClientError::ResponseError(e.to_string()))
		}
	}
}
