//! [BabylonClient] implementation over the Babylon REST (LCD) gateway.
//!
//! Requests are blocking HTTP calls, each one runs on the blocking thread pool of tokio,
//! so that many queries can be in flight at once.

use crate::{BabylonClient, BabylonClientError, QueryParams};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use ureq::Agent;
use url::Url;

/// Client of the Babylon REST gateway
#[derive(Clone)]
pub struct LcdClient {
	agent: Agent,
	addr: String,
}

impl LcdClient {
	/// Creates a client of the gateway at `addr`. Every request is bounded by `timeout`.
	pub fn new(addr: &str, timeout: Duration) -> Self {
		let agent = Agent::config_builder().timeout_per_call(Some(timeout)).build().into();
		LcdClient { agent, addr: addr.strip_suffix("/").unwrap_or(addr).to_string() }
	}

	fn url(&self, path: &str, params: &QueryParams) -> Result<Url, BabylonClientError> {
		let mut url = Url::parse(&format!("{}{}", self.addr, path))
			.map_err(|e| BabylonClientError::ParametersError(format!("{path}: {e}")))?;
		if !params.is_empty() {
			url.query_pairs_mut().extend_pairs(params.iter());
		}
		Ok(url)
	}
}

fn get_json(agent: &Agent, url: &Url) -> Result<serde_json::Value, BabylonClientError> {
	match agent.get(url.as_str()).call() {
		Ok(mut response) => response
			.body_mut()
			.read_json()
			.map_err(|e| BabylonClientError::ResponseError(e.to_string())),
		Err(ureq::Error::StatusCode(404)) => Err(BabylonClientError::NotFound(url.to_string())),
		Err(e) => Err(BabylonClientError::RequestError(e.to_string())),
	}
}

impl BabylonClient for LcdClient {
	fn request<T: DeserializeOwned>(
		&self,
		path: &str,
		params: QueryParams,
	) -> impl Future<Output = Result<T, BabylonClientError>> + Send {
		let agent = self.agent.clone();
		let url = self.url(path, &params);
		async move {
			let url = url?;
			log::trace!("Babylon request: {url}");
			let response = tokio::task::spawn_blocking(move || get_json(&agent, &url))
				.await
				.map_err(|e| BabylonClientError::RequestError(e.to_string()))?;
			log::trace!("Babylon response: {response:?}");
			serde_json::from_value(response?)
				.map_err(|e| BabylonClientError::ResponseError(e.to_string()))
		}
	}
}
