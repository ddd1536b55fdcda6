//! Finality contract reader
//!
//! The finality contract deployed on Babylon collects finality votes of the consumer chain.
//! Queries are smart queries run through the REST gateway, each one bounded by
//! [DEFAULT_CONTRACT_QUERY_TIMEOUT].
use crate::metrics::DataSourceMetrics;
use crate::observed_async_trait;
use async_trait::async_trait;
use babylon_client::{BabylonClient, BabylonClientError, query_wasm::QueryWasm};
use btc_staking_domain::{ContractConfig, L2Block};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

pub const DEFAULT_CONTRACT_QUERY_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum ContractQueryError {
	#[error("Finality contract query failed: {0}")]
	Client(#[from] BabylonClientError),
	#[error("Could not decode finality contract response: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("Finality contract query timed out after {0:?}")]
	Timeout(Duration),
}

/// Queries of the finality contract
#[async_trait]
pub trait FinalityContractDataSource {
	/// Returns keys of the finality providers that voted for `block`
	async fn query_block_voters(&self, block: &L2Block) -> Result<Vec<String>, ContractQueryError>;

	/// Returns the configuration of the contract
	async fn query_config(&self) -> Result<ContractConfig, ContractQueryError>;

	/// Returns the consumer id the contract is registered for
	async fn query_consumer_id(&self) -> Result<String, ContractQueryError>;
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum QueryMsg {
	BlockVoters { hash_hex: String, height: u64 },
	Config {},
}

/// Vote of a single provider, only the key is of interest here
#[derive(Deserialize)]
struct BlockVoterInfo {
	fp_btc_pk_hex: String,
}

pub struct FinalityContractDataSourceImpl<C> {
	client: C,
	contract_address: String,
	query_timeout: Duration,
	/// Prometheus metrics client
	metrics_opt: Option<DataSourceMetrics>,
}

impl<C: BabylonClient + Sync> FinalityContractDataSourceImpl<C> {
	pub fn new(
		client: C,
		contract_address: String,
		metrics_opt: Option<DataSourceMetrics>,
	) -> Self {
		Self {
			client,
			contract_address,
			query_timeout: DEFAULT_CONTRACT_QUERY_TIMEOUT,
			metrics_opt,
		}
	}

	async fn query_raw(&self, msg: &QueryMsg) -> Result<Vec<u8>, ContractQueryError> {
		let query_data = serde_json::to_vec(msg)?;
		let query = self.client.smart_contract_state(&self.contract_address, &query_data);
		tokio::time::timeout(self.query_timeout, query)
			.await
			.map_err(|_| ContractQueryError::Timeout(self.query_timeout))?
			.map_err(ContractQueryError::from)
	}

	async fn query<T: DeserializeOwned>(&self, msg: &QueryMsg) -> Result<T, ContractQueryError> {
		Ok(serde_json::from_slice(&self.query_raw(msg).await?)?)
	}
}

observed_async_trait!(
impl<C: BabylonClient + Send + Sync> FinalityContractDataSource
	for FinalityContractDataSourceImpl<C>
{
	async fn query_block_voters(&self, block: &L2Block) -> Result<Vec<String>, ContractQueryError> {
		let msg = QueryMsg::BlockVoters {
			hash_hex: block.block_hash.clone(),
			height: block.block_height,
		};
		let data = self.query_raw(&msg).await?;
		if data.is_empty() {
			return Ok(Vec::new());
		}
		let voters: Option<Vec<BlockVoterInfo>> = serde_json::from_slice(&data)?;
		Ok(voters.unwrap_or_default().into_iter().map(|voter| voter.fp_btc_pk_hex).collect())
	}

	async fn query_config(&self) -> Result<ContractConfig, ContractQueryError> {
		self.query(&QueryMsg::Config {}).await
	}

	async fn query_consumer_id(&self) -> Result<String, ContractQueryError> {
		self.query_config().await.map(|config| config.consumer_id)
	}
});
