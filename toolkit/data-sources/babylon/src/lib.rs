//! Implementations of the BTC staking data sources that read from the Babylon REST gateway.
//!
//! ## Configuration
//! Data sources are configured with environment variables, see [BabylonDataSourceConfig]:
//! * `BABYLON_LCD_URL` - address of the REST gateway of a Babylon node (required),
//! * `BABYLON_REQUEST_TIMEOUT_SECS` - timeout of a single gateway request, 30 by default,
//! * `FINALITY_CONTRACT_ADDRESS` - address of the finality contract,
//!   the contract reader is available only when it is set,
//! * `DELEGATION_SCAN_MAX_PAGES` - page ceiling of paginated scans, 500 by default.
//!
//! ## Metrics
//! When a Prometheus registry is given, every data source method call is counted and timed,
//! and the latest computed voting power of each finality provider is exported as
//! `finality_gadget_fp_latest_voting_power`.

pub mod btc_staking;
pub mod config;
pub mod contract;
pub mod metrics;

#[cfg(test)]
mod mock;

pub use btc_staking::BtcStakingDataSourceImpl;
pub use config::BabylonDataSourceConfig;
pub use contract::{
	ContractQueryError, DEFAULT_CONTRACT_QUERY_TIMEOUT, FinalityContractDataSource,
	FinalityContractDataSourceImpl,
};

use babylon_client::lcd::LcdClient;
use btc_staking_power::{FinalityPowerQuery, FinalityPowerQueryApi, ScanConfig};
use metrics::{register_metrics_warn_errors, register_power_metrics_warn_errors};
use std::sync::Arc;
use substrate_prometheus_endpoint::Registry;

#[derive(Clone)]
pub struct BabylonDataSources {
	pub power_query: Arc<dyn FinalityPowerQueryApi + Send + Sync>,
	pub finality_contract: Option<Arc<dyn FinalityContractDataSource + Send + Sync>>,
}

impl BabylonDataSources {
	pub fn new_from_env(
		metrics_registry_opt: Option<&Registry>,
	) -> Result<Self, Box<dyn std::error::Error + Send + Sync + 'static>> {
		let config = BabylonDataSourceConfig::from_env()?;
		Ok(create_babylon_data_sources(&config, metrics_registry_opt))
	}
}

/// Creates the power query and the contract reader sharing one gateway client
pub fn create_babylon_data_sources(
	config: &BabylonDataSourceConfig,
	metrics_registry_opt: Option<&Registry>,
) -> BabylonDataSources {
	let metrics_opt = register_metrics_warn_errors(metrics_registry_opt);
	let client = LcdClient::new(&config.babylon_lcd_url, config.request_timeout());

	let data_source = BtcStakingDataSourceImpl::new(client.clone(), metrics_opt.clone());
	let mut power_query = FinalityPowerQuery::new(Arc::new(data_source))
		.with_scan_config(ScanConfig { max_pages: config.delegation_scan_max_pages });
	if let Some(power_metrics) = register_power_metrics_warn_errors(metrics_registry_opt) {
		power_query = power_query.with_observer(Arc::new(power_metrics));
	}

	let finality_contract = config.finality_contract_address.clone().map(|address| {
		Arc::new(FinalityContractDataSourceImpl::new(client, address, metrics_opt))
			as Arc<dyn FinalityContractDataSource + Send + Sync>
	});

	BabylonDataSources { power_query: Arc::new(power_query), finality_contract }
}
