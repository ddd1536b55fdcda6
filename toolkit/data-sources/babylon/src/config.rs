use figment::{Figment, providers::Env};
use log::info;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;

/// Configuration of the Babylon data sources
#[derive(Debug, Clone, Deserialize)]
pub struct BabylonDataSourceConfig {
	/// Address of the Babylon REST gateway, e.g. `http://localhost:1317`
	pub babylon_lcd_url: String,
	/// Timeout of a single gateway request
	#[serde(default = "default_request_timeout_secs")]
	pub babylon_request_timeout_secs: u64,
	/// Address of the finality contract. The contract reader is not created without it.
	#[serde(default)]
	pub finality_contract_address: Option<String>,
	/// Maximal number of pages read by a single paginated scan
	#[serde(default = "default_delegation_scan_max_pages")]
	pub delegation_scan_max_pages: u32,
}

fn default_request_timeout_secs() -> u64 {
	30
}

fn default_delegation_scan_max_pages() -> u32 {
	btc_staking_power::ScanConfig::DEFAULT_MAX_PAGES
}

impl BabylonDataSourceConfig {
	/// Reads the config from environment
	pub fn from_env() -> Result<Self, Box<dyn Error + Send + Sync + 'static>> {
		let config: Self = Figment::new()
			.merge(Env::raw())
			.extract()
			.map_err(|e| format!("Failed to read Babylon data source config: {e}"))?;
		if config.delegation_scan_max_pages == 0 {
			return Err("DELEGATION_SCAN_MAX_PAGES must be greater than 0".into());
		}
		info!("Using Babylon data source configuration: {config:?}");
		Ok(config)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.babylon_request_timeout_secs)
	}
}
