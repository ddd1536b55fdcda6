//! Query facade combining all power and activation computations

use crate::{
	BtcStakingDataSource, PowerObserver, Result, ScanConfig, activation, power,
	scanner::finality_provider_pages,
};
use async_trait::async_trait;
use btc_staking_domain::*;
use futures::TryStreamExt;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Power and activation queries about finality providers
#[async_trait]
pub trait FinalityPowerQueryApi {
	/// Returns keys of all finality providers registered for `consumer_id`
	async fn query_all_fp_btc_pks(&self, consumer_id: &str) -> Result<Vec<FpBtcPkHex>>;

	/// Returns voting power of each of `fps` at `btc_height`.
	/// The result has exactly one entry per distinct key.
	async fn query_multi_fp_power(
		&self,
		fps: &[FpBtcPkHex],
		btc_height: BtcHeight,
	) -> Result<BTreeMap<FpBtcPkHex, u64>>;

	/// Returns the earliest height at which any of `fps` became active,
	/// [ActivationHeight::NEVER] if none did.
	async fn query_earliest_active_del_btc_height(
		&self,
		fps: &[FpBtcPkHex],
	) -> Result<ActivationHeight>;

	/// Returns the earliest height at which `fp` became active,
	/// [ActivationHeight::NEVER] if it did not.
	async fn query_fp_earliest_active_del_btc_height(
		&self,
		fp: &FpBtcPkHex,
	) -> Result<ActivationHeight>;
}

/// [FinalityPowerQueryApi] implementation reading from a [BtcStakingDataSource]
pub struct FinalityPowerQuery {
	data_source: Arc<dyn BtcStakingDataSource + Send + Sync>,
	scan_config: ScanConfig,
	observer: Option<Arc<dyn PowerObserver + Send + Sync>>,
}

impl FinalityPowerQuery {
	/// Creates a query with the default scan configuration and no observer
	pub fn new(data_source: Arc<dyn BtcStakingDataSource + Send + Sync>) -> Self {
		Self { data_source, scan_config: ScanConfig::default(), observer: None }
	}

	/// Replaces the scan configuration
	pub fn with_scan_config(self, scan_config: ScanConfig) -> Self {
		Self { scan_config, ..self }
	}

	/// Sets the observer notified about every computed provider power
	pub fn with_observer(self, observer: Arc<dyn PowerObserver + Send + Sync>) -> Self {
		Self { observer: Some(observer), ..self }
	}
}

#[async_trait]
impl FinalityPowerQueryApi for FinalityPowerQuery {
	async fn query_all_fp_btc_pks(&self, consumer_id: &str) -> Result<Vec<FpBtcPkHex>> {
		finality_provider_pages(self.data_source.as_ref(), consumer_id, self.scan_config)
			.map_ok(|page| page.providers)
			.try_concat()
			.await
	}

	async fn query_multi_fp_power(
		&self,
		fps: &[FpBtcPkHex],
		btc_height: BtcHeight,
	) -> Result<BTreeMap<FpBtcPkHex, u64>> {
		power::query_multi_fp_power(
			self.data_source.as_ref(),
			fps,
			btc_height,
			self.scan_config,
			self.observer.as_deref(),
		)
		.await
	}

	async fn query_earliest_active_del_btc_height(
		&self,
		fps: &[FpBtcPkHex],
	) -> Result<ActivationHeight> {
		activation::query_earliest_active_del_btc_height(
			self.data_source.as_ref(),
			fps,
			self.scan_config,
		)
		.await
	}

	async fn query_fp_earliest_active_del_btc_height(
		&self,
		fp: &FpBtcPkHex,
	) -> Result<ActivationHeight> {
		activation::query_fp_earliest_active_del_btc_height(
			self.data_source.as_ref(),
			fp,
			self.scan_config,
		)
		.await
	}
}
