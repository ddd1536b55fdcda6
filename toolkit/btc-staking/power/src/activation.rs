//! Earliest height at which finality providers became active

use crate::{
	BtcStakingDataSource, PowerQueryError, Result, ScanConfig, activity::first_activation_height,
	power::fetch_protocol_parameters, scanner::fold_delegations,
};
use btc_staking_domain::*;
use log::debug;

/// Returns the lowest first activation height among all delegations made to `fp`,
/// or [ActivationHeight::NEVER] if none of them has been activated.
pub async fn query_fp_earliest_active_del_btc_height(
	data_source: &(dyn BtcStakingDataSource + Send + Sync),
	fp: &FpBtcPkHex,
	config: ScanConfig,
) -> Result<ActivationHeight> {
	let params = fetch_protocol_parameters(data_source).await?;
	let chain_tip = data_source
		.chain_tip()
		.await
		.map_err(PowerQueryError::data_source("BTC light client tip"))?;

	let earliest =
		fold_delegations(data_source, fp, config, ActivationHeight::NEVER, |earliest, delegation| {
			let activation = first_activation_height(
				delegation,
				chain_tip,
				params.confirmation_depth,
				params.covenant_quorum,
			);
			earliest.min(activation)
		})
		.await?;
	debug!("Earliest activation of {fp} with BTC tip at {chain_tip} is {earliest}");
	Ok(earliest)
}

/// Returns the lowest earliest activation height among `fps`.
///
/// Providers are queried one after another, the first failure is returned immediately.
pub async fn query_earliest_active_del_btc_height(
	data_source: &(dyn BtcStakingDataSource + Send + Sync),
	fps: &[FpBtcPkHex],
	config: ScanConfig,
) -> Result<ActivationHeight> {
	let mut earliest = ActivationHeight::NEVER;
	for fp in fps {
		let fp_earliest = query_fp_earliest_active_del_btc_height(data_source, fp, config).await?;
		earliest = earliest.min(fp_earliest);
	}
	Ok(earliest)
}
