//! Voting power of finality providers

use crate::{
	BtcStakingDataSource, PowerObserver, PowerQueryError, Result, ScanConfig,
	activity::is_delegation_active, scanner::fold_delegations,
};
use btc_staking_domain::*;
use futures::future::try_join_all;
use log::debug;
use std::collections::BTreeMap;

/// Fetches the parameters shared by all delegations evaluated in one query
pub async fn fetch_protocol_parameters(
	data_source: &(dyn BtcStakingDataSource + Send + Sync),
) -> Result<ProtocolParameters> {
	let checkpoint_params = data_source
		.checkpoint_params()
		.await
		.map_err(PowerQueryError::data_source("BTC checkpoint parameters"))?;
	let covenant_quorum = data_source
		.covenant_quorum()
		.await
		.map_err(PowerQueryError::data_source("BTC staking parameters"))?;
	Ok(ProtocolParameters {
		confirmation_depth: checkpoint_params.btc_confirmation_depth,
		finalization_timeout: checkpoint_params.checkpoint_finalization_timeout,
		covenant_quorum,
	})
}

/// Sums the stake of delegations to `fp` that are active at `btc_height`.
///
/// `params` are expected to be fetched by the caller, so that one fetch serves many providers.
pub async fn query_fp_power(
	data_source: &(dyn BtcStakingDataSource + Send + Sync),
	fp: &FpBtcPkHex,
	btc_height: BtcHeight,
	params: &ProtocolParameters,
	config: ScanConfig,
) -> Result<u64> {
	let params = *params;
	let power = fold_delegations(data_source, fp, config, 0u64, |power, delegation| {
		if is_delegation_active(delegation, btc_height, &params) {
			power.saturating_add(delegation.total_sat)
		} else {
			power
		}
	})
	.await?;
	debug!("Power of {fp} at BTC height {btc_height} is {power}");
	Ok(power)
}

/// Computes the power of every provider in `fps` at `btc_height`, concurrently.
///
/// Protocol parameters are fetched once and shared. Duplicated keys are computed
/// independently and end up as a single entry. The first failure is returned and the
/// remaining computations are dropped.
pub async fn query_multi_fp_power(
	data_source: &(dyn BtcStakingDataSource + Send + Sync),
	fps: &[FpBtcPkHex],
	btc_height: BtcHeight,
	config: ScanConfig,
	observer: Option<&(dyn PowerObserver + Send + Sync)>,
) -> Result<BTreeMap<FpBtcPkHex, u64>> {
	let params = fetch_protocol_parameters(data_source).await?;
	debug!(
		"Computing power of {} finality providers at BTC height {btc_height} with {params:?}",
		fps.len()
	);

	let powers = try_join_all(fps.iter().map(|fp| async move {
		let power = query_fp_power(data_source, fp, btc_height, &params, config).await?;
		if let Some(observer) = observer {
			observer.on_fp_power(fp, btc_height, power);
		}
		Result::Ok((fp.clone(), power))
	}))
	.await?;

	Ok(powers.into_iter().collect())
}
