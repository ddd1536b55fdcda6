//! BTC staking data source reading from the Babylon REST gateway
use crate::metrics::DataSourceMetrics;
use crate::observed_async_trait;
use babylon_client::{
	BabylonClient, BabylonClientError, PageRequest,
	query_btc_checkpoint::{QueryBtcCheckpoint, QueryBtcLightClient},
	query_btc_staking::{BtcDelegationResponse, QueryBtcStaking},
};
use btc_staking_domain::*;
use btc_staking_power::{BtcStakingDataSource, CheckpointParams, DataSourceResult};

/// Number of delegations requested per page
pub const DELEGATIONS_PAGE_LIMIT: u64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum BtcStakingDataSourceError {
	#[error("Invalid finality provider key '{0}', hex expected")]
	InvalidFpKey(FpBtcPkHex),
}

/// Babylon data source serving BTC staking data
#[derive(derive_new::new)]
pub struct BtcStakingDataSourceImpl<C> {
	/// Babylon REST gateway client
	client: C,
	/// Prometheus metrics client
	metrics_opt: Option<DataSourceMetrics>,
}

observed_async_trait!(
impl<C: BabylonClient + Send + Sync> BtcStakingDataSource for BtcStakingDataSourceImpl<C> {
	async fn finality_providers_page(
		&self,
		consumer_id: &str,
		page_key: Option<PageKey>,
	) -> DataSourceResult<FinalityProvidersPage> {
		let page = PageRequest { key: page_key.map(String::from), limit: None };
		let response = self.client.finality_providers(consumer_id, page).await?;
		let providers = response
			.finality_providers
			.iter()
			.map(|fp| fp.btc_pk_hex().map(FpBtcPkHex))
			.collect::<Result<Vec<_>, BabylonClientError>>()?;
		Ok(FinalityProvidersPage {
			providers,
			next_key: PageKey::from_next_key(response.pagination.and_then(|p| p.next_key)),
		})
	}

	async fn delegations_page(
		&self,
		fp: &FpBtcPkHex,
		page_key: Option<PageKey>,
	) -> DataSourceResult<DelegationsPage> {
		if !fp.is_valid_hex() {
			return Err(BtcStakingDataSourceError::InvalidFpKey(fp.clone()).into());
		}
		let pagination =
			PageRequest { key: page_key.map(String::from), limit: Some(DELEGATIONS_PAGE_LIMIT) };
		let response = self
			.client
			.finality_provider_delegations(fp.as_str(), pagination)
			.await?;
		let delegations = response
			.btc_delegator_delegations
			.iter()
			.flat_map(|delegator| delegator.dels.iter())
			.map(to_delegation_record)
			.collect();
		Ok(DelegationsPage {
			delegations,
			next_key: PageKey::from_next_key(response.pagination.and_then(|p| p.next_key)),
		})
	}

	async fn checkpoint_params(&self) -> DataSourceResult<CheckpointParams> {
		let response = self.client.btc_checkpoint_params().await?;
		Ok(CheckpointParams {
			btc_confirmation_depth: response.params.btc_confirmation_depth,
			checkpoint_finalization_timeout: response.params.checkpoint_finalization_timeout,
		})
	}

	async fn covenant_quorum(&self) -> DataSourceResult<u32> {
		let response = self.client.btc_staking_params().await?;
		Ok(response.params.covenant_quorum)
	}

	async fn chain_tip(&self) -> DataSourceResult<BtcHeight> {
		let response = self.client.btc_header_chain_tip().await?;
		Ok(BtcHeight(response.header.height))
	}
});

fn sig_count<T>(sigs: &[T]) -> u32 {
	u32::try_from(sigs.len()).unwrap_or(u32::MAX)
}

fn to_delegation_record(del: &BtcDelegationResponse) -> DelegationRecord {
	let undelegation = del.undelegation_response.as_ref();
	DelegationRecord {
		start_height: del.start_height,
		end_height: del.end_height,
		total_sat: del.total_sat,
		covenant_sig_count: sig_count(&del.covenant_sigs),
		covenant_unbonding_sig_count: undelegation
			.map_or(0, |u| sig_count(&u.covenant_unbonding_sig_list)),
		covenant_slashing_sig_count: undelegation
			.map_or(0, |u| sig_count(&u.covenant_slashing_sigs)),
		has_delegator_unbonding: undelegation
			.is_some_and(|u| u.delegator_unbonding_info_response.is_some()),
	}
}
