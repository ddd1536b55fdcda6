//! Queries of the `babylon/btcstaking/v1` module.

use crate::{
	BabylonClient, BabylonClientError, PageRequest, QueryParams, path_segment,
	types::{PageResponse, null_as_default, parse_str_or_number},
};
use base64::Engine;
use serde::Deserialize;
use std::future::Future;

/// Trait that defines the queries of the BTC staking module
pub trait QueryBtcStaking {
	/// Returns finality providers registered for the consumer `bsn_id`.
	fn finality_providers(
		&self,
		bsn_id: &str,
		pagination: PageRequest,
	) -> impl Future<Output = Result<FinalityProvidersResponse, BabylonClientError>> + Send;

	/// Returns delegations made to the finality provider with key `fp_btc_pk_hex`.
	fn finality_provider_delegations(
		&self,
		fp_btc_pk_hex: &str,
		pagination: PageRequest,
	) -> impl Future<Output = Result<FinalityProviderDelegationsResponse, BabylonClientError>>
	+ Send;

	/// Returns the current parameters of the BTC staking module.
	fn btc_staking_params(
		&self,
	) -> impl Future<Output = Result<BtcStakingParamsResponse, BabylonClientError>> + Send;
}

impl<T: BabylonClient + Sync> QueryBtcStaking for T {
	async fn finality_providers(
		&self,
		bsn_id: &str,
		pagination: PageRequest,
	) -> Result<FinalityProvidersResponse, BabylonClientError> {
		let bsn_id = path_segment(bsn_id)?;
		self.request(
			&format!("/babylon/btcstaking/v1/finality_providers/{bsn_id}"),
			pagination.to_params(),
		)
		.await
	}

	async fn finality_provider_delegations(
		&self,
		fp_btc_pk_hex: &str,
		pagination: PageRequest,
	) -> Result<FinalityProviderDelegationsResponse, BabylonClientError> {
		let fp_btc_pk_hex = path_segment(fp_btc_pk_hex)?;
		self.request(
			&format!("/babylon/btcstaking/v1/finality_providers/{fp_btc_pk_hex}/delegations"),
			pagination.to_params(),
		)
		.await
	}

	async fn btc_staking_params(&self) -> Result<BtcStakingParamsResponse, BabylonClientError> {
		self.request("/babylon/btcstaking/v1/params", QueryParams::new()).await
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FinalityProvidersResponse {
	#[serde(default, deserialize_with = "null_as_default")]
	pub finality_providers: Vec<FinalityProviderResponse>,
	#[serde(default)]
	pub pagination: Option<PageResponse>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FinalityProviderResponse {
	/// BIP-340 key of the finality provider
	pub btc_pk: String,
	/// Babylon address of the finality provider
	#[serde(default)]
	pub addr: String,
	#[serde(default)]
	pub bsn_id: String,
	#[serde(default)]
	pub jailed: bool,
}

impl FinalityProviderResponse {
	/// Returns the key of the provider as hex.
	///
	/// The gateway renders the key as hex, but plain protobuf JSON renders bytes as base64,
	/// so base64 is accepted too.
	pub fn btc_pk_hex(&self) -> Result<String, BabylonClientError> {
		if hex::decode(&self.btc_pk).is_ok() {
			return Ok(self.btc_pk.clone());
		}
		base64::engine::general_purpose::STANDARD
			.decode(&self.btc_pk)
			.map(hex::encode)
			.map_err(|_| {
				BabylonClientError::ResponseError(format!(
					"finality provider key '{}' is neither hex nor base64",
					self.btc_pk
				))
			})
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FinalityProviderDelegationsResponse {
	#[serde(default, deserialize_with = "null_as_default")]
	pub btc_delegator_delegations: Vec<BtcDelegatorDelegationsResponse>,
	#[serde(default)]
	pub pagination: Option<PageResponse>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BtcDelegatorDelegationsResponse {
	#[serde(default, deserialize_with = "null_as_default")]
	pub dels: Vec<BtcDelegationResponse>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BtcDelegationResponse {
	#[serde(default)]
	pub staking_tx_hex: String,
	#[serde(deserialize_with = "parse_str_or_number")]
	pub start_height: u32,
	#[serde(deserialize_with = "parse_str_or_number")]
	pub end_height: u32,
	#[serde(deserialize_with = "parse_str_or_number")]
	pub total_sat: u64,
	/// Covenant adaptor signatures over the slashing transaction, only their number matters here
	#[serde(default, deserialize_with = "null_as_default")]
	pub covenant_sigs: Vec<serde_json::Value>,
	#[serde(default)]
	pub active: bool,
	#[serde(default)]
	pub status_desc: String,
	#[serde(default)]
	pub undelegation_response: Option<BtcUndelegationResponse>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BtcUndelegationResponse {
	#[serde(default, deserialize_with = "null_as_default")]
	pub covenant_unbonding_sig_list: Vec<serde_json::Value>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub covenant_slashing_sigs: Vec<serde_json::Value>,
	/// Present once the delegator asked for unbonding
	#[serde(default)]
	pub delegator_unbonding_info_response: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct BtcStakingParamsResponse {
	pub params: BtcStakingParams,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct BtcStakingParams {
	#[serde(deserialize_with = "parse_str_or_number")]
	pub covenant_quorum: u32,
	#[serde(default, deserialize_with = "null_as_default")]
	pub covenant_pks: Vec<String>,
}
