//! Queries of the `babylon/btccheckpoint/v1` and `babylon/btclightclient/v1` modules.

use crate::{BabylonClient, BabylonClientError, QueryParams, types::parse_str_or_number};
use serde::Deserialize;
use std::future::Future;

pub trait QueryBtcCheckpoint {
	/// Returns the current parameters of the BTC checkpoint module.
	fn btc_checkpoint_params(
		&self,
	) -> impl Future<Output = Result<BtcCheckpointParamsResponse, BabylonClientError>> + Send;
}

pub trait QueryBtcLightClient {
	/// Returns the tip of the Bitcoin header chain known to Babylon.
	fn btc_header_chain_tip(
		&self,
	) -> impl Future<Output = Result<BtcHeaderChainTipResponse, BabylonClientError>> + Send;
}

impl<T: BabylonClient + Sync> QueryBtcCheckpoint for T {
	async fn btc_checkpoint_params(
		&self,
	) -> Result<BtcCheckpointParamsResponse, BabylonClientError> {
		self.request("/babylon/btccheckpoint/v1/params", QueryParams::new()).await
	}
}

impl<T: BabylonClient + Sync> QueryBtcLightClient for T {
	async fn btc_header_chain_tip(&self) -> Result<BtcHeaderChainTipResponse, BabylonClientError> {
		self.request("/babylon/btclightclient/v1/tip", QueryParams::new()).await
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct BtcCheckpointParamsResponse {
	pub params: BtcCheckpointParams,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct BtcCheckpointParams {
	/// `k`
	#[serde(deserialize_with = "parse_str_or_number")]
	pub btc_confirmation_depth: u32,
	/// `w`
	#[serde(deserialize_with = "parse_str_or_number")]
	pub checkpoint_finalization_timeout: u32,
	#[serde(default)]
	pub checkpoint_tag: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct BtcHeaderChainTipResponse {
	pub header: BtcHeaderInfo,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct BtcHeaderInfo {
	#[serde(default)]
	pub hash_hex: String,
	#[serde(deserialize_with = "parse_str_or_number")]
	pub height: u32,
	#[serde(default)]
	pub work: String,
}
