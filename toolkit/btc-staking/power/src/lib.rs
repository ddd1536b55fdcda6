//! # BTC staking power
//!
//! Computes the voting power of finality providers and the height at which they became
//! active, from the BTC delegation records kept by the staking ledger.
//!
//! All computations are done from data fetched anew on every call, through the
//! [BtcStakingDataSource] capability. Nothing is cached between calls: protocol parameters
//! and the Bitcoin chain tip are fetched once per call and then shared read-only by all
//! the work done for that call.
//!
//! The main entry point is [FinalityPowerQuery], which implements [FinalityPowerQueryApi]:
//! ```rust,no_run
//! use btc_staking_power::*;
//! use btc_staking_domain::*;
//! use std::sync::Arc;
//!
//! async fn print_power(data_source: Arc<dyn BtcStakingDataSource + Send + Sync>) {
//! 	let query = FinalityPowerQuery::new(data_source);
//! 	let fps = vec![FpBtcPkHex::from("02aa"), FpBtcPkHex::from("02bb")];
//! 	let powers = query.query_multi_fp_power(&fps, BtcHeight(870_000)).await.unwrap();
//! 	for (fp, power) in powers {
//! 		println!("{fp}: {power}");
//! 	}
//! }
//! ```

#![deny(missing_docs)]

pub mod activation;
pub mod activity;
pub mod power;
pub mod query;
pub mod scanner;

#[cfg(test)]
mod mock;

pub use query::{FinalityPowerQuery, FinalityPowerQueryApi};

use async_trait::async_trait;
use btc_staking_domain::*;

/// Error type returned by [BtcStakingDataSource] implementations
pub type DataSourceError = Box<dyn std::error::Error + Send + Sync>;

/// Result type of [BtcStakingDataSource] methods
pub type DataSourceResult<T> = std::result::Result<T, DataSourceError>;

/// Errors returned by power and activation queries
#[derive(Debug, thiserror::Error)]
pub enum PowerQueryError {
	/// Fetching data from the ledger failed. Partial results are discarded.
	#[error("Failed to fetch {what} from the BTC staking data source: {source}")]
	DataSource {
		/// Description of the data that was being fetched
		what: String,
		/// Error returned by the data source
		#[source]
		source: DataSourceError,
	},
}

impl PowerQueryError {
	pub(crate) fn data_source(what: impl Into<String>) -> impl FnOnce(DataSourceError) -> Self {
		let what = what.into();
		move |source| PowerQueryError::DataSource { what, source }
	}
}

/// Result type of power and activation queries
pub type Result<T> = std::result::Result<T, PowerQueryError>;

/// Parameters of the BTC checkpointing module
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckpointParams {
	/// Number of Bitcoin blocks a staking transaction has to be buried under (`k`)
	pub btc_confirmation_depth: u32,
	/// Number of Bitcoin blocks after which a checkpoint is considered final (`w`)
	pub checkpoint_finalization_timeout: u32,
}

/// Remote ledger capabilities needed to compute power and activation heights.
#[async_trait]
pub trait BtcStakingDataSource {
	/// Returns one page of finality providers registered for `consumer_id`.
	/// `page_key` is `None` for the first page.
	async fn finality_providers_page(
		&self,
		consumer_id: &str,
		page_key: Option<PageKey>,
	) -> DataSourceResult<FinalityProvidersPage>;

	/// Returns one page of delegations made to the finality provider `fp`.
	/// `page_key` is `None` for the first page.
	async fn delegations_page(
		&self,
		fp: &FpBtcPkHex,
		page_key: Option<PageKey>,
	) -> DataSourceResult<DelegationsPage>;

	/// Returns the current parameters of the BTC checkpointing module
	async fn checkpoint_params(&self) -> DataSourceResult<CheckpointParams>;

	/// Returns the current covenant quorum of the BTC staking module
	async fn covenant_quorum(&self) -> DataSourceResult<u32>;

	/// Returns the height of the tip of the Bitcoin light client
	async fn chain_tip(&self) -> DataSourceResult<BtcHeight>;
}

/// Receives the outcome of every successful single provider power aggregation.
pub trait PowerObserver {
	/// Called once per provider after its power at `btc_height` was computed
	fn on_fp_power(&self, fp: &FpBtcPkHex, btc_height: BtcHeight, power: u64);
}

/// Bounds of paginated scans
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanConfig {
	/// Maximal number of pages consumed by a single scan.
	/// Reaching it ends the scan without an error.
	pub max_pages: u32,
}

impl ScanConfig {
	/// Default page ceiling
	pub const DEFAULT_MAX_PAGES: u32 = 500;
}

impl Default for ScanConfig {
	fn default() -> Self {
		Self { max_pages: Self::DEFAULT_MAX_PAGES }
	}
}
