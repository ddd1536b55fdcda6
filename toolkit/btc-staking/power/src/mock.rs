use crate::{BtcStakingDataSource, CheckpointParams, DataSourceResult};
use async_trait::async_trait;
use btc_staking_domain::*;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_PARAMS: ProtocolParameters =
	ProtocolParameters { confirmation_depth: 10, finalization_timeout: 5, covenant_quorum: 3 };

/// Delegation active at heights 110..=195 under [TEST_PARAMS]
pub fn delegation_with_stake(total_sat: u64) -> DelegationRecord {
	DelegationRecord {
		start_height: 100,
		end_height: 200,
		total_sat,
		covenant_sig_count: 3,
		covenant_unbonding_sig_count: 3,
		covenant_slashing_sig_count: 3,
		has_delegator_unbonding: false,
	}
}

/// Serves pages from memory. Page keys are page indexes.
pub struct MockBtcStakingDataSource {
	params: ProtocolParameters,
	chain_tip: u32,
	delegation_pages: HashMap<FpBtcPkHex, Vec<Vec<DelegationRecord>>>,
	endless: HashSet<FpBtcPkHex>,
	failing_pages: HashSet<(FpBtcPkHex, usize)>,
	provider_pages: Vec<Vec<FpBtcPkHex>>,
	fail_params: bool,
	delegation_requests: Mutex<HashMap<FpBtcPkHex, usize>>,
	checkpoint_params_requests: AtomicUsize,
	covenant_quorum_requests: AtomicUsize,
}

impl Default for MockBtcStakingDataSource {
	fn default() -> Self {
		Self {
			params: TEST_PARAMS,
			chain_tip: 1_000,
			delegation_pages: HashMap::new(),
			endless: HashSet::new(),
			failing_pages: HashSet::new(),
			provider_pages: Vec::new(),
			fail_params: false,
			delegation_requests: Mutex::new(HashMap::new()),
			checkpoint_params_requests: AtomicUsize::new(0),
			covenant_quorum_requests: AtomicUsize::new(0),
		}
	}
}

impl MockBtcStakingDataSource {
	pub fn with_chain_tip(self, chain_tip: u32) -> Self {
		Self { chain_tip, ..self }
	}

	pub fn with_delegation_pages(
		mut self,
		fp: FpBtcPkHex,
		pages: Vec<Vec<DelegationRecord>>,
	) -> Self {
		self.delegation_pages.insert(fp, pages);
		self
	}

	/// Every page holds one delegation and points to a next page
	pub fn with_endless_delegations(mut self, fp: FpBtcPkHex) -> Self {
		self.endless.insert(fp);
		self
	}

	pub fn with_failing_page(mut self, fp: FpBtcPkHex, page_index: usize) -> Self {
		self.failing_pages.insert((fp, page_index));
		self
	}

	pub fn with_provider_pages(self, provider_pages: Vec<Vec<FpBtcPkHex>>) -> Self {
		Self { provider_pages, ..self }
	}

	pub fn with_failing_params(self) -> Self {
		Self { fail_params: true, ..self }
	}

	pub fn delegation_page_requests(&self, fp: &FpBtcPkHex) -> usize {
		self.delegation_requests.lock().unwrap().get(fp).copied().unwrap_or_default()
	}

	pub fn checkpoint_params_requests(&self) -> usize {
		self.checkpoint_params_requests.load(Ordering::SeqCst)
	}

	pub fn covenant_quorum_requests(&self) -> usize {
		self.covenant_quorum_requests.load(Ordering::SeqCst)
	}
}

fn page_index(page_key: Option<PageKey>) -> DataSourceResult<usize> {
	match page_key {
		None => Ok(0),
		Some(PageKey(key)) => Ok(key.parse()?),
	}
}

fn next_key(index: usize, page_count: usize) -> Option<PageKey> {
	(index + 1 < page_count).then(|| PageKey((index + 1).to_string()))
}

#[async_trait]
impl BtcStakingDataSource for MockBtcStakingDataSource {
	async fn finality_providers_page(
		&self,
		_consumer_id: &str,
		page_key: Option<PageKey>,
	) -> DataSourceResult<FinalityProvidersPage> {
		let index = page_index(page_key)?;
		Ok(FinalityProvidersPage {
			providers: self.provider_pages.get(index).cloned().unwrap_or_default(),
			next_key: next_key(index, self.provider_pages.len()),
		})
	}

	async fn delegations_page(
		&self,
		fp: &FpBtcPkHex,
		page_key: Option<PageKey>,
	) -> DataSourceResult<DelegationsPage> {
		*self.delegation_requests.lock().unwrap().entry(fp.clone()).or_default() += 1;
		let index = page_index(page_key)?;
		if self.failing_pages.contains(&(fp.clone(), index)) {
			return Err(format!("page {index} of {fp} is unavailable").into());
		}
		if self.endless.contains(fp) {
			return Ok(DelegationsPage {
				delegations: vec![delegation_with_stake(1)],
				next_key: Some(PageKey((index + 1).to_string())),
			});
		}
		let pages = self.delegation_pages.get(fp).map(Vec::as_slice).unwrap_or_default();
		Ok(DelegationsPage {
			delegations: pages.get(index).cloned().unwrap_or_default(),
			next_key: next_key(index, pages.len()),
		})
	}

	async fn checkpoint_params(&self) -> DataSourceResult<CheckpointParams> {
		self.checkpoint_params_requests.fetch_add(1, Ordering::SeqCst);
		if self.fail_params {
			return Err("checkpoint params are unavailable".into());
		}
		Ok(CheckpointParams {
			btc_confirmation_depth: self.params.confirmation_depth,
			checkpoint_finalization_timeout: self.params.finalization_timeout,
		})
	}

	async fn covenant_quorum(&self) -> DataSourceResult<u32> {
		self.covenant_quorum_requests.fetch_add(1, Ordering::SeqCst);
		Ok(self.params.covenant_quorum)
	}

	async fn chain_tip(&self) -> DataSourceResult<BtcHeight> {
		Ok(BtcHeight(self.chain_tip))
	}
}
