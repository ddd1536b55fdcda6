//! Paginated scans over ledger listings.
//!
//! A scan is a lazy, finite, non-restartable stream of pages. Pages are requested one at a
//! time, each request carrying the continuation token returned with the previous page.
//! The stream ends when a page comes without a continuation token or when
//! [ScanConfig::max_pages] pages were consumed. Reaching the page ceiling is not an error.
//! A failed fetch is yielded as an error and ends the stream.

use crate::{BtcStakingDataSource, PowerQueryError, Result, ScanConfig};
use btc_staking_domain::*;
use futures::{Stream, TryStreamExt, future::ready, stream};
use log::{debug, warn};
use std::future::Future;

/// Page of a paginated listing
pub trait Paged {
	/// Continuation token of the next page
	fn next_key(&self) -> Option<PageKey>;
}

impl Paged for DelegationsPage {
	fn next_key(&self) -> Option<PageKey> {
		self.next_key.clone()
	}
}

impl Paged for FinalityProvidersPage {
	fn next_key(&self) -> Option<PageKey> {
		self.next_key.clone()
	}
}

enum Cursor {
	First,
	After(PageKey),
	Exhausted,
}

struct ScanState {
	cursor: Cursor,
	pages_seen: u32,
}

/// Turns `fetch_page` into a stream of pages following the continuation token chain.
/// `subject` names the listing in log messages.
pub fn paginate<'a, P, F, Fut>(
	config: ScanConfig,
	subject: String,
	mut fetch_page: F,
) -> impl Stream<Item = Result<P>> + Send + 'a
where
	P: Paged + Send + 'a,
	F: FnMut(Option<PageKey>) -> Fut + Send + 'a,
	Fut: Future<Output = Result<P>> + Send + 'a,
{
	let initial = ScanState { cursor: Cursor::First, pages_seen: 0 };
	stream::try_unfold(initial, move |state| {
		let pages_seen = state.pages_seen;
		let request = match state.cursor {
			Cursor::Exhausted => None,
			_ if pages_seen >= config.max_pages => {
				warn!(
					"Stopped scanning {subject} after reaching the limit of {} pages",
					config.max_pages
				);
				None
			},
			Cursor::First => Some(fetch_page(None)),
			Cursor::After(key) => Some(fetch_page(Some(key))),
		};
		async move {
			let Some(request) = request else {
				return Result::Ok(None);
			};
			let page = request.await?;
			let cursor = match page.next_key() {
				Some(key) => Cursor::After(key),
				None => Cursor::Exhausted,
			};
			Ok(Some((page, ScanState { cursor, pages_seen: pages_seen + 1 })))
		}
	})
}

/// Stream of the pages of delegations made to `fp`
pub fn delegation_pages<'a>(
	data_source: &'a (dyn BtcStakingDataSource + Send + Sync),
	fp: &'a FpBtcPkHex,
	config: ScanConfig,
) -> impl Stream<Item = Result<DelegationsPage>> + Send + 'a {
	paginate(config, format!("delegations of {fp}"), move |page_key| async move {
		data_source
			.delegations_page(fp, page_key)
			.await
			.map_err(PowerQueryError::data_source(format!("delegations of {fp}")))
	})
}

/// Stream of the pages of finality providers registered for `consumer_id`
pub fn finality_provider_pages<'a>(
	data_source: &'a (dyn BtcStakingDataSource + Send + Sync),
	consumer_id: &'a str,
	config: ScanConfig,
) -> impl Stream<Item = Result<FinalityProvidersPage>> + Send + 'a {
	paginate(
		config,
		format!("finality providers of {consumer_id}"),
		move |page_key| async move {
			data_source
				.finality_providers_page(consumer_id, page_key)
				.await
				.map_err(PowerQueryError::data_source(format!(
					"finality providers of {consumer_id}"
				)))
		},
	)
}

/// Folds every delegation made to `fp` with `visit`, in listing order.
///
/// Any fetch error aborts the scan and is returned, the accumulated value is dropped.
pub async fn fold_delegations<A, F>(
	data_source: &(dyn BtcStakingDataSource + Send + Sync),
	fp: &FpBtcPkHex,
	config: ScanConfig,
	init: A,
	mut visit: F,
) -> Result<A>
where
	A: Send,
	F: FnMut(A, &DelegationRecord) -> A + Send,
{
	let mut pages = 0u32;
	let result = delegation_pages(data_source, fp, config)
		.try_fold(init, |acc, page| {
			pages += 1;
			ready(Ok(page.delegations.iter().fold(acc, &mut visit)))
		})
		.await?;
	debug!("Scanned {pages} pages of delegations of {fp}");
	Ok(result)
}
