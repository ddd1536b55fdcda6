//! # BTC staking domain types
//!
//! This crate defines the value types exchanged between the BTC staking power engine,
//! the ledger query client and the finality contract reader. None of these types carry
//! behaviour beyond construction and formatting; rules about delegation activity live in
//! `btc-staking-power`.

#![deny(missing_docs)]

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Hex encoded BIP-340 public key of a finality provider.
///
/// The value is kept exactly as returned by the ledger, so that keys can be compared with
/// the ones reported by the finality contract without normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct FpBtcPkHex(pub String);

impl From<&str> for FpBtcPkHex {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl FpBtcPkHex {
	/// Returns the key as a string slice
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true if the key is a non-empty, even length hex string
	pub fn is_valid_hex(&self) -> bool {
		!self.0.is_empty() && hex::decode(&self.0).is_ok()
	}
}

/// Bitcoin block height
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct BtcHeight(pub u32);

/// Protocol parameters that apply uniformly to every delegation evaluated in one query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParameters {
	/// Number of Bitcoin blocks a staking transaction has to be buried under (`k`)
	pub confirmation_depth: u32,
	/// Number of timelock blocks that must still remain for a delegation to be active (`w`)
	pub finalization_timeout: u32,
	/// Minimal number of covenant committee signatures in each signature category
	pub covenant_quorum: u32,
}

/// Snapshot of a single BTC delegation as listed by the ledger.
///
/// Signature lists are reduced to their lengths, only signature presence is relevant here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRecord {
	/// Bitcoin height at which the staking timelock starts
	pub start_height: u32,
	/// Bitcoin height at which the staking timelock ends
	pub end_height: u32,
	/// Staked amount in satoshis
	pub total_sat: u64,
	/// Number of covenant adaptor signatures over the slashing transaction
	pub covenant_sig_count: u32,
	/// Number of covenant signatures over the unbonding transaction
	pub covenant_unbonding_sig_count: u32,
	/// Number of covenant adaptor signatures over the unbonding slashing transaction
	pub covenant_slashing_sig_count: u32,
	/// Whether the delegator has already requested unbonding
	pub has_delegator_unbonding: bool,
}

/// Opaque continuation token of a paginated ledger listing
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(pub String);

impl PageKey {
	/// Converts a raw `next_key` as returned by the ledger into an optional token.
	/// Both a missing and an empty key mean that the listing is complete.
	pub fn from_next_key(next_key: Option<String>) -> Option<Self> {
		next_key.filter(|key| !key.is_empty()).map(PageKey)
	}
}

/// One page of delegations of a single finality provider
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DelegationsPage {
	/// Delegations in the order returned by the ledger
	pub delegations: Vec<DelegationRecord>,
	/// Token of the next page, `None` on the last page
	pub next_key: Option<PageKey>,
}

/// One page of finality providers registered for a consumer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinalityProvidersPage {
	/// Public keys of the listed finality providers
	pub providers: Vec<FpBtcPkHex>,
	/// Token of the next page, `None` on the last page
	pub next_key: Option<PageKey>,
}

/// Bitcoin height at which a delegation, provider or provider set became active.
///
/// [ActivationHeight::NEVER] marks that nothing has been activated yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationHeight(pub u32);

impl ActivationHeight {
	/// Sentinel meaning "never activated"
	pub const NEVER: Self = Self(u32::MAX);

	/// Returns true for the "never activated" sentinel
	pub fn is_never(&self) -> bool {
		*self == Self::NEVER
	}

	/// Returns the height or `None` for the sentinel
	pub fn height(&self) -> Option<u32> {
		if self.is_never() { None } else { Some(self.0) }
	}
}

impl Default for ActivationHeight {
	fn default() -> Self {
		Self::NEVER
	}
}

/// Configuration stored in the finality contract
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
	/// Identifier of the consumer chain registered on the ledger
	#[serde(rename = "bsn_id")]
	pub consumer_id: String,
	/// Height of the consumer chain at which finality signatures start being accepted
	pub bsn_activation_height: u64,
	/// Interval, in consumer blocks, between blocks that have to be signed
	pub finality_signature_interval: u64,
	/// Minimal amount of public randomness a provider has to commit at once
	pub min_pub_rand: u64,
}

/// Consumer chain block identifying the subject of a finality vote
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Block {
	/// Hex encoded block hash
	pub block_hash: String,
	/// Block number
	pub block_height: u64,
	/// Block timestamp in seconds
	pub block_timestamp: u64,
}
