//! Rules deciding whether a delegation counts towards voting power.
//!
//! Two distinct rules are used:
//! - [is_delegation_active] decides whether a delegation contributes power at a given height,
//! - [first_activation_height] decides when a delegation was activated for the first time.
//!
//! The second rule checks fewer conditions than the first one: it ignores the remaining
//! timelock and the unbonding and slashing covenant signatures. Activation is a one-time
//! historical event, later unbonding does not move it. The two rules must not be unified.

use btc_staking_domain::*;

/// Returns true if `delegation` contributes voting power at `btc_height`.
///
/// All of the following must hold:
/// 1. the delegator has not requested unbonding,
/// 2. the staking transaction is `k`-deep: `btc_height >= start_height + k`,
/// 3. at least `w` timelock blocks remain: `btc_height + w <= end_height`,
/// 4. each covenant signature category reached the quorum.
///
/// The ledger checks depth and quorum when accepting a delegation, but power has to be
/// computable for any historical height, so they are checked again here.
pub fn is_delegation_active(
	delegation: &DelegationRecord,
	btc_height: BtcHeight,
	params: &ProtocolParameters,
) -> bool {
	if delegation.has_delegator_unbonding {
		return false;
	}

	let height = u64::from(btc_height.0);
	let k_deep =
		height >= u64::from(delegation.start_height) + u64::from(params.confirmation_depth);
	let timelock_remains =
		height + u64::from(params.finalization_timeout) <= u64::from(delegation.end_height);
	if !k_deep || !timelock_remains {
		return false;
	}

	let quorum = params.covenant_quorum;
	delegation.covenant_sig_count >= quorum
		&& delegation.covenant_unbonding_sig_count >= quorum
		&& delegation.covenant_slashing_sig_count >= quorum
}

/// Returns the height at which `delegation` became active for the first time, which is
/// `start_height + k`, or [ActivationHeight::NEVER] if it has not been activated
/// by `chain_tip` or has not gathered `covenant_quorum` covenant signatures.
///
/// Unbonding does not affect the result.
pub fn first_activation_height(
	delegation: &DelegationRecord,
	chain_tip: BtcHeight,
	confirmation_depth: u32,
	covenant_quorum: u32,
) -> ActivationHeight {
	let activation_height =
		u64::from(delegation.start_height) + u64::from(confirmation_depth);
	if u64::from(chain_tip.0) < activation_height || delegation.covenant_sig_count < covenant_quorum
	{
		return ActivationHeight::NEVER;
	}
	u32::try_from(activation_height).map(ActivationHeight).unwrap_or(ActivationHeight::NEVER)
}
