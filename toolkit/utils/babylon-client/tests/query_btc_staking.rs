use babylon_client::{
	BabylonClientError, PageRequest,
	query_btc_checkpoint::{QueryBtcCheckpoint, QueryBtcLightClient},
	query_btc_staking::QueryBtcStaking,
};
use pretty_assertions::assert_eq;
use serde_json::json;

mod fixture;
use fixture::FixtureClient;

const FP_PK: &str = "03d5a0bb72d71993e435d6c5a70e2aa4db500a62cfaae33c56050deefee64ec0";

#[tokio::test]
async fn finality_provider_delegations() {
	// Shape of a real gateway answer with most of the fields removed for brevity
	let client = FixtureClient::new(json!({
		"btc_delegator_delegations": [
			{
				"dels": [
					{
						"staker_addr": "bbn1q9t8p6lxqnpp4jm3h3c5k6vqmchdyahm0zq5hp",
						"fp_btc_pk_list": [FP_PK],
						"start_height": 228020,
						"end_height": 292020,
						"total_sat": "50000",
						"covenant_sigs": [{"cov_pk": "a0"}, {"cov_pk": "a1"}, {"cov_pk": "a2"}],
						"active": true,
						"status_desc": "ACTIVE",
						"undelegation_response": {
							"covenant_unbonding_sig_list": [{"pk": "a0"}, {"pk": "a1"}],
							"covenant_slashing_sigs": [{"cov_pk": "a0"}],
							"delegator_unbonding_info_response": null
						}
					},
					{
						"start_height": 228100,
						"end_height": 292100,
						"total_sat": "70000",
						"covenant_sigs": null,
						"undelegation_response": {
							"covenant_unbonding_sig_list": [],
							"covenant_slashing_sigs": [],
							"delegator_unbonding_info_response": {"spend_stake_tx_hex": "0200"}
						}
					}
				]
			}
		],
		"pagination": {"next_key": "AAE=", "total": "0"}
	}));

	let page = PageRequest { key: Some("AAA=".into()), limit: Some(100) };
	let response = client.finality_provider_delegations(FP_PK, page).await.unwrap();

	let (path, params) = client.single_request();
	assert_eq!(path, format!("/babylon/btcstaking/v1/finality_providers/{FP_PK}/delegations"));
	assert_eq!(params.get("pagination.key"), Some("AAA="));
	assert_eq!(params.get("pagination.limit"), Some("100"));

	let dels = &response.btc_delegator_delegations[0].dels;
	assert_eq!(dels.len(), 2);
	assert_eq!(dels[0].start_height, 228020);
	assert_eq!(dels[0].end_height, 292020);
	assert_eq!(dels[0].total_sat, 50000);
	assert_eq!(dels[0].covenant_sigs.len(), 3);
	let undelegation = dels[0].undelegation_response.as_ref().unwrap();
	assert_eq!(undelegation.covenant_unbonding_sig_list.len(), 2);
	assert_eq!(undelegation.covenant_slashing_sigs.len(), 1);
	assert_eq!(undelegation.delegator_unbonding_info_response, None);

	assert_eq!(dels[1].covenant_sigs.len(), 0);
	assert!(
		dels[1].undelegation_response.as_ref().unwrap().delegator_unbonding_info_response.is_some()
	);
	assert_eq!(response.pagination.unwrap().next_key, Some("AAE=".to_string()));
}

#[tokio::test]
async fn finality_providers() {
	let client = FixtureClient::new(json!({
		"finality_providers": [
			{"addr": "bbn1a", "btc_pk": FP_PK, "bsn_id": "op-stack-l2-706114", "jailed": false},
			{
				"addr": "bbn1b",
				"btc_pk": "A9Wgu3LXGZPkNdbFpw4qpNtQCmLPquM8VgUN7v7mTsA=",
				"bsn_id": "op-stack-l2-706114"
			}
		],
		"pagination": {"next_key": null}
	}));

	let response =
		client.finality_providers("op-stack-l2-706114", PageRequest::default()).await.unwrap();

	let (path, params) = client.single_request();
	assert_eq!(path, "/babylon/btcstaking/v1/finality_providers/op-stack-l2-706114");
	assert!(params.is_empty());
	let keys: Vec<String> =
		response.finality_providers.iter().map(|fp| fp.btc_pk_hex().unwrap()).collect();
	assert_eq!(keys, vec![FP_PK.to_string(), FP_PK.to_string()]);
}

#[tokio::test]
async fn consumer_id_is_escaped_in_path() {
	let client = FixtureClient::new(json!({"finality_providers": []}));

	client.finality_providers("../params?x=1#", PageRequest::default()).await.unwrap();

	let (path, _) = client.single_request();
	assert_eq!(path, "/babylon/btcstaking/v1/finality_providers/..%2Fparams%3Fx%3D1%23");
}

#[tokio::test]
async fn dot_segment_key_is_rejected_without_request() {
	let client = FixtureClient::new(json!({}));

	let result = client.finality_provider_delegations("..", PageRequest::default()).await;

	assert!(matches!(result, Err(BabylonClientError::ParametersError(_))));
	assert!(client.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn btc_staking_params() {
	let client = FixtureClient::new(json!({
		"params": {
			"covenant_pks": ["a0", "a1", "a2"],
			"covenant_quorum": 2,
			"min_staking_value_sat": "1000"
		}
	}));

	let response = client.btc_staking_params().await.unwrap();

	assert_eq!(client.single_request().0, "/babylon/btcstaking/v1/params");
	assert_eq!(response.params.covenant_quorum, 2);
}

#[tokio::test]
async fn btc_checkpoint_params() {
	let client = FixtureClient::new(json!({
		"params": {
			"btc_confirmation_depth": 10,
			"checkpoint_finalization_timeout": 100,
			"checkpoint_tag": "62627434"
		}
	}));

	let response = client.btc_checkpoint_params().await.unwrap();

	assert_eq!(client.single_request().0, "/babylon/btccheckpoint/v1/params");
	assert_eq!(response.params.btc_confirmation_depth, 10);
	assert_eq!(response.params.checkpoint_finalization_timeout, 100);
}

#[tokio::test]
async fn btc_header_chain_tip() {
	let client = FixtureClient::new(json!({
		"header": {
			"header_hex": "00",
			"hash_hex": "00000000000000000002a7c4c1e48d76c5a37902165a270156b7a8d72728a054",
			"height": 870123,
			"work": "1234"
		}
	}));

	let response = client.btc_header_chain_tip().await.unwrap();

	assert_eq!(client.single_request().0, "/babylon/btclightclient/v1/tip");
	assert_eq!(response.header.height, 870123);
}
