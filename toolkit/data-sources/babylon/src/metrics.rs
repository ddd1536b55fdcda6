use btc_staking_domain::{BtcHeight, FpBtcPkHex};
use btc_staking_power::PowerObserver;
use log::warn;
use substrate_prometheus_endpoint::{
	CounterVec, GaugeVec, HistogramOpts, HistogramVec, Opts, PrometheusError, Registry, U64,
	register,
};

#[derive(Clone)]
pub struct DataSourceMetrics {
	time_elapsed: HistogramVec,
	call_count: CounterVec<U64>,
}

impl DataSourceMetrics {
	pub fn time_elapsed(&self) -> &HistogramVec {
		&self.time_elapsed
	}
	pub fn call_count(&self) -> &CounterVec<U64> {
		&self.call_count
	}
	pub fn register(registry: &Registry) -> Result<Self, PrometheusError> {
		Ok(Self {
			time_elapsed: register(
				HistogramVec::new(
					HistogramOpts::new(
						"babylon_data_source_method_time_elapsed",
						"Time spent in a method call",
					),
					&["method_name"],
				)?,
				registry,
			)?,
			call_count: register(
				CounterVec::new(
					Opts::new(
						"babylon_data_source_method_call_count",
						"Total number of data source method calls",
					),
					&["method_name"],
				)?,
				registry,
			)?,
		})
	}
}

pub fn register_metrics_warn_errors(
	metrics_registry_opt: Option<&Registry>,
) -> Option<DataSourceMetrics> {
	metrics_registry_opt.and_then(|registry| match DataSourceMetrics::register(registry) {
		Ok(metrics) => Some(metrics),
		Err(err) => {
			warn!("Failed registering data source metrics with err: {}", err);
			None
		},
	})
}

/// Latest voting power of every finality provider whose power was queried
#[derive(Clone)]
pub struct FinalityPowerMetrics {
	voting_power: GaugeVec<U64>,
}

impl FinalityPowerMetrics {
	pub fn voting_power(&self) -> &GaugeVec<U64> {
		&self.voting_power
	}
	pub fn register(registry: &Registry) -> Result<Self, PrometheusError> {
		Ok(Self {
			voting_power: register(
				GaugeVec::new(
					Opts::new(
						"finality_gadget_fp_latest_voting_power",
						"Latest voting power of each finality provider",
					),
					&["fp_pubkey"],
				)?,
				registry,
			)?,
		})
	}
}

impl PowerObserver for FinalityPowerMetrics {
	fn on_fp_power(&self, fp: &FpBtcPkHex, _btc_height: BtcHeight, power: u64) {
		self.voting_power.with_label_values(&[fp.as_str()]).set(power);
	}
}

pub fn register_power_metrics_warn_errors(
	metrics_registry_opt: Option<&Registry>,
) -> Option<FinalityPowerMetrics> {
	metrics_registry_opt.and_then(|registry| match FinalityPowerMetrics::register(registry) {
		Ok(metrics) => Some(metrics),
		Err(err) => {
			warn!("Failed registering finality power metrics with err: {}", err);
			None
		},
	})
}

/// Logs each method invocation and each returned result.
/// Has to be made at the level of trait, because otherwise #[async_trait] is expanded first.
/// '&self' matching yields "__self" identifier not found error, so "&$self:tt" is required.
/// Works only if return type is Result.
/// A single type parameter with plain trait bounds is supported, e.g. `impl<C: Client + Sync>`.
#[macro_export]
macro_rules! observed_async_trait {
	(impl $(<$generic:ident: $first_bound:ident $(+ $bound:ident)*>)? $trait_name:ident for $target_type:ty {
		$(async fn $method:ident(&$self:tt $(,$param_name:ident: $param_type:ty)* $(,)?)
			-> $res:ty $body:block)*
	})=> {
		#[async_trait::async_trait]
		impl $(<$generic: $first_bound $(+ $bound)*>)? $trait_name for $target_type {
		$(
			async fn $method(&$self $(,$param_name: $param_type)*,) -> $res {
				let method_name = stringify!($method);
				let _timer = if let Some(metrics) = &$self.metrics_opt {
					metrics.call_count().with_label_values(&[method_name]).inc();
					Some(metrics.time_elapsed().with_label_values(&[method_name]).start_timer())
				} else { None };
				let params: Vec<String> = vec![$(format!("{:?}", $param_name.clone()),)*];
				log::debug!("{} called with parameters: {:?}", method_name, params);
				let result = $body;
				match &result {
					Ok(value) => {
						log::debug!("{} returns {:?}", method_name, value);
					},
					Err(error) => {
						log::error!("{} failed with {:?}", method_name, error);
					},
				};
				result
			}
		)*
		}
	};
}
