// self
use crate::obs::{FlowOutcome, FlowStep};

/// Records a step outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(step: FlowStep, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_broker_flow_total",
			"flow" => step.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome);
	}
}
