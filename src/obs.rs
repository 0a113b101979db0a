//! Optional observability helpers for handshake steps.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth1_broker.flow` with the `flow` (step)
//!   and `stage` (call site) fields.
//! - Enable `metrics` to increment the `oauth1_broker_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Handshake steps observed by the broker; also used to tag errors with the step in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
	/// Temporary credential request.
	Handshake,
	/// Resource-owner authorization redirect.
	Authorize,
	/// Token credential exchange.
	Exchange,
	/// Authenticated identity lookup.
	Identify,
	/// Any other signed call made with token credentials.
	Request,
}
impl FlowStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStep::Handshake => "handshake",
			FlowStep::Authorize => "authorize",
			FlowStep::Exchange => "exchange",
			FlowStep::Identify => "identify",
			FlowStep::Request => "request",
		}
	}
}
impl Display for FlowStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker step.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a step span and records attempt plus success/failure outcomes.
pub(crate) async fn observe<T, Fut>(step: FlowStep, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(step, stage);

	record_flow_outcome(step, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_flow_outcome(step, FlowOutcome::Success),
		Err(_) => record_flow_outcome(step, FlowOutcome::Failure),
	}

	result
}
