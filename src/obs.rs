//! Observability helpers for broker calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `bugbot_broker.request` with the
//!   `operation` field, and to forward [`TracingSink`] diagnostics as `debug` events.
//! - Enable `metrics` to increment the `bugbot_broker_request_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.
//!
//! Diagnostics always flow through a [`DiagnosticSink`] injected into the client, so callers
//! and tests can observe them without installing a global subscriber.

mod metrics;
mod sink;
mod tracing;

pub use metrics::*;
pub use sink::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Broker operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Submission of a new bisect job.
	QueueBisectJob,
	/// Fetch of a single job.
	GetJob,
	/// Bot-side completion mark.
	CompleteJob,
	/// Cancellation request.
	StopJob,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::QueueBisectJob => "queue_bisect_job",
			OperationKind::GetJob => "get_job",
			OperationKind::CompleteJob => "complete_job",
			OperationKind::StopJob => "stop_job",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
