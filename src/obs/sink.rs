// self
use crate::{_prelude::*, obs::OperationKind};

/// One diagnostic line emitted while a broker operation runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
	/// Operation that produced the event.
	pub operation: OperationKind,
	/// Short event name (`url`, `body`, `status`, `job_id`, ...).
	pub message: &'static str,
	/// Structured key/value payload.
	pub fields: Vec<(&'static str, String)>,
}
impl Diagnostic {
	/// Creates an event without fields.
	pub fn new(operation: OperationKind, message: &'static str) -> Self {
		Self { operation, message, fields: Vec::new() }
	}

	/// Attaches a field.
	pub fn with(mut self, key: &'static str, value: impl Display) -> Self {
		self.fields.push((key, value.to_string()));

		self
	}

	/// Returns the first value recorded for `key`.
	pub fn field(&self, key: &str) -> Option<&str> {
		self.fields.iter().find(|(name, _)| *name == key).map(|(_, value)| value.as_str())
	}
}

/// Receiver for client diagnostics, injected at construction.
pub trait DiagnosticSink
where
	Self: Send + Sync,
{
	/// Consumes one diagnostic event.
	fn record(&self, event: Diagnostic);
}

/// Default sink forwarding events to `tracing` at debug level (no-op without the feature).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;
impl DiagnosticSink for TracingSink {
	fn record(&self, event: Diagnostic) {
		#[cfg(feature = "tracing")]
		{
			tracing::debug!(
				operation = event.operation.as_str(),
				fields = ?event.fields,
				"{}",
				event.message
			);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = event;
		}
	}
}

/// In-memory sink keeping every event, for assertions and ad hoc inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
	events: Mutex<Vec<Diagnostic>>,
}
impl MemorySink {
	/// Returns a snapshot of recorded events.
	pub fn events(&self) -> Vec<Diagnostic> {
		self.events.lock().clone()
	}

	/// Returns recorded events for a single operation.
	pub fn events_for(&self, operation: OperationKind) -> Vec<Diagnostic> {
		self.events.lock().iter().filter(|event| event.operation == operation).cloned().collect()
	}

	/// Drops all recorded events.
	pub fn clear(&self) {
		self.events.lock().clear();
	}
}
impl DiagnosticSink for MemorySink {
	fn record(&self, event: Diagnostic) {
		self.events.lock().push(event);
	}
}
