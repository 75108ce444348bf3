//! Job records: the bisect job submitted by the client and the opaque job the broker returns.

// self
use crate::{_prelude::*, job::{BisectCommand, JobId}};

/// Job kinds the client submits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
	/// Regression bisection between two versions.
	Bisect,
}
impl JobType {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			JobType::Bisect => "bisect",
		}
	}
}
impl Display for JobType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Job record posted to the broker's collection endpoint.
///
/// `bisect_range` is always `[good, bad]`; `history` starts empty and is only ever filled in
/// by the broker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BisectJob {
	/// Known-good and known-bad versions, in that order.
	pub bisect_range: [String; 2],
	/// Gist identifier of the reproduction script.
	pub gist: String,
	/// Broker-maintained history entries; empty at creation.
	pub history: Vec<serde_json::Value>,
	/// Client-generated identifier, fresh for every submission.
	pub id: JobId,
	/// Creation time in milliseconds since the Unix epoch.
	pub time_added: i64,
	/// Job kind discriminator.
	#[serde(rename = "type")]
	pub kind: JobType,
}
impl BisectJob {
	/// Builds a new record stamped with a fresh identifier and the current time.
	pub fn from_command(command: &BisectCommand) -> Self {
		Self::from_command_at(command, OffsetDateTime::now_utc())
	}

	/// Builds a new record stamped with a fresh identifier and the provided creation instant.
	pub fn from_command_at(command: &BisectCommand, added_at: OffsetDateTime) -> Self {
		Self {
			bisect_range: [command.good_version.clone(), command.bad_version.clone()],
			gist: command.gist_id.clone(),
			history: Vec::new(),
			id: JobId::generate(),
			time_added: unix_millis(added_at),
			kind: JobType::Bisect,
		}
	}

	/// Known-good version.
	pub fn good_version(&self) -> &str {
		&self.bisect_range[0]
	}

	/// Known-bad version.
	pub fn bad_version(&self) -> &str {
		&self.bisect_range[1]
	}
}

/// Job state returned by the broker, passed through without interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Job(serde_json::Value);
impl Job {
	/// Wraps a raw JSON document.
	pub fn new(value: serde_json::Value) -> Self {
		Self(value)
	}

	/// Borrows the raw JSON document.
	pub fn as_value(&self) -> &serde_json::Value {
		&self.0
	}

	/// Consumes the wrapper and returns the raw JSON document.
	pub fn into_value(self) -> serde_json::Value {
		self.0
	}

	/// Looks up a top-level field, when the document is an object.
	pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
		self.0.get(field)
	}

	/// Reads the `id` field if present and a string.
	pub fn id(&self) -> Option<&str> {
		self.get("id").and_then(serde_json::Value::as_str)
	}

	/// Reads the `type` field if present and a string.
	pub fn job_type(&self) -> Option<&str> {
		self.get("type").and_then(serde_json::Value::as_str)
	}
}
impl From<serde_json::Value> for Job {
	fn from(value: serde_json::Value) -> Self {
		Self(value)
	}
}

fn unix_millis(instant: OffsetDateTime) -> i64 {
	i64::try_from(instant.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}
