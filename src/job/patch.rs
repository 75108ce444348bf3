//! JSON-Patch operations sent to the per-job endpoint.

// self
use crate::_prelude::*;

/// Path of the field the bot uses to flag its own progress on a job.
pub const BOT_CLIENT_DATA_PATH: &str = "/bot_client_data";

/// Marker value written once the bot has finished with a job.
pub const COMPLETE_MARKER: &str = "complete";

/// JSON-Patch operation kinds used by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
	/// Replace the value at `path`.
	Replace,
}

/// A single `{op, path, value}` instruction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
	/// Operation kind.
	pub op: PatchOp,
	/// JSON pointer to the target field.
	pub path: String,
	/// Value to write.
	pub value: serde_json::Value,
}
impl PatchOperation {
	/// Builds a `replace` operation.
	pub fn replace(path: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		Self { op: PatchOp::Replace, path: path.into(), value: value.into() }
	}

	/// Builds the operation that flags a job as complete on the bot side.
	pub fn mark_complete() -> Self {
		Self::replace(BOT_CLIENT_DATA_PATH, COMPLETE_MARKER)
	}
}
