//! Bisect command input supplied by the issue-tracker side.

// self
use crate::_prelude::*;

/// Error returned when a [`BisectCommand`] is missing a required value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum CommandError {
	/// A required field was empty or whitespace.
	#[error("Bisect command field `{field}` cannot be empty.")]
	Empty {
		/// Name of the offending field.
		field: &'static str,
	},
}

/// Request to bisect a regression between two versions with a hosted reproduction gist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BisectCommand {
	/// Version known to behave correctly.
	pub good_version: String,
	/// Version known to exhibit the regression.
	pub bad_version: String,
	/// Identifier of the gist holding the reproduction script.
	pub gist_id: String,
}
impl BisectCommand {
	/// Creates a validated command.
	pub fn new(
		good_version: impl Into<String>,
		bad_version: impl Into<String>,
		gist_id: impl Into<String>,
	) -> Result<Self, CommandError> {
		let command = Self {
			good_version: good_version.into(),
			bad_version: bad_version.into(),
			gist_id: gist_id.into(),
		};

		command.validate()?;

		Ok(command)
	}

	/// Checks that every field carries a value; public fields may be edited after construction.
	pub fn validate(&self) -> Result<(), CommandError> {
		for (field, value) in [
			("good_version", &self.good_version),
			("bad_version", &self.bad_version),
			("gist_id", &self.gist_id),
		] {
			if value.trim().is_empty() {
				return Err(CommandError::Empty { field });
			}
		}

		Ok(())
	}
}
