//! Opaque job identifiers addressed by the broker's per-job endpoints.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use uuid::Uuid;
// self
use crate::_prelude::*;

/// Error returned when job identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Job identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Job identifier contains whitespace.")]
	ContainsWhitespace,
}

/// Broker-side identifier of a single job.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);
impl JobId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Generates a fresh random (v4 UUID) identifier for client-side job records.
	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}
}
impl Deref for JobId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for JobId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<JobId> for String {
	fn from(value: JobId) -> Self {
		value.0
	}
}
impl TryFrom<String> for JobId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for JobId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for JobId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Job({})", self.0)
	}
}
impl Display for JobId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for JobId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}

	Ok(())
}
