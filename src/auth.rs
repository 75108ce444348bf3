//! Bearer credential wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Redacted bearer token presented to the broker on every request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);
impl AuthToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Renders the `Authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}

	/// Reports whether the token holds only whitespace.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl AsRef<str> for AuthToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for AuthToken {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for AuthToken {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for AuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthToken").field(&"<redacted>").finish()
	}
}
impl Display for AuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = AuthToken::new("super-secret");

		assert_eq!(format!("{token:?}"), "AuthToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.bearer(), "Bearer super-secret");
	}

	#[test]
	fn blank_detection_ignores_surrounding_whitespace() {
		assert!(AuthToken::new(" \t").is_blank());
		assert!(AuthToken::new("").is_blank());
		assert!(!AuthToken::new(" tok ").is_blank());
	}
}
