//! Broker connection settings and their validation.
//!
//! The embedding application owns configuration loading; this module only validates the two
//! values the client needs and precomputes the job collection endpoint. Endpoints resolve the
//! same way a browser resolves `/api/jobs` against a base, so any path on the base URL is
//! replaced rather than extended.

// self
use crate::{_prelude::*, auth::AuthToken, error::ConfigError, job::JobId};

const JOBS_PATH: &str = "/api/jobs";

/// Validated broker connection settings, immutable for the client's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBrokerConfig")]
pub struct BrokerConfig {
	base_url: Url,
	auth_token: AuthToken,
	jobs_endpoint: Url,
}
impl BrokerConfig {
	/// Validates and builds a configuration from already-parsed parts.
	pub fn new(base_url: Url, auth_token: impl Into<AuthToken>) -> Result<Self, ConfigError> {
		Self::builder().base_url(base_url).auth_token(auth_token).build()
	}

	/// Starts a new builder.
	pub fn builder() -> BrokerConfigBuilder {
		BrokerConfigBuilder::default()
	}

	/// Base URL the broker endpoints are resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Bearer credential presented on every request.
	pub fn auth_token(&self) -> &AuthToken {
		&self.auth_token
	}

	/// Collection endpoint, `{origin}/api/jobs`.
	pub fn jobs_url(&self) -> Url {
		self.jobs_endpoint.clone()
	}

	/// Single-job endpoint, `{origin}/api/jobs/{id}` with the id percent-encoded as one segment.
	pub fn job_url(&self, id: &JobId) -> Url {
		let mut url = self.jobs_endpoint.clone();

		// Validation guarantees a hierarchical URL, so segments are always available.
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(id.as_ref());
		}

		url
	}
}

/// Builder for [`BrokerConfig`] values.
#[derive(Debug, Default)]
pub struct BrokerConfigBuilder {
	/// Base URL of the broker service.
	pub base_url: Option<Url>,
	/// Bearer token presented to the broker.
	pub auth_token: Option<AuthToken>,
}
impl BrokerConfigBuilder {
	/// Sets the base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Parses and sets the base URL.
	pub fn base_url_str(self, url: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(self.base_url(url))
	}

	/// Sets the bearer token.
	pub fn auth_token(mut self, token: impl Into<AuthToken>) -> Self {
		self.auth_token = Some(token.into());

		self
	}

	/// Validates the collected values and produces a [`BrokerConfig`].
	pub fn build(self) -> Result<BrokerConfig, ConfigError> {
		let base_url = self.base_url.ok_or(ConfigError::MissingBaseUrl)?;
		let auth_token = self.auth_token.ok_or(ConfigError::MissingAuthToken)?;

		if auth_token.is_blank() {
			return Err(ConfigError::BlankAuthToken);
		}

		validate_base_url(&base_url)?;

		let jobs_endpoint =
			base_url.join(JOBS_PATH).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(BrokerConfig { base_url, auth_token, jobs_endpoint })
	}
}

#[derive(Deserialize)]
struct RawBrokerConfig {
	base_url: String,
	auth_token: AuthToken,
}
impl TryFrom<RawBrokerConfig> for BrokerConfig {
	type Error = ConfigError;

	fn try_from(raw: RawBrokerConfig) -> Result<Self, Self::Error> {
		BrokerConfig::builder().base_url_str(&raw.base_url)?.auth_token(raw.auth_token).build()
	}
}

fn validate_base_url(url: &Url) -> Result<(), ConfigError> {
	if url.cannot_be_a_base() {
		return Err(ConfigError::CannotBeABase { url: url.to_string() });
	}
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ConfigError::UnexpectedQueryOrFragment { url: url.to_string() });
	}

	Ok(())
}
