//! Client-level error types shared across configuration, transport, and job operations.

// self
use crate::{
	_prelude::*,
	job::{CommandError, IdentifierError},
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Request payload could not be serialized.
	#[error("Request payload could not be serialized.")]
	Encode(#[source] serde_json::Error),
	/// Bisect command failed validation before any request was sent.
	#[error(transparent)]
	InvalidCommand(#[from] CommandError),
	/// Job identifier is malformed, including identifiers returned by the broker.
	#[error("Broker job identifier is invalid.")]
	InvalidJobId(#[from] IdentifierError),

	/// Broker answered with a non-2xx status.
	#[error("Broker request failed with status {status}: {body}.")]
	Broker {
		/// HTTP status code returned by the broker.
		status: u16,
		/// Response body text, kept verbatim for diagnostics.
		body: String,
	},
}
impl Error {
	/// Returns the HTTP status associated with the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Broker { status, .. } => Some(*status),
			Self::Decode(DecodeError::Json { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Builder was finalized without a base URL.
	#[error("Broker base URL is required.")]
	MissingBaseUrl,
	/// Builder was finalized without an auth token.
	#[error("Broker auth token is required.")]
	MissingAuthToken,
	/// Auth token was empty or whitespace.
	#[error("Broker auth token cannot be blank.")]
	BlankAuthToken,
	/// Base URL string cannot be parsed.
	#[error("Broker base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http or https.
	#[error("Broker base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// URL that failed validation.
		url: String,
	},
	/// Base URL cannot carry a path (e.g. `mailto:` or `data:` URLs).
	#[error("Broker base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// URL that failed validation.
		url: String,
	},
	/// Base URL carries a query or fragment that endpoint resolution would discard.
	#[error("Broker base URL must not carry a query or fragment: {url}.")]
	UnexpectedQueryOrFragment {
		/// URL that failed validation.
		url: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (DNS, connect, TLS, body read, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the broker.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Broker responded with a body that is not the expected JSON.
	#[error("Broker returned malformed JSON.")]
	Json {
		/// Structured parsing failure, including the JSON path that failed.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Broker responded with a body that is not valid UTF-8.
	#[error("Broker returned a non UTF-8 body.")]
	Utf8 {
		/// Underlying conversion failure.
		#[source]
		source: std::string::FromUtf8Error,
		/// HTTP status code of the response.
		status: u16,
	},
}
