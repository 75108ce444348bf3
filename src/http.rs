//! Transport primitives for broker calls.
//!
//! [`JobHttpClient`] is the client's only dependency on an HTTP stack. The broker client
//! renders every operation into a [`BrokerRequest`] (method, absolute URL, headers, optional
//! body) and expects a [`BrokerResponse`] carrying the raw status and body back, whatever the
//! status code. Status interpretation stays in the client so custom transports only move
//! bytes.

// std
use std::string::FromUtf8Error;
#[cfg(feature = "reqwest")] use std::{ops::Deref, time::Duration as StdDuration};
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Header carrying the bearer credential.
pub const AUTHORIZATION: &str = "authorization";
/// Header describing the request body encoding.
pub const CONTENT_TYPE: &str = "content-type";
/// Header describing acceptable response encodings.
pub const ACCEPT: &str = "accept";
/// Media type used for every request body.
pub const APPLICATION_JSON: &str = "application/json";

/// Boxed future returned by [`JobHttpClient::execute`].
pub type HttpFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing broker requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared behind an
/// [`Arc`] by many concurrent callers, and the futures they return must be `Send` so client
/// operations can hop executors.
pub trait JobHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves with the broker's response, successful or not.
	///
	/// Only failures that prevent a response from arriving (DNS, connect, TLS, body read)
	/// should surface as errors; non-2xx statuses are returned as ordinary responses.
	fn execute(
		&self,
		request: BrokerRequest,
	) -> HttpFuture<'_, BrokerResponse, Self::TransportError>;
}

/// HTTP methods used against the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// Fetch a resource.
	Get,
	/// Create a resource.
	Post,
	/// Partially update a resource.
	Patch,
	/// Remove or cancel a resource.
	Delete,
}
impl HttpMethod {
	/// Returns the canonical method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully rendered request handed to a [`JobHttpClient`].
#[derive(Clone)]
pub struct BrokerRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Absolute target URL.
	pub url: Url,
	/// Header name/value pairs; names are lowercase.
	pub headers: Vec<(&'static str, String)>,
	/// Serialized body, if any.
	pub body: Option<Vec<u8>>,
}
impl BrokerRequest {
	/// Starts a request without headers or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header.
	pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}

	/// Serializes `payload` as the JSON body and sets the content type.
	pub fn json<T>(self, payload: &T) -> Result<Self, serde_json::Error>
	where
		T: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(payload)?;
		let mut request = self.header(CONTENT_TYPE, APPLICATION_JSON);

		request.body = Some(body);

		Ok(request)
	}

	/// Returns the first value recorded for `name`, compared case-insensitively.
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for BrokerRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case(AUTHORIZATION) {
					(*name, "<redacted>")
				} else {
					(*name, value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("BrokerRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Raw response returned by a [`JobHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokerResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl BrokerResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Reports whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Decodes the body as UTF-8.
	pub fn into_text(self) -> Result<String, FromUtf8Error> {
		String::from_utf8(self.body)
	}

	/// Decodes the body as UTF-8, replacing invalid sequences; meant for diagnostics.
	pub fn text_lossy(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The broker client has no built-in timeout; use [`ReqwestHttpClient::with_timeout`] or
/// [`ReqwestHttpClient::with_client`] when calls must be bounded.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests fail after `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl JobHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: BrokerRequest) -> HttpFuture<'_, BrokerResponse, ReqwestError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
				HttpMethod::Patch => reqwest::Method::PATCH,
				HttpMethod::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(BrokerResponse { status, body })
		})
	}
}
