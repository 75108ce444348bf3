//! Broker client exposing the four job operations.
//!
//! Every operation renders one [`BrokerRequest`], hands it to the configured
//! [`JobHttpClient`], and classifies the response before touching its body: any non-2xx
//! status becomes [`Error::Broker`] carrying the status and body text. The client keeps no
//! mutable state, so one instance can serve concurrent callers.

// self
use crate::{
	_prelude::*,
	config::BrokerConfig,
	error::{DecodeError, TransportError},
	http::{
		ACCEPT, APPLICATION_JSON, AUTHORIZATION, BrokerRequest, BrokerResponse, HttpMethod,
		JobHttpClient,
	},
	job::{BisectCommand, BisectJob, Job, JobId, PatchOperation},
	obs::{
		Diagnostic, DiagnosticSink, OperationKind, RequestOutcome, RequestSpan, TracingSink,
		record_request_outcome,
	},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestBrokerClient = BrokerClient<ReqwestHttpClient>;

/// Bearer-authenticated client for the job broker.
#[derive(Clone)]
pub struct BrokerClient<C>
where
	C: ?Sized + JobHttpClient,
{
	http_client: Arc<C>,
	config: BrokerConfig,
	sink: Arc<dyn DiagnosticSink>,
}
impl<C> BrokerClient<C>
where
	C: ?Sized + JobHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	///
	/// Diagnostics go to [`TracingSink`] until [`BrokerClient::with_sink`] replaces it.
	pub fn with_http_client(config: BrokerConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), config, sink: Arc::new(TracingSink) }
	}

	/// Replaces the diagnostic sink.
	pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
		self.sink = sink;

		self
	}

	/// Connection settings in use.
	pub fn config(&self) -> &BrokerConfig {
		&self.config
	}

	/// Transport in use.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Submits a new bisect job and returns the identifier the broker assigned.
	///
	/// A fresh job id and timestamp are generated on every call. The response body is the
	/// broker's identifier for the new job; it is trimmed, unquoted when it is a JSON string,
	/// and validated before being returned.
	pub async fn queue_bisect_job(&self, command: &BisectCommand) -> Result<JobId> {
		self.observe(OperationKind::QueueBisectJob, self.post_bisect_job(command)).await
	}

	/// Fetches the broker's current view of a job.
	pub async fn get_job(&self, job_id: &JobId) -> Result<Job> {
		self.observe(OperationKind::GetJob, self.fetch_job(job_id)).await
	}

	/// Flags a job as complete on the bot side via a single JSON-Patch `replace`.
	pub async fn complete_job(&self, job_id: &JobId) -> Result<()> {
		self.observe(OperationKind::CompleteJob, self.patch_job_complete(job_id)).await
	}

	/// Asks the broker to stop a job by deleting it from the queue.
	pub async fn stop_job(&self, job_id: &JobId) -> Result<()> {
		self.observe(OperationKind::StopJob, self.delete_job(job_id)).await
	}

	async fn post_bisect_job(&self, command: &BisectCommand) -> Result<JobId> {
		let kind = OperationKind::QueueBisectJob;

		command.validate()?;

		let job = BisectJob::from_command(command);

		self.emit(
			Diagnostic::new(kind, "job")
				.with("id", &job.id)
				.with("good", job.good_version())
				.with("bad", job.bad_version())
				.with("gist", &job.gist)
				.with("time_added", job.time_added),
		);

		let request = self
			.authorized(HttpMethod::Post, self.config.jobs_url())
			.json(&job)
			.map_err(Error::Encode)?;
		let response = self.send(kind, request).await?;
		let status = response.status;
		let text = response.into_text().map_err(|source| DecodeError::Utf8 { source, status })?;
		let job_id = parse_job_id(&text)?;

		self.emit(Diagnostic::new(kind, "job_id").with("job_id", &job_id));

		Ok(job_id)
	}

	async fn fetch_job(&self, job_id: &JobId) -> Result<Job> {
		let request = self.authorized(HttpMethod::Get, self.config.job_url(job_id));
		let response = self.send(OperationKind::GetJob, request).await?;

		decode_json(&response)
	}

	async fn patch_job_complete(&self, job_id: &JobId) -> Result<()> {
		let request = self
			.authorized(HttpMethod::Patch, self.config.job_url(job_id))
			.json(&[PatchOperation::mark_complete()])
			.map_err(Error::Encode)?;

		self.send(OperationKind::CompleteJob, request).await?;

		Ok(())
	}

	async fn delete_job(&self, job_id: &JobId) -> Result<()> {
		let request = self.authorized(HttpMethod::Delete, self.config.job_url(job_id));

		self.send(OperationKind::StopJob, request).await?;

		Ok(())
	}

	async fn observe<T, Fut>(&self, kind: OperationKind, fut: Fut) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		let span = RequestSpan::new(kind);

		record_request_outcome(kind, RequestOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => record_request_outcome(kind, RequestOutcome::Success),
			Err(e) => {
				record_request_outcome(kind, RequestOutcome::Failure);
				self.emit(Diagnostic::new(kind, "error").with("error", e));
			},
		}

		result
	}

	fn authorized(&self, method: HttpMethod, url: Url) -> BrokerRequest {
		BrokerRequest::new(method, url)
			.header(AUTHORIZATION, self.config.auth_token().bearer())
			.header(ACCEPT, APPLICATION_JSON)
	}

	async fn send(&self, kind: OperationKind, request: BrokerRequest) -> Result<BrokerResponse> {
		self.emit(
			Diagnostic::new(kind, "request")
				.with("method", request.method)
				.with("url", &request.url),
		);

		let response =
			self.http_client.execute(request).await.map_err(TransportError::network)?;

		self.emit(Diagnostic::new(kind, "status").with("status", response.status));

		if !response.is_success() {
			return Err(Error::Broker { status: response.status, body: response.text_lossy() });
		}

		Ok(response)
	}

	fn emit(&self, event: Diagnostic) {
		self.sink.record(event);
	}
}
#[cfg(feature = "reqwest")]
impl BrokerClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: BrokerConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Debug for BrokerClient<C>
where
	C: ?Sized + JobHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BrokerClient").field("config", &self.config).finish()
	}
}

fn parse_job_id(text: &str) -> Result<JobId> {
	let trimmed = text.trim();
	let unquoted = trimmed
		.starts_with('"')
		.then(|| serde_json::from_str::<String>(trimmed).ok())
		.flatten();
	let job_id = match unquoted {
		Some(value) => JobId::new(value.trim())?,
		None => JobId::new(trimmed)?,
	};

	Ok(job_id)
}

fn decode_json<T>(response: &BrokerResponse) -> Result<T>
where
	T: for<'de> Deserialize<'de>,
{
	let mut de = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| DecodeError::Json { source, status: response.status }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::job::IdentifierError;

	#[test]
	fn job_id_parsing_accepts_plain_and_quoted_bodies() {
		assert_eq!(parse_job_id("job-42").expect("Plain id should parse.").as_ref(), "job-42");
		assert_eq!(parse_job_id("job-42\n").expect("Padded id should parse.").as_ref(), "job-42");
		assert_eq!(
			parse_job_id("\"job-42\"").expect("Quoted id should parse.").as_ref(),
			"job-42"
		);
		assert!(matches!(parse_job_id(""), Err(Error::InvalidJobId(IdentifierError::Empty))));
		assert!(matches!(
			parse_job_id("not an id"),
			Err(Error::InvalidJobId(IdentifierError::ContainsWhitespace))
		));
	}

	#[test]
	fn json_decoding_reports_path_and_status() {
		let err = decode_json::<BisectJob>(&BrokerResponse::new(
			200,
			"{\"bisect_range\":[\"1\",\"2\"],\"gist\":7}",
		))
		.expect_err("Mistyped gist should fail to decode.");

		match err {
			Error::Decode(DecodeError::Json { source, status }) => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "gist");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
