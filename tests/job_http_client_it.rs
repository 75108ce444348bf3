// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
use serde_json::{Value, json};
use time::OffsetDateTime;
// self
use bugbot_broker_client::{
	client::BrokerClient,
	config::BrokerConfig,
	error::{DecodeError, Error, TransportError},
	http::{BrokerRequest, BrokerResponse, HttpFuture, HttpMethod, JobHttpClient},
	job::{BisectCommand, BisectJob, CommandError, JobId},
	obs::{DiagnosticSink, MemorySink, OperationKind},
};

type FakeClient = BrokerClient<FakeHttpClient>;

#[derive(Debug)]
enum FakeTransportError {
	Refused,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Refused => write!(f, "Connection refused."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Transport that records every request and replays scripted responses in order.
#[derive(Default)]
struct FakeHttpClient {
	requests: Mutex<Vec<BrokerRequest>>,
	responses: Mutex<Vec<Result<BrokerResponse, FakeTransportError>>>,
}
impl FakeHttpClient {
	fn replying(
		responses: impl IntoIterator<Item = Result<BrokerResponse, FakeTransportError>>,
	) -> Self {
		let mut scripted = responses.into_iter().collect::<Vec<_>>();

		scripted.reverse();

		Self { requests: Mutex::default(), responses: Mutex::new(scripted) }
	}

	fn recorded(&self) -> Vec<BrokerRequest> {
		self.requests.lock().clone()
	}
}
impl JobHttpClient for FakeHttpClient {
	type TransportError = FakeTransportError;

	fn execute(
		&self,
		request: BrokerRequest,
	) -> HttpFuture<'_, BrokerResponse, FakeTransportError> {
		self.requests.lock().push(request);

		let next =
			self.responses.lock().pop().unwrap_or_else(|| Ok(BrokerResponse::new(200, "{}")));

		Box::pin(async move { next })
	}
}

fn config() -> BrokerConfig {
	BrokerConfig::builder()
		.base_url_str("https://broker.test")
		.expect("Base URL fixture should parse.")
		.auth_token("tok")
		.build()
		.expect("Broker configuration fixture should be valid.")
}

fn command() -> BisectCommand {
	BisectCommand::new("10.0.0", "11.0.0", "abc123")
		.expect("Bisect command fixture should be valid.")
}

fn now_millis() -> i64 {
	i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000)
		.expect("Current time should fit in i64 milliseconds.")
}

fn body_json(request: &BrokerRequest) -> Value {
	serde_json::from_slice(request.body.as_deref().expect("Request should carry a body."))
		.expect("Request body should be JSON.")
}

#[tokio::test]
async fn queued_jobs_carry_ordered_range_and_fresh_ids() {
	let transport = Arc::new(FakeHttpClient::replying([
		Ok(BrokerResponse::new(201, "job-1")),
		Ok(BrokerResponse::new(201, "\"job-2\"")),
	]));
	let client = FakeClient::with_http_client(config(), transport.clone());
	let before = now_millis();
	let first =
		client.queue_bisect_job(&command()).await.expect("First submission should succeed.");
	let second =
		client.queue_bisect_job(&command()).await.expect("Second submission should succeed.");
	let after = now_millis();

	assert_eq!(first.as_ref(), "job-1");
	assert_eq!(second.as_ref(), "job-2");

	let requests = transport.recorded();

	assert_eq!(requests.len(), 2);

	for request in &requests {
		assert_eq!(request.method, HttpMethod::Post);
		assert_eq!(request.url.as_str(), "https://broker.test/api/jobs");
		assert_eq!(request.header_value("authorization"), Some("Bearer tok"));
		assert_eq!(request.header_value("content-type"), Some("application/json"));

		let body = body_json(request);

		assert_eq!(body["bisect_range"], json!(["10.0.0", "11.0.0"]));
		assert_eq!(body["gist"], json!("abc123"));
		assert_eq!(body["history"], json!([]));
		assert_eq!(body["type"], json!("bisect"));

		let time_added = body["time_added"].as_i64().expect("time_added should be an integer.");

		assert!(
			(before..=after).contains(&time_added),
			"time_added {time_added} should fall within [{before}, {after}]."
		);
	}

	let ids = requests
		.iter()
		.map(|request| {
			serde_json::from_value::<BisectJob>(body_json(request))
				.expect("Request body should decode as a bisect job.")
				.id
		})
		.collect::<Vec<_>>();

	assert_ne!(ids[0], ids[1], "Every submission must generate a new job id.");
}

#[tokio::test]
async fn invalid_commands_never_reach_the_transport() {
	let transport = Arc::new(FakeHttpClient::default());
	let client = FakeClient::with_http_client(config(), transport.clone());
	let mut command = command();

	command.gist_id.clear();

	let err = client
		.queue_bisect_job(&command)
		.await
		.expect_err("Commands without a gist must be rejected.");

	assert!(matches!(err, Error::InvalidCommand(CommandError::Empty { field: "gist_id" })));
	assert!(transport.recorded().is_empty());
}

#[tokio::test]
async fn blank_broker_reply_is_not_a_job_id() {
	let transport = Arc::new(FakeHttpClient::replying([Ok(BrokerResponse::new(200, "  "))]));
	let client = FakeClient::with_http_client(config(), transport);
	let err = client
		.queue_bisect_job(&command())
		.await
		.expect_err("An empty body cannot identify a job.");

	assert!(matches!(err, Error::InvalidJobId(_)));
}

#[tokio::test]
async fn long_broker_ids_are_returned_intact() {
	let long_id = "x".repeat(200);
	let transport =
		Arc::new(FakeHttpClient::replying([Ok(BrokerResponse::new(201, long_id.clone()))]));
	let client = FakeClient::with_http_client(config(), transport);
	let id = client
		.queue_bisect_job(&command())
		.await
		.expect("Long broker ids should be accepted.");

	assert_eq!(id.as_ref(), long_id);
}

#[tokio::test]
async fn non_utf8_broker_reply_is_a_decode_error() {
	let transport =
		Arc::new(FakeHttpClient::replying([Ok(BrokerResponse::new(201, vec![0xff, 0xfe]))]));
	let client = FakeClient::with_http_client(config(), transport);
	let err = client
		.queue_bisect_job(&command())
		.await
		.expect_err("A non UTF-8 body cannot identify a job.");

	assert!(matches!(err, Error::Decode(DecodeError::Utf8 { status: 201, .. })));
}

#[tokio::test]
async fn transport_failures_surface_with_their_source() {
	let transport = Arc::new(FakeHttpClient::replying([Err(FakeTransportError::Refused)]));
	let sink_backend = Arc::new(MemorySink::default());
	let sink: Arc<dyn DiagnosticSink> = sink_backend.clone();
	let client = FakeClient::with_http_client(config(), transport).with_sink(sink);
	let job_id = JobId::new("job-42").expect("Job id fixture should be valid.");
	let err = client.complete_job(&job_id).await.expect_err("Refused connections should fail.");

	match &err {
		Error::Transport(TransportError::Network { source }) => {
			assert_eq!(source.to_string(), "Connection refused.");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	let events = sink_backend.events_for(OperationKind::CompleteJob);

	assert!(events.iter().any(|event| {
		event.message == "request"
			&& event.field("url") == Some("https://broker.test/api/jobs/job-42")
	}));
	assert!(events.iter().all(|event| event.message != "status"));
	assert!(events.iter().any(|event| event.message == "error"));
}

#[tokio::test]
async fn stop_and_complete_address_the_job_endpoint() {
	let transport = Arc::new(FakeHttpClient::replying([
		Ok(BrokerResponse::new(204, Vec::new())),
		Ok(BrokerResponse::new(200, Vec::new())),
	]));
	let client = FakeClient::with_http_client(config(), transport.clone());
	let job_id = JobId::new("job-42").expect("Job id fixture should be valid.");

	client.complete_job(&job_id).await.expect("Completion should succeed.");
	client.stop_job(&job_id).await.expect("Stopping should succeed.");

	let requests = transport.recorded();

	assert_eq!(requests[0].method, HttpMethod::Patch);
	assert_eq!(
		body_json(&requests[0]),
		json!([{ "op": "replace", "path": "/bot_client_data", "value": "complete" }])
	);
	assert_eq!(requests[1].method, HttpMethod::Delete);
	assert!(requests[1].body.is_none());

	for request in &requests {
		assert_eq!(request.url.as_str(), "https://broker.test/api/jobs/job-42");
		assert_eq!(request.header_value("authorization"), Some("Bearer tok"));
	}
}

#[tokio::test]
async fn shared_client_serves_concurrent_callers() {
	let transport = Arc::new(FakeHttpClient::default());
	let client = Arc::new(FakeClient::with_http_client(config(), transport.clone()));
	let first_id = JobId::new("job-1").expect("Job id fixture should be valid.");
	let second_id = JobId::new("job-2").expect("Job id fixture should be valid.");
	let first_client = client.clone();
	let second_client = client.clone();
	let (first, second) = tokio::join!(
		tokio::spawn(async move { first_client.get_job(&first_id).await }),
		tokio::spawn(async move { second_client.get_job(&second_id).await }),
	);

	first.expect("First task should not panic.").expect("First fetch should succeed.");
	second.expect("Second task should not panic.").expect("Second fetch should succeed.");

	let mut urls =
		transport.recorded().into_iter().map(|request| request.url.to_string()).collect::<Vec<_>>();

	urls.sort();

	assert_eq!(urls, ["https://broker.test/api/jobs/job-1", "https://broker.test/api/jobs/job-2"]);
}
