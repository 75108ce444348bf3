//! Demonstrates the full job lifecycle against a mocked broker: queue a bisect job, poll it,
//! mark it complete, and stop it.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use bugbot_broker_client::{client::ReqwestBrokerClient, config::BrokerConfig, job::BisectCommand};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let queue_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/jobs").header("authorization", "Bearer demo-token");
			then.status(201).body("demo-job");
		})
		.await;
	let get_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/jobs/demo-job");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"demo-job\",\"type\":\"bisect\",\"history\":[]}");
		})
		.await;
	let complete_mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/jobs/demo-job");
			then.status(204);
		})
		.await;
	let stop_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/jobs/demo-job");
			then.status(204);
		})
		.await;
	let config = BrokerConfig::builder()
		.base_url_str(&server.base_url())?
		.auth_token("demo-token")
		.build()?;
	let client = ReqwestBrokerClient::new(config);
	let command = BisectCommand::new("10.0.0", "11.0.0", "abc123")?;
	let job_id = client.queue_bisect_job(&command).await?;

	println!("Queued bisect job {job_id}.");

	let job = client.get_job(&job_id).await?;

	println!("Broker reports job {}.", job.as_value());

	client.complete_job(&job_id).await?;
	client.stop_job(&job_id).await?;

	queue_mock.assert_async().await;
	get_mock.assert_async().await;
	complete_mock.assert_async().await;
	stop_mock.assert_async().await;

	Ok(())
}
