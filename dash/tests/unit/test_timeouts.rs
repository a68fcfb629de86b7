//! Request timeout tests

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use lepdash::http::inference::InferenceRequest;

use crate::mocks::{json_response, mock_client, MockTransport, Recorder};

#[tokio::test]
async fn test_one_shot_requests_carry_client_timeout() {
    let transport = MockTransport::new(|request| {
        if request.url.path().contains("/tuna/job/add") {
            Ok(json_response(200, r#"{"id":7,"status":"PENDING"}"#))
        } else {
            Ok(json_response(200, "{}"))
        }
    });
    let client = mock_client(transport.clone(), Arc::new(Recorder::default()))
        .await
        .with_timeout(Duration::from_secs(12));

    let request = InferenceRequest {
        method: http::Method::POST,
        url: "https://llama.example.com/run".parse().unwrap(),
        headers: vec![],
        body: Some(serde_json::json!({"prompt": "hi"})),
    };
    client.request_deployment("llama", request).await.unwrap();
    let job = client
        .add_fine_tune_job("train.jsonl", Bytes::from_static(b"{}\n"))
        .await
        .unwrap();
    assert_eq!(job.id, 7);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.timeout, Some(Duration::from_secs(12)));
    }
}

#[tokio::test]
async fn test_log_streams_have_no_timeout() {
    let transport = MockTransport::new(|_| Ok(json_response(200, "")));
    let client = mock_client(transport.clone(), Arc::new(Recorder::default()))
        .await
        .with_timeout(Duration::from_secs(12));

    let _ = client
        .open_deployment_replica_log("dep", "r1")
        .await
        .unwrap();
    assert_eq!(transport.requests()[0].timeout, None);
}
