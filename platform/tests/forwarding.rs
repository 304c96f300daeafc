//! Forwarding client tests against a mock sidecar.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use notebridge_core::platform::UserPageQuery;
use notebridge_core::{
    ContentPlatformClient, CredentialStore, GatewayError, PlatformCall, PlatformFault,
    SessionContext, platform::invoke,
};
use notebridge_platform::ForwardingPlatformClient;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ForwardingPlatformClient {
    ForwardingPlatformClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn session(cookies: &str) -> SessionContext {
    let store = CredentialStore::seeded(Some(cookies.to_string()));
    SessionContext {
        credential: Some(store.get().unwrap()),
        proxy: None,
    }
}

fn notes_call(cursor: &str) -> PlatformCall {
    PlatformCall::UserNotes(UserPageQuery {
        user_id: "u1".to_string(),
        cursor: cursor.to_string(),
        xsec_token: "tok".to_string(),
        xsec_source: "pc_feed".to_string(),
    })
}

#[tokio::test]
async fn test_forwards_call_and_decodes_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .and(body_json(json!({
            "call": {
                "primitive": "user_notes",
                "user_id": "u1",
                "cursor": "c1",
                "xsec_token": "tok",
                "xsec_source": "pc_feed"
            },
            "cookies": "web_session=abc"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "msg": "成功",
            "data": {"notes": [], "cursor": "", "has_more": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .call(notes_call("c1"), &session("web_session=abc"))
        .await
        .unwrap();

    assert!(reply.success);
    assert_eq!(reply.message, "成功");
    assert_eq!(reply.data["has_more"], json!(false));
}

#[tokio::test]
async fn test_declared_failure_is_a_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "account blocked"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = invoke(&client, notes_call(""), &session("c=1")).await;

    match result {
        Err(GatewayError::PrimitiveFailure { message }) => assert_eq!(message, "account blocked"),
        other => unreachable!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_proxies_are_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .and(body_partial_json(json!({
            "proxies": {"https": "http://127.0.0.1:9"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session("c=1");
    session.proxy = Some(serde_json::from_value(json!({"https": "http://127.0.0.1:9"})).unwrap());

    let reply = client_for(&server)
        .call(PlatformCall::SelfInfo, &session)
        .await
        .unwrap();
    assert!(reply.success);
    assert_eq!(reply.message, "");
}

#[tokio::test]
async fn test_non_success_status_is_a_fault() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(ResponseTemplate::new(503).set_body_string("sidecar restarting"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .call(PlatformCall::UnreadMessages, &session("c=1"))
        .await;

    match result {
        Err(PlatformFault::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "sidecar restarting");
        }
        other => unreachable!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_a_fault() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .call(PlatformCall::UnreadMessages, &session("c=1"))
        .await;
    assert!(matches!(result, Err(PlatformFault::Decode(_))));
}

#[tokio::test]
async fn test_fault_becomes_unexpected_fault() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = invoke(&client, PlatformCall::SelfInfoV2, &session("c=1")).await;
    assert!(matches!(result, Err(GatewayError::UnexpectedFault { .. })));
}

#[tokio::test]
async fn test_slow_sidecar_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client =
        ForwardingPlatformClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let result = client
        .call(PlatformCall::SelfInfo, &session("c=1"))
        .await;
    assert!(matches!(result, Err(PlatformFault::Transport(_))));
}

#[tokio::test]
async fn test_unreachable_sidecar_is_a_transport_fault() {
    // Bind and drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client =
        ForwardingPlatformClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(1))
            .unwrap();

    let result = client
        .call(PlatformCall::SelfInfo, &SessionContext::default())
        .await;
    assert!(matches!(result, Err(PlatformFault::Transport(_))));
}
