//! Protocol tests over an in-memory duplex stream.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use notebridge_core::{
    AggregationLimits, ContentPlatformClient, CredentialStore, OperationDispatcher, PlatformCall,
    PlatformFault, PlatformReply, SessionContext,
};
use notebridge_testing::{Scripted, ScriptedPlatformClient, fixtures, helpers};
use notebridge_tools::{ServerInfo, ToolServer, catalogue_registry};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, WriteHalf};
use tokio::task::JoinHandle;

struct Session {
    writer: WriteHalf<DuplexStream>,
    lines: Lines<BufReader<tokio::io::ReadHalf<DuplexStream>>>,
    server: JoinHandle<std::io::Result<()>>,
}

impl Session {
    fn start(dispatcher: &OperationDispatcher) -> Self {
        let (client_io, server_io) = tokio::io::duplex(256 * 1024);
        let (server_read, server_write) = tokio::io::split(server_io);
        let server = ToolServer::new(
            catalogue_registry(dispatcher),
            ServerInfo {
                name: "notebridge".to_string(),
                version: "test".to_string(),
            },
        );
        let server = tokio::spawn(server.serve(server_read, server_write));

        let (client_read, writer) = tokio::io::split(client_io);
        Self {
            writer,
            lines: BufReader::new(client_read).lines(),
            server,
        }
    }

    async fn send(&mut self, message: Value) {
        let mut line = message.to_string();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timed out waiting for a response")
            .unwrap()
            .expect("server closed the stream");
        serde_json::from_str(&line).unwrap()
    }

    async fn request(&mut self, id: i64, method: &str, params: Value) -> Value {
        self.send(json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await;
        let response = self.recv().await;
        assert_eq!(response["id"], json!(id));
        response
    }

    async fn close(mut self) {
        self.writer.shutdown().await.unwrap();
        self.server.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_initialize_and_list() {
    let client = ScriptedPlatformClient::new();
    let mut session = Session::start(&helpers::dispatcher(&client, None));

    let init = session
        .request(1, "initialize", json!({"protocolVersion": "2025-03-26"}))
        .await;
    assert_eq!(init["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(init["result"]["serverInfo"]["name"], "notebridge");
    assert!(init["result"]["capabilities"]["tools"].is_object());

    session
        .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .await;

    let ping = session.request(2, "ping", Value::Null).await;
    assert_eq!(ping["result"], json!({}));

    let list = session.request(3, "tools/list", json!({})).await;
    let tools = list["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 32);
    let search = tools.iter().find(|t| t["name"] == "search_some_notes").unwrap();
    assert_eq!(search["inputSchema"]["required"], json!(["query"]));

    session.close().await;
}

#[tokio::test]
async fn test_tool_call_returns_envelope() {
    let client = ScriptedPlatformClient::new()
        .on("user_notes", "", Scripted::ok(fixtures::notes_page(&["a", "b"], "b", true)))
        .on("user_notes", "b", Scripted::ok(fixtures::notes_page(&["c"], "", false)));
    let mut session = Session::start(&helpers::dispatcher(&client, Some("web_session=1")));

    let response = session
        .request(
            7,
            "tools/call",
            json!({"name": "get_user_all_notes", "arguments": {"user_url": fixtures::profile_url("u1")}}),
        )
        .await;

    let result = &response["result"];
    assert_eq!(result["isError"], json!(false));
    assert_eq!(result["structuredContent"]["success"], json!(true));
    assert_eq!(
        result["structuredContent"]["data"],
        json!([{"note_id": "a"}, {"note_id": "b"}, {"note_id": "c"}])
    );
    let text: Value = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(text, result["structuredContent"]);

    session.close().await;
}

#[tokio::test]
async fn test_failed_operation_is_error_result() {
    let client = ScriptedPlatformClient::new();
    let mut session = Session::start(&helpers::dispatcher(&client, None));

    let response = session
        .request(1, "tools/call", json!({"name": "get_user_self_info", "arguments": {}}))
        .await;

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], json!(true));
    assert_eq!(response["result"]["structuredContent"]["code"], "CREDENTIAL_MISSING");
    assert_eq!(client.call_count(), 0);

    session.close().await;
}

#[tokio::test]
async fn test_protocol_errors() {
    let client = ScriptedPlatformClient::new();
    let mut session = Session::start(&helpers::dispatcher(&client, None));

    let unknown_tool = session
        .request(1, "tools/call", json!({"name": "no_such_tool", "arguments": {}}))
        .await;
    assert_eq!(unknown_tool["error"]["code"], -32602);

    let bad_arguments = session
        .request(2, "tools/call", json!({"name": "get_cookies", "arguments": [1]}))
        .await;
    assert_eq!(bad_arguments["error"]["code"], -32602);

    let unknown_method = session.request(3, "resources/list", json!({})).await;
    assert_eq!(unknown_method["error"]["code"], -32601);

    session.close().await;
}

#[tokio::test]
async fn test_cookies_round_trip_over_tools() {
    let client = ScriptedPlatformClient::new();
    let mut session = Session::start(&helpers::dispatcher(&client, None));

    let set = session
        .request(
            1,
            "tools/call",
            json!({"name": "set_cookies", "arguments": {"cookies": "web_session=secret"}}),
        )
        .await;
    assert_eq!(set["result"]["isError"], json!(false));

    let status = session
        .request(2, "tools/call", json!({"name": "get_cookies"}))
        .await;
    let data = &status["result"]["structuredContent"]["data"];
    assert_eq!(data["has_cookies"], json!(true));
    assert_eq!(data["cookies_length"], json!(18));
    assert!(!status.to_string().contains("secret"));

    session.close().await;
}

/// A feed that never ends: every page promises another.
#[derive(Default)]
struct EndlessFeed {
    calls: AtomicUsize,
}

#[async_trait]
impl ContentPlatformClient for EndlessFeed {
    async fn call(
        &self,
        call: PlatformCall,
        _session: &SessionContext,
    ) -> Result<PlatformReply, PlatformFault> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        match call {
            PlatformCall::Mentions { .. } => Ok(PlatformReply::ok(fixtures::messages_page(
                &[&format!("m{n}")],
                u64::try_from(n + 1).unwrap(),
                true,
            ))),
            _ => Ok(PlatformReply::failed("unsupported")),
        }
    }
}

#[tokio::test]
async fn test_cancellation_stops_aggregation() {
    let feed = Arc::new(EndlessFeed::default());
    let dispatcher = OperationDispatcher::new(
        Arc::new(CredentialStore::seeded(Some("c=1".to_string()))),
        feed.clone(),
        AggregationLimits::default(),
    );
    let mut session = Session::start(&dispatcher);

    session
        .send(json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": {"name": "get_all_mentions", "arguments": {}}
        }))
        .await;

    while feed.calls.load(Ordering::SeqCst) < 3 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    session
        .send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": {"requestId": 5, "reason": "user abort"}
        }))
        .await;

    // Let the aggregation notice, then make sure it stopped.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let stopped_at = feed.calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(feed.calls.load(Ordering::SeqCst), stopped_at);

    // The cancelled call gets no response; the next request is answered.
    let ping = session.request(6, "ping", json!({})).await;
    assert_eq!(ping["result"], json!({}));

    session.close().await;
}

#[tokio::test]
async fn test_reused_in_flight_id_is_rejected() {
    let feed = Arc::new(EndlessFeed::default());
    let dispatcher = OperationDispatcher::new(
        Arc::new(CredentialStore::seeded(Some("c=1".to_string()))),
        feed.clone(),
        AggregationLimits::default(),
    );
    let mut session = Session::start(&dispatcher);

    let call = json!({
        "jsonrpc": "2.0",
        "id": 9,
        "method": "tools/call",
        "params": {"name": "get_all_mentions", "arguments": {}}
    });
    session.send(call.clone()).await;
    while feed.calls.load(Ordering::SeqCst) < 1 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    session.send(call).await;
    let duplicate = session.recv().await;
    assert_eq!(duplicate["id"], json!(9));
    assert_eq!(duplicate["error"]["code"], -32600);

    // The original call is still the one a cancellation reaches.
    session
        .send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": {"requestId": 9}
        }))
        .await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let stopped_at = feed.calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(feed.calls.load(Ordering::SeqCst), stopped_at);

    let ping = session.request(10, "ping", json!({})).await;
    assert_eq!(ping["result"], json!({}));

    session.close().await;
}
