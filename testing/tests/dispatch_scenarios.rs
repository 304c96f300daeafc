//! End-to-end dispatcher scenarios against a scripted platform.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use notebridge_core::{
    AbortHandle, AbortSignal, AggregationLimits, ErrorCode, OperationKind, Params, PlatformCall,
};
use notebridge_testing::{Scripted, ScriptedPlatformClient, fixtures, helpers};
use serde_json::json;

const COOKIES: &str = "a1=x; web_session=abc";

fn ids(data: &serde_json::Value, key: &str) -> Vec<String> {
    data.as_array()
        .unwrap()
        .iter()
        .map(|item| item[key].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_all_likes_follows_cursor_chain() {
    helpers::init_tracing();
    let client = ScriptedPlatformClient::new()
        .on("user_likes", "", Scripted::ok(fixtures::notes_page(&["n1", "n2"], "c1", true)))
        .on("user_likes", "c1", Scripted::ok(fixtures::notes_page(&["n2", "n3"], "c2", true)))
        .on("user_likes", "c2", Scripted::ok(fixtures::notes_page(&["n4"], "", false)));
    let dispatcher = helpers::dispatcher(&client, Some(COOKIES));

    let params = Params::new().with("user_url", fixtures::profile_url("u9"));
    let envelope = dispatcher
        .dispatch(OperationKind::GetUserAllLikes, &params, &AbortSignal::never())
        .await;

    assert!(envelope.ok, "{}", envelope.message);
    assert_eq!(ids(envelope.data.as_ref().unwrap(), "note_id"), ["n1", "n2", "n3", "n4"]);
    assert_eq!(client.cursors("user_likes"), ["", "c1", "c2"]);

    let calls = client.calls();
    assert!(calls.iter().all(|c| c.credential.as_deref() == Some(COOKIES)));
    assert!(matches!(
        &calls[0].call,
        PlatformCall::UserLikes(query)
            if query.user_id == "u9"
                && query.xsec_token == "tok-u9"
                && query.xsec_source == "pc_note"
    ));
}

#[tokio::test]
async fn test_all_mentions_with_numeric_cursor() {
    let client = ScriptedPlatformClient::new()
        .on("mentions", "", Scripted::ok(fixtures::messages_page(&["m1", "m2"], 17, true)))
        .on("mentions", "17", Scripted::ok(fixtures::messages_page(&["m3"], 0, false)));
    let dispatcher = helpers::dispatcher(&client, Some(COOKIES));

    let envelope = dispatcher
        .dispatch(OperationKind::GetAllMentions, &Params::new(), &AbortSignal::never())
        .await;

    assert!(envelope.ok);
    assert_eq!(ids(envelope.data.as_ref().unwrap(), "id"), ["m1", "m2", "m3"]);
    assert_eq!(envelope.message, "fetched 3 items across 2 pages (exhausted)");
}

#[tokio::test]
async fn test_search_some_users_truncates_to_num() {
    let client = ScriptedPlatformClient::new()
        .on("search_users", "1", Scripted::ok(fixtures::search_users_page(&["u1", "u2", "u3"], true)))
        .on("search_users", "2", Scripted::ok(fixtures::search_users_page(&["u4", "u5", "u6"], true)));
    let dispatcher = helpers::dispatcher(&client, Some(COOKIES));

    let params = Params::new().with("query", "coffee").with("num", 5);
    let envelope = dispatcher
        .dispatch(OperationKind::SearchSomeUsers, &params, &AbortSignal::never())
        .await;

    assert!(envelope.ok);
    assert_eq!(ids(envelope.data.as_ref().unwrap(), "id"), ["u1", "u2", "u3", "u4", "u5"]);
    assert_eq!(client.cursors("search_users"), ["1", "2"]);
}

#[tokio::test]
async fn test_search_some_notes_short_result() {
    let client = ScriptedPlatformClient::new()
        .on("search_notes", "1", Scripted::ok(fixtures::search_notes_page(&["a"], false)));
    let dispatcher = helpers::dispatcher(&client, Some(COOKIES));

    let params = Params::new().with("query", "tea").with("num", 10);
    let envelope = dispatcher
        .dispatch(OperationKind::SearchSomeNotes, &params, &AbortSignal::never())
        .await;

    assert!(envelope.ok);
    assert_eq!(envelope.data, Some(json!([{"id": "a"}])));
    assert!(envelope.message.contains("exhausted before target of 10"));
}

#[tokio::test]
async fn test_invalid_filter_never_reaches_platform() {
    let client = ScriptedPlatformClient::new();
    let dispatcher = helpers::dispatcher(&client, Some(COOKIES));

    let params = Params::new().with("query", "tea").with("sort_type", 9);
    let envelope = dispatcher
        .dispatch(OperationKind::SearchNotes, &params, &AbortSignal::never())
        .await;

    assert!(!envelope.ok);
    assert_eq!(envelope.code, Some(ErrorCode::ValidationError));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_proxies_are_forwarded() {
    let client = ScriptedPlatformClient::new()
        .on("user_info", "", Scripted::ok(json!({"nickname": "x"})));
    let dispatcher = helpers::dispatcher(&client, Some(COOKIES));

    let params = Params::new()
        .with("user_id", "u1")
        .with("proxies", json!({"https": "http://127.0.0.1:8080"}));
    let envelope = dispatcher
        .dispatch(OperationKind::GetUserInfo, &params, &AbortSignal::never())
        .await;

    assert!(envelope.ok);
    let proxy = client.calls()[0].proxy.clone().unwrap();
    assert_eq!(
        serde_json::to_value(proxy).unwrap(),
        json!({"https": "http://127.0.0.1:8080"})
    );
}

#[tokio::test]
async fn test_page_ceiling_stalls_endless_feed() {
    let client = ScriptedPlatformClient::new()
        .on("new_connections", "", Scripted::ok(fixtures::messages_page(&["a"], 1, true)))
        .on("new_connections", "1", Scripted::ok(fixtures::messages_page(&["b"], 2, true)))
        .on("new_connections", "2", Scripted::ok(fixtures::messages_page(&["c"], 3, true)));
    let limits = AggregationLimits {
        max_pages: 3,
        deadline: None,
    };
    let dispatcher = helpers::dispatcher_with_limits(&client, Some(COOKIES), limits);

    let envelope = dispatcher
        .dispatch(OperationKind::GetAllConnections, &Params::new(), &AbortSignal::never())
        .await;

    assert!(!envelope.ok);
    assert_eq!(envelope.code, Some(ErrorCode::AggregationStalled));
    assert_eq!(envelope.data, None);
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn test_aborted_signal_cancels_before_first_page() {
    let client = ScriptedPlatformClient::new().otherwise(Scripted::ok(json!({})));
    let dispatcher = helpers::dispatcher(&client, Some(COOKIES));
    let (handle, signal) = AbortHandle::pair();
    handle.abort();

    let envelope = dispatcher
        .dispatch(OperationKind::GetAllLikes, &Params::new(), &signal)
        .await;

    assert!(!envelope.ok);
    assert_eq!(envelope.code, Some(ErrorCode::Cancelled));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_nested_comments_from_url() {
    let top = json!({
        "comments": [
            fixtures::comment_with_replies("c1", &["r1"], "rc1"),
            {"id": "c2", "sub_comments": [], "sub_comment_has_more": false}
        ],
        "cursor": "",
        "has_more": false
    });
    let client = ScriptedPlatformClient::new()
        .on("note_comments", "", Scripted::ok(top))
        .on("note_sub_comments", "rc1", Scripted::ok(fixtures::comments_page(&["r1", "r2"], "", false)));
    let dispatcher = helpers::dispatcher(&client, Some(COOKIES));

    let params = Params::new().with("url", fixtures::note_url("n1"));
    let envelope = dispatcher
        .dispatch(OperationKind::GetNoteAllComment, &params, &AbortSignal::never())
        .await;

    assert!(envelope.ok, "{}", envelope.message);
    let data = envelope.data.unwrap();
    assert_eq!(ids(&data[0]["sub_comments"], "id"), ["r1", "r2"]);
    assert_eq!(data[0]["sub_comment_has_more"], json!(false));
    assert_eq!(
        envelope.message,
        "fetched 2 comments and 1 additional replies across 2 pages"
    );
}

#[tokio::test]
async fn test_cookies_set_at_runtime_are_used() {
    let client = ScriptedPlatformClient::new()
        .on("self_info", "", Scripted::ok(json!({"user_id": "me"})));
    let dispatcher = helpers::dispatcher(&client, None);

    let before = dispatcher
        .dispatch(OperationKind::GetUserSelfInfo, &Params::new(), &AbortSignal::never())
        .await;
    assert_eq!(before.code, Some(ErrorCode::CredentialMissing));

    let set = dispatcher
        .dispatch(
            OperationKind::SetCookies,
            &Params::new().with("cookies", COOKIES),
            &AbortSignal::never(),
        )
        .await;
    assert!(set.ok);

    let after = dispatcher
        .dispatch(OperationKind::GetUserSelfInfo, &Params::new(), &AbortSignal::never())
        .await;
    assert!(after.ok);
    assert_eq!(client.calls()[0].credential.as_deref(), Some(COOKIES));
}
