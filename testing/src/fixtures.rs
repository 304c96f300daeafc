//! Page payloads shaped like the platform's replies.

use serde_json::{Value, json};

fn items(id_key: &str, ids: &[&str]) -> Vec<Value> {
    ids.iter().map(|id| json!({ id_key: id })).collect()
}

/// A user notes/likes/collects page.
#[must_use]
pub fn notes_page(ids: &[&str], cursor: &str, has_more: bool) -> Value {
    json!({"notes": items("note_id", ids), "cursor": cursor, "has_more": has_more})
}

/// A comments or sub-comments page.
#[must_use]
pub fn comments_page(ids: &[&str], cursor: &str, has_more: bool) -> Value {
    json!({"comments": items("id", ids), "cursor": cursor, "has_more": has_more})
}

/// A first-level comment that has more replies than it carries inline.
#[must_use]
pub fn comment_with_replies(id: &str, inline: &[&str], reply_cursor: &str) -> Value {
    json!({
        "id": id,
        "sub_comments": items("id", inline),
        "sub_comment_has_more": true,
        "sub_comment_cursor": reply_cursor
    })
}

/// A notification feed page; message cursors are numeric.
#[must_use]
pub fn messages_page(ids: &[&str], cursor: u64, has_more: bool) -> Value {
    json!({"message_list": items("id", ids), "cursor": cursor, "has_more": has_more})
}

/// A note search page.
#[must_use]
pub fn search_notes_page(ids: &[&str], has_more: bool) -> Value {
    json!({"items": items("id", ids), "has_more": has_more})
}

/// A user search page.
#[must_use]
pub fn search_users_page(ids: &[&str], has_more: bool) -> Value {
    json!({"users": items("id", ids), "has_more": has_more})
}

/// A homefeed page.
#[must_use]
pub fn homefeed_page(ids: &[&str], cursor_score: &str) -> Value {
    json!({"items": items("id", ids), "cursor_score": cursor_score})
}

/// A profile URL with access tokens.
#[must_use]
pub fn profile_url(user_id: &str) -> String {
    format!(
        "https://www.xiaohongshu.com/user/profile/{user_id}?xsec_token=tok-{user_id}&xsec_source=pc_note"
    )
}

/// A note URL with an access token.
#[must_use]
pub fn note_url(note_id: &str) -> String {
    format!("https://www.xiaohongshu.com/explore/{note_id}?xsec_token=tok-{note_id}")
}
