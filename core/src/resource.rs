//! Where items, cursors and identifiers live inside a primitive's payload.

use crate::error::GatewayError;
use crate::pagination::{Identified, Page};
use serde_json::Value;

/// How a resource addresses its next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorField {
    /// An opaque token under this key of the payload.
    Token(&'static str),
    /// A 1-based page number; the cursor is the number as text.
    PageNumber,
}

/// Layout of one paginated resource's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceShape {
    /// Key holding the item array.
    pub items_key: &'static str,
    /// Where the next cursor comes from.
    pub cursor: CursorField,
    /// Key holding each item's identifier.
    pub id_key: &'static str,
}

impl ResourceShape {
    /// User notes, likes and collects.
    pub const USER_NOTES: Self = Self {
        items_key: "notes",
        cursor: CursorField::Token("cursor"),
        id_key: "note_id",
    };

    /// First-level comments and sub-comments.
    pub const COMMENTS: Self = Self {
        items_key: "comments",
        cursor: CursorField::Token("cursor"),
        id_key: "id",
    };

    /// Mentions, likes-and-collects, and connection notifications.
    pub const MESSAGES: Self = Self {
        items_key: "message_list",
        cursor: CursorField::Token("cursor"),
        id_key: "id",
    };

    /// Note search results.
    pub const SEARCH_NOTES: Self = Self {
        items_key: "items",
        cursor: CursorField::PageNumber,
        id_key: "id",
    };

    /// User search results.
    pub const SEARCH_USERS: Self = Self {
        items_key: "users",
        cursor: CursorField::PageNumber,
        id_key: "id",
    };

    /// Homefeed recommendations.
    pub const HOMEFEED: Self = Self {
        items_key: "items",
        cursor: CursorField::Token("cursor_score"),
        id_key: "id",
    };

    /// Build a page from a primitive's payload, fetched at `cursor`.
    ///
    /// A null payload or a missing item key is an empty page. Numeric cursors
    /// are converted to text.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnexpectedFault`] when the payload is not an
    /// object or the item key does not hold an array.
    pub fn page_from(&self, data: Value, cursor: &str) -> Result<Page<RemoteItem>, GatewayError> {
        let mut data = match data {
            Value::Object(map) => map,
            Value::Null => return Ok(Page::new(Vec::new(), None)),
            other => {
                return Err(GatewayError::fault(format!(
                    "expected an object payload, got {}",
                    kind_of(&other)
                )));
            }
        };

        let items = match data.remove(self.items_key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(GatewayError::fault(format!(
                    "expected '{}' to be an array, got {}",
                    self.items_key,
                    kind_of(&other)
                )));
            }
        };

        let has_more = data.get("has_more").and_then(Value::as_bool);
        let next_cursor = if items.is_empty() && has_more.is_none() {
            None
        } else {
            match self.cursor {
                CursorField::Token(key) => data.get(key).and_then(cursor_text),
                CursorField::PageNumber => Some(page_number(cursor).saturating_add(1).to_string()),
            }
        };

        let items = items
            .into_iter()
            .map(|body| RemoteItem::new(body, self.id_key))
            .collect();

        Ok(Page {
            items,
            next_cursor,
            has_more,
        })
    }
}

/// Page number encoded in a page-number cursor; the empty cursor is page 1.
#[must_use]
pub fn page_number(cursor: &str) -> u32 {
    cursor.parse().ok().filter(|n| *n >= 1).unwrap_or(1)
}

/// Identifier stored under `id_key`, as text. Empty identifiers count as none.
#[must_use]
pub fn identity_of(item: &Value, id_key: &str) -> Option<String> {
    item.get(id_key).and_then(cursor_text).filter(|id| !id.is_empty())
}

/// A cursor value as text; numbers are rendered in decimal.
#[must_use]
pub fn cursor_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One item of a remote page: its JSON body plus its identifier, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteItem {
    id: Option<String>,
    body: Value,
}

impl RemoteItem {
    /// Wrap `body`, reading its identifier from `id_key`.
    #[must_use]
    pub fn new(body: Value, id_key: &str) -> Self {
        let id = identity_of(&body, id_key);
        Self { id, body }
    }

    /// The item's JSON.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Mutable access to the item's JSON.
    pub const fn body_mut(&mut self) -> &mut Value {
        &mut self.body
    }

    /// Unwrap into the item's JSON.
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }
}

impl Identified for RemoteItem {
    fn identity(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_cursor_page() {
        let page = ResourceShape::USER_NOTES
            .page_from(
                json!({
                    "notes": [{"note_id": "n1"}, {"note_id": "n2"}],
                    "cursor": "n2",
                    "has_more": true
                }),
                "",
            )
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].identity(), Some("n1"));
        assert_eq!(page.next_cursor.as_deref(), Some("n2"));
        assert_eq!(page.has_more, Some(true));
        assert!(!page.is_last());
    }

    #[test]
    fn test_numeric_cursor_becomes_text() {
        let page = ResourceShape::MESSAGES
            .page_from(
                json!({"message_list": [{"id": 7}], "cursor": 1_700_000_123, "has_more": true}),
                "",
            )
            .unwrap();
        assert_eq!(page.next_cursor.as_deref(), Some("1700000123"));
        assert_eq!(page.items[0].identity(), Some("7"));
    }

    #[test]
    fn test_page_number_cursor() {
        let page = ResourceShape::SEARCH_NOTES
            .page_from(json!({"items": [{"id": "a"}], "has_more": true}), "3")
            .unwrap();
        assert_eq!(page.next_cursor.as_deref(), Some("4"));

        let first = ResourceShape::SEARCH_USERS
            .page_from(json!({"users": [{"id": "u"}], "has_more": false}), "")
            .unwrap();
        assert_eq!(first.next_cursor.as_deref(), Some("2"));
        assert!(first.is_last());
    }

    #[test]
    fn test_empty_page_without_signal_ends() {
        let page = ResourceShape::HOMEFEED
            .page_from(json!({"items": [], "cursor_score": "1.7"}), "1.6")
            .unwrap();
        assert!(page.is_last());

        let null = ResourceShape::COMMENTS.page_from(Value::Null, "").unwrap();
        assert!(null.items.is_empty());
        assert!(null.is_last());
    }

    #[test]
    fn test_items_without_id() {
        let page = ResourceShape::COMMENTS
            .page_from(json!({"comments": [{"content": "hi"}, {"id": ""}]}), "")
            .unwrap();
        assert!(page.items.iter().all(|item| item.identity().is_none()));
    }

    #[test]
    fn test_malformed_payloads_fault() {
        let not_object = ResourceShape::COMMENTS.page_from(json!([1, 2]), "");
        assert!(matches!(not_object, Err(GatewayError::UnexpectedFault { .. })));

        let not_array = ResourceShape::COMMENTS.page_from(json!({"comments": "x"}), "");
        assert!(matches!(not_array, Err(GatewayError::UnexpectedFault { .. })));
    }

    #[test]
    fn test_page_number_parsing() {
        assert_eq!(page_number(""), 1);
        assert_eq!(page_number("0"), 1);
        assert_eq!(page_number("5"), 5);
    }
}
