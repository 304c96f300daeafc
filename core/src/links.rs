//! Profile and note URLs.
//!
//! Operations addressed by URL take the identifier from the last path
//! segment and the access tokens from the query string, e.g.
//! `https://www.xiaohongshu.com/user/profile/<user_id>?xsec_token=…&xsec_source=pc_note`.

use crate::error::GatewayError;
use url::Url;

/// Identifier and access tokens pulled from a platform URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    /// Last path segment.
    pub id: String,
    /// `xsec_token` query value, empty when absent.
    pub xsec_token: String,
    /// `xsec_source` query value, empty when absent.
    pub xsec_source: String,
}

impl ResourceLink {
    /// Parse `raw`, reporting failures against parameter `field`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the URL does not parse or has no
    /// identifier segment.
    pub fn parse(field: &str, raw: &str) -> Result<Self, GatewayError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| GatewayError::validation(field, format!("not a valid URL: {e}")))?;

        let id = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(str::to_owned)
            .ok_or_else(|| GatewayError::validation(field, "URL has no identifier segment"))?;

        let mut link = Self {
            id,
            xsec_token: String::new(),
            xsec_source: String::new(),
        };
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "xsec_token" => link.xsec_token = value.into_owned(),
                "xsec_source" => link.xsec_source = value.into_owned(),
                _ => {}
            }
        }
        Ok(link)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url() {
        let link = ResourceLink::parse(
            "user_url",
            "https://www.xiaohongshu.com/user/profile/5f1a2b3c?xsec_token=AB%3D%3D&xsec_source=pc_search",
        )
        .unwrap();
        assert_eq!(link.id, "5f1a2b3c");
        assert_eq!(link.xsec_token, "AB==");
        assert_eq!(link.xsec_source, "pc_search");
    }

    #[test]
    fn test_note_url_without_tokens() {
        let link =
            ResourceLink::parse("url", "https://www.xiaohongshu.com/explore/64ab12/").unwrap();
        assert_eq!(link.id, "64ab12");
        assert!(link.xsec_token.is_empty());
    }

    #[test]
    fn test_rejects_non_url() {
        let err = ResourceLink::parse("user_url", "not a url").unwrap_err();
        assert!(matches!(err, GatewayError::Validation { ref field, .. } if field == "user_url"));
    }

    #[test]
    fn test_rejects_missing_identifier() {
        assert!(ResourceLink::parse("url", "https://www.xiaohongshu.com/").is_err());
    }
}
