//! Share links
//!
//! The three fragments are serialized to JSON and encoded as URL-safe,
//! unpadded base64 so the token can travel in a `code` query parameter.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;
use url::Url;

use crate::fragment::SourceBundle;

/// Query parameter carrying the share token
pub const SHARE_QUERY_PARAM: &str = "code";

/// Base link used when none is configured
pub const DEFAULT_SHARE_BASE: &str = "livepen://open";

/// URL-safe alphabet, no padding on encode, padding tolerated on decode
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors from building or reading share links
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Share code is empty")]
    Empty,

    #[error("Share code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Share code is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Share code does not contain valid code data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid share base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Encode sources into a share token
pub fn encode(sources: &SourceBundle) -> Result<String, ShareError> {
    let json = serde_json::to_string(sources)?;
    Ok(TOKEN_ENGINE.encode(json.as_bytes()))
}

/// Decode a share token back into sources
pub fn decode(token: &str) -> Result<SourceBundle, ShareError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ShareError::Empty);
    }

    let bytes = TOKEN_ENGINE.decode(token)?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// Build a full share link: `{base}?code={token}`
///
/// Any query already on `base` is replaced.
pub fn share_link(base: &str, sources: &SourceBundle) -> Result<String, ShareError> {
    let mut url = Url::parse(base)?;
    let token = encode(sources)?;
    url.query_pairs_mut()
        .clear()
        .append_pair(SHARE_QUERY_PARAM, &token);
    Ok(url.into())
}

/// Pull the share token out of user input
///
/// Accepts a full link carrying a `code` parameter or a bare token. Returns
/// `None` when the input holds neither.
pub fn token_from_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(input) {
        return url
            .query_pairs()
            .find(|(key, _)| key == SHARE_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
    }

    let is_token = input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=');
    is_token.then(|| input.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_with_tricky_content() {
        let sources = SourceBundle::new(
            "<p title=\"a 'quoted' value\">ünïcödé 🚀</p>",
            "p::before { content: \"\\201C\"; }",
            "document.write('</script>'); // \"quotes\"",
        );

        let token = encode(&sources).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(decode(&token).unwrap(), sources);
    }

    #[test]
    fn test_decode_tolerates_padding_and_whitespace() {
        let sources = SourceBundle::new("a", "b", "c");
        let padded = base64::engine::general_purpose::URL_SAFE
            .encode(serde_json::to_string(&sources).unwrap());
        assert_eq!(decode(&format!("  {padded}\n")).unwrap(), sources);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode(""), Err(ShareError::Empty)));
        assert!(matches!(decode("!!!"), Err(ShareError::Base64(_))));

        let not_json = TOKEN_ENGINE.encode("hello");
        assert!(matches!(decode(&not_json), Err(ShareError::Json(_))));

        let not_utf8 = TOKEN_ENGINE.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode(&not_utf8), Err(ShareError::Utf8(_))));
    }

    #[test]
    fn test_decode_fills_missing_fields() {
        let token = TOKEN_ENGINE.encode(r#"{"html":"<p>only</p>"}"#);
        assert_eq!(decode(&token).unwrap(), SourceBundle::new("<p>only</p>", "", ""));
    }

    #[test]
    fn test_share_link_and_back() {
        let sources = SourceBundle::new("<h1>Hi</h1>", "h1{color:red}", "console.log(1)");
        let link = share_link("https://example.com/play?old=1", &sources).unwrap();

        assert!(link.starts_with("https://example.com/play?code="));
        assert!(!link.contains("old=1"));

        let token = token_from_input(&link).unwrap();
        assert_eq!(decode(&token).unwrap(), sources);
    }

    #[test]
    fn test_share_link_with_default_base() {
        let link = share_link(DEFAULT_SHARE_BASE, &SourceBundle::default()).unwrap();
        assert!(link.starts_with("livepen://open?code="));
    }

    #[test]
    fn test_share_link_rejects_bad_base() {
        assert!(matches!(
            share_link("not a url", &SourceBundle::default()),
            Err(ShareError::BaseUrl(_))
        ));
    }

    #[test]
    fn test_token_from_input() {
        assert_eq!(token_from_input("  abc-_123 ").as_deref(), Some("abc-_123"));
        assert_eq!(token_from_input("https://x.test/?code=tok").as_deref(), Some("tok"));
        assert_eq!(token_from_input("https://x.test/?other=1"), None);
        assert_eq!(token_from_input("https://x.test/?code="), None);
        assert_eq!(token_from_input("has spaces in it"), None);
        assert_eq!(token_from_input(""), None);
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_inverts_encode(html in ".*", css in ".*", js in ".*") {
                let sources = SourceBundle::new(html, css, js);
                let token = encode(&sources).map_err(|e| TestCaseError::fail(e.to_string()))?;
                let decoded = decode(&token).map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(decoded, sources);
            }
        }
    }
}
