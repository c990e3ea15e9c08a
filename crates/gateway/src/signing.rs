//! LMv1 request signing
//!
//! The signed message is `verb + timestamp + body + path`. The HMAC-SHA256 of
//! that message is hex encoded, and the hex *string* is then base64 encoded.
//! The server recomputes the same value, so the body must be the exact bytes
//! that go on the wire and the path must exclude the API base and query.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::PortalCredentials;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Authorization scheme name
pub const AUTH_SCHEME: &str = "LMv1";

/// Compute the encoded signature for one request
pub fn signature(secret: &str, verb: &str, timestamp_ms: i64, body: &str, path: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(verb.as_bytes());
    mac.update(timestamp_ms.to_string().as_bytes());
    mac.update(body.as_bytes());
    mac.update(path.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());
    BASE64.encode(digest)
}

/// Signs requests for one portal token
#[derive(Clone)]
pub struct RequestSigner {
    access_id: String,
    access_key: String,
}

impl RequestSigner {
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_key: access_key.into(),
        }
    }

    pub fn from_credentials(credentials: &PortalCredentials) -> Self {
        Self::new(&credentials.access_id, &credentials.access_key)
    }

    /// `Authorization` header value for a request at `timestamp_ms`
    pub fn authorization(
        &self,
        verb: &str,
        path: &str,
        body: Option<&str>,
        timestamp_ms: i64,
    ) -> String {
        let sig = signature(
            &self.access_key,
            verb,
            timestamp_ms,
            body.unwrap_or(""),
            path,
        );
        format!("{} {}:{}:{}", AUTH_SCHEME, self.access_id, sig, timestamp_ms)
    }

    /// `Authorization` header value stamped with the current time
    pub fn authorization_now(&self, verb: &str, path: &str, body: Option<&str>) -> String {
        self.authorization(verb, path, body, chrono::Utc::now().timestamp_millis())
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_id", &self.access_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: i64 = 1_700_000_000_000;

    // Vectors computed independently with Python's hmac/hashlib/base64 modules
    const GET_VECTOR: &str =
        "YjA4M2M2OWM2MTY5ZmE5MjNlYTJhZWZmMjhiZDcxMmNiZWY0NmY0NmRhZjUzMzkzZDVjM2RhN2YxZTI1NmJhZA==";
    const POST_VECTOR: &str =
        "NjZlM2IwN2RkODgwZmJlNzE3MDlhODA5NTljYTU0ODY3MTQyZmQ4YWUyM2RmMTQ4Y2FkNDBlNDIzMDI3MmY2Yw==";

    #[test]
    fn test_signature_get_without_body() {
        assert_eq!(
            signature("secret-key", "GET", TS, "", "/device/devices"),
            GET_VECTOR
        );
    }

    #[test]
    fn test_signature_post_with_body() {
        assert_eq!(
            signature("secret-key", "POST", TS, r#"{"cmd":"!groovy"}"#, "/debug/"),
            POST_VECTOR
        );
    }

    #[test]
    fn test_signature_is_base64_of_hex() {
        let sig = signature("k", "GET", 1, "", "/x");
        let decoded = BASE64.decode(&sig).unwrap();
        let hex_text = String::from_utf8(decoded).unwrap();
        assert_eq!(hex_text.len(), 64);
        assert!(hex_text.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_signature_depends_on_body() {
        let empty = signature("k", "POST", TS, "", "/debug/");
        let with_body = signature("k", "POST", TS, "{}", "/debug/");
        assert_ne!(empty, with_body);
    }

    #[test]
    fn test_authorization_header_format() {
        let signer = RequestSigner::new("my-id", "secret-key");
        let header = signer.authorization("GET", "/device/devices", None, TS);
        assert_eq!(
            header,
            format!("LMv1 my-id:{}:{}", GET_VECTOR, TS)
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = RequestSigner::new("my-id", "secret-key");
        let debug = format!("{:?}", signer);
        assert!(debug.contains("my-id"));
        assert!(!debug.contains("secret-key"));
    }
}
