//! ApiTransport - the seam between portal operations and the wire

use async_trait::async_trait;
use serde_json::Value;
use shared::Result;

/// Query parameters, in the order they are sent
pub type Query = Vec<(String, String)>;

/// Build one query parameter
pub fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

/// Signed JSON requests against one portal
///
/// Paths are relative to the API base (e.g. `/device/devices`); they are the
/// paths that get signed.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value>;

    async fn post(&self, path: &str, query: &[(String, String)], body: &Value) -> Result<Value>;
}
