//! MockTransport - in-process stand-in for a portal
//!
//! Requests are answered by a handler closure and recorded, so tests can
//! assert both on results and on what would have gone over the wire.

use async_trait::async_trait;
use serde_json::Value;
use shared::Result;
use std::sync::Mutex;

use crate::transport::ApiTransport;

/// One request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type Handler = dyn Fn(&RecordedRequest) -> Result<Value> + Send + Sync;

pub struct MockTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn handle(&self, request: RecordedRequest) -> Result<Value> {
        let result = (self.handler)(&request);
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        result
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.handle(RecordedRequest {
            method: "GET",
            path: path.to_string(),
            query: query.to_vec(),
            body: None,
        })
    }

    async fn post(&self, path: &str, query: &[(String, String)], body: &Value) -> Result<Value> {
        self.handle(RecordedRequest {
            method: "POST",
            path: path.to_string(),
            query: query.to_vec(),
            body: Some(body.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::param;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_requests() {
        let mock = MockTransport::new(|req| Ok(json!({ "path": req.path })));
        let value = mock
            .post("/debug/", &[param("collectorId", 4)], &json!({ "cmd": "x" }))
            .await
            .unwrap();

        assert_eq!(value["path"], "/debug/");
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].param("collectorId"), Some("4"));
        assert_eq!(calls[0].body, Some(json!({ "cmd": "x" })));
    }
}
