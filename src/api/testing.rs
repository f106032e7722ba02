//! Scripted `RestClient` used by workflow tests

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::sync::Mutex;

use super::{ApiError, RestClient};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

type Handler = dyn Fn(&RecordedRequest, usize) -> Result<serde_json::Value, ApiError> + Send + Sync;

/// Answers every request through a handler closure and records it.
///
/// The handler receives the request and the number of earlier requests
/// that hit the same method + path (query string excluded).
pub struct ScriptedClient {
    handler: Box<Handler>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedClient {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest, usize) -> Result<serde_json::Value, ApiError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, route: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && route_of(&r.path) == route)
            .count()
    }
}

pub fn route_of(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

pub fn status_error(status: StatusCode, body: &str) -> ApiError {
    ApiError::Status {
        status,
        body: body.to_string(),
    }
}

#[async_trait]
impl RestClient for ScriptedClient {
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let request = RecordedRequest {
            method,
            path: path.to_string(),
            body,
        };

        let previous = {
            let mut requests = self.requests.lock().unwrap();
            let previous = requests
                .iter()
                .filter(|r| r.method == request.method && route_of(&r.path) == route_of(path))
                .count();
            requests.push(request.clone());
            previous
        };

        let value = (self.handler)(&request, previous)?;
        Ok(value.to_string())
    }
}
