use async_trait::async_trait;
use log::{debug, error};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// One GraphQL call: a named operation, its document and its variables.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlRequest {
    pub operation: &'static str,
    pub query: &'static str,
    pub variables: Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status code: {0}")]
    Status(reqwest::StatusCode),
    #[error("Request failed due to following response errors:\n{0}")]
    Response(String),
    #[error("Request returned no data")]
    EmptyData,
}

/// The remote mutation/read endpoint as seen by the orchestrator. One
/// method, single-attempt semantics; retry and rate limiting are explicitly
/// somebody else's problem.
#[async_trait]
pub trait GraphqlExecutor: Send + Sync {
    async fn execute(&self, request: GraphqlRequest) -> Result<Value, ApiError>;
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct GraphqlEnvelope {
    data: Option<Value>,
    errors: Option<Vec<GraphqlError>>,
}

/// GitHub GraphQL client. Authenticates with the run token; carries no
/// timeout layer, so a hung call blocks the run (the surrounding CI job
/// timeout is the backstop).
pub struct GithubClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GithubClient {
    pub fn new(endpoint: String, token: String) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GithubClient {
            http,
            endpoint,
            token,
        })
    }
}

#[async_trait]
impl GraphqlExecutor for GithubClient {
    async fn execute(&self, request: GraphqlRequest) -> Result<Value, ApiError> {
        let body = serde_json::json!({
            "query": request.query,
            "variables": request.variables,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("authorization", format!("token {}", self.token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("request: {}, status code: {}", request.operation, status);
            return Err(ApiError::Status(status));
        }

        let envelope: GraphqlEnvelope = response.json().await?;
        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let combined = errors
                .iter()
                .map(|e| format!(" - {}", e.message))
                .collect::<Vec<_>>()
                .join("\n");
            error!("Request failed due to following response errors:\n{combined}");
            debug!(
                "request: {}, status: failed, query: {}, variables: {}, data: {}",
                request.operation,
                request.query,
                request.variables,
                envelope.data.unwrap_or(Value::Null)
            );
            return Err(ApiError::Response(combined));
        }

        let data = envelope.data.ok_or(ApiError::EmptyData)?;
        debug!(
            "request: {}, status: success, query: {}, variables: {}, data: {}",
            request.operation, request.query, request.variables, data
        );
        Ok(data)
    }
}
