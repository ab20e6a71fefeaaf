use crate::io_struct::{ChatReqInput, Identity};
use crate::request_log::LogMode;
use crate::server::RelayError;
use actix_web::HttpResponse;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub log_mode: LogMode,
    pub identity_base: String,
    pub completion_base: String,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct RelayState {
    pub client: reqwest::Client,
    pub identity_base: String,
    pub completion_base: String,
    pub log_mode: LogMode,
}

/// An accepted upstream completion: its status and the live byte stream.
/// The stream is single-pass and must not be buffered or parsed.
pub struct RelayedCompletion {
    pub status: actix_web::http::StatusCode,
    pub body: Pin<Box<dyn Stream<Item = Result<Bytes, actix_web::Error>> + Send>>,
}

impl RelayedCompletion {
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::build(self.status)
            .content_type("application/octet-stream")
            .streaming(self.body)
    }
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            identity_base: config.identity_base.clone(),
            completion_base: config.completion_base.clone(),
            log_mode: config.log_mode,
        })
    }

    /// One authenticated call to the identity API; failure aborts the whole
    /// request before any completion traffic.
    pub async fn resolve_identity(&self, token: &str) -> Result<Identity, RelayError> {
        let url = api_url(&self.identity_base, "/user");
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| RelayError::IdentityUpstream(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(RelayError::IdentityUpstream(format!(
                "identity API returned {}",
                resp.status()
            )));
        }
        resp.json::<Identity>()
            .await
            .map_err(|e| RelayError::IdentityUpstream(e.to_string()))
    }

    /// Forwards the augmented request to the completion API with streaming
    /// forced on and hands back the raw body stream. Chunks are passed
    /// through as the transport delivers them.
    pub async fn relay_completion(
        &self,
        token: &str,
        req: &ChatReqInput,
    ) -> Result<RelayedCompletion, RelayError> {
        let mut payload = serde_json::to_value(req)
            .map_err(|e| RelayError::CompletionUpstream(format!("unencodable request: {}", e)))?;
        payload["stream"] = serde_json::Value::Bool(true);

        let url = api_url(&self.completion_base, "/chat/completions");
        let resp = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::CompletionUpstream(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RelayError::CompletionUpstream(format!(
                "completion API returned {}",
                status
            )));
        }
        let status = actix_web::http::StatusCode::from_u16(status.as_u16())
            .map_err(|e| RelayError::CompletionUpstream(format!("invalid status code: {}", e)))?;
        let body = resp
            .bytes_stream()
            .map(|r| r.map_err(actix_web::error::ErrorBadGateway));
        Ok(RelayedCompletion {
            status,
            body: Box::pin(body),
        })
    }
}

fn api_url(base: &str, api_path: &str) -> String {
    let base = base.trim_end_matches('/');
    if api_path.starts_with('/') {
        format!("{}{}", base, api_path)
    } else {
        format!("{}/{}", base, api_path)
    }
}
