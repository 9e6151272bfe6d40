use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client};
use shared::error::FetchError;
use url::Url;

/// Status and body of one GET exchange.
///
/// `status` is `None` when the exchange produced no usable HTTP metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: Option<u16>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse, FetchError>;
}

pub struct ReqwestTransport {
    http: Client,
    user_agent: Option<String>,
}

impl ReqwestTransport {
    pub fn new(user_agent: Option<String>) -> Self {
        Self::with_client(Client::new(), user_agent)
    }

    pub fn with_client(http: Client, user_agent: Option<String>) -> Self {
        Self { http, user_agent }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, FetchError> {
        let mut request = self.http.get(url.clone());
        if let Some(user_agent) = &self.user_agent {
            request = request.header(USER_AGENT, user_agent);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
