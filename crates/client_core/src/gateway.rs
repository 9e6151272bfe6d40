use anyhow::Result;
use async_trait::async_trait;
use shared::{error::FetchError, protocol::RawEnvelope};
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::ClientSettings,
    transport::{HttpTransport, ReqwestTransport},
};

#[async_trait]
pub trait FetchGateway: Send + Sync {
    async fn fetch_first_page(&self) -> Result<RawEnvelope, FetchError>;
    async fn fetch_page(&self, link: Option<&Url>) -> Result<RawEnvelope, FetchError>;
}

/// What a single fetch is aimed at.
#[derive(Debug, Clone, Copy)]
enum FetchTarget<'a> {
    FirstPage,
    Link(Option<&'a Url>),
}

pub struct CollectionGateway<T: HttpTransport> {
    transport: T,
    first_page: Result<Url, String>,
}

impl CollectionGateway<ReqwestTransport> {
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let base_url = settings.validated_base_url()?;
        Ok(Self::new(
            ReqwestTransport::new(settings.user_agent.clone()),
            &base_url,
            &settings.collection_path,
        ))
    }
}

impl<T: HttpTransport> CollectionGateway<T> {
    /// A base that cannot take the collection path is remembered as an error
    /// and reported as `InvalidRequest` on the first-page fetch.
    pub fn new(transport: T, base_url: &Url, collection_path: &str) -> Self {
        let first_page = base_url
            .join(collection_path.trim_start_matches('/'))
            .map_err(|e| format!("cannot build collection url from '{base_url}': {e}"));
        Self {
            transport,
            first_page,
        }
    }

    pub fn first_page_url(&self) -> Option<&Url> {
        self.first_page.as_ref().ok()
    }

    fn resolve<'a>(&'a self, target: FetchTarget<'a>) -> Result<&'a Url, FetchError> {
        match target {
            FetchTarget::FirstPage => self
                .first_page
                .as_ref()
                .map_err(|reason| FetchError::InvalidRequest(reason.clone())),
            FetchTarget::Link(Some(url)) => Ok(url),
            FetchTarget::Link(None) => Err(FetchError::InvalidRequest(
                "no page link to follow".to_string(),
            )),
        }
    }

    async fn fetch(&self, target: FetchTarget<'_>) -> Result<RawEnvelope, FetchError> {
        let url = self.resolve(target)?;
        debug!(url = %url, "fetching collection page");

        let response = self.transport.get(url).await?;

        let Some(status) = response.status else {
            warn!(url = %url, "collection response had no status");
            return Err(FetchError::BadResponse);
        };
        if !(200..=299).contains(&status) {
            warn!(url = %url, status, "collection request failed");
            return Err(FetchError::HttpError(status));
        }

        RawEnvelope::from_slice(&response.body).map_err(|e| {
            warn!(url = %url, status, "collection body did not decode: {e}");
            FetchError::from(e)
        })
    }
}

#[async_trait]
impl<T: HttpTransport> FetchGateway for CollectionGateway<T> {
    async fn fetch_first_page(&self) -> Result<RawEnvelope, FetchError> {
        self.fetch(FetchTarget::FirstPage).await
    }

    async fn fetch_page(&self, link: Option<&Url>) -> Result<RawEnvelope, FetchError> {
        self.fetch(FetchTarget::Link(link)).await
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
