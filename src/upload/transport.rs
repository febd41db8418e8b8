use std::time::Duration;

use anyhow::Context;

use crate::{
    capture::service::UploadFile,
    foundation::error::{PlaqueError, PlaqueResult},
};

/// User agent sent with every generation request.
const USER_AGENT_VALUE: &str = concat!("photoplaque/", env!("CARGO_PKG_VERSION"));

/// Raw answer of the generation service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends the multipart generation request.
///
/// Implementations return `Ok` for any HTTP answer, whatever its status, and reserve `Err` for
/// requests that never got one.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn post_generate(
        &self,
        endpoint: &str,
        image: UploadFile,
        name: &str,
    ) -> PlaqueResult<TransportResponse>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> PlaqueResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, image), fields(len = image.bytes.len()))]
    async fn post_generate(
        &self,
        endpoint: &str,
        image: UploadFile,
        name: &str,
    ) -> PlaqueResult<TransportResponse> {
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(image.mime)
            .map_err(|e| PlaqueError::network(None, e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("image", part)
            .text("name", name.to_string());

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PlaqueError::network(None, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| PlaqueError::network(Some(status), e.to_string()))?;
        tracing::debug!(status, len = body.len(), "generation response");
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
