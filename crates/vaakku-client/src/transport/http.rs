//! reqwest-backed transport

use super::{ApiRequest, Method, MultipartForm, RawResponse, RequestBody, Transport, ANONYMOUS_ID_HEADER};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, instrument};
use vaakku_core::CallerIdentity;

/// HTTP transport for the Vaakku API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::Configuration("API base URL is empty".to_string()));
        }
        if config.timeout_secs == 0 {
            return Err(Error::Configuration("API timeout must be at least one second".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn multipart_form(form: &MultipartForm) -> Result<Form> {
    let mut out = Form::new();
    for file in &form.files {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)
            .map_err(|e| Error::InvalidInput(format!("invalid MIME type '{}': {}", file.mime, e)))?;
        out = out.part(file.field.clone(), part);
    }
    for (name, value) in &form.fields {
        out = out.text(name.clone(), value.clone());
    }
    Ok(out)
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(method = request.method.as_str(), path = %request.path))]
    async fn send(&self, request: &ApiRequest, caller: &CallerIdentity) -> Result<RawResponse> {
        let url = self.url(&request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match caller {
            CallerIdentity::Authenticated { token } => {
                builder.header(AUTHORIZATION, token.bearer_header())
            }
            CallerIdentity::Anonymous { anonymous_id } => {
                builder.header(ANONYMOUS_ID_HEADER, anonymous_id.as_str())
            }
        };

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(multipart_form(form)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        debug!(status, bytes = body.len(), "Response received");
        Ok(RawResponse { status, body })
    }
}
