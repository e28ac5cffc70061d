use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::envelope;
use crate::config::Config;
use crate::error::{AppError, Result};

/// Typed client for the membership backend.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<Secret<String>>,
    dojo: Option<String>,
}

/// A blob export (CSV/PDF/SEPA file) as delivered by the backend.
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(
            &config.backend_url,
            config.api_token.clone(),
            config.dojo.clone(),
        )
    }

    pub fn with_base_url(
        base_url: &str,
        token: Option<Secret<String>>,
        dojo: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            dojo,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "Backend request");

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(dojo) = &self.dojo {
            request = request.header("X-Dojo", dojo);
        }
        request
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::decode(response).await
    }

    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::decode(response).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// Fetches a blob export. The filename comes from Content-Disposition,
    /// with the last path segment as fallback.
    pub async fn download(&self, path: &str) -> Result<Download> {
        let response = self.request(Method::GET, path).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, &response.bytes().await?));
        }

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_disposition_filename)
            .unwrap_or_else(|| {
                path.rsplit('/')
                    .next()
                    .unwrap_or("export")
                    .to_string()
            });
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Download {
            filename,
            content_type,
            bytes: response.bytes().await?.to_vec(),
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }
        envelope::decode(&body)
    }

    fn status_error(status: reqwest::StatusCode, body: &[u8]) -> AppError {
        // Error envelopes arrive with non-OK statuses too; keep the message.
        if let Some(message) = envelope::error_message(body) {
            return AppError::Backend(message);
        }
        match status {
            reqwest::StatusCode::NOT_FOUND => AppError::NotFound(status.to_string()),
            _ => AppError::Backend(format!("HTTP {}", status)),
        }
    }
}

fn parse_disposition_filename(header: &str) -> Option<String> {
    let marker = "filename=";
    let idx = header.find(marker)?;
    let raw = header[idx + marker.len()..].trim();
    let name = raw.trim_matches('"').split(';').next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_disposition_filename() {
        assert_eq!(
            parse_disposition_filename("attachment; filename=\"lastschrift.xml\""),
            Some("lastschrift.xml".to_string())
        );
        assert_eq!(
            parse_disposition_filename("attachment; filename=export.csv"),
            Some("export.csv".to_string())
        );
        assert_eq!(parse_disposition_filename("attachment"), None);
    }
}
