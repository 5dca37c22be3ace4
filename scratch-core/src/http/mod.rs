//! Thin JSON client over the Scratch & Win backend.

pub mod error;

use crate::config::ClientConfig;
use crate::error::{Result, ScratchError};
use crate::session::SessionContext;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub type Query = Vec<(&'static str, String)>;

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Option<Arc<SessionContext>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Option<Arc<SessionContext>>) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ScratchError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Option<&Arc<SessionContext>> {
        self.session.as_ref()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T> {
        let request = self.request(Method::GET, path).query(query);
        let body = self.execute(Method::GET, path, request).await?;
        unwrap_data(&body)
    }

    pub async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(payload);
        let body = self.execute(Method::POST, path, request).await?;
        unwrap_data(&body)
    }

    pub async fn put<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).json(payload);
        let body = self.execute(Method::PUT, path, request).await?;
        unwrap_data(&body)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.request(Method::DELETE, path);
        let body = self.execute(Method::DELETE, path, request).await?;
        unwrap_data(&body)
    }

    pub async fn delete_with_body<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::DELETE, path).json(payload);
        let body = self.execute(Method::DELETE, path, request).await?;
        unwrap_data(&body)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let request = self.request(Method::POST, path).multipart(form);
        let body = self.execute(Method::POST, path, request).await?;
        unwrap_data(&body)
    }

    /// Raw response body, for file downloads that carry no envelope.
    pub async fn get_bytes(&self, path: &str, query: &Query) -> Result<Vec<u8>> {
        let request = self.request(Method::GET, path).query(query);
        self.execute(Method::GET, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    async fn execute(&self, method: Method, path: &str, request: RequestBuilder) -> Result<Vec<u8>> {
        let request = match &self.session {
            Some(session) => match session.bearer().await? {
                Some(token) => request.bearer_auth(token),
                None => request,
            },
            None => request,
        };

        tracing::debug!("API Request: {} {}", method, path);

        let response = request.send().await.map_err(|e| {
            tracing::warn!("API Request Error: {} {}: {}", method, path, e);
            ScratchError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok(body);
        }

        let status = status.as_u16();
        let login_route = match (&self.session, status) {
            (Some(session), 401) => {
                session.expire().await?;
                Some(session.portal().login_route())
            }
            _ => None,
        };

        let err = error::from_response(status, &body, login_route);
        tracing::warn!("API Response Error: {} {} ({}): {}", method, path, status, err);
        Err(err)
    }
}

/// Pull `data` out of the `{ success, data }` envelope. A missing `data`
/// reads as `null`, which only a `Value` or `Option` target accepts.
pub fn unwrap_data<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let mut envelope: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(body)?
    };

    let data = match envelope.get_mut("data") {
        Some(data) => data.take(),
        None => Value::Null,
    };

    Ok(serde_json::from_value(data)?)
}
