//! Generic HTTP client for the chat service API.
//!
//! One best-effort request per call: no retry, no timeout, no cancellation
//! beyond dropping the future. The bearer token is attached from the
//! injected [`TokenStore`] whenever one is present, so domain modules never
//! touch credential state directly.

use crate::auth::TokenStore;
use crate::types::{AppError, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Thin wrapper over `reqwest::Client` bound to a base URL and a token store.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: Arc<TokenStore>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// `GET path`, parsing the JSON response body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.builder(Method::GET, path)).await?;
        Self::parse_json(response).await
    }

    /// `POST path` with a JSON body, parsing the JSON response body.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(self.builder(Method::POST, path).json(body)).await?;
        Self::parse_json(response).await
    }

    /// `PUT path` with a JSON body, parsing the JSON response body.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(self.builder(Method::PUT, path).json(body)).await?;
        Self::parse_json(response).await
    }

    /// `POST path` with a `application/x-www-form-urlencoded` body. The login
    /// endpoint follows the OAuth2 password-form convention and is the one
    /// caller of this.
    pub async fn post_form<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &B,
    ) -> Result<T> {
        let response = self.send(self.builder(Method::POST, path).form(form)).await?;
        Self::parse_json(response).await
    }

    /// `POST path` with a multipart body (document upload). The content type
    /// and boundary headers are set by reqwest.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let response = self
            .send(self.builder(Method::POST, path).multipart(form))
            .await?;
        Self::parse_json(response).await
    }

    /// `POST path` with no body, discarding any response body.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        self.send(self.builder(Method::POST, path)).await?;
        Ok(())
    }

    /// `DELETE path`, discarding any response body (the API answers 204).
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.builder(Method::DELETE, path)).await?;
        Ok(())
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.store.get() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = Self::error_message(status, response).await;
        warn!(status = status.as_u16(), %message, "api request failed");
        Err(AppError::Http {
            status: status.as_u16(),
            message,
        })
    }

    /// Pulls the server-provided message out of an error body, falling back
    /// to a status-based message when the body is absent or not JSON.
    async fn error_message(status: StatusCode, response: Response) -> String {
        let fallback = format!("request failed with status {}", status.as_u16());
        let body = match response.text().await {
            Ok(body) => body,
            Err(_) => return fallback,
        };
        serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("detail"))
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(fallback)
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("invalid response body: {}", e)))
    }
}
