// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Classification API client.
//!
//! Thin wrapper over `reqwest` that:
//! - Joins paths onto the configured base URL
//! - Sends and parses JSON bodies
//! - Maps non-2xx responses to [`AppError`], keeping 409 distinct

use crate::config::Config;
use crate::error::AppError;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the classification API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client setup failed: {e}")))?;

        Ok(Self::with_http(http, &config.api_url))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let request = self.request(Method::GET, path).query(query);
        let response = self.send(Method::GET, path, request).await?;
        self.check_response_json(response).await
    }

    /// POST a JSON body, parsing the JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let request = self.request(Method::POST, path).json(body);
        let response = self.send(Method::POST, path, request).await?;
        self.check_response_json(response).await
    }

    /// POST a JSON body, ignoring the response body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), AppError> {
        let request = self.request(Method::POST, path).json(body);
        let response = self.send(Method::POST, path, request).await?;
        self.check_response(response).await
    }

    /// PUT a JSON body, ignoring the response body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), AppError> {
        let request = self.request(Method::PUT, path).json(body);
        let response = self.send(Method::PUT, path, request).await?;
        self.check_response(response).await
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        let request = self.request(Method::DELETE, path);
        let response = self.send(Method::DELETE, path, request).await?;
        self.check_response(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        self.http.request(method, url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Response, AppError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "API request failed");
            AppError::Transport(e.to_string())
        })?;

        tracing::debug!(%method, path, status = response.status().as_u16(), "API response");
        Ok(response)
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Decode(format!("JSON parse error: {}", e)))
    }

    async fn error_from(response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);

        if status.as_u16() == 409 {
            tracing::info!(message = ?message, "API reported a conflict (409)");
        } else {
            tracing::warn!(status = status.as_u16(), body = %body, "API error response");
        }

        AppError::from_status(status, message)
    }
}
