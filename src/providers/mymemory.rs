use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for the MyMemory translation API
#[derive(Debug)]
pub struct MyMemory {
    /// Base URL of the API, without the `/get` path
    base_url: String,
    /// Address sent as `de` to raise the anonymous daily quota
    contact_email: Option<String>,
    /// HTTP client for making requests
    client: Client,
}

/// Translation request
#[derive(Debug, Clone)]
pub struct MyMemoryRequest {
    /// The text to translate
    pub text: String,
    /// Source language (ISO 639-1)
    pub source_language: String,
    /// Target language (ISO 639-1)
    pub target_language: String,
}

impl MyMemoryRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Language pair in the `source|target` form the API expects
    pub fn language_pair(&self) -> String {
        format!("{}|{}", self.source_language, self.target_language)
    }
}

/// Translated segment inside a response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseData {
    /// Translated text
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    /// Match quality reported by the translation memory
    #[serde(rename = "match", default)]
    pub match_quality: Option<f64>,
}

/// Response body of `/get`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyMemoryResponse {
    /// Translation result
    #[serde(rename = "responseData")]
    pub response_data: ResponseData,
    /// Status, sent either as a number or as a numeric string
    #[serde(rename = "responseStatus")]
    pub response_status: serde_json::Value,
    /// Details explaining a non-200 status
    #[serde(rename = "responseDetails", default)]
    pub response_details: serde_json::Value,
}

impl MyMemoryResponse {
    /// Status code carried in the body, if it is numeric
    pub fn status_code(&self) -> Option<u16> {
        match &self.response_status {
            serde_json::Value::Number(number) => {
                number.as_u64().and_then(|n| u16::try_from(n).ok())
            }
            serde_json::Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    fn details(&self) -> String {
        match &self.response_details {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl MyMemory {
    /// Create a new client
    pub fn new(
        base_url: impl Into<String>,
        contact_email: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            contact_email,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// URL of the `/get` call for `request`
    pub fn build_url(&self, request: &MyMemoryRequest) -> Result<Url, ProviderError> {
        let base = format!("{}/get", self.base_url);
        let mut params = vec![
            ("q", request.text.clone()),
            ("langpair", request.language_pair()),
        ];
        if let Some(email) = &self.contact_email {
            params.push(("de", email.clone()));
        }

        Url::parse_with_params(&base, &params).map_err(|e| {
            ProviderError::RequestFailed(format!("Invalid MyMemory URL {}: {}", base, e))
        })
    }

    /// Parse a response body and check the status it carries
    pub fn parse_response(body: &str) -> Result<MyMemoryResponse, ProviderError> {
        let response: MyMemoryResponse = serde_json::from_str(body).map_err(|e| {
            ProviderError::ParseError(format!(
                "{} (body: {})",
                e,
                body.chars().take(200).collect::<String>()
            ))
        })?;

        match response.status_code() {
            Some(200) => Ok(response),
            Some(status_code) => Err(ProviderError::ApiError {
                status_code,
                message: response.details(),
            }),
            None => Err(ProviderError::ParseError(format!(
                "Unexpected responseStatus: {}",
                response.response_status
            ))),
        }
    }
}

#[async_trait]
impl Provider for MyMemory {
    type Request = MyMemoryRequest;
    type Response = MyMemoryResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = self.build_url(&request)?;
        debug!(
            "MyMemory request ({} chars, {})",
            request.text.chars().count(),
            request.language_pair()
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::RequestFailed(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            error!("MyMemory API error ({}): {}", status, body);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        Self::parse_response(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete(MyMemoryRequest::new("你好", "zh", "en")).await.map(|_| ())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response_data.translated_text.clone()
    }
}
